//! Built-in attribute and block schemas synthesized by the walker when
//! a body's extensions are active. These never come from
//! a caller-supplied schema; the walker substitutes them in by name.

use hcl_lang_schema::{
    Address, AddressStep, AttributeSchema, BlockSchema, BodySchema, CollectionConstraint,
    Constraint, Extensions, LabelSchema, MapConstraint, Type,
};

use crate::target::Target;

fn static_target(root: &str, attr: &str, ty: Type) -> Target {
    Target {
        address: Address::new(vec![
            AddressStep::Static { name: root.into() },
            AddressStep::Attr { name: attr.into() },
        ]),
        friendly_name: None,
        scope_id: None,
        ty: Some(ty),
        range: hcl_lang_pos::Range::empty("", hcl_lang_pos::Position::new(1, 1, 0)),
        body_range: hcl_lang_pos::Range::empty("", hcl_lang_pos::Position::new(1, 1, 0)),
        nested_targets: Vec::new(),
    }
}

/// The synthetic `count.index`/`each.key`/`each.value` targets exposed
/// while completing inside a block body whose `count`/`for_each`
/// extension is active.
pub fn count_each_targets(ext: &Extensions) -> Vec<Target> {
    let mut out = Vec::new();
    if ext.count {
        out.push(static_target("count", "index", Type::Number));
    }
    if ext.for_each {
        out.push(static_target("each", "key", Type::String));
        out.push(static_target("each", "value", Type::Dynamic));
    }
    out
}

/// `count = <number>`.
pub fn count_attribute() -> AttributeSchema {
    AttributeSchema::optional(Constraint::any(Type::Number))
        .with_description("The distinct index of this instance among its siblings.")
}

fn for_each_constraint() -> Constraint {
    Constraint::OneOf(vec![
        Constraint::Map(Box::new(MapConstraint {
            elem: Constraint::any(Type::Dynamic),
        })),
        Constraint::Set(Box::new(CollectionConstraint {
            elem: Constraint::any(Type::String),
            min: None,
            max: None,
        })),
        Constraint::Object(hcl_lang_schema::ObjectConstraint {
            attributes: Default::default(),
        }),
    ])
}

/// `for_each = <map|set-of-string|object>`.
pub fn for_each_attribute() -> AttributeSchema {
    AttributeSchema::optional(for_each_constraint())
        .with_description("A map or set of strings/objects used to drive multiple instances.")
}

/// The virtual `dynamic "<block_type>" { ... }` block synthesized when
/// `Extensions.DynamicBlocks` is enabled. `content_body` is the real
/// target block's merged body, looked up by the walker from the
/// dependent body that matches `block_type`.
pub fn dynamic_block(content_body: BodySchema) -> BlockSchema {
    let content = BlockSchema::new(content_body);

    let body = BodySchema::new()
        .with_attribute(
            "for_each",
            AttributeSchema::required(for_each_constraint()),
        )
        .with_attribute(
            "iterator",
            AttributeSchema::optional(Constraint::any(Type::String)),
        )
        .with_attribute(
            "labels",
            AttributeSchema::optional(Constraint::List(Box::new(CollectionConstraint {
                elem: Constraint::any(Type::String),
                min: None,
                max: None,
            }))),
        )
        .with_block("content", content);

    BlockSchema::new(body).with_labels(vec![LabelSchema::dep_key("block_type")])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_attribute_is_optional_number() {
        let attr = count_attribute();
        assert!(attr.is_optional);
        assert_eq!(attr.constraint.value_type(), Some(Type::Number));
    }

    #[test]
    fn count_each_targets_are_gated_on_their_extension() {
        let none = count_each_targets(&Extensions::default());
        assert!(none.is_empty());

        let count_only = count_each_targets(&Extensions {
            count: true,
            ..Extensions::default()
        });
        assert_eq!(count_only.len(), 1);
        assert_eq!(count_only[0].address.to_friendly_string(), "count.index");

        let for_each_only = count_each_targets(&Extensions {
            for_each: true,
            ..Extensions::default()
        });
        let addrs: Vec<_> = for_each_only.iter().map(|t| t.address.to_friendly_string()).collect();
        assert_eq!(addrs, vec!["each.key", "each.value"]);
    }

    #[test]
    fn for_each_offers_map_set_or_object() {
        match for_each_attribute().constraint {
            Constraint::OneOf(alts) => assert_eq!(alts.len(), 3),
            other => panic!("expected OneOf, got {other:?}"),
        }
    }
}
