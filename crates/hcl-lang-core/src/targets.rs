//! Top-down reference target and origin collection: walks a
//! parsed body against its schema once per schema-load cycle, emitting
//! every addressable value and every traversal that could consume one.

use hcl_lang_schema::{Address, AddressStep, BodySchema, Constraint, Type};
use hcl_lang_syntax::{Body, BodyItem, ExprKind, Expression};

use crate::doc::Doc;
use crate::handlers;
use crate::scope::Scope;
use crate::target::{sort_origins, sort_targets, Origin, Target, TargetContext};
use crate::walker::merged_schema;

/// Per-element targets for an `AsExprType` attribute whose value is a
/// tuple/list literal: each element becomes addressable through its
/// own `Index` step, typed by the collection's element type.
fn indexed_element_targets(doc: Doc, expr: &Expression, base: &Address, constraint: &Constraint) -> Vec<Target> {
    let ExprKind::TupleCons(tc) = &expr.kind else {
        return Vec::new();
    };
    let elem_ty = match constraint.value_type() {
        Some(Type::List(inner)) | Some(Type::Set(inner)) => Some(*inner),
        _ => None,
    };
    tc.items
        .iter()
        .enumerate()
        .map(|(idx, item)| Target {
            address: base.with_step(AddressStep::Index { key: idx.to_string() }),
            friendly_name: None,
            scope_id: None,
            ty: elem_ty.clone(),
            range: doc.range(item.range),
            body_range: doc.range(item.range),
            nested_targets: Vec::new(),
        })
        .collect()
}

/// Targets declared anywhere in `body` under `schema`, rooted at
/// `target_ctx`'s address. Recurses into nested attributes/blocks,
/// accumulating into each parent's `nested_targets`.
pub fn collect_targets(doc: Doc, body: &Body, schema: &BodySchema, target_ctx: &TargetContext) -> Vec<Target> {
    let mut out = Vec::new();
    for item in &body.items {
        match item {
            BodyItem::Attribute(attr) => {
                let Some(attr_schema) = schema.attributes.get(&attr.name) else {
                    continue;
                };
                let nested = handlers::reference_targets(
                    doc,
                    &attr.expr,
                    &attr_schema.constraint,
                    &target_ctx.descend(AddressStep::Attr { name: attr.name.clone() }),
                    Scope::empty(),
                );
                out.extend(nested);

                let Some(addr) = &attr_schema.address else {
                    continue;
                };
                let mut address = target_ctx.address.clone();
                for step in &addr.steps {
                    address.push(step.clone());
                }
                address.push(AddressStep::Attr { name: attr.name.clone() });

                let indexed = if addr.as_expr_type {
                    indexed_element_targets(doc, &attr.expr, &address, &attr_schema.constraint)
                } else {
                    Vec::new()
                };

                if addr.as_reference {
                    out.push(Target {
                        address,
                        friendly_name: attr_schema.description.clone(),
                        scope_id: None,
                        ty: attr_schema.constraint.value_type(),
                        range: doc.range(attr.name_range),
                        body_range: doc.range(attr.expr.range),
                        nested_targets: indexed,
                    });
                } else {
                    out.extend(indexed);
                }
            }
            BodyItem::Block(block) => {
                let Some(block_schema) = schema.blocks.get(&block.block_type) else {
                    continue;
                };
                let mut address = target_ctx.address.clone();
                if let Some(addr) = &block_schema.address {
                    for step in &addr.steps {
                        address.push(step.clone());
                    }
                }
                address.push(AddressStep::Root {
                    name: block.block_type.clone(),
                });
                // Every label contributes its literal value to the
                // address (e.g. `resource.aws_instance.x`), regardless of
                // whether it is the dependent-body selector.
                for label in &block.labels {
                    address.push(AddressStep::Static {
                        name: label.value.clone(),
                    });
                }

                let (child_as_expr_type, child_as_reference) = block_schema
                    .address
                    .as_ref()
                    .map(|a| (a.as_expr_type, a.as_reference))
                    .unwrap_or((false, true));
                let effective = merged_schema(block_schema, block);
                let child_ctx = TargetContext {
                    address: address.clone(),
                    local_address: Default::default(),
                    friendly_name: block_schema.description.clone(),
                    scope_id: None,
                    as_expr_type: child_as_expr_type,
                    as_reference: child_as_reference,
                };
                let nested_targets = collect_targets(doc, &block.body, &effective, &child_ctx);

                if block_schema.address.is_some() && child_as_reference {
                    out.push(Target {
                        address,
                        friendly_name: block_schema.description.clone(),
                        scope_id: None,
                        ty: None,
                        range: doc.range(block.type_range),
                        body_range: doc.range(block.body_range),
                        nested_targets,
                    });
                } else {
                    out.extend(nested_targets);
                }
            }
        }
    }
    sort_targets(&mut out);
    out
}

/// Origins found anywhere in `body`: every traversal under an
/// `AnyExpression`/`Reference` constraint.
pub fn collect_origins(doc: Doc, body: &Body, schema: &BodySchema, scope: Scope) -> Vec<Origin> {
    let mut out = Vec::new();
    for item in &body.items {
        match item {
            BodyItem::Attribute(attr) => {
                if let Some(attr_schema) = schema.attributes.get(&attr.name) {
                    let allow_self_refs = schema.extensions().self_refs;
                    out.extend(handlers::reference_origins(
                        doc,
                        &attr.expr,
                        &attr_schema.constraint,
                        allow_self_refs,
                        scope,
                    ));
                }
            }
            BodyItem::Block(block) => {
                if let Some(block_schema) = schema.blocks.get(&block.block_type) {
                    let effective = merged_schema(block_schema, block);
                    out.extend(collect_origins(doc, &block.body, &effective, scope));
                }
            }
        }
    }
    sort_origins(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hcl_lang_pos::LineIndex;
    use hcl_lang_schema::{AddressSchema, AttributeSchema, BlockSchema, CollectionConstraint, Constraint, LabelSchema, Type};
    use hcl_lang_syntax::parse;

    #[test]
    fn block_with_address_yields_a_target_per_label_tuple() {
        let source = "resource \"aws_instance\" \"x\" {\n  cpu_count = 4\n}\n";
        let (body, _) = parse(source);
        let index = LineIndex::new(source);
        let doc = Doc::new("f.hcl", source, &index);

        let inner = BodySchema::new().with_attribute(
            "cpu_count",
            AttributeSchema::required(Constraint::literal(Type::Number))
                .with_address(AddressSchema::default()),
        );
        let block_schema = BlockSchema::new(inner)
            .with_labels(vec![LabelSchema::new("type"), LabelSchema::dep_key("name")])
            .with_address(AddressSchema::default());
        let schema = BodySchema::new().with_block("resource", block_schema);

        let ctx = TargetContext::root();
        let targets = collect_targets(doc, &body, &schema, &ctx);
        assert_eq!(targets.len(), 1);
        assert_eq!(
            targets[0].address.to_friendly_string(),
            "resource.aws_instance.x"
        );
    }

    #[test]
    fn as_expr_type_attribute_threads_index_per_element() {
        let source = "values = [\"a\", \"b\"]\n";
        let (body, _) = parse(source);
        let index = LineIndex::new(source);
        let doc = Doc::new("f.hcl", source, &index);

        let elem = Constraint::literal(Type::String);
        let list = Constraint::List(Box::new(CollectionConstraint { elem, min: None, max: None }));
        let schema = BodySchema::new().with_attribute(
            "values",
            AttributeSchema::required(list).with_address(AddressSchema {
                as_expr_type: true,
                ..AddressSchema::default()
            }),
        );

        let ctx = TargetContext::root();
        let targets = collect_targets(doc, &body, &schema, &ctx);
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].nested_targets.len(), 2);
        assert_eq!(targets[0].nested_targets[0].address.to_friendly_string(), "values[0]");
        assert_eq!(targets[0].nested_targets[1].address.to_friendly_string(), "values[1]");
    }

    #[test]
    fn as_reference_false_suppresses_the_plain_target() {
        let source = "secret = \"x\"\n";
        let (body, _) = parse(source);
        let index = LineIndex::new(source);
        let doc = Doc::new("f.hcl", source, &index);

        let schema = BodySchema::new().with_attribute(
            "secret",
            AttributeSchema::required(Constraint::literal(Type::String)).with_address(AddressSchema {
                as_reference: false,
                ..AddressSchema::default()
            }),
        );

        let ctx = TargetContext::root();
        let targets = collect_targets(doc, &body, &schema, &ctx);
        assert!(targets.is_empty());
    }
}
