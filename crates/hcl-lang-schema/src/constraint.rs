//! The constraint sum type: a descriptor of what shape of
//! expression is allowed in a given slot. This is the type the
//! expression dispatcher in `hcl-lang-core` matches on.

use std::collections::BTreeMap;

use crate::address::AddressSchema;
use crate::schema::AttributeSchema;
use crate::types::{LiteralValueData, Type};

/// What an expression slot is allowed to contain. Every feature
/// operation in `hcl-lang-core` dispatches on this enum's variant, never
/// on a runtime-reflected type — see the design note on polymorphism
/// without OO.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Expect a literal matching a type (primitive, list/set/tuple/map/object).
    LiteralType(LiteralTypeConstraint),
    /// Expect an exact literal value.
    LiteralValue(LiteralValueConstraint),
    /// Expect a bare identifier equal to a fixed word.
    Keyword(KeywordConstraint),
    /// Expect a traversal resolving to a reference target.
    Reference(ReferenceConstraint),
    /// Expect a type expression, e.g. `list(string)`.
    TypeDeclaration,
    /// Homogeneous collection with order.
    List(Box<CollectionConstraint>),
    /// Homogeneous collection without meaningful order.
    Set(Box<CollectionConstraint>),
    /// Fixed-length heterogeneous collection.
    Tuple(TupleConstraint),
    /// Keyed record.
    Object(ObjectConstraint),
    /// Keyed homogeneous collection.
    Map(Box<MapConstraint>),
    /// First-match disjunction; order is significant for target selection.
    OneOf(Vec<Constraint>),
    /// Accept any expression shape yielding `of_type`.
    AnyExpression(AnyExpressionConstraint),
}

impl Constraint {
    pub fn any(of_type: Type) -> Self {
        Constraint::AnyExpression(AnyExpressionConstraint {
            of_type: Some(of_type),
            skip_literal_complex_types: false,
        })
    }

    pub fn literal(ty: Type) -> Self {
        Constraint::LiteralType(LiteralTypeConstraint { ty })
    }

    /// The type this constraint accepts, when it can be stated as a
    /// single `Type` (used for type-compatibility checks against
    /// reference targets and for placeholder generation).
    pub fn value_type(&self) -> Option<Type> {
        match self {
            Constraint::LiteralType(c) => Some(c.ty.clone()),
            Constraint::LiteralValue(c) => Some(c.value.ty.clone()),
            Constraint::Reference(c) => c.of_type.clone(),
            Constraint::AnyExpression(c) => c.of_type.clone(),
            Constraint::List(c) => Some(Type::List(Box::new(c.elem.value_type()?))),
            Constraint::Set(c) => Some(Type::Set(Box::new(c.elem.value_type()?))),
            Constraint::Map(c) => Some(Type::Map(Box::new(c.elem.value_type()?))),
            Constraint::Tuple(c) => Some(Type::Tuple(
                c.elems
                    .iter()
                    .map(|e| e.value_type().unwrap_or(Type::Dynamic))
                    .collect(),
            )),
            Constraint::Object(c) => Some(Type::Object(
                c.attributes
                    .iter()
                    .map(|(name, attr)| {
                        (
                            name.clone(),
                            attr.constraint.value_type().unwrap_or(Type::Dynamic),
                        )
                    })
                    .collect(),
            )),
            Constraint::Keyword(_) | Constraint::TypeDeclaration | Constraint::OneOf(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralTypeConstraint {
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralValueConstraint {
    pub value: LiteralValueData,
    pub is_deprecated: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeywordConstraint {
    pub word: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceConstraint {
    pub of_type: Option<Type>,
    pub of_scope_id: Option<String>,
    pub address: Option<AddressSchema>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionConstraint {
    pub elem: Constraint,
    pub min: Option<usize>,
    pub max: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TupleConstraint {
    pub elems: Vec<Constraint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectConstraint {
    /// A `BTreeMap` keeps iteration alphabetical without a separate
    /// sort step.
    pub attributes: BTreeMap<String, AttributeSchema>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapConstraint {
    pub elem: Constraint,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnyExpressionConstraint {
    pub of_type: Option<Type>,
    pub skip_literal_complex_types: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_type_for_nested_list_of_objects() {
        let mut attrs = BTreeMap::new();
        attrs.insert(
            "name".to_string(),
            AttributeSchema::required(Constraint::literal(Type::String)),
        );
        let c = Constraint::List(Box::new(CollectionConstraint {
            elem: Constraint::Object(ObjectConstraint { attributes: attrs }),
            min: None,
            max: None,
        }));
        let ty = c.value_type().unwrap();
        assert!(matches!(ty, Type::List(_)));
    }
}
