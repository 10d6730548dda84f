//! The schema model: `BodySchema`, `BlockSchema`,
//! `AttributeSchema` and the `Constraint` sum type callers build to
//! describe the expected shape of a document.

mod address;
mod constraint;
mod schema;
mod types;

pub use address::{Address, AddressSchema, AddressStep};
pub use constraint::{
    AnyExpressionConstraint, CollectionConstraint, Constraint, KeywordConstraint,
    LiteralTypeConstraint, LiteralValueConstraint, MapConstraint, ObjectConstraint,
    ReferenceConstraint, TupleConstraint,
};
pub use schema::{
    AttributeSchema, BlockNesting, BlockSchema, BodySchema, Extensions, LabelSchema,
};
pub use types::{LiteralValueData, Type};
