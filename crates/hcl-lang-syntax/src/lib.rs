//! Syntax tree and parser for the HCL-like declarative configuration
//! language.
//!
//! A file parses into a root [`Body`](ast::Body) of attributes and
//! nested blocks. Expressions cover literals, templates, traversals,
//! index/splat, object/tuple constructors, function calls, conditionals
//! and `for` expressions — the exact vocabulary the core dispatcher
//! pairs with constraints.

pub mod ast;
mod lexer;
mod parser;

pub use ast::{
    Attribute, Block, Body, BodyItem, ConditionalExpr, ExprKind, Expression, ForExpr,
    FunctionCallExpr, IndexExpr, Label, LiteralExpr, LiteralKind, ObjectConsExpr, ObjectConsItem,
    SplatExpr, TemplateExpr, TemplatePart, TraversalExpr, TraversalStep, TupleConsExpr,
};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{parse, ParseError, Parser};

pub use hcl_lang_pos::Span;
