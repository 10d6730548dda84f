//! Expression dispatcher: an explicit match on the `Constraint`
//! variant chooses a handler, never runtime reflection. Every arm
//! implements the same five-operation contract and recurses into child
//! expressions through these same entry points.

mod any_expression;
mod collection;
mod literal;
mod reference;

use hcl_lang_schema::Constraint;
use hcl_lang_syntax::Expression;

use crate::candidate::{Candidate, CandidateKind};
use crate::doc::Doc;
use crate::hover::HoverData;
use crate::request::RequestContext;
use crate::scope::Scope;
use crate::semantic_token::SemanticToken;
use crate::target::{Origin, Target, TargetContext};

pub fn completion_at(
    doc: Doc,
    expr: &Expression,
    constraint: &Constraint,
    scope: Scope,
    ctx: &RequestContext,
) -> Vec<Candidate> {
    if ctx.is_cancelled() {
        return Vec::new();
    }
    match constraint {
        Constraint::LiteralType(c) if c.ty.is_primitive() => {
            literal::primitive_completion(doc, expr, &c.ty, ctx)
        }
        Constraint::LiteralType(c) => collection::literal_skeleton_completion(doc, expr, &c.ty, ctx),
        Constraint::LiteralValue(c) => literal::value_completion(doc, expr, c, ctx),
        Constraint::Keyword(c) => literal::keyword_completion(doc, expr, c, ctx),
        Constraint::TypeDeclaration => literal::type_declaration_completion(doc, expr, ctx),
        Constraint::Reference(c) => reference::completion(doc, expr, c, scope, ctx),
        Constraint::List(c) => {
            collection::collection_completion(doc, expr, &c.elem, scope, ctx, CandidateKind::List)
        }
        Constraint::Set(c) => {
            collection::collection_completion(doc, expr, &c.elem, scope, ctx, CandidateKind::Set)
        }
        Constraint::Tuple(c) => collection::tuple_completion(doc, expr, c, scope, ctx),
        Constraint::Object(c) => collection::object_completion(doc, expr, c, scope, ctx),
        Constraint::Map(c) => collection::map_completion(doc, expr, c, scope, ctx),
        Constraint::OneOf(alts) => alts
            .iter()
            .flat_map(|alt| completion_at(doc, expr, alt, scope, ctx))
            .collect(),
        Constraint::AnyExpression(c) => any_expression::completion(doc, expr, c, scope, ctx),
    }
}

pub fn hover_at(
    doc: Doc,
    expr: &Expression,
    constraint: &Constraint,
    scope: Scope,
    ctx: &RequestContext,
) -> Option<HoverData> {
    if ctx.is_cancelled() {
        return None;
    }
    match constraint {
        Constraint::LiteralType(c) if c.ty.is_primitive() => literal::primitive_hover(doc, expr, &c.ty, ctx),
        Constraint::LiteralType(c) => collection::literal_skeleton_hover(doc, expr, &c.ty, ctx),
        Constraint::LiteralValue(c) => literal::value_hover(doc, expr, c, ctx),
        Constraint::Keyword(c) => literal::keyword_hover(doc, expr, c, ctx),
        Constraint::TypeDeclaration => None,
        Constraint::Reference(c) => reference::hover(doc, expr, c, scope, ctx),
        Constraint::List(c) => collection::collection_hover(doc, expr, &c.elem, "list", scope, ctx),
        Constraint::Set(c) => collection::collection_hover(doc, expr, &c.elem, "set", scope, ctx),
        Constraint::Tuple(c) => collection::tuple_hover(doc, expr, c, scope, ctx),
        Constraint::Object(c) => collection::object_hover(doc, expr, c, scope, ctx),
        Constraint::Map(c) => collection::collection_hover(doc, expr, &c.elem, "map", scope, ctx),
        Constraint::OneOf(alts) => alts.iter().find_map(|alt| hover_at(doc, expr, alt, scope, ctx)),
        Constraint::AnyExpression(c) => any_expression::hover(doc, expr, c, scope, ctx),
    }
}

pub fn semantic_tokens(
    doc: Doc,
    expr: &Expression,
    constraint: &Constraint,
    scope: Scope,
) -> Vec<SemanticToken> {
    match constraint {
        Constraint::LiteralType(c) if c.ty.is_primitive() => literal::primitive_tokens(doc, expr, &c.ty),
        Constraint::LiteralType(c) => collection::literal_skeleton_tokens(doc, expr, &c.ty, scope),
        Constraint::LiteralValue(c) => literal::primitive_tokens(doc, expr, &c.value.ty),
        Constraint::Keyword(_) => vec![SemanticToken::new(
            crate::semantic_token::TokenType::Keyword,
            doc.range(expr.range),
        )],
        Constraint::TypeDeclaration => vec![SemanticToken::new(
            crate::semantic_token::TokenType::TypePrimitive,
            doc.range(expr.range),
        )],
        Constraint::Reference(_) => vec![SemanticToken::new(
            crate::semantic_token::TokenType::Traversal,
            doc.range(expr.range),
        )],
        Constraint::List(c) => collection::collection_tokens(doc, expr, &c.elem, scope),
        Constraint::Set(c) => collection::collection_tokens(doc, expr, &c.elem, scope),
        Constraint::Tuple(c) => collection::tuple_tokens(doc, expr, c, scope),
        Constraint::Object(c) => collection::object_tokens(doc, expr, c, scope),
        Constraint::Map(c) => collection::collection_tokens(doc, expr, &c.elem, scope),
        Constraint::OneOf(alts) => alts
            .first()
            .map(|alt| semantic_tokens(doc, expr, alt, scope))
            .unwrap_or_default(),
        Constraint::AnyExpression(c) => any_expression::tokens(doc, expr, c, scope),
    }
}

pub fn reference_origins(
    doc: Doc,
    expr: &Expression,
    constraint: &Constraint,
    allow_self_refs: bool,
    scope: Scope,
) -> Vec<Origin> {
    match constraint {
        Constraint::Reference(c) => reference::origins(doc, expr, c, allow_self_refs),
        Constraint::List(c) => collection::collection_origins(doc, expr, &c.elem, allow_self_refs, scope),
        Constraint::Set(c) => collection::collection_origins(doc, expr, &c.elem, allow_self_refs, scope),
        Constraint::Map(c) => collection::collection_origins(doc, expr, &c.elem, allow_self_refs, scope),
        Constraint::Tuple(c) => collection::tuple_origins(doc, expr, c, allow_self_refs, scope),
        Constraint::Object(c) => collection::object_origins(doc, expr, c, allow_self_refs, scope),
        Constraint::OneOf(alts) => alts
            .iter()
            .flat_map(|alt| reference_origins(doc, expr, alt, allow_self_refs, scope))
            .collect(),
        Constraint::AnyExpression(c) => any_expression::origins(doc, expr, c, allow_self_refs, scope),
        _ => Vec::new(),
    }
}

pub fn reference_targets(
    doc: Doc,
    expr: &Expression,
    constraint: &Constraint,
    target_ctx: &TargetContext,
    scope: Scope,
) -> Vec<Target> {
    match constraint {
        Constraint::Object(c) => collection::object_targets(doc, expr, c, target_ctx, scope),
        Constraint::Tuple(c) => collection::tuple_targets(doc, expr, c, target_ctx, scope),
        Constraint::List(c) => collection::collection_targets(doc, expr, &c.elem, target_ctx, scope),
        Constraint::Set(c) => collection::collection_targets(doc, expr, &c.elem, target_ctx, scope),
        Constraint::Map(c) => collection::collection_targets(doc, expr, &c.elem, target_ctx, scope),
        Constraint::OneOf(alts) => alts
            .iter()
            .flat_map(|alt| reference_targets(doc, expr, alt, target_ctx, scope))
            .collect(),
        _ => Vec::new(),
    }
}
