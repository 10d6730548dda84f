//! `AnyExpression`: the richest handler, dispatching on the
//! concrete expression shape under the cursor rather than on a single
//! fixed syntax shape.

use hcl_lang_schema::{AnyExpressionConstraint, ReferenceConstraint, Type};
use hcl_lang_syntax::{ExprKind, Expression};

use super::collection::constraint_for_type;
use crate::candidate::{Candidate, CandidateKind, TextEdit};
use crate::doc::Doc;
use crate::hover::{HoverData, Markup};
use crate::request::RequestContext;
use crate::scope::Scope;
use crate::semantic_token::{SemanticToken, TokenType};
use crate::target::Origin;

fn as_reference_constraint(c: &AnyExpressionConstraint) -> ReferenceConstraint {
    ReferenceConstraint {
        of_type: c.of_type.clone(),
        of_scope_id: None,
        address: None,
    }
}

/// When `of_type` names a structural type, tuple/object constructor
/// expressions delegate to a synthetic matching constraint.
fn structural_delegate(of_type: &Type) -> Option<hcl_lang_schema::Constraint> {
    matches!(
        of_type,
        Type::List(_) | Type::Set(_) | Type::Tuple(_) | Type::Map(_) | Type::Object(_)
    )
    .then(|| constraint_for_type(of_type))
}

pub fn completion(
    doc: Doc,
    expr: &Expression,
    constraint: &AnyExpressionConstraint,
    scope: Scope,
    ctx: &RequestContext,
) -> Vec<Candidate> {
    if !expr.range.contains_or_touches(ctx.pos.byte) {
        return Vec::new();
    }
    match &expr.kind {
        ExprKind::FunctionCall(fc) => {
            if fc.name_range.contains_or_touches(ctx.pos.byte) {
                return scope
                    .functions
                    .iter()
                    .filter(|f| f.name.starts_with(&fc.name))
                    .map(|f| {
                        let edit = TextEdit::with_snippet(doc.range(fc.name_range), f.name.clone(), format!("{}(${{1}})", f.name));
                        let mut candidate = Candidate::new(f.name.clone(), CandidateKind::Function, edit);
                        if let Some(desc) = &f.description {
                            candidate = candidate.with_description(desc.clone());
                        }
                        candidate
                    })
                    .collect();
            }
            for arg in &fc.args {
                if arg.range.contains_or_touches(ctx.pos.byte) {
                    // Parameter names are known (for hover/signature display)
                    // but not per-parameter types, so every argument slot is
                    // probed as an unconstrained expression.
                    return super::completion_at(doc, arg, &hcl_lang_schema::Constraint::any(Type::Dynamic), scope, ctx);
                }
            }
            Vec::new()
        }
        ExprKind::ScopeTraversal(_) | ExprKind::Missing => {
            super::reference::completion(doc, expr, &as_reference_constraint(constraint), scope, ctx)
        }
        ExprKind::Template(t) if t.is_pure_literal() && constraint.of_type == Some(Type::String) => {
            super::literal::primitive_completion(doc, expr, &Type::String, ctx)
        }
        ExprKind::Conditional(c) => {
            if c.condition.range.contains_or_touches(ctx.pos.byte) {
                super::completion_at(doc, &c.condition, &hcl_lang_schema::Constraint::any(Type::Bool), scope, ctx)
            } else if c.true_expr.range.contains_or_touches(ctx.pos.byte) {
                completion(doc, &c.true_expr, constraint, scope, ctx)
            } else {
                completion(doc, &c.false_expr, constraint, scope, ctx)
            }
        }
        ExprKind::Index(ix) if ix.key.range.contains_or_touches(ctx.pos.byte) => {
            super::completion_at(doc, &ix.key, &hcl_lang_schema::Constraint::any(Type::String), scope, ctx)
        }
        ExprKind::TupleCons(_) | ExprKind::ObjectCons(_) => {
            if let Some(of_type) = &constraint.of_type {
                if let Some(delegate) = structural_delegate(of_type) {
                    return super::completion_at(doc, expr, &delegate, scope, ctx);
                }
            }
            Vec::new()
        }
        _ => Vec::new(),
    }
}

pub fn hover(
    doc: Doc,
    expr: &Expression,
    constraint: &AnyExpressionConstraint,
    scope: Scope,
    ctx: &RequestContext,
) -> Option<HoverData> {
    if !expr.range.contains_or_touches(ctx.pos.byte) {
        return None;
    }
    match &expr.kind {
        ExprKind::FunctionCall(fc) if fc.name_range.contains_or_touches(ctx.pos.byte) => {
            let f = scope.functions.iter().find(|f| f.name == fc.name)?;
            let sig = format!(
                "`{}({}) -> {}`",
                f.name,
                f.params.join(", "),
                f.return_type.friendly_name()
            );
            Some(HoverData::new(Markup::markdown(sig), doc.range(fc.name_range)))
        }
        ExprKind::ScopeTraversal(_) => {
            super::reference::hover(doc, expr, &as_reference_constraint(constraint), scope, ctx)
        }
        ExprKind::Conditional(c) => {
            if c.true_expr.range.contains_or_touches(ctx.pos.byte) {
                hover(doc, &c.true_expr, constraint, scope, ctx)
            } else if c.false_expr.range.contains_or_touches(ctx.pos.byte) {
                hover(doc, &c.false_expr, constraint, scope, ctx)
            } else {
                None
            }
        }
        ExprKind::TupleCons(_) | ExprKind::ObjectCons(_) => {
            let of_type = constraint.of_type.as_ref()?;
            let delegate = structural_delegate(of_type)?;
            super::hover_at(doc, expr, &delegate, scope, ctx)
        }
        _ => None,
    }
}

pub fn tokens(doc: Doc, expr: &Expression, constraint: &AnyExpressionConstraint, scope: Scope) -> Vec<SemanticToken> {
    match &expr.kind {
        ExprKind::FunctionCall(fc) => {
            let mut tokens = vec![SemanticToken::new(TokenType::Function, doc.range(fc.name_range))];
            for arg in &fc.args {
                tokens.extend(tokens_for_dynamic(doc, arg, scope));
            }
            tokens
        }
        ExprKind::ScopeTraversal(_) => vec![SemanticToken::new(TokenType::Reference, doc.range(expr.range))],
        ExprKind::Conditional(c) => {
            let mut out = tokens_for_dynamic(doc, &c.condition, scope);
            out.extend(tokens(doc, &c.true_expr, constraint, scope));
            out.extend(tokens(doc, &c.false_expr, constraint, scope));
            out
        }
        ExprKind::TupleCons(_) | ExprKind::ObjectCons(_) => constraint
            .of_type
            .as_ref()
            .and_then(structural_delegate)
            .map(|delegate| super::semantic_tokens(doc, expr, &delegate, scope))
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn tokens_for_dynamic(doc: Doc, expr: &Expression, scope: Scope) -> Vec<SemanticToken> {
    super::semantic_tokens(doc, expr, &hcl_lang_schema::Constraint::any(Type::Dynamic), scope)
}

/// Falls back to collecting variable traversals with a dynamic-type
/// origin constraint when no richer sub-shape matched — "preserving
/// completeness at the cost of specificity".
pub fn origins(
    doc: Doc,
    expr: &Expression,
    constraint: &AnyExpressionConstraint,
    allow_self_refs: bool,
    scope: Scope,
) -> Vec<Origin> {
    match &expr.kind {
        ExprKind::ScopeTraversal(_) => super::reference::origins(doc, expr, &as_reference_constraint(constraint), allow_self_refs),
        ExprKind::FunctionCall(fc) => fc
            .args
            .iter()
            .flat_map(|arg| origins(doc, arg, constraint, allow_self_refs, scope))
            .collect(),
        ExprKind::Conditional(c) => {
            let mut out = origins(doc, &c.condition, constraint, allow_self_refs, scope);
            out.extend(origins(doc, &c.true_expr, constraint, allow_self_refs, scope));
            out.extend(origins(doc, &c.false_expr, constraint, allow_self_refs, scope));
            out
        }
        ExprKind::Index(ix) => {
            let mut out = origins(doc, &ix.collection, constraint, allow_self_refs, scope);
            out.extend(origins(doc, &ix.key, constraint, allow_self_refs, scope));
            out
        }
        ExprKind::TupleCons(tc) => tc
            .items
            .iter()
            .flat_map(|item| origins(doc, item, constraint, allow_self_refs, scope))
            .collect(),
        ExprKind::ObjectCons(oc) => oc
            .items
            .iter()
            .flat_map(|item| origins(doc, &item.value, constraint, allow_self_refs, scope))
            .collect(),
        ExprKind::Template(t) => t
            .parts
            .iter()
            .filter_map(|p| match p {
                hcl_lang_syntax::TemplatePart::Interp(e) => Some(e),
                hcl_lang_syntax::TemplatePart::Literal(_) => None,
            })
            .flat_map(|e| origins(doc, e, constraint, allow_self_refs, scope))
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hcl_lang_pos::{LineIndex, Position};
    use hcl_lang_syntax::parse;

    #[test]
    fn scope_traversal_delegates_to_reference_completion() {
        let source = "x = foo";
        let (body, _) = parse(source);
        let attr = body.attribute("x").unwrap();
        let index = LineIndex::new(source);
        let doc = Doc::new("f.hcl", source, &index);
        let constraint = AnyExpressionConstraint {
            of_type: None,
            skip_literal_complex_types: false,
        };
        let ctx = RequestContext::at(Position::new(1, 8, 7));
        let out = completion(doc, &attr.expr, &constraint, Scope::empty(), &ctx);
        assert!(out.is_empty());
    }
}
