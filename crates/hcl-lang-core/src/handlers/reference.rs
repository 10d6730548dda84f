//! `Reference` handler: completion and hover driven
//! by the known reference-target collection, rather than by any local
//! syntactic shape.

use hcl_lang_schema::{ReferenceConstraint, Type};
use hcl_lang_syntax::{ExprKind, Expression, TraversalExpr};

use crate::candidate::{Candidate, CandidateKind, TextEdit};
use crate::doc::Doc;
use crate::hover::{HoverData, Markup};
use crate::request::RequestContext;
use crate::scope::Scope;
use crate::target::{Origin, Target};

/// The dotted text a traversal would need to match a target's address,
/// e.g. `aws_instance.x.cpu_count`.
fn traversal_text(t: &TraversalExpr) -> String {
    use hcl_lang_syntax::TraversalStep;
    let mut parts = vec![t.root.clone()];
    for step in &t.steps {
        if let TraversalStep::Attr { name, .. } = step {
            parts.push(name.clone());
        }
    }
    parts.join(".")
}

fn target_matches(target: &Target, constraint: &ReferenceConstraint) -> bool {
    if let Some(scope_id) = &constraint.of_scope_id {
        if target.scope_id.as_deref() != Some(scope_id.as_str()) {
            return false;
        }
    }
    if let Some(of_type) = &constraint.of_type {
        match &target.ty {
            Some(ty) => ty.is_convertible_to(of_type),
            None => false,
        }
    } else {
        true
    }
}

pub fn completion(
    doc: Doc,
    expr: &Expression,
    constraint: &ReferenceConstraint,
    scope: Scope,
    ctx: &RequestContext,
) -> Vec<Candidate> {
    if !expr.range.contains_or_touches(ctx.pos.byte) {
        return Vec::new();
    }
    let prefix = match &expr.kind {
        ExprKind::ScopeTraversal(t) => traversal_text(t),
        ExprKind::Missing => String::new(),
        _ => return Vec::new(),
    };
    scope
        .targets
        .iter()
        .filter(|t| target_matches(t, constraint))
        .filter_map(|t| {
            let label = t.address.to_friendly_string();
            if !label.starts_with(&prefix) {
                return None;
            }
            let edit = TextEdit::plain(doc.range(expr.range), label.clone());
            let mut candidate = Candidate::new(label, CandidateKind::Reference, edit);
            if let Some(ty) = &t.ty {
                candidate = candidate.with_detail(ty.friendly_name());
            }
            if let Some(name) = &t.friendly_name {
                candidate = candidate.with_description(name.clone());
            }
            Some(candidate)
        })
        .collect()
}

pub fn hover(
    doc: Doc,
    expr: &Expression,
    constraint: &ReferenceConstraint,
    scope: Scope,
    ctx: &RequestContext,
) -> Option<HoverData> {
    if !expr.range.contains_or_touches(ctx.pos.byte) {
        return None;
    }
    let ExprKind::ScopeTraversal(t) = &expr.kind else {
        return None;
    };
    let text = traversal_text(t);
    let target = scope
        .targets
        .iter()
        .filter(|t| target_matches(t, constraint))
        .find(|t| t.address.to_friendly_string() == text)?;
    let mut content = format!("`{text}`");
    if let Some(ty) = &target.ty {
        content.push_str(&format!(" ({})", ty.friendly_name()));
    }
    if let Some(name) = &target.friendly_name {
        content.push_str("\n\n");
        content.push_str(name);
    }
    Some(HoverData::new(Markup::markdown(content), doc.range(expr.range)))
}

/// Every `ScopeTraversalExpr` is an origin tagged with the types this
/// reference slot accepts. `allow_self_refs` is currently unused
/// by a plain `Reference` constraint — self-ref suppression is the
/// walker's job when it builds the candidate list, not the origin's.
pub fn origins(doc: Doc, expr: &Expression, constraint: &ReferenceConstraint, _allow_self_refs: bool) -> Vec<Origin> {
    let ExprKind::ScopeTraversal(_) = &expr.kind else {
        return Vec::new();
    };
    let constraints = match &constraint.of_type {
        Some(ty) => vec![ty.clone()],
        None => vec![Type::Dynamic],
    };
    vec![Origin {
        range: doc.range(expr.range),
        constraints,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use hcl_lang_pos::{LineIndex, Position, Range};
    use hcl_lang_schema::{Address, AddressStep, Type};
    use hcl_lang_syntax::parse;

    fn sample_target() -> Target {
        Target {
            address: Address::new(vec![AddressStep::Attr {
                name: "cpu_count".into(),
            }]),
            friendly_name: None,
            scope_id: None,
            ty: Some(Type::Number),
            range: Range::empty("f.hcl", Position::new(1, 1, 0)),
            body_range: Range::empty("f.hcl", Position::new(1, 1, 0)),
            nested_targets: Vec::new(),
        }
    }

    #[test]
    fn completion_offers_type_compatible_targets() {
        let source = "x = cpu";
        let (body, _) = parse(source);
        let attr = body.attribute("x").unwrap();
        let index = LineIndex::new(source);
        let doc = Doc::new("f.hcl", source, &index);
        let targets = vec![sample_target()];
        let scope = Scope {
            targets: &targets,
            functions: &[],
        };
        let constraint = ReferenceConstraint {
            of_type: Some(Type::Number),
            of_scope_id: None,
            address: None,
        };
        let ctx = RequestContext::at(Position::new(1, 8, 7));
        let out = completion(doc, &attr.expr, &constraint, scope, &ctx);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].label, "cpu_count");
    }

    #[test]
    fn origins_constraint_list_is_never_empty_when_of_type_is_unset() {
        let source = "x = cpu_count";
        let (body, _) = parse(source);
        let attr = body.attribute("x").unwrap();
        let index = LineIndex::new(source);
        let doc = Doc::new("f.hcl", source, &index);
        let constraint = ReferenceConstraint {
            of_type: None,
            of_scope_id: None,
            address: None,
        };
        let out = origins(doc, &attr.expr, &constraint, false);
        assert_eq!(out.len(), 1);
        assert!(!out[0].constraints.is_empty());
        assert_eq!(out[0].constraints, vec![Type::Dynamic]);
    }
}
