//! `List`/`Set`/`Tuple`/`Object`/`Map` handlers, plus the `LiteralType`
//! handling that describes the same structural shapes in terms of a
//! plain `Type` rather than a schema-authored `Constraint`.

use std::collections::BTreeMap;

use hcl_lang_schema::{AttributeSchema, Constraint, ObjectConstraint, TupleConstraint, Type};
use hcl_lang_syntax::{ExprKind, Expression};

use crate::candidate::{Candidate, CandidateKind, TextEdit};
use crate::doc::Doc;
use crate::hover::{HoverData, Markup};
use crate::request::RequestContext;
use crate::scope::Scope;
use crate::semantic_token::SemanticToken;
use crate::target::{Origin, Target, TargetContext};

/// Builds the `Constraint` a `LiteralType(Type::List/Set/Tuple/Map/Object)`
/// row describes, so its structural handling can share code with the
/// schema-authored `List`/`Set`/`Tuple`/`Map`/`Object` constraints.
pub(super) fn constraint_for_type(ty: &Type) -> Constraint {
    match ty {
        Type::List(elem) => Constraint::List(Box::new(hcl_lang_schema::CollectionConstraint {
            elem: Constraint::literal((**elem).clone()),
            min: None,
            max: None,
        })),
        Type::Set(elem) => Constraint::Set(Box::new(hcl_lang_schema::CollectionConstraint {
            elem: Constraint::literal((**elem).clone()),
            min: None,
            max: None,
        })),
        Type::Map(elem) => Constraint::Map(Box::new(hcl_lang_schema::MapConstraint {
            elem: Constraint::literal((**elem).clone()),
        })),
        Type::Tuple(elems) => Constraint::Tuple(TupleConstraint {
            elems: elems.iter().cloned().map(Constraint::literal).collect(),
        }),
        Type::Object(attrs) => Constraint::Object(ObjectConstraint {
            attributes: attrs
                .iter()
                .map(|(name, ty)| (name.clone(), AttributeSchema::optional(Constraint::literal(ty.clone()))))
                .collect(),
        }),
        primitive => Constraint::literal(primitive.clone()),
    }
}

pub fn literal_skeleton_completion(doc: Doc, expr: &Expression, ty: &Type, ctx: &RequestContext) -> Vec<Candidate> {
    super::completion_at(doc, expr, &constraint_for_type(ty), Scope::empty(), ctx)
}

pub fn literal_skeleton_hover(doc: Doc, expr: &Expression, ty: &Type, ctx: &RequestContext) -> Option<HoverData> {
    super::hover_at(doc, expr, &constraint_for_type(ty), Scope::empty(), ctx)
}

pub fn literal_skeleton_tokens(doc: Doc, expr: &Expression, ty: &Type, scope: Scope) -> Vec<SemanticToken> {
    super::semantic_tokens(doc, expr, &constraint_for_type(ty), scope)
}

/// An empty placeholder expression at `byte`, used to probe an element
/// constraint's completion/hover when the cursor sits at a spot with no
/// parsed element (a fresh line inside brackets, a trailing comma, ...).
fn placeholder_at(byte: u32) -> Expression {
    Expression::missing(hcl_lang_pos::Span::empty(byte))
}

/// `[ elem, elem, ... ]`: delegate into whichever element's range
/// touches `pos`; otherwise, if `pos` lies anywhere inside the
/// brackets, probe the element constraint with an empty placeholder so a
/// fresh element can be suggested.
pub fn collection_completion(
    doc: Doc,
    expr: &Expression,
    elem: &Constraint,
    scope: Scope,
    ctx: &RequestContext,
    kind: CandidateKind,
) -> Vec<Candidate> {
    if !expr.range.contains_or_touches(ctx.pos.byte) {
        return Vec::new();
    }
    match &expr.kind {
        ExprKind::TupleCons(tc) => {
            for item in &tc.items {
                if item.range.contains_or_touches(ctx.pos.byte) {
                    return super::completion_at(doc, item, elem, scope, ctx);
                }
            }
            super::completion_at(doc, &placeholder_at(ctx.pos.byte), elem, scope, ctx)
        }
        _ if expr.is_missing() => {
            let edit = TextEdit::with_snippet(doc.range(expr.range), "[]", "[${1}]");
            vec![Candidate::new("[ ]", kind, edit).triggering_suggest()]
        }
        _ => Vec::new(),
    }
}

pub fn collection_hover(
    doc: Doc,
    expr: &Expression,
    elem: &Constraint,
    label: &str,
    scope: Scope,
    ctx: &RequestContext,
) -> Option<HoverData> {
    if !expr.range.contains_or_touches(ctx.pos.byte) {
        return None;
    }
    if let ExprKind::TupleCons(tc) = &expr.kind {
        for item in &tc.items {
            if item.range.contains_or_touches(ctx.pos.byte) {
                return super::hover_at(doc, item, elem, scope, ctx);
            }
        }
    }
    let elem_name = elem.value_type().map(|t| t.friendly_name());
    let text = match elem_name {
        Some(t) => format!("`{label} of {t}`"),
        None => format!("`{label}`"),
    };
    Some(HoverData::new(Markup::markdown(text), doc.range(expr.range)))
}

pub fn collection_tokens(doc: Doc, expr: &Expression, elem: &Constraint, scope: Scope) -> Vec<SemanticToken> {
    match &expr.kind {
        ExprKind::TupleCons(tc) => tc
            .items
            .iter()
            .flat_map(|item| super::semantic_tokens(doc, item, elem, scope))
            .collect(),
        _ => Vec::new(),
    }
}

pub fn collection_origins(
    doc: Doc,
    expr: &Expression,
    elem: &Constraint,
    allow_self_refs: bool,
    scope: Scope,
) -> Vec<Origin> {
    match &expr.kind {
        ExprKind::TupleCons(tc) => tc
            .items
            .iter()
            .flat_map(|item| super::reference_origins(doc, item, elem, allow_self_refs, scope))
            .collect(),
        _ => Vec::new(),
    }
}

pub fn collection_targets(
    doc: Doc,
    expr: &Expression,
    elem: &Constraint,
    target_ctx: &TargetContext,
    scope: Scope,
) -> Vec<Target> {
    match &expr.kind {
        ExprKind::TupleCons(tc) => tc
            .items
            .iter()
            .enumerate()
            .flat_map(|(i, item)| {
                let child_ctx = target_ctx.descend(hcl_lang_schema::AddressStep::Index { key: i.to_string() });
                super::reference_targets(doc, item, elem, &child_ctx, scope)
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// `[a, b, c]` with a fixed-arity `elems` list: element `i` is
/// constrained by `elems[i]`; excess source elements get no candidates
/// or hover.
pub fn tuple_completion(
    doc: Doc,
    expr: &Expression,
    constraint: &TupleConstraint,
    scope: Scope,
    ctx: &RequestContext,
) -> Vec<Candidate> {
    if !expr.range.contains_or_touches(ctx.pos.byte) {
        return Vec::new();
    }
    match &expr.kind {
        ExprKind::TupleCons(tc) => tc
            .items
            .iter()
            .enumerate()
            .filter(|(i, item)| *i < constraint.elems.len() && item.range.contains_or_touches(ctx.pos.byte))
            .flat_map(|(i, item)| super::completion_at(doc, item, &constraint.elems[i], scope, ctx))
            .collect(),
        _ if expr.is_missing() => {
            let edit = TextEdit::with_snippet(doc.range(expr.range), "[]", "[${1}]");
            vec![Candidate::new("[ ]", CandidateKind::Tuple, edit).triggering_suggest()]
        }
        _ => Vec::new(),
    }
}

pub fn tuple_hover(
    doc: Doc,
    expr: &Expression,
    constraint: &TupleConstraint,
    scope: Scope,
    ctx: &RequestContext,
) -> Option<HoverData> {
    if !expr.range.contains_or_touches(ctx.pos.byte) {
        return None;
    }
    if let ExprKind::TupleCons(tc) = &expr.kind {
        for (i, item) in tc.items.iter().enumerate() {
            if i < constraint.elems.len() && item.range.contains_or_touches(ctx.pos.byte) {
                return super::hover_at(doc, item, &constraint.elems[i], scope, ctx);
            }
        }
        if tc.items.len() > constraint.elems.len() {
            return None;
        }
    }
    Some(HoverData::new(Markup::markdown("`tuple`"), doc.range(expr.range)))
}

pub fn tuple_tokens(doc: Doc, expr: &Expression, constraint: &TupleConstraint, scope: Scope) -> Vec<SemanticToken> {
    match &expr.kind {
        ExprKind::TupleCons(tc) => tc
            .items
            .iter()
            .enumerate()
            .filter(|(i, _)| *i < constraint.elems.len())
            .flat_map(|(i, item)| super::semantic_tokens(doc, item, &constraint.elems[i], scope))
            .collect(),
        _ => Vec::new(),
    }
}

pub fn tuple_origins(
    doc: Doc,
    expr: &Expression,
    constraint: &TupleConstraint,
    allow_self_refs: bool,
    scope: Scope,
) -> Vec<Origin> {
    match &expr.kind {
        ExprKind::TupleCons(tc) => tc
            .items
            .iter()
            .enumerate()
            .filter(|(i, _)| *i < constraint.elems.len())
            .flat_map(|(i, item)| super::reference_origins(doc, item, &constraint.elems[i], allow_self_refs, scope))
            .collect(),
        _ => Vec::new(),
    }
}

pub fn tuple_targets(
    doc: Doc,
    expr: &Expression,
    constraint: &TupleConstraint,
    target_ctx: &TargetContext,
    scope: Scope,
) -> Vec<Target> {
    match &expr.kind {
        ExprKind::TupleCons(tc) => tc
            .items
            .iter()
            .enumerate()
            .filter(|(i, _)| *i < constraint.elems.len())
            .flat_map(|(i, item)| {
                let child_ctx = target_ctx.descend(hcl_lang_schema::AddressStep::Index { key: i.to_string() });
                super::reference_targets(doc, item, &constraint.elems[i], &child_ctx, scope)
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// An object-constructor item's key as a plain string: a bare
/// identifier, or a string literal with no interpolation. Identifies
/// which schema attribute (if any) the item's value is constrained by.
fn object_item_key(item: &hcl_lang_syntax::ObjectConsItem) -> Option<String> {
    match &item.key.kind {
        ExprKind::ScopeTraversal(t) if t.is_bare_identifier() => Some(t.root.clone()),
        ExprKind::Template(t) => t.literal_text(),
        _ => None,
    }
}

/// Alphabetical order of attribute names, free since `attributes` is
/// a `BTreeMap`.
fn undeclared_attribute_candidates(
    doc: Doc,
    expr_range: hcl_lang_pos::Span,
    declared: &[String],
    attributes: &BTreeMap<String, AttributeSchema>,
) -> Vec<Candidate> {
    attributes
        .iter()
        .filter(|(name, _)| !declared.iter().any(|d| d == *name))
        .map(|(name, attr)| {
            let snippet = format!("{name} = ${{1}}");
            let edit = TextEdit::with_snippet(doc.range(expr_range), format!("{name} = "), snippet);
            let mut candidate = Candidate::new(name, CandidateKind::Attribute, edit).triggering_suggest();
            if attr.is_optional && !attr.is_required {
                candidate = candidate.with_detail("optional");
            }
            if attr.is_deprecated {
                candidate = candidate.deprecated();
            }
            if let Some(desc) = &attr.description {
                candidate = candidate.with_description(desc.clone());
            }
            candidate
        })
        .collect()
}

pub fn object_completion(
    doc: Doc,
    expr: &Expression,
    constraint: &ObjectConstraint,
    scope: Scope,
    ctx: &RequestContext,
) -> Vec<Candidate> {
    if !expr.range.contains_or_touches(ctx.pos.byte) {
        return Vec::new();
    }
    match &expr.kind {
        ExprKind::ObjectCons(oc) => {
            for item in &oc.items {
                if item.value.range.contains_or_touches(ctx.pos.byte) {
                    if let Some(key) = object_item_key(item) {
                        if let Some(attr) = constraint.attributes.get(&key) {
                            return super::completion_at(doc, &item.value, &attr.constraint, scope, ctx);
                        }
                    }
                    return Vec::new();
                }
            }
            let declared: Vec<String> = oc
                .items
                .iter()
                .filter_map(|item| object_item_key(item))
                .collect();
            undeclared_attribute_candidates(doc, expr.range, &declared, &constraint.attributes)
        }
        _ if expr.is_missing() => {
            let names: Vec<_> = constraint.attributes.keys().cloned().collect();
            let body = names
                .iter()
                .enumerate()
                .map(|(i, name)| format!("  {name} = ${{{}}}", i + 1))
                .collect::<Vec<_>>()
                .join("\n");
            let snippet = format!("{{\n{body}\n${{0}}\n}}");
            let edit = TextEdit::with_snippet(doc.range(expr.range), "{}", snippet);
            vec![Candidate::new("{ ... }", CandidateKind::Object, edit).triggering_suggest()]
        }
        _ => Vec::new(),
    }
}

pub fn object_hover(
    doc: Doc,
    expr: &Expression,
    constraint: &ObjectConstraint,
    scope: Scope,
    ctx: &RequestContext,
) -> Option<HoverData> {
    if !expr.range.contains_or_touches(ctx.pos.byte) {
        return None;
    }
    if let ExprKind::ObjectCons(oc) = &expr.kind {
        for item in &oc.items {
            if item.key.range.contains_or_touches(ctx.pos.byte) {
                let key = object_item_key(item)?;
                let attr = constraint.attributes.get(&key)?;
                let requiredness = if attr.is_required { "required" } else { "optional" };
                let ty = attr.constraint.value_type().map(|t| t.friendly_name()).unwrap_or_else(|| "any".to_string());
                let content = format!("**{key}** _{requiredness}, {ty}_");
                return Some(HoverData::new(Markup::markdown(content), doc.range(item.key.range)));
            }
            if item.value.range.contains_or_touches(ctx.pos.byte) {
                if let Some(key) = object_item_key(item) {
                    if let Some(attr) = constraint.attributes.get(&key) {
                        return super::hover_at(doc, &item.value, &attr.constraint, scope, ctx);
                    }
                }
                return None;
            }
        }
    }
    Some(HoverData::new(Markup::markdown("`object`"), doc.range(expr.range)))
}

pub fn object_tokens(doc: Doc, expr: &Expression, constraint: &ObjectConstraint, scope: Scope) -> Vec<SemanticToken> {
    let ExprKind::ObjectCons(oc) = &expr.kind else {
        return Vec::new();
    };
    oc.items
        .iter()
        .flat_map(|item| {
            let mut tokens = vec![SemanticToken::new(crate::semantic_token::TokenType::MapKey, doc.range(item.key.range))];
            if let Some(key) = object_item_key(item) {
                if let Some(attr) = constraint.attributes.get(&key) {
                    tokens.extend(super::semantic_tokens(doc, &item.value, &attr.constraint, scope));
                }
            }
            tokens
        })
        .collect()
}

pub fn object_origins(
    doc: Doc,
    expr: &Expression,
    constraint: &ObjectConstraint,
    allow_self_refs: bool,
    scope: Scope,
) -> Vec<Origin> {
    let ExprKind::ObjectCons(oc) = &expr.kind else {
        return Vec::new();
    };
    oc.items
        .iter()
        .filter_map(|item| {
            let key = object_item_key(item)?;
            let attr = constraint.attributes.get(&key)?;
            Some(super::reference_origins(doc, &item.value, &attr.constraint, allow_self_refs, scope))
        })
        .flatten()
        .collect()
}

pub fn object_targets(
    doc: Doc,
    expr: &Expression,
    constraint: &ObjectConstraint,
    target_ctx: &TargetContext,
    scope: Scope,
) -> Vec<Target> {
    let ExprKind::ObjectCons(oc) = &expr.kind else {
        return Vec::new();
    };
    oc.items
        .iter()
        .filter_map(|item| {
            let key = object_item_key(item)?;
            let attr = constraint.attributes.get(&key)?;
            let child_ctx = target_ctx.descend(hcl_lang_schema::AddressStep::Attr { name: key });
            Some(super::reference_targets(doc, &item.value, &attr.constraint, &child_ctx, scope))
        })
        .flatten()
        .collect()
}

/// `{ "key" = value, ... }` with a homogeneous value constraint. Keys
/// are freely typed strings, so completion only offers a fresh-item
/// template on an empty line; it never enumerates known keys.
pub fn map_completion(
    doc: Doc,
    expr: &Expression,
    constraint: &hcl_lang_schema::MapConstraint,
    scope: Scope,
    ctx: &RequestContext,
) -> Vec<Candidate> {
    if !expr.range.contains_or_touches(ctx.pos.byte) {
        return Vec::new();
    }
    match &expr.kind {
        ExprKind::ObjectCons(oc) => {
            for item in &oc.items {
                if item.value.range.contains_or_touches(ctx.pos.byte) {
                    return super::completion_at(doc, &item.value, &constraint.elem, scope, ctx);
                }
            }
            Vec::new()
        }
        _ if expr.is_missing() => {
            let edit = TextEdit::with_snippet(doc.range(expr.range), "{}", "{\n  \"${1:key}\" = ${2}\n${0}\n}");
            vec![Candidate::new("{ \"key\" = value }", CandidateKind::Map, edit).triggering_suggest()]
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hcl_lang_pos::{LineIndex, Position};
    use hcl_lang_syntax::parse;

    #[test]
    fn empty_list_offers_skeleton_snippet() {
        let (body, _) = parse("x = ");
        let attr = body.attribute("x").unwrap();
        let source = "x = ";
        let index = LineIndex::new(source);
        let doc = Doc::new("f.hcl", source, &index);
        let ctx = RequestContext::at(Position::new(1, 5, 4));
        let elem = Constraint::literal(Type::String);
        let out = collection_completion(doc, &attr.expr, &elem, Scope::empty(), &ctx, CandidateKind::List);
        assert_eq!(out.len(), 1);
        assert!(out[0].text_edit.snippet.as_deref().unwrap().contains("${1}"));
    }

    #[test]
    fn object_hover_on_key_shows_requiredness_and_type() {
        let source = "attr = { foo = \"bar\" }";
        let (body, _) = parse(source);
        let attr = body.attribute("attr").unwrap();
        let index = LineIndex::new(source);
        let doc = Doc::new("f.hcl", source, &index);
        let mut attrs = BTreeMap::new();
        attrs.insert("foo".to_string(), AttributeSchema::optional(Constraint::literal(Type::String)));
        let constraint = ObjectConstraint { attributes: attrs };
        // Cursor on the `foo` key.
        let ctx = RequestContext::at(Position::new(1, 11, 10));
        let out = object_hover(doc, &attr.expr, &constraint, Scope::empty(), &ctx).unwrap();
        match out.content {
            Markup::Markdown(text) => assert_eq!(text, "**foo** _optional, string_"),
        }
    }

    #[test]
    fn object_completion_offers_attrs_alphabetically() {
        let source = "x = {}";
        let (body, _) = parse(source);
        let attr = body.attribute("x").unwrap();
        let index = LineIndex::new(source);
        let doc = Doc::new("f.hcl", source, &index);
        let mut attrs = BTreeMap::new();
        attrs.insert("b".to_string(), AttributeSchema::optional(Constraint::literal(Type::String)));
        attrs.insert("a".to_string(), AttributeSchema::optional(Constraint::literal(Type::String)));
        let constraint = ObjectConstraint { attributes: attrs };
        // Cursor between the braces of `{}`.
        let ctx = RequestContext::at(Position::new(1, 6, 5));
        let out = object_completion(doc, &attr.expr, &constraint, Scope::empty(), &ctx);
        assert_eq!(out[0].label, "a");
        assert_eq!(out[1].label, "b");
    }
}
