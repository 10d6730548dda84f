//! `LiteralType` (primitive), `LiteralValue`, `Keyword` and
//! `TypeDeclaration` handlers.

use hcl_lang_schema::{KeywordConstraint, LiteralValueConstraint, Type};
use hcl_lang_syntax::{ExprKind, Expression, LiteralExpr, LiteralKind};

use crate::candidate::{Candidate, CandidateKind, TextEdit};
use crate::doc::Doc;
use crate::hover::{HoverData, Markup};
use crate::request::RequestContext;
use crate::semantic_token::{SemanticToken, TokenType};

fn literal_kind_matches(kind: &LiteralKind, ty: &Type) -> bool {
    matches!(
        (kind, ty),
        (LiteralKind::Bool, Type::Bool) | (LiteralKind::Number, Type::Number)
    )
}

/// `bool`/numbers/strings: primitive `LiteralType` completion.
pub fn primitive_completion(doc: Doc, expr: &Expression, ty: &Type, ctx: &RequestContext) -> Vec<Candidate> {
    if !expr.range.contains_or_touches(ctx.pos.byte) {
        return Vec::new();
    }
    if *ty != Type::Bool {
        return Vec::new();
    }
    let typed = if expr.is_missing() { "" } else { doc.text(expr.range) };
    ["false", "true"]
        .into_iter()
        .filter(|word| word.starts_with(typed))
        .map(|word| {
            let edit = TextEdit::plain(doc.range(expr.range), word);
            Candidate::new(word, CandidateKind::Bool, edit).with_detail("bool")
        })
        .collect()
}

pub fn primitive_hover(doc: Doc, expr: &Expression, ty: &Type, ctx: &RequestContext) -> Option<HoverData> {
    if !expr.range.contains_or_touches(ctx.pos.byte) {
        return None;
    }
    match &expr.kind {
        ExprKind::Literal(lit) if literal_kind_matches(&lit.kind, ty) => Some(HoverData::new(
            Markup::markdown(format!("`{}`", ty.friendly_name())),
            doc.range(expr.range),
        )),
        ExprKind::Template(t) if *ty == Type::String && t.is_pure_literal() => Some(HoverData::new(
            Markup::markdown(format!("`{}`", ty.friendly_name())),
            doc.range(expr.range),
        )),
        _ => None,
    }
}

pub fn primitive_tokens(doc: Doc, expr: &Expression, ty: &Type) -> Vec<SemanticToken> {
    let token_type = match &expr.kind {
        ExprKind::Literal(LiteralExpr { kind: LiteralKind::Bool, .. }) => TokenType::Bool,
        ExprKind::Literal(LiteralExpr { kind: LiteralKind::Number, .. }) => TokenType::Number,
        ExprKind::Template(t) if t.is_pure_literal() && *ty == Type::String => TokenType::String,
        _ => return Vec::new(),
    };
    vec![SemanticToken::new(token_type, doc.range(expr.range))]
}

/// `LiteralValue`: an exact literal match.
pub fn value_completion(
    doc: Doc,
    expr: &Expression,
    value: &LiteralValueConstraint,
    ctx: &RequestContext,
) -> Vec<Candidate> {
    if !expr.range.contains_or_touches(ctx.pos.byte) || !expr.is_missing() {
        return Vec::new();
    }
    let edit = TextEdit::plain(doc.range(expr.range), value.value.raw.clone());
    let mut candidate = Candidate::new(value.value.raw.clone(), candidate_kind_for(&value.value.ty), edit);
    if let Some(desc) = &value.description {
        candidate = candidate.with_description(desc.clone());
    }
    if value.is_deprecated {
        candidate = candidate.deprecated();
    }
    vec![candidate]
}

fn candidate_kind_for(ty: &Type) -> CandidateKind {
    match ty {
        Type::Bool => CandidateKind::Bool,
        Type::Number => CandidateKind::Number,
        Type::String => CandidateKind::String,
        _ => CandidateKind::String,
    }
}

pub fn value_hover(
    doc: Doc,
    expr: &Expression,
    value: &LiteralValueConstraint,
    ctx: &RequestContext,
) -> Option<HoverData> {
    if !expr.range.contains_or_touches(ctx.pos.byte) {
        return None;
    }
    let text = doc.text(expr.range);
    if text != value.value.raw {
        return None;
    }
    let mut content = format!("`{}`", value.value.raw);
    if let Some(desc) = &value.description {
        content.push_str("\n\n");
        content.push_str(desc);
    }
    Some(HoverData::new(Markup::markdown(content), doc.range(expr.range)))
}

/// `Keyword`: a bare identifier equal to a fixed word.
pub fn keyword_completion(
    doc: Doc,
    expr: &Expression,
    keyword: &KeywordConstraint,
    ctx: &RequestContext,
) -> Vec<Candidate> {
    if !expr.range.contains_or_touches(ctx.pos.byte) {
        return Vec::new();
    }
    let prefix = match &expr.kind {
        ExprKind::ScopeTraversal(t) if t.is_bare_identifier() => t.root.as_str(),
        ExprKind::Missing => "",
        _ => return Vec::new(),
    };
    if !keyword.word.starts_with(prefix) {
        return Vec::new();
    }
    let edit = TextEdit::plain(doc.range(expr.range), keyword.word.clone());
    let mut candidate = Candidate::new(keyword.word.clone(), CandidateKind::Keyword, edit);
    if let Some(desc) = &keyword.description {
        candidate = candidate.with_description(desc.clone());
    }
    vec![candidate]
}

pub fn keyword_hover(
    doc: Doc,
    expr: &Expression,
    keyword: &KeywordConstraint,
    ctx: &RequestContext,
) -> Option<HoverData> {
    if !expr.range.contains_or_touches(ctx.pos.byte) {
        return None;
    }
    let ExprKind::ScopeTraversal(t) = &expr.kind else {
        return None;
    };
    if !t.is_bare_identifier() || t.root != keyword.word {
        return None;
    }
    let mut content = format!("`{}`", keyword.word);
    if let Some(desc) = &keyword.description {
        content.push_str("\n\n");
        content.push_str(desc);
    }
    Some(HoverData::new(Markup::markdown(content), doc.range(expr.range)))
}

/// `TypeDeclaration`: a type expression such as `string`, `list(string)`,
/// `object({ name = string })`.
pub fn type_declaration_completion(doc: Doc, expr: &Expression, ctx: &RequestContext) -> Vec<Candidate> {
    if !expr.range.contains_or_touches(ctx.pos.byte) {
        return Vec::new();
    }
    const PRIMITIVES: &[&str] = &["string", "number", "bool", "any"];
    const CAPSULES: &[&str] = &["list(", "set(", "map(", "object(", "tuple("];

    let prefix = if expr.is_missing() { "" } else { doc.text(expr.range) };
    PRIMITIVES
        .iter()
        .chain(CAPSULES.iter())
        .filter(|w| w.starts_with(prefix))
        .map(|word| {
            let edit = TextEdit::plain(doc.range(expr.range), *word);
            Candidate::new(*word, CandidateKind::Keyword, edit)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hcl_lang_pos::{LineIndex, Position};
    use hcl_lang_syntax::parse;

    fn doc_for(source: &'static str) -> (LineIndex, &'static str) {
        (LineIndex::new(source), source)
    }

    #[test]
    fn bool_completion_offers_both_words_when_empty() {
        let (body, _) = parse("x = ");
        let attr = body.attribute("x").unwrap();
        let (index, source) = doc_for("x = ");
        let doc = Doc::new("f.hcl", source, &index);
        let ctx = RequestContext::at(Position::new(1, 5, 4));
        let out = primitive_completion(doc, &attr.expr, &Type::Bool, &ctx);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn keyword_completion_filters_by_typed_prefix() {
        let (body, _) = parse("x = tr");
        let attr = body.attribute("x").unwrap();
        let (index, source) = doc_for("x = tr");
        let doc = Doc::new("f.hcl", source, &index);
        let kw = KeywordConstraint {
            word: "true".to_string(),
            description: None,
        };
        let ctx = RequestContext::at(Position::new(1, 7, 6));
        let out = keyword_completion(doc, &attr.expr, &kw, &ctx);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].label, "true");
    }
}
