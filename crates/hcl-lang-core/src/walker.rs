//! Body walker: routes a position to the attribute/label/block
//! it falls in, merges dependent schemas, and applies body extensions
//! (`count`/`for_each`/`dynamic`/self-refs).

use hcl_lang_schema::{Address, AddressStep, AttributeSchema, BlockSchema, BodySchema};
use hcl_lang_syntax::{Block, Body, BodyItem};

use crate::builtins;
use crate::candidate::{Candidate, CandidateKind, TextEdit};
use crate::doc::Doc;
use crate::handlers;
use crate::hover::HoverData;
use crate::prefill;
use crate::request::RequestContext;
use crate::scope::Scope;
use crate::semantic_token::{SemanticToken, TokenType};
use crate::target::Target;

/// Resolves `BlockSchema.dependent_body` against a block's labels, then
/// layers it onto the block's static body. Static attributes/blocks win
/// over same-named dynamic ones.
pub fn merged_schema(block_schema: &BlockSchema, block: &Block) -> BodySchema {
    let key: Vec<String> = block.labels.iter().map(|l| l.value.clone()).collect();
    let Some(dependent) = block_schema.dependent_body.get(&key) else {
        return block_schema.body.clone();
    };
    let mut merged = dependent.clone();
    for (name, attr) in &block_schema.body.attributes {
        merged.attributes.insert(name.clone(), attr.clone());
    }
    for (name, blk) in &block_schema.body.blocks {
        merged.blocks.insert(name.clone(), blk.clone());
    }
    if merged.extensions.is_none() {
        merged.extensions = block_schema.body.extensions;
    }
    if merged.any_attribute.is_none() {
        merged.any_attribute = block_schema.body.any_attribute.clone();
    }
    merged
}

/// The synthetic `self.<attr>` targets exposed while completing inside
/// a block body whose `SelfRefs` extension is enabled. The
/// attribute currently being completed is excluded by the caller to
/// prevent the attribute from cyclically suggesting itself.
pub fn self_targets(schema: &BodySchema, exclude: Option<&str>) -> Vec<Target> {
    schema
        .attributes
        .iter()
        .filter(|(name, _)| exclude != Some(name.as_str()))
        .map(|(name, attr)| Target {
            address: Address::new(vec![
                AddressStep::Static { name: "self".into() },
                AddressStep::Attr { name: name.clone() },
            ]),
            friendly_name: attr.description.clone(),
            scope_id: None,
            ty: attr.constraint.value_type(),
            range: hcl_lang_pos::Range::empty("", hcl_lang_pos::Position::new(1, 1, 0)),
            body_range: hcl_lang_pos::Range::empty("", hcl_lang_pos::Position::new(1, 1, 0)),
            nested_targets: Vec::new(),
        })
        .collect()
}

fn effective_attribute_schema<'a>(
    schema: &'a BodySchema,
    name: &str,
) -> Option<std::borrow::Cow<'a, AttributeSchema>> {
    if let Some(attr) = schema.attributes.get(name) {
        return Some(std::borrow::Cow::Borrowed(attr));
    }
    let ext = schema.extensions();
    if ext.count && name == "count" {
        return Some(std::borrow::Cow::Owned(builtins::count_attribute()));
    }
    if ext.for_each && name == "for_each" {
        return Some(std::borrow::Cow::Owned(builtins::for_each_attribute()));
    }
    schema
        .any_attribute
        .as_deref()
        .map(|a| std::borrow::Cow::Owned(a.clone()))
}

fn body_scope_with_extra<'a>(base: Scope<'a>, mut extra: Vec<Target>, storage: &'a mut Vec<Target>) -> Scope<'a> {
    if extra.is_empty() {
        return base;
    }
    storage.append(&mut extra);
    storage.extend_from_slice(base.targets);
    Scope {
        targets: storage,
        functions: base.functions,
    }
}

/// Candidates for undeclared attributes/blocks at a fresh position in
/// body whitespace, plus `count`/`for_each`/`dynamic` when
/// the body's extensions permit them and they are not already declared.
pub fn body_whitespace_candidates(doc: Doc, body: &Body, schema: &BodySchema, ctx: &RequestContext) -> Vec<Candidate> {
    let declared_attrs: Vec<&str> = body.attributes().map(|a| a.name.as_str()).collect();
    let declared_blocks: Vec<&str> = body.blocks().map(|b| b.block_type.as_str()).collect();
    let at = doc.range(hcl_lang_pos::Span::empty(ctx.pos.byte));

    let mut out: Vec<Candidate> = schema
        .attributes
        .iter()
        .filter(|(name, _)| !declared_attrs.contains(&name.as_str()))
        .map(|(name, attr)| {
            let snippet = format!("{name} = ${{1}}");
            let edit = TextEdit::with_snippet(at.clone(), format!("{name} = "), snippet);
            let mut c = Candidate::new(name, CandidateKind::Attribute, edit).triggering_suggest();
            if attr.is_deprecated {
                c = c.deprecated();
            }
            if let Some(d) = &attr.description {
                c = c.with_description(d.clone());
            }
            c
        })
        .chain(schema.blocks.iter().filter(|(name, _)| !declared_blocks.contains(&name.as_str())).map(|(name, blk)| {
            let labels = " \"\"".repeat(blk.labels.len());
            let snippet = format!("{name}{labels} {{\n  ${{1}}\n}}");
            let edit = TextEdit::with_snippet(at.clone(), format!("{name} {{}}"), snippet);
            let mut c = Candidate::new(name, CandidateKind::Block, edit).triggering_suggest();
            if blk.is_deprecated {
                c = c.deprecated();
            }
            c
        }))
        .collect();

    let ext = schema.extensions();
    if ext.count && !declared_attrs.contains(&"count") {
        let edit = TextEdit::with_snippet(at.clone(), "count = ", "count = ${1}");
        out.push(Candidate::new("count", CandidateKind::Attribute, edit).triggering_suggest());
    }
    if ext.for_each && !declared_attrs.contains(&"for_each") {
        let edit = TextEdit::with_snippet(at.clone(), "for_each = ", "for_each = ${1}");
        out.push(Candidate::new("for_each", CandidateKind::Attribute, edit).triggering_suggest());
    }
    if ext.dynamic_blocks && !declared_blocks.contains(&"dynamic") {
        let edit = TextEdit::with_snippet(at, "dynamic \"\" {}", "dynamic \"${1}\" {\n  ${2}\n}");
        out.push(Candidate::new("dynamic", CandidateKind::Block, edit).triggering_suggest());
    }
    out
}

/// Body-level position routing, returning completion
/// candidates for `pos` within `body` under `schema`.
pub fn completion_at_body(doc: Doc, body: &Body, schema: &BodySchema, scope: Scope, ctx: &RequestContext) -> Vec<Candidate> {
    if ctx.is_cancelled() {
        return Vec::new();
    }
    for item in &body.items {
        match item {
            BodyItem::Attribute(attr) => {
                if attr.expr.range.contains_or_touches(ctx.pos.byte) {
                    let Some(attr_schema) = effective_attribute_schema(schema, &attr.name) else {
                        return Vec::new();
                    };
                    let ext = schema.extensions();
                    let mut extra = builtins::count_each_targets(&ext);
                    if ext.self_refs && ctx.active_self_refs {
                        extra.extend(self_targets(schema, Some(&attr.name)));
                    }
                    let mut storage = Vec::new();
                    let local_scope = body_scope_with_extra(scope, extra, &mut storage);
                    return handlers::completion_at(doc, &attr.expr, &attr_schema.constraint, local_scope, ctx);
                }
                if attr.name_range.contains_or_touches(ctx.pos.byte) {
                    return body_whitespace_candidates(doc, body, schema, ctx);
                }
            }
            BodyItem::Block(block) => {
                if block.range.contains_or_touches(ctx.pos.byte) {
                    return completion_in_block(doc, block, schema, scope, ctx);
                }
            }
        }
    }
    if body.range.contains_or_touches(ctx.pos.byte) {
        return body_whitespace_candidates(doc, body, schema, ctx);
    }
    Vec::new()
}

fn completion_in_block(doc: Doc, block: &Block, schema: &BodySchema, scope: Scope, ctx: &RequestContext) -> Vec<Candidate> {
    if block.block_type == "dynamic" && schema.extensions().dynamic_blocks {
        for label in &block.labels {
            if label.range.contains_or_touches(ctx.pos.byte) {
                return schema
                    .blocks
                    .keys()
                    .filter(|n| n.as_str() != "dynamic")
                    .map(|n| {
                        let edit = TextEdit::plain(doc.range(label.range), format!("\"{n}\""));
                        Candidate::new(n, CandidateKind::Label, edit)
                    })
                    .collect();
            }
        }
    }
    let Some(block_schema) = schema.blocks.get(&block.block_type) else {
        return Vec::new();
    };
    for (i, label) in block.labels.iter().enumerate() {
        if label.range.contains_or_touches(ctx.pos.byte) {
            let Some(label_schema) = block_schema.labels.get(i) else {
                return Vec::new();
            };
            if label_schema.completable && label_schema.is_dep_key {
                return block_schema
                    .dependent_body
                    .iter()
                    .filter_map(|(key, body)| key.get(i).map(|value| (value, body)))
                    .map(|(value, body)| {
                        if ctx.prefill_required_fields {
                            let snippet = format!("\"{}", prefill::dep_key_completion_snippet(value, &block_schema.labels, i, body));
                            let plain = prefill::strip_placeholders(&snippet);
                            let range = doc.range(hcl_lang_pos::Span::new(label.range.start, block.range.end));
                            let edit = TextEdit::with_snippet(range, plain, snippet);
                            Candidate::new(value, CandidateKind::Label, edit)
                        } else {
                            let edit = TextEdit::plain(doc.range(label.range), format!("\"{value}\""));
                            Candidate::new(value, CandidateKind::Label, edit)
                        }
                    })
                    .collect();
            }
            return Vec::new();
        }
    }
    if block.body_range.contains_or_touches(ctx.pos.byte) {
        let effective = if block.block_type == "dynamic" && schema.extensions().dynamic_blocks {
            dynamic_content_schema(block, schema)
        } else {
            merged_schema(block_schema, block)
        };
        return completion_at_body(doc, &block.body, &effective, scope, ctx);
    }
    Vec::new()
}

/// Synthesizes the virtual `dynamic "X" { ... }` body schema, looking up the real block `X` in the enclosing schema to
/// populate `content`.
fn dynamic_content_schema(block: &Block, enclosing: &BodySchema) -> BodySchema {
    let target_name = block.labels.first().map(|l| l.value.as_str()).unwrap_or("");
    let content_body = enclosing
        .blocks
        .get(target_name)
        .map(|b| b.body.clone())
        .unwrap_or_default();
    builtins::dynamic_block(content_body).body
}

pub fn hover_at_body(doc: Doc, body: &Body, schema: &BodySchema, scope: Scope, ctx: &RequestContext) -> Option<HoverData> {
    for item in &body.items {
        match item {
            BodyItem::Attribute(attr) if attr.expr.range.contains_or_touches(ctx.pos.byte) => {
                let attr_schema = effective_attribute_schema(schema, &attr.name)?;
                return handlers::hover_at(doc, &attr.expr, &attr_schema.constraint, scope, ctx);
            }
            BodyItem::Block(block) if block.body_range.contains_or_touches(ctx.pos.byte) => {
                let block_schema = schema.blocks.get(&block.block_type)?;
                let effective = merged_schema(block_schema, block);
                return hover_at_body(doc, &block.body, &effective, scope, ctx);
            }
            _ => {}
        }
    }
    None
}

pub fn semantic_tokens_body(doc: Doc, body: &Body, schema: &BodySchema, scope: Scope) -> Vec<SemanticToken> {
    let mut out = Vec::new();
    for item in &body.items {
        match item {
            BodyItem::Attribute(attr) => {
                out.push(SemanticToken::new(TokenType::AttrName, doc.range(attr.name_range)));
                if let Some(attr_schema) = effective_attribute_schema(schema, &attr.name) {
                    out.extend(handlers::semantic_tokens(doc, &attr.expr, &attr_schema.constraint, scope));
                }
            }
            BodyItem::Block(block) => {
                out.push(SemanticToken::new(TokenType::BlockType, doc.range(block.type_range)));
                for label in &block.labels {
                    out.push(SemanticToken::new(TokenType::BlockLabel, doc.range(label.range)));
                }
                if let Some(block_schema) = schema.blocks.get(&block.block_type) {
                    let effective = if block.block_type == "dynamic" && schema.extensions().dynamic_blocks {
                        dynamic_content_schema(block, schema)
                    } else {
                        merged_schema(block_schema, block)
                    };
                    out.extend(semantic_tokens_body(doc, &block.body, &effective, scope));
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hcl_lang_pos::{LineIndex, Position};
    use hcl_lang_schema::{AnyExpressionConstraint, Constraint, Extensions};
    use hcl_lang_syntax::parse;

    #[test]
    fn count_index_is_offered_inside_a_body_with_count_enabled() {
        let source = "resource \"x\" \"y\" {\n  n = count.i\n}\n";
        let (body, _) = parse(source);
        let block = body.blocks().next().unwrap();
        let index = LineIndex::new(source);
        let doc = Doc::new("f.hcl", source, &index);

        let inner = BodySchema::new()
            .with_attribute("n", AttributeSchema::optional(Constraint::AnyExpression(AnyExpressionConstraint {
                of_type: None,
                skip_literal_complex_types: false,
            })))
            .with_extensions(Extensions {
                count: true,
                ..Extensions::default()
            });

        // Cursor at the end of `count.i`.
        let byte = source.find("count.i").unwrap() as u32 + "count.i".len() as u32;
        let pos = index.position(byte);
        let ctx = RequestContext::at(pos);
        let out = completion_at_body(doc, &block.body, &inner, Scope::empty(), &ctx);
        assert!(out.iter().any(|c| c.label == "count.index"));
    }
}
