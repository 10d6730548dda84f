//! Single-pass body validation.

use hcl_lang_schema::BodySchema;
use hcl_lang_syntax::{Body, BodyItem};

use crate::diagnostic::Diagnostic;
use crate::doc::Doc;
use crate::walker::merged_schema;

pub fn validate_body(doc: Doc, body: &Body, schema: &BodySchema) -> Vec<Diagnostic> {
    let mut out = Vec::new();

    let mut block_counts: std::collections::HashMap<&str, usize> = std::collections::HashMap::new();
    for item in &body.items {
        if let BodyItem::Block(block) = item {
            *block_counts.entry(block.block_type.as_str()).or_default() += 1;
        }
    }

    for item in &body.items {
        match item {
            BodyItem::Attribute(attr) => {
                let ext = schema.extensions();
                let is_builtin = (ext.count && attr.name == "count") || (ext.for_each && attr.name == "for_each");
                match schema.attributes.get(&attr.name) {
                    Some(attr_schema) => {
                        if attr_schema.is_deprecated {
                            out.push(Diagnostic::warning(
                                "Deprecated attribute",
                                format!("Attribute \"{}\" is deprecated", attr.name),
                                doc.range(attr.name_range),
                            ));
                        }
                    }
                    None if is_builtin || schema.any_attribute.is_some() => {}
                    None => {
                        out.push(Diagnostic::error(
                            "Unexpected attribute",
                            format!("An attribute named \"{}\" is not expected here", attr.name),
                            doc.range(attr.name_range),
                        ));
                    }
                }
            }
            BodyItem::Block(block) => {
                if block.block_type == "dynamic" {
                    if !schema.extensions().dynamic_blocks {
                        out.push(Diagnostic::error(
                            "Unexpected block",
                            "\"dynamic\" blocks are not supported here".to_string(),
                            doc.range(block.type_range),
                        ));
                        continue;
                    }
                    let target = block.labels.first().map(|l| l.value.as_str()).unwrap_or("");
                    if !schema.blocks.contains_key(target) {
                        out.push(Diagnostic::error(
                            "Invalid dynamic block",
                            format!("Block type \"{target}\" does not exist"),
                            doc.range(block.type_range),
                        ));
                        continue;
                    }
                }

                let Some(block_schema) = schema.blocks.get(&block.block_type) else {
                    out.push(Diagnostic::error(
                        "Unexpected block",
                        format!("Blocks of type \"{}\" are not expected here", block.block_type),
                        doc.range(block.type_range),
                    ));
                    continue;
                };

                if block_schema.is_deprecated {
                    out.push(Diagnostic::warning(
                        "Deprecated block",
                        format!("Block type \"{}\" is deprecated", block.block_type),
                        doc.range(block.type_range),
                    ));
                }

                if block.labels.len() != block_schema.labels.len() {
                    let detail = if block.labels.len() < block_schema.labels.len() {
                        format!("{} label(s) are expected", block_schema.labels.len())
                    } else {
                        format!("only {} label(s) are expected", block_schema.labels.len())
                    };
                    out.push(Diagnostic::error(
                        format!("Wrong number of labels for \"{}\"", block.block_type),
                        detail,
                        doc.range(block.range),
                    ));
                }

                let effective = merged_schema(block_schema, block);
                out.extend(validate_body(doc, &block.body, &effective));
            }
        }
    }

    for (name, block_schema) in &schema.blocks {
        let count = *block_counts.get(name.as_str()).unwrap_or(&0);
        if let Some(min) = block_schema.min_items {
            if count < min {
                out.push(Diagnostic::error(
                    format!("Too few blocks specified for \"{name}\""),
                    format!("At least {min} block(s) are expected"),
                    doc.range(body.range),
                ));
            }
        }
        if let Some(max) = block_schema.max_items {
            if count > max {
                out.push(Diagnostic::error(
                    format!("Too many blocks specified for \"{name}\""),
                    format!("At most {max} block(s) are expected"),
                    doc.range(body.range),
                ));
            }
        }
    }

    for (name, attr_schema) in &schema.attributes {
        if attr_schema.is_required && body.attribute(name).is_none() {
            out.push(Diagnostic::error(
                "Missing required attribute",
                format!("\"{name}\" is required"),
                doc.range(body.range),
            ));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hcl_lang_pos::LineIndex;
    use hcl_lang_schema::{BlockSchema, Constraint, Type};
    use hcl_lang_syntax::parse;

    #[test]
    fn too_few_blocks_reports_exact_message() {
        let source = "foo {\n  one {}\n  two {}\n}\n";
        let (body, _) = parse(source);
        let index = LineIndex::new(source);
        let doc = Doc::new("f.hcl", source, &index);

        let one_schema = BlockSchema::new(BodySchema::new()).with_min_items(2);
        let two_schema = BlockSchema::new(BodySchema::new());
        let foo_body = BodySchema::new()
            .with_block("one", one_schema)
            .with_block("two", two_schema);
        let foo_block = block_schema_wrapping(foo_body);
        let root = BodySchema::new().with_block("foo", foo_block);

        let diags = validate_body(doc, &body, &root);
        let diag = diags
            .iter()
            .find(|d| d.summary == "Too few blocks specified for \"one\"")
            .expect("missing too-few-blocks diagnostic");
        assert_eq!(diag.detail, "At least 2 block(s) are expected");
    }

    fn block_schema_wrapping(body: BodySchema) -> BlockSchema {
        BlockSchema::new(body)
    }

    #[test]
    fn unexpected_attribute_reports_error() {
        let source = "a = 1\n";
        let (body, _) = parse(source);
        let index = LineIndex::new(source);
        let doc = Doc::new("f.hcl", source, &index);
        let schema = BodySchema::new().with_attribute("b", hcl_lang_schema::AttributeSchema::optional(Constraint::literal(Type::Number)));
        let diags = validate_body(doc, &body, &schema);
        assert!(diags.iter().any(|d| d.summary == "Unexpected attribute"));
    }
}
