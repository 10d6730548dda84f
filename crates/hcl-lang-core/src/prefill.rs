//! Prefill engine: synthesizes the snippet inserted for a block
//! label candidate once `PrefillRequiredFields` is enabled, expanding
//! required attributes and blocks recursively with strictly sequential
//! `${N}` tab stops ending in `${0}`.

use hcl_lang_schema::{BlockSchema, BodySchema, Constraint, LabelSchema};

/// A running tab-stop counter threaded through the whole snippet so
/// numbering stays sequential across nested blocks.
struct TabStops(u32);

impl TabStops {
    fn next(&mut self) -> u32 {
        self.0 += 1;
        self.0
    }
}

fn indent(depth: usize) -> String {
    "\t".repeat(depth)
}

/// Placeholder text for a single required attribute's value, honoring
/// the structural skeletons for list/set/tuple/map/object.
fn value_placeholder(constraint: &Constraint, stops: &mut TabStops) -> String {
    match constraint {
        Constraint::List(_) | Constraint::Set(_) => format!("[${{{}}}]", stops.next()),
        Constraint::Tuple(c) => {
            let items: Vec<String> = c.elems.iter().map(|_| format!("${{{}}}", stops.next())).collect();
            format!("[{}]", items.join(", "))
        }
        Constraint::Map(_) => format!("{{\n  \"${{{}:key}}\" = ${{{}}}\n}}", stops.next(), stops.next()),
        Constraint::Object(c) => {
            let mut lines = Vec::new();
            for (name, attr) in &c.attributes {
                if attr.is_required {
                    lines.push(format!("  {name} = {}", value_placeholder(&attr.constraint, stops)));
                }
            }
            format!("{{\n{}\n}}", lines.join("\n"))
        }
        Constraint::OneOf(alts) => alts.first().map(|a| value_placeholder(a, stops)).unwrap_or_else(|| format!("${{{}}}", stops.next())),
        _ => format!("${{{}}}", stops.next()),
    }
}

fn required_attribute_lines(schema: &BodySchema, depth: usize, stops: &mut TabStops) -> Vec<String> {
    let mut lines = Vec::new();
    for (name, attr) in &schema.attributes {
        if attr.is_required {
            let value = value_placeholder(&attr.constraint, stops);
            lines.push(format!("{}{name} = {value}", indent(depth)));
        }
    }
    lines
}

fn required_block_lines(schema: &BodySchema, depth: usize, stops: &mut TabStops) -> Vec<String> {
    let mut lines = Vec::new();
    for (name, block) in &schema.blocks {
        let is_required = block.min_items.map(|m| m > 0).unwrap_or(false);
        if !is_required {
            continue;
        }
        let labels = " \"\"".repeat(block.labels.len());
        lines.push(format!("{}{name}{labels} {{", indent(depth)));
        lines.extend(required_attribute_lines(&block.body, depth + 1, stops));
        lines.extend(required_block_lines(&block.body, depth + 1, stops));
        lines.push(format!("{}}}", indent(depth)));
    }
    lines
}

/// Builds the full label-insertion snippet body: required
/// attributes (alphabetical, via the `BTreeMap` iteration order), then
/// required blocks recursively expanded, ending in `${0}`.
pub fn required_fields_snippet(schema: &BodySchema) -> String {
    let mut stops = TabStops(0);
    let mut lines = required_attribute_lines(schema, 1, &mut stops);
    lines.extend(required_block_lines(schema, 1, &mut stops));
    lines.push("\t${0}".to_string());
    lines.join("\n")
}

/// Full snippet for inserting a block, including its labels, opening
/// and closing braces: `<block_type>" "<label placeholders>" {`.
pub fn block_insertion_snippet(block_type: &str, block_schema: &BlockSchema) -> String {
    let mut stops = TabStops(0);
    let mut header = block_type.to_string();
    for label in &block_schema.labels {
        if label.is_dep_key {
            header.push_str(&format!(" \"${{{}}}\"", stops.next()));
        } else {
            header.push_str(&format!(" \"${{{}:{}}}\"", stops.next(), label.name));
        }
    }
    let mut lines = required_attribute_lines(&block_schema.body, 1, &mut stops);
    lines.extend(required_block_lines(&block_schema.body, 1, &mut stops));
    lines.push("\t${0}".to_string());
    format!("{header} {{\n{}\n}}", lines.join("\n"))
}

/// Snippet for accepting a dep-key label candidate: `value` is
/// inserted literally (it is the candidate text itself, not a
/// placeholder), any labels after `label_index` get their own
/// placeholders, and the block body is prefilled with `body`'s
/// required attributes and blocks. Numbering continues sequentially
/// as if the completed label had already consumed tab stop `1`.
pub fn dep_key_completion_snippet(value: &str, labels: &[LabelSchema], label_index: usize, body: &BodySchema) -> String {
    let mut stops = TabStops(1);
    let mut header = format!("{value}\"");
    for label in labels.iter().skip(label_index + 1) {
        header.push_str(&format!(" \"${{{}:{}}}\"", stops.next(), label.name));
    }
    let mut lines = required_attribute_lines(body, 1, &mut stops);
    lines.extend(required_block_lines(body, 1, &mut stops));
    lines.push("\t${0}".to_string());
    format!("{header} {{\n{}\n}}", lines.join("\n"))
}

/// Renders a `${N}`/`${N:default}` snippet as plain text for callers
/// that don't understand snippet syntax: tab-stop markers are dropped,
/// keeping only the default text when one is given.
pub fn strip_placeholders(snippet: &str) -> String {
    let mut out = String::with_capacity(snippet.len());
    let mut rest = snippet;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let inner = &after[..end];
                if let Some((_, default)) = inner.split_once(':') {
                    out.push_str(default);
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hcl_lang_schema::{AttributeSchema, LabelSchema, Type};

    #[test]
    fn snippet_tab_stops_are_strictly_sequential() {
        let schema = BodySchema::new()
            .with_attribute("a", AttributeSchema::required(Constraint::literal(Type::String)))
            .with_attribute("b", AttributeSchema::required(Constraint::literal(Type::Number)));
        let snippet = required_fields_snippet(&schema);
        assert!(snippet.contains("a = ${1}"));
        assert!(snippet.contains("b = ${2}"));
        assert!(snippet.ends_with("${0}"));
    }

    #[test]
    fn block_insertion_includes_label_placeholder_and_required_attrs() {
        let inner = BodySchema::new().with_attribute(
            "instance_size",
            AttributeSchema::required(Constraint::literal(Type::String)),
        );
        let block_schema = BlockSchema::new(inner).with_labels(vec![LabelSchema::dep_key("name")]);
        let snippet = block_insertion_snippet("foo", &block_schema);
        assert!(snippet.starts_with("foo \"${1}\""));
        assert!(snippet.contains("instance_size = ${2}"));
    }

    #[test]
    fn dep_key_completion_snippet_numbers_from_the_completed_label() {
        let labels = vec![LabelSchema::dep_key("type"), LabelSchema::new("name")];
        let body = BodySchema::new()
            .with_attribute("anothername", AttributeSchema::required(Constraint::literal(Type::String)))
            .with_attribute("name", AttributeSchema::required(Constraint::literal(Type::String)))
            .with_block("spec", BlockSchema::new(BodySchema::new()).with_min_items(1));
        let snippet = dep_key_completion_snippet("aws_appmesh_route", &labels, 0, &body);
        assert!(snippet.starts_with("aws_appmesh_route\" \"${2:name}\" {"));
        assert!(snippet.contains("anothername = ${3}"));
        assert!(snippet.contains("name = ${4}"));
        assert!(snippet.contains("spec {"));
        assert!(snippet.ends_with("${0}\n}"));
    }

    #[test]
    fn strip_placeholders_keeps_defaults_and_drops_markers() {
        let plain = strip_placeholders("foo \"${1:name}\" {\n\tbar = ${2}\n\t${0}\n}");
        assert_eq!(plain, "foo \"name\" {\n\tbar = \n\t\n}");
    }
}
