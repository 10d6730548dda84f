//! Path-level state: a single logical configuration directory's
//! schema, parsed files and collected reference graph.

use std::collections::BTreeMap;

use hcl_lang_pos::LineIndex;
use hcl_lang_schema::BodySchema;
use hcl_lang_syntax::{Body, ParseError};

use crate::target::{Origin, Target};

/// One parsed source file plus the bookkeeping needed to turn byte
/// spans from its body into file-qualified, line/column [`Range`]s.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub name: String,
    pub source: String,
    pub body: Body,
    pub parse_errors: Vec<ParseError>,
    pub line_index: LineIndex,
}

impl ParsedFile {
    pub fn parse(name: impl Into<String>, source: impl Into<String>) -> Self {
        let name = name.into();
        let source = source.into();
        let (body, parse_errors) = hcl_lang_syntax::parse(&source);
        let line_index = LineIndex::new(&source);
        Self {
            name,
            source,
            body,
            parse_errors,
            line_index,
        }
    }
}

/// A known function signature, used by completion and hover for
/// function-call expressions.
#[derive(Debug, Clone)]
pub struct FunctionSignature {
    pub name: String,
    pub description: Option<String>,
    pub params: Vec<String>,
    pub variadic_param: Option<String>,
    pub return_type: hcl_lang_schema::Type,
}

/// The full per-path analysis state: a schema, the files governed by
/// it, and the reference graph collected from them.
#[derive(Debug, Clone, Default)]
pub struct PathContext {
    pub schema: Option<BodySchema>,
    pub files: BTreeMap<String, ParsedFile>,
    pub targets: Vec<Target>,
    pub origins: Vec<Origin>,
    pub functions: BTreeMap<String, FunctionSignature>,
}

impl PathContext {
    pub fn new(schema: BodySchema) -> Self {
        Self {
            schema: Some(schema),
            files: BTreeMap::new(),
            targets: Vec::new(),
            origins: Vec::new(),
            functions: BTreeMap::new(),
        }
    }

    pub fn add_file(&mut self, file: ParsedFile) {
        self.files.insert(file.name.clone(), file);
    }

    pub fn file(&self, name: &str) -> Option<&ParsedFile> {
        self.files.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsed_file_builds_line_index_from_source() {
        let file = ParsedFile::parse("main.cfg", "a = 1\nb = 2\n");
        assert_eq!(file.line_index.position(6).line, 2);
    }
}
