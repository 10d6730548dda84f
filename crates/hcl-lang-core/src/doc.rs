//! Per-file conversion context: turns the byte [`Span`]s an expression
//! carries into file-qualified [`Range`]s, the currency every runtime
//! entity (`Candidate`, `HoverData`, `SemanticToken`, `Diagnostic`,
//! `Target`, `Origin`) is expressed in.

use hcl_lang_pos::{LineIndex, Position, Range, Span};

#[derive(Debug, Clone, Copy)]
pub struct Doc<'a> {
    pub filename: &'a str,
    pub source: &'a str,
    pub line_index: &'a LineIndex,
}

impl<'a> Doc<'a> {
    pub fn new(filename: &'a str, source: &'a str, line_index: &'a LineIndex) -> Self {
        Self {
            filename,
            source,
            line_index,
        }
    }

    pub fn range(&self, span: Span) -> Range {
        self.line_index.range(self.filename.to_string(), span)
    }

    pub fn position(&self, byte: u32) -> Position {
        self.line_index.position(byte)
    }

    pub fn text(&self, span: Span) -> &'a str {
        span.slice(self.source)
    }
}
