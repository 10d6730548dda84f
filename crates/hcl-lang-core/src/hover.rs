//! Hover data.

use hcl_lang_pos::Range;

#[derive(Debug, Clone, PartialEq)]
pub enum Markup {
    Markdown(String),
    PlainText(String),
}

impl Markup {
    pub fn markdown(text: impl Into<String>) -> Self {
        Markup::Markdown(text.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Markup::Markdown(s) | Markup::PlainText(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HoverData {
    pub content: Markup,
    pub range: Range,
}

impl HoverData {
    pub fn new(content: Markup, range: Range) -> Self {
        Self { content, range }
    }
}
