//! Semantic tokens.

use hcl_lang_pos::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    AttrName,
    BlockType,
    BlockLabel,
    MapKey,
    String,
    Number,
    Bool,
    Keyword,
    TypePrimitive,
    TypeCapsule,
    Function,
    Traversal,
    Reference,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenModifier {
    Deprecated,
    ReadOnly,
    DependentOn,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SemanticToken {
    pub token_type: TokenType,
    pub modifiers: Vec<TokenModifier>,
    pub range: Range,
}

impl SemanticToken {
    pub fn new(token_type: TokenType, range: Range) -> Self {
        Self {
            token_type,
            modifiers: Vec::new(),
            range,
        }
    }

    pub fn with_modifier(mut self, modifier: TokenModifier) -> Self {
        self.modifiers.push(modifier);
        self
    }
}

/// Sort tokens by start byte: source order after a final sort by
/// start byte.
pub fn sort_tokens(tokens: &mut [SemanticToken]) {
    tokens.sort_by_key(|t| t.range.start.byte);
}
