//! Owned syntax tree for the configuration language.
//!
//! Nodes own their data and carry a [`Span`]; there is no lossless
//! concrete syntax tree underneath. This mirrors the plain "value with a
//! span" style rather than a token-preserving tree: handlers only ever
//! need ranges and shapes, never whitespace/comment-faithful
//! reconstruction.

use hcl_lang_pos::Span;

/// A brace-delimited collection of attributes and nested blocks.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Body {
    pub items: Vec<BodyItem>,
    /// Span of the body's content, excluding the enclosing braces
    /// (or the whole file, for a root body).
    pub range: Span,
}

impl Body {
    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.items.iter().filter_map(|item| match item {
            BodyItem::Attribute(a) => Some(a),
            BodyItem::Block(_) => None,
        })
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.items.iter().filter_map(|item| match item {
            BodyItem::Block(b) => Some(b),
            BodyItem::Attribute(_) => None,
        })
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes().find(|a| a.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BodyItem {
    Attribute(Attribute),
    Block(Block),
}

impl BodyItem {
    pub fn range(&self) -> Span {
        match self {
            BodyItem::Attribute(a) => a.range,
            BodyItem::Block(b) => b.range,
        }
    }
}

/// `name = expression`.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub name_range: Span,
    pub expr: Expression,
    /// Full span, from the start of the name to the end of the expression.
    pub range: Span,
}

/// `block_type "label1" "label2" { body }`.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub block_type: String,
    pub type_range: Span,
    pub labels: Vec<Label>,
    pub body: Body,
    /// Span of the `{ ... }`, braces included.
    pub body_range: Span,
    /// Full span of the block, from the type keyword to the closing brace.
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub value: String,
    pub range: Span,
    pub quoted: bool,
}

/// An expression producing a value.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExprKind,
    pub range: Span,
}

impl Expression {
    pub fn missing(at: Span) -> Self {
        Expression {
            kind: ExprKind::Missing,
            range: at,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self.kind, ExprKind::Missing)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// A bare literal: number, bool, or null keyword token.
    Literal(LiteralExpr),
    /// A quoted string, possibly containing `${...}` interpolations.
    Template(TemplateExpr),
    /// A string whose *entire* content is a single interpolation, e.g.
    /// a JSON-variant attribute value of `"${var.x}"` that should be
    /// treated as the inner expression directly rather than as a string.
    TemplateWrap(Box<Expression>),
    /// `a.b.c`, `a[0].b`, `var.x` — a traversal rooted at an identifier.
    ScopeTraversal(TraversalExpr),
    /// `collection[key]` where `collection` is itself an arbitrary
    /// expression (as opposed to a traversal index step).
    Index(IndexExpr),
    /// `{ key = value, ... }`.
    ObjectCons(ObjectConsExpr),
    /// `[a, b, c]`.
    TupleCons(TupleConsExpr),
    /// `name(arg1, arg2, ...)`.
    FunctionCall(FunctionCallExpr),
    /// `cond ? true_expr : false_expr`.
    Conditional(ConditionalExpr),
    /// `[for k, v in coll : expr]` / `{for k, v in coll : k => v}`.
    For(ForExpr),
    /// `foo.*.bar` / `foo[*].bar`.
    Splat(SplatExpr),
    /// A syntax error recovery placeholder: an expression slot with no
    /// parseable content (e.g. `attr = ` at end of input).
    Missing,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralKind {
    Number,
    Bool,
    Null,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralExpr {
    pub raw: String,
    pub kind: LiteralKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateExpr {
    pub parts: Vec<TemplatePart>,
}

impl TemplateExpr {
    /// True when this template has no interpolations at all, i.e. it is
    /// indistinguishable from a plain string literal.
    pub fn is_pure_literal(&self) -> bool {
        self.parts.iter().all(|p| matches!(p, TemplatePart::Literal(_)))
    }

    pub fn literal_text(&self) -> Option<String> {
        if self.is_pure_literal() {
            Some(
                self.parts
                    .iter()
                    .map(|p| match p {
                        TemplatePart::Literal(s) => s.as_str(),
                        TemplatePart::Interp(_) => unreachable!(),
                    })
                    .collect(),
            )
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TemplatePart {
    Literal(String),
    Interp(Box<Expression>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TraversalExpr {
    pub root: String,
    pub root_range: Span,
    pub steps: Vec<TraversalStep>,
}

impl TraversalExpr {
    /// Length 1 iff this is a bare identifier with no further steps —
    /// the shape a `Keyword` constraint accepts.
    pub fn is_bare_identifier(&self) -> bool {
        self.steps.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TraversalStep {
    Attr { name: String, range: Span },
    Index { key: Box<Expression>, range: Span },
    /// `.*` inside an attribute-only splat chain; full splat semantics
    /// live in `SplatExpr`, this step only appears for the legacy
    /// `foo.*.bar` spelling once folded into the traversal.
    LegacySplat { range: Span },
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpr {
    pub collection: Box<Expression>,
    pub key: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectConsExpr {
    pub items: Vec<ObjectConsItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectConsItem {
    pub key: Expression,
    pub value: Expression,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TupleConsExpr {
    pub items: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCallExpr {
    pub name: String,
    pub name_range: Span,
    pub args: Vec<Expression>,
    /// True when the call used `...` expansion on its final argument.
    pub expand_final: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalExpr {
    pub condition: Box<Expression>,
    pub true_expr: Box<Expression>,
    pub false_expr: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForExpr {
    pub key_var: Option<String>,
    pub value_var: String,
    pub collection: Box<Expression>,
    /// Present only for `{for ... : k => v}`.
    pub key_expr: Option<Box<Expression>>,
    pub value_expr: Box<Expression>,
    pub condition: Option<Box<Expression>>,
    pub is_object: bool,
    /// `{for ... : k => v...}` — group values with duplicate keys.
    pub grouping: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SplatExpr {
    pub source: Box<Expression>,
    /// The expression applied to each element; for the common
    /// `source.*.attr` shape this is a traversal rooted at an implicit
    /// splat variable.
    pub each: Box<Expression>,
    pub legacy: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_is_pure_literal_detects_plain_strings() {
        let t = TemplateExpr {
            parts: vec![TemplatePart::Literal("hello".into())],
        };
        assert!(t.is_pure_literal());
        assert_eq!(t.literal_text(), Some("hello".to_string()));
    }

    #[test]
    fn template_with_interpolation_is_not_pure() {
        let t = TemplateExpr {
            parts: vec![
                TemplatePart::Literal("hi ".into()),
                TemplatePart::Interp(Box::new(Expression::missing(Span::empty(0)))),
            ],
        };
        assert!(!t.is_pure_literal());
    }

    #[test]
    fn traversal_bare_identifier_has_no_steps() {
        let t = TraversalExpr {
            root: "each".into(),
            root_range: Span::new(0, 4),
            steps: vec![],
        };
        assert!(t.is_bare_identifier());
    }
}
