//! Recursive-descent parser building the owned syntax tree directly
//! (no intermediate event stream).

use hcl_lang_pos::Span;

use crate::ast::{
    Attribute, Block, Body, BodyItem, ConditionalExpr, ExprKind, Expression, ForExpr,
    FunctionCallExpr, IndexExpr, Label, LiteralExpr, LiteralKind, ObjectConsExpr, ObjectConsItem,
    SplatExpr, TemplateExpr, TemplatePart, TraversalExpr, TraversalStep, TupleConsExpr,
};
use crate::lexer::{Lexer, Token, TokenKind};

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub range: Span,
}

pub struct Parser {
    tokens: Vec<Token>,
    idx: usize,
    errors: Vec<ParseError>,
}

/// Parse a full file into a root body plus any recovered errors.
/// Malformed fragments never abort the parse: the offending token
/// is skipped and a diagnostic recorded, mirroring "sibling handlers
/// continue".
pub fn parse(source: &str) -> (Body, Vec<ParseError>) {
    let mut parser = Parser::new(source);
    let body = parser.parse_body(None);
    (body, parser.errors)
}

impl Parser {
    pub fn new(source: &str) -> Self {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let tok = lexer.next_token();
            let eof = tok.kind == TokenKind::Eof;
            let trivia = matches!(tok.kind, TokenKind::Comment | TokenKind::Newline);
            if !trivia {
                tokens.push(tok);
            }
            if eof {
                break;
            }
        }
        Self {
            tokens,
            idx: 0,
            errors: Vec::new(),
        }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.idx.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn peek2_kind(&self) -> TokenKind {
        self.tokens
            .get(self.idx + 1)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn bump(&mut self) -> Token {
        let tok = self.peek().clone();
        if self.idx < self.tokens.len() - 1 {
            self.idx += 1;
        }
        tok
    }

    fn at_end(&self) -> bool {
        self.peek_kind() == TokenKind::Eof
    }

    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(ParseError {
            message: message.into(),
            range: self.peek().span,
        });
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Option<Token> {
        if self.peek_kind() == kind {
            Some(self.bump())
        } else {
            self.error(format!("expected {what}"));
            None
        }
    }

    /// Parse a body. `terminator` is `Some(RBrace)` for a block body,
    /// `None` for the root body which runs to end of file.
    fn parse_body(&mut self, terminator: Option<TokenKind>) -> Body {
        let start = self.peek().span;
        let mut items = Vec::new();
        loop {
            if self.at_end() {
                break;
            }
            if let Some(t) = terminator
                && self.peek_kind() == t
            {
                break;
            }
            match self.parse_body_item() {
                Some(item) => items.push(item),
                None => {
                    // Recover by skipping one token so a malformed
                    // fragment can't loop forever.
                    self.bump();
                }
            }
        }
        let end = self.peek().span;
        Body {
            items,
            range: Span::new(start.start, end.start),
        }
    }

    fn parse_body_item(&mut self) -> Option<BodyItem> {
        if self.peek_kind() != TokenKind::Ident {
            self.error("expected an attribute or block");
            return None;
        }
        let name_tok = self.bump();

        if self.peek_kind() == TokenKind::Eq {
            self.bump();
            let expr = self.parse_expr();
            let range = Span::new(name_tok.span.start, expr.range.end);
            return Some(BodyItem::Attribute(Attribute {
                name: name_tok.text,
                name_range: name_tok.span,
                expr,
                range,
            }));
        }

        // Block: zero or more quoted labels, then `{ body }`.
        let mut labels = Vec::new();
        while self.peek_kind() == TokenKind::OQuote {
            labels.push(self.parse_label());
        }

        if self.peek_kind() != TokenKind::LBrace {
            self.error("expected `=` or a block body");
            return None;
        }
        let obrace = self.bump();
        let inner = self.parse_body(Some(TokenKind::RBrace));
        let cbrace = self.expect(TokenKind::RBrace, "`}`");
        let body_end = cbrace.map(|t| t.span.end).unwrap_or(inner.range.end);
        let body_range = Span::new(obrace.span.start, body_end);
        Some(BodyItem::Block(Block {
            range: Span::new(name_tok.span.start, body_end),
            block_type: name_tok.text,
            type_range: name_tok.span,
            labels,
            body: inner,
            body_range,
        }))
    }

    fn parse_label(&mut self) -> Label {
        let oquote = self.bump();
        let mut value = String::new();
        if self.peek_kind() == TokenKind::QuotedLit {
            value = self.bump().text;
        }
        let cquote = self.expect(TokenKind::CQuote, "closing `\"`");
        let end = cquote.map(|t| t.span.end).unwrap_or(oquote.span.end);
        Label {
            value,
            range: Span::new(oquote.span.start, end),
            quoted: true,
        }
    }

    // -- expressions ---------------------------------------------------

    fn parse_expr(&mut self) -> Expression {
        let base = self.parse_postfix_expr();
        if self.peek_kind() == TokenKind::Question {
            self.bump();
            let true_expr = self.parse_expr();
            self.expect(TokenKind::Colon, "`:` in conditional expression");
            let false_expr = self.parse_expr();
            let range = Span::new(base.range.start, false_expr.range.end);
            return Expression {
                range,
                kind: ExprKind::Conditional(ConditionalExpr {
                    condition: Box::new(base),
                    true_expr: Box::new(true_expr),
                    false_expr: Box::new(false_expr),
                }),
            };
        }
        base
    }

    fn parse_postfix_expr(&mut self) -> Expression {
        let primary = self.parse_primary_expr();

        // A bare identifier directly followed by `(` is a function call,
        // not the start of a traversal.
        if let ExprKind::ScopeTraversal(ref t) = primary.kind
            && t.is_bare_identifier()
            && self.peek_kind() == TokenKind::LParen
        {
            return self.parse_function_call(t.root.clone(), t.root_range);
        }

        let ExprKind::ScopeTraversal(traversal) = primary.kind else {
            return self.parse_trailing_index(primary);
        };
        self.parse_traversal_tail(traversal, primary.range)
    }

    /// Handles `expr[key]` for non-traversal primaries (parenthesized
    /// expressions, object/tuple constructors, function calls).
    fn parse_trailing_index(&mut self, mut expr: Expression) -> Expression {
        loop {
            if self.peek_kind() != TokenKind::LBrack {
                return expr;
            }
            self.bump();
            let key = self.parse_expr();
            let cbrack = self.expect(TokenKind::RBrack, "`]`");
            let end = cbrack.map(|t| t.span.end).unwrap_or(key.range.end);
            let range = Span::new(expr.range.start, end);
            expr = Expression {
                kind: ExprKind::Index(IndexExpr {
                    collection: Box::new(expr),
                    key: Box::new(key),
                }),
                range,
            };
        }
    }

    fn parse_traversal_tail(&mut self, mut traversal: TraversalExpr, start: Span) -> Expression {
        let mut end = start.end;
        loop {
            match self.peek_kind() {
                TokenKind::Dot => {
                    let dot = self.bump();
                    if self.peek_kind() == TokenKind::Star {
                        let star = self.bump();
                        let source_span = Span::new(start.start, end);
                        return self.parse_legacy_splat_tail(traversal, source_span, star.span.end);
                    }
                    if self.peek_kind() != TokenKind::Ident {
                        self.error("expected attribute name after `.`");
                        end = dot.span.end;
                        break;
                    }
                    let name_tok = self.bump();
                    end = name_tok.span.end;
                    traversal.steps.push(TraversalStep::Attr {
                        name: name_tok.text,
                        range: name_tok.span,
                    });
                }
                TokenKind::LBrack if self.peek2_kind() == TokenKind::Star => {
                    self.bump();
                    let star = self.bump();
                    let rbrack = self.expect(TokenKind::RBrack, "`]`");
                    let splat_end = rbrack.map(|t| t.span.end).unwrap_or(star.span.end);
                    let source_span = Span::new(start.start, end);
                    return self.parse_legacy_splat_tail(traversal, source_span, splat_end);
                }
                TokenKind::LBrack => {
                    let obrack = self.bump();
                    let key = self.parse_expr();
                    let cbrack = self.expect(TokenKind::RBrack, "`]`");
                    end = cbrack.map(|t| t.span.end).unwrap_or(key.range.end);
                    traversal.steps.push(TraversalStep::Index {
                        key: Box::new(key),
                        range: Span::new(obrack.span.start, end),
                    });
                }
                _ => break,
            }
        }
        Expression {
            kind: ExprKind::ScopeTraversal(traversal),
            range: Span::new(start.start, end),
        }
    }

    /// `source.*.rest` / `source[*].rest`: everything already consumed
    /// becomes the splat `source`; remaining postfix steps are parsed
    /// as a traversal over an implicit per-element variable.
    fn parse_legacy_splat_tail(
        &mut self,
        source_traversal: TraversalExpr,
        start: Span,
        splat_end: u32,
    ) -> Expression {
        let source = Expression {
            range: Span::new(start.start, start.end),
            kind: ExprKind::ScopeTraversal(source_traversal),
        };
        let each_root = TraversalExpr {
            root: "*".to_string(),
            root_range: Span::new(start.end, splat_end),
            steps: Vec::new(),
        };
        let each_expr = Expression {
            range: Span::new(start.end, splat_end),
            kind: ExprKind::ScopeTraversal(each_root),
        };
        let ExprKind::ScopeTraversal(each_traversal) = each_expr.kind else {
            unreachable!()
        };
        let each_final = self.parse_traversal_tail(each_traversal, each_expr.range);
        let end = each_final.range.end;
        Expression {
            range: Span::new(start.start, end),
            kind: ExprKind::Splat(SplatExpr {
                source: Box::new(source),
                each: Box::new(each_final),
                legacy: true,
            }),
        }
    }

    fn parse_function_call(&mut self, name: String, name_range: Span) -> Expression {
        let oparen = self.expect(TokenKind::LParen, "`(`").unwrap();
        let mut args = Vec::new();
        let mut expand_final = false;
        while self.peek_kind() != TokenKind::RParen && !self.at_end() {
            args.push(self.parse_expr());
            if self.peek_kind() == TokenKind::Ellipsis {
                self.bump();
                expand_final = true;
                break;
            }
            if self.peek_kind() == TokenKind::Comma {
                self.bump();
            } else {
                break;
            }
        }
        let cparen = self.expect(TokenKind::RParen, "`)`");
        let end = cparen
            .map(|t| t.span.end)
            .unwrap_or(oparen.span.end);
        let base = Expression {
            range: Span::new(name_range.start, end),
            kind: ExprKind::FunctionCall(FunctionCallExpr {
                name,
                name_range,
                args,
                expand_final,
            }),
        };
        self.parse_trailing_index(base)
    }

    fn parse_primary_expr(&mut self) -> Expression {
        let tok = self.peek().clone();
        match tok.kind {
            TokenKind::Number => {
                self.bump();
                Expression {
                    range: tok.span,
                    kind: ExprKind::Literal(LiteralExpr {
                        raw: tok.text,
                        kind: LiteralKind::Number,
                    }),
                }
            }
            TokenKind::Ident if tok.text == "true" || tok.text == "false" => {
                self.bump();
                Expression {
                    range: tok.span,
                    kind: ExprKind::Literal(LiteralExpr {
                        raw: tok.text,
                        kind: LiteralKind::Bool,
                    }),
                }
            }
            TokenKind::Ident if tok.text == "null" => {
                self.bump();
                Expression {
                    range: tok.span,
                    kind: ExprKind::Literal(LiteralExpr {
                        raw: tok.text,
                        kind: LiteralKind::Null,
                    }),
                }
            }
            TokenKind::Ident => {
                self.bump();
                Expression {
                    range: tok.span,
                    kind: ExprKind::ScopeTraversal(TraversalExpr {
                        root: tok.text,
                        root_range: tok.span,
                        steps: Vec::new(),
                    }),
                }
            }
            TokenKind::OQuote => self.parse_quoted_template(),
            TokenKind::LParen => {
                self.bump();
                let inner = self.parse_expr();
                let cparen = self.expect(TokenKind::RParen, "`)`");
                let end = cparen.map(|t| t.span.end).unwrap_or(inner.range.end);
                Expression {
                    range: Span::new(tok.span.start, end),
                    kind: inner.kind,
                }
            }
            TokenKind::LBrack => self.parse_tuple_or_for(),
            TokenKind::LBrace => self.parse_object_or_for(),
            _ => {
                self.error("expected an expression");
                Expression::missing(Span::empty(tok.span.start))
            }
        }
    }

    fn parse_quoted_template(&mut self) -> Expression {
        let oquote = self.bump();
        let mut parts = Vec::new();
        loop {
            match self.peek_kind() {
                TokenKind::QuotedLit => {
                    let lit = self.bump();
                    parts.push(TemplatePart::Literal(lit.text));
                }
                TokenKind::TemplateInterpStart => {
                    self.bump();
                    let inner = self.parse_expr();
                    self.expect(TokenKind::TemplateInterpEnd, "`}`");
                    parts.push(TemplatePart::Interp(Box::new(inner)));
                }
                _ => break,
            }
        }
        let cquote = self.expect(TokenKind::CQuote, "closing `\"`");
        let end = cquote.map(|t| t.span.end).unwrap_or(oquote.span.end);
        let range = Span::new(oquote.span.start, end);

        // A template whose entire content is exactly one interpolation
        // is surfaced as a direct wrap around that expression.
        if let [TemplatePart::Interp(inner)] = parts.as_slice() {
            return Expression {
                range,
                kind: ExprKind::TemplateWrap(inner.clone()),
            };
        }
        Expression {
            range,
            kind: ExprKind::Template(TemplateExpr { parts }),
        }
    }

    fn parse_tuple_or_for(&mut self) -> Expression {
        let obrack = self.bump();
        if self.peek_kind() == TokenKind::Ident && self.peek().text == "for" {
            return self.parse_for_expr(obrack.span, TokenKind::RBrack, false);
        }
        let mut items = Vec::new();
        while self.peek_kind() != TokenKind::RBrack && !self.at_end() {
            items.push(self.parse_expr());
            if self.peek_kind() == TokenKind::Comma {
                self.bump();
            } else {
                break;
            }
        }
        let cbrack = self.expect(TokenKind::RBrack, "`]`");
        let end = cbrack.map(|t| t.span.end).unwrap_or(obrack.span.end);
        Expression {
            range: Span::new(obrack.span.start, end),
            kind: ExprKind::TupleCons(TupleConsExpr { items }),
        }
    }

    fn parse_object_or_for(&mut self) -> Expression {
        let obrace = self.bump();
        if self.peek_kind() == TokenKind::Ident && self.peek().text == "for" {
            return self.parse_for_expr(obrace.span, TokenKind::RBrace, true);
        }
        let mut items = Vec::new();
        while self.peek_kind() != TokenKind::RBrace && !self.at_end() {
            let key = self.parse_object_key();
            if matches!(self.peek_kind(), TokenKind::Eq | TokenKind::Colon) {
                self.bump();
            } else {
                self.error("expected `=` after object key");
            }
            let value = self.parse_expr();
            let range = Span::new(key.range.start, value.range.end);
            items.push(ObjectConsItem { key, value, range });
            if self.peek_kind() == TokenKind::Comma {
                self.bump();
            }
        }
        let cbrace = self.expect(TokenKind::RBrace, "`}`");
        let end = cbrace.map(|t| t.span.end).unwrap_or(obrace.span.end);
        Expression {
            range: Span::new(obrace.span.start, end),
            kind: ExprKind::ObjectCons(ObjectConsExpr { items }),
        }
    }

    /// Object-cons keys are either bare identifiers or quoted strings;
    /// both are represented as expressions.
    fn parse_object_key(&mut self) -> Expression {
        if self.peek_kind() == TokenKind::OQuote {
            return self.parse_quoted_template();
        }
        self.parse_primary_expr()
    }

    fn parse_for_expr(
        &mut self,
        open: Span,
        terminator: TokenKind,
        is_object: bool,
    ) -> Expression {
        self.bump(); // `for`
        let first = self.expect(TokenKind::Ident, "loop variable").map(|t| t.text);
        let mut key_var = None;
        let mut value_var = first.unwrap_or_default();
        if self.peek_kind() == TokenKind::Comma {
            self.bump();
            let second = self.expect(TokenKind::Ident, "loop value variable");
            key_var = Some(value_var);
            value_var = second.map(|t| t.text).unwrap_or_default();
        }
        self.expect_keyword("in");
        let collection = self.parse_expr();
        self.expect(TokenKind::Colon, "`:` in for expression");
        let first_expr = self.parse_expr();

        let (key_expr, value_expr) = if self.peek_kind() == TokenKind::FatArrow {
            self.bump();
            (Some(Box::new(first_expr)), Box::new(self.parse_expr()))
        } else {
            (None, Box::new(first_expr))
        };

        let grouping = if self.peek_kind() == TokenKind::Ellipsis {
            self.bump();
            true
        } else {
            false
        };

        let condition = if self.peek_kind() == TokenKind::Ident && self.peek().text == "if" {
            self.bump();
            Some(Box::new(self.parse_expr()))
        } else {
            None
        };

        let close = self.expect(terminator, "closing bracket of `for` expression");
        let end = close.map(|t| t.span.end).unwrap_or(open.end);
        Expression {
            range: Span::new(open.start, end),
            kind: ExprKind::For(ForExpr {
                key_var,
                value_var,
                collection: Box::new(collection),
                key_expr,
                value_expr,
                condition,
                is_object,
                grouping,
            }),
        }
    }

    fn expect_keyword(&mut self, word: &str) {
        if self.peek_kind() == TokenKind::Ident && self.peek().text == word {
            self.bump();
        } else {
            self.error(format!("expected `{word}`"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(src: &str) -> Body {
        let (body, errors) = parse(src);
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        body
    }

    #[test]
    fn parses_bool_literal_attribute() {
        let body = parse_ok("enabled = true");
        let attr = body.attribute("enabled").unwrap();
        assert!(matches!(
            attr.expr.kind,
            ExprKind::Literal(LiteralExpr {
                kind: LiteralKind::Bool,
                ..
            })
        ));
    }

    #[test]
    fn parses_block_with_labels_and_nested_body() {
        let body = parse_ok(
            r#"resource "aws_instance" "web" {
              ami = "abc"
              tags = { Name = "web" }
            }"#,
        );
        assert_eq!(body.items.len(), 1);
        let BodyItem::Block(block) = &body.items[0] else {
            panic!("expected block");
        };
        assert_eq!(block.block_type, "resource");
        assert_eq!(block.labels.len(), 2);
        assert_eq!(block.labels[0].value, "aws_instance");
        assert_eq!(block.labels[1].value, "web");
        assert!(block.body.attribute("ami").is_some());
        let tags = block.body.attribute("tags").unwrap();
        assert!(matches!(tags.expr.kind, ExprKind::ObjectCons(_)));
    }

    #[test]
    fn parses_traversal_and_function_call() {
        let body = parse_ok("x = var.foo.bar\ny = upper(var.foo)");
        let x = &body.attribute("x").unwrap().expr;
        let ExprKind::ScopeTraversal(t) = &x.kind else {
            panic!("expected traversal");
        };
        assert_eq!(t.root, "var");
        assert_eq!(t.steps.len(), 2);

        let y = &body.attribute("y").unwrap().expr;
        assert!(matches!(y.kind, ExprKind::FunctionCall(_)));
    }

    #[test]
    fn parses_conditional_and_index() {
        let body = parse_ok("x = cond ? list[0] : 1");
        let x = &body.attribute("x").unwrap().expr;
        let ExprKind::Conditional(c) = &x.kind else {
            panic!("expected conditional");
        };
        assert!(matches!(c.true_expr.kind, ExprKind::Index(_)));
    }

    #[test]
    fn parses_for_expr_tuple_and_object_forms() {
        let body = parse_ok(
            r#"a = [for x in list : x]
               b = {for k, v in map : k => v}"#,
        );
        let a = &body.attribute("a").unwrap().expr;
        let ExprKind::For(fa) = &a.kind else {
            panic!("expected for-expr");
        };
        assert!(!fa.is_object);
        assert!(fa.key_var.is_none());

        let b = &body.attribute("b").unwrap().expr;
        let ExprKind::For(fb) = &b.kind else {
            panic!("expected for-expr");
        };
        assert!(fb.is_object);
        assert_eq!(fb.key_var.as_deref(), Some("k"));
    }

    #[test]
    fn empty_label_slot_is_tolerated() {
        let (body, errors) = parse("resource \"\" {}");
        assert!(errors.is_empty());
        let BodyItem::Block(block) = &body.items[0] else {
            panic!("expected block");
        };
        assert_eq!(block.labels[0].value, "");
    }

    #[test]
    fn parses_template_wrap_for_single_interpolation() {
        let body = parse_ok("x = \"${var.y}\"");
        let x = &body.attribute("x").unwrap().expr;
        assert!(matches!(x.kind, ExprKind::TemplateWrap(_)));
    }
}
