//! Operand dispatch.
//!
//! Looks at the first character (or word) and hands off to the scan
//! function for that shape. Pending comments become the operand's
//! preceding comments.

use extra_diagnostic::ErrorCode;
use extra_ir::{Expr, ExprKind, Source};
use extra_scanner::{is_word_start, ScanOptions};

use crate::grammar::predicates;
use crate::{ParseResult, Parser};

impl Parser<'_> {
    /// One operand, without prefix operators or postfix forms.
    pub(crate) fn operand(&mut self) -> ParseResult<Expr> {
        let comments = self.take_comments();
        let mut expr = self.operand_body()?;
        expr.push_preceding_comments(comments);
        Ok(expr)
    }

    fn operand_body(&mut self) -> ParseResult<Expr> {
        let start = self.scanner.pos();
        let Some(c) = self.scanner.current() else {
            return Err(self.expected(ErrorCode::E1002, "an expression"));
        };
        match c {
            '0'..='9' => self.number(),
            '\'' | '"' => self.string(),
            '/' => self.regex(),
            '(' => self.group(),
            '[' => self.array(),
            '{' => self.object(),
            '#' if self.scanner.is_at("#[") => self.set(),
            '#' if self.scanner.is_at("#{") => self.dict(),
            '#' => self.pipe_placeholder(),
            '@' => {
                self.scanner.advance();
                let name = self.identifier()?;
                Ok(Expr::new(
                    ExprKind::StateReference(name.name),
                    Source::new(self.scanner.span_from(start)),
                ))
            }
            '.' if self.scanner.peek().is_some_and(is_word_start) => {
                self.scanner.advance();
                let name = self.identifier()?;
                Ok(Expr::new(
                    ExprKind::PropertyName(name.name),
                    Source::new(self.scanner.span_from(start)),
                ))
            }
            '<' if self.scanner.has_option(ScanOptions::IN_VIEW) => self.view_element(),
            c if is_word_start(c) => self.word_operand(),
            _ => Err(self.expected(ErrorCode::E1002, "an expression")),
        }
    }

    /// Keyword-introduced constructs and references.
    fn word_operand(&mut self) -> ParseResult<Expr> {
        let start = self.scanner.pos();
        let Some(word) = self.scanner.peek_word() else {
            return Err(self.expected(ErrorCode::E1002, "an expression"));
        };
        match word {
            "let" => return self.let_expr(),
            "if" => return self.if_expr(),
            "switch" | "match" => return self.switch_expr(),
            "fn" => return self.function_literal(),
            _ if predicates::is_reserved(word) => {
                return Err(self.expected(ErrorCode::E1002, "an expression"));
            }
            _ => {}
        }
        self.scanner.advance_by(word.len());
        let kind = match word {
            "null" => ExprKind::Null,
            "true" => ExprKind::Bool(true),
            "false" => ExprKind::Bool(false),
            "this" => ExprKind::This,
            _ => ExprKind::Reference(word.to_string()),
        };
        Ok(Expr::new(kind, Source::new(self.scanner.span_from(start))))
    }

    fn pipe_placeholder(&mut self) -> ParseResult<Expr> {
        if !self.scanner.has_option(ScanOptions::IN_PIPE) {
            return Err(self
                .scanner
                .error(ErrorCode::E1011, "`#` is only valid on the right of `|>`"));
        }
        let start = self.scanner.pos();
        self.scanner.advance();
        Ok(Expr::new(
            ExprKind::PipePlaceholder,
            Source::new(self.scanner.span_from(start)),
        ))
    }

    /// `( expr )`: the parentheses leave no node behind, but the inner
    /// node's span grows to cover them so `(f)(x)` is still a call.
    fn group(&mut self) -> ParseResult<Expr> {
        let start = self.scanner.pos();
        self.scanner.expect_string("(")?;
        self.skip_trivia()?;
        let options = self.nested_options();
        let mut expr = self.expression_with(options)?;
        self.skip_trivia()?;
        expr.push_following_comments(self.take_comments());
        self.expect_closing("(", ")", start)?;
        expr.source.span = self.scanner.span_from(start);
        Ok(expr)
    }
}
