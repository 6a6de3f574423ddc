//! Postfix forms: `.name`, `?.name`, calls, block arguments, indexing.
//!
//! These bind tighter than every prefix and binary operator, so they are
//! applied straight to the operand on top of the stack instead of going
//! through precedence reduction.

use extra_diagnostic::ErrorCode;
use extra_ir::{
    Argument, ArgumentKind, ArgumentsList, BlockKind, Expr, ExprKind, Identifier, Operator, Source,
};
use extra_scanner::{is_word_start, ScanOptions};
use tracing::trace;

use super::Stacks;
use crate::grammar::predicates;
use crate::grammar::series::SeriesConfig;
use crate::{ParseResult, Parser};

impl Parser<'_> {
    /// Apply every postfix form that follows the top operand.
    ///
    /// `(` and `[` must touch the operand; `.name` and `?.` may follow
    /// whitespace (the caller has already decided that).
    pub(super) fn postfix_chain(&mut self, stacks: &mut Stacks) -> ParseResult<()> {
        loop {
            let Some(last) = stacks.operands.last() else {
                return Ok(());
            };
            let adjacent = last.span().end == self.scanner.pos();
            let (op, rhs) = if adjacent && self.scanner.is_at("(") {
                (Operator::Call, self.arguments_list()?)
            } else if adjacent && self.scanner.is_at("[") {
                self.scanner.advance();
                (Operator::Index, self.index_body()?)
            } else if self.scanner.is_at("?.(") {
                self.scanner.advance_by(2);
                (Operator::NullableCall, self.arguments_list()?)
            } else if self.scanner.is_at("?.[") {
                self.scanner.advance_by(3);
                (Operator::NullableIndex, self.index_body()?)
            } else if self.scanner.is_at("?.") {
                self.scanner.advance_by(2);
                (Operator::NullablePropertyAccess, self.property_name()?)
            } else if predicates::is_at_property_access(&self.scanner) {
                self.scanner.advance();
                (Operator::PropertyAccess, self.property_name()?)
            } else {
                return Ok(());
            };
            trace!(?op, "postfix");
            let Some(target) = stacks.operands.pop() else {
                return Ok(());
            };
            let start = target.span().start;
            let mut expr = Expr::operation(op, vec![target, rhs], start);
            expr.source.span.end = self.scanner.pos().max(expr.source.span.end);
            stacks.operands.push(expr);
        }
    }

    fn property_name(&mut self) -> ParseResult<Expr> {
        self.skip_trivia()?;
        let name = self.identifier()?;
        Ok(Expr::new(ExprKind::PropertyName(name.name), name.source))
    }

    /// The inside of `[…]`, with the `[` already consumed.
    fn index_body(&mut self) -> ParseResult<Expr> {
        let open = self.scanner.pos() - 1;
        self.skip_trivia()?;
        let options = self.nested_options();
        let mut index = self.expression_with(options)?;
        self.skip_trivia()?;
        index.push_following_comments(self.take_comments());
        self.expect_closing("[", "]", open)?;
        Ok(index)
    }

    /// `(args…)` plus any block arguments; the right operand of a call.
    pub(crate) fn arguments_list(&mut self) -> ParseResult<Expr> {
        let start = self.scanner.pos();
        self.scanner.expect_string("(")?;
        let options = self.argument_options();
        let parens = self.with_options(options, |p| {
            p.series(&SeriesConfig::new("(", ")", start), Self::argument)
        })?;
        let mut list = ArgumentsList {
            parens: parens.items,
            last_parens_comments: parens.closing_comments,
            ..ArgumentsList::default()
        };
        if !self.scanner.has_option(ScanOptions::NO_BLOCK_ARGS) {
            self.block_arguments(&mut list)?;
        }
        Ok(Expr::new(
            ExprKind::Arguments(Box::new(list)),
            Source::new(self.scanner.span_from(start)),
        ))
    }

    /// `f(…) { a, b }` or `f(…): a`, on the same line as the `)`.
    fn block_arguments(&mut self, list: &mut ArgumentsList) -> ParseResult<()> {
        let snapshot = self.scanner.snapshot();
        self.skip_spaces()?;
        if predicates::is_at_open_brace(&self.scanner) {
            let open = self.scanner.pos();
            self.scanner.advance();
            let options = self.argument_options();
            let block = self.with_options(options, |p| {
                p.series(&SeriesConfig::new("{", "}", open), Self::argument)
            })?;
            list.block = block.items;
            list.block_comments = block.closing_comments;
            list.block_kind = BlockKind::Braces;
        } else if predicates::is_at_colon(&self.scanner) {
            self.scanner.advance();
            self.skip_trivia()?;
            let comments = self.take_comments();
            let start = self.scanner.pos();
            let value = self.expression()?;
            list.block.push(Argument {
                source: Source::from_range(start, value.span().end).with_preceding(comments),
                kind: ArgumentKind::Positional(value),
            });
            list.block_kind = BlockKind::Colon;
        } else {
            self.scanner.restore(snapshot);
        }
        Ok(())
    }

    /// Arguments are newline-separated and may be spreads or kwargs lists,
    /// but take no inclusion suffix.
    fn argument_options(&self) -> ScanOptions {
        self.nested_options()
            | ScanOptions::NEWLINE_IS_SEPARATOR
            | ScanOptions::ALLOW_SPLAT
            | ScanOptions::ALLOW_KWARGS
    }

    /// One call-site argument: `v`, `name: v`, `...v`, `...name: v`, `*v`.
    fn argument(&mut self) -> ParseResult<Argument> {
        let comments = self.take_comments();
        let start = self.scanner.pos();
        let kind = if self.scanner.scan_if_string("...") {
            self.skip_trivia()?;
            if predicates::named_entry_ahead(&mut self.scanner)? {
                let (name, values) = self.named_argument()?;
                ArgumentKind::RepeatedNamed { name, values }
            } else {
                ArgumentKind::SpreadPositional(self.expression()?)
            }
        } else if self.scanner.is_at("*") && !self.scanner.is_at("**") {
            self.scanner.advance();
            self.skip_trivia()?;
            ArgumentKind::KwargsList(self.expression()?)
        } else if self.scanner.current().is_some_and(is_word_start)
            && predicates::named_entry_ahead(&mut self.scanner)?
        {
            let (name, value) = self.named_argument()?;
            ArgumentKind::Named { name, value }
        } else {
            ArgumentKind::Positional(self.expression()?)
        };
        let end = match &kind {
            ArgumentKind::Positional(value)
            | ArgumentKind::Named { value, .. }
            | ArgumentKind::SpreadPositional(value)
            | ArgumentKind::RepeatedNamed { values: value, .. }
            | ArgumentKind::KwargsList(value) => value.span().end,
        };
        Ok(Argument {
            source: Source::from_range(start, end).with_preceding(comments),
            kind,
        })
    }

    fn named_argument(&mut self) -> ParseResult<(Identifier, Expr)> {
        let mut name = self.identifier()?;
        self.skip_trivia()?;
        name.source.following_comments.extend(self.take_comments());
        if !predicates::is_at_colon(&self.scanner) {
            return Err(self.expected(ErrorCode::E1001, "`:`"));
        }
        self.scanner.advance();
        self.skip_trivia()?;
        let value = self.expression()?;
        Ok((name, value))
    }
}
