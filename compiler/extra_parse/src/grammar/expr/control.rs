//! `let … in …`, `if … then … else …` and `switch`/`match`.
//!
//! Their bodies are open-ended: a body runs until something that cannot
//! continue an expression (`else`, a closing delimiter, a separating
//! newline, or the end of input).

use extra_diagnostic::ErrorCode;
use extra_ir::{
    Case, Expr, ExprKind, IfBranch, IfExpr, Let, LetBinding, Pattern, Source, Span, SwitchExpr,
    SwitchKeyword,
};
use extra_scanner::ScanOptions;
use tracing::trace;

use crate::grammar::predicates;
use crate::grammar::series::SeriesConfig;
use crate::{ParseError, ParseResult, Parser};

/// One entry of a switch body before validation.
enum Arm {
    Case(Case),
    Else { start: u32, body: Expr },
}

impl Parser<'_> {
    /// Options for an open-ended body: whatever the enclosing expression
    /// allows, except that it may hold more than one operand.
    fn body_options(&self) -> ScanOptions {
        self.scanner.options() - ScanOptions::SINGLE_EXPRESSION
    }

    /// Options for a value that ends at a newline (bindings, cases).
    fn line_options(&self) -> ScanOptions {
        self.nested_options() | ScanOptions::NEWLINE_IS_SEPARATOR
    }

    /// `let a = 1, b: Int = 2 in a + b`
    pub(crate) fn let_expr(&mut self) -> ParseResult<Expr> {
        let start = self.scanner.pos();
        self.scanner.expect_word("let")?;
        let mut bindings = Vec::new();
        loop {
            self.skip_trivia()?;
            bindings.push(self.let_binding()?);
            self.skip_spaces()?;
            let newline = self.scanner.is_at_newline();
            self.skip_trivia()?;
            if self.scanner.scan_if_string(",") {
                continue;
            }
            if self.scanner.is_at_word("in") {
                break;
            }
            if !newline || self.scanner.is_eof() {
                return Err(self.expected(ErrorCode::E1001, "`,`, a newline or `in`"));
            }
        }
        let in_comments = self.take_comments();
        self.scanner.expect_word("in")?;
        self.skip_trivia()?;
        let options = self.body_options();
        let body = self.expression_with(options)?;
        let source = Source::from_range(start, body.span().end);
        trace!(bindings = bindings.len(), "let");
        Ok(Expr::new(
            ExprKind::Let(Box::new(Let {
                bindings,
                body,
                in_comments,
            })),
            source,
        ))
    }

    fn let_binding(&mut self) -> ParseResult<LetBinding> {
        let mut name = self.identifier()?;
        self.skip_trivia()?;
        name.source.following_comments.extend(self.take_comments());
        let type_annotation = if predicates::is_at_colon(&self.scanner) {
            self.scanner.advance();
            self.skip_trivia()?;
            let mut ty = self.type_expr()?;
            self.skip_trivia()?;
            ty.source.following_comments.extend(self.take_comments());
            Some(ty)
        } else {
            None
        };
        if !predicates::is_at_assign(&self.scanner) {
            return Err(self.expected(ErrorCode::E1001, "`=`"));
        }
        self.scanner.advance();
        self.skip_trivia()?;
        let options = self.line_options();
        let value = self.expression_with(options)?;
        Ok(LetBinding {
            name,
            type_annotation,
            value,
        })
    }

    /// `if a then b elseif c then d else e`
    pub(crate) fn if_expr(&mut self) -> ParseResult<Expr> {
        let start = self.scanner.pos();
        self.scanner.expect_word("if")?;
        let mut branches = vec![self.if_branch()?];
        let mut else_body = None;
        loop {
            let next = self.scanner.test(|s| -> ParseResult<Option<&'static str>> {
                s.scan_all_whitespace()?;
                Ok(if s.is_at_word("elseif") {
                    Some("elseif")
                } else if s.is_at_word("else") {
                    Some("else")
                } else {
                    None
                })
            })?;
            let Some(keyword) = next else {
                break;
            };
            self.skip_trivia()?;
            if let Some(branch) = branches.last_mut() {
                branch.body.push_following_comments(self.take_comments());
            }
            self.scanner.advance_by(keyword.len());
            if keyword == "elseif" {
                branches.push(self.if_branch()?);
            } else {
                self.skip_trivia()?;
                let options = self.body_options();
                else_body = Some(self.expression_with(options)?);
                break;
            }
        }
        let end = else_body
            .as_ref()
            .or(branches.last().map(|branch| &branch.body))
            .map_or(start, |body| body.span().end);
        Ok(Expr::new(
            ExprKind::If(Box::new(IfExpr {
                branches,
                else_body,
            })),
            Source::from_range(start, end),
        ))
    }

    /// `cond then body`, after `if`/`elseif`.
    fn if_branch(&mut self) -> ParseResult<IfBranch> {
        self.skip_trivia()?;
        let options = self.nested_options();
        let condition = self.expression_with(options)?;
        self.skip_trivia()?;
        if !self.scanner.scan_if_word("then") {
            return Err(self.expected(ErrorCode::E1001, "`then`"));
        }
        self.skip_trivia()?;
        let options = self.body_options();
        let body = self.expression_with(options)?;
        Ok(IfBranch { condition, body })
    }

    /// `switch (subject) { case p: body … else: body }`
    pub(crate) fn switch_expr(&mut self) -> ParseResult<Expr> {
        let start = self.scanner.pos();
        let keyword = if self.scanner.scan_if_word("switch") {
            SwitchKeyword::Switch
        } else {
            self.scanner.expect_word("match")?;
            SwitchKeyword::Match
        };
        self.skip_trivia()?;
        let open = self.scanner.pos();
        self.scanner.expect_string("(")?;
        self.skip_trivia()?;
        let options = self.nested_options() | ScanOptions::NO_BLOCK_ARGS;
        let mut subject = self.expression_with(options)?;
        self.skip_trivia()?;
        subject.push_following_comments(self.take_comments());
        self.expect_closing("(", ")", open)?;
        self.skip_trivia()?;
        let brace = self.scanner.pos();
        self.scanner.expect_string("{")?;
        let arms = self.series(&SeriesConfig::new("{", "}", brace), Self::switch_arm)?;

        let mut cases = Vec::new();
        let mut else_body = None;
        for arm in arms.items {
            if else_body.is_some() {
                return Err(ParseError::new(
                    ErrorCode::E1001,
                    "`else` must be the last branch of a switch",
                    match &arm {
                        Arm::Case(case) => Span::point(case.source.start()),
                        Arm::Else { start, .. } => Span::point(*start),
                    },
                ));
            }
            match arm {
                Arm::Case(case) => cases.push(case),
                Arm::Else { body, .. } => else_body = Some(body),
            }
        }
        if cases.is_empty() {
            return Err(self.scanner.error_from(
                ErrorCode::E1001,
                "a switch needs at least one `case`",
                start,
            ));
        }
        Ok(Expr::new(
            ExprKind::Switch(Box::new(SwitchExpr {
                keyword,
                subject,
                cases,
                else_body,
                closing_comments: arms.closing_comments,
            })),
            Source::new(self.scanner.span_from(start)),
        ))
    }

    fn switch_arm(&mut self) -> ParseResult<Arm> {
        let comments = self.take_comments();
        let start = self.scanner.pos();
        if self.scanner.scan_if_word("else") {
            self.skip_trivia()?;
            self.expect_case_colon()?;
            let options = self.line_options();
            let mut body = self.expression_with(options)?;
            body.push_preceding_comments(comments);
            return Ok(Arm::Else { start, body });
        }
        if !self.scanner.scan_if_word("case") {
            return Err(self.expected(ErrorCode::E1014, "`case` or `else`"));
        }
        self.skip_trivia()?;
        let pattern = self.pattern()?;
        self.skip_trivia()?;
        self.expect_case_colon()?;
        let options = self.line_options();
        let body = self.expression_with(options)?;
        Ok(Arm::Case(Case {
            source: Source::from_range(start, body.span().end).with_preceding(comments),
            pattern,
            body,
        }))
    }

    fn expect_case_colon(&mut self) -> ParseResult<()> {
        if !predicates::is_at_colon(&self.scanner) {
            return Err(self.expected(ErrorCode::E1001, "`:`"));
        }
        self.scanner.advance();
        self.skip_trivia()
    }

    /// A case pattern: `_`, `name`, `Type`, `Type as name`, or a value.
    pub(crate) fn pattern(&mut self) -> ParseResult<Pattern> {
        let options = self.nested_options() | ScanOptions::NO_BLOCK_ARGS;
        self.with_options(options, Self::pattern_inner)
    }

    fn pattern_inner(&mut self) -> ParseResult<Pattern> {
        if self.scanner.is_at_word("_") {
            let comments = self.take_comments();
            let start = self.scanner.pos();
            self.scanner.advance();
            return Ok(Pattern::Wildcard(
                Source::new(self.scanner.span_from(start)).with_preceding(comments),
            ));
        }
        if predicates::is_at_type_name(&self.scanner) {
            let mut ty = self.type_expr()?;
            let has_binding = self.scanner.test(|s| -> ParseResult<bool> {
                s.scan_all_whitespace()?;
                Ok(s.is_at_word("as"))
            })?;
            let binding = if has_binding {
                self.skip_trivia()?;
                ty.source.following_comments.extend(self.take_comments());
                self.scanner.advance_by(2);
                self.skip_trivia()?;
                Some(self.identifier()?)
            } else {
                None
            };
            return Ok(Pattern::Type { binding, ty });
        }
        if self.is_at_binding()? {
            return Ok(Pattern::Binding(self.identifier()?));
        }
        Ok(Pattern::Value(self.expression()?))
    }

    /// A lowercase, non-keyword name directly followed by the case colon.
    fn is_at_binding(&mut self) -> ParseResult<bool> {
        let Some(word) = self.scanner.peek_word() else {
            return Ok(false);
        };
        let keyword = matches!(word, "null" | "true" | "false" | "this")
            || predicates::is_reserved(word)
            || !word.starts_with(|c: char| c.is_lowercase() || c == '_');
        if keyword {
            return Ok(false);
        }
        predicates::named_entry_ahead(&mut self.scanner)
    }
}
