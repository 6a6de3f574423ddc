//! Recursive descent parser for Extra.
//!
//! There is no token stream: grammar functions drive an
//! [`extra_scanner::Scanner`] directly and build the owned tree from
//! `extra_ir`. Binary and postfix operators go through a single
//! operator-precedence engine (`grammar::expr`); everything else is a
//! scan function per construct.
//!
//! Every comment the scanner sees is attached to exactly one node.
//! Parsing stops at the first error; there is no recovery.

mod grammar;

pub use extra_scanner::{ParseError, ParseResult, ScanOptions};

use extra_diagnostic::ErrorCode;
use extra_ir::{Comment, Expr, Identifier, Module, Source, TypeExpr};
use extra_scanner::Scanner;

/// Parser state: the scanner plus nothing else. Context lives on the
/// scanner's option stack so speculative scans roll it back too.
pub struct Parser<'a> {
    scanner: Scanner<'a>,
}

/// Parse a complete expression.
pub fn parse_expression(source: &str) -> ParseResult<Expr> {
    let mut parser = Parser::new(source);
    parser.skip_trivia()?;
    let mut expr = parser.expression()?;
    parser.skip_trivia()?;
    expr.push_following_comments(parser.take_comments());
    parser.expect_end()?;
    Ok(expr)
}

/// Parse a standalone type expression (`Int(>=0) | String`).
pub fn parse_type(source: &str) -> ParseResult<TypeExpr> {
    let mut parser = Parser::new(source);
    parser.skip_trivia()?;
    let mut ty = parser.type_expr()?;
    parser.skip_trivia()?;
    ty.source.following_comments.extend(parser.take_comments());
    parser.expect_end()?;
    Ok(ty)
}

/// Parse a view expression: like [`parse_expression`], with `<Tag>`
/// elements allowed in operand position.
pub fn parse_view(source: &str) -> ParseResult<Expr> {
    let mut parser = Parser::new(source);
    parser.scanner.set_options(ScanOptions::IN_VIEW);
    parser.skip_trivia()?;
    let mut expr = parser.expression()?;
    parser.skip_trivia()?;
    expr.push_following_comments(parser.take_comments());
    parser.expect_end()?;
    Ok(expr)
}

/// Parse a module: a sequence of top-level declarations.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn parse_module(source: &str) -> ParseResult<Module> {
    let mut parser = Parser::new(source);
    let module = parser.module()?;
    tracing::debug!(items = module.items.len(), "parsed module");
    Ok(module)
}

/// Run one grammar production over `source`, requiring it to consume all
/// input. Comments after the production are not attached.
pub fn scan_with<T>(
    source: &str,
    scan: impl FnOnce(&mut Parser<'_>) -> ParseResult<T>,
) -> ParseResult<T> {
    let mut parser = Parser::new(source);
    parser.skip_trivia()?;
    let value = scan(&mut parser)?;
    parser.skip_trivia()?;
    parser.expect_end()?;
    Ok(value)
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Parser {
            scanner: Scanner::new(source),
        }
    }

    /// Skip whitespace, newlines and comments; the comments stay pending.
    fn skip_trivia(&mut self) -> ParseResult<()> {
        self.scanner.scan_all_whitespace()?;
        Ok(())
    }

    /// Skip spaces and comments on the current line only.
    fn skip_spaces(&mut self) -> ParseResult<()> {
        self.scanner.scan_spaces()?;
        Ok(())
    }

    fn take_comments(&mut self) -> Vec<Comment> {
        self.scanner.flush_comments()
    }

    fn expect_end(&self) -> ParseResult<()> {
        if self.scanner.is_eof() {
            Ok(())
        } else {
            Err(self.scanner.unexpected("end of input"))
        }
    }

    /// Run `f` with `options` as the innermost scan options.
    fn with_options<T>(
        &mut self,
        options: ScanOptions,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        self.scanner.push_options(options);
        let result = f(self);
        self.scanner.pop_options();
        result
    }

    /// Options for a sub-expression: the construct-local flags of the
    /// enclosing construct are dropped, `IN_PIPE`/`IN_VIEW` are kept.
    fn nested_options(&self) -> ScanOptions {
        self.scanner.options() - ScanOptions::ITEM_LOCAL
    }

    /// `true` if a newline comes before the next non-trivia character.
    fn newline_ahead(&mut self) -> ParseResult<bool> {
        self.scanner.test(|s| {
            s.scan_spaces()?;
            Ok(s.is_at_newline())
        })
    }

    /// A bare name, taking pending comments as its preceding comments.
    pub fn identifier(&mut self) -> ParseResult<Identifier> {
        let comments = self.take_comments();
        let start = self.scanner.pos();
        let Some(name) = self.scanner.scan_word() else {
            return Err(self.expected(ErrorCode::E1004, "identifier"));
        };
        Ok(Identifier::new(
            name,
            Source::new(self.scanner.span_from(start)).with_preceding(comments),
        ))
    }

    /// `expected {what}, found …` with a specific code, falling back to
    /// end-of-input when the scanner is exhausted.
    #[cold]
    fn expected(&self, code: ErrorCode, what: &str) -> ParseError {
        let error = self.scanner.unexpected(what);
        if self.scanner.is_eof() {
            error
        } else {
            ParseError { code, ..error }
        }
    }

    /// Consume `close`, or report the unclosed `open` at `open_start`.
    fn expect_closing(&mut self, open: &str, close: &str, open_start: u32) -> ParseResult<()> {
        if self.scanner.scan_if_string(close) {
            return Ok(());
        }
        if self.scanner.is_eof() {
            return Err(ParseError::new(
                ErrorCode::E1003,
                format!("unclosed `{open}`"),
                extra_ir::Span::new(open_start, open_start + open.len() as u32),
            ));
        }
        Err(self.scanner.unexpected(&format!("`{close}`")))
    }
}

#[cfg(test)]
mod tests;
