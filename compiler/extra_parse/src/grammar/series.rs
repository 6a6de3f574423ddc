//! Delimited, separated lists.
//!
//! Every bracketed list in the grammar (containers, call arguments, formula
//! arguments, type arguments, generics, class and enum bodies) goes through
//! [`Parser::series`]: items are separated by `,` and, unless disabled, by
//! newlines. A trailing separator is allowed. Comments in front of the
//! closing delimiter are returned separately so the caller can keep them.

use extra_diagnostic::ErrorCode;
use extra_ir::Comment;

use crate::{ParseError, ParseResult, Parser};

/// How a series is delimited.
#[derive(Copy, Clone, Debug)]
pub(crate) struct SeriesConfig<'s> {
    pub open: &'s str,
    pub close: &'s str,
    /// Offset of the opening delimiter, for unclosed-delimiter errors.
    pub open_start: u32,
    pub newline_separates: bool,
    /// Leave comments before the closing delimiter pending instead of
    /// returning them.
    pub keep_closing_comments: bool,
}

impl<'s> SeriesConfig<'s> {
    pub fn new(open: &'s str, close: &'s str, open_start: u32) -> Self {
        SeriesConfig {
            open,
            close,
            open_start,
            newline_separates: true,
            keep_closing_comments: false,
        }
    }

    #[must_use]
    pub fn no_newlines(mut self) -> Self {
        self.newline_separates = false;
        self
    }

    #[must_use]
    pub fn keep_closing_comments(mut self) -> Self {
        self.keep_closing_comments = true;
        self
    }
}

#[derive(Debug)]
pub(crate) struct Series<T> {
    pub items: Vec<T>,
    /// Comments between the last item and the closing delimiter.
    pub closing_comments: Vec<Comment>,
}

impl Parser<'_> {
    /// Parse items until `config.close`, with the opening delimiter
    /// already consumed. Consumes the closing delimiter.
    pub(crate) fn series<T>(
        &mut self,
        config: &SeriesConfig<'_>,
        mut item: impl FnMut(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<Series<T>> {
        let mut items = Vec::new();
        loop {
            self.skip_trivia()?;
            if self.scanner.is_at(config.close) {
                let closing_comments = if config.keep_closing_comments {
                    Vec::new()
                } else {
                    self.take_comments()
                };
                self.scanner.advance_by(config.close.len());
                return Ok(Series {
                    items,
                    closing_comments,
                });
            }
            if self.scanner.is_eof() {
                return Err(self.unclosed(config));
            }
            items.push(item(self)?);

            self.skip_spaces()?;
            let newline = self.scanner.is_at_newline();
            self.skip_trivia()?;
            if self.scanner.scan_if_string(",") || self.scanner.is_at(config.close) {
                continue;
            }
            if self.scanner.is_eof() {
                return Err(self.unclosed(config));
            }
            if !(newline && config.newline_separates) {
                return Err(self.expected(
                    ErrorCode::E1001,
                    &format!("`,` or `{}`", config.close),
                ));
            }
        }
    }

    #[cold]
    fn unclosed(&self, config: &SeriesConfig<'_>) -> ParseError {
        ParseError::new(
            ErrorCode::E1003,
            format!("unclosed `{}`", config.open),
            extra_ir::Span::new(
                config.open_start,
                config.open_start + config.open.len() as u32,
            ),
        )
    }
}

#[cfg(test)]
mod tests;
