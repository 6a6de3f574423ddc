//! The parse error, the only failure channel of the scanner and parser.

use extra_diagnostic::{Diagnostic, ErrorCode};
use extra_ir::Span;

/// A structured parse failure: what went wrong and where.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message} at {span}")]
pub struct ParseError {
    pub code: ErrorCode,
    pub message: String,
    pub span: Span,
}

impl ParseError {
    #[cold]
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        ParseError {
            code,
            message: message.into(),
            span,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.code)
            .with_message(self.message.clone())
            .with_label(self.span, self.code.description())
    }
}

pub type ParseResult<T> = Result<T, ParseError>;
