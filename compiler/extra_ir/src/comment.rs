//! Comment trivia.
//!
//! Comments are not a side table: every comment the scanner sees ends up in
//! exactly one `Source` (or node-specific comment slot) of the tree, so the
//! code printer can put it back where it was.

use super::Span;
use std::fmt;

/// A source comment with its span and content.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Comment {
    /// Text between the delimiters (`--` … end of line, or `{-` … `-}`).
    pub text: String,
    /// Span covering the delimiters too.
    pub span: Span,
    pub kind: CommentKind,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum CommentKind {
    /// `-- text`
    Line,
    /// `{- text -}`
    Block,
}

impl Comment {
    #[inline]
    pub fn new(text: impl Into<String>, span: Span, kind: CommentKind) -> Self {
        Comment {
            text: text.into(),
            span,
            kind,
        }
    }

    #[inline]
    pub fn line(text: impl Into<String>, span: Span) -> Self {
        Comment::new(text, span, CommentKind::Line)
    }

    #[inline]
    pub fn block(text: impl Into<String>, span: Span) -> Self {
        Comment::new(text, span, CommentKind::Block)
    }

    /// Source text of the comment, delimiters included.
    ///
    /// Line comments do not include their terminating newline; the printer
    /// is responsible for ending the line.
    pub fn to_code(&self) -> String {
        match self.kind {
            CommentKind::Line => format!("--{}", self.text),
            CommentKind::Block => format!("{{-{}-}}", self.text),
        }
    }

    #[inline]
    pub fn is_line(&self) -> bool {
        self.kind == CommentKind::Line
    }
}

impl fmt::Debug for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {}", self.to_code(), self.span)
    }
}
