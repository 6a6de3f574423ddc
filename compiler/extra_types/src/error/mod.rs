//! Type errors.
//!
//! Type checking reports problems as values, not early exits: a call with
//! three bad arguments produces one error holding three messages, combined
//! by [`combine_error_messages`] into a single report.

use extra_diagnostic::{Diagnostic, ErrorCode};
use extra_ir::Span;
use smallvec::{smallvec, SmallVec};

pub mod messages;

const MULTIPLE_HEADER: &str = "Multiple argument errors:";

/// One or more type-checking messages with an error code and, once known,
/// the span of the offending node.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{}", combine_error_messages(&self.messages))]
pub struct TypeError {
    pub code: ErrorCode,
    pub span: Option<Span>,
    /// Almost always one message; a call with several bad arguments holds
    /// one per argument.
    messages: SmallVec<[String; 1]>,
}

impl TypeError {
    #[cold]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        TypeError {
            code,
            span: None,
            messages: smallvec![message.into()],
        }
    }

    #[cold]
    pub fn with_messages(code: ErrorCode, messages: Vec<String>) -> Self {
        TypeError {
            code,
            span: None,
            messages: SmallVec::from_vec(messages),
        }
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Attach `span` unless a more specific one is already set.
    #[must_use]
    pub fn or_span(mut self, span: Span) -> Self {
        self.span.get_or_insert(span);
        self
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// The combined message.
    pub fn message(&self) -> String {
        combine_error_messages(&self.messages)
    }

    /// Merge several errors into one; code and span come from the first.
    pub fn combine(errors: Vec<TypeError>) -> Option<TypeError> {
        let mut errors = errors.into_iter();
        let mut first = errors.next()?;
        for error in errors {
            first.messages.extend(error.messages);
        }
        Some(first)
    }

    pub fn to_diagnostic(&self, fallback: Span) -> Diagnostic {
        let span = self.span.unwrap_or(fallback);
        Diagnostic::error(self.code)
            .with_message(self.message())
            .with_label(span, self.code.description())
    }
}

/// Join messages into one report.
///
/// A single message passes through unchanged. Several become a
/// `Multiple argument errors:` list; messages that are themselves such
/// lists are flattened into it.
pub fn combine_error_messages(messages: &[String]) -> String {
    let mut flat: Vec<String> = Vec::with_capacity(messages.len());
    for message in messages {
        match message.strip_prefix(MULTIPLE_HEADER) {
            Some(list) => flat.extend(list_items(list)),
            None => flat.push(message.clone()),
        }
    }
    if flat.len() == 1 {
        return flat.remove(0);
    }
    let mut out = String::from(MULTIPLE_HEADER);
    for message in &flat {
        out.push_str("\n- ");
        out.push_str(&message.replace('\n', "\n  "));
    }
    out
}

/// Items of a rendered list: `- ` starts an item, indented lines continue it.
fn list_items(list: &str) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();
    for line in list.lines() {
        if let Some(item) = line.strip_prefix("- ") {
            items.push(item.to_string());
        } else if let (Some(continued), Some(last)) = (line.strip_prefix("  "), items.last_mut()) {
            last.push('\n');
            last.push_str(continued);
        }
    }
    items
}
