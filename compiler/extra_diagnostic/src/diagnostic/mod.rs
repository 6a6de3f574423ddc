//! Diagnostics: an error code, a message and labeled spans.

use std::fmt;

use extra_ir::Span;

use crate::span_utils::LineOffsetTable;
use crate::ErrorCode;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A span with a message; the primary label marks where the problem is.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    pub span: Span,
    pub message: String,
    pub is_primary: bool,
}

impl Label {
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Label {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Label {
            span,
            message: message.into(),
            is_primary: false,
        }
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "diagnostics should be reported or returned, not silently dropped"]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    fn new_with_severity(code: ErrorCode, severity: Severity) -> Self {
        Diagnostic {
            code,
            severity,
            message: String::new(),
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    #[cold]
    pub fn error(code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Error)
    }

    #[cold]
    pub fn warning(code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Warning)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn primary_span(&self) -> Option<Span> {
        self.labels.iter().find(|l| l.is_primary).map(|l| l.span)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Render against the source text:
    ///
    /// ```text
    /// error[E1003]: unclosed delimiter
    ///  --> input:1:5
    ///   |
    /// 1 | [1, 2
    ///   |     ^ expected `]`
    /// ```
    pub fn render(&self, path: &str, source: &str) -> String {
        let table = LineOffsetTable::build(source);
        let mut out = format!("{}[{}]: {}", self.severity, self.code, self.message);

        let mut labels: Vec<&Label> = self.labels.iter().collect();
        labels.sort_by_key(|label| (!label.is_primary, label.span.start));

        if let Some(first) = labels.first() {
            let (line, col) = table.offset_to_line_col(source, first.span.start);
            let gutter = " ".repeat(line.to_string().len());
            out.push_str(&format!("\n{gutter}--> {path}:{line}:{col}"));
            out.push_str(&format!("\n{gutter} |"));
            for label in &labels {
                let (line, col) = table.offset_to_line_col(source, label.span.start);
                let text = table.line_text(source, line);
                let (end_line, end_col) = table.offset_to_line_col(source, label.span.end);
                let width = if end_line == line {
                    (end_col.saturating_sub(col) as usize).max(1)
                } else {
                    text.chars().count().saturating_sub(col as usize - 1).max(1)
                };
                let marker = if label.is_primary { "^" } else { "-" };
                let number = line.to_string();
                let pad = " ".repeat(gutter.len() - number.len().min(gutter.len()));
                out.push_str(&format!("\n{number}{pad} | {text}"));
                out.push_str(&format!(
                    "\n{gutter} | {}{}",
                    " ".repeat(col as usize - 1),
                    marker.repeat(width)
                ));
                if !label.message.is_empty() {
                    out.push(' ');
                    out.push_str(&label.message);
                }
            }
        }

        for note in &self.notes {
            out.push_str(&format!("\n  = note: {note}"));
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)?;
        for label in &self.labels {
            let marker = if label.is_primary { "-->" } else { "   " };
            write!(f, "\n  {marker} {:?}: {}", label.span, label.message)?;
        }
        for note in &self.notes {
            write!(f, "\n  = note: {note}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
