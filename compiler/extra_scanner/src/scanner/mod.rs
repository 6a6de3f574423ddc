//! The character cursor.
//!
//! `Scanner` owns no grammar. It moves an offset through the source,
//! classifies characters, collects comment trivia into a buffer that the
//! parser drains with [`Scanner::flush_comments`], and keeps the option
//! stack. Speculation goes through [`Scanner::test`] and
//! [`Scanner::attempt`], which restore the offset and the comment buffer
//! exactly.

use extra_diagnostic::ErrorCode;
use extra_ir::{Comment, Span};

use crate::{ParseError, ParseResult, ScanOptions};

/// `true` for characters that may start a word (identifier or keyword).
#[inline]
pub fn is_word_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

/// `true` for characters that may continue a word.
#[inline]
pub fn is_word_char(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

#[inline]
pub fn is_space(c: char) -> bool {
    c == ' ' || c == '\t'
}

#[inline]
pub fn is_newline(c: char) -> bool {
    c == '\n' || c == '\r'
}

/// Saved cursor state; see [`Scanner::snapshot`].
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Snapshot {
    pos: usize,
    comments: usize,
    pending: usize,
    options: usize,
}

pub struct Scanner<'a> {
    source: &'a str,
    pos: usize,
    /// Every comment scanned so far, in order. `comments[pending..]` have
    /// not been handed to the parser yet.
    comments: Vec<Comment>,
    pending: usize,
    options: Vec<ScanOptions>,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Scanner {
            source,
            pos: 0,
            comments: Vec::new(),
            pending: 0,
            options: vec![ScanOptions::empty()],
        }
    }

    // Position

    #[inline]
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Current byte offset.
    #[inline]
    pub fn pos(&self) -> u32 {
        to_offset(self.pos)
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    #[inline]
    pub fn remaining(&self) -> &'a str {
        &self.source[self.pos..]
    }

    #[inline]
    pub fn current(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// The character after the current one.
    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.peek_nth(1)
    }

    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.remaining().chars().nth(n)
    }

    pub fn prev(&self) -> Option<char> {
        self.source[..self.pos].chars().next_back()
    }

    pub fn slice(&self, start: u32, end: u32) -> &'a str {
        let end = (end as usize).min(self.source.len());
        let start = (start as usize).min(end);
        &self.source[start..end]
    }

    pub fn slice_from(&self, start: u32) -> &'a str {
        self.slice(start, self.pos())
    }

    /// Span from `start` to the current offset.
    #[inline]
    pub fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.pos())
    }

    // Advancing

    pub fn advance(&mut self) -> Option<char> {
        let c = self.current()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    pub fn advance_by(&mut self, bytes: usize) {
        self.pos = (self.pos + bytes).min(self.source.len());
    }

    /// Consume characters while `pred` holds; returns the consumed text.
    pub fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        let len = self
            .remaining()
            .char_indices()
            .find(|(_, c)| !pred(*c))
            .map_or(self.source.len() - start, |(i, _)| i);
        self.pos += len;
        &self.source[start..self.pos]
    }

    #[inline]
    pub fn is_at(&self, text: &str) -> bool {
        self.remaining().starts_with(text)
    }

    /// `word` at the cursor, not followed by another word character.
    pub fn is_at_word(&self, word: &str) -> bool {
        self.is_at(word) && !self.remaining()[word.len()..].starts_with(is_word_char)
    }

    pub fn scan_if_string(&mut self, text: &str) -> bool {
        if self.is_at(text) {
            self.pos += text.len();
            true
        } else {
            false
        }
    }

    pub fn scan_if_word(&mut self, word: &str) -> bool {
        if self.is_at_word(word) {
            self.pos += word.len();
            true
        } else {
            false
        }
    }

    pub fn expect_string(&mut self, text: &str) -> ParseResult<()> {
        if self.scan_if_string(text) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("`{text}`")))
        }
    }

    pub fn expect_word(&mut self, word: &str) -> ParseResult<()> {
        if self.scan_if_word(word) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("`{word}`")))
        }
    }

    /// Consume a word (identifier or keyword) if one starts here.
    pub fn scan_word(&mut self) -> Option<&'a str> {
        if self.current().is_some_and(is_word_start) {
            Some(self.eat_while(is_word_char))
        } else {
            None
        }
    }

    /// The word at the cursor, without consuming it.
    pub fn peek_word(&self) -> Option<&'a str> {
        let rest = self.remaining();
        if !rest.starts_with(is_word_start) {
            return None;
        }
        let len = rest
            .char_indices()
            .find(|(_, c)| !is_word_char(*c))
            .map_or(rest.len(), |(i, _)| i);
        Some(&rest[..len])
    }

    // Errors

    /// Error covering the current character.
    #[cold]
    pub fn error(&self, code: ErrorCode, message: impl Into<String>) -> ParseError {
        let width = self.current().map_or(0, char::len_utf8);
        ParseError::new(code, message, Span::new(self.pos(), to_offset(self.pos + width)))
    }

    /// Error covering `start` up to the current offset.
    #[cold]
    pub fn error_from(&self, code: ErrorCode, message: impl Into<String>, start: u32) -> ParseError {
        ParseError::new(code, message, self.span_from(start))
    }

    /// "expected X, found Y" at the cursor.
    #[cold]
    pub fn unexpected(&self, expected: &str) -> ParseError {
        match self.current() {
            None => self.error(
                ErrorCode::E1013,
                format!("expected {expected}, found end of input"),
            ),
            Some(c) => self.error(
                ErrorCode::E1001,
                format!("expected {expected}, found {}", describe(c)),
            ),
        }
    }

    // Trivia

    /// Skip spaces, tabs and comments on the current line. A line comment is
    /// consumed up to, not including, its newline.
    pub fn scan_spaces(&mut self) -> ParseResult<bool> {
        let start = self.pos;
        loop {
            self.eat_while(is_space);
            if !self.scan_comment()? {
                break;
            }
        }
        Ok(self.pos != start)
    }

    /// Skip all whitespace, newlines and comments.
    pub fn scan_all_whitespace(&mut self) -> ParseResult<bool> {
        let start = self.pos;
        loop {
            self.eat_while(|c| is_space(c) || is_newline(c));
            if !self.scan_comment()? {
                break;
            }
        }
        Ok(self.pos != start)
    }

    #[inline]
    pub fn is_at_newline(&self) -> bool {
        self.current().is_some_and(is_newline)
    }

    /// Whether a comment starts at the cursor.
    pub fn is_at_comment(&self) -> bool {
        self.is_at("--") || self.is_at("{-")
    }

    /// Scan the one comment at the cursor, if any, into the pending list.
    pub fn scan_comment(&mut self) -> ParseResult<bool> {
        let start = self.pos;
        let bytes = self.source.as_bytes();
        if self.is_at("--") {
            let body = start + 2;
            let mut end = memchr::memchr(b'\n', &bytes[body..]).map_or(bytes.len(), |i| body + i);
            if end > body && bytes[end - 1] == b'\r' {
                end -= 1;
            }
            self.comments.push(Comment::line(
                &self.source[body..end],
                Span::new(to_offset(start), to_offset(end)),
            ));
            self.pos = end;
            return Ok(true);
        }
        if self.is_at("{-") {
            let mut depth = 1usize;
            let mut i = start + 2;
            while depth > 0 {
                let Some(found) = memchr::memchr2(b'{', b'-', &bytes[i..]) else {
                    self.pos = bytes.len();
                    return Err(ParseError::new(
                        ErrorCode::E1009,
                        "unterminated block comment",
                        Span::new(to_offset(start), to_offset(start + 2)),
                    ));
                };
                let j = i + found;
                match (bytes[j], bytes.get(j + 1)) {
                    (b'{', Some(b'-')) => {
                        depth += 1;
                        i = j + 2;
                    }
                    (b'-', Some(b'}')) => {
                        depth -= 1;
                        i = j + 2;
                    }
                    _ => i = j + 1,
                }
            }
            self.comments.push(Comment::block(
                &self.source[start + 2..i - 2],
                Span::new(to_offset(start), to_offset(i)),
            ));
            self.pos = i;
            return Ok(true);
        }
        Ok(false)
    }

    /// Take every comment scanned since the last flush.
    pub fn flush_comments(&mut self) -> Vec<Comment> {
        let flushed = self.comments[self.pending..].to_vec();
        self.pending = self.comments.len();
        flushed
    }

    pub fn has_pending_comments(&self) -> bool {
        self.pending < self.comments.len()
    }

    /// Total number of comments scanned so far.
    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }

    /// Comments scanned but not yet flushed to a node.
    pub fn pending_comment_count(&self) -> usize {
        self.comments.len() - self.pending
    }

    // Options

    #[inline]
    pub fn options(&self) -> ScanOptions {
        self.options.last().copied().unwrap_or_default()
    }

    #[inline]
    pub fn has_option(&self, flag: ScanOptions) -> bool {
        self.options().contains(flag)
    }

    pub fn push_options(&mut self, options: ScanOptions) {
        self.options.push(options);
    }

    pub fn pop_options(&mut self) {
        if self.options.len() > 1 {
            self.options.pop();
        }
    }

    /// Replace the options of the innermost construct.
    pub fn set_options(&mut self, options: ScanOptions) {
        if let Some(top) = self.options.last_mut() {
            *top = options;
        }
    }

    /// Run `f` with `options` pushed, popping them on every exit path.
    pub fn with_options<T>(
        &mut self,
        options: ScanOptions,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        self.push_options(options);
        let result = f(self);
        self.pop_options();
        result
    }

    // Speculation

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            pos: self.pos,
            comments: self.comments.len(),
            pending: self.pending,
            options: self.options.len(),
        }
    }

    pub fn restore(&mut self, snapshot: Snapshot) {
        self.pos = snapshot.pos;
        self.comments.truncate(snapshot.comments);
        self.pending = snapshot.pending;
        self.options.truncate(snapshot.options.max(1));
    }

    /// Run `f` against the current state and rewind afterwards, whatever
    /// `f` returned.
    pub fn test<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let snapshot = self.snapshot();
        let result = f(self);
        tracing::trace!(from = snapshot.pos, to = self.pos, "lookahead rewound");
        self.restore(snapshot);
        result
    }

    /// Run `f`; keep its progress if it succeeds, rewind if it fails.
    pub fn attempt<T>(&mut self, f: impl FnOnce(&mut Self) -> ParseResult<T>) -> Option<T> {
        let snapshot = self.snapshot();
        match f(self) {
            Ok(value) => Some(value),
            Err(error) => {
                tracing::trace!(%error, "speculative parse failed");
                self.restore(snapshot);
                None
            }
        }
    }
}

#[inline]
fn to_offset(pos: usize) -> u32 {
    u32::try_from(pos).unwrap_or(u32::MAX)
}

fn describe(c: char) -> String {
    match c {
        '\n' | '\r' => "newline".to_string(),
        c => format!("`{c}`"),
    }
}

#[cfg(test)]
mod tests;
