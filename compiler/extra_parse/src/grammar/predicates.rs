//! Lookahead classification.
//!
//! These functions look at the scanner without consuming input (or, for
//! the `&mut` ones, inside a [`Scanner::test`] that rewinds). They decide
//! which scan function runs next and whether a newline ends an item.

use extra_ir::{Operator, BINARY_SYMBOLS, BINARY_WORDS, PREFIX_SYMBOLS};
use extra_scanner::{is_word_start, ParseResult, ScanOptions, Scanner};

/// Words that end an expression instead of naming a value.
const RESERVED: &[&str] = &["then", "else", "elseif", "in", "case", "and", "or", "is"];

pub(crate) fn is_reserved(word: &str) -> bool {
    RESERVED.contains(&word)
}

/// The binary operator at the cursor and its source length.
pub(crate) fn binary_operator(scanner: &Scanner<'_>) -> Option<(Operator, usize)> {
    let rest = scanner.remaining();
    for &(symbol, op) in BINARY_SYMBOLS {
        if !rest.starts_with(symbol) {
            continue;
        }
        if op == Operator::IsNot && !scanner.is_at_word(symbol) {
            continue;
        }
        return Some((op, symbol.len()));
    }
    BINARY_WORDS
        .iter()
        .find(|(word, _)| scanner.is_at_word(word))
        .map(|&(word, op)| (op, word.len()))
}

/// The prefix operator at the cursor and its source length.
pub(crate) fn prefix_operator(scanner: &Scanner<'_>) -> Option<(Operator, usize)> {
    PREFIX_SYMBOLS
        .iter()
        .find(|(symbol, _)| {
            if symbol.bytes().all(|b| b.is_ascii_alphabetic()) {
                scanner.is_at_word(symbol)
            } else {
                scanner.is_at(symbol)
            }
        })
        .map(|&(symbol, op)| (op, symbol.len()))
}

/// `.name` or `?.`: a property access that may follow whitespace. A
/// comment may sit between the `.` and the name.
pub(crate) fn is_at_property_access(scanner: &Scanner<'_>) -> bool {
    scanner.is_at("?.")
        || (scanner.is_at(".") && scanner.peek().is_some_and(is_word_start))
        || scanner.is_at(".{-")
        || scanner.is_at(".--")
}

/// Whether the line after the cursor continues the current expression.
///
/// Called with the cursor on a newline in a newline-separated context. The
/// next line continues the item if it starts with a binary operator, a
/// property access, or an inclusion `if` where those are legal. A `-`
/// followed by a non-space starts a new negative item; `-` followed by
/// whitespace is binary minus. `~`, `$` and a `...` spread start new
/// items; so does a `*` kwargs list, but only in call arguments.
pub(crate) fn continues_after_newline(scanner: &mut Scanner<'_>) -> ParseResult<bool> {
    let options = scanner.options();
    scanner.test(|s| {
        s.scan_all_whitespace()?;
        Ok(continues_line(s, options))
    })
}

fn continues_line(scanner: &Scanner<'_>, options: ScanOptions) -> bool {
    let next_is_space = |n: usize| scanner.peek_nth(n).is_some_and(char::is_whitespace);
    match scanner.current() {
        Some('-') => return next_is_space(1),
        Some('~' | '$') => return false,
        Some('*')
            if options.contains(ScanOptions::ALLOW_KWARGS)
                && scanner.peek().is_some_and(|c| !c.is_whitespace() && c != '*') =>
        {
            return false;
        }
        _ => {}
    }
    if scanner.is_at("...") {
        return !options.contains(ScanOptions::ALLOW_SPLAT) || next_is_space(3);
    }
    if is_at_property_access(scanner) {
        return true;
    }
    if options.contains(ScanOptions::ALLOW_INCLUSION) && scanner.is_at_word("if") {
        return true;
    }
    binary_operator(scanner).is_some()
}

/// `name:` ahead (newlines allowed before the colon), the start of a named
/// entry or argument. `::` does not count.
pub(crate) fn named_entry_ahead(scanner: &mut Scanner<'_>) -> ParseResult<bool> {
    scanner.test(|s| {
        if s.scan_word().is_none() {
            return Ok(false);
        }
        s.scan_all_whitespace()?;
        Ok(s.is_at(":") && !s.is_at("::"))
    })
}

/// A type name starts with an uppercase letter.
pub(crate) fn is_at_type_name(scanner: &Scanner<'_>) -> bool {
    scanner.current().is_some_and(char::is_uppercase)
}

/// `{` that opens a block rather than a `{-` comment.
pub(crate) fn is_at_open_brace(scanner: &Scanner<'_>) -> bool {
    scanner.is_at("{") && !scanner.is_at("{-")
}

/// `:` that is not part of `::`.
pub(crate) fn is_at_colon(scanner: &Scanner<'_>) -> bool {
    scanner.is_at(":") && !scanner.is_at("::")
}

/// `=` that is not `==`, `=~` or `=>`.
pub(crate) fn is_at_assign(scanner: &Scanner<'_>) -> bool {
    scanner.is_at("=") && !scanner.is_at("==") && !scanner.is_at("=~") && !scanner.is_at("=>")
}

#[cfg(test)]
mod tests;
