#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::scan_with;
use extra_ir::{Identifier, Span};
use pretty_assertions::assert_eq;

type Scanned = (Vec<String>, Vec<Comment>, usize);

/// Names in a parenthesized series, its closing comments, and the number of
/// comments still pending afterwards.
fn names_with(source: &str, config: impl Fn(u32) -> SeriesConfig<'static>) -> ParseResult<Scanned> {
    scan_with(source, |p| {
        let open = p.scanner.pos();
        p.scanner.expect_string("(")?;
        let series = p.series(&config(open), Parser::identifier)?;
        let pending = p.scanner.pending_comment_count();
        let names = series.items.iter().map(Identifier::as_str).map(String::from).collect();
        Ok((names, series.closing_comments, pending))
    })
}

fn names(source: &str) -> ParseResult<Scanned> {
    names_with(source, |open| SeriesConfig::new("(", ")", open))
}

#[test]
fn test_comma_separated() {
    let (items, closing, _) = names("(a, b, c)").unwrap();
    assert_eq!(items, ["a", "b", "c"]);
    assert!(closing.is_empty());
}

#[test]
fn test_empty_series() {
    let (items, _, _) = names("(  )").unwrap();
    assert!(items.is_empty());
}

#[test]
fn test_newline_separated_with_trailing_comma() {
    let (items, _, _) = names("(\n  a\n  b,\n  c,\n)").unwrap();
    assert_eq!(items, ["a", "b", "c"]);
}

#[test]
fn test_missing_separator() {
    let error = names("(a b)").unwrap_err();
    assert_eq!(error.code, ErrorCode::E1001);
    assert!(error.message.contains("`,` or `)`"), "{}", error.message);
}

#[test]
fn test_newlines_can_be_disabled() {
    let error = names_with("(a\n b)", |open| SeriesConfig::new("(", ")", open).no_newlines())
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::E1001);
    let (items, _, _) =
        names_with("(a,\n b)", |open| SeriesConfig::new("(", ")", open).no_newlines()).unwrap();
    assert_eq!(items, ["a", "b"]);
}

#[test]
fn test_unclosed_points_at_opening_delimiter() {
    let error = names("(a, b").unwrap_err();
    assert_eq!(error.code, ErrorCode::E1003);
    assert_eq!(error.span, Span::new(0, 1));

    let error = names("(a,\n").unwrap_err();
    assert_eq!(error.code, ErrorCode::E1003);
}

#[test]
fn test_closing_comments_are_returned() {
    let (items, closing, pending) = names("(a -- last\n)").unwrap();
    assert_eq!(items, ["a"]);
    assert_eq!(closing.len(), 1);
    assert_eq!(closing[0].text, " last");
    assert_eq!(pending, 0);
}

#[test]
fn test_closing_comments_can_stay_pending() {
    let (_, closing, pending) = names_with("(a {- c -})", |open| {
        SeriesConfig::new("(", ")", open).keep_closing_comments()
    })
    .unwrap();
    assert!(closing.is_empty());
    assert_eq!(pending, 1);
}
