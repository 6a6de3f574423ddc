#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use extra_ir::CommentKind;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn test_cursor_basics() {
    let mut scanner = Scanner::new("ab€c");
    assert_eq!(scanner.current(), Some('a'));
    assert_eq!(scanner.peek(), Some('b'));
    assert_eq!(scanner.prev(), None);
    scanner.advance();
    scanner.advance();
    assert_eq!(scanner.current(), Some('€'));
    assert_eq!(scanner.prev(), Some('b'));
    scanner.advance();
    assert_eq!(scanner.pos(), 5);
    assert_eq!(scanner.remaining(), "c");
    scanner.advance();
    assert!(scanner.is_eof());
    assert_eq!(scanner.advance(), None);
}

#[test]
fn test_words_respect_boundaries() {
    let mut scanner = Scanner::new("iffy if");
    assert!(!scanner.is_at_word("if"));
    assert_eq!(scanner.peek_word(), Some("iffy"));
    assert_eq!(scanner.scan_word(), Some("iffy"));
    scanner.scan_spaces().unwrap();
    assert!(scanner.scan_if_word("if"));
    assert!(scanner.is_eof());
}

#[test]
fn test_expect_reports_what_was_found() {
    let mut scanner = Scanner::new("x");
    let error = scanner.expect_string("(").unwrap_err();
    assert_eq!(error.code, ErrorCode::E1001);
    assert_eq!(error.message, "expected `(`, found `x`");
    assert_eq!(error.span, Span::new(0, 1));

    scanner.advance();
    let error = scanner.expect_word("in").unwrap_err();
    assert_eq!(error.code, ErrorCode::E1013);
    assert_eq!(error.span, Span::point(1));
}

#[test]
fn test_scan_spaces_stops_at_newline() {
    let mut scanner = Scanner::new("  -- note\n  x");
    assert!(scanner.scan_spaces().unwrap());
    assert!(scanner.is_at_newline());
    let comments = scanner.flush_comments();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].text, " note");
    assert_eq!(comments[0].span, Span::new(2, 9));

    assert!(scanner.scan_all_whitespace().unwrap());
    assert_eq!(scanner.current(), Some('x'));
    assert!(!scanner.scan_all_whitespace().unwrap());
}

#[test]
fn test_line_comment_drops_carriage_return() {
    let mut scanner = Scanner::new("--a\r\nb");
    scanner.scan_spaces().unwrap();
    assert_eq!(scanner.flush_comments()[0].text, "a");
    assert!(scanner.is_at_newline());
}

#[test]
fn test_block_comments_nest() {
    let mut scanner = Scanner::new("{- a {- b -} c -}x");
    scanner.scan_spaces().unwrap();
    assert_eq!(scanner.current(), Some('x'));
    let comments = scanner.flush_comments();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].kind, CommentKind::Block);
    assert_eq!(comments[0].text, " a {- b -} c ");
    assert_eq!(comments[0].to_code(), "{- a {- b -} c -}");
}

#[test]
fn test_block_comment_with_dashes_before_close() {
    let mut scanner = Scanner::new("{- x --}y");
    scanner.scan_spaces().unwrap();
    assert_eq!(scanner.current(), Some('y'));
    assert_eq!(scanner.flush_comments()[0].text, " x -");
}

#[test]
fn test_unterminated_block_comment() {
    let mut scanner = Scanner::new("1 {- open {- inner -}");
    scanner.advance();
    let error = scanner.scan_spaces().unwrap_err();
    assert_eq!(error.code, ErrorCode::E1009);
    assert_eq!(error.span, Span::new(2, 4));
}

#[test]
fn test_block_comment_stays_on_the_line() {
    let mut scanner = Scanner::new("{- a\nb -} c");
    scanner.scan_spaces().unwrap();
    assert_eq!(scanner.current(), Some('c'));
}

#[test]
fn test_flush_takes_only_new_comments() {
    let mut scanner = Scanner::new("--a\n--b\n");
    scanner.scan_spaces().unwrap();
    assert_eq!(scanner.flush_comments().len(), 1);
    assert!(!scanner.has_pending_comments());
    scanner.scan_all_whitespace().unwrap();
    assert_eq!(scanner.pending_comment_count(), 1);
    let rest = scanner.flush_comments();
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0].text, "b");
    assert_eq!(scanner.comment_count(), 2);
    assert_eq!(scanner.pending_comment_count(), 0);
}

#[test]
fn test_lookahead_rewinds_position_and_comments() {
    let mut scanner = Scanner::new("{- c -} word rest");
    let word = scanner.test(|s| {
        s.scan_spaces().unwrap();
        s.scan_word()
    });
    assert_eq!(word, Some("word"));
    assert_eq!(scanner.pos(), 0);
    assert!(!scanner.has_pending_comments());
}

#[test]
fn test_lookahead_rewinds_after_error() {
    let mut scanner = Scanner::new("-- c\n x");
    let result = scanner.test(|s| {
        s.scan_all_whitespace()?;
        s.expect_string("y")
    });
    assert!(result.is_err());
    assert_eq!(scanner.pos(), 0);
    assert_eq!(scanner.comment_count(), 0);
}

#[test]
fn test_lookahead_restores_flushed_comments() {
    let mut scanner = Scanner::new("--a\n--b\nx");
    scanner.scan_spaces().unwrap();
    scanner.test(|s| {
        s.scan_all_whitespace().unwrap();
        s.flush_comments()
    });
    let comments = scanner.flush_comments();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].text, "a");
}

#[test]
fn test_attempt_commits_on_success_only() {
    let mut scanner = Scanner::new("let x");
    assert_eq!(scanner.attempt(|s| s.expect_word("in")), None);
    assert_eq!(scanner.pos(), 0);
    assert_eq!(scanner.attempt(|s| s.expect_word("let")), Some(()));
    assert_eq!(scanner.pos(), 3);
}

#[test]
fn test_option_stack() {
    let mut scanner = Scanner::new("");
    assert_eq!(scanner.options(), ScanOptions::empty());
    let result = scanner.with_options(ScanOptions::LIST_ITEMS, |s| {
        assert!(s.has_option(ScanOptions::ALLOW_SPLAT));
        s.set_options(ScanOptions::IN_PIPE);
        assert!(!s.has_option(ScanOptions::ALLOW_SPLAT));
        s.expect_string("x")
    });
    assert!(result.is_err());
    assert_eq!(scanner.options(), ScanOptions::empty());
    scanner.pop_options();
    assert_eq!(scanner.options(), ScanOptions::empty());
}

#[test]
fn test_restore_drops_pushed_options() {
    let mut scanner = Scanner::new("");
    let snapshot = scanner.snapshot();
    scanner.push_options(ScanOptions::IN_VIEW);
    scanner.restore(snapshot);
    assert!(!scanner.has_option(ScanOptions::IN_VIEW));
}

#[test]
fn test_eat_while_and_slices() {
    let mut scanner = Scanner::new("123abc");
    assert_eq!(scanner.eat_while(|c| c.is_ascii_digit()), "123");
    assert_eq!(scanner.slice_from(0), "123");
    assert_eq!(scanner.span_from(1), Span::new(1, 3));
    assert_eq!(scanner.slice(3, 99), "abc");
}

fn source_with_comments() -> impl Strategy<Value = (String, usize)> {
    let piece = prop_oneof![
        "[a-z]{1,5}".prop_map(|w| (w, 0usize)),
        "[a-z ]{0,6}".prop_map(|t| (format!("--{t}\n"), 1usize)),
        "[a-z ]{0,6}".prop_map(|t| (format!("{{-{t}-}}"), 1usize)),
        Just((" ".to_string(), 0usize)),
        Just(("\n".to_string(), 0usize)),
    ];
    prop::collection::vec(piece, 0..20).prop_map(|pieces| {
        let count = pieces.iter().map(|(_, n)| n).sum();
        let text = pieces.into_iter().map(|(t, _)| t).collect();
        (text, count)
    })
}

proptest! {
    #[test]
    fn prop_every_comment_is_flushed_once((source, count) in source_with_comments()) {
        let mut scanner = Scanner::new(&source);
        let mut flushed = Vec::new();
        loop {
            scanner.scan_all_whitespace().unwrap();
            flushed.extend(scanner.flush_comments());
            if scanner.scan_word().is_none() && scanner.advance().is_none() {
                break;
            }
        }
        prop_assert_eq!(flushed.len(), count);
        prop_assert!(flushed.windows(2).all(|w| w[0].span.end <= w[1].span.start));
    }

    #[test]
    fn prop_lookahead_leaves_no_trace((source, _) in source_with_comments(), steps in 0usize..10) {
        let mut scanner = Scanner::new(&source);
        scanner.scan_spaces().unwrap();
        let before = (scanner.snapshot(), scanner.comment_count());
        scanner.test(|s| {
            for _ in 0..steps {
                let _ = s.scan_all_whitespace();
                s.flush_comments();
                s.push_options(ScanOptions::IN_PIPE);
                if s.scan_word().is_none() {
                    s.advance();
                }
            }
        });
        prop_assert_eq!((scanner.snapshot(), scanner.comment_count()), before);
        prop_assert_eq!(scanner.options(), ScanOptions::empty());
    }
}
