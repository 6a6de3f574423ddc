#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use pretty_assertions::assert_eq;

fn scanner_at(source: &str, options: ScanOptions) -> Scanner<'_> {
    let mut scanner = Scanner::new(source);
    scanner.push_options(options);
    scanner
}

#[test]
fn test_binary_operator_takes_longest_symbol() {
    let cases = [
        ("?|> f", Operator::NullablePipe, 3),
        ("** 2", Operator::Power, 2),
        ("*2", Operator::Multiply, 1),
        ("..<5", Operator::RangeExclusiveEnd, 3),
        ("!is Int", Operator::IsNot, 3),
        ("&& b", Operator::And, 2),
        ("and b", Operator::And, 3),
        ("is Int", Operator::Is, 2),
    ];
    for (source, op, len) in cases {
        assert_eq!(
            binary_operator(&Scanner::new(source)),
            Some((op, len)),
            "{source}"
        );
    }
}

#[test]
fn test_binary_operator_respects_word_boundaries() {
    assert_eq!(binary_operator(&Scanner::new("island")), None);
    assert_eq!(binary_operator(&Scanner::new("order")), None);
    assert_eq!(binary_operator(&Scanner::new("!isa")), None);
    assert_eq!(binary_operator(&Scanner::new("= 1")), None);
    assert_eq!(binary_operator(&Scanner::new(". x")), None);
}

#[test]
fn test_prefix_operators() {
    assert_eq!(
        prefix_operator(&Scanner::new("not x")),
        Some((Operator::Not, 3))
    );
    assert_eq!(prefix_operator(&Scanner::new("nothing")), None);
    assert_eq!(
        prefix_operator(&Scanner::new("!done")),
        Some((Operator::Not, 1))
    );
    assert_eq!(
        prefix_operator(&Scanner::new("-1")),
        Some((Operator::Negate, 1))
    );
    assert_eq!(
        prefix_operator(&Scanner::new("$x")),
        Some((Operator::Stringify, 1))
    );
}

#[test]
fn test_newline_continuation() {
    let list = ScanOptions::LIST_ITEMS;
    let cases = [
        ("\n  + 2", true),
        ("\n  |> # + 3", true),
        ("\n  - 3", true),
        ("\n  -x", false),
        ("\n  -3", false),
        ("\n  ~x", false),
        ("\n  2", false),
        ("\n  ...rest", false),
        ("\n  ... 5", true),
        ("\n  .name", true),
        ("\n  ?.name", true),
        ("\n  if ok", true),
        ("\n  and b", true),
        ("\n  -- comment\n  * 2", true),
        // Kwargs lists only start items in call arguments.
        ("\n  *x", true),
        ("\n]", false),
        ("\n", false),
    ];
    for (source, expected) in cases {
        let mut scanner = scanner_at(source, list);
        assert_eq!(continues_after_newline(&mut scanner).unwrap(), expected, "{source:?}");
        assert_eq!(scanner.pos(), 0);
        assert_eq!(scanner.comment_count(), 0);
    }
}

#[test]
fn test_kwargs_start_items_only_in_arguments() {
    let arguments = ScanOptions::NEWLINE_IS_SEPARATOR
        | ScanOptions::ALLOW_SPLAT
        | ScanOptions::ALLOW_KWARGS;
    let mut scanner = scanner_at("\n  *kwargs", arguments);
    assert!(!continues_after_newline(&mut scanner).unwrap());
    let mut scanner = scanner_at("\n  * 2", arguments);
    assert!(continues_after_newline(&mut scanner).unwrap());
    let mut scanner = scanner_at("\n  *kwargs", ScanOptions::LIST_ITEMS);
    assert!(continues_after_newline(&mut scanner).unwrap());
}

#[test]
fn test_spreads_and_inclusions_depend_on_context() {
    let mut scanner = scanner_at("\n...rest", ScanOptions::NEWLINE_IS_SEPARATOR);
    assert!(continues_after_newline(&mut scanner).unwrap());
    let mut scanner = scanner_at("\nif ok", ScanOptions::NEWLINE_IS_SEPARATOR);
    assert!(!continues_after_newline(&mut scanner).unwrap());
}

#[test]
fn test_named_entry_lookahead() {
    assert!(named_entry_ahead(&mut Scanner::new("name: 1")).unwrap());
    assert!(named_entry_ahead(&mut Scanner::new("name\n  : 1")).unwrap());
    assert!(!named_entry_ahead(&mut Scanner::new("name :: 1")).unwrap());
    assert!(!named_entry_ahead(&mut Scanner::new("name + 1")).unwrap());
    assert!(!named_entry_ahead(&mut Scanner::new("'a': 1")).unwrap());
}

#[test]
fn test_small_predicates() {
    assert!(is_at_type_name(&Scanner::new("Int")));
    assert!(!is_at_type_name(&Scanner::new("int")));
    assert!(is_at_open_brace(&Scanner::new("{ a }")));
    assert!(!is_at_open_brace(&Scanner::new("{- c -}")));
    assert!(is_at_assign(&Scanner::new("= 1")));
    assert!(!is_at_assign(&Scanner::new("=> 1")));
    assert!(!is_at_assign(&Scanner::new("== 1")));
    assert!(is_at_colon(&Scanner::new(": 1")));
    assert!(!is_at_colon(&Scanner::new(":: 1")));
    assert!(is_reserved("then"));
    assert!(!is_reserved("thence"));
}
