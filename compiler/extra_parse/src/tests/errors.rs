#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::parse_expression;
use extra_diagnostic::ErrorCode;
use extra_ir::Span;
use pretty_assertions::assert_eq;

fn code(source: &str) -> ErrorCode {
    match parse_expression(source) {
        Ok(expr) => panic!("{source:?} parsed as {}", expr.to_lisp()),
        Err(error) => error.code,
    }
}

#[test]
fn test_error_codes() {
    let cases = [
        ("[1, 2", ErrorCode::E1003),
        ("1 +", ErrorCode::E1013),
        ("1 2", ErrorCode::E1001),
        (")", ErrorCode::E1002),
        ("'abc", ErrorCode::E1007),
        ("\"\\q\"", ErrorCode::E1008),
        ("1 {- open", ErrorCode::E1009),
        ("/a/z", ErrorCode::E1010),
        ("/(/", ErrorCode::E1010),
        ("12abc", ErrorCode::E1006),
        ("0x", ErrorCode::E1006),
        ("# + 1", ErrorCode::E1011),
    ];
    for (source, expected) in cases {
        assert_eq!(code(source), expected, "{source:?}");
    }
}

#[test]
fn test_unclosed_group_points_at_open_paren() {
    let error = parse_expression("x * (1 + 2").unwrap_err();
    assert_eq!(error.code, ErrorCode::E1003);
    assert_eq!(error.span, Span::new(4, 5));
}

#[test]
fn test_unterminated_string_points_at_quote() {
    let error = parse_expression("a ++ 'abc").unwrap_err();
    assert_eq!(error.span, Span::new(5, 6));
}

#[test]
fn test_regex_literals_reject_lookaround_and_backreferences() {
    for source in ["/(?=a)b/", "/(?<!a)b/", "/(a)\\1/"] {
        let error = parse_expression(source).unwrap_err();
        assert_eq!(error.code, ErrorCode::E1010, "{source:?}");
        assert!(error.message.starts_with("invalid regex: "), "{}", error.message);
        assert!(error.message.contains("not supported"), "{}", error.message);
    }
    assert!(parse_expression("/(?i)a[b-d]+$/g").is_ok());
}
