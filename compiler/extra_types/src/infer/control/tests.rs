#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::{get_type, NumberRange};
use extra_parse::parse_expression;
use pretty_assertions::assert_eq;

/// `x: Int(0...10)`, `n: Int?`, `s: String`, `b: Boolean`.
fn scope() -> TypeScope {
    let mut scope = TypeScope::new();
    scope.bind_local("x", Type::int(NumberRange::between(0.0, 10.0)));
    scope.bind_local("n", Type::optional(Type::INT));
    scope.bind_local("s", Type::STRING);
    scope.bind_local("b", Type::Boolean);
    scope
}

fn infer_ok(source: &str) -> Type {
    let expr = parse_expression(source).unwrap_or_else(|error| panic!("{error:?}"));
    get_type(&expr, &scope()).unwrap_or_else(|error| panic!("{source}: {error:?}"))
}

fn infer_err(source: &str) -> TypeError {
    let expr = parse_expression(source).unwrap_or_else(|error| panic!("{error:?}"));
    get_type(&expr, &scope()).unwrap_err()
}

fn int_between(min: f64, max: f64) -> Type {
    Type::int(NumberRange::between(min, max))
}

#[test]
fn test_let_bindings() {
    assert_eq!(infer_ok("let a = 1, b: Int = 2 in a + b"), Type::INT);
    assert_eq!(infer_ok("let a = 'x' in a"), Type::literal_string("x"));
    assert_eq!(infer_err("let y: String = 1 in y").code, ErrorCode::E2001);
}

#[test]
fn test_let_relationship_follows_narrowing() {
    assert_eq!(
        infer_ok("let y = x + 1 in if x >= 5 then y else null"),
        Type::optional(int_between(6.0, 11.0))
    );
}

#[test]
fn test_if_narrows_branches() {
    assert_eq!(
        infer_ok("if x >= 5 then x else null"),
        Type::optional(int_between(5.0, 10.0))
    );
    assert_eq!(
        infer_ok("if x >= 5 then null else x"),
        Type::optional(int_between(0.0, 4.0))
    );
    assert_eq!(infer_ok("if n then n else 0"), Type::INT);
    assert_eq!(
        infer_ok("if s == 'a' then s else null"),
        Type::optional(Type::literal_string("a"))
    );
}

#[test]
fn test_if_without_else_is_optional() {
    assert_eq!(infer_ok("if b then 1"), Type::optional(Type::literal_int(1)));
}

#[test]
fn test_elseif_sees_earlier_failures() {
    assert_eq!(
        infer_ok("if x < 3 then null elseif x < 7 then null else x"),
        Type::optional(int_between(7.0, 10.0))
    );
}

#[test]
fn test_switch_exhaustive_cases() {
    let source = "switch (n) {\n  case Int as i: i\n  case null: 0\n}";
    assert_eq!(infer_ok(source), Type::INT);
}

#[test]
fn test_switch_unmatched_subject_is_optional() {
    assert_eq!(
        infer_ok("switch (x) { case 0: 'zero' }"),
        Type::optional(Type::literal_string("zero"))
    );
}

#[test]
fn test_switch_range_pattern_narrows() {
    assert_eq!(
        infer_ok("switch (x) { case 0...4: x, else: null }"),
        Type::optional(int_between(0.0, 4.0))
    );
}

#[test]
fn test_switch_regex_needs_string() {
    assert_eq!(infer_err("switch (x) { case /a/: 1 }").code, ErrorCode::E2001);
}
