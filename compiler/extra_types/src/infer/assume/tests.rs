#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::{Binding, NumberRange, RegexPattern};
use extra_parse::parse_expression;
use pretty_assertions::assert_eq;

/// `x: Int(0...10)`, `y: Int(0...10)`, `n: Int?`, `s: String?`,
/// `b: Boolean?`, `v: Int | String`.
fn scope() -> TypeScope {
    let mut scope = TypeScope::new();
    scope.bind_local("x", Type::int(NumberRange::between(0.0, 10.0)));
    scope.bind_local("y", Type::int(NumberRange::between(0.0, 10.0)));
    scope.bind_local("n", Type::optional(Type::INT));
    scope.bind_local("s", Type::optional(Type::STRING));
    scope.bind_local("b", Type::optional(Type::Boolean));
    scope.bind_local("v", Type::one_of(vec![Type::INT, Type::STRING]));
    scope
}

fn when(source: &str, truthy: bool, scope: &TypeScope) -> TypeScope {
    let expr = parse_expression(source).unwrap_or_else(|error| panic!("{error:?}"));
    let narrowed = if truthy {
        assume_true(&expr, scope)
    } else {
        assume_false(&expr, scope)
    };
    narrowed.unwrap_or_else(|error| panic!("{source}: {error:?}"))
}

fn local(scope: &TypeScope, name: &str) -> Type {
    scope
        .local_type(name)
        .unwrap_or_else(|| panic!("{name} is not bound"))
}

fn int_between(min: f64, max: f64) -> Type {
    Type::int(NumberRange::between(min, max))
}

#[test]
fn test_truthiness() {
    let base = scope();
    assert_eq!(local(&when("n", true, &base), "n"), Type::INT);
    assert_eq!(local(&when("n", false, &base), "n"), Type::Null);
    assert_eq!(local(&when("b", true, &base), "b"), Type::literal_bool(true));
    assert_eq!(
        local(&when("b", false, &base), "b"),
        Type::optional(Type::literal_bool(false))
    );
    assert_eq!(local(&when("not n", true, &base), "n"), Type::Null);
}

#[test]
fn test_and_narrows_both_sides() {
    let inner = when("n and x >= 5", true, &scope());
    assert_eq!(local(&inner, "n"), Type::INT);
    assert_eq!(local(&inner, "x"), int_between(5.0, 10.0));
}

#[test]
fn test_or_keeps_common_narrowing() {
    let base = scope();
    let inner = when("x == 1 or x == 2", true, &base);
    assert_eq!(local(&inner, "x"), int_between(1.0, 2.0));

    // Only one side mentions `s`, so it stays as it was.
    let inner = when("n or s", true, &base);
    assert_eq!(local(&inner, "s"), Type::optional(Type::STRING));

    let neither = when("n or b", false, &base);
    assert_eq!(local(&neither, "n"), Type::Null);
    assert_eq!(
        local(&neither, "b"),
        Type::optional(Type::literal_bool(false))
    );
}

#[test]
fn test_type_tests() {
    let base = scope();
    assert_eq!(local(&when("v is String", true, &base), "v"), Type::STRING);
    assert_eq!(local(&when("v is String", false, &base), "v"), Type::INT);
    assert_eq!(local(&when("v !is String", true, &base), "v"), Type::INT);
    assert_eq!(local(&when("n == null", true, &base), "n"), Type::Null);
    assert_eq!(local(&when("n != null", true, &base), "n"), Type::INT);
}

#[test]
fn test_regex_match() {
    let base = scope();
    assert_eq!(
        local(&when("s =~ /^a/", true, &base), "s"),
        Type::string(StringType {
            length: LengthRange::ANY,
            regexes: vec![RegexPattern::new("^a", "")],
        })
    );
    assert_eq!(
        local(&when("s =~ /^a/", false, &base), "s"),
        Type::optional(Type::STRING)
    );
}

#[test]
fn test_comparisons() {
    let base = scope();
    assert_eq!(local(&when("x >= 5", true, &base), "x"), int_between(5.0, 10.0));
    assert_eq!(local(&when("x >= 5", false, &base), "x"), int_between(0.0, 4.0));
    // A literal on the left narrows the reference on the right.
    assert_eq!(local(&when("3 < x", true, &base), "x"), int_between(4.0, 10.0));
}

#[test]
fn test_comparison_between_references_is_remembered() {
    let base = scope();
    let ordered = when("y < x", true, &base);
    assert_eq!(local(&ordered, "y"), int_between(0.0, 9.0));
    assert_eq!(local(&ordered, "x"), int_between(1.0, 10.0));

    let raised = when("y >= 3", true, &ordered);
    assert_eq!(local(&raised, "y"), int_between(3.0, 9.0));
    assert_eq!(local(&raised, "x"), int_between(4.0, 10.0));
}

#[test]
fn test_relationship_formula() {
    let scope = scope();
    let x = Binding::Local("x".to_string());
    let id = scope.binding_id(&x).unwrap();
    let formula = |source: &str| relationship_formula(&parse_expression(source).unwrap(), &scope);

    assert_eq!(formula("3"), Some(RelationshipFormula::Value(3.0)));
    assert_eq!(formula("-4"), Some(RelationshipFormula::Value(-4.0)));
    assert_eq!(
        formula("x + 2"),
        Some(RelationshipFormula::Reference {
            binding: x.clone(),
            id,
            offset: 2.0,
        })
    );
    assert_eq!(
        formula("1 + x - 3"),
        Some(RelationshipFormula::Reference {
            binding: x,
            id,
            offset: -2.0,
        })
    );
    assert_eq!(formula("x * 2"), None);
    assert_eq!(formula("x + y"), None);
    assert_eq!(formula("unknown"), None);
}
