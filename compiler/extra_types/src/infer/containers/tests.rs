#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::BTreeSet;

use super::*;
use crate::{get_type, NumberRange};
use extra_parse::parse_expression;
use pretty_assertions::assert_eq;

/// `b: Boolean`, `s: String`, `xs: Array(Int, length: >=1)`,
/// `base: {a: 1}`.
fn scope() -> TypeScope {
    let mut scope = TypeScope::new();
    scope.bind_local("b", Type::Boolean);
    scope.bind_local("s", Type::STRING);
    scope.bind_local("xs", Type::array_with_length(Type::INT, LengthRange::at_least(1)));
    scope.bind_local(
        "base",
        Type::object(vec![ObjectProp::named("a", Type::literal_int(1))]),
    );
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

#[test]
fn test_array_elements_join() {
    assert_eq!(
        infer_ok("[1, 2]"),
        Type::array_with_length(
            Type::int(NumberRange::between(1.0, 2.0)),
            LengthRange::exactly(2)
        )
    );
    assert_eq!(
        infer_ok("[1, 'a']"),
        Type::array_with_length(
            Type::one_of(vec![Type::literal_int(1), Type::literal_string("a")]),
            LengthRange::exactly(2)
        )
    );
    assert_eq!(
        infer_ok("[]"),
        Type::array_with_length(Type::Always, LengthRange::exactly(0))
    );
}

#[test]
fn test_array_lengths() {
    // A guarded entry may be missing.
    assert_eq!(
        infer_ok("[1, 2 if b]"),
        Type::array_with_length(
            Type::int(NumberRange::between(1.0, 2.0)),
            LengthRange {
                min: 1,
                max: Some(2)
            }
        )
    );
    // A spread contributes its own length.
    assert_eq!(
        infer_ok("[...xs, 0]"),
        Type::array_with_length(Type::INT, LengthRange::at_least(2))
    );
    assert_eq!(infer_err("[...1]").code, ErrorCode::E2001);
}

#[test]
fn test_set_length_collapses() {
    assert_eq!(
        infer_ok("#[1, 1]"),
        Type::set_with_length(
            Type::literal_int(1),
            LengthRange {
                min: 1,
                max: Some(2)
            }
        )
    );
}

#[test]
fn test_dict_keys() {
    let keys = |names: &[&str]| {
        names
            .iter()
            .map(|name| (*name).to_string())
            .collect::<BTreeSet<_>>()
    };
    assert_eq!(
        infer_ok("#{a: 1, b: 'x'}"),
        Type::dict_with(
            Type::one_of(vec![Type::literal_int(1), Type::literal_string("x")]),
            LengthRange::exactly(2),
            keys(&["a", "b"])
        )
    );
    // Guarded keys are not certain.
    assert_eq!(
        infer_ok("#{a: 1, b: 2 if b}"),
        Type::dict_with(
            Type::int(NumberRange::between(1.0, 2.0)),
            LengthRange {
                min: 1,
                max: Some(2)
            },
            keys(&["a"])
        )
    );
    // A computed key has no static name.
    assert_eq!(
        infer_ok("#{[s]: 1}"),
        Type::dict_with(
            Type::literal_int(1),
            LengthRange {
                min: 0,
                max: Some(1)
            },
            BTreeSet::new()
        )
    );
}

#[test]
fn test_objects() {
    assert_eq!(
        infer_ok("{name: 'x', flag: b}"),
        Type::object(vec![
            ObjectProp::named("name", Type::literal_string("x")),
            ObjectProp::named("flag", Type::Boolean),
        ])
    );
    assert_eq!(
        infer_ok("{name: 'x', extra: 1 if b}"),
        Type::object(vec![
            ObjectProp::named("name", Type::literal_string("x")),
            ObjectProp::named("extra", Type::optional(Type::literal_int(1))),
        ])
    );
    // Later props replace spread ones.
    assert_eq!(
        infer_ok("{...base, a: 'x'}"),
        Type::object(vec![ObjectProp::named("a", Type::literal_string("x"))])
    );
    assert_eq!(infer_err("{...xs}").code, ErrorCode::E2001);
}
