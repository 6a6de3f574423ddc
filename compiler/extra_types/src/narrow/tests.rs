#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use pretty_assertions::assert_eq;

fn int_or_string() -> Type {
    Type::one_of(vec![Type::INT, Type::STRING])
}

#[test]
fn test_is_picks_matching_members() {
    assert_eq!(narrow_type_is(&int_or_string(), &Type::STRING), Type::STRING);
    assert_eq!(narrow_type_is(&Type::optional(Type::INT), &Type::Null), Type::Null);
    assert_eq!(narrow_type_is(&Type::Always, &Type::INT), Type::INT);
    assert_eq!(narrow_type_is(&Type::INT, &Type::literal_int(5)), Type::literal_int(5));
    assert_eq!(narrow_type_is(&Type::STRING, &Type::INT), Type::Never);
}

#[test]
fn test_is_not_drops_covered_members() {
    assert_eq!(narrow_type_is_not(&int_or_string(), &Type::STRING), Type::INT);
    assert_eq!(narrow_type_is_not(&Type::optional(Type::INT), &Type::Null), Type::INT);
    assert_eq!(narrow_type_is_not(&Type::INT, &Type::literal_int(5)), Type::INT);
    assert_eq!(narrow_type_is_not(&Type::Always, &Type::INT), Type::Always);
}

#[test]
fn test_truthiness() {
    let maybe_bool = Type::optional(Type::Boolean);
    assert_eq!(truthy_type(&maybe_bool), Type::literal_bool(true));
    assert_eq!(
        falsy_type(&maybe_bool),
        Type::optional(Type::literal_bool(false))
    );
    assert_eq!(truthy_type(&Type::optional(Type::INT)), Type::INT);
    assert_eq!(falsy_type(&Type::optional(Type::INT)), Type::Null);
    // Zero and the empty string are truthy.
    assert_eq!(falsy_type(&Type::literal_int(0)), Type::Never);
    assert_eq!(falsy_type(&Type::literal_string("")), Type::Never);
}

#[test]
fn test_comparison_narrows_both_branches() {
    let five = Type::literal_int(5);
    let truthy = narrow_comparison(&Type::INT, Operator::GreaterEqual, &five);
    let falsy = narrow_comparison(&Type::INT, Operator::Less, &five);
    assert_eq!(truthy, Type::int(NumberRange::at_least(5.0)));
    assert_eq!(falsy, Type::int(NumberRange::at_most(4.0)));
}

#[test]
fn test_comparison_keeps_non_numeric_members() {
    let narrowed = narrow_comparison(&int_or_string(), Operator::Less, &Type::literal_int(3));
    assert_eq!(
        narrowed,
        Type::one_of(vec![Type::int(NumberRange::at_most(2.0)), Type::STRING])
    );
}

#[test]
fn test_not_equal_cuts_range_edges() {
    let digits = Type::int(NumberRange::between(0.0, 9.0));
    assert_eq!(
        narrow_comparison(&digits, Operator::NotEqual, &Type::literal_int(0)),
        Type::int(NumberRange::between(1.0, 9.0))
    );
    assert_eq!(
        narrow_comparison(&digits, Operator::NotEqual, &Type::literal_int(9)),
        Type::int(NumberRange::between(0.0, 8.0))
    );
    assert_eq!(
        narrow_comparison(&digits, Operator::NotEqual, &Type::literal_int(4)),
        digits
    );
}

#[test]
fn test_narrow_to_range() {
    let allowed = NumberRange::between(0.0, 10.0);
    assert_eq!(narrow_to_range(&Type::literal_int(12), &allowed), Type::Never);
    assert_eq!(narrow_to_range(&Type::literal_int(3), &allowed), Type::literal_int(3));
    assert_eq!(
        narrow_to_range(&Type::FLOAT, &allowed),
        Type::float(NumberRange::between(0.0, 10.0))
    );
}

#[test]
fn test_comparison_range() {
    let other = NumberRange::between(0.0, 10.0);
    assert_eq!(
        comparison_range(Operator::Less, &other),
        Some(NumberRange {
            min: None,
            max: Some(Bound::exclusive(10.0)),
        })
    );
    assert_eq!(
        comparison_range(Operator::GreaterEqual, &other),
        Some(NumberRange::at_least(0.0))
    );
    assert_eq!(comparison_range(Operator::NotEqual, &other), None);
    assert_eq!(comparison_range(Operator::Less, &NumberRange::ANY), None);
}
