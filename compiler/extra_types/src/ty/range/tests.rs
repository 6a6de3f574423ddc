#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn test_int_bounds_become_inclusive() {
    let below_five = NumberRange::from_comparison(Operator::Less, 5.0).unwrap();
    assert_eq!(below_five.to_int(), NumberRange::at_most(4.0));
    let above_half = NumberRange::from_comparison(Operator::Greater, 0.5).unwrap();
    assert_eq!(above_half.to_int(), NumberRange::at_least(1.0));
}

#[test]
fn test_empty_and_single_value() {
    assert!(NumberRange::between(3.0, 1.0).is_empty());
    let touching = NumberRange {
        min: Some(Bound::exclusive(1.0)),
        max: Some(Bound::inclusive(1.0)),
    };
    assert!(touching.is_empty());
    assert_eq!(NumberRange::exactly(2.0).single_value(), Some(2.0));
    assert_eq!(NumberRange::between(1.0, 2.0).single_value(), None);
}

#[test]
fn test_contains_respects_exclusive_bounds() {
    let range = NumberRange::from_range_operator(Operator::RangeExclusiveEnd, 0.0, 5.0).unwrap();
    assert!(range.contains_value(0.0));
    assert!(range.contains_value(4.5));
    assert!(!range.contains_value(5.0));
    assert!(NumberRange::ANY.contains(&range));
    assert!(!range.contains(&NumberRange::between(0.0, 5.0)));
}

#[test]
fn test_hull_and_intersect() {
    let a = NumberRange::between(1.0, 9.0);
    let b = NumberRange::between(2.0, 10.0);
    assert_eq!(a.hull(&b), NumberRange::between(1.0, 10.0));
    assert_eq!(b.hull(&a), NumberRange::between(1.0, 10.0));
    assert_eq!(a.intersect(&b), NumberRange::between(2.0, 9.0));
    assert_eq!(a.hull(&NumberRange::at_least(0.0)), NumberRange::at_least(0.0));
}

#[test]
fn test_arithmetic() {
    let range = NumberRange::between(1.0, 3.0);
    assert_eq!(range.shift(2.0), NumberRange::between(3.0, 5.0));
    assert_eq!(range.negate(), NumberRange::between(-3.0, -1.0));
    assert_eq!(
        range.add(&NumberRange::at_least(10.0)),
        NumberRange::at_least(11.0)
    );
}

#[test]
fn test_type_args_spelling() {
    assert_eq!(NumberRange::ANY.type_args(), None);
    assert_eq!(NumberRange::at_least(0.0).type_args().as_deref(), Some(">=0"));
    assert_eq!(
        NumberRange::from_comparison(Operator::Less, 1.5)
            .unwrap()
            .type_args()
            .as_deref(),
        Some("<1.5")
    );
    assert_eq!(
        NumberRange::between(1.0, 10.0).type_args().as_deref(),
        Some("1...10")
    );
    let half_open = NumberRange::from_range_operator(Operator::RangeExclusiveEnd, 0.0, 5.0).unwrap();
    assert_eq!(half_open.type_args().as_deref(), Some("0..<5"));
}

#[test]
fn test_length_ranges() {
    assert!(LengthRange::ANY.contains(&LengthRange::exactly(3)));
    assert!(!LengthRange::at_least(1).contains_length(0));
    assert_eq!(
        LengthRange::exactly(2).add(&LengthRange::at_least(1)),
        LengthRange::at_least(3)
    );
    assert_eq!(
        LengthRange::exactly(1).hull(&LengthRange::exactly(4)),
        LengthRange {
            min: 1,
            max: Some(4)
        }
    );
    assert_eq!(LengthRange::at_least(1).type_arg().as_deref(), Some("length: >=1"));
    assert_eq!(LengthRange::exactly(2).type_arg().as_deref(), Some("length: =2"));
    assert_eq!(LengthRange::ANY.type_arg(), None);
}

#[test]
fn test_length_from_number_range_drops_negatives() {
    let range = NumberRange::from_comparison(Operator::Less, 3.0).unwrap();
    assert_eq!(
        LengthRange::from_number_range(&range),
        LengthRange {
            min: 0,
            max: Some(2)
        }
    );
    assert!(LengthRange::from_number_range(&NumberRange::at_most(-1.0)).is_empty());
}

fn bounded() -> impl Strategy<Value = NumberRange> {
    (-100i32..100, 0i32..50).prop_map(|(min, width)| {
        NumberRange::between(f64::from(min), f64::from(min + width))
    })
}

proptest! {
    #[test]
    fn prop_hull_contains_both(a in bounded(), b in bounded()) {
        let hull = a.hull(&b);
        prop_assert!(hull.contains(&a));
        prop_assert!(hull.contains(&b));
        prop_assert_eq!(hull, b.hull(&a));
    }

    #[test]
    fn prop_intersection_is_contained(a in bounded(), b in bounded()) {
        let both = a.intersect(&b);
        prop_assert!(a.contains(&both));
        prop_assert!(b.contains(&both));
    }
}
