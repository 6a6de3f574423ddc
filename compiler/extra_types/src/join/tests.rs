#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::{ClassProp, FormulaArgType};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn int(min: f64, max: f64) -> Type {
    Type::int(NumberRange::between(min, max))
}

#[test]
fn test_overlapping_ranges_join_to_their_hull() {
    assert_eq!(compatible_with_both_types(&int(1.0, 9.0), &int(2.0, 10.0)), int(1.0, 10.0));
    assert_eq!(compatible_with_both_types(&int(2.0, 10.0), &int(1.0, 9.0)), int(1.0, 10.0));
}

#[test]
fn test_both_sides_of_a_comparison_join_to_int() {
    let at_least = Type::int(NumberRange::at_least(5.0));
    let at_most = Type::int(NumberRange::at_most(4.0));
    let joined = compatible_with_both_types(&at_least, &at_most);
    assert!(can_be_assigned_to(&Type::INT, &joined));
}

#[test]
fn test_special_types() {
    assert_eq!(compatible_with_both_types(&Type::Never, &Type::INT), Type::Never);
    assert_eq!(compatible_with_both_types(&Type::INT, &Type::All), Type::All);
    assert_eq!(compatible_with_both_types(&Type::Always, &Type::INT), Type::INT);
    assert_eq!(compatible_with_both_types(&Type::STRING, &Type::Always), Type::STRING);
}

#[test]
fn test_numbers() {
    assert_eq!(compatible_with_both_types(&Type::INT, &Type::FLOAT), Type::FLOAT);
    assert_eq!(
        compatible_with_both_types(&int(0.0, 5.0), &Type::literal_int(7)),
        int(0.0, 7.0)
    );
}

#[test]
fn test_literals() {
    assert_eq!(
        compatible_with_both_types(&Type::literal_bool(true), &Type::literal_bool(false)),
        Type::Boolean
    );
    assert_eq!(
        compatible_with_both_types(&Type::literal_int(1), &Type::literal_int(2)),
        int(1.0, 2.0)
    );
    assert_eq!(
        compatible_with_both_types(&Type::literal_int(1), &Type::literal_int(3)),
        Type::OneOf(vec![Type::literal_int(1), Type::literal_int(3)])
    );
    assert_eq!(
        compatible_with_both_types(&Type::literal_int(1), &Type::INT),
        Type::INT
    );
}

#[test]
fn test_unrelated_types_become_a_one_of() {
    assert_eq!(
        compatible_with_both_types(&Type::INT, &Type::STRING),
        Type::OneOf(vec![Type::INT, Type::STRING])
    );
    assert_eq!(
        compatible_with_both_types(&Type::INT, &Type::Null),
        Type::optional(Type::INT)
    );
    let optional = Type::optional(Type::INT);
    assert_eq!(compatible_with_both_types(&optional, &Type::literal_int(3)), optional);
}

#[test]
fn test_one_of_normalizes() {
    assert_eq!(Type::one_of(vec![]), Type::Never);
    assert_eq!(Type::one_of(vec![Type::Always]), Type::Always);
    assert_eq!(Type::one_of(vec![Type::INT, Type::Always]), Type::INT);
    assert_eq!(Type::one_of(vec![Type::INT, Type::All]), Type::All);
    assert_eq!(Type::one_of(vec![Type::Never, Type::STRING]), Type::STRING);
    assert_eq!(
        Type::one_of(vec![Type::Null, Type::STRING]),
        Type::Optional(Box::new(Type::STRING))
    );
    assert_eq!(
        Type::one_of(vec![
            Type::OneOf(vec![Type::INT, Type::STRING]),
            Type::literal_int(4),
            Type::Boolean,
        ]),
        Type::OneOf(vec![Type::STRING, Type::INT, Type::Boolean])
    );
}

#[test]
fn test_collections() {
    assert_eq!(
        compatible_with_both_types(&Type::array(Type::INT), &Type::array(Type::STRING)),
        Type::array(Type::OneOf(vec![Type::INT, Type::STRING]))
    );

    let both: std::collections::BTreeSet<String> =
        ["a".to_string(), "b".to_string()].into_iter().collect();
    let only_a: std::collections::BTreeSet<String> = ["a".to_string()].into_iter().collect();
    assert_eq!(
        compatible_with_both_types(
            &Type::dict_with(Type::INT, LengthRange::ANY, both),
            &Type::dict_with(Type::INT, LengthRange::ANY, only_a.clone()),
        ),
        Type::dict_with(Type::INT, LengthRange::at_least(1), only_a)
    );
}

#[test]
fn test_objects_keep_the_broader_prop() {
    let narrow = Type::object(vec![ObjectProp::named("a", Type::literal_int(1))]);
    let broad = Type::object(vec![ObjectProp::named("a", Type::INT)]);
    assert_eq!(compatible_with_both_types(&narrow, &broad), broad);
}

#[test]
fn test_classes_join_to_their_common_ancestor() {
    let human = Arc::new(ClassType::new(
        "Human",
        None,
        vec![ClassProp::new("name", Type::STRING)],
        Vec::new(),
        false,
    ));
    let student = Arc::new(ClassType::new(
        "Student",
        Some(Arc::clone(&human)),
        vec![ClassProp::new("grade", Type::INT)],
        Vec::new(),
        false,
    ));
    let pilot = Arc::new(ClassType::new(
        "Pilot",
        Some(Arc::clone(&human)),
        vec![ClassProp::new("license", Type::STRING)],
        Vec::new(),
        false,
    ));
    assert_eq!(
        compatible_with_both_types(&Type::Class(student), &Type::Class(pilot)),
        Type::Class(human)
    );
}

#[test]
fn test_formulas_merge_argument_names() {
    let lhs = Type::formula(FormulaType::new(
        vec![FormulaArgType::positional("a", Type::INT)],
        Type::INT,
    ));
    let rhs = Type::formula(FormulaType::new(
        vec![FormulaArgType::positional("b", Type::INT)],
        Type::STRING,
    ));
    assert_eq!(
        compatible_with_both_types(&lhs, &rhs),
        Type::formula(FormulaType::new(
            vec![FormulaArgType::positional("aB", Type::INT)],
            Type::OneOf(vec![Type::INT, Type::STRING]),
        ))
    );
}

fn bounded() -> impl Strategy<Value = Type> {
    (-50i64..50, 1i64..50)
        .prop_map(|(min, width)| int(min as f64, (min + width) as f64))
}

proptest! {
    #[test]
    fn prop_join_holds_both(lhs in bounded(), rhs in bounded()) {
        let joined = compatible_with_both_types(&lhs, &rhs);
        prop_assert!(can_be_assigned_to(&lhs, &joined));
        prop_assert!(can_be_assigned_to(&rhs, &joined));
    }

    #[test]
    fn prop_join_is_symmetric_for_ranges(lhs in bounded(), rhs in bounded()) {
        prop_assert_eq!(
            compatible_with_both_types(&lhs, &rhs),
            compatible_with_both_types(&rhs, &lhs)
        );
    }
}
