//! Narrowing: what a value's type must be once a test is known to hold,
//! or known to fail.
//!
//! `narrow_type_is` and `narrow_type_is_not` answer type assertions
//! (`x is String`); the helpers below answer truthiness and numeric
//! comparisons (`x >= 5`).

use extra_ir::Operator;

use crate::{can_be_assigned_to, Bound, Literal, NumberRange, Type};

/// The type of a `test` value once `value is assertion` holds.
///
/// Distributes over one-of types on both sides. A member assignable to the
/// assertion becomes the assertion; an assertion assignable to the member
/// is a true subtype and is kept; anything else cannot hold and drops out.
pub fn narrow_type_is(test: &Type, assertion: &Type) -> Type {
    match (test, assertion) {
        (Type::Always, _) => assertion.clone(),
        (Type::OneOf(_) | Type::Optional(_), _) => Type::one_of(
            test.variants()
                .iter()
                .map(|member| narrow_type_is(member, assertion))
                .collect(),
        ),
        (_, Type::OneOf(_) | Type::Optional(_)) => Type::one_of(
            assertion
                .variants()
                .iter()
                .map(|member| narrow_type_is(test, member))
                .collect(),
        ),
        _ if can_be_assigned_to(test, assertion) || can_be_assigned_to(assertion, test) => {
            assertion.clone()
        }
        _ => Type::Never,
    }
}

/// The type of a `test` value once `value is assertion` is known to fail.
///
/// Members the assertion fully covers drop out; the rest are kept as they
/// are.
pub fn narrow_type_is_not(test: &Type, assertion: &Type) -> Type {
    match test {
        Type::Always => Type::Always,
        Type::OneOf(_) | Type::Optional(_) => Type::one_of(
            test.variants()
                .iter()
                .map(|member| narrow_type_is_not(member, assertion))
                .collect(),
        ),
        _ if can_be_assigned_to(test, assertion) => Type::Never,
        _ => test.clone(),
    }
}

/// The part of `ty` that is truthy. `null` and `false` are the only falsy
/// values.
pub(crate) fn truthy_type(ty: &Type) -> Type {
    Type::one_of(
        ty.variants()
            .into_iter()
            .map(|member| match member {
                Type::Null | Type::Literal(Literal::Boolean(false)) => Type::Never,
                Type::Boolean => Type::literal_bool(true),
                other => other,
            })
            .collect(),
    )
}

/// The part of `ty` that is falsy.
pub(crate) fn falsy_type(ty: &Type) -> Type {
    Type::one_of(
        ty.variants()
            .into_iter()
            .map(|member| match member {
                Type::Null | Type::Literal(Literal::Boolean(false)) | Type::Always => member,
                Type::Boolean => Type::literal_bool(false),
                _ => Type::Never,
            })
            .collect(),
    )
}

/// Narrow the numeric members of `ty` to the values satisfying
/// `value <op> other`, where `other` is numeric. Other members are kept.
pub(crate) fn narrow_comparison(ty: &Type, op: Operator, other: &Type) -> Type {
    let Some((other_range, _)) = other.number_range() else {
        return ty.clone();
    };
    let Some(allowed) = comparison_range(op, &other_range) else {
        return narrow_not_equal(ty, op, other);
    };
    narrow_to_range(ty, &allowed)
}

/// Keep only the numeric values of `ty` that fall inside `allowed`.
pub(crate) fn narrow_to_range(ty: &Type, allowed: &NumberRange) -> Type {
    Type::one_of(
        ty.variants()
            .into_iter()
            .map(|member| match member {
                Type::Int(range) => Type::int(range.intersect(allowed)),
                Type::Float(range) => Type::float(range.intersect(allowed)),
                Type::Literal(literal)
                    if literal
                        .as_f64()
                        .is_some_and(|value| !allowed.contains_value(value)) =>
                {
                    Type::Never
                }
                other => other,
            })
            .collect(),
    )
}

/// The values `x` may take when `x <op> y` holds for some `y` in `other`.
///
/// For `x < y` that is everything below the largest possible `y`; `==`
/// narrows to `other` itself. `!=` says nothing about a range.
pub(crate) fn comparison_range(op: Operator, other: &NumberRange) -> Option<NumberRange> {
    let range = match op {
        Operator::Equal => *other,
        Operator::Less | Operator::LessEqual => {
            let bound = other.max?;
            let exclusive = op == Operator::Less || bound.exclusive;
            NumberRange {
                min: None,
                max: Some(Bound {
                    value: bound.value,
                    exclusive,
                }),
            }
        }
        Operator::Greater | Operator::GreaterEqual => {
            let bound = other.min?;
            let exclusive = op == Operator::Greater || bound.exclusive;
            NumberRange {
                min: Some(Bound {
                    value: bound.value,
                    exclusive,
                }),
                max: None,
            }
        }
        _ => return None,
    };
    Some(range)
}

/// `x != value`: only an exact literal on the edge of a range can be cut.
fn narrow_not_equal(ty: &Type, op: Operator, other: &Type) -> Type {
    if op != Operator::NotEqual {
        return ty.clone();
    }
    let Type::Literal(literal) = other else {
        return ty.clone();
    };
    let Some(value) = literal.as_f64() else {
        return ty.clone();
    };
    Type::one_of(
        ty.variants()
            .into_iter()
            .map(|member| match member {
                Type::Int(mut range) => {
                    if range.min.is_some_and(|min| min.value == value && !min.exclusive) {
                        range.min = Some(Bound::inclusive(value + 1.0));
                    }
                    if range.max.is_some_and(|max| max.value == value && !max.exclusive) {
                        range.max = Some(Bound::inclusive(value - 1.0));
                    }
                    Type::int(range)
                }
                Type::Literal(own) if own.as_f64() == Some(value) => Type::Never,
                other => other,
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests;
