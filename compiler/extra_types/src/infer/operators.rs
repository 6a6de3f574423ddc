//! Operator inference: arithmetic, comparison, logic, access and pipes.
//!
//! Literal operands fold: when both sides are literal types the operator
//! is evaluated and the result's literal type is returned, so `1 + 2` is
//! `3`. Otherwise numeric operators propagate range bounds where they can
//! (`Int(>=0) + 1` is `Int(>=1)`).

use extra_diagnostic::ErrorCode;
use extra_ir::{Expr, ExprKind, Operator};

use super::{assume_false, assume_true, calls, enum_member_type, infer, InferResult};
use crate::error::messages;
use crate::eval::{evaluate_binary, evaluate_unary};
use crate::narrow::{falsy_type, truthy_type};
use crate::{
    can_be_assigned_to, compatible_with_both_types, property_type, resolve_type_expr, Bound,
    EvalError, LengthRange, Literal, NumberRange, StringType, Type, TypeError, TypeRuntime,
    TypeScope, Value,
};

pub(super) fn infer_operation(
    op: Operator,
    args: &[Expr],
    scope: &TypeScope,
    expected: Option<&Type>,
) -> InferResult {
    match (op, args) {
        (_, [operand]) => {
            let ty = infer(operand, scope, None)?;
            infer_unary(op, &ty)
        }
        (Operator::And, [lhs, rhs]) => {
            let lhs_ty = infer(lhs, scope, None)?;
            let rhs_ty = infer(rhs, &assume_true(lhs, scope)?, expected)?;
            Ok(compatible_with_both_types(&falsy_type(&lhs_ty), &rhs_ty))
        }
        (Operator::Or, [lhs, rhs]) => {
            let lhs_ty = infer(lhs, scope, expected)?;
            let rhs_ty = infer(rhs, &assume_false(lhs, scope)?, expected)?;
            Ok(compatible_with_both_types(&truthy_type(&lhs_ty), &rhs_ty))
        }
        (Operator::Coalesce, [lhs, rhs]) => {
            let lhs_ty = infer(lhs, scope, expected)?;
            let rhs_ty = infer(rhs, scope, expected)?;
            if lhs_ty.accepts_null() {
                Ok(compatible_with_both_types(&lhs_ty.non_null(), &rhs_ty))
            } else {
                Ok(lhs_ty)
            }
        }
        (Operator::Pipe | Operator::NullablePipe, [lhs, rhs]) => {
            let lhs_ty = infer(lhs, scope, None)?;
            let nullable = op == Operator::NullablePipe && lhs_ty.accepts_null();
            let piped = if op == Operator::NullablePipe {
                lhs_ty.non_null()
            } else {
                lhs_ty
            };
            let mut inner = scope.child();
            inner.bind_local("#", piped);
            let result = infer(rhs, &inner, expected)?;
            Ok(if nullable {
                Type::optional(result)
            } else {
                result
            })
        }
        (Operator::PropertyAccess | Operator::NullablePropertyAccess, [lhs, rhs]) => {
            let ExprKind::PropertyName(name) = &rhs.kind else {
                return Err(TypeError::new(ErrorCode::E9001, "Expected a property name"));
            };
            infer_property_access(op, lhs, name, scope)
        }
        (Operator::Call | Operator::NullableCall, [callee, arguments]) => {
            let ExprKind::Arguments(arguments) = &arguments.kind else {
                return Err(TypeError::new(ErrorCode::E9001, "Expected an argument list"));
            };
            calls::infer_call(op, callee, arguments, scope)
        }
        (Operator::Index | Operator::NullableIndex, [lhs, rhs]) => {
            let lhs_ty = infer(lhs, scope, None)?;
            let index = infer(rhs, scope, None)?;
            access(op, &lhs_ty, |receiver| index_type(receiver, &index))
                .ok_or_else(|| {
                    TypeError::new(
                        ErrorCode::E2007,
                        messages::invalid_operands(op.symbol(), &lhs_ty, &index),
                    )
                })
        }
        (Operator::Is | Operator::IsNot, [lhs, rhs]) => {
            infer(lhs, scope, None)?;
            let ExprKind::Type(ty) = &rhs.kind else {
                return Err(TypeError::new(ErrorCode::E9001, "Expected a type"));
            };
            resolve_type_expr(ty, scope)?;
            Ok(Type::Boolean)
        }
        (_, [lhs, rhs]) => {
            let lhs_ty = infer(lhs, scope, None)?;
            let rhs_ty = infer(rhs, scope, None)?;
            infer_binary(op, &lhs_ty, &rhs_ty)
        }
        _ => Err(TypeError::new(
            ErrorCode::E9001,
            format!("'{}' applied to {} operands", op.symbol(), args.len()),
        )),
    }
}

fn fold_error(error: &EvalError) -> TypeError {
    TypeError::new(ErrorCode::E2007, error.to_string())
}

fn infer_unary(op: Operator, ty: &Type) -> InferResult {
    if let Type::Literal(literal) = ty {
        let value = evaluate_unary(op, &Value::from_literal(literal)).map_err(|e| fold_error(&e))?;
        return Ok(value.type_of());
    }
    let invalid = || TypeError::new(ErrorCode::E2007, messages::invalid_operand(op.symbol(), ty));
    match op {
        Operator::Negate => match ty {
            Type::Int(range) => Ok(Type::int(range.negate())),
            Type::Float(range) => Ok(Type::float(range.negate())),
            Type::Always => Ok(Type::Always),
            _ => Err(invalid()),
        },
        Operator::Not => {
            if falsy_type(ty).is_never() {
                Ok(Type::literal_bool(false))
            } else if truthy_type(ty).is_never() {
                Ok(Type::literal_bool(true))
            } else {
                Ok(Type::Boolean)
            }
        }
        Operator::BitNot => match ty {
            Type::Int(_) | Type::Always => Ok(Type::INT),
            _ => Err(invalid()),
        },
        Operator::Stringify => Ok(Type::STRING),
        _ => Err(invalid()),
    }
}

/// Binary operators whose operands are both evaluated.
pub(super) fn infer_binary(op: Operator, lhs: &Type, rhs: &Type) -> InferResult {
    if let (Type::Literal(a), Type::Literal(b)) = (lhs, rhs) {
        let value = evaluate_binary(op, &Value::from_literal(a), &Value::from_literal(b))
            .map_err(|e| fold_error(&e))?;
        return Ok(value.type_of());
    }
    if matches!(lhs, Type::Always) || matches!(rhs, Type::Always) {
        return Ok(match op {
            _ if op.is_comparison() => Type::Boolean,
            Operator::Equal | Operator::NotEqual | Operator::Matches | Operator::NotMatches => {
                Type::Boolean
            }
            _ => Type::Always,
        });
    }
    let invalid = || {
        TypeError::new(
            ErrorCode::E2007,
            messages::invalid_operands(op.symbol(), lhs, rhs),
        )
    };
    match op {
        Operator::Equal | Operator::NotEqual => Ok(Type::Boolean),
        Operator::Matches | Operator::NotMatches => {
            let is_string = can_be_assigned_to(lhs, &Type::STRING);
            let is_regex = can_be_assigned_to(rhs, &Type::Regex);
            if is_string && is_regex {
                Ok(Type::Boolean)
            } else {
                Err(invalid())
            }
        }
        Operator::Less
        | Operator::LessEqual
        | Operator::Greater
        | Operator::GreaterEqual
        | Operator::Compare => {
            let numbers = lhs.number_range().is_some() && rhs.number_range().is_some();
            let strings = can_be_assigned_to(lhs, &Type::STRING)
                && can_be_assigned_to(rhs, &Type::STRING);
            if !(numbers || strings) {
                return Err(invalid());
            }
            Ok(if op == Operator::Compare {
                Type::int(NumberRange::between(-1.0, 1.0))
            } else {
                Type::Boolean
            })
        }
        _ if op.is_range() => {
            let (Some((_, lhs_float)), Some((_, rhs_float))) =
                (lhs.number_range(), rhs.number_range())
            else {
                return Err(invalid());
            };
            Ok(Type::range(if lhs_float || rhs_float {
                Type::FLOAT
            } else {
                Type::INT
            }))
        }
        Operator::Concat => concat(lhs, rhs).ok_or_else(invalid),
        Operator::Add if lhs.length_range().is_some() && rhs.length_range().is_some() => {
            concat(lhs, rhs).ok_or_else(invalid)
        }
        Operator::BitAnd
        | Operator::BitOr
        | Operator::BitXor
        | Operator::ShiftLeft
        | Operator::ShiftRight => match (lhs.number_range(), rhs.number_range()) {
            (Some((_, false)), Some((_, false))) => Ok(Type::INT),
            _ => Err(invalid()),
        },
        _ => arithmetic(op, lhs, rhs).ok_or_else(invalid),
    }
}

/// `++` on strings and arrays; lengths add up.
fn concat(lhs: &Type, rhs: &Type) -> Option<Type> {
    let strings = can_be_assigned_to(lhs, &Type::STRING) && can_be_assigned_to(rhs, &Type::STRING);
    if strings {
        let length = lhs.length_range()?.add(&rhs.length_range()?);
        return Some(Type::string(StringType {
            length,
            regexes: Vec::new(),
        }));
    }
    match (lhs, rhs) {
        (Type::Array(a), Type::Array(b)) => Some(Type::array_with_length(
            compatible_with_both_types(&a.element, &b.element),
            a.length.add(&b.length),
        )),
        _ => None,
    }
}

fn arithmetic(op: Operator, lhs: &Type, rhs: &Type) -> Option<Type> {
    let (a, a_float) = lhs.number_range()?;
    let (b, b_float) = rhs.number_range()?;
    let is_float = a_float || b_float;
    let number = |range: NumberRange, is_float: bool| {
        if is_float {
            Type::float(range)
        } else {
            Type::int(range)
        }
    };
    let ty = match op {
        Operator::Add => number(a.add(&b), is_float),
        Operator::Subtract => number(a.add(&b.negate()), is_float),
        Operator::Multiply => number(multiply(&a, &b), is_float),
        Operator::Divide => {
            let non_negative = non_negative(&a) && non_negative(&b);
            Type::float(if non_negative {
                NumberRange::at_least(0.0)
            } else {
                NumberRange::ANY
            })
        }
        Operator::FloorDivide => {
            let range = if non_negative(&a) && non_negative(&b) {
                NumberRange::at_least(0.0)
            } else {
                NumberRange::ANY
            };
            number(range, is_float)
        }
        // Floored remainder: the sign of the divisor, `|a % b| < |b|`.
        Operator::Modulo => {
            let limit = b
                .max
                .zip(b.min)
                .map(|(max, min)| max.value.abs().max(min.value.abs()));
            let positive = non_negative(&b);
            let negative = b.max.is_some_and(|max| max.value <= 0.0);
            let range = match (limit, positive, negative) {
                (Some(limit), true, _) => NumberRange {
                    min: Some(Bound::inclusive(0.0)),
                    max: Some(Bound::exclusive(limit)),
                },
                (Some(limit), false, true) => NumberRange {
                    min: Some(Bound::exclusive(-limit)),
                    max: Some(Bound::inclusive(0.0)),
                },
                (Some(limit), false, false) => NumberRange {
                    min: Some(Bound::exclusive(-limit)),
                    max: Some(Bound::exclusive(limit)),
                },
                (None, true, _) => NumberRange::at_least(0.0),
                (None, false, true) => NumberRange::at_most(0.0),
                (None, false, false) => NumberRange::ANY,
            };
            number(range, is_float)
        }
        Operator::Power => {
            if !is_float && non_negative(&b) {
                Type::int(if non_negative(&a) {
                    NumberRange::at_least(0.0)
                } else {
                    NumberRange::ANY
                })
            } else {
                Type::FLOAT
            }
        }
        _ => return None,
    };
    Some(ty)
}

fn non_negative(range: &NumberRange) -> bool {
    range.min.is_some_and(|min| min.value >= 0.0)
}

/// Bounds of a product when both factors are non-negative; anything
/// else is unbounded.
fn multiply(a: &NumberRange, b: &NumberRange) -> NumberRange {
    if !(non_negative(a) && non_negative(b)) {
        return NumberRange::ANY;
    }
    let min = match (a.min, b.min) {
        (Some(x), Some(y)) => x.value * y.value,
        _ => 0.0,
    };
    let max = a.max.zip(b.max).map(|(x, y)| x.value * y.value);
    NumberRange {
        min: Some(Bound::inclusive(min)),
        max: max.map(Bound::inclusive),
    }
}

/// Apply `get` through nullable access: `?.` on an optional receiver
/// yields an optional result; `.` on one is an error (returns `None`).
/// One-of receivers need the member on every variant.
fn access(op: Operator, receiver: &Type, get: impl Fn(&Type) -> Option<Type>) -> Option<Type> {
    if op.is_nullable_access() && receiver.accepts_null() {
        let inner = receiver.non_null();
        if inner.is_never() {
            return Some(Type::Null);
        }
        return access(Operator::PropertyAccess, &inner, get).map(Type::optional);
    }
    match receiver {
        Type::OneOf(_) | Type::Optional(_) => {
            let members = receiver
                .variants()
                .iter()
                .map(&get)
                .collect::<Option<Vec<_>>>()?;
            Some(Type::one_of(members))
        }
        _ => get(receiver),
    }
}

fn infer_property_access(
    op: Operator,
    lhs: &Expr,
    name: &str,
    scope: &TypeScope,
) -> InferResult {
    if let Some(ty) = namespace_member(lhs, name, scope) {
        return ty;
    }
    let receiver = infer(lhs, scope, None)?;
    access(op, &receiver, |receiver| property_type(receiver, name)).ok_or_else(|| {
        TypeError::new(ErrorCode::E2005, messages::unknown_property(&receiver, name))
    })
}

/// `Color.red` and `User.create`: members of a type name used as a value.
/// `None` when `lhs` is not a type name (or is shadowed by a local).
fn namespace_member(lhs: &Expr, name: &str, scope: &TypeScope) -> Option<InferResult> {
    let ExprKind::Reference(type_name) = &lhs.kind else {
        return None;
    };
    if scope.local_type(type_name).is_some() {
        return None;
    }
    let named = scope.named_type(type_name)?;
    let found = match &named.ty {
        Type::Enum(def) => enum_member_type(def, name),
        Type::Class(class) => class.static_prop(name).map(|prop| prop.ty.clone()),
        _ => return None,
    };
    Some(found.ok_or_else(|| {
        TypeError::new(ErrorCode::E2005, messages::unknown_property(&named.ty, name))
    }))
}

/// `receiver[index]`. Reads past a known length are `null`; reads that
/// may miss are optional.
fn index_type(receiver: &Type, index: &Type) -> Option<Type> {
    let literal_index = match index {
        Type::Literal(Literal::Int(value)) => usize::try_from(*value).ok(),
        _ => None,
    };
    let within = |length: LengthRange| literal_index.is_some_and(|i| i < length.min);
    match receiver {
        Type::Array(array) if can_be_assigned_to(index, &Type::INT) => {
            Some(if within(array.length) {
                array.element.clone()
            } else {
                Type::optional(array.element.clone())
            })
        }
        Type::Dict(dict) => match index {
            Type::Literal(Literal::String(key)) if dict.keys.contains(key) => {
                Some(dict.value.clone())
            }
            _ => Some(Type::optional(dict.value.clone())),
        },
        Type::Object(object) => match index {
            Type::Literal(Literal::String(key)) => object.named_prop(key).cloned(),
            _ => literal_index.and_then(|i| object.positional_prop(i).cloned()),
        },
        Type::String(_) | Type::Literal(Literal::String(_))
            if can_be_assigned_to(index, &Type::INT) =>
        {
            let length = receiver.length_range().unwrap_or(LengthRange::ANY);
            let character = Type::string(StringType {
                length: LengthRange::exactly(1),
                regexes: Vec::new(),
            });
            Some(if within(length) {
                character
            } else {
                Type::optional(character)
            })
        }
        Type::Always => Some(Type::Always),
        _ => None,
    }
}
