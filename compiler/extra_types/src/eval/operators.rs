//! Operator implementations for constant evaluation.
//!
//! The value set is closed, so dispatch is a match on the operand pair
//! rather than per-type trait objects.

use std::cmp::Ordering;

use extra_ir::Operator;

use super::EvalError;
use crate::{NumberRange, Value};

type EvalResult = Result<Value, EvalError>;

#[inline]
fn checked_arith(result: Option<i64>, op: Operator) -> EvalResult {
    result.map(Value::Int).ok_or(EvalError::Overflow(op.symbol()))
}

fn invalid(op: Operator, left: &Value, right: &Value) -> EvalError {
    EvalError::InvalidOperands {
        op: op.symbol(),
        lhs: left.to_string(),
        rhs: right.to_string(),
    }
}

pub(crate) fn evaluate_unary(op: Operator, value: &Value) -> EvalResult {
    match (op, value) {
        (Operator::Negate, Value::Int(value)) => checked_arith(value.checked_neg(), op),
        (Operator::Negate, Value::Float(value)) => Ok(Value::Float(-value)),
        (Operator::Not, value) => Ok(Value::Boolean(!value.is_truthy())),
        (Operator::BitNot, Value::Int(value)) => Ok(Value::Int(!value)),
        (Operator::Stringify, value) => Ok(Value::String(value.to_display_string())),
        _ => Err(EvalError::InvalidOperand {
            op: op.symbol(),
            operand: value.to_string(),
        }),
    }
}

/// Evaluate a binary operator whose operands are both known. The
/// short-circuiting operators (`and`, `or`, `??`) and the access operators
/// are handled by the caller.
pub(crate) fn evaluate_binary(op: Operator, left: &Value, right: &Value) -> EvalResult {
    match op {
        Operator::Equal => return Ok(Value::Boolean(values_equal(left, right))),
        Operator::NotEqual => return Ok(Value::Boolean(!values_equal(left, right))),
        _ => {}
    }
    if op.is_range() {
        return eval_range(op, left, right);
    }
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => eval_int_binary(*a, *b, op),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            match (left.as_f64(), right.as_f64()) {
                (Some(a), Some(b)) => eval_float_binary(a, b, op),
                _ => Err(invalid(op, left, right)),
            }
        }
        (Value::String(a), Value::String(b)) => eval_string_binary(a, b, op),
        (Value::String(text), Value::Regex(pattern)) => {
            let regex = pattern
                .compile()
                .map_err(|error| EvalError::InvalidRegex(error.to_string()))?;
            match op {
                Operator::Matches => Ok(Value::Boolean(regex.is_match(text))),
                Operator::NotMatches => Ok(Value::Boolean(!regex.is_match(text))),
                _ => Err(invalid(op, left, right)),
            }
        }
        (Value::Array(a), Value::Array(b)) if op == Operator::Concat => {
            Ok(Value::Array(a.iter().chain(b).cloned().collect()))
        }
        _ => Err(invalid(op, left, right)),
    }
}

fn eval_int_binary(a: i64, b: i64, op: Operator) -> EvalResult {
    match op {
        Operator::Add => checked_arith(a.checked_add(b), op),
        Operator::Subtract => checked_arith(a.checked_sub(b), op),
        Operator::Multiply => checked_arith(a.checked_mul(b), op),
        Operator::Divide => {
            if b == 0 {
                Err(EvalError::DivisionByZero)
            } else {
                Ok(Value::Float(a as f64 / b as f64))
            }
        }
        Operator::FloorDivide => {
            if b == 0 {
                Err(EvalError::DivisionByZero)
            } else {
                checked_arith(floor_div(a, b), op)
            }
        }
        Operator::Modulo => {
            if b == 0 {
                Err(EvalError::DivisionByZero)
            } else {
                checked_arith(floor_rem(a, b), op)
            }
        }
        Operator::Power => match u32::try_from(b) {
            Ok(exponent) => checked_arith(a.checked_pow(exponent), op),
            Err(_) => Ok(Value::Float((a as f64).powf(b as f64))),
        },
        Operator::BitAnd => Ok(Value::Int(a & b)),
        Operator::BitOr => Ok(Value::Int(a | b)),
        Operator::BitXor => Ok(Value::Int(a ^ b)),
        Operator::ShiftLeft => {
            let shift = u32::try_from(b).map_err(|_| EvalError::Overflow(op.symbol()))?;
            checked_arith(a.checked_shl(shift), op)
        }
        Operator::ShiftRight => {
            let shift = u32::try_from(b).map_err(|_| EvalError::Overflow(op.symbol()))?;
            checked_arith(a.checked_shr(shift), op)
        }
        _ => compare(a.cmp(&b), op).ok_or_else(|| invalid(op, &Value::Int(a), &Value::Int(b))),
    }
}

/// Quotient rounded toward negative infinity, as the float path does.
fn floor_div(a: i64, b: i64) -> Option<i64> {
    let quotient = a.checked_div(b)?;
    if a % b != 0 && (a < 0) != (b < 0) {
        Some(quotient - 1)
    } else {
        Some(quotient)
    }
}

/// Remainder with the sign of the divisor, so `a == b * (a // b) + a % b`.
fn floor_rem(a: i64, b: i64) -> Option<i64> {
    if b == -1 {
        return Some(0);
    }
    let rem = a.checked_rem(b)?;
    if rem != 0 && (rem < 0) != (b < 0) {
        Some(rem + b)
    } else {
        Some(rem)
    }
}

fn eval_float_binary(a: f64, b: f64, op: Operator) -> EvalResult {
    let value = match op {
        Operator::Add => a + b,
        Operator::Subtract => a - b,
        Operator::Multiply => a * b,
        Operator::Divide | Operator::FloorDivide | Operator::Modulo if b == 0.0 => {
            return Err(EvalError::DivisionByZero);
        }
        Operator::Divide => a / b,
        Operator::FloorDivide => (a / b).floor(),
        Operator::Modulo => {
            let rem = a % b;
            if rem != 0.0 && (rem < 0.0) != (b < 0.0) {
                rem + b
            } else {
                rem
            }
        }
        Operator::Power => a.powf(b),
        _ => {
            let ordering = a.partial_cmp(&b);
            return ordering
                .and_then(|ordering| compare(ordering, op))
                .ok_or_else(|| invalid(op, &Value::Float(a), &Value::Float(b)));
        }
    };
    Ok(Value::Float(value))
}

fn eval_string_binary(a: &str, b: &str, op: Operator) -> EvalResult {
    match op {
        Operator::Concat | Operator::Add => Ok(Value::String(format!("{a}{b}"))),
        _ => compare(a.cmp(b), op).ok_or_else(|| {
            invalid(op, &Value::String(a.to_string()), &Value::String(b.to_string()))
        }),
    }
}

fn compare(ordering: Ordering, op: Operator) -> Option<Value> {
    let result = match op {
        Operator::Less => ordering == Ordering::Less,
        Operator::LessEqual => ordering != Ordering::Greater,
        Operator::Greater => ordering == Ordering::Greater,
        Operator::GreaterEqual => ordering != Ordering::Less,
        Operator::Compare => {
            return Some(Value::Int(match ordering {
                Ordering::Less => -1,
                Ordering::Equal => 0,
                Ordering::Greater => 1,
            }));
        }
        _ => return None,
    };
    Some(Value::Boolean(result))
}

fn eval_range(op: Operator, left: &Value, right: &Value) -> EvalResult {
    let (Some(start), Some(stop)) = (left.as_f64(), right.as_f64()) else {
        return Err(invalid(op, left, right));
    };
    let range = NumberRange::from_range_operator(op, start, stop)
        .ok_or_else(|| invalid(op, left, right))?;
    Ok(Value::Range {
        range,
        is_float: matches!(left, Value::Float(_)) || matches!(right, Value::Float(_)),
    })
}

/// Structural equality where `1 == 1.0`.
pub(crate) fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            left.as_f64() == right.as_f64()
        }
        (Value::Array(a), Value::Array(b)) | (Value::Set(a), Value::Set(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| values_equal(a, b))
        }
        _ => left == right,
    }
}
