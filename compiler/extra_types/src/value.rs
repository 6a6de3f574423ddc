//! Constant values, produced by [`eval`](crate::eval).

use std::fmt;

use crate::ty::format_number;
use crate::{LengthRange, Literal, NumberRange, ObjectProp, RegexPattern, Type};

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Int(i64),
    Float(f64),
    String(String),
    Regex(RegexPattern),
    Array(Vec<Value>),
    Set(Vec<Value>),
    /// Entries in insertion order.
    Dict(Vec<(Value, Value)>),
    /// Props in order; positional props have no name.
    Object(Vec<(Option<String>, Value)>),
    Range {
        range: NumberRange,
        is_float: bool,
    },
}

impl Value {
    /// `null` and `false` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Boolean(false))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(value) => Some(*value as f64),
            Value::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// The narrowest type holding exactly this value.
    pub fn type_of(&self) -> Type {
        match self {
            Value::Null => Type::Null,
            Value::Boolean(value) => Type::literal_bool(*value),
            Value::Int(value) => Type::literal_int(*value),
            Value::Float(value) => Type::literal_float(*value),
            Value::String(value) => Type::literal_string(value.clone()),
            Value::Regex(pattern) => Type::Literal(Literal::Regex(pattern.clone())),
            Value::Array(values) => Type::array_with_length(
                Type::one_of(values.iter().map(Value::type_of).collect()),
                LengthRange::exactly(values.len()),
            ),
            Value::Set(values) => Type::set_with_length(
                Type::one_of(values.iter().map(Value::type_of).collect()),
                LengthRange::exactly(values.len()),
            ),
            Value::Dict(entries) => Type::dict_with(
                Type::one_of(entries.iter().map(|(_, value)| value.type_of()).collect()),
                LengthRange::exactly(entries.len()),
                entries
                    .iter()
                    .filter_map(|(key, _)| match key {
                        Value::String(name) => Some(name.clone()),
                        _ => None,
                    })
                    .collect(),
            ),
            Value::Object(props) => Type::object(
                props
                    .iter()
                    .map(|(name, value)| ObjectProp {
                        name: name.clone(),
                        ty: value.type_of(),
                    })
                    .collect(),
            ),
            Value::Range { is_float, .. } => {
                Type::range(if *is_float { Type::FLOAT } else { Type::INT })
            }
        }
    }

    /// The value a literal type stands for.
    pub fn from_literal(literal: &Literal) -> Value {
        match literal {
            Literal::Boolean(value) => Value::Boolean(*value),
            Literal::Int(value) => Value::Int(*value),
            Literal::Float(value) => Value::Float(*value),
            Literal::String(value) => Value::String(value.clone()),
            Literal::Regex(pattern) => Value::Regex(pattern.clone()),
        }
    }

    /// Strings print without quotes; everything else as code.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::String(value) => value.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Boolean(value) => write!(f, "{value}"),
            Value::Int(value) => write!(f, "{value}"),
            Value::Float(value) => {
                if value.fract() == 0.0 && value.is_finite() {
                    write!(f, "{value:.1}")
                } else {
                    write!(f, "{value}")
                }
            }
            Value::String(value) => write!(f, "'{}'", value.replace('\'', "\\'")),
            Value::Regex(pattern) => write!(f, "/{}/{}", pattern.pattern, pattern.flags),
            Value::Array(values) => write_list(f, "[", values, "]"),
            Value::Set(values) => write_list(f, "#[", values, "]"),
            Value::Dict(entries) => {
                f.write_str("#{")?;
                for (index, (key, value)) in entries.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
            Value::Object(props) => {
                f.write_str("{")?;
                for (index, (name, value)) in props.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    match name {
                        Some(name) => write!(f, "{name}: {value}")?,
                        None => write!(f, "{value}")?,
                    }
                }
                f.write_str("}")
            }
            Value::Range { range, .. } => {
                let start = range.min.map_or(String::new(), |b| format_number(b.value));
                let stop = range.max.map_or(String::new(), |b| format_number(b.value));
                let op = match (
                    range.min.is_some_and(|b| b.exclusive),
                    range.max.is_some_and(|b| b.exclusive),
                ) {
                    (false, false) => "...",
                    (true, false) => "<..",
                    (false, true) => "..<",
                    (true, true) => "<.<",
                };
                write!(f, "{start}{op}{stop}")
            }
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, open: &str, values: &[Value], close: &str) -> fmt::Result {
    f.write_str(open)?;
    for (index, value) in values.iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{value}")?;
    }
    f.write_str(close)
}
