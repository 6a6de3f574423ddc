//! Built-in members of the primitive and container types.
//!
//! Each table is a function of the receiver, so element types and
//! narrowed lengths flow into member signatures (`xs.first` on
//! `Array(Int, length: >=1)` is `Int`, not `Int?`).

use std::sync::Arc;

use crate::ty::FormulaArgKind;
use crate::{
    FormulaArgType, FormulaType, GenericType, LengthRange, Literal, NumberRange, StringType, Type,
};

/// The type of `receiver.name`, or `None` if the receiver has no such
/// member.
pub fn property_type(receiver: &Type, name: &str) -> Option<Type> {
    match receiver {
        Type::String(narrowed) => string_property(narrowed.length, name),
        Type::Int(_) => number_property(false, name),
        Type::Float(_) => number_property(true, name),
        Type::Boolean => None,
        Type::Array(array) => array_property(&array.element, array.length, name),
        Type::Set(set) => set_property(&set.element, set.length, name),
        Type::Dict(dict) => {
            dict_property(&dict.value, dict.length, name).or_else(|| {
                // `dict.key` reads a string key; it is only certain for
                // keys known to be present.
                Some(if dict.keys.contains(name) {
                    dict.value.clone()
                } else {
                    Type::optional(dict.value.clone())
                })
            })
        }
        Type::Range(element) => range_property(element, name),
        Type::Object(object) => object.named_prop(name).cloned(),
        Type::Class(class) => class.prop(name).map(|prop| prop.ty.clone()),
        Type::Literal(literal) => literal_property(literal, name),
        Type::Always => Some(Type::Always),
        _ => None,
    }
}

fn literal_property(literal: &Literal, name: &str) -> Option<Type> {
    match (literal, name) {
        (Literal::String(value), "length") => i64::try_from(value.chars().count())
            .ok()
            .map(Type::literal_int),
        (Literal::String(value), "isEmpty") => Some(Type::literal_bool(value.is_empty())),
        (Literal::Int(value), "isEven") => Some(Type::literal_bool(value % 2 == 0)),
        (Literal::Int(value), "abs") => value.checked_abs().map(Type::literal_int),
        (Literal::Float(value), "abs") => Some(Type::literal_float(value.abs())),
        _ => property_type(&literal.base_type(), name),
    }
}

fn method(args: Vec<FormulaArgType>, returns: Type) -> Type {
    Type::formula(FormulaType::new(args, returns))
}

fn length_type(length: LengthRange) -> Type {
    Type::int(length.to_number_range())
}

fn string_property(length: LengthRange, name: &str) -> Option<Type> {
    let ty = match name {
        "length" => length_type(length),
        "isEmpty" => Type::Boolean,
        "uppercase" | "lowercase" => Type::string(StringType {
            length,
            regexes: Vec::new(),
        }),
        "trim" => Type::STRING,
        "chars" => Type::array_with_length(
            Type::string(StringType {
                length: LengthRange::exactly(1),
                regexes: Vec::new(),
            }),
            length,
        ),
        "split" => method(
            vec![FormulaArgType::positional("separator", Type::STRING)],
            Type::array_with_length(Type::STRING, LengthRange::at_least(1)),
        ),
        "startsWith" | "endsWith" | "includes" => method(
            vec![FormulaArgType::positional("search", Type::STRING)],
            Type::Boolean,
        ),
        "indexOf" => method(
            vec![FormulaArgType::positional("search", Type::STRING)],
            Type::optional(Type::int(NumberRange::at_least(0.0))),
        ),
        "repeat" => method(
            vec![FormulaArgType::positional(
                "times",
                Type::int(NumberRange::at_least(0.0)),
            )],
            Type::STRING,
        ),
        _ => return None,
    };
    Some(ty)
}

fn number_property(is_float: bool, name: &str) -> Option<Type> {
    let ty = match name {
        "abs" if is_float => Type::float(NumberRange::at_least(0.0)),
        "abs" => Type::int(NumberRange::at_least(0.0)),
        "floor" | "ceil" | "round" => Type::INT,
        "isEven" | "isOdd" if !is_float => Type::Boolean,
        "toFixed" => method(
            vec![FormulaArgType::positional(
                "digits",
                Type::int(NumberRange::at_least(0.0)),
            )],
            Type::STRING,
        ),
        _ => return None,
    };
    Some(ty)
}

fn array_property(element: &Type, length: LengthRange, name: &str) -> Option<Type> {
    let non_empty = length.min > 0;
    let ty = match name {
        "length" => length_type(length),
        "isEmpty" => Type::Boolean,
        "first" | "last" if non_empty => element.clone(),
        "first" | "last" => Type::optional(element.clone()),
        "reverse" => Type::array_with_length(element.clone(), length),
        "includes" => method(
            vec![FormulaArgType::positional("value", element.clone())],
            Type::Boolean,
        ),
        "join" => method(
            vec![FormulaArgType::positional("separator", Type::STRING).optional()],
            Type::STRING,
        ),
        "map" => {
            let mapped = GenericType::fresh("U");
            let callback = FormulaType::new(
                vec![
                    FormulaArgType::positional("value", element.clone()),
                    FormulaArgType::positional("index", Type::int(NumberRange::at_least(0.0))),
                ],
                Type::Generic(mapped.clone()),
            );
            Type::Formula(Arc::new(
                FormulaType::new(
                    vec![FormulaArgType::positional("fn", Type::formula(callback))],
                    Type::array_with_length(Type::Generic(mapped.clone()), length),
                )
                .with_generics(vec![mapped]),
            ))
        }
        "filter" => method(
            vec![FormulaArgType::positional(
                "fn",
                method(
                    vec![
                        FormulaArgType::positional("value", element.clone()),
                        FormulaArgType::positional(
                            "index",
                            Type::int(NumberRange::at_least(0.0)),
                        ),
                    ],
                    Type::Boolean,
                ),
            )],
            Type::array_with_length(
                element.clone(),
                LengthRange {
                    min: 0,
                    max: length.max,
                },
            ),
        ),
        "push" => method(
            vec![FormulaArgType::of_kind(
                FormulaArgKind::SpreadPositional,
                "values",
                Type::array(element.clone()),
            )],
            Type::array_with_length(
                element.clone(),
                LengthRange::at_least(length.min),
            ),
        ),
        _ => return None,
    };
    Some(ty)
}

fn set_property(element: &Type, length: LengthRange, name: &str) -> Option<Type> {
    let ty = match name {
        "length" => length_type(length),
        "isEmpty" => Type::Boolean,
        "has" => method(
            vec![FormulaArgType::positional("value", element.clone())],
            Type::Boolean,
        ),
        "toArray" => Type::array_with_length(element.clone(), length),
        _ => return None,
    };
    Some(ty)
}

fn dict_property(value: &Type, length: LengthRange, name: &str) -> Option<Type> {
    let ty = match name {
        "length" => length_type(length),
        "isEmpty" => Type::Boolean,
        "keys" => Type::array_with_length(Type::STRING, length),
        "values" => Type::array_with_length(value.clone(), length),
        "has" => method(
            vec![FormulaArgType::positional("key", Type::STRING)],
            Type::Boolean,
        ),
        "get" => method(
            vec![FormulaArgType::positional("key", Type::STRING)],
            Type::optional(value.clone()),
        ),
        _ => return None,
    };
    Some(ty)
}

fn range_property(element: &Type, name: &str) -> Option<Type> {
    let ty = match name {
        "includes" => method(
            vec![FormulaArgType::positional("value", Type::FLOAT)],
            Type::Boolean,
        ),
        "toArray" => Type::array(element.clone()),
        _ => return None,
    };
    Some(ty)
}
