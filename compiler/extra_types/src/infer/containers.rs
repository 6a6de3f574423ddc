//! Container literals: `[…]`, `#[…]`, `#{…}` and `{…}`.
//!
//! Element types are joined with [`compatible_with_both_types`]. Lengths
//! are exact for plain entries; an inclusion guard (`x if cond`) makes its
//! entry optional and a spread contributes the spread value's length.

use std::collections::BTreeSet;

use extra_diagnostic::ErrorCode;
use extra_ir::{Container, Entry, EntryKey, Expr, ExprKind};

use super::{assume_true, infer, InferResult};
use crate::error::messages;
use crate::{
    can_be_assigned_to, compatible_with_both_types, LengthRange, Literal, ObjectProp, Type,
    TypeError, TypeScope,
};

/// One entry with its guard resolved: the innermost entry, the scope its
/// value is checked in, and whether it is guarded.
struct Guarded<'a> {
    entry: &'a Entry,
    scope: TypeScope,
    guarded: bool,
}

fn unguard<'a>(entry: &'a Entry, scope: &TypeScope) -> Result<Guarded<'a>, TypeError> {
    match entry {
        Entry::Inclusion {
            entry, condition, ..
        } => {
            infer(condition, scope, None)?;
            let inner = assume_true(condition, scope)?;
            let mut guarded = unguard(entry, &inner)?;
            guarded.guarded = true;
            Ok(guarded)
        }
        other => Ok(Guarded {
            entry: other,
            scope: scope.clone(),
            guarded: false,
        }),
    }
}

/// Element type and length of a spread value.
fn spread_elements(value: &Expr, ty: &Type) -> Result<(Type, LengthRange), TypeError> {
    match ty {
        Type::Array(array) | Type::Set(array) => Ok((array.element.clone(), array.length)),
        Type::Range(element) => Ok(((**element).clone(), LengthRange::ANY)),
        Type::Always => Ok((Type::Always, LengthRange::ANY)),
        other => Err(TypeError::new(
            ErrorCode::E2001,
            format!("Cannot spread {other} into a list"),
        )
        .with_span(value.span())),
    }
}

/// Element type and length range shared by arrays and sets.
fn elements(
    container: &Container,
    scope: &TypeScope,
    expected_element: Option<&Type>,
) -> Result<(Type, LengthRange), TypeError> {
    let mut element = Type::Always;
    let mut length = LengthRange::exactly(0);
    for entry in &container.entries {
        let Guarded {
            entry,
            scope: entry_scope,
            guarded,
        } = unguard(entry, scope)?;
        let (ty, entry_length) = match entry {
            Entry::Spread { value, .. } => {
                let spread = infer(value, &entry_scope, None)?;
                spread_elements(value, &spread)?
            }
            other => (
                infer(other.value(), &entry_scope, expected_element)?,
                LengthRange::exactly(1),
            ),
        };
        element = compatible_with_both_types(&element, &ty);
        let entry_length = if guarded {
            LengthRange {
                min: 0,
                max: entry_length.max,
            }
        } else {
            entry_length
        };
        length = length.add(&entry_length);
    }
    Ok((element, length))
}

fn expected_element(expected: Option<&Type>) -> Option<Type> {
    expected.and_then(|ty| match ty {
        Type::Array(array) | Type::Set(array) => Some(array.element.clone()),
        Type::Dict(dict) => Some(dict.value.clone()),
        _ => None,
    })
}

pub(super) fn infer_array(
    container: &Container,
    scope: &TypeScope,
    expected: Option<&Type>,
) -> InferResult {
    let hint = expected_element(expected);
    let (element, length) = elements(container, scope, hint.as_ref())?;
    Ok(Type::array_with_length(element, length))
}

/// Duplicate values collapse, so only the upper bound of the length is
/// certain.
pub(super) fn infer_set(
    container: &Container,
    scope: &TypeScope,
    expected: Option<&Type>,
) -> InferResult {
    let hint = expected_element(expected);
    let (element, length) = elements(container, scope, hint.as_ref())?;
    let length = LengthRange {
        min: length.min.min(1),
        max: length.max,
    };
    Ok(Type::set_with_length(element, length))
}

pub(super) fn infer_dict(
    container: &Container,
    scope: &TypeScope,
    expected: Option<&Type>,
) -> InferResult {
    let hint = expected_element(expected);
    let mut value_type = Type::Always;
    let mut keys: BTreeSet<String> = BTreeSet::new();
    let mut length = LengthRange::exactly(0);
    for entry in &container.entries {
        let Guarded {
            entry,
            scope: entry_scope,
            guarded,
        } = unguard(entry, scope)?;
        let (ty, key) = match entry {
            Entry::Pair { key, value } => {
                let key = match key {
                    EntryKey::Name(name) => Some(name.name.clone()),
                    EntryKey::Literal(key) | EntryKey::Computed(key) => {
                        dict_key(key, &entry_scope)?
                    }
                };
                (infer(value, &entry_scope, hint.as_ref())?, key)
            }
            Entry::Spread { value, .. } => match infer(value, &entry_scope, None)? {
                Type::Dict(dict) => {
                    if !guarded {
                        keys.extend(dict.keys.iter().cloned());
                    }
                    value_type = compatible_with_both_types(&value_type, &dict.value);
                    length = LengthRange::at_least(length.min.max(dict.length.min));
                    continue;
                }
                Type::Always => {
                    length = LengthRange::at_least(length.min);
                    continue;
                }
                other => {
                    return Err(TypeError::new(
                        ErrorCode::E2001,
                        format!("Cannot spread {other} into a dict"),
                    )
                    .with_span(value.span()))
                }
            },
            Entry::Value(value) => match &value.kind {
                ExprKind::Reference(name) => {
                    (infer(value, &entry_scope, hint.as_ref())?, Some(name.clone()))
                }
                _ => {
                    return Err(TypeError::new(
                        ErrorCode::E2001,
                        "Dict entries need a key",
                    )
                    .with_span(value.span()))
                }
            },
            Entry::Inclusion { .. } => continue,
        };
        value_type = compatible_with_both_types(&value_type, &ty);
        match key {
            Some(key) if !keys.contains(&key) => {
                if !guarded {
                    keys.insert(key);
                }
                length = length.add(&LengthRange {
                    min: usize::from(!guarded),
                    max: Some(1),
                });
            }
            Some(_) => {}
            None => {
                length = LengthRange {
                    min: length.min,
                    max: length.max.map(|max| max + 1),
                };
            }
        }
    }
    Ok(Type::dict_with(value_type, length, keys))
}

/// The static name of a literal or computed key, checking its type.
fn dict_key(key: &Expr, scope: &TypeScope) -> Result<Option<String>, TypeError> {
    let ty = infer(key, scope, None)?;
    match &ty {
        Type::Literal(Literal::String(name)) => Ok(Some(name.clone())),
        Type::Literal(Literal::Int(value)) => Ok(Some(value.to_string())),
        _ if can_be_assigned_to(&ty, &Type::one_of(vec![Type::STRING, Type::INT, Type::Null])) => {
            Ok(None)
        }
        Type::Literal(Literal::Boolean(_)) | Type::Boolean => Ok(None),
        _ => Err(TypeError::new(
            ErrorCode::E2001,
            messages::cannot_assign(&ty, &Type::STRING),
        )
        .with_span(key.span())),
    }
}

pub(super) fn infer_object(
    container: &Container,
    scope: &TypeScope,
    expected: Option<&Type>,
) -> InferResult {
    let expected_object = match expected {
        Some(Type::Object(object)) => Some(object),
        _ => None,
    };
    let mut props: Vec<ObjectProp> = Vec::new();
    let mut position = 0;
    for entry in &container.entries {
        let Guarded {
            entry,
            scope: entry_scope,
            guarded,
        } = unguard(entry, scope)?;
        let optional = |ty: Type| if guarded { Type::optional(ty) } else { ty };
        match entry {
            Entry::Pair { key, value } => {
                let Some(name) = key.static_name() else {
                    return Err(TypeError::new(
                        ErrorCode::E2001,
                        "Object keys must be names",
                    )
                    .with_span(value.span()));
                };
                let hint = expected_object.and_then(|object| object.named_prop(&name));
                let ty = optional(infer(value, &entry_scope, hint)?);
                props.retain(|prop| prop.name.as_deref() != Some(name.as_str()));
                props.push(ObjectProp::named(name, ty));
            }
            Entry::Value(value) => {
                let hint = expected_object.and_then(|object| object.positional_prop(position));
                props.push(ObjectProp::positional(optional(infer(
                    value,
                    &entry_scope,
                    hint,
                )?)));
                position += 1;
            }
            Entry::Spread { value, .. } => match infer(value, &entry_scope, None)? {
                Type::Object(spread) => {
                    for prop in spread.props {
                        if let Some(name) = &prop.name {
                            props.retain(|own| own.name.as_ref() != Some(name));
                        } else {
                            position += 1;
                        }
                        props.push(ObjectProp {
                            ty: optional(prop.ty),
                            ..prop
                        });
                    }
                }
                other => {
                    return Err(TypeError::new(
                        ErrorCode::E2001,
                        format!("Cannot spread {other} into an object"),
                    )
                    .with_span(value.span()))
                }
            },
            Entry::Inclusion { .. } => {}
        }
    }
    Ok(Type::object(props))
}

#[cfg(test)]
mod tests;
