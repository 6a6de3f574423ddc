//! Lowering parsed type expressions to [`Type`]s.

use std::collections::BTreeSet;

use extra_diagnostic::ErrorCode;
use extra_ir::{ExprKind, FormulaArgKind, Identifier, TypeArg, TypeExpr, TypeExprKind, TypeProp};

use crate::error::messages;
use crate::{
    FormulaArgType, FormulaType, GenericType, LengthRange, Literal, NamedType, NumberRange,
    ObjectProp, RegexPattern, StringType, Type, TypeError, TypeRuntime, TypeScope,
};

/// Resolve `expr` to a type, looking user-defined names up in `scope`.
pub fn resolve_type_expr(expr: &TypeExpr, scope: &TypeScope) -> Result<Type, TypeError> {
    let span = expr.source.span;
    let resolved = match &expr.kind {
        TypeExprKind::Null => Ok(Type::Null),
        TypeExprKind::Literal(value) => literal_type(&value.kind)
            .ok_or_else(|| TypeError::new(ErrorCode::E2010, "Expected a literal type")),
        TypeExprKind::Named { name, args } => resolve_named(name, args, scope),
        TypeExprKind::Object(props) => {
            let props = props
                .iter()
                .map(|prop| match prop {
                    TypeProp::Named { name, ty } => {
                        Ok(ObjectProp::named(name.name.clone(), resolve_type_expr(ty, scope)?))
                    }
                    TypeProp::Positional(ty) => {
                        Ok(ObjectProp::positional(resolve_type_expr(ty, scope)?))
                    }
                })
                .collect::<Result<Vec<_>, TypeError>>()?;
            Ok(Type::object(props))
        }
        TypeExprKind::OneOf(members) => {
            let members = members
                .iter()
                .map(|member| resolve_type_expr(member, scope))
                .collect::<Result<Vec<_>, TypeError>>()?;
            Ok(Type::one_of(members))
        }
        TypeExprKind::Optional(inner) => Ok(Type::optional(resolve_type_expr(inner, scope)?)),
        TypeExprKind::Formula {
            generics,
            args,
            return_type,
        } => {
            let (inner, generics) = bind_generics(generics, scope);
            let args = args
                .iter()
                .map(|arg| {
                    let ty = match &arg.type_annotation {
                        Some(annotation) => resolve_type_expr(annotation, &inner)?,
                        None => Type::Always,
                    };
                    Ok(formula_arg(arg.kind, &arg.name.name, ty, arg.default.is_some()))
                })
                .collect::<Result<Vec<_>, TypeError>>()?;
            let returns = resolve_type_expr(return_type, &inner)?;
            Ok(Type::formula(
                FormulaType::new(args, returns).with_generics(generics),
            ))
        }
    };
    resolved.map_err(|error| error.or_span(span))
}

/// A child scope in which each generic name resolves to a fresh generic.
pub(crate) fn bind_generics(
    names: &[Identifier],
    scope: &TypeScope,
) -> (TypeScope, Vec<GenericType>) {
    if names.is_empty() {
        return (scope.clone(), Vec::new());
    }
    let mut inner = scope.child();
    let generics: Vec<GenericType> = names
        .iter()
        .map(|name| {
            let generic = GenericType::fresh(name.name.clone());
            inner.bind_type(name.name.clone(), NamedType::new(Type::Generic(generic.clone())));
            generic
        })
        .collect();
    (inner, generics)
}

/// A declared argument; an argument with a default is optional.
pub(crate) fn formula_arg(
    kind: FormulaArgKind,
    name: &str,
    ty: Type,
    has_default: bool,
) -> FormulaArgType {
    let arg = FormulaArgType::of_kind(kind, name, ty);
    if has_default {
        arg.optional()
    } else {
        arg
    }
}

fn literal_type(kind: &ExprKind) -> Option<Type> {
    let ty = match kind {
        ExprKind::Null => Type::Null,
        ExprKind::Bool(value) => Type::literal_bool(*value),
        ExprKind::Int(literal) => Type::literal_int(literal.value),
        ExprKind::Float(literal) => Type::literal_float(literal.value),
        ExprKind::Str(literal) => Type::literal_string(literal.value.clone()),
        ExprKind::Regex(literal) => Type::Literal(Literal::Regex(RegexPattern::new(
            literal.pattern.clone(),
            literal.flags.clone(),
        ))),
        _ => return None,
    };
    Some(ty)
}

fn resolve_named(name: &str, args: &[TypeArg], scope: &TypeScope) -> Result<Type, TypeError> {
    match name {
        "Int" => Ok(Type::int(number_args(name, args)?)),
        "Float" => Ok(Type::float(number_args(name, args)?)),
        "String" => string_type(args),
        "Boolean" | "Null" | "Regex" | "View" => {
            no_args(name, args)?;
            Ok(match name {
                "Boolean" => Type::Boolean,
                "Null" => Type::Null,
                "Regex" => Type::Regex,
                _ => Type::View,
            })
        }
        "Array" | "Set" => {
            let (element, length, _) = container_args(name, args, scope)?;
            Ok(if name == "Array" {
                Type::array_with_length(element, length)
            } else {
                Type::set_with_length(element, length)
            })
        }
        "Dict" => {
            let (value, length, keys) = container_args(name, args, scope)?;
            Ok(Type::dict_with(value, length, keys))
        }
        "Range" => match args {
            [] => Ok(Type::range(Type::INT)),
            [TypeArg::Type(element)] => {
                let element = resolve_type_expr(element, scope)?;
                match element {
                    Type::Int(_) | Type::Float(_) => Ok(Type::range(element)),
                    other => Err(invalid_args(
                        name,
                        &format!("expected Int or Float, found {other}"),
                    )),
                }
            }
            _ => Err(invalid_args(name, "expected one element type")),
        },
        _ => {
            let named = scope
                .named_type(name)
                .ok_or_else(|| TypeError::new(ErrorCode::E2002, messages::unknown_type(name)))?;
            apply_type_args(name, named, args, scope)
        }
    }
}

/// Substitute explicit type arguments for a named type's generics.
fn apply_type_args(
    name: &str,
    named: NamedType,
    args: &[TypeArg],
    scope: &TypeScope,
) -> Result<Type, TypeError> {
    if args.is_empty() {
        return Ok(named.ty);
    }
    if args.len() != named.generics.len() {
        return Err(invalid_args(
            name,
            &format!(
                "expected {} type argument(s), found {}",
                named.generics.len(),
                args.len()
            ),
        ));
    }
    let mut bound = Vec::with_capacity(args.len());
    for (generic, arg) in named.generics.iter().zip(args) {
        let TypeArg::Type(arg) = arg else {
            return Err(invalid_args(name, "expected a type argument"));
        };
        bound.push((generic.id, resolve_type_expr(arg, scope)?));
    }
    Ok(named.ty.substitute(&|generic| {
        bound
            .iter()
            .find(|(id, _)| *id == generic.id)
            .map(|(_, ty)| ty.clone())
    }))
}

fn invalid_args(name: &str, detail: &str) -> TypeError {
    TypeError::new(
        ErrorCode::E2010,
        format!("Invalid arguments to {name}: {detail}"),
    )
}

fn no_args(name: &str, args: &[TypeArg]) -> Result<(), TypeError> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(invalid_args(name, "takes no arguments"))
    }
}

/// `Int(>=0)`, `Int(0...10)`, `Float(>0, <1)`: every argument constrains
/// the range further.
fn number_args(name: &str, args: &[TypeArg]) -> Result<NumberRange, TypeError> {
    args.iter().try_fold(NumberRange::ANY, |range, arg| {
        let constraint = number_constraint(arg)
            .ok_or_else(|| invalid_args(name, "expected a comparison or a range"))?;
        Ok(range.intersect(&constraint))
    })
}

fn number_constraint(arg: &TypeArg) -> Option<NumberRange> {
    match arg {
        TypeArg::Comparison { op, value } => {
            NumberRange::from_comparison(*op, number_value(&value.kind)?)
        }
        TypeArg::Range { op, start, stop } => NumberRange::from_range_operator(
            *op,
            number_value(&start.kind)?,
            number_value(&stop.kind)?,
        ),
        TypeArg::Type(TypeExpr {
            kind: TypeExprKind::Literal(value),
            ..
        }) => Some(NumberRange::exactly(number_value(&value.kind)?)),
        _ => None,
    }
}

fn number_value(kind: &ExprKind) -> Option<f64> {
    match kind {
        ExprKind::Int(literal) => Some(literal.value as f64),
        ExprKind::Float(literal) => Some(literal.value),
        _ => None,
    }
}

fn length_constraint(name: &str, arg: &TypeArg) -> Result<LengthRange, TypeError> {
    number_constraint(arg)
        .map(|range| LengthRange::from_number_range(&range))
        .ok_or_else(|| invalid_args(name, "expected a length comparison or range"))
}

fn string_type(args: &[TypeArg]) -> Result<Type, TypeError> {
    let mut narrowed = StringType::default();
    for arg in args {
        match arg {
            TypeArg::Regex(literal) => {
                let pattern = RegexPattern::new(literal.pattern.clone(), literal.flags.clone());
                pattern
                    .compile()
                    .map_err(|error| invalid_args("String", &error.to_string()))?;
                narrowed.regexes.push(pattern);
            }
            TypeArg::Named { name, value } if name.name == "length" => {
                narrowed.length = narrowed
                    .length
                    .intersect(&length_constraint("String", value)?);
            }
            _ => return Err(invalid_args("String", "expected a regex or length")),
        }
    }
    Ok(Type::string(narrowed))
}

/// Element type, `length:` and `keys:` of `Array`/`Set`/`Dict`.
fn container_args(
    name: &str,
    args: &[TypeArg],
    scope: &TypeScope,
) -> Result<(Type, LengthRange, BTreeSet<String>), TypeError> {
    let mut element = None;
    let mut length = LengthRange::ANY;
    let mut keys = BTreeSet::new();
    for arg in args {
        match arg {
            TypeArg::Type(ty) if element.is_none() => {
                element = Some(resolve_type_expr(ty, scope)?);
            }
            TypeArg::Named { name: arg_name, value } if arg_name.name == "length" => {
                length = length.intersect(&length_constraint(name, value)?);
            }
            TypeArg::Named { name: arg_name, value } if arg_name.name == "keys" && name == "Dict" => {
                let TypeArg::Names(names) = value.as_ref() else {
                    return Err(invalid_args(name, "keys must be a list of strings"));
                };
                keys.extend(names.iter().map(|key| key.value.clone()));
            }
            _ => return Err(invalid_args(name, "unexpected argument")),
        }
    }
    let element = element.ok_or_else(|| invalid_args(name, "missing element type"))?;
    Ok((element, length, keys))
}

#[cfg(test)]
mod tests;
