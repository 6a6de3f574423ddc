//! Functions, calls and views.

use extra_diagnostic::ErrorCode;
use extra_ir::{
    ArgumentKind, ArgumentsList, Expr, FormulaArgKind, FunctionExpr, Operator, ViewChild,
    ViewElement,
};

use super::{infer, InferResult};
use crate::error::messages;
use crate::resolve::{bind_generics, formula_arg};
use crate::{
    check_assignable, check_formula_arguments, resolve_type_expr, ArgumentType, FormulaArgType,
    FormulaType, GenericResolution, Literal, Type, TypeError, TypeRuntime, TypeScope,
};

/// The formula type of a function expression.
///
/// Argument types come from annotations, then from defaults, then from
/// the formula the function is passed as (`xs.map(fn(#x) => x + 1)`).
/// The return type is the body's type unless one is declared.
pub(crate) fn infer_function(
    function: &FunctionExpr,
    scope: &TypeScope,
    expected: Option<&Type>,
) -> Result<FormulaType, TypeError> {
    let expected = match expected {
        Some(Type::Formula(formula)) => Some(formula.as_ref()),
        _ => None,
    };
    let (generic_scope, generics) = bind_generics(&function.generics, scope);
    let mut body_scope = generic_scope.child();
    let mut args = Vec::with_capacity(function.args.len());
    let mut position = 0;
    for arg in &function.args {
        let declared = arg
            .type_annotation
            .as_ref()
            .map(|annotation| resolve_type_expr(annotation, &generic_scope))
            .transpose()?;
        let default = arg
            .default
            .as_ref()
            .map(|default| infer(default, &generic_scope, declared.as_ref()))
            .transpose()?;
        let ty = match (declared, default) {
            (Some(declared), Some(default)) => {
                check_assignable(&default, &declared).map_err(|error| {
                    error.or_span(arg.default.as_ref().map_or(arg.name.source.span, Expr::span))
                })?;
                declared
            }
            (Some(declared), None) => declared,
            (None, Some(default)) => widen_literal(default),
            (None, None) => expected_arg(expected, arg.kind, &arg.name.name, position)
                .unwrap_or(Type::Always),
        };
        if arg.kind == FormulaArgKind::Positional {
            position += 1;
        }
        body_scope.bind_local(arg.name.name.clone(), ty.clone());
        args.push(formula_arg(arg.kind, &arg.name.name, ty, arg.default.is_some()));
    }
    let body = infer(&function.body, &body_scope, expected.map(|formula| &formula.returns))?;
    let returns = match &function.return_type {
        Some(annotation) => {
            let declared = resolve_type_expr(annotation, &generic_scope)?;
            check_assignable(&body, &declared)
                .map_err(|error| error.or_span(function.body.span()))?;
            declared
        }
        None => body,
    };
    Ok(FormulaType::new(args, returns).with_generics(generics))
}

/// A default of `1` declares `Int`, not the literal `1`.
pub(crate) fn widen_literal(ty: Type) -> Type {
    match ty {
        Type::Literal(Literal::Regex(_)) => Type::Regex,
        Type::Literal(literal) => literal.base_type(),
        other => other,
    }
}

/// The type `expected` declares for an argument of this kind and name.
fn expected_arg(
    expected: Option<&FormulaType>,
    kind: FormulaArgKind,
    name: &str,
    position: usize,
) -> Option<Type> {
    let expected = expected?;
    let found = match kind {
        FormulaArgKind::Positional => expected.positional_args().nth(position),
        _ => expected
            .args
            .iter()
            .find(|arg| arg.kind == kind && arg.name == name),
    };
    found.map(|arg| arg.ty.clone())
}

/// A call: the callee must be a formula (or `always`). Arguments are
/// typed with their parameter's declared type as a hint.
pub(super) fn infer_call(
    op: Operator,
    callee: &Expr,
    arguments: &ArgumentsList,
    scope: &TypeScope,
) -> InferResult {
    let callee_type = infer(callee, scope, None)?;
    let nullable = op == Operator::NullableCall && callee_type.accepts_null();
    let callee_type = if op == Operator::NullableCall {
        callee_type.non_null()
    } else {
        callee_type
    };
    let formula = match &callee_type {
        Type::Formula(formula) => formula.clone(),
        Type::Always => {
            for argument in arguments.all() {
                infer(argument.value(), scope, None)?;
            }
            return Ok(Type::Always);
        }
        other => {
            return Err(TypeError::new(ErrorCode::E2008, messages::not_callable(other)))
        }
    };
    let args = argument_types(arguments, &formula, scope)?;
    let returns = check_formula_arguments(&formula, &args, &mut GenericResolution::new())
        .map_err(|error| error.or_span(callee.span()))?;
    tracing::trace!(callee = %callee_type, returns = %returns, "call");
    Ok(if nullable {
        Type::optional(returns)
    } else {
        returns
    })
}

/// Type every call-site argument, hinting each with its parameter.
fn argument_types(
    arguments: &ArgumentsList,
    formula: &FormulaType,
    scope: &TypeScope,
) -> Result<Vec<ArgumentType>, TypeError> {
    let param = |kind: FormulaArgKind, name: Option<&str>| -> Option<&FormulaArgType> {
        formula
            .args
            .iter()
            .find(|arg| arg.kind == kind && name.map_or(true, |name| arg.name == name))
    };
    let mut position = 0;
    let mut args = Vec::new();
    for argument in arguments.all() {
        let arg = match &argument.kind {
            ArgumentKind::Positional(value) => {
                let hint = formula
                    .positional_args()
                    .nth(position)
                    .map(|arg| arg.ty.clone())
                    .or_else(|| {
                        param(FormulaArgKind::SpreadPositional, None)
                            .and_then(|arg| arg.ty.element_type())
                    });
                position += 1;
                ArgumentType::Positional(infer(value, scope, hint.as_ref())?)
            }
            ArgumentKind::Named { name, value } => {
                let hint = param(FormulaArgKind::Named, Some(&name.name)).map(|arg| &arg.ty);
                ArgumentType::Named(name.name.clone(), infer(value, scope, hint)?)
            }
            ArgumentKind::SpreadPositional(value) => {
                ArgumentType::SpreadPositional(infer(value, scope, None)?)
            }
            ArgumentKind::RepeatedNamed { name, values } => {
                let hint = param(FormulaArgKind::RepeatedNamed, Some(&name.name)).map(|arg| &arg.ty);
                ArgumentType::RepeatedNamed(name.name.clone(), infer(values, scope, hint)?)
            }
            ArgumentKind::KwargsList(value) => ArgumentType::Kwargs(infer(value, scope, None)?),
        };
        args.push(arg);
    }
    Ok(args)
}

/// A view element: props are checked as named arguments against the
/// component's formula, children are checked in turn.
pub(super) fn infer_view(view: &ViewElement, scope: &TypeScope) -> InferResult {
    if let Some(tag) = &view.tag {
        let props = view
            .props
            .iter()
            .map(|prop| {
                let ty = match &prop.value {
                    Some(value) => infer(value, scope, None)?,
                    None => Type::literal_bool(true),
                };
                Ok(ArgumentType::Named(prop.name.name.clone(), ty))
            })
            .collect::<Result<Vec<_>, TypeError>>()?;
        if let Some(formula) = component_formula(tag, scope)? {
            check_formula_arguments(&formula, &props, &mut GenericResolution::new())?;
        }
    }
    for child in view.children.iter().flatten() {
        match child {
            ViewChild::Text { .. } => {}
            ViewChild::Expr(expr) | ViewChild::Element(expr) => {
                infer(expr, scope, None)?;
            }
        }
    }
    Ok(Type::View)
}

/// The formula a tag's props are checked against, if it has one.
///
/// Lowercase tags belong to the host's [`ViewRuntime`](crate::ViewRuntime);
/// without one they are unchecked. Capitalized tags name a view function,
/// a view class or any other formula in scope.
fn component_formula(tag: &str, scope: &TypeScope) -> Result<Option<FormulaType>, TypeError> {
    let unknown = || TypeError::new(ErrorCode::E2003, messages::unknown_reference(tag));
    if tag.starts_with(|c: char| c.is_ascii_lowercase()) {
        let Some(views) = scope.views() else {
            return Ok(None);
        };
        if !views.has(tag) {
            return Err(unknown());
        }
        return Ok(match views.view_type(tag) {
            Some(Type::Formula(formula)) => Some((*formula).clone()),
            _ => None,
        });
    }
    if let Some(ty) = scope.local_type(tag) {
        return match ty {
            Type::Formula(formula) => Ok(Some((*formula).clone())),
            Type::Always => Ok(None),
            other => Err(TypeError::new(ErrorCode::E2008, messages::not_callable(&other))),
        };
    }
    match scope.named_type(tag).map(|named| named.ty) {
        Some(Type::Class(class)) => Ok(Some(class.constructor())),
        _ => Err(unknown()),
    }
}

#[cfg(test)]
mod tests;
