//! Node inference and flow narrowing.
//!
//! [`get_type`] computes the static type of a parsed expression, asking a
//! [`TypeScope`] for the types of free names. [`assume_true`] and
//! [`assume_false`] return the scope as seen by code that only runs when
//! an expression is truthy (or falsy): `if x >= 5 then …` checks its
//! branch in a scope where `x` is `Int(>=5)`.
//!
//! Dispatch is a match on `ExprKind`; each category lives in its own
//! submodule:
//!
//! - Literals and references: here
//! - Operators (including property access, indexing and pipes): `operators`
//! - Container literals: `containers`
//! - `let`, `if`, `switch`: `control`
//! - Functions, calls and views: `calls`
//! - Narrowing: `assume`

mod assume;
mod calls;
mod containers;
mod control;
mod operators;

pub use assume::{assume_false, assume_true, relationship_formula};
pub(crate) use calls::{infer_function, widen_literal};

use std::sync::Arc;

use extra_diagnostic::ErrorCode;
use extra_ir::{DiceLiteral, Expr, ExprKind, RegexLiteral, StringTemplate, TemplatePart};
use extra_stack::ensure_sufficient_stack;

use crate::error::messages;
use crate::{
    Binding, EnumType, FormulaType, Literal, NumberRange, RegexPattern, Type, TypeError,
    TypeRuntime, TypeScope, Value,
};

type InferResult = Result<Type, TypeError>;

/// The static type of `expr`.
pub fn get_type(expr: &Expr, scope: &TypeScope) -> InferResult {
    infer(expr, scope, None)
}

/// Infer `expr`, with `expected` as a hint from the context: the declared
/// type of a parameter a lambda is passed to, or an enum type for the
/// `.member` shorthand. The hint never replaces the inferred type.
pub(crate) fn infer(expr: &Expr, scope: &TypeScope, expected: Option<&Type>) -> InferResult {
    ensure_sufficient_stack(|| infer_inner(expr, scope, expected))
        .map_err(|error| error.or_span(expr.span()))
}

fn infer_inner(expr: &Expr, scope: &TypeScope, expected: Option<&Type>) -> InferResult {
    match &expr.kind {
        // Literals
        ExprKind::Null => Ok(Type::Null),
        ExprKind::Bool(value) => Ok(Type::literal_bool(*value)),
        ExprKind::Int(literal) => Ok(Type::literal_int(literal.value)),
        ExprKind::Float(literal) => Ok(Type::literal_float(literal.value)),
        ExprKind::Str(literal) => Ok(Type::literal_string(literal.value.clone())),
        ExprKind::Template(template) => infer_template(template, scope),
        ExprKind::Regex(literal) => infer_regex(literal),
        ExprKind::Dice(dice) => Ok(infer_dice(*dice)),

        // References
        ExprKind::Reference(name) => infer_reference(name, scope),
        ExprKind::StateReference(name) => scope
            .state_type(name)
            .ok_or_else(|| TypeError::new(ErrorCode::E2009, messages::unknown_state(name))),
        ExprKind::This => scope
            .this_type()
            .ok_or_else(|| TypeError::new(ErrorCode::E2003, messages::unknown_reference("this"))),
        ExprKind::PipePlaceholder => scope
            .local_type("#")
            .ok_or_else(|| TypeError::new(ErrorCode::E2003, messages::unknown_reference("#"))),
        ExprKind::PropertyName(name) => infer_enum_shorthand(name, expected),

        // Containers
        ExprKind::Array(container) => containers::infer_array(container, scope, expected),
        ExprKind::Set(container) => containers::infer_set(container, scope, expected),
        ExprKind::Dict(container) => containers::infer_dict(container, scope, expected),
        ExprKind::Object(container) => containers::infer_object(container, scope, expected),

        // Compound
        ExprKind::Let(let_expr) => control::infer_let(let_expr, scope, expected),
        ExprKind::If(if_expr) => control::infer_if(if_expr, scope, expected),
        ExprKind::Switch(switch) => control::infer_switch(switch, scope, expected),
        ExprKind::Function(function) => {
            calls::infer_function(function, scope, expected).map(Type::formula)
        }
        ExprKind::View(view) => calls::infer_view(view, scope),
        ExprKind::Arguments(_) | ExprKind::Type(_) => Err(TypeError::new(
            ErrorCode::E9001,
            "Argument lists and types only appear as operator operands",
        )),

        ExprKind::Operation(operation) => {
            operators::infer_operation(operation.op, &operation.args, scope, expected)
        }
    }
}

/// A template is a literal when every interpolated part is.
fn infer_template(template: &StringTemplate, scope: &TypeScope) -> InferResult {
    let mut text = Some(String::new());
    for part in &template.parts {
        match part {
            TemplatePart::Text(part) => {
                if let Some(text) = &mut text {
                    text.push_str(part);
                }
            }
            TemplatePart::Expr(part) => match infer(part, scope, None)? {
                Type::Literal(literal) => {
                    if let Some(text) = &mut text {
                        text.push_str(&Value::from_literal(&literal).to_display_string());
                    }
                }
                _ => text = None,
            },
        }
    }
    Ok(text.map_or(Type::STRING, Type::literal_string))
}

fn infer_regex(literal: &RegexLiteral) -> InferResult {
    let pattern = RegexPattern::new(literal.pattern.clone(), literal.flags.clone());
    pattern.compile().map_err(|error| {
        TypeError::new(
            ErrorCode::E2001,
            format!("Invalid regular expression {}: {error}", literal.to_code()),
        )
    })?;
    Ok(Type::Literal(Literal::Regex(pattern)))
}

fn infer_dice(dice: DiceLiteral) -> Type {
    Type::int(NumberRange::between(dice.min() as f64, dice.max() as f64))
}

/// Locals first, then actions, then type names used as values: a class
/// name is its constructor.
fn infer_reference(name: &str, scope: &TypeScope) -> InferResult {
    if let Some(ty) = scope.local_type(name) {
        return Ok(ty);
    }
    if let Some(ty) = scope.action_type(name) {
        return Ok(ty);
    }
    match scope.named_type(name).map(|named| named.ty) {
        Some(Type::Class(class)) => Ok(Type::formula(class.constructor())),
        _ => Err(TypeError::new(
            ErrorCode::E2003,
            messages::unknown_reference(name),
        )),
    }
}

/// `.red` where an enum is expected.
fn infer_enum_shorthand(name: &str, expected: Option<&Type>) -> InferResult {
    let found = expected
        .into_iter()
        .flat_map(Type::variants)
        .find_map(|variant| match variant {
            Type::Enum(def) => enum_member_type(&def, name),
            _ => None,
        });
    found.ok_or_else(|| {
        TypeError::new(
            ErrorCode::E2005,
            format!("Cannot resolve '.{name}' without an enum type"),
        )
    })
}

/// An enum member used as a value: the enum itself, or a constructor for
/// members with associated values.
pub(crate) fn enum_member_type(def: &Arc<EnumType>, name: &str) -> Option<Type> {
    let member = def.members.iter().find(|member| member.name == name)?;
    let ty = Type::Enum(Arc::clone(def));
    if member.args.is_empty() {
        Some(ty)
    } else {
        Some(Type::formula(FormulaType::new(member.args.clone(), ty)))
    }
}

/// The narrowable binding an expression names, if any.
pub(crate) fn binding_of(expr: &Expr) -> Option<Binding> {
    match &expr.kind {
        ExprKind::Reference(name) => Some(Binding::Local(name.clone())),
        ExprKind::StateReference(name) => Some(Binding::State(name.clone())),
        _ => None,
    }
}

#[cfg(test)]
mod tests;
