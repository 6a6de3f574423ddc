//! `let`, `if` and `switch`.

use extra_diagnostic::ErrorCode;
use extra_ir::{Expr, IfExpr, Let, Operator, Pattern, SwitchExpr};

use super::{assume_false, assume_true, binding_of, infer, relationship_formula, InferResult};
use crate::error::messages;
use crate::narrow::narrow_to_range;
use crate::relationship::narrow_binding;
use crate::{
    can_be_assigned_to, check_assignable, compatible_with_both_types, eval, narrow_type_is,
    narrow_type_is_not, resolve_type_expr, Binding, LengthRange, Literal, Relationship,
    StringType, Type, TypeError, TypeRuntime, TypeScope, Value, ValueScope,
};

/// Bindings are checked in order, each seeing the previous ones. A binding
/// to a linear formula of another reference (`y = x + 1`) records a
/// relationship so later narrowing of `x` reaches `y`.
pub(super) fn infer_let(let_expr: &Let, scope: &TypeScope, expected: Option<&Type>) -> InferResult {
    let mut inner = scope.child();
    for binding in &let_expr.bindings {
        let annotation = binding
            .type_annotation
            .as_ref()
            .map(|annotation| resolve_type_expr(annotation, &inner))
            .transpose()?;
        let value = infer(&binding.value, &inner, annotation.as_ref())?;
        let ty = match annotation {
            Some(annotation) => {
                check_assignable(&value, &annotation)
                    .map_err(|error| error.or_span(binding.value.span()))?;
                annotation
            }
            None => value,
        };
        let formula = relationship_formula(&binding.value, &inner);
        let id = inner.bind_local(binding.name.name.clone(), ty);
        if let Some(formula) = formula {
            inner.add_relationship(Relationship {
                subject: Binding::Local(binding.name.name.clone()),
                subject_id: id,
                op: Operator::Equal,
                formula,
            });
        }
    }
    infer(&let_expr.body, &inner, expected)
}

/// Each branch is checked assuming its condition holds and every earlier
/// condition failed. A missing `else` contributes `null`.
pub(super) fn infer_if(if_expr: &IfExpr, scope: &TypeScope, expected: Option<&Type>) -> InferResult {
    let mut remaining = scope.clone();
    let mut result = Type::Always;
    for branch in &if_expr.branches {
        infer(&branch.condition, &remaining, None)?;
        let truthy = assume_true(&branch.condition, &remaining)?;
        let body = infer(&branch.body, &truthy, expected)?;
        result = compatible_with_both_types(&result, &body);
        remaining = assume_false(&branch.condition, &remaining)?;
    }
    let else_type = match &if_expr.else_body {
        Some(body) => infer(body, &remaining, expected)?,
        None => Type::Null,
    };
    Ok(compatible_with_both_types(&result, &else_type))
}

/// Cases narrow the subject in order; whatever no case matched reaches
/// `else`. Without `else`, an unmatched subject makes the result optional.
pub(super) fn infer_switch(
    switch: &SwitchExpr,
    scope: &TypeScope,
    expected: Option<&Type>,
) -> InferResult {
    let subject_type = infer(&switch.subject, scope, None)?;
    let subject_binding = binding_of(&switch.subject);
    let mut remaining = subject_type;
    let mut result = Type::Always;
    for case in &switch.cases {
        let (matched, unmatched, mut case_scope) =
            narrow_case(&case.pattern, &remaining, scope)?;
        if let Some(binding) = &subject_binding {
            narrow_binding(&mut case_scope, binding, matched);
        }
        let body = infer(&case.body, &case_scope, expected)?;
        result = compatible_with_both_types(&result, &body);
        remaining = unmatched;
    }
    let else_type = match &switch.else_body {
        Some(body) => {
            let mut else_scope = scope.child();
            if let Some(binding) = &subject_binding {
                narrow_binding(&mut else_scope, binding, remaining);
            }
            infer(body, &else_scope, expected)?
        }
        None if remaining.is_never() => Type::Always,
        None => Type::Null,
    };
    Ok(compatible_with_both_types(&result, &else_type))
}

/// The subject's type when `pattern` matches, when it does not, and the
/// scope for the case body (with the pattern's binding, if any).
fn narrow_case(
    pattern: &Pattern,
    subject: &Type,
    scope: &TypeScope,
) -> Result<(Type, Type, TypeScope), TypeError> {
    let mut case_scope = scope.child();
    let narrowed = match pattern {
        Pattern::Wildcard(_) => (subject.clone(), Type::Never),
        Pattern::Binding(name) => {
            case_scope.bind_local(name.name.clone(), subject.clone());
            (subject.clone(), Type::Never)
        }
        Pattern::Value(value) => narrow_value_pattern(value, subject, scope)?,
        Pattern::Type { binding, ty } => {
            let assertion = resolve_type_expr(ty, scope)?;
            let matched = narrow_type_is(subject, &assertion);
            if let Some(name) = binding {
                case_scope.bind_local(name.name.clone(), matched.clone());
            }
            (matched, narrow_type_is_not(subject, &assertion))
        }
    };
    Ok((narrowed.0, narrowed.1, case_scope))
}

/// Literal, range and regex patterns.
fn narrow_value_pattern(
    value: &Expr,
    subject: &Type,
    scope: &TypeScope,
) -> Result<(Type, Type), TypeError> {
    let pattern_type = infer(value, scope, Some(subject))?;
    match &pattern_type {
        Type::Range(_) => {
            let constant = eval(value, &ValueScope::new()).map_err(|error| {
                TypeError::new(ErrorCode::E2001, error.to_string()).with_span(value.span())
            })?;
            let Value::Range { range, .. } = constant else {
                return Err(TypeError::new(ErrorCode::E9001, "Expected a range"));
            };
            Ok((narrow_to_range(subject, &range), subject.clone()))
        }
        Type::Literal(Literal::Regex(pattern)) => {
            if !can_be_assigned_to(subject, &Type::STRING) {
                return Err(TypeError::new(
                    ErrorCode::E2001,
                    messages::cannot_assign(subject, &Type::STRING),
                ));
            }
            let matching = Type::string(StringType {
                length: LengthRange::ANY,
                regexes: vec![pattern.clone()],
            });
            Ok((narrow_type_is(subject, &matching), subject.clone()))
        }
        literal => Ok((
            narrow_type_is(subject, literal),
            narrow_type_is_not(subject, literal),
        )),
    }
}

#[cfg(test)]
mod tests;
