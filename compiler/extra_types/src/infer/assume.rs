//! Flow narrowing: the scope as seen by code that runs only when an
//! expression is truthy, or only when it is falsy.
//!
//! Every entry point returns a fresh child of the scope it was given, so
//! [`TypeScope::narrowed_since`] can tell what an assumption changed. That
//! is how `a or b` merges two alternative narrowings.

use extra_ir::{Expr, ExprKind, Operator};
use extra_stack::ensure_sufficient_stack;

use super::{binding_of, infer};
use crate::narrow::{falsy_type, narrow_comparison, truthy_type};
use crate::relationship::narrow_binding;
use crate::{
    compatible_with_both_types, narrow_type_is, narrow_type_is_not, resolve_type_expr,
    LengthRange, Literal, Relationship, RelationshipFormula, StringType, Type, TypeError,
    TypeRuntime, TypeScope,
};

/// The scope inside `if expr then …`.
pub fn assume_true(expr: &Expr, scope: &TypeScope) -> Result<TypeScope, TypeError> {
    assume(expr, scope, true)
}

/// The scope inside the `else` of `if expr then … else …`.
pub fn assume_false(expr: &Expr, scope: &TypeScope) -> Result<TypeScope, TypeError> {
    assume(expr, scope, false)
}

fn assume(expr: &Expr, scope: &TypeScope, truthy: bool) -> Result<TypeScope, TypeError> {
    ensure_sufficient_stack(|| assume_inner(expr, scope, truthy))
        .map_err(|error| error.or_span(expr.span()))
}

fn assume_inner(expr: &Expr, scope: &TypeScope, truthy: bool) -> Result<TypeScope, TypeError> {
    match &expr.kind {
        ExprKind::Reference(_) | ExprKind::StateReference(_) => {
            let mut inner = scope.child();
            if let Some(binding) = binding_of(expr) {
                if let Some(ty) = inner.binding_type(&binding) {
                    let narrowed = if truthy {
                        truthy_type(&ty)
                    } else {
                        falsy_type(&ty)
                    };
                    narrow_binding(&mut inner, &binding, narrowed);
                }
            }
            Ok(inner)
        }
        ExprKind::Operation(operation) => match (operation.op, operation.args.as_slice()) {
            (Operator::Not, [operand]) => assume(operand, scope, !truthy),
            (Operator::And, [lhs, rhs]) => {
                if truthy {
                    let both = assume(lhs, scope, true)?;
                    assume(rhs, &both, true)
                } else {
                    let left = assume(lhs, scope, false)?;
                    let right = assume(rhs, &assume(lhs, scope, true)?, false)?;
                    Ok(either(&left, &right, scope))
                }
            }
            (Operator::Or, [lhs, rhs]) => {
                if truthy {
                    let left = assume(lhs, scope, true)?;
                    let right = assume(rhs, &assume(lhs, scope, false)?, true)?;
                    Ok(either(&left, &right, scope))
                } else {
                    let neither = assume(lhs, scope, false)?;
                    assume(rhs, &neither, false)
                }
            }
            (Operator::Is | Operator::IsNot, [lhs, rhs]) => {
                let holds = (operation.op == Operator::Is) == truthy;
                assume_type_test(lhs, rhs, scope, holds)
            }
            (Operator::Matches | Operator::NotMatches, [lhs, rhs]) => {
                let holds = (operation.op == Operator::Matches) == truthy;
                assume_match(lhs, rhs, scope, holds)
            }
            (op, [lhs, rhs]) if op.is_comparison() => {
                let op = if truthy {
                    Some(op)
                } else {
                    op.negated_comparison()
                };
                match op {
                    Some(op) => assume_comparison(op, lhs, rhs, scope),
                    None => Ok(scope.child()),
                }
            }
            _ => Ok(scope.child()),
        },
        _ => Ok(scope.child()),
    }
}

/// The scope when either `left` or `right` holds: only bindings both of
/// them narrowed stay narrowed, to the join of the two.
fn either(left: &TypeScope, right: &TypeScope, base: &TypeScope) -> TypeScope {
    let right_narrowed = right.narrowed_since(base);
    let mut inner = base.child();
    for (binding, left_type) in left.narrowed_since(base) {
        let Some((_, right_type)) = right_narrowed.iter().find(|(other, _)| *other == binding)
        else {
            continue;
        };
        inner.narrow(&binding, compatible_with_both_types(&left_type, right_type));
    }
    inner
}

/// `lhs is Type` (or its negation) narrows a reference on the left.
fn assume_type_test(
    lhs: &Expr,
    rhs: &Expr,
    scope: &TypeScope,
    holds: bool,
) -> Result<TypeScope, TypeError> {
    let mut inner = scope.child();
    let (Some(binding), ExprKind::Type(assertion)) = (binding_of(lhs), &rhs.kind) else {
        return Ok(inner);
    };
    let assertion = resolve_type_expr(assertion, scope)?;
    if let Some(ty) = inner.binding_type(&binding) {
        let narrowed = if holds {
            narrow_type_is(&ty, &assertion)
        } else {
            narrow_type_is_not(&ty, &assertion)
        };
        narrow_binding(&mut inner, &binding, narrowed);
    }
    Ok(inner)
}

/// `x =~ /re/` makes `x` a string matching `re`. The negation says nothing.
fn assume_match(
    lhs: &Expr,
    rhs: &Expr,
    scope: &TypeScope,
    holds: bool,
) -> Result<TypeScope, TypeError> {
    let mut inner = scope.child();
    if !holds {
        return Ok(inner);
    }
    let Some(binding) = binding_of(lhs) else {
        return Ok(inner);
    };
    let Type::Literal(Literal::Regex(pattern)) = infer(rhs, scope, None)? else {
        return Ok(inner);
    };
    if let Some(ty) = inner.binding_type(&binding) {
        let matching = Type::string(StringType {
            length: LengthRange::ANY,
            regexes: vec![pattern],
        });
        narrow_binding(&mut inner, &binding, narrow_type_is(&ty, &matching));
    }
    Ok(inner)
}

/// `lhs <op> rhs` holds: narrow whichever sides are references, and
/// remember the relationship when the right side is a linear formula of
/// another reference.
fn assume_comparison(
    op: Operator,
    lhs: &Expr,
    rhs: &Expr,
    scope: &TypeScope,
) -> Result<TypeScope, TypeError> {
    let lhs_type = infer(lhs, scope, None)?;
    let rhs_type = infer(rhs, scope, None)?;
    let mut inner = scope.child();
    if let Some(binding) = binding_of(lhs) {
        narrow_binding(&mut inner, &binding, narrow_operand(&lhs_type, op, &rhs_type));
    }
    if let (Some(binding), Some(flipped)) = (binding_of(rhs), op.flipped_comparison()) {
        let current = inner.binding_type(&binding).unwrap_or(rhs_type);
        narrow_binding(&mut inner, &binding, narrow_operand(&current, flipped, &lhs_type));
    }
    if let Some(subject) = binding_of(lhs) {
        let formula = relationship_formula(rhs, scope);
        if let (Some(subject_id), Some(formula @ RelationshipFormula::Reference { .. })) =
            (scope.binding_id(&subject), formula)
        {
            inner.add_relationship(Relationship {
                subject,
                subject_id,
                op,
                formula,
            });
        }
    }
    Ok(inner)
}

/// One side of a comparison: equality with a literal or `null` is a type
/// test, anything else narrows a numeric range.
fn narrow_operand(ty: &Type, op: Operator, other: &Type) -> Type {
    let exact = matches!(other, Type::Literal(_) | Type::Null);
    match op {
        Operator::Equal if exact => narrow_type_is(ty, other),
        Operator::NotEqual if exact => {
            narrow_comparison(&narrow_type_is_not(ty, other), op, other)
        }
        _ => narrow_comparison(ty, op, other),
    }
}

/// `expr` as a linear formula over at most one reference: a number, a
/// reference, or a reference plus or minus a constant.
pub fn relationship_formula(expr: &Expr, scope: &TypeScope) -> Option<RelationshipFormula> {
    match &expr.kind {
        ExprKind::Int(literal) => Some(RelationshipFormula::Value(literal.value as f64)),
        ExprKind::Float(literal) => Some(RelationshipFormula::Value(literal.value)),
        ExprKind::Reference(_) | ExprKind::StateReference(_) => {
            let binding = binding_of(expr)?;
            let id = scope.binding_id(&binding)?;
            Some(RelationshipFormula::Reference {
                binding,
                id,
                offset: 0.0,
            })
        }
        ExprKind::Operation(operation) => match (operation.op, operation.args.as_slice()) {
            (Operator::Negate, [operand]) => match relationship_formula(operand, scope)? {
                RelationshipFormula::Value(value) => Some(RelationshipFormula::Value(-value)),
                RelationshipFormula::Reference { .. } => None,
            },
            (Operator::Add, [lhs, rhs]) => {
                let lhs = relationship_formula(lhs, scope)?;
                let rhs = relationship_formula(rhs, scope)?;
                match (lhs, rhs) {
                    (formula, RelationshipFormula::Value(by))
                    | (RelationshipFormula::Value(by), formula) => Some(formula.shift(by)),
                    _ => None,
                }
            }
            (Operator::Subtract, [lhs, rhs]) => {
                let lhs = relationship_formula(lhs, scope)?;
                match relationship_formula(rhs, scope)? {
                    RelationshipFormula::Value(by) => Some(lhs.shift(-by)),
                    RelationshipFormula::Reference { .. } => None,
                }
            }
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests;
