//! Relationships between references: `y == x + 2`, `a < b`.
//!
//! A relationship is recorded when a `let` binds a reference to a formula
//! of another reference, or when a comparison between two references is
//! assumed to hold. Narrowing one side later narrows the other, one hop
//! deep.

use extra_ir::Operator;

use crate::narrow::{comparison_range, narrow_to_range};
use crate::{Binding, NumberRange, RefId, Type, TypeScope, TypeRuntime};

/// A linear formula over at most one reference.
#[derive(Clone, Debug, PartialEq)]
pub enum RelationshipFormula {
    Value(f64),
    /// `reference + offset`
    Reference {
        binding: Binding,
        id: RefId,
        offset: f64,
    },
}

impl RelationshipFormula {
    #[must_use]
    pub fn shift(self, by: f64) -> Self {
        match self {
            RelationshipFormula::Value(value) => RelationshipFormula::Value(value + by),
            RelationshipFormula::Reference {
                binding,
                id,
                offset,
            } => RelationshipFormula::Reference {
                binding,
                id,
                offset: offset + by,
            },
        }
    }

    pub fn reference_id(&self) -> Option<RefId> {
        match self {
            RelationshipFormula::Value(_) => None,
            RelationshipFormula::Reference { id, .. } => Some(*id),
        }
    }
}

/// `subject <op> formula`
#[derive(Clone, Debug, PartialEq)]
pub struct Relationship {
    pub subject: Binding,
    pub subject_id: RefId,
    /// One of `==`, `!=`, `<`, `<=`, `>`, `>=`.
    pub op: Operator,
    pub formula: RelationshipFormula,
}

impl Relationship {
    pub fn references(&self, id: RefId) -> bool {
        self.subject_id == id || self.formula.reference_id() == Some(id)
    }
}

/// Narrow `binding` to `ty` and push the new bounds through every
/// relationship that mentions it.
pub(crate) fn narrow_binding(scope: &mut TypeScope, binding: &Binding, ty: Type) {
    let id = scope.binding_id(binding);
    let range = ty.number_range().map(|(range, _)| range);
    scope.narrow(binding, ty);
    let (Some(id), Some(range)) = (id, range) else {
        return;
    };
    for relationship in scope.relationships_that_reference(id) {
        let Some((other, allowed)) = implied_constraint(&relationship, id, &range) else {
            continue;
        };
        let Some(current) = scope.binding_type(&other) else {
            continue;
        };
        let narrowed = narrow_to_range(&current, &allowed);
        tracing::trace!(reference = %other.name(), narrowed = %narrowed, "relationship narrowing");
        scope.narrow(&other, narrowed);
    }
}

/// What `relationship` says about its other side once the reference `id`
/// is known to lie in `range`.
fn implied_constraint(
    relationship: &Relationship,
    id: RefId,
    range: &NumberRange,
) -> Option<(Binding, NumberRange)> {
    let RelationshipFormula::Reference {
        binding, offset, ..
    } = &relationship.formula
    else {
        return None;
    };
    if relationship.subject_id == id {
        // subject <op> other + offset  =>  other <flipped> subject - offset
        let op = relationship.op.flipped_comparison()?;
        let allowed = comparison_range(op, &range.shift(-offset))?;
        Some((binding.clone(), allowed))
    } else {
        // subject <op> id + offset
        let allowed = comparison_range(relationship.op, &range.shift(*offset))?;
        Some((relationship.subject.clone(), allowed))
    }
}
