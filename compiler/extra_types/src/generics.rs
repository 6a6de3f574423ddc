//! Generic resolution.
//!
//! Hints and requirements are collected while checking one call (or one
//! formula against another), keyed by [`GenericId`]. Types stay immutable:
//! all per-pass state lives in this context, which is dropped afterwards.
//!
//! - A *hint* is a candidate type: an argument assigned to a parameter
//!   declared `T`. The resolved type is the join of all hints.
//! - A *requirement* is a constraint: a `T` assigned to some concrete
//!   type. The resolved type must be assignable to each of them.

use rustc_hash::FxHashMap;

use crate::error::messages;
use crate::{can_be_assigned_to, compatible_with_both_types, GenericId, GenericType, Type};

#[derive(Clone, Debug, Default)]
pub struct GenericResolution {
    hints: FxHashMap<GenericId, Vec<Type>>,
    requirements: FxHashMap<GenericId, Vec<Type>>,
    resolved: FxHashMap<GenericId, Type>,
}

impl GenericResolution {
    pub fn new() -> Self {
        GenericResolution::default()
    }

    pub fn add_hint(&mut self, generic: &GenericType, ty: Type) {
        tracing::trace!(generic = %generic.name, hint = %ty, "generic hint");
        self.hints.entry(generic.id).or_default().push(ty);
    }

    pub fn add_requirement(&mut self, generic: &GenericType, ty: Type) {
        tracing::trace!(generic = %generic.name, requirement = %ty, "generic requirement");
        self.requirements.entry(generic.id).or_default().push(ty);
    }

    pub fn resolved(&self, generic: &GenericType) -> Option<&Type> {
        self.resolved.get(&generic.id)
    }

    /// Fix a generic to a known type, e.g. from explicit type arguments.
    pub fn bind(&mut self, generic: &GenericType, ty: Type) {
        self.resolved.insert(generic.id, ty);
    }

    pub fn hints(&self, generic: &GenericType) -> &[Type] {
        self.hints.get(&generic.id).map_or(&[], Vec::as_slice)
    }

    /// Resolve a generic from its hints and check it against its
    /// requirements. The result is memoized for the rest of the pass.
    pub fn resolve(&mut self, generic: &GenericType) -> Result<Type, String> {
        if let Some(resolved) = self.resolved.get(&generic.id) {
            return Ok(resolved.clone());
        }
        let resolved = self
            .hints(generic)
            .iter()
            .fold(Type::Always, |joined, hint| {
                compatible_with_both_types(&joined, hint)
            });
        if let Some(requirements) = self.requirements.get(&generic.id) {
            for requirement in requirements {
                if !can_be_assigned_to(&resolved, requirement) {
                    return Err(messages::generic_requirement(
                        &generic.name,
                        &resolved,
                        requirement,
                    ));
                }
            }
        }
        self.resolved.insert(generic.id, resolved.clone());
        Ok(resolved)
    }

    /// Resolve every generic, collecting one message per failure.
    pub fn resolve_all(&mut self, generics: &[GenericType]) -> Result<(), Vec<String>> {
        let errors: Vec<String> = generics
            .iter()
            .filter_map(|generic| self.resolve(generic).err())
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Substitute every resolved generic in `ty`.
    pub fn apply(&self, ty: &Type) -> Type {
        ty.substitute(&|generic| self.resolved.get(&generic.id).cloned())
    }

    /// Substitute resolved generics, and unresolved ones by the join of
    /// the hints seen so far.
    pub fn apply_hinted(&self, ty: &Type) -> Type {
        ty.substitute(&|generic| {
            if let Some(resolved) = self.resolved.get(&generic.id) {
                return Some(resolved.clone());
            }
            let hints = self.hints.get(&generic.id)?;
            Some(hints.iter().fold(Type::Always, |joined, hint| {
                compatible_with_both_types(&joined, hint)
            }))
        })
    }
}
