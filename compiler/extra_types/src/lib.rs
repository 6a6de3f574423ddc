//! Structural type system for Extra.
//!
//! # Overview
//!
//! - [`Type`]: the type lattice (`ty`)
//! - [`can_be_assigned_to`]: subtyping (`assign`)
//! - [`compatible_with_both_types`]: joins (`join`)
//! - [`check_formula_arguments`]: call checking with generics (`formula`, `generics`)
//! - [`narrow_type_is`] / [`narrow_type_is_not`]: type-guard narrowing (`narrow`)
//! - [`TypeScope`]: the layered [`TypeRuntime`] names are resolved through (`runtime`)
//! - [`get_type`], [`assume_true`], [`assume_false`]: per-node inference and
//!   flow narrowing over the parsed tree (`infer`)
//! - [`eval`]: constant evaluation, used to fold literal operations (`eval`)
//! - [`check_module`]: registers and checks every declaration of a module (`check`)
//!
//! Type-time failures are values ([`TypeError`]), never panics, so one
//! check can report several problems at once.

mod assign;
mod builtins;
mod check;
mod error;
mod eval;
mod formula;
mod generics;
mod infer;
mod join;
mod narrow;
mod relationship;
mod resolve;
mod runtime;
mod ty;
mod value;

pub use assign::{can_be_assigned_to, check_assignable, Assigner};
pub use builtins::property_type;
pub use check::{check_module, ModuleCheck};
pub use error::{combine_error_messages, messages, TypeError};
pub use eval::{eval, EvalError, ValueRuntime, ValueScope};
pub use formula::{check_formula_arguments, ArgumentType};
pub use generics::GenericResolution;
pub use infer::{assume_false, assume_true, get_type, relationship_formula};
pub use join::compatible_with_both_types;
pub use narrow::{narrow_type_is, narrow_type_is_not};
pub use relationship::{Relationship, RelationshipFormula};
pub use resolve::resolve_type_expr;
pub use runtime::{Binding, NamedType, RefId, TypeRuntime, TypeScope, ViewRuntime};
pub use ty::{
    Bound, ClassProp, ClassType, CollectionType, DictType, EnumMemberType, EnumType,
    FormulaArgKind, FormulaArgType, FormulaType, GenericId, GenericType, LengthRange, Literal,
    NumberRange, ObjectProp, ObjectType, RegexPattern, StringType, Type,
};
pub use value::Value;
