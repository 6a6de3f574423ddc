//! Grammar productions.
//!
//! # Module Structure
//!
//! - `predicates.rs`: lookahead classification and newline policy
//! - `series.rs`: delimited, separated lists
//! - `expr/`: the operator-precedence engine and every operand shape
//! - `ty.rs`: type expressions
//! - `view.rs`: view elements
//! - `item/`: module-level declarations

mod expr;
mod item;
mod predicates;
mod series;
mod ty;
mod view;
