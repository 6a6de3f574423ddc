//! Expression tree nodes.
//!
//! # Module Structure
//!
//! - `expr.rs`: `Expr`, the closed `ExprKind` sum and `Identifier`
//! - `literals.rs`: literal payloads (numbers, strings, templates, regex, dice)
//! - `containers.rs`: array/dict/set/object literals and their entries
//! - `control.rs`: `let`, `if`, `switch`/`match`
//! - `functions.rs`: function literals, formula arguments, call arguments
//! - `types.rs`: type expressions
//! - `view.rs`: view (JSX) elements
//! - `items.rs`: module-level declarations
//! - `operators.rs`: the operator table

mod containers;
mod control;
mod expr;
mod functions;
mod items;
mod literals;
mod operators;
mod types;
mod view;

pub use containers::{Container, Entry, EntryKey};
pub use control::{Case, IfBranch, IfExpr, Let, LetBinding, Pattern, SwitchExpr, SwitchKeyword};
pub use expr::{Expr, ExprKind, Identifier, Operation};
pub use functions::{
    Argument, ArgumentKind, ArgumentsList, BlockKind, FormulaArg, FormulaArgKind, FunctionExpr,
    FunctionKind,
};
pub use items::{
    ActionDef, ClassDef, ClassMember, ClassMemberKind, EnumDef, EnumMember, ImportDef,
    ImportLocation, ImportName, Item, ItemKind, MainDef, Module, StateAssignment, StateDef,
    TypeAliasDef,
};
pub use literals::{
    DiceLiteral, FloatLiteral, IntBase, IntLiteral, Quote, RegexLiteral, StringLiteral,
    StringTemplate, TemplatePart,
};
pub use operators::{
    Associativity, Operator, OperatorFixity, BINARY_SYMBOLS, BINARY_WORDS, PREFIX_SYMBOLS,
};
pub use types::{TypeArg, TypeExpr, TypeExprKind, TypeProp};
pub use view::{ViewChild, ViewElement, ViewProp};

#[cfg(test)]
mod tests;
