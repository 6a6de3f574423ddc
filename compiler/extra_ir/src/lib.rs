//! Extra IR - the parsed expression tree.
//!
//! This crate contains the data structures produced by the parser and
//! consumed by the type system:
//! - Spans for source locations
//! - Comment trivia and the `Source` value that carries it
//! - Expression nodes (`Expr`/`ExprKind`), type expressions and module items
//! - The closed operator table (precedence, associativity, arity)
//! - Printers back to source code and to an S-expression form
//!
//! Nodes own their children (`Box`/`Vec`), so a parsed tree is an ordinary
//! immutable value that can be cloned, compared and sent across threads.

pub mod ast;
mod comment;
pub mod print;
mod source;
mod span;
pub mod visitor;

pub use ast::{
    Argument, ArgumentKind, ArgumentsList, BlockKind, Case, ClassDef, ClassMember,
    ClassMemberKind, Container, DiceLiteral, EntryKey, Entry, EnumDef, EnumMember, Expr,
    ExprKind, FloatLiteral, FormulaArg, FormulaArgKind, FunctionExpr, FunctionKind,
    Identifier, IfBranch, IfExpr, ImportDef, ImportLocation, ImportName, IntBase, IntLiteral,
    Item, ItemKind, Let, LetBinding, MainDef, Module, Operation, Operator, OperatorFixity,
    Associativity, Pattern, Quote, RegexLiteral, StateAssignment, StateDef, StringLiteral,
    StringTemplate, SwitchExpr, SwitchKeyword, TemplatePart, TypeAliasDef, TypeArg, TypeExpr,
    TypeExprKind, TypeProp, ActionDef, ViewChild, ViewElement, ViewProp, BINARY_SYMBOLS,
    BINARY_WORDS, PREFIX_SYMBOLS,
};
pub use comment::{Comment, CommentKind};
pub use source::Source;
pub use span::Span;
