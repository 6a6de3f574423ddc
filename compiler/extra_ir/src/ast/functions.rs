//! Function literals, their formal arguments, and call-site arguments.

use super::{Expr, Identifier, TypeExpr};
use crate::{Comment, Source};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum FunctionKind {
    /// `fn(…) => …`
    Anonymous,
    /// `helper name(…) => …`
    Named,
    /// `fn name(…)` inside a class body.
    Instance,
    /// `static fn name(…)` inside a class body.
    Static,
    /// `view Name(…) => <…>` and a view class's `render`.
    View,
}

/// Formula argument kinds, in declaration syntax:
/// `#a` positional, `a` named, `...#as` spread-positional,
/// `...a` repeated-named, `*a` kwargs-list.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum FormulaArgKind {
    Positional,
    Named,
    SpreadPositional,
    RepeatedNamed,
    Kwargs,
}

impl FormulaArgKind {
    pub const fn prefix(self) -> &'static str {
        match self {
            FormulaArgKind::Positional => "#",
            FormulaArgKind::Named => "",
            FormulaArgKind::SpreadPositional => "...#",
            FormulaArgKind::RepeatedNamed => "...",
            FormulaArgKind::Kwargs => "*",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FormulaArg {
    pub kind: FormulaArgKind,
    pub name: Identifier,
    pub type_annotation: Option<TypeExpr>,
    pub default: Option<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionExpr {
    pub kind: FunctionKind,
    pub name: Option<Identifier>,
    pub generics: Vec<Identifier>,
    pub args: Vec<FormulaArg>,
    pub return_type: Option<TypeExpr>,
    pub body: Expr,
}

/// How block arguments were attached to a call.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum BlockKind {
    #[default]
    None,
    /// `f(…) { a, b }`
    Braces,
    /// `f(…): a`
    Colon,
}

/// Right operand of a call: parenthesized arguments followed by block
/// arguments, all in one list so argument order is preserved.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ArgumentsList {
    pub parens: Vec<Argument>,
    pub block: Vec<Argument>,
    pub block_kind: BlockKind,
    /// Comments before the closing `)`.
    pub last_parens_comments: Vec<Comment>,
    /// Comments before the closing `}` of a brace block.
    pub block_comments: Vec<Comment>,
}

impl ArgumentsList {
    /// Parenthesized then block arguments, in call order.
    pub fn all(&self) -> impl Iterator<Item = &Argument> {
        self.parens.iter().chain(self.block.iter())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Argument {
    pub source: Source,
    pub kind: ArgumentKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ArgumentKind {
    /// `value`
    Positional(Expr),
    /// `name: value`
    Named { name: Identifier, value: Expr },
    /// `...values`
    SpreadPositional(Expr),
    /// `...name: values`
    RepeatedNamed { name: Identifier, values: Expr },
    /// `*dict`
    KwargsList(Expr),
}

impl Argument {
    pub fn value(&self) -> &Expr {
        match &self.kind {
            ArgumentKind::Positional(value)
            | ArgumentKind::Named { value, .. }
            | ArgumentKind::SpreadPositional(value)
            | ArgumentKind::KwargsList(value) => value,
            ArgumentKind::RepeatedNamed { values, .. } => values,
        }
    }
}
