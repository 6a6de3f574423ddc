//! Type expressions: the syntax of types, before resolution.

use super::{Expr, FormulaArg, Identifier, Operator, RegexLiteral, StringLiteral};
use crate::Source;

#[derive(Clone, Debug, PartialEq)]
pub struct TypeExpr {
    pub source: Source,
    pub kind: TypeExprKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TypeExprKind {
    /// `null`
    Null,
    /// `1`, `-2.5`, `'a'`, `true`
    Literal(Box<Expr>),
    /// `Int`, `Int(>=0)`, `Array(Int, length: >=1)`, `User`, `Box(Int)`
    Named { name: String, args: Vec<TypeArg> },
    /// `{name: String, Int}`
    Object(Vec<TypeProp>),
    /// `A | B`
    OneOf(Vec<TypeExpr>),
    /// `T?`
    Optional(Box<TypeExpr>),
    /// `fn<T>(#a: T): T`
    Formula {
        generics: Vec<Identifier>,
        args: Vec<FormulaArg>,
        return_type: Box<TypeExpr>,
    },
}

/// Argument inside `Name(…)` in a type expression.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeArg {
    Type(TypeExpr),
    /// `>=5`, `<10`, `=3`
    Comparison { op: Operator, value: Expr },
    /// `1...10`, `0..<5`
    Range {
        op: Operator,
        start: Expr,
        stop: Expr,
    },
    /// `/^\d+$/`
    Regex(RegexLiteral),
    /// `['a', 'b']`
    Names(Vec<StringLiteral>),
    /// `length: >=1`, `keys: ['a']`
    Named { name: Identifier, value: Box<TypeArg> },
}

#[derive(Clone, Debug, PartialEq)]
pub enum TypeProp {
    Named { name: Identifier, ty: TypeExpr },
    Positional(TypeExpr),
}

impl TypeExpr {
    pub fn new(kind: TypeExprKind, source: Source) -> Self {
        TypeExpr { source, kind }
    }

    /// `Name` with no arguments.
    pub fn named(name: impl Into<String>, source: Source) -> Self {
        TypeExpr::new(
            TypeExprKind::Named {
                name: name.into(),
                args: Vec::new(),
            },
            source,
        )
    }
}
