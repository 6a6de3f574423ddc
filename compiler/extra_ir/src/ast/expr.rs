//! The expression node.

use super::{
    ArgumentsList, Container, DiceLiteral, FloatLiteral, FunctionExpr, IfExpr, IntLiteral, Let,
    Operator, RegexLiteral, StringLiteral, StringTemplate, SwitchExpr, TypeExpr, ViewElement,
};
use crate::{Comment, Source, Span};

/// A parsed expression: where it came from plus what it is.
#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub source: Source,
    pub kind: ExprKind,
}

/// Every expression shape the parser produces.
///
/// The set is closed; the type checker and printers match on it
/// exhaustively.
#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    // Literals
    Null,
    Bool(bool),
    Int(IntLiteral),
    Float(FloatLiteral),
    Str(StringLiteral),
    Template(StringTemplate),
    Regex(RegexLiteral),
    Dice(DiceLiteral),

    // References
    /// `name`
    Reference(String),
    /// `@name`
    StateReference(String),
    /// `this`
    This,
    /// `#` on the right-hand side of a pipe
    PipePlaceholder,
    /// `.name`, the right operand of `.`/`?.` and the enum-member shorthand
    PropertyName(String),

    // Containers
    Array(Container),
    Set(Container),
    Dict(Container),
    Object(Container),

    // Compound
    Let(Box<Let>),
    If(Box<IfExpr>),
    Switch(Box<SwitchExpr>),
    Function(Box<FunctionExpr>),
    /// The right operand of a call: `(…)` plus any block arguments.
    Arguments(Box<ArgumentsList>),
    /// The right operand of `is`/`!is`.
    Type(Box<TypeExpr>),
    View(Box<ViewElement>),

    /// Unary and binary operators, including postfix access.
    Operation(Box<Operation>),
}

/// `{op, args}`: the reduced form of every operator.
///
/// `args.len() == op.arity()` is enforced when the expression engine
/// reduces the operator.
#[derive(Clone, Debug, PartialEq)]
pub struct Operation {
    pub op: Operator,
    pub args: Vec<Expr>,
    /// Comments scanned after the operator symbol, before its right operand.
    pub following_operator_comments: Vec<Comment>,
}

/// A bare name in a declaring position (binding, key, argument name).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub name: String,
    pub source: Source,
}

impl Identifier {
    pub fn new(name: impl Into<String>, source: Source) -> Self {
        Identifier {
            name: name.into(),
            source,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl Expr {
    #[inline]
    pub fn new(kind: ExprKind, source: Source) -> Self {
        Expr { source, kind }
    }

    #[inline]
    pub fn span(&self) -> Span {
        self.source.span
    }

    /// Build an operator node, spanning its operands.
    pub fn operation(op: Operator, args: Vec<Expr>, start: u32) -> Self {
        let end = args.iter().map(|arg| arg.source.span.end).max().unwrap_or(start);
        let start = args
            .iter()
            .map(|arg| arg.source.span.start)
            .min()
            .map_or(start, |s| s.min(start));
        Expr::new(
            ExprKind::Operation(Box::new(Operation {
                op,
                args,
                following_operator_comments: Vec::new(),
            })),
            Source::from_range(start, end),
        )
    }

    pub fn as_operation(&self) -> Option<&Operation> {
        match &self.kind {
            ExprKind::Operation(operation) => Some(operation),
            _ => None,
        }
    }

    /// Name of a plain reference, if this is one.
    pub fn reference_name(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Reference(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Null
                | ExprKind::Bool(_)
                | ExprKind::Int(_)
                | ExprKind::Float(_)
                | ExprKind::Str(_)
                | ExprKind::Regex(_)
        )
    }

    /// Numeric literal nodes, the ones unary negation folds into.
    pub fn is_numeric_literal(&self) -> bool {
        matches!(self.kind, ExprKind::Int(_) | ExprKind::Float(_))
    }

    pub fn push_preceding_comments(&mut self, comments: Vec<Comment>) {
        if comments.is_empty() {
            return;
        }
        let mut all = comments;
        all.append(&mut self.source.preceding_comments);
        self.source.preceding_comments = all;
    }

    pub fn push_following_comments(&mut self, mut comments: Vec<Comment>) {
        self.source.following_comments.append(&mut comments);
    }
}
