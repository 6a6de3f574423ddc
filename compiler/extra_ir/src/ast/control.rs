//! `let`, `if` and `switch`/`match`.

use super::{Expr, Identifier, TypeExpr};
use crate::{Comment, Source};

/// `let a = 1, b: Int = 2 in body`
#[derive(Clone, Debug, PartialEq)]
pub struct Let {
    pub bindings: Vec<LetBinding>,
    pub body: Expr,
    /// Comments between the last binding and `in`.
    pub in_comments: Vec<Comment>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LetBinding {
    pub name: Identifier,
    pub type_annotation: Option<TypeExpr>,
    pub value: Expr,
}

/// `if a then b elseif c then d else e`
#[derive(Clone, Debug, PartialEq)]
pub struct IfExpr {
    pub branches: Vec<IfBranch>,
    pub else_body: Option<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IfBranch {
    pub condition: Expr,
    pub body: Expr,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SwitchKeyword {
    Switch,
    Match,
}

impl SwitchKeyword {
    pub const fn as_str(self) -> &'static str {
        match self {
            SwitchKeyword::Switch => "switch",
            SwitchKeyword::Match => "match",
        }
    }
}

/// `switch (subject) { case p: a … else: b }`
#[derive(Clone, Debug, PartialEq)]
pub struct SwitchExpr {
    pub keyword: SwitchKeyword,
    pub subject: Expr,
    pub cases: Vec<Case>,
    pub else_body: Option<Expr>,
    pub closing_comments: Vec<Comment>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Case {
    pub source: Source,
    pub pattern: Pattern,
    pub body: Expr,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Pattern {
    /// `_`
    Wildcard(Source),
    /// `name` binds the subject.
    Binding(Identifier),
    /// A literal, regex or range (`1...5`) the subject is compared with.
    Value(Expr),
    /// `Type` or `Type as name`.
    Type {
        binding: Option<Identifier>,
        ty: TypeExpr,
    },
}
