//! View (JSX) elements.

use super::{Expr, Identifier};
use crate::{Comment, Span};

/// `<Tag props…>children</Tag>`, `<Tag />`, or a fragment `<>…</>`.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewElement {
    /// `None` for fragments.
    pub tag: Option<String>,
    pub props: Vec<ViewProp>,
    /// `None` for self-closing elements.
    pub children: Option<Vec<ViewChild>>,
    /// Comments between the last prop and `>`/`/>`.
    pub closing_comments: Vec<Comment>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewProp {
    pub name: Identifier,
    /// `None` for the bare `flag` shorthand (`flag={true}`).
    pub value: Option<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewChild {
    Text { text: String, span: Span },
    /// `{expr}`
    Expr(Expr),
    Element(Expr),
}
