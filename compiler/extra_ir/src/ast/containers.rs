//! Container literals: `[…]`, `#[…]`, `#{…}`, `{…}`.

use super::{Expr, Identifier};
use crate::{Comment, Source};

/// Entries of a container literal plus the comments found before its
/// closing bracket.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Container {
    pub entries: Vec<Entry>,
    pub closing_comments: Vec<Comment>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Entry {
    /// `value`; positional in objects, an element in arrays and sets.
    Value(Expr),
    /// `key: value` in objects and dicts.
    Pair { key: EntryKey, value: Expr },
    /// `...expr`
    Spread { source: Source, value: Expr },
    /// `entry if condition`
    Inclusion {
        entry: Box<Entry>,
        condition: Expr,
        source: Source,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum EntryKey {
    /// Bare identifier: a property name in objects, a string key in dicts.
    Name(Identifier),
    /// Literal key in a dict (`1: …`, `'a': …`, `null: …`).
    Literal(Expr),
    /// `[expr]: …` computed dict key.
    Computed(Expr),
}

impl Entry {
    /// The expression carrying the entry's value, under any inclusion guard.
    pub fn value(&self) -> &Expr {
        match self {
            Entry::Value(value) | Entry::Pair { value, .. } | Entry::Spread { value, .. } => value,
            Entry::Inclusion { entry, .. } => entry.value(),
        }
    }

    pub fn is_spread(&self) -> bool {
        match self {
            Entry::Spread { .. } => true,
            Entry::Inclusion { entry, .. } => entry.is_spread(),
            _ => false,
        }
    }
}

impl EntryKey {
    /// Static key text, when the key is known at parse time.
    pub fn static_name(&self) -> Option<String> {
        match self {
            EntryKey::Name(ident) => Some(ident.name.clone()),
            EntryKey::Literal(expr) => match &expr.kind {
                super::ExprKind::Str(lit) => Some(lit.value.clone()),
                super::ExprKind::Int(lit) => Some(lit.value.to_string()),
                _ => None,
            },
            EntryKey::Computed(_) => None,
        }
    }
}
