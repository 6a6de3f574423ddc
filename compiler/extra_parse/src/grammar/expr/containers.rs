//! Container literals: `[…]`, `#[…]`, `#{…}` and `{…}`.
//!
//! Items are separated by commas or newlines. Inside the brackets a newline
//! ends the current item unless the next line continues it
//! (see `predicates::continues_after_newline`).

use extra_diagnostic::ErrorCode;
use extra_ir::{Container, Entry, EntryKey, Expr, ExprKind, Source};
use extra_scanner::{is_word_start, ScanOptions};

use crate::grammar::predicates;
use crate::grammar::series::SeriesConfig;
use crate::{ParseResult, Parser};

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum ContainerKind {
    Array,
    Set,
    Dict,
    Object,
}

impl ContainerKind {
    const fn delimiters(self) -> (&'static str, &'static str) {
        match self {
            ContainerKind::Array => ("[", "]"),
            ContainerKind::Set => ("#[", "]"),
            ContainerKind::Dict => ("#{", "}"),
            ContainerKind::Object => ("{", "}"),
        }
    }
}

impl Parser<'_> {
    pub(crate) fn array(&mut self) -> ParseResult<Expr> {
        self.container_expr(ContainerKind::Array)
    }

    pub(crate) fn set(&mut self) -> ParseResult<Expr> {
        self.container_expr(ContainerKind::Set)
    }

    pub(crate) fn dict(&mut self) -> ParseResult<Expr> {
        self.container_expr(ContainerKind::Dict)
    }

    pub(crate) fn object(&mut self) -> ParseResult<Expr> {
        self.container_expr(ContainerKind::Object)
    }

    fn container_expr(&mut self, kind: ContainerKind) -> ParseResult<Expr> {
        let start = self.scanner.pos();
        let container = self.container(kind)?;
        let source = Source::new(self.scanner.span_from(start));
        let kind = match kind {
            ContainerKind::Array => ExprKind::Array(container),
            ContainerKind::Set => ExprKind::Set(container),
            ContainerKind::Dict => ExprKind::Dict(container),
            ContainerKind::Object => ExprKind::Object(container),
        };
        Ok(Expr::new(kind, source))
    }

    fn container(&mut self, kind: ContainerKind) -> ParseResult<Container> {
        let (open, close) = kind.delimiters();
        let start = self.scanner.pos();
        self.scanner.expect_string(open)?;
        let options = self.nested_options() | ScanOptions::LIST_ITEMS;
        self.with_options(options, |p| {
            let config = SeriesConfig::new(open, close, start);
            let entries = p.series(&config, |p| p.entry(kind))?;
            Ok(Container {
                entries: entries.items,
                closing_comments: entries.closing_comments,
            })
        })
    }

    fn entry(&mut self, kind: ContainerKind) -> ParseResult<Entry> {
        let start = self.scanner.pos();
        let entry = if self.scanner.is_at("...") {
            let comments = self.take_comments();
            self.scanner.advance_by(3);
            // Comments after `...` lead the spread value.
            self.skip_trivia()?;
            let value = self.expression()?;
            Entry::Spread {
                source: Source::from_range(start, value.span().end).with_preceding(comments),
                value,
            }
        } else if kind != ContainerKind::Array
            && kind != ContainerKind::Set
            && self.scanner.current().is_some_and(is_word_start)
            && predicates::named_entry_ahead(&mut self.scanner)?
        {
            let key = self.identifier()?;
            self.pair_value(EntryKey::Name(key))?
        } else {
            let value = self.expression()?;
            let keyed = matches!(kind, ContainerKind::Dict | ContainerKind::Object);
            if keyed && predicates::is_at_colon(&self.scanner) {
                let key = self.entry_key(value)?;
                self.pair_value(key)?
            } else if kind == ContainerKind::Dict {
                return Err(self.scanner.error_from(
                    ErrorCode::E1001,
                    "dict entries need a key: `key: value`",
                    value.span().start,
                ));
            } else {
                Entry::Value(value)
            }
        };
        if !self.scanner.is_at_word("if") {
            return Ok(entry);
        }
        self.scanner.advance_by(2);
        self.skip_trivia()?;
        let options = self.scanner.options() - ScanOptions::ALLOW_SPLAT - ScanOptions::ALLOW_INCLUSION;
        let condition = self.expression_with(options)?;
        let source = Source::from_range(start, condition.span().end);
        Ok(Entry::Inclusion {
            entry: Box::new(entry),
            condition,
            source,
        })
    }

    /// Turn the expression in front of a `:` into an entry key: a literal,
    /// or `[expr]` for a computed key.
    fn entry_key(&self, value: Expr) -> ParseResult<EntryKey> {
        if value.is_literal() {
            return Ok(EntryKey::Literal(value));
        }
        let start = value.span().start;
        if let ExprKind::Array(container) = value.kind {
            if let [Entry::Value(_)] = container.entries.as_slice() {
                let Container {
                    mut entries,
                    closing_comments,
                } = container;
                if let Some(Entry::Value(mut key)) = entries.pop() {
                    key.push_preceding_comments(value.source.preceding_comments);
                    key.push_following_comments(closing_comments);
                    key.push_following_comments(value.source.following_comments);
                    return Ok(EntryKey::Computed(key));
                }
            }
        }
        Err(self.scanner.error_from(
            ErrorCode::E1001,
            "keys are names, literals or `[computed]` expressions",
            start,
        ))
    }

    /// `: value` after an entry key.
    fn pair_value(&mut self, key: EntryKey) -> ParseResult<Entry> {
        let mut key = key;
        self.skip_trivia()?;
        let comments = self.take_comments();
        match &mut key {
            EntryKey::Name(ident) => ident.source.following_comments.extend(comments),
            EntryKey::Literal(expr) | EntryKey::Computed(expr) => {
                expr.push_following_comments(comments);
            }
        }
        if !predicates::is_at_colon(&self.scanner) {
            return Err(self.scanner.unexpected("`:`"));
        }
        self.scanner.advance();
        self.skip_trivia()?;
        let value = self.expression()?;
        Ok(Entry::Pair { key, value })
    }
}
