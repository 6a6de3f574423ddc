//! Type expression parsing.
//!
//! ```text
//! type     = optional ("|" optional)*
//! optional = primary "?"*
//! primary  = "(" type ")" | "{" props "}" | "fn" generics? "(" args ")" ":" type
//!          | "null" | literal | Name ("(" type_arg, … ")")?
//! ```

use extra_diagnostic::ErrorCode;
use extra_ir::{
    Expr, ExprKind, IntLiteral, Operator, Source, TypeArg, TypeExpr, TypeExprKind, TypeProp,
    BINARY_SYMBOLS,
};
use extra_scanner::{is_word_start, ScanOptions};
use extra_stack::ensure_sufficient_stack;

use crate::grammar::predicates;
use crate::grammar::series::SeriesConfig;
use crate::{ParseResult, Parser};

/// Comparisons accepted as type arguments, longest first. `=` is a
/// shorthand for `==`.
const TYPE_COMPARISONS: &[(&str, Operator)] = &[
    (">=", Operator::GreaterEqual),
    ("<=", Operator::LessEqual),
    ("==", Operator::Equal),
    (">", Operator::Greater),
    ("<", Operator::Less),
    ("=", Operator::Equal),
];

fn is_range(op: Operator) -> bool {
    matches!(
        op,
        Operator::RangeInclusive
            | Operator::RangeExclusiveStart
            | Operator::RangeExclusiveEnd
            | Operator::RangeExclusive
    )
}

impl Parser<'_> {
    /// Parse a type expression.
    pub fn type_expr(&mut self) -> ParseResult<TypeExpr> {
        ensure_sufficient_stack(|| self.one_of_type())
    }

    fn one_of_type(&mut self) -> ParseResult<TypeExpr> {
        let first = self.optional_type()?;
        let start = first.source.start();
        let mut members = vec![first];
        while self.one_of_continues()? {
            self.skip_trivia()?;
            if let Some(last) = members.last_mut() {
                last.source.following_comments.extend(self.take_comments());
            }
            self.scanner.advance();
            self.skip_trivia()?;
            members.push(self.optional_type()?);
        }
        if members.len() == 1 {
            return Ok(members.remove(0));
        }
        let end = members.last().map_or(start, |ty| ty.source.stop());
        Ok(TypeExpr::new(
            TypeExprKind::OneOf(members),
            Source::from_range(start, end),
        ))
    }

    /// A `|` that joins another member: not `||` or `|>`. A newline may come
    /// first unless newlines separate items here.
    fn one_of_continues(&mut self) -> ParseResult<bool> {
        let newline_separates = self.scanner.has_option(ScanOptions::NEWLINE_IS_SEPARATOR);
        self.scanner.test(|s| {
            if newline_separates {
                s.scan_spaces()?;
            } else {
                s.scan_all_whitespace()?;
            }
            Ok(s.is_at("|") && !s.is_at("||") && !s.is_at("|>"))
        })
    }

    fn optional_type(&mut self) -> ParseResult<TypeExpr> {
        let mut ty = self.primary_type()?;
        while self.scanner.is_at("?")
            && !self.scanner.is_at("??")
            && !self.scanner.is_at("?.")
            && !self.scanner.is_at("?|>")
        {
            let start = ty.source.start();
            self.scanner.advance();
            ty = TypeExpr::new(
                TypeExprKind::Optional(Box::new(ty)),
                Source::new(self.scanner.span_from(start)),
            );
        }
        Ok(ty)
    }

    fn primary_type(&mut self) -> ParseResult<TypeExpr> {
        let comments = self.take_comments();
        let mut ty = self.primary_type_body()?;
        let mut preceding = comments;
        preceding.append(&mut ty.source.preceding_comments);
        ty.source.preceding_comments = preceding;
        Ok(ty)
    }

    fn primary_type_body(&mut self) -> ParseResult<TypeExpr> {
        let start = self.scanner.pos();
        if self.scanner.is_at("(") {
            self.scanner.advance();
            self.skip_trivia()?;
            let options = self.nested_options();
            let mut ty = self.with_options(options, Self::type_expr)?;
            self.skip_trivia()?;
            ty.source.following_comments.extend(self.take_comments());
            self.expect_closing("(", ")", start)?;
            return Ok(ty);
        }
        if predicates::is_at_open_brace(&self.scanner) {
            return self.object_type();
        }
        if self.scanner.is_at_word("fn") {
            return self.formula_type();
        }
        if self.scanner.scan_if_word("null") {
            return Ok(TypeExpr::new(
                TypeExprKind::Null,
                Source::new(self.scanner.span_from(start)),
            ));
        }
        if let Some(literal) = self.literal_type()? {
            return Ok(literal);
        }
        let Some(word) = self.scanner.peek_word() else {
            return Err(self.expected(ErrorCode::E1005, "a type"));
        };
        if predicates::is_reserved(word) || matches!(word, "let" | "if" | "switch" | "match") {
            return Err(self.expected(ErrorCode::E1005, "a type"));
        }
        self.scanner.advance_by(word.len());
        let mut args = Vec::new();
        if self.scanner.is_at("(") {
            let open = self.scanner.pos();
            self.scanner.advance();
            let options = self.nested_options();
            let config = SeriesConfig::new("(", ")", open).keep_closing_comments();
            args = self
                .with_options(options, |p| p.series(&config, Self::type_arg))?
                .items;
        }
        Ok(TypeExpr::new(
            TypeExprKind::Named {
                name: word.to_string(),
                args,
            },
            Source::new(self.scanner.span_from(start)),
        ))
    }

    /// `true`, `false`, `1`, `-2.5`, `'a'` as singleton types.
    fn literal_type(&mut self) -> ParseResult<Option<TypeExpr>> {
        let start = self.scanner.pos();
        let negative_number = self.scanner.is_at("-")
            && self.scanner.peek().is_some_and(|c| c.is_ascii_digit());
        let expr = match self.scanner.current() {
            Some('0'..='9') => self.number()?,
            Some('-') if negative_number => self.signed_number()?,
            Some('\'' | '"') => {
                let expr = self.string()?;
                if !matches!(expr.kind, ExprKind::Str(_)) {
                    return Err(self.scanner.error_from(
                        ErrorCode::E1005,
                        "string types cannot interpolate",
                        start,
                    ));
                }
                expr
            }
            _ if self.scanner.is_at_word("true") || self.scanner.is_at_word("false") => {
                let value = self.scanner.scan_if_word("true");
                if !value {
                    self.scanner.advance_by("false".len());
                }
                Expr::new(
                    ExprKind::Bool(value),
                    Source::new(self.scanner.span_from(start)),
                )
            }
            _ => return Ok(None),
        };
        let source = Source::new(expr.span());
        Ok(Some(TypeExpr::new(
            TypeExprKind::Literal(Box::new(expr)),
            source,
        )))
    }

    /// A number with an optional leading `-`, folded into the literal.
    pub(crate) fn signed_number(&mut self) -> ParseResult<Expr> {
        let start = self.scanner.pos();
        let negative = self.scanner.scan_if_string("-");
        let mut number = self.number()?;
        if negative {
            let negated = match &number.kind {
                ExprKind::Int(lit) => lit.value.checked_neg().map(|value| {
                    ExprKind::Int(IntLiteral {
                        value,
                        base: lit.base,
                    })
                }),
                ExprKind::Float(lit) => Some(ExprKind::Float(lit.negated())),
                _ => None,
            };
            let Some(kind) = negated else {
                return Err(self.scanner.error_from(
                    ErrorCode::E1006,
                    "only numbers can be negated here",
                    start,
                ));
            };
            number.kind = kind;
            number.source.span.start = start;
        }
        Ok(number)
    }

    /// `{name: String, Int}`
    fn object_type(&mut self) -> ParseResult<TypeExpr> {
        let start = self.scanner.pos();
        self.scanner.advance();
        let options = self.nested_options();
        let props = self.with_options(options, |p| {
            p.series(&SeriesConfig::new("{", "}", start), Self::type_prop)
        })?;
        let source = Source::new(self.scanner.span_from(start)).with_following(props.closing_comments);
        Ok(TypeExpr::new(TypeExprKind::Object(props.items), source))
    }

    fn type_prop(&mut self) -> ParseResult<TypeProp> {
        if self.scanner.current().is_some_and(is_word_start)
            && predicates::named_entry_ahead(&mut self.scanner)?
        {
            let mut name = self.identifier()?;
            self.skip_trivia()?;
            name.source.following_comments.extend(self.take_comments());
            self.scanner.advance();
            self.skip_trivia()?;
            let ty = self.type_expr()?;
            return Ok(TypeProp::Named { name, ty });
        }
        Ok(TypeProp::Positional(self.type_expr()?))
    }

    /// `fn<T>(#a: T): T`; the return type is required.
    fn formula_type(&mut self) -> ParseResult<TypeExpr> {
        let start = self.scanner.pos();
        self.scanner.expect_word("fn")?;
        self.skip_trivia()?;
        let generics = self.generics()?;
        self.skip_trivia()?;
        let args = self.formula_args()?;
        self.skip_trivia()?;
        let Some(return_type) = self.return_type()? else {
            return Err(self.expected(ErrorCode::E1005, "`:` and a return type"));
        };
        let source = Source::from_range(start, return_type.source.stop());
        Ok(TypeExpr::new(
            TypeExprKind::Formula {
                generics,
                args,
                return_type: Box::new(return_type),
            },
            source,
        ))
    }

    /// One argument of `Name(…)`.
    fn type_arg(&mut self) -> ParseResult<TypeArg> {
        if self.scanner.current().is_some_and(is_word_start)
            && predicates::named_entry_ahead(&mut self.scanner)?
        {
            let mut name = self.identifier()?;
            self.skip_trivia()?;
            name.source.following_comments.extend(self.take_comments());
            self.scanner.advance();
            self.skip_trivia()?;
            let value = self.type_arg_value()?;
            return Ok(TypeArg::Named {
                name,
                value: Box::new(value),
            });
        }
        self.type_arg_value()
    }

    fn type_arg_value(&mut self) -> ParseResult<TypeArg> {
        if let Some(&(symbol, op)) = TYPE_COMPARISONS
            .iter()
            .find(|(symbol, _)| self.scanner.is_at(symbol))
        {
            self.scanner.advance_by(symbol.len());
            self.skip_trivia()?;
            let value = self.signed_number()?;
            return Ok(TypeArg::Comparison { op, value });
        }
        if self.scanner.is_at("/") {
            return Ok(TypeArg::Regex(self.regex_literal()?));
        }
        if self.scanner.is_at("[") {
            let open = self.scanner.pos();
            self.scanner.advance();
            let config = SeriesConfig::new("[", "]", open).keep_closing_comments();
            let names = self.series(&config, Self::string_literal)?;
            return Ok(TypeArg::Names(names.items));
        }
        let starts_number = self.scanner.current().is_some_and(|c| c.is_ascii_digit())
            || (self.scanner.is_at("-") && self.scanner.peek().is_some_and(|c| c.is_ascii_digit()));
        if starts_number {
            let start = self.signed_number()?;
            if let Some(op) = self.range_operator() {
                self.scanner.advance_by(op.symbol().len());
                let stop = self.signed_number()?;
                return Ok(TypeArg::Range { op, start, stop });
            }
            let source = Source::new(start.span());
            return Ok(TypeArg::Type(TypeExpr::new(
                TypeExprKind::Literal(Box::new(start)),
                source,
            )));
        }
        Ok(TypeArg::Type(self.type_expr()?))
    }

    fn range_operator(&self) -> Option<Operator> {
        BINARY_SYMBOLS
            .iter()
            .find(|(symbol, op)| is_range(*op) && self.scanner.is_at(symbol))
            .map(|&(_, op)| op)
    }
}
