//! Literal scanning: numbers, dice, strings, templates and regexes.

use extra_diagnostic::ErrorCode;
use extra_ir::{
    DiceLiteral, Expr, ExprKind, FloatLiteral, IntBase, IntLiteral, Quote, RegexLiteral, Source,
    StringLiteral, StringTemplate, TemplatePart,
};
use extra_scanner::{is_word_char, is_word_start};

use crate::{ParseError, ParseResult, Parser};

const REGEX_FLAGS: &str = "gimsuy";

/// The magnitude of `i64::MIN`, which only fits once negated.
pub(super) const MIN_INT_MAGNITUDE: &str = "9223372036854775808";

fn is_digit_in(base: IntBase) -> impl Fn(char) -> bool {
    move |c| c == '_' || c.is_digit(base.radix())
}

fn strip_underscores(text: &str) -> String {
    text.chars().filter(|&c| c != '_').collect()
}

impl Parser<'_> {
    /// `123`, `0x1F`, `1.5e3`, `3d6`.
    pub(crate) fn number(&mut self) -> ParseResult<Expr> {
        let start = self.scanner.pos();
        let base = match self.scanner.remaining().get(..2) {
            Some("0x" | "0X") => IntBase::Hex,
            Some("0o" | "0O") => IntBase::Octal,
            Some("0b" | "0B") => IntBase::Binary,
            _ => IntBase::Decimal,
        };
        if base != IntBase::Decimal {
            self.scanner.advance_by(2);
            let digits = self.scanner.eat_while(is_digit_in(base));
            let digits = strip_underscores(digits);
            let value = i64::from_str_radix(&digits, base.radix())
                .map_err(|_| self.number_error(start))?;
            return self.finish_number(start, ExprKind::Int(IntLiteral { value, base }));
        }

        let integer = self.scanner.eat_while(is_digit_in(IntBase::Decimal));
        if self.scanner.current() == Some('d') && self.scanner.peek().is_some_and(|c| c.is_ascii_digit())
        {
            self.scanner.advance();
            let sides = self.scanner.eat_while(|c| c.is_ascii_digit());
            let count = strip_underscores(integer).parse().map_err(|_| self.number_error(start))?;
            let sides = sides.parse().map_err(|_| self.number_error(start))?;
            return self.finish_number(start, ExprKind::Dice(DiceLiteral { count, sides }));
        }

        let mut is_float = false;
        if self.scanner.current() == Some('.') && self.scanner.peek().is_some_and(|c| c.is_ascii_digit())
        {
            is_float = true;
            self.scanner.advance();
            self.scanner.eat_while(is_digit_in(IntBase::Decimal));
        }
        if matches!(self.scanner.current(), Some('e' | 'E')) {
            let signed = matches!(self.scanner.peek(), Some('+' | '-'));
            let digit_at = if signed { 2 } else { 1 };
            if self.scanner.peek_nth(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                self.scanner.advance_by(digit_at);
                self.scanner.eat_while(|c| c.is_ascii_digit());
            }
        }

        let raw = self.scanner.slice_from(start);
        let kind = if is_float {
            let value = strip_underscores(raw).parse().map_err(|_| self.number_error(start))?;
            ExprKind::Float(FloatLiteral::new(value, raw))
        } else {
            let value = strip_underscores(raw).parse().map_err(|_| self.number_error(start))?;
            ExprKind::Int(IntLiteral {
                value,
                base: IntBase::Decimal,
            })
        };
        self.finish_number(start, kind)
    }

    /// At a whole `9223372036854775808` literal.
    pub(super) fn at_min_int_magnitude(&self) -> bool {
        let Some(rest) = self.scanner.remaining().strip_prefix(MIN_INT_MAGNITUDE) else {
            return false;
        };
        let mut chars = rest.chars();
        match chars.next() {
            None => true,
            Some('.') => !chars.next().is_some_and(|c| c.is_ascii_digit()),
            Some(c) => !is_word_char(c),
        }
    }

    /// Scan `9223372036854775808` as `i64::MIN`, for the negation in front
    /// of it to fold into.
    pub(super) fn min_int_magnitude(&mut self) -> Expr {
        let start = self.scanner.pos();
        self.scanner.advance_by(MIN_INT_MAGNITUDE.len());
        Expr::new(
            ExprKind::Int(IntLiteral {
                value: i64::MIN,
                base: IntBase::Decimal,
            }),
            Source::new(self.scanner.span_from(start)),
        )
    }

    fn finish_number(&mut self, start: u32, kind: ExprKind) -> ParseResult<Expr> {
        if self.scanner.current().is_some_and(is_word_char) {
            self.scanner.eat_while(is_word_char);
            return Err(self.number_error(start));
        }
        Ok(Expr::new(kind, Source::new(self.scanner.span_from(start))))
    }

    #[cold]
    fn number_error(&self, start: u32) -> ParseError {
        self.scanner.error_from(
            ErrorCode::E1006,
            format!("invalid number literal `{}`", self.scanner.slice_from(start)),
            start,
        )
    }

    /// Quoted string; double quotes may interpolate `${expr}` and `$name`.
    pub(crate) fn string(&mut self) -> ParseResult<Expr> {
        let start = self.scanner.pos();
        let quote = if self.scanner.is_at("'''") {
            Quote::TripleSingle
        } else if self.scanner.is_at("\"\"\"") {
            Quote::TripleDouble
        } else if self.scanner.is_at("'") {
            Quote::Single
        } else {
            Quote::Double
        };
        let delimiter = quote.delimiter();
        self.scanner.advance_by(delimiter.len());

        let mut parts = Vec::new();
        let mut text = String::new();
        loop {
            if self.scanner.scan_if_string(delimiter) {
                break;
            }
            let Some(c) = self.scanner.current() else {
                return Err(self.unterminated_string(start));
            };
            match c {
                '\n' | '\r' if matches!(quote, Quote::Single | Quote::Double) => {
                    return Err(self.unterminated_string(start));
                }
                '\\' => text.push(self.escape()?),
                '$' if quote.allows_interpolation() && self.scanner.is_at("${") => {
                    self.scanner.advance_by(2);
                    self.skip_trivia()?;
                    let options = self.nested_options();
                    let mut expr = self.expression_with(options)?;
                    self.skip_trivia()?;
                    expr.push_following_comments(self.take_comments());
                    self.scanner.expect_string("}")?;
                    if !text.is_empty() {
                        parts.push(TemplatePart::Text(std::mem::take(&mut text)));
                    }
                    parts.push(TemplatePart::Expr(expr));
                }
                '$' if quote.allows_interpolation()
                    && self.scanner.peek().is_some_and(is_word_start) =>
                {
                    self.scanner.advance();
                    let name_start = self.scanner.pos();
                    let name = self.scanner.eat_while(is_word_char);
                    if !text.is_empty() {
                        parts.push(TemplatePart::Text(std::mem::take(&mut text)));
                    }
                    parts.push(TemplatePart::Expr(Expr::new(
                        ExprKind::Reference(name.to_string()),
                        Source::new(self.scanner.span_from(name_start)),
                    )));
                }
                c => {
                    text.push(c);
                    self.scanner.advance();
                }
            }
        }

        let source = Source::new(self.scanner.span_from(start));
        if parts.is_empty() {
            return Ok(Expr::new(
                ExprKind::Str(StringLiteral { value: text, quote }),
                source,
            ));
        }
        if !text.is_empty() {
            parts.push(TemplatePart::Text(text));
        }
        Ok(Expr::new(
            ExprKind::Template(StringTemplate { parts, quote }),
            source,
        ))
    }

    /// A plain string literal, for places that do not take templates.
    pub(crate) fn string_literal(&mut self) -> ParseResult<StringLiteral> {
        let start = self.scanner.pos();
        let expr = self.string()?;
        match expr.kind {
            ExprKind::Str(literal) => Ok(literal),
            _ => Err(self.scanner.error_from(
                ErrorCode::E1001,
                "string interpolation is not allowed here",
                start,
            )),
        }
    }

    fn escape(&mut self) -> ParseResult<char> {
        let start = self.scanner.pos();
        self.scanner.advance();
        let Some(c) = self.scanner.advance() else {
            return Err(self.unterminated_string(start));
        };
        let escaped = match c {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            '\\' | '\'' | '"' | '$' => c,
            'u' => {
                if !self.scanner.scan_if_string("{") {
                    return Err(self.bad_escape(start));
                }
                let hex = self.scanner.eat_while(|c| c.is_ascii_hexdigit());
                if !self.scanner.scan_if_string("}") {
                    return Err(self.bad_escape(start));
                }
                u32::from_str_radix(hex, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| self.bad_escape(start))?
            }
            _ => return Err(self.bad_escape(start)),
        };
        Ok(escaped)
    }

    #[cold]
    fn bad_escape(&self, start: u32) -> ParseError {
        self.scanner.error_from(
            ErrorCode::E1008,
            format!("invalid escape `{}`", self.scanner.slice_from(start)),
            start,
        )
    }

    #[cold]
    fn unterminated_string(&self, start: u32) -> ParseError {
        ParseError::new(
            ErrorCode::E1007,
            "unterminated string",
            extra_ir::Span::new(start, start + 1),
        )
    }

    /// `/pattern/flags`, only where an operand is expected.
    pub(crate) fn regex(&mut self) -> ParseResult<Expr> {
        let start = self.scanner.pos();
        let literal = self.regex_literal()?;
        Ok(Expr::new(
            ExprKind::Regex(literal),
            Source::new(self.scanner.span_from(start)),
        ))
    }

    /// Patterns use `regex` crate syntax, which has no lookaround and no
    /// backreferences.
    pub(crate) fn regex_literal(&mut self) -> ParseResult<RegexLiteral> {
        let start = self.scanner.pos();
        self.scanner.expect_string("/")?;
        let body_start = self.scanner.pos();
        let mut in_class = false;
        loop {
            match self.scanner.current() {
                None | Some('\n' | '\r') => {
                    return Err(self.scanner.error_from(
                        ErrorCode::E1010,
                        "unterminated regex literal",
                        start,
                    ));
                }
                Some('\\') => {
                    self.scanner.advance();
                    self.scanner.advance();
                }
                Some('[') => {
                    in_class = true;
                    self.scanner.advance();
                }
                Some(']') => {
                    in_class = false;
                    self.scanner.advance();
                }
                Some('/') if !in_class => break,
                Some(_) => {
                    self.scanner.advance();
                }
            }
        }
        let pattern = self.scanner.slice_from(body_start).to_string();
        self.scanner.advance();
        let flags = self.scanner.eat_while(|c| REGEX_FLAGS.contains(c)).to_string();
        if self.scanner.current().is_some_and(is_word_char) {
            return Err(self
                .scanner
                .error(ErrorCode::E1010, "unknown regex flag"));
        }
        if let Err(error) = regex::Regex::new(&pattern) {
            return Err(self.scanner.error_from(
                ErrorCode::E1010,
                format!("invalid regex: {error}"),
                start,
            ));
        }
        Ok(RegexLiteral { pattern, flags })
    }
}
