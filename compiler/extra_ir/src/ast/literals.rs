//! Literal payloads.

use super::Expr;

/// How an integer was written; preserved so printing round-trips.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum IntBase {
    #[default]
    Decimal,
    Hex,
    Octal,
    Binary,
}

impl IntBase {
    pub const fn prefix(self) -> &'static str {
        match self {
            IntBase::Decimal => "",
            IntBase::Hex => "0x",
            IntBase::Octal => "0o",
            IntBase::Binary => "0b",
        }
    }

    pub const fn radix(self) -> u32 {
        match self {
            IntBase::Decimal => 10,
            IntBase::Hex => 16,
            IntBase::Octal => 8,
            IntBase::Binary => 2,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct IntLiteral {
    pub value: i64,
    pub base: IntBase,
}

impl IntLiteral {
    pub fn to_code(self) -> String {
        let magnitude = self.value.unsigned_abs();
        let digits = match self.base {
            IntBase::Decimal => magnitude.to_string(),
            IntBase::Hex => format!("{magnitude:x}"),
            IntBase::Octal => format!("{magnitude:o}"),
            IntBase::Binary => format!("{magnitude:b}"),
        };
        let sign = if self.value < 0 { "-" } else { "" };
        format!("{sign}{}{digits}", self.base.prefix())
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct FloatLiteral {
    pub value: f64,
    /// Source spelling (`1e3`, `2.50`), kept for printing.
    pub raw: String,
}

impl FloatLiteral {
    pub fn new(value: f64, raw: impl Into<String>) -> Self {
        FloatLiteral {
            value,
            raw: raw.into(),
        }
    }

    #[must_use]
    pub fn negated(&self) -> Self {
        let raw = match self.raw.strip_prefix('-') {
            Some(positive) => positive.to_string(),
            None => format!("-{}", self.raw),
        };
        FloatLiteral {
            value: -self.value,
            raw,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Quote {
    #[default]
    Single,
    Double,
    TripleSingle,
    TripleDouble,
}

impl Quote {
    pub const fn delimiter(self) -> &'static str {
        match self {
            Quote::Single => "'",
            Quote::Double => "\"",
            Quote::TripleSingle => "'''",
            Quote::TripleDouble => "\"\"\"",
        }
    }

    pub const fn allows_interpolation(self) -> bool {
        matches!(self, Quote::Double | Quote::TripleDouble)
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct StringLiteral {
    pub value: String,
    pub quote: Quote,
}

/// `"text ${expr} text"`
#[derive(Clone, PartialEq, Debug)]
pub struct StringTemplate {
    pub parts: Vec<TemplatePart>,
    pub quote: Quote,
}

#[derive(Clone, PartialEq, Debug)]
pub enum TemplatePart {
    Text(String),
    Expr(Expr),
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct RegexLiteral {
    pub pattern: String,
    pub flags: String,
}

impl RegexLiteral {
    pub fn to_code(&self) -> String {
        format!("/{}/{}", self.pattern, self.flags)
    }
}

/// `NdM`: roll N dice with M sides.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct DiceLiteral {
    pub count: u32,
    pub sides: u32,
}

impl DiceLiteral {
    pub fn min(self) -> i64 {
        i64::from(self.count)
    }

    pub fn max(self) -> i64 {
        i64::from(self.count) * i64::from(self.sides)
    }
}

impl StringLiteral {
    pub fn to_code(&self) -> String {
        let delimiter = self.quote.delimiter();
        format!("{delimiter}{}{delimiter}", self.quote.escape(&self.value))
    }
}

impl Quote {
    /// Escape a string value for re-emission inside this quote style.
    pub fn escape(self, value: &str) -> String {
        let mut out = String::with_capacity(value.len());
        for ch in value.chars() {
            match ch {
                '\\' => out.push_str("\\\\"),
                '\n' if matches!(self, Quote::Single | Quote::Double) => out.push_str("\\n"),
                '\t' => out.push_str("\\t"),
                '\r' => out.push_str("\\r"),
                '\0' => out.push_str("\\0"),
                '\'' if self == Quote::Single => out.push_str("\\'"),
                '"' if self == Quote::Double => out.push_str("\\\""),
                '$' if self.allows_interpolation() => out.push_str("\\$"),
                _ => out.push(ch),
            }
        }
        out
    }
}
