//! The closed operator table.
//!
//! Every operator the expression engine can reduce is listed here with its
//! source symbol, precedence, associativity and arity. Nothing outside this
//! file decides how tightly an operator binds.

/// Where an operator sits relative to its operands.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum OperatorFixity {
    /// `-x`
    Prefix,
    /// `a + b`
    Infix,
    /// `a.b`, `f(x)`, `xs[0]`: the right operand is scanned by the postfix
    /// scanner (property name, argument list, index expression).
    Postfix,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Associativity {
    Left,
    Right,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Operator {
    // Postfix access (precedence 100)
    PropertyAccess,
    NullablePropertyAccess,
    Call,
    NullableCall,
    Index,
    NullableIndex,

    Power,

    // Prefix
    Negate,
    Not,
    BitNot,
    Stringify,

    // Arithmetic
    Multiply,
    Divide,
    FloorDivide,
    Modulo,
    Add,
    Subtract,
    Concat,
    ShiftLeft,
    ShiftRight,

    // Ranges
    RangeInclusive,
    RangeExclusiveStart,
    RangeExclusiveEnd,
    RangeExclusive,

    // Bitwise
    BitAnd,
    BitXor,
    BitOr,

    // Comparison
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Compare,

    // Equality and type tests
    Equal,
    NotEqual,
    Is,
    IsNot,
    Matches,
    NotMatches,

    // Logical
    And,
    Or,
    Coalesce,

    // Pipes
    Pipe,
    NullablePipe,
}

/// Binary operators recognized by symbol, longest first so the scanner can
/// take the first prefix match.
pub const BINARY_SYMBOLS: &[(&str, Operator)] = &[
    ("?|>", Operator::NullablePipe),
    ("<=>", Operator::Compare),
    ("...", Operator::RangeInclusive),
    ("<..", Operator::RangeExclusiveStart),
    ("..<", Operator::RangeExclusiveEnd),
    ("<.<", Operator::RangeExclusive),
    ("!is", Operator::IsNot),
    ("**", Operator::Power),
    ("//", Operator::FloorDivide),
    ("++", Operator::Concat),
    ("<<", Operator::ShiftLeft),
    (">>", Operator::ShiftRight),
    ("<=", Operator::LessEqual),
    (">=", Operator::GreaterEqual),
    ("==", Operator::Equal),
    ("!=", Operator::NotEqual),
    ("=~", Operator::Matches),
    ("!~", Operator::NotMatches),
    ("&&", Operator::And),
    ("||", Operator::Or),
    ("??", Operator::Coalesce),
    ("|>", Operator::Pipe),
    ("*", Operator::Multiply),
    ("/", Operator::Divide),
    ("%", Operator::Modulo),
    ("+", Operator::Add),
    ("-", Operator::Subtract),
    ("&", Operator::BitAnd),
    ("^", Operator::BitXor),
    ("|", Operator::BitOr),
    ("<", Operator::Less),
    (">", Operator::Greater),
];

/// Binary operators spelled as words.
pub const BINARY_WORDS: &[(&str, Operator)] = &[
    ("and", Operator::And),
    ("or", Operator::Or),
    ("is", Operator::Is),
];

/// Prefix operators, symbol or word.
pub const PREFIX_SYMBOLS: &[(&str, Operator)] = &[
    ("not", Operator::Not),
    ("-", Operator::Negate),
    ("!", Operator::Not),
    ("~", Operator::BitNot),
    ("$", Operator::Stringify),
];

impl Operator {
    /// Canonical source spelling, used by the code printer.
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::PropertyAccess => ".",
            Self::NullablePropertyAccess => "?.",
            Self::Call => "()",
            Self::NullableCall => "?.()",
            Self::Index => "[]",
            Self::NullableIndex => "?.[]",
            Self::Power => "**",
            Self::Negate => "-",
            Self::Not => "not",
            Self::BitNot => "~",
            Self::Stringify => "$",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::FloorDivide => "//",
            Self::Modulo => "%",
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Concat => "++",
            Self::ShiftLeft => "<<",
            Self::ShiftRight => ">>",
            Self::RangeInclusive => "...",
            Self::RangeExclusiveStart => "<..",
            Self::RangeExclusiveEnd => "..<",
            Self::RangeExclusive => "<.<",
            Self::BitAnd => "&",
            Self::BitXor => "^",
            Self::BitOr => "|",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::Compare => "<=>",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Is => "is",
            Self::IsNot => "!is",
            Self::Matches => "=~",
            Self::NotMatches => "!~",
            Self::And => "and",
            Self::Or => "or",
            Self::Coalesce => "??",
            Self::Pipe => "|>",
            Self::NullablePipe => "?|>",
        }
    }

    /// Binding strength; higher binds tighter.
    pub const fn precedence(self) -> u8 {
        match self {
            Self::PropertyAccess
            | Self::NullablePropertyAccess
            | Self::Call
            | Self::NullableCall
            | Self::Index
            | Self::NullableIndex => 100,
            Self::Power => 80,
            Self::Negate | Self::Not | Self::BitNot | Self::Stringify => 70,
            Self::Multiply | Self::Divide | Self::FloorDivide | Self::Modulo => 60,
            Self::Add | Self::Subtract => 50,
            Self::Concat => 45,
            Self::ShiftLeft | Self::ShiftRight => 40,
            Self::RangeInclusive
            | Self::RangeExclusiveStart
            | Self::RangeExclusiveEnd
            | Self::RangeExclusive => 35,
            Self::BitAnd => 33,
            Self::BitXor => 32,
            Self::BitOr => 31,
            Self::Less | Self::LessEqual | Self::Greater | Self::GreaterEqual | Self::Compare => {
                25
            }
            Self::Equal
            | Self::NotEqual
            | Self::Is
            | Self::IsNot
            | Self::Matches
            | Self::NotMatches => 20,
            Self::And => 15,
            Self::Or => 14,
            Self::Coalesce => 12,
            Self::Pipe | Self::NullablePipe => 10,
        }
    }

    pub const fn associativity(self) -> Associativity {
        match self {
            Self::Power | Self::Negate | Self::Not | Self::BitNot | Self::Stringify => {
                Associativity::Right
            }
            _ => Associativity::Left,
        }
    }

    pub const fn fixity(self) -> OperatorFixity {
        match self {
            Self::Negate | Self::Not | Self::BitNot | Self::Stringify => OperatorFixity::Prefix,
            Self::PropertyAccess
            | Self::NullablePropertyAccess
            | Self::Call
            | Self::NullableCall
            | Self::Index
            | Self::NullableIndex => OperatorFixity::Postfix,
            _ => OperatorFixity::Infix,
        }
    }

    /// Number of operands the reduced node holds.
    pub const fn arity(self) -> usize {
        match self.fixity() {
            OperatorFixity::Prefix => 1,
            OperatorFixity::Infix | OperatorFixity::Postfix => 2,
        }
    }

    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Less | Self::LessEqual | Self::Greater | Self::GreaterEqual | Self::Equal | Self::NotEqual
        )
    }

    pub const fn is_range(self) -> bool {
        matches!(
            self,
            Self::RangeInclusive
                | Self::RangeExclusiveStart
                | Self::RangeExclusiveEnd
                | Self::RangeExclusive
        )
    }

    pub const fn is_nullable_access(self) -> bool {
        matches!(
            self,
            Self::NullablePropertyAccess | Self::NullableCall | Self::NullableIndex
        )
    }

    /// `true` when the operator is spelled as a word (`and`, `is`, `not`).
    pub fn is_word(self) -> bool {
        self.symbol().bytes().all(|b| b.is_ascii_alphabetic())
    }

    /// Look up a binary operator by exact symbol or word.
    pub fn binary_from_symbol(symbol: &str) -> Option<Operator> {
        BINARY_SYMBOLS
            .iter()
            .chain(BINARY_WORDS)
            .find(|(s, _)| *s == symbol)
            .map(|(_, op)| *op)
    }

    /// The comparison that holds when this one does not (`<` ↔ `>=`).
    pub const fn negated_comparison(self) -> Option<Operator> {
        match self {
            Self::Less => Some(Self::GreaterEqual),
            Self::LessEqual => Some(Self::Greater),
            Self::Greater => Some(Self::LessEqual),
            Self::GreaterEqual => Some(Self::Less),
            Self::Equal => Some(Self::NotEqual),
            Self::NotEqual => Some(Self::Equal),
            _ => None,
        }
    }

    /// The comparison with its operands swapped (`a < b` ↔ `b > a`).
    pub const fn flipped_comparison(self) -> Option<Operator> {
        match self {
            Self::Less => Some(Self::Greater),
            Self::LessEqual => Some(Self::GreaterEqual),
            Self::Greater => Some(Self::Less),
            Self::GreaterEqual => Some(Self::LessEqual),
            Self::Equal => Some(Self::Equal),
            Self::NotEqual => Some(Self::NotEqual),
            _ => None,
        }
    }

    /// Symbol used by the S-expression printer.
    pub const fn lisp_symbol(self) -> &'static str {
        match self {
            Self::Call => "fn",
            Self::NullableCall => "?.fn",
            _ => self.symbol(),
        }
    }
}
