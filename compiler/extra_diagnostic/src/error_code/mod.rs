//! Error codes for every front-end diagnostic.
//!
//! The first digit names the phase, so a code alone says whether the parser
//! or the type checker rejected the input.

use std::fmt;

/// Format: E#### where the first digit indicates the phase:
/// - E1xxx: Parser errors
/// - E2xxx: Type errors
/// - E9xxx: Internal errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Parser Errors (E1xxx)
    /// Unexpected character or token
    E1001,
    /// Expected expression
    E1002,
    /// Unclosed delimiter
    E1003,
    /// Expected identifier
    E1004,
    /// Expected type
    E1005,
    /// Invalid number literal
    E1006,
    /// Unterminated string or template
    E1007,
    /// Invalid escape sequence
    E1008,
    /// Unterminated block comment
    E1009,
    /// Invalid regular expression literal
    E1010,
    /// `#` used outside the right-hand side of a pipe
    E1011,
    /// View closing tag does not match its opening tag
    E1012,
    /// Unexpected end of input
    E1013,
    /// Invalid `case` pattern
    E1014,
    /// Invalid module declaration
    E1015,

    // Type Errors (E2xxx)
    /// Value is not assignable to the expected type
    E2001,
    /// Unknown type name
    E2002,
    /// Unknown reference
    E2003,
    /// Invalid call arguments
    E2004,
    /// Unknown property
    E2005,
    /// Duplicate definition
    E2006,
    /// Operator not defined for these operand types
    E2007,
    /// Value is not callable
    E2008,
    /// Unknown state reference
    E2009,
    /// Invalid type arguments
    E2010,
    /// Cyclic class hierarchy
    E2011,

    // Internal Errors (E9xxx)
    /// Internal error
    E9001,
}

impl ErrorCode {
    /// Every variant, for exhaustive tests.
    pub const ALL: &[ErrorCode] = &[
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E1003,
        ErrorCode::E1004,
        ErrorCode::E1005,
        ErrorCode::E1006,
        ErrorCode::E1007,
        ErrorCode::E1008,
        ErrorCode::E1009,
        ErrorCode::E1010,
        ErrorCode::E1011,
        ErrorCode::E1012,
        ErrorCode::E1013,
        ErrorCode::E1014,
        ErrorCode::E1015,
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E2003,
        ErrorCode::E2004,
        ErrorCode::E2005,
        ErrorCode::E2006,
        ErrorCode::E2007,
        ErrorCode::E2008,
        ErrorCode::E2009,
        ErrorCode::E2010,
        ErrorCode::E2011,
        ErrorCode::E9001,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E1007 => "E1007",
            ErrorCode::E1008 => "E1008",
            ErrorCode::E1009 => "E1009",
            ErrorCode::E1010 => "E1010",
            ErrorCode::E1011 => "E1011",
            ErrorCode::E1012 => "E1012",
            ErrorCode::E1013 => "E1013",
            ErrorCode::E1014 => "E1014",
            ErrorCode::E1015 => "E1015",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2007 => "E2007",
            ErrorCode::E2008 => "E2008",
            ErrorCode::E2009 => "E2009",
            ErrorCode::E2010 => "E2010",
            ErrorCode::E2011 => "E2011",
            ErrorCode::E9001 => "E9001",
        }
    }

    /// Short description, used by `extra explain` style output and tests.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "unexpected input",
            ErrorCode::E1002 => "expected an expression",
            ErrorCode::E1003 => "unclosed delimiter",
            ErrorCode::E1004 => "expected an identifier",
            ErrorCode::E1005 => "expected a type",
            ErrorCode::E1006 => "invalid number literal",
            ErrorCode::E1007 => "unterminated string",
            ErrorCode::E1008 => "invalid escape sequence",
            ErrorCode::E1009 => "unterminated block comment",
            ErrorCode::E1010 => "invalid regular expression",
            ErrorCode::E1011 => "`#` outside of a pipe",
            ErrorCode::E1012 => "mismatched closing tag",
            ErrorCode::E1013 => "unexpected end of input",
            ErrorCode::E1014 => "invalid pattern",
            ErrorCode::E1015 => "invalid declaration",
            ErrorCode::E2001 => "type mismatch",
            ErrorCode::E2002 => "unknown type",
            ErrorCode::E2003 => "unknown reference",
            ErrorCode::E2004 => "invalid arguments",
            ErrorCode::E2005 => "unknown property",
            ErrorCode::E2006 => "duplicate definition",
            ErrorCode::E2007 => "invalid operand types",
            ErrorCode::E2008 => "not callable",
            ErrorCode::E2009 => "unknown state",
            ErrorCode::E2010 => "invalid type arguments",
            ErrorCode::E2011 => "cyclic class hierarchy",
            ErrorCode::E9001 => "internal error",
        }
    }

    pub fn is_parser_error(&self) -> bool {
        self.as_str().starts_with("E1")
    }

    pub fn is_type_error(&self) -> bool {
        self.as_str().starts_with("E2")
    }

    pub fn is_internal(&self) -> bool {
        self.as_str().starts_with("E9")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests;
