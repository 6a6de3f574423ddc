//! Printers from the tree back to text.
//!
//! # Modules
//!
//! - [`code`]: canonical source code, comments included. Parsing the output
//!   yields the same tree (up to spans and whitespace).
//! - [`lisp`]: S-expression form, `(op arg…)` for every operator node. Used
//!   to assert operator structure in tests and by the CLI.

pub mod code;
pub mod lisp;

pub use code::CodePrinter;
pub use lisp::to_lisp;

use crate::ast::{Expr, Module, TypeExpr};

impl Expr {
    /// Canonical source code, comments included.
    pub fn to_code(&self) -> String {
        let mut printer = CodePrinter::new();
        printer.expr(self);
        printer.finish()
    }

    /// Canonical source code with every comment dropped. Two trees that
    /// differ only in spans and comment placement print the same.
    pub fn to_code_without_comments(&self) -> String {
        let mut printer = CodePrinter::without_comments();
        printer.expr(self);
        printer.finish()
    }

    pub fn to_lisp(&self) -> String {
        to_lisp(self)
    }
}

impl TypeExpr {
    pub fn to_code(&self) -> String {
        let mut printer = CodePrinter::new();
        printer.type_expr(self);
        printer.finish()
    }
}

impl Module {
    pub fn to_code(&self) -> String {
        let mut printer = CodePrinter::new();
        printer.module(self);
        printer.finish()
    }

    pub fn to_code_without_comments(&self) -> String {
        let mut printer = CodePrinter::without_comments();
        printer.module(self);
        printer.finish()
    }
}

#[cfg(test)]
mod tests;
