//! Command handlers for the `extra` CLI.
//!
//! Each submodule implements one command. Handlers come in two layers: a
//! pure function from source text to output (or diagnostics), and a
//! `*_file` wrapper used by `main.rs` that reads the file, prints, and sets
//! the exit status. Shared input handling lives here.

mod check;
mod debug;
mod explain;
mod fmt;

pub use check::{check_file, check_source, type_file, type_source};
pub use debug::{lisp, lisp_file, parse_file, parse_tree};
pub use explain::{explain, explain_error};
pub use fmt::{format_file, format_source};

use std::io::Read;

use extra_diagnostic::Diagnostic;
use extra_ir::{Expr, Module};
use extra_parse::{parse_expression, parse_module, parse_view};

/// What a source file holds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum SourceKind {
    /// A sequence of declarations (the default).
    #[default]
    Module,
    /// A single expression (`--expr`).
    Expression,
    /// An expression where `<tag>` starts a view (`--view`).
    View,
}

impl SourceKind {
    /// Pick the kind from command-line flags; the last flag wins.
    pub fn from_flags(args: &[String]) -> Self {
        args.iter().fold(SourceKind::Module, |kind, arg| match arg.as_str() {
            "--expr" | "-e" => SourceKind::Expression,
            "--view" => SourceKind::View,
            _ => kind,
        })
    }
}

/// A parsed input.
#[derive(Debug)]
pub enum Parsed {
    Module(Module),
    Expr(Expr),
}

/// Parse `source` as `kind`, turning a parse error into its diagnostic.
#[tracing::instrument(level = "debug", skip(source), fields(len = source.len()))]
pub fn parse_source(source: &str, kind: SourceKind) -> Result<Parsed, Vec<Diagnostic>> {
    let parsed = match kind {
        SourceKind::Module => parse_module(source).map(Parsed::Module),
        SourceKind::Expression => parse_expression(source).map(Parsed::Expr),
        SourceKind::View => parse_view(source).map(Parsed::Expr),
    };
    parsed.map_err(|error| vec![error.to_diagnostic()])
}

/// Read a file from disk (or stdin for `-`), exiting with a user-friendly
/// error message on failure.
pub(super) fn read_file(path: &str) -> String {
    let result = if path == "-" {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .map(|_| content)
    } else {
        std::fs::read_to_string(path)
    };
    match result {
        Ok(content) => content,
        Err(e) => {
            let msg = match e.kind() {
                std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
                std::io::ErrorKind::PermissionDenied => {
                    format!("permission denied reading '{path}'")
                }
                std::io::ErrorKind::InvalidData => {
                    format!("'{path}' contains invalid UTF-8 data")
                }
                _ => format!("error reading '{path}': {e}"),
            };
            eprintln!("{msg}");
            std::process::exit(1);
        }
    }
}

/// Print the output of a pure handler, or render its diagnostics against
/// the source and exit with status 1.
pub(super) fn emit(path: &str, source: &str, result: Result<String, Vec<Diagnostic>>) {
    match result {
        Ok(output) => println!("{output}"),
        Err(diagnostics) => {
            for diagnostic in &diagnostics {
                eprintln!("{}", diagnostic.render(path, source));
                eprintln!();
            }
            let errors = diagnostics.iter().filter(|d| d.is_error()).count();
            if errors > 0 {
                let plural = if errors == 1 { "" } else { "s" };
                eprintln!("{errors} error{plural} in {path}");
                std::process::exit(1);
            }
        }
    }
}
