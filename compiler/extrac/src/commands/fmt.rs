//! The `fmt` command: print a file in canonical form, comments kept.

use extra_diagnostic::Diagnostic;

use super::{emit, parse_source, read_file, Parsed, SourceKind};

pub fn format_source(source: &str, kind: SourceKind) -> Result<String, Vec<Diagnostic>> {
    Ok(match parse_source(source, kind)? {
        Parsed::Module(module) => module.to_code(),
        Parsed::Expr(expr) => expr.to_code(),
    })
}

/// Format a file to stdout. With `check`, print nothing and exit with
/// status 1 when the file is not already formatted.
pub fn format_file(path: &str, kind: SourceKind, check: bool) {
    let content = read_file(path);
    let result = format_source(&content, kind);
    if !check {
        emit(path, &content, result);
        return;
    }
    match result {
        Ok(formatted) if formatted.trim_end() == content.trim_end() => {}
        Ok(_) => {
            eprintln!("{path} is not formatted");
            std::process::exit(1);
        }
        Err(diagnostics) => emit(path, &content, Err(diagnostics)),
    }
}
