//! Debug commands: `parse` and `lisp` for inspecting the parsed tree.

use extra_diagnostic::Diagnostic;
use extra_ir::{Expr, ItemKind, Module};

use super::{emit, parse_source, read_file, Parsed, SourceKind};

/// The full parsed tree, pretty-printed with `Debug`.
pub fn parse_tree(source: &str, kind: SourceKind) -> Result<String, Vec<Diagnostic>> {
    Ok(match parse_source(source, kind)? {
        Parsed::Module(module) => format!("{module:#?}"),
        Parsed::Expr(expr) => format!("{expr:#?}"),
    })
}

/// The S-expression form of an expression, or of every declaration body in
/// a module (one `name: (…)` line each).
pub fn lisp(source: &str, kind: SourceKind) -> Result<String, Vec<Diagnostic>> {
    Ok(match parse_source(source, kind)? {
        Parsed::Expr(expr) => expr.to_lisp(),
        Parsed::Module(module) => module_lisp(&module),
    })
}

fn module_lisp(module: &Module) -> String {
    let lines: Vec<String> = module
        .items
        .iter()
        .filter_map(|item| {
            let body = item_body(&item.kind)?;
            let name = item.kind.name().unwrap_or("main");
            Some(format!("{name}: {}", body.to_lisp()))
        })
        .collect();
    lines.join("\n")
}

fn item_body(kind: &ItemKind) -> Option<&Expr> {
    match kind {
        ItemKind::Helper(function) | ItemKind::View(function) => Some(&function.body),
        ItemKind::State(def) => Some(&def.value),
        ItemKind::Main(def) => Some(&def.body),
        _ => None,
    }
}

/// Parse a file and display its tree.
pub fn parse_file(path: &str, kind: SourceKind) {
    let content = read_file(path);
    let result = parse_tree(&content, kind);
    emit(path, &content, result);
}

/// Parse a file and display its S-expression form.
pub fn lisp_file(path: &str, kind: SourceKind) {
    let content = read_file(path);
    let result = lisp(&content, kind);
    emit(path, &content, result);
}
