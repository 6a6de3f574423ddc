//! The `type` and `check` commands.

use extra_diagnostic::Diagnostic;
use extra_ir::{Expr, ItemKind, Module};
use extra_types::{check_module, get_type, ModuleCheck, TypeRuntime, TypeScope};

use super::{emit, parse_source, read_file, Parsed, SourceKind};

/// The type of an expression, or the type of every declaration in a
/// module.
pub fn type_source(source: &str, kind: SourceKind) -> Result<String, Vec<Diagnostic>> {
    match parse_source(source, kind)? {
        Parsed::Expr(expr) => expr_type(&expr),
        Parsed::Module(module) => {
            let result = check_module(&module, &TypeScope::new());
            if result.has_errors() {
                return Err(result.diagnostics);
            }
            Ok(declaration_types(&module, &result).join("\n"))
        }
    }
}

/// Type-check a module (or expression) and summarize.
///
/// Every diagnostic is collected before reporting, giving a complete
/// picture of the problems rather than stopping at the first.
pub fn check_source(source: &str, kind: SourceKind) -> Result<String, Vec<Diagnostic>> {
    match parse_source(source, kind)? {
        Parsed::Expr(expr) => expr_type(&expr).map(|_| "OK".to_string()),
        Parsed::Module(module) => {
            let result = check_module(&module, &TypeScope::new());
            if result.has_errors() {
                return Err(result.diagnostics);
            }
            let count = module.items.len();
            let plural = if count == 1 { "" } else { "s" };
            Ok(format!("OK ({count} declaration{plural})"))
        }
    }
}

fn expr_type(expr: &Expr) -> Result<String, Vec<Diagnostic>> {
    get_type(expr, &TypeScope::new())
        .map(|ty| ty.to_string())
        .map_err(|error| vec![error.to_diagnostic(expr.span())])
}

fn declaration_types(module: &Module, result: &ModuleCheck) -> Vec<String> {
    let scope = &result.scope;
    module
        .items
        .iter()
        .filter_map(|item| match &item.kind {
            ItemKind::TypeAlias(def) => {
                let named = scope.named_type(&def.name.name)?;
                Some(format!("type {} = {}", def.name.name, named.ty))
            }
            ItemKind::Class(def) => {
                let named = scope.named_type(&def.name.name)?;
                Some(format!("class {}: {}", def.name.name, named.ty))
            }
            ItemKind::Enum(def) => {
                let named = scope.named_type(&def.name.name)?;
                Some(format!("enum {}: {}", def.name.name, named.ty))
            }
            ItemKind::State(def) => {
                let ty = scope.state_type(&def.name.name)?;
                Some(format!("state @{}: {ty}", def.name.name))
            }
            ItemKind::Action(def) => {
                let ty = scope.action_type(&def.name.name)?;
                Some(format!("action {}: {ty}", def.name.name))
            }
            ItemKind::Helper(function) | ItemKind::View(function) => {
                let name = function.name.as_ref()?;
                let ty = scope.local_type(&name.name)?;
                Some(format!("{}: {ty}", name.name))
            }
            ItemKind::Main(def) => {
                let ty = get_type(&def.body, scope).ok()?;
                Some(format!("main: {ty}"))
            }
            ItemKind::Import(_) => None,
        })
        .collect()
}

pub fn type_file(path: &str, kind: SourceKind) {
    let content = read_file(path);
    let result = type_source(&content, kind);
    emit(path, &content, result);
}

pub fn check_file(path: &str, kind: SourceKind) {
    let content = read_file(path);
    let result = check_source(&content, kind).map(|summary| format!("{summary}: {path}"));
    emit(path, &content, result);
}
