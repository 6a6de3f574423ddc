//! Module-level type checker.
//!
//! Checking follows a multi-pass approach:
//!
//! ```text
//! Pass 0: Registration
//!   0a: Duplicate names
//!   0b: Imports (bound as `always`)
//!   0c: Type aliases, enums and classes, in dependency order
//!
//! Pass 1: Signatures
//!   - State types, from annotations or initial values
//!   - Action, helper and view signatures, so bodies can refer to each
//!     other regardless of order
//!
//! Pass 2: Bodies
//!   - Class members (with `this`), helpers, views, actions, main
//! ```
//!
//! Every problem becomes a [`Diagnostic`]; a failing declaration never
//! stops the rest of the module from being checked.

mod registration;

use extra_diagnostic::{Diagnostic, ErrorCode};
use extra_ir::{
    ActionDef, ClassDef, ClassMemberKind, FunctionExpr, FunctionKind, ImportDef, ImportLocation,
    Item, ItemKind, Module, Span, StateDef,
};
use rustc_hash::FxHashSet;

use crate::error::messages;
use crate::infer::{infer, infer_function, widen_literal};
use crate::resolve::{bind_generics, formula_arg};
use crate::{
    check_assignable, resolve_type_expr, FormulaType, Type, TypeError, TypeRuntime, TypeScope,
};

/// The result of checking a module: the scope every declaration was
/// registered in, and everything that went wrong.
pub struct ModuleCheck {
    pub scope: TypeScope,
    pub diagnostics: Vec<Diagnostic>,
}

impl ModuleCheck {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Register every declaration of `module` in a child of `scope` and check
/// every body.
#[tracing::instrument(level = "debug", skip_all, fields(items = module.items.len()))]
pub fn check_module(module: &Module, scope: &TypeScope) -> ModuleCheck {
    let mut checker = ModuleChecker::new(scope);
    let items = checker.unique_items(module);

    // Pass 0
    for item in &items {
        if let ItemKind::Import(import) = &item.kind {
            checker.register_import(import);
        }
    }
    checker.register_types(&items);

    // Pass 1
    for item in &items {
        match &item.kind {
            ItemKind::State(def) => checker.register_state(def, item.source.span),
            ItemKind::Action(def) => checker.register_action(def, item.source.span),
            ItemKind::Helper(function) | ItemKind::View(function) => {
                checker.register_signature(function, item.source.span);
            }
            _ => {}
        }
    }

    // Pass 2
    for item in &items {
        let span = item.source.span;
        match &item.kind {
            ItemKind::Class(def) => checker.check_class(def, span),
            ItemKind::Helper(function) => checker.check_function(function, span),
            ItemKind::View(function) => {
                checker.check_function(function, span);
                checker.check_view_returns(function, span);
            }
            ItemKind::Action(def) => checker.check_action(def, span),
            ItemKind::Main(def) => {
                let result = infer(&def.body, &checker.scope, None);
                checker.report_err(result, span);
            }
            _ => {}
        }
    }

    tracing::debug!(diagnostics = checker.diagnostics.len(), "module checked");
    ModuleCheck {
        scope: checker.scope,
        diagnostics: checker.diagnostics,
    }
}

pub(crate) struct ModuleChecker {
    scope: TypeScope,
    diagnostics: Vec<Diagnostic>,
}

impl ModuleChecker {
    fn new(scope: &TypeScope) -> Self {
        ModuleChecker {
            scope: scope.child(),
            diagnostics: Vec::new(),
        }
    }

    fn report(&mut self, error: &TypeError, span: Span) {
        tracing::debug!(code = %error.code, "type error");
        self.diagnostics.push(error.to_diagnostic(span));
    }

    fn report_err<T>(&mut self, result: Result<T, TypeError>, span: Span) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.report(&error, span);
                None
            }
        }
    }

    /// Items whose name was not declared earlier. Later duplicates are
    /// reported and left unchecked.
    fn unique_items<'m>(&mut self, module: &'m Module) -> Vec<&'m Item> {
        let mut seen = FxHashSet::default();
        let mut items = Vec::with_capacity(module.items.len());
        for item in &module.items {
            if let Some(name) = item.kind.name() {
                if !seen.insert(name.to_string()) {
                    let error =
                        TypeError::new(ErrorCode::E2006, messages::duplicate_definition(name));
                    self.report(&error, item.source.span);
                    continue;
                }
            }
            items.push(item);
        }
        items
    }

    /// Imported modules are not loaded; their names check as `always`.
    fn register_import(&mut self, import: &ImportDef) {
        let module_name = match (&import.alias, &import.location) {
            (Some(alias), _) => Some(alias.name.clone()),
            (None, ImportLocation::Package(path)) => path.last().cloned(),
            (None, ImportLocation::File(_)) => None,
        };
        if let Some(name) = module_name {
            self.scope.bind_local(name, Type::Always);
        }
        for imported in &import.names {
            let name = imported.alias.as_ref().unwrap_or(&imported.name);
            self.scope.bind_local(name.name.clone(), Type::Always);
        }
    }

    /// `state @name: Type = value`. Literal initial values widen to their
    /// base type: `@count = 0` is an `Int`.
    fn register_state(&mut self, def: &StateDef, span: Span) {
        let declared = def
            .type_annotation
            .as_ref()
            .map(|annotation| resolve_type_expr(annotation, &self.scope))
            .transpose();
        let Some(declared) = self.report_err(declared, span) else {
            self.scope.bind_state(def.name.name.clone(), Type::Always);
            return;
        };
        let value = infer(&def.value, &self.scope, declared.as_ref());
        let ty = match (declared, value) {
            (Some(declared), Ok(value)) => {
                let checked = check_assignable(&value, &declared)
                    .map_err(|error| error.or_span(def.value.span()));
                self.report_err(checked, span);
                declared
            }
            (Some(declared), Err(error)) => {
                self.report(&error, span);
                declared
            }
            (None, Ok(value)) => widen_literal(value),
            (None, Err(error)) => {
                self.report(&error, span);
                Type::Always
            }
        };
        tracing::trace!(state = %def.name.name, ty = %ty, "state");
        self.scope.bind_state(def.name.name.clone(), ty);
    }

    /// Actions are formulas returning `null`.
    fn register_action(&mut self, def: &ActionDef, span: Span) {
        let args = def
            .args
            .iter()
            .map(|arg| {
                let ty = match &arg.type_annotation {
                    Some(annotation) => resolve_type_expr(annotation, &self.scope)?,
                    None => Type::Always,
                };
                Ok(formula_arg(arg.kind, &arg.name.name, ty, arg.default.is_some()))
            })
            .collect::<Result<Vec<_>, TypeError>>();
        let args = self.report_err(args, span).unwrap_or_default();
        self.scope
            .bind_action(def.name.name.clone(), Type::formula(FormulaType::new(args, Type::Null)));
    }

    /// A helper or view's declared signature; an undeclared return type is
    /// `always` until its body is checked.
    fn register_signature(&mut self, function: &FunctionExpr, span: Span) {
        let Some(name) = &function.name else {
            return;
        };
        let signature = declared_signature(function, &self.scope);
        let signature = self.report_err(signature, span);
        let ty = signature.map_or(Type::Always, Type::formula);
        self.scope.bind_local(name.name.clone(), ty);
    }

    /// Infer a helper or view body and rebind its name to the full type.
    fn check_function(&mut self, function: &FunctionExpr, span: Span) {
        let Some(formula) = self.report_err(infer_function(function, &self.scope, None), span)
        else {
            return;
        };
        if let Some(name) = &function.name {
            tracing::trace!(name = %name.name, ty = %Type::formula(formula.clone()), "function");
            self.scope.bind_local(name.name.clone(), Type::formula(formula));
        }
    }

    fn check_view_returns(&mut self, function: &FunctionExpr, span: Span) {
        if let Some(Type::Formula(formula)) = function
            .name
            .as_ref()
            .and_then(|name| self.scope.local_type(&name.name))
        {
            let checked = check_assignable(&formula.returns, &Type::View)
                .map_err(|error| error.or_span(function.body.span()));
            self.report_err(checked, span);
        }
    }

    /// Each assignment must target a declared state and fit its type.
    fn check_action(&mut self, def: &ActionDef, span: Span) {
        let mut body_scope = self.scope.child();
        if let Some(Type::Formula(formula)) = self.scope.action_type(&def.name.name) {
            for arg in &formula.args {
                body_scope.bind_local(arg.name.clone(), arg.ty.clone());
            }
        }
        for assignment in &def.assignments {
            let result = match body_scope.state_type(&assignment.state.name) {
                Some(state) => infer(&assignment.value, &body_scope, Some(&state)).and_then(
                    |value| {
                        check_assignable(&value, &state)
                            .map_err(|error| error.or_span(assignment.value.span()))
                    },
                ),
                None => Err(TypeError::new(
                    ErrorCode::E2009,
                    messages::unknown_state(&assignment.state.name),
                )
                .with_span(assignment.state.source.span)),
            };
            self.report_err(result, span);
        }
    }

    /// Property defaults against their annotations, then formula bodies
    /// with `this` bound to the class.
    fn check_class(&mut self, def: &ClassDef, span: Span) {
        let Some(named) = self.scope.named_type(&def.name.name) else {
            return;
        };
        let generic_scope = registration::generic_scope(&named.generics, &self.scope);
        let mut instance_scope = generic_scope.child();
        instance_scope.set_this(named.ty);
        for member in &def.members {
            let member_span = member.source.span;
            match &member.kind {
                ClassMemberKind::Property {
                    type_annotation: Some(annotation),
                    default: Some(default),
                    ..
                } => {
                    let result = resolve_type_expr(annotation, &generic_scope).and_then(|declared| {
                        let value = infer(default, &generic_scope, Some(&declared))?;
                        check_assignable(&value, &declared)
                            .map_err(|error| error.or_span(default.span()))
                    });
                    self.report_err(result, member_span);
                }
                ClassMemberKind::Property { .. } => {}
                ClassMemberKind::Formula(function) => {
                    let scope = if function.kind == FunctionKind::Static {
                        &generic_scope
                    } else {
                        &instance_scope
                    };
                    self.report_err(infer_function(function, scope, None), member_span);
                }
            }
        }
        tracing::trace!(class = %def.name.name, ?span, "class checked");
    }
}

/// A formula type from declared annotations only: unannotated arguments
/// take their default's type or `always`, an undeclared return is `always`.
pub(crate) fn declared_signature(
    function: &FunctionExpr,
    scope: &TypeScope,
) -> Result<FormulaType, TypeError> {
    let (inner, generics) = bind_generics(&function.generics, scope);
    let mut args = Vec::with_capacity(function.args.len());
    for arg in &function.args {
        let ty = match (&arg.type_annotation, &arg.default) {
            (Some(annotation), _) => resolve_type_expr(annotation, &inner)?,
            (None, Some(default)) => widen_literal(infer(default, &inner, None)?),
            (None, None) => Type::Always,
        };
        args.push(formula_arg(arg.kind, &arg.name.name, ty, arg.default.is_some()));
    }
    let returns = match &function.return_type {
        Some(annotation) => resolve_type_expr(annotation, &inner)?,
        None => Type::Always,
    };
    Ok(FormulaType::new(args, returns).with_generics(generics))
}
