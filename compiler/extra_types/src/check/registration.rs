//! Pass 0c: registering type aliases, enums and classes.
//!
//! Declarations may refer to each other in any order. Each round resolves
//! every pending declaration; one that fails on an unknown type is retried
//! after the next round registers something new. When a round makes no
//! progress the remaining failures are reported, with class hierarchies
//! that loop back on themselves reported as cycles.

use std::sync::Arc;

use extra_diagnostic::ErrorCode;
use extra_ir::{
    ClassDef, ClassMemberKind, EnumDef, FunctionKind, Item, ItemKind, Span, TypeAliasDef,
};
use rustc_hash::FxHashMap;

use super::{declared_signature, ModuleChecker};
use crate::error::messages;
use crate::infer::{infer, infer_function, widen_literal};
use crate::resolve::{bind_generics, formula_arg};
use crate::{
    resolve_type_expr, ClassProp, ClassType, EnumMemberType, EnumType, GenericType, NamedType,
    Type, TypeError, TypeRuntime, TypeScope,
};

#[derive(Copy, Clone)]
enum TypeDef<'m> {
    Alias(&'m TypeAliasDef),
    Enum(&'m EnumDef),
    Class(&'m ClassDef),
}

impl TypeDef<'_> {
    fn name(&self) -> &str {
        match self {
            TypeDef::Alias(def) => &def.name.name,
            TypeDef::Enum(def) => &def.name.name,
            TypeDef::Class(def) => &def.name.name,
        }
    }
}

impl ModuleChecker {
    pub(super) fn register_types(&mut self, items: &[&Item]) {
        let mut pending: Vec<(TypeDef<'_>, Span)> = items
            .iter()
            .filter_map(|item| {
                let def = match &item.kind {
                    ItemKind::TypeAlias(def) => TypeDef::Alias(def),
                    ItemKind::Enum(def) => TypeDef::Enum(def),
                    ItemKind::Class(def) => TypeDef::Class(def),
                    _ => return None,
                };
                Some((def, item.source.span))
            })
            .collect();

        while !pending.is_empty() {
            let mut deferred = Vec::new();
            let mut progress = false;
            for (def, span) in pending {
                match type_def(def, &self.scope) {
                    Ok(named) => {
                        tracing::trace!(name = def.name(), ty = %named.ty, "registered type");
                        self.scope.bind_type(def.name().to_string(), named);
                        progress = true;
                    }
                    Err(error) if error.code == ErrorCode::E2002 => {
                        deferred.push((def, span, error));
                    }
                    Err(error) => self.report(&error, span),
                }
            }
            if !progress {
                self.report_unresolved(&deferred);
                return;
            }
            pending = deferred
                .into_iter()
                .map(|(def, span, _)| (def, span))
                .collect();
        }
    }

    fn report_unresolved(&mut self, unresolved: &[(TypeDef<'_>, Span, TypeError)]) {
        let parents: FxHashMap<&str, &str> = unresolved
            .iter()
            .filter_map(|(def, _, _)| match def {
                TypeDef::Class(class) => class
                    .parent
                    .as_ref()
                    .map(|parent| (class.name.name.as_str(), parent.name.as_str())),
                _ => None,
            })
            .collect();
        for (def, span, error) in unresolved {
            if is_cyclic(def.name(), &parents) {
                let cycle = TypeError::new(ErrorCode::E2011, messages::cyclic_class(def.name()));
                self.report(&cycle, *span);
            } else {
                self.report(error, *span);
            }
        }
    }
}

/// Whether following `name`'s parents leads back to `name`.
fn is_cyclic(name: &str, parents: &FxHashMap<&str, &str>) -> bool {
    let mut current = name;
    for _ in 0..=parents.len() {
        match parents.get(current) {
            Some(&parent) if parent == name => return true,
            Some(&parent) => current = parent,
            None => return false,
        }
    }
    false
}

/// A scope in which each generic resolves to the given type variable.
pub(super) fn generic_scope(generics: &[GenericType], scope: &TypeScope) -> TypeScope {
    let mut inner = scope.child();
    for generic in generics {
        inner.bind_type(
            generic.name.clone(),
            NamedType::new(Type::Generic(generic.clone())),
        );
    }
    inner
}

fn type_def(def: TypeDef<'_>, scope: &TypeScope) -> Result<NamedType, TypeError> {
    match def {
        TypeDef::Alias(def) => {
            let (inner, generics) = bind_generics(&def.generics, scope);
            let ty = resolve_type_expr(&def.ty, &inner)?;
            Ok(NamedType { generics, ty })
        }
        TypeDef::Enum(def) => enum_type(def, scope),
        TypeDef::Class(def) => class_type(def, scope),
    }
}

fn enum_type(def: &EnumDef, scope: &TypeScope) -> Result<NamedType, TypeError> {
    let (inner, generics) = bind_generics(&def.generics, scope);
    let mut members = Vec::with_capacity(def.members.len());
    for member in &def.members {
        let mut args = Vec::with_capacity(member.args.len());
        for arg in &member.args {
            let ty = match &arg.type_annotation {
                Some(annotation) => resolve_type_expr(annotation, &inner)?,
                None => Type::Always,
            };
            args.push(formula_arg(arg.kind, &arg.name.name, ty, arg.default.is_some()));
        }
        members.push(EnumMemberType {
            name: member.name.name.clone(),
            args,
        });
    }
    let ty = Type::Enum(Arc::new(EnumType {
        name: def.name.name.clone(),
        members,
    }));
    Ok(NamedType { generics, ty })
}

/// Build a class in two steps: props and declared formula signatures
/// first, then formula bodies inferred against that provisional class so
/// undeclared return types are known. Body errors are reported when the
/// class is checked, not here.
fn class_type(def: &ClassDef, scope: &TypeScope) -> Result<NamedType, TypeError> {
    let parent = match &def.parent {
        Some(parent) => match scope.named_type(&parent.name).map(|named| named.ty) {
            Some(Type::Class(class)) => Some(class),
            Some(other) => {
                return Err(TypeError::new(
                    ErrorCode::E2001,
                    messages::cannot_extend(&def.name.name, &other),
                )
                .with_span(parent.source.span))
            }
            None => {
                return Err(TypeError::new(
                    ErrorCode::E2002,
                    messages::unknown_type(&parent.name),
                )
                .with_span(parent.source.span))
            }
        },
        None => None,
    };
    let (inner, generics) = bind_generics(&def.generics, scope);

    let mut props = Vec::new();
    let mut statics = Vec::new();
    for member in &def.members {
        let (prop, is_static) = match &member.kind {
            ClassMemberKind::Property {
                name,
                is_static,
                is_state,
                type_annotation,
                default,
            } => {
                let ty = match (type_annotation, default) {
                    (Some(annotation), _) => resolve_type_expr(annotation, &inner)?,
                    (None, Some(default)) => {
                        let value = infer(default, &inner, None)
                            .map_err(|error| error.or_span(member.source.span))?;
                        widen_literal(value)
                    }
                    (None, None) => Type::Always,
                };
                let prop = ClassProp {
                    name: name.name.clone(),
                    ty,
                    is_state: *is_state,
                    has_default: default.is_some(),
                };
                (prop, *is_static)
            }
            ClassMemberKind::Formula(function) => {
                let Some(name) = &function.name else {
                    continue;
                };
                let signature = declared_signature(function, &inner)?;
                let prop = ClassProp {
                    name: name.name.clone(),
                    ty: Type::formula(signature),
                    is_state: false,
                    has_default: true,
                };
                (prop, function.kind == FunctionKind::Static)
            }
        };
        if is_static {
            statics.push(prop);
        } else {
            props.push(prop);
        }
    }

    let args: Vec<Type> = generics.iter().cloned().map(Type::Generic).collect();
    let build = |props: Vec<ClassProp>, statics: Vec<ClassProp>| {
        let mut class = ClassType::new(
            def.name.name.clone(),
            parent.clone(),
            props,
            statics,
            def.is_view,
        );
        class.args = args.clone();
        Arc::new(class)
    };
    let provisional = build(props.clone(), statics.clone());

    let mut instance_scope = inner.child();
    instance_scope.set_this(Type::Class(Arc::clone(&provisional)));
    for member in &def.members {
        let ClassMemberKind::Formula(function) = &member.kind else {
            continue;
        };
        let Some(name) = &function.name else {
            continue;
        };
        if function.return_type.is_some() {
            continue;
        }
        let (body_scope, own) = if function.kind == FunctionKind::Static {
            (&inner, &mut statics)
        } else {
            (&instance_scope, &mut props)
        };
        if let Ok(formula) = infer_function(function, body_scope, None) {
            if let Some(prop) = own.iter_mut().find(|prop| prop.name == name.name) {
                prop.ty = Type::formula(formula);
            }
        }
    }

    Ok(NamedType {
        generics,
        ty: Type::Class(build(props, statics)),
    })
}
