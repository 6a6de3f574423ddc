//! Where the type system looks up names.
//!
//! The checker never owns a symbol table. It asks a [`TypeRuntime`] for
//! the type of a reference, a state, an action or a named type, and for
//! the relationships recorded between references. [`TypeScope`] is the
//! layered implementation used while checking: each `let`, branch and
//! function body gets a child layer, and narrowing a reference writes a
//! new binding for it into the innermost layer.
//!
//! # Performance
//!
//! Layers share their parents through `Rc`, so a child scope is O(1) and
//! binding into a scope nobody else holds mutates it in place.

use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};

use rustc_hash::FxHashMap;

use crate::{GenericType, Relationship, Type, Value};

/// Stable identity of a reference, shared by all of its narrowed copies.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RefId(u32);

static NEXT_REF: AtomicU32 = AtomicU32::new(0);

impl RefId {
    pub fn fresh() -> Self {
        RefId(NEXT_REF.fetch_add(1, Ordering::Relaxed))
    }
}

/// A narrowable reference.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Binding {
    /// `name`
    Local(String),
    /// `@name`
    State(String),
}

impl Binding {
    pub fn name(&self) -> &str {
        match self {
            Binding::Local(name) | Binding::State(name) => name,
        }
    }
}

/// A type name: a class, enum, alias or generic parameter, with the
/// generics its arguments are substituted for.
#[derive(Clone, Debug, PartialEq)]
pub struct NamedType {
    pub generics: Vec<GenericType>,
    pub ty: Type,
}

impl NamedType {
    pub fn new(ty: Type) -> Self {
        NamedType {
            generics: Vec::new(),
            ty,
        }
    }
}

/// Name resolution for the type checker.
pub trait TypeRuntime {
    fn local_type(&self, name: &str) -> Option<Type>;

    fn state_type(&self, _name: &str) -> Option<Type> {
        None
    }

    fn this_type(&self) -> Option<Type> {
        None
    }

    fn action_type(&self, _name: &str) -> Option<Type> {
        None
    }

    fn named_type(&self, _name: &str) -> Option<NamedType> {
        None
    }

    fn ref_id(&self, _binding: &Binding) -> Option<RefId> {
        None
    }

    fn add_relationship(&mut self, _relationship: Relationship) {}

    fn relationships_that_reference(&self, _id: RefId) -> Vec<Relationship> {
        Vec::new()
    }

    fn locale(&self) -> Option<&str> {
        None
    }
}

/// Tags a host registers for views (`<div>`, `<input>`), consulted for
/// lowercase element names.
pub trait ViewRuntime {
    fn has(&self, tag: &str) -> bool;
    /// The formula a tag's props are checked against.
    fn view_type(&self, tag: &str) -> Option<Type>;
    fn view_value(&self, tag: &str) -> Option<Value>;
}

#[derive(Clone, Debug)]
struct Local {
    ty: Type,
    id: RefId,
}

#[derive(Clone, Default)]
struct ScopeInner {
    locals: FxHashMap<String, Local>,
    states: FxHashMap<String, Local>,
    actions: FxHashMap<String, Type>,
    types: FxHashMap<String, NamedType>,
    this: Option<Type>,
    relationships: Vec<Relationship>,
    parent: Option<TypeScope>,
    /// Consulted when no layer knows a name.
    host: Option<Rc<dyn TypeRuntime>>,
    views: Option<Rc<dyn ViewRuntime>>,
    locale: Option<String>,
}

/// Layered [`TypeRuntime`].
#[derive(Clone, Default)]
pub struct TypeScope(Rc<ScopeInner>);

impl TypeScope {
    pub fn new() -> Self {
        TypeScope::default()
    }

    /// A root scope that falls back to `host` for unknown names.
    pub fn with_host(host: Rc<dyn TypeRuntime>) -> Self {
        TypeScope(Rc::new(ScopeInner {
            host: Some(host),
            ..ScopeInner::default()
        }))
    }

    #[must_use]
    pub fn with_views(mut self, views: Rc<dyn ViewRuntime>) -> Self {
        Rc::make_mut(&mut self.0).views = Some(views);
        self
    }

    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        Rc::make_mut(&mut self.0).locale = Some(locale.into());
        self
    }

    #[must_use]
    pub fn child(&self) -> Self {
        TypeScope(Rc::new(ScopeInner {
            parent: Some(self.clone()),
            ..ScopeInner::default()
        }))
    }

    /// Bind a new local, shadowing any outer one.
    pub fn bind_local(&mut self, name: impl Into<String>, ty: Type) -> RefId {
        let id = RefId::fresh();
        Rc::make_mut(&mut self.0)
            .locals
            .insert(name.into(), Local { ty, id });
        id
    }

    pub fn bind_state(&mut self, name: impl Into<String>, ty: Type) -> RefId {
        let id = RefId::fresh();
        Rc::make_mut(&mut self.0)
            .states
            .insert(name.into(), Local { ty, id });
        id
    }

    pub fn bind_action(&mut self, name: impl Into<String>, ty: Type) {
        Rc::make_mut(&mut self.0).actions.insert(name.into(), ty);
    }

    pub fn bind_type(&mut self, name: impl Into<String>, named: NamedType) {
        Rc::make_mut(&mut self.0).types.insert(name.into(), named);
    }

    pub fn set_this(&mut self, ty: Type) {
        Rc::make_mut(&mut self.0).this = Some(ty);
    }

    /// Rebind an existing reference to a narrower type, keeping its
    /// identity.
    pub fn narrow(&mut self, binding: &Binding, ty: Type) {
        let id = self.binding_id(binding).unwrap_or_else(RefId::fresh);
        let inner = Rc::make_mut(&mut self.0);
        let local = Local { ty, id };
        match binding {
            Binding::Local(name) => inner.locals.insert(name.clone(), local),
            Binding::State(name) => inner.states.insert(name.clone(), local),
        };
    }

    pub fn binding_type(&self, binding: &Binding) -> Option<Type> {
        match binding {
            Binding::Local(name) => self.local_type(name),
            Binding::State(name) => self.state_type(name),
        }
    }

    pub fn binding_id(&self, binding: &Binding) -> Option<RefId> {
        self.ref_id(binding)
    }

    pub fn views(&self) -> Option<Rc<dyn ViewRuntime>> {
        self.find(|inner| inner.views.clone())
    }

    /// Every binding narrowed or bound in the layers above `base`, with its
    /// innermost type. `base` must be an ancestor of `self`.
    pub fn narrowed_since(&self, base: &TypeScope) -> Vec<(Binding, Type)> {
        let mut seen: Vec<(Binding, Type)> = Vec::new();
        let mut current = Some(self);
        while let Some(scope) = current {
            if Rc::ptr_eq(&scope.0, &base.0) {
                break;
            }
            let locals = scope
                .0
                .locals
                .iter()
                .map(|(name, local)| (Binding::Local(name.clone()), &local.ty));
            let states = scope
                .0
                .states
                .iter()
                .map(|(name, local)| (Binding::State(name.clone()), &local.ty));
            for (binding, ty) in locals.chain(states) {
                if !seen.iter().any(|(known, _)| *known == binding) {
                    seen.push((binding, ty.clone()));
                }
            }
            current = scope.0.parent.as_ref();
        }
        seen
    }

    fn find<T>(&self, f: impl Fn(&ScopeInner) -> Option<T>) -> Option<T> {
        let mut current = Some(self);
        while let Some(scope) = current {
            if let Some(found) = f(scope.0.as_ref()) {
                return Some(found);
            }
            current = scope.0.parent.as_ref();
        }
        None
    }

    fn host(&self) -> Option<Rc<dyn TypeRuntime>> {
        self.find(|inner| inner.host.clone())
    }
}

impl TypeRuntime for TypeScope {
    fn local_type(&self, name: &str) -> Option<Type> {
        self.find(|inner| inner.locals.get(name).map(|local| local.ty.clone()))
            .or_else(|| self.host()?.local_type(name))
    }

    fn state_type(&self, name: &str) -> Option<Type> {
        self.find(|inner| inner.states.get(name).map(|local| local.ty.clone()))
            .or_else(|| self.host()?.state_type(name))
    }

    fn this_type(&self) -> Option<Type> {
        self.find(|inner| inner.this.clone())
            .or_else(|| self.host()?.this_type())
    }

    fn action_type(&self, name: &str) -> Option<Type> {
        self.find(|inner| inner.actions.get(name).cloned())
            .or_else(|| self.host()?.action_type(name))
    }

    fn named_type(&self, name: &str) -> Option<NamedType> {
        self.find(|inner| inner.types.get(name).cloned())
            .or_else(|| self.host()?.named_type(name))
    }

    fn ref_id(&self, binding: &Binding) -> Option<RefId> {
        let found = match binding {
            Binding::Local(name) => self.find(|inner| inner.locals.get(name).map(|l| l.id)),
            Binding::State(name) => self.find(|inner| inner.states.get(name).map(|l| l.id)),
        };
        found.or_else(|| self.host()?.ref_id(binding))
    }

    fn add_relationship(&mut self, relationship: Relationship) {
        tracing::trace!(subject = %relationship.subject.name(), op = relationship.op.symbol(), "relationship");
        Rc::make_mut(&mut self.0).relationships.push(relationship);
    }

    fn relationships_that_reference(&self, id: RefId) -> Vec<Relationship> {
        let mut found = Vec::new();
        let mut current = Some(self);
        while let Some(scope) = current {
            found.extend(
                scope
                    .0
                    .relationships
                    .iter()
                    .filter(|relationship| relationship.references(id))
                    .cloned(),
            );
            current = scope.0.parent.as_ref();
        }
        if let Some(host) = self.host() {
            found.extend(host.relationships_that_reference(id));
        }
        found
    }

    fn locale(&self) -> Option<&str> {
        let mut current = Some(self);
        while let Some(scope) = current {
            if let Some(locale) = &scope.0.locale {
                return Some(locale);
            }
            current = scope.0.parent.as_ref();
        }
        None
    }
}

impl fmt::Debug for TypeScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut locals: Vec<&String> = self.0.locals.keys().collect();
        locals.sort();
        f.debug_struct("TypeScope")
            .field("locals", &locals)
            .field("parent", &self.0.parent)
            .finish_non_exhaustive()
    }
}
