//! Subtyping: can a value of one type be used where another is expected?
//!
//! The check is structural for objects, collections and formulas, nominal
//! with a structural fallback for classes, and interval containment for
//! narrowed numbers, strings and lengths.
//!
//! Generics never fail a check. An unresolved generic on the receiving side
//! records the tested type as a *hint*; one on the tested side records the
//! receiving type as a *requirement* (see [`GenericResolution`]).

use extra_diagnostic::ErrorCode;
use extra_stack::ensure_sufficient_stack;

use crate::error::messages;
use crate::{
    formula, ClassType, GenericResolution, Literal, ObjectType, Type, TypeError,
};

/// `true` if a value of type `test` can be assigned to `assign_to`.
pub fn can_be_assigned_to(test: &Type, assign_to: &Type) -> bool {
    let mut generics = GenericResolution::new();
    Assigner::new(&mut generics).assign(test, assign_to)
}

/// [`can_be_assigned_to`], reporting why not.
pub fn check_assignable(test: &Type, assign_to: &Type) -> Result<(), TypeError> {
    let mut generics = GenericResolution::new();
    let mut assigner = Assigner::new(&mut generics);
    if assigner.assign(test, assign_to) {
        return Ok(());
    }
    let mut message = messages::cannot_assign(test, assign_to);
    if let Some(reason) = assigner.reason() {
        message.push('\n');
        message.push_str(&reason);
    }
    Err(TypeError::new(ErrorCode::E2001, message))
}

/// One assignability check, sharing a generic resolution pass with its
/// caller and remembering why it failed.
pub struct Assigner<'g> {
    pub(crate) generics: &'g mut GenericResolution,
    /// Innermost failure first; each enclosing check adds its context
    /// after it.
    reasons: Vec<String>,
}

impl<'g> Assigner<'g> {
    pub fn new(generics: &'g mut GenericResolution) -> Self {
        Assigner {
            generics,
            reasons: Vec::new(),
        }
    }

    /// Why the last failing check failed, one line per level, innermost
    /// cause first.
    pub fn reason(&self) -> Option<String> {
        if self.reasons.is_empty() {
            None
        } else {
            Some(self.reasons.join("\n"))
        }
    }

    /// A check that succeeds leaves no reasons behind, even if some of its
    /// attempts failed along the way.
    pub fn assign(&mut self, test: &Type, assign_to: &Type) -> bool {
        let mark = self.reasons.len();
        let ok = ensure_sufficient_stack(|| self.assign_inner(test, assign_to));
        if ok {
            self.reasons.truncate(mark);
        }
        ok
    }

    #[cold]
    pub(crate) fn fail(&mut self, reason: impl FnOnce() -> String) -> bool {
        self.reasons.push(reason());
        false
    }

    fn assign_inner(&mut self, test: &Type, assign_to: &Type) -> bool {
        match (test, assign_to) {
            (Type::Never, _) | (_, Type::Never) => false,
            (Type::All, _) => false,
            (_, Type::All) => true,
            (Type::Always, _) | (_, Type::Always) => true,

            (Type::Generic(a), Type::Generic(b)) if a.id == b.id => true,
            (_, Type::Generic(generic)) => match self.generics.resolved(generic).cloned() {
                Some(resolved) => self.assign(test, &resolved),
                None => {
                    self.generics.add_hint(generic, test.clone());
                    true
                }
            },
            (Type::Generic(generic), _) => match self.generics.resolved(generic).cloned() {
                Some(resolved) => self.assign(&resolved, assign_to),
                None => {
                    self.generics.add_requirement(generic, assign_to.clone());
                    true
                }
            },

            (Type::OneOf(_) | Type::Optional(_), _) => test
                .variants()
                .iter()
                .all(|member| self.assign(member, assign_to)),
            (_, Type::OneOf(_) | Type::Optional(_)) => self.assign_to_one_of(test, assign_to),

            (Type::Literal(a), Type::Literal(b)) => match (a, b) {
                (Literal::Int(a), Literal::Float(b)) if *a as f64 == *b => true,
                _ if a == b => true,
                _ => self.fail(|| format!("{a} is not {b}")),
            },
            (Type::Literal(literal), _) => self.assign_literal(literal, assign_to),
            (_, Type::Literal(_)) => false,

            (Type::Null, Type::Null)
            | (Type::Boolean, Type::Boolean)
            | (Type::Regex, Type::Regex)
            | (Type::View, Type::View) => true,

            (Type::Int(range), Type::Int(into) | Type::Float(into))
            | (Type::Float(range), Type::Float(into)) => {
                into.contains(range) || self.fail(|| format!("{test} is outside of {assign_to}"))
            }

            (Type::String(a), Type::String(b)) => {
                if !b.length.contains(&a.length) {
                    return self.fail(|| format!("the length of {test} is outside of {assign_to}"));
                }
                // Only a pattern the tested type already carries can be proven.
                b.regexes.iter().all(|re| a.regexes.contains(re))
                    || self.fail(|| format!("{test} is not known to match the patterns of {assign_to}"))
            }

            (Type::Range(a), Type::Range(b)) => self.assign(a, b),
            (Type::Array(a), Type::Array(b)) | (Type::Set(a), Type::Set(b)) => {
                if !b.length.contains(&a.length) {
                    return self.fail(|| format!("the length of {test} is outside of {assign_to}"));
                }
                self.assign(&a.element, &b.element)
            }
            (Type::Dict(a), Type::Dict(b)) => {
                if !b.length.contains(&a.length) {
                    return self.fail(|| format!("the length of {test} is outside of {assign_to}"));
                }
                if let Some(missing) = b.keys.iter().find(|key| !a.keys.contains(*key)) {
                    let missing = missing.clone();
                    return self.fail(|| format!("{test} is missing key '{missing}'"));
                }
                self.assign(&a.value, &b.value)
            }

            (Type::Object(a), Type::Object(b)) => self.assign_object(a, b),
            (Type::Class(a), Type::Object(b)) => self.assign_class_to_object(a, b),
            (Type::Class(a), Type::Class(b)) => self.assign_class(a, b),
            (Type::Enum(a), Type::Enum(b)) => {
                a.name == b.name || self.fail(|| format!("{test} is not {assign_to}"))
            }
            (Type::Formula(a), Type::Formula(b)) => formula::formula_assignable(self, a, b),

            _ => self.fail(|| format!("{test} is not {assign_to}")),
        }
    }

    /// Non-generic members first, so a concrete match never leaves hints
    /// behind on a generic member.
    fn assign_to_one_of(&mut self, test: &Type, assign_to: &Type) -> bool {
        let mark = self.reasons.len();
        let members = assign_to.variants();
        let (generic, concrete): (Vec<&Type>, Vec<&Type>) =
            members.iter().partition(|member| member.contains_generic());
        for member in concrete.into_iter().chain(generic) {
            // The last failing member's reasons win.
            self.reasons.truncate(mark);
            if self.assign(test, member) {
                return true;
            }
        }
        false
    }

    fn assign_literal(&mut self, literal: &Literal, assign_to: &Type) -> bool {
        let ok = match (literal, assign_to) {
            (Literal::Boolean(_), Type::Boolean) | (Literal::Regex(_), Type::Regex) => true,
            (Literal::Int(value), Type::Int(range) | Type::Float(range)) => {
                range.contains_value(*value as f64)
            }
            (Literal::Float(value), Type::Float(range)) => range.contains_value(*value),
            (Literal::String(value), Type::String(narrowed)) => {
                narrowed.length.contains_length(value.chars().count())
                    && narrowed.regexes.iter().all(|re| re.is_match(value))
            }
            _ => false,
        };
        ok || self.fail(|| format!("{literal} is not {assign_to}"))
    }

    fn assign_object(&mut self, test: &ObjectType, assign_to: &ObjectType) -> bool {
        let mut positional = 0;
        for prop in &assign_to.props {
            let found = match &prop.name {
                Some(name) => test.named_prop(name),
                None => {
                    positional += 1;
                    test.positional_prop(positional - 1)
                }
            };
            let ok = match found {
                Some(ty) => self.assign(ty, &prop.ty),
                None => prop.ty.accepts_null(),
            };
            if !ok {
                let label = prop
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("#{positional}"));
                return self.fail(|| format!("property '{label}' does not match {}", prop.ty));
            }
        }
        true
    }

    fn assign_class_to_object(&mut self, test: &ClassType, assign_to: &ObjectType) -> bool {
        for prop in &assign_to.props {
            let Some(name) = &prop.name else {
                return self.fail(|| format!("{} has no positional properties", test.name));
            };
            let ok = match test.prop(name) {
                Some(found) => self.assign(&found.ty, &prop.ty),
                None => prop.ty.accepts_null(),
            };
            if !ok {
                return self.fail(|| format!("property '{name}' does not match {}", prop.ty));
            }
        }
        true
    }

    fn assign_class(&mut self, test: &ClassType, assign_to: &ClassType) -> bool {
        if test.is_or_extends(assign_to) && test.args.len() == assign_to.args.len() {
            let args_match = test
                .args
                .iter()
                .zip(&assign_to.args)
                .all(|(a, b)| self.assign(a, b));
            if args_match {
                return true;
            }
        }
        for prop in &assign_to.props {
            let ok = match test.prop(&prop.name) {
                Some(found) => self.assign(&found.ty, &prop.ty),
                None => prop.ty.accepts_null(),
            };
            if !ok {
                return self.fail(|| {
                    format!("{} is not a {}: property '{}' does not match", test.name, assign_to.name, prop.name)
                });
            }
        }
        true
    }
}
