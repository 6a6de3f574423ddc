//! Constant evaluation.
//!
//! Evaluates literal, operator, container, `let`, `if` and `switch` nodes
//! to a [`Value`]. Calls, views and dice rolls are left to a host runtime
//! and report [`EvalError::NotConstant`].

mod operators;

use std::rc::Rc;

use extra_ir::{Entry, EntryKey, Expr, ExprKind, Operator, Pattern, TemplatePart};
use extra_stack::ensure_sufficient_stack;
use rustc_hash::FxHashMap;

use crate::{can_be_assigned_to, resolve_type_expr, RegexPattern, TypeScope, Value};

pub(crate) use operators::{evaluate_binary, evaluate_unary, values_equal};

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum EvalError {
    #[error("cannot find '{0}'")]
    UnknownReference(String),
    #[error("cannot find state '@{0}'")]
    UnknownState(String),
    #[error("cannot apply '{op}' to {lhs} and {rhs}")]
    InvalidOperands {
        op: &'static str,
        lhs: String,
        rhs: String,
    },
    #[error("cannot apply '{op}' to {operand}")]
    InvalidOperand { op: &'static str, operand: String },
    #[error("division by zero")]
    DivisionByZero,
    #[error("integer overflow in '{0}'")]
    Overflow(&'static str),
    #[error("invalid regular expression: {0}")]
    InvalidRegex(String),
    #[error("{value} has no property '{name}'")]
    UnknownProperty { value: String, name: String },
    #[error("no case matches {0}")]
    NoMatch(String),
    #[error("{0} is not a constant expression")]
    NotConstant(&'static str),
}

/// Values of free names, supplied by the host.
pub trait ValueRuntime {
    fn local_value(&self, name: &str) -> Option<Value>;

    fn state_value(&self, _name: &str) -> Option<Value> {
        None
    }
}

#[derive(Clone, Default)]
struct ValueInner {
    locals: FxHashMap<String, Value>,
    parent: Option<ValueScope>,
    host: Option<Rc<dyn ValueRuntime>>,
}

/// Layered [`ValueRuntime`]; `let` and `switch` bindings go in child layers.
#[derive(Clone, Default)]
pub struct ValueScope(Rc<ValueInner>);

impl ValueScope {
    pub fn new() -> Self {
        ValueScope::default()
    }

    pub fn with_host(host: Rc<dyn ValueRuntime>) -> Self {
        ValueScope(Rc::new(ValueInner {
            host: Some(host),
            ..ValueInner::default()
        }))
    }

    #[must_use]
    pub fn child(&self) -> Self {
        ValueScope(Rc::new(ValueInner {
            parent: Some(self.clone()),
            ..ValueInner::default()
        }))
    }

    pub fn bind_local(&mut self, name: impl Into<String>, value: Value) {
        Rc::make_mut(&mut self.0).locals.insert(name.into(), value);
    }

    fn host(&self) -> Option<&Rc<dyn ValueRuntime>> {
        let mut current = Some(self);
        while let Some(scope) = current {
            if let Some(host) = &scope.0.host {
                return Some(host);
            }
            current = scope.0.parent.as_ref();
        }
        None
    }
}

impl ValueRuntime for ValueScope {
    fn local_value(&self, name: &str) -> Option<Value> {
        let mut current = Some(self);
        while let Some(scope) = current {
            if let Some(value) = scope.0.locals.get(name) {
                return Some(value.clone());
            }
            current = scope.0.parent.as_ref();
        }
        self.host()?.local_value(name)
    }

    fn state_value(&self, name: &str) -> Option<Value> {
        self.host()?.state_value(name)
    }
}

/// Evaluate `expr` against `scope`.
pub fn eval(expr: &Expr, scope: &ValueScope) -> Result<Value, EvalError> {
    ensure_sufficient_stack(|| eval_inner(expr, scope))
}

fn eval_inner(expr: &Expr, scope: &ValueScope) -> Result<Value, EvalError> {
    match &expr.kind {
        ExprKind::Null => Ok(Value::Null),
        ExprKind::Bool(value) => Ok(Value::Boolean(*value)),
        ExprKind::Int(literal) => Ok(Value::Int(literal.value)),
        ExprKind::Float(literal) => Ok(Value::Float(literal.value)),
        ExprKind::Str(literal) => Ok(Value::String(literal.value.clone())),
        ExprKind::Template(template) => {
            let mut text = String::new();
            for part in &template.parts {
                match part {
                    TemplatePart::Text(part) => text.push_str(part),
                    TemplatePart::Expr(part) => text.push_str(&eval(part, scope)?.to_display_string()),
                }
            }
            Ok(Value::String(text))
        }
        ExprKind::Regex(literal) => {
            let pattern = RegexPattern::new(literal.pattern.clone(), literal.flags.clone());
            pattern
                .compile()
                .map_err(|error| EvalError::InvalidRegex(error.to_string()))?;
            Ok(Value::Regex(pattern))
        }
        ExprKind::Dice(_) => Err(EvalError::NotConstant("a dice roll")),
        ExprKind::Reference(name) => scope
            .local_value(name)
            .ok_or_else(|| EvalError::UnknownReference(name.clone())),
        ExprKind::StateReference(name) => scope
            .state_value(name)
            .ok_or_else(|| EvalError::UnknownState(name.clone())),
        ExprKind::PipePlaceholder => scope
            .local_value("#")
            .ok_or_else(|| EvalError::UnknownReference("#".to_string())),
        ExprKind::This => Err(EvalError::NotConstant("`this`")),
        ExprKind::PropertyName(_) => Err(EvalError::NotConstant("a property name")),

        ExprKind::Array(container) => Ok(Value::Array(eval_elements(&container.entries, scope)?)),
        ExprKind::Set(container) => {
            let mut values: Vec<Value> = Vec::new();
            for value in eval_elements(&container.entries, scope)? {
                if !values.iter().any(|known| values_equal(known, &value)) {
                    values.push(value);
                }
            }
            Ok(Value::Set(values))
        }
        ExprKind::Dict(container) => eval_dict(&container.entries, scope),
        ExprKind::Object(container) => eval_object(&container.entries, scope),

        ExprKind::Let(let_expr) => {
            let mut inner = scope.child();
            for binding in &let_expr.bindings {
                let value = eval(&binding.value, &inner)?;
                inner.bind_local(binding.name.name.clone(), value);
            }
            eval(&let_expr.body, &inner)
        }
        ExprKind::If(if_expr) => {
            for branch in &if_expr.branches {
                if eval(&branch.condition, scope)?.is_truthy() {
                    return eval(&branch.body, scope);
                }
            }
            match &if_expr.else_body {
                Some(body) => eval(body, scope),
                None => Ok(Value::Null),
            }
        }
        ExprKind::Switch(switch) => {
            let subject = eval(&switch.subject, scope)?;
            for case in &switch.cases {
                if let Some(inner) = match_pattern(&case.pattern, &subject, scope)? {
                    return eval(&case.body, &inner);
                }
            }
            match &switch.else_body {
                Some(body) => eval(body, scope),
                None => Err(EvalError::NoMatch(subject.to_string())),
            }
        }

        ExprKind::Function(_) => Err(EvalError::NotConstant("a function")),
        ExprKind::Arguments(_) => Err(EvalError::NotConstant("an argument list")),
        ExprKind::Type(_) => Err(EvalError::NotConstant("a type")),
        ExprKind::View(_) => Err(EvalError::NotConstant("a view")),

        ExprKind::Operation(operation) => eval_operation(operation.op, &operation.args, scope),
    }
}

/// Entry values of an array or set literal, with spreads expanded and
/// inclusions tested.
fn eval_elements(entries: &[Entry], scope: &ValueScope) -> Result<Vec<Value>, EvalError> {
    let mut values = Vec::with_capacity(entries.len());
    for entry in entries {
        let Some(entry) = included(entry, scope)? else {
            continue;
        };
        match entry {
            Entry::Spread { value, .. } => match eval(value, scope)? {
                Value::Array(items) | Value::Set(items) => values.extend(items),
                other => {
                    return Err(EvalError::InvalidOperand {
                        op: "...",
                        operand: other.to_string(),
                    })
                }
            },
            other => values.push(eval(other.value(), scope)?),
        }
    }
    Ok(values)
}

/// The entry under an inclusion guard, or `None` if the guard is falsy.
fn included<'a>(entry: &'a Entry, scope: &ValueScope) -> Result<Option<&'a Entry>, EvalError> {
    match entry {
        Entry::Inclusion {
            entry, condition, ..
        } => {
            if eval(condition, scope)?.is_truthy() {
                included(entry, scope)
            } else {
                Ok(None)
            }
        }
        other => Ok(Some(other)),
    }
}

fn eval_dict(entries: &[Entry], scope: &ValueScope) -> Result<Value, EvalError> {
    let mut pairs: Vec<(Value, Value)> = Vec::new();
    let mut insert = |key: Value, value: Value| {
        match pairs.iter_mut().find(|(known, _)| values_equal(known, &key)) {
            Some(existing) => existing.1 = value,
            None => pairs.push((key, value)),
        }
    };
    for entry in entries {
        let Some(entry) = included(entry, scope)? else {
            continue;
        };
        match entry {
            Entry::Pair { key, value } => {
                let key = match key {
                    EntryKey::Name(name) => Value::String(name.name.clone()),
                    EntryKey::Literal(key) | EntryKey::Computed(key) => eval(key, scope)?,
                };
                insert(key, eval(value, scope)?);
            }
            Entry::Spread { value, .. } => match eval(value, scope)? {
                Value::Dict(spread) => {
                    for (key, value) in spread {
                        insert(key, value);
                    }
                }
                other => {
                    return Err(EvalError::InvalidOperand {
                        op: "...",
                        operand: other.to_string(),
                    })
                }
            },
            // A bare name is shorthand for `name: name`.
            Entry::Value(value) => match &value.kind {
                ExprKind::Reference(name) => {
                    insert(Value::String(name.clone()), eval(value, scope)?);
                }
                _ => return Err(EvalError::NotConstant("a dict entry without a key")),
            },
            Entry::Inclusion { .. } => {}
        }
    }
    Ok(Value::Dict(pairs))
}

fn eval_object(entries: &[Entry], scope: &ValueScope) -> Result<Value, EvalError> {
    let mut props: Vec<(Option<String>, Value)> = Vec::new();
    for entry in entries {
        let Some(entry) = included(entry, scope)? else {
            continue;
        };
        match entry {
            Entry::Pair { key, value } => {
                let name = match key {
                    EntryKey::Name(name) => Some(name.name.clone()),
                    other => other.static_name(),
                };
                props.push((name, eval(value, scope)?));
            }
            Entry::Spread { value, .. } => match eval(value, scope)? {
                Value::Object(spread) => props.extend(spread),
                other => {
                    return Err(EvalError::InvalidOperand {
                        op: "...",
                        operand: other.to_string(),
                    })
                }
            },
            Entry::Value(value) => props.push((None, eval(value, scope)?)),
            Entry::Inclusion { .. } => {}
        }
    }
    Ok(Value::Object(props))
}

/// A child scope with the pattern's bindings if `subject` matches.
fn match_pattern(
    pattern: &Pattern,
    subject: &Value,
    scope: &ValueScope,
) -> Result<Option<ValueScope>, EvalError> {
    let mut inner = scope.child();
    let matched = match pattern {
        Pattern::Wildcard(_) => true,
        Pattern::Binding(name) => {
            inner.bind_local(name.name.clone(), subject.clone());
            true
        }
        Pattern::Value(expr) => match eval(expr, scope)? {
            Value::Range { range, .. } => subject
                .as_f64()
                .is_some_and(|value| range.contains_value(value)),
            Value::Regex(pattern) => match subject {
                Value::String(text) => pattern.is_match(text),
                _ => false,
            },
            value => values_equal(subject, &value),
        },
        Pattern::Type { binding, ty } => {
            let ty = resolve_type_expr(ty, &TypeScope::new())
                .map_err(|_| EvalError::NotConstant("a pattern on a user-defined type"))?;
            let matched = can_be_assigned_to(&subject.type_of(), &ty);
            if let (true, Some(name)) = (matched, binding) {
                inner.bind_local(name.name.clone(), subject.clone());
            }
            matched
        }
    };
    Ok(matched.then_some(inner))
}

fn eval_operation(op: Operator, args: &[Expr], scope: &ValueScope) -> Result<Value, EvalError> {
    match (op, args) {
        (_, [operand]) => evaluate_unary(op, &eval(operand, scope)?),
        (Operator::And, [lhs, rhs]) => {
            let lhs = eval(lhs, scope)?;
            if lhs.is_truthy() {
                eval(rhs, scope)
            } else {
                Ok(lhs)
            }
        }
        (Operator::Or, [lhs, rhs]) => {
            let lhs = eval(lhs, scope)?;
            if lhs.is_truthy() {
                Ok(lhs)
            } else {
                eval(rhs, scope)
            }
        }
        (Operator::Coalesce, [lhs, rhs]) => match eval(lhs, scope)? {
            Value::Null => eval(rhs, scope),
            lhs => Ok(lhs),
        },
        (Operator::Pipe | Operator::NullablePipe, [lhs, rhs]) => {
            let lhs = eval(lhs, scope)?;
            if op == Operator::NullablePipe && lhs == Value::Null {
                return Ok(Value::Null);
            }
            let mut inner = scope.child();
            inner.bind_local("#", lhs);
            eval(rhs, &inner)
        }
        (Operator::PropertyAccess | Operator::NullablePropertyAccess, [lhs, rhs]) => {
            let lhs = eval(lhs, scope)?;
            if op == Operator::NullablePropertyAccess && lhs == Value::Null {
                return Ok(Value::Null);
            }
            let ExprKind::PropertyName(name) = &rhs.kind else {
                return Err(EvalError::NotConstant("a computed property"));
            };
            property_value(&lhs, name)
        }
        (Operator::Index | Operator::NullableIndex, [lhs, rhs]) => {
            let lhs = eval(lhs, scope)?;
            if op == Operator::NullableIndex && lhs == Value::Null {
                return Ok(Value::Null);
            }
            Ok(index_value(&lhs, &eval(rhs, scope)?))
        }
        (Operator::Call | Operator::NullableCall, _) => Err(EvalError::NotConstant("a call")),
        (Operator::Is | Operator::IsNot, [lhs, rhs]) => {
            let ExprKind::Type(ty) = &rhs.kind else {
                return Err(EvalError::NotConstant("a type test"));
            };
            let value = eval(lhs, scope)?;
            let ty = resolve_type_expr(ty, &TypeScope::new())
                .map_err(|_| EvalError::NotConstant("a test against a user-defined type"))?;
            let is = can_be_assigned_to(&value.type_of(), &ty);
            Ok(Value::Boolean(if op == Operator::Is { is } else { !is }))
        }
        (_, [lhs, rhs]) => evaluate_binary(op, &eval(lhs, scope)?, &eval(rhs, scope)?),
        _ => Err(EvalError::NotConstant("a malformed operation")),
    }
}

/// Built-in properties of constant values.
fn property_value(value: &Value, name: &str) -> Result<Value, EvalError> {
    let found = match (value, name) {
        (Value::String(text), "length") => i64::try_from(text.chars().count()).ok().map(Value::Int),
        (Value::Array(items) | Value::Set(items), "length") => {
            i64::try_from(items.len()).ok().map(Value::Int)
        }
        (Value::Dict(pairs), "length") => i64::try_from(pairs.len()).ok().map(Value::Int),
        (Value::String(text), "isEmpty") => Some(Value::Boolean(text.is_empty())),
        (Value::Array(items) | Value::Set(items), "isEmpty") => Some(Value::Boolean(items.is_empty())),
        (Value::Array(items), "first") => Some(items.first().cloned().unwrap_or(Value::Null)),
        (Value::Array(items), "last") => Some(items.last().cloned().unwrap_or(Value::Null)),
        (Value::String(text), "uppercase") => Some(Value::String(text.to_uppercase())),
        (Value::String(text), "lowercase") => Some(Value::String(text.to_lowercase())),
        (Value::Int(number), "abs") => number.checked_abs().map(Value::Int),
        (Value::Float(number), "abs") => Some(Value::Float(number.abs())),
        (Value::Int(number), "isEven") => Some(Value::Boolean(number % 2 == 0)),
        (Value::Object(props), name) => props
            .iter()
            .find(|(prop, _)| prop.as_deref() == Some(name))
            .map(|(_, value)| value.clone()),
        (Value::Dict(pairs), name) => Some(
            pairs
                .iter()
                .find(|(key, _)| *key == Value::String(name.to_string()))
                .map_or(Value::Null, |(_, value)| value.clone()),
        ),
        _ => None,
    };
    found.ok_or_else(|| EvalError::UnknownProperty {
        value: value.to_string(),
        name: name.to_string(),
    })
}

/// `xs[i]` and `dict[key]`; a missing entry is `null`. Negative array
/// indexes count from the end.
fn index_value(value: &Value, index: &Value) -> Value {
    match (value, index) {
        (Value::Array(items), Value::Int(position)) => {
            let position = if *position < 0 {
                i64::try_from(items.len()).ok().map(|len| len + position)
            } else {
                Some(*position)
            };
            position
                .and_then(|position| usize::try_from(position).ok())
                .and_then(|position| items.get(position))
                .cloned()
                .unwrap_or(Value::Null)
        }
        (Value::String(text), Value::Int(position)) => usize::try_from(*position)
            .ok()
            .and_then(|position| text.chars().nth(position))
            .map_or(Value::Null, |c| Value::String(c.to_string())),
        (Value::Dict(pairs), key) => pairs
            .iter()
            .find(|(known, _)| values_equal(known, key))
            .map_or(Value::Null, |(_, value)| value.clone()),
        (Value::Object(props), Value::Int(position)) => usize::try_from(*position)
            .ok()
            .and_then(|position| props.iter().filter(|(name, _)| name.is_none()).nth(position))
            .map_or(Value::Null, |(_, value)| value.clone()),
        (Value::Object(props), Value::String(name)) => props
            .iter()
            .find(|(prop, _)| prop.as_deref() == Some(name.as_str()))
            .map_or(Value::Null, |(_, value)| value.clone()),
        _ => Value::Null,
    }
}
