//! Joins: the narrowest type both operands can be assigned to.
//!
//! Used for the element type of a mixed container literal and for the
//! result of a conditional. When no rule combines two types the join is
//! their one-of.

use std::sync::Arc;

use extra_stack::ensure_sufficient_stack;

use crate::{
    can_be_assigned_to, ClassType, FormulaArgType, FormulaType, Literal, LengthRange,
    NumberRange, ObjectProp, ObjectType, StringType, Type,
};

/// The join of `lhs` and `rhs`.
pub fn compatible_with_both_types(lhs: &Type, rhs: &Type) -> Type {
    ensure_sufficient_stack(|| join(lhs, rhs))
}

fn join(lhs: &Type, rhs: &Type) -> Type {
    if lhs == rhs {
        return lhs.clone();
    }
    match (lhs, rhs) {
        (Type::Never, _) | (_, Type::Never) => Type::Never,
        (Type::All, _) | (_, Type::All) => Type::All,
        (Type::Always, other) | (other, Type::Always) => other.clone(),
        (Type::OneOf(_) | Type::Optional(_), _) | (_, Type::OneOf(_) | Type::Optional(_)) => {
            let mut members = lhs.variants();
            members.extend(rhs.variants());
            Type::one_of(members)
        }
        _ => merge(lhs, rhs).unwrap_or_else(|| Type::one_of(vec![lhs.clone(), rhs.clone()])),
    }
}

impl Type {
    /// A normalized union.
    ///
    /// Nested unions are flattened, `never` dropped and `all` absorbs
    /// everything. Each member is merged into an existing one when a join
    /// rule applies (`true | false` is `Boolean`, `Int(1...5) | Int(3...9)`
    /// is `Int(1...9)`). One member is that member; a member plus `null` is
    /// [`Type::Optional`].
    pub fn one_of(types: Vec<Type>) -> Type {
        let mut members: Vec<Type> = Vec::with_capacity(types.len());
        let mut saw_always = false;
        for ty in types {
            for variant in ty.variants() {
                match variant {
                    Type::All => return Type::All,
                    Type::Never => {}
                    Type::Always => saw_always = true,
                    variant => push_member(&mut members, variant),
                }
            }
        }
        match members.len() {
            0 if saw_always => Type::Always,
            0 => Type::Never,
            1 => members.remove(0),
            2 if members.iter().any(Type::is_null) => {
                let inner = members.into_iter().find(|ty| !ty.is_null()).unwrap_or(Type::Null);
                Type::Optional(Box::new(inner))
            }
            _ => Type::OneOf(members),
        }
    }
}

fn push_member(members: &mut Vec<Type>, ty: Type) {
    let merged = members
        .iter()
        .enumerate()
        .find_map(|(index, existing)| merge(existing, &ty).map(|merged| (index, merged)));
    match merged {
        Some((index, merged)) => {
            members.remove(index);
            push_member(members, merged);
        }
        None => members.push(ty),
    }
}

/// The rule-based join of two non-union types, or `None` when only a
/// one-of holds both.
fn merge(lhs: &Type, rhs: &Type) -> Option<Type> {
    if lhs == rhs {
        return Some(lhs.clone());
    }
    let merged = match (lhs, rhs) {
        (Type::Literal(a), Type::Literal(b)) => merge_literals(a, b),
        (Type::Literal(literal), other) | (other, Type::Literal(literal)) => {
            combine_literal(other, literal)
        }

        (Type::Int(a), Type::Int(b)) => Some(Type::int(a.hull(b))),
        (Type::Int(a) | Type::Float(a), Type::Int(b) | Type::Float(b)) => {
            Some(Type::float(a.hull(b)))
        }
        (Type::String(a), Type::String(b)) => Some(Type::string(StringType {
            length: a.length.hull(&b.length),
            regexes: if a.regexes == b.regexes {
                a.regexes.clone()
            } else {
                Vec::new()
            },
        })),

        (Type::Range(a), Type::Range(b)) => Some(Type::range(join(a, b))),
        (Type::Array(a), Type::Array(b)) => Some(Type::array_with_length(
            join(&a.element, &b.element),
            a.length.hull(&b.length),
        )),
        (Type::Set(a), Type::Set(b)) => Some(Type::set_with_length(
            join(&a.element, &b.element),
            a.length.hull(&b.length),
        )),
        (Type::Dict(a), Type::Dict(b)) => Some(Type::dict_with(
            join(&a.value, &b.value),
            a.length.hull(&b.length),
            // Only keys present in both are present in the join.
            a.keys.intersection(&b.keys).cloned().collect(),
        )),

        (Type::Object(a), Type::Object(b)) => merge_objects(a, b),
        (Type::Class(a), Type::Class(b)) => common_ancestor(a, b).map(Type::Class),
        (Type::Formula(a), Type::Formula(b)) => merge_formulas(a, b),
        _ => None,
    };
    merged.or_else(|| {
        if lhs.contains_generic() || rhs.contains_generic() {
            None
        } else if can_be_assigned_to(lhs, rhs) {
            Some(rhs.clone())
        } else if can_be_assigned_to(rhs, lhs) {
            Some(lhs.clone())
        } else {
            None
        }
    })
}

fn merge_literals(a: &Literal, b: &Literal) -> Option<Type> {
    match (a, b) {
        (Literal::Int(int), Literal::Float(float)) | (Literal::Float(float), Literal::Int(int))
            if *int as f64 == *float =>
        {
            Some(Type::literal_float(*float))
        }
        (Literal::Boolean(_), Literal::Boolean(_)) => Some(Type::Boolean),
        // Neighbouring integers become a range; anything wider would admit
        // values neither literal has.
        (Literal::Int(a), Literal::Int(b)) if a.abs_diff(*b) == 1 => Some(Type::int(
            NumberRange::between((*a).min(*b) as f64, (*a).max(*b) as f64),
        )),
        _ => None,
    }
}

/// Widen a non-literal type to also hold `literal`.
fn combine_literal(ty: &Type, literal: &Literal) -> Option<Type> {
    match (ty, literal) {
        (Type::Boolean, Literal::Boolean(_)) | (Type::Regex, Literal::Regex(_)) => {
            Some(ty.clone())
        }
        (Type::Int(range), Literal::Int(value)) => {
            Some(Type::int(range.hull(&NumberRange::exactly(*value as f64))))
        }
        (Type::Int(range) | Type::Float(range), Literal::Int(_) | Literal::Float(_)) => {
            let value = literal.as_f64()?;
            Some(Type::float(range.hull(&NumberRange::exactly(value))))
        }
        (Type::String(narrowed), Literal::String(value)) => Some(Type::string(StringType {
            length: narrowed
                .length
                .hull(&LengthRange::exactly(value.chars().count())),
            regexes: if narrowed.regexes.iter().all(|re| re.is_match(value)) {
                narrowed.regexes.clone()
            } else {
                Vec::new()
            },
        })),
        _ => None,
    }
}

/// Same props in the same order, each assignable one way or the other; the
/// broader prop type is kept.
fn merge_objects(a: &ObjectType, b: &ObjectType) -> Option<Type> {
    if a.props.len() != b.props.len() {
        return None;
    }
    let mut props = Vec::with_capacity(a.props.len());
    for (left, right) in a.props.iter().zip(&b.props) {
        if left.name != right.name {
            return None;
        }
        let ty = if can_be_assigned_to(&left.ty, &right.ty) {
            right.ty.clone()
        } else if can_be_assigned_to(&right.ty, &left.ty) {
            left.ty.clone()
        } else {
            return None;
        };
        props.push(ObjectProp {
            name: left.name.clone(),
            ty,
        });
    }
    let name = if a.name == b.name { a.name.clone() } else { None };
    Some(Type::Object(ObjectType { name, props }))
}

/// The nearest class both inherit from.
fn common_ancestor(a: &Arc<ClassType>, b: &Arc<ClassType>) -> Option<Arc<ClassType>> {
    let mut candidate = Some(a);
    while let Some(class) = candidate {
        if b.is_or_extends(class) {
            return Some(Arc::clone(class));
        }
        candidate = class.parent.as_ref();
    }
    None
}

/// Argument-by-argument merge of two non-generic formulas with the same
/// shape. Differently named positional arguments get a combined name.
fn merge_formulas(a: &FormulaType, b: &FormulaType) -> Option<Type> {
    if !a.generics.is_empty() || !b.generics.is_empty() || a.args.len() != b.args.len() {
        return None;
    }
    let mut args = Vec::with_capacity(a.args.len());
    for (left, right) in a.args.iter().zip(&b.args) {
        if left.kind != right.kind {
            return None;
        }
        let name = if left.name == right.name {
            left.name.clone()
        } else if left.kind == crate::FormulaArgKind::Positional {
            format!("{}{}", left.name, capitalize(&right.name))
        } else {
            return None;
        };
        // The merged formula may only promise what both accept.
        let ty = if can_be_assigned_to(&left.ty, &right.ty) {
            left.ty.clone()
        } else if can_be_assigned_to(&right.ty, &left.ty) {
            right.ty.clone()
        } else {
            return None;
        };
        args.push(FormulaArgType {
            kind: left.kind,
            name,
            ty,
            required: left.required || right.required,
        });
    }
    Some(Type::formula(FormulaType::new(
        args,
        join(&a.returns, &b.returns),
    )))
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests;
