//! Formula calls: matching call-site arguments against formula parameters.
//!
//! Both a real call and formula-to-formula assignability go through the
//! same matcher. Assigning `fn(#a: A): R` to `fn(#b: B): S` is checked by
//! "calling" the first with the parameters of the second.

use extra_diagnostic::ErrorCode;

use crate::error::messages;
use crate::{Assigner, FormulaArgKind, FormulaArgType, FormulaType, GenericResolution, Type, TypeError};

/// A call-site argument, already typed.
#[derive(Clone, Debug, PartialEq)]
pub enum ArgumentType {
    Positional(Type),
    Named(String, Type),
    /// `...values`
    SpreadPositional(Type),
    /// `...name: values`
    RepeatedNamed(String, Type),
    /// `*dict`
    Kwargs(Type),
}

/// Check `args` against `formula` and return the call's type.
///
/// Every mismatch is collected; several are reported as one `E2004`
/// error. Generics are resolved only once all arguments have been seen.
pub fn check_formula_arguments(
    formula: &FormulaType,
    args: &[ArgumentType],
    generics: &mut GenericResolution,
) -> Result<Type, TypeError> {
    let errors = {
        let mut assigner = Assigner::new(generics);
        match_arguments(&mut assigner, formula, args, false)
    };
    if !errors.is_empty() {
        return Err(TypeError::with_messages(ErrorCode::E2004, errors));
    }
    generics
        .resolve_all(&formula.generics)
        .map_err(|errors| TypeError::with_messages(ErrorCode::E2004, errors))?;
    Ok(generics.apply(&formula.returns))
}

/// `test` can stand in for `assign_to` if it accepts every argument list
/// `assign_to` accepts and returns something `assign_to` may return.
/// Trailing arguments the implementation does not declare are ignored.
pub(crate) fn formula_assignable(
    assigner: &mut Assigner<'_>,
    test: &FormulaType,
    assign_to: &FormulaType,
) -> bool {
    let args: Vec<ArgumentType> = assign_to.args.iter().map(parameter_as_argument).collect();
    let errors = match_arguments(assigner, test, &args, true);
    if !errors.is_empty() {
        return assigner.fail(|| crate::combine_error_messages(&errors));
    }
    let returns = assigner.generics.apply_hinted(&test.returns);
    assigner.assign(&returns, &assign_to.returns)
}

fn parameter_as_argument(param: &FormulaArgType) -> ArgumentType {
    let ty = param.ty.clone();
    match param.kind {
        FormulaArgKind::Positional => ArgumentType::Positional(ty),
        FormulaArgKind::Named => ArgumentType::Named(param.name.clone(), ty),
        FormulaArgKind::SpreadPositional => ArgumentType::SpreadPositional(ty),
        FormulaArgKind::RepeatedNamed => ArgumentType::RepeatedNamed(param.name.clone(), ty),
        FormulaArgKind::Kwargs => ArgumentType::Kwargs(ty),
    }
}

/// Call-site arguments grouped by kind, order preserved within a kind.
#[derive(Default)]
struct Grouped<'a> {
    positional: Vec<&'a Type>,
    spreads: Vec<&'a Type>,
    named: Vec<(&'a str, &'a Type)>,
    repeated: Vec<(&'a str, &'a Type)>,
    kwargs: Vec<&'a Type>,
}

impl<'a> Grouped<'a> {
    fn new(args: &'a [ArgumentType]) -> Self {
        let mut grouped = Grouped::default();
        for arg in args {
            match arg {
                ArgumentType::Positional(ty) => grouped.positional.push(ty),
                ArgumentType::SpreadPositional(ty) => grouped.spreads.push(ty),
                ArgumentType::Named(name, ty) => grouped.named.push((name.as_str(), ty)),
                ArgumentType::RepeatedNamed(name, ty) => grouped.repeated.push((name.as_str(), ty)),
                ArgumentType::Kwargs(ty) => grouped.kwargs.push(ty),
            }
        }
        grouped
    }
}

fn params_of_kind(formula: &FormulaType, kind: FormulaArgKind) -> Vec<&FormulaArgType> {
    formula.args.iter().filter(|arg| arg.kind == kind).collect()
}

/// Element type of a spread or repeated argument (`Array(T)` → `T`).
fn element_of(ty: &Type) -> Type {
    ty.element_type().unwrap_or_else(|| ty.clone())
}

fn match_arguments(
    assigner: &mut Assigner<'_>,
    formula: &FormulaType,
    args: &[ArgumentType],
    allow_extra: bool,
) -> Vec<String> {
    let mut errors = Vec::new();
    let mut grouped = Grouped::new(args);

    let positional_params = params_of_kind(formula, FormulaArgKind::Positional);
    let named_params = params_of_kind(formula, FormulaArgKind::Named);
    let repeated_params = params_of_kind(formula, FormulaArgKind::RepeatedNamed);
    let spread_param = formula.arg_of_kind(FormulaArgKind::SpreadPositional);
    let kwargs_param = formula.arg_of_kind(FormulaArgKind::Kwargs);

    // A formula with only named parameters takes positional arguments for
    // its not-yet-supplied names, in declaration order.
    if positional_params.is_empty() && spread_param.is_none() && !grouped.positional.is_empty() {
        let open: Vec<&FormulaArgType> = named_params
            .iter()
            .copied()
            .filter(|param| !grouped.named.iter().any(|(name, _)| *name == param.name))
            .collect();
        let take = open.len().min(grouped.positional.len());
        let moved: Vec<&Type> = grouped.positional.drain(..take).collect();
        for (param, ty) in open.into_iter().zip(moved) {
            grouped.named.push((param.name.as_str(), ty));
        }
    }

    for (index, param) in positional_params.iter().enumerate() {
        match grouped.positional.get(index) {
            Some(ty) => {
                if !assigner.assign(ty, &param.ty) {
                    errors.push(messages::cannot_assign_to_positional_argument(
                        index,
                        &param.name,
                        ty,
                        &param.ty,
                    ));
                }
            }
            // A spread may supply it; its elements must fit.
            None if !grouped.spreads.is_empty() => {
                for spread in &grouped.spreads {
                    let element = element_of(spread);
                    if !assigner.assign(&element, &param.ty) {
                        errors.push(messages::cannot_assign_to_positional_argument(
                            index,
                            &param.name,
                            &element,
                            &param.ty,
                        ));
                    }
                }
            }
            None if param.required => {
                errors.push(messages::out_of_arguments(index, &param.name, &param.ty));
            }
            None => {}
        }
    }

    let extra = grouped.positional.get(positional_params.len()..).unwrap_or(&[]);
    match spread_param {
        Some(param) => {
            let element = element_of(&param.ty);
            for (offset, ty) in extra.iter().enumerate() {
                if !assigner.assign(ty, &element) {
                    errors.push(messages::cannot_assign_to_positional_argument(
                        positional_params.len() + offset,
                        &param.name,
                        ty,
                        &element,
                    ));
                }
            }
            for spread in &grouped.spreads {
                let spread_element = element_of(spread);
                if !assigner.assign(&spread_element, &element) {
                    errors.push(messages::cannot_assign(&spread_element, &element));
                }
            }
        }
        None => {
            if !extra.is_empty() && !allow_extra {
                errors.push(messages::too_many_arguments(
                    positional_params.len(),
                    grouped.positional.len(),
                ));
            }
            if positional_params.is_empty() && !grouped.spreads.is_empty() && !allow_extra {
                errors.push(messages::too_many_arguments(0, grouped.spreads.len()));
            }
        }
    }

    for param in &named_params {
        let supplied: Vec<&Type> = grouped
            .named
            .iter()
            .filter(|(name, _)| *name == param.name)
            .map(|(_, ty)| *ty)
            .collect();
        match supplied.as_slice() {
            [] if !grouped.kwargs.is_empty() => {
                for kwargs in &grouped.kwargs {
                    let value = element_of(kwargs);
                    if !assigner.assign(&value, &param.ty) {
                        errors.push(messages::cannot_assign_to_named_argument(
                            &param.name,
                            &value,
                            &param.ty,
                        ));
                    }
                }
            }
            [] if param.required => {
                errors.push(messages::missing_named_argument(&param.name, &param.ty));
            }
            [] => {}
            [ty] => {
                if !assigner.assign(ty, &param.ty) {
                    errors.push(messages::cannot_assign_to_named_argument(
                        &param.name,
                        ty,
                        &param.ty,
                    ));
                }
            }
            _ => errors.push(messages::multiple_named_arguments(&param.name)),
        }
    }

    for param in &repeated_params {
        let element = element_of(&param.ty);
        for (name, ty) in &grouped.named {
            if *name == param.name && !assigner.assign(ty, &element) {
                errors.push(messages::cannot_assign_to_named_argument(name, ty, &element));
            }
        }
        for (name, ty) in &grouped.repeated {
            if *name == param.name && !assigner.assign(ty, &param.ty) {
                errors.push(messages::cannot_assign_to_named_argument(name, ty, &param.ty));
            }
        }
    }

    let is_declared = |name: &str| {
        named_params.iter().chain(&repeated_params).any(|param| param.name == name)
    };
    let leftovers = grouped
        .named
        .iter()
        .map(|(name, ty)| (*name, (*ty).clone()))
        .chain(grouped.repeated.iter().map(|(name, ty)| (*name, element_of(ty))))
        .filter(|(name, _)| !is_declared(*name));
    for (name, ty) in leftovers {
        match kwargs_param {
            Some(param) => {
                let value = element_of(&param.ty);
                if !assigner.assign(&ty, &value) {
                    errors.push(messages::cannot_assign_to_named_argument(name, &ty, &value));
                }
            }
            None if allow_extra => {}
            None => errors.push(messages::unexpected_named_argument(name)),
        }
    }

    for kwargs in &grouped.kwargs {
        match kwargs_param {
            Some(param) => {
                if !assigner.assign(kwargs, &param.ty) {
                    errors.push(messages::cannot_assign_to_named_argument(
                        &param.name,
                        kwargs,
                        &param.ty,
                    ));
                }
            }
            None if named_params.is_empty() && !allow_extra => {
                errors.push(messages::kwargs_not_accepted(kwargs));
            }
            None => {}
        }
    }

    errors
}
