//! Message texts, shared so tests and callers word things the same way.

use crate::Type;

pub fn cannot_assign(test: &Type, assign_to: &Type) -> String {
    format!("Cannot assign {test} to {assign_to}")
}

pub fn cannot_assign_to_positional_argument(
    index: usize,
    name: &str,
    test: &Type,
    expected: &Type,
) -> String {
    format!("Cannot assign {test} to argument #{} '{name}' of type {expected}", index + 1)
}

pub fn cannot_assign_to_named_argument(name: &str, test: &Type, expected: &Type) -> String {
    format!("Cannot assign {test} to argument '{name}' of type {expected}")
}

pub fn out_of_arguments(index: usize, name: &str, expected: &Type) -> String {
    format!("Expected argument #{} '{name}' of type {expected}", index + 1)
}

pub fn missing_named_argument(name: &str, expected: &Type) -> String {
    format!("Missing argument '{name}: {expected}'")
}

pub fn multiple_named_arguments(name: &str) -> String {
    format!("Multiple arguments named '{name}'")
}

pub fn unexpected_named_argument(name: &str) -> String {
    format!("No argument named '{name}'")
}

pub fn too_many_arguments(expected: usize, found: usize) -> String {
    format!("Too many arguments: expected {expected}, found {found}")
}

pub fn generic_requirement(name: &str, resolved: &Type, requirement: &Type) -> String {
    format!("Generic {name} resolved to {resolved}, which cannot be assigned to {requirement}")
}

pub fn unknown_reference(name: &str) -> String {
    format!("Cannot find '{name}'")
}

pub fn unknown_state(name: &str) -> String {
    format!("Cannot find state '@{name}'")
}

pub fn unknown_type(name: &str) -> String {
    format!("Unknown type '{name}'")
}

pub fn unknown_property(ty: &Type, name: &str) -> String {
    format!("{ty} has no property '{name}'")
}

pub fn not_callable(ty: &Type) -> String {
    format!("{ty} is not callable")
}

pub fn invalid_operands(op: &str, lhs: &Type, rhs: &Type) -> String {
    format!("Cannot apply '{op}' to {lhs} and {rhs}")
}

pub fn invalid_operand(op: &str, ty: &Type) -> String {
    format!("Cannot apply '{op}' to {ty}")
}

pub fn kwargs_not_accepted(ty: &Type) -> String {
    format!("Cannot spread {ty} into named arguments")
}

pub fn duplicate_definition(name: &str) -> String {
    format!("'{name}' is already defined")
}

pub fn cyclic_class(name: &str) -> String {
    format!("Class '{name}' extends itself")
}

pub fn cannot_extend(name: &str, parent: &Type) -> String {
    format!("Class '{name}' cannot extend {parent}")
}
