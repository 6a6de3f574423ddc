#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::{ClassProp, ClassType, EnumMemberType, FormulaArgType, NamedType};
use extra_parse::parse_expression;
use pretty_assertions::assert_eq;

fn user() -> Arc<ClassType> {
    Arc::new(ClassType::new(
        "User",
        None,
        vec![ClassProp::new("name", Type::STRING)],
        Vec::new(),
        false,
    ))
}

fn color() -> Arc<EnumType> {
    Arc::new(EnumType {
        name: "Color".to_string(),
        members: vec![
            EnumMemberType {
                name: "red".to_string(),
                args: Vec::new(),
            },
            EnumMemberType {
                name: "gray".to_string(),
                args: vec![FormulaArgType::positional("level", Type::INT)],
            },
        ],
    })
}

fn scope() -> TypeScope {
    let mut scope = TypeScope::new();
    scope.bind_local("x", Type::INT);
    scope.bind_state("count", Type::INT);
    scope.bind_action(
        "reset",
        Type::formula(FormulaType::new(Vec::new(), Type::Null)),
    );
    scope.bind_type("User", NamedType::new(Type::Class(user())));
    scope
}

fn parse(source: &str) -> Expr {
    parse_expression(source).unwrap_or_else(|error| panic!("{source}: {error:?}"))
}

fn infer_ok(source: &str) -> Type {
    get_type(&parse(source), &scope()).unwrap_or_else(|error| panic!("{source}: {error:?}"))
}

fn infer_err(source: &str) -> TypeError {
    get_type(&parse(source), &scope()).unwrap_err()
}

#[test]
fn test_literals() {
    assert_eq!(infer_ok("null"), Type::Null);
    assert_eq!(infer_ok("true"), Type::literal_bool(true));
    assert_eq!(infer_ok("42"), Type::literal_int(42));
    assert_eq!(infer_ok("1.5"), Type::literal_float(1.5));
    assert_eq!(infer_ok("'hi'"), Type::literal_string("hi"));
    assert_eq!(
        infer_ok("/a+/i"),
        Type::Literal(Literal::Regex(RegexPattern::new("a+", "i")))
    );
    assert_eq!(
        infer_ok("3d6"),
        Type::int(NumberRange::between(3.0, 18.0))
    );
}

#[test]
fn test_templates() {
    assert_eq!(infer_ok("\"n = ${1 + 1}\""), Type::literal_string("n = 2"));
    assert_eq!(infer_ok("\"n = ${x}\""), Type::STRING);
}

#[test]
fn test_references() {
    assert_eq!(infer_ok("x"), Type::INT);
    assert_eq!(infer_ok("@count"), Type::INT);
    assert_eq!(
        infer_ok("reset"),
        Type::formula(FormulaType::new(Vec::new(), Type::Null))
    );

    let error = infer_err("nope");
    assert_eq!(error.code, ErrorCode::E2003);
    assert_eq!(error.message(), "Cannot find 'nope'");
    assert!(error.span.is_some());

    let error = infer_err("@missing");
    assert_eq!(error.code, ErrorCode::E2009);
    assert_eq!(error.message(), messages::unknown_state("missing"));
}

#[test]
fn test_class_name_is_its_constructor() {
    assert_eq!(infer_ok("User"), Type::formula(user().constructor()));
}

#[test]
fn test_this() {
    assert_eq!(infer_err("this").code, ErrorCode::E2003);

    let mut scope = scope();
    scope.set_this(Type::Class(user()));
    assert_eq!(get_type(&parse("this"), &scope).unwrap(), Type::Class(user()));
    assert_eq!(get_type(&parse("this.name"), &scope).unwrap(), Type::STRING);
}

#[test]
fn test_enum_shorthand_needs_expected_enum() {
    let expected = Type::Enum(color());
    let scope = scope();
    assert_eq!(
        infer(&parse(".red"), &scope, Some(&expected)).unwrap(),
        Type::Enum(color())
    );
    assert_eq!(
        infer(&parse(".gray"), &scope, Some(&Type::optional(expected.clone()))).unwrap(),
        Type::formula(FormulaType::new(
            vec![FormulaArgType::positional("level", Type::INT)],
            Type::Enum(color()),
        ))
    );
    assert_eq!(infer_err(".red").code, ErrorCode::E2005);
    assert_eq!(
        infer(&parse(".blue"), &scope, Some(&expected))
            .unwrap_err()
            .code,
        ErrorCode::E2005
    );
}

#[test]
fn test_binding_of() {
    assert_eq!(binding_of(&parse("x")), Some(Binding::Local("x".to_string())));
    assert_eq!(
        binding_of(&parse("@count")),
        Some(Binding::State("count".to_string()))
    );
    assert_eq!(binding_of(&parse("x + 1")), None);
}
