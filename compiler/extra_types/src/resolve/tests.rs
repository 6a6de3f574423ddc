#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use extra_parse::parse_type;
use pretty_assertions::assert_eq;

fn resolve_in(source: &str, scope: &TypeScope) -> Result<Type, TypeError> {
    let expr = parse_type(source).unwrap_or_else(|error| panic!("{error:?}"));
    resolve_type_expr(&expr, scope)
}

fn resolve(source: &str) -> Type {
    resolve_in(source, &TypeScope::new()).unwrap_or_else(|error| panic!("{error:?}"))
}

#[test]
fn test_numbers() {
    assert_eq!(resolve("Int"), Type::INT);
    assert_eq!(resolve("Int(>=0)"), Type::int(NumberRange::at_least(0.0)));
    assert_eq!(resolve("Int(1...10)"), Type::int(NumberRange::between(1.0, 10.0)));
    assert_eq!(resolve("Int(0..<5)"), Type::int(NumberRange::between(0.0, 4.0)));
    assert_eq!(
        resolve("Int(>=0, <=9)"),
        Type::int(NumberRange::between(0.0, 9.0))
    );
    assert_eq!(resolve("Float(>=0)"), Type::float(NumberRange::at_least(0.0)));
}

#[test]
fn test_literals_and_unions() {
    assert_eq!(resolve("1"), Type::literal_int(1));
    assert_eq!(resolve("'a'"), Type::literal_string("a"));
    assert_eq!(resolve("null"), Type::Null);
    assert_eq!(resolve("String?"), Type::optional(Type::STRING));
    assert_eq!(
        resolve("Int | String"),
        Type::one_of(vec![Type::INT, Type::STRING])
    );
}

#[test]
fn test_strings() {
    assert_eq!(
        resolve("String(length: >=1)"),
        Type::string(StringType {
            length: LengthRange::at_least(1),
            regexes: Vec::new(),
        })
    );
    assert_eq!(
        resolve("String(/^a/)"),
        Type::string(StringType {
            length: LengthRange::ANY,
            regexes: vec![RegexPattern::new("^a", "")],
        })
    );
}

#[test]
fn test_containers() {
    assert_eq!(
        resolve("Array(Int, length: >=1)"),
        Type::array_with_length(Type::INT, LengthRange::at_least(1))
    );
    assert_eq!(resolve("Set(String)"), Type::set(Type::STRING));
    assert_eq!(
        resolve("Dict(Int, keys: ['a', 'b'])"),
        Type::dict_with(
            Type::INT,
            LengthRange::ANY,
            ["a".to_string(), "b".to_string()].into_iter().collect()
        )
    );
    assert_eq!(resolve("Range(Float)"), Type::range(Type::FLOAT));
    assert_eq!(
        resolve("{name: String, Int}"),
        Type::object(vec![
            ObjectProp::named("name", Type::STRING),
            ObjectProp::positional(Type::INT),
        ])
    );
}

#[test]
fn test_formulas_bind_their_generics() {
    let Type::Formula(formula) = resolve("fn<T>(#a: T, b: Int = 1): T") else {
        panic!("expected a formula");
    };
    assert_eq!(formula.generics.len(), 1);
    let t = Type::Generic(formula.generics[0].clone());
    assert_eq!(formula.args[0], FormulaArgType::positional("a", t.clone()));
    assert_eq!(formula.args[1], FormulaArgType::named("b", Type::INT).optional());
    assert_eq!(formula.returns, t);
}

#[test]
fn test_named_types() {
    let t = GenericType::fresh("T");
    let mut scope = TypeScope::new();
    scope.bind_type(
        "Box",
        NamedType {
            generics: vec![t.clone()],
            ty: Type::object(vec![ObjectProp::named("value", Type::Generic(t))]),
        },
    );
    assert_eq!(
        resolve_in("Box(Int)", &scope).unwrap(),
        Type::object(vec![ObjectProp::named("value", Type::INT)])
    );
    assert_eq!(
        resolve_in("Box(Int, String)", &scope).unwrap_err().code,
        ErrorCode::E2010
    );
}

#[test]
fn test_errors() {
    let scope = TypeScope::new();
    let error = resolve_in("Missing", &scope).unwrap_err();
    assert_eq!(error.code, ErrorCode::E2002);
    assert_eq!(error.message(), messages::unknown_type("Missing"));
    assert!(error.span.is_some());

    assert_eq!(resolve_in("Boolean(1)", &scope).unwrap_err().code, ErrorCode::E2010);
    assert_eq!(resolve_in("Range(String)", &scope).unwrap_err().code, ErrorCode::E2010);
    assert_eq!(resolve_in("Array(length: 1)", &scope).unwrap_err().code, ErrorCode::E2010);
}
