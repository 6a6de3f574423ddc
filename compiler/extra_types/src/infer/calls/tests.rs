#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::rc::Rc;
use std::sync::Arc;

use super::*;
use crate::{
    get_type, ClassProp, ClassType, GenericType, NamedType, NumberRange, Value, ViewRuntime,
};
use extra_parse::{parse_expression, parse_view};
use pretty_assertions::assert_eq;

fn panel() -> Arc<ClassType> {
    Arc::new(ClassType::new(
        "Panel",
        None,
        vec![ClassProp::new("title", Type::STRING)],
        Vec::new(),
        true,
    ))
}

fn scope() -> TypeScope {
    let mut scope = TypeScope::new();
    scope.bind_local("s", Type::STRING);
    scope.bind_local(
        "double",
        Type::formula(FormulaType::new(
            vec![FormulaArgType::positional("x", Type::INT)],
            Type::INT,
        )),
    );
    scope.bind_local(
        "maybe",
        Type::optional(Type::formula(FormulaType::new(
            vec![FormulaArgType::positional("x", Type::INT)],
            Type::INT,
        ))),
    );
    let t = GenericType::fresh("T");
    scope.bind_local(
        "id",
        Type::formula(
            FormulaType::new(
                vec![FormulaArgType::positional("a", Type::Generic(t.clone()))],
                Type::Generic(t.clone()),
            )
            .with_generics(vec![t]),
        ),
    );
    scope.bind_local(
        "Counter",
        Type::formula(FormulaType::new(
            vec![
                FormulaArgType::named("start", Type::INT),
                FormulaArgType::named("step", Type::INT).optional(),
            ],
            Type::View,
        )),
    );
    scope.bind_type("Panel", NamedType::new(Type::Class(panel())));
    scope
}

fn infer_ok(source: &str) -> Type {
    let expr = parse_expression(source).unwrap_or_else(|error| panic!("{error:?}"));
    get_type(&expr, &scope()).unwrap_or_else(|error| panic!("{source}: {error:?}"))
}

fn infer_err(source: &str) -> TypeError {
    let expr = parse_expression(source).unwrap_or_else(|error| panic!("{error:?}"));
    get_type(&expr, &scope()).unwrap_err()
}

fn view_in(source: &str, scope: &TypeScope) -> InferResult {
    let expr = parse_view(source).unwrap_or_else(|error| panic!("{error:?}"));
    get_type(&expr, scope)
}

// Functions

#[test]
fn test_function_signature() {
    assert_eq!(
        infer_ok("fn(#a: Int, b = 'x') => a"),
        Type::formula(FormulaType::new(
            vec![
                FormulaArgType::positional("a", Type::INT),
                FormulaArgType::named("b", Type::STRING).optional(),
            ],
            Type::INT,
        ))
    );
}

#[test]
fn test_function_declared_types_are_checked() {
    assert_eq!(infer_err("fn(#a: Int): String => a").code, ErrorCode::E2001);
    assert_eq!(infer_err("fn(b: Int = 'x') => b").code, ErrorCode::E2001);
}

#[test]
fn test_untyped_arguments_follow_expected_formula() {
    let expr = parse_expression("fn(#x) => x + 1").unwrap();
    let expected = Type::formula(FormulaType::new(
        vec![FormulaArgType::positional(
            "n",
            Type::int(NumberRange::between(0.0, 9.0)),
        )],
        Type::INT,
    ));
    assert_eq!(
        infer(&expr, &scope(), Some(&expected)).unwrap(),
        Type::formula(FormulaType::new(
            vec![FormulaArgType::positional(
                "x",
                Type::int(NumberRange::between(0.0, 9.0)),
            )],
            Type::int(NumberRange::between(1.0, 10.0)),
        ))
    );
    // Without a hint the argument is `always`.
    let Type::Formula(formula) = infer_ok("fn(#x) => x") else {
        panic!("expected a formula");
    };
    assert_eq!(formula.args[0].ty, Type::Always);
}

#[test]
fn test_widen_literal() {
    assert_eq!(widen_literal(Type::literal_int(1)), Type::INT);
    assert_eq!(widen_literal(Type::literal_bool(true)), Type::Boolean);
    assert_eq!(widen_literal(Type::Null), Type::Null);
}

// Calls

#[test]
fn test_calls() {
    assert_eq!(infer_ok("double(2)"), Type::INT);
    assert_eq!(infer_ok("id(1)"), Type::literal_int(1));
    assert_eq!(infer_ok("Panel(title: 'x')"), Type::Class(panel()));
}

#[test]
fn test_call_errors() {
    let error = infer_err("s(1)");
    assert_eq!(error.code, ErrorCode::E2008);
    assert_eq!(error.message(), messages::not_callable(&Type::STRING));
    assert_eq!(infer_err("double('a')").code, ErrorCode::E2004);
    assert_eq!(infer_err("Panel()").code, ErrorCode::E2004);
    assert_eq!(infer_err("nope(1)").code, ErrorCode::E2003);
}

#[test]
fn test_nullable_call() {
    assert_eq!(infer_ok("maybe?.(1)"), Type::optional(Type::INT));
    assert_eq!(infer_ok("double?.(1)"), Type::INT);
    assert_eq!(infer_err("maybe(1)").code, ErrorCode::E2008);
}

// Views

#[test]
fn test_lowercase_tags_are_unchecked_without_runtime() {
    let scope = scope();
    assert_eq!(
        view_in("<div class=\"a\" anything={1}>{s}</div>", &scope).unwrap(),
        Type::View
    );
    assert_eq!(
        view_in("<div>{nope}</div>", &scope).unwrap_err().code,
        ErrorCode::E2003
    );
}

#[test]
fn test_component_props() {
    let scope = scope();
    assert_eq!(view_in("<Counter start=1 />", &scope).unwrap(), Type::View);
    assert_eq!(view_in("<Panel title=\"x\" />", &scope).unwrap(), Type::View);
    assert_eq!(
        view_in("<Counter start=\"x\" />", &scope).unwrap_err().code,
        ErrorCode::E2004
    );
    assert_eq!(view_in("<Counter />", &scope).unwrap_err().code, ErrorCode::E2004);
    assert_eq!(view_in("<Missing />", &scope).unwrap_err().code, ErrorCode::E2003);
}

struct Html;

impl ViewRuntime for Html {
    fn has(&self, tag: &str) -> bool {
        tag == "p"
    }

    fn view_type(&self, tag: &str) -> Option<Type> {
        (tag == "p").then(|| {
            Type::formula(FormulaType::new(
                vec![FormulaArgType::named("class", Type::STRING).optional()],
                Type::View,
            ))
        })
    }

    fn view_value(&self, _tag: &str) -> Option<Value> {
        None
    }
}

#[test]
fn test_lowercase_tags_with_runtime() {
    let scope = scope().with_views(Rc::new(Html));
    assert_eq!(view_in("<p class=\"a\" />", &scope).unwrap(), Type::View);
    assert_eq!(view_in("<p class={1} />", &scope).unwrap_err().code, ErrorCode::E2004);
    assert_eq!(view_in("<q />", &scope).unwrap_err().code, ErrorCode::E2003);
}
