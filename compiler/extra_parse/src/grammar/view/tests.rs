#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::{parse_expression, parse_view};
use extra_diagnostic::ErrorCode;
use extra_ir::{Expr, ExprKind, ViewChild, ViewElement};
use pretty_assertions::assert_eq;

fn parse(source: &str) -> Expr {
    parse_view(source).unwrap_or_else(|error| panic!("{source:?}: {error:?}"))
}

fn element(expr: &Expr) -> &ViewElement {
    match &expr.kind {
        ExprKind::View(element) => element,
        other => panic!("not a view: {other:?}"),
    }
}

#[test]
fn test_element_with_props_and_children() {
    let expr = parse("<div class=\"a\" id={key}>hi {name}</div>");
    let view = element(&expr);
    assert_eq!(view.tag.as_deref(), Some("div"));
    let props: Vec<_> = view.props.iter().map(|prop| prop.name.name.as_str()).collect();
    assert_eq!(props, ["class", "id"]);
    let children = view.children.as_ref().unwrap();
    assert_eq!(children.len(), 2);
    assert!(matches!(&children[0], ViewChild::Text { text, .. } if text == "hi "));
    assert!(matches!(&children[1], ViewChild::Expr(expr) if expr.to_lisp() == "name"));
}

#[test]
fn test_self_closing_element() {
    let expr = parse("<Button onClick={go} disabled />");
    let view = element(&expr);
    assert!(view.children.is_none());
    assert_eq!(view.props.len(), 2);
    assert!(view.props[1].value.is_none());
}

#[test]
fn test_unquoted_prop_value() {
    let expr = parse("<Counter start=1 step=2 />");
    let view = element(&expr);
    let values: Vec<_> = view
        .props
        .iter()
        .map(|prop| prop.value.as_ref().unwrap().to_lisp())
        .collect();
    assert_eq!(values, ["1", "2"]);
}

#[test]
fn test_fragment_and_nesting() {
    let expr = parse("<><ul><li>a</li><li>{b}</li></ul></>");
    let fragment = element(&expr);
    assert_eq!(fragment.tag, None);
    let children = fragment.children.as_ref().unwrap();
    let [ViewChild::Element(list)] = children.as_slice() else {
        panic!("expected one child element");
    };
    let items = element(list).children.as_ref().unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|item| matches!(item, ViewChild::Element(_))));
}

#[test]
fn test_hyphenated_tags_and_props() {
    let expr = parse("<my-card data-id={1}></my-card>");
    let view = element(&expr);
    assert_eq!(view.tag.as_deref(), Some("my-card"));
    assert_eq!(view.props[0].name.name, "data-id");
}

#[test]
fn test_views_inside_expressions() {
    let expr = parse("if ok then <p>yes</p> else <p>no</p>");
    assert!(matches!(expr.kind, ExprKind::If(_)));
    assert_eq!(parse("a < b").to_lisp(), "(< a b)");
    assert_eq!(parse_expression("a < b").unwrap().to_lisp(), "(< a b)");
    // Outside a view context `<` cannot start an operand.
    assert!(parse_expression("<p />").is_err());
}

#[test]
fn test_comment_children() {
    let expr = parse("<p>{- note -}text</p>");
    let view = element(&expr);
    let children = view.children.as_ref().unwrap();
    assert!(matches!(&children[..], [ViewChild::Text { text, .. }] if text == "text"));
    let texts: Vec<_> = expr.comments().iter().map(|c| c.text.clone()).collect();
    assert_eq!(texts, [" note "]);
}

#[test]
fn test_mismatched_closing_tag() {
    let error = parse_view("<div></span>").unwrap_err();
    assert_eq!(error.code, ErrorCode::E1012);
}

#[test]
fn test_unclosed_element() {
    let error = parse_view("<div>text").unwrap_err();
    assert_eq!(error.code, ErrorCode::E1003);
    assert_eq!(error.span.start, 0);

    let error = parse_view("<div class={a}").unwrap_err();
    assert_eq!(error.code, ErrorCode::E1003);
}

#[test]
fn test_fragments_take_no_props() {
    assert_eq!(parse_view("< a>x</>").unwrap_err().code, ErrorCode::E1001);
}

#[test]
fn test_round_trip() {
    let expr = parse("<div class=\"a\">hi {name}<br /></div>");
    let code = expr.to_code();
    assert_eq!(code, "<div class={\"a\"}>hi {name}<br /></div>");
    assert_eq!(parse(&code).to_code(), code);
}
