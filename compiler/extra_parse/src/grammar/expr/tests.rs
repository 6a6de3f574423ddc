#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::{parse_expression, ParseError};
use extra_diagnostic::ErrorCode;
use extra_ir::{
    ArgumentKind, BlockKind, Entry, EntryKey, Expr, ExprKind, FormulaArgKind, FunctionKind,
    Operator, Pattern, SwitchKeyword,
};
use pretty_assertions::assert_eq;

fn parse(source: &str) -> Expr {
    parse_expression(source).unwrap_or_else(|error| panic!("{source:?}: {error:?}"))
}

fn lisp(source: &str) -> String {
    parse(source).to_lisp()
}

fn error(source: &str) -> ParseError {
    match parse_expression(source) {
        Ok(expr) => panic!("{source:?} parsed as {}", expr.to_lisp()),
        Err(error) => error,
    }
}

fn entries(expr: &Expr) -> &[Entry] {
    match &expr.kind {
        ExprKind::Array(container)
        | ExprKind::Set(container)
        | ExprKind::Dict(container)
        | ExprKind::Object(container) => &container.entries,
        other => panic!("not a container: {other:?}"),
    }
}

// Operators

#[test]
fn test_precedence() {
    assert_eq!(
        lisp("-2.2**(2 * 1)**2 * 3 >= 6 * (5 + 1)"),
        "(>= (* (- (** 2.2 (** (* 2 1) 2))) 3) (* 6 (+ 5 1)))"
    );
    assert_eq!(lisp("1 + 2 * 3"), "(+ 1 (* 2 3))");
    assert_eq!(lisp("a or b and c"), "(or a (and b c))");
    assert_eq!(lisp("a ?? b |> # + 1"), "(|> (?? a b) (+ # 1))");
    assert_eq!(lisp("a ++ b == c"), "(== (++ a b) c)");
    assert_eq!(lisp("1 <.< x & 3"), "(& (<.< 1 x) 3)");
}

#[test]
fn test_associativity() {
    assert_eq!(lisp("1 - 2 - 3"), "(- (- 1 2) 3)");
    assert_eq!(lisp("2 ** 3 ** 2"), "(** 2 (** 3 2))");
    assert_eq!(lisp("a ?? b ?? c"), "(?? (?? a b) c)");
}

#[test]
fn test_prefix_operators() {
    assert_eq!(lisp("-x"), "(- x)");
    assert_eq!(lisp("not a and b"), "(and (not a) b)");
    assert_eq!(lisp("!done or ok"), "(or (not done) ok)");
    assert_eq!(lisp("~mask"), "(~ mask)");
    assert_eq!(lisp("$count"), "($ count)");
}

#[test]
fn test_negative_literals_fold() {
    let expr = parse("-2 * 3");
    assert_eq!(expr.to_lisp(), "(* -2 3)");
    let ExprKind::Operation(operation) = &expr.kind else {
        panic!("expected an operation");
    };
    assert!(matches!(operation.args[0].kind, ExprKind::Int(ref lit) if lit.value == -2));
    assert_eq!(operation.args[0].span().start, 0);

    assert_eq!(lisp("-1.5"), "-1.5");
    // Power binds tighter than negation, so the literal is not folded.
    assert_eq!(lisp("-2 ** 2"), "(- (** 2 2))");
}

#[test]
fn test_smallest_int_literal() {
    let expr = parse("-9223372036854775808");
    assert!(matches!(expr.kind, ExprKind::Int(ref lit) if lit.value == i64::MIN));
    assert_eq!(expr.span().start, 0);
    assert_eq!(expr.span().end, 20);
    assert_eq!(lisp("[1, -9223372036854775808]"), "[1, -9223372036854775808]");
    assert_eq!(lisp("- -9223372036854775808"), "(- -9223372036854775808)");

    for source in [
        "9223372036854775808",
        "-9223372036854775808 ** 2",
        "-9223372036854775808.abs",
        "-9223372036854775809",
    ] {
        assert_eq!(error(source).code, ErrorCode::E1006, "{source:?}");
    }
}

#[test]
fn test_is_takes_a_type() {
    assert_eq!(lisp("x is Int"), "(is x Int)");
    assert_eq!(lisp("x !is String | Int"), "(!is x String | Int)");
    let expr = parse("x is Int(>=0)");
    let ExprKind::Operation(operation) = &expr.kind else {
        panic!("expected an operation");
    };
    assert!(matches!(operation.args[1].kind, ExprKind::Type(_)));
}

#[test]
fn test_ranges() {
    assert_eq!(lisp("1...5"), "(... 1 5)");
    assert_eq!(lisp("0 ..< n"), "(..< 0 n)");
    assert_eq!(lisp("1.5 <.. 2"), "(<.. 1.5 2)");
}

#[test]
fn test_newlines_do_not_end_a_bare_expression() {
    assert_eq!(lisp("1\n+ 2"), "(+ 1 2)");
    assert_eq!(lisp("a\n  .b"), "(. a b)");
}

// Postfix

#[test]
fn test_property_access_and_calls() {
    assert_eq!(lisp("a.b.c(1)"), "(fn (. (. a b) c) (1))");
    assert_eq!(lisp("a?.b"), "(?. a b)");
    assert_eq!(lisp("f(1)(2)"), "(fn (fn f (1)) (2))");
    assert_eq!(lisp("(f)(x)"), "(fn f (x))");
    assert_eq!(lisp("a?.(1)"), "(?.fn a (1))");
    assert_eq!(lisp("-a.b"), "(- (. a b))");
}

#[test]
fn test_indexing() {
    assert_eq!(lisp("xs[0]"), "([] xs 0)");
    assert_eq!(lisp("xs?.[i + 1]"), "(?.[] xs (+ i 1))");
    assert_eq!(lisp("m[k].v"), "(. ([] m k) v)");
}

#[test]
fn test_call_and_index_must_touch() {
    // `[` after whitespace starts a new operand, which is not allowed here.
    assert_eq!(error("xs [0]").code, ErrorCode::E1001);
    assert_eq!(error("f (1)").code, ErrorCode::E1001);
}

#[test]
fn test_argument_kinds() {
    let expr = parse("f(1, x: 2, ...xs, ...names: ys, *opts)");
    let ExprKind::Operation(operation) = &expr.kind else {
        panic!("expected a call");
    };
    assert_eq!(operation.op, Operator::Call);
    let ExprKind::Arguments(list) = &operation.args[1].kind else {
        panic!("expected arguments");
    };
    assert_eq!(list.parens.len(), 5);
    assert!(matches!(list.parens[0].kind, ArgumentKind::Positional(_)));
    assert!(matches!(&list.parens[1].kind, ArgumentKind::Named { name, .. } if name.name == "x"));
    assert!(matches!(list.parens[2].kind, ArgumentKind::SpreadPositional(_)));
    assert!(
        matches!(&list.parens[3].kind, ArgumentKind::RepeatedNamed { name, .. } if name.name == "names")
    );
    assert!(matches!(list.parens[4].kind, ArgumentKind::KwargsList(_)));
    assert_eq!(list.block_kind, BlockKind::None);
}

#[test]
fn test_block_arguments() {
    let expr = parse("f(1) { 2, x: 3 }");
    let ExprKind::Operation(operation) = &expr.kind else {
        panic!("expected a call");
    };
    let ExprKind::Arguments(list) = &operation.args[1].kind else {
        panic!("expected arguments");
    };
    assert_eq!(list.block_kind, BlockKind::Braces);
    assert_eq!(list.parens.len(), 1);
    assert_eq!(list.block.len(), 2);

    let expr = parse("when(ready): go()");
    let ExprKind::Operation(operation) = &expr.kind else {
        panic!("expected a call");
    };
    let ExprKind::Arguments(list) = &operation.args[1].kind else {
        panic!("expected arguments");
    };
    assert_eq!(list.block_kind, BlockKind::Colon);
    assert_eq!(list.block.len(), 1);
}

#[test]
fn test_multiline_arguments() {
    assert_eq!(lisp("f(\n  1\n  x: 2\n)"), "(fn f (1 x: 2))");
}

// Pipes

#[test]
fn test_pipe_placeholder() {
    assert_eq!(lisp("x |> # * 2 |> # + 1"), "(|> (|> x (* # 2)) (+ # 1))");
    assert_eq!(lisp("x ?|> #.name"), "(?|> x (. # name))");
}

#[test]
fn test_placeholder_outside_pipe() {
    let err = error("# + 1");
    assert_eq!(err.code, ErrorCode::E1011);
    assert_eq!(err.span.start, 0);
    assert_eq!(error("f(#) |> #").code, ErrorCode::E1011);
}

// Literals

#[test]
fn test_literal_kinds() {
    assert!(matches!(parse("0x1F").kind, ExprKind::Int(ref lit) if lit.value == 31));
    assert!(matches!(parse("1_000").kind, ExprKind::Int(ref lit) if lit.value == 1000));
    assert!(matches!(parse("1e3").kind, ExprKind::Float(ref lit) if lit.value == 1000.0));
    assert!(matches!(parse("3d6").kind, ExprKind::Dice(ref dice) if dice.count == 3 && dice.sides == 6));
    assert!(matches!(parse("'it\\'s'").kind, ExprKind::Str(ref lit) if lit.value == "it's"));
    assert!(matches!(parse("/a+b/gi").kind, ExprKind::Regex(ref lit) if lit.flags == "gi"));
    assert!(matches!(parse("@count").kind, ExprKind::StateReference(ref name) if name == "count"));
    assert!(matches!(parse("null").kind, ExprKind::Null));
    assert!(matches!(parse("this").kind, ExprKind::This));
}

#[test]
fn test_templates() {
    let expr = parse("\"hi ${name.first}, you are $age\"");
    let ExprKind::Template(template) = &expr.kind else {
        panic!("expected a template");
    };
    assert_eq!(template.parts.len(), 4);
    assert!(matches!(parse("'no $interpolation'").kind, ExprKind::Str(_)));
}

// Containers

#[test]
fn test_newline_separated_items() {
    let expr = parse("[ 1\n  2\n  -x\n]");
    let items = entries(&expr);
    assert_eq!(items.len(), 3);
    assert_eq!(items[2].value().to_lisp(), "(- x)");
}

#[test]
fn test_leading_operators_continue_an_item() {
    let expr = parse("[ 1\n  + 2\n  |> # + 3\n  - 3\n]");
    let items = entries(&expr);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].value().to_lisp(), "(|> (+ 1 2) (- (+ # 3) 3))");
}

#[test]
fn test_container_entries() {
    let expr = parse("[1, ...rest, 2 if ok]");
    let items = entries(&expr);
    assert!(matches!(items[0], Entry::Value(_)));
    assert!(matches!(items[1], Entry::Spread { .. }));
    assert!(matches!(items[2], Entry::Inclusion { .. }));

    let expr = parse("#[1, 2]");
    assert!(matches!(expr.kind, ExprKind::Set(_)));
    assert_eq!(entries(&expr).len(), 2);
}

#[test]
fn test_keyed_entries() {
    let expr = parse("#{a: 1, 'b': 2, [k]: 3, 4: 5}");
    let keys: Vec<_> = entries(&expr)
        .iter()
        .map(|entry| match entry {
            Entry::Pair { key, .. } => match key {
                EntryKey::Name(_) => "name",
                EntryKey::Literal(_) => "literal",
                EntryKey::Computed(_) => "computed",
            },
            _ => "other",
        })
        .collect();
    assert_eq!(keys, ["name", "literal", "computed", "literal"]);

    let expr = parse("{name: 'x', ...defaults, extra if verbose}");
    let items = entries(&expr);
    assert!(matches!(items[0], Entry::Pair { .. }));
    assert!(matches!(items[1], Entry::Spread { .. }));
    assert!(matches!(items[2], Entry::Inclusion { .. }));
}

#[test]
fn test_dict_requires_keys() {
    assert_eq!(error("#{1}").code, ErrorCode::E1001);
    assert_eq!(error("{a + b: 1}").code, ErrorCode::E1001);
    // `f(x): 1` is a call with a block argument, not a key.
    assert_eq!(lisp("{f(x): 1}"), lisp("{f(x) { 1 }}"));
}

#[test]
fn test_multiplication_continues_list_items() {
    assert_eq!(lisp("[\n  a\n  *x\n]"), lisp("[a * x]"));
    assert_eq!(lisp("[\n  a\n  ...xs\n]"), lisp("[a, ...xs]"));
}

// Control flow

#[test]
fn test_let() {
    let expr = parse("let a = 1, b: Int = 2 in a + b");
    let ExprKind::Let(let_expr) = &expr.kind else {
        panic!("expected let");
    };
    assert_eq!(let_expr.bindings.len(), 2);
    assert!(let_expr.bindings[1].type_annotation.is_some());
    assert_eq!(let_expr.body.to_lisp(), "(+ a b)");

    let expr = parse("let\n  a = 1\n  b = a * 2\nin b");
    let ExprKind::Let(let_expr) = &expr.kind else {
        panic!("expected let");
    };
    assert_eq!(let_expr.bindings.len(), 2);
    assert_eq!(let_expr.bindings[1].value.to_lisp(), "(* a 2)");
}

#[test]
fn test_if() {
    let expr = parse("if a then 1 elseif b then 2 else 3");
    let ExprKind::If(if_expr) = &expr.kind else {
        panic!("expected if");
    };
    assert_eq!(if_expr.branches.len(), 2);
    assert!(if_expr.else_body.is_some());

    let expr = parse("if a > 1 then a - 1");
    let ExprKind::If(if_expr) = &expr.kind else {
        panic!("expected if");
    };
    assert_eq!(if_expr.branches[0].condition.to_lisp(), "(> a 1)");
    assert_eq!(if_expr.branches[0].body.to_lisp(), "(- a 1)");
    assert!(if_expr.else_body.is_none());

    assert_eq!(error("if a 1").code, ErrorCode::E1001);
}

#[test]
fn test_switch() {
    let expr = parse("switch (x) {\n  case 1: 'one'\n  case Int as n: n\n  case y: y\n  case _: 'other'\n}");
    let ExprKind::Switch(switch) = &expr.kind else {
        panic!("expected switch");
    };
    assert_eq!(switch.keyword, SwitchKeyword::Switch);
    assert_eq!(switch.cases.len(), 4);
    assert!(matches!(switch.cases[0].pattern, Pattern::Value(_)));
    assert!(matches!(&switch.cases[1].pattern, Pattern::Type { binding: Some(name), .. } if name.name == "n"));
    assert!(matches!(switch.cases[2].pattern, Pattern::Binding(_)));
    assert!(matches!(switch.cases[3].pattern, Pattern::Wildcard(_)));
    assert!(switch.else_body.is_none());

    let expr = parse("match (x) { case String: 1, else: 2 }");
    let ExprKind::Switch(switch) = &expr.kind else {
        panic!("expected match");
    };
    assert_eq!(switch.keyword, SwitchKeyword::Match);
    assert!(matches!(switch.cases[0].pattern, Pattern::Type { binding: None, .. }));
    assert!(switch.else_body.is_some());
}

#[test]
fn test_switch_errors() {
    assert_eq!(error("switch (x) { else: 1, case 1: 2 }").code, ErrorCode::E1001);
    assert_eq!(error("switch (x) { }").code, ErrorCode::E1001);
    assert_eq!(error("switch (x) { when 1: 2 }").code, ErrorCode::E1014);
}

// Functions

#[test]
fn test_function_literal() {
    let expr = parse("fn<T>(#a: T, b = 2, ...#rest, ...opts: Int, *kwargs): T => a");
    let ExprKind::Function(function) = &expr.kind else {
        panic!("expected a function");
    };
    assert_eq!(function.kind, FunctionKind::Anonymous);
    assert_eq!(function.generics.len(), 1);
    let kinds: Vec<_> = function.args.iter().map(|arg| arg.kind).collect();
    assert_eq!(
        kinds,
        [
            FormulaArgKind::Positional,
            FormulaArgKind::Named,
            FormulaArgKind::SpreadPositional,
            FormulaArgKind::RepeatedNamed,
            FormulaArgKind::Kwargs,
        ]
    );
    assert!(function.args[1].default.is_some());
    assert!(function.return_type.is_some());
}

#[test]
fn test_function_body_extends_to_the_end() {
    assert_eq!(lisp("xs.map(fn(#x) => x * 2)"), "(fn (. xs map) (fn(#x) => x * 2))");
}

#[test]
fn test_empty_generics() {
    assert_eq!(error("fn<>(#a: Int): Int => a").code, ErrorCode::E1004);
}
