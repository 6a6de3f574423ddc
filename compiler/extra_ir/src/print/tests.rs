#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::ast::{
    Argument, ArgumentKind, ArgumentsList, BlockKind, Container, Entry, Expr, ExprKind,
    FloatLiteral, IfBranch, IfExpr, IntBase, IntLiteral, Operator, Quote, StringLiteral,
    TypeArg, TypeExpr, TypeExprKind,
};
use crate::{Comment, Source, Span};
use pretty_assertions::assert_eq;

fn int(value: i64) -> Expr {
    Expr::new(
        ExprKind::Int(IntLiteral {
            value,
            base: IntBase::Decimal,
        }),
        Source::default(),
    )
}

fn float(raw: &str) -> Expr {
    let value = raw.parse().unwrap();
    Expr::new(ExprKind::Float(FloatLiteral::new(value, raw)), Source::default())
}

fn reference(name: &str) -> Expr {
    Expr::new(ExprKind::Reference(name.to_string()), Source::default())
}

fn binary(op: Operator, left: Expr, right: Expr) -> Expr {
    Expr::operation(op, vec![left, right], 0)
}

fn prefix(op: Operator, arg: Expr) -> Expr {
    Expr::operation(op, vec![arg], 0)
}

fn call(callee: Expr, args: Vec<Expr>) -> Expr {
    let list = ArgumentsList {
        parens: args
            .into_iter()
            .map(|value| Argument {
                source: Source::default(),
                kind: ArgumentKind::Positional(value),
            })
            .collect(),
        ..ArgumentsList::default()
    };
    let args = Expr::new(ExprKind::Arguments(Box::new(list)), Source::default());
    binary(Operator::Call, callee, args)
}

#[test]
fn precedence_lisp_form() {
    // -2.2**(2 * 1)**2 * 3 >= 6 * (5 + 1)
    let power = binary(
        Operator::Power,
        float("2.2"),
        binary(
            Operator::Power,
            binary(Operator::Multiply, int(2), int(1)),
            int(2),
        ),
    );
    let left = binary(Operator::Multiply, prefix(Operator::Negate, power), int(3));
    let right = binary(
        Operator::Multiply,
        int(6),
        binary(Operator::Add, int(5), int(1)),
    );
    let expr = binary(Operator::GreaterEqual, left, right);
    assert_eq!(
        expr.to_lisp(),
        "(>= (* (- (** 2.2 (** (* 2 1) 2))) 3) (* 6 (+ 5 1)))"
    );
    assert_eq!(expr.to_code(), "-2.2 ** (2 * 1) ** 2 * 3 >= 6 * (5 + 1)");
}

#[test]
fn parenthesizes_by_associativity() {
    let left_nested = binary(
        Operator::Subtract,
        binary(Operator::Subtract, int(1), int(2)),
        int(3),
    );
    assert_eq!(left_nested.to_code(), "1 - 2 - 3");

    let right_nested = binary(
        Operator::Subtract,
        int(1),
        binary(Operator::Subtract, int(2), int(3)),
    );
    assert_eq!(right_nested.to_code(), "1 - (2 - 3)");

    let power = binary(
        Operator::Power,
        binary(Operator::Power, int(2), int(3)),
        int(4),
    );
    assert_eq!(power.to_code(), "(2 ** 3) ** 4");
}

#[test]
fn negative_literal_receivers_are_wrapped() {
    let expr = binary(Operator::Power, int(-2), int(2));
    assert_eq!(expr.to_code(), "(-2) ** 2");

    let access = binary(
        Operator::PropertyAccess,
        int(1),
        Expr::new(ExprKind::PropertyName("abs".into()), Source::default()),
    );
    assert_eq!(access.to_code(), "(1).abs");
    assert_eq!(access.to_lisp(), "(. 1 abs)");
}

#[test]
fn double_negation_keeps_a_space() {
    let expr = prefix(Operator::Negate, prefix(Operator::Negate, reference("x")));
    assert_eq!(expr.to_code(), "- -x");
    assert_eq!(expr.to_lisp(), "(- (- x))");
}

#[test]
fn calls_print_fn_in_lisp() {
    let expr = call(reference("max"), vec![int(1), reference("x")]);
    assert_eq!(expr.to_code(), "max(1, x)");
    assert_eq!(expr.to_lisp(), "(fn max (1 x))");
}

#[test]
fn block_arguments_follow_parens() {
    let mut expr = call(reference("f"), vec![int(1)]);
    if let ExprKind::Operation(operation) = &mut expr.kind {
        if let ExprKind::Arguments(list) = &mut operation.args[1].kind {
            list.block_kind = BlockKind::Braces;
            list.block.push(Argument {
                source: Source::default(),
                kind: ArgumentKind::Positional(int(2)),
            });
        }
    }
    assert_eq!(expr.to_code(), "f(1) { 2 }");
}

#[test]
fn open_ended_operands_are_wrapped() {
    let if_expr = Expr::new(
        ExprKind::If(Box::new(IfExpr {
            branches: vec![IfBranch {
                condition: reference("a"),
                body: int(1),
            }],
            else_body: Some(int(2)),
        })),
        Source::default(),
    );
    let expr = binary(Operator::Add, binary(Operator::Multiply, int(3), if_expr), int(1));
    assert_eq!(expr.to_code(), "3 * (if a then 1 else 2) + 1");
}

#[test]
fn line_comment_on_left_operand_stays_on_its_line() {
    let mut left = reference("a");
    left.source.following_comments = vec![Comment::line(" note", Span::new(2, 9))];
    let expr = binary(Operator::RangeInclusive, left, int(5));
    assert_eq!(expr.to_code(), "(a -- note\n) ... 5");
    assert_eq!(expr.to_code_without_comments(), "a ... 5");
}

#[test]
fn block_comments_print_inline() {
    let mut value = int(1);
    value.source.preceding_comments = vec![Comment::block(" one ", Span::new(1, 10))];
    let array = Expr::new(
        ExprKind::Array(Container {
            entries: vec![Entry::Value(value), Entry::Value(int(2))],
            closing_comments: vec![Comment::line(" end", Span::new(15, 21))],
        }),
        Source::default(),
    );
    assert_eq!(array.to_code(), "[{- one -} 1, 2 -- end\n]");
}

#[test]
fn objects_never_open_a_block_comment() {
    let object = Expr::new(
        ExprKind::Object(Container {
            entries: vec![Entry::Value(int(-1))],
            closing_comments: Vec::new(),
        }),
        Source::default(),
    );
    assert_eq!(object.to_code(), "{ -1}");
}

#[test]
fn strings_escape_for_their_quote() {
    let single = Expr::new(
        ExprKind::Str(StringLiteral {
            value: "it's\n".into(),
            quote: Quote::Single,
        }),
        Source::default(),
    );
    assert_eq!(single.to_code(), r"'it\'s\n'");

    let double = Expr::new(
        ExprKind::Str(StringLiteral {
            value: "cost: $5".into(),
            quote: Quote::Double,
        }),
        Source::default(),
    );
    assert_eq!(double.to_code(), r#""cost: \$5""#);
}

#[test]
fn type_expressions() {
    let int_ty = TypeExpr::new(
        TypeExprKind::Named {
            name: "Int".into(),
            args: vec![TypeArg::Comparison {
                op: Operator::GreaterEqual,
                value: int(0),
            }],
        },
        Source::default(),
    );
    let one_of = TypeExpr::new(
        TypeExprKind::OneOf(vec![int_ty, TypeExpr::named("String", Source::default())]),
        Source::default(),
    );
    let optional = TypeExpr::new(TypeExprKind::Optional(Box::new(one_of)), Source::default());
    assert_eq!(optional.to_code(), "(Int(>=0) | String)?");
}
