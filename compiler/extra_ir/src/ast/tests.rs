#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::{Comment, Source, Span};
use pretty_assertions::assert_eq;

#[test]
fn binary_symbols_are_longest_first() {
    for (index, (symbol, _)) in BINARY_SYMBOLS.iter().enumerate() {
        for (later, _) in &BINARY_SYMBOLS[index + 1..] {
            assert!(
                !later.starts_with(symbol) || later == symbol,
                "{later:?} is shadowed by {symbol:?}"
            );
        }
    }
}

#[test]
fn every_operator_symbol_round_trips() {
    for (symbol, op) in BINARY_SYMBOLS.iter().chain(BINARY_WORDS) {
        assert_eq!(Operator::binary_from_symbol(symbol), Some(*op));
    }
    assert_eq!(Operator::binary_from_symbol("&&"), Some(Operator::And));
    assert_eq!(Operator::And.symbol(), "and");
    assert_eq!(Operator::binary_from_symbol("=>"), None);
}

#[test]
fn precedence_ladder() {
    let ladder = [
        Operator::PropertyAccess,
        Operator::Power,
        Operator::Negate,
        Operator::Multiply,
        Operator::Add,
        Operator::Concat,
        Operator::ShiftLeft,
        Operator::RangeInclusive,
        Operator::BitAnd,
        Operator::BitXor,
        Operator::BitOr,
        Operator::Less,
        Operator::Equal,
        Operator::And,
        Operator::Or,
        Operator::Coalesce,
        Operator::Pipe,
    ];
    for pair in ladder.windows(2) {
        assert!(
            pair[0].precedence() > pair[1].precedence(),
            "{:?} should bind tighter than {:?}",
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn arity_follows_fixity() {
    assert_eq!(Operator::Negate.arity(), 1);
    assert_eq!(Operator::Not.fixity(), OperatorFixity::Prefix);
    assert_eq!(Operator::Call.fixity(), OperatorFixity::Postfix);
    assert_eq!(Operator::Call.arity(), 2);
    assert_eq!(Operator::Add.arity(), 2);
    assert_eq!(Operator::Power.associativity(), Associativity::Right);
    assert_eq!(Operator::Subtract.associativity(), Associativity::Left);
}

#[test]
fn comparison_negation_and_flip() {
    assert_eq!(
        Operator::GreaterEqual.negated_comparison(),
        Some(Operator::Less)
    );
    assert_eq!(Operator::Less.flipped_comparison(), Some(Operator::Greater));
    assert_eq!(Operator::Add.negated_comparison(), None);
    assert!(Operator::Is.is_word());
    assert!(!Operator::Equal.is_word());
}

#[test]
fn operation_spans_its_operands() {
    let left = Expr::new(ExprKind::Reference("a".into()), Source::from_range(4, 5));
    let right = Expr::new(ExprKind::Reference("b".into()), Source::from_range(8, 9));
    let expr = Expr::operation(Operator::Add, vec![left, right], 6);
    assert_eq!(expr.span(), Span::new(4, 9));

    let operand = Expr::new(ExprKind::Reference("x".into()), Source::from_range(1, 2));
    let negate = Expr::operation(Operator::Negate, vec![operand], 0);
    assert_eq!(negate.span(), Span::new(0, 2));
}

#[test]
fn int_literal_keeps_base() {
    let hex = IntLiteral {
        value: 255,
        base: IntBase::Hex,
    };
    assert_eq!(hex.to_code(), "0xff");
    let negative = IntLiteral {
        value: -5,
        base: IntBase::Binary,
    };
    assert_eq!(negative.to_code(), "-0b101");
}

#[test]
fn float_negation_flips_raw_text() {
    let lit = FloatLiteral::new(2.5, "2.5");
    assert_eq!(lit.negated().raw, "-2.5");
    assert_eq!(lit.negated().negated(), lit);
}

#[test]
fn dice_bounds() {
    let dice = DiceLiteral { count: 3, sides: 6 };
    assert_eq!((dice.min(), dice.max()), (3, 18));
}

#[test]
fn preceding_comments_prepend() {
    let mut expr = Expr::new(ExprKind::Null, Source::from_range(10, 14));
    expr.push_preceding_comments(vec![Comment::block("b", Span::new(5, 10))]);
    expr.push_preceding_comments(vec![Comment::line("a", Span::new(0, 4))]);
    let texts: Vec<_> = expr
        .source
        .preceding_comments
        .iter()
        .map(|c| c.text.as_str())
        .collect();
    assert_eq!(texts, ["a", "b"]);
}

#[test]
fn entry_value_sees_through_inclusion() {
    let value = Expr::new(ExprKind::Bool(true), Source::default());
    let entry = Entry::Inclusion {
        entry: Box::new(Entry::Spread {
            source: Source::default(),
            value: value.clone(),
        }),
        condition: Expr::new(ExprKind::Reference("c".into()), Source::default()),
        source: Source::default(),
    };
    assert_eq!(entry.value(), &value);
    assert!(entry.is_spread());
}

#[test]
fn comments_are_collected_in_source_order() {
    let mut inner = Expr::new(ExprKind::Reference("x".into()), Source::from_range(8, 9));
    inner.source.following_comments = vec![Comment::block("2", Span::new(10, 15))];
    let mut outer = Expr::operation(
        Operator::Negate,
        vec![inner],
        7,
    );
    outer.source.preceding_comments = vec![Comment::line("1", Span::new(0, 4))];
    let texts: Vec<_> = outer.comments().iter().map(|c| c.text.clone()).collect();
    assert_eq!(texts, ["1", "2"]);
}
