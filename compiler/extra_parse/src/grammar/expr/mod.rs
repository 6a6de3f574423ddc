//! Expression parsing.
//!
//! The engine alternates between two states. Expecting an operand, it
//! takes prefix operators and then one operand (`primary.rs`). Expecting an
//! operator, it applies postfix forms (`postfix.rs`) straight to the last
//! operand, then either pushes a binary operator or finishes.
//!
//! Binary operators sit on an operator stack; a new operator first reduces
//! every stacked operator that binds at least as tightly (strictly more
//! tightly for the right-associative `**`). The end of the expression
//! reduces everything that is left.
//!
//! # Module Structure
//!
//! - `mod.rs`: the engine
//! - `primary.rs`: operand dispatch, references, groups
//! - `literals.rs`: numbers, dice, strings, templates, regex
//! - `containers.rs`: array/set/dict/object literals
//! - `postfix.rs`: property access, calls, block arguments, indexing
//! - `control.rs`: `let`, `if`, `switch`/`match`
//! - `function.rs`: function literals, formula arguments, generics

mod containers;
mod control;
mod function;
mod literals;
mod postfix;
mod primary;

use extra_diagnostic::ErrorCode;
use extra_ir::{
    Associativity, Comment, Expr, ExprKind, IntLiteral, Operator, Source,
};
use extra_scanner::ScanOptions;
use extra_stack::ensure_sufficient_stack;
use tracing::trace;

use super::predicates;
use crate::{ParseError, ParseResult, Parser};

/// An operator waiting on the stack for its right operand.
struct PendingOperator {
    op: Operator,
    start: u32,
    /// Comments before a prefix operator.
    preceding: Vec<Comment>,
    /// Comments after the operator symbol.
    following: Vec<Comment>,
}

#[derive(Default)]
struct Stacks {
    operands: Vec<Expr>,
    operators: Vec<PendingOperator>,
    /// Start of a `9223372036854775808` operand still waiting for the
    /// negation that makes it `i64::MIN`.
    min_int_magnitude: Option<u32>,
}

impl Stacks {
    /// Reduce while the stacked operator binds at least as tightly as
    /// `incoming`. `None` reduces everything.
    fn reduce_for(&mut self, incoming: Option<Operator>) -> ParseResult<()> {
        while let Some(top) = self.operators.last() {
            if let Some(incoming) = incoming {
                let (top_prec, prec) = (top.op.precedence(), incoming.precedence());
                let reduce = match incoming.associativity() {
                    Associativity::Left => top_prec >= prec,
                    Associativity::Right => top_prec > prec,
                };
                if !reduce {
                    break;
                }
            }
            self.reduce_top()?;
        }
        Ok(())
    }

    fn reduce_top(&mut self) -> ParseResult<()> {
        let Some(pending) = self.operators.pop() else {
            return Ok(());
        };
        let arity = pending.op.arity();
        if self.operands.len() < arity {
            return Err(ParseError::new(
                ErrorCode::E1002,
                format!("`{}` is missing an operand", pending.op.symbol()),
                extra_ir::Span::point(pending.start),
            ));
        }
        let args = self.operands.split_off(self.operands.len() - arity);
        let negates_min_int = pending.op == Operator::Negate
            && self
                .min_int_magnitude
                .is_some_and(|start| is_scanned_min_int(&args[0], start));
        if negates_min_int {
            self.min_int_magnitude = None;
        }
        trace!(op = ?pending.op, "reduce");
        self.operands.push(build_operation(pending, args, negates_min_int));
        Ok(())
    }
}

/// Build the node for a reduced operator, folding `-literal` into a
/// negative literal.
fn build_operation(pending: PendingOperator, mut args: Vec<Expr>, negates_min_int: bool) -> Expr {
    if pending.op == Operator::Negate && args.len() == 1 {
        let negated = if negates_min_int {
            Some(args[0].kind.clone())
        } else {
            negated_literal(&args[0].kind)
        };
        if let Some(kind) = negated {
            let mut literal = args.remove(0);
            literal.kind = kind;
            literal.source.span.start = pending.start;
            let mut comments = pending.preceding;
            comments.extend(pending.following);
            literal.push_preceding_comments(comments);
            return literal;
        }
    }
    let mut expr = Expr::operation(pending.op, args, pending.start);
    expr.source.preceding_comments = pending.preceding;
    if let ExprKind::Operation(operation) = &mut expr.kind {
        operation.following_operator_comments = pending.following;
    }
    expr
}

fn is_scanned_min_int(expr: &Expr, start: u32) -> bool {
    matches!(expr.kind, ExprKind::Int(IntLiteral { value: i64::MIN, .. }))
        && expr.source.span.start == start
}

fn negated_literal(kind: &ExprKind) -> Option<ExprKind> {
    match kind {
        ExprKind::Int(lit) => Some(ExprKind::Int(IntLiteral {
            value: lit.value.checked_neg()?,
            base: lit.base,
        })),
        ExprKind::Float(lit) => Some(ExprKind::Float(lit.negated())),
        _ => None,
    }
}

/// Attach `comments` after the most recently completed operand.
fn attach_following(stacks: &mut Stacks, comments: Vec<Comment>) {
    if let Some(last) = stacks.operands.last_mut() {
        last.push_following_comments(comments);
    }
}

impl Parser<'_> {
    /// Parse an expression under the current scan options.
    pub fn expression(&mut self) -> ParseResult<Expr> {
        ensure_sufficient_stack(|| {
            let options = self.scanner.options();
            self.with_options(options, Self::expression_inner)
        })
    }

    /// Parse an expression with `options` pushed for its duration.
    pub(crate) fn expression_with(&mut self, options: ScanOptions) -> ParseResult<Expr> {
        self.with_options(options, Self::expression)
    }

    fn expression_inner(&mut self) -> ParseResult<Expr> {
        let mut stacks = Stacks::default();
        let mut expect_type = false;
        loop {
            // Expecting an operand.
            if !expect_type {
                if let Some((op, len)) = predicates::prefix_operator(&self.scanner) {
                    let preceding = self.take_comments();
                    let start = self.scanner.pos();
                    self.scanner.advance_by(len);
                    self.skip_trivia()?;
                    let following = self.take_comments();
                    stacks.operators.push(PendingOperator {
                        op,
                        start,
                        preceding,
                        following,
                    });
                    continue;
                }
            }
            let negating = stacks
                .operators
                .last()
                .is_some_and(|pending| pending.op == Operator::Negate);
            let operand = if expect_type {
                let ty = self.type_expr()?;
                let source = Source::new(ty.source.span);
                Expr::new(ExprKind::Type(Box::new(ty)), source)
            } else if negating && self.at_min_int_magnitude() {
                stacks.min_int_magnitude = Some(self.scanner.pos());
                self.min_int_magnitude()
            } else {
                self.operand()?
            };
            stacks.operands.push(operand);

            // Expecting an operator.
            let Some((op, start, len)) = self.operator_position(&mut stacks)? else {
                break;
            };
            self.push_binary(&mut stacks, op, start, len)?;
            // The right-hand side of `is`/`!is` is a type.
            expect_type = matches!(op, Operator::Is | Operator::IsNot);
        }
        stacks.reduce_for(None)?;
        // Something other than the negation took the magnitude.
        if let Some(start) = stacks.min_int_magnitude {
            return Err(ParseError::new(
                ErrorCode::E1006,
                format!("invalid number literal `{}`", literals::MIN_INT_MAGNITUDE),
                extra_ir::Span::new(start, start + literals::MIN_INT_MAGNITUDE.len() as u32),
            ));
        }
        let mut operands = stacks.operands;
        match (operands.pop(), operands.is_empty()) {
            (Some(expr), true) => Ok(expr),
            _ => Err(self.expected(ErrorCode::E1002, "a single expression")),
        }
    }

    /// After an operand: apply postfix forms, consume trivia (honoring
    /// newline separators), and report the binary operator that follows,
    /// if any. Comments go to the last operand.
    fn operator_position(
        &mut self,
        stacks: &mut Stacks,
    ) -> ParseResult<Option<(Operator, u32, usize)>> {
        loop {
            self.postfix_chain(stacks)?;
            let single = self.scanner.has_option(ScanOptions::SINGLE_EXPRESSION);
            if self.scanner.has_option(ScanOptions::NEWLINE_IS_SEPARATOR) || single {
                self.skip_spaces()?;
                if self.scanner.is_at_newline() {
                    if single || !predicates::continues_after_newline(&mut self.scanner)? {
                        let comments = self.take_comments();
                        attach_following(stacks, comments);
                        return Ok(None);
                    }
                    self.skip_trivia()?;
                }
            } else {
                self.skip_trivia()?;
            }
            let comments = self.take_comments();
            attach_following(stacks, comments);

            if predicates::is_at_property_access(&self.scanner) {
                continue;
            }
            if single {
                return Ok(None);
            }
            let start = self.scanner.pos();
            return Ok(predicates::binary_operator(&self.scanner).map(|(op, len)| (op, start, len)));
        }
    }

    /// Reduce for `op`, consume its symbol and push it.
    fn push_binary(
        &mut self,
        stacks: &mut Stacks,
        op: Operator,
        start: u32,
        len: usize,
    ) -> ParseResult<()> {
        stacks.reduce_for(Some(op))?;
        self.scanner.advance_by(len);
        if matches!(op, Operator::Pipe | Operator::NullablePipe) {
            let options = self.scanner.options() | ScanOptions::IN_PIPE;
            self.scanner.set_options(options);
        }
        self.skip_trivia()?;
        let following = self.take_comments();
        trace!(?op, start, "push operator");
        stacks.operators.push(PendingOperator {
            op,
            start,
            preceding: Vec::new(),
            following,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests;
