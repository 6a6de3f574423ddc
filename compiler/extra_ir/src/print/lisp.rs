//! S-expression printer.
//!
//! Operator nodes print as `(symbol arg…)`; calls use `fn`
//! (`(fn f (1 2))`). Everything else prints as comment-free source code.

use super::CodePrinter;
use crate::ast::{Argument, ArgumentKind, Expr, ExprKind};

pub fn to_lisp(expr: &Expr) -> String {
    let mut out = String::new();
    write_expr(expr, &mut out);
    out
}

fn write_expr(expr: &Expr, out: &mut String) {
    match &expr.kind {
        ExprKind::Operation(operation) => {
            out.push('(');
            out.push_str(operation.op.lisp_symbol());
            for arg in &operation.args {
                out.push(' ');
                write_expr(arg, out);
            }
            out.push(')');
        }
        ExprKind::PropertyName(name) => out.push_str(name),
        ExprKind::Arguments(args) => {
            out.push('(');
            for (index, arg) in args.all().enumerate() {
                if index > 0 {
                    out.push(' ');
                }
                write_argument(arg, out);
            }
            out.push(')');
        }
        _ => {
            let mut printer = CodePrinter::without_comments();
            printer.expr(expr);
            out.push_str(printer.finish().trim_end());
        }
    }
}

fn write_argument(arg: &Argument, out: &mut String) {
    match &arg.kind {
        ArgumentKind::Positional(value) => write_expr(value, out),
        ArgumentKind::Named { name, value } => {
            out.push_str(&name.name);
            out.push_str(": ");
            write_expr(value, out);
        }
        ArgumentKind::SpreadPositional(value) => {
            out.push_str("...");
            write_expr(value, out);
        }
        ArgumentKind::RepeatedNamed { name, values } => {
            out.push_str("...");
            out.push_str(&name.name);
            out.push_str(": ");
            write_expr(values, out);
        }
        ArgumentKind::KwargsList(value) => {
            out.push('*');
            write_expr(value, out);
        }
    }
}
