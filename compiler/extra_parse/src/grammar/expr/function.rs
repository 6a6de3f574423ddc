//! Function literals and the pieces of a signature: generics and formula
//! arguments. Named helpers, views and class formulas reuse
//! [`Parser::function_rest`] after scanning their own keyword and name.

use extra_diagnostic::ErrorCode;
use extra_ir::{
    Expr, ExprKind, FormulaArg, FormulaArgKind, FunctionExpr, FunctionKind, Identifier, Source,
    TypeExpr,
};
use extra_scanner::ScanOptions;

use crate::grammar::predicates;
use crate::grammar::series::SeriesConfig;
use crate::{ParseResult, Parser};

impl Parser<'_> {
    /// `fn<T>(#a: T): T => body`
    pub(crate) fn function_literal(&mut self) -> ParseResult<Expr> {
        let start = self.scanner.pos();
        self.scanner.expect_word("fn")?;
        self.skip_trivia()?;
        let function = self.function_rest(FunctionKind::Anonymous, None)?;
        let source = Source::from_range(start, function.body.span().end);
        Ok(Expr::new(ExprKind::Function(Box::new(function)), source))
    }

    /// Everything after the name: generics, arguments, return type, `=>`
    /// and the body.
    pub(crate) fn function_rest(
        &mut self,
        kind: FunctionKind,
        name: Option<Identifier>,
    ) -> ParseResult<FunctionExpr> {
        let generics = self.generics()?;
        self.skip_trivia()?;
        let args = self.formula_args()?;
        self.skip_trivia()?;
        let mut return_type = self.return_type()?;
        self.skip_trivia()?;
        if let Some(ty) = &mut return_type {
            ty.source.following_comments.extend(self.take_comments());
        }
        if !self.scanner.scan_if_string("=>") {
            return Err(self.expected(ErrorCode::E1001, "`=>`"));
        }
        self.skip_trivia()?;
        let options = self.scanner.options() - ScanOptions::SINGLE_EXPRESSION;
        let body = self.expression_with(options)?;
        Ok(FunctionExpr {
            kind,
            name,
            generics,
            args,
            return_type,
            body,
        })
    }

    /// `: Type` after a signature, if present.
    pub(crate) fn return_type(&mut self) -> ParseResult<Option<TypeExpr>> {
        if !predicates::is_at_colon(&self.scanner) {
            return Ok(None);
        }
        self.scanner.advance();
        self.skip_trivia()?;
        Ok(Some(self.type_expr()?))
    }

    /// `<T, U>`, or nothing.
    pub(crate) fn generics(&mut self) -> ParseResult<Vec<Identifier>> {
        if !self.scanner.is_at("<") {
            return Ok(Vec::new());
        }
        let open = self.scanner.pos();
        self.scanner.advance();
        let series = self.series(&SeriesConfig::new("<", ">", open), Self::identifier)?;
        let mut generics = series.items;
        let Some(last) = generics.last_mut() else {
            return Err(self.scanner.error_from(
                ErrorCode::E1004,
                "expected at least one generic name",
                open,
            ));
        };
        last.source.following_comments.extend(series.closing_comments);
        Ok(generics)
    }

    /// `(#a: Int, b = 1, ...#rest, ...names: String, *kwargs)`
    ///
    /// Comments in front of the closing `)` stay pending for whatever
    /// follows the argument list.
    pub(crate) fn formula_args(&mut self) -> ParseResult<Vec<FormulaArg>> {
        let open = self.scanner.pos();
        self.scanner.expect_string("(")?;
        let options = self.nested_options() | ScanOptions::NEWLINE_IS_SEPARATOR;
        let config = SeriesConfig::new("(", ")", open).keep_closing_comments();
        let series = self.with_options(options, |p| p.series(&config, Self::formula_arg))?;
        Ok(series.items)
    }

    fn formula_arg(&mut self) -> ParseResult<FormulaArg> {
        let kind = if self.scanner.scan_if_string("...#") {
            FormulaArgKind::SpreadPositional
        } else if self.scanner.scan_if_string("...") {
            FormulaArgKind::RepeatedNamed
        } else if self.scanner.scan_if_string("#") {
            FormulaArgKind::Positional
        } else if self.scanner.scan_if_string("*") {
            FormulaArgKind::Kwargs
        } else {
            FormulaArgKind::Named
        };
        self.skip_trivia()?;
        let mut name = self.identifier()?;
        self.skip_spaces()?;
        name.source.following_comments.extend(self.take_comments());
        let type_annotation = if predicates::is_at_colon(&self.scanner) {
            self.scanner.advance();
            self.skip_trivia()?;
            let mut ty = self.type_expr()?;
            self.skip_spaces()?;
            ty.source.following_comments.extend(self.take_comments());
            Some(ty)
        } else {
            None
        };
        let default = if predicates::is_at_assign(&self.scanner) {
            self.scanner.advance();
            self.skip_trivia()?;
            Some(self.expression()?)
        } else {
            None
        };
        Ok(FormulaArg {
            kind,
            name,
            type_annotation,
            default,
        })
    }
}
