//! Class and enum declarations.

use extra_diagnostic::ErrorCode;
use extra_ir::{
    ClassDef, ClassMember, ClassMemberKind, EnumDef, EnumMember, FunctionExpr, FunctionKind,
    Identifier, Source,
};
use extra_scanner::ScanOptions;

use crate::grammar::predicates;
use crate::grammar::series::SeriesConfig;
use crate::{ParseResult, Parser};

impl Parser<'_> {
    /// `class Name<T> extends Parent { members }`; `view` has already been
    /// consumed when `is_view` is set.
    pub(super) fn class_def(&mut self, is_view: bool) -> ParseResult<ClassDef> {
        self.scanner.expect_word("class")?;
        self.skip_trivia()?;
        let name = self.identifier()?;
        let generics = self.generics()?;
        self.skip_trivia()?;
        let parent = if self.scanner.scan_if_word("extends") {
            self.skip_trivia()?;
            let parent = self.identifier()?;
            self.skip_trivia()?;
            Some(parent)
        } else {
            None
        };
        let open = self.scanner.pos();
        if !predicates::is_at_open_brace(&self.scanner) {
            return Err(self.expected(ErrorCode::E1015, "`{` to open the class body"));
        }
        self.scanner.advance();
        let options = self.nested_options() | ScanOptions::NEWLINE_IS_SEPARATOR;
        let members = self.with_options(options, |p| {
            p.series(&SeriesConfig::new("{", "}", open), Self::class_member)
        })?;
        Ok(ClassDef {
            name,
            generics,
            parent,
            is_view,
            members: members.items,
            closing_comments: members.closing_comments,
        })
    }

    fn class_member(&mut self) -> ParseResult<ClassMember> {
        let comments = self.take_comments();
        let start = self.scanner.pos();
        let kind = if self.is_at_render()? {
            ClassMemberKind::Formula(self.render()?)
        } else if self.scanner.scan_if_word("static") {
            self.skip_trivia()?;
            if self.scanner.scan_if_word("fn") {
                self.skip_trivia()?;
                ClassMemberKind::Formula(self.member_formula(FunctionKind::Static)?)
            } else {
                self.property(true)?
            }
        } else if self.scanner.scan_if_word("fn") {
            self.skip_trivia()?;
            ClassMemberKind::Formula(self.member_formula(FunctionKind::Instance)?)
        } else {
            self.property(false)?
        };
        Ok(ClassMember {
            source: Source::from_range(start, self.scanner.pos()).with_preceding(comments),
            kind,
        })
    }

    /// `render` followed by `=>` or a signature.
    fn is_at_render(&mut self) -> ParseResult<bool> {
        if !self.scanner.is_at_word("render") {
            return Ok(false);
        }
        self.scanner.test(|s| -> ParseResult<bool> {
            s.advance_by("render".len());
            s.scan_all_whitespace()?;
            Ok(s.is_at("=>") || s.is_at("("))
        })
    }

    /// `render => <Element />` or `render(args): R => …`.
    fn render(&mut self) -> ParseResult<FunctionExpr> {
        let start = self.scanner.pos();
        self.scanner.expect_word("render")?;
        let name = Identifier::new("render", Source::new(self.scanner.span_from(start)));
        self.skip_trivia()?;
        let options = self.scanner.options() | ScanOptions::IN_VIEW;
        self.with_options(options, |p| {
            if p.scanner.is_at("(") {
                return p.function_rest(FunctionKind::View, Some(name));
            }
            p.scanner.expect_string("=>")?;
            p.skip_trivia()?;
            let body = p.expression()?;
            Ok(FunctionExpr {
                kind: FunctionKind::View,
                name: Some(name),
                generics: Vec::new(),
                args: Vec::new(),
                return_type: None,
                body,
            })
        })
    }

    fn member_formula(&mut self, kind: FunctionKind) -> ParseResult<FunctionExpr> {
        let name = self.identifier()?;
        self.function_rest(kind, Some(name))
    }

    /// `name: Type = default`, `@name …`; `static` already consumed.
    fn property(&mut self, is_static: bool) -> ParseResult<ClassMemberKind> {
        let is_state = self.scanner.scan_if_string("@");
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
        if type_annotation.is_none() && default.is_none() {
            return Err(self.expected(ErrorCode::E1015, "`:` or `=` after the property name"));
        }
        Ok(ClassMemberKind::Property {
            name,
            is_static,
            is_state,
            type_annotation,
            default,
        })
    }

    /// `enum Name<T> { a, b(#x: Int) }`
    pub(super) fn enum_def(&mut self) -> ParseResult<EnumDef> {
        self.scanner.expect_word("enum")?;
        self.skip_trivia()?;
        let name = self.identifier()?;
        let generics = self.generics()?;
        self.skip_trivia()?;
        let open = self.scanner.pos();
        if !predicates::is_at_open_brace(&self.scanner) {
            return Err(self.expected(ErrorCode::E1015, "`{` to open the enum body"));
        }
        self.scanner.advance();
        let members = self.series(&SeriesConfig::new("{", "}", open), |p| {
            let name = p.identifier()?;
            let args = if p.scanner.is_at("(") {
                p.formula_args()?
            } else {
                Vec::new()
            };
            Ok(EnumMember { name, args })
        })?;
        Ok(EnumDef {
            name,
            generics,
            members: members.items,
            closing_comments: members.closing_comments,
        })
    }
}
