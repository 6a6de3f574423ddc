//! Module-level declarations.
//!
//! A module is a sequence of items, one per line group:
//!
//! ```text
//! import Foo/Bar as B : { a, b as c }
//! type Name<T> = Type
//! [view] class Name<T> extends Parent { members }
//! enum Name<T> { a, b(#x: Int) }
//! state @name: Type = value
//! action name(args) => @state = value
//! helper name<T>(args): R => body
//! view Name(args) => <Element />
//! main => body
//! ```
//!
//! Item bodies are newline-separated: an expression ends at the end of its
//! line unless the next line continues it.

mod class;
mod import;

use extra_diagnostic::ErrorCode;
use extra_ir::{
    ActionDef, FunctionKind, Item, ItemKind, MainDef, Module, Source, StateAssignment, StateDef,
    TypeAliasDef,
};
use extra_scanner::ScanOptions;
use tracing::debug;

use crate::grammar::predicates;
use crate::grammar::series::SeriesConfig;
use crate::{ParseResult, Parser};

impl Parser<'_> {
    pub(crate) fn module(&mut self) -> ParseResult<Module> {
        let mut items = Vec::new();
        loop {
            self.skip_trivia()?;
            if self.scanner.is_eof() {
                break;
            }
            let mut item = self.item()?;
            self.skip_spaces()?;
            item.source.following_comments.extend(self.take_comments());
            if !self.scanner.is_eof() && !self.scanner.is_at_newline() {
                return Err(self.expected(ErrorCode::E1015, "a newline after the declaration"));
            }
            items.push(item);
        }
        Ok(Module {
            items,
            trailing_comments: self.take_comments(),
        })
    }

    /// One declaration, with the comments in front of it.
    pub fn item(&mut self) -> ParseResult<Item> {
        let comments = self.take_comments();
        let start = self.scanner.pos();
        let kind = self.with_options(ScanOptions::NEWLINE_IS_SEPARATOR, Self::item_kind)?;
        debug!(name = kind.name(), "item");
        Ok(Item {
            source: Source::from_range(start, self.scanner.pos()).with_preceding(comments),
            kind,
        })
    }

    fn item_kind(&mut self) -> ParseResult<ItemKind> {
        let Some(keyword) = self.scanner.peek_word() else {
            return Err(self.expected(ErrorCode::E1015, "a declaration"));
        };
        match keyword {
            "import" => return Ok(ItemKind::Import(self.import_def()?)),
            "class" => return Ok(ItemKind::Class(self.class_def(false)?)),
            "enum" => return Ok(ItemKind::Enum(self.enum_def()?)),
            "type" | "state" | "action" | "helper" | "view" | "main" => {}
            _ => return Err(self.expected(ErrorCode::E1015, "a declaration")),
        }
        self.scanner.advance_by(keyword.len());
        self.skip_trivia()?;
        let kind = match keyword {
            "type" => ItemKind::TypeAlias(self.type_alias()?),
            "state" => ItemKind::State(self.state_def()?),
            "action" => ItemKind::Action(self.action_def()?),
            "helper" => {
                let name = self.identifier()?;
                self.skip_trivia()?;
                ItemKind::Helper(self.function_rest(FunctionKind::Named, Some(name))?)
            }
            "view" if self.scanner.is_at_word("class") => ItemKind::Class(self.class_def(true)?),
            "view" => {
                let name = self.identifier()?;
                self.skip_trivia()?;
                let options = self.scanner.options() | ScanOptions::IN_VIEW;
                let function = self.with_options(options, |p| {
                    p.function_rest(FunctionKind::View, Some(name))
                })?;
                ItemKind::View(function)
            }
            _ => {
                if !self.scanner.scan_if_string("=>") {
                    return Err(self.expected(ErrorCode::E1001, "`=>`"));
                }
                self.skip_trivia()?;
                ItemKind::Main(MainDef {
                    body: self.expression()?,
                })
            }
        };
        Ok(kind)
    }

    /// `Name<T> = Type`, after `type`.
    fn type_alias(&mut self) -> ParseResult<TypeAliasDef> {
        let name = self.identifier()?;
        let generics = self.generics()?;
        self.skip_trivia()?;
        if !predicates::is_at_assign(&self.scanner) {
            return Err(self.expected(ErrorCode::E1001, "`=`"));
        }
        self.scanner.advance();
        self.skip_trivia()?;
        let options = self.nested_options();
        let ty = self.with_options(options, Self::type_expr)?;
        Ok(TypeAliasDef { name, generics, ty })
    }

    /// `@name: Type = value`, after `state`.
    fn state_def(&mut self) -> ParseResult<StateDef> {
        self.scanner.expect_string("@")?;
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
        if !predicates::is_at_assign(&self.scanner) {
            return Err(self.expected(ErrorCode::E1001, "`=`"));
        }
        self.scanner.advance();
        self.skip_trivia()?;
        let value = self.expression()?;
        Ok(StateDef {
            name,
            type_annotation,
            value,
        })
    }

    /// `name(args) => @a = 1` or `name(args) => { @a = 1, @b = 2 }`,
    /// after `action`.
    fn action_def(&mut self) -> ParseResult<ActionDef> {
        let name = self.identifier()?;
        let args = self.formula_args()?;
        self.skip_trivia()?;
        if !self.scanner.scan_if_string("=>") {
            return Err(self.expected(ErrorCode::E1001, "`=>`"));
        }
        self.skip_trivia()?;
        let assignments = if predicates::is_at_open_brace(&self.scanner) {
            let open = self.scanner.pos();
            self.scanner.advance();
            let config = SeriesConfig::new("{", "}", open).keep_closing_comments();
            self.series(&config, Self::state_assignment)?.items
        } else {
            vec![self.state_assignment()?]
        };
        if assignments.is_empty() {
            return Err(self.scanner.error_from(
                ErrorCode::E1015,
                "an action must assign at least one state",
                name.source.start(),
            ));
        }
        Ok(ActionDef {
            name,
            args,
            assignments,
        })
    }

    fn state_assignment(&mut self) -> ParseResult<StateAssignment> {
        if !self.scanner.scan_if_string("@") {
            return Err(self.expected(ErrorCode::E1015, "a state assignment `@name = value`"));
        }
        let mut state = self.identifier()?;
        self.skip_spaces()?;
        state.source.following_comments.extend(self.take_comments());
        if !predicates::is_at_assign(&self.scanner) {
            return Err(self.expected(ErrorCode::E1001, "`=`"));
        }
        self.scanner.advance();
        self.skip_trivia()?;
        let options = self.nested_options() | ScanOptions::NEWLINE_IS_SEPARATOR;
        let value = self.expression_with(options)?;
        Ok(StateAssignment { state, value })
    }
}
