//! View elements: `<Tag prop={value}>text {expr} <Child /></Tag>`.
//!
//! Only reachable where `IN_VIEW` is set (view declarations, `render`
//! bodies, [`crate::parse_view`]); elsewhere `<` is a comparison.

use extra_diagnostic::ErrorCode;
use extra_ir::{Expr, ExprKind, Identifier, Source, ViewChild, ViewElement, ViewProp};
use extra_scanner::{is_word_char, ScanOptions};
use tracing::trace;

use crate::{ParseError, ParseResult, Parser};

fn is_tag_char(c: char) -> bool {
    is_word_char(c) || c == '-'
}

impl Parser<'_> {
    /// `<Tag …>…</Tag>`, `<Tag … />` or a fragment `<>…</>`.
    pub(crate) fn view_element(&mut self) -> ParseResult<Expr> {
        let options = self.nested_options() | ScanOptions::IN_VIEW;
        self.with_options(options, Self::view_element_inner)
    }

    fn view_element_inner(&mut self) -> ParseResult<Expr> {
        let start = self.scanner.pos();
        self.scanner.expect_string("<")?;
        let tag = self.scanner.eat_while(is_tag_char);
        let tag = (!tag.is_empty()).then(|| tag.to_string());
        trace!(?tag, "view element");

        let mut props = Vec::new();
        let (closing_comments, self_closing) = loop {
            self.skip_trivia()?;
            if self.scanner.is_at("/>") {
                let comments = self.take_comments();
                self.scanner.advance_by(2);
                break (comments, true);
            }
            if self.scanner.is_at(">") {
                let comments = self.take_comments();
                self.scanner.advance();
                break (comments, false);
            }
            if self.scanner.is_eof() {
                return Err(self.unclosed_tag(start, tag.as_deref()));
            }
            if tag.is_none() {
                return Err(self.expected(ErrorCode::E1001, "`>` (fragments take no props)"));
            }
            props.push(self.view_prop()?);
        };

        let mut element = ViewElement {
            tag,
            props,
            children: None,
            closing_comments,
        };
        let mut leftover = Vec::new();
        if !self_closing {
            let (children, comments) = self.view_children(start, element.tag.as_deref())?;
            element.children = Some(children);
            leftover = comments;
        }
        let mut expr = Expr::new(
            ExprKind::View(Box::new(element)),
            Source::new(self.scanner.span_from(start)),
        );
        expr.push_following_comments(leftover);
        Ok(expr)
    }

    /// `name`, `name={expr}`, `name="text"` or `name=value`.
    fn view_prop(&mut self) -> ParseResult<ViewProp> {
        let comments = self.take_comments();
        let start = self.scanner.pos();
        let name = self.scanner.eat_while(is_tag_char);
        if name.is_empty() {
            return Err(self.expected(ErrorCode::E1004, "a property name"));
        }
        let name = Identifier::new(
            name,
            Source::new(self.scanner.span_from(start)).with_preceding(comments),
        );
        if !self.scanner.scan_if_string("=") {
            return Ok(ViewProp { name, value: None });
        }
        let value = if self.scanner.is_at("{") {
            let open = self.scanner.pos();
            self.scanner.advance();
            self.skip_trivia()?;
            let options = self.nested_options();
            let mut value = self.expression_with(options)?;
            self.skip_trivia()?;
            value.push_following_comments(self.take_comments());
            self.expect_closing("{", "}", open)?;
            value
        } else if self.scanner.is_at("'") || self.scanner.is_at("\"") {
            self.string()?
        } else {
            let options = self.nested_options() | ScanOptions::SINGLE_EXPRESSION;
            self.expression_with(options)?
        };
        Ok(ViewProp {
            name,
            value: Some(value),
        })
    }

    /// Children up to and including the closing tag. Returns the children
    /// and any comments that no child claimed.
    fn view_children(
        &mut self,
        start: u32,
        tag: Option<&str>,
    ) -> ParseResult<(Vec<ViewChild>, Vec<extra_ir::Comment>)> {
        let mut children = Vec::new();
        loop {
            if self.scanner.scan_if_string("</") {
                let close_start = self.scanner.pos();
                let closing = self.scanner.eat_while(is_tag_char);
                if closing != tag.unwrap_or("") {
                    return Err(self.scanner.error_from(
                        ErrorCode::E1012,
                        format!(
                            "closing tag `</{closing}>` does not match `<{}>`",
                            tag.unwrap_or("")
                        ),
                        close_start,
                    ));
                }
                self.skip_spaces()?;
                self.scanner.expect_string(">")?;
                return Ok((children, self.take_comments()));
            }
            if self.scanner.is_eof() {
                return Err(self.unclosed_tag(start, tag));
            }
            if self.scanner.is_at("{-") {
                self.scanner.scan_comment()?;
            } else if self.scanner.is_at("{") {
                let open = self.scanner.pos();
                self.scanner.advance();
                self.skip_trivia()?;
                let options = self.nested_options();
                let mut expr = self.expression_with(options)?;
                self.skip_trivia()?;
                expr.push_following_comments(self.take_comments());
                self.expect_closing("{", "}", open)?;
                children.push(ViewChild::Expr(expr));
            } else if self.scanner.is_at("<") {
                let comments = self.take_comments();
                let mut element = self.view_element()?;
                element.push_preceding_comments(comments);
                children.push(ViewChild::Element(element));
            } else {
                let text_start = self.scanner.pos();
                let text = self.scanner.eat_while(|c| c != '{' && c != '<');
                children.push(ViewChild::Text {
                    text: text.to_string(),
                    span: self.scanner.span_from(text_start),
                });
            }
        }
    }

    #[cold]
    fn unclosed_tag(&self, start: u32, tag: Option<&str>) -> ParseError {
        let tag = tag.unwrap_or("");
        ParseError::new(
            ErrorCode::E1003,
            format!("unclosed `<{tag}>`"),
            extra_ir::Span::new(start, start + 1 + tag.len() as u32),
        )
    }
}

#[cfg(test)]
mod tests;
