//! Canonical source printer.
//!
//! Output is mostly single-line. A line comment always ends its line, so
//! wherever a newline would change how the text parses (before a postfix
//! operator, before a binary operator at the start of a line) the printer
//! wraps the operand that carries the comment in parentheses.

use crate::ast::{
    ActionDef, Argument, ArgumentKind, ArgumentsList, Associativity, BlockKind, ClassDef,
    ClassMember, ClassMemberKind, Container, Entry, EntryKey, EnumDef, Expr, ExprKind,
    FormulaArg, FunctionExpr, FunctionKind, Identifier, IfExpr, ImportDef, ImportLocation, Item,
    ItemKind, Let, Module, Operation, Operator, OperatorFixity, Pattern, StringTemplate,
    SwitchExpr, TemplatePart, TypeArg, TypeExpr, TypeExprKind, TypeProp, ViewChild, ViewElement,
};
use crate::Comment;

const INDENT: &str = "  ";

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Side {
    Left,
    Right,
}

/// Writes nodes as source code into an owned buffer.
pub struct CodePrinter {
    out: String,
    indent: usize,
    comments: bool,
}

impl Default for CodePrinter {
    fn default() -> Self {
        CodePrinter::new()
    }
}

impl CodePrinter {
    pub fn new() -> Self {
        CodePrinter {
            out: String::new(),
            indent: 0,
            comments: true,
        }
    }

    /// A printer that skips every comment slot.
    pub fn without_comments() -> Self {
        CodePrinter {
            comments: false,
            ..CodePrinter::new()
        }
    }

    pub fn finish(mut self) -> String {
        if let Some(pos) = self.out.rfind('\n') {
            if self.out[pos + 1..].bytes().all(|b| b == b' ') {
                self.out.truncate(pos + 1);
            }
        }
        self.out
    }

    fn emit(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn newline(&mut self) {
        let end = self.out.trim_end_matches(' ').len();
        self.out.truncate(end);
        self.out.push('\n');
        self.push_indent();
    }

    /// Start a line, reusing the current one if nothing is on it yet (after
    /// a line comment).
    fn line(&mut self) {
        let end = self.out.trim_end_matches(' ').len();
        if self.out[..end].ends_with('\n') {
            self.out.truncate(end);
            self.push_indent();
        } else {
            self.newline();
        }
    }

    fn push_indent(&mut self) {
        for _ in 0..self.indent {
            self.out.push_str(INDENT);
        }
    }

    fn ends_line(&self) -> bool {
        self.out.trim_end_matches(' ').ends_with('\n')
    }

    fn separate(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with([' ', '\n', '(', '[']) {
            self.out.push(' ');
        }
    }

    fn comment(&mut self, comment: &Comment) {
        self.separate();
        self.emit(&comment.to_code());
        if comment.is_line() {
            self.newline();
        }
    }

    /// Comments before a token: block comments are followed by a space.
    fn leading(&mut self, comments: &[Comment]) {
        if !self.comments {
            return;
        }
        for comment in comments {
            self.comment(comment);
            if !comment.is_line() {
                self.emit(" ");
            }
        }
    }

    /// Comments after a token.
    fn trailing(&mut self, comments: &[Comment]) {
        if !self.comments {
            return;
        }
        for comment in comments {
            self.comment(comment);
        }
    }

    /// Open a brace, keeping `{-` from reading as a block comment.
    fn braced(&mut self, open: &str, body: impl FnOnce(&mut Self)) {
        self.emit(open);
        let mark = self.out.len();
        body(self);
        if self.out[mark..].starts_with('-') {
            self.out.insert(mark, ' ');
        }
    }

    /// Run `body`, then wrap what it printed in parentheses if it ended the
    /// line.
    fn same_line(&mut self, body: impl FnOnce(&mut Self)) {
        let mark = self.out.len();
        body(self);
        if self.out.len() > mark && self.ends_line() {
            self.out.insert(mark, '(');
            self.emit(")");
        }
    }

    fn ident(&mut self, ident: &Identifier) {
        self.leading(&ident.source.preceding_comments);
        self.emit(&ident.name);
        self.trailing(&ident.source.following_comments);
    }

    fn generics(&mut self, generics: &[Identifier]) {
        if generics.is_empty() {
            return;
        }
        self.emit("<");
        for (index, generic) in generics.iter().enumerate() {
            if index > 0 {
                self.emit(", ");
            }
            self.ident(generic);
        }
        self.emit(">");
    }

    // Expressions

    pub fn expr(&mut self, expr: &Expr) {
        self.leading(&expr.source.preceding_comments);
        self.expr_body(expr);
        self.trailing(&expr.source.following_comments);
    }

    fn parenthesized(&mut self, expr: &Expr) {
        self.leading(&expr.source.preceding_comments);
        self.emit("(");
        self.expr_body(expr);
        self.emit(")");
        self.trailing(&expr.source.following_comments);
    }

    fn expr_body(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Null => self.emit("null"),
            ExprKind::Bool(value) => self.emit(if *value { "true" } else { "false" }),
            ExprKind::Int(lit) => self.emit(&lit.to_code()),
            ExprKind::Float(lit) => {
                if lit.raw.is_empty() {
                    self.emit(&format!("{:?}", lit.value));
                } else {
                    self.emit(&lit.raw);
                }
            }
            ExprKind::Str(lit) => self.emit(&lit.to_code()),
            ExprKind::Template(template) => self.template(template),
            ExprKind::Regex(lit) => self.emit(&lit.to_code()),
            ExprKind::Dice(dice) => self.emit(&format!("{}d{}", dice.count, dice.sides)),
            ExprKind::Reference(name) => self.emit(name),
            ExprKind::StateReference(name) => {
                self.emit("@");
                self.emit(name);
            }
            ExprKind::This => self.emit("this"),
            ExprKind::PipePlaceholder => self.emit("#"),
            ExprKind::PropertyName(name) => {
                self.emit(".");
                self.emit(name);
            }
            ExprKind::Array(container) => self.container("[", container, "]"),
            ExprKind::Set(container) => self.container("#[", container, "]"),
            ExprKind::Dict(container) => self.container("#{", container, "}"),
            ExprKind::Object(container) => self.container("{", container, "}"),
            ExprKind::Let(let_expr) => self.let_expr(let_expr),
            ExprKind::If(if_expr) => self.if_expr(if_expr),
            ExprKind::Switch(switch) => self.switch(switch),
            ExprKind::Function(function) => {
                self.emit("fn");
                self.signature(function);
                self.emit(" => ");
                self.expr(&function.body);
            }
            ExprKind::Arguments(args) => self.arguments(args),
            ExprKind::Type(ty) => self.type_expr(ty),
            ExprKind::View(element) => self.view(element),
            ExprKind::Operation(operation) => self.operation(operation),
        }
    }

    fn template(&mut self, template: &StringTemplate) {
        let delimiter = template.quote.delimiter();
        self.emit(delimiter);
        for part in &template.parts {
            match part {
                TemplatePart::Text(text) => {
                    let escaped = template.quote.escape(text);
                    self.emit(&escaped);
                }
                TemplatePart::Expr(expr) => {
                    self.braced("${", |p| p.expr(expr));
                    self.emit("}");
                }
            }
        }
        self.emit(delimiter);
    }

    fn container(&mut self, open: &str, container: &Container, close: &str) {
        self.braced(open, |p| {
            for (index, entry) in container.entries.iter().enumerate() {
                if index > 0 {
                    p.emit(", ");
                }
                p.entry(entry);
            }
            p.trailing(&container.closing_comments);
        });
        self.emit(close);
    }

    fn entry(&mut self, entry: &Entry) {
        match entry {
            Entry::Value(value) => self.expr(value),
            Entry::Pair { key, value } => {
                match key {
                    EntryKey::Name(ident) => self.ident(ident),
                    EntryKey::Literal(key) => self.expr(key),
                    EntryKey::Computed(key) => {
                        self.emit("[");
                        self.expr(key);
                        self.emit("]");
                    }
                }
                self.emit(": ");
                self.expr(value);
            }
            Entry::Spread { source, value } => {
                self.leading(&source.preceding_comments);
                self.emit("...");
                self.expr(value);
                self.trailing(&source.following_comments);
            }
            Entry::Inclusion {
                entry,
                condition,
                source,
            } => {
                self.leading(&source.preceding_comments);
                if is_open_ended(entry.value()) && matches!(**entry, Entry::Value(_)) {
                    self.parenthesized(entry.value());
                } else {
                    self.entry(entry);
                }
                self.emit(" if ");
                self.expr(condition);
                self.trailing(&source.following_comments);
            }
        }
    }

    fn let_expr(&mut self, let_expr: &Let) {
        self.emit("let ");
        for (index, binding) in let_expr.bindings.iter().enumerate() {
            if index > 0 {
                self.emit(", ");
            }
            self.ident(&binding.name);
            if let Some(ty) = &binding.type_annotation {
                self.emit(": ");
                self.type_expr(ty);
            }
            self.emit(" = ");
            self.expr(&binding.value);
        }
        self.trailing(&let_expr.in_comments);
        self.separate();
        self.emit("in ");
        self.expr(&let_expr.body);
    }

    fn if_expr(&mut self, if_expr: &IfExpr) {
        let branch_count = if_expr.branches.len();
        for (index, branch) in if_expr.branches.iter().enumerate() {
            self.separate();
            self.emit(if index == 0 { "if " } else { "elseif " });
            self.expr(&branch.condition);
            self.emit(" then ");
            let followed = index + 1 < branch_count || if_expr.else_body.is_some();
            if followed && is_open_ended(&branch.body) {
                self.parenthesized(&branch.body);
            } else {
                self.expr(&branch.body);
            }
        }
        if let Some(body) = &if_expr.else_body {
            self.separate();
            self.emit("else ");
            self.expr(body);
        }
    }

    fn switch(&mut self, switch: &SwitchExpr) {
        self.emit(switch.keyword.as_str());
        self.emit(" (");
        self.expr(&switch.subject);
        self.emit(") {");
        self.indent += 1;
        for case in &switch.cases {
            self.line();
            self.leading(&case.source.preceding_comments);
            self.emit("case ");
            self.pattern(&case.pattern);
            self.emit(": ");
            self.expr(&case.body);
            self.trailing(&case.source.following_comments);
        }
        if let Some(body) = &switch.else_body {
            self.line();
            self.emit("else: ");
            self.expr(body);
        }
        self.trailing(&switch.closing_comments);
        self.indent -= 1;
        self.line();
        self.emit("}");
    }

    fn pattern(&mut self, pattern: &Pattern) {
        match pattern {
            Pattern::Wildcard(source) => {
                self.leading(&source.preceding_comments);
                self.emit("_");
                self.trailing(&source.following_comments);
            }
            Pattern::Binding(ident) => self.ident(ident),
            Pattern::Value(value) => self.expr(value),
            Pattern::Type { binding, ty } => {
                self.type_expr(ty);
                if let Some(binding) = binding {
                    self.separate();
                    self.emit("as ");
                    self.ident(binding);
                }
            }
        }
    }

    /// `<T>(args): R`, the part of a function between its name and `=>`.
    fn signature(&mut self, function: &FunctionExpr) {
        self.generics(&function.generics);
        self.emit("(");
        self.formula_args(&function.args);
        self.emit(")");
        if let Some(ty) = &function.return_type {
            self.emit(": ");
            self.type_expr(ty);
        }
    }

    fn formula_args(&mut self, args: &[FormulaArg]) {
        for (index, arg) in args.iter().enumerate() {
            if index > 0 {
                self.emit(", ");
            }
            self.emit(arg.kind.prefix());
            self.ident(&arg.name);
            if let Some(ty) = &arg.type_annotation {
                self.emit(": ");
                self.type_expr(ty);
            }
            if let Some(default) = &arg.default {
                self.emit(" = ");
                self.expr(default);
            }
        }
    }

    fn arguments(&mut self, args: &ArgumentsList) {
        self.emit("(");
        for (index, arg) in args.parens.iter().enumerate() {
            if index > 0 {
                self.emit(", ");
            }
            self.argument(arg);
        }
        self.trailing(&args.last_parens_comments);
        self.emit(")");
        match args.block_kind {
            BlockKind::None => {}
            BlockKind::Braces => {
                self.braced(" {", |p| {
                    for (index, arg) in args.block.iter().enumerate() {
                        p.emit(if index == 0 { " " } else { ", " });
                        p.argument(arg);
                    }
                    p.trailing(&args.block_comments);
                });
                self.separate();
                self.emit("}");
            }
            BlockKind::Colon => {
                self.emit(": ");
                for arg in &args.block {
                    self.argument(arg);
                }
            }
        }
    }

    fn argument(&mut self, arg: &Argument) {
        self.leading(&arg.source.preceding_comments);
        match &arg.kind {
            ArgumentKind::Positional(value) => self.expr(value),
            ArgumentKind::Named { name, value } => {
                self.ident(name);
                self.emit(": ");
                self.expr(value);
            }
            ArgumentKind::SpreadPositional(value) => {
                self.emit("...");
                self.expr(value);
            }
            ArgumentKind::RepeatedNamed { name, values } => {
                self.emit("...");
                self.ident(name);
                self.emit(": ");
                self.expr(values);
            }
            ArgumentKind::KwargsList(value) => {
                self.emit("*");
                self.expr(value);
            }
        }
        self.trailing(&arg.source.following_comments);
    }

    fn view(&mut self, element: &ViewElement) {
        let tag = element.tag.as_deref().unwrap_or("");
        self.emit("<");
        self.emit(tag);
        for prop in &element.props {
            self.emit(" ");
            self.ident(&prop.name);
            if let Some(value) = &prop.value {
                self.braced("={", |p| p.expr(value));
                self.emit("}");
            }
        }
        self.trailing(&element.closing_comments);
        match &element.children {
            None => {
                self.separate();
                self.emit("/>");
            }
            Some(children) => {
                self.emit(">");
                for child in children {
                    match child {
                        ViewChild::Text { text, .. } => self.emit(text),
                        ViewChild::Expr(expr) => {
                            self.braced("{", |p| p.expr(expr));
                            self.emit("}");
                        }
                        ViewChild::Element(expr) => self.expr(expr),
                    }
                }
                self.emit("</");
                self.emit(tag);
                self.emit(">");
            }
        }
    }

    fn operation(&mut self, operation: &Operation) {
        let op = operation.op;
        let (Some(first), second) = (operation.args.first(), operation.args.get(1)) else {
            return;
        };
        match op.fixity() {
            OperatorFixity::Prefix => {
                self.emit(if op == Operator::Not { "not " } else { op.symbol() });
                self.leading(&operation.following_operator_comments);
                let mark = self.out.len();
                self.operand(first, op, Side::Right);
                if self.out[mark..].starts_with('-') {
                    self.out.insert(mark, ' ');
                }
            }
            OperatorFixity::Infix => {
                self.same_line(|p| p.operand(first, op, Side::Left));
                self.separate();
                self.emit(op.symbol());
                self.emit(" ");
                self.leading(&operation.following_operator_comments);
                if let Some(second) = second {
                    self.operand(second, op, Side::Right);
                }
            }
            OperatorFixity::Postfix => {
                self.same_line(|p| p.operand(first, op, Side::Left));
                let Some(second) = second else {
                    return;
                };
                match op {
                    Operator::PropertyAccess | Operator::NullablePropertyAccess => {
                        self.emit(if op == Operator::PropertyAccess { "." } else { "?." });
                        self.leading(&second.source.preceding_comments);
                        match &second.kind {
                            ExprKind::PropertyName(name) | ExprKind::Reference(name) => {
                                self.emit(name);
                            }
                            _ => self.expr_body(second),
                        }
                        self.trailing(&second.source.following_comments);
                    }
                    Operator::Call => self.expr(second),
                    Operator::NullableCall => {
                        self.emit("?.");
                        self.expr(second);
                    }
                    Operator::Index | Operator::NullableIndex => {
                        self.emit(if op == Operator::Index { "[" } else { "?.[" });
                        self.expr(second);
                        self.emit("]");
                    }
                    _ => {}
                }
            }
        }
    }

    fn operand(&mut self, arg: &Expr, parent: Operator, side: Side) {
        if needs_parens(arg, parent, side) {
            self.parenthesized(arg);
        } else {
            self.expr(arg);
        }
    }

    // Types

    pub fn type_expr(&mut self, ty: &TypeExpr) {
        self.leading(&ty.source.preceding_comments);
        self.type_body(ty);
        self.trailing(&ty.source.following_comments);
    }

    fn type_body(&mut self, ty: &TypeExpr) {
        match &ty.kind {
            TypeExprKind::Null => self.emit("null"),
            TypeExprKind::Literal(value) => self.expr(value),
            TypeExprKind::Named { name, args } => {
                self.emit(name);
                if !args.is_empty() {
                    self.emit("(");
                    for (index, arg) in args.iter().enumerate() {
                        if index > 0 {
                            self.emit(", ");
                        }
                        self.type_arg(arg);
                    }
                    self.emit(")");
                }
            }
            TypeExprKind::Object(props) => {
                self.braced("{", |p| {
                    for (index, prop) in props.iter().enumerate() {
                        if index > 0 {
                            p.emit(", ");
                        }
                        match prop {
                            TypeProp::Named { name, ty } => {
                                p.ident(name);
                                p.emit(": ");
                                p.type_expr(ty);
                            }
                            TypeProp::Positional(ty) => p.type_expr(ty),
                        }
                    }
                });
                self.emit("}");
            }
            TypeExprKind::OneOf(types) => {
                for (index, member) in types.iter().enumerate() {
                    if index > 0 {
                        self.separate();
                        self.emit("| ");
                    }
                    self.type_operand(member);
                }
            }
            TypeExprKind::Optional(inner) => {
                self.same_line(|p| p.type_operand(inner));
                self.emit("?");
            }
            TypeExprKind::Formula {
                generics,
                args,
                return_type,
            } => {
                self.emit("fn");
                self.generics(generics);
                self.emit("(");
                self.formula_args(args);
                self.emit("): ");
                self.type_expr(return_type);
            }
        }
    }

    /// A member of `A | B` or the inner type of `T?`.
    fn type_operand(&mut self, ty: &TypeExpr) {
        if matches!(
            ty.kind,
            TypeExprKind::OneOf(_) | TypeExprKind::Formula { .. } | TypeExprKind::Optional(_)
        ) {
            self.leading(&ty.source.preceding_comments);
            self.emit("(");
            self.type_body(ty);
            self.emit(")");
            self.trailing(&ty.source.following_comments);
        } else {
            self.type_expr(ty);
        }
    }

    fn type_arg(&mut self, arg: &TypeArg) {
        match arg {
            TypeArg::Type(ty) => self.type_expr(ty),
            TypeArg::Comparison { op, value } => {
                self.emit(op.symbol());
                self.expr(value);
            }
            TypeArg::Range { op, start, stop } => {
                self.same_line(|p| p.expr(start));
                self.emit(op.symbol());
                self.expr(stop);
            }
            TypeArg::Regex(regex) => self.emit(&regex.to_code()),
            TypeArg::Names(names) => {
                self.emit("[");
                for (index, name) in names.iter().enumerate() {
                    if index > 0 {
                        self.emit(", ");
                    }
                    self.emit(&name.to_code());
                }
                self.emit("]");
            }
            TypeArg::Named { name, value } => {
                self.ident(name);
                self.emit(": ");
                self.type_arg(value);
            }
        }
    }

    // Modules

    pub fn module(&mut self, module: &Module) {
        for (index, item) in module.items.iter().enumerate() {
            if index > 0 {
                if !self.ends_line() {
                    self.newline();
                }
                self.newline();
            }
            self.item(item);
        }
        self.trailing(&module.trailing_comments);
        if !self.out.is_empty() && !self.ends_line() {
            self.newline();
        }
    }

    fn item(&mut self, item: &Item) {
        self.leading(&item.source.preceding_comments);
        match &item.kind {
            ItemKind::Import(import) => self.import(import),
            ItemKind::TypeAlias(def) => {
                self.emit("type ");
                self.ident(&def.name);
                self.generics(&def.generics);
                self.emit(" = ");
                self.type_expr(&def.ty);
            }
            ItemKind::Class(def) => self.class(def),
            ItemKind::Enum(def) => self.enum_def(def),
            ItemKind::State(def) => {
                self.emit("state @");
                self.ident(&def.name);
                if let Some(ty) = &def.type_annotation {
                    self.emit(": ");
                    self.type_expr(ty);
                }
                self.emit(" = ");
                self.expr(&def.value);
            }
            ItemKind::Action(def) => self.action(def),
            ItemKind::Helper(function) => self.named_function("helper ", function),
            ItemKind::View(function) => self.named_function("view ", function),
            ItemKind::Main(def) => {
                self.emit("main => ");
                self.expr(&def.body);
            }
        }
        self.trailing(&item.source.following_comments);
    }

    fn named_function(&mut self, keyword: &str, function: &FunctionExpr) {
        self.emit(keyword);
        if let Some(name) = &function.name {
            self.ident(name);
        }
        self.signature(function);
        self.emit(" => ");
        self.expr(&function.body);
    }

    fn import(&mut self, import: &ImportDef) {
        self.emit("import ");
        match &import.location {
            ImportLocation::Package(path) => self.emit(&path.join("/")),
            ImportLocation::File(path) => {
                let literal = crate::ast::StringLiteral {
                    value: path.clone(),
                    quote: crate::ast::Quote::Single,
                };
                self.emit(&literal.to_code());
            }
        }
        if let Some(alias) = &import.alias {
            self.emit(" as ");
            self.ident(alias);
        }
        if !import.names.is_empty() {
            self.emit(" : { ");
            for (index, name) in import.names.iter().enumerate() {
                if index > 0 {
                    self.emit(", ");
                }
                self.ident(&name.name);
                if let Some(alias) = &name.alias {
                    self.emit(" as ");
                    self.ident(alias);
                }
            }
            self.separate();
            self.emit("}");
        }
    }

    fn class(&mut self, def: &ClassDef) {
        if def.is_view {
            self.emit("view ");
        }
        self.emit("class ");
        self.ident(&def.name);
        self.generics(&def.generics);
        if let Some(parent) = &def.parent {
            self.emit(" extends ");
            self.ident(parent);
        }
        self.emit(" {");
        self.indent += 1;
        for member in &def.members {
            self.line();
            self.class_member(member);
        }
        self.trailing(&def.closing_comments);
        self.indent -= 1;
        self.line();
        self.emit("}");
    }

    fn class_member(&mut self, member: &ClassMember) {
        self.leading(&member.source.preceding_comments);
        match &member.kind {
            ClassMemberKind::Property {
                name,
                is_static,
                is_state,
                type_annotation,
                default,
            } => {
                if *is_static {
                    self.emit("static ");
                }
                if *is_state {
                    self.emit("@");
                }
                self.ident(name);
                if let Some(ty) = type_annotation {
                    self.emit(": ");
                    self.type_expr(ty);
                }
                if let Some(default) = default {
                    self.emit(" = ");
                    self.expr(default);
                }
            }
            ClassMemberKind::Formula(function) => match function.kind {
                FunctionKind::View => {
                    self.emit("render");
                    if !function.args.is_empty() || function.return_type.is_some() {
                        self.signature(function);
                    }
                    self.emit(" => ");
                    self.expr(&function.body);
                }
                FunctionKind::Static => self.named_function("static fn ", function),
                _ => self.named_function("fn ", function),
            },
        }
        self.trailing(&member.source.following_comments);
    }

    fn enum_def(&mut self, def: &EnumDef) {
        self.emit("enum ");
        self.ident(&def.name);
        self.generics(&def.generics);
        self.emit(" {");
        self.indent += 1;
        for member in &def.members {
            self.line();
            self.ident(&member.name);
            if !member.args.is_empty() {
                self.emit("(");
                self.formula_args(&member.args);
                self.emit(")");
            }
        }
        self.trailing(&def.closing_comments);
        self.indent -= 1;
        self.line();
        self.emit("}");
    }

    fn action(&mut self, def: &ActionDef) {
        self.emit("action ");
        self.ident(&def.name);
        self.emit("(");
        self.formula_args(&def.args);
        self.emit(") => ");
        if let [assignment] = def.assignments.as_slice() {
            self.emit("@");
            self.ident(&assignment.state);
            self.emit(" = ");
            self.expr(&assignment.value);
            return;
        }
        self.emit("{");
        self.indent += 1;
        for assignment in &def.assignments {
            self.line();
            self.emit("@");
            self.ident(&assignment.state);
            self.emit(" = ");
            self.expr(&assignment.value);
        }
        self.indent -= 1;
        self.line();
        self.emit("}");
    }
}

/// Nodes whose last part is an unbracketed expression: printing anything
/// after them would extend that expression.
fn is_open_ended(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Let(_) | ExprKind::If(_) | ExprKind::Function(_) => true,
        ExprKind::Operation(operation) => {
            matches!(operation.op, Operator::Call | Operator::NullableCall)
                && operation.args.get(1).is_some_and(|args| {
                    matches!(&args.kind, ExprKind::Arguments(list) if list.block_kind == BlockKind::Colon)
                })
        }
        _ => false,
    }
}

fn needs_parens(arg: &Expr, parent: Operator, side: Side) -> bool {
    if is_open_ended(arg) {
        return true;
    }
    let postfix_receiver = side == Side::Left && parent.fixity() == OperatorFixity::Postfix;
    match &arg.kind {
        ExprKind::Operation(child) => {
            let (child_prec, parent_prec) = (child.op.precedence(), parent.precedence());
            if child_prec != parent_prec {
                return child_prec < parent_prec;
            }
            if parent.fixity() == OperatorFixity::Postfix {
                return false;
            }
            matches!(
                (side, parent.associativity()),
                (Side::Left, Associativity::Right) | (Side::Right, Associativity::Left)
            )
        }
        ExprKind::Int(_) | ExprKind::Float(_) if postfix_receiver => true,
        ExprKind::Int(lit) => side == Side::Left && parent == Operator::Power && lit.value < 0,
        ExprKind::Float(lit) => {
            side == Side::Left && parent == Operator::Power && lit.value.is_sign_negative()
        }
        _ => false,
    }
}
