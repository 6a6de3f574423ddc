//! Tree walks.
//!
//! `CommentCollector` visits every comment slot in a tree. The parser's
//! tests use it to check that every comment in the input was attached
//! exactly once.

use crate::ast::{
    Argument, ArgumentKind, ArgumentsList, ClassMemberKind, Container, Entry, EntryKey, Expr,
    ExprKind, FormulaArg, FunctionExpr, Identifier, ItemKind, Module, Pattern, TemplatePart,
    TypeArg, TypeExpr, TypeExprKind, TypeProp, ViewChild,
};
use crate::{Comment, Source};

/// Gathers every comment attached anywhere in a tree.
#[derive(Default)]
pub struct CommentCollector<'a> {
    comments: Vec<&'a Comment>,
}

impl<'a> CommentCollector<'a> {
    pub fn new() -> Self {
        CommentCollector::default()
    }

    /// Comments in source order.
    pub fn finish(mut self) -> Vec<&'a Comment> {
        self.comments.sort_by_key(|comment| comment.span.start);
        self.comments
    }

    fn extend(&mut self, comments: &'a [Comment]) {
        self.comments.extend(comments.iter());
    }

    fn source(&mut self, source: &'a Source) {
        self.extend(&source.preceding_comments);
        self.extend(&source.following_comments);
    }

    fn identifier(&mut self, ident: &'a Identifier) {
        self.source(&ident.source);
    }

    pub fn expr(&mut self, expr: &'a Expr) {
        self.source(&expr.source);
        match &expr.kind {
            ExprKind::Null
            | ExprKind::Bool(_)
            | ExprKind::Int(_)
            | ExprKind::Float(_)
            | ExprKind::Str(_)
            | ExprKind::Regex(_)
            | ExprKind::Dice(_)
            | ExprKind::Reference(_)
            | ExprKind::StateReference(_)
            | ExprKind::This
            | ExprKind::PipePlaceholder
            | ExprKind::PropertyName(_) => {}
            ExprKind::Template(template) => {
                for part in &template.parts {
                    if let TemplatePart::Expr(inner) = part {
                        self.expr(inner);
                    }
                }
            }
            ExprKind::Array(container)
            | ExprKind::Set(container)
            | ExprKind::Dict(container)
            | ExprKind::Object(container) => self.container(container),
            ExprKind::Let(let_expr) => {
                for binding in &let_expr.bindings {
                    self.identifier(&binding.name);
                    if let Some(ty) = &binding.type_annotation {
                        self.type_expr(ty);
                    }
                    self.expr(&binding.value);
                }
                self.extend(&let_expr.in_comments);
                self.expr(&let_expr.body);
            }
            ExprKind::If(if_expr) => {
                for branch in &if_expr.branches {
                    self.expr(&branch.condition);
                    self.expr(&branch.body);
                }
                if let Some(body) = &if_expr.else_body {
                    self.expr(body);
                }
            }
            ExprKind::Switch(switch) => {
                self.expr(&switch.subject);
                for case in &switch.cases {
                    self.source(&case.source);
                    self.pattern(&case.pattern);
                    self.expr(&case.body);
                }
                if let Some(body) = &switch.else_body {
                    self.expr(body);
                }
                self.extend(&switch.closing_comments);
            }
            ExprKind::Function(function) => self.function(function),
            ExprKind::Arguments(args) => self.arguments(args),
            ExprKind::Type(ty) => self.type_expr(ty),
            ExprKind::View(element) => {
                for prop in &element.props {
                    self.identifier(&prop.name);
                    if let Some(value) = &prop.value {
                        self.expr(value);
                    }
                }
                self.extend(&element.closing_comments);
                for child in element.children.iter().flatten() {
                    match child {
                        ViewChild::Text { .. } => {}
                        ViewChild::Expr(inner) | ViewChild::Element(inner) => self.expr(inner),
                    }
                }
            }
            ExprKind::Operation(operation) => {
                for arg in &operation.args {
                    self.expr(arg);
                }
                self.extend(&operation.following_operator_comments);
            }
        }
    }

    fn container(&mut self, container: &'a Container) {
        for entry in &container.entries {
            self.entry(entry);
        }
        self.extend(&container.closing_comments);
    }

    fn entry(&mut self, entry: &'a Entry) {
        match entry {
            Entry::Value(value) => self.expr(value),
            Entry::Pair { key, value } => {
                match key {
                    EntryKey::Name(ident) => self.identifier(ident),
                    EntryKey::Literal(key) | EntryKey::Computed(key) => self.expr(key),
                }
                self.expr(value);
            }
            Entry::Spread { source, value } => {
                self.source(source);
                self.expr(value);
            }
            Entry::Inclusion {
                entry,
                condition,
                source,
            } => {
                self.source(source);
                self.entry(entry);
                self.expr(condition);
            }
        }
    }

    fn pattern(&mut self, pattern: &'a Pattern) {
        match pattern {
            Pattern::Wildcard(source) => self.source(source),
            Pattern::Binding(ident) => self.identifier(ident),
            Pattern::Value(value) => self.expr(value),
            Pattern::Type { binding, ty } => {
                if let Some(binding) = binding {
                    self.identifier(binding);
                }
                self.type_expr(ty);
            }
        }
    }

    fn function(&mut self, function: &'a FunctionExpr) {
        if let Some(name) = &function.name {
            self.identifier(name);
        }
        for generic in &function.generics {
            self.identifier(generic);
        }
        self.formula_args(&function.args);
        if let Some(ty) = &function.return_type {
            self.type_expr(ty);
        }
        self.expr(&function.body);
    }

    fn formula_args(&mut self, args: &'a [FormulaArg]) {
        for arg in args {
            self.identifier(&arg.name);
            if let Some(ty) = &arg.type_annotation {
                self.type_expr(ty);
            }
            if let Some(default) = &arg.default {
                self.expr(default);
            }
        }
    }

    fn arguments(&mut self, args: &'a ArgumentsList) {
        for arg in &args.parens {
            self.argument(arg);
        }
        self.extend(&args.last_parens_comments);
        for arg in &args.block {
            self.argument(arg);
        }
        self.extend(&args.block_comments);
    }

    fn argument(&mut self, arg: &'a Argument) {
        self.source(&arg.source);
        match &arg.kind {
            ArgumentKind::Positional(value)
            | ArgumentKind::SpreadPositional(value)
            | ArgumentKind::KwargsList(value) => self.expr(value),
            ArgumentKind::Named { name, value } => {
                self.identifier(name);
                self.expr(value);
            }
            ArgumentKind::RepeatedNamed { name, values } => {
                self.identifier(name);
                self.expr(values);
            }
        }
    }

    pub fn type_expr(&mut self, ty: &'a TypeExpr) {
        self.source(&ty.source);
        match &ty.kind {
            TypeExprKind::Null => {}
            TypeExprKind::Literal(value) => self.expr(value),
            TypeExprKind::Named { args, .. } => {
                for arg in args {
                    self.type_arg(arg);
                }
            }
            TypeExprKind::Object(props) => {
                for prop in props {
                    match prop {
                        TypeProp::Named { name, ty } => {
                            self.identifier(name);
                            self.type_expr(ty);
                        }
                        TypeProp::Positional(ty) => self.type_expr(ty),
                    }
                }
            }
            TypeExprKind::OneOf(types) => {
                for ty in types {
                    self.type_expr(ty);
                }
            }
            TypeExprKind::Optional(inner) => self.type_expr(inner),
            TypeExprKind::Formula {
                generics,
                args,
                return_type,
            } => {
                for generic in generics {
                    self.identifier(generic);
                }
                self.formula_args(args);
                self.type_expr(return_type);
            }
        }
    }

    fn type_arg(&mut self, arg: &'a TypeArg) {
        match arg {
            TypeArg::Type(ty) => self.type_expr(ty),
            TypeArg::Comparison { value, .. } => self.expr(value),
            TypeArg::Range { start, stop, .. } => {
                self.expr(start);
                self.expr(stop);
            }
            TypeArg::Regex(_) | TypeArg::Names(_) => {}
            TypeArg::Named { name, value } => {
                self.identifier(name);
                self.type_arg(value);
            }
        }
    }

    pub fn module(&mut self, module: &'a Module) {
        for item in &module.items {
            self.source(&item.source);
            match &item.kind {
                ItemKind::Import(import) => {
                    if let Some(alias) = &import.alias {
                        self.identifier(alias);
                    }
                    for name in &import.names {
                        self.identifier(&name.name);
                        if let Some(alias) = &name.alias {
                            self.identifier(alias);
                        }
                    }
                }
                ItemKind::TypeAlias(def) => {
                    self.identifier(&def.name);
                    for generic in &def.generics {
                        self.identifier(generic);
                    }
                    self.type_expr(&def.ty);
                }
                ItemKind::Class(def) => {
                    self.identifier(&def.name);
                    for generic in &def.generics {
                        self.identifier(generic);
                    }
                    if let Some(parent) = &def.parent {
                        self.identifier(parent);
                    }
                    for member in &def.members {
                        self.source(&member.source);
                        match &member.kind {
                            ClassMemberKind::Property {
                                name,
                                type_annotation,
                                default,
                                ..
                            } => {
                                self.identifier(name);
                                if let Some(ty) = type_annotation {
                                    self.type_expr(ty);
                                }
                                if let Some(default) = default {
                                    self.expr(default);
                                }
                            }
                            ClassMemberKind::Formula(function) => self.function(function),
                        }
                    }
                    self.extend(&def.closing_comments);
                }
                ItemKind::Enum(def) => {
                    self.identifier(&def.name);
                    for generic in &def.generics {
                        self.identifier(generic);
                    }
                    for member in &def.members {
                        self.identifier(&member.name);
                        self.formula_args(&member.args);
                    }
                    self.extend(&def.closing_comments);
                }
                ItemKind::State(def) => {
                    self.identifier(&def.name);
                    if let Some(ty) = &def.type_annotation {
                        self.type_expr(ty);
                    }
                    self.expr(&def.value);
                }
                ItemKind::Action(def) => {
                    self.identifier(&def.name);
                    self.formula_args(&def.args);
                    for assignment in &def.assignments {
                        self.identifier(&assignment.state);
                        self.expr(&assignment.value);
                    }
                }
                ItemKind::Helper(function) | ItemKind::View(function) => self.function(function),
                ItemKind::Main(def) => self.expr(&def.body),
            }
        }
        self.extend(&module.trailing_comments);
    }
}

impl Expr {
    /// Every comment attached within this expression, in source order.
    pub fn comments(&self) -> Vec<&Comment> {
        let mut collector = CommentCollector::new();
        collector.expr(self);
        collector.finish()
    }
}

impl Module {
    /// Every comment attached within this module, in source order.
    pub fn comments(&self) -> Vec<&Comment> {
        let mut collector = CommentCollector::new();
        collector.module(self);
        collector.finish()
    }
}

impl TypeExpr {
    pub fn comments(&self) -> Vec<&Comment> {
        let mut collector = CommentCollector::new();
        collector.type_expr(self);
        collector.finish()
    }
}
