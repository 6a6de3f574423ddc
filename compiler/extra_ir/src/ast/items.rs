//! Module-level declarations.

use super::{Expr, FormulaArg, FunctionExpr, Identifier, TypeExpr};
use crate::{Comment, Source};

/// A parsed module: its declarations in source order.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Module {
    pub items: Vec<Item>,
    /// Comments after the last declaration.
    pub trailing_comments: Vec<Comment>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    pub source: Source,
    pub kind: ItemKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ItemKind {
    Import(ImportDef),
    TypeAlias(TypeAliasDef),
    Class(ClassDef),
    Enum(EnumDef),
    State(StateDef),
    Action(ActionDef),
    /// `helper name(…) => …`
    Helper(FunctionExpr),
    /// `view Name(…) => <…>`
    View(FunctionExpr),
    Main(MainDef),
}

impl ItemKind {
    /// Declared name, for the declarations that have one.
    pub fn name(&self) -> Option<&str> {
        match self {
            ItemKind::Import(_) | ItemKind::Main(_) => None,
            ItemKind::TypeAlias(def) => Some(&def.name.name),
            ItemKind::Class(def) => Some(&def.name.name),
            ItemKind::Enum(def) => Some(&def.name.name),
            ItemKind::State(def) => Some(&def.name.name),
            ItemKind::Action(def) => Some(&def.name.name),
            ItemKind::Helper(def) | ItemKind::View(def) => def.name.as_ref().map(|n| n.as_str()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImportLocation {
    /// `import Foo/Bar`
    Package(Vec<String>),
    /// `import 'relative/file'`
    File(String),
}

/// `import Location as Alias : { a, b as c }`
#[derive(Clone, Debug, PartialEq)]
pub struct ImportDef {
    pub location: ImportLocation,
    pub alias: Option<Identifier>,
    pub names: Vec<ImportName>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImportName {
    pub name: Identifier,
    pub alias: Option<Identifier>,
}

/// `type Name<T> = Type`
#[derive(Clone, Debug, PartialEq)]
pub struct TypeAliasDef {
    pub name: Identifier,
    pub generics: Vec<Identifier>,
    pub ty: TypeExpr,
}

/// `class Name<T> extends Parent { … }` and `view class Name { … }`.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassDef {
    pub name: Identifier,
    pub generics: Vec<Identifier>,
    pub parent: Option<Identifier>,
    pub is_view: bool,
    pub members: Vec<ClassMember>,
    pub closing_comments: Vec<Comment>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClassMember {
    pub source: Source,
    pub kind: ClassMemberKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ClassMemberKind {
    /// `name: Type = default`, `@name: …`, `static name: …`
    Property {
        name: Identifier,
        is_static: bool,
        is_state: bool,
        type_annotation: Option<TypeExpr>,
        default: Option<Expr>,
    },
    /// `fn name(…)`, `static fn name(…)`, `render => …`
    Formula(FunctionExpr),
}

/// `enum Name { a, b(#x: Int) }`
#[derive(Clone, Debug, PartialEq)]
pub struct EnumDef {
    pub name: Identifier,
    pub generics: Vec<Identifier>,
    pub members: Vec<EnumMember>,
    pub closing_comments: Vec<Comment>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnumMember {
    pub name: Identifier,
    pub args: Vec<FormulaArg>,
}

/// `state @name: Type = value`
#[derive(Clone, Debug, PartialEq)]
pub struct StateDef {
    pub name: Identifier,
    pub type_annotation: Option<TypeExpr>,
    pub value: Expr,
}

/// `action name(args) => @x = value`
#[derive(Clone, Debug, PartialEq)]
pub struct ActionDef {
    pub name: Identifier,
    pub args: Vec<FormulaArg>,
    pub assignments: Vec<StateAssignment>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StateAssignment {
    pub state: Identifier,
    pub value: Expr,
}

/// `main => body`
#[derive(Clone, Debug, PartialEq)]
pub struct MainDef {
    pub body: Expr,
}
