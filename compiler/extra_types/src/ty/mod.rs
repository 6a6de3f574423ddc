//! The type lattice.
//!
//! `Type` is a closed sum over every kind of type the checker reasons
//! about: the three special types (`never`, `all`, `always`), primitives,
//! literal singletons, narrowed numbers/strings/collections, objects,
//! classes, enums, one-of unions, generics and formulas.
//!
//! Types are immutable values. Class, enum and formula types are behind
//! `Arc` so they can be shared freely; everything else is cheap to clone.
//!
//! # Normalization
//!
//! Narrowed constructors ([`Type::int`], [`Type::float`], [`Type::string`])
//! turn an empty range into `never` and a single-point range into the
//! matching literal. [`Type::one_of`] (in `join`) removes duplicates and
//! merges joinable members.

mod display;
mod range;

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

pub use extra_ir::FormulaArgKind;
pub use range::{Bound, LengthRange, NumberRange};

pub(crate) use range::format_number;

/// A static type.
#[derive(Clone, Debug, PartialEq)]
pub enum Type {
    /// No value has this type.
    Never,
    /// Top: accepts anything, never itself assignable.
    All,
    /// Identity of joins: assignable to and from anything.
    Always,
    Null,
    Boolean,
    Int(NumberRange),
    Float(NumberRange),
    String(StringType),
    Regex,
    View,
    /// `Range(Int)`, `Range(Float)`
    Range(Box<Type>),
    Literal(Literal),
    Array(Box<CollectionType>),
    Dict(Box<DictType>),
    Set(Box<CollectionType>),
    /// Objects and tuples: ordered named/positional props.
    Object(ObjectType),
    Class(Arc<ClassType>),
    Enum(Arc<EnumType>),
    /// Normalized union; see [`Type::one_of`].
    OneOf(Vec<Type>),
    /// `T | null`
    Optional(Box<Type>),
    Generic(GenericType),
    Formula(Arc<FormulaType>),
}

/// A literal singleton type: exactly one value.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Boolean(bool),
    Int(i64),
    Float(f64),
    String(String),
    Regex(RegexPattern),
}

/// `/pattern/flags`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RegexPattern {
    pub pattern: String,
    pub flags: String,
}

impl RegexPattern {
    pub fn new(pattern: impl Into<String>, flags: impl Into<String>) -> Self {
        RegexPattern {
            pattern: pattern.into(),
            flags: flags.into(),
        }
    }

    /// Compile with the flags the `regex` crate understands inline
    /// (`i`, `m`, `s`, `u`, `x`); `g` and `y` do not change matching.
    pub fn compile(&self) -> Result<regex::Regex, regex::Error> {
        let inline: String = self
            .flags
            .chars()
            .filter(|flag| matches!(flag, 'i' | 'm' | 's' | 'u' | 'x'))
            .collect();
        if inline.is_empty() {
            regex::Regex::new(&self.pattern)
        } else {
            regex::Regex::new(&format!("(?{inline}){}", self.pattern))
        }
    }

    /// An invalid pattern matches nothing.
    pub fn is_match(&self, text: &str) -> bool {
        self.compile().is_ok_and(|regex| regex.is_match(text))
    }
}

/// A narrowed `String`.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct StringType {
    pub length: LengthRange,
    /// Every pattern must match.
    pub regexes: Vec<RegexPattern>,
}

/// `Array(T)` and `Set(T)`.
#[derive(Clone, Debug, PartialEq)]
pub struct CollectionType {
    pub element: Type,
    pub length: LengthRange,
}

/// `Dict(T, keys: […])`
#[derive(Clone, Debug, PartialEq)]
pub struct DictType {
    pub value: Type,
    pub length: LengthRange,
    /// Key names known to be present.
    pub keys: BTreeSet<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ObjectType {
    /// Set for named object types (an enum's namespace, a type alias).
    pub name: Option<String>,
    pub props: Vec<ObjectProp>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ObjectProp {
    /// `None` for positional (tuple) props.
    pub name: Option<String>,
    pub ty: Type,
}

impl ObjectType {
    pub fn new(props: Vec<ObjectProp>) -> Self {
        ObjectType { name: None, props }
    }

    pub fn named_prop(&self, name: &str) -> Option<&Type> {
        self.props
            .iter()
            .find(|prop| prop.name.as_deref() == Some(name))
            .map(|prop| &prop.ty)
    }

    pub fn positional_prop(&self, index: usize) -> Option<&Type> {
        self.props
            .iter()
            .filter(|prop| prop.name.is_none())
            .nth(index)
            .map(|prop| &prop.ty)
    }

    pub fn positional_count(&self) -> usize {
        self.props.iter().filter(|prop| prop.name.is_none()).count()
    }
}

impl ObjectProp {
    pub fn named(name: impl Into<String>, ty: Type) -> Self {
        ObjectProp {
            name: Some(name.into()),
            ty,
        }
    }

    pub fn positional(ty: Type) -> Self {
        ObjectProp { name: None, ty }
    }
}

/// A class with its inherited props already merged in.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassType {
    pub name: String,
    /// Type arguments applied to a generic class (`Box(Int)`).
    pub args: Vec<Type>,
    pub parent: Option<Arc<ClassType>>,
    /// Instance props (state props and formulas included), parent's first.
    pub props: Vec<ClassProp>,
    pub statics: Vec<ClassProp>,
    pub is_view: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClassProp {
    pub name: String,
    pub ty: Type,
    pub is_state: bool,
    pub has_default: bool,
}

impl ClassProp {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        ClassProp {
            name: name.into(),
            ty,
            is_state: false,
            has_default: false,
        }
    }
}

impl ClassType {
    /// Build a class, flattening the parent's props into it. An override
    /// whose type cannot be assigned to the inherited one is dropped in
    /// favor of the parent's prop.
    pub fn new(
        name: impl Into<String>,
        parent: Option<Arc<ClassType>>,
        own_props: Vec<ClassProp>,
        statics: Vec<ClassProp>,
        is_view: bool,
    ) -> Self {
        let mut props = Vec::with_capacity(own_props.len());
        let mut own_props = own_props;
        if let Some(parent) = &parent {
            for inherited in &parent.props {
                let overriding = own_props.iter().position(|prop| prop.name == inherited.name);
                match overriding {
                    Some(index)
                        if crate::can_be_assigned_to(&own_props[index].ty, &inherited.ty) =>
                    {
                        props.push(own_props.remove(index));
                    }
                    Some(index) => {
                        own_props.remove(index);
                        props.push(inherited.clone());
                    }
                    None => props.push(inherited.clone()),
                }
            }
        }
        props.extend(own_props);
        ClassType {
            name: name.into(),
            args: Vec::new(),
            parent,
            props,
            statics,
            is_view,
        }
    }

    pub fn prop(&self, name: &str) -> Option<&ClassProp> {
        self.props.iter().find(|prop| prop.name == name)
    }

    pub fn static_prop(&self, name: &str) -> Option<&ClassProp> {
        self.statics.iter().find(|prop| prop.name == name)
    }

    /// `true` if `self` is `ancestor` or inherits from it.
    pub fn is_or_extends(&self, ancestor: &ClassType) -> bool {
        let mut current = Some(self);
        while let Some(class) = current {
            if class.name == ancestor.name {
                return true;
            }
            current = class.parent.as_deref();
        }
        false
    }

    /// Constructor arguments: every non-formula instance prop, by name.
    pub fn constructor(self: &Arc<Self>) -> FormulaType {
        let args = self
            .props
            .iter()
            .filter(|prop| !matches!(prop.ty, Type::Formula(_)))
            .map(|prop| FormulaArgType {
                kind: FormulaArgKind::Named,
                name: prop.name.clone(),
                ty: prop.ty.clone(),
                required: !prop.has_default && !prop.ty.accepts_null(),
            })
            .collect();
        FormulaType::new(args, Type::Class(Arc::clone(self)))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnumType {
    pub name: String,
    pub members: Vec<EnumMemberType>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnumMemberType {
    pub name: String,
    pub args: Vec<FormulaArgType>,
}

/// Identity of a generic type variable; hints and requirements are keyed
/// by it during a resolution pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GenericId(u32);

static NEXT_GENERIC: AtomicU32 = AtomicU32::new(0);

impl GenericId {
    pub fn fresh() -> Self {
        GenericId(NEXT_GENERIC.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GenericType {
    pub id: GenericId,
    pub name: String,
}

impl GenericType {
    pub fn fresh(name: impl Into<String>) -> Self {
        GenericType {
            id: GenericId::fresh(),
            name: name.into(),
        }
    }
}

/// A function type.
#[derive(Clone, Debug, PartialEq)]
pub struct FormulaType {
    pub generics: Vec<GenericType>,
    pub args: Vec<FormulaArgType>,
    pub returns: Type,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FormulaArgType {
    pub kind: FormulaArgKind,
    /// The argument's name; positional arguments use it as an alias.
    pub name: String,
    pub ty: Type,
    pub required: bool,
}

impl FormulaArgType {
    pub fn positional(name: impl Into<String>, ty: Type) -> Self {
        FormulaArgType {
            kind: FormulaArgKind::Positional,
            name: name.into(),
            ty,
            required: true,
        }
    }

    pub fn named(name: impl Into<String>, ty: Type) -> Self {
        FormulaArgType {
            kind: FormulaArgKind::Named,
            name: name.into(),
            ty,
            required: true,
        }
    }

    pub fn of_kind(kind: FormulaArgKind, name: impl Into<String>, ty: Type) -> Self {
        FormulaArgType {
            kind,
            name: name.into(),
            ty,
            required: matches!(kind, FormulaArgKind::Positional | FormulaArgKind::Named),
        }
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

impl FormulaType {
    pub fn new(args: Vec<FormulaArgType>, returns: Type) -> Self {
        FormulaType {
            generics: Vec::new(),
            args,
            returns,
        }
    }

    #[must_use]
    pub fn with_generics(mut self, generics: Vec<GenericType>) -> Self {
        self.generics = generics;
        self
    }

    pub fn positional_args(&self) -> impl Iterator<Item = &FormulaArgType> {
        self.args
            .iter()
            .filter(|arg| arg.kind == FormulaArgKind::Positional)
    }

    pub fn arg_of_kind(&self, kind: FormulaArgKind) -> Option<&FormulaArgType> {
        self.args.iter().find(|arg| arg.kind == kind)
    }
}

impl Type {
    pub const INT: Type = Type::Int(NumberRange::ANY);
    pub const FLOAT: Type = Type::Float(NumberRange::ANY);
    pub const STRING: Type = Type::String(StringType {
        length: LengthRange::ANY,
        regexes: Vec::new(),
    });

    /// A narrowed `Int`; empty ranges are `never`, single points literals.
    pub fn int(range: NumberRange) -> Type {
        let range = range.to_int();
        if range.is_empty() {
            Type::Never
        } else if let Some(value) = range.single_value() {
            Type::Literal(Literal::Int(value as i64))
        } else {
            Type::Int(range)
        }
    }

    pub fn float(range: NumberRange) -> Type {
        if range.is_empty() {
            Type::Never
        } else if let Some(value) = range.single_value() {
            Type::Literal(Literal::Float(value))
        } else {
            Type::Float(range)
        }
    }

    /// A narrowed `String`; a string of length zero is the literal `''`.
    pub fn string(narrowed: StringType) -> Type {
        if narrowed.length.is_empty() {
            Type::Never
        } else if narrowed.length.max == Some(0) {
            let empty = Literal::String(String::new());
            if narrowed.regexes.iter().all(|re| re.is_match("")) {
                Type::Literal(empty)
            } else {
                Type::Never
            }
        } else {
            Type::String(narrowed)
        }
    }

    pub fn array(element: Type) -> Type {
        Type::array_with_length(element, LengthRange::ANY)
    }

    pub fn array_with_length(element: Type, length: LengthRange) -> Type {
        if length.is_empty() {
            return Type::Never;
        }
        Type::Array(Box::new(CollectionType { element, length }))
    }

    pub fn set(element: Type) -> Type {
        Type::set_with_length(element, LengthRange::ANY)
    }

    pub fn set_with_length(element: Type, length: LengthRange) -> Type {
        if length.is_empty() {
            return Type::Never;
        }
        Type::Set(Box::new(CollectionType { element, length }))
    }

    pub fn dict(value: Type) -> Type {
        Type::dict_with(value, LengthRange::ANY, BTreeSet::new())
    }

    pub fn dict_with(value: Type, length: LengthRange, keys: BTreeSet<String>) -> Type {
        let length = length.intersect(&LengthRange::at_least(keys.len()));
        if length.is_empty() {
            return Type::Never;
        }
        Type::Dict(Box::new(DictType {
            value,
            length,
            keys,
        }))
    }

    pub fn range(element: Type) -> Type {
        Type::Range(Box::new(element))
    }

    pub fn object(props: Vec<ObjectProp>) -> Type {
        Type::Object(ObjectType::new(props))
    }

    pub fn formula(formula: FormulaType) -> Type {
        Type::Formula(Arc::new(formula))
    }

    pub fn literal_int(value: i64) -> Type {
        Type::Literal(Literal::Int(value))
    }

    pub fn literal_float(value: f64) -> Type {
        Type::Literal(Literal::Float(value))
    }

    pub fn literal_string(value: impl Into<String>) -> Type {
        Type::Literal(Literal::String(value.into()))
    }

    pub fn literal_bool(value: bool) -> Type {
        Type::Literal(Literal::Boolean(value))
    }

    /// `T | null`
    pub fn optional(inner: Type) -> Type {
        Type::one_of(vec![inner, Type::Null])
    }

    pub fn is_never(&self) -> bool {
        matches!(self, Type::Never)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Type::Null)
    }

    /// `true` if `null` is one of the values.
    pub fn accepts_null(&self) -> bool {
        match self {
            Type::Null | Type::Optional(_) | Type::Always | Type::All => true,
            Type::OneOf(members) => members.iter().any(Type::accepts_null),
            _ => false,
        }
    }

    /// The members of a union, or the type itself.
    pub fn variants(&self) -> Vec<Type> {
        match self {
            Type::OneOf(members) => members.clone(),
            Type::Optional(inner) => vec![(**inner).clone(), Type::Null],
            other => vec![other.clone()],
        }
    }

    /// The type without `null`.
    #[must_use]
    pub fn non_null(&self) -> Type {
        match self {
            Type::Null => Type::Never,
            Type::Optional(inner) => (**inner).clone(),
            Type::OneOf(members) => {
                Type::one_of(members.iter().filter(|ty| !ty.is_null()).cloned().collect())
            }
            other => other.clone(),
        }
    }

    /// Numeric bounds of `Int`/`Float`/numeric literals, with whether the
    /// type is a float.
    pub fn number_range(&self) -> Option<(NumberRange, bool)> {
        match self {
            Type::Int(range) => Some((*range, false)),
            Type::Float(range) => Some((*range, true)),
            Type::Literal(Literal::Int(value)) => Some((NumberRange::exactly(*value as f64), false)),
            Type::Literal(Literal::Float(value)) => Some((NumberRange::exactly(*value), true)),
            _ => None,
        }
    }

    /// Length bounds of strings and collections.
    pub fn length_range(&self) -> Option<LengthRange> {
        match self {
            Type::String(narrowed) => Some(narrowed.length),
            Type::Literal(Literal::String(value)) => {
                Some(LengthRange::exactly(value.chars().count()))
            }
            Type::Array(array) | Type::Set(array) => Some(array.length),
            Type::Dict(dict) => Some(dict.length),
            _ => None,
        }
    }

    /// `true` if an unresolved generic appears anywhere inside.
    pub fn contains_generic(&self) -> bool {
        match self {
            Type::Generic(_) => true,
            Type::Range(inner) | Type::Optional(inner) => inner.contains_generic(),
            Type::Array(array) | Type::Set(array) => array.element.contains_generic(),
            Type::Dict(dict) => dict.value.contains_generic(),
            Type::Object(object) => object.props.iter().any(|prop| prop.ty.contains_generic()),
            Type::Class(class) => class.args.iter().any(Type::contains_generic),
            Type::OneOf(members) => members.iter().any(Type::contains_generic),
            Type::Formula(formula) => {
                formula.returns.contains_generic()
                    || formula.args.iter().any(|arg| arg.ty.contains_generic())
            }
            _ => false,
        }
    }

    /// Replace generics for which `lookup` has a type.
    #[must_use]
    pub fn substitute(&self, lookup: &dyn Fn(&GenericType) -> Option<Type>) -> Type {
        match self {
            Type::Generic(generic) => lookup(generic).unwrap_or_else(|| self.clone()),
            Type::Range(inner) => Type::range(inner.substitute(lookup)),
            Type::Optional(inner) => Type::optional(inner.substitute(lookup)),
            Type::OneOf(members) => {
                Type::one_of(members.iter().map(|ty| ty.substitute(lookup)).collect())
            }
            Type::Array(array) => {
                Type::array_with_length(array.element.substitute(lookup), array.length)
            }
            Type::Set(set) => Type::set_with_length(set.element.substitute(lookup), set.length),
            Type::Dict(dict) => {
                Type::dict_with(dict.value.substitute(lookup), dict.length, dict.keys.clone())
            }
            Type::Object(object) => Type::Object(ObjectType {
                name: object.name.clone(),
                props: object
                    .props
                    .iter()
                    .map(|prop| ObjectProp {
                        name: prop.name.clone(),
                        ty: prop.ty.substitute(lookup),
                    })
                    .collect(),
            }),
            Type::Class(class) if class.args.iter().any(Type::contains_generic) => {
                let substitute_props = |props: &[ClassProp]| {
                    props
                        .iter()
                        .map(|prop| ClassProp {
                            ty: prop.ty.substitute(lookup),
                            ..prop.clone()
                        })
                        .collect()
                };
                Type::Class(Arc::new(ClassType {
                    args: class.args.iter().map(|ty| ty.substitute(lookup)).collect(),
                    props: substitute_props(&class.props),
                    statics: substitute_props(&class.statics),
                    ..(**class).clone()
                }))
            }
            Type::Formula(formula) => {
                // A formula's own generics shadow outer ones.
                let own = |generic: &GenericType| {
                    if formula.generics.contains(generic) {
                        None
                    } else {
                        lookup(generic)
                    }
                };
                Type::formula(FormulaType {
                    generics: formula.generics.clone(),
                    args: formula
                        .args
                        .iter()
                        .map(|arg| FormulaArgType {
                            ty: arg.ty.substitute(&own),
                            ..arg.clone()
                        })
                        .collect(),
                    returns: formula.returns.substitute(&own),
                })
            }
            _ => self.clone(),
        }
    }

    /// The element type produced by iterating or spreading this type.
    pub fn element_type(&self) -> Option<Type> {
        match self {
            Type::Array(array) | Type::Set(array) => Some(array.element.clone()),
            Type::Range(element) => Some((**element).clone()),
            Type::Dict(dict) => Some(dict.value.clone()),
            Type::Always => Some(Type::Always),
            _ => None,
        }
    }
}

impl Literal {
    /// The unnarrowed type of the literal's value.
    pub fn base_type(&self) -> Type {
        match self {
            Literal::Boolean(_) => Type::Boolean,
            Literal::Int(_) => Type::INT,
            Literal::Float(_) => Type::FLOAT,
            Literal::String(_) => Type::STRING,
            Literal::Regex(_) => Type::Regex,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Literal::Int(value) => Some(*value as f64),
            Literal::Float(value) => Some(*value),
            _ => None,
        }
    }
}
