//! Types printed in the syntax of type expressions.

use std::fmt;

use super::{FormulaType, Literal, Type};

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Never => f.write_str("never"),
            Type::All => f.write_str("all"),
            Type::Always => f.write_str("always"),
            Type::Null => f.write_str("null"),
            Type::Boolean => f.write_str("Boolean"),
            Type::Int(range) => write_with_args(f, "Int", range.type_args()),
            Type::Float(range) => write_with_args(f, "Float", range.type_args()),
            Type::String(narrowed) => {
                let mut args: Vec<String> = narrowed
                    .regexes
                    .iter()
                    .map(|re| format!("/{}/{}", re.pattern, re.flags))
                    .collect();
                args.extend(narrowed.length.type_arg());
                write_args(f, "String", &args)
            }
            Type::Regex => f.write_str("Regex"),
            Type::View => f.write_str("View"),
            Type::Range(element) => write!(f, "Range({element})"),
            Type::Literal(literal) => write!(f, "{literal}"),
            Type::Array(array) => {
                let mut args = vec![array.element.to_string()];
                args.extend(array.length.type_arg());
                write_args(f, "Array", &args)
            }
            Type::Set(set) => {
                let mut args = vec![set.element.to_string()];
                args.extend(set.length.type_arg());
                write_args(f, "Set", &args)
            }
            Type::Dict(dict) => {
                let mut args = vec![dict.value.to_string()];
                if !dict.keys.is_empty() {
                    let keys: Vec<String> = dict.keys.iter().map(|key| quote(key)).collect();
                    args.push(format!("keys: [{}]", keys.join(", ")));
                }
                let implied = super::LengthRange::at_least(dict.keys.len());
                if dict.length != implied {
                    args.extend(dict.length.type_arg());
                }
                write_args(f, "Dict", &args)
            }
            Type::Object(object) => {
                if let Some(name) = &object.name {
                    return f.write_str(name);
                }
                f.write_str("{")?;
                for (index, prop) in object.props.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    match &prop.name {
                        Some(name) => write!(f, "{name}: {}", prop.ty)?,
                        None => write!(f, "{}", prop.ty)?,
                    }
                }
                f.write_str("}")
            }
            Type::Class(class) => {
                let args: Vec<String> = class.args.iter().map(ToString::to_string).collect();
                write_args(f, &class.name, &args)
            }
            Type::Enum(def) => f.write_str(&def.name),
            Type::OneOf(members) => {
                for (index, member) in members.iter().enumerate() {
                    if index > 0 {
                        f.write_str(" | ")?;
                    }
                    write_member(f, member)?;
                }
                Ok(())
            }
            Type::Optional(inner) => match **inner {
                Type::OneOf(_) | Type::Formula(_) => write!(f, "({inner})?"),
                _ => write!(f, "{inner}?"),
            },
            Type::Generic(generic) => f.write_str(&generic.name),
            Type::Formula(formula) => write!(f, "{formula}"),
        }
    }
}

impl fmt::Display for FormulaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("fn")?;
        if !self.generics.is_empty() {
            let names: Vec<&str> = self.generics.iter().map(|g| g.name.as_str()).collect();
            write!(f, "<{}>", names.join(", "))?;
        }
        f.write_str("(")?;
        for (index, arg) in self.args.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            let optional = if arg.required { "" } else { "?" };
            write!(f, "{}{}{optional}: {}", arg.kind.prefix(), arg.name, arg.ty)?;
        }
        write!(f, "): {}", self.returns)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Boolean(value) => write!(f, "{value}"),
            Literal::Int(value) => write!(f, "{value}"),
            Literal::Float(value) if value.fract() == 0.0 && value.is_finite() => {
                write!(f, "{value:.1}")
            }
            Literal::Float(value) => write!(f, "{value}"),
            Literal::String(value) => f.write_str(&quote(value)),
            Literal::Regex(re) => write!(f, "/{}/{}", re.pattern, re.flags),
        }
    }
}

fn quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

fn write_member(f: &mut fmt::Formatter<'_>, member: &Type) -> fmt::Result {
    match member {
        Type::Formula(_) => write!(f, "({member})"),
        _ => write!(f, "{member}"),
    }
}

fn write_with_args(f: &mut fmt::Formatter<'_>, name: &str, args: Option<String>) -> fmt::Result {
    match args {
        Some(args) => write!(f, "{name}({args})"),
        None => f.write_str(name),
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, name: &str, args: &[String]) -> fmt::Result {
    if args.is_empty() {
        f.write_str(name)
    } else {
        write!(f, "{name}({})", args.join(", "))
    }
}

