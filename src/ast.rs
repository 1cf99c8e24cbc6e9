//! Type literals and operation kinds, and their conversion from the syntax
//! tree of [`graphql_parser`].

use std::fmt;

use arcstr::ArcStr;
use graphql_parser::query::{self as syntax, Value};
use serde::{Deserialize, Serialize};

/// A type literal, as written in a schema or in a variable definition.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Type {
    /// A nullable named type, e.g. `String`.
    Named(ArcStr),
    /// A nullable list type, e.g. `[String]`.
    ///
    /// The list itself is what's nullable, the contained type might be non-null.
    List(Box<Type>),
    /// A non-null named type, e.g. `String!`.
    NonNullNamed(ArcStr),
    /// A non-null list type, e.g. `[String]!`.
    ///
    /// The list itself is what's non-null, the contained type might be null.
    NonNullList(Box<Type>),
}

/// Kind of a GraphQL operation, selecting the root type it executes against.
#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    Query,
    Mutation,
    Subscription,
}

impl Type {
    /// Get the name of a named type.
    ///
    /// Only applies to named types; lists will return `None`.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named(n) | Self::NonNullNamed(n) => Some(n),
            Self::List(_) | Self::NonNullList(_) => None,
        }
    }

    /// Get the innermost name by unpacking lists.
    ///
    /// All type literals contain exactly one named type.
    pub fn innermost_name(&self) -> &str {
        match self {
            Self::Named(n) | Self::NonNullNamed(n) => n,
            Self::List(l) | Self::NonNullList(l) => l.innermost_name(),
        }
    }

    /// Determines if a type only can represent non-null values.
    pub fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNullNamed(_) | Self::NonNullList(_))
    }

    /// Makes this type non-null. Already non-null types are returned as is.
    #[must_use]
    pub fn non_null(self) -> Self {
        match self {
            Self::Named(n) => Self::NonNullNamed(n),
            Self::List(l) => Self::NonNullList(l),
            t => t,
        }
    }
}

impl From<&syntax::Type<'_, String>> for Type {
    fn from(ty: &syntax::Type<'_, String>) -> Self {
        match ty {
            syntax::Type::NamedType(name) => Self::Named(name.as_str().into()),
            syntax::Type::ListType(item) => Self::List(Box::new(item.as_ref().into())),
            syntax::Type::NonNullType(inner) => Self::from(inner.as_ref()).non_null(),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(n) => write!(f, "{n}"),
            Self::NonNullNamed(n) => write!(f, "{n}!"),
            Self::List(t) => write!(f, "[{t}]"),
            Self::NonNullList(t) => write!(f, "[{t}]!"),
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
            Self::Subscription => "subscription",
        })
    }
}

/// Prints a value literal back on a single line, e.g. `{ids: [1, 2], name: "x"}`.
///
/// Object fields come out sorted by name.
pub struct PrintedValue<'v, 'a>(pub &'v Value<'a, String>);

impl PrintedValue<'_, '_> {
    /// Prints the value into a shared string.
    pub fn to_arcstr(&self) -> ArcStr {
        self.to_string().into()
    }
}

impl fmt::Display for PrintedValue<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::Null => f.write_str("null"),
            Value::Variable(name) => write!(f, "${name}"),
            Value::Int(n) => write!(f, "{}", n.as_i64().unwrap_or_default()),
            Value::Float(n) => write!(f, "{n:?}"),
            Value::String(s) => write_quoted(f, s),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Enum(name) => f.write_str(name),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    PrintedValue(item).fmt(f)?;
                }
                f.write_str("]")
            }
            Value::Object(fields) => {
                f.write_str("{")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {}", PrintedValue(value))?;
                }
                f.write_str("}")
            }
        }
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c.is_control() => write!(f, "\\u{:04X}", u32::from(c))?,
            c => write!(f, "{c}")?,
        }
    }
    f.write_str("\"")
}

#[cfg(test)]
mod tests {
    use arcstr::literal;
    use graphql_parser::query::{Definition, OperationDefinition, Selection, parse_query};
    use pretty_assertions::assert_eq;

    use super::{PrintedValue, Type};

    #[test]
    fn type_display() {
        let ty = Type::NonNullList(Box::new(Type::List(Box::new(Type::NonNullNamed(
            literal!("String"),
        )))));

        assert_eq!(ty.to_string(), "[[String!]]!");
        assert_eq!(ty.innermost_name(), "String");
        assert_eq!(ty.name(), None);
        assert!(ty.is_non_null());
    }

    #[test]
    fn converts_variable_types() {
        let document = parse_query::<String>("query($a: [[Int!]]!, $b: ID) { a }").unwrap();
        let Definition::Operation(OperationDefinition::Query(query)) = &document.definitions[0]
        else {
            panic!("expected a query");
        };

        let types = query
            .variable_definitions
            .iter()
            .map(|v| Type::from(&v.var_type))
            .collect::<Vec<_>>();

        assert_eq!(
            types,
            [
                Type::NonNullList(Box::new(Type::List(Box::new(Type::NonNullNamed(
                    literal!("Int"),
                ))))),
                Type::Named(literal!("ID")),
            ],
        );
    }

    #[test]
    fn prints_argument_values() {
        let document = parse_query::<String>(
            r#"{
                a(
                  list: [1, -2.5, $three, null]
                  object: {other: SOME_ENUM, key: "say \"hi\"\n"}
                  flag: true
                  block: """
                    multi
                    line
                  """
                )
            }"#,
        )
        .unwrap();
        let Definition::Operation(OperationDefinition::SelectionSet(set)) = &document.definitions[0]
        else {
            panic!("expected a selection set");
        };
        let Selection::Field(field) = &set.items[0] else {
            panic!("expected a field");
        };

        let printed = field
            .arguments
            .iter()
            .map(|(name, value)| format!("{name}={}", PrintedValue(value)))
            .collect::<Vec<_>>();

        assert_eq!(
            printed,
            [
                "list=[1, -2.5, $three, null]",
                r#"object={key: "say \"hi\"\n", other: SOME_ENUM}"#,
                "flag=true",
                r#"block="multi\nline""#,
            ],
        );
    }
}
