//! Portable type descriptors and the classification of named types.

use arcstr::ArcStr;
use serde::Serialize;

use crate::{CodegenError, ast::Type, schema::meta::MetaType};

/// Which of the six kinds of named types a type is.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeCategory {
    /// Built-in or custom scalar.
    Scalar,
    /// Enumeration.
    Enum,
    /// Concrete output object.
    Object,
    /// Interface, implemented by objects or other interfaces.
    Interface,
    /// Union of object types.
    Union,
    /// Input object, only usable as an argument or variable.
    #[serde(rename = "INPUT_OBJECT")]
    Input,
}

impl TypeCategory {
    /// Objects, interfaces and unions, the types a selection set applies to.
    pub fn is_composite(self) -> bool {
        matches!(self, Self::Object | Self::Interface | Self::Union)
    }
}

/// The portable form of a type reference such as `[[String!]]!`.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDescriptor {
    /// Name of the innermost named type.
    pub name: ArcStr,
    /// Whether the type is wrapped in at least one list.
    pub is_array: bool,
    /// Whether the outermost layer is non-null.
    pub is_required: bool,
    /// Whether the items of the innermost list are non-null.
    ///
    /// Always `false` unless [`TypeDescriptor::is_array`].
    pub is_array_item_required: bool,
    /// Number of list layers.
    pub dimension_of_array: usize,
    /// Category of the named type.
    pub category: TypeCategory,
}

impl TypeDescriptor {
    /// A nullable descriptor of the named type.
    pub fn named(name: impl Into<ArcStr>, category: TypeCategory) -> Self {
        Self {
            name: name.into(),
            is_array: false,
            is_required: false,
            is_array_item_required: false,
            dimension_of_array: 0,
            category,
        }
    }

    /// Whether this is a list that may be `null` itself.
    pub fn is_nullable_array(&self) -> bool {
        self.is_array && !self.is_required
    }
}

/// Source of the [`TypeCategory`] of named types.
pub trait TypeLookup {
    /// Category of the named type, or `None` if there's no such type.
    fn category_of(&self, name: &str) -> Option<TypeCategory>;
}

/// Flattens a type reference into a [`TypeDescriptor`].
///
/// The category is looked up once for the innermost named type.
pub fn resolve_type(ty: &Type, types: &impl TypeLookup) -> Result<TypeDescriptor, CodegenError> {
    let is_required = ty.is_non_null();
    let mut dimension_of_array = 0;
    let mut is_array_item_required = false;
    let mut current = ty;

    let name = loop {
        match current {
            Type::Named(name) | Type::NonNullNamed(name) => break name,
            Type::List(inner) | Type::NonNullList(inner) => {
                dimension_of_array += 1;
                is_array_item_required = inner.is_non_null();
                current = inner;
            }
        }
    };

    if name.is_empty() {
        return Err(CodegenError::MalformedTypeReference(ty.to_string()));
    }

    let category = types
        .category_of(name)
        .ok_or_else(|| CodegenError::UnknownType {
            name: name.clone(),
            parent_type: None,
        })?;

    Ok(TypeDescriptor {
        name: name.clone(),
        is_array: dimension_of_array > 0,
        is_required,
        is_array_item_required,
        dimension_of_array,
        category,
    })
}

/// Decides the category of a named type from the capabilities it exposes.
///
/// The checks run in a fixed order, the first matching one wins.
pub fn classify(meta: &MetaType) -> TypeCategory {
    if meta.enum_values().is_some() && !meta.has_field_map() {
        TypeCategory::Enum
    } else if meta.has_field_map() && meta.interface_names().is_some() {
        TypeCategory::Object
    } else if meta.has_field_map() && !meta.is_abstract() {
        TypeCategory::Input
    } else if meta.is_abstract() && meta.has_field_map() {
        TypeCategory::Interface
    } else if meta.is_abstract() && meta.possible_type_names().is_some() {
        TypeCategory::Union
    } else {
        TypeCategory::Scalar
    }
}

#[cfg(test)]
mod tests {
    use arcstr::ArcStr;
    use pretty_assertions::assert_eq;

    use super::{TypeCategory, TypeDescriptor, TypeLookup, classify, resolve_type};
    use crate::{CodegenError, ast::Type, schema::SchemaType};

    struct Scalars;

    impl TypeLookup for Scalars {
        fn category_of(&self, name: &str) -> Option<TypeCategory> {
            (name == "String").then_some(TypeCategory::Scalar)
        }
    }

    fn named(name: &str) -> Type {
        Type::Named(ArcStr::from(name))
    }

    fn list(ty: Type) -> Type {
        Type::List(Box::new(ty))
    }

    fn descriptor(
        is_array: bool,
        is_required: bool,
        is_array_item_required: bool,
        dimension_of_array: usize,
    ) -> TypeDescriptor {
        TypeDescriptor {
            name: "String".into(),
            is_array,
            is_required,
            is_array_item_required,
            dimension_of_array,
            category: TypeCategory::Scalar,
        }
    }

    #[test]
    fn resolves_every_wrapping() {
        let cases = [
            (named("String"), descriptor(false, false, false, 0)),
            (named("String").non_null(), descriptor(false, true, false, 0)),
            (list(named("String")), descriptor(true, false, false, 1)),
            (list(named("String").non_null()), descriptor(true, false, true, 1)),
            (list(named("String")).non_null(), descriptor(true, true, false, 1)),
            (
                list(named("String").non_null()).non_null(),
                descriptor(true, true, true, 1),
            ),
            (
                list(list(named("String").non_null())).non_null(),
                descriptor(true, true, true, 2),
            ),
            (
                list(list(named("String")).non_null()),
                descriptor(true, false, false, 2),
            ),
        ];

        for (ty, expected) in cases {
            assert_eq!(resolve_type(&ty, &Scalars).unwrap(), expected, "resolving `{ty}`");
        }
        assert!(descriptor(true, false, false, 1).is_nullable_array());
        assert!(!descriptor(true, true, false, 1).is_nullable_array());
    }

    #[test]
    fn unknown_and_malformed_types() {
        assert_eq!(
            resolve_type(&list(named("Missing")), &Scalars),
            Err(CodegenError::UnknownType {
                name: "Missing".into(),
                parent_type: None,
            }),
        );
        assert!(matches!(
            resolve_type(&list(named("")), &Scalars),
            Err(CodegenError::MalformedTypeReference(_)),
        ));
    }

    #[test]
    fn classifies_every_kind_of_type() {
        let schema = SchemaType::from_sdl(
            r#"
            type Query { node: Node }
            interface Node { id: ID! }
            union Result = Query
            enum Color { RED }
            input Filter { color: Color }
            scalar Date
            "#,
        )
        .unwrap();

        let categories = schema
            .type_list()
            .map(|t| (t.name().as_str(), classify(t)))
            .collect::<Vec<_>>();

        assert_eq!(
            categories,
            [
                ("String", TypeCategory::Scalar),
                ("Int", TypeCategory::Scalar),
                ("Float", TypeCategory::Scalar),
                ("Boolean", TypeCategory::Scalar),
                ("ID", TypeCategory::Scalar),
                ("Query", TypeCategory::Object),
                ("Node", TypeCategory::Interface),
                ("Result", TypeCategory::Union),
                ("Color", TypeCategory::Enum),
                ("Filter", TypeCategory::Input),
                ("Date", TypeCategory::Scalar),
            ],
        );
        assert_eq!(schema.category_of("Filter"), Some(TypeCategory::Input));
        assert_eq!(schema.category_of("Missing"), None);
    }

    #[test]
    fn serializes_categories() {
        assert_eq!(
            serde_json::to_value(TypeCategory::Input).unwrap(),
            serde_json::json!("INPUT_OBJECT"),
        );
        assert_eq!(
            serde_json::to_value(descriptor(true, false, true, 1)).unwrap(),
            serde_json::json!({
                "name": "String",
                "isArray": true,
                "isRequired": false,
                "isArrayItemRequired": true,
                "dimensionOfArray": 1,
                "category": "SCALAR",
            }),
        );
    }
}
