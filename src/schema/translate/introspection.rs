//! Reads a schema out of the result of an introspection query.
//!
//! Both the full response (`{"data": {"__schema": ...}}`) and its bare
//! `{"__schema": ...}` payload are accepted.

use arcstr::ArcStr;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    CodegenError,
    ast::{OperationType, Type},
    schema::{
        SchemaType,
        meta::{
            Argument, DeprecationStatus, DirectiveType, EnumMeta, EnumValue, Field,
            InputObjectMeta, InterfaceMeta, MetaType, ObjectMeta, ScalarMeta, UnionMeta,
        },
        translate::SchemaTranslator,
    },
};

/// Translates introspection results into a [`SchemaType`].
pub struct IntrospectionTranslator;

impl SchemaTranslator<str> for IntrospectionTranslator {
    fn translate_schema(json: &str) -> Result<SchemaType, CodegenError> {
        let value = serde_json::from_str::<Value>(json)
            .map_err(|e| CodegenError::Introspection(e.to_string()))?;
        Self::translate_schema(&value)
    }
}

impl SchemaTranslator<Value> for IntrospectionTranslator {
    fn translate_schema(value: &Value) -> Result<SchemaType, CodegenError> {
        let payload = value
            .get("data")
            .unwrap_or(value)
            .get("__schema")
            .ok_or_else(|| CodegenError::Introspection("missing `__schema` field".into()))?;
        let introspected = IntrospectionSchema::deserialize(payload)
            .map_err(|e| CodegenError::Introspection(e.to_string()))?;

        introspected.into_schema()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntrospectionSchema {
    description: Option<ArcStr>,
    query_type: Option<NamedTypeRef>,
    mutation_type: Option<NamedTypeRef>,
    subscription_type: Option<NamedTypeRef>,
    types: Vec<FullType>,
    #[serde(default)]
    directives: Vec<DirectiveDef>,
}

#[derive(Debug, Deserialize)]
struct NamedTypeRef {
    name: ArcStr,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    List,
    NonNull,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TypeRef {
    kind: TypeKind,
    name: Option<ArcStr>,
    of_type: Option<Box<TypeRef>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FullType {
    kind: TypeKind,
    name: ArcStr,
    description: Option<ArcStr>,
    #[serde(rename = "specifiedByURL", alias = "specifiedByUrl")]
    specified_by_url: Option<ArcStr>,
    fields: Option<Vec<FieldDef>>,
    input_fields: Option<Vec<InputValueDef>>,
    interfaces: Option<Vec<TypeRef>>,
    enum_values: Option<Vec<EnumValueDef>>,
    possible_types: Option<Vec<TypeRef>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FieldDef {
    name: ArcStr,
    description: Option<ArcStr>,
    #[serde(default)]
    args: Vec<InputValueDef>,
    #[serde(rename = "type")]
    ty: TypeRef,
    #[serde(default)]
    is_deprecated: bool,
    deprecation_reason: Option<ArcStr>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InputValueDef {
    name: ArcStr,
    description: Option<ArcStr>,
    #[serde(rename = "type")]
    ty: TypeRef,
    default_value: Option<ArcStr>,
    #[serde(default)]
    is_deprecated: bool,
    deprecation_reason: Option<ArcStr>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnumValueDef {
    name: ArcStr,
    description: Option<ArcStr>,
    #[serde(default)]
    is_deprecated: bool,
    deprecation_reason: Option<ArcStr>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DirectiveDef {
    name: ArcStr,
    description: Option<ArcStr>,
    #[serde(default)]
    locations: Vec<ArcStr>,
    #[serde(default)]
    args: Vec<InputValueDef>,
    #[serde(default)]
    is_repeatable: bool,
}

fn malformed(msg: impl Into<String>) -> CodegenError {
    CodegenError::MalformedTypeReference(msg.into())
}

fn deprecation(is_deprecated: bool, reason: Option<ArcStr>) -> DeprecationStatus {
    if is_deprecated {
        DeprecationStatus::Deprecated(reason)
    } else {
        DeprecationStatus::Current
    }
}

impl IntrospectionSchema {
    fn into_schema(self) -> Result<SchemaType, CodegenError> {
        let mut schema = SchemaType::new();
        schema.set_description(self.description);

        for (operation, root) in [
            (OperationType::Query, self.query_type),
            (OperationType::Mutation, self.mutation_type),
            (OperationType::Subscription, self.subscription_type),
        ] {
            if let Some(root) = root {
                schema.set_root_type_name(operation, root.name);
            }
        }

        for ty in self.types {
            if ty.name.starts_with("__") {
                continue;
            }
            schema.add_type(ty.into_meta()?)?;
        }

        for directive in self.directives {
            schema.add_directive(directive.into_directive()?);
        }

        __codegen_trace_debug!(
            "Translated introspection result: {} types, {} directives",
            schema.types.len(),
            schema.directives.len(),
        );

        Ok(schema)
    }
}

impl TypeRef {
    /// Rebuilds the type literal this chain of references denotes.
    fn to_type(&self) -> Result<Type, CodegenError> {
        match (self.kind, self.of_type.as_deref()) {
            (TypeKind::NonNull, Some(TypeRef { kind: TypeKind::NonNull, .. })) => {
                Err(malformed("NON_NULL type wrapping another NON_NULL type"))
            }
            (TypeKind::NonNull, Some(inner)) => Ok(inner.to_type()?.non_null()),
            (TypeKind::List, Some(inner)) => Ok(Type::List(Box::new(inner.to_type()?))),
            (TypeKind::NonNull | TypeKind::List, None) => {
                Err(malformed(format!("{:?} type without `ofType`", self.kind)))
            }
            (_, _) => self.named().map(Type::Named),
        }
    }

    fn named(&self) -> Result<ArcStr, CodegenError> {
        self.name
            .clone()
            .ok_or_else(|| malformed(format!("{:?} type without a name", self.kind)))
    }
}

impl FullType {
    fn into_meta(self) -> Result<MetaType, CodegenError> {
        let Self {
            kind,
            name,
            description,
            ..
        } = self;

        __codegen_trace!("Translating {kind:?} type {name}");

        Ok(match kind {
            TypeKind::Scalar => MetaType::Scalar(ScalarMeta {
                name,
                description,
                specified_by_url: self.specified_by_url,
            }),
            TypeKind::Object => ObjectMeta {
                name,
                description,
                fields: translate_fields(self.fields)?,
                interface_names: translate_names(self.interfaces)?,
            }
            .into_meta(),
            TypeKind::Interface => MetaType::Interface(InterfaceMeta {
                name,
                description,
                fields: translate_fields(self.fields)?,
                interface_names: translate_names(self.interfaces)?,
            }),
            TypeKind::Union => MetaType::Union(UnionMeta {
                name,
                description,
                of_type_names: translate_names(self.possible_types)?,
            }),
            TypeKind::Enum => MetaType::Enum(EnumMeta {
                name,
                description,
                values: self
                    .enum_values
                    .unwrap_or_default()
                    .into_iter()
                    .map(EnumValueDef::into_enum_value)
                    .collect(),
            }),
            TypeKind::InputObject => MetaType::InputObject(InputObjectMeta {
                name,
                description,
                input_fields: translate_arguments(self.input_fields)?,
            }),
            TypeKind::List | TypeKind::NonNull => {
                return Err(malformed(format!("{kind:?} type `{name}` is not a named type")));
            }
        })
    }
}

fn translate_fields(fields: Option<Vec<FieldDef>>) -> Result<Vec<Field>, CodegenError> {
    fields
        .unwrap_or_default()
        .into_iter()
        .map(FieldDef::into_field)
        .collect()
}

fn translate_arguments(args: Option<Vec<InputValueDef>>) -> Result<Vec<Argument>, CodegenError> {
    args.unwrap_or_default()
        .into_iter()
        .map(InputValueDef::into_argument)
        .collect()
}

fn translate_names(refs: Option<Vec<TypeRef>>) -> Result<Vec<ArcStr>, CodegenError> {
    refs.unwrap_or_default().iter().map(TypeRef::named).collect()
}

impl FieldDef {
    fn into_field(self) -> Result<Field, CodegenError> {
        let mut field = Field::new(self.name, self.ty.to_type()?);
        field.description = self.description;

        for arg in self.args {
            field = field.argument(arg.into_argument()?);
        }

        Ok(if self.is_deprecated {
            field.deprecated(self.deprecation_reason)
        } else {
            field
        })
    }
}

impl InputValueDef {
    fn into_argument(self) -> Result<Argument, CodegenError> {
        let mut arg = Argument::new(self.name, self.ty.to_type()?);
        arg.description = self.description;
        arg.deprecation_status = deprecation(self.is_deprecated, self.deprecation_reason);

        Ok(match self.default_value {
            Some(value) => arg.default_value(value),
            None => arg,
        })
    }
}

impl EnumValueDef {
    fn into_enum_value(self) -> EnumValue {
        let mut value = EnumValue::new(self.name);
        value.description = self.description;
        value.deprecation_status = deprecation(self.is_deprecated, self.deprecation_reason);
        value
    }
}

impl DirectiveDef {
    fn into_directive(self) -> Result<DirectiveType, CodegenError> {
        Ok(DirectiveType {
            name: self.name,
            description: self.description,
            locations: self.locations,
            arguments: translate_arguments(Some(self.args))?,
            is_repeatable: self.is_repeatable,
        })
    }
}
