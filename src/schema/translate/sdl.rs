//! Reads a schema out of its definition language source.

use arcstr::{ArcStr, literal};
use graphql_parser::schema::{
    Definition, Directive, DirectiveDefinition, Document, EnumValue as EnumValueDefinition,
    Field as FieldDefinition, InputValue as InputValueDefinition, SchemaDefinition,
    TypeDefinition, TypeExtension, Value, parse_schema,
};

use crate::{
    CodegenError,
    ast::{OperationType, PrintedValue, Type},
    schema::{
        SchemaType,
        meta::{
            Argument, DeprecationStatus, DirectiveType, EnumMeta, EnumValue, Field,
            InputObjectMeta, InterfaceMeta, MetaType, ObjectMeta, ScalarMeta, UnionMeta,
        },
        translate::SchemaTranslator,
    },
};

/// Reason reported for `@deprecated` without an explicit one.
const DEFAULT_DEPRECATION_REASON: ArcStr = literal!("No longer supported");

/// Parsed schema definition language document.
pub type SdlDocument<'a> = Document<'a, String>;

/// Translates schema definition language into a [`SchemaType`].
///
/// Extensions are applied once every definition of the document is known, so
/// an `extend type` may precede the type it extends.
pub struct SdlTranslator;

impl SchemaTranslator<str> for SdlTranslator {
    fn translate_schema(source: &str) -> Result<SchemaType, CodegenError> {
        let document = parse_schema::<String>(source)
            .map_err(|e| CodegenError::Parse(e.to_string()))?;
        <Self as SchemaTranslator<SdlDocument<'_>>>::translate_schema(&document)
    }
}

impl SchemaTranslator<SdlDocument<'_>> for SdlTranslator {
    fn translate_schema(document: &SdlDocument<'_>) -> Result<SchemaType, CodegenError> {
        let mut schema = SchemaType::new();
        let mut extensions = vec![];

        for definition in &document.definitions {
            match definition {
                Definition::TypeDefinition(def) => schema.add_type(translate_type(def))?,
                Definition::TypeExtension(ext) => extensions.push(ext),
                Definition::SchemaDefinition(def) => apply_schema_definition(&mut schema, def),
                Definition::DirectiveDefinition(def) => {
                    schema.add_directive(translate_directive(def));
                }
            }
        }

        for extension in extensions {
            extend_type(&mut schema, extension)?;
        }

        schema.default_root_types();

        __codegen_trace_debug!(
            "Translated schema definition: {} types, {} directives",
            schema.types.len(),
            schema.directives.len(),
        );

        Ok(schema)
    }
}

fn apply_schema_definition(schema: &mut SchemaType, def: &SchemaDefinition<'_, String>) {
    let roots = [
        (OperationType::Query, &def.query),
        (OperationType::Mutation, &def.mutation),
        (OperationType::Subscription, &def.subscription),
    ];
    for (operation, type_name) in roots {
        if let Some(name) = type_name {
            schema.set_root_type_name(operation, name.as_str().into());
        }
    }
}

fn translate_type(def: &TypeDefinition<'_, String>) -> MetaType {
    match def {
        TypeDefinition::Scalar(def) => {
            let mut meta = ScalarMeta::new(def.name.as_str().into());
            meta.description = description(def.description.as_deref());
            meta.specified_by_url = string_argument(&def.directives, "specifiedBy", "url");
            meta.into_meta()
        }
        TypeDefinition::Object(def) => ObjectMeta {
            name: def.name.as_str().into(),
            description: description(def.description.as_deref()),
            fields: def.fields.iter().map(translate_field).collect(),
            interface_names: names(&def.implements_interfaces),
        }
        .into_meta(),
        TypeDefinition::Interface(def) => MetaType::Interface(InterfaceMeta {
            name: def.name.as_str().into(),
            description: description(def.description.as_deref()),
            fields: def.fields.iter().map(translate_field).collect(),
            interface_names: names(&def.implements_interfaces),
        }),
        TypeDefinition::Union(def) => MetaType::Union(UnionMeta {
            name: def.name.as_str().into(),
            description: description(def.description.as_deref()),
            of_type_names: names(&def.types),
        }),
        TypeDefinition::Enum(def) => MetaType::Enum(EnumMeta {
            name: def.name.as_str().into(),
            description: description(def.description.as_deref()),
            values: def.values.iter().map(translate_enum_value).collect(),
        }),
        TypeDefinition::InputObject(def) => MetaType::InputObject(InputObjectMeta {
            name: def.name.as_str().into(),
            description: description(def.description.as_deref()),
            input_fields: def.fields.iter().map(translate_input_value).collect(),
        }),
    }
}

fn extension_name<'d>(ext: &'d TypeExtension<'_, String>) -> &'d str {
    match ext {
        TypeExtension::Scalar(ext) => ext.name.as_str(),
        TypeExtension::Object(ext) => ext.name.as_str(),
        TypeExtension::Interface(ext) => ext.name.as_str(),
        TypeExtension::Union(ext) => ext.name.as_str(),
        TypeExtension::Enum(ext) => ext.name.as_str(),
        TypeExtension::InputObject(ext) => ext.name.as_str(),
    }
}

fn extend_type(schema: &mut SchemaType, ext: &TypeExtension<'_, String>) -> Result<(), CodegenError> {
    let name = extension_name(ext);
    let Some(target) = schema.type_by_name_mut(name) else {
        return Err(CodegenError::UnknownType {
            name: name.into(),
            parent_type: None,
        });
    };

    __codegen_trace!("Extending type {name}");

    match (target, ext) {
        (MetaType::Scalar(meta), TypeExtension::Scalar(ext)) => {
            if let Some(url) = string_argument(&ext.directives, "specifiedBy", "url") {
                meta.specified_by_url = Some(url);
            }
        }
        (MetaType::Object(meta), TypeExtension::Object(ext)) => {
            meta.fields.extend(ext.fields.iter().map(translate_field));
            meta.interface_names.extend(names(&ext.implements_interfaces));
        }
        (MetaType::Interface(meta), TypeExtension::Interface(ext)) => {
            meta.fields.extend(ext.fields.iter().map(translate_field));
            meta.interface_names.extend(names(&ext.implements_interfaces));
        }
        (MetaType::Union(meta), TypeExtension::Union(ext)) => {
            meta.of_type_names.extend(names(&ext.types));
        }
        (MetaType::Enum(meta), TypeExtension::Enum(ext)) => {
            meta.values.extend(ext.values.iter().map(translate_enum_value));
        }
        (MetaType::InputObject(meta), TypeExtension::InputObject(ext)) => {
            meta.input_fields
                .extend(ext.fields.iter().map(translate_input_value));
        }
        // Extending a type as another kind of type redefines it.
        _ => return Err(CodegenError::DuplicateTypeDefinition(name.into())),
    }

    Ok(())
}

fn translate_field(def: &FieldDefinition<'_, String>) -> Field {
    let mut field = Field::new(def.name.as_str().into(), Type::from(&def.field_type));
    field.description = description(def.description.as_deref());

    for arg in &def.arguments {
        field = field.argument(translate_input_value(arg));
    }

    match deprecation_status(&def.directives) {
        DeprecationStatus::Deprecated(reason) => field.deprecated(reason),
        DeprecationStatus::Current => field,
    }
}

fn translate_input_value(def: &InputValueDefinition<'_, String>) -> Argument {
    let mut arg = Argument::new(def.name.as_str().into(), Type::from(&def.value_type));
    arg.description = description(def.description.as_deref());
    arg.deprecation_status = deprecation_status(&def.directives);

    match &def.default_value {
        Some(value) => arg.default_value(PrintedValue(value).to_arcstr()),
        None => arg,
    }
}

fn translate_enum_value(def: &EnumValueDefinition<'_, String>) -> EnumValue {
    let mut value = EnumValue::new(def.name.as_str().into());
    value.description = description(def.description.as_deref());
    value.deprecation_status = deprecation_status(&def.directives);
    value
}

fn translate_directive(def: &DirectiveDefinition<'_, String>) -> DirectiveType {
    DirectiveType {
        name: def.name.as_str().into(),
        description: description(def.description.as_deref()),
        locations: def
            .locations
            .iter()
            .map(|l| ArcStr::from(l.as_str()))
            .collect(),
        arguments: def.arguments.iter().map(translate_input_value).collect(),
        is_repeatable: def.repeatable,
    }
}

fn names(items: &[String]) -> Vec<ArcStr> {
    items.iter().map(|n| n.as_str().into()).collect()
}

fn description(description: Option<&str>) -> Option<ArcStr> {
    description.map(ArcStr::from)
}

fn deprecation_status(directives: &[Directive<'_, String>]) -> DeprecationStatus {
    if find_directive(directives, "deprecated").is_none() {
        return DeprecationStatus::Current;
    }
    DeprecationStatus::Deprecated(Some(
        string_argument(directives, "deprecated", "reason").unwrap_or(DEFAULT_DEPRECATION_REASON),
    ))
}

fn find_directive<'d, 'a>(
    directives: &'d [Directive<'a, String>],
    name: &str,
) -> Option<&'d Directive<'a, String>> {
    directives.iter().find(|d| d.name == name)
}

fn string_argument(
    directives: &[Directive<'_, String>],
    directive: &str,
    arg: &str,
) -> Option<ArcStr> {
    let (_, value) = find_directive(directives, directive)?
        .arguments
        .iter()
        .find(|(name, _)| name == arg)?;
    match value {
        Value::String(s) => Some(s.as_str().into()),
        _ => None,
    }
}
