//! Portable fields and arguments of schema types.

use arcstr::ArcStr;
use serde::Serialize;

use crate::{
    CodegenError,
    model::{TypeCategory, TypeDescriptor, TypeLookup, resolve_type},
    schema::meta::{self, DeprecationStatus},
};

/// One flag per [`TypeCategory`], exactly one of them set.
///
/// Templates tend to branch on booleans rather than on a tag.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryFlags {
    /// Object type.
    pub is_type: bool,
    /// Scalar type.
    pub is_scalar: bool,
    /// Interface type.
    pub is_interface: bool,
    /// Union type.
    pub is_union: bool,
    /// Input object type.
    pub is_input_type: bool,
    /// Enum type.
    pub is_enum: bool,
}

impl From<TypeCategory> for CategoryFlags {
    fn from(category: TypeCategory) -> Self {
        let mut flags = Self::default();
        match category {
            TypeCategory::Object => flags.is_type = true,
            TypeCategory::Scalar => flags.is_scalar = true,
            TypeCategory::Interface => flags.is_interface = true,
            TypeCategory::Union => flags.is_union = true,
            TypeCategory::Input => flags.is_input_type = true,
            TypeCategory::Enum => flags.is_enum = true,
        }
        flags
    }
}

/// A field of an object, interface or input object, or an argument.
///
/// Arguments are fields themselves, without arguments of their own.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Name of the field.
    pub name: ArcStr,
    /// Description, if documented.
    pub description: Option<ArcStr>,
    /// Type of the field.
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
    /// Arguments, in declaration order.
    pub arguments: Vec<Field>,
    /// Whether [`Field::arguments`] is not empty.
    pub has_arguments: bool,
    /// Whether the field is deprecated.
    pub is_deprecated: bool,
    /// Reason of the deprecation, if any was given.
    pub deprecation_reason: Option<ArcStr>,
    /// Default value of an argument or input field, in GraphQL syntax.
    pub default_value: Option<ArcStr>,
    /// Category flags of the field type.
    #[serde(flatten)]
    pub flags: CategoryFlags,
}

impl Field {
    /// Builds a field of the given type, without arguments.
    pub fn new(name: impl Into<ArcStr>, ty: TypeDescriptor) -> Self {
        let flags = ty.category.into();
        Self {
            name: name.into(),
            description: None,
            ty,
            arguments: vec![],
            has_arguments: false,
            is_deprecated: false,
            deprecation_reason: None,
            default_value: None,
            flags,
        }
    }

    fn with_deprecation(mut self, status: &DeprecationStatus) -> Self {
        self.is_deprecated = status.is_deprecated();
        self.deprecation_reason = status.reason().map(ArcStr::from);
        self
    }
}

/// Builds the portable form of output fields, their arguments included.
pub fn resolve_fields(
    fields: &[meta::Field],
    types: &impl TypeLookup,
) -> Result<Vec<Field>, CodegenError> {
    fields
        .iter()
        .map(|field| {
            let arguments = resolve_arguments(field.arguments.as_deref().unwrap_or_default(), types)?;
            let mut resolved = Field::new(field.name.clone(), resolve_type(&field.field_type, types)?)
                .with_deprecation(&field.deprecation_status);
            resolved.description = field.description.clone();
            resolved.has_arguments = !arguments.is_empty();
            resolved.arguments = arguments;

            __codegen_trace!("Resolved field {}: {}", field.name, field.field_type);

            Ok(resolved)
        })
        .collect()
}

/// Builds the portable form of arguments or of input object fields.
pub fn resolve_arguments(
    arguments: &[meta::Argument],
    types: &impl TypeLookup,
) -> Result<Vec<Field>, CodegenError> {
    arguments
        .iter()
        .map(|arg| {
            let mut resolved = Field::new(arg.name.clone(), resolve_type(&arg.arg_type, types)?)
                .with_deprecation(&arg.deprecation_status);
            resolved.description = arg.description.clone();
            resolved.default_value = arg.default_value.clone();
            Ok(resolved)
        })
        .collect()
}
