//! Schema as read from any of its sources, before it's modeled for backends.

use arcstr::ArcStr;
use fnv::FnvBuildHasher;
use indexmap::IndexMap;

use crate::{
    CodegenError,
    ast::OperationType,
    model::{TypeCategory, TypeLookup, classify},
    schema::{
        meta::{BUILTIN_SCALARS, DirectiveType, MetaType, ScalarMeta},
        translate::{
            SchemaTranslator, introspection::IntrospectionTranslator, sdl::SdlTranslator,
        },
    },
};

/// Ordered map keyed by type or directive name.
pub type NameMap<V> = IndexMap<ArcStr, V, FnvBuildHasher>;

/// Metadata for a schema, whichever source it was read from.
///
/// Types keep the order they were declared in, built-in scalars first.
#[derive(Clone, Debug, PartialEq)]
pub struct SchemaType {
    pub(crate) description: Option<ArcStr>,
    pub(crate) types: NameMap<MetaType>,
    pub(crate) query_type_name: Option<ArcStr>,
    pub(crate) mutation_type_name: Option<ArcStr>,
    pub(crate) subscription_type_name: Option<ArcStr>,
    pub(crate) directives: NameMap<DirectiveType>,
}

impl Default for SchemaType {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaType {
    /// Creates a schema holding only the built-in scalars and no root types.
    pub fn new() -> Self {
        let types = BUILTIN_SCALARS
            .iter()
            .map(|name| {
                let name = ArcStr::from(*name);
                (name.clone(), ScalarMeta::new(name).into_meta())
            })
            .collect();

        Self {
            description: None,
            types,
            query_type_name: None,
            mutation_type_name: None,
            subscription_type_name: None,
            directives: NameMap::default(),
        }
    }

    /// Reads a schema from its definition language source.
    pub fn from_sdl(source: &str) -> Result<Self, CodegenError> {
        SdlTranslator::translate_schema(source)
    }

    /// Reads a schema from the JSON result of an introspection query.
    pub fn from_introspection(json: &str) -> Result<Self, CodegenError> {
        IntrospectionTranslator::translate_schema(json)
    }

    /// Reads a schema from an already deserialized introspection result.
    pub fn from_introspection_value(value: serde_json::Value) -> Result<Self, CodegenError> {
        IntrospectionTranslator::translate_schema(&value)
    }

    /// Adds a named type.
    ///
    /// A custom scalar may redeclare a built-in one, anything else already
    /// present is a [`CodegenError::DuplicateTypeDefinition`].
    pub fn add_type(&mut self, meta: MetaType) -> Result<(), CodegenError> {
        let name = meta.name().clone();
        match self.types.get_mut(&name) {
            Some(existing @ MetaType::Scalar(_))
                if BUILTIN_SCALARS.contains(&name.as_str()) && matches!(meta, MetaType::Scalar(_)) =>
            {
                *existing = meta;
                Ok(())
            }
            Some(_) => Err(CodegenError::DuplicateTypeDefinition(name)),
            None => {
                __codegen_trace!("Registered type {name}");
                self.types.insert(name, meta);
                Ok(())
            }
        }
    }

    /// Adds a directive definition, replacing any other of the same name.
    pub fn add_directive(&mut self, directive: DirectiveType) {
        self.directives.insert(directive.name.clone(), directive);
    }

    /// Sets the name of the root type for operations of the given kind.
    pub fn set_root_type_name(&mut self, operation: OperationType, name: ArcStr) {
        *self.root_slot(operation) = Some(name);
    }

    /// Sets the description of the schema itself.
    pub fn set_description(&mut self, description: Option<ArcStr>) {
        self.description = description;
    }

    /// Uses the conventional `Query`, `Mutation` and `Subscription` types as
    /// roots for those kinds of operation not bound to a root type yet.
    pub(crate) fn default_root_types(&mut self) {
        for (operation, name) in [
            (OperationType::Query, "Query"),
            (OperationType::Mutation, "Mutation"),
            (OperationType::Subscription, "Subscription"),
        ] {
            if self.root_type_name(operation).is_none()
                && matches!(self.types.get(name), Some(MetaType::Object(_)))
            {
                self.set_root_type_name(operation, name.into());
            }
        }
    }

    fn root_slot(&mut self, operation: OperationType) -> &mut Option<ArcStr> {
        match operation {
            OperationType::Query => &mut self.query_type_name,
            OperationType::Mutation => &mut self.mutation_type_name,
            OperationType::Subscription => &mut self.subscription_type_name,
        }
    }

    /// Description of the schema, if any.
    pub fn description(&self) -> Option<&ArcStr> {
        self.description.as_ref()
    }

    /// Gets the named type, if the schema defines it.
    pub fn type_by_name(&self, name: &str) -> Option<&MetaType> {
        self.types.get(name)
    }

    pub(crate) fn type_by_name_mut(&mut self, name: &str) -> Option<&mut MetaType> {
        self.types.get_mut(name)
    }

    /// All named types, in declaration order.
    pub fn type_list(&self) -> impl Iterator<Item = &MetaType> {
        self.types.values()
    }

    /// Name of the root type of operations of the given kind.
    pub fn root_type_name(&self, operation: OperationType) -> Option<&ArcStr> {
        match operation {
            OperationType::Query => self.query_type_name.as_ref(),
            OperationType::Mutation => self.mutation_type_name.as_ref(),
            OperationType::Subscription => self.subscription_type_name.as_ref(),
        }
    }

    /// Name of the query root type.
    pub fn query_type_name(&self) -> Option<&ArcStr> {
        self.query_type_name.as_ref()
    }

    /// Name of the mutation root type.
    pub fn mutation_type_name(&self) -> Option<&ArcStr> {
        self.mutation_type_name.as_ref()
    }

    /// Name of the subscription root type.
    pub fn subscription_type_name(&self) -> Option<&ArcStr> {
        self.subscription_type_name.as_ref()
    }

    /// Gets the named directive definition.
    pub fn directive_by_name(&self, name: &str) -> Option<&DirectiveType> {
        self.directives.get(name)
    }

    /// All directive definitions, in declaration order.
    pub fn directive_list(&self) -> impl Iterator<Item = &DirectiveType> {
        self.directives.values()
    }
}

impl TypeLookup for SchemaType {
    fn category_of(&self, name: &str) -> Option<TypeCategory> {
        self.type_by_name(name).map(classify)
    }
}

#[cfg(test)]
mod tests {
    use arcstr::ArcStr;

    use super::SchemaType;
    use crate::{
        CodegenError,
        ast::{OperationType, Type},
        schema::meta::{Field, ObjectMeta, ScalarMeta},
    };

    fn object(name: &str) -> ObjectMeta {
        ObjectMeta {
            name: name.into(),
            description: None,
            fields: vec![Field::new("id".into(), Type::NonNullNamed("ID".into()))],
            interface_names: vec![],
        }
    }

    #[test]
    fn builtin_scalars_are_always_present() {
        let schema = SchemaType::new();

        let names = schema.type_list().map(|t| t.name().as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["String", "Int", "Float", "Boolean", "ID"]);
        assert!(schema.query_type_name().is_none());
    }

    #[test]
    fn builtin_scalar_may_be_redeclared() {
        let mut schema = SchemaType::new();
        let mut id = ScalarMeta::new("ID".into());
        id.description = Some("Opaque identifier".into());

        schema.add_type(id.into_meta()).unwrap();

        assert_eq!(
            schema.type_by_name("ID").and_then(|t| t.description()),
            Some(&ArcStr::from("Opaque identifier")),
        );
    }

    #[test]
    fn duplicate_types_are_rejected() {
        let mut schema = SchemaType::new();
        schema.add_type(object("User").into_meta()).unwrap();

        assert_eq!(
            schema.add_type(object("User").into_meta()),
            Err(CodegenError::DuplicateTypeDefinition("User".into())),
        );
        assert_eq!(
            schema.add_type(object("String").into_meta()),
            Err(CodegenError::DuplicateTypeDefinition("String".into())),
        );
    }

    #[test]
    fn conventional_root_names_are_used_by_default() {
        let mut schema = SchemaType::new();
        schema.add_type(object("Query").into_meta()).unwrap();
        schema.add_type(object("Subscription").into_meta()).unwrap();
        schema.set_root_type_name(OperationType::Subscription, "Events".into());

        schema.default_root_types();

        assert_eq!(schema.query_type_name().map(ArcStr::as_str), Some("Query"));
        assert_eq!(schema.mutation_type_name(), None);
        assert_eq!(
            schema.root_type_name(OperationType::Subscription).map(ArcStr::as_str),
            Some("Events"),
        );
    }
}
