//! The portable model of a whole schema.

use std::{collections::HashMap, hash::BuildHasher};

use arcstr::ArcStr;
use fnv::FnvHashMap;
use serde::Serialize;

use crate::{
    CodegenError,
    ast::OperationType,
    model::{Field, TypeCategory, TypeLookup, classify, resolve_arguments, resolve_fields},
    schema::{SchemaType, meta::MetaType},
};

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectType {
    pub name: ArcStr,
    pub description: Option<ArcStr>,
    pub fields: Vec<Field>,
    /// Names of the interfaces this object implements.
    pub interfaces: Vec<ArcStr>,
    pub has_fields: bool,
    pub has_interfaces: bool,
}

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceType {
    pub name: ArcStr,
    pub description: Option<ArcStr>,
    pub fields: Vec<Field>,
    /// Names of the interfaces this interface implements.
    pub interfaces: Vec<ArcStr>,
    /// Names of the object types implementing this interface.
    pub implementing_types: Vec<ArcStr>,
    pub has_fields: bool,
    pub has_implementing_types: bool,
}

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnionType {
    pub name: ArcStr,
    pub description: Option<ArcStr>,
    pub possible_types: Vec<ArcStr>,
    pub has_possible_types: bool,
}

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumValue {
    pub name: ArcStr,
    pub description: Option<ArcStr>,
    pub is_deprecated: bool,
    pub deprecation_reason: Option<ArcStr>,
}

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumType {
    pub name: ArcStr,
    pub description: Option<ArcStr>,
    pub values: Vec<EnumValue>,
}

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalarType {
    pub name: ArcStr,
    pub description: Option<ArcStr>,
    pub specified_by_url: Option<ArcStr>,
}

#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputObjectType {
    pub name: ArcStr,
    pub description: Option<ArcStr>,
    pub fields: Vec<Field>,
    pub has_fields: bool,
}

/// Every named type of a schema, sorted by category, and its root types.
///
/// Built-in scalars are not listed in [`SchemaModel::scalars`], but fields
/// may still refer to them.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaModel {
    /// Name of the query root type.
    pub query_type: ArcStr,
    /// Name of the mutation root type, if any.
    pub mutation_type: Option<ArcStr>,
    /// Name of the subscription root type, if any.
    pub subscription_type: Option<ArcStr>,
    #[expect(missing_docs, reason = "self-explanatory")]
    pub objects: Vec<ObjectType>,
    #[expect(missing_docs, reason = "self-explanatory")]
    pub interfaces: Vec<InterfaceType>,
    #[expect(missing_docs, reason = "self-explanatory")]
    pub unions: Vec<UnionType>,
    #[expect(missing_docs, reason = "self-explanatory")]
    pub enums: Vec<EnumType>,
    #[expect(missing_docs, reason = "self-explanatory")]
    pub scalars: Vec<ScalarType>,
    #[expect(missing_docs, reason = "self-explanatory")]
    pub input_objects: Vec<InputObjectType>,
    #[serde(skip)]
    categories: FnvHashMap<ArcStr, TypeCategory>,
    #[serde(skip)]
    positions: FnvHashMap<ArcStr, usize>,
}

impl<S: BuildHasher> TypeLookup for HashMap<ArcStr, TypeCategory, S> {
    fn category_of(&self, name: &str) -> Option<TypeCategory> {
        self.get(name).copied()
    }
}

impl TypeLookup for SchemaModel {
    fn category_of(&self, name: &str) -> Option<TypeCategory> {
        self.categories.category_of(name)
    }
}

impl SchemaModel {
    /// Builds the model of every type of the `schema`, not only of those
    /// reachable from its root types.
    pub fn build(schema: &SchemaType) -> Result<Self, CodegenError> {
        __codegen_span_debug!("build_schema_model");

        let query_type = schema
            .query_type_name()
            .cloned()
            .ok_or(CodegenError::MissingRootType)?;

        let categories = schema
            .type_list()
            .map(|meta| (meta.name().clone(), classify(meta)))
            .collect::<FnvHashMap<_, _>>();

        for root in [
            Some(&query_type),
            schema.mutation_type_name(),
            schema.subscription_type_name(),
        ]
        .into_iter()
        .flatten()
        {
            // Operations only select on object types.
            if categories.get(root) != Some(&TypeCategory::Object) {
                return Err(CodegenError::UnknownType {
                    name: root.clone(),
                    parent_type: None,
                });
            }
        }

        let mut model = Self {
            query_type,
            mutation_type: schema.mutation_type_name().cloned(),
            subscription_type: schema.subscription_type_name().cloned(),
            objects: vec![],
            interfaces: vec![],
            unions: vec![],
            enums: vec![],
            scalars: vec![],
            input_objects: vec![],
            categories: FnvHashMap::default(),
            positions: FnvHashMap::default(),
        };

        for meta in schema.type_list() {
            let name = meta.name().clone();
            let description = meta.description().cloned();
            let category = classify(meta);

            __codegen_trace!("Classified {name} as {category:?}");

            let position = match category {
                TypeCategory::Object => {
                    let fields = resolve_fields(meta.fields().unwrap_or_default(), &categories)?;
                    let interfaces = meta.implemented_interfaces().to_vec();
                    model.objects.push(ObjectType {
                        name: name.clone(),
                        description,
                        has_fields: !fields.is_empty(),
                        has_interfaces: !interfaces.is_empty(),
                        fields,
                        interfaces,
                    });
                    Some(model.objects.len() - 1)
                }
                TypeCategory::Interface => {
                    let fields = resolve_fields(meta.fields().unwrap_or_default(), &categories)?;
                    model.interfaces.push(InterfaceType {
                        name: name.clone(),
                        description,
                        has_fields: !fields.is_empty(),
                        fields,
                        interfaces: meta.implemented_interfaces().to_vec(),
                        implementing_types: vec![],
                        has_implementing_types: false,
                    });
                    Some(model.interfaces.len() - 1)
                }
                TypeCategory::Union => {
                    let possible_types = meta.possible_type_names().unwrap_or_default().to_vec();
                    model.unions.push(UnionType {
                        name: name.clone(),
                        description,
                        has_possible_types: !possible_types.is_empty(),
                        possible_types,
                    });
                    Some(model.unions.len() - 1)
                }
                TypeCategory::Enum => {
                    model.enums.push(EnumType {
                        name: name.clone(),
                        description,
                        values: meta
                            .enum_values()
                            .unwrap_or_default()
                            .iter()
                            .map(|v| EnumValue {
                                name: v.name.clone(),
                                description: v.description.clone(),
                                is_deprecated: v.deprecation_status.is_deprecated(),
                                deprecation_reason: v.deprecation_status.reason().map(ArcStr::from),
                            })
                            .collect(),
                    });
                    Some(model.enums.len() - 1)
                }
                TypeCategory::Input => {
                    let fields =
                        resolve_arguments(meta.input_fields().unwrap_or_default(), &categories)?;
                    model.input_objects.push(InputObjectType {
                        name: name.clone(),
                        description,
                        has_fields: !fields.is_empty(),
                        fields,
                    });
                    Some(model.input_objects.len() - 1)
                }
                TypeCategory::Scalar if meta.is_builtin() => None,
                TypeCategory::Scalar => {
                    let specified_by_url = match meta {
                        MetaType::Scalar(scalar) => scalar.specified_by_url.clone(),
                        _ => None,
                    };
                    model.scalars.push(ScalarType {
                        name: name.clone(),
                        description,
                        specified_by_url,
                    });
                    Some(model.scalars.len() - 1)
                }
            };

            if let Some(position) = position {
                model.positions.insert(name, position);
            }
        }

        model.categories = categories;
        model.link_abstract_types()?;

        __codegen_trace_debug!(
            "Built schema model: {} objects, {} interfaces, {} unions, {} enums, {} scalars, {} input objects",
            model.objects.len(),
            model.interfaces.len(),
            model.unions.len(),
            model.enums.len(),
            model.scalars.len(),
            model.input_objects.len(),
        );

        Ok(model)
    }

    /// Checks that implemented interfaces and union members exist, and
    /// records which objects implement each interface.
    fn link_abstract_types(&mut self) -> Result<(), CodegenError> {
        for object in &self.objects {
            for interface in &object.interfaces {
                if self.category_of(interface) != Some(TypeCategory::Interface) {
                    return Err(CodegenError::UnknownType {
                        name: interface.clone(),
                        parent_type: None,
                    });
                }
            }
        }

        for interface in &self.interfaces {
            if let Some(missing) = interface
                .interfaces
                .iter()
                .find(|i| self.category_of(i) != Some(TypeCategory::Interface))
            {
                return Err(CodegenError::UnknownType {
                    name: missing.clone(),
                    parent_type: None,
                });
            }
        }

        for union in &self.unions {
            if let Some(missing) = union
                .possible_types
                .iter()
                .find(|t| self.category_of(t) != Some(TypeCategory::Object))
            {
                return Err(CodegenError::UnknownType {
                    name: missing.clone(),
                    parent_type: None,
                });
            }
        }

        let objects = &self.objects;
        for interface in &mut self.interfaces {
            interface.implementing_types = objects
                .iter()
                .filter(|o| o.interfaces.contains(&interface.name))
                .map(|o| o.name.clone())
                .collect();
            interface.has_implementing_types = !interface.implementing_types.is_empty();
        }

        Ok(())
    }

    fn position_of(&self, name: &str, category: TypeCategory) -> Option<usize> {
        (self.category_of(name)? == category)
            .then(|| self.positions.get(name).copied())
            .flatten()
    }

    /// Name of the root type of operations of the given kind.
    pub fn root_type_name(&self, operation: OperationType) -> Option<&ArcStr> {
        match operation {
            OperationType::Query => Some(&self.query_type),
            OperationType::Mutation => self.mutation_type.as_ref(),
            OperationType::Subscription => self.subscription_type.as_ref(),
        }
    }

    /// Gets an object type by its name.
    pub fn object(&self, name: &str) -> Option<&ObjectType> {
        self.objects.get(self.position_of(name, TypeCategory::Object)?)
    }

    /// Gets an interface type by its name.
    pub fn interface(&self, name: &str) -> Option<&InterfaceType> {
        self.interfaces
            .get(self.position_of(name, TypeCategory::Interface)?)
    }

    /// Gets a union type by its name.
    pub fn union(&self, name: &str) -> Option<&UnionType> {
        self.unions.get(self.position_of(name, TypeCategory::Union)?)
    }

    /// Gets an enum type by its name.
    pub fn enum_type(&self, name: &str) -> Option<&EnumType> {
        self.enums.get(self.position_of(name, TypeCategory::Enum)?)
    }

    /// Gets a custom scalar type by its name.
    pub fn scalar(&self, name: &str) -> Option<&ScalarType> {
        self.scalars.get(self.position_of(name, TypeCategory::Scalar)?)
    }

    /// Gets an input object type by its name.
    pub fn input_object(&self, name: &str) -> Option<&InputObjectType> {
        self.input_objects
            .get(self.position_of(name, TypeCategory::Input)?)
    }

    /// Output fields of an object or of an interface type.
    pub fn output_fields(&self, type_name: &str) -> Option<&[Field]> {
        match self.category_of(type_name)? {
            TypeCategory::Object => self.object(type_name).map(|o| o.fields.as_slice()),
            TypeCategory::Interface => self.interface(type_name).map(|i| i.fields.as_slice()),
            _ => None,
        }
    }
}
