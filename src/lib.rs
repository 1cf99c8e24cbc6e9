#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

// Only used by tests.
#[cfg(test)]
use pretty_assertions as _;
#[cfg(test)]
use tokio as _;

#[cfg(feature = "tracing")]
#[doc(hidden)]
pub use tracing;

#[macro_use]
mod macros;
pub mod ast;
pub mod config;
pub mod model;
pub mod plugin;
pub mod schema;

#[cfg(test)]
mod tests;

use arcstr::ArcStr;
use derive_more::with_trait::{Display, Error};
use serde::Serialize;

pub use crate::{
    ast::OperationType,
    config::{GeneratorConfig, PluginConfig},
    model::{
        Document, DocumentSource, Field, Fragment, Operation, SchemaModel, SelectionNode,
        TypeCategory, TypeDescriptor, TypeLookup, classify, flatten_document, merge_documents,
        resolve_type, transform_document,
    },
    plugin::{Plugin, PluginContext, PluginOutput, execute_plugin, execute_plugins, merge_outputs},
    schema::{SchemaType, meta::MetaType},
};

/// An error that prevents building the model of a schema and its documents.
///
/// None of these are transient: each one points at malformed input.
#[derive(Clone, Debug, Display, Error, PartialEq)]
pub enum CodegenError {
    /// A chain of type modifiers that does not end in a named type.
    #[display("Malformed type reference: {_0}")]
    MalformedTypeReference(#[error(not(source))] String),

    /// The schema declares no query root type.
    #[display("Schema declares no query root type")]
    MissingRootType,

    /// A type, or a field of `parent_type`, that the schema does not define.
    #[display("{}", unknown_type_message(name, parent_type))]
    UnknownType {
        /// Name of the missing type, or of the missing field.
        name: ArcStr,
        /// Type the missing field was selected on.
        parent_type: Option<ArcStr>,
    },

    /// An operation whose kind has no root type in the schema.
    #[display("Schema declares no root type for {_0} operations")]
    UnknownRootOperation(#[error(not(source))] OperationType),

    /// Two fragments share a name but select different fields.
    #[display("Fragment \"{_0}\" is defined more than once with different selections")]
    DuplicateFragmentDefinition(#[error(not(source))] ArcStr),

    /// A fragment spread naming a fragment that no document defines.
    #[display("Unknown fragment \"{fragment}\" spread in \"{referenced_from}\"")]
    UnresolvedFragmentReference {
        /// Name of the missing fragment.
        fragment: ArcStr,
        /// Fragment or operation containing the spread.
        referenced_from: ArcStr,
    },

    /// A fragment that, directly or transitively, spreads itself.
    #[display("Cannot spread fragment \"{_0}\" within itself")]
    CyclicFragmentReference(#[error(not(source))] ArcStr),

    /// A schema or document source that is not valid GraphQL.
    #[display("{_0}")]
    Parse(#[error(not(source))] String),

    /// An introspection result that cannot be read.
    #[display("Invalid introspection result: {_0}")]
    Introspection(#[error(not(source))] String),

    /// A named type defined more than once in the schema.
    #[display("Type \"{_0}\" is defined more than once")]
    DuplicateTypeDefinition(#[error(not(source))] ArcStr),

    /// A plugin refused to render the model it was given.
    #[display("Plugin \"{plugin}\" validation failed: {message}")]
    PluginValidation {
        /// Name of the plugin.
        plugin: ArcStr,
        /// Reason given by the plugin.
        message: String,
    },

    /// An error raised while transforming the document at `origin`.
    #[display("{origin}: {source}")]
    InDocument {
        /// Location the document was loaded from.
        origin: ArcStr,
        /// The underlying error.
        source: Box<CodegenError>,
    },
}

fn unknown_type_message(name: &ArcStr, parent_type: &Option<ArcStr>) -> String {
    match parent_type {
        Some(parent) => format!("Unknown field \"{name}\" on type \"{parent}\""),
        None => format!("Unknown type \"{name}\""),
    }
}

impl CodegenError {
    /// Attaches the `origin` of the document this error was raised for.
    #[must_use]
    pub fn in_document(self, origin: &ArcStr) -> Self {
        Self::InDocument {
            origin: origin.clone(),
            source: Box::new(self),
        }
    }

    /// The error without any [`CodegenError::InDocument`] context.
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::InDocument { source, .. } => source.root_cause(),
            e => e,
        }
    }
}

/// Settings a backend needs to know which parts of the model to emit.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Whether schema types should be emitted.
    pub generate_schema: bool,
    /// Whether operations and fragments should be emitted.
    pub generate_documents: bool,
}

/// Everything handed to emission backends: the schema model, the merged
/// documents and what to emit of them.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodegenModel {
    /// Model of the schema.
    pub schema: SchemaModel,
    /// All documents merged into one, fragments in dependency order.
    pub documents: Document,
    /// What backends should emit.
    pub settings: Settings,
}

/// Builds the [`CodegenModel`] of a `schema` and its `documents`.
///
/// Documents are transformed one by one, merged, and flattened when
/// [`GeneratorConfig::flatten_types`] is set. With
/// [`GeneratorConfig::generate_documents`] unset the documents are not even
/// parsed, and the model carries an empty [`Document`].
pub fn generate(
    schema: &SchemaType,
    documents: &[DocumentSource],
    config: &GeneratorConfig,
) -> Result<CodegenModel, CodegenError> {
    let schema = SchemaModel::build(schema)?;

    let documents = if config.generate_documents {
        let transformed = documents
            .iter()
            .map(|source| transform_document(source, &schema))
            .collect::<Result<Vec<_>, _>>()?;
        let merged = merge_documents(transformed)?;

        if config.flatten_types {
            flatten_document(&merged)?
        } else {
            merged
        }
    } else {
        __codegen_trace_debug!("Skipping {} documents", documents.len());
        Document::default()
    };

    __codegen_trace_debug!(
        "Built model: {} operations, {} fragments",
        documents.operations.len(),
        documents.fragments.len(),
    );

    Ok(CodegenModel {
        schema,
        documents,
        settings: Settings {
            generate_schema: config.generate_schema,
            generate_documents: config.generate_documents,
        },
    })
}
