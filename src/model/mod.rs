//! Portable model of a schema and its documents, as handed to code generators.

mod descriptor;
mod document;
mod field;
mod flatten;
mod merge;
mod schema;
mod transform;

pub use self::{
    descriptor::{TypeCategory, TypeDescriptor, TypeLookup, classify, resolve_type},
    document::{
        Document, DocumentSource, FieldSelection, Fragment, FragmentSpread, InlineFragment,
        Operation, SelectionArgument, SelectionNode, Variable, spread_names,
    },
    field::{CategoryFlags, Field, resolve_arguments, resolve_fields},
    flatten::flatten_document,
    merge::merge_documents,
    schema::{
        EnumType, EnumValue, InputObjectType, InterfaceType, ObjectType, ScalarType, SchemaModel,
        UnionType,
    },
    transform::transform_document,
};
