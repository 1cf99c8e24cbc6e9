//! Conversions from the supported schema sources into a [`SchemaType`].

pub mod introspection;
pub mod sdl;

use crate::{CodegenError, schema::SchemaType};

/// Reads a [`SchemaType`] out of some representation `T` of a schema.
pub trait SchemaTranslator<T: ?Sized> {
    /// Builds the [`SchemaType`] described by `input`.
    fn translate_schema(input: &T) -> Result<SchemaType, CodegenError>;
}
