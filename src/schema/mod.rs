//! Internal representation of a schema, and translators into it.

pub mod meta;
pub mod model;
pub mod translate;

pub use self::model::SchemaType;
