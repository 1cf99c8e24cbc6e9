//! Schema shared by the tests of the document passes.

use crate::{
    model::{Document, DocumentSource, SchemaModel, transform_document},
    schema::SchemaType,
};

pub(crate) const SCHEMA: &str = r#"
    type Query {
      me: User
      user(id: ID!): User
      node(id: ID!): Node
      search(text: String!, first: Int = 10): [SearchResult!]!
    }

    type Mutation {
      updateUser(id: ID!, input: UserInput!): User
    }

    interface Node {
      id: ID!
    }

    type User implements Node {
      id: ID!
      name: String
      email: String!
      role: Role
      avatar(size: Int = 64): Url
      friends(first: Int): [User!]
    }

    type Robot implements Node {
      id: ID!
      serial: Int!
      owner: User
    }

    union SearchResult = User | Robot

    enum Role { ADMIN MEMBER }

    scalar Url

    input UserInput {
      name: String!
      role: Role = MEMBER
    }
"#;

pub(crate) fn schema_type() -> SchemaType {
    SchemaType::from_sdl(SCHEMA).expect("fixture schema is valid")
}

pub(crate) fn schema() -> SchemaModel {
    SchemaModel::build(&schema_type()).expect("fixture schema has a query root")
}

/// Transforms a single document against the fixture schema.
pub(crate) fn transform(origin: &str, source: &str) -> Document {
    transform_document(&DocumentSource::new(origin, source), &schema())
        .expect("document matches the fixture schema")
}
