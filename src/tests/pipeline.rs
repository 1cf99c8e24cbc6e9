//! Runs whole schemas and document sets through [`generate`].

use pretty_assertions::assert_eq;
use serde_json::json;

use super::fixtures::schema_type;
use crate::{
    CodegenError, DocumentSource, GeneratorConfig, OperationType, SchemaType, SelectionNode,
    generate, model::spread_names,
};

fn sources(documents: &[(&str, &str)]) -> Vec<DocumentSource> {
    documents
        .iter()
        .map(|&(origin, source)| DocumentSource::new(origin, source))
        .collect()
}

const DOCUMENTS: &[(&str, &str)] = &[
    (
        "queries/me.graphql",
        "query Me { me { ...UserDetails } }",
    ),
    (
        "fragments/details.graphql",
        "fragment UserDetails on User { ...UserId name avatar(size: 32) }",
    ),
    (
        "mutations/update.graphql",
        r#"mutation Update($id: ID!, $role: Role = ADMIN) {
             updateUser(id: $id, input: {name: "x", role: $role}) { ...UserId }
           }"#,
    ),
    ("fragments/id.graphql", "fragment UserId on User { id }"),
];

#[test]
fn builds_the_whole_model() {
    let model = generate(&schema_type(), &sources(DOCUMENTS), &GeneratorConfig::default())
        .unwrap();

    assert!(model.settings.generate_schema && model.settings.generate_documents);
    assert_eq!(model.schema.query_type.as_str(), "Query");

    let documents = &model.documents;
    assert_eq!(
        documents
            .operations
            .iter()
            .map(|o| (o.display_name().to_string(), o.kind, o.origin.as_str()))
            .collect::<Vec<_>>(),
        [
            ("Me".to_owned(), OperationType::Query, "queries/me.graphql"),
            ("Update".to_owned(), OperationType::Mutation, "mutations/update.graphql"),
        ],
    );
    assert_eq!(
        documents
            .fragments
            .iter()
            .map(|f| f.name.as_str())
            .collect::<Vec<_>>(),
        ["UserId", "UserDetails"],
    );

    let update = documents.operation("Update").unwrap();
    assert!(update.is_mutation && update.has_variables);
    assert_eq!(update.root_type.as_str(), "Mutation");
    assert_eq!(
        update.variable_definitions[1].default_value.as_deref(),
        Some("ADMIN"),
    );
}

#[test]
fn documents_can_be_skipped() {
    let config = GeneratorConfig {
        generate_documents: false,
        ..GeneratorConfig::default()
    };
    let documents = sources(&[("broken.graphql", "query { nope")]);

    let model = generate(&schema_type(), &documents, &config).unwrap();

    assert!(!model.settings.generate_documents);
    assert!(!model.documents.has_operations && !model.documents.has_fragments);
    assert_eq!(model.schema.objects.len(), 4);
}

#[test]
fn flattens_on_demand() {
    let config = GeneratorConfig::from_json(r#"{"flattenTypes": true}"#).unwrap();

    let model = generate(&schema_type(), &sources(DOCUMENTS), &config).unwrap();

    let me = &model.documents.operation("Me").unwrap().selection_set[0];
    let SelectionNode::FieldSelection(me) = me else {
        panic!("expected a field, found {me:?}");
    };
    assert!(spread_names(&me.children).is_empty());
    assert_eq!(
        me.children
            .iter()
            .map(|c| match c {
                SelectionNode::FieldSelection(f) => f.response_name.as_str(),
                _ => panic!("not flat: {c:?}"),
            })
            .collect::<Vec<_>>(),
        ["id", "name", "avatar"],
    );
}

#[test]
fn errors_point_at_the_faulty_document() {
    let documents = sources(&[
        ("ok.graphql", "{ me { id } }"),
        ("bad.graphql", "{ me { age } }"),
    ]);

    let err = generate(&schema_type(), &documents, &GeneratorConfig::default()).unwrap_err();

    assert_eq!(
        err.root_cause(),
        &CodegenError::UnknownType {
            name: "age".into(),
            parent_type: Some("User".into()),
        },
    );
    assert!(err.to_string().starts_with("bad.graphql: "), "{err}");
}

#[test]
fn schema_without_query_root() {
    let schema = SchemaType::from_sdl("type Mutation { ping: Int }").unwrap();

    assert_eq!(
        generate(&schema, &[], &GeneratorConfig::default()),
        Err(CodegenError::MissingRootType),
    );
}

#[test]
fn serializes_for_backends() {
    let documents = sources(&[("me.graphql", "query Me($size: Int) { me { avatar(size: $size) } }")]);

    let model = generate(&schema_type(), &documents, &GeneratorConfig::default()).unwrap();
    let json = serde_json::to_value(&model).unwrap();

    assert_eq!(json["settings"], json!({"generateSchema": true, "generateDocuments": true}));
    assert_eq!(json["schema"]["queryType"], json!("Query"));
    assert_eq!(json["schema"]["mutationType"], json!("Mutation"));
    assert!(json["schema"].get("categories").is_none());

    let me = &json["documents"]["operations"][0];
    assert_eq!(me["operationType"], json!("query"));
    assert_eq!(me["isQuery"], json!(true));
    assert_eq!(me["variableDefinitions"][0]["type"]["name"], json!("Int"));

    let avatar = &me["selectionSet"][0]["children"][0];
    assert_eq!(avatar["kind"], json!("FieldSelection"));
    assert_eq!(avatar["responseName"], json!("avatar"));
    assert_eq!(
        avatar["type"],
        json!({
            "name": "Url",
            "isArray": false,
            "isRequired": false,
            "isArrayItemRequired": false,
            "dimensionOfArray": 0,
            "category": "SCALAR",
        }),
    );
    assert_eq!(
        avatar["arguments"],
        json!([{"name": "size", "value": "$size"}]),
    );
}
