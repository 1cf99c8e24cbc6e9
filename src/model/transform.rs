//! Turns executable documents into the portable model.

use arcstr::ArcStr;
use graphql_parser::{
    Pos,
    query::{
        Definition, Field as FieldNode, FragmentDefinition, OperationDefinition, Selection,
        SelectionSet, TypeCondition, VariableDefinition, parse_query,
    },
};

use crate::{
    CodegenError,
    ast::{OperationType, PrintedValue, Type},
    model::{
        Document, DocumentSource, FieldSelection, Fragment, FragmentSpread, InlineFragment,
        Operation, SchemaModel, SelectionArgument, SelectionNode, TypeCategory, TypeDescriptor,
        TypeLookup, Variable, resolve_type,
    },
};

/// Builds the model of a single document against the `schema`.
///
/// Fragment spreads are kept as references by name: the fragment they refer
/// to may be defined in another document. Errors carry the origin of the
/// document.
pub fn transform_document(
    source: &DocumentSource,
    schema: &SchemaModel,
) -> Result<Document, CodegenError> {
    __codegen_span_debug!("transform_document", origin = %source.origin);

    Transformer { schema, source }
        .transform()
        .map_err(|e| e.in_document(&source.origin))
}

struct Transformer<'s> {
    schema: &'s SchemaModel,
    source: &'s DocumentSource,
}

impl Transformer<'_> {
    fn transform(&self) -> Result<Document, CodegenError> {
        let document = parse_query::<String>(&self.source.source)
            .map_err(|e| CodegenError::Parse(e.to_string()))?;

        let mut operations = vec![];
        let mut fragments = vec![];
        for definition in &document.definitions {
            match definition {
                Definition::Operation(op) => operations.push(self.operation(op)?),
                Definition::Fragment(fragment) => fragments.push(self.fragment(fragment)?),
            }
        }

        __codegen_trace_debug!(
            "Transformed {}: {} operations, {} fragments",
            self.source.origin,
            operations.len(),
            fragments.len(),
        );

        Ok(Document::new(operations, fragments))
    }

    /// Text of a definition starting at `start` and closed by the brace of
    /// its `selection_set`.
    fn source_text(&self, start: Pos, selection_set: &SelectionSet<'_, String>) -> ArcStr {
        let source = self.source.source.as_str();
        let (Some(from), Some(brace)) = (
            byte_offset(source, start),
            byte_offset(source, selection_set.span.1),
        ) else {
            return ArcStr::default();
        };
        let to = if source[brace..].starts_with('}') {
            Some(brace + 1)
        } else {
            source[..brace].rfind('}').map(|i| i + 1)
        };
        to.and_then(|to| source.get(from..to))
            .map(ArcStr::from)
            .unwrap_or_default()
    }

    fn operation(&self, op: &OperationDefinition<'_, String>) -> Result<Operation, CodegenError> {
        let (kind, name, variables, selection_set, start) = match op {
            OperationDefinition::SelectionSet(set) => {
                (OperationType::Query, None, &[][..], set, set.span.0)
            }
            OperationDefinition::Query(q) => (
                OperationType::Query,
                q.name.as_deref(),
                &q.variable_definitions[..],
                &q.selection_set,
                q.position,
            ),
            OperationDefinition::Mutation(m) => (
                OperationType::Mutation,
                m.name.as_deref(),
                &m.variable_definitions[..],
                &m.selection_set,
                m.position,
            ),
            OperationDefinition::Subscription(s) => (
                OperationType::Subscription,
                s.name.as_deref(),
                &s.variable_definitions[..],
                &s.selection_set,
                s.position,
            ),
        };
        let root = self
            .schema
            .root_type_name(kind)
            .ok_or(CodegenError::UnknownRootOperation(kind))?;

        let variable_definitions = variables
            .iter()
            .map(|def| self.variable(def))
            .collect::<Result<Vec<_>, _>>()?;

        let name = name.map(ArcStr::from);
        __codegen_trace!("Transforming {kind} {}", name.as_deref().unwrap_or("<anonymous>"));

        Ok(Operation {
            name,
            kind,
            selection_set: self.selection_set(selection_set, root)?,
            root_type: root.clone(),
            document: self.source_text(start, selection_set),
            origin: self.source.origin.clone(),
            is_query: kind == OperationType::Query,
            is_mutation: kind == OperationType::Mutation,
            is_subscription: kind == OperationType::Subscription,
            has_variables: !variable_definitions.is_empty(),
            variable_definitions,
        })
    }

    fn variable(&self, def: &VariableDefinition<'_, String>) -> Result<Variable, CodegenError> {
        Ok(Variable {
            name: def.name.as_str().into(),
            ty: resolve_type(&Type::from(&def.var_type), self.schema)?,
            default_value: def
                .default_value
                .as_ref()
                .map(|v| PrintedValue(v).to_arcstr()),
        })
    }

    fn fragment(&self, fragment: &FragmentDefinition<'_, String>) -> Result<Fragment, CodegenError> {
        let TypeCondition::On(condition) = &fragment.type_condition;
        let on_type = self.composite_type(condition)?;
        __codegen_trace!("Transforming fragment {} on {on_type}", fragment.name);

        Ok(Fragment {
            name: fragment.name.as_str().into(),
            selection_set: self.selection_set(&fragment.selection_set, &on_type)?,
            on_type,
            document: self.source_text(fragment.position, &fragment.selection_set),
            origin: self.source.origin.clone(),
        })
    }

    /// Resolves the `selections` made on the `parent` type.
    fn selection_set(
        &self,
        selections: &SelectionSet<'_, String>,
        parent: &ArcStr,
    ) -> Result<Vec<SelectionNode>, CodegenError> {
        selections
            .items
            .iter()
            .map(|selection| match selection {
                Selection::Field(field) => {
                    Ok(SelectionNode::FieldSelection(self.field(field, parent)?))
                }
                Selection::FragmentSpread(spread) => {
                    Ok(SelectionNode::FragmentSpread(FragmentSpread {
                        fragment_name: spread.fragment_name.as_str().into(),
                    }))
                }
                Selection::InlineFragment(inline) => {
                    let on_type = match &inline.type_condition {
                        Some(TypeCondition::On(condition)) => self.composite_type(condition)?,
                        None => parent.clone(),
                    };
                    Ok(SelectionNode::InlineFragment(InlineFragment {
                        children: self.selection_set(&inline.selection_set, &on_type)?,
                        on_type,
                    }))
                }
            })
            .collect()
    }

    fn field(
        &self,
        field: &FieldNode<'_, String>,
        parent: &ArcStr,
    ) -> Result<FieldSelection, CodegenError> {
        let name = field.name.as_str();
        let ty = if name == "__typename" {
            TypeDescriptor {
                is_required: true,
                ..TypeDescriptor::named(arcstr::literal!("String"), TypeCategory::Scalar)
            }
        } else {
            self.schema
                .output_fields(parent)
                .and_then(|fields| fields.iter().find(|f| f.name.as_str() == name))
                .map(|f| f.ty.clone())
                .ok_or_else(|| CodegenError::UnknownType {
                    name: name.into(),
                    parent_type: Some(parent.clone()),
                })?
        };

        let children = self.selection_set(&field.selection_set, &ty.name)?;
        let arguments = field
            .arguments
            .iter()
            .map(|(name, value)| SelectionArgument {
                name: name.as_str().into(),
                value: PrintedValue(value).to_arcstr(),
            })
            .collect();
        let alias = field.alias.as_deref().map(ArcStr::from);

        Ok(FieldSelection {
            name: name.into(),
            response_name: alias.clone().unwrap_or_else(|| name.into()),
            alias,
            ty,
            arguments,
            children,
            type_conditions: vec![],
        })
    }

    /// Checks that a type condition names an object, an interface or a union.
    fn composite_type(&self, name: &str) -> Result<ArcStr, CodegenError> {
        match self.schema.category_of(name) {
            Some(category) if category.is_composite() => Ok(name.into()),
            _ => Err(CodegenError::UnknownType {
                name: name.into(),
                parent_type: None,
            }),
        }
    }
}

/// Byte offset of a 1-based line and column, columns counted in characters.
fn byte_offset(source: &str, pos: Pos) -> Option<usize> {
    let line_start = match pos.line {
        0 => return None,
        1 => 0,
        line => source.match_indices('\n').nth(line - 2)?.0 + 1,
    };
    let column = pos.column.checked_sub(1)?;
    let line = &source[line_start..];
    line.char_indices()
        .map(|(i, _)| i)
        .chain([line.len()])
        .nth(column)
        .map(|i| line_start + i)
}

#[cfg(test)]
mod tests {
    use arcstr::ArcStr;
    use pretty_assertions::assert_eq;

    use super::transform_document;
    use crate::{
        CodegenError,
        ast::OperationType,
        model::{
            DocumentSource, FieldSelection, FragmentSpread, SelectionArgument, SelectionNode,
            TypeCategory,
        },
        tests::fixtures::{schema, transform},
    };

    fn field(node: &SelectionNode) -> &FieldSelection {
        match node {
            SelectionNode::FieldSelection(f) => f,
            _ => panic!("not a field selection: {node:?}"),
        }
    }

    fn fail(source: &str) -> CodegenError {
        transform_document(&DocumentSource::new("doc.graphql", source), &schema()).unwrap_err()
    }

    #[test]
    fn operation_with_variables() {
        let source = "query Users($id: ID!, $size: Int = 32) {\n  \
                      user(id: $id) { id picture: avatar(size: $size) }\n}";
        let document = transform("users.graphql", source);

        assert!(document.has_operations);
        assert!(!document.has_fragments);

        let op = &document.operations[0];
        assert_eq!(op.name.as_deref(), Some("Users"));
        assert_eq!(op.kind, OperationType::Query);
        assert!(op.is_query && !op.is_mutation && !op.is_subscription);
        assert!(op.has_variables);
        assert_eq!(op.document.as_str(), source);
        assert_eq!(op.origin.as_str(), "users.graphql");

        let vars = &op.variable_definitions;
        assert_eq!(vars[0].name.as_str(), "id");
        assert!(vars[0].ty.is_required);
        assert_eq!(vars[1].default_value.as_deref(), Some("32"));

        let user = field(&op.selection_set[0]);
        assert_eq!(user.ty.name.as_str(), "User");
        assert_eq!(user.ty.category, TypeCategory::Object);
        assert_eq!(
            user.arguments,
            [SelectionArgument {
                name: "id".into(),
                value: "$id".into(),
            }],
        );

        let picture = field(&user.children[1]);
        assert_eq!(picture.name.as_str(), "avatar");
        assert_eq!(picture.alias.as_deref(), Some("picture"));
        assert_eq!(picture.response_name.as_str(), "picture");
        assert_eq!(picture.ty.name.as_str(), "Url");
        assert!(picture.children.is_empty());
    }

    #[test]
    fn fragments_and_inline_fragments() {
        let document = transform(
            "search.graphql",
            r#"
            fragment UserFields on User { id name }

            {
              search(text: "x") {
                __typename
                ... on User { ...UserFields }
                ... on Robot { serial }
              }
              me { ... { email } }
            }
            "#,
        );

        let fragment = &document.fragments[0];
        assert_eq!(fragment.name.as_str(), "UserFields");
        assert_eq!(fragment.on_type.as_str(), "User");
        assert_eq!(fragment.document.as_str(), "fragment UserFields on User { id name }");
        assert_eq!(fragment.selection_set.len(), 2);

        let op = &document.operations[0];
        assert_eq!(op.name, None);
        assert_eq!(op.display_name().as_str(), "anonymous operation");
        assert!(!op.has_variables);

        let search = field(&op.selection_set[0]);
        assert_eq!(search.ty.category, TypeCategory::Union);
        assert_eq!(search.arguments[0].value.as_str(), r#""x""#);

        let typename = field(&search.children[0]);
        assert_eq!(typename.ty.name.as_str(), "String");
        assert!(typename.ty.is_required);

        let SelectionNode::InlineFragment(on_user) = &search.children[1] else {
            panic!("expected an inline fragment");
        };
        assert_eq!(on_user.on_type.as_str(), "User");
        assert_eq!(
            on_user.children,
            [SelectionNode::FragmentSpread(FragmentSpread {
                fragment_name: "UserFields".into(),
            })],
        );

        let me = field(&op.selection_set[1]);
        let SelectionNode::InlineFragment(untyped) = &me.children[0] else {
            panic!("expected an inline fragment");
        };
        assert_eq!(untyped.on_type, ArcStr::from("User"));
        assert_eq!(field(&untyped.children[0]).ty.name.as_str(), "String");
    }

    #[test]
    fn spreads_of_unknown_fragments_are_kept() {
        let document = transform("a.graphql", "{ me { ...DefinedElsewhere } }");

        let me = field(&document.operations[0].selection_set[0]);
        assert_eq!(
            me.children[0].spread_names(),
            [&ArcStr::from("DefinedElsewhere")],
        );
    }

    #[test]
    fn unknown_fields_and_types() {
        assert_eq!(
            fail("{ me { age } }"),
            CodegenError::UnknownType {
                name: "age".into(),
                parent_type: Some("User".into()),
            }
            .in_document(&"doc.graphql".into()),
        );
        assert_eq!(
            fail("{ search(text: \"\") { id } }").root_cause(),
            &CodegenError::UnknownType {
                name: "id".into(),
                parent_type: Some("SearchResult".into()),
            },
        );
        assert_eq!(
            fail("fragment F on Ghost { id }").root_cause(),
            &CodegenError::UnknownType {
                name: "Ghost".into(),
                parent_type: None,
            },
        );
        assert_eq!(
            fail("query ($f: Filter) { me { id } }").root_cause(),
            &CodegenError::UnknownType {
                name: "Filter".into(),
                parent_type: None,
            },
        );
    }

    #[test]
    fn operations_need_a_root_type() {
        assert_eq!(
            fail("subscription { me { id } }").root_cause(),
            &CodegenError::UnknownRootOperation(OperationType::Subscription),
        );

        let document = transform(
            "save.graphql",
            "mutation Save($input: UserInput!) { updateUser(id: 1, input: $input) { id } }",
        );
        let save = &document.operations[0];
        assert!(save.is_mutation);
        assert_eq!(save.variable_definitions[0].ty.category, TypeCategory::Input);
        assert_eq!(
            field(&save.selection_set[0]).arguments[1].value.as_str(),
            "$input",
        );
    }

    #[test]
    fn document_text_is_taken_from_the_source() {
        let source = "# café\nquery A { search(text: \"naïve\") { __typename } }\n\n  \
                      mutation B { updateUser(id: 1, input: {name: \"ü\"}) { id } }\n";
        let document = transform("two.graphql", source);

        let texts = document
            .operations
            .iter()
            .map(|op| op.document.as_str())
            .collect::<Vec<_>>();
        assert_eq!(
            texts,
            [
                r#"query A { search(text: "naïve") { __typename } }"#,
                r#"mutation B { updateUser(id: 1, input: {name: "ü"}) { id } }"#,
            ],
        );
    }

    #[test]
    fn parse_errors_carry_the_origin() {
        let err = fail("{ me { id }");

        assert!(err.to_string().starts_with("doc.graphql: "), "{err}");
        assert!(matches!(err.root_cause(), CodegenError::Parse(_)), "{err:?}");
    }
}
