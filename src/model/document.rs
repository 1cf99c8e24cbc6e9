//! Portable model of operations and fragments.

use arcstr::ArcStr;
use serde::Serialize;

use crate::{ast::OperationType, model::TypeDescriptor};

/// A document to transform, with the location it was loaded from.
///
/// The location only ends up in error messages and in the model, where
/// backends may use it to place generated files next to their source.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DocumentSource {
    /// Where the document was loaded from, e.g. a file path.
    pub origin: ArcStr,
    /// The document text.
    pub source: ArcStr,
}

impl DocumentSource {
    /// Pairs a document text with its origin.
    pub fn new(origin: impl Into<ArcStr>, source: impl Into<ArcStr>) -> Self {
        Self {
            origin: origin.into(),
            source: source.into(),
        }
    }
}

/// Argument passed to a selected field, its value printed in GraphQL syntax.
#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct SelectionArgument {
    pub name: ArcStr,
    pub value: ArcStr,
}

/// A selected field.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSelection {
    /// Name of the field in the schema.
    pub name: ArcStr,
    /// Alias, if the field is selected under another name.
    pub alias: Option<ArcStr>,
    /// Key of the field in a response: its alias or its name.
    pub response_name: ArcStr,
    /// Type of the field.
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
    /// Arguments passed to the field, in source order.
    pub arguments: Vec<SelectionArgument>,
    /// Sub-selections of a composite field.
    pub children: Vec<SelectionNode>,
    /// Types the field is only selected on, once flattened out of fragments
    /// on more specific types. Empty when it's selected whatever the type.
    pub type_conditions: Vec<ArcStr>,
}

/// A selection within an inline fragment, e.g. `... on User { name }`.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineFragment {
    /// Type the children are selected on.
    pub on_type: ArcStr,
    #[expect(missing_docs, reason = "self-explanatory")]
    pub children: Vec<SelectionNode>,
}

/// A reference to a named fragment, e.g. `...UserFields`.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentSpread {
    /// Name of the spread fragment.
    pub fragment_name: ArcStr,
}

/// Entry of a selection set.
#[expect(missing_docs, reason = "self-explanatory")]
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum SelectionNode {
    FieldSelection(FieldSelection),
    InlineFragment(InlineFragment),
    FragmentSpread(FragmentSpread),
}

impl SelectionNode {
    /// Names of the fragments spread in this node or in any of its children.
    pub fn spread_names(&self) -> Vec<&ArcStr> {
        let mut names = vec![];
        self.collect_spread_names(&mut names);
        names
    }

    fn collect_spread_names<'a>(&'a self, names: &mut Vec<&'a ArcStr>) {
        match self {
            Self::FieldSelection(FieldSelection { children, .. })
            | Self::InlineFragment(InlineFragment { children, .. }) => {
                for child in children {
                    child.collect_spread_names(names);
                }
            }
            Self::FragmentSpread(spread) => names.push(&spread.fragment_name),
        }
    }
}

/// Names of the fragments spread anywhere in `selection_set`, in source order.
pub fn spread_names(selection_set: &[SelectionNode]) -> Vec<&ArcStr> {
    selection_set
        .iter()
        .flat_map(SelectionNode::spread_names)
        .collect()
}

/// A named fragment.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fragment {
    #[expect(missing_docs, reason = "self-explanatory")]
    pub name: ArcStr,
    /// Type condition of the fragment.
    pub on_type: ArcStr,
    #[expect(missing_docs, reason = "self-explanatory")]
    pub selection_set: Vec<SelectionNode>,
    /// Source text of the fragment definition.
    pub document: ArcStr,
    /// Location of the document defining the fragment.
    pub origin: ArcStr,
}

impl Fragment {
    /// Whether both fragments select the same fields on the same type.
    ///
    /// Where they were defined and how they were formatted doesn't matter.
    pub fn same_selection(&self, other: &Self) -> bool {
        self.on_type == other.on_type && self.selection_set == other.selection_set
    }
}

/// A variable declared by an operation.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    #[expect(missing_docs, reason = "self-explanatory")]
    pub name: ArcStr,
    #[expect(missing_docs, reason = "self-explanatory")]
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
    /// Default value, in GraphQL syntax.
    pub default_value: Option<ArcStr>,
}

/// A query, mutation or subscription.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[expect(missing_docs, reason = "self-explanatory")]
pub struct Operation {
    /// Name of the operation, `None` when anonymous.
    pub name: Option<ArcStr>,
    #[serde(rename = "operationType")]
    pub kind: OperationType,
    /// Name of the root type the selection set applies to.
    pub root_type: ArcStr,
    pub variable_definitions: Vec<Variable>,
    pub selection_set: Vec<SelectionNode>,
    /// Source text of the operation definition.
    pub document: ArcStr,
    /// Location of the document defining the operation.
    pub origin: ArcStr,
    pub is_query: bool,
    pub is_mutation: bool,
    pub is_subscription: bool,
    pub has_variables: bool,
}

impl Operation {
    /// Name to refer to this operation by in messages.
    pub fn display_name(&self) -> ArcStr {
        self.name
            .clone()
            .unwrap_or_else(|| arcstr::literal!("anonymous operation"))
    }
}

/// Operations and fragments of one or more documents.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[expect(missing_docs, reason = "self-explanatory")]
    pub operations: Vec<Operation>,
    /// Fragments, each one after all the fragments it spreads once merged.
    pub fragments: Vec<Fragment>,
    #[expect(missing_docs, reason = "self-explanatory")]
    pub has_operations: bool,
    #[expect(missing_docs, reason = "self-explanatory")]
    pub has_fragments: bool,
}

impl Document {
    /// Creates a document out of its operations and fragments.
    pub fn new(operations: Vec<Operation>, fragments: Vec<Fragment>) -> Self {
        Self {
            has_operations: !operations.is_empty(),
            has_fragments: !fragments.is_empty(),
            operations,
            fragments,
        }
    }

    /// Gets a fragment by its name.
    pub fn fragment(&self, name: &str) -> Option<&Fragment> {
        self.fragments.iter().find(|f| f.name.as_str() == name)
    }

    /// Gets an operation by its name.
    pub fn operation(&self, name: &str) -> Option<&Operation> {
        self.operations
            .iter()
            .find(|o| o.name.as_deref() == Some(name))
    }
}
