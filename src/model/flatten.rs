//! Inlines fragments for backends that need one flat field list per type.

use arcstr::ArcStr;
use fnv::FnvHashMap;

use crate::{
    CodegenError,
    model::{Document, FieldSelection, Fragment, Operation, SelectionNode},
};

/// Replaces every fragment spread and inline fragment of the `document` by
/// the fields it selects.
///
/// Fields selected on a more specific type than the one of their selection
/// set are tagged with that type. Fields selected more than once under the
/// same response name and of the same type are merged, keeping their first
/// position and the types of all the branches selecting them. Flattening a flat document returns it unchanged.
pub fn flatten_document(document: &Document) -> Result<Document, CodegenError> {
    __codegen_span_debug!("flatten_document");

    let fragments = document
        .fragments
        .iter()
        .map(|f| (f.name.as_str(), f))
        .collect::<FnvHashMap<_, _>>();

    let operations = document
        .operations
        .iter()
        .map(|op| {
            let mut flattener = Flattener {
                fragments: &fragments,
                owner: op.display_name(),
                stack: vec![],
            };
            Ok(Operation {
                selection_set: flattener.selection_set(&op.selection_set, &op.root_type)?,
                ..op.clone()
            })
        })
        .collect::<Result<Vec<_>, CodegenError>>()?;

    let flat_fragments = document
        .fragments
        .iter()
        .map(|fragment| {
            let mut flattener = Flattener {
                fragments: &fragments,
                owner: fragment.name.clone(),
                stack: vec![fragment.name.as_str()],
            };
            Ok(Fragment {
                selection_set: flattener.selection_set(&fragment.selection_set, &fragment.on_type)?,
                ..fragment.clone()
            })
        })
        .collect::<Result<Vec<_>, CodegenError>>()?;

    __codegen_trace_debug!(
        "Flattened {} operations and {} fragments",
        operations.len(),
        flat_fragments.len(),
    );

    Ok(Document::new(operations, flat_fragments))
}

struct Flattener<'d> {
    fragments: &'d FnvHashMap<&'d str, &'d Fragment>,
    /// Operation or fragment being flattened.
    owner: ArcStr,
    /// Fragments being inlined, outermost first.
    stack: Vec<&'d str>,
}

impl<'d> Flattener<'d> {
    fn selection_set(
        &mut self,
        nodes: &'d [SelectionNode],
        parent: &ArcStr,
    ) -> Result<Vec<SelectionNode>, CodegenError> {
        let mut fields = vec![];
        self.collect(nodes, parent, &mut fields)?;
        Ok(fields)
    }

    fn collect(
        &mut self,
        nodes: &'d [SelectionNode],
        parent: &ArcStr,
        fields: &mut Vec<SelectionNode>,
    ) -> Result<(), CodegenError> {
        for node in nodes {
            match node {
                SelectionNode::FieldSelection(field) => {
                    let flat = FieldSelection {
                        name: field.name.clone(),
                        alias: field.alias.clone(),
                        response_name: field.response_name.clone(),
                        ty: field.ty.clone(),
                        arguments: field.arguments.clone(),
                        children: self.selection_set(&field.children, &field.ty.name)?,
                        type_conditions: field.type_conditions.clone(),
                    };
                    merge_field(fields, flat);
                }
                SelectionNode::InlineFragment(inline) => {
                    self.collect_branch(&inline.children, &inline.on_type, parent, fields)?;
                }
                SelectionNode::FragmentSpread(spread) => {
                    let fragment = *self
                        .fragments
                        .get(spread.fragment_name.as_str())
                        .ok_or_else(|| CodegenError::UnresolvedFragmentReference {
                            fragment: spread.fragment_name.clone(),
                            referenced_from: self.owner.clone(),
                        })?;
                    if self.stack.contains(&fragment.name.as_str()) {
                        return Err(CodegenError::CyclicFragmentReference(fragment.name.clone()));
                    }

                    __codegen_trace!("Inlining fragment {} into {}", fragment.name, self.owner);

                    self.stack.push(fragment.name.as_str());
                    self.collect_branch(&fragment.selection_set, &fragment.on_type, parent, fields)?;
                    self.stack.pop();
                }
            }
        }
        Ok(())
    }

    /// Lifts the fields selected on `on_type` into a selection set on `parent`.
    fn collect_branch(
        &mut self,
        nodes: &'d [SelectionNode],
        on_type: &ArcStr,
        parent: &ArcStr,
        fields: &mut Vec<SelectionNode>,
    ) -> Result<(), CodegenError> {
        let mut branch = vec![];
        self.collect(nodes, on_type, &mut branch)?;

        for node in branch {
            let SelectionNode::FieldSelection(mut field) = node else {
                continue;
            };
            if on_type != parent && field.type_conditions.is_empty() {
                field.type_conditions = vec![on_type.clone()];
            }
            merge_field(fields, field);
        }
        Ok(())
    }
}

/// Adds `field` to `nodes`, merging it into a field of the same response name
/// and type if there is one.
fn merge_field(nodes: &mut Vec<SelectionNode>, field: FieldSelection) {
    let existing = nodes.iter_mut().find_map(|node| match node {
        SelectionNode::FieldSelection(f)
            if f.response_name == field.response_name && f.ty == field.ty =>
        {
            Some(f)
        }
        _ => None,
    });

    match existing {
        Some(existing) => {
            // Selected whatever the type by one of the copies.
            if existing.type_conditions.is_empty() || field.type_conditions.is_empty() {
                existing.type_conditions.clear();
            } else {
                for condition in field.type_conditions {
                    if !existing.type_conditions.contains(&condition) {
                        existing.type_conditions.push(condition);
                    }
                }
            }
            for child in field.children {
                if let SelectionNode::FieldSelection(child) = child {
                    merge_field(&mut existing.children, child);
                }
            }
        }
        None => nodes.push(SelectionNode::FieldSelection(field)),
    }
}
