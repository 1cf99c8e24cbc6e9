//! Merges documents and orders their fragments.

use arcstr::ArcStr;
use fnv::{FnvBuildHasher, FnvHashMap, FnvHashSet};
use indexmap::IndexMap;
#[cfg(feature = "tracing")]
use itertools::Itertools as _;

use crate::{
    CodegenError,
    model::{Document, Fragment, spread_names},
};

/// Merges `documents` into one.
///
/// Operations are concatenated. Fragments are deduplicated by name, keeping
/// the first definition, and sorted so that every fragment comes after all
/// the fragments it spreads. Unrelated fragments keep their relative order.
///
/// Fails if two fragments of the same name select different fields, if a
/// spread names a fragment that none of the `documents` defines, or if
/// fragments spread each other in a cycle.
pub fn merge_documents(
    documents: impl IntoIterator<Item = Document>,
) -> Result<Document, CodegenError> {
    __codegen_span_debug!("merge_documents");

    let mut operations = vec![];
    let mut fragments = IndexMap::<ArcStr, Fragment, FnvBuildHasher>::default();

    for document in documents {
        operations.extend(document.operations);

        for fragment in document.fragments {
            match fragments.get(&fragment.name) {
                Some(existing) if existing.same_selection(&fragment) => {
                    __codegen_trace!(
                        "Fragment {} of {} duplicates the one of {}",
                        fragment.name,
                        fragment.origin,
                        existing.origin,
                    );
                }
                Some(_) => return Err(CodegenError::DuplicateFragmentDefinition(fragment.name)),
                None => {
                    fragments.insert(fragment.name.clone(), fragment);
                }
            }
        }
    }

    let mut spreads = FnvHashMap::default();
    for fragment in fragments.values() {
        let names = spread_names(&fragment.selection_set);
        check_resolved(&names, &fragments, &fragment.name)?;
        spreads.insert(fragment.name.as_str(), names);
    }
    for operation in &operations {
        let names = spread_names(&operation.selection_set);
        check_resolved(&names, &fragments, &operation.display_name())?;
    }

    #[cfg(feature = "tracing")]
    for name in operations.iter().filter_map(|o| o.name.as_ref()).duplicates() {
        __codegen_trace_debug!("Operation name {name} is used more than once");
    }

    let mut orderer = FragmentOrderer {
        spreads: &spreads,
        visiting: FnvHashSet::default(),
        visited: FnvHashSet::default(),
        order: vec![],
    };
    for name in fragments.keys() {
        orderer.visit(name)?;
    }
    let order = orderer
        .order
        .into_iter()
        .cloned()
        .collect::<Vec<_>>();

    let fragments = order
        .iter()
        .filter_map(|name| fragments.swap_remove(name))
        .collect::<Vec<_>>();

    __codegen_trace_debug!(
        "Merged documents: {} operations, {} fragments",
        operations.len(),
        fragments.len(),
    );

    Ok(Document::new(operations, fragments))
}

fn check_resolved(
    names: &[&ArcStr],
    fragments: &IndexMap<ArcStr, Fragment, FnvBuildHasher>,
    referenced_from: &ArcStr,
) -> Result<(), CodegenError> {
    match names.iter().find(|name| !fragments.contains_key(**name)) {
        Some(missing) => Err(CodegenError::UnresolvedFragmentReference {
            fragment: (*missing).clone(),
            referenced_from: referenced_from.clone(),
        }),
        None => Ok(()),
    }
}

/// Depth-first post-order walk over the spreads between fragments.
struct FragmentOrderer<'a> {
    spreads: &'a FnvHashMap<&'a str, Vec<&'a ArcStr>>,
    visiting: FnvHashSet<&'a str>,
    visited: FnvHashSet<&'a str>,
    order: Vec<&'a ArcStr>,
}

impl<'a> FragmentOrderer<'a> {
    fn visit(&mut self, name: &'a ArcStr) -> Result<(), CodegenError> {
        if self.visited.contains(name.as_str()) {
            return Ok(());
        }
        if !self.visiting.insert(name.as_str()) {
            return Err(CodegenError::CyclicFragmentReference(name.clone()));
        }

        let spreads = self.spreads;
        for &dependency in spreads.get(name.as_str()).into_iter().flatten() {
            self.visit(dependency)?;
        }

        self.visiting.remove(name.as_str());
        self.visited.insert(name.as_str());
        self.order.push(name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use arcstr::ArcStr;
    use itertools::Itertools as _;
    use pretty_assertions::assert_eq;

    use super::merge_documents;
    use crate::{
        CodegenError,
        model::{Document, SelectionNode},
        tests::fixtures::transform,
    };

    fn fragment_names(document: &Document) -> Vec<&str> {
        document.fragments.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn dependencies_come_first_whatever_the_input_order() {
        let sources = [
            "fragment A on User { friends { ...B } }",
            "fragment B on User { ...C name }",
            "fragment C on User { id }",
        ];

        for permutation in sources.iter().permutations(sources.len()) {
            let documents = permutation
                .iter()
                .enumerate()
                .map(|(i, source)| transform(&format!("{i}.graphql"), source));

            let merged = merge_documents(documents).unwrap();

            assert_eq!(fragment_names(&merged), ["C", "B", "A"], "{permutation:?}");
        }
    }

    #[test]
    fn independent_fragments_keep_their_order() {
        let merged = merge_documents([
            transform("a.graphql", "fragment Z on User { id } fragment Y on Robot { id }"),
            transform("b.graphql", "fragment X on User { ...Y2 } fragment Y2 on User { id }"),
        ])
        .unwrap();

        assert_eq!(fragment_names(&merged), ["Z", "Y", "Y2", "X"]);
    }

    #[test]
    fn fragment_and_query_from_separate_documents() {
        let merged = merge_documents([
            transform("f.graphql", "fragment F on User { id }"),
            transform("q.graphql", "query Q { me { ...F } }"),
        ])
        .unwrap();

        assert_eq!(fragment_names(&merged), ["F"]);
        assert_eq!(merged.operations.len(), 1);
        assert!(merged.has_operations && merged.has_fragments);

        let q = merged.operation("Q").unwrap();
        let SelectionNode::FieldSelection(me) = &q.selection_set[0] else {
            panic!("expected a field");
        };
        assert_eq!(me.name.as_str(), "me");
        assert_eq!(me.children.len(), 1);
        assert_eq!(me.children[0].spread_names(), [&ArcStr::from("F")]);
    }

    #[test]
    fn identical_duplicates_are_merged() {
        let merged = merge_documents([
            transform("a.graphql", "fragment F on User { id name }"),
            transform("b.graphql", "fragment F on User {\n  id\n  name\n}"),
        ])
        .unwrap();

        assert_eq!(fragment_names(&merged), ["F"]);
        assert_eq!(merged.fragments[0].origin.as_str(), "a.graphql");
    }

    #[test]
    fn divergent_duplicates_are_rejected() {
        assert_eq!(
            merge_documents([
                transform("a.graphql", "fragment F on User { id }"),
                transform("b.graphql", "fragment F on User { name }"),
            ]),
            Err(CodegenError::DuplicateFragmentDefinition("F".into())),
        );
    }

    #[test]
    fn unresolved_references() {
        assert_eq!(
            merge_documents([transform("a.graphql", "fragment F on User { ...Missing }")]),
            Err(CodegenError::UnresolvedFragmentReference {
                fragment: "Missing".into(),
                referenced_from: "F".into(),
            }),
        );
        assert_eq!(
            merge_documents([transform("a.graphql", "{ me { ... on User { ...Missing } } }")]),
            Err(CodegenError::UnresolvedFragmentReference {
                fragment: "Missing".into(),
                referenced_from: "anonymous operation".into(),
            }),
        );
    }

    #[test]
    fn cycles_are_rejected() {
        assert_eq!(
            merge_documents([transform("a.graphql", "fragment F on User { ...F }")]),
            Err(CodegenError::CyclicFragmentReference("F".into())),
        );
        assert_eq!(
            merge_documents([
                transform("a.graphql", "fragment A on User { friends { ...B } }"),
                transform("b.graphql", "fragment B on User { ...C }"),
                transform("c.graphql", "fragment C on User { ...A }"),
            ]),
            Err(CodegenError::CyclicFragmentReference("A".into())),
        );
    }

    #[test]
    fn empty_input() {
        assert_eq!(merge_documents(Vec::new()), Ok(Document::default()));
    }
}
