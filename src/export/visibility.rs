//! Visibility snapshot and restore
//!
//! Isolating one layer means hiding everything else, so every pass starts
//! by recording the visibility of the whole tree and ends by putting it
//! back. Restore is best effort: nodes that vanished in the meantime are
//! reported to the caller instead of aborting the restore.

use crate::host::{Document, HostError};
use indexmap::IndexMap;
use std::hash::Hash;

/// Prior visibility of every node in a document, in depth-first order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilitySnapshot<N: Eq + Hash> {
    states: IndexMap<N, bool>,
}

impl<N: Copy + Eq + Hash> VisibilitySnapshot<N> {
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn get(&self, node: N) -> Option<bool> {
        self.states.get(&node).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (N, bool)> + '_ {
        self.states.iter().map(|(node, visible)| (*node, *visible))
    }
}

/// A node whose visibility could not be put back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreFailure<N> {
    pub node: N,
    pub name: String,
    pub error: HostError,
}

/// Every node reachable from the document's top-level nodes, depth-first
pub fn all_nodes<D: Document>(doc: &D) -> Vec<D::NodeId> {
    let mut nodes = Vec::new();
    let mut pending: Vec<D::NodeId> = doc.top_level_nodes().into_iter().rev().collect();
    while let Some(node) = pending.pop() {
        nodes.push(node);
        pending.extend(doc.child_nodes(node).into_iter().rev());
    }
    nodes
}

/// Record the visibility of every node in the document
pub fn snapshot<D: Document>(doc: &D) -> VisibilitySnapshot<D::NodeId> {
    let states = all_nodes(doc)
        .into_iter()
        .map(|node| (node, doc.visible(node)))
        .collect();
    VisibilitySnapshot { states }
}

/// Set every node in the document to `visible`
pub fn set_all<D: Document>(doc: &mut D, visible: bool) {
    for node in all_nodes(doc) {
        if let Err(e) = doc.set_visible(node, visible) {
            tracing::warn!("Failed to set visibility of {:?}: {}", node, e);
        }
    }
}

/// Put back every recorded visibility, returning the nodes that refused
pub fn restore<D: Document>(
    doc: &mut D,
    snapshot: &VisibilitySnapshot<D::NodeId>,
) -> Vec<RestoreFailure<D::NodeId>> {
    let mut failures = Vec::new();
    for (node, visible) in snapshot.iter() {
        if let Err(error) = doc.set_visible(node, visible) {
            failures.push(RestoreFailure {
                node,
                name: doc.node_name(node),
                error,
            });
        }
    }
    failures
}

/// [`restore`], logging failures instead of returning them
pub fn restore_logged<D: Document>(doc: &mut D, snapshot: &VisibilitySnapshot<D::NodeId>) {
    for failure in restore(doc, snapshot) {
        tracing::warn!(
            "Could not restore visibility of '{}': {}",
            failure.name,
            failure.error
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::host::memory::{MemoryDocument, MemoryNodeId};
    use crate::host::NodeType;
    use proptest::prelude::*;

    fn sample_tree() -> (MemoryDocument, Vec<MemoryNodeId>) {
        let mut doc = MemoryDocument::new(2, 2);
        let background = doc.add_node(None, "Background", NodeType::Paint, None);
        let group = doc.add_group(None, "Group");
        let inner = doc.add_node(Some(group), "Inner", NodeType::Paint, None);
        let nested = doc.add_group(Some(group), "Nested");
        let deep = doc.add_node(Some(nested), "Deep", NodeType::Vector, None);
        (doc, vec![background, group, inner, nested, deep])
    }

    #[test]
    fn test_snapshot_covers_whole_tree_depth_first() {
        let (mut doc, ids) = sample_tree();
        doc.set_visible(ids[2], false).unwrap();

        let snap = snapshot(&doc);
        assert_eq!(snap.len(), 5);
        let order: Vec<_> = snap.iter().map(|(n, _)| n).collect();
        assert_eq!(order, ids);
        assert_eq!(snap.get(ids[2]), Some(false));
        assert_eq!(snap.get(ids[4]), Some(true));
    }

    #[test]
    fn test_set_all_then_restore() {
        let (mut doc, ids) = sample_tree();
        doc.set_visible(ids[3], false).unwrap();
        let snap = snapshot(&doc);

        set_all(&mut doc, false);
        assert!(ids.iter().all(|id| !doc.visible(*id)));

        let failures = restore(&mut doc, &snap);
        assert!(failures.is_empty());
        assert_eq!(snapshot(&doc), snap);
    }

    #[test]
    fn test_restore_continues_past_removed_nodes() {
        let (mut doc, ids) = sample_tree();
        let snap = snapshot(&doc);
        set_all(&mut doc, false);
        doc.remove_node(ids[3]);

        let failures = restore(&mut doc, &snap);
        let failed: Vec<_> = failures.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(failed, vec!["Nested", "Deep"]);
        assert!(doc.visible(ids[0]));
        assert!(doc.visible(ids[1]));
        assert!(doc.visible(ids[2]));
    }

    proptest! {
        #[test]
        fn restore_returns_every_node_to_its_prior_state(
            initial in prop::collection::vec(any::<bool>(), 5),
            forced in any::<bool>(),
        ) {
            let (mut doc, ids) = sample_tree();
            for (id, visible) in ids.iter().zip(&initial) {
                doc.set_visible(*id, *visible).unwrap();
            }
            let snap = snapshot(&doc);
            set_all(&mut doc, forced);
            prop_assert!(restore(&mut doc, &snap).is_empty());
            for (id, visible) in ids.iter().zip(&initial) {
                prop_assert_eq!(doc.visible(*id), *visible);
            }
        }
    }
}
