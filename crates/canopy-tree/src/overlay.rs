//! Read-only child overlays retained by sealed container nodes.
//!
//! A builder collects its edits in a `HashMap`. On seal the map is compacted
//! into the cheapest form for lookups: nothing at all, a short inline slice
//! scanned linearly, or a hash map shrunk to fit. Once compacted the overlay
//! can no longer be mutated; a later builder starts from a copy.

use crate::data::NodeData;
use crate::node::TreeNode;
use std::collections::HashMap;

pub(crate) enum ChildMap<D: NodeData> {
    Empty,
    /// Unordered; lookups scan every entry.
    Inline(Box<[(D::Key, TreeNode<D>)]>),
    Hashed(HashMap<D::Key, TreeNode<D>>),
}

impl<D: NodeData> ChildMap<D> {
    /// Compact a builder overlay. Overlays of at most `inline_limit` entries
    /// are stored inline.
    pub(crate) fn compact(mut overlay: HashMap<D::Key, TreeNode<D>>, inline_limit: usize) -> Self {
        if overlay.is_empty() {
            ChildMap::Empty
        } else if overlay.len() <= inline_limit {
            ChildMap::Inline(overlay.into_iter().collect())
        } else {
            overlay.shrink_to_fit();
            ChildMap::Hashed(overlay)
        }
    }

    pub(crate) fn get(&self, key: &D::Key) -> Option<&TreeNode<D>> {
        match self {
            ChildMap::Empty => None,
            ChildMap::Inline(entries) => entries
                .iter()
                .find(|(candidate, _)| candidate == key)
                .map(|(_, child)| child),
            ChildMap::Hashed(map) => map.get(key),
        }
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            ChildMap::Empty => 0,
            ChildMap::Inline(entries) => entries.len(),
            ChildMap::Hashed(map) => map.len(),
        }
    }

    /// A mutable copy for a new builder. Children are shared, not cloned deeply.
    pub(crate) fn to_overlay(&self) -> HashMap<D::Key, TreeNode<D>> {
        match self {
            ChildMap::Empty => HashMap::new(),
            ChildMap::Inline(entries) => entries.iter().cloned().collect(),
            ChildMap::Hashed(map) => map.clone(),
        }
    }

    #[cfg(test)]
    fn is_inline(&self) -> bool {
        matches!(self, ChildMap::Inline(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datum::{Datum, PathArg};
    use canopy_version::Version;
    use std::sync::Arc;

    fn overlay(n: usize) -> HashMap<PathArg, TreeNode<Datum>> {
        let v = Version::initial();
        (0..n)
            .map(|i| {
                (
                    PathArg::Name(format!("k{}", i)),
                    TreeNode::of(Arc::new(Datum::scalar(i)), v.clone()),
                )
            })
            .collect()
    }

    #[test]
    fn test_compact_empty() {
        let map = ChildMap::compact(overlay(0), 4);
        assert!(matches!(map, ChildMap::Empty));
        assert_eq!(map.len(), 0);
        assert!(map.get(&PathArg::name("k0")).is_none());
    }

    #[test]
    fn test_compact_inline() {
        let map = ChildMap::compact(overlay(3), 4);
        assert!(map.is_inline());
        assert_eq!(map.len(), 3);
        let child = map.get(&PathArg::name("k2")).unwrap();
        assert_eq!(child.data().as_scalar(), Some(&serde_json::json!(2)));
        assert!(map.get(&PathArg::name("k3")).is_none());
    }

    #[test]
    fn test_compact_hashed() {
        let map = ChildMap::compact(overlay(10), 4);
        assert!(matches!(map, ChildMap::Hashed(_)));
        assert_eq!(map.len(), 10);
        assert!(map.get(&PathArg::name("k9")).is_some());
    }

    #[test]
    fn test_to_overlay_shares_children() {
        let map = ChildMap::compact(overlay(2), 4);
        let copy = map.to_overlay();
        assert_eq!(copy.len(), 2);

        let key = PathArg::name("k1");
        assert!(TreeNode::same_node(&copy[&key], map.get(&key).unwrap()));
    }
}
