//! The single-writer edit overlay and the seal algorithm.

use crate::container::{
    child_from_data, LazyContainerNode, MaterializedContainerNode, ModifiedContainer,
    SimpleContainerNode,
};
use crate::data::NodeData;
use crate::node::{Shape, TreeNode};
use crate::overlay::ChildMap;
use canopy_version::Version;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{trace, warn};

/// A transient, exclusively owned edit over one container node.
///
/// The builder collects child replacements in an overlay and may swap the
/// node's own payload. It is not a node and is not meant to be shared: keep it
/// on the thread that opened it and turn it into a node with
/// [`seal`](MutableTreeNode::seal) before publishing anything.
///
/// The payload must be kept consistent with the overlay by the caller: after
/// putting or removing children, pass the payload that reflects those changes
/// to [`set_data`](MutableTreeNode::set_data). Sealing compares the overlay
/// with the payload's child count to pick the node shape.
pub struct MutableTreeNode<D: NodeData> {
    data: Arc<D>,
    incarnation: Version,
    subtree_version: Version,
    next_version: Version,
    children: HashMap<D::Key, TreeNode<D>>,
    inline_limit: usize,
    modified: bool,
}

impl<D: NodeData> MutableTreeNode<D> {
    pub(crate) fn new(
        data: Arc<D>,
        incarnation: Version,
        subtree_version: Version,
        next_version: Version,
        children: HashMap<D::Key, TreeNode<D>>,
        inline_limit: usize,
    ) -> Self {
        MutableTreeNode {
            data,
            incarnation,
            subtree_version,
            next_version,
            children,
            inline_limit,
            modified: false,
        }
    }

    /// The current payload.
    pub fn data(&self) -> &Arc<D> {
        &self.data
    }

    /// The incarnation the sealed node will carry.
    pub fn incarnation(&self) -> &Version {
        &self.incarnation
    }

    /// The version any edit through this builder is stamped with.
    pub fn next_version(&self) -> &Version {
        &self.next_version
    }

    /// Whether any edit has been applied.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Number of overlaid children.
    pub fn overlay_len(&self) -> usize {
        self.children.len()
    }

    /// Look up a child as the node sealed right now would see it: overlay
    /// first, then the payload unless the overlay covers every payload child.
    ///
    /// A builder reopened from a materialized node starts out reading the
    /// overlay only, but once the payload and the overlay disagree in size
    /// (say `set_data` added a child) it reads the payload again, just like the
    /// lazy node it would seal into.
    pub fn child_by_arg(&self, key: &D::Key) -> Option<TreeNode<D>> {
        if let Some(child) = self.children.get(key) {
            return Some(child.clone());
        }
        if self.reads_payload() {
            child_from_data(&self.data, key, &self.incarnation)
        } else {
            None
        }
    }

    /// Whether sealing now would produce a shape that reads the payload.
    fn reads_payload(&self) -> bool {
        self.subtree_version == self.incarnation || self.children.len() != self.data.child_count()
    }

    /// Add or replace a child, returning the previously overlaid child.
    pub fn put(&mut self, key: D::Key, child: TreeNode<D>) -> Option<TreeNode<D>> {
        self.touch();
        self.children.insert(key, child)
    }

    /// Remove a child from the overlay, returning it if it was overlaid.
    pub fn remove(&mut self, key: &D::Key) -> Option<TreeNode<D>> {
        self.touch();
        self.children.remove(key)
    }

    /// Replace this node's own payload. Children are not affected.
    pub fn set_data(&mut self, data: Arc<D>) {
        self.touch();
        self.data = data;
    }

    fn touch(&mut self) {
        if !self.modified {
            self.subtree_version = self.next_version.clone();
            self.modified = true;
        }
    }

    /// Finalize the edit into an immutable node.
    ///
    /// - An edit that never touched anything collapses back to an untouched
    ///   container, discarding the overlay.
    /// - Otherwise the overlay is compacted and compared with the payload's
    ///   current child count: if it covers every child the result is
    ///   materialized and never reads the payload for children again,
    ///   otherwise it is lazy and falls back to the payload for the rest.
    ///
    /// Sealing consumes the builder, so it cannot be used afterwards:
    ///
    /// ```compile_fail
    /// use canopy_tree::{Datum, PathArg, TreeNode};
    /// use std::sync::Arc;
    ///
    /// let data = Arc::new(Datum::keyed([("a", Datum::scalar(1))]));
    /// let node = TreeNode::of(data, TreeNode::<Datum>::initial_version());
    /// let mut builder = node.open_mutable(node.incarnation().next()).unwrap();
    /// let sealed = builder.seal();
    /// builder.remove(&PathArg::name("a"));
    /// ```
    pub fn seal(self) -> TreeNode<D> {
        let MutableTreeNode {
            data,
            incarnation,
            subtree_version,
            children,
            inline_limit,
            ..
        } = self;

        if subtree_version == incarnation {
            trace!(overlay = children.len(), "Sealing untouched container");
            return TreeNode::from_shape(Shape::Simple(SimpleContainerNode::new(data, incarnation)));
        }

        let data_len = data.child_count();
        let children = ChildMap::compact(children, inline_limit);
        let overlay_len = children.len();
        if overlay_len > data_len {
            warn!(
                overlay_len,
                data_len, "Sealed overlay holds more children than its payload"
            );
        }

        let modified = ModifiedContainer::new(data, incarnation, subtree_version, children);
        let shape = if overlay_len != data_len {
            trace!(overlay_len, data_len, "Sealing lazy container");
            Shape::Lazy(LazyContainerNode::new(modified))
        } else {
            trace!(overlay_len, data_len, "Sealing materialized container");
            Shape::Materialized(MaterializedContainerNode::new(modified))
        };
        TreeNode::from_shape(shape)
    }
}

impl<D: NodeData> fmt::Debug for MutableTreeNode<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutableTreeNode")
            .field("incarnation", &self.incarnation)
            .field("subtree_version", &self.subtree_version)
            .field("next_version", &self.next_version)
            .field("overlay", &self.children.len())
            .field("modified", &self.modified)
            .finish()
    }
}
