//! Immutable tree nodes.
//!
//! A [`TreeNode`] is a snapshot of a subtree. It pairs a payload with two
//! versions:
//! - the *incarnation*, stamped when the node's own payload was last
//!   replaced wholesale, and
//! - the *subtree version*, stamped on the most recent change anywhere below
//!   the node.
//!
//! The set of node shapes is closed. A scalar payload becomes a value node; a
//! container payload becomes one of three container shapes depending on how
//! much of it has been overlaid by edits:
//!
//! | shape          | reads                                     |
//! |----------------|-------------------------------------------|
//! | `Simple`       | straight from the payload                 |
//! | `Lazy`         | overlay first, payload for the rest       |
//! | `Materialized` | overlay only, the payload is never touched |
//!
//! Nodes are shared by reference counting and never change after
//! construction, so any number of threads may read the same node.

use crate::config::DEFAULT_INLINE_OVERLAY_LIMIT;
use crate::container::{LazyContainerNode, MaterializedContainerNode, SimpleContainerNode};
use crate::data::NodeData;
use crate::error::Result;
use crate::mutable::MutableTreeNode;
use crate::value::ValueNode;
use canopy_version::Version;
use std::fmt;
use std::sync::Arc;

/// The materialization shape of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A leaf wrapping a scalar payload.
    Value,
    /// A container nobody has edited since it was wrapped.
    Simple,
    /// A container with some of its children overlaid.
    Lazy,
    /// A container with all of its children overlaid.
    Materialized,
}

pub(crate) enum Shape<D: NodeData> {
    Value(ValueNode<D>),
    Simple(SimpleContainerNode<D>),
    Lazy(LazyContainerNode<D>),
    Materialized(MaterializedContainerNode<D>),
}

/// An immutable, freely shareable snapshot of a subtree.
pub struct TreeNode<D: NodeData> {
    shape: Arc<Shape<D>>,
}

impl<D: NodeData> TreeNode<D> {
    /// Wrap a payload into a node, stamping `version` as both incarnation and
    /// subtree version.
    ///
    /// Dispatch depends only on the payload's capability: keyed and ordered
    /// containers become an untouched container node, anything else a value
    /// node.
    pub fn of(data: Arc<D>, version: Version) -> Self {
        let shape = if data.capability().is_container() {
            Shape::Simple(SimpleContainerNode::new(data, version))
        } else {
            Shape::Value(ValueNode::new(data, version))
        };
        TreeNode::from_shape(shape)
    }

    /// A fresh plain version to wrap initial data with.
    pub fn initial_version() -> Version {
        Version::initial()
    }

    pub(crate) fn from_shape(shape: Shape<D>) -> Self {
        TreeNode {
            shape: Arc::new(shape),
        }
    }

    /// The materialization shape of this node.
    pub fn kind(&self) -> NodeKind {
        match &*self.shape {
            Shape::Value(_) => NodeKind::Value,
            Shape::Simple(_) => NodeKind::Simple,
            Shape::Lazy(_) => NodeKind::Lazy,
            Shape::Materialized(_) => NodeKind::Materialized,
        }
    }

    /// Whether this node can have children.
    pub fn is_container(&self) -> bool {
        self.kind() != NodeKind::Value
    }

    /// The payload.
    pub fn data(&self) -> &Arc<D> {
        match &*self.shape {
            Shape::Value(node) => node.data(),
            Shape::Simple(node) => node.data(),
            Shape::Lazy(node) => node.data(),
            Shape::Materialized(node) => node.data(),
        }
    }

    /// The version stamped when this node's own payload was last replaced.
    pub fn incarnation(&self) -> &Version {
        match &*self.shape {
            Shape::Value(node) => node.version(),
            Shape::Simple(node) => node.version(),
            Shape::Lazy(node) => node.incarnation(),
            Shape::Materialized(node) => node.incarnation(),
        }
    }

    /// The version of the most recent change anywhere in this subtree.
    pub fn subtree_version(&self) -> &Version {
        match &*self.shape {
            Shape::Value(node) => node.version(),
            Shape::Simple(node) => node.version(),
            Shape::Lazy(node) => node.subtree_version(),
            Shape::Materialized(node) => node.subtree_version(),
        }
    }

    /// Look up a direct child.
    ///
    /// Never fails: a lookup on a value node is logged and reports no child.
    pub fn child_by_arg(&self, key: &D::Key) -> Option<TreeNode<D>> {
        match &*self.shape {
            Shape::Value(node) => node.child_by_arg(key),
            Shape::Simple(node) => node.child_by_arg(key),
            Shape::Lazy(node) => node.child_by_arg(key),
            Shape::Materialized(node) => node.child_by_arg(key),
        }
    }

    /// Open a single-writer builder over this node whose edits will be
    /// stamped with `next_subtree_version`.
    ///
    /// Fails with [`TreeError::LeafMutation`](crate::TreeError::LeafMutation)
    /// on value nodes: a leaf is replaced through its parent's builder.
    pub fn open_mutable(&self, next_subtree_version: Version) -> Result<MutableTreeNode<D>> {
        self.open_mutable_with(next_subtree_version, DEFAULT_INLINE_OVERLAY_LIMIT)
    }

    pub(crate) fn open_mutable_with(
        &self,
        next_subtree_version: Version,
        inline_limit: usize,
    ) -> Result<MutableTreeNode<D>> {
        match &*self.shape {
            Shape::Value(node) => node.open_mutable(),
            Shape::Simple(node) => Ok(node.open_mutable(next_subtree_version, inline_limit)),
            Shape::Lazy(node) => Ok(node.open_mutable(next_subtree_version, inline_limit)),
            Shape::Materialized(node) => Ok(node.open_mutable(next_subtree_version, inline_limit)),
        }
    }

    /// Whether anything in this subtree changed after `baseline` was stamped.
    pub fn changed_since(&self, baseline: &Version) -> bool {
        self.subtree_version() != baseline
    }

    /// Whether two handles refer to the very same snapshot.
    pub fn same_node(a: &TreeNode<D>, b: &TreeNode<D>) -> bool {
        Arc::ptr_eq(&a.shape, &b.shape)
    }

    /// Number of overlaid children retained by a lazy or materialized node.
    pub fn overlay_len(&self) -> usize {
        match &*self.shape {
            Shape::Lazy(node) => node.children().len(),
            Shape::Materialized(node) => node.children().len(),
            Shape::Value(_) | Shape::Simple(_) => 0,
        }
    }
}

impl<D: NodeData> Clone for TreeNode<D> {
    fn clone(&self) -> Self {
        TreeNode {
            shape: Arc::clone(&self.shape),
        }
    }
}

impl<D: NodeData> fmt::Debug for TreeNode<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeNode")
            .field("kind", &self.kind())
            .field("incarnation", self.incarnation())
            .field("subtree_version", self.subtree_version())
            .field("overlay", &self.overlay_len())
            .field("data", self.data())
            .finish()
    }
}
