//! Leaf nodes.

use crate::data::NodeData;
use crate::error::{Result, TreeError};
use crate::mutable::MutableTreeNode;
use crate::node::TreeNode;
use canopy_version::Version;
use std::sync::Arc;
use tracing::warn;

/// A node wrapping a scalar payload.
///
/// Leaves are atomic: they have no separable child history, so a single
/// version serves as both incarnation and subtree version.
pub(crate) struct ValueNode<D: NodeData> {
    data: Arc<D>,
    version: Version,
}

impl<D: NodeData> ValueNode<D> {
    pub(crate) fn new(data: Arc<D>, version: Version) -> Self {
        ValueNode { data, version }
    }

    pub(crate) fn data(&self) -> &Arc<D> {
        &self.data
    }

    pub(crate) fn version(&self) -> &Version {
        &self.version
    }

    /// A caller that still has a path segment left when it reaches a leaf has
    /// a modelling bug, not corrupted data. Report it and find nothing.
    pub(crate) fn child_by_arg(&self, key: &D::Key) -> Option<TreeNode<D>> {
        warn!(?key, "Attempted to look up a child of a value node");
        None
    }

    pub(crate) fn open_mutable(&self) -> Result<MutableTreeNode<D>> {
        Err(TreeError::LeafMutation)
    }
}
