//! Read-only container shapes.
//!
//! Children of a container are not owned by the node. They are derived from
//! the payload on every lookup, except for the children an edit has overlaid,
//! which a sealed node retains in a compacted [`ChildMap`].

use crate::data::NodeData;
use crate::mutable::MutableTreeNode;
use crate::node::TreeNode;
use crate::overlay::ChildMap;
use canopy_version::Version;
use std::collections::HashMap;
use std::sync::Arc;

/// Wrap a payload child into a fresh node stamped with `version`. Not cached.
pub(crate) fn child_from_data<D: NodeData>(
    data: &D,
    key: &D::Key,
    version: &Version,
) -> Option<TreeNode<D>> {
    data.child(key)
        .map(|child| TreeNode::of(child, version.clone()))
}

/// A container nobody has edited since it was wrapped.
pub(crate) struct SimpleContainerNode<D: NodeData> {
    data: Arc<D>,
    version: Version,
}

impl<D: NodeData> SimpleContainerNode<D> {
    pub(crate) fn new(data: Arc<D>, version: Version) -> Self {
        SimpleContainerNode { data, version }
    }

    pub(crate) fn data(&self) -> &Arc<D> {
        &self.data
    }

    pub(crate) fn version(&self) -> &Version {
        &self.version
    }

    pub(crate) fn child_by_arg(&self, key: &D::Key) -> Option<TreeNode<D>> {
        child_from_data(&self.data, key, &self.version)
    }

    pub(crate) fn open_mutable(&self, next: Version, inline_limit: usize) -> MutableTreeNode<D> {
        MutableTreeNode::new(
            Arc::clone(&self.data),
            self.version.clone(),
            self.version.clone(),
            next,
            HashMap::new(),
            inline_limit,
        )
    }
}

/// State shared by the lazy and materialized shapes.
pub(crate) struct ModifiedContainer<D: NodeData> {
    data: Arc<D>,
    incarnation: Version,
    subtree_version: Version,
    children: ChildMap<D>,
}

impl<D: NodeData> ModifiedContainer<D> {
    pub(crate) fn new(
        data: Arc<D>,
        incarnation: Version,
        subtree_version: Version,
        children: ChildMap<D>,
    ) -> Self {
        ModifiedContainer {
            data,
            incarnation,
            subtree_version,
            children,
        }
    }

    fn open_mutable(&self, next: Version, inline_limit: usize) -> MutableTreeNode<D> {
        MutableTreeNode::new(
            Arc::clone(&self.data),
            self.incarnation.clone(),
            self.subtree_version.clone(),
            next,
            self.children.to_overlay(),
            inline_limit,
        )
    }
}

/// A container with some of its children overlaid.
///
/// Reads consult the overlay first and fall back to the payload for any key
/// the overlay does not hold.
pub(crate) struct LazyContainerNode<D: NodeData>(ModifiedContainer<D>);

impl<D: NodeData> LazyContainerNode<D> {
    pub(crate) fn new(inner: ModifiedContainer<D>) -> Self {
        LazyContainerNode(inner)
    }

    pub(crate) fn data(&self) -> &Arc<D> {
        &self.0.data
    }

    pub(crate) fn incarnation(&self) -> &Version {
        &self.0.incarnation
    }

    pub(crate) fn subtree_version(&self) -> &Version {
        &self.0.subtree_version
    }

    pub(crate) fn children(&self) -> &ChildMap<D> {
        &self.0.children
    }

    pub(crate) fn child_by_arg(&self, key: &D::Key) -> Option<TreeNode<D>> {
        match self.0.children.get(key) {
            Some(child) => Some(child.clone()),
            None => child_from_data(&self.0.data, key, &self.0.incarnation),
        }
    }

    pub(crate) fn open_mutable(&self, next: Version, inline_limit: usize) -> MutableTreeNode<D> {
        self.0.open_mutable(next, inline_limit)
    }
}

/// A container whose every child is overlaid. The payload is never consulted
/// for children again.
pub(crate) struct MaterializedContainerNode<D: NodeData>(ModifiedContainer<D>);

impl<D: NodeData> MaterializedContainerNode<D> {
    pub(crate) fn new(inner: ModifiedContainer<D>) -> Self {
        MaterializedContainerNode(inner)
    }

    pub(crate) fn data(&self) -> &Arc<D> {
        &self.0.data
    }

    pub(crate) fn incarnation(&self) -> &Version {
        &self.0.incarnation
    }

    pub(crate) fn subtree_version(&self) -> &Version {
        &self.0.subtree_version
    }

    pub(crate) fn children(&self) -> &ChildMap<D> {
        &self.0.children
    }

    pub(crate) fn child_by_arg(&self, key: &D::Key) -> Option<TreeNode<D>> {
        self.0.children.get(key).cloned()
    }

    pub(crate) fn open_mutable(&self, next: Version, inline_limit: usize) -> MutableTreeNode<D> {
        self.0.open_mutable(next, inline_limit)
    }
}
