//! Decorating nodes.
//!
//! [`NodeRead`] is the read contract shared by [`TreeNode`] and its
//! decorators. Every method forwards to [`NodeRead::delegate`] by default, so a
//! decorator names the node it wraps and overrides only the operation it
//! changes. The closed set of node shapes is untouched by decoration.

use crate::data::NodeData;
use crate::error::Result;
use crate::mutable::MutableTreeNode;
use crate::node::TreeNode;
use canopy_version::Version;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Read access to a node, forwarding to a delegate unless overridden.
pub trait NodeRead<D: NodeData> {
    /// The node that receives every operation not overridden.
    fn delegate(&self) -> &TreeNode<D>;

    fn data(&self) -> &Arc<D> {
        self.delegate().data()
    }

    fn incarnation(&self) -> &Version {
        self.delegate().incarnation()
    }

    fn subtree_version(&self) -> &Version {
        self.delegate().subtree_version()
    }

    fn child_by_arg(&self, key: &D::Key) -> Option<TreeNode<D>> {
        self.delegate().child_by_arg(key)
    }

    fn open_mutable(&self, next_subtree_version: Version) -> Result<MutableTreeNode<D>> {
        self.delegate().open_mutable(next_subtree_version)
    }
}

impl<D: NodeData> NodeRead<D> for TreeNode<D> {
    fn delegate(&self) -> &TreeNode<D> {
        self
    }
}

/// A decorator that only admits child lookups for keys accepted by a
/// predicate. Rejected keys are reported absent.
pub struct ConstrainedNode<D, F>
where
    D: NodeData,
    F: Fn(&D::Key) -> bool,
{
    inner: TreeNode<D>,
    admits: F,
}

impl<D, F> ConstrainedNode<D, F>
where
    D: NodeData,
    F: Fn(&D::Key) -> bool,
{
    /// Wrap `inner`, admitting only keys for which `admits` returns true.
    pub fn new(inner: TreeNode<D>, admits: F) -> Self {
        ConstrainedNode { inner, admits }
    }

    /// Unwrap the decorated node.
    pub fn into_inner(self) -> TreeNode<D> {
        self.inner
    }
}

impl<D, F> NodeRead<D> for ConstrainedNode<D, F>
where
    D: NodeData,
    F: Fn(&D::Key) -> bool,
{
    fn delegate(&self) -> &TreeNode<D> {
        &self.inner
    }

    fn child_by_arg(&self, key: &D::Key) -> Option<TreeNode<D>> {
        if !(self.admits)(key) {
            debug!(?key, "Child lookup rejected by constraint");
            return None;
        }
        self.inner.child_by_arg(key)
    }
}

impl<D, F> fmt::Debug for ConstrainedNode<D, F>
where
    D: NodeData,
    F: Fn(&D::Key) -> bool,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstrainedNode")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datum::{Datum, PathArg};

    fn node() -> TreeNode<Datum> {
        TreeNode::of(
            Arc::new(Datum::keyed([
                ("name", Datum::scalar("eth0")),
                ("mtu", Datum::scalar(1500)),
            ])),
            Version::initial(),
        )
    }

    fn lookup<N: NodeRead<Datum>>(node: &N, key: &str) -> Option<TreeNode<Datum>> {
        node.child_by_arg(&PathArg::name(key))
    }

    #[test]
    fn test_tree_node_reads_through_contract() {
        let node = node();
        assert!(lookup(&node, "mtu").is_some());
        assert!(NodeRead::incarnation(&node) == node.incarnation());
    }

    #[test]
    fn test_constrained_node_overrides_lookup_only() {
        let inner = node();
        let constrained = ConstrainedNode::new(inner.clone(), |key: &PathArg| {
            matches!(key, PathArg::Name(name) if name != "mtu")
        });

        assert!(lookup(&constrained, "name").is_some());
        assert!(lookup(&constrained, "mtu").is_none());

        // Everything else forwards to the wrapped node.
        assert!(Arc::ptr_eq(constrained.data(), inner.data()));
        assert_eq!(constrained.incarnation(), inner.incarnation());
        assert_eq!(constrained.subtree_version(), inner.subtree_version());

        let builder = constrained.open_mutable(Version::initial()).unwrap();
        assert_eq!(builder.overlay_len(), 0);

        assert!(TreeNode::same_node(&constrained.into_inner(), &inner));
    }
}
