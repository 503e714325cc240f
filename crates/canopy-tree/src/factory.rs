//! The entry points for wrapping payloads and opening edits.

use crate::config::TreeConfig;
use crate::data::NodeData;
use crate::error::{Result, TreeError};
use crate::mutable::MutableTreeNode;
use crate::node::TreeNode;
use canopy_version::Version;
use std::sync::Arc;

/// Wraps payloads into nodes and opens edits according to a [`TreeConfig`].
#[derive(Clone, Debug, Default)]
pub struct TreeNodeFactory {
    config: TreeConfig,
}

impl TreeNodeFactory {
    /// Create a factory with the given configuration.
    pub fn new(config: TreeConfig) -> Self {
        TreeNodeFactory { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// A fresh version, tracking or plain depending on the configuration.
    pub fn initial_version(&self) -> Version {
        if self.config.tracking_versions {
            Version::initial_tracking()
        } else {
            Version::initial()
        }
    }

    /// Wrap a payload into a node. See [`TreeNode::of`].
    pub fn wrap<D: NodeData>(&self, data: Arc<D>, version: Version) -> TreeNode<D> {
        TreeNode::of(data, version)
    }

    /// Open an edit over `node`, stamped with `next_subtree_version`.
    pub fn open_mutable<D: NodeData>(
        &self,
        node: &TreeNode<D>,
        next_subtree_version: Version,
    ) -> Result<MutableTreeNode<D>> {
        node.open_mutable_with(next_subtree_version, self.config.inline_overlay_limit)
    }

    /// Open an edit over freshly written container data.
    ///
    /// The payload is stamped with `version` as its incarnation and the edits
    /// share that version, so the sealed node is always an untouched container
    /// carrying the final payload.
    pub fn new_mutable<D: NodeData>(
        &self,
        data: Arc<D>,
        version: Version,
    ) -> Result<MutableTreeNode<D>> {
        if !data.capability().is_container() {
            return Err(TreeError::NotAContainer);
        }
        self.open_mutable(&TreeNode::of(data, version.clone()), version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datum::{Datum, PathArg};
    use crate::node::NodeKind;

    #[test]
    fn test_initial_version_follows_config() {
        let plain = TreeNodeFactory::default();
        assert!(!plain.initial_version().is_tracking());

        let tracking = TreeNodeFactory::new(TreeConfig::default().with_tracking_versions(true));
        assert!(tracking.initial_version().is_tracking());
    }

    #[test]
    fn test_new_mutable_rejects_scalars() {
        let factory = TreeNodeFactory::default();
        let err = factory
            .new_mutable(Arc::new(Datum::scalar(1)), Version::initial())
            .unwrap_err();
        assert_eq!(err, TreeError::NotAContainer);
    }

    #[test]
    fn test_new_mutable_seals_untouched() {
        let factory = TreeNodeFactory::default();
        let v = factory.initial_version();
        let written = Arc::new(Datum::keyed([("a", Datum::scalar(1))]));

        let mut builder = factory.new_mutable(written, v.clone()).unwrap();
        let key = PathArg::name("b");
        let child = factory.wrap(Arc::new(Datum::scalar(2)), v.clone());
        builder.put(key.clone(), child.clone());
        let data = builder.data().with_child(&key, Arc::clone(child.data()));
        builder.set_data(Arc::new(data));

        let node = builder.seal();
        assert_eq!(node.kind(), NodeKind::Simple);
        assert_eq!(node.incarnation(), &v);
        assert_eq!(node.subtree_version(), &v);
        assert_eq!(node.data().child_count(), 2);
        assert!(node.child_by_arg(&key).is_some());
    }
}
