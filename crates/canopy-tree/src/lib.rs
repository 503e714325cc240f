//! # canopy-tree
//!
//! Copy-on-write tree nodes for the Canopy store.
//!
//! This crate provides:
//! - [`TreeNode`]: immutable subtree snapshots stamped with an incarnation and
//!   a subtree version
//! - [`MutableTreeNode`]: a single-writer overlay that seals into the cheapest
//!   correct node shape
//! - [`NodeRead`]: the read contract, with default forwarding for decorators
//! - [`TreeNodeFactory`]: configured entry points for wrapping and editing
//! - [`Datum`]: a JSON-like reference payload
//!
//! ## Architecture
//!
//! Readers hold nodes; nodes never change. An edit opens a builder over a
//! container, overlays replaced children, and seals into one of three shapes:
//! 1. `Simple` when nothing was touched
//! 2. `Lazy` when some children are overlaid and the rest come from the payload
//! 3. `Materialized` when every child is overlaid
//!
//! ## Example
//!
//! ```rust
//! use canopy_tree::{Datum, NodeKind, PathArg, TreeNode};
//! use std::sync::Arc;
//!
//! let v0 = TreeNode::<Datum>::initial_version();
//! let root = TreeNode::of(
//!     Arc::new(Datum::keyed([("a", Datum::scalar(1)), ("b", Datum::scalar(2))])),
//!     v0.clone(),
//! );
//!
//! let v1 = v0.next();
//! let key = PathArg::name("a");
//! let child = TreeNode::of(Arc::new(Datum::scalar(10)), v1.clone());
//!
//! let mut builder = root.open_mutable(v1.clone()).unwrap();
//! builder.put(key.clone(), child.clone());
//! builder.set_data(Arc::new(root.data().with_child(&key, child.data().clone())));
//! let edited = builder.seal();
//!
//! assert_eq!(edited.kind(), NodeKind::Lazy);
//! assert_eq!(edited.incarnation(), &v0);
//! assert_eq!(edited.subtree_version(), &v1);
//! assert_eq!(root.subtree_version(), &v0);
//! ```

mod config;
mod container;
mod data;
mod datum;
mod error;
mod factory;
mod forwarding;
mod mutable;
mod node;
mod overlay;
mod value;

pub use config::{TreeConfig, DEFAULT_INLINE_OVERLAY_LIMIT};
pub use data::{Capability, NodeData};
pub use datum::{Datum, PathArg};
pub use error::{Result, TreeError};
pub use factory::TreeNodeFactory;
pub use forwarding::{ConstrainedNode, NodeRead};
pub use mutable::MutableTreeNode;
pub use node::{NodeKind, TreeNode};

pub use canopy_version::{CommitMetadata, CommitState, Version, VersionError};
