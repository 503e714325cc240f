//! The payload contract consumed by tree nodes.
//!
//! Nodes never look inside a payload beyond this trait: they ask it what kind
//! of value it is, how many children it has and for a child by key.

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

/// The shape a payload reports for itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    /// An opaque value with no children.
    Scalar,
    /// A container whose children are addressed by unique key.
    Keyed,
    /// A container whose children are addressed by position.
    Ordered,
}

impl Capability {
    /// Whether this capability has children.
    pub fn is_container(self) -> bool {
        !matches!(self, Capability::Scalar)
    }
}

/// Data that can be wrapped into a tree node.
///
/// Children are payloads of the same type, shared by `Arc`, so that wrapping a
/// child into a node never copies it.
pub trait NodeData: Debug + Send + Sync + 'static {
    /// Identifies a child within its parent container.
    type Key: Clone + Eq + Hash + Debug + Send + Sync + 'static;

    /// What kind of payload this is. Node dispatch depends on this alone.
    fn capability(&self) -> Capability;

    /// Look up a direct child. Scalars have none.
    fn child(&self, key: &Self::Key) -> Option<Arc<Self>>;

    /// Number of direct children. Zero for scalars.
    fn child_count(&self) -> usize;
}
