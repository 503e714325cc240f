//! A reference payload for tree nodes.
//!
//! [`Datum`] is a small JSON-like document: scalars, maps keyed by name and
//! ordered lists. It implements [`NodeData`] with [`PathArg`] keys and is what
//! the tests and the stress harness store in the tree. Real deployments plug in
//! their own schema-aware payload instead.

use crate::data::{Capability, NodeData};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Identifies a child of a [`Datum`] container.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PathArg {
    /// A child of a keyed container.
    Name(String),
    /// A child of an ordered container.
    Index(usize),
}

impl PathArg {
    /// Create a name argument.
    pub fn name(name: impl Into<String>) -> Self {
        PathArg::Name(name.into())
    }
}

impl From<&str> for PathArg {
    fn from(name: &str) -> Self {
        PathArg::Name(name.to_string())
    }
}

impl From<String> for PathArg {
    fn from(name: String) -> Self {
        PathArg::Name(name)
    }
}

impl From<usize> for PathArg {
    fn from(index: usize) -> Self {
        PathArg::Index(index)
    }
}

impl fmt::Display for PathArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathArg::Name(name) => write!(f, "{}", name),
            PathArg::Index(index) => write!(f, "[{}]", index),
        }
    }
}

/// A JSON-like payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Datum {
    Scalar(serde_json::Value),
    Keyed(BTreeMap<String, Arc<Datum>>),
    Ordered(Vec<Arc<Datum>>),
}

impl Datum {
    /// Create a scalar.
    pub fn scalar(value: impl Into<serde_json::Value>) -> Self {
        Datum::Scalar(value.into())
    }

    /// Create a keyed container from `(name, child)` pairs.
    pub fn keyed<K, I>(children: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Datum)>,
    {
        Datum::Keyed(
            children
                .into_iter()
                .map(|(name, child)| (name.into(), Arc::new(child)))
                .collect(),
        )
    }

    /// Create an ordered container.
    pub fn ordered(children: impl IntoIterator<Item = Datum>) -> Self {
        Datum::Ordered(children.into_iter().map(Arc::new).collect())
    }

    /// The scalar value, if this is a scalar.
    pub fn as_scalar(&self) -> Option<&serde_json::Value> {
        match self {
            Datum::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// A copy of this container with `key` set to `child`.
    ///
    /// For ordered containers an index equal to the length appends. Keys that
    /// do not fit the container leave the copy unchanged.
    pub fn with_child(&self, key: &PathArg, child: Arc<Datum>) -> Datum {
        match (self, key) {
            (Datum::Keyed(children), PathArg::Name(name)) => {
                let mut children = children.clone();
                children.insert(name.clone(), child);
                Datum::Keyed(children)
            }
            (Datum::Ordered(children), PathArg::Index(index)) if *index <= children.len() => {
                let mut children = children.clone();
                if *index == children.len() {
                    children.push(child);
                } else {
                    children[*index] = child;
                }
                Datum::Ordered(children)
            }
            _ => self.clone(),
        }
    }

    /// A copy of this container without `key`. Ordered siblings shift down.
    pub fn without_child(&self, key: &PathArg) -> Datum {
        match (self, key) {
            (Datum::Keyed(children), PathArg::Name(name)) => {
                let mut children = children.clone();
                children.remove(name);
                Datum::Keyed(children)
            }
            (Datum::Ordered(children), PathArg::Index(index)) if *index < children.len() => {
                let mut children = children.clone();
                children.remove(*index);
                Datum::Ordered(children)
            }
            _ => self.clone(),
        }
    }

    /// Keys of all direct children, in container order.
    pub fn child_keys(&self) -> Vec<PathArg> {
        match self {
            Datum::Scalar(_) => Vec::new(),
            Datum::Keyed(children) => children.keys().cloned().map(PathArg::Name).collect(),
            Datum::Ordered(children) => (0..children.len()).map(PathArg::Index).collect(),
        }
    }
}

impl NodeData for Datum {
    type Key = PathArg;

    fn capability(&self) -> Capability {
        match self {
            Datum::Scalar(_) => Capability::Scalar,
            Datum::Keyed(_) => Capability::Keyed,
            Datum::Ordered(_) => Capability::Ordered,
        }
    }

    fn child(&self, key: &PathArg) -> Option<Arc<Datum>> {
        match (self, key) {
            (Datum::Keyed(children), PathArg::Name(name)) => children.get(name).cloned(),
            (Datum::Ordered(children), PathArg::Index(index)) => children.get(*index).cloned(),
            _ => None,
        }
    }

    fn child_count(&self) -> usize {
        match self {
            Datum::Scalar(_) => 0,
            Datum::Keyed(children) => children.len(),
            Datum::Ordered(children) => children.len(),
        }
    }
}
