//! Configuration for node construction.

use serde::{Deserialize, Serialize};

/// Overlays with at most this many entries are stored inline by default.
pub const DEFAULT_INLINE_OVERLAY_LIMIT: usize = 4;

/// Configuration for a [`TreeNodeFactory`](crate::TreeNodeFactory).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Whether initial versions carry commit metadata.
    pub tracking_versions: bool,

    /// Largest overlay kept as an inline slice when a node is sealed.
    /// Larger overlays are hashed.
    pub inline_overlay_limit: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        TreeConfig {
            tracking_versions: false,
            inline_overlay_limit: DEFAULT_INLINE_OVERLAY_LIMIT,
        }
    }
}

impl TreeConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Set whether initial versions are tracking versions.
    pub fn with_tracking_versions(mut self, tracking: bool) -> Self {
        self.tracking_versions = tracking;
        self
    }

    /// Set the inline overlay limit.
    pub fn with_inline_overlay_limit(mut self, limit: usize) -> Self {
        self.inline_overlay_limit = limit;
        self
    }
}
