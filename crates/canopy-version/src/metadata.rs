//! Commit metadata attached to tracking versions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// When a version was committed and the unique id it was committed under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitMetadata {
    instant: DateTime<Utc>,
    id: Ulid,
}

impl CommitMetadata {
    /// Create metadata from explicit values.
    pub fn new(instant: DateTime<Utc>, id: Ulid) -> Self {
        CommitMetadata { instant, id }
    }

    /// Metadata stamped with the current wall clock and a freshly generated id.
    pub fn now() -> Self {
        CommitMetadata {
            instant: Utc::now(),
            id: Ulid::new(),
        }
    }

    /// The commit timestamp.
    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    /// The commit id.
    pub fn id(&self) -> Ulid {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_metadata_accessors() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let id = Ulid::from(0x0123_4567_89ab_cdef_u128);
        let meta = CommitMetadata::new(instant, id);

        assert_eq!(meta.instant(), instant);
        assert_eq!(meta.id(), id);
    }

    #[test]
    fn test_now_generates_distinct_ids() {
        let a = CommitMetadata::now();
        let b = CommitMetadata::now();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_metadata_serialization() {
        let meta = CommitMetadata::now();
        let json = serde_json::to_string(&meta).unwrap();
        let restored: CommitMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(meta, restored);
    }
}
