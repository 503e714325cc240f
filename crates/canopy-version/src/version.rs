//! Identity-only MVCC versions.
//!
//! A [`Version`] is an opaque token stamped on tree nodes. Two versions are
//! equal only when they are the very same token: there is no content to
//! compare and no ordering between them. A higher layer detects concurrent
//! modification by checking whether the version it started from is still the
//! one stamped on the node.
//!
//! Versions come in two variants:
//! - *plain*: nothing but identity; committing one is a no-op.
//! - *tracking*: additionally carries [`CommitMetadata`], attached exactly once
//!   through an `Open -> Committing -> Committed` state machine.

use crate::error::{Result, VersionError};
use crate::metadata::CommitMetadata;
use chrono::DateTime;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicI64, AtomicU32, AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use ulid::Ulid;

const OPEN: u8 = 0;
const COMMITTING: u8 = 1;
const COMMITTED: u8 = 2;

/// The commit state of a tracking version.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommitState {
    /// Freshly created, metadata not yet attached.
    Open,
    /// A committer has claimed the version and is writing metadata.
    Committing,
    /// Metadata is attached and readable.
    Committed,
}

impl CommitState {
    fn from_tag(tag: u8) -> Self {
        match tag {
            OPEN => CommitState::Open,
            COMMITTING => CommitState::Committing,
            _ => CommitState::Committed,
        }
    }
}

/// Identity token of a plain version. Zero-sized, but every `Arc` of it is a
/// distinct allocation, which is all identity needs.
struct PlainSlot;

/// State and metadata of a tracking version.
///
/// Long-lived trees accumulate a great many versions, so the per-instance
/// footprint matters more than the cost of reassembling the metadata on read.
/// The metadata is therefore stored as flattened primitive fields next to the
/// state tag instead of as a nested `Option<CommitMetadata>` behind a lock.
///
/// The fields are written only between the CAS that claims `COMMITTING` and
/// the release store that publishes `COMMITTED`. A reader that observes
/// `COMMITTED` with acquire ordering therefore sees every field fully written.
struct CommitSlot {
    state: AtomicU8,
    seconds: AtomicI64,
    nanos: AtomicU32,
    id_high: AtomicU64,
    id_low: AtomicU64,
}

impl CommitSlot {
    fn new() -> Self {
        CommitSlot {
            state: AtomicU8::new(OPEN),
            seconds: AtomicI64::new(0),
            nanos: AtomicU32::new(0),
            id_high: AtomicU64::new(0),
            id_low: AtomicU64::new(0),
        }
    }

    fn state(&self) -> CommitState {
        CommitState::from_tag(self.state.load(Ordering::Acquire))
    }

    fn commit(&self, metadata: CommitMetadata) -> Result<()> {
        // A single CAS: whoever loses the race, or commits twice, gets the witness back.
        self.state
            .compare_exchange(OPEN, COMMITTING, Ordering::Acquire, Ordering::Acquire)
            .map_err(|witness| VersionError::StateMismatch {
                expected: CommitState::Open,
                actual: CommitState::from_tag(witness),
            })?;

        let instant = metadata.instant();
        let bits = metadata.id().0;
        self.seconds.store(instant.timestamp(), Ordering::Relaxed);
        self.nanos
            .store(instant.timestamp_subsec_nanos(), Ordering::Relaxed);
        self.id_high.store((bits >> 64) as u64, Ordering::Relaxed);
        self.id_low.store(bits as u64, Ordering::Relaxed);

        self.state.store(COMMITTED, Ordering::Release);
        Ok(())
    }

    fn metadata(&self) -> Result<CommitMetadata> {
        let state = self.state();
        if state != CommitState::Committed {
            return Err(VersionError::NotCommitted(state));
        }

        let seconds = self.seconds.load(Ordering::Relaxed);
        let nanos = self.nanos.load(Ordering::Relaxed);
        let instant = DateTime::from_timestamp(seconds, nanos)
            .ok_or(VersionError::InvalidTimestamp { seconds, nanos })?;
        let bits = (u128::from(self.id_high.load(Ordering::Relaxed)) << 64)
            | u128::from(self.id_low.load(Ordering::Relaxed));

        Ok(CommitMetadata::new(instant, Ulid(bits)))
    }
}

#[derive(Clone)]
enum Slot {
    Plain(Arc<PlainSlot>),
    Tracking(Arc<CommitSlot>),
}

/// An opaque MVCC timestamp with identity-only equality.
///
/// Cloning a `Version` yields another handle to the same token, which
/// compares equal to the original. Two tokens created separately never
/// compare equal, however they were derived.
#[derive(Clone)]
pub struct Version {
    slot: Slot,
}

impl Version {
    /// Create a fresh plain version.
    pub fn initial() -> Self {
        Version {
            slot: Slot::Plain(Arc::new(PlainSlot)),
        }
    }

    /// Create a fresh tracking version in the `Open` state.
    pub fn initial_tracking() -> Self {
        Version {
            slot: Slot::Tracking(Arc::new(CommitSlot::new())),
        }
    }

    /// Create a new version, distinct from this one and from every version
    /// produced before. The variant of `self` is preserved.
    pub fn next(&self) -> Self {
        match self.slot {
            Slot::Plain(_) => Version::initial(),
            Slot::Tracking(_) => Version::initial_tracking(),
        }
    }

    /// Whether this version carries commit metadata.
    pub fn is_tracking(&self) -> bool {
        matches!(self.slot, Slot::Tracking(_))
    }

    /// The commit state, or `None` for a plain version.
    pub fn commit_state(&self) -> Option<CommitState> {
        match &self.slot {
            Slot::Plain(_) => None,
            Slot::Tracking(slot) => Some(slot.state()),
        }
    }

    /// Whether commit metadata has been attached.
    pub fn is_committed(&self) -> bool {
        self.commit_state() == Some(CommitState::Committed)
    }

    /// Commit with the current time and a generated id.
    ///
    /// A no-op on plain versions. On a tracking version this is only valid
    /// from the `Open` state; a second or concurrent commit fails with
    /// [`VersionError::StateMismatch`].
    pub fn commit(&self) -> Result<()> {
        self.commit_with(CommitMetadata::now())
    }

    /// Commit with explicit metadata. Same state rules as [`Version::commit`].
    pub fn commit_with(&self, metadata: CommitMetadata) -> Result<()> {
        match &self.slot {
            Slot::Plain(_) => Ok(()),
            Slot::Tracking(slot) => slot.commit(metadata),
        }
    }

    /// The attached commit metadata.
    pub fn commit_metadata(&self) -> Result<CommitMetadata> {
        match &self.slot {
            Slot::Plain(_) => Err(VersionError::NotTracking),
            Slot::Tracking(slot) => slot.metadata(),
        }
    }

    fn identity(&self) -> *const () {
        match &self.slot {
            Slot::Plain(slot) => Arc::as_ptr(slot) as *const (),
            Slot::Tracking(slot) => Arc::as_ptr(slot) as *const (),
        }
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        match (&self.slot, &other.slot) {
            (Slot::Plain(a), Slot::Plain(b)) => Arc::ptr_eq(a, b),
            (Slot::Tracking(a), Slot::Tracking(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.identity(), state);
    }
}

impl fmt::Debug for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.commit_state() {
            None => write!(f, "Version@{:p}", self.identity()),
            Some(state) => write!(f, "Version@{:p}({:?})", self.identity(), state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::collections::HashSet;
    use std::sync::Barrier;
    use std::thread;

    #[test]
    fn test_version_identity() {
        let v = Version::initial();
        let same = v.clone();
        let other = Version::initial();

        assert_eq!(v, same);
        assert_ne!(v, other);
    }

    #[test]
    fn test_next_is_distinct() {
        let v0 = Version::initial();
        let v1 = v0.next();
        let v2 = v1.next();

        assert_ne!(v0, v1);
        assert_ne!(v1, v2);
        assert_ne!(v0, v2);
        // Identical derivations still produce unequal versions.
        assert_ne!(v0.next(), v0.next());
    }

    #[test]
    fn test_versions_hash_by_identity() {
        let versions: Vec<_> = (0..64).map(|_| Version::initial()).collect();
        let set: HashSet<_> = versions.iter().cloned().collect();
        assert_eq!(set.len(), 64);
        assert!(set.contains(&versions[17]));
    }

    #[test]
    fn test_plain_and_tracking_never_equal() {
        let plain = Version::initial();
        let tracking = Version::initial_tracking();
        assert_ne!(plain, tracking);
    }

    #[test]
    fn test_next_preserves_variant() {
        assert!(!Version::initial().next().is_tracking());
        assert!(Version::initial_tracking().next().is_tracking());
    }

    #[test]
    fn test_plain_commit_is_noop() {
        let v = Version::initial();
        assert!(v.commit().is_ok());
        assert!(v.commit().is_ok());
        assert_eq!(v.commit_state(), None);
        assert!(!v.is_committed());
        assert_eq!(v.commit_metadata(), Err(VersionError::NotTracking));
    }

    #[test]
    fn test_metadata_unreadable_before_commit() {
        let v = Version::initial_tracking();
        assert_eq!(v.commit_state(), Some(CommitState::Open));
        assert_eq!(
            v.commit_metadata(),
            Err(VersionError::NotCommitted(CommitState::Open))
        );
    }

    #[test]
    fn test_commit_with_explicit_metadata() {
        let v = Version::initial_tracking();
        let instant = Utc.with_ymd_and_hms(2023, 11, 5, 8, 15, 42).unwrap()
            + chrono::Duration::nanoseconds(123_456_789);
        let id = Ulid::new();

        v.commit_with(CommitMetadata::new(instant, id)).unwrap();

        let meta = v.commit_metadata().unwrap();
        assert_eq!(meta.instant(), instant);
        assert_eq!(meta.id(), id);
        assert!(v.is_committed());
    }

    #[test]
    fn test_commit_is_visible_through_clones() {
        let v = Version::initial_tracking();
        let handle = v.clone();
        v.commit().unwrap();
        assert!(handle.is_committed());
        assert_eq!(handle.commit_metadata(), v.commit_metadata());
    }

    #[test]
    fn test_double_commit_fails() {
        let v = Version::initial_tracking();
        v.commit().unwrap();
        let first = v.commit_metadata().unwrap();

        let err = v.commit().unwrap_err();
        assert_eq!(
            err,
            VersionError::StateMismatch {
                expected: CommitState::Open,
                actual: CommitState::Committed,
            }
        );
        // The failed attempt must not disturb the attached metadata.
        assert_eq!(v.commit_metadata().unwrap(), first);
    }

    #[test]
    fn test_concurrent_commit_has_single_winner() {
        let v = Version::initial_tracking();
        let threads = 8;
        let barrier = Arc::new(Barrier::new(threads));

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let v = v.clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    v.commit().is_ok()
                })
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();

        assert_eq!(winners, 1);
        assert!(v.commit_metadata().is_ok());
    }

    #[test]
    fn test_committed_metadata_visible_across_threads() {
        let v = Version::initial_tracking();
        let meta = CommitMetadata::now();

        let writer = {
            let v = v.clone();
            thread::spawn(move || v.commit_with(meta))
        };
        writer.join().unwrap().unwrap();

        let reader = {
            let v = v.clone();
            thread::spawn(move || v.commit_metadata())
        };
        assert_eq!(reader.join().unwrap().unwrap(), meta);
    }

    #[test]
    fn test_debug_shows_state_not_content() {
        let v = Version::initial_tracking();
        let text = format!("{:?}", v);
        assert!(text.starts_with("Version@"));
        assert!(text.ends_with("(Open)"));
    }
}
