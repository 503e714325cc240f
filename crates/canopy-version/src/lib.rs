//! # canopy-version
//!
//! Identity-only MVCC versions for the Canopy tree store.
//!
//! This crate provides:
//! - [`Version`]: an opaque token compared by identity, never by content
//! - Tracking versions with an atomic `Open -> Committing -> Committed`
//!   commit protocol
//! - [`CommitMetadata`]: the timestamp and id attached on commit
//!
//! ## Example
//!
//! ```rust
//! use canopy_version::{CommitState, Version};
//!
//! let v0 = Version::initial_tracking();
//! let v1 = v0.next();
//! assert_ne!(v0, v1);
//!
//! assert!(v1.commit_metadata().is_err());
//! v1.commit().unwrap();
//! assert_eq!(v1.commit_state(), Some(CommitState::Committed));
//! assert!(v1.commit().is_err());
//! ```

mod error;
mod metadata;
mod version;

pub use error::{Result, VersionError};
pub use metadata::CommitMetadata;
pub use version::{CommitState, Version};
