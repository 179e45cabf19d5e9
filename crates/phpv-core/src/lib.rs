//! Version-state reconciliation for phpv.
//!
//! This crate holds the logic that is independent of transport and
//! presentation:
//! - Matching available builds against installed ones and deriving the
//!   active build.
//! - Bucketing and deduplicating the available builds.
//! - Following install jobs until they finish.

pub mod filter;
pub mod jobs;
pub mod reconcile;

/// Bucket selection over available builds.
pub use filter::{FilterBucket, UnknownBucket, filter};
/// Install job polling and tracking.
pub use jobs::{
    DEFAULT_POLL_INTERVAL, JobOutcome, JobPhase, JobPoller, JobProgress, JobTracker, PollHandle,
    TickResult, sanitize_message,
};
/// Installed/available matching and active build derivation.
pub use reconcile::{ActiveVersion, Reconciliation, active_version, count_active, reconcile};
