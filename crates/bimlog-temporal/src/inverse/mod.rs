//! Inverse-log builder: last-known state, sparse diff, derivative tracking.

pub mod builder;
pub mod diff;
pub mod host_tracker;
pub mod last_known;

pub use builder::{build_inverse_log, BuildReport, BuildSkip, BuildSkipReason, InverseLog};
pub use diff::sparse_diff;
