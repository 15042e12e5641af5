//! # bimlog-temporal
//!
//! Temporal patch engine for modeling sessions.
//! Forward-log recording, inverse-log building with sparse diffs and
//! derivative suppression, time-window selection, and replay against a
//! live model with historical → live identity remapping.

pub mod engine;
pub mod event_store;
pub mod inverse;
pub mod observability;
pub mod replay;
pub mod window;

pub use engine::{RollbackReport, SessionContext};
