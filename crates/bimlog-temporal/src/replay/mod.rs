//! Replay executor: applies a selected window of inverse entries to the
//! live model through the [`LiveModel`](bimlog_core::traits::LiveModel)
//! boundary, remapping historical ids to live ones as elements are rebuilt.

pub mod executor;
pub mod handlers;
pub mod outcome;
pub mod resolve;

pub use executor::{ReplaySession, ReplayState};
pub use handlers::{handler_for, CategoryHandler};
pub use outcome::{Applied, EntryOutcome, ReplayReport, SkipReason};
pub use resolve::ApplyContext;
