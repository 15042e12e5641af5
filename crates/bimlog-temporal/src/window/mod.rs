//! Time-window selector.

pub mod selector;

pub use selector::{select, ReplayPlan};
