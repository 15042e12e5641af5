//! # bimlog-core
//!
//! Shared model for the bimlog temporal patch engine: log entries, inverse
//! entries, the remap table, the geometry/attribute codec, the live-model
//! boundary, errors and configuration.

pub mod codec;
pub mod config;
pub mod errors;
pub mod models;
pub mod timestamp;
pub mod traits;

pub use config::BimLogConfig;
pub use errors::{BimLogError, BimLogResult};
