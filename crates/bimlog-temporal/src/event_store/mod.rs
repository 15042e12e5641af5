//! Event store: capture-side recording of the append-only forward log.

pub mod recorder;

pub use recorder::{CaptureEvent, ForwardLogRecorder};
