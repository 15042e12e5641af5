//! Raw SQL operations, one module per table.

pub mod entry_ops;
pub mod inverse_ops;
pub mod session_ops;
