mod bimlog_error;
mod patch_error;
mod storage_error;

pub use bimlog_error::{BimLogError, BimLogResult};
pub use patch_error::PatchError;
pub use storage_error::StorageError;
