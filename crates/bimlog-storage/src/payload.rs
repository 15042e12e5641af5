//! zstd-compressed JSON for payload columns.

use serde::de::DeserializeOwned;
use serde::Serialize;

use bimlog_core::errors::{BimLogResult, StorageError};

pub fn compress_json<T: Serialize>(value: &T, level: i32) -> BimLogResult<Vec<u8>> {
    let json = serde_json::to_vec(value)?;
    zstd::encode_all(json.as_slice(), level)
        .map_err(|e| StorageError::CompressionFailed(format!("zstd compress: {e}")).into())
}

pub fn decompress_json<T: DeserializeOwned>(compressed: &[u8]) -> BimLogResult<T> {
    let json = zstd::decode_all(compressed)
        .map_err(|e| StorageError::CompressionFailed(format!("zstd decompress: {e}")))?;
    Ok(serde_json::from_slice(&json)?)
}
