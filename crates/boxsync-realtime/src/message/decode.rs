//! Push message decoding.

use boxsync_core::error::{AppError, ErrorKind};
use boxsync_core::result::AppResult;

use super::types::PushMessage;

/// Decode one push frame.
pub fn decode_push(text: &str) -> AppResult<PushMessage> {
    serde_json::from_str(text).map_err(|e| {
        AppError::with_source(ErrorKind::Serialization, format!("Invalid push message: {e}"), e)
    })
}
