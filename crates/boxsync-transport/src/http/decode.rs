//! Response body decoding.

use serde::Deserialize;

use boxsync_core::error::{AppError, ErrorKind};
use boxsync_core::result::AppResult;
use boxsync_entity::container::{ContainerListResponse, ContainerRecord};

/// Parse and validate a snapshot body.
pub fn decode_snapshot(body: &str) -> AppResult<Vec<ContainerRecord>> {
    let response: ContainerListResponse = serde_json::from_str(body).map_err(|e| {
        AppError::with_source(ErrorKind::Validation, format!("Malformed container list: {e}"), e)
    })?;
    response.validate()?;
    Ok(response.container_list)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum UnlockBody {
    Flag(bool),
    Object {
        #[serde(alias = "success")]
        unlocked: bool,
    },
}

/// Parse the unlock verdict. An empty body means the unlock went through.
pub fn decode_unlock(body: &str) -> AppResult<bool> {
    let body = body.trim();
    if body.is_empty() {
        return Ok(true);
    }
    match serde_json::from_str::<UnlockBody>(body) {
        Ok(UnlockBody::Flag(unlocked)) | Ok(UnlockBody::Object { unlocked }) => Ok(unlocked),
        Err(e) => Err(AppError::validation(format!("Malformed unlock response: {e}"))),
    }
}
