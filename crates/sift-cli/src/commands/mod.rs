//! Command implementations.

pub mod batch;
pub mod config;
pub mod recover;
pub mod replay;
pub mod schemas;

pub use self::batch::execute_batch;
pub use self::config::execute_config;
pub use self::recover::execute_recover;
pub use self::replay::execute_replay;
pub use self::schemas::execute_schemas;

use crate::error::Result;
use std::path::Path;
use tokio::io::AsyncReadExt;
use tracing::warn;

/// Read a raw model response from a file, or from stdin when no file is given.
///
/// Returns `None` when the bytes are not UTF-8 text, so the pipeline can
/// answer with its absent-input error record.
pub(crate) async fn read_response(file: Option<&Path>) -> Result<Option<String>> {
    let bytes = match file {
        Some(path) => tokio::fs::read(path).await?,
        None => {
            let mut bytes = Vec::new();
            tokio::io::stdin().read_to_end(&mut bytes).await?;
            bytes
        }
    };
    Ok(decode_response(bytes))
}

/// Decode response bytes, treating non-UTF-8 input as absent.
pub(crate) fn decode_response(bytes: Vec<u8>) -> Option<String> {
    match String::from_utf8(bytes) {
        Ok(text) => Some(text),
        Err(e) => {
            warn!(error = %e.utf8_error(), "Response is not UTF-8 text");
            None
        }
    }
}
