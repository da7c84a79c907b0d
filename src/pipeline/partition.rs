//! Synchronous dispatch: submit the file bytes directly and receive the
//! element sequence in the response.
//!
//! This is the simple strategy — no staging bucket, no connectors, no
//! remote workflow, nothing to tear down. One call with the "auto"
//! strategy and the platform picks the partitioning approach itself.

use std::path::Path;
use tracing::info;

use crate::element::Element;
use crate::error::Doc2TextError;
use crate::platform::PartitionPlatform;

/// Partitioning strategy passed to the direct endpoint.
const STRATEGY: &str = "auto";

/// Submit the document in one direct call and return its elements.
pub async fn dispatch(
    path: &Path,
    platform: &dyn PartitionPlatform,
) -> Result<Vec<Element>, Doc2TextError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| Doc2TextError::InputReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document");

    info!("Submitting '{}' for direct partitioning", filename);
    platform.partition(bytes, filename, STRATEGY).await
}
