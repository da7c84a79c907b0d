//! Top-level processing entry points.
//!
//! [`process_document`] is the primary library API: validate, dispatch to
//! the configured mode, land the element sequence in the results
//! directory as JSON, flatten, return the text. [`get_processed_document`]
//! wraps it for the tool boundary, where the contract is a string for
//! every code path — a tool host must never see a crash.

use std::path::Path;
use tracing::{info, warn};

use crate::config::{ProcessingMode, ProcessorConfig};
use crate::element::Element;
use crate::error::Doc2TextError;
use crate::flatten::flatten;
use crate::pipeline::{partition, validate, workflow};
use crate::platform::PartitionPlatform;
use crate::storage::ObjectStore;

/// Process one document and return its flattened text.
///
/// Steps: validate the path locally, submit through the configured mode,
/// persist the raw element JSON to `{results_dir}/{basename}.json` (an
/// audit artifact, and in workflow mode the retrieved file itself), then
/// flatten.
///
/// `store` is only consulted in [`ProcessingMode::Workflow`]; sync-mode
/// callers may pass `None`.
pub async fn process_document(
    path: impl AsRef<Path>,
    config: &ProcessorConfig,
    platform: &dyn PartitionPlatform,
    store: Option<&dyn ObjectStore>,
) -> Result<String, Doc2TextError> {
    let path = path.as_ref();
    info!("Processing document: {}", path.display());

    validate::validate(path)?;

    let elements = match config.mode {
        ProcessingMode::Sync => {
            let elements = partition::dispatch(path, platform).await?;
            persist_elements(path, config, &elements).await?;
            elements
        }
        ProcessingMode::Workflow => {
            let store = store.ok_or_else(|| {
                Doc2TextError::InvalidConfig(
                    "workflow mode requires an object store".into(),
                )
            })?;
            let result_path = workflow::dispatch(path, config, platform, store).await?;
            read_elements(&result_path).await?
        }
    };

    info!(
        "Flattening {} elements from '{}'",
        elements.len(),
        path.display()
    );
    Ok(flatten(&elements))
}

/// Tool-boundary wrapper: always returns a string.
///
/// Success passes the flattened text through; any failure becomes the
/// error's human-readable message. Nothing panics or propagates across
/// this boundary.
pub async fn get_processed_document(
    path: impl AsRef<Path>,
    config: &ProcessorConfig,
    platform: &dyn PartitionPlatform,
    store: Option<&dyn ObjectStore>,
) -> String {
    match process_document(path, config, platform, store).await {
        Ok(text) => text,
        Err(e) => {
            warn!("Processing failed: {}", e);
            e.to_string()
        }
    }
}

/// Write the element sequence to `{results_dir}/{basename}.json`.
async fn persist_elements(
    input_path: &Path,
    config: &ProcessorConfig,
    elements: &[Element],
) -> Result<(), Doc2TextError> {
    let basename = input_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document");
    let out_path = config.results_dir.join(format!("{basename}.json"));

    let json = serde_json::to_vec_pretty(elements).map_err(|e| {
        Doc2TextError::InvalidResultJson {
            path: out_path.clone(),
            detail: e.to_string(),
        }
    })?;

    tokio::fs::create_dir_all(&config.results_dir)
        .await
        .map_err(|e| Doc2TextError::ResultWriteFailed {
            path: config.results_dir.clone(),
            source: e,
        })?;
    tokio::fs::write(&out_path, json)
        .await
        .map_err(|e| Doc2TextError::ResultWriteFailed {
            path: out_path.clone(),
            source: e,
        })?;

    info!("Wrote element JSON to {}", out_path.display());
    Ok(())
}

/// Read an element sequence back from a results JSON file.
async fn read_elements(path: &Path) -> Result<Vec<Element>, Doc2TextError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| Doc2TextError::InputReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    serde_json::from_slice(&bytes).map_err(|e| Doc2TextError::InvalidResultJson {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}
