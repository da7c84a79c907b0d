//! Error types for the doc2text library.
//!
//! Everything the pipeline can fail with is collected in [`Doc2TextError`].
//! Variants fall into four groups that mirror how callers react to them:
//!
//! * **Input rejection** — detected locally, before any remote call
//!   (missing file, unsupported extension). Cheap and deterministic.
//! * **Configuration** — missing or invalid settings, surfaced at startup
//!   so the process never accepts a request it cannot serve.
//! * **Remote failure** — a storage or platform call failed, or a remote
//!   job ended in a non-success terminal state.
//! * **Local I/O** — reading the input or writing the results JSON failed.
//!
//! The tool boundary ([`crate::process::get_processed_document`]) never
//! propagates these: every variant has a human-readable `Display` message
//! that is returned as the result string instead.

use std::path::PathBuf;
use thiserror::Error;

use crate::element::JobStatus;

/// All errors returned by the doc2text library.
#[derive(Debug, Error)]
pub enum Doc2TextError {
    // ── Input rejection ───────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("File does not exist: '{path}'")]
    FileNotFound { path: PathBuf },

    /// The file extension is not in the supported-format allow-list.
    #[error("File extension not supported by the partitioning platform: '{extension}'")]
    UnsupportedExtension { extension: String },

    // ── Configuration ─────────────────────────────────────────────────────
    /// A required environment variable is absent or empty.
    #[error("Missing required environment variable: {var}")]
    MissingConfig { var: String },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Remote failures ───────────────────────────────────────────────────
    /// An object-storage call failed.
    #[error("Storage error during {op}: {detail}")]
    Storage { op: &'static str, detail: String },

    /// A partitioning-platform call failed.
    #[error("Partitioning platform error during {op}: {detail}")]
    Platform { op: &'static str, detail: String },

    /// The workflow produced no job to poll.
    #[error("Workflow '{workflow_id}' reported no jobs after being run")]
    NoJobFound { workflow_id: String },

    /// The remote job reached a terminal state other than success.
    #[error("Remote processing job '{job_id}' ended with status {status}")]
    JobFailed { job_id: String, status: JobStatus },

    /// The remote job did not reach a terminal state within the wait bound.
    #[error("Remote processing job '{job_id}' still not terminal after {secs}s; giving up")]
    JobTimedOut { job_id: String, secs: u64 },

    // ── Local I/O ─────────────────────────────────────────────────────────
    /// Could not read the input document.
    #[error("Failed to read input file '{path}': {source}")]
    InputReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create or write the results JSON file.
    #[error("Failed to write results file '{path}': {source}")]
    ResultWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The retrieved results file is not a valid element sequence.
    #[error("Results file '{path}' is not a valid element list: {detail}")]
    InvalidResultJson { path: PathBuf, detail: String },
}
