//! # doc2text
//!
//! Flatten documents into HTML-tagged text via a remote partitioning
//! platform.
//!
//! ## Why this crate?
//!
//! Tool-calling agents want a document as one linear text string, not as
//! a binary office file. This crate submits a local document to a
//! partitioning platform — which extracts an ordered sequence of tagged
//! elements (titles, paragraphs, tables, page numbers) — and flattens
//! that sequence into a single marked-up string the agent can consume.
//!
//! ## Pipeline Overview
//!
//! ```text
//! document
//!  │
//!  ├─ 1. Validate  file exists, extension allow-listed (local, free)
//!  ├─ 2. Dispatch  sync: direct partition call
//!  │               workflow: stage to S3 → provision connectors +
//!  │               workflow → run → poll job → retrieve JSON → teardown
//!  ├─ 3. Persist   element JSON lands in the results directory
//!  └─ 4. Flatten   elements → "<h1> …</h1><br> <p>…</p> …"
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use doc2text::{process_document, PlatformClient, ProcessorConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads UNSTRUCTURED_API_KEY (and, in workflow mode, the AWS
//!     // settings) from the environment; fails fast if anything is missing.
//!     let config = ProcessorConfig::from_env()?;
//!     let platform = PlatformClient::from_config(&config)?;
//!     let text = process_document("report.pdf", &config, &platform, None).await?;
//!     println!("{text}");
//!     Ok(())
//! }
//! ```
//!
//! ## Two dispatch modes
//!
//! | Mode | When to use |
//! |------|-------------|
//! | `Sync` (default) | One request/response; no cloud storage needed |
//! | `Workflow` | VLM partitioning plus image/table summarisation via a remote workflow; requires an S3 bucket pair |
//!
//! In workflow mode every remote resource is created per request under a
//! unique name/prefix and deleted again before the call returns —
//! success or failure, nothing the request provisioned outlives it.
//!
//! ## Tool boundary
//!
//! [`get_processed_document`] never fails: every error path collapses to
//! a readable message string, matching what a tool host expects from a
//! single `filepath in, text out` operation.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod element;
pub mod error;
pub mod flatten;
pub mod pipeline;
pub mod platform;
pub mod process;
pub mod storage;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ProcessingMode, ProcessorConfig, ProcessorConfigBuilder};
pub use element::{Element, ElementType, JobStatus, JobSummary};
pub use error::Doc2TextError;
pub use flatten::flatten;
pub use platform::{PartitionPlatform, PlatformClient};
pub use process::{get_processed_document, process_document};
pub use storage::{ObjectStore, S3Store};
