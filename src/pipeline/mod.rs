//! Pipeline stages for document-to-text processing.
//!
//! Each submodule implements one stage; the stages compose in
//! [`crate::process::process_document`].
//!
//! ```text
//! validate ──▶ partition (sync)  ─────────────▶ flatten
//!          └─▶ workflow  (async) ─▶ poll ─▶ retrieve ─▶ flatten
//! ```
//!
//! 1. [`validate`]  — local checks: file exists, extension allow-listed
//! 2. [`partition`] — sync mode: one direct call, elements in the response
//! 3. [`workflow`]  — async mode: stage → provision → execute → await →
//!    retrieve, with unconditional teardown of every remote resource the
//!    request created
pub mod partition;
pub mod validate;
pub mod workflow;
