//! Data model for partitioned document content and remote jobs.
//!
//! [`Element`] mirrors the JSON the partitioning platform emits: one tagged
//! unit of content per entry, in reading order. The platform's tag
//! vocabulary is open-ended — new tags appear without notice — so
//! [`ElementType`] deserialises unknown tags into [`ElementType::Other`]
//! instead of failing. Downstream, [`crate::flatten::flatten`] relies on
//! that to stay total.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Metadata key under which the platform stores a table's HTML rendering.
pub const TEXT_AS_HTML_KEY: &str = "text_as_html";

/// Tag assigned by the partitioning platform to one unit of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementType {
    Title,
    Header,
    NarrativeText,
    UncategorizedText,
    ListItem,
    PageNumber,
    Table,
    /// Any tag this crate does not specifically handle (Image, Footer,
    /// FigureCaption, ...). Flattened as raw text.
    #[serde(other)]
    Other,
}

/// One unit of extracted document content.
///
/// Produced wholesale by the partitioning platform as an ordered sequence;
/// immutable once received.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    #[serde(rename = "type")]
    pub element_type: ElementType,

    /// Raw extracted text. May be empty (e.g. for image elements).
    #[serde(default)]
    pub text: String,

    /// Per-element metadata. For [`ElementType::Table`] the HTML rendering
    /// sits under [`TEXT_AS_HTML_KEY`] when the platform produced one.
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Element {
    /// Convenience constructor for tests and examples.
    pub fn new(element_type: ElementType, text: impl Into<String>) -> Self {
        Self {
            element_type,
            text: text.into(),
            metadata: Map::new(),
        }
    }

    /// The table's HTML rendering, if present in metadata.
    pub fn table_html(&self) -> Option<&str> {
        self.metadata.get(TEXT_AS_HTML_KEY).and_then(Value::as_str)
    }
}

/// Status of a remote workflow job, as reported by the platform.
///
/// The platform reports status as an upper-snake-case string. Anything not
/// recognised is kept verbatim in [`JobStatus::Other`] and treated as
/// terminal — the poll loop must never spin forever on a status it does
/// not know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Scheduled,
    InProgress,
    Completed,
    Failed,
    Stopped,
    Other(String),
}

impl JobStatus {
    /// Parse the platform's status string.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "SCHEDULED" => JobStatus::Scheduled,
            "IN_PROGRESS" => JobStatus::InProgress,
            "COMPLETED" => JobStatus::Completed,
            "FAILED" => JobStatus::Failed,
            "STOPPED" => JobStatus::Stopped,
            other => JobStatus::Other(other.to_string()),
        }
    }

    /// True once the job will make no further progress.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Scheduled | JobStatus::InProgress)
    }

    /// True only for a successful completion. A terminal job that is not
    /// a success surfaces as [`crate::error::Doc2TextError::JobFailed`].
    pub fn is_success(&self) -> bool {
        matches!(self, JobStatus::Completed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Scheduled => write!(f, "SCHEDULED"),
            JobStatus::InProgress => write!(f, "IN_PROGRESS"),
            JobStatus::Completed => write!(f, "COMPLETED"),
            JobStatus::Failed => write!(f, "FAILED"),
            JobStatus::Stopped => write!(f, "STOPPED"),
            JobStatus::Other(s) => write!(f, "{s}"),
        }
    }
}

/// One entry from the platform's job listing for a workflow.
#[derive(Debug, Clone)]
pub struct JobSummary {
    pub id: String,
    /// Creation timestamp — the explicit ordering key used to pick the
    /// latest job. List position is never trusted.
    pub created_at: DateTime<Utc>,
    pub status: JobStatus,
}
