//! Configuration for document processing.
//!
//! All behaviour is controlled through [`ProcessorConfig`], built either
//! from the environment ([`ProcessorConfig::from_env`], the deployment
//! path) or programmatically via [`ProcessorConfigBuilder`]. Both paths
//! run the same validation, so a process that constructs its config at
//! startup can never reach the dispatcher with missing credentials —
//! required settings fail fast, before any request is accepted.

use crate::error::Doc2TextError;
use std::fmt;
use std::path::PathBuf;

/// Default base URL of the partitioning platform's workflow API.
pub const DEFAULT_API_URL: &str = "https://platform.unstructuredapp.io/api/v1";

/// Default URL of the direct (synchronous) partition endpoint.
pub const DEFAULT_PARTITION_URL: &str = "https://api.unstructuredapp.io/general/v0/general";

/// How a document is submitted to the partitioning platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessingMode {
    /// One direct API call: file bytes in, elements out. (default)
    #[default]
    Sync,
    /// Stage the file in object storage and run a remote workflow
    /// (partition + image/table summarisation), polling until done.
    Workflow,
}

/// Configuration for a document processor.
///
/// # Example
/// ```rust
/// use doc2text::{ProcessorConfig, ProcessingMode};
///
/// let config = ProcessorConfig::builder()
///     .api_key("unst-key")
///     .mode(ProcessingMode::Sync)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ProcessorConfig {
    /// API key for the partitioning platform. Required in both modes.
    pub api_key: String,

    /// Base URL of the platform's workflow API. Default: [`DEFAULT_API_URL`].
    pub api_url: String,

    /// URL of the direct partition endpoint. Default: [`DEFAULT_PARTITION_URL`].
    pub partition_url: String,

    /// Submission strategy. Default: [`ProcessingMode::Sync`].
    pub mode: ProcessingMode,

    /// Object-storage access key. Required in workflow mode.
    pub aws_access_key: Option<String>,

    /// Object-storage secret key. Required in workflow mode.
    pub aws_secret_key: Option<String>,

    /// Bucket the input file is staged into. Required in workflow mode.
    pub source_bucket: Option<String>,

    /// Bucket the workflow writes results into. Required in workflow mode.
    pub destination_bucket: Option<String>,

    /// Object-storage region. Default: "us-east-2".
    pub region: String,

    /// Local directory the results JSON is written into.
    /// Default: "processed_files".
    pub results_dir: PathBuf,

    /// Seconds between job-status polls. Default: 10.
    pub poll_interval_secs: u64,

    /// Maximum seconds to wait for a job to reach a terminal state before
    /// giving up with a timeout error. Default: 600.
    ///
    /// The poll loop must be bounded: a job stuck in SCHEDULED would
    /// otherwise block the caller indefinitely.
    pub max_wait_secs: u64,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: DEFAULT_API_URL.to_string(),
            partition_url: DEFAULT_PARTITION_URL.to_string(),
            mode: ProcessingMode::default(),
            aws_access_key: None,
            aws_secret_key: None,
            source_bucket: None,
            destination_bucket: None,
            region: "us-east-2".to_string(),
            results_dir: PathBuf::from("processed_files"),
            poll_interval_secs: 10,
            max_wait_secs: 600,
        }
    }
}

// Credentials must never end up in logs, so Debug redacts them.
impl fmt::Debug for ProcessorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessorConfig")
            .field("api_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("partition_url", &self.partition_url)
            .field("mode", &self.mode)
            .field("aws_access_key", &self.aws_access_key.as_ref().map(|_| "<redacted>"))
            .field("aws_secret_key", &self.aws_secret_key.as_ref().map(|_| "<redacted>"))
            .field("source_bucket", &self.source_bucket)
            .field("destination_bucket", &self.destination_bucket)
            .field("region", &self.region)
            .field("results_dir", &self.results_dir)
            .field("poll_interval_secs", &self.poll_interval_secs)
            .field("max_wait_secs", &self.max_wait_secs)
            .finish()
    }
}

impl ProcessorConfig {
    /// Create a new builder.
    pub fn builder() -> ProcessorConfigBuilder {
        ProcessorConfigBuilder {
            config: Self::default(),
        }
    }

    /// Build the configuration from environment variables, failing fast on
    /// anything missing.
    ///
    /// Always required: `UNSTRUCTURED_API_KEY`.
    ///
    /// `DOC2TEXT_MODE` selects the mode (`sync`, the default, or
    /// `workflow`). Workflow mode additionally requires `AWS_KEY`,
    /// `AWS_SECRET`, `AWS_S3_SOURCE_BUCKET`, and
    /// `AWS_S3_DESTINATION_BUCKET`; `AWS_REGION` overrides the default
    /// region.
    pub fn from_env() -> Result<Self, Doc2TextError> {
        let mut builder = Self::builder().api_key(require_env("UNSTRUCTURED_API_KEY")?);

        if let Some(url) = optional_env("UNSTRUCTURED_API_URL") {
            builder = builder.api_url(url);
        }
        if let Some(url) = optional_env("UNSTRUCTURED_PARTITION_URL") {
            builder = builder.partition_url(url);
        }
        if let Some(region) = optional_env("AWS_REGION") {
            builder = builder.region(region);
        }
        if let Some(dir) = optional_env("DOC2TEXT_RESULTS_DIR") {
            builder = builder.results_dir(dir);
        }

        let mode = match optional_env("DOC2TEXT_MODE").as_deref() {
            None | Some("sync") => ProcessingMode::Sync,
            Some("workflow") => ProcessingMode::Workflow,
            Some(other) => {
                return Err(Doc2TextError::InvalidConfig(format!(
                    "DOC2TEXT_MODE must be 'sync' or 'workflow', got '{other}'"
                )))
            }
        };
        builder = builder.mode(mode);

        if mode == ProcessingMode::Workflow {
            builder = builder
                .aws_access_key(require_env("AWS_KEY")?)
                .aws_secret_key(require_env("AWS_SECRET")?)
                .source_bucket(require_env("AWS_S3_SOURCE_BUCKET")?)
                .destination_bucket(require_env("AWS_S3_DESTINATION_BUCKET")?);
        }

        builder.build()
    }
}

fn require_env(var: &str) -> Result<String, Doc2TextError> {
    match std::env::var(var) {
        Ok(v) if !v.is_empty() => Ok(v),
        _ => Err(Doc2TextError::MissingConfig {
            var: var.to_string(),
        }),
    }
}

fn optional_env(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.is_empty())
}

/// Builder for [`ProcessorConfig`].
#[derive(Debug)]
pub struct ProcessorConfigBuilder {
    config: ProcessorConfig,
}

impl ProcessorConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    pub fn partition_url(mut self, url: impl Into<String>) -> Self {
        self.config.partition_url = url.into();
        self
    }

    pub fn mode(mut self, mode: ProcessingMode) -> Self {
        self.config.mode = mode;
        self
    }

    pub fn aws_access_key(mut self, key: impl Into<String>) -> Self {
        self.config.aws_access_key = Some(key.into());
        self
    }

    pub fn aws_secret_key(mut self, secret: impl Into<String>) -> Self {
        self.config.aws_secret_key = Some(secret.into());
        self
    }

    pub fn source_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.config.source_bucket = Some(bucket.into());
        self
    }

    pub fn destination_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.config.destination_bucket = Some(bucket.into());
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.config.region = region.into();
        self
    }

    pub fn results_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.results_dir = dir.into();
        self
    }

    pub fn poll_interval_secs(mut self, secs: u64) -> Self {
        self.config.poll_interval_secs = secs.max(1);
        self
    }

    pub fn max_wait_secs(mut self, secs: u64) -> Self {
        self.config.max_wait_secs = secs;
        self
    }

    /// Build the configuration, validating mode-specific requirements.
    pub fn build(self) -> Result<ProcessorConfig, Doc2TextError> {
        let c = &self.config;
        if c.api_key.is_empty() {
            return Err(Doc2TextError::InvalidConfig(
                "api_key must be set".into(),
            ));
        }
        if c.mode == ProcessingMode::Workflow {
            for (field, value) in [
                ("aws_access_key", &c.aws_access_key),
                ("aws_secret_key", &c.aws_secret_key),
                ("source_bucket", &c.source_bucket),
                ("destination_bucket", &c.destination_bucket),
            ] {
                if value.as_deref().is_none_or(str::is_empty) {
                    return Err(Doc2TextError::InvalidConfig(format!(
                        "{field} must be set in workflow mode"
                    )));
                }
            }
        }
        if c.max_wait_secs == 0 {
            return Err(Doc2TextError::InvalidConfig(
                "max_wait_secs must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ProcessorConfig::builder().api_key("k").build().unwrap();
        assert_eq!(config.mode, ProcessingMode::Sync);
        assert_eq!(config.region, "us-east-2");
        assert_eq!(config.poll_interval_secs, 10);
        assert_eq!(config.max_wait_secs, 600);
        assert_eq!(config.results_dir, PathBuf::from("processed_files"));
    }

    #[test]
    fn missing_api_key_rejected() {
        let err = ProcessorConfig::builder().build().unwrap_err();
        assert!(err.to_string().contains("api_key"));
    }

    #[test]
    fn workflow_mode_requires_storage_settings() {
        let err = ProcessorConfig::builder()
            .api_key("k")
            .mode(ProcessingMode::Workflow)
            .aws_access_key("ak")
            .aws_secret_key("sk")
            .source_bucket("src")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("destination_bucket"));
    }

    #[test]
    fn workflow_mode_complete_builds() {
        let config = ProcessorConfig::builder()
            .api_key("k")
            .mode(ProcessingMode::Workflow)
            .aws_access_key("ak")
            .aws_secret_key("sk")
            .source_bucket("src")
            .destination_bucket("dst")
            .build()
            .unwrap();
        assert_eq!(config.source_bucket.as_deref(), Some("src"));
    }

    #[test]
    fn debug_redacts_credentials() {
        let config = ProcessorConfig::builder()
            .api_key("super-secret")
            .aws_secret_key("also-secret")
            .build()
            .unwrap();
        let dump = format!("{config:?}");
        assert!(!dump.contains("super-secret"));
        assert!(!dump.contains("also-secret"));
    }
}
