//! Partitioning-platform collaborator: a narrow trait plus the HTTP adapter.
//!
//! The trait covers exactly the capability set the dispatcher uses —
//! direct partitioning, connector lifecycle, workflow lifecycle, and job
//! queries. Core logic never touches HTTP types; [`PlatformClient`] is the
//! only place that knows the platform's REST surface.
//!
//! ## Wire contract
//!
//! The workflow API lives under one base URL and authenticates with an
//! `unstructured-api-key` header:
//!
//! * `POST   /sources/`            create a source connector  → `{ "id": … }`
//! * `POST   /destinations/`       create a destination connector
//! * `POST   /workflows/`          create a workflow
//! * `POST   /workflows/{id}/run`  trigger a run
//! * `GET    /jobs/?workflow_id=…` list jobs (id, created_at, status)
//! * `GET    /jobs/{id}`           job status
//! * `DELETE /workflows/{id}`, `/sources/{id}`, `/destinations/{id}`
//!
//! The direct partition endpoint is a separate URL taking a
//! `multipart/form-data` POST (`files` + `strategy`) and returning the
//! element array in the response body.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::config::ProcessorConfig;
use crate::element::{Element, JobStatus, JobSummary};
use crate::error::Doc2TextError;

/// Name of the HTTP header carrying the platform API key.
const API_KEY_HEADER: &str = "unstructured-api-key";

/// The partitioning-platform operations the dispatcher depends on.
#[async_trait]
pub trait PartitionPlatform: Send + Sync {
    /// Partition a document directly: bytes in, ordered elements out.
    async fn partition(
        &self,
        file_bytes: Vec<u8>,
        filename: &str,
        strategy: &str,
    ) -> Result<Vec<Element>, Doc2TextError>;

    /// Create a source connector bound to `remote_url`; returns its id.
    /// The platform reads the bucket itself, so the connector config
    /// carries the storage credentials.
    async fn create_source_connector(
        &self,
        name: &str,
        remote_url: &str,
        key: &str,
        secret: &str,
    ) -> Result<String, Doc2TextError>;

    /// Create a destination connector bound to `remote_url`; returns its id.
    async fn create_destination_connector(
        &self,
        name: &str,
        remote_url: &str,
        key: &str,
        secret: &str,
    ) -> Result<String, Doc2TextError>;

    /// Create the partition-and-summarise workflow between two connectors;
    /// returns the workflow id.
    async fn create_workflow(
        &self,
        name: &str,
        source_id: &str,
        destination_id: &str,
    ) -> Result<String, Doc2TextError>;

    /// Trigger a run of the workflow.
    async fn run_workflow(&self, workflow_id: &str) -> Result<(), Doc2TextError>;

    /// List the jobs recorded for a workflow, in no guaranteed order.
    /// Callers pick the latest by `created_at`.
    async fn list_jobs(&self, workflow_id: &str) -> Result<Vec<JobSummary>, Doc2TextError>;

    /// Fetch the current status of a job.
    async fn get_job(&self, job_id: &str) -> Result<JobStatus, Doc2TextError>;

    async fn delete_workflow(&self, workflow_id: &str) -> Result<(), Doc2TextError>;

    async fn delete_source_connector(&self, connector_id: &str) -> Result<(), Doc2TextError>;

    async fn delete_destination_connector(&self, connector_id: &str)
        -> Result<(), Doc2TextError>;
}

// ── HTTP adapter ─────────────────────────────────────────────────────────

/// [`PartitionPlatform`] implemented over the platform's REST API.
pub struct PlatformClient {
    http: reqwest::Client,
    api_key: String,
    api_url: String,
    partition_url: String,
}

#[derive(Deserialize)]
struct IdResponse {
    id: String,
}

#[derive(Deserialize)]
struct JobResponse {
    id: String,
    created_at: DateTime<Utc>,
    status: String,
}

impl PlatformClient {
    /// Build a client from the processor configuration.
    pub fn from_config(config: &ProcessorConfig) -> Result<Self, Doc2TextError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|e| Doc2TextError::Platform {
                op: "client init",
                detail: e.to_string(),
            })?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            partition_url: config.partition_url.clone(),
        })
    }

    /// Issue a JSON request, check the status, and return the body.
    async fn send(
        &self,
        op: &'static str,
        req: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, Doc2TextError> {
        let resp = req
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| Doc2TextError::Platform {
                op,
                detail: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Doc2TextError::Platform {
                op,
                detail: format!("HTTP {status}: {body}"),
            });
        }
        Ok(resp)
    }

    async fn create_connector(
        &self,
        op: &'static str,
        endpoint: &str,
        name: &str,
        remote_url: &str,
        key: &str,
        secret: &str,
    ) -> Result<String, Doc2TextError> {
        let payload = json!({
            "name": name,
            "type": "s3",
            "config": {
                "remote_url": remote_url,
                "key": key,
                "secret": secret,
            },
        });

        let resp = self
            .send(op, self.http.post(format!("{}/{endpoint}/", self.api_url)).json(&payload))
            .await?;
        let body: IdResponse = resp.json().await.map_err(|e| Doc2TextError::Platform {
            op,
            detail: format!("invalid response body: {e}"),
        })?;

        info!("{}: '{}' created with id {}", op, name, body.id);
        Ok(body.id)
    }

    /// The workflow node graph: VLM partitioning with HTML table output and
    /// stable element ids, followed by prompter nodes that summarise
    /// detected images and tables.
    fn workflow_nodes() -> serde_json::Value {
        json!([
            {
                "name": "Partitioner",
                "type": "partition",
                "subtype": "vlm",
                "settings": {
                    "provider": "anthropic",
                    "model": "claude-3-5-sonnet-20241022",
                    "output_format": "text/html",
                    "format_html": true,
                    "unique_element_ids": true,
                    "is_dynamic": true,
                    "allow_fast": true,
                },
            },
            {
                "name": "Image summarizer",
                "type": "prompter",
                "subtype": "openai_image_description",
                "settings": {},
            },
            {
                "name": "Table summarizer",
                "type": "prompter",
                "subtype": "anthropic_table_description",
                "settings": {},
            },
        ])
    }
}

#[async_trait]
impl PartitionPlatform for PlatformClient {
    async fn partition(
        &self,
        file_bytes: Vec<u8>,
        filename: &str,
        strategy: &str,
    ) -> Result<Vec<Element>, Doc2TextError> {
        let op = "partition";
        debug!("Partitioning '{}' ({} bytes, strategy={})", filename, file_bytes.len(), strategy);

        let part = reqwest::multipart::Part::bytes(file_bytes)
            .file_name(filename.to_string())
            .mime_str("application/octet-stream")
            .map_err(|e| Doc2TextError::Platform {
                op,
                detail: e.to_string(),
            })?;
        let form = reqwest::multipart::Form::new()
            .part("files", part)
            .text("strategy", strategy.to_string());

        let resp = self
            .send(op, self.http.post(&self.partition_url).multipart(form))
            .await?;

        let elements: Vec<Element> =
            resp.json().await.map_err(|e| Doc2TextError::Platform {
                op,
                detail: format!("invalid element list in response: {e}"),
            })?;

        info!("Partitioned '{}' into {} elements", filename, elements.len());
        Ok(elements)
    }

    async fn create_source_connector(
        &self,
        name: &str,
        remote_url: &str,
        key: &str,
        secret: &str,
    ) -> Result<String, Doc2TextError> {
        self.create_connector("create source connector", "sources", name, remote_url, key, secret)
            .await
    }

    async fn create_destination_connector(
        &self,
        name: &str,
        remote_url: &str,
        key: &str,
        secret: &str,
    ) -> Result<String, Doc2TextError> {
        self.create_connector(
            "create destination connector",
            "destinations",
            name,
            remote_url,
            key,
            secret,
        )
        .await
    }

    async fn create_workflow(
        &self,
        name: &str,
        source_id: &str,
        destination_id: &str,
    ) -> Result<String, Doc2TextError> {
        let op = "create workflow";
        let payload = json!({
            "name": name,
            "source_id": source_id,
            "destination_id": destination_id,
            "workflow_type": "custom",
            "workflow_nodes": Self::workflow_nodes(),
        });

        let resp = self
            .send(op, self.http.post(format!("{}/workflows/", self.api_url)).json(&payload))
            .await?;
        let body: IdResponse = resp.json().await.map_err(|e| Doc2TextError::Platform {
            op,
            detail: format!("invalid response body: {e}"),
        })?;

        info!("Created workflow '{}' (id {})", name, body.id);
        Ok(body.id)
    }

    async fn run_workflow(&self, workflow_id: &str) -> Result<(), Doc2TextError> {
        self.send(
            "run workflow",
            self.http
                .post(format!("{}/workflows/{workflow_id}/run", self.api_url)),
        )
        .await?;
        info!("Triggered run of workflow {}", workflow_id);
        Ok(())
    }

    async fn list_jobs(&self, workflow_id: &str) -> Result<Vec<JobSummary>, Doc2TextError> {
        let op = "list jobs";
        let resp = self
            .send(
                op,
                self.http
                    .get(format!("{}/jobs/", self.api_url))
                    .query(&[("workflow_id", workflow_id)]),
            )
            .await?;

        let jobs: Vec<JobResponse> =
            resp.json().await.map_err(|e| Doc2TextError::Platform {
                op,
                detail: format!("invalid job list in response: {e}"),
            })?;

        Ok(jobs
            .into_iter()
            .map(|j| JobSummary {
                id: j.id,
                created_at: j.created_at,
                status: JobStatus::parse(&j.status),
            })
            .collect())
    }

    async fn get_job(&self, job_id: &str) -> Result<JobStatus, Doc2TextError> {
        let op = "get job";
        let resp = self
            .send(op, self.http.get(format!("{}/jobs/{job_id}", self.api_url)))
            .await?;

        let job: JobResponse = resp.json().await.map_err(|e| Doc2TextError::Platform {
            op,
            detail: format!("invalid job in response: {e}"),
        })?;

        Ok(JobStatus::parse(&job.status))
    }

    async fn delete_workflow(&self, workflow_id: &str) -> Result<(), Doc2TextError> {
        self.send(
            "delete workflow",
            self.http
                .delete(format!("{}/workflows/{workflow_id}", self.api_url)),
        )
        .await?;
        Ok(())
    }

    async fn delete_source_connector(&self, connector_id: &str) -> Result<(), Doc2TextError> {
        self.send(
            "delete source connector",
            self.http
                .delete(format!("{}/sources/{connector_id}", self.api_url)),
        )
        .await?;
        Ok(())
    }

    async fn delete_destination_connector(
        &self,
        connector_id: &str,
    ) -> Result<(), Doc2TextError> {
        self.send(
            "delete destination connector",
            self.http
                .delete(format!("{}/destinations/{connector_id}", self.api_url)),
        )
        .await?;
        Ok(())
    }
}
