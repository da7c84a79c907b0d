//! Asynchronous dispatch: stage the file in object storage, run a remote
//! partition-and-summarise workflow, poll to completion, and retrieve the
//! result JSON.
//!
//! ## Resource lifecycle
//!
//! Every remote resource this module creates — source connector,
//! destination connector, workflow, staged objects — is billed and named
//! per request, and none of them may outlive the request. The protocol
//! body records each resource id in [`RemoteResources`] as it is created;
//! [`teardown`] then runs after the body returns, success or failure
//! alike. Teardown is best-effort: a deletion failure is logged at `warn`
//! and never overrides the primary result.
//!
//! ## Why a per-request storage prefix?
//!
//! All requests share one source/destination bucket pair. Emptying whole
//! buckets on teardown (as a naive implementation would) deletes objects
//! staged by concurrent requests. Instead each request stages everything
//! under a unique `req-{timestamp}-{seq}` prefix, binds its connectors to
//! that prefix, and tears down only its own keys.
//!
//! ## Poll bounds
//!
//! The job poller sleeps a fixed interval between status queries and gives
//! up after `max_wait_secs`, so a job stuck in SCHEDULED surfaces as
//! [`Doc2TextError::JobTimedOut`] instead of blocking the caller forever.
//! The wait is a plain async loop around `tokio::time::sleep`, so callers
//! can also race it against their own cancellation signal.

use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::time::{sleep, Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::ProcessorConfig;
use crate::element::JobStatus;
use crate::error::Doc2TextError;
use crate::platform::PartitionPlatform;
use crate::storage::ObjectStore;

/// Process-wide sequence number folded into request prefixes so that two
/// requests started within the same second cannot collide.
static REQUEST_SEQ: AtomicU64 = AtomicU64::new(0);

/// Remote resources created for one request, recorded as they come into
/// existence so teardown knows exactly what to delete.
#[derive(Default)]
struct RemoteResources {
    source_connector_id: Option<String>,
    destination_connector_id: Option<String>,
    workflow_id: Option<String>,
}

/// Settings the protocol needs from the validated workflow-mode config.
struct WorkflowContext<'a> {
    source_bucket: &'a str,
    destination_bucket: &'a str,
    aws_key: &'a str,
    aws_secret: &'a str,
}

impl<'a> WorkflowContext<'a> {
    fn from_config(config: &'a ProcessorConfig) -> Result<Self, Doc2TextError> {
        // Config validation guarantees these in workflow mode; a direct
        // builder misuse still gets a clear error instead of a panic.
        let missing = |field: &str| {
            Doc2TextError::InvalidConfig(format!("{field} must be set in workflow mode"))
        };
        Ok(Self {
            source_bucket: config
                .source_bucket
                .as_deref()
                .ok_or_else(|| missing("source_bucket"))?,
            destination_bucket: config
                .destination_bucket
                .as_deref()
                .ok_or_else(|| missing("destination_bucket"))?,
            aws_key: config
                .aws_access_key
                .as_deref()
                .ok_or_else(|| missing("aws_access_key"))?,
            aws_secret: config
                .aws_secret_key
                .as_deref()
                .ok_or_else(|| missing("aws_secret_key"))?,
        })
    }
}

/// Run the five-phase workflow protocol and return the local path of the
/// retrieved results JSON.
pub async fn dispatch(
    path: &Path,
    config: &ProcessorConfig,
    platform: &dyn PartitionPlatform,
    store: &dyn ObjectStore,
) -> Result<PathBuf, Doc2TextError> {
    let ctx = WorkflowContext::from_config(config)?;
    let suffix = unique_suffix();
    let prefix = format!("req-{suffix}");
    let mut resources = RemoteResources::default();

    let outcome = run_protocol(
        path, config, platform, store, &ctx, &suffix, &prefix, &mut resources,
    )
    .await;

    // Teardown runs on every exit path of the protocol, and its failures
    // never mask the primary outcome.
    teardown(platform, store, &ctx, &prefix, &resources).await;

    outcome
}

#[allow(clippy::too_many_arguments)]
async fn run_protocol(
    path: &Path,
    config: &ProcessorConfig,
    platform: &dyn PartitionPlatform,
    store: &dyn ObjectStore,
    ctx: &WorkflowContext<'_>,
    suffix: &str,
    prefix: &str,
    resources: &mut RemoteResources,
) -> Result<PathBuf, Doc2TextError> {
    let basename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document");

    // ── Phase 1: stage ───────────────────────────────────────────────────
    let staged_key = format!("{prefix}/{basename}");
    store
        .upload(ctx.source_bucket, &staged_key, path)
        .await?;

    // ── Phase 2: provision ───────────────────────────────────────────────
    let source_id = platform
        .create_source_connector(
            &format!("s3-source-{suffix}"),
            &format!("s3://{}/{prefix}", ctx.source_bucket),
            ctx.aws_key,
            ctx.aws_secret,
        )
        .await?;
    resources.source_connector_id = Some(source_id.clone());

    let destination_id = platform
        .create_destination_connector(
            &format!("s3-destination-{suffix}"),
            &format!("s3://{}/{prefix}", ctx.destination_bucket),
            ctx.aws_key,
            ctx.aws_secret,
        )
        .await?;
    resources.destination_connector_id = Some(destination_id.clone());

    let workflow_id = platform
        .create_workflow(
            &format!("s3-to-s3-custom-workflow-{suffix}"),
            &source_id,
            &destination_id,
        )
        .await?;
    resources.workflow_id = Some(workflow_id.clone());

    // ── Phase 3: execute ─────────────────────────────────────────────────
    platform.run_workflow(&workflow_id).await?;
    let job_id = latest_job_id(platform, &workflow_id).await?;
    info!("Workflow {} running as job {}", workflow_id, job_id);

    // ── Phase 4: await ───────────────────────────────────────────────────
    let status = await_terminal(platform, &job_id, config).await?;
    if !status.is_success() {
        return Err(Doc2TextError::JobFailed { job_id, status });
    }
    info!("Job {} completed", job_id);

    // ── Phase 5: retrieve ────────────────────────────────────────────────
    let result_key = format!("{staged_key}.json");
    store
        .download(ctx.destination_bucket, &result_key, &config.results_dir)
        .await
}

/// Resolve the id of the job created by the run just triggered: the entry
/// with the greatest creation timestamp. List position is never trusted —
/// the platform does not document an ordering.
async fn latest_job_id(
    platform: &dyn PartitionPlatform,
    workflow_id: &str,
) -> Result<String, Doc2TextError> {
    let jobs = platform.list_jobs(workflow_id).await?;
    jobs.into_iter()
        .max_by_key(|j| j.created_at)
        .map(|j| j.id)
        .ok_or_else(|| Doc2TextError::NoJobFound {
            workflow_id: workflow_id.to_string(),
        })
}

/// Poll the job at a fixed interval until it reaches a terminal state,
/// bounded by `config.max_wait_secs`.
async fn await_terminal(
    platform: &dyn PartitionPlatform,
    job_id: &str,
    config: &ProcessorConfig,
) -> Result<JobStatus, Doc2TextError> {
    let started = Instant::now();

    loop {
        let status = platform.get_job(job_id).await?;
        if status.is_terminal() {
            return Ok(status);
        }

        if started.elapsed().as_secs() >= config.max_wait_secs {
            return Err(Doc2TextError::JobTimedOut {
                job_id: job_id.to_string(),
                secs: config.max_wait_secs,
            });
        }

        debug!(
            "Job {} is {}, polling again in {}s",
            job_id, status, config.poll_interval_secs
        );
        sleep(Duration::from_secs(config.poll_interval_secs)).await;
    }
}

/// Delete every remote resource the request created: workflow, both
/// connectors, and all staged objects under the request prefix in both
/// buckets. Best-effort throughout.
async fn teardown(
    platform: &dyn PartitionPlatform,
    store: &dyn ObjectStore,
    ctx: &WorkflowContext<'_>,
    prefix: &str,
    resources: &RemoteResources,
) {
    if let Some(id) = &resources.workflow_id {
        if let Err(e) = platform.delete_workflow(id).await {
            warn!("Teardown: failed to delete workflow {}: {}", id, e);
        }
    }
    if let Some(id) = &resources.source_connector_id {
        if let Err(e) = platform.delete_source_connector(id).await {
            warn!("Teardown: failed to delete source connector {}: {}", id, e);
        }
    }
    if let Some(id) = &resources.destination_connector_id {
        if let Err(e) = platform.delete_destination_connector(id).await {
            warn!(
                "Teardown: failed to delete destination connector {}: {}",
                id, e
            );
        }
    }

    empty_prefix(store, ctx.source_bucket, prefix).await;
    empty_prefix(store, ctx.destination_bucket, prefix).await;
}

/// Delete every object under `prefix`, logging rather than failing.
async fn empty_prefix(store: &dyn ObjectStore, bucket: &str, prefix: &str) {
    let keys = match store.list(bucket, prefix).await {
        Ok(keys) => keys,
        Err(e) => {
            warn!("Teardown: failed to list {}/{}: {}", bucket, prefix, e);
            return;
        }
    };

    for key in keys {
        match store.delete(bucket, &key).await {
            Ok(()) => debug!("Teardown: deleted {}/{}", bucket, key),
            Err(e) => warn!("Teardown: failed to delete {}/{}: {}", bucket, key, e),
        }
    }
}

/// Timestamp-plus-sequence suffix for connector, workflow, and prefix
/// names, e.g. `2026-08-30-14-03-59-17`.
fn unique_suffix() -> String {
    let seq = REQUEST_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}", Utc::now().format("%Y-%m-%d-%H-%M-%S"), seq)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_suffixes_differ_within_one_second() {
        let a = unique_suffix();
        let b = unique_suffix();
        assert_ne!(a, b);
    }
}
