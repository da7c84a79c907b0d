//! Object-storage collaborator: a narrow trait plus the S3 adapter.
//!
//! The dispatcher only ever needs four operations — upload, download,
//! list, delete — so that is the whole trait. Keeping the seam this
//! narrow lets the workflow protocol be tested against an in-memory fake
//! and keeps SDK types out of the core logic.

use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::ProcessorConfig;
use crate::error::Doc2TextError;

/// The object-storage operations the dispatcher depends on.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload a local file to `bucket` under `key`.
    async fn upload(&self, bucket: &str, key: &str, path: &Path) -> Result<(), Doc2TextError>;

    /// Download `bucket/key` into `dest_dir`, returning the local path.
    /// The directory is created if it does not exist.
    async fn download(
        &self,
        bucket: &str,
        key: &str,
        dest_dir: &Path,
    ) -> Result<PathBuf, Doc2TextError>;

    /// List every key under `prefix`. Pagination is handled internally so
    /// callers see the full listing even past one page of results.
    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, Doc2TextError>;

    /// Delete a single object.
    async fn delete(&self, bucket: &str, key: &str) -> Result<(), Doc2TextError>;
}

/// S3-backed [`ObjectStore`].
pub struct S3Store {
    client: Client,
}

impl S3Store {
    /// Build a store from the processor configuration.
    ///
    /// Explicit credentials from the config take precedence; without them
    /// the standard provider chain (environment, profile, instance role)
    /// is used.
    pub async fn from_config(config: &ProcessorConfig) -> Self {
        let region = Region::new(config.region.clone());

        let client = match (&config.aws_access_key, &config.aws_secret_key) {
            (Some(key), Some(secret)) => {
                let credentials =
                    Credentials::new(key.clone(), secret.clone(), None, None, "doc2text");
                let conf = aws_sdk_s3::config::Builder::new()
                    .behavior_version(BehaviorVersion::latest())
                    .region(region)
                    .credentials_provider(credentials)
                    .build();
                Client::from_conf(conf)
            }
            _ => {
                let shared = aws_config::defaults(BehaviorVersion::latest())
                    .region(region)
                    .load()
                    .await;
                Client::new(&shared)
            }
        };

        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn upload(&self, bucket: &str, key: &str, path: &Path) -> Result<(), Doc2TextError> {
        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| Doc2TextError::Storage {
                op: "upload",
                detail: e.to_string(),
            })?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(|e| Doc2TextError::Storage {
                op: "upload",
                detail: e.into_service_error().to_string(),
            })?;

        info!("Uploaded {} to {}/{}", path.display(), bucket, key);
        Ok(())
    }

    async fn download(
        &self,
        bucket: &str,
        key: &str,
        dest_dir: &Path,
    ) -> Result<PathBuf, Doc2TextError> {
        let resp = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| Doc2TextError::Storage {
                op: "download",
                detail: e.into_service_error().to_string(),
            })?;

        let bytes = resp
            .body
            .collect()
            .await
            .map_err(|e| Doc2TextError::Storage {
                op: "download",
                detail: e.to_string(),
            })?
            .into_bytes();

        tokio::fs::create_dir_all(dest_dir)
            .await
            .map_err(|e| Doc2TextError::ResultWriteFailed {
                path: dest_dir.to_path_buf(),
                source: e,
            })?;

        // Keys may carry a request prefix; only the final component names
        // the local file.
        let file_name = key.rsplit('/').next().unwrap_or(key);
        let local_path = dest_dir.join(file_name);
        tokio::fs::write(&local_path, &bytes)
            .await
            .map_err(|e| Doc2TextError::ResultWriteFailed {
                path: local_path.clone(),
                source: e,
            })?;

        info!("Downloaded {}/{} to {}", bucket, key, local_path.display());
        Ok(local_path)
    }

    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, Doc2TextError> {
        let mut keys = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut req = self.client.list_objects_v2().bucket(bucket).prefix(prefix);

            if let Some(token) = &continuation_token {
                req = req.continuation_token(token);
            }

            let resp = req.send().await.map_err(|e| Doc2TextError::Storage {
                op: "list",
                detail: e.into_service_error().to_string(),
            })?;

            for obj in resp.contents() {
                if let Some(key) = obj.key() {
                    keys.push(key.to_string());
                }
            }

            if resp.is_truncated() == Some(true) {
                continuation_token = resp.next_continuation_token().map(|s| s.to_string());
            } else {
                break;
            }
        }

        debug!("Listed {} objects under {}/{}", keys.len(), bucket, prefix);
        Ok(keys)
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<(), Doc2TextError> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| Doc2TextError::Storage {
                op: "delete",
                detail: e.into_service_error().to_string(),
            })?;

        debug!("Deleted {}/{}", bucket, key);
        Ok(())
    }
}
