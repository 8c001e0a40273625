use std::path::Path;
use std::sync::Arc;

use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::ObjectStore;
use tracing::info;

use linkmill_core::config::AwsConfig;

use crate::error::StorageError;

/// Unified storage backend wrapping object_store.
pub enum StorageBackend {
    Local(LocalBackend),
    S3(S3Backend),
}

impl StorageBackend {
    pub fn store(&self) -> &dyn ObjectStore {
        match self {
            StorageBackend::Local(b) => b.store.as_ref(),
            StorageBackend::S3(b) => b.store.as_ref(),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, StorageBackend::S3(_))
    }

    /// Key prefix for exported files (e.g. "production").
    pub fn prefix(&self) -> &str {
        match self {
            StorageBackend::Local(_) => "",
            StorageBackend::S3(b) => &b.prefix,
        }
    }
}

/// Local filesystem backend, used for tests and offline runs.
pub struct LocalBackend {
    pub store: Arc<dyn ObjectStore>,
}

impl LocalBackend {
    pub fn new(root: &Path) -> Result<Self, StorageError> {
        let canonical = std::fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
        let store = LocalFileSystem::new_with_prefix(&canonical)?;
        info!("Storage: local backend at {}", canonical.display());
        Ok(Self {
            store: Arc::new(store),
        })
    }
}

/// S3 backend.
pub struct S3Backend {
    pub store: Arc<dyn ObjectStore>,
    pub bucket: String,
    pub prefix: String,
}

impl S3Backend {
    pub fn new(aws: &AwsConfig) -> Result<Self, StorageError> {
        let bucket = aws
            .s3_bucket
            .as_deref()
            .ok_or_else(|| StorageError::NotConfigured("S3_BUCKET not set".into()))?;

        let mut builder = AmazonS3Builder::new().with_region(&aws.region);

        if let Some(ref key) = aws.access_key_id {
            builder = builder.with_access_key_id(key);
        }
        if let Some(ref secret) = aws.secret_access_key {
            builder = builder.with_secret_access_key(secret);
        }
        if let Some(ref token) = aws.session_token {
            builder = builder.with_token(token);
        }

        if let Some(ref endpoint) = aws.endpoint_url {
            // object_store requires absolute endpoint URLs
            let endpoint_url = if endpoint.starts_with("http://") || endpoint.starts_with("https://")
            {
                endpoint.clone()
            } else {
                format!("https://{}", endpoint)
            };
            builder = builder
                .with_bucket_name(bucket)
                .with_endpoint(&endpoint_url)
                .with_allow_http(endpoint_url.starts_with("http://"));
        } else {
            builder = builder.with_url(format!("s3://{}", bucket));
        }

        let store = builder.build()?;

        let prefix = aws
            .s3_prefix
            .as_deref()
            .unwrap_or("")
            .trim_end_matches('/')
            .to_string();

        info!(
            "Storage: S3 backend s3://{}/{} (region: {})",
            bucket, prefix, aws.region
        );

        Ok(Self {
            store: Arc::new(store),
            bucket: bucket.to_string(),
            prefix,
        })
    }
}
