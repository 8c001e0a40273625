use std::path::PathBuf;

use object_store::ObjectStore;
use tracing::info;

use crate::backend::StorageBackend;
use crate::error::StorageError;

/// Upload TSV files to the configured object store.
/// Skips files whose key already exists (incremental export).
pub struct TsvExporter;

impl TsvExporter {
    /// Returns `(uploaded, skipped)` counts.
    pub async fn export_files(
        backend: &StorageBackend,
        files: &[PathBuf],
    ) -> Result<(usize, usize), StorageError> {
        let store = backend.store();
        let prefix = backend.prefix();

        let mut uploaded = 0usize;
        let mut skipped = 0usize;

        for file in files {
            let Some(name) = file.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let key = Self::key(prefix, name);
            let path = object_store::path::Path::from(key.as_str());

            if store.head(&path).await.is_ok() {
                skipped += 1;
                continue;
            }

            let data = tokio::fs::read(file).await.map_err(StorageError::Io)?;
            store.put(&path, bytes::Bytes::from(data).into()).await?;
            uploaded += 1;
        }

        info!("Export complete: {} uploaded, {} skipped", uploaded, skipped);
        Ok((uploaded, skipped))
    }

    fn key(prefix: &str, name: &str) -> String {
        if prefix.is_empty() {
            format!("tsv/{name}")
        } else {
            format!("{prefix}/tsv/{name}")
        }
    }
}
