//! Upload storage. Files are written once and then only read back by path.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;

const RESUME_DIR: &str = "resumes";

#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Stores `data` and returns a path the pipeline can read it back from.
    async fn save(&self, file_name: &str, data: Bytes) -> Result<PathBuf, AppError>;
}

/// Stores uploads under `<root>/resumes/<uuid>-<file name>`.
pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn save(&self, file_name: &str, data: Bytes) -> Result<PathBuf, AppError> {
        let dir = self.root.join(RESUME_DIR);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| AppError::Storage(format!("create {}: {e}", dir.display())))?;

        let path = dir.join(format!("{}-{}", Uuid::new_v4(), sanitize_file_name(file_name)));
        tokio::fs::write(&path, &data)
            .await
            .map_err(|e| AppError::Storage(format!("write {}: {e}", path.display())))?;

        info!("Stored upload at {} ({} bytes)", path.display(), data.len());
        Ok(path)
    }
}

/// Keeps only the last path component of a client-supplied name and replaces
/// anything outside `[A-Za-z0-9._-]` with `_`.
fn sanitize_file_name(name: &str) -> String {
    let base = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload");
    let base = base.rsplit('\\').next().unwrap_or(base);
    base.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
