//! Local file system storage

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::error;

use super::random_filename;
use crate::application::ports::{CleanupOutcome, FileStorage};
use crate::domain::{DomainError, DomainResult, InfraError};

/// Stores files below a root directory (the working directory by default).
pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

impl Default for LocalFileStorage {
    fn default() -> Self {
        Self::new(".")
    }
}

async fn write_file(dir: &Path, filename: &str, data: &[u8]) -> std::io::Result<()> {
    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(dir.join(filename), data).await
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn exists(&self, path: &str) -> bool {
        tokio::fs::try_exists(self.resolve(path))
            .await
            .unwrap_or(false)
    }

    async fn read_file(&self, path: &str) -> DomainResult<Vec<u8>> {
        tokio::fs::read(self.resolve(path))
            .await
            .map_err(|e| InfraError::from(e).into())
    }

    fn generate_random_filename(&self, original: &str) -> Option<String> {
        random_filename(original)
    }

    async fn create_file(&self, dir: &str, filename: &str, data: &[u8]) -> DomainResult<()> {
        write_file(&self.resolve(dir), filename, data)
            .await
            .map_err(|e| {
                error!(dir, filename, error = %e, "Failed to write file");
                DomainError::Internal("Failed to upload file".into())
            })
    }

    async fn delete_file(&self, dir: &str, filename: Option<&str>) -> CleanupOutcome {
        let path = match filename {
            Some(name) => self.resolve(dir).join(name),
            None => self.resolve(dir),
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => CleanupOutcome::Deleted,
            Err(e) => CleanupOutcome::Failed {
                path: path.display().to_string(),
                reason: e.to_string(),
            },
        }
    }
}
