//! In-memory file storage

use async_trait::async_trait;
use dashmap::DashMap;

use super::random_filename;
use crate::application::ports::{CleanupOutcome, FileStorage};
use crate::domain::{DomainError, DomainResult};

/// In-memory storage for development and testing
#[derive(Default)]
pub struct InMemoryFileStorage {
    files: DashMap<String, Vec<u8>>,
}

impl InMemoryFileStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

fn join(dir: &str, filename: &str) -> String {
    format!("{}/{}", dir.trim_end_matches('/'), filename)
}

#[async_trait]
impl FileStorage for InMemoryFileStorage {
    async fn exists(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    async fn read_file(&self, path: &str) -> DomainResult<Vec<u8>> {
        self.files
            .get(path)
            .map(|f| f.clone())
            .ok_or_else(|| DomainError::Internal(format!("File not found: {}", path)))
    }

    fn generate_random_filename(&self, original: &str) -> Option<String> {
        random_filename(original)
    }

    async fn create_file(&self, dir: &str, filename: &str, data: &[u8]) -> DomainResult<()> {
        self.files.insert(join(dir, filename), data.to_vec());
        Ok(())
    }

    async fn delete_file(&self, dir: &str, filename: Option<&str>) -> CleanupOutcome {
        let path = match filename {
            Some(name) => join(dir, name),
            None => dir.to_string(),
        };

        match self.files.remove(&path) {
            Some(_) => CleanupOutcome::Deleted,
            None => CleanupOutcome::Failed {
                path,
                reason: "no such file".into(),
            },
        }
    }
}
