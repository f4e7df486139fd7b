//! Outbound ports: interfaces for the collaborators the user service drives
//!
//! [`FileStorage`] stores profile images, [`AuthIssuer`] mints credentials
//! after identity changes. Production implementations live in
//! `infrastructure::storage` and `infrastructure::crypto::jwt`.

use async_trait::async_trait;
use serde::Serialize;
use tracing::warn;

use crate::domain::{DomainResult, User};

// ── Cleanup outcome ────────────────────────────────────────────

/// Result of a best-effort delete.
///
/// Deletes never fail the enclosing operation. Callers are expected to
/// [`log`](CleanupOutcome::log) the outcome and carry on.
#[must_use = "log the outcome of a best-effort delete"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupOutcome {
    Deleted,
    Failed { path: String, reason: String },
}

impl CleanupOutcome {
    pub fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted)
    }

    /// Emit a warning (and bump a counter) when the delete failed.
    pub fn log(self) {
        if let Self::Failed { path, reason } = self {
            metrics::counter!("storage_cleanup_failures_total").increment(1);
            warn!(path = %path, reason = %reason, "Best-effort file cleanup failed");
        }
    }
}

// ── FileStorage ────────────────────────────────────────────────

/// Blob storage addressed by a directory plus a filename.
#[async_trait]
pub trait FileStorage: Send + Sync {
    async fn exists(&self, path: &str) -> bool;

    async fn read_file(&self, path: &str) -> DomainResult<Vec<u8>>;

    /// Random, collision-resistant name keeping the extension of `original`.
    /// Returns `None` for an empty name.
    fn generate_random_filename(&self, original: &str) -> Option<String>;

    /// Persist `data` as `dir/filename`, creating `dir` when missing.
    async fn create_file(&self, dir: &str, filename: &str, data: &[u8]) -> DomainResult<()>;

    /// Remove `dir/filename` (or `dir` itself when no filename is given).
    async fn delete_file(&self, dir: &str, filename: Option<&str>) -> CleanupOutcome;
}

// ── AuthIssuer ─────────────────────────────────────────────────

/// Authentication material handed back to the client.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[async_trait]
pub trait AuthIssuer: Send + Sync {
    async fn issue(&self, user: &User) -> DomainResult<AuthResult>;
}
