//! Reconciles the catalog store with the remote document.
//!
//! Loading walks a three-tier fallback (remote, then local cache, then the
//! bundled seed) so there is always a catalog to show. Committing reads the
//! current content hash and writes the whole catalog conditioned on it; a
//! concurrent edit makes the write fail rather than overwrite.

mod adapter;
mod image;

pub use adapter::{CachedSnapshot, SyncAdapter, SyncStatus, WorkingCopy};
pub use image::{ImageError, ImageFile, UploadedImage, LOCAL_IMAGE_PATH, MAX_IMAGE_BYTES};

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::remote::RemoteError;

/// Path of the catalog document inside the repository.
pub const DATA_PATH: &str = "data/data.json";
/// Directory uploaded images are written to.
pub const IMAGE_DIR: &str = "assets/images";
pub const DEFAULT_COMMIT_MESSAGE: &str = "Update kit catalog via kitvault";

/// Failures surfaced by commit, image and repository operations.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("GitHub not configured")]
    NotConfigured,

    #[error("No write access to repository")]
    NoWriteAccess,

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("Invalid remote document: {0}")]
    InvalidRemoteDocument(String),
}

/// Coarse error taxonomy used for user-facing reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Remote sync settings are missing; the app runs local-only.
    Configuration,
    /// Authenticated but not allowed to write.
    Permission,
    /// Network or API failure.
    Transport,
    /// A document failed to parse or lacks required sections.
    DataShape,
}

impl SyncError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SyncError::NotConfigured => ErrorCategory::Configuration,
            SyncError::NoWriteAccess => ErrorCategory::Permission,
            SyncError::Remote(_) => ErrorCategory::Transport,
            SyncError::InvalidRemoteDocument(_) => ErrorCategory::DataShape,
        }
    }
}

/// Where the catalog currently in the store came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Remote,
    Cache,
    Seed,
    /// Restored from the local working copy.
    Working,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DataSource::Remote => "remote",
            DataSource::Cache => "cache",
            DataSource::Seed => "seed",
            DataSource::Working => "working copy",
        };
        write!(f, "{}", s)
    }
}

/// A degraded load outcome worth showing to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum LoadIssue {
    /// The remote fetch failed and cached data is shown. Non-fatal.
    StaleCache(String),
    /// Neither remote nor cache was usable; seed data is shown.
    Failed(String),
}

impl LoadIssue {
    pub fn is_fatal(&self) -> bool {
        matches!(self, LoadIssue::Failed(_))
    }

    pub fn message(&self) -> &str {
        match self {
            LoadIssue::StaleCache(m) | LoadIssue::Failed(m) => m,
        }
    }
}

impl fmt::Display for LoadIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Result of running the load protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub source: DataSource,
    pub issue: Option<LoadIssue>,
}

impl LoadReport {
    fn clean(source: DataSource) -> Self {
        Self {
            source,
            issue: None,
        }
    }
}

/// Progress stages of a commit. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitStage {
    Preparing,
    WritingDocument,
    UpdatingCache,
    Complete,
}

impl CommitStage {
    pub fn percent(self) -> u8 {
        match self {
            CommitStage::Preparing => 10,
            CommitStage::WritingDocument => 30,
            CommitStage::UpdatingCache => 80,
            CommitStage::Complete => 100,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            CommitStage::Preparing => "Preparing commit...",
            CommitStage::WritingDocument => "Committing data.json...",
            CommitStage::UpdatingCache => "Updating cache...",
            CommitStage::Complete => "Complete!",
        }
    }
}

/// A successful commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitOutcome {
    pub sha: String,
    pub commit_sha: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(
            SyncError::NotConfigured.category(),
            ErrorCategory::Configuration
        );
        assert_eq!(SyncError::NoWriteAccess.category(), ErrorCategory::Permission);
        assert_eq!(
            SyncError::Remote(RemoteError::Network("down".into())).category(),
            ErrorCategory::Transport
        );
        assert_eq!(
            SyncError::InvalidRemoteDocument("bad".into()).category(),
            ErrorCategory::DataShape
        );
    }

    #[test]
    fn test_remote_error_message_is_verbatim() {
        let err = SyncError::from(RemoteError::Conflict("data/data.json does not match".into()));
        assert_eq!(
            err.to_string(),
            "Remote file changed since it was read: data/data.json does not match"
        );
    }

    #[test]
    fn test_commit_stages_progress_in_order() {
        let stages = [
            CommitStage::Preparing,
            CommitStage::WritingDocument,
            CommitStage::UpdatingCache,
            CommitStage::Complete,
        ];
        let percents: Vec<u8> = stages.iter().map(|s| s.percent()).collect();
        assert_eq!(percents, vec![10, 30, 80, 100]);
    }

    #[test]
    fn test_load_issue_fatality() {
        assert!(!LoadIssue::StaleCache("x".into()).is_fatal());
        assert!(LoadIssue::Failed("x".into()).is_fatal());
    }
}
