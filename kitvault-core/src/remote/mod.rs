//! Remote content store abstraction.
//!
//! The catalog is persisted as a file in a version-controlled repository.
//! Every stored file carries a content hash; writes may name the hash they
//! expect to replace, which turns the write into a compare-and-swap.

mod github;
#[cfg(test)]
pub(crate) mod memory;

pub use github::{GitHubClient, GitHubSettings, RepositoryInfo, DEFAULT_API_URL, DEFAULT_BRANCH};

use thiserror::Error;

/// A file as stored remotely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    pub content: Vec<u8>,
    /// Content hash identifying this version of the file.
    pub sha: String,
}

/// Result of a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReceipt {
    /// Content hash of the newly written file.
    pub sha: String,
    /// Identifier of the commit that recorded the write, when the store has one.
    pub commit_sha: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Permissions {
    pub can_write: bool,
}

/// Errors returned by a remote store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteError {
    /// The request never produced a response.
    #[error("Network error: {0}")]
    Network(String),

    /// The store answered with an error status.
    #[error("{message} (status {status})")]
    Api { status: u16, message: String },

    /// The expected content hash no longer matches the stored file.
    #[error("Remote file changed since it was read: {0}")]
    Conflict(String),

    /// The store answered with something that could not be decoded.
    #[error("Unexpected response from remote: {0}")]
    InvalidResponse(String),
}

/// Content-addressed file store backing the catalog.
#[allow(async_fn_in_trait)]
pub trait RemoteStore {
    /// Reads a file. Returns `Ok(None)` when the path does not exist.
    async fn read(&self, path: &str) -> Result<Option<RemoteFile>, RemoteError>;

    /// Creates or replaces a file.
    ///
    /// When `expected_sha` is given the write fails with
    /// [`RemoteError::Conflict`] unless it matches the stored hash.
    async fn write(
        &self,
        path: &str,
        content: &[u8],
        message: &str,
        expected_sha: Option<&str>,
    ) -> Result<WriteReceipt, RemoteError>;

    /// Deletes a file at the given content hash.
    async fn delete(&self, path: &str, sha: &str, message: &str) -> Result<(), RemoteError>;

    /// Access rights of the configured credential.
    async fn permissions(&self) -> Result<Permissions, RemoteError>;

    /// Publicly resolvable URL for a stored path.
    fn public_url(&self, path: &str) -> String;
}
