//! In-memory remote store for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use sha2::{Digest, Sha256};

use super::{Permissions, RemoteError, RemoteFile, RemoteStore, WriteReceipt};

#[derive(Debug, Default)]
struct State {
    files: HashMap<String, RemoteFile>,
    can_write: bool,
    fail_status: Option<u16>,
    fail_writes: bool,
    fail_permissions: bool,
    edit_after_next_read: Option<Vec<u8>>,
    reads: usize,
    writes: usize,
    commits: usize,
}

#[derive(Debug, Default)]
pub struct MemoryRemote {
    state: Mutex<State>,
}

pub fn content_sha(content: &[u8]) -> String {
    let digest = Sha256::digest(content);
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

impl MemoryRemote {
    /// A writable, empty remote.
    pub fn new() -> Self {
        let remote = Self::default();
        remote.set_can_write(true);
        remote
    }

    pub fn with_file(self, path: &str, content: &[u8]) -> Self {
        self.put(path, content);
        self
    }

    pub fn put(&self, path: &str, content: &[u8]) {
        let mut state = self.state.lock().unwrap();
        state.files.insert(
            path.to_string(),
            RemoteFile {
                content: content.to_vec(),
                sha: content_sha(content),
            },
        );
    }

    pub fn file(&self, path: &str) -> Option<RemoteFile> {
        self.state.lock().unwrap().files.get(path).cloned()
    }

    pub fn set_can_write(&self, can_write: bool) {
        self.state.lock().unwrap().can_write = can_write;
    }

    /// Every request fails with the given status.
    pub fn fail_with_status(&self, status: u16) {
        self.state.lock().unwrap().fail_status = Some(status);
    }

    pub fn fail_writes(&self) {
        self.state.lock().unwrap().fail_writes = true;
    }

    pub fn fail_permissions(&self) {
        self.state.lock().unwrap().fail_permissions = true;
    }

    /// Replaces the content of the read file right after the next read,
    /// as if another writer committed in between.
    pub fn edit_after_next_read(&self, content: &[u8]) {
        self.state.lock().unwrap().edit_after_next_read = Some(content.to_vec());
    }

    pub fn reads(&self) -> usize {
        self.state.lock().unwrap().reads
    }

    pub fn writes(&self) -> usize {
        self.state.lock().unwrap().writes
    }

    fn check_failure(state: &State) -> Result<(), RemoteError> {
        match state.fail_status {
            Some(status) => Err(RemoteError::Api {
                status,
                message: "Server Error".to_string(),
            }),
            None => Ok(()),
        }
    }
}

impl RemoteStore for MemoryRemote {
    async fn read(&self, path: &str) -> Result<Option<RemoteFile>, RemoteError> {
        let mut state = self.state.lock().unwrap();
        Self::check_failure(&state)?;
        state.reads += 1;

        let file = state.files.get(path).cloned();
        if let Some(edit) = state.edit_after_next_read.take() {
            let sha = content_sha(&edit);
            state.files.insert(path.to_string(), RemoteFile { content: edit, sha });
        }
        Ok(file)
    }

    async fn write(
        &self,
        path: &str,
        content: &[u8],
        _message: &str,
        expected_sha: Option<&str>,
    ) -> Result<WriteReceipt, RemoteError> {
        let mut state = self.state.lock().unwrap();
        Self::check_failure(&state)?;
        if state.fail_writes {
            return Err(RemoteError::Network("connection reset".to_string()));
        }
        if !state.can_write {
            return Err(RemoteError::Api {
                status: 403,
                message: "Resource not accessible".to_string(),
            });
        }

        let current = state.files.get(path).map(|f| f.sha.clone());
        match (expected_sha, current.as_deref()) {
            (Some(expected), Some(actual)) if expected != actual => {
                return Err(RemoteError::Conflict(format!(
                    "{} does not match {}",
                    path, expected
                )))
            }
            (Some(_), None) | (None, Some(_)) => {
                return Err(RemoteError::Conflict(format!("{} sha mismatch", path)))
            }
            _ => {}
        }

        let sha = content_sha(content);
        state.files.insert(
            path.to_string(),
            RemoteFile {
                content: content.to_vec(),
                sha: sha.clone(),
            },
        );
        state.writes += 1;
        state.commits += 1;
        Ok(WriteReceipt {
            sha,
            commit_sha: Some(format!("commit-{}", state.commits)),
        })
    }

    async fn delete(&self, path: &str, sha: &str, _message: &str) -> Result<(), RemoteError> {
        let mut state = self.state.lock().unwrap();
        Self::check_failure(&state)?;
        match state.files.get(path) {
            None => Err(RemoteError::Api {
                status: 404,
                message: "Not Found".to_string(),
            }),
            Some(file) if file.sha != sha => {
                Err(RemoteError::Conflict(format!("{} does not match {}", path, sha)))
            }
            Some(_) => {
                state.files.remove(path);
                state.commits += 1;
                Ok(())
            }
        }
    }

    async fn permissions(&self) -> Result<Permissions, RemoteError> {
        let state = self.state.lock().unwrap();
        Self::check_failure(&state)?;
        if state.fail_permissions {
            return Err(RemoteError::Network("timed out".to_string()));
        }
        Ok(Permissions {
            can_write: state.can_write,
        })
    }

    fn public_url(&self, path: &str) -> String {
        format!("https://raw.example.test/main/{}", path)
    }
}
