use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    CommitOutcome, CommitStage, DataSource, LoadIssue, LoadReport, SyncError, DATA_PATH,
    DEFAULT_COMMIT_MESSAGE,
};
use crate::models::Catalog;
use crate::remote::{GitHubClient, RemoteError, RemoteStore, RepositoryInfo};
use crate::seed::seed_catalog;
use crate::storage::{LocalKind, LocalStorage, StorageError};
use crate::store::{parse_snapshot, CatalogStore};

/// Last successfully fetched remote catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedSnapshot {
    pub fetched_at: DateTime<Utc>,
    pub catalog: Catalog,
}

/// Local edits carried between runs until they are committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkingCopy {
    pub saved_at: DateTime<Utc>,
    pub pending_changes: bool,
    pub catalog: Catalog,
}

/// Snapshot of the adapter's state for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncStatus {
    pub configured: bool,
    /// `None` until write access has been probed.
    pub can_write: Option<bool>,
    pub source: Option<DataSource>,
    pub issue: Option<LoadIssue>,
    pub cached_at: Option<DateTime<Utc>>,
    pub pending_changes: bool,
}

/// Persistence adapter between a [`CatalogStore`] and a [`RemoteStore`].
///
/// A `None` remote means sync is not configured and the adapter only ever
/// serves seed data.
#[derive(Debug)]
pub struct SyncAdapter<R> {
    remote: Option<R>,
    storage: LocalStorage,
    can_write: Option<bool>,
    last_load: Option<LoadReport>,
}

impl<R: RemoteStore> SyncAdapter<R> {
    pub fn new(remote: Option<R>, storage: LocalStorage) -> Self {
        Self {
            remote,
            storage,
            can_write: None,
            last_load: None,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.remote.is_some()
    }

    pub fn remote(&self) -> Option<&R> {
        self.remote.as_ref()
    }

    pub fn storage(&self) -> &LocalStorage {
        &self.storage
    }

    pub fn can_write(&self) -> Option<bool> {
        self.can_write
    }

    pub fn last_load(&self) -> Option<&LoadReport> {
        self.last_load.as_ref()
    }

    /// Populates `store` from the working copy when one exists, otherwise
    /// runs the load protocol.
    pub async fn open(&mut self, store: &mut CatalogStore) -> LoadReport {
        if self.restore_working_copy(store) {
            let report = LoadReport::clean(DataSource::Working);
            self.last_load = Some(report.clone());
            return report;
        }
        self.load(store).await
    }

    /// Loads the catalog: remote, then local cache, then seed data.
    ///
    /// Never fails; degraded outcomes are reported through
    /// [`LoadReport::issue`].
    pub async fn load(&mut self, store: &mut CatalogStore) -> LoadReport {
        let fetched = match &self.remote {
            Some(remote) => Some(fetch_catalog(remote).await),
            None => None,
        };

        let report = match fetched {
            None => {
                tracing::warn!("GitHub not configured, using seed data");
                store.replace(seed_catalog());
                self.can_write = Some(false);
                LoadReport::clean(DataSource::Seed)
            }
            Some(Ok(catalog)) => {
                tracing::info!(
                    leagues = catalog.leagues.len(),
                    clubs = catalog.clubs.len(),
                    kits = catalog.kits.len(),
                    "Loaded catalog from GitHub"
                );
                self.save_cache(&catalog);
                store.replace(catalog);
                self.probe_write_access().await;
                LoadReport::clean(DataSource::Remote)
            }
            Some(Err(e)) => {
                self.can_write = Some(false);
                self.fall_back(store, &e)
            }
        };

        self.last_load = Some(report.clone());
        report
    }

    /// Drops the cache and the working copy, then reloads.
    pub async fn refresh(&mut self, store: &mut CatalogStore) -> LoadReport {
        for kind in [LocalKind::Cache, LocalKind::Working] {
            if let Err(e) = self.storage.remove(kind) {
                tracing::warn!("Failed to clear {}: {}", kind.filename(), e);
            }
        }
        self.load(store).await
    }

    /// Asks the remote whether the credential may write. Probe failures
    /// count as no access.
    pub async fn probe_write_access(&mut self) -> bool {
        let can_write = match &self.remote {
            None => false,
            Some(remote) => match remote.permissions().await {
                Ok(permissions) => permissions.can_write,
                Err(e) => {
                    tracing::warn!("Failed to check write access: {}", e);
                    false
                }
            },
        };
        self.can_write = Some(can_write);
        can_write
    }

    /// Writes the whole catalog to the remote document.
    ///
    /// The write is conditioned on the content hash read just before it, so
    /// a concurrent remote edit fails the commit with
    /// [`RemoteError::Conflict`]. On any failure `store` is left as it was,
    /// pending-changes flag included.
    pub async fn commit<F>(
        &mut self,
        store: &mut CatalogStore,
        message: Option<&str>,
        mut progress: F,
    ) -> Result<CommitOutcome, SyncError>
    where
        F: FnMut(CommitStage),
    {
        if self.remote.is_none() {
            return Err(SyncError::NotConfigured);
        }
        let can_write = match self.can_write {
            Some(can_write) => can_write,
            None => self.probe_write_access().await,
        };
        if !can_write {
            return Err(SyncError::NoWriteAccess);
        }
        let remote = self.remote.as_ref().ok_or(SyncError::NotConfigured)?;

        progress(CommitStage::Preparing);
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(DEFAULT_COMMIT_MESSAGE);
        let json = store
            .export_snapshot()
            .map_err(|e| SyncError::InvalidRemoteDocument(e.to_string()))?;

        progress(CommitStage::WritingDocument);
        let current = remote.read(DATA_PATH).await?;
        let expected_sha = current.as_ref().map(|f| f.sha.as_str());
        tracing::debug!(?expected_sha, "Writing {}", DATA_PATH);
        let receipt = remote
            .write(DATA_PATH, json.as_bytes(), message, expected_sha)
            .await?;

        progress(CommitStage::UpdatingCache);
        self.save_cache(store.catalog());
        store.mark_clean();
        if let Err(e) = self.storage.remove(LocalKind::Working) {
            tracing::warn!("Failed to clear working copy: {}", e);
        }

        progress(CommitStage::Complete);
        tracing::info!(sha = %receipt.sha, "Committed catalog");
        Ok(CommitOutcome {
            sha: receipt.sha,
            commit_sha: receipt.commit_sha,
        })
    }

    pub fn status(&self, store: &CatalogStore) -> SyncStatus {
        SyncStatus {
            configured: self.is_configured(),
            can_write: self.can_write,
            source: self.last_load.as_ref().map(|r| r.source),
            issue: self.last_load.as_ref().and_then(|r| r.issue.clone()),
            cached_at: self.cached_at(),
            pending_changes: store.has_pending_changes(),
        }
    }

    pub fn cached_at(&self) -> Option<DateTime<Utc>> {
        self.storage
            .load_lenient::<CachedSnapshot>(LocalKind::Cache)
            .map(|c| c.fetched_at)
    }

    // ==================== Working copy ====================

    /// Persists the store's catalog and pending flag for the next run.
    pub fn save_working_copy(&self, store: &CatalogStore) -> Result<(), StorageError> {
        let working = WorkingCopy {
            saved_at: Utc::now(),
            pending_changes: store.has_pending_changes(),
            catalog: store.catalog().clone(),
        };
        self.storage.save(LocalKind::Working, &working)
    }

    /// Restores the working copy into `store`. Returns false when there is
    /// none or it cannot be read.
    pub fn restore_working_copy(&self, store: &mut CatalogStore) -> bool {
        match self.storage.load_lenient::<WorkingCopy>(LocalKind::Working) {
            Some(working) => {
                tracing::debug!(saved_at = %working.saved_at, "Restoring working copy");
                store.restore(working.catalog, working.pending_changes);
                true
            }
            None => false,
        }
    }

    pub fn discard_working_copy(&self) -> Result<(), StorageError> {
        self.storage.remove(LocalKind::Working)
    }

    fn save_cache(&self, catalog: &Catalog) {
        let cached = CachedSnapshot {
            fetched_at: Utc::now(),
            catalog: catalog.clone(),
        };
        if let Err(e) = self.storage.save(LocalKind::Cache, &cached) {
            tracing::warn!("Failed to update cache: {}", e);
        }
    }

    fn fall_back(&self, store: &mut CatalogStore, error: &SyncError) -> LoadReport {
        tracing::warn!("Failed to load from GitHub: {}", error);

        match self.storage.load::<CachedSnapshot>(LocalKind::Cache) {
            Ok(Some(cached)) => {
                tracing::warn!(fetched_at = %cached.fetched_at, "Using cached catalog");
                store.replace(cached.catalog);
                LoadReport {
                    source: DataSource::Cache,
                    issue: Some(LoadIssue::StaleCache(format!(
                        "Using cached data. GitHub sync failed: {}",
                        error
                    ))),
                }
            }
            Ok(None) => {
                store.replace(seed_catalog());
                LoadReport {
                    source: DataSource::Seed,
                    issue: Some(LoadIssue::Failed(format!(
                        "Failed to load data from GitHub: {}",
                        error
                    ))),
                }
            }
            Err(e) => {
                tracing::warn!("Ignoring unreadable cache: {}", e);
                store.replace(seed_catalog());
                LoadReport {
                    source: DataSource::Seed,
                    issue: Some(LoadIssue::Failed(
                        "Failed to load data from GitHub and cache is invalid".to_string(),
                    )),
                }
            }
        }
    }
}

impl SyncAdapter<GitHubClient> {
    pub async fn repository_info(&self) -> Result<RepositoryInfo, SyncError> {
        let client = self.remote.as_ref().ok_or(SyncError::NotConfigured)?;
        Ok(client.repository_info().await?)
    }
}

async fn fetch_catalog<R: RemoteStore>(remote: &R) -> Result<Catalog, SyncError> {
    let file = remote.read(DATA_PATH).await?.ok_or_else(|| {
        SyncError::Remote(RemoteError::Api {
            status: 404,
            message: format!("{} not found in repository", DATA_PATH),
        })
    })?;

    let text = String::from_utf8(file.content)
        .map_err(|_| SyncError::InvalidRemoteDocument(format!("{} is not UTF-8", DATA_PATH)))?;
    parse_snapshot(&text).map_err(|e| SyncError::InvalidRemoteDocument(e.to_string()))
}
