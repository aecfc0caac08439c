//! Wiring shared by catalog commands: configuration, the loaded store, the
//! sync adapter and the admin gate.

use kitvault_core::{
    AccessGate, AdminGate, AuthError, CatalogStore, FavoritesStore, GitHubClient, LoadReport,
    LocalStorage, SharedSecretAuthenticator, StorageError, SyncAdapter,
};

use crate::config::Config;

pub struct App {
    pub config: Config,
    pub store: CatalogStore,
    pub sync: SyncAdapter<GitHubClient>,
    pub admin: AdminGate,
    pub load: LoadReport,
}

impl App {
    /// Loads the catalog (working copy, remote, cache or seed) and resumes
    /// any admin session.
    pub async fn open(config: Config) -> Self {
        for warning in config.warnings() {
            tracing::warn!("{}", warning);
        }

        let storage = LocalStorage::new(config.data_dir.value.clone());
        let client = GitHubClient::from_settings(&config.github);
        let mut sync = SyncAdapter::new(client, storage.clone());

        let mut store = CatalogStore::seeded();
        let load = sync.open(&mut store).await;
        if let Some(issue) = &load.issue {
            eprintln!("Warning: {}", issue);
        }
        tracing::debug!(source = %load.source, "Catalog ready");

        let admin = AdminGate::new(
            SharedSecretAuthenticator::new(config.admin.password.clone()),
            AccessGate::new(config.admin.access_key.clone()),
            Some(storage),
        );

        Self {
            config,
            store,
            sync,
            admin,
            load,
        }
    }

    pub fn storage(&self) -> &LocalStorage {
        self.sync.storage()
    }

    pub fn favorites(&self) -> FavoritesStore {
        FavoritesStore::open(self.storage().clone())
    }

    pub fn require_admin(&self) -> Result<(), AuthError> {
        self.admin.require().map(|_| ())
    }

    /// Persists pending edits so the next run picks them up.
    pub fn save(&self) -> Result<(), StorageError> {
        if self.store.has_pending_changes() {
            self.sync.save_working_copy(&self.store)?;
            tracing::debug!("Working copy saved");
        }
        Ok(())
    }
}
