//! KitVault Core Library
//!
//! Football kit catalog (leagues, clubs, kits) with GitHub-backed sync,
//! local favorites and an admin gate.

pub mod auth;
pub mod favorites;
pub mod models;
pub mod navigation;
pub mod remote;
pub mod seed;
pub mod storage;
pub mod store;
pub mod sync;

pub use auth::{
    AccessGate, AdminGate, AuthError, Authenticator, Session, SharedSecretAuthenticator,
};
pub use favorites::FavoritesStore;
pub use models::{
    AppSettings, Catalog, Club, ClubUpdate, Kit, KitType, KitUpdate, League, LeagueUpdate,
    NewClub, NewKit, NewLeague, SettingsUpdate,
};
pub use navigation::{EntryRequest, NavError, Navigator, Tab, View};
pub use remote::{GitHubClient, GitHubSettings, RemoteError, RemoteStore, RepositoryInfo};
pub use storage::{LocalKind, LocalStorage, StorageError};
pub use store::{CascadeReport, CatalogStore, SearchResults, SnapshotError};
pub use sync::{
    CommitOutcome, CommitStage, DataSource, ErrorCategory, ImageError, ImageFile, LoadIssue,
    LoadReport, SyncAdapter, SyncError, SyncStatus, UploadedImage,
};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
