//! Favorite kits.
//!
//! A set of kit ids kept in insertion order and written to local storage
//! after every change. Never part of the remote catalog document.

use crate::models::Kit;
use crate::storage::{LocalKind, LocalStorage};

#[derive(Debug)]
pub struct FavoritesStore {
    ids: Vec<String>,
    storage: Option<LocalStorage>,
}

impl FavoritesStore {
    /// An unpersisted, empty favorites set.
    pub fn in_memory() -> Self {
        Self {
            ids: Vec::new(),
            storage: None,
        }
    }

    /// Loads favorites from local storage. A missing or unreadable file
    /// yields an empty set.
    pub fn open(storage: LocalStorage) -> Self {
        let ids: Vec<String> = storage
            .load_lenient(LocalKind::Favorites)
            .unwrap_or_default();
        let mut store = Self {
            ids: Vec::with_capacity(ids.len()),
            storage: Some(storage),
        };
        for id in ids {
            if !store.ids.contains(&id) {
                store.ids.push(id);
            }
        }
        store
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, kit_id: &str) -> bool {
        self.ids.iter().any(|id| id == kit_id)
    }

    /// Adds `kit_id`. Adding an id that is already present is a no-op.
    pub fn add(&mut self, kit_id: &str) {
        if self.contains(kit_id) {
            return;
        }
        self.ids.push(kit_id.to_string());
        self.persist();
    }

    /// Removes `kit_id`. Removing an absent id is a no-op.
    pub fn remove(&mut self, kit_id: &str) {
        let before = self.ids.len();
        self.ids.retain(|id| id != kit_id);
        if self.ids.len() != before {
            self.persist();
        }
    }

    /// Flips membership of `kit_id`. Returns true if it is now a favorite.
    pub fn toggle(&mut self, kit_id: &str) -> bool {
        if self.contains(kit_id) {
            self.remove(kit_id);
            false
        } else {
            self.add(kit_id);
            true
        }
    }

    /// The subset of `kits` that are favorites, in the order given.
    pub fn resolve<'a>(&self, kits: &'a [Kit]) -> Vec<&'a Kit> {
        kits.iter().filter(|k| self.contains(&k.id)).collect()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.persist();
    }

    fn persist(&self) {
        let Some(storage) = &self.storage else {
            return;
        };
        if let Err(e) = storage.save(LocalKind::Favorites, &self.ids) {
            tracing::warn!("Failed to save favorites: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::seed_catalog;
    use tempfile::TempDir;

    #[test]
    fn test_add_is_idempotent() {
        let mut favorites = FavoritesStore::in_memory();
        favorites.add("psg-home-24");
        favorites.add("psg-home-24");
        assert_eq!(favorites.ids(), &["psg-home-24".to_string()]);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut favorites = FavoritesStore::in_memory();
        favorites.add("a");
        favorites.remove("b");
        assert_eq!(favorites.len(), 1);
    }

    #[test]
    fn test_toggle_twice_restores_membership() {
        let mut favorites = FavoritesStore::in_memory();
        favorites.add("kept");

        assert!(favorites.toggle("new"));
        assert!(!favorites.toggle("new"));
        assert!(!favorites.contains("new"));

        assert!(!favorites.toggle("kept"));
        assert!(favorites.toggle("kept"));
        assert!(favorites.contains("kept"));
    }

    #[test]
    fn test_resolve_returns_member_kits() {
        let catalog = seed_catalog();
        let mut favorites = FavoritesStore::in_memory();
        favorites.add("bayern-home-24");
        favorites.add("deleted-kit");

        let kits = favorites.resolve(&catalog.kits);
        assert_eq!(kits.len(), 1);
        assert_eq!(kits[0].id, "bayern-home-24");
    }

    #[test]
    fn test_changes_are_persisted_immediately() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_path_buf());

        let mut favorites = FavoritesStore::open(storage.clone());
        favorites.add("one");
        favorites.add("two");
        favorites.remove("one");

        let reopened = FavoritesStore::open(storage.clone());
        assert_eq!(reopened.ids(), &["two".to_string()]);

        let mut reopened = reopened;
        reopened.clear();
        assert!(FavoritesStore::open(storage).is_empty());
    }

    #[test]
    fn test_corrupt_file_degrades_to_empty() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_path_buf());
        std::fs::write(storage.path(LocalKind::Favorites), "{{{").unwrap();

        let favorites = FavoritesStore::open(storage);
        assert!(favorites.is_empty());
    }
}
