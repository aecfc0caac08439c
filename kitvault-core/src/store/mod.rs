//! In-memory catalog store.
//!
//! Holds the [`Catalog`] aggregate and exposes typed CRUD operations. Deletes
//! compute the full set of dependent records before mutating anything, so a
//! cascade is never partial. Every mutation that changes data raises the
//! pending-changes flag, which the sync adapter clears after a commit.

mod cascade;
mod ids;
mod search;
mod snapshot;

pub use cascade::CascadeReport;
pub use ids::IdGenerator;
pub use search::SearchResults;
pub use snapshot::{parse_snapshot, SnapshotError};

use std::cmp::Ordering;

use cascade::DeleteRoot;

use crate::models::{
    AppSettings, Catalog, Club, ClubUpdate, Kit, KitUpdate, League, LeagueUpdate, NewClub, NewKit,
    NewLeague, SettingsUpdate,
};
use crate::seed::seed_catalog;

/// Shown in place of a league name when a club points at a missing league.
pub const UNKNOWN_LEAGUE: &str = "Unknown League";
/// Shown in place of a club name when a kit points at a missing club.
pub const UNKNOWN_CLUB: &str = "Unknown Club";

#[derive(Debug, Clone)]
pub struct CatalogStore {
    catalog: Catalog,
    pending_changes: bool,
    ids: IdGenerator,
}

impl CatalogStore {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            pending_changes: false,
            ids: IdGenerator::new(),
        }
    }

    /// A store populated from the bundled seed catalog.
    pub fn seeded() -> Self {
        Self::new(seed_catalog())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn leagues(&self) -> &[League] {
        &self.catalog.leagues
    }

    pub fn clubs(&self) -> &[Club] {
        &self.catalog.clubs
    }

    pub fn kits(&self) -> &[Kit] {
        &self.catalog.kits
    }

    pub fn settings(&self) -> &AppSettings {
        &self.catalog.settings
    }

    /// True when the store holds edits not yet committed to the remote.
    pub fn has_pending_changes(&self) -> bool {
        self.pending_changes
    }

    pub fn mark_clean(&mut self) {
        self.pending_changes = false;
    }

    /// Replaces the whole catalog without raising the pending-changes flag.
    ///
    /// Used by the load path; user-facing replacement goes through
    /// [`CatalogStore::import_snapshot`].
    pub fn replace(&mut self, catalog: Catalog) {
        self.catalog = catalog;
        self.pending_changes = false;
    }

    /// Restores a catalog together with its pending-changes flag.
    pub fn restore(&mut self, catalog: Catalog, pending_changes: bool) {
        self.catalog = catalog;
        self.pending_changes = pending_changes;
    }

    // ==================== Leagues ====================

    pub fn add_league(&mut self, fields: NewLeague) -> League {
        let (id, created_at) = self.ids.next("league");
        let league = League::new(id, fields, created_at);
        self.catalog.leagues.push(league.clone());
        self.pending_changes = true;
        league
    }

    /// Merges `update` into the league with `id`. Returns false if absent.
    pub fn update_league(&mut self, id: &str, update: LeagueUpdate) -> bool {
        match self.catalog.leagues.iter_mut().find(|l| l.id == id) {
            Some(league) => {
                league.apply(update);
                self.pending_changes = true;
                true
            }
            None => false,
        }
    }

    /// Deletes a league with its clubs and their kits.
    pub fn delete_league(&mut self, id: &str) -> CascadeReport {
        self.delete(DeleteRoot::League(id))
    }

    pub fn get_league(&self, id: &str) -> Option<&League> {
        self.catalog.leagues.iter().find(|l| l.id == id)
    }

    // ==================== Clubs ====================

    pub fn add_club(&mut self, fields: NewClub) -> Club {
        let (id, created_at) = self.ids.next("club");
        let club = Club::new(id, fields, created_at);
        self.catalog.clubs.push(club.clone());
        self.pending_changes = true;
        club
    }

    pub fn update_club(&mut self, id: &str, update: ClubUpdate) -> bool {
        match self.catalog.clubs.iter_mut().find(|c| c.id == id) {
            Some(club) => {
                club.apply(update);
                self.pending_changes = true;
                true
            }
            None => false,
        }
    }

    /// Deletes a club with its kits.
    pub fn delete_club(&mut self, id: &str) -> CascadeReport {
        self.delete(DeleteRoot::Club(id))
    }

    pub fn get_club(&self, id: &str) -> Option<&Club> {
        self.catalog.clubs.iter().find(|c| c.id == id)
    }

    /// Clubs whose league foreign key is `league_id`, in insertion order.
    pub fn clubs_by_league(&self, league_id: &str) -> Vec<&Club> {
        self.catalog
            .clubs
            .iter()
            .filter(|c| c.league_id == league_id)
            .collect()
    }

    // ==================== Kits ====================

    pub fn add_kit(&mut self, fields: NewKit) -> Kit {
        let (id, created_at) = self.ids.next("kit");
        let kit = Kit::new(id, fields, created_at);
        self.catalog.kits.push(kit.clone());
        self.pending_changes = true;
        kit
    }

    pub fn update_kit(&mut self, id: &str, update: KitUpdate) -> bool {
        match self.catalog.kits.iter_mut().find(|k| k.id == id) {
            Some(kit) => {
                kit.apply(update);
                self.pending_changes = true;
                true
            }
            None => false,
        }
    }

    pub fn delete_kit(&mut self, id: &str) -> CascadeReport {
        self.delete(DeleteRoot::Kit(id))
    }

    pub fn get_kit(&self, id: &str) -> Option<&Kit> {
        self.catalog.kits.iter().find(|k| k.id == id)
    }

    pub fn kits_by_club(&self, club_id: &str) -> Vec<&Kit> {
        self.catalog
            .kits
            .iter()
            .filter(|k| k.club_id == club_id)
            .collect()
    }

    /// Kits of every club under `league_id`.
    pub fn kits_by_league(&self, league_id: &str) -> Vec<&Kit> {
        let club_ids: Vec<&str> = self
            .clubs_by_league(league_id)
            .into_iter()
            .map(|c| c.id.as_str())
            .collect();
        self.catalog
            .kits
            .iter()
            .filter(|k| club_ids.contains(&k.club_id.as_str()))
            .collect()
    }

    // ==================== Settings ====================

    pub fn update_settings(&mut self, update: SettingsUpdate) {
        if update.is_empty() {
            return;
        }
        self.catalog.settings.apply(update);
        self.pending_changes = true;
    }

    // ==================== Display helpers ====================

    pub fn league_name(&self, id: &str) -> &str {
        self.get_league(id)
            .map(|l| l.name.as_str())
            .unwrap_or(UNKNOWN_LEAGUE)
    }

    pub fn club_name(&self, id: &str) -> &str {
        self.get_club(id)
            .map(|c| c.name.as_str())
            .unwrap_or(UNKNOWN_CLUB)
    }

    /// Leagues by display order, ties broken by name.
    pub fn leagues_sorted(&self) -> Vec<&League> {
        let mut leagues: Vec<&League> = self.catalog.leagues.iter().collect();
        leagues.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));
        leagues
    }

    /// Sorts clubs alphabetically, ignoring case.
    pub fn sort_clubs(clubs: &mut [&Club]) {
        clubs.sort_by(|a, b| compare_names(&a.name, &b.name));
    }

    /// Sorts kits by type rank (Home, Away, Third, GK, Logo), then name.
    pub fn sort_kits(kits: &mut [&Kit]) {
        kits.sort_by(|a, b| {
            a.kit_type
                .rank()
                .cmp(&b.kit_type.rank())
                .then_with(|| compare_names(&a.name, &b.name))
        });
    }

    pub fn search(&self, query: &str) -> SearchResults<'_> {
        search::search(&self.catalog, query)
    }

    // ==================== Snapshots ====================

    /// Full catalog as pretty-printed JSON.
    pub fn export_snapshot(&self) -> Result<String, serde_json::Error> {
        self.catalog.to_pretty_json()
    }

    /// Replaces the catalog with a parsed snapshot. On error the store is
    /// left untouched.
    pub fn try_import_snapshot(&mut self, json: &str) -> Result<(), SnapshotError> {
        let catalog = parse_snapshot(json)?;
        self.catalog = catalog;
        self.pending_changes = true;
        Ok(())
    }

    pub fn import_snapshot(&mut self, json: &str) -> bool {
        match self.try_import_snapshot(json) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Rejected catalog import: {}", e);
                false
            }
        }
    }

    fn delete(&mut self, root: DeleteRoot<'_>) -> CascadeReport {
        let report = cascade::closure(&self.catalog, root);
        if !report.is_empty() {
            cascade::apply(&mut self.catalog, &report);
            self.pending_changes = true;
            tracing::debug!(
                leagues = report.leagues.len(),
                clubs = report.clubs.len(),
                kits = report.kits.len(),
                "Cascade delete applied"
            );
        }
        report
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::seeded()
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
