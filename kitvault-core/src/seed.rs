//! Bundled seed catalog used when neither the remote document nor a local
//! cache is available.

use crate::models::Catalog;

const SEED_JSON: &str = include_str!("../data/seed.json");

/// Returns a fresh copy of the bundled seed catalog.
pub fn seed_catalog() -> Catalog {
    serde_json::from_str(SEED_JSON).expect("bundled seed.json must match the catalog shape")
}
