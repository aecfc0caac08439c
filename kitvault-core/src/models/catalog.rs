use serde::{Deserialize, Serialize};

use super::{AppSettings, Club, Kit, League};

/// Top-level sections every catalog document must carry.
pub const REQUIRED_SECTIONS: [&str; 4] = ["leagues", "clubs", "kits", "settings"];

/// The aggregate root persisted as a single JSON document.
///
/// Field order matches the remote document so exports produce stable diffs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub leagues: Vec<League>,
    pub clubs: Vec<Club>,
    pub kits: Vec<Kit>,
    pub settings: AppSettings,
}

impl Catalog {
    /// Serialize with 2-space indentation.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn counts(&self) -> (usize, usize, usize) {
        (self.leagues.len(), self.clubs.len(), self.kits.len())
    }
}
