use std::collections::HashSet;

use crate::models::Catalog;

/// Ids removed by a delete, grouped by entity kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeReport {
    pub leagues: Vec<String>,
    pub clubs: Vec<String>,
    pub kits: Vec<String>,
}

impl CascadeReport {
    pub fn total(&self) -> usize {
        self.leagues.len() + self.clubs.len() + self.kits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// The root of a delete request.
#[derive(Debug, Clone, Copy)]
pub(crate) enum DeleteRoot<'a> {
    League(&'a str),
    Club(&'a str),
    Kit(&'a str),
}

/// Computes every record that must go when `root` is deleted.
///
/// Dependents are matched by foreign key, so clubs pointing at a league id
/// are removed even when the league record itself is already missing.
pub(crate) fn closure(catalog: &Catalog, root: DeleteRoot<'_>) -> CascadeReport {
    let mut report = CascadeReport::default();

    let club_ids: HashSet<&str> = match root {
        DeleteRoot::League(league_id) => {
            report.leagues = catalog
                .leagues
                .iter()
                .filter(|l| l.id == league_id)
                .map(|l| l.id.clone())
                .collect();
            catalog
                .clubs
                .iter()
                .filter(|c| c.league_id == league_id)
                .map(|c| c.id.as_str())
                .collect()
        }
        DeleteRoot::Club(club_id) => catalog
            .clubs
            .iter()
            .filter(|c| c.id == club_id)
            .map(|c| c.id.as_str())
            .chain(std::iter::once(club_id))
            .collect(),
        DeleteRoot::Kit(kit_id) => {
            report.kits = catalog
                .kits
                .iter()
                .filter(|k| k.id == kit_id)
                .map(|k| k.id.clone())
                .collect();
            return report;
        }
    };

    report.clubs = catalog
        .clubs
        .iter()
        .filter(|c| club_ids.contains(c.id.as_str()))
        .map(|c| c.id.clone())
        .collect();
    report.kits = catalog
        .kits
        .iter()
        .filter(|k| club_ids.contains(k.club_id.as_str()))
        .map(|k| k.id.clone())
        .collect();

    report
}

/// Removes exactly the records named in `report`.
pub(crate) fn apply(catalog: &mut Catalog, report: &CascadeReport) {
    let leagues: HashSet<&str> = report.leagues.iter().map(String::as_str).collect();
    let clubs: HashSet<&str> = report.clubs.iter().map(String::as_str).collect();
    let kits: HashSet<&str> = report.kits.iter().map(String::as_str).collect();

    catalog.leagues.retain(|l| !leagues.contains(l.id.as_str()));
    catalog.clubs.retain(|c| !clubs.contains(c.id.as_str()));
    catalog.kits.retain(|k| !kits.contains(k.id.as_str()));
}
