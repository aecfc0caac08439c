use crate::models::{Catalog, Club, Kit, League};

/// Matches for a free-text query across the whole catalog.
#[derive(Debug, Default)]
pub struct SearchResults<'a> {
    pub leagues: Vec<&'a League>,
    pub clubs: Vec<&'a Club>,
    pub kits: Vec<&'a Kit>,
}

impl SearchResults<'_> {
    pub fn is_empty(&self) -> bool {
        self.leagues.is_empty() && self.clubs.is_empty() && self.kits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.leagues.len() + self.clubs.len() + self.kits.len()
    }
}

/// Case-insensitive substring search over names (and kit type).
pub(crate) fn search<'a>(catalog: &'a Catalog, query: &str) -> SearchResults<'a> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return SearchResults::default();
    }
    let matches = |text: &str| text.to_lowercase().contains(&needle);

    SearchResults {
        leagues: catalog.leagues.iter().filter(|l| matches(&l.name)).collect(),
        clubs: catalog.clubs.iter().filter(|c| matches(&c.name)).collect(),
        kits: catalog
            .kits
            .iter()
            .filter(|k| matches(&k.name) || matches(k.kit_type.as_str()))
            .collect(),
    }
}
