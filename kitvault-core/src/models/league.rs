use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Root of the catalog hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct League {
    pub id: String,
    pub name: String,
    pub logo: String,
    pub order: i64,
    #[serde(with = "super::timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Fields supplied by the caller when creating a league.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewLeague {
    pub name: String,
    pub logo: String,
    pub order: i64,
}

/// Partial update for a league. Only `Some` fields are merged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeagueUpdate {
    pub name: Option<String>,
    pub logo: Option<String>,
    pub order: Option<i64>,
}

impl League {
    pub fn new(id: impl Into<String>, fields: NewLeague, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: fields.name,
            logo: fields.logo,
            order: fields.order,
            created_at,
        }
    }

    pub fn apply(&mut self, update: LeagueUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(logo) = update.logo {
            self.logo = logo;
        }
        if let Some(order) = update.order {
            self.order = order;
        }
    }
}

impl LeagueUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.logo.is_none() && self.order.is_none()
    }
}

impl fmt::Display for League {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", "=".repeat(self.name.len()))?;
        writeln!(f, "ID:    {}", self.id)?;
        writeln!(f, "Order: {}", self.order)?;
        if !self.logo.is_empty() {
            writeln!(f, "Logo:  {}", self.logo)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> League {
        League::new(
            "premier-league",
            NewLeague {
                name: "Premier League".to_string(),
                logo: "https://example.com/pl.svg".to_string(),
                order: 1,
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_apply_merges_only_provided_fields() {
        let mut league = sample();
        league.apply(LeagueUpdate {
            order: Some(7),
            ..Default::default()
        });

        assert_eq!(league.order, 7);
        assert_eq!(league.name, "Premier League");
        assert_eq!(league.logo, "https://example.com/pl.svg");
    }

    #[test]
    fn test_json_uses_camel_case_keys() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn test_display() {
        let output = format!("{}", sample());
        assert!(output.contains("Premier League"));
        assert!(output.contains("Order: 1"));
    }
}
