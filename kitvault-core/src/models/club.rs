use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A club belongs to exactly one league.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Club {
    pub id: String,
    pub name: String,
    pub logo: String,
    pub league_id: String,
    #[serde(with = "super::timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewClub {
    pub name: String,
    pub logo: String,
    pub league_id: String,
}

/// Partial update for a club. Only `Some` fields are merged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClubUpdate {
    pub name: Option<String>,
    pub logo: Option<String>,
    pub league_id: Option<String>,
}

impl Club {
    pub fn new(id: impl Into<String>, fields: NewClub, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: fields.name,
            logo: fields.logo,
            league_id: fields.league_id,
            created_at,
        }
    }

    pub fn apply(&mut self, update: ClubUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(logo) = update.logo {
            self.logo = logo;
        }
        if let Some(league_id) = update.league_id {
            self.league_id = league_id;
        }
    }
}

impl ClubUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.logo.is_none() && self.league_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_can_move_club_between_leagues() {
        let mut club = Club::new(
            "arsenal",
            NewClub {
                name: "Arsenal".to_string(),
                logo: String::new(),
                league_id: "premier-league".to_string(),
            },
            Utc::now(),
        );

        club.apply(ClubUpdate {
            league_id: Some("la-liga".to_string()),
            ..Default::default()
        });

        assert_eq!(club.league_id, "la-liga");
        assert_eq!(club.name, "Arsenal");
    }

    #[test]
    fn test_deserialize_original_document_shape() {
        let json = r#"{
            "id": "psg",
            "name": "Paris Saint-Germain",
            "logo": "https://example.com/psg.svg",
            "leagueId": "ligue-1",
            "createdAt": "2024-07-01T10:00:00.000Z"
        }"#;

        let club: Club = serde_json::from_str(json).unwrap();
        assert_eq!(club.league_id, "ligue-1");
    }
}
