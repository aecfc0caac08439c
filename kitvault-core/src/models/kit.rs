use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::kit_type::KitType;

/// A downloadable kit asset belonging to exactly one club.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kit {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kit_type: KitType,
    pub image: String,
    pub link: String,
    pub club_id: String,
    #[serde(with = "super::timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewKit {
    pub name: String,
    pub kit_type: KitType,
    pub image: String,
    pub link: String,
    pub club_id: String,
}

/// Partial update for a kit. Only `Some` fields are merged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KitUpdate {
    pub name: Option<String>,
    pub kit_type: Option<KitType>,
    pub image: Option<String>,
    pub link: Option<String>,
    pub club_id: Option<String>,
}

impl Kit {
    pub fn new(id: impl Into<String>, fields: NewKit, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: fields.name,
            kit_type: fields.kit_type,
            image: fields.image,
            link: fields.link,
            club_id: fields.club_id,
            created_at,
        }
    }

    pub fn apply(&mut self, update: KitUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(kit_type) = update.kit_type {
            self.kit_type = kit_type;
        }
        if let Some(image) = update.image {
            self.image = image;
        }
        if let Some(link) = update.link {
            self.link = link;
        }
        if let Some(club_id) = update.club_id {
            self.club_id = club_id;
        }
    }
}

impl KitUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.kit_type.is_none()
            && self.image.is_none()
            && self.link.is_none()
            && self.club_id.is_none()
    }
}

impl fmt::Display for Kit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", "=".repeat(self.name.len()))?;
        writeln!(f, "ID:       {}", self.id)?;
        writeln!(f, "Type:     {}", self.kit_type)?;
        writeln!(f, "Club:     {}", self.club_id)?;
        if !self.link.is_empty() {
            writeln!(f, "Download: {}", self.link)?;
        }
        if !self.image.is_empty() {
            writeln!(f, "Image:    {}", self.image)?;
        }
        Ok(())
    }
}
