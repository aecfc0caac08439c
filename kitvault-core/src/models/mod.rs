mod catalog;
mod club;
mod kit;
mod kit_type;
mod league;
mod settings;
mod timestamp;

pub use catalog::{Catalog, REQUIRED_SECTIONS};
pub use club::{Club, ClubUpdate, NewClub};
pub use kit::{Kit, KitUpdate, NewKit};
pub use kit_type::KitType;
pub use league::{League, LeagueUpdate, NewLeague};
pub use settings::{AppSettings, SettingsUpdate};
