use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of asset a kit entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum KitType {
    #[default]
    Home,
    Away,
    Third,
    #[serde(rename = "GK")]
    Goalkeeper,
    Logo,
}

impl KitType {
    /// All kit types in display order.
    pub const ALL: [KitType; 5] = [
        KitType::Home,
        KitType::Away,
        KitType::Third,
        KitType::Goalkeeper,
        KitType::Logo,
    ];

    /// Position of this type in the fixed display ordering.
    pub fn rank(self) -> usize {
        match self {
            KitType::Home => 0,
            KitType::Away => 1,
            KitType::Third => 2,
            KitType::Goalkeeper => 3,
            KitType::Logo => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            KitType::Home => "Home",
            KitType::Away => "Away",
            KitType::Third => "Third",
            KitType::Goalkeeper => "GK",
            KitType::Logo => "Logo",
        }
    }
}

impl fmt::Display for KitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for KitType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "home" => Ok(KitType::Home),
            "away" => Ok(KitType::Away),
            "third" => Ok(KitType::Third),
            "gk" | "goalkeeper" => Ok(KitType::Goalkeeper),
            "logo" => Ok(KitType::Logo),
            _ => Err(format!(
                "Invalid kit type '{}'. Valid options: home, away, third, gk, logo",
                s
            )),
        }
    }
}
