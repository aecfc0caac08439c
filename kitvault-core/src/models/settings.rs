use serde::{Deserialize, Serialize};

/// Singleton application settings stored alongside the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub app_name: String,
    pub app_logo: String,
    pub welcome_text: String,
    pub version: String,
}

/// Partial update for the settings record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsUpdate {
    pub app_name: Option<String>,
    pub app_logo: Option<String>,
    pub welcome_text: Option<String>,
    pub version: Option<String>,
}

impl AppSettings {
    pub fn apply(&mut self, update: SettingsUpdate) {
        if let Some(app_name) = update.app_name {
            self.app_name = app_name;
        }
        if let Some(app_logo) = update.app_logo {
            self.app_logo = app_logo;
        }
        if let Some(welcome_text) = update.welcome_text {
            self.welcome_text = welcome_text;
        }
        if let Some(version) = update.version {
            self.version = version;
        }
    }
}

impl SettingsUpdate {
    pub fn is_empty(&self) -> bool {
        self.app_name.is_none()
            && self.app_logo.is_none()
            && self.welcome_text.is_none()
            && self.version.is_none()
    }
}
