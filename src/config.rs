use kitvault_core::GitHubSettings;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Admin gate secrets
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AdminConfig {
    /// Access key that unlocks the admin entry point
    pub access_key: Option<String>,
    /// Password exchanged for an admin session
    pub password: Option<String>,
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Directory for cache, working copy, favorites and admin session
    pub data_dir: ConfigValue<PathBuf>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
    /// GitHub repository holding the catalog
    pub github: GitHubSettings,
    pub admin: AdminConfig,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    github: Option<GitHubSettings>,
    admin: Option<AdminConfig>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::load_with_env(config_path, |name| std::env::var(name).ok())
    }

    /// Like [`Config::load`], reading environment variables through `env`.
    pub fn load_with_env<F>(config_path: Option<PathBuf>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Start with defaults
        let mut data_dir = ConfigValue::new(Self::default_data_dir(), ConfigSource::Default);
        let mut config_file = None;
        let mut github = GitHubSettings::default();
        let mut admin = AdminConfig::default();

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(dir) = file_config.data_dir {
                // Resolve relative paths against config file's directory
                let resolved = if dir.is_relative() {
                    path.parent().map(|p| p.join(&dir)).unwrap_or(dir)
                } else {
                    dir
                };
                data_dir = ConfigValue::new(resolved, ConfigSource::File);
            }
            if let Some(github_config) = file_config.github {
                github = github_config;
            }
            if let Some(admin_config) = file_config.admin {
                admin = admin_config;
            }
        }

        // Apply environment variable overrides
        if let Some(dir) = env("KITVAULT_DATA_DIR") {
            data_dir = ConfigValue::new(PathBuf::from(dir), ConfigSource::Environment);
        }
        let overrides = [
            ("KITVAULT_GITHUB_TOKEN", &mut github.token),
            ("KITVAULT_GITHUB_OWNER", &mut github.owner),
            ("KITVAULT_GITHUB_REPO", &mut github.repo),
            ("KITVAULT_GITHUB_BRANCH", &mut github.branch),
            ("KITVAULT_ADMIN_KEY", &mut admin.access_key),
            ("KITVAULT_ADMIN_PASSWORD", &mut admin.password),
        ];
        for (name, slot) in overrides {
            if let Some(value) = env(name) {
                *slot = Some(value);
            }
        }

        Ok(Self {
            data_dir,
            config_file,
            github,
            admin,
        })
    }

    /// Non-fatal configuration problems.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = self.github.warnings();
        if self.admin.password.as_deref().map_or(true, str::is_empty) {
            warnings.push("Admin password not set; admin commands are unavailable".to_string());
        }
        warnings
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/kitvault/
    /// - macOS: ~/Library/Application Support/kitvault/
    /// - Windows: %APPDATA%/kitvault/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("kitvault")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/kitvault/
    /// - macOS: ~/Library/Application Support/kitvault/
    /// - Windows: %APPDATA%/kitvault/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("kitvault")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::tempdir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_config() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nonexistent.yaml");

        let config = Config::load_with_env(Some(config_path), no_env).unwrap();
        assert!(config.data_dir.value.ends_with("kitvault"));
        assert_eq!(config.data_dir.source, ConfigSource::Default);
        assert!(config.config_file.is_none());
        assert!(!config.github.is_configured());
        assert_eq!(config.github.branch(), "main");
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "data_dir: state").unwrap();
        writeln!(file, "github:").unwrap();
        writeln!(file, "  token: ghp_abc").unwrap();
        writeln!(file, "  owner: octo").unwrap();
        writeln!(file, "  repo: kits").unwrap();
        writeln!(file, "  branch: data").unwrap();
        writeln!(file, "admin:").unwrap();
        writeln!(file, "  access_key: door").unwrap();
        writeln!(file, "  password: hunter2").unwrap();

        let config = Config::load_with_env(Some(config_path.clone()), no_env).unwrap();
        assert_eq!(config.data_dir.value, temp_dir.path().join("state"));
        assert_eq!(config.data_dir.source, ConfigSource::File);
        assert!(config.github.is_configured());
        assert_eq!(config.github.branch(), "data");
        assert_eq!(config.admin.access_key.as_deref(), Some("door"));
        assert_eq!(config.config_file, Some(config_path));
        assert!(config.warnings().is_empty());
    }

    #[test]
    fn test_env_var_overrides_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "github:").unwrap();
        writeln!(file, "  owner: fromfile").unwrap();

        let env: HashMap<&str, &str> = [
            ("KITVAULT_GITHUB_OWNER", "fromenv"),
            ("KITVAULT_DATA_DIR", "/tmp/kitvault-env"),
            ("KITVAULT_ADMIN_PASSWORD", "pw"),
        ]
        .into_iter()
        .collect();

        let config = Config::load_with_env(Some(config_path), |name| {
            env.get(name).map(|v| v.to_string())
        })
        .unwrap();
        assert_eq!(config.github.owner.as_deref(), Some("fromenv"));
        assert_eq!(config.data_dir.value, PathBuf::from("/tmp/kitvault-env"));
        assert_eq!(config.data_dir.source, ConfigSource::Environment);
        assert_eq!(config.admin.password.as_deref(), Some("pw"));
    }

    #[test]
    fn test_incomplete_github_settings_warn() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "github:").unwrap();
        writeln!(file, "  token: not-a-token").unwrap();

        let config = Config::load_with_env(Some(config_path), no_env).unwrap();
        let warnings = config.warnings();
        assert!(warnings.iter().any(|w| w.contains("owner, repo")));
        assert!(warnings.iter().any(|w| w.contains("token format")));
        assert!(warnings.iter().any(|w| w.contains("Admin password")));
    }

    #[test]
    fn test_invalid_yaml_error() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "invalid: yaml: content: [").unwrap();

        let result = Config::load_with_env(Some(config_path), no_env);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
