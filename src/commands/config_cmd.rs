use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use super::OutputFormat;
use crate::config::{Config, ConfigValue};

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values (secrets are masked)
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

/// Configuration as displayed, with secrets masked.
#[derive(Serialize)]
struct ConfigView<'a> {
    data_dir: &'a ConfigValue<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    config_file: Option<&'a PathBuf>,
    github: GitHubView<'a>,
    admin: AdminView,
}

#[derive(Serialize)]
struct GitHubView<'a> {
    configured: bool,
    token: Option<String>,
    owner: Option<&'a str>,
    repo: Option<&'a str>,
    branch: &'a str,
}

#[derive(Serialize)]
struct AdminView {
    access_key: Option<String>,
    password: Option<String>,
}

impl<'a> ConfigView<'a> {
    fn new(config: &'a Config) -> Self {
        Self {
            data_dir: &config.data_dir,
            config_file: config.config_file.as_ref(),
            github: GitHubView {
                configured: config.github.is_configured(),
                token: config.github.token.as_deref().map(mask),
                owner: config.github.owner.as_deref(),
                repo: config.github.repo.as_deref(),
                branch: config.github.branch(),
            },
            admin: AdminView {
                access_key: config.admin.access_key.as_deref().map(mask),
                password: config.admin.password.as_deref().map(mask),
            },
        }
    }
}

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                let view = ConfigView::new(config);
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&view)?);
                    }
                    OutputFormat::Text => print_text(config, &view),
                }
                Ok(())
            }
        }
    }
}

fn print_text(config: &Config, view: &ConfigView<'_>) {
    println!("Configuration");
    println!("=============\n");

    match view.config_file {
        Some(path) => println!("Config file: {}", path.display()),
        None => println!(
            "Config file: {} (not found)",
            Config::default_config_path().display()
        ),
    }
    println!();

    println!("data_dir: {}", view.data_dir.value.display());
    println!("  source: {}", view.data_dir.source);
    println!();

    let unset = || "(not set)".to_string();
    println!("github:");
    println!("  token:  {}", view.github.token.clone().unwrap_or_else(unset));
    println!("  owner:  {}", view.github.owner.unwrap_or("(not set)"));
    println!("  repo:   {}", view.github.repo.unwrap_or("(not set)"));
    println!("  branch: {}", view.github.branch);
    println!(
        "  sync:   {}",
        if view.github.configured { "enabled" } else { "disabled" }
    );
    println!();

    println!("admin:");
    println!("  access_key: {}", view.admin.access_key.clone().unwrap_or_else(unset));
    println!("  password:   {}", view.admin.password.clone().unwrap_or_else(unset));

    let warnings = config.warnings();
    if !warnings.is_empty() {
        println!();
        for warning in warnings {
            println!("Warning: {}", warning);
        }
    }
}

/// Keeps the first four characters of long secrets, masking the rest.
fn mask(secret: &str) -> String {
    let len = secret.chars().count();
    if len > 8 {
        let head: String = secret.chars().take(4).collect();
        format!("{}{}", head, "*".repeat(len - 4))
    } else {
        "*".repeat(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask() {
        assert_eq!(mask("ghp_abcdefgh"), "ghp_********");
        assert_eq!(mask("door"), "****");
        assert_eq!(mask(""), "");
    }

    #[test]
    fn test_view_masks_secrets() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut config =
            Config::load_with_env(Some(temp_dir.path().join("none.yaml")), |_| None).unwrap();
        config.github.token = Some("ghp_1234567890".to_string());
        config.admin.password = Some("hunter2".to_string());

        let json = serde_json::to_string(&ConfigView::new(&config)).unwrap();
        assert!(!json.contains("1234567890"));
        assert!(!json.contains("hunter2"));
        assert!(json.contains("ghp_"));
    }
}
