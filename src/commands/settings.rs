use clap::{Args, Subcommand};

use kitvault_core::SettingsUpdate;

use super::{pending_hint, OutputFormat};
use crate::app::App;

#[derive(Args)]
pub struct SettingsCommand {
    #[command(subcommand)]
    pub command: SettingsSubcommand,
}

#[derive(Subcommand)]
pub enum SettingsSubcommand {
    /// Show application settings
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Update application settings
    Update {
        /// Application name
        #[arg(long)]
        app_name: Option<String>,

        /// Application logo URL
        #[arg(long)]
        app_logo: Option<String>,

        /// Welcome text shown on the home screen
        #[arg(long)]
        welcome_text: Option<String>,

        /// Catalog version label
        #[arg(long)]
        version: Option<String>,
    },
}

impl SettingsCommand {
    pub fn run(&self, app: &mut App) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            SettingsSubcommand::Show { format } => {
                let settings = app.store.settings();
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(settings)?);
                    }
                    OutputFormat::Text => {
                        println!("app_name:     {}", settings.app_name);
                        println!("app_logo:     {}", settings.app_logo);
                        println!("welcome_text: {}", settings.welcome_text);
                        println!("version:      {}", settings.version);
                    }
                }
                Ok(())
            }

            SettingsSubcommand::Update {
                app_name,
                app_logo,
                welcome_text,
                version,
            } => {
                app.require_admin()?;
                let update = SettingsUpdate {
                    app_name: app_name.clone(),
                    app_logo: app_logo.clone(),
                    welcome_text: welcome_text.clone(),
                    version: version.clone(),
                };
                if update.is_empty() {
                    return Err("Nothing to update. Provide at least one option.".into());
                }

                app.store.update_settings(update);
                app.save()?;

                println!("Settings updated.");
                pending_hint();
                Ok(())
            }
        }
    }
}
