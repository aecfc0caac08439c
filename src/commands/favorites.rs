use clap::{Args, Subcommand};

use kitvault_core::{CatalogStore, Kit};

use super::{truncate, OutputFormat};
use crate::app::App;

#[derive(Args)]
pub struct FavCommand {
    #[command(subcommand)]
    pub command: FavSubcommand,
}

#[derive(Subcommand)]
pub enum FavSubcommand {
    /// Mark a kit as favorite
    Add {
        /// Kit ID
        id: String,
    },

    /// Unmark a favorite kit
    Remove {
        /// Kit ID
        id: String,
    },

    /// Flip a kit's favorite status
    Toggle {
        /// Kit ID
        id: String,
    },

    /// List favorite kits
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Remove all favorites
    Clear,
}

impl FavCommand {
    pub fn run(&self, app: &App) -> Result<(), Box<dyn std::error::Error>> {
        let mut favorites = app.favorites();

        match &self.command {
            FavSubcommand::Add { id } => {
                let kit = app
                    .store
                    .get_kit(id)
                    .ok_or_else(|| format!("Kit not found: {}", id))?;
                favorites.add(id);
                println!("Added to favorites: {}", kit.name);
            }
            FavSubcommand::Remove { id } => {
                favorites.remove(id);
                println!("Removed from favorites: {}", id);
            }
            FavSubcommand::Toggle { id } => {
                let kit = app
                    .store
                    .get_kit(id)
                    .ok_or_else(|| format!("Kit not found: {}", id))?;
                if favorites.toggle(id) {
                    println!("Added to favorites: {}", kit.name);
                } else {
                    println!("Removed from favorites: {}", kit.name);
                }
            }
            FavSubcommand::List { format } => {
                let mut kits: Vec<&Kit> = favorites.resolve(app.store.kits());
                CatalogStore::sort_kits(&mut kits);

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&kits)?);
                    }
                    OutputFormat::Text => {
                        if kits.is_empty() {
                            println!("No favorites yet");
                            return Ok(());
                        }
                        for kit in &kits {
                            println!(
                                "{:<28}  {:<6}  {:<28}  {}",
                                truncate(&kit.id, 28),
                                kit.kit_type,
                                truncate(&kit.name, 28),
                                app.store.club_name(&kit.club_id)
                            );
                        }
                        println!("\nTotal: {} favorite(s)", kits.len());
                    }
                }
            }
            FavSubcommand::Clear => {
                let count = favorites.len();
                favorites.clear();
                println!("Cleared {} favorite(s)", count);
            }
        }
        Ok(())
    }
}
