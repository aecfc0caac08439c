use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};

use kitvault_core::{CatalogStore, ImageFile, Kit, KitType, KitUpdate, NewKit};

use super::club::find_club;
use super::league::find_league;
use super::{confirm, pending_hint, truncate, OutputFormat};
use crate::app::App;

#[derive(Args)]
pub struct KitCommand {
    #[command(subcommand)]
    pub command: KitSubcommand,
}

#[derive(Subcommand)]
pub enum KitSubcommand {
    /// List kits
    List {
        /// Only kits of this club (ID or name)
        #[arg(long, conflicts_with = "league")]
        club: Option<String>,

        /// Only kits of clubs in this league (ID or name)
        #[arg(long)]
        league: Option<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a kit's details
    Show {
        /// Kit ID
        id: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Add a kit to a club
    Add {
        /// Kit name
        name: String,

        /// Club ID or name
        #[arg(long)]
        club: String,

        /// Kit type (home, away, third, gk, logo)
        #[arg(long = "type", short = 't', value_name = "TYPE", default_value = "home")]
        kit_type: KitType,

        /// Download link
        #[arg(long, default_value = "")]
        link: String,

        /// Image URL
        #[arg(long, conflicts_with = "image_file")]
        image: Option<String>,

        /// Upload a local image and use its URL
        #[arg(long, value_name = "PATH")]
        image_file: Option<PathBuf>,
    },

    /// Update a kit
    Update {
        /// Kit ID
        id: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New kit type
        #[arg(long = "type", short = 't', value_name = "TYPE")]
        kit_type: Option<KitType>,

        /// New download link
        #[arg(long)]
        link: Option<String>,

        /// New image URL
        #[arg(long, conflicts_with = "image_file")]
        image: Option<String>,

        /// Upload a local image and use its URL
        #[arg(long, value_name = "PATH")]
        image_file: Option<PathBuf>,

        /// Move to another club (ID or name)
        #[arg(long)]
        club: Option<String>,
    },

    /// Delete a kit
    Delete {
        /// Kit ID
        id: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

fn resolve_club_id(store: &CatalogStore, identifier: &str) -> Result<String, String> {
    find_club(store, identifier)
        .map(|c| c.id.clone())
        .ok_or_else(|| format!("Club not found: {}", identifier))
}

/// Uploads `path` and returns the URL to store on the kit.
async fn upload(app: &App, path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let image = ImageFile::from_path(path)?;
    let uploaded = app.sync.upload_image(&image, None).await;
    if !uploaded.stored_remotely {
        eprintln!("Warning: image was not uploaded; storing it inline as a data URL");
    }
    Ok(uploaded.url)
}

fn print_kit_table(store: &CatalogStore, kits: &[&Kit]) {
    println!("{:<28}  {:<6}  {:<28}  CLUB", "ID", "TYPE", "NAME");
    println!("{}", "-".repeat(84));
    for kit in kits {
        println!(
            "{:<28}  {:<6}  {:<28}  {}",
            truncate(&kit.id, 28),
            kit.kit_type,
            truncate(&kit.name, 28),
            store.club_name(&kit.club_id)
        );
    }
}

impl KitCommand {
    pub async fn run(&self, app: &mut App) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            KitSubcommand::List {
                club,
                league,
                format,
            } => {
                let mut kits: Vec<&Kit> = if let Some(identifier) = club {
                    let id = resolve_club_id(&app.store, identifier)?;
                    app.store.kits_by_club(&id)
                } else if let Some(identifier) = league {
                    let league = find_league(&app.store, identifier)
                        .ok_or_else(|| format!("League not found: {}", identifier))?;
                    app.store.kits_by_league(&league.id)
                } else {
                    app.store.kits().iter().collect()
                };
                CatalogStore::sort_kits(&mut kits);

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&kits)?);
                    }
                    OutputFormat::Text => {
                        if kits.is_empty() {
                            println!("No kits found");
                            return Ok(());
                        }
                        print_kit_table(&app.store, &kits);
                        println!("\nTotal: {} kit(s)", kits.len());
                    }
                }
                Ok(())
            }

            KitSubcommand::Show { id, format } => {
                let kit = app
                    .store
                    .get_kit(id)
                    .ok_or_else(|| format!("Kit not found: {}", id))?;

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(kit)?);
                    }
                    OutputFormat::Text => {
                        print!("{}", kit);
                        println!("Club name: {}", app.store.club_name(&kit.club_id));
                        let favorite = app.favorites().contains(&kit.id);
                        println!("Favorite:  {}", if favorite { "yes" } else { "no" });
                    }
                }
                Ok(())
            }

            KitSubcommand::Add {
                name,
                club,
                kit_type,
                link,
                image,
                image_file,
            } => {
                app.require_admin()?;
                if name.trim().is_empty() {
                    return Err("Kit name cannot be empty".into());
                }
                let club_id = resolve_club_id(&app.store, club)?;
                let image = match image_file {
                    Some(path) => upload(app, path).await?,
                    None => image.clone().unwrap_or_default(),
                };

                let kit = app.store.add_kit(NewKit {
                    name: name.trim().to_string(),
                    kit_type: *kit_type,
                    image,
                    link: link.clone(),
                    club_id,
                });
                app.save()?;

                println!("Created kit:");
                print!("{}", kit);
                pending_hint();
                Ok(())
            }

            KitSubcommand::Update {
                id,
                name,
                kit_type,
                link,
                image,
                image_file,
                club,
            } => {
                app.require_admin()?;
                if app.store.get_kit(id).is_none() {
                    return Err(format!("Kit not found: {}", id).into());
                }
                let club_id = match club {
                    Some(identifier) => Some(resolve_club_id(&app.store, identifier)?),
                    None => None,
                };
                let image = match image_file {
                    Some(path) => Some(upload(app, path).await?),
                    None => image.clone(),
                };
                let update = KitUpdate {
                    name: name.clone(),
                    kit_type: *kit_type,
                    image,
                    link: link.clone(),
                    club_id,
                };
                if update.is_empty() {
                    return Err("Nothing to update. Provide at least one option.".into());
                }

                app.store.update_kit(id, update);
                app.save()?;

                if let Some(kit) = app.store.get_kit(id) {
                    println!("Updated kit:");
                    print!("{}", kit);
                }
                pending_hint();
                Ok(())
            }

            KitSubcommand::Delete { id, force } => {
                app.require_admin()?;
                let name = app
                    .store
                    .get_kit(id)
                    .map(|k| k.name.clone())
                    .ok_or_else(|| format!("Kit not found: {}", id))?;

                if !force && !confirm(&format!("Delete kit '{}'?", name))? {
                    println!("Deletion cancelled.");
                    return Ok(());
                }

                app.store.delete_kit(id);
                app.save()?;

                println!("Deleted kit: {}", name);
                pending_hint();
                Ok(())
            }
        }
    }
}
