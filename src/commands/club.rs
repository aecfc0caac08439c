use clap::{Args, Subcommand};

use kitvault_core::{CatalogStore, Club, ClubUpdate, NewClub};

use super::league::find_league;
use super::{confirm, pending_hint, print_cascade, truncate, OutputFormat};
use crate::app::App;

#[derive(Args)]
pub struct ClubCommand {
    #[command(subcommand)]
    pub command: ClubSubcommand,
}

#[derive(Subcommand)]
pub enum ClubSubcommand {
    /// List clubs alphabetically
    List {
        /// Only clubs in this league (ID or name)
        #[arg(long)]
        league: Option<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a club with its kits
    Show {
        /// Club ID or name
        identifier: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Add a club to a league
    Add {
        /// Club name
        name: String,

        /// League ID or name
        #[arg(long)]
        league: String,

        /// Logo URL
        #[arg(long, default_value = "")]
        logo: String,
    },

    /// Update a club
    Update {
        /// Club ID or name
        identifier: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New logo URL
        #[arg(long)]
        logo: Option<String>,

        /// Move to another league (ID or name)
        #[arg(long)]
        league: Option<String>,
    },

    /// Delete a club with all of its kits
    Delete {
        /// Club ID or name
        identifier: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

/// Finds a club by ID, then by case-insensitive name.
pub(super) fn find_club<'a>(store: &'a CatalogStore, identifier: &str) -> Option<&'a Club> {
    store.get_club(identifier).or_else(|| {
        store
            .clubs()
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(identifier))
    })
}

fn resolve_league_id(store: &CatalogStore, identifier: &str) -> Result<String, String> {
    find_league(store, identifier)
        .map(|l| l.id.clone())
        .ok_or_else(|| format!("League not found: {}", identifier))
}

impl ClubCommand {
    pub fn run(&self, app: &mut App) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ClubSubcommand::List { league, format } => {
                let mut clubs: Vec<&Club> = match league {
                    Some(identifier) => {
                        let id = resolve_league_id(&app.store, identifier)?;
                        app.store.clubs_by_league(&id)
                    }
                    None => app.store.clubs().iter().collect(),
                };
                CatalogStore::sort_clubs(&mut clubs);

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&clubs)?);
                    }
                    OutputFormat::Text => {
                        if clubs.is_empty() {
                            println!("No clubs found");
                            return Ok(());
                        }
                        println!("{:<24}  {:<26}  {:<20}  KITS", "ID", "NAME", "LEAGUE");
                        println!("{}", "-".repeat(80));
                        for club in &clubs {
                            println!(
                                "{:<24}  {:<26}  {:<20}  {}",
                                truncate(&club.id, 24),
                                truncate(&club.name, 26),
                                truncate(app.store.league_name(&club.league_id), 20),
                                app.store.kits_by_club(&club.id).len()
                            );
                        }
                        println!("\nTotal: {} club(s)", clubs.len());
                    }
                }
                Ok(())
            }

            ClubSubcommand::Show { identifier, format } => {
                let club = find_club(&app.store, identifier)
                    .ok_or_else(|| format!("Club not found: {}", identifier))?;
                let mut kits = app.store.kits_by_club(&club.id);
                CatalogStore::sort_kits(&mut kits);

                match format {
                    OutputFormat::Json => {
                        let value = serde_json::json!({ "club": club, "kits": kits });
                        println!("{}", serde_json::to_string_pretty(&value)?);
                    }
                    OutputFormat::Text => {
                        println!("{}", club.name);
                        println!("{}", "=".repeat(club.name.len()));
                        println!("ID:     {}", club.id);
                        println!("League: {}", app.store.league_name(&club.league_id));
                        if !club.logo.is_empty() {
                            println!("Logo:   {}", club.logo);
                        }
                        println!("\nKits:");
                        if kits.is_empty() {
                            println!("  (none)");
                        }
                        for kit in kits {
                            println!("  {:<6}  {:<28}  {}", kit.kit_type, kit.id, kit.name);
                        }
                    }
                }
                Ok(())
            }

            ClubSubcommand::Add { name, league, logo } => {
                app.require_admin()?;
                if name.trim().is_empty() {
                    return Err("Club name cannot be empty".into());
                }
                let league_id = resolve_league_id(&app.store, league)?;

                let club = app.store.add_club(NewClub {
                    name: name.trim().to_string(),
                    logo: logo.clone(),
                    league_id,
                });
                app.save()?;

                println!("Created club: {} ({})", club.name, club.id);
                pending_hint();
                Ok(())
            }

            ClubSubcommand::Update {
                identifier,
                name,
                logo,
                league,
            } => {
                app.require_admin()?;
                let league_id = match league {
                    Some(identifier) => Some(resolve_league_id(&app.store, identifier)?),
                    None => None,
                };
                let update = ClubUpdate {
                    name: name.clone(),
                    logo: logo.clone(),
                    league_id,
                };
                if update.is_empty() {
                    return Err("Nothing to update. Provide at least one option.".into());
                }

                let id = find_club(&app.store, identifier)
                    .map(|c| c.id.clone())
                    .ok_or_else(|| format!("Club not found: {}", identifier))?;
                app.store.update_club(&id, update);
                app.save()?;

                println!("Updated club: {}", app.store.club_name(&id));
                pending_hint();
                Ok(())
            }

            ClubSubcommand::Delete { identifier, force } => {
                app.require_admin()?;
                let club = find_club(&app.store, identifier)
                    .ok_or_else(|| format!("Club not found: {}", identifier))?;
                let (id, name) = (club.id.clone(), club.name.clone());

                if !force {
                    let kits = app.store.kits_by_club(&id).len();
                    let prompt = format!("Delete club '{}' with {} kit(s)?", name, kits);
                    if !confirm(&prompt)? {
                        println!("Deletion cancelled.");
                        return Ok(());
                    }
                }

                let report = app.store.delete_club(&id);
                app.save()?;

                println!("Deleted club: {}", name);
                print_cascade(&report);
                pending_hint();
                Ok(())
            }
        }
    }
}
