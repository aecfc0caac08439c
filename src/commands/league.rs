use clap::{Args, Subcommand};

use kitvault_core::{CatalogStore, League, LeagueUpdate, NewLeague};

use super::{confirm, pending_hint, print_cascade, truncate, OutputFormat};
use crate::app::App;

#[derive(Args)]
pub struct LeagueCommand {
    #[command(subcommand)]
    pub command: LeagueSubcommand,
}

#[derive(Subcommand)]
pub enum LeagueSubcommand {
    /// List leagues in display order
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a league with its clubs
    Show {
        /// League ID or name
        identifier: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Add a league
    Add {
        /// League name
        name: String,

        /// Logo URL
        #[arg(long, default_value = "")]
        logo: String,

        /// Display order (lower comes first)
        #[arg(long, default_value_t = 0)]
        order: i64,
    },

    /// Update a league
    Update {
        /// League ID or name
        identifier: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New logo URL
        #[arg(long)]
        logo: Option<String>,

        /// New display order
        #[arg(long)]
        order: Option<i64>,
    },

    /// Delete a league with all of its clubs and kits
    Delete {
        /// League ID or name
        identifier: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

/// Finds a league by ID, then by case-insensitive name.
pub(super) fn find_league<'a>(store: &'a CatalogStore, identifier: &str) -> Option<&'a League> {
    store.get_league(identifier).or_else(|| {
        store
            .leagues()
            .iter()
            .find(|l| l.name.eq_ignore_ascii_case(identifier))
    })
}

impl LeagueCommand {
    pub fn run(&self, app: &mut App) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            LeagueSubcommand::List { format } => {
                let leagues = app.store.leagues_sorted();

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&leagues)?);
                    }
                    OutputFormat::Text => {
                        if leagues.is_empty() {
                            println!("No leagues found");
                            return Ok(());
                        }
                        println!("{:<5}  {:<24}  {:<30}  CLUBS", "ORDER", "ID", "NAME");
                        println!("{}", "-".repeat(72));
                        for league in &leagues {
                            println!(
                                "{:<5}  {:<24}  {:<30}  {}",
                                league.order,
                                truncate(&league.id, 24),
                                truncate(&league.name, 30),
                                app.store.clubs_by_league(&league.id).len()
                            );
                        }
                        println!("\nTotal: {} league(s)", leagues.len());
                    }
                }
                Ok(())
            }

            LeagueSubcommand::Show { identifier, format } => {
                let league = find_league(&app.store, identifier)
                    .ok_or_else(|| format!("League not found: {}", identifier))?;
                let mut clubs = app.store.clubs_by_league(&league.id);
                CatalogStore::sort_clubs(&mut clubs);

                match format {
                    OutputFormat::Json => {
                        let value = serde_json::json!({ "league": league, "clubs": clubs });
                        println!("{}", serde_json::to_string_pretty(&value)?);
                    }
                    OutputFormat::Text => {
                        print!("{}", league);
                        println!(
                            "Kits:  {}",
                            app.store.kits_by_league(&league.id).len()
                        );
                        println!("\nClubs:");
                        if clubs.is_empty() {
                            println!("  (none)");
                        }
                        for club in clubs {
                            println!("  {:<24}  {}", club.id, club.name);
                        }
                    }
                }
                Ok(())
            }

            LeagueSubcommand::Add { name, logo, order } => {
                app.require_admin()?;
                if name.trim().is_empty() {
                    return Err("League name cannot be empty".into());
                }

                let league = app.store.add_league(NewLeague {
                    name: name.trim().to_string(),
                    logo: logo.clone(),
                    order: *order,
                });
                app.save()?;

                println!("Created league:");
                print!("{}", league);
                pending_hint();
                Ok(())
            }

            LeagueSubcommand::Update {
                identifier,
                name,
                logo,
                order,
            } => {
                app.require_admin()?;
                let update = LeagueUpdate {
                    name: name.clone(),
                    logo: logo.clone(),
                    order: *order,
                };
                if update.is_empty() {
                    return Err("Nothing to update. Provide at least one option.".into());
                }

                let id = find_league(&app.store, identifier)
                    .map(|l| l.id.clone())
                    .ok_or_else(|| format!("League not found: {}", identifier))?;
                app.store.update_league(&id, update);
                app.save()?;

                if let Some(league) = app.store.get_league(&id) {
                    println!("Updated league:");
                    print!("{}", league);
                }
                pending_hint();
                Ok(())
            }

            LeagueSubcommand::Delete { identifier, force } => {
                app.require_admin()?;
                let league = find_league(&app.store, identifier)
                    .ok_or_else(|| format!("League not found: {}", identifier))?;
                let (id, name) = (league.id.clone(), league.name.clone());

                if !force {
                    let clubs = app.store.clubs_by_league(&id).len();
                    let kits = app.store.kits_by_league(&id).len();
                    let prompt = format!(
                        "Delete league '{}' with {} club(s) and {} kit(s)?",
                        name, clubs, kits
                    );
                    if !confirm(&prompt)? {
                        println!("Deletion cancelled.");
                        return Ok(());
                    }
                }

                let report = app.store.delete_league(&id);
                app.save()?;

                println!("Deleted league: {}", name);
                print_cascade(&report);
                pending_hint();
                Ok(())
            }
        }
    }
}
