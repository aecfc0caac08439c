use clap::Args;

use super::{truncate, OutputFormat};
use crate::app::App;

/// Search leagues, clubs and kits by name
#[derive(Args)]
pub struct SearchCommand {
    /// Text to look for (case-insensitive)
    query: String,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl SearchCommand {
    pub fn run(&self, app: &App) -> Result<(), Box<dyn std::error::Error>> {
        let results = app.store.search(&self.query);

        match self.format {
            OutputFormat::Json => {
                let value = serde_json::json!({
                    "leagues": results.leagues,
                    "clubs": results.clubs,
                    "kits": results.kits,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            }
            OutputFormat::Text => {
                if results.is_empty() {
                    println!("No results for '{}'", self.query.trim());
                    return Ok(());
                }
                if !results.leagues.is_empty() {
                    println!("Leagues:");
                    for league in &results.leagues {
                        println!("  {:<24}  {}", league.id, league.name);
                    }
                }
                if !results.clubs.is_empty() {
                    println!("Clubs:");
                    for club in &results.clubs {
                        println!(
                            "  {:<24}  {:<26}  {}",
                            club.id,
                            truncate(&club.name, 26),
                            app.store.league_name(&club.league_id)
                        );
                    }
                }
                if !results.kits.is_empty() {
                    println!("Kits:");
                    for kit in &results.kits {
                        println!(
                            "  {:<28}  {:<6}  {:<26}  {}",
                            kit.id,
                            kit.kit_type,
                            truncate(&kit.name, 26),
                            app.store.club_name(&kit.club_id)
                        );
                    }
                }
                println!("\nTotal: {} result(s)", results.len());
            }
        }
        Ok(())
    }
}
