mod admin;
mod browse;
mod club;
mod config_cmd;
mod favorites;
mod image;
mod kit;
mod league;
mod search;
mod settings;
mod snapshot;
mod sync_cmd;

pub use admin::AdminCommand;
pub use browse::BrowseCommand;
pub use club::ClubCommand;
pub use config_cmd::ConfigCommand;
pub use favorites::FavCommand;
pub use image::ImageCommand;
pub use kit::KitCommand;
pub use league::LeagueCommand;
pub use search::SearchCommand;
pub use settings::SettingsCommand;
pub use snapshot::{ExportCommand, ImportCommand};
pub use sync_cmd::SyncCommand;

use clap::ValueEnum;
use std::io::{self, Write};

use kitvault_core::CascadeReport;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Asks a yes/no question on stdin. Anything but `y` means no.
fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let cut: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

fn print_cascade(report: &CascadeReport) {
    println!(
        "Removed {} league(s), {} club(s), {} kit(s)",
        report.leagues.len(),
        report.clubs.len(),
        report.kits.len()
    );
}

fn pending_hint() {
    println!("\nChanges are local. Run 'kitvault sync push' to commit them.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Arsenal", 10), "Arsenal");
        assert_eq!(truncate("Borussia Mönchengladbach", 10), "Borussi...");
    }
}
