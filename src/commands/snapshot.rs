use clap::Args;
use std::fs;
use std::path::PathBuf;

use super::pending_hint;
use crate::app::App;

/// Export the catalog as JSON
#[derive(Args)]
pub struct ExportCommand {
    /// Write to a file instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,
}

impl ExportCommand {
    pub fn run(&self, app: &App) -> Result<(), Box<dyn std::error::Error>> {
        let json = app.store.export_snapshot()?;
        match &self.output {
            Some(path) => {
                fs::write(path, format!("{}\n", json))?;
                let (leagues, clubs, kits) = app.store.catalog().counts();
                eprintln!(
                    "Exported {} league(s), {} club(s), {} kit(s) to {}",
                    leagues,
                    clubs,
                    kits,
                    path.display()
                );
            }
            None => println!("{}", json),
        }
        Ok(())
    }
}

/// Replace the catalog with a JSON export
#[derive(Args)]
pub struct ImportCommand {
    /// Catalog JSON file
    file: PathBuf,
}

impl ImportCommand {
    pub fn run(&self, app: &mut App) -> Result<(), Box<dyn std::error::Error>> {
        app.require_admin()?;
        let json = fs::read_to_string(&self.file)
            .map_err(|e| format!("Failed to read '{}': {}", self.file.display(), e))?;

        app.store.try_import_snapshot(&json)?;
        app.save()?;

        let (leagues, clubs, kits) = app.store.catalog().counts();
        println!(
            "Imported {} league(s), {} club(s), {} kit(s)",
            leagues, clubs, kits
        );
        pending_hint();
        Ok(())
    }
}
