//! Sync CLI commands for the GitHub-hosted catalog.

use clap::{Args, Subcommand};

use super::{confirm, OutputFormat};
use crate::app::App;

/// Sync the catalog with GitHub
#[derive(Args)]
pub struct SyncCommand {
    #[command(subcommand)]
    command: SyncSubcommand,
}

#[derive(Subcommand)]
enum SyncSubcommand {
    /// Show sync configuration and catalog status
    Status {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Discard local state and reload the catalog from GitHub
    Pull {
        /// Discard uncommitted changes without asking
        #[arg(long, short)]
        force: bool,
    },

    /// Commit the catalog to GitHub
    Push {
        /// Commit message
        #[arg(long, short)]
        message: Option<String>,
    },
}

impl SyncCommand {
    pub async fn run(&self, app: &mut App) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            SyncSubcommand::Status { format } => self.status(app, format).await,
            SyncSubcommand::Pull { force } => self.pull(app, *force).await,
            SyncSubcommand::Push { message } => self.push(app, message.as_deref()).await,
        }
    }

    async fn status(
        &self,
        app: &mut App,
        format: &OutputFormat,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let status = app.sync.status(&app.store);

        if let OutputFormat::Json = format {
            println!("{}", serde_json::to_string_pretty(&status)?);
            return Ok(());
        }

        println!("Sync Status");
        println!("===========");
        println!();

        if !status.configured {
            println!("GitHub:  Not configured (local-only mode)");
            println!();
            println!("To enable sync, add to your config file:");
            println!();
            println!("  github:");
            println!("    token: \"ghp_...\"");
            println!("    owner: \"your-name\"");
            println!("    repo: \"your-kits-repo\"");
            println!("    branch: \"main\"");
            println!();
            println!("Or set environment variables:");
            println!("  KITVAULT_GITHUB_TOKEN");
            println!("  KITVAULT_GITHUB_OWNER");
            println!("  KITVAULT_GITHUB_REPO");
            println!("  KITVAULT_GITHUB_BRANCH");
        } else {
            match app.sync.repository_info().await {
                Ok(info) => {
                    println!("Repository: {} ({})", info.full_name, info.html_url);
                    println!("Default branch: {}", info.default_branch);
                }
                Err(e) => println!("Repository: unreachable ({})", e),
            }
            println!("Branch:     {}", app.config.github.branch());
            let can_write = match status.can_write {
                Some(can_write) => can_write,
                None => app.sync.probe_write_access().await,
            };
            println!("Write access: {}", if can_write { "yes" } else { "no" });
        }
        println!();

        if let Some(source) = status.source {
            println!("Catalog source: {}", source);
        }
        if let Some(issue) = &status.issue {
            println!("Load issue:     {}", issue);
        }
        match status.cached_at {
            Some(at) => println!("Cached at:      {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
            None => println!("Cached at:      never"),
        }
        let (leagues, clubs, kits) = app.store.catalog().counts();
        println!(
            "Catalog:        {} league(s), {} club(s), {} kit(s)",
            leagues, clubs, kits
        );
        println!(
            "Pending changes: {}",
            if status.pending_changes { "yes" } else { "no" }
        );
        Ok(())
    }

    async fn pull(&self, app: &mut App, force: bool) -> Result<(), Box<dyn std::error::Error>> {
        if app.store.has_pending_changes()
            && !force
            && !confirm("Discard uncommitted local changes?")?
        {
            println!("Pull cancelled.");
            return Ok(());
        }

        let report = app.sync.refresh(&mut app.store).await;
        match &report.issue {
            Some(issue) if issue.is_fatal() => {
                return Err(issue.message().to_string().into());
            }
            Some(issue) => println!("Warning: {}", issue),
            None => {}
        }

        let (leagues, clubs, kits) = app.store.catalog().counts();
        println!(
            "Loaded {} league(s), {} club(s), {} kit(s) from {}",
            leagues, clubs, kits, report.source
        );
        Ok(())
    }

    async fn push(
        &self,
        app: &mut App,
        message: Option<&str>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        app.require_admin()?;
        if !app.store.has_pending_changes() {
            println!("No pending changes to commit.");
            return Ok(());
        }

        let result = app
            .sync
            .commit(&mut app.store, message, |stage| {
                println!("[{:>3}%] {}", stage.percent(), stage.message());
            })
            .await;

        match result {
            Ok(outcome) => {
                println!();
                match outcome.commit_sha {
                    Some(sha) => println!("Committed {}", sha),
                    None => println!("Committed."),
                }
                Ok(())
            }
            Err(e) => {
                tracing::debug!(category = ?e.category(), "Commit failed");
                // Keep the edits for a retry
                app.save()?;
                Err(e.into())
            }
        }
    }
}
