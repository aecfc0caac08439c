use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod commands;
mod config;

use app::App;
use commands::{
    AdminCommand, BrowseCommand, ClubCommand, ConfigCommand, ExportCommand, FavCommand,
    ImageCommand, ImportCommand, KitCommand, LeagueCommand, SearchCommand, SettingsCommand,
    SyncCommand,
};
use config::Config;

#[derive(Parser)]
#[command(name = "kitvault")]
#[command(version)]
#[command(about = "A football kit catalog backed by a GitHub repository", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage leagues
    League(LeagueCommand),

    /// Manage clubs
    Club(ClubCommand),

    /// Manage kits
    Kit(KitCommand),

    /// Show or update app settings
    Settings(SettingsCommand),

    /// Search leagues, clubs and kits
    Search(SearchCommand),

    /// Manage favorite kits
    Fav(FavCommand),

    /// Browse the catalog interactively
    Browse(BrowseCommand),

    /// Sync the catalog with GitHub
    Sync(SyncCommand),

    /// Export the catalog as JSON
    Export(ExportCommand),

    /// Replace the catalog with a JSON export
    Import(ImportCommand),

    /// Upload or delete kit images
    Image(ImageCommand),

    /// Admin session management
    Admin(AdminCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kitvault=warn,kitvault_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;

    match cli.command {
        // Config never needs the catalog loaded
        Some(Commands::Config(cmd)) => cmd.run(&config)?,
        Some(command) => {
            let mut app = App::open(config).await;
            run_catalog(command, &mut app).await?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}

async fn run_catalog(command: Commands, app: &mut App) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::League(cmd) => cmd.run(app)?,
        Commands::Club(cmd) => cmd.run(app)?,
        Commands::Kit(cmd) => cmd.run(app).await?,
        Commands::Settings(cmd) => cmd.run(app)?,
        Commands::Search(cmd) => cmd.run(app)?,
        Commands::Fav(cmd) => cmd.run(app)?,
        Commands::Browse(cmd) => cmd.run(app)?,
        Commands::Sync(cmd) => cmd.run(app).await?,
        Commands::Export(cmd) => cmd.run(app)?,
        Commands::Import(cmd) => cmd.run(app)?,
        Commands::Image(cmd) => cmd.run(app).await?,
        Commands::Admin(cmd) => cmd.run(app)?,
        Commands::Config(cmd) => cmd.run(&app.config)?,
    }

    Ok(())
}
