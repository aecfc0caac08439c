//! Admin session commands.

use clap::{Args, Subcommand};
use std::io::{self, BufRead, Write};

use kitvault_core::{EntryRequest, Navigator, View};

use crate::app::App;

/// Admin session management
#[derive(Args)]
pub struct AdminCommand {
    #[command(subcommand)]
    command: AdminSubcommand,
}

#[derive(Subcommand)]
enum AdminSubcommand {
    /// Log in as admin (password is read from stdin)
    Login {
        /// Admin access key
        #[arg(long)]
        key: String,
    },
    /// End the admin session
    Logout,
    /// Show whether an admin session is active
    Status,
}

impl AdminCommand {
    pub fn run(&self, app: &mut App) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            AdminSubcommand::Login { key } => {
                let request = EntryRequest {
                    path: "/admin".to_string(),
                    key: Some(key.clone()),
                };
                if Navigator::from_entry(&request, app.admin.access()).view() != View::Admin {
                    return Err("Invalid admin access key".into());
                }

                let password = read_password()?;
                app.admin.login(&password)?;
                println!("Logged in as admin.");
                Ok(())
            }
            AdminSubcommand::Logout => {
                app.admin.logout();
                println!("Logged out.");
                Ok(())
            }
            AdminSubcommand::Status => {
                match app.admin.session() {
                    Some(session) => println!(
                        "Admin session active since {}",
                        session.started_at.format("%Y-%m-%d %H:%M:%S UTC")
                    ),
                    None => println!("Not logged in."),
                }
                Ok(())
            }
        }
    }
}

fn read_password() -> io::Result<String> {
    eprint!("Password: ");
    io::stderr().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}
