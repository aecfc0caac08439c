use clap::{Args, Subcommand};
use std::path::PathBuf;

use kitvault_core::ImageFile;

use super::OutputFormat;
use crate::app::App;

#[derive(Args)]
pub struct ImageCommand {
    #[command(subcommand)]
    pub command: ImageSubcommand,
}

#[derive(Subcommand)]
pub enum ImageSubcommand {
    /// Upload an image to the repository's assets directory
    Upload {
        /// Image file (JPEG, PNG, WebP or SVG, max 5 MiB)
        file: PathBuf,

        /// Name to store the image under (default: timestamped file name)
        #[arg(long)]
        name: Option<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Delete an uploaded image
    Delete {
        /// Repository path or file name under assets/images
        path: String,
    },
}

impl ImageCommand {
    pub async fn run(&self, app: &App) -> Result<(), Box<dyn std::error::Error>> {
        app.require_admin()?;

        match &self.command {
            ImageSubcommand::Upload { file, name, format } => {
                let image = ImageFile::from_path(file)?;
                let uploaded = app.sync.upload_image(&image, name.as_deref()).await;

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&uploaded)?);
                    }
                    OutputFormat::Text => {
                        if uploaded.stored_remotely {
                            println!("Uploaded: {}", uploaded.path);
                            println!("URL: {}", uploaded.url);
                        } else {
                            eprintln!("Warning: upload unavailable, returning an inline data URL");
                            println!("{}", uploaded.url);
                        }
                    }
                }
                Ok(())
            }

            ImageSubcommand::Delete { path } => {
                if app.sync.delete_image(path).await? {
                    println!("Deleted image: {}", path);
                    Ok(())
                } else {
                    Err(format!("Image not found: {}", path).into())
                }
            }
        }
    }
}
