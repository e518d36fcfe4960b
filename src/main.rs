//! Highlight clipper
//!
//! Downloads a video, finds its loudest moments and cuts them into clips.
//!
//! # Usage
//!
//! ```bash
//! highlighter run "https://www.youtube.com/watch?v=..." --clips 3 --duration 30
//! highlighter run "https://..." --aspect crop-9x16 --quality 720p --ffmpeg /opt/ffmpeg/bin
//! highlighter detect --input audio.wav --clips 5
//! highlighter inspect --input clip.mp4
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;

use highlight_clipper::cli::{commands, Cli, Commands};
use highlight_clipper::utils::logging::{log_system_info, LoggingConfig};

/// Main entry point for the highlighter CLI
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    LoggingConfig::new(cli.log_level.as_str(), cli.json_logs).initialize()?;
    log_system_info();

    match cli.command {
        Commands::Run(args) => {
            info!("Executing run command");
            commands::run(args, cli.settings.as_deref()).await?;
        }
        Commands::Detect(args) => {
            info!("Executing detect command");
            commands::detect(args).await?;
        }
        Commands::Inspect(args) => {
            info!("Executing inspect command");
            commands::inspect(args).await?;
        }
    }

    Ok(())
}
