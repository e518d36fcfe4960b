//! CLI module for the highlight clipper
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

pub use args::{DetectArgs, InspectArgs, RunArgs};

/// Highlight clipper
///
/// Finds the loudest moments of an online video by the energy of its audio
/// track and cuts them into short clips.
#[derive(Parser, Debug)]
#[command(name = "highlighter")]
#[command(about = "Cut the loudest moments of a video into highlight clips")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level, used when RUST_LOG is not set
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Settings file holding the last used paths and options
    #[arg(long, env = "HIGHLIGHTER_SETTINGS", global = true)]
    pub settings: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download a video and render its highlights
    Run(RunArgs),
    /// Print the highlight windows of a local WAV file
    Detect(DetectArgs),
    /// Print duration and resolution of a local media file
    Inspect(InspectArgs),
}
