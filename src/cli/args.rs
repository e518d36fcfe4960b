//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Arguments for the run command
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Video URL
    pub url: String,

    /// Length of each clip in seconds (5-600)
    #[arg(short, long, default_value_t = 30)]
    pub duration: u32,

    /// Number of clips to extract (1-10) [default: from settings]
    #[arg(short = 'n', long)]
    pub clips: Option<u32>,

    /// ffmpeg executable or the directory containing it
    #[arg(long, env = "HIGHLIGHTER_FFMPEG")]
    pub ffmpeg: Option<PathBuf>,

    /// Netscape-format cookie file passed to the downloader
    #[arg(long, env = "HIGHLIGHTER_COOKIES")]
    pub cookies: Option<PathBuf>,

    /// Directory receiving the clips
    #[arg(short, long, env = "HIGHLIGHTER_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Maximum video height: 1080p or 720p
    #[arg(short, long)]
    pub quality: Option<String>,

    /// Framing: original, crop-9x16 or pad-9x16
    #[arg(short, long)]
    pub aspect: Option<String>,

    /// Directory for temporary downloads [default: current directory]
    #[arg(long, env = "HIGHLIGHTER_WORK_DIR")]
    pub work_dir: Option<PathBuf>,

    /// yt-dlp executable [default: yt-dlp on PATH]
    #[arg(long, env = "HIGHLIGHTER_YT_DLP")]
    pub yt_dlp: Option<PathBuf>,
}

/// Arguments for the detect command
#[derive(Args, Debug, Clone)]
pub struct DetectArgs {
    /// WAV file to analyze
    #[arg(short, long)]
    pub input: PathBuf,

    /// Window length in seconds
    #[arg(short, long, default_value_t = 30)]
    pub duration: u32,

    /// Maximum number of windows
    #[arg(short = 'n', long, default_value_t = 1)]
    pub clips: u32,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the inspect command
#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Media file to probe
    #[arg(short, long)]
    pub input: PathBuf,

    /// ffmpeg executable or the directory containing it
    #[arg(long, env = "HIGHLIGHTER_FFMPEG")]
    pub ffmpeg: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
