// Adapters - External system implementations

pub mod ffmpeg;
pub mod toml_settings;
pub mod ytdlp;

// Re-export adapters
pub use ffmpeg::FfmpegAdapter;
pub use toml_settings::{Settings, SettingsStore};
pub use ytdlp::YtDlpAdapter;
