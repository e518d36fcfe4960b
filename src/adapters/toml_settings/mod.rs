// TOML settings adapter - Persisted job defaults

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{HighlightError, HighlightResult};

/// Settings file looked up in the current directory
pub const DEFAULT_SETTINGS_FILE: &str = "highlighter.toml";

/// Default output directory for rendered clips
pub const DEFAULT_OUTPUT_DIR: &str = "./highlights";

/// Contents of the settings file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub paths: PathSettings,
    pub settings: JobDefaults,
}

/// `[paths]` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ffmpeg_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookies_path: Option<PathBuf>,
    pub output_path: PathBuf,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            ffmpeg_path: None,
            cookies_path: None,
            output_path: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

/// `[settings]` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobDefaults {
    pub quality: String,
    pub num_clips: u32,
    pub aspect_ratio: String,
}

impl Default for JobDefaults {
    fn default() -> Self {
        Self {
            quality: "1080p".to_string(),
            num_clips: 1,
            aspect_ratio: "original".to_string(),
        }
    }
}

/// Reads and writes [`Settings`] at a fixed path
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store for `highlighter.toml` in the current directory
    pub fn in_current_dir() -> Self {
        Self::new(DEFAULT_SETTINGS_FILE)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings; a missing file yields defaults
    pub fn load(&self) -> HighlightResult<Settings> {
        if !self.path.exists() {
            debug!(
                "No settings file at {}, using defaults",
                self.path.display()
            );
            return Ok(Settings::default());
        }

        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            settings_error(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            settings_error(format!(
                "Failed to parse {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    /// Write settings, creating the parent directory if needed
    pub fn save(&self, settings: &Settings) -> HighlightResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                settings_error(format!("Failed to create settings directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(settings)
            .map_err(|e| settings_error(format!("Failed to serialize settings: {}", e)))?;
        std::fs::write(&self.path, content).map_err(|e| {
            settings_error(format!(
                "Failed to write {}: {}",
                self.path.display(),
                e
            ))
        })?;

        info!("Saved settings to {}", self.path.display());
        Ok(())
    }
}

fn settings_error(message: String) -> HighlightError {
    HighlightError::Settings { message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::new(dir.path().join("absent.toml"));

        let settings = store.load().unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.paths.output_path, PathBuf::from("./highlights"));
        assert_eq!(settings.settings.quality, "1080p");
        assert_eq!(settings.settings.num_clips, 1);
        assert_eq!(settings.settings.aspect_ratio, "original");
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::new(dir.path().join("nested").join("highlighter.toml"));

        let mut settings = Settings::default();
        settings.paths.ffmpeg_path = Some(PathBuf::from("/opt/ffmpeg/bin"));
        settings.settings.num_clips = 4;
        settings.settings.aspect_ratio = "crop-9x16".to_string();
        store.save(&settings).unwrap();

        assert_eq!(store.load().unwrap(), settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("highlighter.toml");
        std::fs::write(&path, "[settings]\nquality = \"720p\"\n").unwrap();

        let settings = SettingsStore::new(&path).load().unwrap();
        assert_eq!(settings.settings.quality, "720p");
        assert_eq!(settings.settings.num_clips, 1);
        assert!(settings.paths.ffmpeg_path.is_none());
    }

    #[test]
    fn test_malformed_file_is_settings_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("highlighter.toml");
        std::fs::write(&path, "[settings\nquality = ").unwrap();

        assert!(matches!(
            SettingsStore::new(&path).load(),
            Err(HighlightError::Settings { .. })
        ));
    }
}
