//! Configuration initialization and hierarchy management
//!
//! Job options are layered with precedence CLI > environment > settings
//! file > defaults. Environment variables arrive through clap, so by the
//! time a value reaches this module the first two layers are already merged.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, info};

use crate::adapters::toml_settings::{Settings, SettingsStore};
use crate::cli::RunArgs;
use crate::domain::model::{AspectMode, JobConfig, JobRequest};
use crate::error::HighlightResult;

/// Settings store at `path`, or `highlighter.toml` in the current directory
pub fn settings_store(path: Option<&Path>) -> SettingsStore {
    match path {
        Some(path) => SettingsStore::new(path),
        None => SettingsStore::in_current_dir(),
    }
}

/// Merge command-line arguments over persisted settings
pub fn job_request(args: &RunArgs, settings: &Settings) -> HighlightResult<JobRequest> {
    let aspect_text = args
        .aspect
        .as_deref()
        .unwrap_or(&settings.settings.aspect_ratio);
    let aspect_mode = AspectMode::from_str(aspect_text)?;

    Ok(JobRequest {
        url: args.url.clone(),
        clip_duration: args.duration,
        num_clips: args.clips.unwrap_or(settings.settings.num_clips),
        ffmpeg_path: args
            .ffmpeg
            .clone()
            .or_else(|| settings.paths.ffmpeg_path.clone()),
        cookies_path: args
            .cookies
            .clone()
            .or_else(|| settings.paths.cookies_path.clone()),
        output_dir: Some(
            args.output
                .clone()
                .unwrap_or_else(|| settings.paths.output_path.clone()),
        ),
        work_dir: args.work_dir.clone().unwrap_or_else(|| PathBuf::from(".")),
        quality: args
            .quality
            .clone()
            .unwrap_or_else(|| settings.settings.quality.clone()),
        aspect_mode,
    })
}

/// Settings to persist after `request` has been accepted
pub fn remembered_settings(request: &JobRequest) -> Settings {
    let mut settings = Settings::default();
    settings.paths.ffmpeg_path = request.ffmpeg_path.clone();
    settings.paths.cookies_path = request.cookies_path.clone();
    if let Some(output) = &request.output_dir {
        settings.paths.output_path = output.clone();
    }
    settings.settings.quality = request.quality.clone();
    settings.settings.num_clips = request.num_clips;
    settings.settings.aspect_ratio = request.aspect_mode.as_str().to_string();
    settings
}

/// Build a validated job configuration, saving the accepted options.
///
/// Nothing is written when validation fails.
pub fn initialize_job_configuration(
    args: &RunArgs,
    store: &SettingsStore,
) -> HighlightResult<JobConfig> {
    info!("Loading settings from {}", store.path().display());
    let settings = store.load()?;
    debug!("Loaded settings: {:?}", settings);

    let request = job_request(args, &settings)?;
    let remembered = remembered_settings(&request);
    let config = JobConfig::from_request(request)?;

    store.save(&remembered)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::QualityTier;
    use crate::error::HighlightError;
    use tempfile::TempDir;

    fn run_args(url: &str) -> RunArgs {
        RunArgs {
            url: url.to_string(),
            duration: 30,
            clips: None,
            ffmpeg: None,
            cookies: None,
            output: None,
            quality: None,
            aspect: None,
            work_dir: None,
            yt_dlp: None,
        }
    }

    #[test]
    fn test_defaults_fill_missing_arguments() {
        let request = job_request(&run_args("https://v"), &Settings::default()).unwrap();
        assert_eq!(request.num_clips, 1);
        assert_eq!(request.quality, "1080p");
        assert_eq!(request.aspect_mode, AspectMode::Original);
        assert_eq!(request.output_dir, Some(PathBuf::from("./highlights")));
        assert_eq!(request.work_dir, PathBuf::from("."));
        assert!(request.ffmpeg_path.is_none());
    }

    #[test]
    fn test_arguments_override_settings() {
        let mut settings = Settings::default();
        settings.settings.num_clips = 3;
        settings.settings.quality = "720p".to_string();
        settings.paths.ffmpeg_path = Some(PathBuf::from("/from/settings"));

        let mut args = run_args("https://v");
        args.clips = Some(5);
        args.aspect = Some("pad".to_string());

        let request = job_request(&args, &settings).unwrap();
        assert_eq!(request.num_clips, 5);
        assert_eq!(request.quality, "720p");
        assert_eq!(request.aspect_mode, AspectMode::PadVertical9x16);
        assert_eq!(request.ffmpeg_path, Some(PathBuf::from("/from/settings")));
    }

    #[test]
    fn test_unknown_aspect_is_configuration_error() {
        let mut args = run_args("https://v");
        args.aspect = Some("square".to_string());
        let err = job_request(&args, &Settings::default()).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_valid_job_saves_settings() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::new(dir.path().join("highlighter.toml"));

        let mut args = run_args("https://v");
        args.ffmpeg = Some(dir.path().to_path_buf());
        args.output = Some(dir.path().join("clips"));
        args.clips = Some(2);
        args.quality = Some("720p".to_string());
        args.aspect = Some("crop-9x16".to_string());

        let config = initialize_job_configuration(&args, &store).unwrap();
        assert_eq!(config.num_clips, 2);
        assert_eq!(config.quality, QualityTier::P720);
        assert_eq!(config.tools.bin_dir, dir.path());

        let saved = store.load().unwrap();
        assert_eq!(saved.settings.num_clips, 2);
        assert_eq!(saved.settings.aspect_ratio, "crop-9x16");
        assert_eq!(saved.paths.output_path, dir.path().join("clips"));
    }

    #[test]
    fn test_invalid_job_leaves_settings_untouched() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::new(dir.path().join("highlighter.toml"));

        let mut args = run_args("https://v");
        args.ffmpeg = Some(dir.path().to_path_buf());
        args.duration = 2;

        let err = initialize_job_configuration(&args, &store).unwrap_err();
        assert!(matches!(err, HighlightError::Configuration { .. }));
        assert!(!store.path().exists());
    }
}
