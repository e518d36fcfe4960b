//! yt-dlp media source adapter
//!
//! Drives the `yt-dlp` executable for metadata lookup and downloads.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::{HighlightError, HighlightResult};
use crate::ports::{AcquisitionOptions, MediaMetadata, MediaSource};

/// Media source backed by the yt-dlp command-line tool
pub struct YtDlpAdapter {
    program: PathBuf,
}

impl YtDlpAdapter {
    /// Create new yt-dlp adapter for the given executable
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Run yt-dlp and return its stdout
    async fn run(&self, args: Vec<OsString>) -> HighlightResult<Vec<u8>> {
        debug!("Running {} {:?}", self.program.display(), args);

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                HighlightError::acquisition(format!(
                    "Failed to run {}: {}",
                    self.program.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            return Err(HighlightError::acquisition(format!(
                "yt-dlp exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(output.stdout)
    }
}

#[async_trait]
impl MediaSource for YtDlpAdapter {
    async fn fetch_metadata(
        &self,
        url: &str,
        options: &AcquisitionOptions,
    ) -> HighlightResult<MediaMetadata> {
        let stdout = self.run(metadata_args(url, options)).await?;
        parse_metadata(&stdout)
    }

    async fn download_audio(
        &self,
        url: &str,
        options: &AcquisitionOptions,
        output_stem: &Path,
    ) -> HighlightResult<PathBuf> {
        self.run(audio_args(url, options, output_stem)).await?;
        expect_file(with_extension_suffix(output_stem, "wav"))
    }

    async fn download_video(
        &self,
        url: &str,
        options: &AcquisitionOptions,
        format_selector: &str,
        output_stem: &Path,
    ) -> HighlightResult<PathBuf> {
        self.run(video_args(url, options, format_selector, output_stem))
            .await?;
        expect_file(with_extension_suffix(output_stem, "mp4"))
    }
}

fn common_args(options: &AcquisitionOptions) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "--no-warnings".into(),
        "--no-playlist".into(),
        "--no-progress".into(),
        "--add-headers".into(),
        format!("User-Agent:{}", options.user_agent).into(),
    ];

    if options.no_check_certificate {
        args.push("--no-check-certificates".into());
    }
    if let Some(cookies) = &options.cookie_file {
        args.push("--cookies".into());
        args.push(cookies.as_os_str().to_owned());
    }

    args.push("--ffmpeg-location".into());
    args.push(options.transcoder_dir.as_os_str().to_owned());
    args
}

fn metadata_args(url: &str, options: &AcquisitionOptions) -> Vec<OsString> {
    let mut args = common_args(options);
    args.extend(["--dump-single-json", "--skip-download", url].map(OsString::from));
    args
}

fn audio_args(url: &str, options: &AcquisitionOptions, output_stem: &Path) -> Vec<OsString> {
    let mut args = common_args(options);
    args.extend(
        [
            "-f",
            "bestaudio/best",
            "--extract-audio",
            "--audio-format",
            "wav",
            "--audio-quality",
            "192K",
            "-o",
        ]
        .map(OsString::from),
    );
    args.push(output_template(output_stem));
    args.push(url.into());
    args
}

fn video_args(
    url: &str,
    options: &AcquisitionOptions,
    format_selector: &str,
    output_stem: &Path,
) -> Vec<OsString> {
    let mut args = common_args(options);
    args.extend(["-f", format_selector, "--merge-output-format", "mp4", "-o"].map(OsString::from));
    args.push(output_template(output_stem));
    args.push(url.into());
    args
}

/// `<stem>.%(ext)s`, with `%` in the stem escaped for yt-dlp's templating
fn output_template(output_stem: &Path) -> OsString {
    let escaped = output_stem.to_string_lossy().replace('%', "%%");
    OsString::from(format!("{}.%(ext)s", escaped))
}

/// Append `.ext` without treating dots already in the stem as an extension
fn with_extension_suffix(stem: &Path, ext: &str) -> PathBuf {
    let mut path = stem.as_os_str().to_owned();
    path.push(OsStr::new("."));
    path.push(ext);
    PathBuf::from(path)
}

fn expect_file(path: PathBuf) -> HighlightResult<PathBuf> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(HighlightError::acquisition(format!(
            "Download finished but {} was not written",
            path.display()
        )))
    }
}

fn parse_metadata(stdout: &[u8]) -> HighlightResult<MediaMetadata> {
    let json: serde_json::Value = serde_json::from_slice(stdout).map_err(|e| {
        HighlightError::acquisition(format!("Unreadable metadata from yt-dlp: {}", e))
    })?;

    Ok(MediaMetadata {
        title: json
            .get("title")
            .and_then(|t| t.as_str())
            .map(str::to_string),
    })
}
