//! FFmpeg transcoder adapter
//!
//! Cuts clips with the `ffmpeg` executable and probes media with `ffprobe`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::{HighlightError, HighlightResult};
use crate::ports::{CutRequest, Resolution, Transcoder, VideoTreatment};
use crate::utils::path::ToolLocation;

/// Audio codec every clip is re-encoded to
pub const AUDIO_CODEC: &str = "aac";

/// Video encoder used whenever a filter is applied
pub const REFRAME_VIDEO_CODEC: &str = "libx264";

/// FFmpeg-based transcoder
pub struct FfmpegAdapter {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
}

impl FfmpegAdapter {
    /// Create new FFmpeg adapter
    pub fn new(tools: &ToolLocation) -> Self {
        Self {
            ffmpeg: tools.ffmpeg.clone(),
            ffprobe: tools.ffprobe.clone(),
        }
    }

    async fn probe(&self, args: Vec<OsString>) -> HighlightResult<Vec<u8>> {
        debug!("Running {} {:?}", self.ffprobe.display(), args);

        let output = Command::new(&self.ffprobe)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                HighlightError::render(
                    format!("Failed to run {}", self.ffprobe.display()),
                    e.to_string(),
                )
            })?;

        if !output.status.success() {
            return Err(HighlightError::render(
                format!("ffprobe exited with {}", output.status),
                String::from_utf8_lossy(&output.stderr).trim(),
            ));
        }

        Ok(output.stdout)
    }
}

#[async_trait]
impl Transcoder for FfmpegAdapter {
    async fn cut(&self, request: &CutRequest) -> HighlightResult<()> {
        let args = cut_args(request);
        debug!("Running {} {:?}", self.ffmpeg.display(), args);

        let output = Command::new(&self.ffmpeg)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                HighlightError::render(
                    format!("Failed to run {}", self.ffmpeg.display()),
                    e.to_string(),
                )
            })?;

        if !output.status.success() {
            return Err(HighlightError::render(
                format!("ffmpeg exited with {}", output.status),
                String::from_utf8_lossy(&output.stderr).trim(),
            ));
        }

        Ok(())
    }

    async fn probe_duration(&self, file: &Path) -> HighlightResult<f64> {
        let stdout = self.probe(duration_probe_args(file)).await?;
        parse_duration(&stdout)
    }

    async fn probe_resolution(&self, file: &Path) -> HighlightResult<Resolution> {
        let stdout = self.probe(resolution_probe_args(file)).await?;
        parse_resolution(&stdout)
    }
}

/// ffmpeg arguments for one cut
pub fn cut_args(request: &CutRequest) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-hide_banner", "-loglevel", "error", "-ss"]
        .map(OsString::from)
        .to_vec();
    args.push(request.start_timecode.clone().into());
    args.push("-i".into());
    args.push(request.source.as_os_str().to_owned());
    args.push("-t".into());
    args.push(request.duration_seconds.to_string().into());

    match &request.video {
        VideoTreatment::Copy => {
            args.extend(["-c:v", "copy"].map(OsString::from));
        }
        VideoTreatment::Reframe(transform) => {
            args.push("-vf".into());
            args.push(transform.filter().into());
            args.extend(["-c:v", REFRAME_VIDEO_CODEC].map(OsString::from));
        }
    }

    args.extend(["-c:a", AUDIO_CODEC, "-movflags", "+faststart", "-y"].map(OsString::from));
    args.push(request.destination.as_os_str().to_owned());
    args
}

fn duration_probe_args(file: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = [
        "-v",
        "error",
        "-show_entries",
        "format=duration",
        "-of",
        "json",
    ]
    .map(OsString::from)
    .to_vec();
    args.push(file.as_os_str().to_owned());
    args
}

fn resolution_probe_args(file: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = [
        "-v",
        "error",
        "-select_streams",
        "v:0",
        "-show_entries",
        "stream=width,height",
        "-of",
        "json",
    ]
    .map(OsString::from)
    .to_vec();
    args.push(file.as_os_str().to_owned());
    args
}

fn parse_probe_json(stdout: &[u8]) -> HighlightResult<serde_json::Value> {
    serde_json::from_slice(stdout).map_err(|e| {
        HighlightError::render(
            "Unreadable ffprobe output",
            format!("{}: {}", e, String::from_utf8_lossy(stdout)),
        )
    })
}

fn parse_duration(stdout: &[u8]) -> HighlightResult<f64> {
    let json = parse_probe_json(stdout)?;
    json["format"]["duration"]
        .as_str()
        .and_then(|d| d.trim().parse::<f64>().ok())
        .ok_or_else(|| {
            HighlightError::render(
                "ffprobe reported no duration",
                String::from_utf8_lossy(stdout),
            )
        })
}

fn parse_resolution(stdout: &[u8]) -> HighlightResult<Resolution> {
    let json = parse_probe_json(stdout)?;
    let stream = json["streams"]
        .as_array()
        .and_then(|s| s.first())
        .ok_or_else(|| {
            HighlightError::render("No video stream found", String::from_utf8_lossy(stdout))
        })?;

    let dimension = |key: &str| {
        stream[key]
            .as_u64()
            .filter(|v| *v > 0)
            .and_then(|v| u32::try_from(v).ok())
    };

    match (dimension("width"), dimension("height")) {
        (Some(width), Some(height)) => Ok(Resolution { width, height }),
        _ => Err(HighlightError::render(
            "ffprobe reported no frame size",
            String::from_utf8_lossy(stdout),
        )),
    }
}
