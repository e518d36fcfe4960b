// Domain models - Core types and data structures

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{HighlightError, HighlightResult};
use crate::utils::path::ToolLocation;
use crate::utils::time::to_timecode;

/// Accepted clip duration range, in seconds
pub const CLIP_DURATION_RANGE: std::ops::RangeInclusive<u32> = 5..=600;

/// Accepted number of clips per job
pub const CLIP_COUNT_RANGE: std::ops::RangeInclusive<u32> = 1..=10;

/// Ceiling on the vertical resolution of the downloaded video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QualityTier {
    P1080,
    #[default]
    P720,
}

impl QualityTier {
    /// Parse a tier name; anything unrecognized falls back to 720p
    pub fn parse(tier: &str) -> Self {
        match tier.trim().to_lowercase().as_str() {
            "1080p" | "1080" => QualityTier::P1080,
            _ => QualityTier::P720,
        }
    }

    pub fn height_ceiling(&self) -> u32 {
        match self {
            QualityTier::P1080 => 1080,
            QualityTier::P720 => 720,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityTier::P1080 => "1080p",
            QualityTier::P720 => "720p",
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How each clip is reframed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AspectMode {
    /// Keep the source framing, video stream copied
    #[default]
    Original,
    /// Center-crop to 9:16
    CropVertical9x16,
    /// Letterbox to 9:16 with black bars
    PadVertical9x16,
}

impl AspectMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectMode::Original => "original",
            AspectMode::CropVertical9x16 => "crop-9x16",
            AspectMode::PadVertical9x16 => "pad-9x16",
        }
    }

    pub fn is_reframed(&self) -> bool {
        !matches!(self, AspectMode::Original)
    }
}

impl FromStr for AspectMode {
    type Err = HighlightError;

    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode.trim().to_lowercase().as_str() {
            "original" => Ok(AspectMode::Original),
            "crop" | "crop-9x16" => Ok(AspectMode::CropVertical9x16),
            "pad" | "pad-9x16" => Ok(AspectMode::PadVertical9x16),
            _ => Err(HighlightError::configuration(format!(
                "Invalid aspect mode: {}. Valid modes: original, crop-9x16, pad-9x16",
                mode
            ))),
        }
    }
}

impl fmt::Display for AspectMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unvalidated job parameters as collected from the command line and settings
#[derive(Debug, Clone)]
pub struct JobRequest {
    pub url: String,
    pub clip_duration: u32,
    pub num_clips: u32,
    pub ffmpeg_path: Option<PathBuf>,
    pub cookies_path: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub work_dir: PathBuf,
    pub quality: String,
    pub aspect_mode: AspectMode,
}

/// Immutable description of one highlight job
#[derive(Debug, Clone)]
pub struct JobConfig {
    pub url: String,
    pub clip_duration: u32,
    pub num_clips: u32,
    pub tools: ToolLocation,
    pub cookies_path: Option<PathBuf>,
    pub output_dir: PathBuf,
    /// Directory in which the per-job scratch directory is created
    pub work_dir: PathBuf,
    pub quality: QualityTier,
    pub aspect_mode: AspectMode,
}

impl JobConfig {
    /// Validate a request and resolve the transcoder location.
    ///
    /// Everything here fails with `HighlightError::Configuration`, before any
    /// job is started.
    pub fn from_request(request: JobRequest) -> HighlightResult<Self> {
        let url = request.url.trim().to_string();
        if url.is_empty() {
            return Err(HighlightError::configuration("A video URL is required"));
        }

        if !CLIP_DURATION_RANGE.contains(&request.clip_duration) {
            return Err(HighlightError::configuration(format!(
                "Clip duration must be between {} and {} seconds, got {}",
                CLIP_DURATION_RANGE.start(),
                CLIP_DURATION_RANGE.end(),
                request.clip_duration
            )));
        }

        if !CLIP_COUNT_RANGE.contains(&request.num_clips) {
            return Err(HighlightError::configuration(format!(
                "Number of clips must be between {} and {}, got {}",
                CLIP_COUNT_RANGE.start(),
                CLIP_COUNT_RANGE.end(),
                request.num_clips
            )));
        }

        let tools = match &request.ffmpeg_path {
            Some(path) => ToolLocation::resolve(path)?,
            None => ToolLocation::discover().ok_or_else(|| {
                HighlightError::configuration(
                    "ffmpeg was not found on PATH; pass --ffmpeg with its location",
                )
            })?,
        };

        let output_dir = match request.output_dir {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => {
                return Err(HighlightError::configuration(
                    "An output directory is required",
                ))
            }
        };

        let cookies_path = request
            .cookies_path
            .filter(|path| !path.as_os_str().is_empty());

        Ok(Self {
            url,
            clip_duration: request.clip_duration,
            num_clips: request.num_clips,
            tools,
            cookies_path,
            output_dir,
            work_dir: request.work_dir,
            quality: QualityTier::parse(&request.quality),
            aspect_mode: request.aspect_mode,
        })
    }
}

/// A time range selected for extraction
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightWindow {
    pub start_seconds: u64,
    pub end_seconds: u64,
    /// Curve index the window was centered on
    pub peak_second: usize,
    pub peak_energy: f32,
}

impl HighlightWindow {
    pub fn duration_seconds(&self) -> u64 {
        self.end_seconds - self.start_seconds
    }

    pub fn start_timecode(&self) -> String {
        to_timecode(self.start_seconds)
    }

    pub fn end_timecode(&self) -> String {
        to_timecode(self.end_seconds)
    }
}

impl fmt::Display for HighlightWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start_timecode(), self.end_timecode())
    }
}

/// Stage of a highlight job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    FetchingTitle,
    AcquiringAudio,
    Analyzing,
    AcquiringVideo,
    Rendering,
    CleaningUp,
    Done,
    Failed,
}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed)
    }

    /// The state that follows a successful stage
    pub fn successor(&self) -> Option<PipelineState> {
        use PipelineState::*;
        match self {
            Idle => Some(FetchingTitle),
            FetchingTitle => Some(AcquiringAudio),
            AcquiringAudio => Some(Analyzing),
            Analyzing => Some(AcquiringVideo),
            AcquiringVideo => Some(Rendering),
            Rendering => Some(CleaningUp),
            CleaningUp => Some(Done),
            Done | Failed => None,
        }
    }

    /// Transitions are linear; `Failed` is reachable from any live state.
    pub fn can_transition_to(&self, next: PipelineState) -> bool {
        match next {
            PipelineState::Failed => !self.is_terminal(),
            next => self.successor() == Some(next),
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Event emitted by a running job to whatever front-end wraps it
#[derive(Debug, Clone, PartialEq)]
pub enum JobEvent {
    Log(String),
    Progress(u8),
    Done(PathBuf),
    Error(String),
}

impl JobEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobEvent::Done(_) | JobEvent::Error(_))
    }
}

/// A clip written by the render stage
#[derive(Debug, Clone)]
pub struct RenderedClip {
    pub path: PathBuf,
    pub window: HighlightWindow,
    /// Framing actually applied, which may differ from the requested one
    pub aspect_mode: AspectMode,
}

#[cfg(test)]
mod tests;
