// Ports - Interface definitions (contracts)

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::rules::AspectTransform;
use crate::error::HighlightResult;

/// Desktop browser user agent sent with every acquisition request
pub const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115.0.0.0 Safari/537.36";

/// Options shared by all acquisition calls
#[derive(Debug, Clone)]
pub struct AcquisitionOptions {
    pub user_agent: String,
    /// Skip TLS certificate validation
    pub no_check_certificate: bool,
    /// Only set when the configured cookie file exists
    pub cookie_file: Option<PathBuf>,
    /// Directory holding ffmpeg, used by the downloader for its own
    /// extraction and merge steps
    pub transcoder_dir: PathBuf,
}

impl AcquisitionOptions {
    pub fn new(transcoder_dir: PathBuf, cookie_file: Option<&Path>) -> Self {
        Self {
            user_agent: DESKTOP_USER_AGENT.to_string(),
            no_check_certificate: true,
            cookie_file: cookie_file.filter(|p| p.is_file()).map(Path::to_path_buf),
            transcoder_dir,
        }
    }
}

/// Metadata returned by a media lookup
#[derive(Debug, Clone, Default)]
pub struct MediaMetadata {
    pub title: Option<String>,
}

/// Port for fetching remote media
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Look up metadata without downloading
    async fn fetch_metadata(
        &self,
        url: &str,
        options: &AcquisitionOptions,
    ) -> HighlightResult<MediaMetadata>;

    /// Download the best audio and extract it to WAV.
    ///
    /// `output_stem` is the destination path without extension; the
    /// returned path is the `.wav` file actually written.
    async fn download_audio(
        &self,
        url: &str,
        options: &AcquisitionOptions,
        output_stem: &Path,
    ) -> HighlightResult<PathBuf>;

    /// Download video and audio matching `format_selector`, merged to mp4
    async fn download_video(
        &self,
        url: &str,
        options: &AcquisitionOptions,
        format_selector: &str,
        output_stem: &Path,
    ) -> HighlightResult<PathBuf>;
}

/// How the video stream of a cut is treated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoTreatment {
    /// Stream copied untouched
    Copy,
    /// Filtered through an aspect transform and re-encoded
    Reframe(AspectTransform),
}

/// One cut to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutRequest {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Seek position as `HH:MM:SS`
    pub start_timecode: String,
    pub duration_seconds: u64,
    pub video: VideoTreatment,
}

/// Pixel size of the first video stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

/// Port for the external transcoding tool
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Produce one output file; failures carry the tool's diagnostics
    async fn cut(&self, request: &CutRequest) -> HighlightResult<()>;

    /// Container duration in seconds
    async fn probe_duration(&self, file: &Path) -> HighlightResult<f64>;

    async fn probe_resolution(&self, file: &Path) -> HighlightResult<Resolution>;
}
