use std::path::PathBuf;
use std::sync::Arc;

use crate::adapters::{FfmpegAdapter, YtDlpAdapter};
use crate::app::pipeline::PipelineOrchestrator;
use crate::domain::model::JobConfig;
use crate::ports::{MediaSource, Transcoder};
use crate::utils::path::ToolLocation;

/// Executable name used when no yt-dlp path is configured
pub const DEFAULT_YT_DLP: &str = "yt-dlp";

pub trait AppContainer: Send + Sync {
    fn media_source(&self) -> Arc<dyn MediaSource>;
    fn transcoder(&self) -> Arc<dyn Transcoder>;

    /// Orchestrator for one job, wired to this container's adapters
    fn orchestrator(&self, config: JobConfig) -> PipelineOrchestrator {
        PipelineOrchestrator::new(config, self.media_source(), self.transcoder())
    }
}

/// Container wiring the command-line tool adapters
pub struct DefaultAppContainer {
    media_source: Arc<dyn MediaSource>,
    transcoder: Arc<dyn Transcoder>,
}

impl DefaultAppContainer {
    pub fn new(tools: &ToolLocation, yt_dlp: Option<PathBuf>) -> Self {
        let yt_dlp = yt_dlp.unwrap_or_else(|| PathBuf::from(DEFAULT_YT_DLP));
        Self {
            media_source: Arc::new(YtDlpAdapter::new(yt_dlp)),
            transcoder: Arc::new(FfmpegAdapter::new(tools)),
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn media_source(&self) -> Arc<dyn MediaSource> {
        Arc::clone(&self.media_source)
    }

    fn transcoder(&self) -> Arc<dyn Transcoder> {
        Arc::clone(&self.transcoder)
    }
}
