// Pipeline orchestrator - Drives one highlight job from URL to clips

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::app::events::{self, EventSender};
use crate::app::renderer::ClipRenderer;
use crate::domain::model::{
    HighlightWindow, JobConfig, JobEvent, PipelineState, RenderedClip,
};
use crate::domain::rules::{
    clip_file_name, format_selector, full_video_stem, sanitize_title, FALLBACK_TITLE,
};
use crate::error::{HighlightError, HighlightResult};
use crate::highlight;
use crate::ports::{AcquisitionOptions, MediaSource, Transcoder};
use crate::utils::format_file_size;

/// Output stem of the extracted audio track inside the scratch directory
pub const AUDIO_STEM: &str = "temp_audio";

const PROGRESS_AUDIO: u8 = 10;
const PROGRESS_VIDEO: u8 = 40;
const PROGRESS_RENDER: u8 = 75;
const PROGRESS_DONE: u8 = 100;

/// Runs the stages of a job strictly in order
pub struct PipelineOrchestrator {
    config: JobConfig,
    source: Arc<dyn MediaSource>,
    transcoder: Arc<dyn Transcoder>,
    state: PipelineState,
    rendered: Vec<RenderedClip>,
}

impl PipelineOrchestrator {
    pub fn new(
        config: JobConfig,
        source: Arc<dyn MediaSource>,
        transcoder: Arc<dyn Transcoder>,
    ) -> Self {
        Self {
            config,
            source,
            transcoder,
            state: PipelineState::Idle,
            rendered: Vec::new(),
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn config(&self) -> &JobConfig {
        &self.config
    }

    /// Clips written by the last run
    pub fn rendered(&self) -> &[RenderedClip] {
        &self.rendered
    }

    /// Run the job to completion.
    ///
    /// Emits exactly one terminal event. Temporary files are removed on
    /// both the success and the failure path.
    pub async fn run(&mut self, events: &EventSender) -> PipelineState {
        let scratch = match self.create_scratch_dir().await {
            Ok(scratch) => scratch,
            Err(e) => {
                self.transition(PipelineState::Failed);
                events.error(e.to_string());
                return self.state;
            }
        };

        let mut temp_files = Vec::new();
        let result = self.execute(scratch.path(), &mut temp_files, events).await;

        match result {
            Ok(clips) => {
                self.rendered = clips;
                self.transition(PipelineState::CleaningUp);
                clean_up(scratch, &temp_files, events).await;

                events.progress(PROGRESS_DONE);
                self.transition(PipelineState::Done);
                events.log(format!(
                    "Finished: {} clip(s) saved to {}",
                    self.rendered.len(),
                    self.config.output_dir.display()
                ));
                events.done(self.config.output_dir.clone());
            }
            Err(e) => {
                self.transition(PipelineState::Failed);
                clean_up(scratch, &temp_files, events).await;
                events.error(e.to_string());
            }
        }

        self.state
    }

    async fn execute(
        &mut self,
        scratch: &Path,
        temp_files: &mut Vec<PathBuf>,
        events: &EventSender,
    ) -> HighlightResult<Vec<RenderedClip>> {
        let url = self.config.url.clone();
        let options = AcquisitionOptions::new(
            self.config.tools.bin_dir.clone(),
            self.config.cookies_path.as_deref(),
        );

        self.transition(PipelineState::FetchingTitle);
        events.log(format!("Fetching video info for {}", url));
        let metadata = self.source.fetch_metadata(&url, &options).await?;
        let title = sanitize_title(metadata.title.as_deref().unwrap_or(FALLBACK_TITLE));
        events.log(format!("Video title: {}", title));

        self.transition(PipelineState::AcquiringAudio);
        events.progress(PROGRESS_AUDIO);
        events.log("Downloading audio track");
        let audio = self
            .source
            .download_audio(&url, &options, &scratch.join(AUDIO_STEM))
            .await?;
        temp_files.push(audio.clone());

        self.transition(PipelineState::Analyzing);
        events.log("Analyzing audio energy");
        let windows =
            analyze(audio, self.config.clip_duration, self.config.num_clips as usize).await?;
        if windows.is_empty() {
            return Err(HighlightError::NoHighlightFound);
        }
        for (index, window) in windows.iter().enumerate() {
            events.log(format!("Highlight {}: {}", index + 1, window));
        }

        self.transition(PipelineState::AcquiringVideo);
        events.progress(PROGRESS_VIDEO);
        events.log(format!("Downloading video at up to {}", self.config.quality));
        let video = self
            .source
            .download_video(
                &url,
                &options,
                &format_selector(self.config.quality),
                &scratch.join(full_video_stem(&title)),
            )
            .await?;
        temp_files.push(video.clone());

        self.transition(PipelineState::Rendering);
        tokio::fs::create_dir_all(&self.config.output_dir).await?;

        let renderer = ClipRenderer::new(Arc::clone(&self.transcoder));
        let mut clips = Vec::with_capacity(windows.len());
        for (index, window) in windows.iter().enumerate() {
            events.progress(PROGRESS_RENDER);
            events.log(format!(
                "Rendering clip {}/{} ({})",
                index + 1,
                windows.len(),
                window
            ));

            let destination = self
                .config
                .output_dir
                .join(clip_file_name(&title, index + 1));
            let clip = renderer
                .render(&video, destination, window, self.config.aspect_mode, events)
                .await?;

            match tokio::fs::metadata(&clip.path).await {
                Ok(meta) => events.log(format!(
                    "Saved {} ({})",
                    clip.path.display(),
                    format_file_size(meta.len())
                )),
                Err(_) => events.log(format!("Saved {}", clip.path.display())),
            }
            clips.push(clip);
        }

        Ok(clips)
    }

    async fn create_scratch_dir(&self) -> HighlightResult<TempDir> {
        let work_dir = self.config.work_dir.clone();
        tokio::fs::create_dir_all(&work_dir).await?;

        let prefix = format!(
            "highlighter-{}-",
            chrono::Local::now().format("%Y%m%d-%H%M%S")
        );
        let scratch = tokio::task::spawn_blocking(move || {
            tempfile::Builder::new()
                .prefix(&prefix)
                .tempdir_in(&work_dir)
        })
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))??;
        debug!("Scratch directory: {}", scratch.path().display());
        Ok(scratch)
    }

    fn transition(&mut self, next: PipelineState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {} -> {}",
            self.state,
            next
        );
        debug!("Pipeline state: {} -> {}", self.state, next);
        self.state = next;
    }
}

/// Decode and score the audio on a blocking worker thread
async fn analyze(
    audio: PathBuf,
    clip_duration: u32,
    num_clips: usize,
) -> HighlightResult<Vec<HighlightWindow>> {
    tokio::task::spawn_blocking(move || {
        highlight::find_highlights(&audio, clip_duration, num_clips)
    })
    .await
    .map_err(|e| HighlightError::analysis(format!("Analysis worker failed: {}", e)))?
}

/// Remove downloaded files, then the scratch directory. Never fails.
async fn clean_up(scratch: TempDir, temp_files: &[PathBuf], events: &EventSender) {
    for file in temp_files {
        match tokio::fs::remove_file(file).await {
            Ok(()) => events.log(format!("Removed temporary file {}", file.display())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => events.warn(format!("Could not remove {}: {}", file.display(), e)),
        }
    }

    let dir = scratch.path().to_path_buf();
    let closed = tokio::task::spawn_blocking(move || scratch.close())
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
        .and_then(|result| result);
    if let Err(e) = closed {
        events.warn(format!(
            "Could not remove scratch directory {}: {}",
            dir.display(),
            e
        ));
    }
}

/// A job running on a background task
pub struct JobHandle {
    events: UnboundedReceiver<JobEvent>,
    join: JoinHandle<PipelineState>,
}

impl JobHandle {
    /// Next event; `None` once the job has finished and the channel drained
    pub async fn recv(&mut self) -> Option<JobEvent> {
        self.events.recv().await
    }

    /// Wait for the final state. A panicked job counts as failed.
    pub async fn join(self) -> PipelineState {
        self.join.await.unwrap_or(PipelineState::Failed)
    }
}

/// Start `orchestrator` on its own tokio task
pub fn spawn_job(mut orchestrator: PipelineOrchestrator) -> JobHandle {
    let (sender, receiver) = events::channel();
    let join = tokio::spawn(async move { orchestrator.run(&sender).await });
    JobHandle {
        events: receiver,
        join,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(rx: &mut UnboundedReceiver<JobEvent>) -> Vec<JobEvent> {
        let mut received = Vec::new();
        while let Ok(event) = rx.try_recv() {
            received.push(event);
        }
        received
    }

    #[tokio::test]
    async fn test_clean_up_removes_files_then_scratch_dir() {
        let work = TempDir::new().unwrap();
        let scratch = tempfile::Builder::new()
            .prefix("highlighter-test-")
            .tempdir_in(work.path())
            .unwrap();
        let scratch_path = scratch.path().to_path_buf();

        let audio = scratch_path.join("temp_audio.wav");
        std::fs::write(&audio, b"RIFF").unwrap();
        std::fs::write(scratch_path.join("Match_full.mp4.part"), b"partial").unwrap();
        let already_gone = scratch_path.join("Match_full.mp4");

        let (sender, mut rx) = events::channel();
        clean_up(scratch, &[audio.clone(), already_gone], &sender).await;

        assert!(!audio.exists());
        assert!(!scratch_path.exists());

        // A file that never arrived is skipped without a warning
        let received = drain(&mut rx);
        assert_eq!(received.len(), 1);
        assert!(matches!(&received[0], JobEvent::Log(line) if line.starts_with("Removed temporary file")));
    }

    #[tokio::test]
    async fn test_unwritable_work_dir_fails_before_any_stage() {
        let root = TempDir::new().unwrap();
        // A regular file where the work directory should be
        let blocked = root.path().join("work");
        std::fs::write(&blocked, b"").unwrap();

        let config = JobConfig::from_request(crate::domain::model::JobRequest {
            url: "https://video.example/watch?v=1".to_string(),
            clip_duration: 10,
            num_clips: 1,
            ffmpeg_path: Some(root.path().to_path_buf()),
            cookies_path: None,
            output_dir: Some(root.path().join("out")),
            work_dir: blocked,
            quality: "720p".to_string(),
            aspect_mode: crate::domain::model::AspectMode::Original,
        })
        .unwrap();

        let (sender, mut rx) = events::channel();
        let state = scratch_failure_state(config, &sender).await;

        assert_eq!(state, PipelineState::Failed);
        let received = drain(&mut rx);
        assert_eq!(received.len(), 1);
        assert!(matches!(received[0], JobEvent::Error(_)));
    }

    async fn scratch_failure_state(config: JobConfig, events: &EventSender) -> PipelineState {
        struct Unreachable;

        #[async_trait::async_trait]
        impl MediaSource for Unreachable {
            async fn fetch_metadata(
                &self,
                _url: &str,
                _options: &AcquisitionOptions,
            ) -> HighlightResult<crate::ports::MediaMetadata> {
                panic!("no stage may run without a scratch directory")
            }

            async fn download_audio(
                &self,
                _url: &str,
                _options: &AcquisitionOptions,
                _output_stem: &Path,
            ) -> HighlightResult<PathBuf> {
                panic!("no stage may run without a scratch directory")
            }

            async fn download_video(
                &self,
                _url: &str,
                _options: &AcquisitionOptions,
                _format_selector: &str,
                _output_stem: &Path,
            ) -> HighlightResult<PathBuf> {
                panic!("no stage may run without a scratch directory")
            }
        }

        #[async_trait::async_trait]
        impl Transcoder for Unreachable {
            async fn cut(&self, _request: &crate::ports::CutRequest) -> HighlightResult<()> {
                panic!("no stage may run without a scratch directory")
            }

            async fn probe_duration(&self, _file: &Path) -> HighlightResult<f64> {
                panic!("no stage may run without a scratch directory")
            }

            async fn probe_resolution(
                &self,
                _file: &Path,
            ) -> HighlightResult<crate::ports::Resolution> {
                panic!("no stage may run without a scratch directory")
            }
        }

        let mut orchestrator =
            PipelineOrchestrator::new(config, Arc::new(Unreachable), Arc::new(Unreachable));
        orchestrator.run(events).await
    }
}
