// Clip renderer - Turns one highlight window into one output file

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::app::events::EventSender;
use crate::domain::model::{AspectMode, HighlightWindow, RenderedClip};
use crate::domain::rules::AspectTransform;
use crate::error::HighlightResult;
use crate::ports::{CutRequest, Transcoder, VideoTreatment};

/// Renders clips through a [`Transcoder`]
pub struct ClipRenderer {
    transcoder: Arc<dyn Transcoder>,
}

impl ClipRenderer {
    pub fn new(transcoder: Arc<dyn Transcoder>) -> Self {
        Self { transcoder }
    }

    /// Cut `window` out of `source` into `destination`.
    ///
    /// A reframe that cannot be planned because the source resolution is
    /// unknown falls back to the original framing for this clip only; the
    /// framing actually used is reported in the returned clip.
    pub async fn render(
        &self,
        source: &Path,
        destination: PathBuf,
        window: &HighlightWindow,
        aspect_mode: AspectMode,
        events: &EventSender,
    ) -> HighlightResult<RenderedClip> {
        let (video, applied_mode) = self.plan_video(source, aspect_mode, events).await;

        let request = CutRequest {
            source: source.to_path_buf(),
            destination,
            start_timecode: window.start_timecode(),
            duration_seconds: window.duration_seconds(),
            video,
        };
        debug!("Cut request: {:?}", request);

        self.transcoder.cut(&request).await?;

        Ok(RenderedClip {
            path: request.destination,
            window: window.clone(),
            aspect_mode: applied_mode,
        })
    }

    async fn plan_video(
        &self,
        source: &Path,
        aspect_mode: AspectMode,
        events: &EventSender,
    ) -> (VideoTreatment, AspectMode) {
        if !aspect_mode.is_reframed() {
            return (VideoTreatment::Copy, AspectMode::Original);
        }

        let resolution = match self.transcoder.probe_resolution(source).await {
            Ok(resolution) => resolution,
            Err(e) => {
                events.warn(format!(
                    "Could not read video resolution ({}), keeping original framing",
                    e
                ));
                return (VideoTreatment::Copy, AspectMode::Original);
            }
        };

        match AspectTransform::for_source(aspect_mode, resolution.width, resolution.height) {
            Some(transform) => {
                events.log(format!(
                    "Reframing {}x{} source with {}",
                    resolution.width,
                    resolution.height,
                    transform.filter()
                ));
                (VideoTreatment::Reframe(transform), aspect_mode)
            }
            None => (VideoTreatment::Copy, AspectMode::Original),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::events;
    use crate::error::HighlightError;
    use crate::ports::Resolution;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingTranscoder {
        resolution: Option<Resolution>,
        fail_cut: bool,
        cuts: Mutex<Vec<CutRequest>>,
    }

    impl RecordingTranscoder {
        fn new(resolution: Option<Resolution>) -> Self {
            Self {
                resolution,
                fail_cut: false,
                cuts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Transcoder for RecordingTranscoder {
        async fn cut(&self, request: &CutRequest) -> HighlightResult<()> {
            self.cuts.lock().unwrap().push(request.clone());
            if self.fail_cut {
                return Err(HighlightError::render("ffmpeg exited with 1", "bad input"));
            }
            Ok(())
        }

        async fn probe_duration(&self, _file: &Path) -> HighlightResult<f64> {
            Ok(120.0)
        }

        async fn probe_resolution(&self, _file: &Path) -> HighlightResult<Resolution> {
            self.resolution
                .ok_or_else(|| HighlightError::render("ffprobe exited with 1", "no stream"))
        }
    }

    fn window() -> HighlightWindow {
        HighlightWindow {
            start_seconds: 35,
            end_seconds: 65,
            peak_second: 50,
            peak_energy: 1.0,
        }
    }

    const HD: Resolution = Resolution {
        width: 1920,
        height: 1080,
    };

    #[tokio::test]
    async fn test_original_copies_video_without_probing() {
        let transcoder = Arc::new(RecordingTranscoder::new(None));
        let renderer = ClipRenderer::new(transcoder.clone());
        let (events, _rx) = events::channel();

        let clip = renderer
            .render(
                Path::new("full.mp4"),
                PathBuf::from("out/a_highlight_1.mp4"),
                &window(),
                AspectMode::Original,
                &events,
            )
            .await
            .unwrap();

        assert_eq!(clip.aspect_mode, AspectMode::Original);
        let cuts = transcoder.cuts.lock().unwrap();
        assert_eq!(cuts[0].video, VideoTreatment::Copy);
        assert_eq!(cuts[0].start_timecode, "00:00:35");
        assert_eq!(cuts[0].duration_seconds, 30);
    }

    #[tokio::test]
    async fn test_crop_uses_source_resolution() {
        let transcoder = Arc::new(RecordingTranscoder::new(Some(HD)));
        let renderer = ClipRenderer::new(transcoder.clone());
        let (events, _rx) = events::channel();

        let clip = renderer
            .render(
                Path::new("full.mp4"),
                PathBuf::from("out/a_highlight_1.mp4"),
                &window(),
                AspectMode::CropVertical9x16,
                &events,
            )
            .await
            .unwrap();

        assert_eq!(clip.aspect_mode, AspectMode::CropVertical9x16);
        assert_eq!(
            transcoder.cuts.lock().unwrap()[0].video,
            VideoTreatment::Reframe(AspectTransform::Crop {
                width: 607,
                height: 1080
            })
        );
    }

    #[tokio::test]
    async fn test_unreadable_resolution_falls_back_to_original() {
        let transcoder = Arc::new(RecordingTranscoder::new(None));
        let renderer = ClipRenderer::new(transcoder.clone());
        let (events, mut rx) = events::channel();

        let clip = renderer
            .render(
                Path::new("full.mp4"),
                PathBuf::from("out/a_highlight_1.mp4"),
                &window(),
                AspectMode::PadVertical9x16,
                &events,
            )
            .await
            .unwrap();

        assert_eq!(clip.aspect_mode, AspectMode::Original);
        assert_eq!(transcoder.cuts.lock().unwrap()[0].video, VideoTreatment::Copy);
        match rx.try_recv().unwrap() {
            crate::domain::model::JobEvent::Log(line) => assert!(line.starts_with("Warning:")),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_cut_failure_propagates() {
        let mut transcoder = RecordingTranscoder::new(Some(HD));
        transcoder.fail_cut = true;
        let renderer = ClipRenderer::new(Arc::new(transcoder));
        let (events, _rx) = events::channel();

        let result = renderer
            .render(
                Path::new("full.mp4"),
                PathBuf::from("out/a_highlight_1.mp4"),
                &window(),
                AspectMode::Original,
                &events,
            )
            .await;

        assert!(matches!(result, Err(HighlightError::Render { .. })));
    }
}
