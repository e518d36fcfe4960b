// Unit tests for domain models

use super::*;
use tempfile::TempDir;

fn request_with_tools(tools_dir: &TempDir) -> JobRequest {
    JobRequest {
        url: "https://example.com/watch?v=abc".to_string(),
        clip_duration: 30,
        num_clips: 2,
        ffmpeg_path: Some(tools_dir.path().to_path_buf()),
        cookies_path: None,
        output_dir: Some(PathBuf::from("highlights")),
        work_dir: PathBuf::from("."),
        quality: "1080p".to_string(),
        aspect_mode: AspectMode::Original,
    }
}

#[test]
fn test_quality_tier_parse_with_fallback() {
    assert_eq!(QualityTier::parse("1080p"), QualityTier::P1080);
    assert_eq!(QualityTier::parse("720p"), QualityTier::P720);
    assert_eq!(QualityTier::parse("4k"), QualityTier::P720);
    assert_eq!(QualityTier::parse(""), QualityTier::P720);
    assert_eq!(QualityTier::P1080.height_ceiling(), 1080);
    assert_eq!(QualityTier::P720.height_ceiling(), 720);
}

#[test]
fn test_aspect_mode_parsing() {
    assert_eq!("original".parse::<AspectMode>().unwrap(), AspectMode::Original);
    assert_eq!("CROP".parse::<AspectMode>().unwrap(), AspectMode::CropVertical9x16);
    assert_eq!("pad-9x16".parse::<AspectMode>().unwrap(), AspectMode::PadVertical9x16);
    assert!("square".parse::<AspectMode>().is_err());

    for mode in [
        AspectMode::Original,
        AspectMode::CropVertical9x16,
        AspectMode::PadVertical9x16,
    ] {
        assert_eq!(mode.as_str().parse::<AspectMode>().unwrap(), mode);
    }
}

#[test]
fn test_job_config_from_valid_request() {
    let tools = TempDir::new().unwrap();
    let mut request = request_with_tools(&tools);
    request.url = "  https://example.com/v  ".to_string();
    request.quality = "8k".to_string();
    request.cookies_path = Some(PathBuf::new());

    let config = JobConfig::from_request(request).unwrap();
    assert_eq!(config.url, "https://example.com/v");
    assert_eq!(config.quality, QualityTier::P720);
    assert_eq!(config.tools.bin_dir, tools.path());
    assert!(config.cookies_path.is_none());
}

#[test]
fn test_job_config_rejects_invalid_requests() {
    let tools = TempDir::new().unwrap();

    let mut request = request_with_tools(&tools);
    request.url = "   ".to_string();
    assert!(JobConfig::from_request(request).unwrap_err().is_configuration());

    let mut request = request_with_tools(&tools);
    request.clip_duration = 0;
    assert!(JobConfig::from_request(request).unwrap_err().is_configuration());

    let mut request = request_with_tools(&tools);
    request.num_clips = 11;
    assert!(JobConfig::from_request(request).unwrap_err().is_configuration());

    let mut request = request_with_tools(&tools);
    request.output_dir = None;
    assert!(JobConfig::from_request(request).unwrap_err().is_configuration());

    let mut request = request_with_tools(&tools);
    request.ffmpeg_path = Some(tools.path().join("missing"));
    assert!(JobConfig::from_request(request).unwrap_err().is_configuration());
}

#[test]
fn test_highlight_window_timecodes() {
    let window = HighlightWindow {
        start_seconds: 35,
        end_seconds: 65,
        peak_second: 50,
        peak_energy: 5.0,
    };
    assert_eq!(window.duration_seconds(), 30);
    assert_eq!(window.start_timecode(), "00:00:35");
    assert_eq!(window.end_timecode(), "00:01:05");
    assert_eq!(window.to_string(), "00:00:35 - 00:01:05");
}

#[test]
fn test_pipeline_state_transitions() {
    use PipelineState::*;

    let order = [
        Idle,
        FetchingTitle,
        AcquiringAudio,
        Analyzing,
        AcquiringVideo,
        Rendering,
        CleaningUp,
        Done,
    ];
    for pair in order.windows(2) {
        assert!(pair[0].can_transition_to(pair[1]));
        assert!(pair[0].can_transition_to(Failed));
    }

    assert!(!Idle.can_transition_to(Analyzing));
    assert!(!Rendering.can_transition_to(AcquiringAudio));
    assert!(!Done.can_transition_to(Failed));
    assert!(!Failed.can_transition_to(Done));
    assert!(Done.is_terminal() && Failed.is_terminal());
}

#[test]
fn test_job_event_terminal_kinds() {
    assert!(JobEvent::Done(PathBuf::from("out")).is_terminal());
    assert!(JobEvent::Error("boom".to_string()).is_terminal());
    assert!(!JobEvent::Progress(10).is_terminal());
    assert!(!JobEvent::Log("hi".to_string()).is_terminal());
}
