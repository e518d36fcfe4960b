//! Highlight detection from an audio track
//!
//! The audio is decoded to mono at 22050 Hz, reduced to one RMS value per
//! second, and the loudest non-overlapping windows are picked greedily.

pub mod detector;
pub mod energy;
pub mod waveform;

use std::path::Path;

use tracing::info;

pub use detector::HighlightDetector;
pub use energy::EnergyCurve;
pub use waveform::ANALYSIS_SAMPLE_RATE;

use crate::domain::model::HighlightWindow;
use crate::error::HighlightResult;

/// Decode `audio_file` and compute its per-second energy curve
pub fn energy_curve_for_file(audio_file: &Path) -> HighlightResult<EnergyCurve> {
    let samples = waveform::load_mono(audio_file, ANALYSIS_SAMPLE_RATE)?;
    let curve = EnergyCurve::from_samples(&samples, ANALYSIS_SAMPLE_RATE as usize);
    info!(
        "Energy curve for {}: {} second(s)",
        audio_file.display(),
        curve.len()
    );
    Ok(curve)
}

/// Find up to `num_clips` highlight windows in a WAV file.
///
/// An empty result is not an error here; callers decide what it means.
pub fn find_highlights(
    audio_file: &Path,
    clip_duration: u32,
    num_clips: usize,
) -> HighlightResult<Vec<HighlightWindow>> {
    let curve = energy_curve_for_file(audio_file)?;
    Ok(HighlightDetector::new(clip_duration, num_clips).detect(&curve))
}
