//! Greedy peak picking over an energy curve

use tracing::debug;

use super::energy::EnergyCurve;
use crate::domain::model::HighlightWindow;

/// Selects up to `max_windows` loud, non-overlapping windows.
///
/// Each round takes the loudest remaining second, centers a window of
/// `clip_duration` on it and silences one full clip duration on either
/// side of the peak. Windows are not clamped to the curve length.
#[derive(Debug, Clone, Copy)]
pub struct HighlightDetector {
    clip_duration: u32,
    max_windows: usize,
}

impl HighlightDetector {
    pub fn new(clip_duration: u32, max_windows: usize) -> Self {
        Self {
            clip_duration,
            max_windows,
        }
    }

    /// Windows in selection order, loudest first
    pub fn detect(&self, curve: &EnergyCurve) -> Vec<HighlightWindow> {
        let mut windows = Vec::new();
        if self.clip_duration == 0 {
            return windows;
        }

        let mut remaining = curve.values().to_vec();
        let duration = self.clip_duration as usize;

        for _ in 0..self.max_windows {
            let Some((peak, energy)) = loudest(&remaining) else {
                break;
            };
            if energy == 0.0 {
                debug!("Energy exhausted after {} window(s)", windows.len());
                break;
            }

            let start = peak.saturating_sub(duration / 2);
            let window = HighlightWindow {
                start_seconds: start as u64,
                end_seconds: (start + duration) as u64,
                peak_second: peak,
                peak_energy: energy,
            };
            debug!("Picked {} (peak {}s, energy {:.4})", window, peak, energy);
            windows.push(window);

            let suppress_from = peak.saturating_sub(duration);
            let suppress_to = (peak + duration).min(remaining.len());
            remaining[suppress_from..suppress_to].fill(0.0);
        }

        windows
    }
}

/// First index holding the maximum value
fn loudest(values: &[f32]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (index, value) in values.iter().copied().enumerate() {
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((index, value)),
        }
    }
    best
}
