//! Per-second RMS energy curve

/// Non-negative energy samples, one per whole second of audio
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EnergyCurve {
    values: Vec<f32>,
}

impl EnergyCurve {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    /// RMS over non-overlapping frames of `frame_len` samples.
    ///
    /// Frame `i` covers `[i * frame_len, (i + 1) * frame_len)`; a trailing
    /// partial frame is dropped.
    pub fn from_samples(samples: &[f32], frame_len: usize) -> Self {
        if frame_len == 0 {
            return Self::default();
        }

        let values = samples.chunks_exact(frame_len).map(rms).collect();
        Self { values }
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn rms(frame: &[f32]) -> f32 {
    let sum_squares: f64 = frame.iter().map(|s| (*s as f64) * (*s as f64)).sum();
    (sum_squares / frame.len() as f64).sqrt() as f32
}
