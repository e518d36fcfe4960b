//! WAV decoding to a mono waveform at the analysis sample rate

use std::io::Read;
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec};
use rubato::{FastFixedIn, PolynomialDegree, Resampler};
use tracing::debug;

use crate::error::{HighlightError, HighlightResult};

/// Sample rate the energy analysis runs at
pub const ANALYSIS_SAMPLE_RATE: u32 = 22050;

/// Frames fed to the resampler per call
const RESAMPLE_CHUNK: usize = 4096;

/// Load a WAV file as mono `f32` samples at `target_rate`.
///
/// Integer PCM is normalized to [-1, 1]; channels are averaged.
pub fn load_mono(path: &Path, target_rate: u32) -> HighlightResult<Vec<f32>> {
    let mut reader = WavReader::open(path).map_err(|e| {
        HighlightError::analysis(format!("Failed to open {}: {}", path.display(), e))
    })?;
    let spec = reader.spec();

    debug!(
        "Decoding {}: {} Hz, {} channel(s), {} bit {:?}",
        path.display(),
        spec.sample_rate,
        spec.channels,
        spec.bits_per_sample,
        spec.sample_format
    );

    let interleaved = read_samples(&mut reader, spec)?;
    let mono = downmix(&interleaved, spec.channels);
    resample(&mono, spec.sample_rate, target_rate)
}

fn read_samples<R: Read>(reader: &mut WavReader<R>, spec: WavSpec) -> HighlightResult<Vec<f32>> {
    let decode_error = |e: hound::Error| HighlightError::analysis(format!("Failed to decode WAV: {}", e));

    match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(decode_error),
        SampleFormat::Int => {
            if spec.bits_per_sample == 0 || spec.bits_per_sample > 32 {
                return Err(HighlightError::analysis(format!(
                    "Unsupported bit depth: {}",
                    spec.bits_per_sample
                )));
            }
            let scale = 1.0 / (1u64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|sample| sample.map(|value| value as f32 * scale))
                .collect::<Result<Vec<_>, _>>()
                .map_err(decode_error)
        }
    }
}

/// Average interleaved channels into one
pub fn downmix(interleaved: &[f32], channels: u16) -> Vec<f32> {
    let channels = channels.max(1) as usize;
    if channels == 1 {
        return interleaved.to_vec();
    }

    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Resample a mono signal with rubato, chunk by chunk
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> HighlightResult<Vec<f32>> {
    if from_rate == to_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }
    if from_rate == 0 {
        return Err(HighlightError::analysis("WAV header reports a 0 Hz sample rate"));
    }

    debug!("Resampling {} samples from {}Hz to {}Hz", samples.len(), from_rate, to_rate);

    let mut resampler = FastFixedIn::<f32>::new(
        to_rate as f64 / from_rate as f64,
        1.0,
        PolynomialDegree::Septic,
        RESAMPLE_CHUNK,
        1,
    )
    .map_err(|e| HighlightError::analysis(format!("Failed to create resampler: {}", e)))?;

    let expected = (samples.len() as f64 * to_rate as f64 / from_rate as f64) as usize;
    let mut output = Vec::with_capacity(expected + RESAMPLE_CHUNK);

    let mut chunks = samples.chunks_exact(RESAMPLE_CHUNK);
    for chunk in &mut chunks {
        let input = [chunk];
        let planar = resampler
            .process(&input[..], None)
            .map_err(|e| HighlightError::analysis(format!("Resampling failed: {}", e)))?;
        output.extend_from_slice(&planar[0]);
    }

    let remainder = chunks.remainder();
    if !remainder.is_empty() {
        let input = [remainder];
        let planar = resampler
            .process_partial(Some(&input[..]), None)
            .map_err(|e| HighlightError::analysis(format!("Resampling failed: {}", e)))?;
        output.extend_from_slice(&planar[0]);
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::WavWriter;
    use tempfile::TempDir;

    fn write_wav(path: &Path, spec: WavSpec, samples: &[i16]) {
        let mut writer = WavWriter::create(path, spec).unwrap();
        for sample in samples {
            writer.write_sample(*sample).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_downmix_averages_channels() {
        let stereo = [1.0, 0.0, 0.5, 0.5, -1.0, 1.0];
        assert_eq!(downmix(&stereo, 2), vec![0.5, 0.5, 0.0]);
        assert_eq!(downmix(&stereo, 1), stereo.to_vec());
    }

    #[test]
    fn test_load_mono_normalizes_int_pcm() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mono.wav");
        let spec = WavSpec {
            channels: 1,
            sample_rate: ANALYSIS_SAMPLE_RATE,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        write_wav(&path, spec, &[0, 16384, -32768]);

        let samples = load_mono(&path, ANALYSIS_SAMPLE_RATE).unwrap();
        assert_eq!(samples, vec![0.0, 0.5, -1.0]);
    }

    #[test]
    fn test_load_mono_resamples_to_target_rate() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stereo.wav");
        let spec = WavSpec {
            channels: 2,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        // Two seconds of stereo audio
        let samples: Vec<i16> = (0..44100 * 2 * 2).map(|i| ((i % 200) as i16 - 100) * 50).collect();
        write_wav(&path, spec, &samples);

        let mono = load_mono(&path, ANALYSIS_SAMPLE_RATE).unwrap();
        let expected = ANALYSIS_SAMPLE_RATE as usize * 2;
        let tolerance = RESAMPLE_CHUNK;
        assert!(
            mono.len() + tolerance >= expected && mono.len() <= expected + tolerance,
            "unexpected resampled length {}",
            mono.len()
        );
    }

    #[test]
    fn test_load_mono_missing_file_is_analysis_error() {
        let dir = TempDir::new().unwrap();
        let err = load_mono(&dir.path().join("absent.wav"), ANALYSIS_SAMPLE_RATE).unwrap_err();
        assert!(matches!(err, HighlightError::Analysis { .. }));
    }
}
