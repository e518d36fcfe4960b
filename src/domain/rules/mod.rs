// Business rules - Naming, stream selection and reframing math

use crate::domain::model::{AspectMode, QualityTier};

/// Title used when the source has none or it sanitizes to nothing
pub const FALLBACK_TITLE: &str = "highlight";

const FORBIDDEN_FILENAME_CHARS: [char; 9] = ['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Make a video title safe to use as a file name stem
pub fn sanitize_title(title: &str) -> String {
    let replaced: String = title
        .chars()
        .map(|c| {
            if FORBIDDEN_FILENAME_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect();

    let trimmed = replaced.trim();
    if trimmed.is_empty() {
        FALLBACK_TITLE.to_string()
    } else {
        trimmed.to_string()
    }
}

/// `<title>_highlight_<ordinal>.mp4`, ordinal is 1-based
pub fn clip_file_name(title: &str, ordinal: usize) -> String {
    format!("{}_highlight_{}.mp4", title, ordinal)
}

/// Output template stem for the full video download
pub fn full_video_stem(title: &str) -> String {
    format!("{}_full", title)
}

/// Downloader format selector for a quality tier
pub fn format_selector(quality: QualityTier) -> String {
    format!(
        "bestvideo[height<={}]+bestaudio/best",
        quality.height_ceiling()
    )
}

/// Geometry of a 9:16 reframe for a given source resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectTransform {
    /// Keep full height, center-crop the width
    Crop { width: u32, height: u32 },
    /// Keep full width, grow the canvas height with black bars
    Pad { width: u32, height: u32, y: u32 },
}

impl AspectTransform {
    /// Compute the transform for `mode`; `None` for `AspectMode::Original`.
    ///
    /// Sources that are already narrower than 9:16 are clamped so the
    /// filter never asks for a crop wider, or a pad shorter, than the frame.
    pub fn for_source(mode: AspectMode, width: u32, height: u32) -> Option<Self> {
        match mode {
            AspectMode::Original => None,
            AspectMode::CropVertical9x16 => {
                let crop_width = (height as u64 * 9 / 16) as u32;
                Some(AspectTransform::Crop {
                    width: crop_width.min(width),
                    height,
                })
            }
            AspectMode::PadVertical9x16 => {
                let pad_height = ((width as u64 * 16 / 9) as u32).max(height);
                Some(AspectTransform::Pad {
                    width,
                    height: pad_height,
                    y: (pad_height - height) / 2,
                })
            }
        }
    }

    /// The ffmpeg video filter expression
    pub fn filter(&self) -> String {
        match self {
            AspectTransform::Crop { width, height } => format!("crop={}:{}", width, height),
            AspectTransform::Pad { width, height, y } => format!(
                "pad=width={}:height={}:x=0:y={}:color=black",
                width, height, y
            ),
        }
    }
}
