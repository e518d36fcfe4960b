//! Error handling module for the highlight clipper

use thiserror::Error;

/// Main error type for highlight clipper operations
#[derive(Error, Debug)]
pub enum HighlightError {
    /// Invalid job configuration, detected before a job starts
    #[error("Invalid configuration: {message}")]
    Configuration { message: String },

    /// Metadata, audio or video acquisition failed
    #[error("Acquisition failed: {message}")]
    Acquisition { message: String },

    /// Audio could not be decoded or analyzed
    #[error("Audio analysis failed: {message}")]
    Analysis { message: String },

    /// The energy curve produced no highlight window
    #[error("No highlight found in the audio track")]
    NoHighlightFound,

    /// The transcoder exited unsuccessfully
    #[error("Render failed: {message}\n{diagnostic}")]
    Render { message: String, diagnostic: String },

    /// Invalid timecode text
    #[error("Invalid timecode: {timecode}. Expected HH:MM:SS, MM:SS or SS")]
    Format { timecode: String },

    /// Settings file could not be read or written
    #[error("Settings error: {message}")]
    Settings { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HighlightError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn acquisition(message: impl Into<String>) -> Self {
        Self::Acquisition {
            message: message.into(),
        }
    }

    pub fn analysis(message: impl Into<String>) -> Self {
        Self::Analysis {
            message: message.into(),
        }
    }

    pub fn render(message: impl Into<String>, diagnostic: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
            diagnostic: diagnostic.into(),
        }
    }

    /// Whether this error is reported before a job is started
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}

/// Result type alias for highlight clipper operations
pub type HighlightResult<T> = std::result::Result<T, HighlightError>;
