//! Highlight clipper library
//!
//! Finds the loudest moments of an online video by the RMS energy of its
//! audio track and cuts them into short, optionally reframed, clips.
//!
//! The job pipeline lives in [`app`]; the external tools it drives are
//! reached through the traits in [`ports`] and implemented in [`adapters`].

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod highlight;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use app::{spawn_job, JobHandle, PipelineOrchestrator};
pub use domain::model::{
    AspectMode, HighlightWindow, JobConfig, JobEvent, JobRequest, PipelineState, QualityTier,
};
pub use error::{HighlightError, HighlightResult};
pub use highlight::{find_highlights, EnergyCurve, HighlightDetector};
