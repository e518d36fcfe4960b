// Application layer - Job orchestration on top of the ports

pub mod container;
pub mod events;
pub mod pipeline;
pub mod renderer;

pub use container::{AppContainer, DefaultAppContainer};
pub use events::EventSender;
pub use pipeline::{spawn_job, JobHandle, PipelineOrchestrator};
pub use renderer::ClipRenderer;
