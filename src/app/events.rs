// Job events - Typed progress channel between a running job and its front-end

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, warn};

use crate::domain::model::JobEvent;

/// Create a connected sender/receiver pair
pub fn channel() -> (EventSender, UnboundedReceiver<JobEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSender::new(tx), rx)
}

/// Sending half of a job's event channel.
///
/// Progress never goes backwards and at most one terminal event is sent;
/// anything emitted after it is dropped. A closed receiver is not an error.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: UnboundedSender<JobEvent>,
    progress: Arc<AtomicU8>,
    finished: Arc<AtomicBool>,
}

impl EventSender {
    fn new(tx: UnboundedSender<JobEvent>) -> Self {
        Self {
            tx,
            progress: Arc::new(AtomicU8::new(0)),
            finished: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Progress line for the front-end, mirrored to tracing at debug level
    pub fn log(&self, message: impl Into<String>) {
        let message = message.into();
        debug!("{}", message);
        self.send(JobEvent::Log(message));
    }

    /// Log line for a recoverable problem
    pub fn warn(&self, message: impl Into<String>) {
        let message = message.into();
        warn!("{}", message);
        self.send(JobEvent::Log(format!("Warning: {}", message)));
    }

    /// Report progress in percent. Repeats are sent, values below the last
    /// one are dropped.
    pub fn progress(&self, percent: u8) {
        let percent = percent.min(100);
        let previous = self.progress.fetch_max(percent, Ordering::SeqCst);
        if percent >= previous {
            self.send(JobEvent::Progress(percent));
        }
    }

    /// Last reported progress value
    pub fn current_progress(&self) -> u8 {
        self.progress.load(Ordering::SeqCst)
    }

    /// Send the success event; returns false if a terminal event was already sent
    pub fn done(&self, output_dir: PathBuf) -> bool {
        self.finish(JobEvent::Done(output_dir))
    }

    /// Send the failure event; returns false if a terminal event was already sent
    pub fn error(&self, message: impl Into<String>) -> bool {
        let message = message.into();
        error!("{}", message);
        self.finish(JobEvent::Error(message))
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    fn finish(&self, event: JobEvent) -> bool {
        if self.finished.swap(true, Ordering::SeqCst) {
            return false;
        }
        // Bypasses `send` which drops everything once finished
        let _ = self.tx.send(event);
        true
    }

    fn send(&self, event: JobEvent) {
        if self.is_finished() {
            return;
        }
        let _ = self.tx.send(event);
    }
}
