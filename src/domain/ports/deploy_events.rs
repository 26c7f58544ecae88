//! Deploy Event Port
//!
//! Provides an observable interface for pipeline runs. Enables progress
//! reporting, NDJSON event streams, and debugging. Skipped stages emit
//! nothing at all through this port.

/// Event emitted during a pipeline run
#[derive(Debug, Clone)]
pub enum DeployEvent {
    /// Session established
    Connected { host: String },

    /// A stage began running (skipped stages never emit this)
    StageStarted { stage: &'static str },

    /// A stage finished successfully
    StageCompleted { stage: &'static str },

    /// Local archive produced
    Compressed {
        archive: String,
        size: String,
        digest: String,
    },

    /// Release directory created on the remote
    ReleaseCreated { tag: String, path: String },

    /// One middleware command finished
    CommandExecuted { command: String },

    /// A shared symlink was written
    SharedLinkUpdated { link: String, target: String },

    /// The current symlink now points at the new release
    CurrentSwitched { tag: String },

    /// Retention cleanup removed old releases
    Pruned { deleted: Vec<String> },

    /// Local archive removed after deployment
    LocalArchiveDeleted { archive: String },

    /// Session closed
    Closed,

    /// Pipeline finished successfully
    Completed { tag: String },

    /// Pipeline aborted with an error
    Failed { stage: &'static str, error: String },
}

/// Trait for receiving deploy events
///
/// Implementations can be:
/// - ConsoleEventSink: line output in a terminal
/// - JsonEventSink: NDJSON event stream for CI
/// - NoopEventSink: silent operation
pub trait DeployEventSink {
    /// Handle a deploy event
    fn on_event(&self, event: DeployEvent);

    /// Check if this sink wants per-command detail events
    fn wants_detailed_events(&self) -> bool {
        true
    }
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl DeployEventSink for NoopEventSink {
    fn on_event(&self, _event: DeployEvent) {
        // Do nothing
    }

    fn wants_detailed_events(&self) -> bool {
        false
    }
}
