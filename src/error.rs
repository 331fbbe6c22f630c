use thiserror::Error;

/// Result type for mapping operations
pub type Result<T> = std::result::Result<T, MapError>;

/// Errors surfaced by the file map engine.
///
/// Per-file failures inside a queued job never reach the caller as errors; they become
/// `[NO MAP]` entries. These variants are what callers translate into API failures.
#[derive(Error, Debug)]
pub enum MapError {
    /// The bounded job queue has no free slot
    #[error("queue is full")]
    QueueFull,

    /// The dispatcher is gone (runtime shut down)
    #[error("map queue is closed")]
    QueueClosed,

    /// The caller cancelled the job
    #[error("map job cancelled")]
    Cancelled,

    /// The per-job deadline fired before the worker finished
    #[error("map job deadline exceeded after {0}s")]
    DeadlineExceeded(u64),

    /// No grammar or mapper exists for the path
    #[error("unsupported file type: {0}")]
    UnsupportedFile(String),

    /// The parser produced no tree
    #[error("failed to parse file: {path}")]
    Parse { path: String },

    /// A mapping task died (panic or join failure)
    #[error("error mapping file {path}: {message}")]
    Task { path: String, message: String },
}

impl MapError {
    pub fn unsupported(path: impl Into<String>) -> Self {
        Self::UnsupportedFile(path.into())
    }

    pub fn parse(path: impl Into<String>) -> Self {
        Self::Parse { path: path.into() }
    }

    pub fn task(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Task {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Cancellation and deadline errors are the caller's own doing, not engine faults.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded(_))
    }
}
