use thiserror::Error;

/// Reasons a session cannot be run or accepted as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The validation gate before playback: the segments add up to zero seconds
    #[error("session must last longer than 0 seconds")]
    EmptyDuration,

    #[error("session '{name}' has no segments")]
    NoSegments { name: String },
}

/// Errors surfaced by the application shell (files, config, terminal).
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid session file: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Session(#[from] SessionError),
}
