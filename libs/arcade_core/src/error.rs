use std::io;

/// Boxed error type returned by [`Messenger`](crate::Messenger) implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T = (), E = Error> = std::result::Result<T, E>;

/// Errors that escape the arcade core.
///
/// User mistakes like challenging yourself are not errors, they are answered
/// with a notice instead. Only platform and persistence failures end up here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("messenger request failed")]
    Messenger(#[source] BoxError),
    #[error("cannot access the stats file")]
    Io(#[from] io::Error),
    #[error("stats document is invalid")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Wraps a platform error.
    pub fn messenger(err: impl Into<BoxError>) -> Self {
        Self::Messenger(err.into())
    }
}
