/// Convenience result type used across the crate.
pub type RaceResult<T> = Result<T, RaceError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum RaceError {
    /// Invalid user-provided dataset, payload, or option data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Failures while creating a recording session.
    #[error("session error: {0}")]
    Session(String),

    /// Failures while capturing or submitting frames.
    #[error("capture error: {0}")]
    Capture(String),

    /// Failures while compiling or downloading the final video.
    #[error("finalize error: {0}")]
    Finalize(String),

    /// Wrapped transport error from the video service client.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RaceError {
    /// Build a [`RaceError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`RaceError::Session`] value.
    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session(msg.into())
    }

    /// Build a [`RaceError::Capture`] value.
    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture(msg.into())
    }

    /// Build a [`RaceError::Finalize`] value.
    pub fn finalize(msg: impl Into<String>) -> Self {
        Self::Finalize(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
