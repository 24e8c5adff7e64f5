//! Error types for the drill engine and its collaborators.
//!
//! Only [`SessionError::DataUnavailable`] ever reaches the user. Audio errors
//! are defined here so the resolver can classify and log them, then absorb
//! them into a fallback step.

use thiserror::Error;

/// Errors raised by session setup and selection.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The word catalog could not be read or had no usable entries.
    #[error("word data unavailable: {0}")]
    DataUnavailable(String),

    /// A target was requested from an empty active pool.
    #[error("active pool is empty; resolve window state before selecting")]
    EmptyPool,
}

/// Errors from the remote speech-synthesis service.
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// The service signalled that it is disabled or blocked.
    #[error("synthesis service unavailable: {0}")]
    Unavailable(String),

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),

    /// The service returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The response could not be decoded into audio.
    #[error("malformed synthesis response: {0}")]
    Malformed(String),

    /// No synthesizer is configured.
    #[error("remote synthesis disabled")]
    Disabled,
}

impl SynthesisError {
    /// Returns `true` if retrying within the same session cannot succeed.
    pub fn is_permanent(&self) -> bool {
        matches!(self, SynthesisError::Unavailable(_) | SynthesisError::Disabled)
    }
}

/// Errors from the local fallback voice.
#[derive(Debug, Error)]
pub enum FallbackError {
    /// No local voice exists on this machine.
    #[error("fallback voice unavailable: {0}")]
    Unavailable(String),

    /// The voice exists but failed while speaking.
    #[error("fallback voice failed: {0}")]
    Failed(String),
}

/// Errors from audio playback. Treated as completion by the resolver.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("audio player unavailable: {0}")]
    Unavailable(String),

    #[error("playback failed: {0}")]
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permanent_synthesis_errors() {
        assert!(SynthesisError::Disabled.is_permanent());
        assert!(SynthesisError::Unavailable("blocked".into()).is_permanent());
        assert!(!SynthesisError::Network("reset".into()).is_permanent());
        assert!(!SynthesisError::Api {
            status: 500,
            message: "boom".into()
        }
        .is_permanent());
    }

    #[test]
    fn error_messages() {
        let err = SynthesisError::Api {
            status: 403,
            message: "forbidden".into(),
        };
        assert_eq!(err.to_string(), "API error (HTTP 403): forbidden");
        assert!(SessionError::DataUnavailable("no rows".into())
            .to_string()
            .contains("no rows"));
    }
}
