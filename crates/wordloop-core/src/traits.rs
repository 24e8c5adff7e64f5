//! Collaborator interfaces the engine depends on.
//!
//! Implemented by the `wordloop-providers` crate (remote synthesis, local
//! voice, audio player) and by the package loader in this crate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{FallbackError, PlaybackError, SessionError, SynthesisError};
use crate::model::{CatalogEntry, Language};

// ---------------------------------------------------------------------------
// Data source
// ---------------------------------------------------------------------------

/// Yields the raw word list for a language.
pub trait CatalogSource: Send + Sync {
    /// Load all entries, or fail with [`SessionError::DataUnavailable`].
    fn load(&self, language: Language) -> Result<Vec<CatalogEntry>, SessionError>;
}

// ---------------------------------------------------------------------------
// Audio
// ---------------------------------------------------------------------------

/// Text to be spoken, with the language it is in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechRequest {
    pub text: String,
    pub language: Language,
}

/// Encoded audio ready to play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub bytes: Vec<u8>,
    /// MIME type, e.g. "audio/mpeg".
    pub mime: String,
}

impl AudioClip {
    pub fn mp3(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime: "audio/mpeg".to_string(),
        }
    }
}

/// Remote text-to-speech.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Human-readable backend name (e.g. "google").
    fn name(&self) -> &str;

    async fn synthesize(&self, request: &SpeechRequest) -> Result<AudioClip, SynthesisError>;
}

/// Offline voice used when remote synthesis fails.
#[async_trait]
pub trait FallbackVoice: Send + Sync {
    fn name(&self) -> &str;

    /// Speak the text and return once speaking has finished.
    async fn speak(&self, request: &SpeechRequest) -> Result<(), FallbackError>;
}

/// Plays encoded clips.
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    /// Return once playback has finished or failed.
    async fn play(&self, clip: &AudioClip) -> Result<(), PlaybackError>;
}
