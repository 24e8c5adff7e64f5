//! Scripted backends for testing the audio chain without network or sound.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use wordloop_core::error::{FallbackError, SynthesisError};
use wordloop_core::traits::{AudioClip, FallbackVoice, SpeechRequest, SpeechSynthesizer};

#[derive(Debug, Clone)]
enum MockOutcome {
    Clip(Vec<u8>),
    Unavailable(String),
    Network(String),
}

/// A synthesizer that returns a fixed clip or a fixed failure.
pub struct MockSynthesizer {
    outcome: MockOutcome,
    delay: Option<Duration>,
    call_count: AtomicU32,
    last_request: Mutex<Option<SpeechRequest>>,
}

impl MockSynthesizer {
    fn with_outcome(outcome: MockOutcome) -> Self {
        Self {
            outcome,
            delay: None,
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Always succeed with `bytes` as an MP3 clip.
    pub fn with_clip(bytes: Vec<u8>) -> Self {
        Self::with_outcome(MockOutcome::Clip(bytes))
    }

    /// Always fail as if the service were disabled.
    pub fn unavailable(message: &str) -> Self {
        Self::with_outcome(MockOutcome::Unavailable(message.to_string()))
    }

    /// Always fail with a network error.
    pub fn offline() -> Self {
        Self::with_outcome(MockOutcome::Network("connection refused".to_string()))
    }

    /// Wait this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn last_request(&self) -> Option<SpeechRequest> {
        self.last_request.lock().ok().and_then(|r| r.clone())
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn synthesize(&self, request: &SpeechRequest) -> Result<AudioClip, SynthesisError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request.clone());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.outcome {
            MockOutcome::Clip(bytes) => Ok(AudioClip::mp3(bytes.clone())),
            MockOutcome::Unavailable(message) => Err(SynthesisError::Unavailable(message.clone())),
            MockOutcome::Network(message) => Err(SynthesisError::Network(message.clone())),
        }
    }
}

/// A fallback voice that records what it was asked to say.
pub struct MockVoice {
    available: bool,
    spoken: Mutex<Vec<String>>,
}

impl MockVoice {
    pub fn new() -> Self {
        Self {
            available: true,
            spoken: Mutex::new(Vec::new()),
        }
    }

    /// A voice that reports itself as missing.
    pub fn missing() -> Self {
        Self {
            available: false,
            spoken: Mutex::new(Vec::new()),
        }
    }

    /// Texts spoken so far, in order.
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl Default for MockVoice {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FallbackVoice for MockVoice {
    fn name(&self) -> &str {
        "mock"
    }

    async fn speak(&self, request: &SpeechRequest) -> Result<(), FallbackError> {
        if !self.available {
            return Err(FallbackError::Unavailable("mock voice disabled".into()));
        }
        if let Ok(mut spoken) = self.spoken.lock() {
            spoken.push(request.text.clone());
        }
        Ok(())
    }
}
