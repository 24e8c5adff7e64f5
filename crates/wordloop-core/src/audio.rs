//! Audio resolution: cached clip, then remote synthesis, then local voice.
//!
//! A resolution never fails. Whatever happens, exactly one [`AudioReport`]
//! comes back, and applying it is what unlocks the answer options. Jobs run
//! under an abort registration so a new question or a session reset can
//! cancel one that is still in flight.

use std::sync::Arc;

use futures::future::{AbortHandle, AbortRegistration, Abortable};

use crate::error::SynthesisError;
use crate::traits::{AudioClip, AudioPlayer, FallbackVoice, SpeechRequest, SpeechSynthesizer};

/// Where a resolution currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionState {
    Unresolved,
    /// Played from the per-question cache.
    Cached,
    Synthesizing,
    /// Synthesized, cached and played.
    Resolved,
    /// Synthesis failed; the fallback voice is in use.
    FailedFallback,
    FallbackPlayed,
    /// Neither synthesis nor a fallback voice was available.
    Silent,
}

/// Source of a played clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipSource {
    Cache,
    Synthesis,
}

/// Final outcome of one resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioOutcome {
    /// A clip was played (or its playback failed, which counts the same).
    Played(ClipSource),
    /// Synthesis failed. `spoken` tells whether the local voice ran.
    FellBack { spoken: bool },
    /// Superseded by a newer question or a session reset.
    Cancelled,
}

/// A unit of audio work for the current question.
#[derive(Debug)]
pub struct AudioJob {
    /// Question epoch the job belongs to.
    pub epoch: u64,
    pub request: SpeechRequest,
    /// Clip already resolved for this question, if any.
    pub cached: Option<AudioClip>,
    registration: AbortRegistration,
}

impl AudioJob {
    /// Create a job and the handle that cancels it.
    pub fn new(
        epoch: u64,
        request: SpeechRequest,
        cached: Option<AudioClip>,
    ) -> (Self, AbortHandle) {
        let (handle, registration) = AbortHandle::new_pair();
        (
            Self {
                epoch,
                request,
                cached,
                registration,
            },
            handle,
        )
    }
}

/// The single completion notification of a job.
#[derive(Debug, Clone)]
pub struct AudioReport {
    pub epoch: u64,
    pub outcome: AudioOutcome,
    pub state: ResolutionState,
    /// Newly synthesized clip to cache for the rest of the question.
    pub clip: Option<AudioClip>,
}

/// Resolves speech requests through the fallback chain.
pub struct AudioResolver {
    synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
    fallback: Option<Arc<dyn FallbackVoice>>,
    player: Arc<dyn AudioPlayer>,
}

impl AudioResolver {
    pub fn new(player: Arc<dyn AudioPlayer>) -> Self {
        Self {
            synthesizer: None,
            fallback: None,
            player,
        }
    }

    pub fn with_synthesizer(mut self, synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    pub fn with_fallback(mut self, voice: Arc<dyn FallbackVoice>) -> Self {
        self.fallback = Some(voice);
        self
    }

    /// Run a job to its single report.
    pub async fn resolve(&self, job: AudioJob) -> AudioReport {
        let AudioJob {
            epoch,
            request,
            cached,
            registration,
        } = job;

        match Abortable::new(self.run_chain(&request, cached), registration).await {
            Ok((outcome, state, clip)) => AudioReport {
                epoch,
                outcome,
                state,
                clip,
            },
            Err(_aborted) => {
                tracing::debug!(epoch, "audio resolution cancelled");
                AudioReport {
                    epoch,
                    outcome: AudioOutcome::Cancelled,
                    state: ResolutionState::Unresolved,
                    clip: None,
                }
            }
        }
    }

    async fn run_chain(
        &self,
        request: &SpeechRequest,
        cached: Option<AudioClip>,
    ) -> (AudioOutcome, ResolutionState, Option<AudioClip>) {
        if let Some(clip) = cached {
            self.play_clip(&clip).await;
            return (
                AudioOutcome::Played(ClipSource::Cache),
                ResolutionState::Cached,
                None,
            );
        }

        let synthesized = match &self.synthesizer {
            Some(synthesizer) => {
                tracing::debug!(backend = synthesizer.name(), text = %request.text, "synthesizing");
                synthesizer.synthesize(request).await
            }
            None => Err(SynthesisError::Disabled),
        };

        match synthesized {
            Ok(clip) => {
                self.play_clip(&clip).await;
                (
                    AudioOutcome::Played(ClipSource::Synthesis),
                    ResolutionState::Resolved,
                    Some(clip),
                )
            }
            Err(e) => {
                if e.is_permanent() {
                    tracing::debug!("remote synthesis not used: {e}");
                } else {
                    tracing::warn!("remote synthesis failed, using fallback voice: {e}");
                }
                let spoken = self.speak_fallback(request).await;
                let state = if spoken {
                    ResolutionState::FallbackPlayed
                } else {
                    ResolutionState::Silent
                };
                (AudioOutcome::FellBack { spoken }, state, None)
            }
        }
    }

    async fn play_clip(&self, clip: &AudioClip) {
        if let Err(e) = self.player.play(clip).await {
            tracing::error!("audio playback error: {e}");
        }
    }

    async fn speak_fallback(&self, request: &SpeechRequest) -> bool {
        let Some(voice) = &self.fallback else {
            tracing::debug!("no fallback voice configured, continuing silently");
            return false;
        };
        match voice.speak(request).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(voice = voice.name(), "fallback voice failed: {e}");
                false
            }
        }
    }
}
