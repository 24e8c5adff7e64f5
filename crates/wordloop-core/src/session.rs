//! Drill session orchestration.
//!
//! A [`DrillSession`] owns every piece of per-session state: the working
//! catalog, mastery records, shuffled sequence, window pointer, removal count
//! and the live question. Restarting or switching language swaps the whole
//! [`SessionState`] instead of resetting fields one by one.

use futures::future::AbortHandle;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::audio::{AudioJob, AudioOutcome, AudioReport};
use crate::catalog::WordCatalog;
use crate::error::SessionError;
use crate::mastery::{AnswerEffect, MasteryRecord, MasteryTracker};
use crate::model::Language;
use crate::progress::{ProgressAccountant, ProgressSnapshot};
use crate::scheduler::{ActivePoolScheduler, PoolState, DEFAULT_GROUP_SIZE};
use crate::selector::{QuestionSelector, RenderedOption, DEFAULT_OPTION_COUNT};
use crate::traits::{AudioClip, CatalogSource, SpeechRequest};

/// Tunables for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Words per scheduling window.
    pub group_size: usize,
    /// Choices per question.
    pub option_count: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            group_size: DEFAULT_GROUP_SIZE,
            option_count: DEFAULT_OPTION_COUNT,
        }
    }
}

/// What the presentation layer renders for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionView {
    pub epoch: u64,
    pub target_key: String,
    pub display: String,
    pub options: Vec<RenderedOption>,
    pub status: String,
    pub progress: ProgressSnapshot,
}

/// Result of asking for the next question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextQuestion {
    Question(QuestionView),
    /// Every word is mastered or removed.
    Complete,
}

/// Result of selecting an option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Options are locked until audio resolution reports.
    Locked,
    /// No live question, or the index is out of range.
    Invalid,
    /// This option was already picked during this presentation.
    AlreadyChecked,
    /// The question was already answered correctly.
    Answered,
    Wrong { key: String },
    Correct {
        effect: AnswerEffect,
        progress: ProgressSnapshot,
    },
}

#[derive(Debug, Clone)]
struct QuestionState {
    epoch: u64,
    target: String,
    options: Vec<RenderedOption>,
    checked: Vec<bool>,
    failed: bool,
    answered: bool,
    unlocked: bool,
    audio_cache: Option<AudioClip>,
}

/// Everything that is reset wholesale on restart or language change.
#[derive(Debug, Clone)]
struct SessionState {
    id: Uuid,
    catalog: WordCatalog,
    sequence: Vec<String>,
    tracker: MasteryTracker,
    scheduler: ActivePoolScheduler,
    progress: ProgressAccountant,
    question: Option<QuestionState>,
    complete: bool,
}

impl SessionState {
    fn new<R: Rng + ?Sized>(catalog: WordCatalog, settings: &SessionSettings, rng: &mut R) -> Self {
        let mut sequence = catalog.keys().to_vec();
        sequence.shuffle(rng);
        let tracker = MasteryTracker::new(&sequence);
        let id = Uuid::new_v4();
        tracing::info!(
            session = %id,
            language = %catalog.language(),
            words = sequence.len(),
            "session started"
        );
        Self {
            id,
            catalog,
            sequence,
            tracker,
            scheduler: ActivePoolScheduler::new(settings.group_size),
            progress: ProgressAccountant::new(),
            question: None,
            complete: false,
        }
    }

    fn snapshot(&self) -> ProgressSnapshot {
        self.progress
            .snapshot(self.tracker.mastered_count(), self.sequence.len())
    }
}

/// A single learner's drill session.
pub struct DrillSession<R: Rng> {
    /// The catalog as loaded, before any removal.
    loaded: WordCatalog,
    settings: SessionSettings,
    selector: QuestionSelector,
    state: SessionState,
    rng: R,
    last_epoch: u64,
    pending_audio: Option<AbortHandle>,
}

impl<R: Rng> DrillSession<R> {
    /// Load the catalog for `language` and start a shuffled session.
    pub fn start(
        source: &dyn CatalogSource,
        language: Language,
        settings: SessionSettings,
        rng: R,
    ) -> Result<Self, SessionError> {
        let entries = source.load(language)?;
        let catalog = WordCatalog::from_entries(entries, language)?;
        Ok(Self::from_catalog(catalog, settings, rng))
    }

    pub fn from_catalog(catalog: WordCatalog, settings: SessionSettings, mut rng: R) -> Self {
        let state = SessionState::new(catalog.clone(), &settings, &mut rng);
        Self {
            loaded: catalog,
            selector: QuestionSelector::new(settings.option_count),
            settings,
            state,
            rng,
            last_epoch: 0,
            pending_audio: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.state.id
    }

    pub fn language(&self) -> Language {
        self.state.catalog.language()
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn catalog(&self) -> &WordCatalog {
        &self.state.catalog
    }

    /// The shuffled session sequence.
    pub fn sequence(&self) -> &[String] {
        &self.state.sequence
    }

    pub fn group_index(&self) -> usize {
        self.state.scheduler.group_index()
    }

    pub fn record(&self, key: &str) -> Option<&MasteryRecord> {
        self.state.tracker.record(key)
    }

    pub fn is_complete(&self) -> bool {
        self.state.complete
    }

    pub fn deleted_count(&self) -> usize {
        self.state.progress.deleted_count()
    }

    pub fn progress(&self) -> ProgressSnapshot {
        self.state.snapshot()
    }

    /// Unmastered words of the current window, without advancing it.
    pub fn active_pool(&self) -> Vec<String> {
        ActivePoolScheduler::active_pool(
            &self.state.sequence,
            self.state.scheduler.group_index(),
            self.state.scheduler.group_size(),
            &self.state.tracker,
        )
    }

    /// Mastery indicator for the live target.
    pub fn status_line(&self) -> Option<String> {
        let question = self.state.question.as_ref()?;
        self.state.tracker.status_line(&question.target)
    }

    pub fn answers_unlocked(&self) -> bool {
        self.state.question.as_ref().is_some_and(|q| q.unlocked)
    }

    /// The live question, if one is being shown.
    pub fn current_question(&self) -> Option<QuestionView> {
        self.state.question.as_ref().map(|q| self.view(q))
    }

    fn view(&self, question: &QuestionState) -> QuestionView {
        let display = self
            .state
            .catalog
            .get(&question.target)
            .map(|w| w.display.clone())
            .unwrap_or_default();
        QuestionView {
            epoch: question.epoch,
            target_key: question.target.clone(),
            display,
            options: question.options.clone(),
            status: self
                .state
                .tracker
                .status_line(&question.target)
                .unwrap_or_default(),
            progress: self.state.snapshot(),
        }
    }

    /// End the current question and present the next one.
    ///
    /// Window state is recomputed from scratch every time, so removals made
    /// since the last question are always accounted for.
    pub fn next_question(&mut self) -> Result<NextQuestion, SessionError> {
        self.cancel_pending_audio();
        self.state.question = None;

        let pool = match self
            .state
            .scheduler
            .advance_if_exhausted(&self.state.sequence, &self.state.tracker)
        {
            PoolState::Active(pool) => pool,
            PoolState::Complete => {
                if !self.state.complete {
                    tracing::info!(session = %self.state.id, "all words mastered");
                }
                self.state.complete = true;
                return Ok(NextQuestion::Complete);
            }
        };

        let target = self.selector.pick_target(&pool, &mut self.rng)?;
        self.state.tracker.seen(&target);

        let keys = self
            .selector
            .build_options(&target, self.state.catalog.keys(), &mut self.rng);
        let options = self
            .selector
            .render_options(&keys, &self.state.catalog, &mut self.rng);

        self.last_epoch += 1;
        tracing::debug!(
            epoch = self.last_epoch,
            word = %target,
            group = self.state.scheduler.group_index(),
            pool = pool.len(),
            "question presented"
        );

        let question = QuestionState {
            epoch: self.last_epoch,
            checked: vec![false; options.len()],
            target,
            options,
            failed: false,
            answered: false,
            unlocked: false,
            audio_cache: None,
        };
        let view = self.view(&question);
        self.state.question = Some(question);
        Ok(NextQuestion::Question(view))
    }

    /// Build the audio job for the current target (initial play or replay).
    ///
    /// Any job still in flight is aborted first.
    pub fn prepare_audio(&mut self) -> Option<AudioJob> {
        self.cancel_pending_audio();
        let question = self.state.question.as_ref()?;
        let word = self.state.catalog.get(&question.target)?;
        let request = SpeechRequest {
            text: word.display.clone(),
            language: self.state.catalog.language(),
        };
        let (job, handle) = AudioJob::new(question.epoch, request, question.audio_cache.clone());
        self.pending_audio = Some(handle);
        Some(job)
    }

    /// Apply the report of a finished audio job.
    ///
    /// Returns `true` if the report belonged to the live question, which
    /// unlocks its options. Stale or cancelled reports change nothing.
    pub fn finish_audio(&mut self, report: AudioReport) -> bool {
        if report.outcome == AudioOutcome::Cancelled {
            return false;
        }
        let Some(question) = self.state.question.as_mut() else {
            return false;
        };
        if question.epoch != report.epoch {
            tracing::debug!(
                report = report.epoch,
                current = question.epoch,
                "ignoring stale audio report"
            );
            return false;
        }
        if let Some(clip) = report.clip {
            question.audio_cache = Some(clip);
        }
        question.unlocked = true;
        self.pending_audio = None;
        true
    }

    /// Pick the option at `index` (0-based, in display order).
    pub fn select_option(&mut self, index: usize) -> Selection {
        let Some(question) = self.state.question.as_mut() else {
            return Selection::Invalid;
        };
        if question.answered {
            return Selection::Answered;
        }
        if !question.unlocked {
            return Selection::Locked;
        }
        let Some(option) = question.options.get(index) else {
            return Selection::Invalid;
        };
        if question.checked[index] {
            return Selection::AlreadyChecked;
        }
        question.checked[index] = true;

        if option.key != question.target {
            let key = option.key.clone();
            question.failed = true;
            self.state.tracker.on_answer(&question.target, false, true);
            tracing::debug!(word = %question.target, picked = %key, "wrong option");
            return Selection::Wrong { key };
        }

        question.answered = true;
        let effect = self
            .state
            .tracker
            .on_answer(&question.target, true, question.failed);
        Selection::Correct {
            effect,
            progress: self.state.snapshot(),
        }
    }

    /// Remove a word from the session. Unknown keys are a no-op.
    ///
    /// Ends the current question; the caller must ask for a new one.
    pub fn remove_word(&mut self, key: &str) -> bool {
        if self.state.catalog.remove(key).is_none() {
            return false;
        }
        self.state.tracker.remove(key);
        self.state.sequence.retain(|k| k != key);
        self.state.scheduler.rewind();
        self.state.progress.record_removal();
        self.cancel_pending_audio();
        self.state.question = None;
        tracing::info!(
            session = %self.state.id,
            key,
            deleted = self.state.progress.deleted_count(),
            "word removed"
        );
        true
    }

    /// Remove the word currently being asked.
    pub fn remove_current_word(&mut self) -> bool {
        match self.state.question.as_ref().map(|q| q.target.clone()) {
            Some(target) => self.remove_word(&target),
            None => false,
        }
    }

    /// Reshuffle the loaded catalog and reset all progress.
    pub fn restart(&mut self) {
        self.cancel_pending_audio();
        self.state = SessionState::new(self.loaded.clone(), &self.settings, &mut self.rng);
    }

    /// Load `language` from `source` and replace the session with it.
    ///
    /// On error the current session is left untouched.
    pub fn change_language(
        &mut self,
        source: &dyn CatalogSource,
        language: Language,
    ) -> Result<(), SessionError> {
        let entries = source.load(language)?;
        let catalog = WordCatalog::from_entries(entries, language)?;
        self.cancel_pending_audio();
        self.loaded = catalog;
        self.state = SessionState::new(self.loaded.clone(), &self.settings, &mut self.rng);
        Ok(())
    }

    /// Abort any in-flight audio resolution.
    pub fn cancel_pending_audio(&mut self) {
        if let Some(handle) = self.pending_audio.take() {
            handle.abort();
        }
    }
}
