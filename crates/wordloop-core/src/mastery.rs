//! Per-word mastery state machine.
//!
//! Levels 0 and 1 are the learning phase: any correct answer advances, even
//! after mistakes. Levels 2 to 4 are the testing phase: only a perfect first
//! try advances, a slip holds the level. Levels never go down.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Level at which a word counts as mastered.
pub const MASTERY_THRESHOLD: u8 = 5;

/// First level of the testing phase.
pub const TESTING_PHASE_LEVEL: u8 = 2;

/// Progression record for one word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasteryRecord {
    /// Successful progression rounds, 0..=MASTERY_THRESHOLD.
    pub level: u8,
    /// True iff `level` reached the threshold.
    pub mastered: bool,
    /// Number of times the word was presented.
    pub seen_count: u32,
}

impl MasteryRecord {
    pub fn phase(&self) -> Phase {
        if self.level < TESTING_PHASE_LEVEL {
            Phase::Learning
        } else {
            Phase::Testing {
                stage: self.level - TESTING_PHASE_LEVEL + 1,
            }
        }
    }
}

/// Which leniency rules apply to a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Learning,
    /// Testing stage 1..=3.
    Testing { stage: u8 },
}

/// What an answer did to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerEffect {
    /// No record exists for the key.
    Unknown,
    /// Incorrect answer; the level is untouched.
    Wrong,
    /// Correct answer that advanced the level.
    Advanced { level: u8, mastered: bool },
    /// Correct answer in the testing phase after a slip; level held.
    Held { level: u8 },
}

/// Owns one [`MasteryRecord`] per word key.
#[derive(Debug, Clone, Default)]
pub struct MasteryTracker {
    records: HashMap<String, MasteryRecord>,
}

impl MasteryTracker {
    /// Create fresh records (level 0) for every key.
    pub fn new<'a>(keys: impl IntoIterator<Item = &'a String>) -> Self {
        Self {
            records: keys
                .into_iter()
                .map(|k| (k.clone(), MasteryRecord::default()))
                .collect(),
        }
    }

    pub fn record(&self, key: &str) -> Option<&MasteryRecord> {
        self.records.get(key)
    }

    pub fn is_mastered(&self, key: &str) -> bool {
        self.records.get(key).is_some_and(|r| r.mastered)
    }

    pub fn mastered_count(&self) -> usize {
        self.records.values().filter(|r| r.mastered).count()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Count one presentation of `key`.
    pub fn seen(&mut self, key: &str) {
        if let Some(record) = self.records.get_mut(key) {
            record.seen_count += 1;
        }
    }

    /// Apply an answer for `key`.
    ///
    /// `failed_before` is whether a wrong option was already picked during
    /// this presentation.
    pub fn on_answer(&mut self, key: &str, correct: bool, failed_before: bool) -> AnswerEffect {
        let Some(record) = self.records.get_mut(key) else {
            return AnswerEffect::Unknown;
        };
        if !correct {
            return AnswerEffect::Wrong;
        }
        if record.mastered {
            return AnswerEffect::Held {
                level: record.level,
            };
        }

        let should_advance = match record.phase() {
            Phase::Learning => true,
            Phase::Testing { .. } => !failed_before,
        };
        if !should_advance {
            tracing::debug!(key, level = record.level, "correct after a slip, level held");
            return AnswerEffect::Held {
                level: record.level,
            };
        }

        record.level += 1;
        if record.level >= MASTERY_THRESHOLD {
            record.level = MASTERY_THRESHOLD;
            record.mastered = true;
            tracing::info!(key, seen = record.seen_count, "word mastered");
        }
        AnswerEffect::Advanced {
            level: record.level,
            mastered: record.mastered,
        }
    }

    /// Drop the record for a removed word.
    pub fn remove(&mut self, key: &str) -> Option<MasteryRecord> {
        self.records.remove(key)
    }

    /// Indicator text for the presentation layer, e.g. `Test: 2/3  Seen: 4`.
    pub fn status_line(&self, key: &str) -> Option<String> {
        let record = self.records.get(key)?;
        let phase = match record.phase() {
            _ if record.mastered => "Mastered".to_string(),
            Phase::Learning => "Learning".to_string(),
            Phase::Testing { stage } => format!(
                "Test: {stage}/{}",
                MASTERY_THRESHOLD - TESTING_PHASE_LEVEL
            ),
        };
        Some(format!("{phase}  Seen: {}", record.seen_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker(keys: &[&str]) -> MasteryTracker {
        let keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        MasteryTracker::new(&keys)
    }

    #[test]
    fn five_perfect_answers_master_a_word() {
        let mut t = tracker(&["a"]);
        for expected in 1..=5u8 {
            let effect = t.on_answer("a", true, false);
            assert_eq!(
                effect,
                AnswerEffect::Advanced {
                    level: expected,
                    mastered: expected == MASTERY_THRESHOLD
                }
            );
        }
        assert!(t.is_mastered("a"));
        assert_eq!(t.record("a").unwrap().level, MASTERY_THRESHOLD);
    }

    #[test]
    fn learning_phase_forgives_slips() {
        let mut t = tracker(&["a"]);
        assert_eq!(t.on_answer("a", false, false), AnswerEffect::Wrong);
        assert_eq!(t.record("a").unwrap().level, 0);
        assert_eq!(
            t.on_answer("a", true, true),
            AnswerEffect::Advanced {
                level: 1,
                mastered: false
            }
        );
        assert_eq!(
            t.on_answer("a", true, true),
            AnswerEffect::Advanced {
                level: 2,
                mastered: false
            }
        );
    }

    #[test]
    fn testing_phase_holds_after_slip() {
        let mut t = tracker(&["x"]);
        t.on_answer("x", true, false);
        t.on_answer("x", true, false);
        assert_eq!(t.record("x").unwrap().level, 2);

        assert_eq!(t.on_answer("x", false, false), AnswerEffect::Wrong);
        assert_eq!(t.on_answer("x", true, true), AnswerEffect::Held { level: 2 });
        assert_eq!(t.record("x").unwrap().level, 2);
        assert!(!t.is_mastered("x"));
    }

    #[test]
    fn level_never_decreases() {
        let mut t = tracker(&["w"]);
        let mut last = 0;
        let pattern = [
            (true, false),
            (false, false),
            (true, true),
            (false, false),
            (true, true),
            (true, false),
            (true, true),
            (true, false),
            (true, false),
            (true, false),
        ];
        for (correct, failed) in pattern {
            t.on_answer("w", correct, failed);
            let level = t.record("w").unwrap().level;
            assert!(level >= last);
            last = level;
        }
        assert!(t.is_mastered("w"));
        assert_eq!(last, MASTERY_THRESHOLD);
    }

    #[test]
    fn mastered_words_stay_mastered() {
        let mut t = tracker(&["m"]);
        for _ in 0..5 {
            t.on_answer("m", true, false);
        }
        assert_eq!(t.on_answer("m", true, false), AnswerEffect::Held { level: 5 });
        t.on_answer("m", false, false);
        assert!(t.is_mastered("m"));
    }

    #[test]
    fn unknown_keys_are_noops() {
        let mut t = tracker(&["a"]);
        assert_eq!(t.on_answer("zzz", true, false), AnswerEffect::Unknown);
        t.seen("zzz");
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn status_lines() {
        let mut t = tracker(&["a"]);
        t.seen("a");
        assert_eq!(t.status_line("a").unwrap(), "Learning  Seen: 1");
        t.on_answer("a", true, false);
        t.on_answer("a", true, false);
        t.seen("a");
        assert_eq!(t.status_line("a").unwrap(), "Test: 1/3  Seen: 2");
        t.on_answer("a", true, false);
        t.on_answer("a", true, false);
        assert_eq!(t.status_line("a").unwrap(), "Test: 3/3  Seen: 2");
        t.on_answer("a", true, false);
        assert_eq!(t.status_line("a").unwrap(), "Mastered  Seen: 2");
        assert!(t.status_line("missing").is_none());
    }
}
