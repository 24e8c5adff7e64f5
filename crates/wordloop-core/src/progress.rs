//! Session completion percentage.
//!
//! A removed word counts as mastered for display, and the denominator is
//! rebuilt to the original catalog size, so removal never lowers progress.

use serde::{Deserialize, Serialize};

/// Point-in-time progress numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    /// Mastered plus removed words.
    pub effective_mastered: usize,
    /// Live sequence length plus removed words.
    pub effective_total: usize,
    /// Rounded percentage, 0..=100.
    pub percentage: u8,
}

impl std::fmt::Display for ProgressSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Progress: {}% ({}/{})",
            self.percentage, self.effective_mastered, self.effective_total
        )
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressAccountant {
    deleted_count: usize,
}

impl ProgressAccountant {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deleted_count(&self) -> usize {
        self.deleted_count
    }

    /// Count one explicit removal.
    pub fn record_removal(&mut self) {
        self.deleted_count += 1;
    }

    pub fn snapshot(&self, mastered_count: usize, sequence_len: usize) -> ProgressSnapshot {
        let effective_mastered = mastered_count + self.deleted_count;
        let effective_total = sequence_len + self.deleted_count;
        let percentage = if effective_total == 0 {
            0
        } else {
            ((100.0 * effective_mastered as f64 / effective_total as f64).round() as u8).min(100)
        };
        ProgressSnapshot {
            effective_mastered,
            effective_total,
            percentage,
        }
    }

    pub fn percentage(&self, mastered_count: usize, sequence_len: usize) -> u8 {
        self.snapshot(mastered_count, sequence_len).percentage
    }
}
