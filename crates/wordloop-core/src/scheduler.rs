//! Windowed active-pool scheduling.
//!
//! The shuffled session sequence is cut into contiguous windows of
//! `group_size` keys. Only the unmastered words of the current window are
//! eligible, and the window pointer only moves forward once every word in
//! the window is mastered.

use crate::mastery::MasteryTracker;

/// Default number of words per window.
pub const DEFAULT_GROUP_SIZE: usize = 5;

/// Result of resolving the current window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolState {
    /// Unmastered keys of the current window, in window order.
    Active(Vec<String>),
    /// No further window holds an unmastered word.
    Complete,
}

/// Owns the window pointer. Reads, never mutates, mastery records.
#[derive(Debug, Clone)]
pub struct ActivePoolScheduler {
    group_size: usize,
    group_index: usize,
}

impl ActivePoolScheduler {
    pub fn new(group_size: usize) -> Self {
        Self {
            group_size: group_size.max(1),
            group_index: 0,
        }
    }

    pub fn group_size(&self) -> usize {
        self.group_size
    }

    pub fn group_index(&self) -> usize {
        self.group_index
    }

    /// Move the pointer back to the first window.
    ///
    /// Called after the sequence shrinks. Removing a key shifts every later
    /// key one slot forward, which can carry an unmastered word into a window
    /// the pointer already left. The next `advance_if_exhausted` skips the
    /// fully mastered windows again.
    pub fn rewind(&mut self) {
        self.group_index = 0;
    }

    /// Number of windows a sequence of `len` keys spans.
    pub fn window_count(&self, len: usize) -> usize {
        len.div_ceil(self.group_size)
    }

    /// The window slice `[i*size, (i+1)*size)` filtered to unmastered keys.
    pub fn active_pool(
        sequence: &[String],
        group_index: usize,
        group_size: usize,
        tracker: &MasteryTracker,
    ) -> Vec<String> {
        let start = group_index.saturating_mul(group_size).min(sequence.len());
        let end = start.saturating_add(group_size).min(sequence.len());
        sequence[start..end]
            .iter()
            .filter(|key| tracker.record(key).is_some_and(|r| !r.mastered))
            .cloned()
            .collect()
    }

    /// Resolve the current pool, advancing past exhausted windows.
    ///
    /// An exhausted window and an empty window slice are handled the same:
    /// advance if another window exists, otherwise report completion.
    pub fn advance_if_exhausted(
        &mut self,
        sequence: &[String],
        tracker: &MasteryTracker,
    ) -> PoolState {
        loop {
            let pool = Self::active_pool(sequence, self.group_index, self.group_size, tracker);
            if !pool.is_empty() {
                return PoolState::Active(pool);
            }
            let end = (self.group_index + 1).saturating_mul(self.group_size);
            if end < sequence.len() {
                self.group_index += 1;
                tracing::debug!(group = self.group_index, "window exhausted, advancing");
            } else {
                tracing::info!(group = self.group_index, "all windows exhausted");
                return PoolState::Complete;
            }
        }
    }
}

impl Default for ActivePoolScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_GROUP_SIZE)
    }
}
