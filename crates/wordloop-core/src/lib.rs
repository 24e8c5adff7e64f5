//! wordloop-core: Mastery drill engine.
//!
//! Tracks per-word progression, schedules words in fixed windows, builds
//! multiple-choice questions and resolves pronunciation audio through
//! pluggable collaborators. Presentation and concrete audio backends live in
//! the other workspace crates.

pub mod audio;
pub mod catalog;
pub mod error;
pub mod loader;
pub mod mastery;
pub mod model;
pub mod progress;
pub mod scheduler;
pub mod selector;
pub mod session;
pub mod traits;

pub use error::SessionError;
pub use model::Language;
pub use session::{DrillSession, NextQuestion, QuestionView, Selection, SessionSettings};
