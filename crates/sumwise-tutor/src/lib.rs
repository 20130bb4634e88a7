//! Sumwise Lesson Orchestrator
//!
//! Runs one lesson end to end: worked-example playback, practice grading,
//! the pizzeria reward game, and earnings reconciliation, sequenced by a
//! synchronous phase machine with tokio timers layered on top.

pub mod config;
pub mod driver;
pub mod earnings;
pub mod entry;
pub mod error;
pub mod example_player;
pub mod phase;
pub mod plan;
pub mod practice;
pub mod store;
pub mod worksheet;

pub use config::TutorConfig;
pub use driver::TutorDriver;
pub use earnings::EarningsReconciliation;
pub use entry::{EntryRow, UserEntry};
pub use error::{Result, TutorError};
pub use example_player::ExamplePlayer;
pub use phase::{
    ExampleView, GameView, GradedAttempt, PendingTransition, PhaseKind, Tutor, TutorSnapshot,
    WorksheetView,
};
pub use plan::LessonPlan;
pub use practice::PracticeSession;
pub use store::{CounterStore, JsonFileStore, MemoryStore, COMPLETED_SESSIONS_KEY};
pub use worksheet::{Verdict, Worksheet};
