//! Step-through playback for a worked example.
//!
//! The player reveals a solved sum one [`Step`] at a time: each advance
//! uncovers the next column's result digit (and any carry it produces),
//! with the final-carry reveal as its own step. The driver advances it on
//! a timer; hosts can also jump straight to the fully-revealed state.

use serde::Serialize;
use sumwise_solver::{Question, SolvedSum, Step};

use crate::error::Result;

/// Plays back one solved example step by step.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamplePlayer {
    question: Question,
    solved: SolvedSum,
    /// Index of the most recently revealed step, or `None` before the
    /// first advance.
    cursor: Option<usize>,
}

impl ExamplePlayer {
    /// Solves the question and opens playback with nothing revealed.
    ///
    /// # Errors
    ///
    /// Returns an error if the question's operands cannot be solved,
    /// which cannot happen for generated questions.
    pub fn new(question: Question) -> Result<Self> {
        let solved = question.solved()?;
        Ok(Self {
            question,
            solved,
            cursor: None,
        })
    }

    /// Reveals the next step. Returns `false` once playback is finished.
    pub fn advance(&mut self) -> bool {
        let next = self.cursor.map_or(0, |cursor| cursor + 1);
        if next >= self.solved.steps.len() {
            return false;
        }
        self.cursor = Some(next);
        true
    }

    /// Reveals every remaining step at once.
    pub fn jump_to_end(&mut self) {
        if let Some(last) = self.solved.steps.len().checked_sub(1) {
            self.cursor = Some(last);
        }
    }

    /// Rewinds playback to the unrevealed state.
    pub fn reset(&mut self) {
        self.cursor = None;
    }

    /// Whether every step has been revealed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        match self.cursor {
            Some(cursor) => cursor + 1 >= self.solved.steps.len(),
            None => self.solved.steps.is_empty(),
        }
    }

    /// The steps revealed so far, in playback order.
    #[must_use]
    pub fn revealed_steps(&self) -> &[Step] {
        match self.cursor {
            Some(cursor) => &self.solved.steps[..=cursor],
            None => &[],
        }
    }

    /// The question being demonstrated.
    #[must_use]
    pub const fn question(&self) -> &Question {
        &self.question
    }

    /// The full solution backing the playback.
    #[must_use]
    pub const fn solved(&self) -> &SolvedSum {
        &self.solved
    }

    /// The playback cursor, if any step has been revealed.
    #[must_use]
    pub const fn cursor(&self) -> Option<usize> {
        self.cursor
    }
}
