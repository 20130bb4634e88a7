//! A single problem being worked by the learner.
//!
//! A [`Worksheet`] bundles one question's operands, the solved reference
//! arrays, the learner's [`UserEntry`], and the grading verdict. Both the
//! practice phase and the earnings-reconciliation phase grade through
//! this type.

use serde::{Deserialize, Serialize};
use sumwise_solver::{solve, SolvedSum};

use crate::entry::{EntryRow, UserEntry};
use crate::error::Result;

/// The grading state of a worksheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Not yet checked, or edited since the last check.
    #[default]
    Unknown,
    /// Every cell matched the solved arrays at the last check.
    Correct,
    /// At least one cell disagreed at the last check.
    Incorrect,
}

/// One problem, its solution, and the learner's work on it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Worksheet {
    top: String,
    bottom: String,
    solved: SolvedSum,
    entry: UserEntry,
    verdict: Verdict,
}

impl Worksheet {
    /// Solves the operands and opens a blank worksheet for them.
    ///
    /// # Errors
    ///
    /// Returns an error if either operand is empty or non-numeric.
    pub fn new(top: impl Into<String>, bottom: impl Into<String>) -> Result<Self> {
        let top = top.into();
        let bottom = bottom.into();
        let solved = solve(&top, &bottom)?;
        let entry = UserEntry::sized_for(&solved);
        Ok(Self {
            top,
            bottom,
            solved,
            entry,
            verdict: Verdict::Unknown,
        })
    }

    /// Writes one digit (or clears one cell) of the learner's entry.
    ///
    /// Invalid input is silently rejected. Any accepted edit resets the
    /// verdict to [`Verdict::Unknown`] so a stale grade never shows
    /// against fresh work.
    pub fn submit_digit(&mut self, row: EntryRow, index: usize, value: &str) -> bool {
        let accepted = self.entry.submit(row, index, value);
        if accepted {
            self.verdict = Verdict::Unknown;
        }
        accepted
    }

    /// Grades the entry against the solved arrays and records the verdict.
    pub fn check(&mut self) -> Verdict {
        self.verdict = if self.entry.matches(&self.solved) {
            Verdict::Correct
        } else {
            Verdict::Incorrect
        };
        self.verdict
    }

    /// The top operand as given.
    #[must_use]
    pub fn top(&self) -> &str {
        &self.top
    }

    /// The bottom operand as given.
    #[must_use]
    pub fn bottom(&self) -> &str {
        &self.bottom
    }

    /// The reference solution.
    #[must_use]
    pub const fn solved(&self) -> &SolvedSum {
        &self.solved
    }

    /// The learner's work so far.
    #[must_use]
    pub const fn entry(&self) -> &UserEntry {
        &self.entry
    }

    /// The verdict from the most recent check.
    #[must_use]
    pub const fn verdict(&self) -> Verdict {
        self.verdict
    }
}
