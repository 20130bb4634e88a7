//! The learner's sparse digit entry.
//!
//! A [`UserEntry`] mirrors the written-out sum: one answer row and one
//! carry row, indexed units-first like the solved arrays. Cells hold at
//! most one decimal digit; anything else submitted to a cell is silently
//! rejected so a typing flow is never interrupted by an error.

use serde::{Deserialize, Serialize};
use sumwise_solver::SolvedSum;

/// Which row of the written-out sum a digit lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryRow {
    /// The result row under the line.
    Answer,
    /// The small carry digits above the columns.
    Carries,
}

/// The learner's handwriting for one problem.
///
/// Rows grow monotonically as the learner types and never exceed the
/// solved width; they shrink only on an explicit [`reset`](Self::reset).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEntry {
    answer: Vec<Option<u8>>,
    carries: Vec<Option<u8>>,
    width: usize,
}

impl UserEntry {
    /// Creates an all-empty entry sized for the given solved problem.
    #[must_use]
    pub fn sized_for(solved: &SolvedSum) -> Self {
        Self {
            answer: Vec::new(),
            carries: Vec::new(),
            width: solved.width(),
        }
    }

    /// Submits one cell's worth of input.
    ///
    /// `value` must be empty (clearing the cell) or a single ASCII digit;
    /// anything else, or an index beyond the solved width, is rejected
    /// without any state change. Returns `true` if the write was
    /// accepted.
    pub fn submit(&mut self, row: EntryRow, index: usize, value: &str) -> bool {
        if index >= self.width {
            return false;
        }
        let cell = match parse_cell(value) {
            Some(cell) => cell,
            None => return false,
        };

        let cells = self.row_mut(row);
        if cells.len() <= index {
            cells.resize(index + 1, None);
        }
        cells[index] = cell;
        true
    }

    /// Reinitializes both rows to all-empty at a new problem's width.
    pub fn reset(&mut self, solved: &SolvedSum) {
        self.answer.clear();
        self.carries.clear();
        self.width = solved.width();
    }

    /// Grades the entry against the solved arrays.
    ///
    /// Every position in both rows must match: a filled cell must equal
    /// the solved digit and an expected blank must have been left blank.
    #[must_use]
    pub fn matches(&self, solved: &SolvedSum) -> bool {
        (0..solved.width()).all(|index| {
            self.cell(EntryRow::Answer, index) == solved.result.get(index).copied().flatten()
                && self.cell(EntryRow::Carries, index)
                    == solved.carries.get(index).copied().flatten()
        })
    }

    /// Reads one cell, treating unwritten positions as blank.
    #[must_use]
    pub fn cell(&self, row: EntryRow, index: usize) -> Option<u8> {
        self.row(row).get(index).copied().flatten()
    }

    /// The answer row as written so far.
    #[must_use]
    pub fn answer(&self) -> &[Option<u8>] {
        &self.answer
    }

    /// The carry row as written so far.
    #[must_use]
    pub fn carries(&self) -> &[Option<u8>] {
        &self.carries
    }

    /// Width the rows are allowed to grow to.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    fn row(&self, row: EntryRow) -> &Vec<Option<u8>> {
        match row {
            EntryRow::Answer => &self.answer,
            EntryRow::Carries => &self.carries,
        }
    }

    fn row_mut(&mut self, row: EntryRow) -> &mut Vec<Option<u8>> {
        match row {
            EntryRow::Answer => &mut self.answer,
            EntryRow::Carries => &mut self.carries,
        }
    }
}

/// Parses a cell value: empty clears, a single ASCII digit writes, and
/// everything else is invalid.
///
/// The digit fits in a u8 by construction.
#[allow(clippy::cast_possible_truncation)]
fn parse_cell(value: &str) -> Option<Option<u8>> {
    if value.is_empty() {
        return Some(None);
    }
    let mut chars = value.chars();
    let first = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    first.to_digit(10).map(|digit| Some(digit as u8))
}
