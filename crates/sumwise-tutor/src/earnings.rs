//! Earnings reconciliation: adding up the two pizzeria days.
//!
//! After the reward game ends, the learner totals their day-one and
//! day-two earnings as one last column addition, graded on the same
//! [`Worksheet`] rules as practice.

use serde::Serialize;

use crate::entry::EntryRow;
use crate::error::Result;
use crate::worksheet::{Verdict, Worksheet};

/// The final sum of a completed reward game's earnings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsReconciliation {
    day_one: u32,
    day_two: u32,
    worksheet: Worksheet,
}

impl EarningsReconciliation {
    /// Opens a worksheet for `day_one + day_two`.
    ///
    /// Zero earnings are a valid operand; a learner who served nothing
    /// still reconciles their (empty) takings.
    ///
    /// # Errors
    ///
    /// Never fails for amounts produced by the reward game; the error
    /// arm exists because operands pass through the string solver.
    pub fn new(day_one: u32, day_two: u32) -> Result<Self> {
        let worksheet = Worksheet::new(day_one.to_string(), day_two.to_string())?;
        Ok(Self {
            day_one,
            day_two,
            worksheet,
        })
    }

    /// Writes one digit of the learner's total.
    pub fn submit_digit(&mut self, row: EntryRow, index: usize, value: &str) -> bool {
        self.worksheet.submit_digit(row, index, value)
    }

    /// Grades the learner's total against the true sum.
    pub fn check(&mut self) -> Verdict {
        self.worksheet.check()
    }

    /// Day-one earnings, the top operand.
    #[must_use]
    pub const fn day_one(&self) -> u32 {
        self.day_one
    }

    /// Day-two earnings, the bottom operand.
    #[must_use]
    pub const fn day_two(&self) -> u32 {
        self.day_two
    }

    /// The true total the learner is working toward.
    #[must_use]
    pub const fn expected_total(&self) -> u32 {
        self.day_one + self.day_two
    }

    /// The open worksheet.
    #[must_use]
    pub const fn worksheet(&self) -> &Worksheet {
        &self.worksheet
    }
}
