//! Digit-by-digit column addition.
//!
//! The solver works the way the problem is written out on paper: operands
//! are right-aligned, columns are added rightmost first, and a column sum
//! of ten or more writes a small carry digit above the next column to the
//! left. Every column produces one replayable [`Step`], which is what the
//! example player feeds to the renderer one at a time.

use serde::{Deserialize, Serialize};

use crate::{Result, SolveError};

// ============================================================================
// Step
// ============================================================================

/// One replayable step of a worked addition example.
///
/// Steps are emitted right-to-left, one per column, with an optional
/// trailing step when the leftmost column overflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Step {
    /// A single column was added.
    Column {
        /// Column position, 0 = units.
        column: usize,
        /// Digit contributed by the top operand (0 when the operand is
        /// shorter than this column).
        top: u8,
        /// Digit contributed by the bottom operand (0 when padded).
        bottom: u8,
        /// Carry consumed from the column to the right.
        carry_in: u8,
        /// Digit written into the result row for this column.
        result: u8,
        /// Carry handed to the column to the left.
        carry_out: u8,
    },
    /// The leftmost column overflowed; its carry becomes the final result
    /// digit rather than a small carry mark.
    FinalCarry {
        /// The digit written into the extra leftmost result cell.
        digit: u8,
    },
}

// ============================================================================
// SolvedSum
// ============================================================================

/// The solved form of one addition problem.
///
/// Both digit arrays are indexed units-first (index 0 = rightmost column)
/// and have length `max(len(top), len(bottom)) + 1`; the extra cell holds
/// a possible final carry. `carries[i]` is the carry produced by column
/// `i` and consumed by column `i + 1`. The carry of the leftmost real
/// column is written into `result[n]` only, never into `carries`.
///
/// Empty cells (`None`) are rendered as blanks and an expected blank must
/// stay blank when grading learner input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolvedSum {
    /// Result row, units-first; `None` cells render as blanks.
    pub result: Vec<Option<u8>>,
    /// Carry row, units-first; `carries[i]` was produced by column `i`.
    pub carries: Vec<Option<u8>>,
    /// Replayable steps, rightmost column first.
    pub steps: Vec<Step>,
}

impl SolvedSum {
    /// Number of cells in each row, including the final-carry cell.
    #[must_use]
    pub fn width(&self) -> usize {
        self.result.len()
    }

    /// Reads the result row back as a decimal string.
    #[must_use]
    pub fn result_as_string(&self) -> String {
        let digits: String = self
            .result
            .iter()
            .rev()
            .skip_while(|cell| cell.is_none())
            .map(|cell| char::from(b'0' + cell.unwrap_or(0)))
            .collect();
        if digits.is_empty() {
            "0".to_string()
        } else {
            digits
        }
    }
}

// ============================================================================
// Solving
// ============================================================================

/// Solves `top + bottom` column by column.
///
/// Operands are decimal digit strings; leading zeros are tolerated.
/// Columns beyond an operand's own length are treated as digit 0, which
/// reproduces ordinary grade-school right-aligned padding.
///
/// The function is pure: identical operands always yield identical output.
///
/// # Errors
///
/// Returns `SolveError::EmptyOperand` if an operand is empty and
/// `SolveError::InvalidOperand` if it contains a non-digit character.
///
/// # Examples
///
/// ```
/// use sumwise_solver::solve;
///
/// let solved = solve("999", "1").unwrap();
/// assert_eq!(solved.result_as_string(), "1000");
/// ```
pub fn solve(top: &str, bottom: &str) -> Result<SolvedSum> {
    let top_digits = parse_operand(top)?;
    let bottom_digits = parse_operand(bottom)?;
    let width = top_digits.len().max(bottom_digits.len());

    let mut result = vec![None; width + 1];
    let mut carries = vec![None; width + 1];
    let mut steps = Vec::with_capacity(width + 1);

    let mut carry = 0u8;
    for column in 0..width {
        let top_digit = digit_at(&top_digits, column);
        let bottom_digit = digit_at(&bottom_digits, column);
        let sum = top_digit + bottom_digit + carry;
        let digit = sum % 10;
        let carry_out = sum / 10;

        result[column] = Some(digit);
        // The leftmost column's carry is written as a result digit below,
        // not as a carry mark.
        if carry_out > 0 && column < width - 1 {
            carries[column] = Some(carry_out);
        }

        steps.push(Step::Column {
            column,
            top: top_digit,
            bottom: bottom_digit,
            carry_in: carry,
            result: digit,
            carry_out,
        });
        carry = carry_out;
    }

    if carry > 0 {
        result[width] = Some(carry);
        steps.push(Step::FinalCarry { digit: carry });
    }

    Ok(SolvedSum {
        result,
        carries,
        steps,
    })
}

/// Parses an operand into units-first digits.
///
/// `to_digit(10)` yields 0..=9, which always fits in a u8.
#[allow(clippy::cast_possible_truncation)]
fn parse_operand(raw: &str) -> Result<Vec<u8>> {
    if raw.is_empty() {
        return Err(SolveError::EmptyOperand);
    }
    raw.chars()
        .rev()
        .map(|character| {
            character
                .to_digit(10)
                .map(|digit| digit as u8)
                .ok_or_else(|| SolveError::invalid_operand(raw, character))
        })
        .collect()
}

/// Digit at a column, padding short operands with 0.
fn digit_at(digits: &[u8], column: usize) -> u8 {
    digits.get(column).copied().unwrap_or(0)
}

// ============================================================================
// Tests
// ============================================================================
