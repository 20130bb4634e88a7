//! Sumwise column-addition core
//!
//! This crate provides the pure arithmetic heart of the Sumwise tutor:
//! a deterministic digit-by-digit addition solver that produces the result
//! row, the carry row, and a replayable list of worked-example steps, plus
//! a random question generator with tiered operand ranges.
//!
//! # Types
//!
//! - [`SolvedSum`] - Result digits, carry digits, and steps for one problem
//! - [`Step`] - A single replayable step of a worked example
//! - [`Question`] - A generated addition problem with its difficulty tier
//! - [`Tier`] - Difficulty level controlling operand digit-count ranges
//!
//! # Example
//!
//! ```rust
//! use sumwise_solver::solve;
//!
//! let solved = solve("45", "7").unwrap();
//! assert_eq!(solved.result_as_string(), "52");
//! // Index 0 is the units column; the units column produced a carry.
//! assert_eq!(solved.carries[0], Some(1));
//! ```

mod generator;
mod solver;

pub use generator::{generate, generate_no_carry, Question, Tier};
pub use solver::{solve, SolvedSum, Step};

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while solving an addition problem.
#[derive(Debug, thiserror::Error)]
pub enum SolveError {
    /// An operand string was empty.
    #[error("operand must not be empty")]
    EmptyOperand,

    /// An operand contained a character that is not a decimal digit.
    #[error("invalid character '{character}' in operand '{operand}': operands must contain only digits 0-9")]
    InvalidOperand {
        /// The offending operand string.
        operand: String,
        /// The first non-digit character encountered.
        character: char,
    },
}

impl SolveError {
    /// Creates a new `InvalidOperand` error.
    #[must_use]
    pub fn invalid_operand(operand: impl Into<String>, character: char) -> Self {
        Self::InvalidOperand {
            operand: operand.into(),
            character,
        }
    }
}

/// Result type for solver operations.
pub type Result<T> = std::result::Result<T, SolveError>;
