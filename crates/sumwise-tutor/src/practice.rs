//! The practice round: a queue of questions graded one worksheet at a
//! time.

use serde::Serialize;
use sumwise_solver::Question;

use crate::entry::EntryRow;
use crate::error::{Result, TutorError};
use crate::worksheet::{Verdict, Worksheet};

/// Drives the learner through the lesson's practice questions in order.
///
/// The session holds one open [`Worksheet`] at a time. A question is only
/// left behind once it has been answered correctly; incorrect checks keep
/// the same worksheet open for another try.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeSession {
    questions: Vec<Question>,
    index: usize,
    worksheet: Worksheet,
}

impl PracticeSession {
    /// Opens a session on the first question.
    ///
    /// # Errors
    ///
    /// Returns an error if `questions` is empty or the first question
    /// cannot be solved.
    pub fn new(questions: Vec<Question>) -> Result<Self> {
        let first = questions.first().ok_or(TutorError::EmptyLesson)?;
        let worksheet = Worksheet::new(first.top.clone(), first.bottom.clone())?;
        Ok(Self {
            questions,
            index: 0,
            worksheet,
        })
    }

    /// Writes one digit of the learner's work on the open worksheet.
    pub fn submit_digit(&mut self, row: EntryRow, index: usize, value: &str) -> bool {
        self.worksheet.submit_digit(row, index, value)
    }

    /// Grades the open worksheet.
    pub fn check(&mut self) -> Verdict {
        self.worksheet.check()
    }

    /// Moves on to the next question, opening a fresh worksheet for it.
    ///
    /// Returns `false` once the last question has been passed, leaving
    /// the final worksheet in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the next question cannot be solved, which
    /// cannot happen for generated questions.
    pub fn advance(&mut self) -> Result<bool> {
        let next = self.index + 1;
        let Some(question) = self.questions.get(next) else {
            return Ok(false);
        };
        self.worksheet = Worksheet::new(question.top.clone(), question.bottom.clone())?;
        self.index = next;
        Ok(true)
    }

    /// Whether the open worksheet is the last question of the round.
    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.index + 1 >= self.questions.len()
    }

    /// Zero-based position of the open question.
    #[must_use]
    pub const fn question_index(&self) -> usize {
        self.index
    }

    /// Total number of questions in the round.
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// The question currently on the worksheet.
    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.questions[self.index]
    }

    /// The open worksheet.
    #[must_use]
    pub const fn worksheet(&self) -> &Worksheet {
        &self.worksheet
    }
}
