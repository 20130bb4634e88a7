//! Lesson planning: the questions a session will walk through.

use rand::Rng;
use serde::Serialize;
use sumwise_solver::{generate, generate_no_carry, Question, Tier};

/// The generated material for one lesson.
///
/// The first example is always carry-free so the mechanics are shown
/// before regrouping is introduced; everything after it comes from the
/// configured tier's full ranges.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonPlan {
    /// Worked examples, played back step by step.
    pub examples: Vec<Question>,
    /// Questions the learner answers unaided.
    pub practice: Vec<Question>,
}

impl LessonPlan {
    /// Generates a lesson for the given tier and counts.
    pub fn generate<R: Rng + ?Sized>(
        rng: &mut R,
        tier: Tier,
        example_count: u32,
        practice_count: u32,
    ) -> Self {
        let mut examples = Vec::with_capacity(example_count as usize);
        if example_count > 0 {
            examples.push(generate_no_carry(rng));
        }
        for _ in 1..example_count {
            examples.push(generate(tier, rng));
        }

        let practice = (0..practice_count).map(|_| generate(tier, rng)).collect();

        Self { examples, practice }
    }
}
