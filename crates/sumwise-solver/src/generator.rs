//! Random question generation.
//!
//! Questions are drawn uniformly from tier-specific operand ranges. The
//! generator takes any [`Rng`] so tests can inject a seeded source and
//! assert range and no-carry properties.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Difficulty tier controlling operand digit-count ranges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tier {
    /// 3-digit top operand, 2-digit bottom operand (default).
    #[default]
    Easy,
    /// 4-digit top operand, 3-digit bottom operand.
    Medium,
    /// 5-digit top operand, 4-digit bottom operand.
    Hard,
}

impl Tier {
    /// Inclusive bounds for the top operand at this tier.
    const fn top_range(self) -> (u32, u32) {
        match self {
            Self::Easy => (100, 999),
            Self::Medium => (1_000, 9_999),
            Self::Hard => (10_000, 99_999),
        }
    }

    /// Inclusive bounds for the bottom operand at this tier.
    const fn bottom_range(self) -> (u32, u32) {
        match self {
            Self::Easy => (10, 99),
            Self::Medium => (100, 999),
            Self::Hard => (1_000, 9_999),
        }
    }

    /// Parses a string into a `Tier`, case-insensitively.
    fn from_str_case_insensitive(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for Tier {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str_case_insensitive(&s).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid difficulty tier '{s}': expected one of 'easy', 'medium', 'hard'"
            ))
        })
    }
}

impl Serialize for Tier {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let s = match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        };
        serializer.serialize_str(s)
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Easy => write!(f, "easy"),
            Self::Medium => write!(f, "medium"),
            Self::Hard => write!(f, "hard"),
        }
    }
}

/// One generated addition problem.
///
/// Operand strings contain only the characters '0'-'9', are non-empty,
/// and never carry leading zeros when produced by the generator. A
/// question is immutable once generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// The top operand as a decimal digit string.
    pub top: String,
    /// The bottom operand as a decimal digit string.
    pub bottom: String,
    /// Difficulty tier the question was generated at.
    pub tier: Tier,
}

impl Question {
    /// Solves this question, producing the ground-truth digit rows and
    /// worked-example steps.
    ///
    /// # Errors
    ///
    /// Returns an error only for malformed operand strings, which the
    /// generator never produces.
    pub fn solved(&self) -> crate::Result<crate::SolvedSum> {
        crate::solve(&self.top, &self.bottom)
    }
}

/// Generates a question at the given tier.
///
/// Operands are drawn uniformly from the tier's ranges; carries are not
/// avoided.
pub fn generate<R: Rng + ?Sized>(tier: Tier, rng: &mut R) -> Question {
    let (top_lo, top_hi) = tier.top_range();
    let (bottom_lo, bottom_hi) = tier.bottom_range();
    Question {
        top: rng.gen_range(top_lo..=top_hi).to_string(),
        bottom: rng.gen_range(bottom_lo..=bottom_hi).to_string(),
        tier,
    }
}

/// Generates a question guaranteed to involve no carries.
///
/// Used once, for the very first teaching example, so a first-time
/// learner sees plain column addition before carrying is introduced.
/// The top operand has three digits with a small leading digit; the
/// bottom operand is built digit-by-digit so every column sum stays
/// below 10.
pub fn generate_no_carry<R: Rng + ?Sized>(rng: &mut R) -> Question {
    let hundreds = rng.gen_range(1..=4u32);
    // Cap the tens digit at 8 so the bottom tens digit can be nonzero.
    let tens = rng.gen_range(0..=8u32);
    let units = rng.gen_range(0..=9u32);

    let bottom_tens = rng.gen_range(1..=9 - tens);
    let bottom_units = rng.gen_range(0..=9 - units);

    Question {
        top: (hundreds * 100 + tens * 10 + units).to_string(),
        bottom: (bottom_tens * 10 + bottom_units).to_string(),
        tier: Tier::Easy,
    }
}
