//! Population member
//!
//! This module provides the [`PopulationMember`] type that pairs an evaluated text
//! with its per-position replacement budget.

use serde::{Deserialize, Serialize};

use crate::goal::traits::GoalResult;
use crate::text::attacked_text::AttackedText;

/// A member of the population
///
/// The text is owned by the oracle result, so text and result are always
/// consistent. Members are never changed after construction; perturbation builds a
/// new member.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PopulationMember {
    result: GoalResult,
    num_replacements_per_word: Vec<usize>,
}

impl PopulationMember {
    /// Create a member from an evaluated text and its replacement budget
    ///
    /// The budget has one entry per word of the unperturbed input.
    pub fn new(result: GoalResult, num_replacements_per_word: Vec<usize>) -> Self {
        Self {
            result,
            num_replacements_per_word,
        }
    }

    /// The candidate text
    pub fn text(&self) -> &AttackedText {
        &self.result.text
    }

    /// The oracle result for the text
    pub fn result(&self) -> &GoalResult {
        &self.result
    }

    /// Take the oracle result out of this member
    pub fn into_result(self) -> GoalResult {
        self.result
    }

    /// Fitness of the text
    pub fn score(&self) -> f64 {
        self.result.score
    }

    /// Whether the text reached the attack goal
    pub fn succeeded(&self) -> bool {
        self.result.succeeded()
    }

    /// Remaining replacement attempts per word position
    pub fn num_replacements_per_word(&self) -> &[usize] {
        &self.num_replacements_per_word
    }

    /// Number of positions that may still be mutated
    pub fn mutable_positions(&self) -> usize {
        self.num_replacements_per_word
            .iter()
            .filter(|&&n| n > 0)
            .count()
    }

    /// Check if this member scores strictly higher than another
    pub fn is_better_than(&self, other: &Self) -> bool {
        self.score() > other.score()
    }
}
