//! Benchmark objectives
//!
//! Deterministic, model-free objectives for exercising the search.

use crate::goal::traits::GoalObjective;
use crate::text::attacked_text::AttackedText;

/// Counts occurrences of a target word
///
/// The score is the number of words equal to `target`; the goal is complete once
/// at least `required` occurrences are present.
#[derive(Clone, Debug)]
pub struct TargetWordCount {
    target: String,
    required: usize,
}

impl TargetWordCount {
    /// Create a new target word objective
    pub fn new(target: impl Into<String>, required: usize) -> Self {
        Self {
            target: target.into(),
            required,
        }
    }
}

impl GoalObjective for TargetWordCount {
    type Output = usize;

    fn predict(&self, texts: &[AttackedText]) -> Vec<usize> {
        texts
            .iter()
            .map(|t| t.words().iter().filter(|w| **w == self.target).count())
            .collect()
    }

    fn score(&self, output: &usize) -> f64 {
        *output as f64
    }

    fn is_goal_complete(&self, output: &usize) -> bool {
        *output >= self.required
    }

    fn describe(&self, output: &usize) -> String {
        format!("{output} x '{}'", self.target)
    }
}
