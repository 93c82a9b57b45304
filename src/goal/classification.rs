//! Classification objectives
//!
//! Attack goals for models that emit a probability vector per input.

use crate::goal::traits::GoalObjective;
use crate::text::attacked_text::AttackedText;

/// What counts as a successful attack on a classifier
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClassificationGoal {
    /// Any label other than the ground truth
    Untargeted {
        /// Correct label of the unperturbed input
        ground_truth: usize,
    },
    /// A specific label
    Targeted {
        /// Label the attack tries to reach
        target: usize,
    },
}

/// Objective over a classifier returning class probabilities
///
/// `model` maps a batch of input strings to one probability vector per input.
pub struct ClassificationObjective<M> {
    model: M,
    goal: ClassificationGoal,
}

impl<M> ClassificationObjective<M>
where
    M: Fn(&[String]) -> Vec<Vec<f64>> + Send + Sync,
{
    /// Untargeted attack on the given ground-truth label
    pub fn untargeted(model: M, ground_truth: usize) -> Self {
        Self {
            model,
            goal: ClassificationGoal::Untargeted { ground_truth },
        }
    }

    /// Targeted attack toward the given label
    pub fn targeted(model: M, target: usize) -> Self {
        Self {
            model,
            goal: ClassificationGoal::Targeted { target },
        }
    }

    /// The attack goal
    pub fn goal(&self) -> ClassificationGoal {
        self.goal
    }
}

fn argmax(probs: &[f64]) -> Option<usize> {
    probs
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
}

impl<M> GoalObjective for ClassificationObjective<M>
where
    M: Fn(&[String]) -> Vec<Vec<f64>> + Send + Sync,
{
    type Output = Vec<f64>;

    fn predict(&self, texts: &[AttackedText]) -> Vec<Vec<f64>> {
        let inputs: Vec<String> = texts.iter().map(AttackedText::text).collect();
        (self.model)(&inputs)
    }

    fn score(&self, output: &Vec<f64>) -> f64 {
        match self.goal {
            ClassificationGoal::Untargeted { ground_truth } => {
                1.0 - output.get(ground_truth).copied().unwrap_or(0.0)
            }
            ClassificationGoal::Targeted { target } => output.get(target).copied().unwrap_or(0.0),
        }
    }

    fn is_goal_complete(&self, output: &Vec<f64>) -> bool {
        match (self.goal, argmax(output)) {
            (_, None) => false,
            (ClassificationGoal::Untargeted { ground_truth }, Some(label)) => label != ground_truth,
            (ClassificationGoal::Targeted { target }, Some(label)) => label == target,
        }
    }

    fn describe(&self, output: &Vec<f64>) -> String {
        match argmax(output) {
            Some(label) => format!("label {label} ({:.3})", output[label]),
            None => "no prediction".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // Probability of label 1 grows with the number of "awful" words
    fn sentiment(inputs: &[String]) -> Vec<Vec<f64>> {
        inputs
            .iter()
            .map(|s| {
                let negative = s.split(' ').filter(|w| *w == "awful").count() as f64;
                let p = (0.2 + 0.35 * negative).min(1.0);
                vec![1.0 - p, p]
            })
            .collect()
    }

    #[test]
    fn test_untargeted_scoring() {
        let objective = ClassificationObjective::untargeted(sentiment, 0);
        let outputs = objective.predict(&[
            AttackedText::new("a great movie"),
            AttackedText::new("an awful awful movie"),
        ]);

        assert_relative_eq!(objective.score(&outputs[0]), 0.2, epsilon = 1e-12);
        assert!(!objective.is_goal_complete(&outputs[0]));
        assert_relative_eq!(objective.score(&outputs[1]), 0.9, epsilon = 1e-12);
        assert!(objective.is_goal_complete(&outputs[1]));
    }

    #[test]
    fn test_targeted_scoring() {
        let objective = ClassificationObjective::targeted(sentiment, 1);
        let outputs = objective.predict(&[AttackedText::new("awful")]);

        assert_relative_eq!(objective.score(&outputs[0]), 0.55, epsilon = 1e-12);
        assert!(objective.is_goal_complete(&outputs[0]));
        assert_eq!(objective.describe(&outputs[0]), "label 1 (0.550)");
    }

    #[test]
    fn test_empty_output_never_succeeds() {
        let objective = ClassificationObjective::untargeted(sentiment, 0);
        assert!(!objective.is_goal_complete(&Vec::new()));
        assert_eq!(objective.score(&Vec::new()), 1.0);
        assert_eq!(objective.describe(&Vec::new()), "no prediction");
    }
}
