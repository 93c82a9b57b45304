//! Text-to-text objectives
//!
//! Attack goals for models that emit text (translation, summarisation, instruction
//! following). The attack degrades the overlap between the perturbed output and the
//! output produced for the unperturbed input.

use std::collections::HashMap;

use crate::goal::traits::GoalObjective;
use crate::text::attacked_text::AttackedText;

/// Unigram F1 overlap between two whitespace-tokenized strings
///
/// Returns 1.0 when both strings are empty.
pub fn unigram_f1(candidate: &str, reference: &str) -> f64 {
    let mut reference_counts: HashMap<&str, usize> = HashMap::new();
    for token in reference.split_whitespace() {
        *reference_counts.entry(token).or_insert(0) += 1;
    }
    let reference_len: usize = reference_counts.values().sum();
    let candidate_len = candidate.split_whitespace().count();

    if candidate_len == 0 && reference_len == 0 {
        return 1.0;
    }
    if candidate_len == 0 || reference_len == 0 {
        return 0.0;
    }

    let mut overlap = 0usize;
    for token in candidate.split_whitespace() {
        if let Some(count) = reference_counts.get_mut(token) {
            if *count > 0 {
                *count -= 1;
                overlap += 1;
            }
        }
    }
    if overlap == 0 {
        return 0.0;
    }

    let precision = overlap as f64 / candidate_len as f64;
    let recall = overlap as f64 / reference_len as f64;
    2.0 * precision * recall / (precision + recall)
}

/// Objective over a model that produces text
///
/// The score is `1 - unigram_f1(output, original_output)`; the attack succeeds once
/// the overlap drops to `max_overlap` or below.
pub struct TextToTextObjective<M> {
    model: M,
    original_output: String,
    max_overlap: f64,
}

impl<M> TextToTextObjective<M>
where
    M: Fn(&[String]) -> Vec<String> + Send + Sync,
{
    /// Create an objective against the model's output for the unperturbed input
    pub fn new(model: M, original_output: impl Into<String>, max_overlap: f64) -> Self {
        Self {
            model,
            original_output: original_output.into(),
            max_overlap,
        }
    }

    /// The reference output
    pub fn original_output(&self) -> &str {
        &self.original_output
    }
}

impl<M> GoalObjective for TextToTextObjective<M>
where
    M: Fn(&[String]) -> Vec<String> + Send + Sync,
{
    type Output = String;

    fn predict(&self, texts: &[AttackedText]) -> Vec<String> {
        let inputs: Vec<String> = texts.iter().map(AttackedText::text).collect();
        (self.model)(&inputs)
    }

    fn score(&self, output: &String) -> f64 {
        1.0 - unigram_f1(output, &self.original_output)
    }

    fn is_goal_complete(&self, output: &String) -> bool {
        unigram_f1(output, &self.original_output) <= self.max_overlap
    }

    fn describe(&self, output: &String) -> String {
        output.clone()
    }
}
