//! Alzantot genetic attack
//!
//! Population variant from "Generating Natural Language Adversarial Examples"
//! (Alzantot et al., 2018).

use rand::Rng;

use crate::error::TextError;
use crate::goal::traits::GoalResult;
use crate::operators::mutation::WordSwapMutation;
use crate::operators::traits::{PopulationStrategy, SearchContext};
use crate::population::member::PopulationMember;
use crate::text::attacked_text::AttackedText;

/// Budgets from candidate counts, uniform crossover
///
/// Each position's budget is the number of swaps the transformation proposes for
/// it, so positions with many alternatives are mutated more often. A successful
/// mutation exhausts its position.
#[derive(Clone, Debug, Default)]
pub struct AlzantotStrategy;

impl AlzantotStrategy {
    /// Create a new Alzantot strategy
    pub fn new() -> Self {
        Self
    }

    /// Number of candidate swaps for each word of `text`, floored at a small epsilon
    fn candidate_budget<R: Rng>(ctx: &SearchContext<'_, R>, text: &AttackedText) -> Vec<usize> {
        let mut counts = vec![0usize; text.num_words()];
        for candidate in ctx.propose(text, None) {
            let Some(&index) = candidate.newly_modified_indices().iter().next() else {
                continue;
            };
            if let Some(count) = counts.get_mut(index) {
                *count += 1;
            }
        }

        let min = counts.iter().copied().min().unwrap_or(0);
        let epsilon = (min / 10).max(1);
        for count in &mut counts {
            *count = (*count).max(epsilon);
        }
        counts
    }
}

impl PopulationStrategy for AlzantotStrategy {
    fn name(&self) -> &'static str {
        "alzantot"
    }

    fn initialize_population<R: Rng>(
        &self,
        ctx: &mut SearchContext<'_, R>,
        size: usize,
    ) -> Vec<PopulationMember> {
        let original = ctx.original();
        let budget = Self::candidate_budget(ctx, &original.text);
        let seed = PopulationMember::new(original.clone(), budget);

        let mutation = WordSwapMutation::new();
        (0..size)
            .map(|_| mutation.perturb(self, seed.clone(), ctx, None))
            .collect()
    }

    fn recombine<R: Rng>(
        &self,
        parent1: &PopulationMember,
        parent2: &PopulationMember,
        rng: &mut R,
    ) -> Result<(AttackedText, Vec<usize>), TextError> {
        let mut budget = parent1.num_replacements_per_word().to_vec();
        let mut indices = Vec::new();
        let mut words = Vec::new();

        for i in 0..parent1.text().num_words() {
            if !rng.gen_bool(0.5) {
                continue;
            }
            let word = parent2.text().word(i).ok_or(TextError::IndexOutOfRange {
                index: i,
                len: parent2.text().num_words(),
            })?;
            indices.push(i);
            words.push(word.to_string());
            if let (Some(slot), Some(&other)) =
                (budget.get_mut(i), parent2.num_replacements_per_word().get(i))
            {
                *slot = other;
            }
        }

        let child = parent1.text().replace_words_at_indices(&indices, &words)?;
        Ok((child, budget))
    }

    fn apply_mutation_result(
        &self,
        member: &PopulationMember,
        new_result: GoalResult,
        position: usize,
    ) -> PopulationMember {
        let mut budget = member.num_replacements_per_word().to_vec();
        if let Some(slot) = budget.get_mut(position) {
            *slot = 0;
        }
        PopulationMember::new(new_result, budget)
    }
}
