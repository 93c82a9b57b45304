//! Improved genetic attack
//!
//! Population variant from "Natural Language Adversarial Attacks and Defenses in
//! Word Level" (Wang et al., 2019).

use rand::Rng;

use crate::error::TextError;
use crate::goal::traits::GoalResult;
use crate::operators::mutation::WordSwapMutation;
use crate::operators::traits::{PopulationStrategy, SearchContext};
use crate::population::member::PopulationMember;
use crate::text::attacked_text::AttackedText;

/// Default number of replacements allowed at each position
pub const DEFAULT_MAX_REPLACE_TIMES_PER_INDEX: usize = 5;

/// Fixed per-position budgets, single-point crossover
///
/// The initial population seeds one member per position by perturbing that
/// position only. Every successful mutation spends one replacement at its position.
#[derive(Clone, Debug)]
pub struct ImprovedStrategy {
    /// Replacements allowed at each position
    pub max_replace_times_per_index: usize,
}

impl ImprovedStrategy {
    /// Create a new improved strategy with the default budget
    pub fn new() -> Self {
        Self {
            max_replace_times_per_index: DEFAULT_MAX_REPLACE_TIMES_PER_INDEX,
        }
    }

    /// Set the number of replacements allowed at each position
    pub fn with_max_replace_times_per_index(mut self, max: usize) -> Self {
        self.max_replace_times_per_index = max;
        self
    }
}

impl Default for ImprovedStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl PopulationStrategy for ImprovedStrategy {
    fn name(&self) -> &'static str {
        "improved"
    }

    fn initialize_population<R: Rng>(
        &self,
        ctx: &mut SearchContext<'_, R>,
        size: usize,
    ) -> Vec<PopulationMember> {
        let original = ctx.original();
        let num_words = original.text.num_words();
        let seed = PopulationMember::new(
            original.clone(),
            vec![self.max_replace_times_per_index; num_words],
        );
        if num_words == 0 {
            return vec![seed; size];
        }

        // a pinned perturbation is deterministic, so members past `num_words`
        // repeat an earlier position without querying again
        let mutation = WordSwapMutation::new();
        let pinned: Vec<PopulationMember> = (0..size.min(num_words))
            .map(|i| mutation.perturb(self, seed.clone(), ctx, Some(i)))
            .collect();
        pinned.iter().cycle().take(size).cloned().collect()
    }

    fn recombine<R: Rng>(
        &self,
        parent1: &PopulationMember,
        parent2: &PopulationMember,
        rng: &mut R,
    ) -> Result<(AttackedText, Vec<usize>), TextError> {
        let num_words = parent1.text().num_words();
        if num_words == 0 {
            return Ok((
                parent1.text().clone(),
                parent1.num_replacements_per_word().to_vec(),
            ));
        }

        let point = rng.gen_range(0..num_words);
        let indices: Vec<usize> = (point..num_words).collect();
        let words = parent2
            .text()
            .words()
            .get(point..num_words)
            .ok_or(TextError::LengthMismatch {
                expected: num_words,
                actual: parent2.text().num_words(),
            })?;

        let child = parent1.text().replace_words_at_indices(&indices, words)?;
        let budget = parent1
            .num_replacements_per_word()
            .iter()
            .take(point)
            .chain(parent2.num_replacements_per_word().iter().skip(point))
            .copied()
            .collect();
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
            *slot = slot.saturating_sub(1);
        }
        PopulationMember::new(new_result, budget)
    }
}
