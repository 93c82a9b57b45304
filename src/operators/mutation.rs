//! Mutation operator
//!
//! This module provides the word-swap perturbation applied to every child.

use std::collections::BTreeSet;

use rand::Rng;
use rand_distr::{Distribution, WeightedIndex};
use tracing::trace;

use crate::goal::traits::GoalResult;
use crate::operators::traits::{PopulationStrategy, SearchContext};
use crate::population::member::PopulationMember;

/// Replaces one word of a member when doing so strictly improves its score
///
/// Positions are drawn in proportion to their remaining replacement budget. A
/// position whose candidates fail to improve the member is excluded for the rest of
/// the call. At most one edit is committed per call, and a call never lowers the
/// member's score.
#[derive(Clone, Copy, Debug, Default)]
pub struct WordSwapMutation;

impl WordSwapMutation {
    /// Create a new word-swap mutation
    pub fn new() -> Self {
        Self
    }

    /// Perturb `member`, returning the improved member or `member` itself
    ///
    /// When `index` is given, only that position is tried.
    pub fn perturb<S, R>(
        &self,
        strategy: &S,
        member: PopulationMember,
        ctx: &mut SearchContext<'_, R>,
        index: Option<usize>,
    ) -> PopulationMember
    where
        S: PopulationStrategy + ?Sized,
        R: Rng,
    {
        let attempts = member.mutable_positions();
        if attempts == 0 {
            return member;
        }

        let mut weights = member.num_replacements_per_word().to_vec();
        for attempt in 0..attempts {
            if ctx.is_search_over() {
                break;
            }

            let position = match index {
                Some(position) => position,
                None => match WeightedIndex::new(&weights) {
                    Ok(dist) => dist.sample(ctx.rng()),
                    Err(_) => break,
                },
            };

            let candidates = ctx.propose(member.text(), Some(&BTreeSet::from([position])));
            if candidates.is_empty() {
                trace!(position, attempt, "no candidates at position");
                if index.is_some() {
                    break;
                }
                continue;
            }

            let results = ctx.evaluate(&candidates);
            if ctx.is_search_over() {
                return member;
            }

            if let Some(best) = best_improvement(results, member.score()) {
                trace!(position, score = best.score, "mutation improved member");
                return strategy.apply_mutation_result(&member, best, position);
            }

            if let Some(weight) = weights.get_mut(position) {
                *weight = 0;
            }
            if index.is_some() {
                break;
            }
        }

        member
    }
}

/// The first result with the largest strictly positive gain over `current`
fn best_improvement(results: Vec<GoalResult>, current: f64) -> Option<GoalResult> {
    let mut best: Option<GoalResult> = None;
    for result in results {
        let gain = result.score - current;
        if !(gain > 0.0) {
            continue;
        }
        if best.as_ref().map_or(true, |b| result.score > b.score) {
            best = Some(result);
        }
    }
    best
}
