//! Crossover operator
//!
//! This module wraps a variant's recombination rule with modification bookkeeping,
//! constraint validation and bounded retries.

use std::collections::BTreeSet;

use rand::Rng;
use tracing::{debug, trace, warn};

use crate::operators::traits::{PopulationStrategy, SearchContext};
use crate::population::member::PopulationMember;
use crate::text::attacked_text::AttackedText;

/// Default number of retries after a rejected child
pub const DEFAULT_MAX_CROSSOVER_RETRIES: usize = 20;

/// Crossover with post-recombination constraint checking
///
/// A child is accepted when checking is disabled, when it is textually identical to
/// a parent, or when it passes the constraints relative to the most recently
/// transformed parent. After `max_crossover_retries + 1` rejected attempts a
/// randomly chosen parent stands in for the child.
#[derive(Clone, Debug)]
pub struct GuardedCrossover {
    /// Validate children against the constraints
    pub post_crossover_check: bool,
    /// Retries after the first rejected attempt
    pub max_crossover_retries: usize,
}

impl GuardedCrossover {
    /// Create a new guarded crossover
    pub fn new(post_crossover_check: bool, max_crossover_retries: usize) -> Self {
        Self {
            post_crossover_check,
            max_crossover_retries,
        }
    }

    /// Produce one child from two parents
    ///
    /// Spends at most one oracle query, and none when a parent is returned.
    pub fn crossover<S, R>(
        &self,
        strategy: &S,
        parent1: &PopulationMember,
        parent2: &PopulationMember,
        ctx: &mut SearchContext<'_, R>,
    ) -> PopulationMember
    where
        S: PopulationStrategy + ?Sized,
        R: Rng,
    {
        let mut accepted = None;
        for attempt in 0..=self.max_crossover_retries {
            if ctx.is_search_over() {
                break;
            }

            let (raw_child, budget) = match strategy.recombine(parent1, parent2, ctx.rng()) {
                Ok(child) => child,
                Err(e) => {
                    warn!(error = %e, strategy = strategy.name(), "recombination failed");
                    continue;
                }
            };
            let child = attribute_modifications(raw_child, parent1, parent2);

            if self.accepts(&child, parent1, parent2, ctx) {
                accepted = Some((child, budget));
                break;
            }
            trace!(attempt, "crossover child rejected by constraints");
        }

        let Some((child, budget)) = accepted else {
            let fallback = if ctx.rng().gen_bool(0.5) {
                parent1
            } else {
                parent2
            };
            debug!(
                retries = self.max_crossover_retries,
                "crossover fell back to a parent"
            );
            return fallback.clone();
        };

        for parent in [parent1, parent2] {
            if child.same_text(parent.text()) {
                return PopulationMember::new(parent.result().with_text(child), budget);
            }
        }

        match ctx.evaluate_one(&child) {
            Some(result) => PopulationMember::new(result, budget),
            None => parent1.clone(),
        }
    }

    fn accepts<R: Rng>(
        &self,
        child: &AttackedText,
        parent1: &PopulationMember,
        parent2: &PopulationMember,
        ctx: &SearchContext<'_, R>,
    ) -> bool {
        if !self.post_crossover_check
            || child.same_text(parent1.text())
            || child.same_text(parent2.text())
        {
            return true;
        }

        let previous = if parent1.text().last_transformation().is_some() {
            parent1.text()
        } else if parent2.text().last_transformation().is_some() {
            parent2.text()
        } else {
            return true;
        };
        ctx.check_constraints(child, previous)
    }
}

impl Default for GuardedCrossover {
    fn default() -> Self {
        Self::new(true, DEFAULT_MAX_CROSSOVER_RETRIES)
    }
}

/// Attribute each surviving modification of `child` to the parent it came from
///
/// Positions taken from `parent2` are the child's newly modified positions; every
/// other position keeps `parent1`'s word.
fn attribute_modifications(
    child: AttackedText,
    parent1: &PopulationMember,
    parent2: &PopulationMember,
) -> AttackedText {
    let newly = child.newly_modified_indices();
    let modified: BTreeSet<usize> = parent1
        .text()
        .modified_indices()
        .difference(newly)
        .chain(parent2.text().modified_indices().intersection(newly))
        .copied()
        .collect();

    let provenance = parent1
        .text()
        .last_transformation()
        .or_else(|| parent2.text().last_transformation())
        .cloned();

    child
        .with_modified_indices(modified)
        .with_last_transformation(provenance)
}
