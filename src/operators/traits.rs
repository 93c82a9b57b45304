//! Operator traits
//!
//! This module defines the hooks a concrete genetic-search variant supplies and the
//! context through which operators reach the oracle and the candidate generator.

use std::collections::BTreeSet;
use std::slice;

use rand::Rng;

use crate::cancellation::SearchToken;
use crate::error::TextError;
use crate::goal::traits::{GoalFunction, GoalResult};
use crate::population::member::PopulationMember;
use crate::text::attacked_text::AttackedText;
use crate::transformation::candidates::CandidateGenerator;

/// Collaborators and state shared by all operators during one search
///
/// Every call into the oracle or the candidate generator goes through this context.
/// Once the token is cancelled the context stops forwarding calls, so no adapter is
/// invoked for the rest of the search.
pub struct SearchContext<'a, R: Rng> {
    goal: &'a dyn GoalFunction,
    candidates: &'a CandidateGenerator,
    token: &'a SearchToken,
    original: &'a GoalResult,
    rng: &'a mut R,
}

impl<'a, R: Rng> SearchContext<'a, R> {
    /// Create a context for one search
    pub fn new(
        goal: &'a dyn GoalFunction,
        candidates: &'a CandidateGenerator,
        token: &'a SearchToken,
        original: &'a GoalResult,
        rng: &'a mut R,
    ) -> Self {
        Self {
            goal,
            candidates,
            token,
            original,
            rng,
        }
    }

    /// Result for the unperturbed input
    pub fn original(&self) -> &'a GoalResult {
        self.original
    }

    /// The unperturbed input
    pub fn original_text(&self) -> &'a AttackedText {
        &self.original.text
    }

    /// The random source for this search
    pub fn rng(&mut self) -> &mut R {
        &mut *self.rng
    }

    /// Whether the oracle has ended the search
    pub fn is_search_over(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Score a batch of candidates, in order
    pub fn evaluate(&self, batch: &[AttackedText]) -> Vec<GoalResult> {
        if self.is_search_over() {
            return Vec::new();
        }
        self.goal.get_results(batch, self.token)
    }

    /// Score a single candidate
    pub fn evaluate_one(&self, text: &AttackedText) -> Option<GoalResult> {
        self.evaluate(slice::from_ref(text)).into_iter().next()
    }

    /// Legal rewrites of `text` at `indices` (all positions when `None`)
    pub fn propose(
        &self,
        text: &AttackedText,
        indices: Option<&BTreeSet<usize>>,
    ) -> Vec<AttackedText> {
        if self.is_search_over() {
            return Vec::new();
        }
        self.candidates.propose(text, self.original_text(), indices)
    }

    /// Validate `candidate` derived from `reference`
    pub fn check_constraints(&self, candidate: &AttackedText, reference: &AttackedText) -> bool {
        if self.is_search_over() {
            return false;
        }
        self.candidates
            .check_constraints(candidate, reference, self.original_text())
    }
}

/// Hooks supplied by a concrete genetic-search variant
pub trait PopulationStrategy: Send + Sync {
    /// Variant name, for logging
    fn name(&self) -> &'static str;

    /// Build the starting population of `size` members from `ctx.original()`
    fn initialize_population<R: Rng>(
        &self,
        ctx: &mut SearchContext<'_, R>,
        size: usize,
    ) -> Vec<PopulationMember>;

    /// Recombine two parents into a raw child text and its replacement budget
    ///
    /// The child's `newly_modified_indices` must name the positions taken from
    /// `parent2`.
    fn recombine<R: Rng>(
        &self,
        parent1: &PopulationMember,
        parent2: &PopulationMember,
        rng: &mut R,
    ) -> Result<(AttackedText, Vec<usize>), TextError>;

    /// Build the member that replaces `member` after a successful mutation at
    /// `position`
    fn apply_mutation_result(
        &self,
        member: &PopulationMember,
        new_result: GoalResult,
        position: usize,
    ) -> PopulationMember;
}
