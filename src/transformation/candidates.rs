//! Candidate generation
//!
//! [`CandidateGenerator`] is the single entry point the search uses to obtain legal
//! rewrites of a text and to validate recombined texts.

use std::collections::BTreeSet;
use std::fmt;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::trace;

use crate::text::attacked_text::AttackedText;
use crate::transformation::traits::{Constraint, PreTransformationConstraint, Transformation};

/// A transformation together with its pre- and post-transformation constraints
pub struct CandidateGenerator {
    transformation: Box<dyn Transformation>,
    pre_constraints: Vec<Box<dyn PreTransformationConstraint>>,
    constraints: Vec<Box<dyn Constraint>>,
}

impl CandidateGenerator {
    /// Create a generator without constraints
    pub fn new(transformation: impl Transformation + 'static) -> Self {
        Self {
            transformation: Box::new(transformation),
            pre_constraints: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Add a pre-transformation constraint
    pub fn with_pre_constraint(
        mut self,
        constraint: impl PreTransformationConstraint + 'static,
    ) -> Self {
        self.pre_constraints.push(Box::new(constraint));
        self
    }

    /// Add a post-transformation constraint
    pub fn with_constraint(mut self, constraint: impl Constraint + 'static) -> Self {
        self.constraints.push(Box::new(constraint));
        self
    }

    /// The wrapped transformation
    pub fn transformation(&self) -> &dyn Transformation {
        self.transformation.as_ref()
    }

    /// Propose legal rewrites of `text`
    ///
    /// `indices` limits the positions considered (all positions when `None`); it is
    /// further intersected with every pre-transformation constraint. Candidates that
    /// leave the words unchanged or violate a constraint are dropped.
    pub fn propose(
        &self,
        text: &AttackedText,
        original: &AttackedText,
        indices: Option<&BTreeSet<usize>>,
    ) -> Vec<AttackedText> {
        let mut allowed: BTreeSet<usize> = match indices {
            Some(indices) => indices.clone(),
            None => (0..text.num_words()).collect(),
        };
        for constraint in &self.pre_constraints {
            let modifiable = constraint.modifiable_indices(text);
            allowed.retain(|i| modifiable.contains(i));
        }
        if allowed.is_empty() {
            return Vec::new();
        }

        let candidates: Vec<AttackedText> = self
            .transformation
            .transform(text, &allowed)
            .into_iter()
            .filter(|candidate| !candidate.same_text(text))
            .collect();
        let proposed = candidates.len();
        let filtered = self.filter(candidates, text, original);
        trace!(
            proposed,
            accepted = filtered.len(),
            "filtered transformation candidates"
        );
        filtered
    }

    /// Check `candidate` against every post-transformation constraint
    ///
    /// `reference` is the text the candidate was derived from.
    pub fn check_constraints(
        &self,
        candidate: &AttackedText,
        reference: &AttackedText,
        original: &AttackedText,
    ) -> bool {
        self.constraints.iter().all(|constraint| {
            let against = if constraint.compare_against_original() {
                original
            } else {
                reference
            };
            constraint.check(candidate, against)
        })
    }

    #[cfg(not(feature = "parallel"))]
    fn filter(
        &self,
        candidates: Vec<AttackedText>,
        reference: &AttackedText,
        original: &AttackedText,
    ) -> Vec<AttackedText> {
        candidates
            .into_iter()
            .filter(|c| self.check_constraints(c, reference, original))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn filter(
        &self,
        candidates: Vec<AttackedText>,
        reference: &AttackedText,
        original: &AttackedText,
    ) -> Vec<AttackedText> {
        candidates
            .into_par_iter()
            .filter(|c| self.check_constraints(c, reference, original))
            .collect()
    }
}

impl fmt::Debug for CandidateGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CandidateGenerator")
            .field("transformation", &self.transformation.name())
            .field(
                "pre_constraints",
                &self.pre_constraints.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .field(
                "constraints",
                &self.constraints.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
