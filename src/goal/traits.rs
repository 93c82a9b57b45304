//! Goal function traits
//!
//! This module defines the oracle interface seen by the search and the
//! model-specific objective plugged into [`Oracle`](super::oracle::Oracle).

use std::fmt::Debug;
use std::slice;

use serde::{Deserialize, Serialize};

use crate::cancellation::SearchToken;
use crate::text::attacked_text::AttackedText;

/// Status of an evaluated candidate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoalStatus {
    /// The goal has not been reached yet
    InProgress,
    /// The candidate fulfils the attack goal
    Succeeded,
    /// The query budget ran out before the goal was reached
    Failed,
}

/// Scored evaluation of one candidate text
///
/// The result owns the text it was computed for, so a result can never be paired
/// with a different text.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GoalResult {
    /// The evaluated text
    pub text: AttackedText,
    /// Fitness; higher is closer to the attack goal
    pub score: f64,
    /// Goal status
    pub status: GoalStatus,
    /// Human-readable model output
    pub output: String,
    /// Oracle query count after this evaluation
    pub num_queries: usize,
}

impl GoalResult {
    /// Whether this result reached the attack goal
    pub fn succeeded(&self) -> bool {
        self.status == GoalStatus::Succeeded
    }

    /// The same evaluation attached to a textually identical text
    ///
    /// Used when bookkeeping annotations change but the words do not.
    pub fn with_text(&self, text: AttackedText) -> Self {
        debug_assert!(self.text.same_text(&text));
        Self {
            text,
            score: self.score,
            status: self.status,
            output: self.output.clone(),
            num_queries: self.num_queries,
        }
    }
}

/// Oracle interface used by the search
///
/// Results are returned in the order of the submitted batch. An oracle may return
/// fewer results than submitted when its budget runs out, in which case it cancels
/// `token`. Once `token` is cancelled, the oracle must not query the model again.
pub trait GoalFunction: Send + Sync {
    /// Evaluate a batch of candidate texts
    fn get_results(&self, batch: &[AttackedText], token: &SearchToken) -> Vec<GoalResult>;

    /// Number of model queries issued so far
    fn num_queries(&self) -> usize;

    /// Evaluate a single text
    fn evaluate_one(&self, text: &AttackedText, token: &SearchToken) -> Option<GoalResult> {
        self.get_results(slice::from_ref(text), token)
            .into_iter()
            .next()
    }
}

/// Model-specific part of a goal function
pub trait GoalObjective: Send + Sync {
    /// Raw model output for one text
    type Output: Debug;

    /// Run the model on a batch, returning outputs in input order
    fn predict(&self, texts: &[AttackedText]) -> Vec<Self::Output>;

    /// Map an output to a fitness score
    fn score(&self, output: &Self::Output) -> f64;

    /// Whether an output fulfils the attack goal
    fn is_goal_complete(&self, output: &Self::Output) -> bool;

    /// Human-readable rendering of an output
    fn describe(&self, output: &Self::Output) -> String {
        format!("{output:?}")
    }
}
