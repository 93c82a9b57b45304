//! Budgeted oracle
//!
//! [`Oracle`] drives a [`GoalObjective`] under an optional query budget. The query
//! counter is atomic so the oracle can be shared across threads.

use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::debug;

use crate::cancellation::SearchToken;
use crate::goal::traits::{GoalFunction, GoalObjective, GoalResult, GoalStatus};
use crate::text::attacked_text::AttackedText;

/// Goal function wrapping an objective with a query budget
#[derive(Debug)]
pub struct Oracle<O> {
    objective: O,
    query_budget: Option<usize>,
    num_queries: AtomicUsize,
}

impl<O: GoalObjective> Oracle<O> {
    /// Create an oracle with an unlimited budget
    pub fn new(objective: O) -> Self {
        Self {
            objective,
            query_budget: None,
            num_queries: AtomicUsize::new(0),
        }
    }

    /// Limit the total number of model queries
    pub fn with_query_budget(mut self, budget: usize) -> Self {
        self.query_budget = Some(budget);
        self
    }

    /// The configured query budget
    pub fn query_budget(&self) -> Option<usize> {
        self.query_budget
    }

    /// The wrapped objective
    pub fn objective(&self) -> &O {
        &self.objective
    }

    /// Reset the query counter before attacking a new input
    pub fn reset_queries(&self) {
        self.num_queries.store(0, Ordering::SeqCst);
    }
}

impl<O: GoalObjective> GoalFunction for Oracle<O> {
    fn get_results(&self, batch: &[AttackedText], token: &SearchToken) -> Vec<GoalResult> {
        if token.is_cancelled() {
            return Vec::new();
        }

        let mut batch = batch;
        if let Some(budget) = self.query_budget {
            let remaining = budget.saturating_sub(self.num_queries.load(Ordering::SeqCst));
            if remaining == 0 {
                token.cancel();
                return Vec::new();
            }
            if batch.len() > remaining {
                batch = &batch[..remaining];
            }
        }
        if batch.is_empty() {
            return Vec::new();
        }

        let outputs = self.objective.predict(batch);
        let num_queries = self.num_queries.fetch_add(batch.len(), Ordering::SeqCst) + batch.len();
        let exhausted = self.query_budget.is_some_and(|budget| num_queries >= budget);
        if exhausted {
            debug!(num_queries, "query budget exhausted");
            token.cancel();
        }

        batch
            .iter()
            .zip(outputs)
            .map(|(text, output)| {
                let status = if self.objective.is_goal_complete(&output) {
                    GoalStatus::Succeeded
                } else if exhausted {
                    GoalStatus::Failed
                } else {
                    GoalStatus::InProgress
                };
                GoalResult {
                    text: text.clone(),
                    score: self.objective.score(&output),
                    status,
                    output: self.objective.describe(&output),
                    num_queries,
                }
            })
            .collect()
    }

    fn num_queries(&self) -> usize {
        self.num_queries.load(Ordering::SeqCst)
    }
}
