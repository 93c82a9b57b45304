//! Termination
//!
//! This module provides the search state machine and the criteria that move a
//! search out of [`SearchState::Running`].

use serde::{Deserialize, Serialize};

/// State of a genetic search
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchState {
    /// Still producing generations
    Running,
    /// The best member reached the attack goal
    Succeeded,
    /// The oracle ended the search
    BudgetExhausted,
    /// The best score did not improve for a full generation
    Stalled,
    /// The generation limit was reached
    MaxGenerations,
}

impl SearchState {
    /// Whether the search has stopped
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SearchState::Running)
    }

    /// Human-readable description of the state
    pub fn reason(&self) -> &'static str {
        match self {
            SearchState::Running => "Search in progress",
            SearchState::Succeeded => "Attack goal reached",
            SearchState::BudgetExhausted => "Query budget exhausted",
            SearchState::Stalled => "No improvement in best score",
            SearchState::MaxGenerations => "Maximum generations reached",
        }
    }
}

/// Search progress observed at the start of a generation
#[derive(Clone, Copy, Debug)]
pub struct SearchProgress {
    /// Current generation number
    pub generation: usize,
    /// Score of the best member of the sorted population
    pub best_score: f64,
    /// Whether the best member reached the attack goal
    pub best_succeeded: bool,
    /// Best score seen before this generation
    pub previous_best: f64,
    /// Whether the search-over flag is set
    pub search_over: bool,
}

/// Termination criterion trait
pub trait TerminationCriterion: Send + Sync {
    /// Check if the search should stop
    fn should_terminate(&self, progress: &SearchProgress) -> bool;

    /// The state the search ends in when this criterion fires
    fn state(&self) -> SearchState;

    /// Get a description of why termination occurred
    fn reason(&self) -> &'static str {
        self.state().reason()
    }
}

/// Terminate when the best member succeeded
#[derive(Clone, Debug, Default)]
pub struct GoalReached;

impl TerminationCriterion for GoalReached {
    fn should_terminate(&self, progress: &SearchProgress) -> bool {
        progress.best_succeeded
    }

    fn state(&self) -> SearchState {
        SearchState::Succeeded
    }
}

/// Terminate once the oracle has ended the search
#[derive(Clone, Debug, Default)]
pub struct BudgetExhausted;

impl TerminationCriterion for BudgetExhausted {
    fn should_terminate(&self, progress: &SearchProgress) -> bool {
        progress.search_over
    }

    fn state(&self) -> SearchState {
        SearchState::BudgetExhausted
    }
}

/// Terminate after a maximum number of generations
#[derive(Clone, Debug)]
pub struct MaxGenerations(pub usize);

impl MaxGenerations {
    /// Create a new max generations criterion
    pub fn new(max: usize) -> Self {
        Self(max)
    }
}

impl TerminationCriterion for MaxGenerations {
    fn should_terminate(&self, progress: &SearchProgress) -> bool {
        progress.generation >= self.0
    }

    fn state(&self) -> SearchState {
        SearchState::MaxGenerations
    }
}

/// Terminate when a generation fails to raise the best score
#[derive(Clone, Debug, Default)]
pub struct NoImprovement;

impl TerminationCriterion for NoImprovement {
    fn should_terminate(&self, progress: &SearchProgress) -> bool {
        !(progress.best_score > progress.previous_best)
    }

    fn state(&self) -> SearchState {
        SearchState::Stalled
    }
}

/// Ordered set of criteria; the first one that fires decides the final state
pub struct TerminationCheck {
    criteria: Vec<Box<dyn TerminationCriterion>>,
}

impl TerminationCheck {
    /// Create a check from criteria in priority order
    pub fn new(criteria: Vec<Box<dyn TerminationCriterion>>) -> Self {
        Self { criteria }
    }

    /// The criteria of a genetic search
    ///
    /// Success outranks budget exhaustion, which outranks the generation limit. The
    /// stall check is only included when `give_up_if_no_improvement` is set.
    pub fn for_search(max_generations: usize, give_up_if_no_improvement: bool) -> Self {
        let mut criteria: Vec<Box<dyn TerminationCriterion>> = vec![
            Box::new(GoalReached),
            Box::new(BudgetExhausted),
            Box::new(MaxGenerations::new(max_generations)),
        ];
        if give_up_if_no_improvement {
            criteria.push(Box::new(NoImprovement));
        }
        Self::new(criteria)
    }

    /// State the search is in given `progress`
    pub fn evaluate(&self, progress: &SearchProgress) -> SearchState {
        self.criteria
            .iter()
            .find(|c| c.should_terminate(progress))
            .map_or(SearchState::Running, |c| c.state())
    }
}

impl std::fmt::Debug for TerminationCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reasons: Vec<&str> = self.criteria.iter().map(|c| c.reason()).collect();
        f.debug_struct("TerminationCheck")
            .field("criteria", &reasons)
            .finish()
    }
}

pub mod prelude {
    pub use super::{
        BudgetExhausted, GoalReached, MaxGenerations, NoImprovement, SearchProgress,
        SearchState, TerminationCheck, TerminationCriterion,
    };
}
