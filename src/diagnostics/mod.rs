//! Diagnostics and statistics
//!
//! This module provides statistics collection for genetic search runs.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::goal::traits::GoalResult;
use crate::population::population::Population;
use crate::termination::SearchState;

/// Statistics for a single generation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generation number
    pub generation: usize,
    /// Oracle queries issued so far
    pub num_queries: usize,
    /// Best score in this generation
    pub best_score: f64,
    /// Mean score
    pub mean_score: f64,
    /// Worst score in this generation
    pub worst_score: f64,
    /// Population diversity
    pub diversity: f64,
    /// Timing information
    pub timing: TimingStats,
}

/// Timing statistics
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TimingStats {
    /// Time spent on selection (ms)
    pub selection_ms: f64,
    /// Time spent on crossover (ms)
    pub crossover_ms: f64,
    /// Time spent on mutation (ms)
    pub mutation_ms: f64,
    /// Total generation time (ms)
    pub total_ms: f64,
}

impl TimingStats {
    /// Create new timing stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Set selection time
    pub fn with_selection(mut self, duration: Duration) -> Self {
        self.selection_ms = duration.as_secs_f64() * 1000.0;
        self
    }

    /// Set crossover time
    pub fn with_crossover(mut self, duration: Duration) -> Self {
        self.crossover_ms = duration.as_secs_f64() * 1000.0;
        self
    }

    /// Set mutation time
    pub fn with_mutation(mut self, duration: Duration) -> Self {
        self.mutation_ms = duration.as_secs_f64() * 1000.0;
        self
    }

    /// Set total time
    pub fn with_total(mut self, duration: Duration) -> Self {
        self.total_ms = duration.as_secs_f64() * 1000.0;
        self
    }
}

impl GenerationStats {
    /// Compute statistics from a population
    pub fn from_population(population: &Population, generation: usize, num_queries: usize) -> Self {
        let scores = population.scores();
        if scores.is_empty() {
            return Self {
                generation,
                num_queries,
                best_score: f64::NEG_INFINITY,
                mean_score: 0.0,
                worst_score: f64::INFINITY,
                diversity: 0.0,
                timing: TimingStats::default(),
            };
        }

        let best = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let worst = scores.iter().copied().fold(f64::INFINITY, f64::min);

        Self {
            generation,
            num_queries,
            best_score: best,
            mean_score: population.mean_score().unwrap_or(0.0),
            worst_score: worst,
            diversity: population.diversity(),
            timing: TimingStats::default(),
        }
    }

    /// Set timing information
    pub fn with_timing(mut self, timing: TimingStats) -> Self {
        self.timing = timing;
        self
    }
}

/// Statistics collector for an entire search
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EvolutionStats {
    /// Score of the unperturbed input
    pub initial_score: f64,
    /// Statistics per generation
    pub generations: Vec<GenerationStats>,
    /// Total runtime in milliseconds
    pub total_runtime_ms: f64,
    /// Reason for termination
    pub termination_reason: Option<String>,
}

impl EvolutionStats {
    /// Create a new stats collector
    pub fn new(initial_score: f64) -> Self {
        Self {
            initial_score,
            ..Self::default()
        }
    }

    /// Record a generation's statistics
    pub fn record(&mut self, stats: GenerationStats) {
        self.generations.push(stats);
    }

    /// Get the number of generations recorded
    pub fn num_generations(&self) -> usize {
        self.generations.len()
    }

    /// Get the best score across all generations
    pub fn best_score(&self) -> Option<f64> {
        self.generations
            .iter()
            .map(|g| g.best_score)
            .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }

    /// Best score per generation, preceded by the unperturbed score
    pub fn best_score_history(&self) -> Vec<f64> {
        std::iter::once(self.initial_score)
            .chain(self.generations.iter().map(|g| g.best_score))
            .collect()
    }

    /// Get the history of mean scores
    pub fn mean_score_history(&self) -> Vec<f64> {
        self.generations.iter().map(|g| g.mean_score).collect()
    }

    /// Get the history of diversity values
    pub fn diversity_history(&self) -> Vec<f64> {
        self.generations.iter().map(|g| g.diversity).collect()
    }

    /// Set the termination reason
    pub fn set_termination_reason(&mut self, reason: &str) {
        self.termination_reason = Some(reason.to_string());
    }

    /// Set the total runtime
    pub fn set_runtime(&mut self, duration: Duration) {
        self.total_runtime_ms = duration.as_secs_f64() * 1000.0;
    }

    /// Get a summary of the search
    pub fn summary(&self) -> String {
        let best = self.best_score().unwrap_or(self.initial_score);
        let queries = self.generations.last().map_or(0, |g| g.num_queries);

        format!(
            "Search Summary:\n\
             - Generations: {}\n\
             - Initial score: {:.6}\n\
             - Best score: {:.6}\n\
             - Queries: {}\n\
             - Runtime: {:.2}ms\n\
             - Termination: {}",
            self.num_generations(),
            self.initial_score,
            best,
            queries,
            self.total_runtime_ms,
            self.termination_reason.as_deref().unwrap_or("unknown")
        )
    }
}

/// Result of a genetic search
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchResult {
    /// Oracle result of the best member at exit
    pub best: GoalResult,
    /// Terminal state of the search
    pub state: SearchState,
    /// Number of generations completed
    pub generations: usize,
    /// Oracle queries issued
    pub num_queries: usize,
    /// Statistics for the run
    pub stats: EvolutionStats,
}

impl SearchResult {
    /// Create a new search result
    pub fn new(best: GoalResult, state: SearchState, generations: usize, num_queries: usize) -> Self {
        Self {
            best,
            state,
            generations,
            num_queries,
            stats: EvolutionStats::new(0.0),
        }
    }

    /// Add statistics to the result
    pub fn with_stats(mut self, stats: EvolutionStats) -> Self {
        self.stats = stats;
        self
    }

    /// Whether the best text reached the attack goal
    pub fn succeeded(&self) -> bool {
        self.best.succeeded()
    }
}

pub mod prelude {
    pub use super::{EvolutionStats, GenerationStats, SearchResult, TimingStats};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goal::traits::GoalStatus;
    use crate::population::member::PopulationMember;
    use crate::text::attacked_text::AttackedText;

    fn result(text: &str, score: f64) -> GoalResult {
        GoalResult {
            text: AttackedText::new(text),
            score,
            status: GoalStatus::InProgress,
            output: String::new(),
            num_queries: 0,
        }
    }

    fn create_test_population() -> Population {
        [("a b", 0.1), ("a c", 0.3), ("d c", 0.5), ("d e", 0.7)]
            .into_iter()
            .map(|(text, score)| PopulationMember::new(result(text, score), vec![1, 1]))
            .collect()
    }

    fn stats(generation: usize, best_score: f64) -> GenerationStats {
        GenerationStats {
            generation,
            num_queries: generation * 10,
            best_score,
            mean_score: best_score / 2.0,
            worst_score: 0.0,
            diversity: 1.0,
            timing: TimingStats::default(),
        }
    }

    #[test]
    fn test_generation_stats_from_population() {
        let pop = create_test_population();
        let stats = GenerationStats::from_population(&pop, 3, 42);

        assert_eq!(stats.generation, 3);
        assert_eq!(stats.num_queries, 42);
        assert_eq!(stats.best_score, 0.7);
        assert_eq!(stats.worst_score, 0.1);
        assert!((stats.mean_score - 0.4).abs() < 1e-12);
        assert!(stats.diversity > 0.0);
    }

    #[test]
    fn test_generation_stats_empty_population() {
        let stats = GenerationStats::from_population(&Population::new(), 0, 0);
        assert_eq!(stats.best_score, f64::NEG_INFINITY);
        assert_eq!(stats.worst_score, f64::INFINITY);
    }

    #[test]
    fn test_best_score_history_starts_with_initial_score() {
        let mut evolution = EvolutionStats::new(0.05);
        for (i, best) in [0.2, 0.4, 0.9].into_iter().enumerate() {
            evolution.record(stats(i, best));
        }

        assert_eq!(evolution.num_generations(), 3);
        assert_eq!(evolution.best_score(), Some(0.9));
        assert_eq!(evolution.best_score_history(), vec![0.05, 0.2, 0.4, 0.9]);
        assert_eq!(evolution.mean_score_history(), vec![0.1, 0.2, 0.45]);
        assert_eq!(evolution.diversity_history(), vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_summary() {
        let mut evolution = EvolutionStats::new(0.0);
        evolution.record(stats(1, 0.75));
        evolution.set_termination_reason(SearchState::Succeeded.reason());
        evolution.set_runtime(Duration::from_millis(1234));

        let summary = evolution.summary();
        assert!(summary.contains("Generations: 1"));
        assert!(summary.contains("Best score: 0.75"));
        assert!(summary.contains("Queries: 10"));
        assert!(summary.contains("Attack goal reached"));
    }

    #[test]
    fn test_timing_stats() {
        let timing = TimingStats::new()
            .with_selection(Duration::from_millis(20))
            .with_crossover(Duration::from_millis(30))
            .with_mutation(Duration::from_millis(10))
            .with_total(Duration::from_millis(60));

        assert!((timing.selection_ms - 20.0).abs() < 0.1);
        assert!((timing.crossover_ms - 30.0).abs() < 0.1);
        assert!((timing.mutation_ms - 10.0).abs() < 0.1);
        assert!((timing.total_ms - 60.0).abs() < 0.1);
    }

    #[test]
    fn test_search_result() {
        let search = SearchResult::new(result("the dog", 1.0), SearchState::MaxGenerations, 20, 500);
        assert_eq!(search.generations, 20);
        assert_eq!(search.num_queries, 500);
        assert!(!search.succeeded());
    }
}
