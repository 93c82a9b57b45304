//! Genetic search
//!
//! This module implements the generational engine shared by all population
//! variants: Boltzmann parent selection, guarded crossover, word-swap mutation and
//! elitism of size one, run until the attack succeeds or a limit is reached.

use std::time::{Duration, Instant};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cancellation::SearchToken;
use crate::diagnostics::{EvolutionStats, GenerationStats, SearchResult, TimingStats};
use crate::error::{EvoResult, EvolutionError};
use crate::goal::traits::{GoalFunction, GoalResult};
use crate::operators::crossover::GuardedCrossover;
use crate::operators::mutation::WordSwapMutation;
use crate::operators::selection::BoltzmannSelection;
use crate::operators::traits::{PopulationStrategy, SearchContext};
use crate::population::population::Population;
use crate::termination::{SearchProgress, SearchState, TerminationCheck};
use crate::text::attacked_text::AttackedText;
use crate::transformation::candidates::CandidateGenerator;
use crate::transformation::traits::TransformationKind;

/// Configuration for the genetic search
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticSearchConfig {
    /// Population size
    pub population_size: usize,
    /// Maximum number of generations
    pub max_generations: usize,
    /// Softmax temperature for parent selection
    pub temperature: f64,
    /// Stop when a generation fails to raise the best score
    pub give_up_if_no_improvement: bool,
    /// Validate crossover children against the constraints
    pub post_crossover_check: bool,
    /// Retries after a rejected crossover child
    pub max_crossover_retries: usize,
}

impl Default for GeneticSearchConfig {
    fn default() -> Self {
        Self {
            population_size: 60,
            max_generations: 20,
            temperature: 0.3,
            give_up_if_no_improvement: false,
            post_crossover_check: true,
            max_crossover_retries: 20,
        }
    }
}

impl GeneticSearchConfig {
    /// Settings for the word-swap attack of Alzantot et al. (2018)
    pub fn alzantot() -> Self {
        Self::default()
    }

    /// Settings for the improved genetic attack of Wang et al. (2019)
    pub fn improved() -> Self {
        Self {
            post_crossover_check: false,
            ..Self::default()
        }
    }

    /// Check that the configuration describes a runnable search
    pub fn validate(&self) -> EvoResult<()> {
        if self.population_size == 0 {
            return Err(EvolutionError::Configuration(
                "Population size must be positive".to_string(),
            ));
        }
        if self.max_generations == 0 {
            return Err(EvolutionError::Configuration(
                "Max generations must be positive".to_string(),
            ));
        }
        if !self.temperature.is_finite() || self.temperature <= 0.0 {
            return Err(EvolutionError::Configuration(format!(
                "Temperature must be finite and positive, got {}",
                self.temperature
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> EvoResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| EvolutionError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> EvoResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| EvolutionError::Configuration(e.to_string()))
    }
}

/// Builder for [`GeneticSearch`]
pub struct GeneticSearchBuilder<S, G> {
    config: GeneticSearchConfig,
    strategy: Option<S>,
    goal: Option<G>,
    candidates: Option<CandidateGenerator>,
}

impl GeneticSearchBuilder<(), ()> {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: GeneticSearchConfig::default(),
            strategy: None,
            goal: None,
            candidates: None,
        }
    }
}

impl Default for GeneticSearchBuilder<(), ()> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, G> GeneticSearchBuilder<S, G> {
    /// Replace the whole configuration
    pub fn config(mut self, config: GeneticSearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the population size
    pub fn population_size(mut self, size: usize) -> Self {
        self.config.population_size = size;
        self
    }

    /// Set the maximum number of generations
    pub fn max_generations(mut self, max: usize) -> Self {
        self.config.max_generations = max;
        self
    }

    /// Set the selection temperature
    pub fn temperature(mut self, temperature: f64) -> Self {
        self.config.temperature = temperature;
        self
    }

    /// Enable or disable early stopping on stall
    pub fn give_up_if_no_improvement(mut self, enabled: bool) -> Self {
        self.config.give_up_if_no_improvement = enabled;
        self
    }

    /// Enable or disable constraint checks after crossover
    pub fn post_crossover_check(mut self, enabled: bool) -> Self {
        self.config.post_crossover_check = enabled;
        self
    }

    /// Set the number of crossover retries
    pub fn max_crossover_retries(mut self, retries: usize) -> Self {
        self.config.max_crossover_retries = retries;
        self
    }

    /// Set the candidate generator
    pub fn candidates(mut self, candidates: CandidateGenerator) -> Self {
        self.candidates = Some(candidates);
        self
    }

    /// Set the population variant
    pub fn strategy<NewS>(self, strategy: NewS) -> GeneticSearchBuilder<NewS, G>
    where
        NewS: PopulationStrategy,
    {
        GeneticSearchBuilder {
            config: self.config,
            strategy: Some(strategy),
            goal: self.goal,
            candidates: self.candidates,
        }
    }

    /// Set the goal function
    pub fn goal<NewG>(self, goal: NewG) -> GeneticSearchBuilder<S, NewG>
    where
        NewG: GoalFunction,
    {
        GeneticSearchBuilder {
            config: self.config,
            strategy: self.strategy,
            goal: Some(goal),
            candidates: self.candidates,
        }
    }
}

impl<S, G> GeneticSearchBuilder<S, G>
where
    S: PopulationStrategy,
    G: GoalFunction,
{
    /// Build the GeneticSearch instance
    pub fn build(self) -> EvoResult<GeneticSearch<S, G>> {
        self.config.validate()?;

        let strategy = self.strategy.ok_or_else(|| {
            EvolutionError::Configuration("Population strategy must be specified".to_string())
        })?;

        let goal = self
            .goal
            .ok_or_else(|| EvolutionError::Configuration("Goal function must be specified".to_string()))?;

        let candidates = self.candidates.ok_or_else(|| {
            EvolutionError::Configuration("Candidate generator must be specified".to_string())
        })?;

        let transformation = candidates.transformation();
        if transformation.kind() != TransformationKind::WordSwap {
            return Err(EvolutionError::IncompatibleTransformation(format!(
                "{} does not consist of word swaps",
                transformation.name()
            )));
        }

        Ok(GeneticSearch {
            selection: BoltzmannSelection::new(self.config.temperature),
            crossover: GuardedCrossover::new(
                self.config.post_crossover_check,
                self.config.max_crossover_retries,
            ),
            mutation: WordSwapMutation::new(),
            config: self.config,
            strategy,
            goal,
            candidates,
        })
    }
}

/// Population-based genetic search over word swaps
pub struct GeneticSearch<S, G> {
    config: GeneticSearchConfig,
    strategy: S,
    goal: G,
    candidates: CandidateGenerator,
    selection: BoltzmannSelection,
    crossover: GuardedCrossover,
    mutation: WordSwapMutation,
}

impl GeneticSearch<(), ()> {
    /// Create a builder for GeneticSearch
    pub fn builder() -> GeneticSearchBuilder<(), ()> {
        GeneticSearchBuilder::new()
    }
}

impl<S, G> GeneticSearch<S, G>
where
    S: PopulationStrategy,
    G: GoalFunction,
{
    /// The search configuration
    pub fn config(&self) -> &GeneticSearchConfig {
        &self.config
    }

    /// The population variant
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// The goal function
    pub fn goal(&self) -> &G {
        &self.goal
    }

    /// The candidate generator
    pub fn candidates(&self) -> &CandidateGenerator {
        &self.candidates
    }

    /// Attack `text`, evaluating it first
    ///
    /// Returns immediately when the unperturbed text already reaches the goal.
    pub fn attack<R: Rng>(&self, text: &AttackedText, rng: &mut R) -> EvoResult<SearchResult> {
        let token = SearchToken::new();
        let initial = self
            .goal
            .evaluate_one(text, &token)
            .ok_or(EvolutionError::EmptyBatch)?;

        if initial.succeeded() {
            info!(score = initial.score, "input already reaches the goal");
            let mut stats = EvolutionStats::new(initial.score);
            stats.set_termination_reason(SearchState::Succeeded.reason());
            let num_queries = self.goal.num_queries();
            return Ok(
                SearchResult::new(initial, SearchState::Succeeded, 0, num_queries).with_stats(stats),
            );
        }

        self.perform_search_with_token(&initial, &token, rng)
    }

    /// Search from an evaluated input with a fresh cancellation token
    pub fn perform_search<R: Rng>(
        &self,
        initial_result: &GoalResult,
        rng: &mut R,
    ) -> EvoResult<SearchResult> {
        self.perform_search_with_token(initial_result, &SearchToken::new(), rng)
    }

    /// Search from an evaluated input
    ///
    /// `token` is handed to the goal function, which cancels it when its budget runs
    /// out. A token cancelled by the caller stops the search the same way.
    pub fn perform_search_with_token<R: Rng>(
        &self,
        initial_result: &GoalResult,
        token: &SearchToken,
        rng: &mut R,
    ) -> EvoResult<SearchResult> {
        let start_time = Instant::now();
        let mut ctx = SearchContext::new(&self.goal, &self.candidates, token, initial_result, rng);

        info!(
            strategy = self.strategy.name(),
            population_size = self.config.population_size,
            max_generations = self.config.max_generations,
            initial_score = initial_result.score,
            "starting genetic search"
        );

        let members = self
            .strategy
            .initialize_population(&mut ctx, self.config.population_size);
        if members.is_empty() {
            return Err(EvolutionError::EmptyPopulation);
        }
        let mut population = Population::from_members(members);

        let termination = TerminationCheck::for_search(
            self.config.max_generations,
            self.config.give_up_if_no_improvement,
        );
        let mut stats = EvolutionStats::new(initial_result.score);
        let mut best_score = initial_result.score;
        let mut timing = TimingStats::default();

        let state = loop {
            population.sort_by_score();

            let gen_stats = GenerationStats::from_population(
                &population,
                population.generation(),
                self.goal.num_queries(),
            )
            .with_timing(timing);
            debug!(
                generation = gen_stats.generation,
                best_score = gen_stats.best_score,
                mean_score = gen_stats.mean_score,
                diversity = gen_stats.diversity,
                num_queries = gen_stats.num_queries,
                "generation complete"
            );
            stats.record(gen_stats);

            let best = population.get(0).ok_or(EvolutionError::EmptyPopulation)?;
            let progress = SearchProgress {
                generation: population.generation(),
                best_score: best.score(),
                best_succeeded: best.succeeded(),
                previous_best: best_score,
                search_over: ctx.is_search_over(),
            };
            let state = termination.evaluate(&progress);
            if state.is_terminal() {
                break state;
            }
            best_score = best_score.max(best.score());

            let (next, next_timing) = self.next_generation(&population, &mut ctx);
            population = next;
            timing = next_timing;
        };

        let best = population
            .get(0)
            .ok_or(EvolutionError::EmptyPopulation)?
            .result()
            .clone();
        let num_queries = self.goal.num_queries();
        stats.set_termination_reason(state.reason());
        stats.set_runtime(start_time.elapsed());

        info!(
            state = ?state,
            generations = population.generation(),
            best_score = best.score,
            num_queries,
            "genetic search finished"
        );

        Ok(
            SearchResult::new(best, state, population.generation(), num_queries)
                .with_stats(stats),
        )
    }

    /// Build the next generation from a population sorted best first
    fn next_generation<R: Rng>(
        &self,
        population: &Population,
        ctx: &mut SearchContext<'_, R>,
    ) -> (Population, TimingStats) {
        let gen_start = Instant::now();
        let size = population.len();

        let sel_start = Instant::now();
        let pairs = self
            .selection
            .select_pairs(&population.scores(), size.saturating_sub(1), ctx.rng());
        let selection_time = sel_start.elapsed();

        let mut crossover_time = Duration::ZERO;
        let mut mutation_time = Duration::ZERO;

        let mut next = Population::with_capacity(size);
        if let Some(elite) = population.get(0) {
            next.push(elite.clone());
        }

        for (i1, i2) in pairs {
            let cross_start = Instant::now();
            let child = self
                .crossover
                .crossover(&self.strategy, &population[i1], &population[i2], ctx);
            crossover_time += cross_start.elapsed();
            if ctx.is_search_over() {
                break;
            }

            let mut_start = Instant::now();
            let child = self.mutation.perturb(&self.strategy, child, ctx, None);
            mutation_time += mut_start.elapsed();
            next.push(child);
            if ctx.is_search_over() {
                break;
            }
        }

        if next.len() < size {
            debug!(
                children = next.len().saturating_sub(1),
                "generation cut short, padding from previous population"
            );
            for member in population.iter().skip(1) {
                if next.len() >= size {
                    break;
                }
                next.push(member.clone());
            }
        }
        next.set_generation(population.generation() + 1);

        let timing = TimingStats::new()
            .with_selection(selection_time)
            .with_crossover(crossover_time)
            .with_mutation(mutation_time)
            .with_total(gen_start.elapsed());
        (next, timing)
    }
}
