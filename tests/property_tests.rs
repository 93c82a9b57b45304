//! Property-based tests for perturb-evo
//!
//! Uses proptest to verify invariants and properties of the search.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use perturb_evo::prelude::*;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

const VOCABULARY: &[&str] = &["the", "cat", "sat", "on", "mat", "big", "old", "dog"];

fn dictionary() -> WordSwapDictionary {
    WordSwapDictionary::new()
        .with_synonyms("the", ["a"])
        .with_synonyms("cat", ["dog", "kitten"])
        .with_synonyms("sat", ["sit", "lay"])
        .with_synonyms("on", ["upon"])
        .with_synonyms("mat", ["rug", "dog"])
        .with_synonyms("big", ["large"])
}

fn sentence() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(VOCABULARY), 1..7).prop_map(|words| words.join(" "))
}

fn run<S: PopulationStrategy>(
    strategy: S,
    text: &str,
    population_size: usize,
    max_generations: usize,
    seed: u64,
) -> (GoalResult, SearchResult) {
    let search = GeneticSearch::builder()
        .population_size(population_size)
        .max_generations(max_generations)
        .strategy(strategy)
        .goal(Oracle::new(TargetWordCount::new("dog", 3)))
        .candidates(CandidateGenerator::new(dictionary()))
        .build()
        .unwrap();

    let initial = search
        .goal()
        .evaluate_one(&AttackedText::new(text), &SearchToken::new())
        .unwrap();
    let mut rng = StdRng::seed_from_u64(seed);
    let result = search.perform_search(&initial, &mut rng).unwrap();
    (initial, result)
}

/// Rejects every candidate
struct RejectAll;

impl Constraint for RejectAll {
    fn name(&self) -> &str {
        "reject-all"
    }

    fn check(&self, _candidate: &AttackedText, _reference: &AttackedText) -> bool {
        false
    }
}

/// Goal function that counts calls made after the search was over
struct RecordingGoal {
    inner: Oracle<TargetWordCount>,
    late_calls: AtomicUsize,
}

impl GoalFunction for RecordingGoal {
    fn get_results(&self, batch: &[AttackedText], token: &SearchToken) -> Vec<GoalResult> {
        if token.is_cancelled() {
            self.late_calls.fetch_add(1, Ordering::SeqCst);
        }
        self.inner.get_results(batch, token)
    }

    fn num_queries(&self) -> usize {
        self.inner.num_queries()
    }
}

/// Transformation that counts calls made after `token` was cancelled
struct RecordingTransformation {
    inner: WordSwapDictionary,
    token: SearchToken,
    late_calls: Arc<AtomicUsize>,
}

impl Transformation for RecordingTransformation {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn transform(&self, text: &AttackedText, indices: &BTreeSet<usize>) -> Vec<AttackedText> {
        if self.token.is_cancelled() {
            self.late_calls.fetch_add(1, Ordering::SeqCst);
        }
        self.inner.transform(text, indices)
    }
}

fn member(text: AttackedText, score: f64, budget: Vec<usize>) -> PopulationMember {
    PopulationMember::new(
        GoalResult {
            text,
            score,
            status: GoalStatus::InProgress,
            output: String::new(),
            num_queries: 0,
        },
        budget,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    // ==================== Search Properties ====================

    #[test]
    fn search_never_regresses(
        text in sentence(),
        population_size in 2usize..6,
        max_generations in 1usize..4,
        seed in any::<u64>(),
        improved in any::<bool>(),
    ) {
        let (initial, result) = if improved {
            run(ImprovedStrategy::new(), &text, population_size, max_generations, seed)
        } else {
            run(AlzantotStrategy::new(), &text, population_size, max_generations, seed)
        };

        prop_assert!(result.best.score >= initial.score);
        prop_assert!(result.state.is_terminal());
        prop_assert_eq!(result.best.text.num_words(), initial.text.num_words());
    }

    #[test]
    fn elitism_keeps_best_score(
        text in sentence(),
        population_size in 2usize..6,
        max_generations in 1usize..4,
        seed in any::<u64>(),
    ) {
        let (_, result) = run(AlzantotStrategy::new(), &text, population_size, max_generations, seed);

        let history = result.stats.best_score_history();
        prop_assert!(history.windows(2).all(|w| w[1] >= w[0]));
        prop_assert_eq!(history.last().copied(), Some(result.best.score));
    }

    #[test]
    fn search_is_reproducible(text in sentence(), seed in any::<u64>()) {
        let (_, first) = run(AlzantotStrategy::new(), &text, 4, 3, seed);
        let (_, second) = run(AlzantotStrategy::new(), &text, 4, 3, seed);

        prop_assert_eq!(first.best.text.text(), second.best.text.text());
        prop_assert_eq!(first.num_queries, second.num_queries);
        prop_assert_eq!(first.state, second.state);
    }

    #[test]
    fn no_adapter_calls_after_budget_exhaustion(
        text in sentence(),
        budget in 1usize..12,
        seed in any::<u64>(),
    ) {
        let token = SearchToken::new();
        let transformation_calls = Arc::new(AtomicUsize::new(0));
        let search = GeneticSearch::builder()
            .population_size(4)
            .max_generations(5)
            .strategy(AlzantotStrategy::new())
            .goal(RecordingGoal {
                inner: Oracle::new(TargetWordCount::new("dog", 3)).with_query_budget(budget),
                late_calls: AtomicUsize::new(0),
            })
            .candidates(CandidateGenerator::new(RecordingTransformation {
                inner: dictionary(),
                token: token.clone(),
                late_calls: Arc::clone(&transformation_calls),
            }))
            .build()
            .unwrap();

        let initial = search
            .goal()
            .evaluate_one(&AttackedText::new(&text), &token)
            .unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let result = search.perform_search_with_token(&initial, &token, &mut rng).unwrap();

        prop_assert!(result.num_queries <= budget);
        prop_assert_eq!(search.goal().late_calls.load(Ordering::SeqCst), 0);
        prop_assert_eq!(transformation_calls.load(Ordering::SeqCst), 0);
        if token.is_cancelled() {
            prop_assert!(
                result.state == SearchState::BudgetExhausted
                    || result.state == SearchState::Succeeded
            );
        }
    }

    // ==================== Operator Properties ====================

    #[test]
    fn mutation_with_exhausted_budget_is_identity(text in sentence(), seed in any::<u64>()) {
        let oracle = Oracle::new(TargetWordCount::new("dog", 1));
        let candidates = CandidateGenerator::new(dictionary());
        let token = SearchToken::new();
        let original = member(AttackedText::new(&text), 0.0, Vec::new()).into_result();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut ctx = SearchContext::new(&oracle, &candidates, &token, &original, &mut rng);

        let budget = vec![0; original.text.num_words()];
        let m = member(original.text.clone(), 0.0, budget.clone());
        let perturbed = WordSwapMutation::new().perturb(&AlzantotStrategy::new(), m, &mut ctx, None);

        prop_assert!(perturbed.text().same_text(&original.text));
        prop_assert_eq!(perturbed.num_replacements_per_word(), budget.as_slice());
        prop_assert_eq!(oracle.num_queries(), 0);
    }

    #[test]
    fn mutation_never_worsens(text in sentence(), seed in any::<u64>()) {
        let oracle = Oracle::new(TargetWordCount::new("dog", 5));
        let candidates = CandidateGenerator::new(dictionary());
        let token = SearchToken::new();
        let original = oracle.evaluate_one(&AttackedText::new(&text), &token).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut ctx = SearchContext::new(&oracle, &candidates, &token, &original, &mut rng);

        let m = PopulationMember::new(original.clone(), vec![1; original.text.num_words()]);
        let perturbed = WordSwapMutation::new().perturb(&ImprovedStrategy::new(), m, &mut ctx, None);

        prop_assert!(perturbed.score() >= original.score);
        prop_assert!(perturbed.text().diff_indices(&original.text).len() <= 1);
    }

    #[test]
    fn crossover_fallback_returns_a_parent(
        retries in 0usize..5,
        seed in any::<u64>(),
    ) {
        let oracle = Oracle::new(TargetWordCount::new("dog", 1));
        let candidates = CandidateGenerator::new(dictionary()).with_constraint(RejectAll);
        let token = SearchToken::new();
        let base = AttackedText::new("the cat sat on the mat");
        let tag = TransformationTag::new(WordSwapDictionary::NAME);
        let p1 = member(base.replace_word_at_index(1, "kitten").unwrap().with_transformation(tag.clone()), 0.0, vec![1; 6]);
        let p2 = member(base.replace_word_at_index(5, "rug").unwrap().with_transformation(tag), 0.0, vec![1; 6]);
        let original = member(base, 0.0, vec![1; 6]).into_result();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut ctx = SearchContext::new(&oracle, &candidates, &token, &original, &mut rng);

        let child = GuardedCrossover::new(true, retries).crossover(&AlzantotStrategy::new(), &p1, &p2, &mut ctx);

        prop_assert!(child.text().same_text(p1.text()) || child.text().same_text(p2.text()));
        prop_assert_eq!(oracle.num_queries(), 0);
    }

    // ==================== Selection Properties ====================

    #[test]
    fn cold_selection_picks_best(
        scores in prop::collection::vec(0.0f64..1.0, 2..10),
        best in 0usize..10,
    ) {
        let mut scores = scores;
        let best = best % scores.len();
        scores[best] = 2.0;

        let probs = BoltzmannSelection::new(1e-9).probabilities(&scores);
        prop_assert!((probs[best] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn hot_selection_is_uniform(scores in prop::collection::vec(0.0f64..1.0, 1..10)) {
        let probs = BoltzmannSelection::new(1e12).probabilities(&scores);
        let uniform = 1.0 / scores.len() as f64;
        for p in probs {
            prop_assert!((p - uniform).abs() < 1e-6);
        }
    }

    #[test]
    fn selection_probabilities_are_a_distribution(
        scores in prop::collection::vec(-5.0f64..5.0, 1..20),
        temperature in 0.01f64..10.0,
    ) {
        let probs = BoltzmannSelection::new(temperature).probabilities(&scores);
        prop_assert_eq!(probs.len(), scores.len());
        prop_assert!(probs.iter().all(|&p| (0.0..=1.0).contains(&p)));
        prop_assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }
}
