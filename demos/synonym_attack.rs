//! Synonym-swap attack on a toy sentiment classifier
//!
//! Run with `RUST_LOG=perturb_evo=debug` to follow the search generation by
//! generation.

use perturb_evo::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

const POSITIVE: &[&str] = &["great", "wonderful", "brilliant", "moving", "superb"];
const NEGATIVE: &[&str] = &["dull", "tedious", "bland", "clumsy", "weak"];

/// Bag-of-words sentiment model returning [negative, positive] probabilities
fn sentiment(texts: &[String]) -> Vec<Vec<f64>> {
    texts
        .iter()
        .map(|text| {
            let mut logit = 0.0_f64;
            for word in text.split_whitespace() {
                if POSITIVE.contains(&word) {
                    logit += 1.0;
                } else if NEGATIVE.contains(&word) {
                    logit -= 1.2;
                }
            }
            let positive = 1.0 / (1.0 + (-logit).exp());
            vec![1.0 - positive, positive]
        })
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let dictionary = WordSwapDictionary::new()
        .with_synonyms("great", ["fine", "decent", "dull"])
        .with_synonyms("wonderful", ["pleasant", "tedious"])
        .with_synonyms("brilliant", ["clever", "bland"])
        .with_synonyms("moving", ["touching", "clumsy"])
        .with_synonyms("acting", ["performances", "casting"]);

    let candidates = CandidateGenerator::new(dictionary)
        .with_pre_constraint(RepeatModification)
        .with_pre_constraint(StopwordModification::english())
        .with_constraint(MaxWordsPerturbed::percent(0.5));

    let search = GeneticSearch::builder()
        .config(GeneticSearchConfig::alzantot())
        .population_size(12)
        .max_generations(10)
        .strategy(AlzantotStrategy::new())
        .goal(
            Oracle::new(ClassificationObjective::untargeted(sentiment, 1)).with_query_budget(500),
        )
        .candidates(candidates)
        .build()?;

    let text = AttackedText::new("a great film with wonderful acting and a brilliant moving score");
    let mut rng = StdRng::seed_from_u64(42);
    let result = search.attack(&text, &mut rng)?;

    println!("original:  {text}");
    println!("perturbed: {}", result.best.text);
    println!("output:    {}", result.best.output);
    println!("state:     {:?}", result.state);
    println!("{}", result.stats.summary());

    Ok(())
}
