//! Selection operators
//!
//! Parents are drawn with Boltzmann (softmax) weights over the population scores.

use rand::Rng;
use rand_distr::{Distribution, WeightedIndex};

/// Temperature-scaled softmax selection
///
/// The weight of a member with score `s` is `exp((s - s_max) / temperature)`. The
/// best member always has weight 1, so equal scores give a uniform distribution and
/// no weight overflows. Lower temperatures concentrate the draw on the best members;
/// higher temperatures flatten it toward uniform.
#[derive(Clone, Debug)]
pub struct BoltzmannSelection {
    /// Softmax temperature (> 0)
    pub temperature: f64,
}

impl BoltzmannSelection {
    /// Create a new Boltzmann selection
    pub fn new(temperature: f64) -> Self {
        assert!(temperature > 0.0, "Temperature must be positive");
        Self { temperature }
    }

    /// Selection probability for each score
    pub fn probabilities(&self, scores: &[f64]) -> Vec<f64> {
        if scores.is_empty() {
            return Vec::new();
        }

        let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let weights: Vec<f64> = scores
            .iter()
            .map(|&s| {
                let w = ((s - max) / self.temperature).exp();
                if w.is_finite() {
                    w
                } else {
                    0.0
                }
            })
            .collect();

        let total: f64 = weights.iter().sum();
        if total <= 0.0 || !total.is_finite() {
            return vec![1.0 / scores.len() as f64; scores.len()];
        }
        weights.into_iter().map(|w| w / total).collect()
    }

    /// Draw `count` parent index pairs independently, with replacement
    pub fn select_pairs<R: Rng>(
        &self,
        scores: &[f64],
        count: usize,
        rng: &mut R,
    ) -> Vec<(usize, usize)> {
        if scores.is_empty() {
            return Vec::new();
        }

        let probabilities = self.probabilities(scores);
        let dist = WeightedIndex::new(&probabilities).ok();
        let n = scores.len();
        let draw = |rng: &mut R| match &dist {
            Some(dist) => dist.sample(rng),
            None => rng.gen_range(0..n),
        };

        let first: Vec<usize> = (0..count).map(|_| draw(rng)).collect();
        let second: Vec<usize> = (0..count).map(|_| draw(rng)).collect();
        first.into_iter().zip(second).collect()
    }
}

impl Default for BoltzmannSelection {
    fn default() -> Self {
        Self::new(0.3)
    }
}
