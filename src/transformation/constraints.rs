//! Common constraints
//!
//! Pre-transformation constraints restrict which positions may be edited; the
//! remaining constraints validate candidates after they are produced.

use std::collections::{BTreeSet, HashSet};

use crate::text::attacked_text::AttackedText;
use crate::transformation::traits::{Constraint, PreTransformationConstraint};

/// Forbids editing a position that was already modified
#[derive(Clone, Copy, Debug, Default)]
pub struct RepeatModification;

impl PreTransformationConstraint for RepeatModification {
    fn name(&self) -> &str {
        "repeat-modification"
    }

    fn modifiable_indices(&self, text: &AttackedText) -> BTreeSet<usize> {
        (0..text.num_words())
            .filter(|i| !text.modified_indices().contains(i))
            .collect()
    }
}

/// Forbids editing stopwords
#[derive(Clone, Debug)]
pub struct StopwordModification {
    stopwords: HashSet<String>,
}

impl StopwordModification {
    /// A small English stopword list
    pub const ENGLISH: &'static [&'static str] = &[
        "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "from", "had", "has",
        "have", "he", "her", "his", "i", "in", "is", "it", "its", "of", "on", "or", "she",
        "that", "the", "their", "them", "they", "this", "to", "was", "we", "were", "with",
        "you",
    ];

    /// Create with a custom stopword list
    pub fn new<I, S>(stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            stopwords: stopwords.into_iter().map(Into::into).collect(),
        }
    }

    /// Create with the built-in English list
    pub fn english() -> Self {
        Self::new(Self::ENGLISH.iter().copied())
    }
}

impl Default for StopwordModification {
    fn default() -> Self {
        Self::english()
    }
}

impl PreTransformationConstraint for StopwordModification {
    fn name(&self) -> &str {
        "stopword-modification"
    }

    fn modifiable_indices(&self, text: &AttackedText) -> BTreeSet<usize> {
        text.words()
            .iter()
            .enumerate()
            .filter(|(_, w)| !self.stopwords.contains(&w.to_lowercase()))
            .map(|(i, _)| i)
            .collect()
    }
}

/// Caps how many words may differ from the unperturbed input
#[derive(Clone, Debug, Default)]
pub struct MaxWordsPerturbed {
    /// Maximum absolute number of changed words
    pub max_num_words: Option<usize>,
    /// Maximum fraction of changed words, in [0, 1]
    pub max_percent: Option<f64>,
}

impl MaxWordsPerturbed {
    /// Limit by absolute count
    pub fn words(max_num_words: usize) -> Self {
        Self {
            max_num_words: Some(max_num_words),
            max_percent: None,
        }
    }

    /// Limit by fraction of the input length
    pub fn percent(max_percent: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&max_percent),
            "max_percent must be in [0, 1]"
        );
        Self {
            max_num_words: None,
            max_percent: Some(max_percent),
        }
    }
}

impl Constraint for MaxWordsPerturbed {
    fn name(&self) -> &str {
        "max-words-perturbed"
    }

    fn check(&self, candidate: &AttackedText, reference: &AttackedText) -> bool {
        let changed = candidate.diff_indices(reference).len();
        if let Some(max) = self.max_num_words {
            if changed > max {
                return false;
            }
        }
        if let Some(max_percent) = self.max_percent {
            let len = reference.num_words().max(candidate.num_words()).max(1);
            if changed as f64 / len as f64 > max_percent {
                return false;
            }
        }
        true
    }
}
