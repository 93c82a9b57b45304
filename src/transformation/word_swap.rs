//! Dictionary word swaps
//!
//! This module provides synonym substitution driven by a lookup table.

use std::collections::{BTreeSet, HashMap};

use crate::text::attacked_text::{AttackedText, TransformationTag};
use crate::transformation::traits::{Transformation, TransformationKind};

/// Replaces words with entries from a synonym table
#[derive(Clone, Debug, Default)]
pub struct WordSwapDictionary {
    synonyms: HashMap<String, Vec<String>>,
    tag: Option<TransformationTag>,
}

impl WordSwapDictionary {
    /// Name reported as the provenance tag
    pub const NAME: &'static str = "word-swap-dictionary";

    /// Create an empty dictionary
    pub fn new() -> Self {
        Self::default()
    }

    /// Register replacements for a word
    pub fn with_synonyms<I, S>(mut self, word: impl Into<String>, replacements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.synonyms
            .entry(word.into())
            .or_default()
            .extend(replacements.into_iter().map(Into::into));
        self
    }

    /// Override the provenance tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(TransformationTag::new(tag));
        self
    }

    /// Replacements registered for a word
    pub fn synonyms(&self, word: &str) -> &[String] {
        self.synonyms.get(word).map(Vec::as_slice).unwrap_or(&[])
    }

    fn tag(&self) -> TransformationTag {
        self.tag
            .clone()
            .unwrap_or_else(|| TransformationTag::new(Self::NAME))
    }
}

impl Transformation for WordSwapDictionary {
    fn name(&self) -> &str {
        self.tag.as_ref().map_or(Self::NAME, TransformationTag::as_str)
    }

    fn kind(&self) -> TransformationKind {
        TransformationKind::WordSwap
    }

    fn transform(&self, text: &AttackedText, indices: &BTreeSet<usize>) -> Vec<AttackedText> {
        let tag = self.tag();
        let mut candidates = Vec::new();
        for &index in indices {
            let Some(word) = text.word(index) else {
                continue;
            };
            for replacement in self.synonyms(word) {
                if replacement == word {
                    continue;
                }
                if let Ok(candidate) = text.replace_word_at_index(index, replacement.as_str()) {
                    candidates.push(candidate.with_transformation(tag.clone()));
                }
            }
        }
        candidates
    }
}
