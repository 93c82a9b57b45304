//! Attacked text representation
//!
//! An [`AttackedText`] is a sequence of words plus an immutable [`AttackAttrs`]
//! annotation recording which positions differ from the unperturbed input. Every
//! edit produces a new value; previously returned texts are never changed in place.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TextError;

/// Provenance tag of the transformation that produced a text
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransformationTag(pub String);

impl TransformationTag {
    /// Create a new tag
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The tag as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransformationTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Annotation attached to a text at construction time
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackAttrs {
    /// Positions altered relative to the original text
    pub modified_indices: BTreeSet<usize>,
    /// Positions altered by the most recent edit
    pub newly_modified_indices: BTreeSet<usize>,
    /// Transformation that produced this text, if any
    pub last_transformation: Option<TransformationTag>,
}

/// A text under attack, tokenized into words
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AttackedText {
    words: Vec<String>,
    attrs: AttackAttrs,
}

impl AttackedText {
    /// Create a text by splitting on whitespace
    pub fn new(text: &str) -> Self {
        Self::from_words(text.split_whitespace().map(str::to_string).collect())
    }

    /// Create a text from pre-tokenized words
    pub fn from_words(words: Vec<String>) -> Self {
        Self {
            words,
            attrs: AttackAttrs::default(),
        }
    }

    /// The words of this text
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Get a single word
    pub fn word(&self, index: usize) -> Option<&str> {
        self.words.get(index).map(String::as_str)
    }

    /// Number of words
    pub fn num_words(&self) -> usize {
        self.words.len()
    }

    /// The text re-joined with single spaces
    pub fn text(&self) -> String {
        self.words.join(" ")
    }

    /// Positions altered relative to the original text
    pub fn modified_indices(&self) -> &BTreeSet<usize> {
        &self.attrs.modified_indices
    }

    /// Positions altered by the most recent edit
    pub fn newly_modified_indices(&self) -> &BTreeSet<usize> {
        &self.attrs.newly_modified_indices
    }

    /// Transformation that produced this text
    pub fn last_transformation(&self) -> Option<&TransformationTag> {
        self.attrs.last_transformation.as_ref()
    }

    /// Compare word content only, ignoring annotations
    pub fn same_text(&self, other: &Self) -> bool {
        self.words == other.words
    }

    /// Positions at which the two texts hold different words
    ///
    /// Positions present in only one text count as different.
    pub fn diff_indices(&self, other: &Self) -> BTreeSet<usize> {
        let len = self.words.len().max(other.words.len());
        (0..len)
            .filter(|&i| self.words.get(i) != other.words.get(i))
            .collect()
    }

    /// Replace one word, returning a new text
    pub fn replace_word_at_index(
        &self,
        index: usize,
        word: impl Into<String>,
    ) -> Result<Self, TextError> {
        self.replace_words_at_indices(&[index], &[word.into()])
    }

    /// Replace several words, returning a new text
    ///
    /// Only positions whose word actually changes are recorded as newly modified. The
    /// result carries no transformation provenance.
    pub fn replace_words_at_indices(
        &self,
        indices: &[usize],
        words: &[String],
    ) -> Result<Self, TextError> {
        if indices.len() != words.len() {
            return Err(TextError::LengthMismatch {
                expected: indices.len(),
                actual: words.len(),
            });
        }

        let mut new_words = self.words.clone();
        let mut newly_modified = BTreeSet::new();
        for (&index, word) in indices.iter().zip(words) {
            let slot = new_words.get_mut(index).ok_or(TextError::IndexOutOfRange {
                index,
                len: self.words.len(),
            })?;
            if *slot != *word {
                slot.clone_from(word);
                newly_modified.insert(index);
            }
        }

        let mut modified = self.attrs.modified_indices.clone();
        modified.extend(newly_modified.iter().copied());

        Ok(Self {
            words: new_words,
            attrs: AttackAttrs {
                modified_indices: modified,
                newly_modified_indices: newly_modified,
                last_transformation: None,
            },
        })
    }

    /// Attach transformation provenance
    pub fn with_transformation(mut self, tag: TransformationTag) -> Self {
        self.attrs.last_transformation = Some(tag);
        self
    }

    /// Replace the provenance, possibly clearing it
    pub fn with_last_transformation(mut self, tag: Option<TransformationTag>) -> Self {
        self.attrs.last_transformation = tag;
        self
    }

    /// Override the set of modified positions
    pub fn with_modified_indices(mut self, indices: BTreeSet<usize>) -> Self {
        self.attrs.modified_indices = indices;
        self
    }
}

impl fmt::Display for AttackedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}
