//! Transformation and constraint traits

use std::collections::BTreeSet;

use crate::text::attacked_text::AttackedText;

/// Broad family of a transformation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransformationKind {
    /// Replaces single words without changing the word count
    WordSwap,
    /// Anything else (insertions, deletions, character edits, ...)
    Other,
}

/// Proposes rewritten texts
///
/// Every candidate must record the positions it changed in
/// `newly_modified_indices` and carry the transformation's provenance tag.
pub trait Transformation: Send + Sync {
    /// Name used as the provenance tag
    fn name(&self) -> &str;

    /// Family of this transformation
    fn kind(&self) -> TransformationKind {
        TransformationKind::WordSwap
    }

    /// Propose candidates that modify only positions in `indices`
    fn transform(&self, text: &AttackedText, indices: &BTreeSet<usize>) -> Vec<AttackedText>;
}

/// Validates a candidate after transformation
pub trait Constraint: Send + Sync {
    /// Constraint name
    fn name(&self) -> &str;

    /// Check `candidate` against `reference`
    fn check(&self, candidate: &AttackedText, reference: &AttackedText) -> bool;

    /// Whether `reference` is the unperturbed input (true) or the text the
    /// candidate was derived from (false)
    fn compare_against_original(&self) -> bool {
        true
    }
}

/// Restricts which positions a transformation may touch
pub trait PreTransformationConstraint: Send + Sync {
    /// Constraint name
    fn name(&self) -> &str;

    /// Positions of `text` that may be modified
    fn modifiable_indices(&self, text: &AttackedText) -> BTreeSet<usize>;
}
