//! Error types for perturb-evo
//!
//! This module defines all error types used throughout the library.
//!
//! Only configuration and structural problems are surfaced as errors. Search-time
//! setbacks (no candidates, constraint rejection, budget exhaustion) are absorbed by
//! the operators and never reach the caller as an `Err`.

use thiserror::Error;

/// Error type for word-level edits of an attacked text
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TextError {
    /// A word index was outside the text
    #[error("Word index {index} out of range for text with {len} words")]
    IndexOutOfRange { index: usize, len: usize },

    /// Parallel index/word sequences had different lengths
    #[error("Length mismatch: expected {expected} replacement words, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Top-level error type for search operations
#[derive(Debug, Error)]
pub enum EvolutionError {
    /// Text editing error
    #[error("Text error: {0}")]
    Text(#[from] TextError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// The transformation cannot be searched by a word-swap genetic algorithm
    #[error("Incompatible transformation: {0}")]
    IncompatibleTransformation(String),

    /// The oracle returned no result for a required evaluation
    #[error("Oracle returned no result (query budget exhausted)")]
    EmptyBatch,

    /// Empty population
    #[error("Empty population")]
    EmptyPopulation,
}

/// Result type alias for search operations
pub type EvoResult<T> = Result<T, EvolutionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_error_display() {
        let err = TextError::IndexOutOfRange { index: 7, len: 3 };
        assert_eq!(
            err.to_string(),
            "Word index 7 out of range for text with 3 words"
        );

        let err = TextError::LengthMismatch {
            expected: 2,
            actual: 1,
        };
        assert_eq!(
            err.to_string(),
            "Length mismatch: expected 2 replacement words, got 1"
        );
    }

    #[test]
    fn test_evolution_error_display() {
        let err = EvolutionError::Configuration("temperature must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: temperature must be positive"
        );

        let err = EvolutionError::IncompatibleTransformation("char-insert".to_string());
        assert_eq!(err.to_string(), "Incompatible transformation: char-insert");
    }

    #[test]
    fn test_evolution_error_from_text_error() {
        let text_err = TextError::IndexOutOfRange { index: 1, len: 0 };
        let evo_err: EvolutionError = text_err.into();
        assert!(matches!(evo_err, EvolutionError::Text(_)));
    }
}
