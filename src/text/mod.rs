//! Attacked text
//!
//! This module provides the word-level text representation that the search mutates.

pub mod attacked_text;

pub mod prelude {
    pub use super::attacked_text::*;
}
