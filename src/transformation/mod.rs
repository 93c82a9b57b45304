//! Transformations and constraints
//!
//! This module provides candidate generation for the search: word-level
//! transformations, pre-transformation constraints that restrict which positions
//! may change, post-transformation constraints that validate candidates, and the
//! [`candidates::CandidateGenerator`] that composes them.

pub mod candidates;
pub mod constraints;
pub mod instruction;
pub mod traits;
pub mod word_swap;

pub mod prelude {
    pub use super::candidates::*;
    pub use super::constraints::*;
    pub use super::instruction::*;
    pub use super::traits::*;
    pub use super::word_swap::*;
}
