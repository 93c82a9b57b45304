//! Search operators
//!
//! This module provides the variant hooks, the shared search context, and the
//! selection, crossover, and mutation operators of the genetic search.

pub mod crossover;
pub mod mutation;
pub mod selection;
pub mod traits;

pub mod prelude {
    pub use super::crossover::*;
    pub use super::mutation::*;
    pub use super::selection::*;
    pub use super::traits::*;
}
