//! Search algorithms
//!
//! This module provides the generational genetic search engine and its concrete
//! population variants.

pub mod alzantot;
pub mod genetic;
pub mod improved;

pub mod prelude {
    pub use super::alzantot::*;
    pub use super::genetic::*;
    pub use super::improved::*;
}
