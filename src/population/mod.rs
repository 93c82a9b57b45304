//! Population management
//!
//! This module provides the PopulationMember and Population types.

pub mod member;
#[allow(clippy::module_inception)]
pub mod population;

pub mod prelude {
    pub use super::member::*;
    pub use super::population::*;
}
