//! Goal functions
//!
//! This module provides the scoring oracle that wraps the attacked model: result
//! types, the budgeted [`oracle::Oracle`] driver, and concrete objectives.

pub mod benchmarks;
pub mod classification;
pub mod oracle;
pub mod text_to_text;
pub mod traits;

pub mod prelude {
    pub use super::benchmarks::*;
    pub use super::classification::*;
    pub use super::oracle::*;
    pub use super::text_to_text::*;
    pub use super::traits::*;
}
