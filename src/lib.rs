//! # perturb-evo
//!
//! Population-based genetic search for adversarial text perturbations.
//!
//! The search looks for a word-substituted version of an input that drives a model
//! toward an attack goal (misclassification, a target label, a changed output)
//! while respecting constraints on which edits are legal. Every model query goes
//! through a budgeted oracle, and the search unwinds cleanly once the budget runs
//! out.
//!
//! ## Core Concepts
//!
//! - **Goal functions**: Score candidate texts and report success (`goal`)
//! - **Candidate generation**: Word-swap transformations filtered by constraints (`transformation`)
//! - **Population variants**: Pluggable initialization, crossover and mutation bookkeeping (`algorithms`)
//! - **Cooperative cancellation**: A shared token checked after every oracle call (`cancellation`)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use perturb_evo::prelude::*;
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//!
//! let candidates = CandidateGenerator::new(
//!     WordSwapDictionary::new().with_synonyms("terrible", ["awful", "dreadful"]),
//! )
//! .with_pre_constraint(RepeatModification)
//! .with_pre_constraint(StopwordModification::english());
//!
//! let result = GeneticSearch::builder()
//!     .config(GeneticSearchConfig::alzantot())
//!     .strategy(AlzantotStrategy::new())
//!     .goal(Oracle::new(objective).with_query_budget(2000))
//!     .candidates(candidates)
//!     .build()?
//!     .attack(&AttackedText::new("a terrible movie"), &mut rng)?;
//! ```

pub mod algorithms;
pub mod cancellation;
pub mod diagnostics;
pub mod error;
pub mod goal;
pub mod operators;
pub mod population;
pub mod termination;
pub mod text;
pub mod transformation;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::algorithms::prelude::*;
    pub use crate::cancellation::*;
    pub use crate::diagnostics::prelude::*;
    pub use crate::error::*;
    pub use crate::goal::prelude::*;
    pub use crate::operators::prelude::*;
    pub use crate::population::prelude::*;
    pub use crate::termination::prelude::*;
    pub use crate::text::prelude::*;
    pub use crate::transformation::prelude::*;
}
