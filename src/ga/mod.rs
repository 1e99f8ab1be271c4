//! Population-based search over unit orderings.
//!
//! Evolves permutations of the candidate pool; each individual is
//! materialized by the constructive scheduler and scored by the fitness
//! evaluator.
//!
//! # Encoding
//!
//! - **Genes**: permutation of pool indices (placement order).
//! - **Fitness**: composite score in [0, 100]; `NEG_INFINITY` when the
//!   ordering cannot be placed.
//!
//! # Submodules
//!
//! - [`operators`]: Runtime-selectable crossover and mutation strategies
//!
//! # Reference
//! - Falkenauer & Bouffouix (1991), "A genetic algorithm for job shop"
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization and Machine Learning"

mod chromosome;
pub mod operators;
mod problem;
mod runner;

pub use chromosome::{
    insert_mutation, lox_crossover, one_point_crossover, swap_mutation, UnitOrdering,
};
pub use problem::TimetableGaProblem;
pub use runner::{GaProblem, GaResult, GaRunner, Individual};
