//! Configurable genetic operators for unit orderings.
//!
//! Provides runtime-selectable crossover and mutation strategies
//! via [`GeneticOperators`], plus tournament selection.
//!
//! # Usage
//!
//! ```
//! use u_timetable::ga::operators::{CrossoverType, GeneticOperators, MutationType};
//!
//! let ops = GeneticOperators::default();
//! assert_eq!(ops.crossover_type, CrossoverType::OnePoint);
//! assert_eq!(ops.mutation_type, MutationType::Swap);
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::chromosome::{
    insert_mutation, lox_crossover, one_point_crossover, swap_mutation, UnitOrdering,
};
use super::runner::Individual;

/// Crossover strategy for unit orderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossoverType {
    /// Single cut point; prefix from one parent, rest in the other's order.
    #[default]
    OnePoint,
    /// Linear Order Crossover (Falkenauer & Bouffouix, 1991).
    Lox,
}

/// Mutation strategy for unit orderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationType {
    /// Swap two random positions.
    #[default]
    Swap,
    /// Remove and reinsert at a random position.
    Insert,
}

/// Runtime-selectable genetic operators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneticOperators {
    pub crossover_type: CrossoverType,
    pub mutation_type: MutationType,
}

impl GeneticOperators {
    pub fn crossover<R: Rng>(
        &self,
        p1: &UnitOrdering,
        p2: &UnitOrdering,
        rng: &mut R,
    ) -> (UnitOrdering, UnitOrdering) {
        match self.crossover_type {
            CrossoverType::OnePoint => one_point_crossover(p1, p2, rng),
            CrossoverType::Lox => lox_crossover(p1, p2, rng),
        }
    }

    pub fn mutate<R: Rng>(&self, ordering: &mut UnitOrdering, rng: &mut R) {
        match self.mutation_type {
            MutationType::Swap => swap_mutation(ordering, rng),
            MutationType::Insert => insert_mutation(ordering, rng),
        }
    }
}

/// Tournament selection: best of `size` uniformly drawn individuals.
///
/// Returns `None` only for an empty population.
pub fn tournament_select<'p, I: Individual, R: Rng>(
    population: &'p [I],
    size: usize,
    rng: &mut R,
) -> Option<&'p I> {
    if population.is_empty() {
        return None;
    }
    (0..size.max(1))
        .map(|_| &population[rng.random_range(0..population.len())])
        .max_by(|a, b| a.fitness().total_cmp(&b.fitness()))
}
