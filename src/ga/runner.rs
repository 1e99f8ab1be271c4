//! Generational GA loop.
//!
//! # Algorithm
//!
//! 1. Build and evaluate the initial population.
//! 2. Each generation: keep the top `elite_ratio` unchanged, fill the rest
//!    with tournament-selected parents, crossover, and per-child mutation at
//!    `mutation_rate`.
//! 3. After `generations` rounds return the best individual seen.
//!
//! Fitness is maximized. The cancel flag is checked at every generation
//! boundary.

use log::debug;
use rand::Rng;

use super::operators::tournament_select;
use crate::config::GaConfig;
use crate::error::{Result, TimetableError};
use crate::scheduler::CancelFlag;

/// A member of a GA population.
pub trait Individual: Clone {
    fn fitness(&self) -> f64;
    fn set_fitness(&mut self, fitness: f64);
}

/// Problem-specific hooks for the GA loop.
pub trait GaProblem {
    type Individual: Individual;

    /// Creates `size` unevaluated individuals.
    fn initial_population<R: Rng>(&self, size: usize, rng: &mut R) -> Vec<Self::Individual>;

    /// Fitness of an individual; higher is better.
    fn evaluate(&self, individual: &Self::Individual) -> f64;

    fn crossover<R: Rng>(
        &self,
        p1: &Self::Individual,
        p2: &Self::Individual,
        rng: &mut R,
    ) -> (Self::Individual, Self::Individual);

    fn mutate<R: Rng>(&self, individual: &mut Self::Individual, rng: &mut R);
}

/// Outcome of a GA run.
#[derive(Debug, Clone)]
pub struct GaResult<I> {
    pub best: I,
    /// Generations actually run.
    pub generations: usize,
    /// Best fitness after each generation (index 0 = initial population).
    pub history: Vec<f64>,
}

/// Runs the GA loop for a problem.
#[derive(Debug, Clone)]
pub struct GaRunner {
    config: GaConfig,
    cancel: Option<CancelFlag>,
}

impl GaRunner {
    pub fn new(config: GaConfig) -> Self {
        Self {
            config,
            cancel: None,
        }
    }

    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Evolves a population and returns the best individual.
    ///
    /// # Errors
    /// `Cancelled` if the flag is raised between generations.
    pub fn run<P: GaProblem, R: Rng>(
        &self,
        problem: &P,
        rng: &mut R,
    ) -> Result<GaResult<P::Individual>> {
        let size = self.config.population_size.max(1);
        let elites = self.config.elite_count().clamp(1, size);
        let mutation_rate = self.config.mutation_rate.clamp(0.0, 1.0);

        let mut population = problem.initial_population(size, rng);
        for individual in population.iter_mut() {
            let fitness = problem.evaluate(individual);
            individual.set_fitness(fitness);
        }
        sort_descending(&mut population);
        let mut history = vec![best_fitness(&population)];

        let mut generation = 0;
        while generation < self.config.generations {
            self.check_cancel()?;

            let mut next: Vec<P::Individual> = population.iter().take(elites).cloned().collect();
            while next.len() < size {
                let (Some(p1), Some(p2)) = (
                    tournament_select(&population, self.config.tournament_size, rng),
                    tournament_select(&population, self.config.tournament_size, rng),
                ) else {
                    break;
                };
                let (c1, c2) = problem.crossover(p1, p2, rng);
                for mut child in [c1, c2] {
                    if next.len() >= size {
                        break;
                    }
                    if rng.random_bool(mutation_rate) {
                        problem.mutate(&mut child, rng);
                    }
                    let fitness = problem.evaluate(&child);
                    child.set_fitness(fitness);
                    next.push(child);
                }
            }

            sort_descending(&mut next);
            population = next;
            generation += 1;
            history.push(best_fitness(&population));
        }
        self.check_cancel()?;

        debug!(
            "ga finished after {} generations, best fitness {:.2}",
            generation,
            best_fitness(&population)
        );

        let best = population
            .into_iter()
            .next()
            .ok_or(TimetableError::EmptyPopulation)?;
        Ok(GaResult {
            best,
            generations: generation,
            history,
        })
    }

    fn check_cancel(&self) -> Result<()> {
        if self.cancel.as_ref().is_some_and(|c| c.is_cancelled()) {
            return Err(TimetableError::Cancelled);
        }
        Ok(())
    }
}

fn sort_descending<I: Individual>(population: &mut [I]) {
    population.sort_by(|a, b| b.fitness().total_cmp(&a.fitness()));
}

fn best_fitness<I: Individual>(population: &[I]) -> f64 {
    population
        .first()
        .map(|i| i.fitness())
        .unwrap_or(f64::NEG_INFINITY)
}
