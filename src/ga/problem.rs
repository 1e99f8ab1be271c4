//! Timetable GA problem definition.
//!
//! Bridges the candidate pool and constructive scheduler to the generic GA
//! loop. Each chromosome is decoded by placing its ordering on the grid
//! and scoring the result.

use rand::Rng;

use super::chromosome::UnitOrdering;
use super::operators::GeneticOperators;
use super::runner::{GaProblem, GaRunner};
use crate::config::GaConfig;
use crate::error::Result;
use crate::models::Schedule;
use crate::scheduler::{perturb, CancelFlag, ConstructiveScheduler, FitnessEvaluator};

/// GA problem over unit orderings for one section.
///
/// Orderings that cannot be placed (a core unit without eligible staff)
/// score `NEG_INFINITY` and are outcompeted by any feasible ordering.
///
/// # Example
///
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use u_timetable::config::{GaConfig, PoolPolicy};
/// use u_timetable::eligibility::EligibilityResolver;
/// use u_timetable::ga::TimetableGaProblem;
/// use u_timetable::models::{Section, Staff, Subject};
/// use u_timetable::pool::CandidatePool;
/// use u_timetable::scheduler::{ConstructiveScheduler, FitnessEvaluator};
///
/// let subjects = vec![
///     Subject::new("S1", "CSE").with_code("CS101").with_hours(3),
///     Subject::new("S2", "CSE").with_code("CS102").with_hours(3),
/// ];
/// let staff = vec![Staff::new("T1", "CSE").with_expertise_in(["S1", "S2"])];
/// let section = Section::new("A", "CSE");
/// let pool = CandidatePool::build(&subjects, &section, &PoolPolicy::default()).unwrap();
///
/// let scheduler =
///     ConstructiveScheduler::new(&pool, &section, EligibilityResolver::new(&staff, &subjects));
/// let problem = TimetableGaProblem::new(scheduler, FitnessEvaluator::new());
/// let config = GaConfig::default().with_population_size(8).with_generations(5);
/// let schedule = problem
///     .solve(&config, &mut StdRng::seed_from_u64(42), None)
///     .unwrap();
/// assert_eq!(schedule.slot_count(), 6);
/// ```
#[derive(Debug, Clone)]
pub struct TimetableGaProblem<'a> {
    scheduler: ConstructiveScheduler<'a>,
    evaluator: FitnessEvaluator,
    operators: GeneticOperators,
    /// Swap probability for perturbed seeds in the initial population.
    perturb_rate: f64,
}

impl<'a> TimetableGaProblem<'a> {
    pub fn new(scheduler: ConstructiveScheduler<'a>, evaluator: FitnessEvaluator) -> Self {
        Self {
            scheduler,
            evaluator,
            operators: GeneticOperators::default(),
            perturb_rate: 0.1,
        }
    }

    pub fn with_operators(mut self, operators: GeneticOperators) -> Self {
        self.operators = operators;
        self
    }

    pub fn with_perturb_rate(mut self, rate: f64) -> Self {
        self.perturb_rate = rate;
        self
    }

    /// Places and scores an ordering.
    pub fn decode(&self, ordering: &UnitOrdering) -> Result<Schedule> {
        let mut schedule = self.scheduler.place(&ordering.genes)?;
        self.evaluator.score(&mut schedule);
        Ok(schedule)
    }

    /// Runs the GA and decodes the best ordering.
    ///
    /// # Errors
    /// - `Cancelled` if `cancel` is raised.
    /// - The placement error of the best ordering when no ordering in the
    ///   final population is feasible.
    pub fn solve<R: Rng>(
        &self,
        config: &GaConfig,
        rng: &mut R,
        cancel: Option<CancelFlag>,
    ) -> Result<Schedule> {
        let mut runner = GaRunner::new(config.clone());
        if let Some(cancel) = cancel {
            runner = runner.with_cancel(cancel);
        }
        let result = runner.run(self, rng)?;
        self.decode(&result.best)
    }
}

impl GaProblem for TimetableGaProblem<'_> {
    type Individual = UnitOrdering;

    /// Canonical ordering first, then alternating shuffled and perturbed
    /// canonical orderings.
    fn initial_population<R: Rng>(&self, size: usize, rng: &mut R) -> Vec<UnitOrdering> {
        let canonical = self.scheduler.pool().canonical_order();
        let mut population = Vec::with_capacity(size);
        if size == 0 {
            return population;
        }
        population.push(UnitOrdering::new(canonical.clone()));
        for i in 1..size {
            if i % 2 == 1 {
                population.push(UnitOrdering::random(canonical.len(), rng));
            } else {
                let mut genes = canonical.clone();
                perturb(&mut genes, self.perturb_rate, rng);
                population.push(UnitOrdering::new(genes));
            }
        }
        population
    }

    fn evaluate(&self, individual: &UnitOrdering) -> f64 {
        self.decode(individual)
            .map(|s| s.fitness)
            .unwrap_or(f64::NEG_INFINITY)
    }

    fn crossover<R: Rng>(
        &self,
        p1: &UnitOrdering,
        p2: &UnitOrdering,
        rng: &mut R,
    ) -> (UnitOrdering, UnitOrdering) {
        self.operators.crossover(p1, p2, rng)
    }

    fn mutate<R: Rng>(&self, individual: &mut UnitOrdering, rng: &mut R) {
        self.operators.mutate(individual, rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PoolPolicy, StaffingPolicy};
    use crate::eligibility::EligibilityResolver;
    use crate::error::TimetableError;
    use crate::models::{Section, Staff, Subject};
    use crate::pool::CandidatePool;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fixture() -> (Vec<Subject>, Vec<Staff>, Section) {
        let subjects: Vec<Subject> = (1..=6)
            .map(|i| {
                Subject::new(format!("S{i}"), "CSE")
                    .with_code(format!("CS10{i}"))
                    .with_hours(4)
            })
            .collect();
        let staff = (1..=5)
            .map(|i| {
                Staff::new(format!("T{i}"), "CSE")
                    .with_expertise_in(subjects.iter().map(|s| s.id.clone()))
            })
            .collect();
        (subjects, staff, Section::new("A", "CSE"))
    }

    fn small_config() -> GaConfig {
        GaConfig::default().with_population_size(10).with_generations(8)
    }

    #[test]
    fn test_initial_population_shape() {
        let (subjects, staff, section) = fixture();
        let pool = CandidatePool::build(&subjects, &section, &PoolPolicy::default()).unwrap();
        let scheduler =
            ConstructiveScheduler::new(&pool, &section, EligibilityResolver::new(&staff, &subjects));
        let problem = TimetableGaProblem::new(scheduler, FitnessEvaluator::new());

        let population = problem.initial_population(7, &mut StdRng::seed_from_u64(42));
        assert_eq!(population.len(), 7);
        assert_eq!(population[0].genes, pool.canonical_order());
        assert!(population.iter().all(|o| o.is_valid() && o.len() == 24));
    }

    #[test]
    fn test_solve_not_worse_than_canonical() {
        let (subjects, staff, section) = fixture();
        let pool = CandidatePool::build(&subjects, &section, &PoolPolicy::default()).unwrap();
        let scheduler =
            ConstructiveScheduler::new(&pool, &section, EligibilityResolver::new(&staff, &subjects));
        let problem = TimetableGaProblem::new(scheduler, FitnessEvaluator::new());

        let baseline = problem
            .decode(&UnitOrdering::new(pool.canonical_order()))
            .unwrap();
        let best = problem
            .solve(&small_config(), &mut StdRng::seed_from_u64(42), None)
            .unwrap();
        assert!(best.fitness >= baseline.fitness);
        assert_eq!(best.slot_count(), 24);
        assert!(!best.has_staff_clash());
    }

    #[test]
    fn test_infeasible_everywhere_surfaces_error() {
        let subjects = vec![Subject::new("S1", "CSE").with_code("CS101").with_hours(30)];
        let staff = vec![Staff::new("T1", "CSE").with_expertise("S1")];
        let section = Section::new("A", "CSE");
        let pool = CandidatePool::build(&subjects, &section, &PoolPolicy::default()).unwrap();
        let resolver =
            EligibilityResolver::new(&staff, &subjects).with_staffing(StaffingPolicy::Strict);
        let scheduler = ConstructiveScheduler::new(&pool, &section, resolver);
        let problem = TimetableGaProblem::new(scheduler, FitnessEvaluator::new());

        let err = problem
            .solve(&small_config(), &mut StdRng::seed_from_u64(42), None)
            .unwrap_err();
        assert!(matches!(err, TimetableError::NoEligibleStaff { .. }));
    }
}
