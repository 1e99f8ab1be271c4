//! Solution selector.
//!
//! Produces several independent alternatives for one section, scores and
//! ranks them, and flags the best.
//!
//! # Attempts
//!
//! Alternative `i` runs with seed `base_seed + i` and mutation rate
//! `ga.mutation_rate + i x mutation_step` (0.10, 0.15, 0.20 by default).
//! Each attempt owns its RNG, ordering and workload ledger, so attempts run
//! on the rayon pool without shared mutable state and produce the same
//! schedules as a sequential run.
//!
//! An attempt that hits a retryable error is re-run with a derived seed, up
//! to `retry_budget` runs. The selector fails only when every alternative
//! fails.

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::config::{EngineConfig, SearchStrategy};
use crate::eligibility::{EligibilityResolver, SubjectRelatednessPolicy};
use crate::error::{Result, TimetableError};
use crate::ga::TimetableGaProblem;
use crate::models::{Schedule, Section, Staff, Subject};
use crate::pool::CandidatePool;
use crate::scheduler::{rank_cmp, CancelFlag, ConstructiveScheduler, FitnessEvaluator};

/// Odd constant spreading retry seeds away from neighbouring alternatives.
const RETRY_SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// Display label of the alternative at `rank` ("Timetable A", ...).
pub fn alternative_label(rank: usize) -> String {
    match u8::try_from(rank).ok().filter(|r| *r < 26) {
        Some(r) => format!("Timetable {}", (b'A' + r) as char),
        None => format!("Timetable {}", rank + 1),
    }
}

/// Runs and ranks the alternatives for one section.
///
/// # Example
///
/// ```
/// use u_timetable::config::{EngineConfig, SearchStrategy};
/// use u_timetable::eligibility::NoRelatedness;
/// use u_timetable::models::{Section, Staff, Subject};
/// use u_timetable::pool::CandidatePool;
/// use u_timetable::selector::SolutionSelector;
///
/// let subjects = vec![
///     Subject::new("S1", "CSE").with_code("CS101").with_hours(4),
///     Subject::new("S2", "CSE").with_code("CS102").with_hours(4),
/// ];
/// let staff = vec![Staff::new("T1", "CSE").with_expertise_in(["S1", "S2"])];
/// let section = Section::new("A", "CSE");
/// let config = EngineConfig::default()
///     .with_strategy(SearchStrategy::Constructive)
///     .with_seed(42);
/// let pool = CandidatePool::build(&subjects, &section, &config.pool).unwrap();
///
/// let schedules = SolutionSelector::new(&pool, &section, &staff, &subjects, &config)
///     .with_relatedness(&NoRelatedness)
///     .select()
///     .unwrap();
/// assert_eq!(schedules.len(), 3);
/// assert!(schedules[0].most_efficient);
/// ```
#[derive(Debug, Clone)]
pub struct SolutionSelector<'a> {
    pool: &'a CandidatePool,
    section: &'a Section,
    staff: &'a [Staff],
    subjects: &'a [Subject],
    config: &'a EngineConfig,
    relatedness: Option<&'a dyn SubjectRelatednessPolicy>,
    cancel: Option<CancelFlag>,
}

impl<'a> SolutionSelector<'a> {
    pub fn new(
        pool: &'a CandidatePool,
        section: &'a Section,
        staff: &'a [Staff],
        subjects: &'a [Subject],
        config: &'a EngineConfig,
    ) -> Self {
        Self {
            pool,
            section,
            staff,
            subjects,
            config,
            relatedness: None,
            cancel: None,
        }
    }

    pub fn with_relatedness(mut self, policy: &'a dyn SubjectRelatednessPolicy) -> Self {
        self.relatedness = Some(policy);
        self
    }

    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Runs every alternative and returns the successful ones, best first.
    ///
    /// The first schedule carries `most_efficient = true`.
    ///
    /// # Errors
    /// - `Cancelled` if the cancel flag was raised.
    /// - `GenerationFailed` wrapping the last error if no alternative succeeded;
    ///   `attempts` counts every run, retries included.
    pub fn select(&self) -> Result<Vec<Schedule>> {
        let selector = &self.config.selector;
        let count = selector.alternatives.max(1);
        let base_seed = selector.base_seed.unwrap_or_else(rand::random::<u64>);

        let outcomes: Vec<(usize, Result<Schedule>)> = if selector.parallel {
            (0..count)
                .into_par_iter()
                .map(|i| self.attempt(i, base_seed.wrapping_add(i as u64)))
                .collect()
        } else {
            (0..count)
                .map(|i| self.attempt(i, base_seed.wrapping_add(i as u64)))
                .collect()
        };

        let mut schedules = Vec::with_capacity(count);
        let mut last_error = None;
        let mut failed_runs = 0;
        for (index, (runs, outcome)) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok(schedule) => schedules.push(schedule),
                Err(TimetableError::Cancelled) => return Err(TimetableError::Cancelled),
                Err(e) => {
                    warn!(
                        "alternative {} for section {} failed after {} run(s): {}",
                        index, self.section.id, runs, e
                    );
                    failed_runs += runs;
                    last_error = Some(e);
                }
            }
        }

        if schedules.is_empty() {
            let source = last_error.unwrap_or(TimetableError::EmptyPopulation);
            return Err(TimetableError::GenerationFailed {
                attempts: failed_runs,
                source: Box::new(source),
            });
        }

        schedules.sort_by(rank_cmp);
        for (rank, schedule) in schedules.iter_mut().enumerate() {
            schedule.label = alternative_label(rank);
            schedule.most_efficient = rank == 0;
            let b = &schedule.breakdown;
            if b.fallback_staffing + b.over_capacity + b.unstaffed + b.unfilled_cells > 0 {
                warn!(
                    "{}: fallback staffing {}, over capacity {}, unstaffed {}, unfilled cells {}",
                    schedule.label, b.fallback_staffing, b.over_capacity, b.unstaffed, b.unfilled_cells
                );
            }
        }

        info!(
            "section {}: {} of {} alternatives, fitness [{}], most efficient {}",
            self.section.id,
            schedules.len(),
            count,
            schedules
                .iter()
                .map(|s| format!("{:.2}", s.fitness))
                .collect::<Vec<_>>()
                .join(", "),
            schedules[0].label
        );
        Ok(schedules)
    }

    /// One alternative, retried on retryable errors with derived seeds.
    ///
    /// Returns the number of runs made alongside the outcome.
    fn attempt(&self, index: usize, seed: u64) -> (usize, Result<Schedule>) {
        let rate = self.config.ga.mutation_rate + index as f64 * self.config.selector.mutation_step;
        let runs = self.config.selector.retry_budget.max(1);

        let mut retry = 0;
        loop {
            let run_seed = seed ^ (retry as u64).wrapping_mul(RETRY_SEED_MIX);
            let mut rng = StdRng::seed_from_u64(run_seed);
            match self.run_once(rate, &mut rng) {
                Ok(mut schedule) => {
                    schedule.seed = run_seed;
                    return (retry + 1, Ok(schedule));
                }
                Err(e) if e.is_retryable() && retry + 1 < runs => {
                    debug!(
                        "alternative {} run {} (seed {}) failed, retrying: {}",
                        index, retry, run_seed, e
                    );
                    retry += 1;
                }
                Err(e) => return (retry + 1, Err(e)),
            }
        }
    }

    fn run_once(&self, rate: f64, rng: &mut StdRng) -> Result<Schedule> {
        let config = self.config;

        let mut resolver = EligibilityResolver::new(self.staff, self.subjects)
            .with_rules(&config.rules)
            .with_staffing(config.staffing);
        if let Some(policy) = self.relatedness {
            resolver = resolver.with_relatedness(policy);
        }

        let mut scheduler = ConstructiveScheduler::new(self.pool, self.section, resolver)
            .with_rules(&config.rules)
            .with_rooms(config.rooms.clone());
        if let Some(cancel) = &self.cancel {
            scheduler = scheduler.with_cancel(cancel.clone());
        }

        let evaluator = FitnessEvaluator::new()
            .with_weights(config.weights.clone())
            .with_penalties(config.penalties.clone())
            .with_rules(&config.rules);

        match config.selector.strategy {
            SearchStrategy::Constructive => {
                let mut schedule = scheduler.place_seeded(rate, rng)?;
                evaluator.score(&mut schedule);
                Ok(schedule)
            }
            SearchStrategy::Population => {
                let ga = config.ga.clone().with_mutation_rate(rate);
                TimetableGaProblem::new(scheduler, evaluator)
                    .with_perturb_rate(rate)
                    .solve(&ga, rng, self.cancel.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GaConfig, StaffingPolicy};
    use crate::eligibility::KeywordGroups;
    use crate::models::ViolationType;

    fn fixture(staff_count: usize) -> (Vec<Subject>, Vec<Staff>, Section) {
        let subjects: Vec<Subject> = (1..=6)
            .map(|i| {
                Subject::new(format!("S{i}"), "CSE")
                    .with_code(format!("CS10{i}"))
                    .with_hours(4)
            })
            .collect();
        let staff = (1..=staff_count)
            .map(|i| {
                Staff::new(format!("T{i}"), "CSE")
                    .with_expertise_in(subjects.iter().map(|s| s.id.clone()))
            })
            .collect();
        (subjects, staff, Section::new("A", "CSE"))
    }

    fn constructive(seed: u64) -> EngineConfig {
        EngineConfig::default()
            .with_strategy(SearchStrategy::Constructive)
            .with_seed(seed)
    }

    #[test]
    fn test_alternative_labels() {
        assert_eq!(alternative_label(0), "Timetable A");
        assert_eq!(alternative_label(2), "Timetable C");
        assert_eq!(alternative_label(30), "Timetable 31");
    }

    #[test]
    fn test_three_ranked_alternatives() {
        let (subjects, staff, section) = fixture(5);
        let config = constructive(42);
        let pool = CandidatePool::build(&subjects, &section, &config.pool).unwrap();

        let schedules = SolutionSelector::new(&pool, &section, &staff, &subjects, &config)
            .select()
            .unwrap();
        assert_eq!(schedules.len(), 3);
        assert!(schedules[0].most_efficient);
        assert!(schedules[1..].iter().all(|s| !s.most_efficient));
        let labels: Vec<&str> = schedules.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["Timetable A", "Timetable B", "Timetable C"]);
        for pair in schedules.windows(2) {
            assert!(pair[0].fitness >= pair[1].fitness);
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let (subjects, staff, section) = fixture(4);
        let parallel = constructive(7);
        let sequential = constructive(7).with_parallel(false);
        let pool = CandidatePool::build(&subjects, &section, &parallel.pool).unwrap();

        let a = SolutionSelector::new(&pool, &section, &staff, &subjects, &parallel)
            .select()
            .unwrap();
        let b = SolutionSelector::new(&pool, &section, &staff, &subjects, &sequential)
            .select()
            .unwrap();
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_population_strategy() {
        let (subjects, staff, section) = fixture(5);
        let config = EngineConfig::default()
            .with_ga(GaConfig::default().with_population_size(8).with_generations(4))
            .with_seed(42);
        let pool = CandidatePool::build(&subjects, &section, &config.pool).unwrap();
        let relatedness = KeywordGroups::default();

        let schedules = SolutionSelector::new(&pool, &section, &staff, &subjects, &config)
            .with_relatedness(&relatedness)
            .select()
            .unwrap();
        assert_eq!(schedules.len(), 3);
        for s in &schedules {
            assert_eq!(s.slot_count(), 24);
            assert!(!s.has_staff_clash());
            assert!(!s.has_room_clash());
            assert!((0.0..=100.0).contains(&s.fitness));
        }
    }

    #[test]
    fn test_all_attempts_fail() {
        let subjects = vec![Subject::new("S1", "CSE").with_code("CS101").with_hours(30)];
        let staff = vec![Staff::new("T1", "CSE").with_expertise("S1")];
        let section = Section::new("A", "CSE");
        let config = constructive(42);
        let pool = CandidatePool::build(&subjects, &section, &config.pool).unwrap();

        let err = SolutionSelector::new(&pool, &section, &staff, &subjects, &config)
            .select()
            .unwrap_err();
        match err {
            TimetableError::GenerationFailed { attempts, source } => {
                // 3 alternatives x 3 runs each.
                assert_eq!(attempts, 9);
                assert!(matches!(*source, TimetableError::NoEligibleStaff { .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_overload_policy_completes() {
        let subjects = vec![Subject::new("S1", "CSE").with_code("CS101").with_hours(30)];
        let staff = vec![Staff::new("T1", "CSE").with_expertise("S1")];
        let section = Section::new("A", "CSE");
        let config = constructive(42).with_staffing(StaffingPolicy::AllowOverload);
        let pool = CandidatePool::build(&subjects, &section, &config.pool).unwrap();

        let schedules = SolutionSelector::new(&pool, &section, &staff, &subjects, &config)
            .select()
            .unwrap();
        for s in &schedules {
            assert_eq!(s.slot_count(), 30);
            assert_eq!(s.violation_count(ViolationType::CapacityExceeded), 12);
            assert_eq!(s.breakdown.over_capacity, 12);
        }
    }

    #[test]
    fn test_cancelled_selection() {
        let (subjects, staff, section) = fixture(3);
        let config = constructive(42);
        let pool = CandidatePool::build(&subjects, &section, &config.pool).unwrap();
        let cancel = CancelFlag::new();
        cancel.cancel();

        let err = SolutionSelector::new(&pool, &section, &staff, &subjects, &config)
            .with_cancel(cancel)
            .select()
            .unwrap_err();
        assert!(matches!(err, TimetableError::Cancelled));
    }
}
