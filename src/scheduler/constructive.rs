//! Constructive grid-filling heuristic.
//!
//! # Algorithm
//!
//! 1. Walk the grid cells in order: Monday..Friday, periods 1..6.
//! 2. For each cell, take the first remaining unit (in the given ordering)
//!    whose subject differs from the previous cell's subject that day,
//!    honoring morning/afternoon category preferences when set.
//! 3. Resolve staff via the eligibility resolver (least-loaded first).
//! 4. Label the room and commit the hour to the attempt's ledger.
//! 5. Stop when the pool is exhausted or the grid is full.
//!
//! Empty cells and units left over are recorded as soft violations.
//!
//! # Complexity
//! O(c · (u + s)) where c = grid cells, u = units, s = staff.

use log::debug;
use rand::Rng;

use super::{CancelFlag, RoomAllocator};
use crate::config::{RoomPolicy, SchedulingRules};
use crate::eligibility::{EligibilityResolver, EligibilityTier, Staffing, WorkloadLedger};
use crate::error::{Result, TimetableError};
use crate::models::{
    period_times, Day, Schedule, Section, Slot, SubjectCategory, Violation, WeekGrid,
};
use crate::pool::{CandidatePool, TeachingUnit};

/// Whether `order` holds each of `0..size` exactly once.
fn is_permutation(order: &[usize], size: usize) -> bool {
    if order.len() != size {
        return false;
    }
    let mut seen = vec![false; size];
    order.iter().all(|&i| i < size && !std::mem::replace(&mut seen[i], true))
}

/// Periods 1..=3 count as morning.
const LAST_MORNING_PERIOD: u8 = 3;

/// Deterministic constructive scheduler.
///
/// Given the same ordering it always yields the same schedule.
///
/// # Example
///
/// ```
/// use u_timetable::eligibility::EligibilityResolver;
/// use u_timetable::config::PoolPolicy;
/// use u_timetable::models::{Section, Staff, Subject};
/// use u_timetable::pool::CandidatePool;
/// use u_timetable::scheduler::ConstructiveScheduler;
///
/// let subjects = vec![Subject::new("S1", "CSE").with_code("CS101").with_hours(4)];
/// let staff = vec![Staff::new("T1", "CSE").with_expertise("S1")];
/// let section = Section::new("A", "CSE");
/// let pool = CandidatePool::build(&subjects, &section, &PoolPolicy::default()).unwrap();
///
/// let resolver = EligibilityResolver::new(&staff, &subjects);
/// let scheduler = ConstructiveScheduler::new(&pool, &section, resolver);
/// let schedule = scheduler.place(&pool.canonical_order()).unwrap();
/// assert_eq!(schedule.slot_count(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct ConstructiveScheduler<'a> {
    pool: &'a CandidatePool,
    section: &'a Section,
    resolver: EligibilityResolver<'a>,
    grid: WeekGrid,
    rooms: RoomPolicy,
    core_in_morning: bool,
    electives_in_afternoon: bool,
    cancel: Option<CancelFlag>,
}

impl<'a> ConstructiveScheduler<'a> {
    pub fn new(
        pool: &'a CandidatePool,
        section: &'a Section,
        resolver: EligibilityResolver<'a>,
    ) -> Self {
        Self {
            pool,
            section,
            resolver,
            grid: WeekGrid::standard(),
            rooms: RoomPolicy::default(),
            core_in_morning: false,
            electives_in_afternoon: false,
            cancel: None,
        }
    }

    /// Applies category placement preferences.
    pub fn with_rules(mut self, rules: &SchedulingRules) -> Self {
        self.core_in_morning = rules.core_in_morning;
        self.electives_in_afternoon = rules.electives_in_afternoon;
        self
    }

    pub fn with_rooms(mut self, rooms: RoomPolicy) -> Self {
        self.rooms = rooms;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// The pool this scheduler places.
    pub fn pool(&self) -> &'a CandidatePool {
        self.pool
    }

    /// Places the pool in the given unit ordering.
    ///
    /// `order` is a permutation of pool indices; the returned schedule is
    /// not yet scored.
    ///
    /// # Errors
    /// - `InvalidOrdering` if `order` repeats or omits a unit, or names one
    ///   outside the pool.
    /// - `NoEligibleStaff` if a core/honors unit cannot be staffed.
    /// - `Cancelled` if the cancel flag is raised mid-placement.
    pub fn place(&self, order: &[usize]) -> Result<Schedule> {
        if !is_permutation(order, self.pool.len()) {
            return Err(TimetableError::InvalidOrdering {
                len: order.len(),
                pool_size: self.pool.len(),
            });
        }

        let mut remaining: Vec<usize> = order.to_vec();
        let mut ledger = WorkloadLedger::new();
        let mut rooms = RoomAllocator::new(self.section.room_prefix(), self.rooms.clone());
        let mut schedule = Schedule::new();
        let mut previous: Option<(Day, &str)> = None;

        for cell in self.grid.cells() {
            if remaining.is_empty() {
                break;
            }
            if self.cancel.as_ref().is_some_and(|c| c.is_cancelled()) {
                return Err(TimetableError::Cancelled);
            }

            let previous_subject = previous
                .filter(|(day, _)| *day == cell.day)
                .map(|(_, subject)| subject);
            let pick = self.choose_next(&remaining, previous_subject, cell.period);
            let unit = &self.pool.units[remaining.remove(pick)];

            let staffing = self
                .resolver
                .resolve(unit, cell.day, cell.period, &ledger)?;
            let staff_id = match staffing {
                Staffing::Assigned { staff_id, tier } => {
                    let violation = match tier {
                        EligibilityTier::Expert => None,
                        EligibilityTier::Related => {
                            Some(Violation::related_expertise(&staff_id, cell.day, cell.period))
                        }
                        EligibilityTier::Department => {
                            Some(Violation::fallback_staffing(&staff_id, cell.day, cell.period))
                        }
                        EligibilityTier::Overload => {
                            Some(Violation::capacity_exceeded(&staff_id, cell.day, cell.period))
                        }
                    };
                    if let Some(v) = violation {
                        schedule.add_violation(v);
                    }
                    ledger.commit(&staff_id, cell.day);
                    Some(staff_id)
                }
                Staffing::Unstaffed => {
                    schedule.add_violation(Violation::unstaffed(
                        &unit.subject_id,
                        cell.day,
                        cell.period,
                    ));
                    None
                }
            };

            let (start, end) = period_times(cell.period).unwrap_or_default();
            schedule.add_slot(Slot {
                day: cell.day,
                period: cell.period,
                start_time: start.to_string(),
                end_time: end.to_string(),
                subject_id: unit.subject_id.clone(),
                staff_id,
                room: rooms.assign(cell.day, &unit.subject_id),
                is_elective: unit.category == SubjectCategory::Elective,
                is_project: unit.category == SubjectCategory::Project,
            });
            previous = Some((cell.day, unit.subject_id.as_str()));
        }

        let unfilled = self.grid.cell_count().saturating_sub(schedule.slot_count());
        if unfilled > 0 {
            debug!(
                "section {}: {} of {} cells left empty (pool of {} units)",
                self.section.id,
                unfilled,
                self.grid.cell_count(),
                self.pool.len()
            );
            schedule.add_violation(Violation::unfilled_cells(&self.section.id, unfilled as u32));
        }
        if !remaining.is_empty() {
            debug!(
                "section {}: {} units did not fit on the grid",
                self.section.id,
                remaining.len()
            );
            schedule.add_violation(Violation::unplaced_units(
                &self.section.id,
                remaining.len() as u32,
            ));
        }

        debug!(
            "placed {} slots for section {} ({} committed staff hours)",
            schedule.slot_count(),
            self.section.id,
            ledger.total()
        );
        Ok(schedule)
    }

    /// Places a randomly perturbed canonical ordering.
    ///
    /// Each position is swapped with a random one with probability `rate`.
    pub fn place_seeded<R: Rng>(&self, rate: f64, rng: &mut R) -> Result<Schedule> {
        let mut order = self.pool.canonical_order();
        perturb(&mut order, rate, rng);
        self.place(&order)
    }

    fn choose_next(&self, remaining: &[usize], previous: Option<&str>, period: u8) -> usize {
        let units: Vec<&TeachingUnit> = remaining.iter().map(|&i| &self.pool.units[i]).collect();
        let differs = |u: &TeachingUnit| previous != Some(u.subject_id.as_str());
        let preferred = |u: &TeachingUnit| {
            (self.core_in_morning
                && period <= LAST_MORNING_PERIOD
                && u.category == SubjectCategory::Core)
                || (self.electives_in_afternoon
                    && period > LAST_MORNING_PERIOD
                    && u.category == SubjectCategory::Elective)
        };

        units
            .iter()
            .position(|&u| differs(u) && preferred(u))
            .or_else(|| units.iter().position(|&u| differs(u)))
            .unwrap_or(0)
    }
}

/// Swaps each position with a random one with probability `rate`.
pub fn perturb<R: Rng>(order: &mut [usize], rate: f64, rng: &mut R) {
    let len = order.len();
    if len < 2 || rate <= 0.0 {
        return;
    }
    let rate = rate.min(1.0);
    for i in 0..len {
        if rng.random_bool(rate) {
            let j = rng.random_range(0..len);
            order.swap(i, j);
        }
    }
}
