//! Schedule fitness evaluation.
//!
//! Scores a placed schedule along four weighted dimensions and records the
//! soft-violation tallies next to the scores.
//!
//! # Metrics
//!
//! | Dimension | Weight | Definition |
//! |-----------|--------|-----------|
//! | Rule compliance | 0.50 | 100 - 10 per period beyond `max_continuous_hours` in a day run, - 5 per soft staffing violation |
//! | Teacher balance | 0.25 | 100 - 10 x population std dev of per-staff hours |
//! | Student comfort | 0.15 | 100 - 15 per day run longer than 3 periods |
//! | Room utilization | 0.10 | min(100, slots / distinct rooms x 20) |
//!
//! Every dimension is floored at 0; the composite is clamped to [0, 100].
//! Constants come from [`FitnessPenalties`] and [`FitnessWeights`].

use std::cmp::Ordering;

use crate::config::{FitnessPenalties, FitnessWeights, SchedulingRules};
use crate::models::{Day, FitnessBreakdown, Schedule, ViolationType, WeekGrid};

/// Weighted multi-dimension scorer.
#[derive(Debug, Clone)]
pub struct FitnessEvaluator {
    weights: FitnessWeights,
    penalties: FitnessPenalties,
    max_continuous_hours: u32,
    grid: WeekGrid,
}

impl Default for FitnessEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl FitnessEvaluator {
    pub fn new() -> Self {
        Self {
            weights: FitnessWeights::default(),
            penalties: FitnessPenalties::default(),
            max_continuous_hours: SchedulingRules::default().max_continuous_hours,
            grid: WeekGrid::standard(),
        }
    }

    pub fn with_weights(mut self, weights: FitnessWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_penalties(mut self, penalties: FitnessPenalties) -> Self {
        self.penalties = penalties;
        self
    }

    pub fn with_rules(mut self, rules: &SchedulingRules) -> Self {
        self.max_continuous_hours = rules.max_continuous_hours;
        self
    }

    /// Computes the breakdown and composite without touching the schedule.
    pub fn evaluate(&self, schedule: &Schedule) -> (f64, FitnessBreakdown) {
        let fallback = schedule.violation_count(ViolationType::RelatedExpertise)
            + schedule.violation_count(ViolationType::FallbackStaffing);
        let over_capacity = schedule.violation_count(ViolationType::CapacityExceeded);
        let unstaffed = schedule.violation_count(ViolationType::Unstaffed);

        let soft = (fallback + over_capacity + unstaffed) as f64;
        let rule_compliance = (100.0
            - self.penalties.continuity * self.continuity_violations(schedule) as f64
            - self.penalties.soft_staffing * soft)
            .max(0.0);

        let breakdown = FitnessBreakdown {
            rule_compliance,
            teacher_balance: self.teacher_balance(schedule),
            student_comfort: self.student_comfort(schedule),
            room_utilization: self.room_utilization(schedule),
            fallback_staffing: fallback,
            over_capacity,
            unstaffed,
            unfilled_cells: schedule.violation_count(ViolationType::UnfilledCells),
        };

        let w = &self.weights;
        let composite = w.rule_compliance * breakdown.rule_compliance
            + w.teacher_balance * breakdown.teacher_balance
            + w.student_comfort * breakdown.student_comfort
            + w.room_utilization * breakdown.room_utilization;

        (composite.clamp(0.0, 100.0), breakdown)
    }

    /// Scores the schedule in place and returns the composite.
    pub fn score(&self, schedule: &mut Schedule) -> f64 {
        let (fitness, breakdown) = self.evaluate(schedule);
        schedule.fitness = fitness;
        schedule.breakdown = breakdown;
        fitness
    }

    /// Periods beyond the continuous-hours limit, summed over day runs.
    pub fn continuity_violations(&self, schedule: &Schedule) -> u32 {
        let limit = self.max_continuous_hours;
        self.day_runs(schedule)
            .into_iter()
            .map(|run| run.saturating_sub(limit))
            .sum()
    }

    /// Day runs longer than the comfort run length.
    pub fn comfort_violations(&self, schedule: &Schedule) -> u32 {
        self.day_runs(schedule)
            .into_iter()
            .filter(|&run| run > self.penalties.comfort_run_length)
            .count() as u32
    }

    fn teacher_balance(&self, schedule: &Schedule) -> f64 {
        let hours = schedule.staff_hours();
        if hours.len() < 2 {
            return 100.0;
        }
        let n = hours.len() as f64;
        let mean = hours.values().map(|&h| h as f64).sum::<f64>() / n;
        let variance = hours
            .values()
            .map(|&h| (h as f64 - mean).powi(2))
            .sum::<f64>()
            / n;
        (100.0 - self.penalties.balance_std_dev * variance.sqrt()).max(0.0)
    }

    fn student_comfort(&self, schedule: &Schedule) -> f64 {
        (100.0 - self.penalties.comfort * self.comfort_violations(schedule) as f64).max(0.0)
    }

    fn room_utilization(&self, schedule: &Schedule) -> f64 {
        let rooms = schedule.distinct_rooms();
        if rooms == 0 {
            return 100.0;
        }
        (schedule.slot_count() as f64 / rooms as f64 * self.penalties.room_factor).min(100.0)
    }

    /// Lengths of maximal runs of occupied periods, per day.
    fn day_runs(&self, schedule: &Schedule) -> Vec<u32> {
        let mut runs = Vec::new();
        for day in Day::ALL {
            let mut run = 0;
            for period in 1..=self.grid.periods_per_day() {
                if schedule.slot_at(day, period).is_some() {
                    run += 1;
                } else if run > 0 {
                    runs.push(run);
                    run = 0;
                }
            }
            if run > 0 {
                runs.push(run);
            }
        }
        runs
    }
}

/// Ranking order: higher fitness, then higher rule compliance, then fewer rooms.
pub fn rank_cmp(a: &Schedule, b: &Schedule) -> Ordering {
    b.fitness
        .total_cmp(&a.fitness)
        .then_with(|| {
            b.breakdown
                .rule_compliance
                .total_cmp(&a.breakdown.rule_compliance)
        })
        .then_with(|| a.distinct_rooms().cmp(&b.distinct_rooms()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Slot, Violation};

    fn slot(day: Day, period: u8, staff: &str, room: &str) -> Slot {
        Slot {
            day,
            period,
            start_time: String::new(),
            end_time: String::new(),
            subject_id: format!("S{period}"),
            staff_id: Some(staff.to_string()),
            room: room.to_string(),
            is_elective: false,
            is_project: false,
        }
    }

    fn full_day(day: Day) -> Vec<Slot> {
        (1..=6)
            .map(|p| slot(day, p, &format!("T{}", p % 2), "CSE-101"))
            .collect()
    }

    #[test]
    fn test_empty_schedule() {
        let eval = FitnessEvaluator::new();
        let (fitness, b) = eval.evaluate(&Schedule::new());
        assert!((b.rule_compliance - 100.0).abs() < 1e-10);
        assert!((b.teacher_balance - 100.0).abs() < 1e-10);
        assert!((b.student_comfort - 100.0).abs() < 1e-10);
        assert!((b.room_utilization - 100.0).abs() < 1e-10);
        assert!((fitness - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_full_day_penalties() {
        let eval = FitnessEvaluator::new();
        let mut schedule = Schedule::new();
        for s in full_day(Day::Monday) {
            schedule.add_slot(s);
        }

        // Six in a row: three periods over the limit, one long run.
        assert_eq!(eval.continuity_violations(&schedule), 3);
        assert_eq!(eval.comfort_violations(&schedule), 1);

        let (_, b) = eval.evaluate(&schedule);
        assert!((b.rule_compliance - 70.0).abs() < 1e-10);
        assert!((b.student_comfort - 85.0).abs() < 1e-10);
        // T0 and T1 teach three hours each.
        assert!((b.teacher_balance - 100.0).abs() < 1e-10);
        // 6 slots in one room.
        assert!((b.room_utilization - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_runs_reset_between_days() {
        let eval = FitnessEvaluator::new();
        let mut schedule = Schedule::new();
        for p in 4..=6 {
            schedule.add_slot(slot(Day::Monday, p, "T1", "CSE-101"));
        }
        for p in 1..=3 {
            schedule.add_slot(slot(Day::Tuesday, p, "T1", "CSE-101"));
        }
        assert_eq!(eval.continuity_violations(&schedule), 0);
        assert_eq!(eval.comfort_violations(&schedule), 0);
    }

    #[test]
    fn test_gap_splits_runs() {
        let eval = FitnessEvaluator::new();
        let mut schedule = Schedule::new();
        for p in [1, 2, 3, 4, 6] {
            schedule.add_slot(slot(Day::Wednesday, p, "T1", "CSE-101"));
        }
        assert_eq!(eval.continuity_violations(&schedule), 1);
        assert_eq!(eval.comfort_violations(&schedule), 1);
    }

    #[test]
    fn test_teacher_balance_std_dev() {
        let eval = FitnessEvaluator::new();
        let mut schedule = Schedule::new();
        // T1: 3 hours, T2: 1 hour -> std dev 1.0
        schedule.add_slot(slot(Day::Monday, 1, "T1", "CSE-101"));
        schedule.add_slot(slot(Day::Monday, 2, "T1", "CSE-101"));
        schedule.add_slot(slot(Day::Monday, 3, "T1", "CSE-101"));
        schedule.add_slot(slot(Day::Tuesday, 1, "T2", "CSE-101"));
        let (_, b) = eval.evaluate(&schedule);
        assert!((b.teacher_balance - 90.0).abs() < 1e-10);
    }

    #[test]
    fn test_room_utilization() {
        let eval = FitnessEvaluator::new();
        let mut schedule = Schedule::new();
        schedule.add_slot(slot(Day::Monday, 1, "T1", "CSE-101"));
        schedule.add_slot(slot(Day::Monday, 2, "T1", "CSE-102"));
        schedule.add_slot(slot(Day::Monday, 3, "T1", "CSE-103"));
        let (_, b) = eval.evaluate(&schedule);
        assert!((b.room_utilization - 20.0).abs() < 1e-10);
    }

    #[test]
    fn test_soft_violations_lower_compliance() {
        let eval = FitnessEvaluator::new();
        let mut schedule = Schedule::new();
        schedule.add_slot(slot(Day::Monday, 1, "T1", "CSE-101"));
        schedule.add_violation(Violation::fallback_staffing("T1", Day::Monday, 1));
        schedule.add_violation(Violation::unfilled_cells("A", 29));

        let fitness = eval.score(&mut schedule);
        assert!((schedule.breakdown.rule_compliance - 95.0).abs() < 1e-10);
        assert_eq!(schedule.breakdown.fallback_staffing, 1);
        assert_eq!(schedule.breakdown.unfilled_cells, 29);
        assert!((schedule.fitness - fitness).abs() < 1e-10);
        assert!(fitness < 100.0);
    }

    #[test]
    fn test_composite_clamped() {
        let eval = FitnessEvaluator::new().with_penalties(FitnessPenalties {
            soft_staffing: 1000.0,
            ..FitnessPenalties::default()
        });
        let mut schedule = Schedule::new();
        schedule.add_slot(slot(Day::Monday, 1, "T1", "CSE-101"));
        schedule.add_violation(Violation::capacity_exceeded("T1", Day::Monday, 1));
        let fitness = eval.score(&mut schedule);
        assert!(fitness >= 0.0);
        assert!((schedule.breakdown.rule_compliance).abs() < 1e-10);
    }

    #[test]
    fn test_rank_tie_breaks() {
        let mut a = Schedule::new();
        a.fitness = 80.0;
        a.breakdown.rule_compliance = 60.0;
        let mut b = a.clone();
        b.breakdown.rule_compliance = 70.0;
        assert_eq!(rank_cmp(&a, &b), Ordering::Greater);

        let mut c = a.clone();
        c.add_slot(slot(Day::Monday, 1, "T1", "CSE-101"));
        let mut d = a.clone();
        d.add_slot(slot(Day::Monday, 1, "T1", "CSE-101"));
        d.add_slot(slot(Day::Monday, 2, "T1", "CSE-102"));
        assert_eq!(rank_cmp(&c, &d), Ordering::Less);

        let mut e = a.clone();
        e.fitness = 90.0;
        assert_eq!(rank_cmp(&e, &a), Ordering::Less);
    }
}
