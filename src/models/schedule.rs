//! Schedule (candidate solution) model.
//!
//! A schedule is an ordered collection of slots for one section, tagged
//! with its fitness score and the soft violations recorded while it was
//! built. Schedules are plain values: once scored they are never mutated
//! by the engine again.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::Day;

/// A placed teaching hour.
///
/// Field names and day enumeration are the persistence contract with
/// the approval workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub day: Day,
    /// 1-based period.
    pub period: u8,
    pub start_time: String,
    pub end_time: String,
    pub subject_id: String,
    /// `None` only for electives and projects with no eligible staff.
    pub staff_id: Option<String>,
    pub room: String,
    #[serde(default)]
    pub is_elective: bool,
    #[serde(default)]
    pub is_project: bool,
}

/// Per-dimension fitness scores, each in [0, 100].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitnessBreakdown {
    pub rule_compliance: f64,
    pub teacher_balance: f64,
    pub student_comfort: f64,
    pub room_utilization: f64,
    /// Slots staffed outside the expertise set (related or department fallback).
    pub fallback_staffing: u32,
    /// Slots staffed beyond a staff member's weekly cap.
    pub over_capacity: u32,
    /// Elective/project slots left without staff.
    pub unstaffed: u32,
    /// Grid cells left empty because the pool was smaller than the grid.
    pub unfilled_cells: u32,
}

/// A candidate timetable for one section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    /// Display label ("Timetable A", ...).
    pub label: String,
    /// Slots in grid order.
    pub slots: Vec<Slot>,
    /// Composite fitness in [0, 100].
    pub fitness: f64,
    pub breakdown: FitnessBreakdown,
    /// Soft violations recorded during placement.
    pub violations: Vec<Violation>,
    /// Seed of the attempt that produced this schedule.
    pub seed: u64,
    /// Set by the selector on the highest-ranked alternative.
    pub most_efficient: bool,
}

/// A soft constraint violation.
///
/// Soft violations never abort an attempt; they feed the fitness score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub violation_type: ViolationType,
    /// Related entity (staff, subject, or section ID).
    pub entity_id: String,
    pub day: Option<Day>,
    pub period: Option<u8>,
    /// Occurrences covered by this record (cells or units).
    pub count: u32,
    /// Severity (0-100, higher = worse).
    pub severity: i32,
}

/// Classification of soft violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationType {
    /// Staffed by a non-expert whose expertise is related to the subject.
    RelatedExpertise,
    /// Staffed by any same-department staff member.
    FallbackStaffing,
    /// Staff member assigned beyond the weekly cap.
    CapacityExceeded,
    /// Elective or project placed without staff.
    Unstaffed,
    /// Grid cells left empty.
    UnfilledCells,
    /// Teaching units that did not fit on the grid.
    UnplacedUnits,
}

impl Violation {
    fn at(
        violation_type: ViolationType,
        entity_id: impl Into<String>,
        day: Day,
        period: u8,
        severity: i32,
    ) -> Self {
        Self {
            violation_type,
            entity_id: entity_id.into(),
            day: Some(day),
            period: Some(period),
            count: 1,
            severity,
        }
    }

    /// A staff member taught outside their expertise, via the relatedness policy.
    pub fn related_expertise(staff_id: impl Into<String>, day: Day, period: u8) -> Self {
        Self::at(ViolationType::RelatedExpertise, staff_id, day, period, 20)
    }

    /// A staff member taught outside their expertise, via department fallback.
    pub fn fallback_staffing(staff_id: impl Into<String>, day: Day, period: u8) -> Self {
        Self::at(ViolationType::FallbackStaffing, staff_id, day, period, 40)
    }

    /// A staff member was assigned beyond the weekly cap.
    pub fn capacity_exceeded(staff_id: impl Into<String>, day: Day, period: u8) -> Self {
        Self::at(ViolationType::CapacityExceeded, staff_id, day, period, 90)
    }

    /// An elective/project slot has no staff.
    pub fn unstaffed(subject_id: impl Into<String>, day: Day, period: u8) -> Self {
        Self::at(ViolationType::Unstaffed, subject_id, day, period, 30)
    }

    /// `count` grid cells were left empty.
    pub fn unfilled_cells(section_id: impl Into<String>, count: u32) -> Self {
        Self {
            violation_type: ViolationType::UnfilledCells,
            entity_id: section_id.into(),
            day: None,
            period: None,
            count,
            severity: 10,
        }
    }

    /// `count` teaching units could not be placed.
    pub fn unplaced_units(section_id: impl Into<String>, count: u32) -> Self {
        Self {
            violation_type: ViolationType::UnplacedUnits,
            entity_id: section_id.into(),
            day: None,
            period: None,
            count,
            severity: 70,
        }
    }
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_slot(&mut self, slot: Slot) {
        self.slots.push(slot);
    }

    pub fn add_violation(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Number of placed slots.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// The slot at a grid cell, if filled.
    pub fn slot_at(&self, day: Day, period: u8) -> Option<&Slot> {
        self.slots
            .iter()
            .find(|s| s.day == day && s.period == period)
    }

    /// All slots taught by a staff member.
    pub fn slots_for_staff(&self, staff_id: &str) -> Vec<&Slot> {
        self.slots
            .iter()
            .filter(|s| s.staff_id.as_deref() == Some(staff_id))
            .collect()
    }

    /// Total assigned hours per staff member (staffed slots only).
    pub fn staff_hours(&self) -> HashMap<String, u32> {
        let mut hours: HashMap<String, u32> = HashMap::new();
        for staff_id in self.slots.iter().filter_map(|s| s.staff_id.as_ref()) {
            *hours.entry(staff_id.clone()).or_insert(0) += 1;
        }
        hours
    }

    /// Assigned hours per (staff, day).
    pub fn staff_daily_hours(&self) -> HashMap<(String, Day), u32> {
        let mut hours: HashMap<(String, Day), u32> = HashMap::new();
        for slot in &self.slots {
            if let Some(staff_id) = &slot.staff_id {
                *hours.entry((staff_id.clone(), slot.day)).or_insert(0) += 1;
            }
        }
        hours
    }

    /// Number of distinct room labels in use.
    pub fn distinct_rooms(&self) -> usize {
        self.slots
            .iter()
            .map(|s| s.room.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Summed occurrence count of one violation type.
    pub fn violation_count(&self, violation_type: ViolationType) -> u32 {
        self.violations
            .iter()
            .filter(|v| v.violation_type == violation_type)
            .map(|v| v.count)
            .sum()
    }

    /// Whether two slots share (day, period, room).
    pub fn has_room_clash(&self) -> bool {
        let mut seen = HashSet::new();
        !self
            .slots
            .iter()
            .all(|s| seen.insert((s.day, s.period, s.room.as_str())))
    }

    /// Whether a staff member is booked twice in the same (day, period).
    pub fn has_staff_clash(&self) -> bool {
        let mut seen = HashSet::new();
        !self
            .slots
            .iter()
            .filter_map(|s| s.staff_id.as_deref().map(|id| (s.day, s.period, id)))
            .all(|key| seen.insert(key))
    }
}
