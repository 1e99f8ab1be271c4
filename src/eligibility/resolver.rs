//! Eligibility resolution.
//!
//! # Tiers
//!
//! Candidates are searched tier by tier; the first non-empty tier wins.
//!
//! | Tier | Department | Expertise | Weekly cap | Daily cap |
//! |------|-----------|-----------|------------|-----------|
//! | Expert | same | subject in set | below | below |
//! | Related | same | related subject in set | below | below |
//! | Department | same | any | below | below |
//! | Overload | same | any (experts first) | ignored | below |
//!
//! The overload tier only exists under `StaffingPolicy::AllowOverload`.
//! Within a tier, staff are ranked by ascending committed hours, then by ID.

use std::collections::HashMap;

use log::debug;

use super::{NoRelatedness, SubjectRelatednessPolicy, WorkloadLedger};
use crate::config::{SchedulingRules, StaffingPolicy};
use crate::error::{Result, TimetableError};
use crate::models::{Day, Staff, Subject};
use crate::pool::TeachingUnit;

/// How a candidate list was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EligibilityTier {
    Expert,
    Related,
    Department,
    Overload,
}

impl EligibilityTier {
    /// Whether placements from this tier are soft violations.
    pub fn is_fallback(self) -> bool {
        self != EligibilityTier::Expert
    }
}

/// Ranked candidates for one unit on one day.
#[derive(Debug, Clone)]
pub struct Eligibility<'a> {
    pub tier: EligibilityTier,
    /// Best candidate first.
    pub staff: Vec<&'a Staff>,
}

/// Outcome of resolving one placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Staffing {
    Assigned {
        staff_id: String,
        tier: EligibilityTier,
    },
    /// Elective/project with nobody available.
    Unstaffed,
}

/// Computes which staff may teach a unit on a given day.
#[derive(Debug, Clone)]
pub struct EligibilityResolver<'a> {
    staff: Vec<&'a Staff>,
    subjects: HashMap<&'a str, &'a Subject>,
    relatedness: &'a dyn SubjectRelatednessPolicy,
    max_daily_hours: u32,
    max_weekly_hours: u32,
    staffing: StaffingPolicy,
}

impl<'a> EligibilityResolver<'a> {
    /// Creates a resolver with default rules, strict staffing, and no
    /// relatedness tier.
    pub fn new(staff: &'a [Staff], subjects: &'a [Subject]) -> Self {
        let rules = SchedulingRules::default();
        let mut staff: Vec<&Staff> = staff.iter().collect();
        staff.sort_by(|a, b| a.id.cmp(&b.id));
        Self {
            staff,
            subjects: subjects.iter().map(|s| (s.id.as_str(), s)).collect(),
            relatedness: &NoRelatedness,
            max_daily_hours: rules.max_daily_hours,
            max_weekly_hours: rules.max_weekly_hours,
            staffing: StaffingPolicy::Strict,
        }
    }

    /// Sets the relatedness policy.
    pub fn with_relatedness(mut self, policy: &'a dyn SubjectRelatednessPolicy) -> Self {
        self.relatedness = policy;
        self
    }

    /// Applies daily and weekly caps from the rules.
    pub fn with_rules(mut self, rules: &SchedulingRules) -> Self {
        self.max_daily_hours = rules.max_daily_hours;
        self.max_weekly_hours = rules.max_weekly_hours;
        self
    }

    /// Sets the staffing policy.
    pub fn with_staffing(mut self, staffing: StaffingPolicy) -> Self {
        self.staffing = staffing;
        self
    }

    /// Effective weekly cap of a staff member.
    #[inline]
    pub fn weekly_cap(&self, staff: &Staff) -> u32 {
        staff.max_hours.min(self.max_weekly_hours)
    }

    /// Ranked candidates for `unit` on `day`, or `None` if every tier is empty.
    pub fn eligible(
        &self,
        unit: &TeachingUnit,
        day: Day,
        ledger: &WorkloadLedger,
    ) -> Option<Eligibility<'a>> {
        let department: Vec<&'a Staff> = self
            .staff
            .iter()
            .copied()
            .filter(|s| s.department_id == unit.department_id)
            .filter(|s| ledger.daily(&s.id, day) < self.max_daily_hours)
            .collect();

        let available: Vec<&'a Staff> = department
            .iter()
            .copied()
            .filter(|s| ledger.committed(&s.id) < self.weekly_cap(s))
            .collect();

        let experts: Vec<&'a Staff> = available
            .iter()
            .copied()
            .filter(|s| s.is_expert_in(&unit.subject_id))
            .collect();
        if !experts.is_empty() {
            return Some(self.ranked(EligibilityTier::Expert, experts, ledger));
        }

        if let Some(subject) = self.subjects.get(unit.subject_id.as_str()) {
            let related: Vec<&'a Staff> = available
                .iter()
                .copied()
                .filter(|s| self.knows_related(s, subject))
                .collect();
            if !related.is_empty() {
                return Some(self.ranked(EligibilityTier::Related, related, ledger));
            }
        }

        if !available.is_empty() {
            return Some(self.ranked(EligibilityTier::Department, available, ledger));
        }

        if self.staffing == StaffingPolicy::AllowOverload && !department.is_empty() {
            let mut overload = self.ranked(EligibilityTier::Overload, department, ledger);
            // Experts first, keeping load order within each group.
            overload
                .staff
                .sort_by_key(|s| !s.is_expert_in(&unit.subject_id));
            return Some(overload);
        }

        None
    }

    /// Picks the staffing for one placement.
    ///
    /// # Errors
    /// `NoEligibleStaff` when nobody qualifies and the unit's category
    /// does not allow an unstaffed slot.
    pub fn resolve(
        &self,
        unit: &TeachingUnit,
        day: Day,
        period: u8,
        ledger: &WorkloadLedger,
    ) -> Result<Staffing> {
        match self.eligible(unit, day, ledger) {
            Some(eligibility) => {
                let tier = eligibility.tier;
                match eligibility.staff.first() {
                    Some(staff) => {
                        if tier.is_fallback() {
                            debug!(
                                "{:?} staffing: {} teaches {} on {} period {}",
                                tier, staff.id, unit.subject_id, day, period
                            );
                        }
                        Ok(Staffing::Assigned {
                            staff_id: staff.id.clone(),
                            tier,
                        })
                    }
                    None => self.unstaffed(unit, day, period),
                }
            }
            None => self.unstaffed(unit, day, period),
        }
    }

    fn unstaffed(&self, unit: &TeachingUnit, day: Day, period: u8) -> Result<Staffing> {
        if unit.category.allows_unstaffed() {
            debug!(
                "no staff for {:?} subject {} on {} period {}; placing unstaffed",
                unit.category, unit.subject_id, day, period
            );
            Ok(Staffing::Unstaffed)
        } else {
            Err(TimetableError::NoEligibleStaff {
                subject_id: unit.subject_id.clone(),
                day,
                period,
            })
        }
    }

    fn knows_related(&self, staff: &Staff, subject: &Subject) -> bool {
        staff.expertise.iter().any(|id| {
            self.subjects
                .get(id.as_str())
                .is_some_and(|other| self.relatedness.is_related(subject, other))
        })
    }

    fn ranked(
        &self,
        tier: EligibilityTier,
        mut staff: Vec<&'a Staff>,
        ledger: &WorkloadLedger,
    ) -> Eligibility<'a> {
        staff.sort_by(|a, b| {
            ledger
                .committed(&a.id)
                .cmp(&ledger.committed(&b.id))
                .then_with(|| a.id.cmp(&b.id))
        });
        Eligibility { tier, staff }
    }
}
