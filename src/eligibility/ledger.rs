//! Per-attempt staff workload counters.

use std::collections::HashMap;

use crate::models::Day;

/// Committed weekly and daily hours per staff member.
///
/// Each scheduling attempt allocates a fresh ledger and discards it after
/// scoring; ledgers are never shared between attempts.
#[derive(Debug, Clone, Default)]
pub struct WorkloadLedger {
    weekly: HashMap<String, u32>,
    daily: HashMap<(String, Day), u32>,
}

impl WorkloadLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hours committed this week.
    pub fn committed(&self, staff_id: &str) -> u32 {
        self.weekly.get(staff_id).copied().unwrap_or(0)
    }

    /// Hours committed on one day.
    pub fn daily(&self, staff_id: &str, day: Day) -> u32 {
        self.daily
            .get(&(staff_id.to_string(), day))
            .copied()
            .unwrap_or(0)
    }

    /// Records one taught hour.
    pub fn commit(&mut self, staff_id: &str, day: Day) {
        *self.weekly.entry(staff_id.to_string()).or_insert(0) += 1;
        *self.daily.entry((staff_id.to_string(), day)).or_insert(0) += 1;
    }

    /// Total hours committed across all staff.
    pub fn total(&self) -> u32 {
        self.weekly.values().sum()
    }
}
