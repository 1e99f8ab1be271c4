//! Staff model.
//!
//! Staff members teach subjects from their expertise set, up to a
//! weekly hour cap. Committed hours live in the scheduler's per-attempt
//! ledger, never on the staff record itself.

use serde::{Deserialize, Serialize};

/// Default weekly teaching cap.
pub const DEFAULT_MAX_HOURS: u32 = 18;

fn default_max_hours() -> u32 {
    DEFAULT_MAX_HOURS
}

/// A teaching staff member.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    /// Unique staff identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Owning department.
    pub department_id: String,
    /// Maximum weekly teaching hours (default: 18).
    #[serde(default = "default_max_hours")]
    pub max_hours: u32,
    /// Subject IDs this staff member is qualified to teach.
    #[serde(default, rename = "expertiseSubjects")]
    pub expertise: Vec<String>,
}

impl Staff {
    /// Creates a staff member with the default weekly cap and no expertise.
    pub fn new(id: impl Into<String>, department_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            department_id: department_id.into(),
            max_hours: DEFAULT_MAX_HOURS,
            expertise: Vec::new(),
        }
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the weekly cap.
    pub fn with_max_hours(mut self, max_hours: u32) -> Self {
        self.max_hours = max_hours;
        self
    }

    /// Adds one subject to the expertise set.
    pub fn with_expertise(mut self, subject_id: impl Into<String>) -> Self {
        let subject_id = subject_id.into();
        if !self.expertise.contains(&subject_id) {
            self.expertise.push(subject_id);
        }
        self
    }

    /// Adds several subjects to the expertise set.
    pub fn with_expertise_in<I, S>(mut self, subject_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for id in subject_ids {
            self = self.with_expertise(id);
        }
        self
    }

    /// Whether this staff member is an expert in the subject.
    #[inline]
    pub fn is_expert_in(&self, subject_id: &str) -> bool {
        self.expertise.iter().any(|s| s == subject_id)
    }
}
