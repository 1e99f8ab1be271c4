//! Candidate pool builder.
//!
//! Expands each subject into one teaching unit per required weekly hour.
//! Electives are dropped for sections below the elective threshold.
//!
//! # Canonical order
//!
//! Units are interleaved round-robin across subjects, with subjects ranked
//! by category (CORE, HONORS, ELECTIVE, PROJECT) and then by code, so that
//! consecutive units rarely share a subject and core work comes first.

use log::debug;

use crate::config::PoolPolicy;
use crate::error::{Result, TimetableError};
use crate::models::{Section, Subject, SubjectCategory};

/// One hour of one subject that must be placed exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct TeachingUnit {
    pub subject_id: String,
    pub subject_code: String,
    pub category: SubjectCategory,
    pub department_id: String,
    /// 1-based hour within the subject's weekly requirement.
    pub sequence: u32,
    /// Parallel staff the section needs for this subject.
    pub required_staff: u32,
}

/// The multiset of units for one scheduling attempt.
#[derive(Debug, Clone, Default)]
pub struct CandidatePool {
    /// Units in canonical (interleaved) order.
    pub units: Vec<TeachingUnit>,
    /// Subject IDs excluded by elective filtering.
    pub excluded: Vec<String>,
}

impl CandidatePool {
    /// Builds the pool for a section.
    ///
    /// # Errors
    /// `InsufficientSubjects` if no unit survives filtering.
    pub fn build(subjects: &[Subject], section: &Section, policy: &PoolPolicy) -> Result<Self> {
        let admits_electives = section.admits_electives(policy.elective_min_students);

        let mut kept: Vec<&Subject> = Vec::with_capacity(subjects.len());
        let mut excluded = Vec::new();
        for subject in subjects {
            if subject.is_elective() && !admits_electives {
                excluded.push(subject.id.clone());
            } else if subject.hours_per_week > 0 {
                kept.push(subject);
            }
        }

        kept.sort_by(|a, b| {
            a.category
                .rank()
                .cmp(&b.category.rank())
                .then_with(|| a.code.cmp(&b.code))
                .then_with(|| a.id.cmp(&b.id))
        });

        let units = interleave(&kept, section, policy);
        if units.is_empty() {
            return Err(TimetableError::InsufficientSubjects {
                section_id: section.id.clone(),
            });
        }

        debug!(
            "pool for section {}: {} units from {} subjects ({} electives excluded)",
            section.id,
            units.len(),
            kept.len(),
            excluded.len()
        );

        Ok(Self { units, excluded })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Identity ordering over the canonical unit list.
    pub fn canonical_order(&self) -> Vec<usize> {
        (0..self.units.len()).collect()
    }

    /// Total pool hours for one category.
    pub fn hours_in(&self, category: SubjectCategory) -> usize {
        self.units.iter().filter(|u| u.category == category).count()
    }
}

fn interleave(subjects: &[&Subject], section: &Section, policy: &PoolPolicy) -> Vec<TeachingUnit> {
    let total: usize = subjects.iter().map(|s| s.hours_per_week as usize).sum();
    let mut units = Vec::with_capacity(total);
    let rounds = subjects.iter().map(|s| s.hours_per_week).max().unwrap_or(0);

    for round in 1..=rounds {
        for subject in subjects.iter().filter(|s| s.hours_per_week >= round) {
            units.push(TeachingUnit {
                subject_id: subject.id.clone(),
                subject_code: subject.code.clone(),
                category: subject.category,
                department_id: subject.department_id.clone(),
                sequence: round,
                required_staff: section.required_staff(subject.category, policy.students_per_staff),
            });
        }
    }
    units
}
