//! Input validation for timetable generation.
//!
//! Checks structural integrity of the catalog data for one section before
//! scheduling. Detects:
//! - Duplicate subject and staff IDs
//! - Subjects with zero weekly hours
//! - Semesters outside 1..=8
//! - Sections without students
//! - Expertise entries naming subjects not in the listing
//! - Staff with zero weekly capacity
//!
//! All issues are collected rather than stopping at the first. The last two
//! kinds are advisory: expertise may legitimately name subjects of other
//! semesters, and a zero-capacity member is simply never eligible.

use std::collections::HashSet;

use crate::models::{Section, Staff, Subject};

/// Semesters run 1..=8.
pub const MAX_SEMESTER: u8 = 8;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A subject requires zero hours per week.
    InvalidHours,
    /// A semester outside 1..=8.
    InvalidSemester,
    /// A section has no students.
    EmptySection,
    /// Staff expertise names a subject not in the listing.
    UnknownExpertise,
    /// A staff member has zero weekly capacity.
    ZeroCapacity,
}

impl ValidationErrorKind {
    /// Whether the issue prevents generation.
    pub fn is_blocking(self) -> bool {
        !matches!(
            self,
            ValidationErrorKind::UnknownExpertise | ValidationErrorKind::ZeroCapacity
        )
    }
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn is_blocking(&self) -> bool {
        self.kind.is_blocking()
    }
}

/// Validates the catalog data for one section.
///
/// Checks:
/// 1. No duplicate subject IDs
/// 2. No duplicate staff IDs
/// 3. Every subject requires at least one hour per week
/// 4. Subject and section semesters lie in 1..=8
/// 5. The section has students
/// 6. Expertise entries reference listed subjects (advisory)
/// 7. Staff capacity is non-zero (advisory)
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_catalog(subjects: &[Subject], staff: &[Staff], section: &Section) -> ValidationResult {
    let mut errors = Vec::new();

    let mut subject_ids = HashSet::new();
    for subject in subjects {
        if !subject_ids.insert(subject.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate subject ID: {}", subject.id),
            ));
        }
        if subject.hours_per_week == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidHours,
                format!("Subject '{}' requires zero hours per week", subject.id),
            ));
        }
        if !valid_semester(subject.semester) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidSemester,
                format!("Subject '{}' has semester {}", subject.id, subject.semester),
            ));
        }
    }

    let mut staff_ids = HashSet::new();
    for member in staff {
        if !staff_ids.insert(member.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate staff ID: {}", member.id),
            ));
        }
        if member.max_hours == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::ZeroCapacity,
                format!("Staff '{}' has zero weekly hours", member.id),
            ));
        }
        for subject_id in &member.expertise {
            if !subject_ids.contains(subject_id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownExpertise,
                    format!("Staff '{}' lists unknown subject '{}'", member.id, subject_id),
                ));
            }
        }
    }

    if section.student_count == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptySection,
            format!("Section '{}' has no students", section.id),
        ));
    }
    if !valid_semester(section.semester) {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidSemester,
            format!("Section '{}' has semester {}", section.id, section.semester),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn valid_semester(semester: u8) -> bool {
    (1..=MAX_SEMESTER).contains(&semester)
}
