//! Error types for timetable generation.
//!
//! Only structural failures are errors. Soft violations (fallback staffing,
//! unfilled cells, continuity penalties) are recorded on the schedule and
//! priced into its fitness instead.

use thiserror::Error;

use crate::models::Day;
use crate::validation::ValidationError;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TimetableError>;

/// Errors raised by the timetable engine.
#[derive(Debug, Clone, Error)]
pub enum TimetableError {
    /// The candidate pool is empty after elective filtering.
    #[error("no schedulable subjects for section {section_id}")]
    InsufficientSubjects { section_id: String },

    /// A core/honors unit could not be staffed, even via fallback.
    #[error("no eligible staff for subject {subject_id} on {day} period {period}")]
    NoEligibleStaff {
        subject_id: String,
        day: Day,
        period: u8,
    },

    /// Every run of every alternative failed; carries the last underlying error.
    #[error("timetable generation failed after {attempts} attempt(s): {source}")]
    GenerationFailed {
        attempts: usize,
        #[source]
        source: Box<TimetableError>,
    },

    /// The requested section does not exist.
    #[error("section not found: {0}")]
    SectionNotFound(String),

    /// Catalog data failed validation.
    #[error("invalid catalog input ({} issue(s))", .0.len())]
    InvalidInput(Vec<ValidationError>),

    /// A unit ordering is not a permutation of the pool indices.
    #[error("unit ordering of length {len} is not a permutation of a {pool_size}-unit pool")]
    InvalidOrdering { len: usize, pool_size: usize },

    /// The population search produced no individuals.
    #[error("population search produced an empty population")]
    EmptyPopulation,

    /// The caller abandoned the attempt.
    #[error("generation cancelled")]
    Cancelled,

    /// The catalog collaborator failed.
    #[error("catalog error: {0}")]
    Catalog(String),
}

impl TimetableError {
    /// Whether a fresh attempt (new seed) may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TimetableError::NoEligibleStaff { .. })
    }
}
