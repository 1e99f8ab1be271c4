//! Timetabling domain models.
//!
//! Provides the data types supplied by the catalog collaborators and the
//! solution types handed to the approval workflow.
//!
//! # Domain Mappings
//!
//! | u-timetable | Scheduling term |
//! |-------------|-----------------|
//! | Subject | Job family |
//! | Teaching unit | Operation (one hour) |
//! | Staff | Resource with skills and capacity |
//! | Slot | Assignment to a (day, period) cell |
//! | Schedule | Candidate solution |

mod grid;
mod schedule;
mod section;
mod staff;
mod subject;

pub use grid::{period_times, Cell, Day, WeekGrid, PERIODS_PER_DAY};
pub use schedule::{FitnessBreakdown, Schedule, Slot, Violation, ViolationType};
pub use section::Section;
pub use staff::{Staff, DEFAULT_MAX_HOURS};
pub use subject::{Subject, SubjectCategory};
