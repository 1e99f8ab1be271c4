//! Weekly timetable generation for academic sections.
//!
//! Builds conflict-free weekly timetables (5 days x 6 periods) for one
//! section from its subjects and its department's staff, scores each
//! candidate, and returns ranked alternatives with the best one flagged.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Subject`, `Staff`, `Section`, `Slot`,
//!   `Schedule`, `Violation`, the week grid and bell times
//! - **`pool`**: Candidate pool builder (elective filtering, unit expansion)
//! - **`eligibility`**: Staff eligibility tiers, workload ledger, pluggable
//!   subject relatedness
//! - **`scheduler`**: Constructive grid filling and fitness evaluation
//! - **`ga`**: Population search over unit orderings
//! - **`selector`**: Independent alternatives, ranking, most-efficient flag
//! - **`engine`**: Catalog-backed entry point (`generate_schedules`)
//! - **`catalog`**: Read-only data collaborator and an in-memory implementation
//! - **`config`**: Rules, policies and tunable constants
//! - **`validation`**: Input integrity checks
//!
//! # Architecture
//!
//! ```text
//! Catalog ─► validation ─► CandidatePool ─► SolutionSelector ─┬─► ConstructiveScheduler
//!                                                             └─► TimetableGaProblem
//!                                                                   (decodes via the scheduler)
//! ```
//!
//! Every attempt owns its random source, ordering and workload ledger;
//! catalog data is shared read-only, so alternatives run in parallel on
//! rayon and reproduce exactly for a fixed seed.
//!
//! # Logging
//!
//! Uses the `log` facade. The crate never installs a logger.
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Burke & Petrovic (2002), "Recent research directions in automated timetabling"

pub mod catalog;
pub mod config;
pub mod eligibility;
pub mod engine;
pub mod error;
pub mod ga;
pub mod models;
pub mod pool;
pub mod scheduler;
pub mod selector;
pub mod validation;

pub use catalog::{Catalog, InMemoryCatalog};
pub use config::EngineConfig;
pub use engine::{GeneratedSchedules, TimetableEngine};
pub use error::{Result, TimetableError};
