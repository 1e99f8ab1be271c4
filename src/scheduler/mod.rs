//! Constructive placement and fitness scoring.
//!
//! # Algorithm
//!
//! `ConstructiveScheduler` fills the week grid cell by cell from a unit
//! ordering, staffing each unit with the least-loaded eligible member. It is
//! deterministic for a given ordering; the population search and the
//! selector's seeded perturbation only vary the ordering.
//!
//! # Scoring
//!
//! `FitnessEvaluator` turns a placed schedule into a composite score in
//! [0, 100] with a per-dimension breakdown; `rank_cmp` orders scored
//! schedules for selection.

mod cancel;
mod constructive;
mod fitness;
mod rooms;

pub use cancel::CancelFlag;
pub use constructive::{perturb, ConstructiveScheduler};
pub use fitness::{rank_cmp, FitnessEvaluator};
pub use rooms::RoomAllocator;
