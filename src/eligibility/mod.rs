//! Staff eligibility for teaching units.
//!
//! Decides, for a (unit, day) pair and the attempt's current workload,
//! which staff may legally teach the unit and in what order they should
//! be tried.
//!
//! # Constraints
//!
//! 1. Same department as the unit's subject.
//! 2. Subject in the staff member's expertise set.
//! 3. Committed weekly hours below the staff member's cap.
//! 4. Committed hours that day below the daily cap.
//!
//! When no expert passes (2)-(4), related-expertise and then plain
//! department staff are used; those placements are soft violations.
//!
//! # Submodules
//!
//! - [`relatedness`]: pluggable subject relatedness policies

mod ledger;
pub mod relatedness;
mod resolver;

pub use ledger::WorkloadLedger;
pub use relatedness::{KeywordGroups, NoRelatedness, SubjectRelatednessPolicy};
pub use resolver::{Eligibility, EligibilityResolver, EligibilityTier, Staffing};
