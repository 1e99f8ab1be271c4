//! Engine facade.
//!
//! Wires the catalog, validation, candidate pool and solution selector into
//! the single entry point the hosting application calls.
//!
//! # Pipeline
//!
//! 1. `get_section` → section size, department and code.
//! 2. `list_subjects(department, semester)` and `list_staff(department)`.
//! 3. Validation: blocking issues abort with `InvalidInput`, advisory ones
//!    are logged.
//! 4. Candidate pool (elective filtering, unit expansion).
//! 5. Solution selector (alternatives, ranking, most-efficient flag).

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::config::EngineConfig;
use crate::eligibility::{KeywordGroups, SubjectRelatednessPolicy};
use crate::error::{Result, TimetableError};
use crate::models::Schedule;
use crate::pool::CandidatePool;
use crate::scheduler::CancelFlag;
use crate::selector::SolutionSelector;
use crate::validation::validate_catalog;

/// Ranked alternatives for one section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedSchedules {
    pub section_id: String,
    pub academic_year: String,
    pub semester: u8,
    /// Best first.
    pub schedules: Vec<Schedule>,
    pub most_efficient_index: usize,
}

impl GeneratedSchedules {
    /// The alternative flagged as most efficient.
    pub fn most_efficient(&self) -> Option<&Schedule> {
        self.schedules.get(self.most_efficient_index)
    }
}

/// Timetable generation engine over a catalog.
///
/// # Example
///
/// ```
/// use u_timetable::catalog::InMemoryCatalog;
/// use u_timetable::config::{EngineConfig, SearchStrategy};
/// use u_timetable::engine::TimetableEngine;
/// use u_timetable::models::{Section, Staff, Subject};
///
/// let catalog = InMemoryCatalog::new()
///     .with_subject(Subject::new("S1", "CSE").with_code("CS101").with_hours(4))
///     .with_subject(Subject::new("S2", "CSE").with_code("CS102").with_hours(4))
///     .with_staff(Staff::new("T1", "CSE").with_expertise_in(["S1", "S2"]))
///     .with_section(Section::new("A", "CSE"));
///
/// let engine = TimetableEngine::new(catalog).with_config(
///     EngineConfig::default()
///         .with_strategy(SearchStrategy::Constructive)
///         .with_seed(42),
/// );
/// let result = engine.generate_schedules("A", "2024-2025", 1).unwrap();
/// assert_eq!(result.schedules.len(), 3);
/// assert_eq!(result.most_efficient().unwrap().slot_count(), 8);
/// ```
#[derive(Debug)]
pub struct TimetableEngine<C: Catalog> {
    catalog: C,
    config: EngineConfig,
    relatedness: Box<dyn SubjectRelatednessPolicy>,
    cancel: Option<CancelFlag>,
}

impl<C: Catalog> TimetableEngine<C> {
    /// Creates an engine with default configuration and keyword relatedness.
    pub fn new(catalog: C) -> Self {
        Self {
            catalog,
            config: EngineConfig::default(),
            relatedness: Box::new(KeywordGroups::default()),
            cancel: None,
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the relatedness policy (`NoRelatedness` disables the tier).
    pub fn with_relatedness(mut self, policy: impl SubjectRelatednessPolicy + 'static) -> Self {
        self.relatedness = Box::new(policy);
        self
    }

    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Generates ranked alternatives for a section.
    ///
    /// # Errors
    /// - `SectionNotFound` / `Catalog` from the collaborator.
    /// - `InvalidInput` with the blocking validation issues.
    /// - `InsufficientSubjects` if the pool is empty after filtering.
    /// - `GenerationFailed` if every alternative failed.
    /// - `Cancelled` if the cancel flag was raised.
    pub fn generate_schedules(
        &self,
        section_id: &str,
        academic_year: &str,
        semester: u8,
    ) -> Result<GeneratedSchedules> {
        let section = self.catalog.get_section(section_id)?;
        if section.semester != semester {
            warn!(
                "section {} is in semester {}, generating for semester {}",
                section.id, section.semester, semester
            );
        }

        let subjects = self.catalog.list_subjects(&section.department_id, semester)?;
        let staff = self.catalog.list_staff(&section.department_id)?;

        if let Err(issues) = validate_catalog(&subjects, &staff, &section) {
            let (blocking, advisory): (Vec<_>, Vec<_>) =
                issues.into_iter().partition(|e| e.is_blocking());
            for issue in &advisory {
                warn!("section {}: {}", section.id, issue.message);
            }
            if !blocking.is_empty() {
                return Err(TimetableError::InvalidInput(blocking));
            }
        }

        let pool = CandidatePool::build(&subjects, &section, &self.config.pool)?;
        info!(
            "section {} ({} students): {} units from {} subjects, {} staff, {} excluded",
            section.id,
            section.student_count,
            pool.len(),
            subjects.len(),
            staff.len(),
            pool.excluded.len()
        );

        let mut selector = SolutionSelector::new(&pool, &section, &staff, &subjects, &self.config)
            .with_relatedness(self.relatedness.as_ref());
        if let Some(cancel) = &self.cancel {
            selector = selector.with_cancel(cancel.clone());
        }
        let schedules = selector.select()?;

        Ok(GeneratedSchedules {
            section_id: section.id.clone(),
            academic_year: academic_year.to_string(),
            semester,
            schedules,
            most_efficient_index: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use crate::config::{GaConfig, SearchStrategy, StaffingPolicy};
    use crate::eligibility::NoRelatedness;
    use crate::models::{Section, Staff, Subject, SubjectCategory, ViolationType};
    use crate::validation::ValidationErrorKind;

    fn quick_ga() -> GaConfig {
        GaConfig::default().with_population_size(10).with_generations(6)
    }

    /// 6 subjects x 4 hours, 5 staff expert in all of them.
    fn scenario_a() -> InMemoryCatalog {
        let subjects: Vec<Subject> = (1..=6)
            .map(|i| {
                Subject::new(format!("S{i}"), "CSE")
                    .with_code(format!("CS30{i}"))
                    .with_hours(4)
                    .with_semester(3)
            })
            .collect();
        let staff: Vec<Staff> = (1..=5)
            .map(|i| {
                Staff::new(format!("T{i}"), "CSE")
                    .with_max_hours(18)
                    .with_expertise_in(subjects.iter().map(|s| s.id.clone()))
            })
            .collect();
        InMemoryCatalog::new()
            .with_subjects(subjects)
            .with_staff_members(staff)
            .with_section(Section::new("A", "CSE").with_semester(3))
    }

    /// One 30-hour core subject, one staff member capped at 18.
    fn scenario_c() -> InMemoryCatalog {
        InMemoryCatalog::new()
            .with_subject(
                Subject::new("S1", "CSE")
                    .with_code("CS101")
                    .with_hours(30)
                    .with_semester(1),
            )
            .with_staff(Staff::new("T1", "CSE").with_max_hours(18).with_expertise("S1"))
            .with_section(Section::new("A", "CSE"))
    }

    #[test]
    fn test_scenario_a_population() {
        let engine = TimetableEngine::new(scenario_a())
            .with_config(EngineConfig::default().with_seed(42));
        let result = engine.generate_schedules("A", "2024-2025", 3).unwrap();

        assert_eq!(result.schedules.len(), 3);
        for schedule in &result.schedules {
            assert_eq!(schedule.slot_count(), 24);
            assert_eq!(schedule.breakdown.unfilled_cells, 6);
            assert!(schedule.staff_hours().values().all(|&h| h <= 18));
            assert!(schedule.breakdown.teacher_balance > 80.0);
            assert!(!schedule.has_room_clash());
            assert!(!schedule.has_staff_clash());
        }
    }

    #[test]
    fn test_most_efficient_has_max_fitness() {
        let engine = TimetableEngine::new(scenario_a()).with_config(
            EngineConfig::default()
                .with_strategy(SearchStrategy::Constructive)
                .with_seed(9),
        );
        let result = engine.generate_schedules("A", "2024-2025", 3).unwrap();

        let best = result.most_efficient().unwrap();
        assert!(best.most_efficient);
        assert_eq!(best.label, "Timetable A");
        let max = result
            .schedules
            .iter()
            .map(|s| s.fitness)
            .fold(f64::NEG_INFINITY, f64::max);
        assert!((best.fitness - max).abs() < 1e-10);
        assert_eq!(result.schedules.iter().filter(|s| s.most_efficient).count(), 1);
    }

    #[test]
    fn test_scenario_b_small_section_drops_electives() {
        let mut catalog = InMemoryCatalog::new()
            .with_section(Section::new("B", "CSE").with_students(20))
            .with_staff(
                Staff::new("T1", "CSE")
                    .with_expertise_in(["C1", "C2", "C3", "C4", "E1", "E2"]),
            )
            .with_staff(Staff::new("T2", "CSE").with_expertise_in(["C1", "C2", "C3", "C4"]));
        for i in 1..=4 {
            catalog = catalog.with_subject(
                Subject::new(format!("C{i}"), "CSE")
                    .with_code(format!("CS10{i}"))
                    .with_hours(4),
            );
        }
        for i in 1..=2 {
            catalog = catalog.with_subject(
                Subject::new(format!("E{i}"), "CSE")
                    .with_code(format!("CS40{i}"))
                    .with_hours(3)
                    .with_category(SubjectCategory::Elective),
            );
        }

        let engine = TimetableEngine::new(catalog).with_config(
            EngineConfig::default()
                .with_strategy(SearchStrategy::Constructive)
                .with_seed(42),
        );
        let result = engine.generate_schedules("B", "2024-2025", 1).unwrap();
        for schedule in &result.schedules {
            assert_eq!(schedule.slot_count(), 16);
            assert!(schedule.slots.iter().all(|s| !s.is_elective));
            assert_eq!(schedule.violation_count(ViolationType::UnfilledCells), 14);
        }
    }

    #[test]
    fn test_scenario_c_strict() {
        let engine = TimetableEngine::new(scenario_c()).with_config(
            EngineConfig::default()
                .with_ga(quick_ga())
                .with_seed(42),
        );
        let err = engine.generate_schedules("A", "2024-2025", 1).unwrap_err();
        match err {
            TimetableError::GenerationFailed { attempts, source } => {
                assert_eq!(attempts, 9);
                assert!(source.is_retryable());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_scenario_c_allow_overload() {
        let engine = TimetableEngine::new(scenario_c()).with_config(
            EngineConfig::default()
                .with_ga(quick_ga())
                .with_staffing(StaffingPolicy::AllowOverload)
                .with_seed(42),
        );
        let result = engine.generate_schedules("A", "2024-2025", 1).unwrap();
        for schedule in &result.schedules {
            assert_eq!(schedule.slot_count(), 30);
            assert_eq!(schedule.breakdown.over_capacity, 12);
            assert_eq!(schedule.staff_hours()["T1"], 30);
            assert!(schedule.staff_daily_hours().values().all(|&h| h <= 6));
        }
    }

    #[test]
    fn test_same_seed_is_reproducible() {
        let config = EngineConfig::default().with_ga(quick_ga()).with_seed(1234);
        let a = TimetableEngine::new(scenario_a())
            .with_config(config.clone())
            .generate_schedules("A", "2024-2025", 3)
            .unwrap();
        let b = TimetableEngine::new(scenario_a())
            .with_config(config)
            .generate_schedules("A", "2024-2025", 3)
            .unwrap();
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_full_pool_fills_grid() {
        let mut catalog = scenario_a();
        catalog.subjects.push(
            Subject::new("S7", "CSE")
                .with_code("CS307")
                .with_hours(8)
                .with_semester(3),
        );
        for member in catalog.staff.iter_mut() {
            member.expertise.push("S7".into());
        }
        let engine = TimetableEngine::new(catalog)
            .with_relatedness(NoRelatedness)
            .with_config(EngineConfig::default().with_ga(quick_ga()).with_seed(42));
        let result = engine.generate_schedules("A", "2024-2025", 3).unwrap();
        for schedule in &result.schedules {
            assert_eq!(schedule.slot_count(), 30);
            assert_eq!(schedule.breakdown.unfilled_cells, 0);
            assert_eq!(schedule.violation_count(ViolationType::UnplacedUnits), 2);
        }
    }

    #[test]
    fn test_missing_section() {
        let engine = TimetableEngine::new(InMemoryCatalog::new());
        let err = engine.generate_schedules("nope", "2024-2025", 1).unwrap_err();
        assert!(matches!(err, TimetableError::SectionNotFound(_)));
    }

    #[test]
    fn test_only_electives_for_small_section() {
        let catalog = InMemoryCatalog::new()
            .with_subject(
                Subject::new("E1", "CSE")
                    .with_hours(3)
                    .with_category(SubjectCategory::Elective),
            )
            .with_section(Section::new("A", "CSE").with_students(12));
        let err = TimetableEngine::new(catalog)
            .generate_schedules("A", "2024-2025", 1)
            .unwrap_err();
        assert!(matches!(err, TimetableError::InsufficientSubjects { .. }));
    }

    #[test]
    fn test_blocking_validation() {
        let catalog = InMemoryCatalog::new()
            .with_subject(Subject::new("S1", "CSE").with_hours(0))
            .with_staff(Staff::new("T1", "CSE").with_expertise("OTHER"))
            .with_section(Section::new("A", "CSE"));
        let err = TimetableEngine::new(catalog)
            .generate_schedules("A", "2024-2025", 1)
            .unwrap_err();
        match err {
            TimetableError::InvalidInput(issues) => {
                assert_eq!(issues.len(), 1);
                assert_eq!(issues[0].kind, ValidationErrorKind::InvalidHours);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_cancelled_engine() {
        let cancel = CancelFlag::new();
        cancel.cancel();
        let err = TimetableEngine::new(scenario_a())
            .with_config(EngineConfig::default().with_ga(quick_ga()).with_seed(42))
            .with_cancel(cancel)
            .generate_schedules("A", "2024-2025", 3)
            .unwrap_err();
        assert!(matches!(err, TimetableError::Cancelled));
    }

    #[test]
    fn test_output_contract_shape() {
        let engine = TimetableEngine::new(scenario_a()).with_config(
            EngineConfig::default()
                .with_strategy(SearchStrategy::Constructive)
                .with_seed(42),
        );
        let result = engine.generate_schedules("A", "2024-2025", 3).unwrap();
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["mostEfficientIndex"], 0);
        assert_eq!(json["schedules"].as_array().unwrap().len(), 3);
        let slot = &json["schedules"][0]["slots"][0];
        assert_eq!(slot["day"], "MONDAY");
        assert_eq!(slot["period"], 1);
        assert!(slot["subjectId"].is_string());
        assert!(slot["staffId"].is_string());
        assert!(slot["room"].as_str().unwrap().starts_with("CSE-"));
        let breakdown = &json["schedules"][0]["breakdown"];
        for key in ["ruleCompliance", "teacherBalance", "studentComfort", "roomUtilization"] {
            assert!(breakdown[key].is_number(), "missing {key}");
        }
    }
}
