//! Read-only catalog collaborator.
//!
//! The engine reads subjects, staff and sections through [`Catalog`]; the
//! hosting application supplies the implementation. [`InMemoryCatalog`]
//! serves tests and embedders that already hold the data, and can be
//! loaded from a JSON document:
//!
//! ```json
//! {
//!   "subjects": [{"id": "S1", "name": "Data Structures", "code": "CS201", "category": "CORE",
//!                 "credits": 4, "hoursPerWeek": 4, "semester": 3, "departmentId": "CSE"}],
//!   "staff":    [{"id": "T1", "name": "R. Rao", "departmentId": "CSE", "maxHours": 18,
//!                 "expertiseSubjects": ["S1"]}],
//!   "sections": [{"id": "A", "name": "CSE-3A", "departmentId": "CSE", "departmentCode": "CSE",
//!                 "semester": 3, "studentCount": 60}]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, TimetableError};
use crate::models::{Section, Staff, Subject};

/// Source of scheduling input data.
pub trait Catalog: Send + Sync {
    /// Subjects offered by a department in a semester.
    fn list_subjects(&self, department_id: &str, semester: u8) -> Result<Vec<Subject>>;

    /// Staff of a department, with expertise populated.
    fn list_staff(&self, department_id: &str) -> Result<Vec<Staff>>;

    /// # Errors
    /// `SectionNotFound` if the section does not exist.
    fn get_section(&self, section_id: &str) -> Result<Section>;
}

/// Catalog backed by in-memory vectors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InMemoryCatalog {
    pub subjects: Vec<Subject>,
    pub staff: Vec<Staff>,
    pub sections: Vec<Section>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a catalog document.
    ///
    /// # Errors
    /// `Catalog` with the parser message on malformed input.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| TimetableError::Catalog(e.to_string()))
    }

    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.subjects.push(subject);
        self
    }

    pub fn with_subjects(mut self, subjects: impl IntoIterator<Item = Subject>) -> Self {
        self.subjects.extend(subjects);
        self
    }

    pub fn with_staff(mut self, staff: Staff) -> Self {
        self.staff.push(staff);
        self
    }

    pub fn with_staff_members(mut self, staff: impl IntoIterator<Item = Staff>) -> Self {
        self.staff.extend(staff);
        self
    }

    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }
}

impl Catalog for InMemoryCatalog {
    fn list_subjects(&self, department_id: &str, semester: u8) -> Result<Vec<Subject>> {
        Ok(self
            .subjects
            .iter()
            .filter(|s| s.department_id == department_id && s.semester == semester)
            .cloned()
            .collect())
    }

    fn list_staff(&self, department_id: &str) -> Result<Vec<Staff>> {
        Ok(self
            .staff
            .iter()
            .filter(|s| s.department_id == department_id)
            .cloned()
            .collect())
    }

    fn get_section(&self, section_id: &str) -> Result<Section> {
        self.sections
            .iter()
            .find(|s| s.id == section_id)
            .cloned()
            .ok_or_else(|| TimetableError::SectionNotFound(section_id.to_string()))
    }
}
