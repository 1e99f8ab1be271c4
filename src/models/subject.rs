//! Subject model.
//!
//! A subject is a course offered by a department in a given semester.
//! Its weekly hour requirement determines how many teaching units it
//! contributes to the candidate pool.

use serde::{Deserialize, Serialize};

/// Subject classification.
///
/// Drives elective filtering, staffing requirements, and placement order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SubjectCategory {
    /// Mandatory course.
    Core,
    /// Optional course, offered only to large enough sections.
    Elective,
    /// Advanced track course.
    Honors,
    /// Project work.
    Project,
}

impl SubjectCategory {
    /// Placement rank: lower ranks are interleaved first.
    pub fn rank(self) -> u8 {
        match self {
            SubjectCategory::Core => 0,
            SubjectCategory::Honors => 1,
            SubjectCategory::Elective => 2,
            SubjectCategory::Project => 3,
        }
    }

    /// Whether a unit of this category may be left without staff.
    pub fn allows_unstaffed(self) -> bool {
        matches!(self, SubjectCategory::Elective | SubjectCategory::Project)
    }
}

/// A subject offered by a department.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    /// Unique subject identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Course code (e.g. "CS201").
    pub code: String,
    /// Subject classification.
    pub category: SubjectCategory,
    /// Credit count.
    pub credits: u32,
    /// Required teaching hours per week (≥ 1).
    pub hours_per_week: u32,
    /// Semester (1..=8).
    pub semester: u8,
    /// Owning department.
    pub department_id: String,
}

impl Subject {
    /// Creates a core subject with one weekly hour.
    pub fn new(id: impl Into<String>, department_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            code: String::new(),
            category: SubjectCategory::Core,
            credits: 0,
            hours_per_week: 1,
            semester: 1,
            department_id: department_id.into(),
        }
    }

    /// Sets the subject name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the course code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Sets the category.
    pub fn with_category(mut self, category: SubjectCategory) -> Self {
        self.category = category;
        self
    }

    /// Sets the credit count.
    pub fn with_credits(mut self, credits: u32) -> Self {
        self.credits = credits;
        self
    }

    /// Sets the weekly hour requirement.
    pub fn with_hours(mut self, hours_per_week: u32) -> Self {
        self.hours_per_week = hours_per_week;
        self
    }

    /// Sets the semester.
    pub fn with_semester(mut self, semester: u8) -> Self {
        self.semester = semester;
        self
    }

    #[inline]
    pub fn is_elective(&self) -> bool {
        self.category == SubjectCategory::Elective
    }

    #[inline]
    pub fn is_project(&self) -> bool {
        self.category == SubjectCategory::Project
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_builder() {
        let s = Subject::new("S1", "CSE")
            .with_name("Data Structures")
            .with_code("CS201")
            .with_category(SubjectCategory::Core)
            .with_credits(4)
            .with_hours(5)
            .with_semester(3);

        assert_eq!(s.id, "S1");
        assert_eq!(s.department_id, "CSE");
        assert_eq!(s.code, "CS201");
        assert_eq!(s.hours_per_week, 5);
        assert_eq!(s.semester, 3);
        assert!(!s.is_elective());
    }

    #[test]
    fn test_category_rank() {
        assert!(SubjectCategory::Core.rank() < SubjectCategory::Elective.rank());
        assert!(SubjectCategory::Honors.rank() < SubjectCategory::Elective.rank());
    }

    #[test]
    fn test_allows_unstaffed() {
        assert!(SubjectCategory::Elective.allows_unstaffed());
        assert!(SubjectCategory::Project.allows_unstaffed());
        assert!(!SubjectCategory::Core.allows_unstaffed());
        assert!(!SubjectCategory::Honors.allows_unstaffed());
    }

    #[test]
    fn test_subject_json_shape() {
        let json = r#"{
            "id": "S9", "name": "Cloud Computing", "code": "CS410",
            "category": "ELECTIVE", "credits": 3, "hoursPerWeek": 3,
            "semester": 7, "departmentId": "CSE"
        }"#;
        let s: Subject = serde_json::from_str(json).unwrap();
        assert!(s.is_elective());
        assert_eq!(s.hours_per_week, 3);
        assert_eq!(s.department_id, "CSE");
    }
}
