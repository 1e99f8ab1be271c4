//! Section (student cohort) model.

use serde::{Deserialize, Serialize};

use super::SubjectCategory;

/// A cohort of students of one department and semester.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Unique section identifier.
    pub id: String,
    /// Display name (e.g. "CSE-3A").
    pub name: String,
    /// Owning department.
    pub department_id: String,
    /// Short department code used for room labels (e.g. "CSE").
    #[serde(default)]
    pub department_code: String,
    /// Semester (1..=8).
    pub semester: u8,
    /// Enrolled students.
    pub student_count: u32,
}

impl Section {
    /// Creates a section of 60 students in semester 1.
    pub fn new(id: impl Into<String>, department_id: impl Into<String>) -> Self {
        let department_id = department_id.into();
        Self {
            id: id.into(),
            name: String::new(),
            department_code: department_id.to_uppercase(),
            department_id,
            semester: 1,
            student_count: 60,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_department_code(mut self, code: impl Into<String>) -> Self {
        self.department_code = code.into();
        self
    }

    pub fn with_semester(mut self, semester: u8) -> Self {
        self.semester = semester;
        self
    }

    pub fn with_students(mut self, student_count: u32) -> Self {
        self.student_count = student_count;
        self
    }

    /// Whether electives may be offered (`student_count >= min_students`).
    pub fn admits_electives(&self, min_students: u32) -> bool {
        self.student_count >= min_students
    }

    /// Parallel staff needed per subject.
    ///
    /// CORE subjects need `ceil(student_count / students_per_staff)`;
    /// every other category needs exactly one.
    pub fn required_staff(&self, category: SubjectCategory, students_per_staff: u32) -> u32 {
        match category {
            SubjectCategory::Core => self
                .student_count
                .div_ceil(students_per_staff.max(1))
                .max(1),
            _ => 1,
        }
    }

    /// Room label prefix: the department code, or the department ID when unset.
    pub fn room_prefix(&self) -> &str {
        if self.department_code.is_empty() {
            &self.department_id
        } else {
            &self.department_code
        }
    }
}
