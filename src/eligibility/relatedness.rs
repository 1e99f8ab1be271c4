//! Subject relatedness policies.
//!
//! A relatedness policy decides whether expertise in one subject makes a
//! staff member a reasonable substitute for another. The resolver uses it
//! for the tier between true experts and plain department fallback.

use std::fmt::Debug;

use crate::models::Subject;

/// Decides whether two subjects are close enough to share teachers.
pub trait SubjectRelatednessPolicy: Send + Sync + Debug {
    /// Policy name (e.g. "keyword-groups").
    fn name(&self) -> &'static str;

    /// Whether expertise in `other` qualifies a staff member for `subject`.
    fn is_related(&self, subject: &Subject, other: &Subject) -> bool;
}

/// Disables the related-expertise tier.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRelatedness;

impl SubjectRelatednessPolicy for NoRelatedness {
    fn name(&self) -> &'static str {
        "none"
    }

    fn is_related(&self, _subject: &Subject, _other: &Subject) -> bool {
        false
    }
}

/// A named set of lower-case keywords matched against subject names.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordGroup {
    pub name: String,
    pub keywords: Vec<String>,
}

impl KeywordGroup {
    fn matches(&self, subject_name: &str) -> bool {
        let lower = subject_name.to_lowercase();
        self.keywords.iter().any(|k| lower.contains(k.as_str()))
    }
}

/// Subjects are related when both names hit the same keyword group.
///
/// The default groups cover mathematics, physics, programming, databases,
/// networks, AI, web, and security.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordGroups {
    groups: Vec<KeywordGroup>,
}

impl KeywordGroups {
    /// Creates a policy with no groups.
    pub fn new() -> Self {
        Self { groups: Vec::new() }
    }

    /// Adds a keyword group.
    pub fn with_group<I, S>(mut self, name: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.groups.push(KeywordGroup {
            name: name.into(),
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
        });
        self
    }

    /// Names of the groups a subject name falls into.
    pub fn groups_of(&self, subject_name: &str) -> Vec<&str> {
        self.groups
            .iter()
            .filter(|g| g.matches(subject_name))
            .map(|g| g.name.as_str())
            .collect()
    }
}

impl Default for KeywordGroups {
    fn default() -> Self {
        Self::new()
            .with_group("mathematics", ["math"])
            .with_group("physics", ["physics"])
            .with_group("programming", ["programming", "data structures", "algorithm"])
            .with_group("database", ["database", "data mining"])
            .with_group("networks", ["network", "cloud"])
            .with_group(
                "ai",
                ["machine learning", "artificial intelligence", "deep learning"],
            )
            .with_group("web", ["web", "mobile"])
            .with_group("security", ["security", "cyber"])
    }
}

impl SubjectRelatednessPolicy for KeywordGroups {
    fn name(&self) -> &'static str {
        "keyword-groups"
    }

    fn is_related(&self, subject: &Subject, other: &Subject) -> bool {
        if subject.id == other.id {
            return false;
        }
        self.groups
            .iter()
            .any(|g| g.matches(&subject.name) && g.matches(&other.name))
    }
}
