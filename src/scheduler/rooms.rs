//! Room labelling.
//!
//! Rooms are labelled `{department code}-{number}`. Within a day, each
//! subject keeps the room it was first given; each new subject that day
//! takes the next number. Numbers wrap after `rooms_per_department`.
//! Labels are unique per (day, period) for a section, not globally.

use std::collections::HashMap;

use crate::config::RoomPolicy;
use crate::models::Day;

#[derive(Debug, Clone)]
pub struct RoomAllocator {
    prefix: String,
    policy: RoomPolicy,
    day: Option<Day>,
    by_subject: HashMap<String, u32>,
}

impl RoomAllocator {
    pub fn new(prefix: impl Into<String>, policy: RoomPolicy) -> Self {
        Self {
            prefix: prefix.into(),
            policy,
            day: None,
            by_subject: HashMap::new(),
        }
    }

    /// Room label for a subject taught on `day`.
    pub fn assign(&mut self, day: Day, subject_id: &str) -> String {
        if self.day != Some(day) {
            self.day = Some(day);
            self.by_subject.clear();
        }
        let next = self.by_subject.len() as u32;
        let index = *self
            .by_subject
            .entry(subject_id.to_string())
            .or_insert(next);
        let number = self.policy.first_room_number + index % self.policy.rooms_per_department.max(1);
        format!("{}-{}", self.prefix, number)
    }
}
