//! Weekly grid model.
//!
//! A section's week is a fixed grid of teaching days × periods. Every
//! placement occupies exactly one (day, period) cell.
//!
//! # Layout
//!
//! | Period | Time |
//! |--------|------|
//! | 1 | 9:00-10:00 |
//! | 2 | 10:00-11:00 |
//! | 3 | 11:30-12:30 |
//! | 4 | 12:30-1:30 |
//! | 5 | 2:30-3:30 |
//! | 6 | 3:30-4:30 |

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of teaching periods per day.
pub const PERIODS_PER_DAY: u8 = 6;

/// Bell times per period (start, end).
const PERIOD_TIMES: [(&str, &str); PERIODS_PER_DAY as usize] = [
    ("9:00", "10:00"),
    ("10:00", "11:00"),
    ("11:30", "12:30"),
    ("12:30", "1:30"),
    ("2:30", "3:30"),
    ("3:30", "4:30"),
];

/// A teaching day.
///
/// Serialized in upper case (`MONDAY`..`FRIDAY`), the shape expected by
/// the downstream approval workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Day {
    /// All teaching days in week order.
    pub const ALL: [Day; 5] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];

    /// Zero-based position in the week.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Upper-case wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Day::Monday => "MONDAY",
            Day::Tuesday => "TUESDAY",
            Day::Wednesday => "WEDNESDAY",
            Day::Thursday => "THURSDAY",
            Day::Friday => "FRIDAY",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Start and end bell times for a 1-based period.
///
/// Returns `None` outside `1..=PERIODS_PER_DAY`.
pub fn period_times(period: u8) -> Option<(&'static str, &'static str)> {
    if period == 0 {
        return None;
    }
    PERIOD_TIMES.get(period as usize - 1).copied()
}

/// A single addressable grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub day: Day,
    /// 1-based period.
    pub period: u8,
}

/// The weekly grid: 5 days × 6 periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekGrid {
    periods_per_day: u8,
}

impl WeekGrid {
    /// The standard 5 × 6 grid.
    pub fn standard() -> Self {
        Self {
            periods_per_day: PERIODS_PER_DAY,
        }
    }

    /// Periods per day.
    #[inline]
    pub fn periods_per_day(&self) -> u8 {
        self.periods_per_day
    }

    /// Total number of cells (30 for the standard grid).
    #[inline]
    pub fn cell_count(&self) -> usize {
        Day::ALL.len() * self.periods_per_day as usize
    }

    /// Cells in placement order: days in week order, periods ascending.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        Day::ALL.iter().flat_map(move |&day| {
            (1..=self.periods_per_day).map(move |period| Cell { day, period })
        })
    }
}

impl Default for WeekGrid {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_grid() {
        let grid = WeekGrid::standard();
        assert_eq!(grid.cell_count(), 30);
        assert_eq!(grid.cells().count(), 30);
    }

    #[test]
    fn test_cell_order() {
        let cells: Vec<Cell> = WeekGrid::standard().cells().collect();
        assert_eq!(cells[0], Cell { day: Day::Monday, period: 1 });
        assert_eq!(cells[5], Cell { day: Day::Monday, period: 6 });
        assert_eq!(cells[6], Cell { day: Day::Tuesday, period: 1 });
        assert_eq!(cells[29], Cell { day: Day::Friday, period: 6 });
    }

    #[test]
    fn test_day_serialization() {
        let json = serde_json::to_string(&Day::Wednesday).unwrap();
        assert_eq!(json, "\"WEDNESDAY\"");
        let day: Day = serde_json::from_str("\"FRIDAY\"").unwrap();
        assert_eq!(day, Day::Friday);
        assert_eq!(Day::Monday.to_string(), "MONDAY");
    }

    #[test]
    fn test_period_times() {
        assert_eq!(period_times(1), Some(("9:00", "10:00")));
        assert_eq!(period_times(3), Some(("11:30", "12:30")));
        assert_eq!(period_times(6), Some(("3:30", "4:30")));
        assert_eq!(period_times(0), None);
        assert_eq!(period_times(7), None);
    }
}
