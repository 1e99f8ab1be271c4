//! Engine configuration.
//!
//! Every knob has the production default; hosts usually deserialize an
//! `EngineConfig` from their settings file with `#[serde(default)]`
//! filling in the rest, or start from `EngineConfig::default()` and
//! chain `with_*` calls.
//!
//! # Usage
//!
//! ```
//! use u_timetable::config::{EngineConfig, SearchStrategy, StaffingPolicy};
//!
//! let config = EngineConfig::default()
//!     .with_strategy(SearchStrategy::Population)
//!     .with_staffing(StaffingPolicy::AllowOverload)
//!     .with_seed(7);
//! assert_eq!(config.selector.base_seed, Some(7));
//! ```

use serde::{Deserialize, Serialize};

use crate::models::DEFAULT_MAX_HOURS;

/// Scheduling rules applied during placement and scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulingRules {
    /// Longest run of occupied periods before the rule-compliance penalty applies.
    pub max_continuous_hours: u32,
    /// Hard per-staff daily cap.
    pub max_daily_hours: u32,
    /// Global weekly ceiling; a staff member's effective cap is the
    /// lower of this and their own `max_hours`.
    pub max_weekly_hours: u32,
    /// Prefer CORE units in periods 1-3.
    pub core_in_morning: bool,
    /// Prefer ELECTIVE units in periods 4-6.
    pub electives_in_afternoon: bool,
}

impl Default for SchedulingRules {
    fn default() -> Self {
        Self {
            max_continuous_hours: 3,
            max_daily_hours: 6,
            max_weekly_hours: DEFAULT_MAX_HOURS,
            core_in_morning: false,
            electives_in_afternoon: false,
        }
    }
}

impl SchedulingRules {
    /// Builds rules from free-text statements such as
    /// "max 2 continuous hours" or "core subjects in the morning".
    ///
    /// Unrecognized statements are ignored.
    pub fn parse<S: AsRef<str>>(statements: &[S]) -> Self {
        let mut rules = Self::default();
        for statement in statements {
            let lower = statement.as_ref().to_lowercase();
            let number = first_number(&lower);

            if lower.contains("continuous") && lower.contains("hour") {
                if let Some(n) = number {
                    rules.max_continuous_hours = n;
                }
            }
            if lower.contains("daily") && lower.contains("hour") {
                if let Some(n) = number {
                    rules.max_daily_hours = n;
                }
            }
            if lower.contains("weekly") && lower.contains("hour") {
                if let Some(n) = number {
                    rules.max_weekly_hours = n;
                }
            }
            if lower.contains("morning") && lower.contains("core") {
                rules.core_in_morning = true;
            }
            if lower.contains("afternoon") && lower.contains("elective") {
                rules.electives_in_afternoon = true;
            }
        }
        rules
    }
}

fn first_number(text: &str) -> Option<u32> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let digits: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Candidate pool filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolPolicy {
    /// Minimum section size for electives to be offered.
    pub elective_min_students: u32,
    /// Students per staff member for CORE subjects.
    pub students_per_staff: u32,
}

impl Default for PoolPolicy {
    fn default() -> Self {
        Self {
            elective_min_students: 30,
            students_per_staff: 70,
        }
    }
}

/// What to do when expert and fallback staff are all at their weekly cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffingPolicy {
    /// Raise `NoEligibleStaff` for core/honors units.
    #[default]
    Strict,
    /// Reselect staff past their weekly cap (daily cap still holds),
    /// recording a `CapacityExceeded` violation.
    AllowOverload,
}

/// Which search produces each alternative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    /// Seeded constructive heuristic.
    Constructive,
    /// Genetic search over unit orderings.
    #[default]
    Population,
}

/// Population search parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaConfig {
    pub population_size: usize,
    pub generations: usize,
    /// Fraction of the population carried over unchanged.
    pub elite_ratio: f64,
    pub tournament_size: usize,
    /// Per-individual probability of a swap mutation.
    pub mutation_rate: f64,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 100,
            elite_ratio: 0.2,
            tournament_size: 5,
            mutation_rate: 0.1,
        }
    }
}

impl GaConfig {
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size.max(1);
        self
    }

    pub fn with_generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_tournament_size(mut self, size: usize) -> Self {
        self.tournament_size = size.max(1);
        self
    }

    /// Number of elites retained per generation.
    pub fn elite_count(&self) -> usize {
        ((self.population_size as f64 * self.elite_ratio).ceil() as usize)
            .min(self.population_size)
    }
}

/// Component weights of the composite score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessWeights {
    pub rule_compliance: f64,
    pub teacher_balance: f64,
    pub student_comfort: f64,
    pub room_utilization: f64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            rule_compliance: 0.5,
            teacher_balance: 0.25,
            student_comfort: 0.15,
            room_utilization: 0.10,
        }
    }
}

/// Penalty constants of the fitness components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessPenalties {
    /// Points per period beyond `max_continuous_hours` in a run.
    pub continuity: f64,
    /// Points per over-long run (student comfort).
    pub comfort: f64,
    /// Runs longer than this many periods hurt student comfort.
    pub comfort_run_length: u32,
    /// Multiplier on the staff-hours standard deviation.
    pub balance_std_dev: f64,
    /// Multiplier on slots-per-room.
    pub room_factor: f64,
    /// Points per fallback, overloaded, or unstaffed slot.
    pub soft_staffing: f64,
}

impl Default for FitnessPenalties {
    fn default() -> Self {
        Self {
            continuity: 10.0,
            comfort: 15.0,
            comfort_run_length: 3,
            balance_std_dev: 10.0,
            room_factor: 20.0,
            soft_staffing: 5.0,
        }
    }
}

/// Room labelling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomPolicy {
    pub first_room_number: u32,
    /// Rooms available per department; labels wrap around past this.
    pub rooms_per_department: u32,
}

impl Default for RoomPolicy {
    fn default() -> Self {
        Self {
            first_room_number: 101,
            rooms_per_department: 20,
        }
    }
}

/// Solution selector parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Independent alternatives to produce.
    pub alternatives: usize,
    /// Attempts per alternative on retryable errors.
    pub retry_budget: usize,
    /// Mutation rate increment per alternative index.
    pub mutation_step: f64,
    /// Base seed; `None` draws one from the OS.
    pub base_seed: Option<u64>,
    /// Run alternatives on the rayon pool.
    pub parallel: bool,
    pub strategy: SearchStrategy,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            alternatives: 3,
            retry_budget: 3,
            mutation_step: 0.05,
            base_seed: None,
            parallel: true,
            strategy: SearchStrategy::default(),
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub rules: SchedulingRules,
    pub pool: PoolPolicy,
    pub staffing: StaffingPolicy,
    pub ga: GaConfig,
    pub weights: FitnessWeights,
    pub penalties: FitnessPenalties,
    pub rooms: RoomPolicy,
    pub selector: SelectorConfig,
}

impl EngineConfig {
    pub fn with_rules(mut self, rules: SchedulingRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_staffing(mut self, staffing: StaffingPolicy) -> Self {
        self.staffing = staffing;
        self
    }

    pub fn with_ga(mut self, ga: GaConfig) -> Self {
        self.ga = ga;
        self
    }

    pub fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.selector.strategy = strategy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.selector.base_seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.selector.parallel = parallel;
        self
    }
}
