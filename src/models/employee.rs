//! Employee (roster member) model.
//!
//! Employees carry per-day availability, typed time restrictions,
//! date-range exclusions, 0-5 skill scales, and an optional fixed
//! recurring schedule. The roster is read-only to the engine: it is
//! created and edited by external roster management.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::time::{serde_hhmm_opt, Day, Minutes};
use chrono::NaiveDate;

/// Minimum bartending scale at which an employee may supervise
/// lower-rated colleagues.
pub const BARTENDER_MIN_SCALE: u8 = 3;

/// Classification of a shift's place in the day.
///
/// `Any` is a wildcard used by availability entries and override rules;
/// concrete shifts are `Morning`, `Mid`, `Night`, or `Custom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ShiftType {
    /// Matches every shift type.
    #[default]
    Any,
    Morning,
    Mid,
    Night,
    /// An explicitly-timed, non-standard shift.
    Custom,
}

impl ShiftType {
    /// Infers the type of a shift from its start time:
    /// before noon = morning, 15:00 or later = night, otherwise mid.
    pub fn infer(start_min: Minutes) -> Self {
        match start_min / 60 {
            h if h < 12 => ShiftType::Morning,
            h if h >= 15 => ShiftType::Night,
            _ => ShiftType::Mid,
        }
    }

    /// Whether this type (as a rule/availability selector) matches a
    /// concrete shift type. `Any` matches everything.
    pub fn matches(self, concrete: ShiftType) -> bool {
        self == ShiftType::Any || self == concrete
    }
}

/// One availability window an employee has declared for a day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    /// Which shifts this window applies to.
    #[serde(default)]
    pub shift_type: ShiftType,
    /// Earliest start the employee will accept, if bounded.
    #[serde(default, with = "serde_hhmm_opt")]
    pub start_min: Option<Minutes>,
    /// Latest end, if bounded. Required for `Custom` windows.
    #[serde(default, with = "serde_hhmm_opt")]
    pub end_min: Option<Minutes>,
}

/// An employee's declared availability for one weekday.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DayAvailability {
    /// Whether the employee works this day at all.
    pub available: bool,
    /// Declared windows; empty with `available` still means unavailable
    /// for every concrete shift type.
    #[serde(default)]
    pub shifts: Vec<AvailabilityWindow>,
    /// Free-text note from the employee (not interpreted by the engine).
    #[serde(default)]
    pub notes: String,
}

/// Category of a typed time restriction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RestrictionKind {
    /// Cannot start a shift before this time.
    NoWorkBefore {
        #[serde(with = "crate::time::serde_hhmm")]
        time_min: Minutes,
    },
    /// Cannot end a shift after this time.
    NoWorkAfter {
        #[serde(with = "crate::time::serde_hhmm")]
        time_min: Minutes,
    },
    /// Cannot work any shift overlapping this range.
    UnavailableRange {
        #[serde(with = "crate::time::serde_hhmm")]
        start_min: Minutes,
        #[serde(with = "crate::time::serde_hhmm")]
        end_min: Minutes,
    },
}

/// A hard time constraint on when an employee may work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restriction {
    /// What the restriction forbids.
    #[serde(flatten)]
    pub kind: RestrictionKind,
    /// Days the restriction applies to. Empty = every day.
    #[serde(default)]
    pub days: Vec<Day>,
    /// Human-readable reason, echoed in rejection messages.
    #[serde(default)]
    pub reason: String,
}

impl Restriction {
    /// Whether this restriction is in force on `day`.
    pub fn applies_on(&self, day: Day) -> bool {
        self.days.is_empty() || self.days.contains(&day)
    }
}

/// An inclusive calendar date range during which an employee is
/// blacked out entirely (vacation, leave).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a date range.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Whether `date` falls within this range (inclusive on both ends).
    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Soft scheduling preferences. Carried for external tooling; the
/// engine's ordering policy uses override rules and load balance only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Preferences {
    /// Affinity for morning shifts (-1.0..=1.0).
    #[serde(default)]
    pub morning: f32,
    /// Affinity for mid shifts (-1.0..=1.0).
    #[serde(default)]
    pub mid: f32,
    /// Affinity for night shifts (-1.0..=1.0).
    #[serde(default)]
    pub night: f32,
    /// Able to open the business.
    #[serde(default)]
    pub can_open: bool,
    /// Able to work alone for extended periods.
    #[serde(default)]
    pub can_work_alone_extended: bool,
}

/// A fixed recurring assignment that takes top priority during filling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetScheduleEntry {
    pub day: Day,
    #[serde(default)]
    pub shift_type: ShiftType,
    /// Explicit start; falls back to the day's legacy shift times.
    #[serde(default, with = "serde_hhmm_opt")]
    pub start_min: Option<Minutes>,
    /// Explicit end; falls back to the day's legacy shift times.
    #[serde(default, with = "serde_hhmm_opt")]
    pub end_min: Option<Minutes>,
}

/// A person who can be assigned to shifts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    /// Unique employee identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Declared availability per weekday. Missing day = unavailable.
    #[serde(default)]
    pub availability: HashMap<Day, DayAvailability>,
    /// Hard time constraints.
    #[serde(default)]
    pub restrictions: Vec<Restriction>,
    /// Date-range blackouts.
    #[serde(default)]
    pub exclusions: Vec<DateRange>,
    /// Bartending skill, 0-5. At or above [`BARTENDER_MIN_SCALE`] the
    /// employee may cover lower-rated colleagues.
    #[serde(default)]
    pub bartending_scale: u8,
    /// Ability to hold the floor alone, 0-5.
    #[serde(default)]
    pub alone_scale: u8,
    /// Soft preferences.
    #[serde(default)]
    pub preferences: Preferences,
    /// Minimum shifts the employee should receive per week.
    #[serde(default)]
    pub min_shifts_per_week: u32,
    /// Fixed recurring assignments, applied before general filling.
    #[serde(default)]
    pub set_schedule: Vec<SetScheduleEntry>,
}

impl Employee {
    /// Creates an employee with empty availability.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            availability: HashMap::new(),
            restrictions: Vec::new(),
            exclusions: Vec::new(),
            bartending_scale: 0,
            alone_scale: 0,
            preferences: Preferences::default(),
            min_shifts_per_week: 0,
            set_schedule: Vec::new(),
        }
    }

    /// Marks a day available for the given shift types.
    pub fn with_availability(mut self, day: Day, windows: Vec<AvailabilityWindow>) -> Self {
        self.availability.insert(
            day,
            DayAvailability {
                available: true,
                shifts: windows,
                notes: String::new(),
            },
        );
        self
    }

    /// Marks a day available for any shift.
    pub fn available_any(self, day: Day) -> Self {
        self.with_availability(
            day,
            vec![AvailabilityWindow {
                shift_type: ShiftType::Any,
                start_min: None,
                end_min: None,
            }],
        )
    }

    /// Adds a restriction.
    pub fn with_restriction(mut self, restriction: Restriction) -> Self {
        self.restrictions.push(restriction);
        self
    }

    /// Adds a date-range blackout.
    pub fn with_exclusion(mut self, range: DateRange) -> Self {
        self.exclusions.push(range);
        self
    }

    /// Sets the bartending scale (clamped to 0-5).
    pub fn with_bartending_scale(mut self, scale: u8) -> Self {
        self.bartending_scale = scale.min(5);
        self
    }

    /// Sets the alone scale (clamped to 0-5).
    pub fn with_alone_scale(mut self, scale: u8) -> Self {
        self.alone_scale = scale.min(5);
        self
    }

    /// Sets the weekly shift minimum.
    pub fn with_min_shifts(mut self, min: u32) -> Self {
        self.min_shifts_per_week = min;
        self
    }

    /// Adds a fixed recurring assignment.
    pub fn with_set_schedule(mut self, entry: SetScheduleEntry) -> Self {
        self.set_schedule.push(entry);
        self
    }

    /// Whether this employee is qualified to cover low-skill colleagues.
    #[inline]
    pub fn is_bartender(&self) -> bool {
        self.bartending_scale >= BARTENDER_MIN_SCALE
    }

    /// Whether any exclusion blacks out `date`.
    pub fn is_excluded_on(&self, date: NaiveDate) -> bool {
        self.exclusions.iter().any(|r| r.contains(date))
    }
}
