//! Weekly schedule (solution) model.
//!
//! A weekly schedule is a complete assignment of employees to concrete
//! shifts, together with diagnostics. Hard failures are conflicts
//! (an unsupervised low-skill shift, a dishonored rule); soft issues
//! are warnings (overtime, under-minimum weeks, ad hoc coverage).
//! All diagnostics are data — the engine never raises for them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::time::{duration_hours, serde_hhmm_opt, Minutes, TimeRange};

/// One employee working one shift on one date.
///
/// Uniqueness invariant: no two assignments in a schedule share
/// `(employee_id, date, shift_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleAssignment {
    /// The planned shift being filled.
    pub shift_id: String,
    pub employee_id: String,
    pub date: NaiveDate,
    #[serde(default, with = "serde_hhmm_opt")]
    pub start_min: Option<Minutes>,
    #[serde(default, with = "serde_hhmm_opt")]
    pub end_min: Option<Minutes>,
}

impl ScheduleAssignment {
    /// Creates an assignment without explicit times.
    pub fn new(
        shift_id: impl Into<String>,
        employee_id: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            shift_id: shift_id.into(),
            employee_id: employee_id.into(),
            date,
            start_min: None,
            end_min: None,
        }
    }

    /// Sets the worked window.
    pub fn with_times(mut self, start_min: Minutes, end_min: Minutes) -> Self {
        self.start_min = Some(start_min);
        self.end_min = Some(end_min);
        self
    }

    /// The worked window, when both times are known.
    pub fn time_range(&self) -> Option<TimeRange> {
        match (self.start_min, self.end_min) {
            (Some(s), Some(e)) => Some(TimeRange::new(s, e)),
            _ => None,
        }
    }

    /// Worked hours; zero when times are unknown.
    pub fn hours(&self) -> f64 {
        match (self.start_min, self.end_min) {
            (Some(s), Some(e)) => duration_hours(s, e),
            _ => 0.0,
        }
    }

    /// Whether this assignment overlaps another in time on the same date.
    pub fn overlaps(&self, other: &Self) -> bool {
        if self.date != other.date {
            return false;
        }
        match (self.time_range(), other.time_range()) {
            (Some(a), Some(b)) => a.overlaps(&b),
            _ => false,
        }
    }
}

/// Hard-constraint failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// A low-skill employee works an interval with no qualified cover.
    NoBartender,
    /// An override rule was not honored by the final assignment list.
    RuleViolation,
}

/// An unmet hard constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConflict {
    pub kind: ConflictKind,
    pub date: NaiveDate,
    /// Human-readable description.
    pub message: String,
}

impl ScheduleConflict {
    /// Creates a missing-bartender-coverage conflict.
    pub fn no_bartender(date: NaiveDate, message: impl Into<String>) -> Self {
        Self {
            kind: ConflictKind::NoBartender,
            date,
            message: message.into(),
        }
    }

    /// Creates a dishonored-override conflict.
    pub fn rule_violation(date: NaiveDate, message: impl Into<String>) -> Self {
        Self {
            kind: ConflictKind::RuleViolation,
            date,
            message: message.into(),
        }
    }
}

/// Soft-issue categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Weekly hours above the overtime threshold.
    Overtime,
    /// Fewer shifts than the employee's weekly minimum.
    UnderHours,
    /// Coverage was inserted ad hoc, or a day needs attention
    /// (closures, early closes, synthesized shifts).
    CoverageNeeded,
}

/// A soft scheduling issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleWarning {
    pub kind: WarningKind,
    /// The date concerned; `None` for week-level warnings.
    pub date: Option<NaiveDate>,
    /// Human-readable description.
    pub message: String,
}

impl ScheduleWarning {
    /// Creates an overtime warning (week-level).
    pub fn overtime(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::Overtime,
            date: None,
            message: message.into(),
        }
    }

    /// Creates an under-minimum-shifts warning (week-level).
    pub fn under_hours(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::UnderHours,
            date: None,
            message: message.into(),
        }
    }

    /// Creates a coverage warning for a date.
    pub fn coverage_needed(date: NaiveDate, message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::CoverageNeeded,
            date: Some(date),
            message: message.into(),
        }
    }
}

/// The sole output of the engine: one computed week.
///
/// Immutable once returned; regeneration produces a fresh value rather
/// than mutating a previous one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySchedule {
    /// Monday of the scheduled week.
    pub week_start: NaiveDate,
    pub assignments: Vec<ScheduleAssignment>,
    pub conflicts: Vec<ScheduleConflict>,
    pub warnings: Vec<ScheduleWarning>,
}

impl WeeklySchedule {
    /// Creates an empty schedule for a week.
    pub fn new(week_start: NaiveDate) -> Self {
        Self {
            week_start,
            ..Self::default()
        }
    }

    /// Whether no hard constraints were violated.
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Assignments on a given date, in insertion order.
    pub fn assignments_for_date(&self, date: NaiveDate) -> Vec<&ScheduleAssignment> {
        self.assignments.iter().filter(|a| a.date == date).collect()
    }

    /// Assignments for a given employee, in insertion order.
    pub fn assignments_for_employee(&self, employee_id: &str) -> Vec<&ScheduleAssignment> {
        self.assignments
            .iter()
            .filter(|a| a.employee_id == employee_id)
            .collect()
    }

    /// Total scheduled hours for an employee across the week.
    pub fn hours_for_employee(&self, employee_id: &str) -> f64 {
        self.assignments_for_employee(employee_id)
            .iter()
            .map(|a| a.hours())
            .sum()
    }

    /// Number of assignments.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }
}
