//! Input validation for roster requests.
//!
//! Checks structural integrity of the roster and staffing data before
//! scheduling. Detects:
//! - Duplicate employee IDs
//! - Duplicate slot IDs within a day
//! - Empty or out-of-range slot windows
//! - Skill scales outside 0-5
//! - Inverted exclusion date ranges
//! - Zero-length explicit set-schedule windows
//!
//! Validation is an optional pre-flight for callers: the engine itself
//! degrades gracefully on malformed input (default templates, empty
//! schedules) and never returns an error.

use crate::models::{Employee, WeekStaffing};
use crate::time::{Day, Minutes, MINUTES_PER_DAY};
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A time window has zero length.
    EmptyWindow,
    /// A minute-of-day or skill value is outside its valid range.
    OutOfRange,
    /// A date range ends before it starts.
    InvalidDateRange,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a roster and staffing requirement.
///
/// Checks:
/// 1. No duplicate employee IDs
/// 2. Skill scales within 0-5
/// 3. Exclusion date ranges not inverted
/// 4. Explicit set-schedule windows not zero-length
/// 5. No duplicate slot IDs within a day
/// 6. Slot times within a day and windows not zero-length
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(roster: &[Employee], staffing: &WeekStaffing) -> ValidationResult {
    let mut errors = Vec::new();

    let mut employee_ids = HashSet::new();
    for employee in roster {
        if !employee_ids.insert(employee.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate employee ID: {}", employee.id),
            ));
        }

        for (label, scale) in [
            ("bartending", employee.bartending_scale),
            ("alone", employee.alone_scale),
        ] {
            if scale > 5 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::OutOfRange,
                    format!(
                        "Employee '{}' has {label} scale {scale}, expected 0-5",
                        employee.id
                    ),
                ));
            }
        }

        for exclusion in &employee.exclusions {
            if exclusion.end < exclusion.start {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidDateRange,
                    format!(
                        "Employee '{}' has an exclusion ending {} before it starts {}",
                        employee.id, exclusion.end, exclusion.start
                    ),
                ));
            }
        }

        for entry in &employee.set_schedule {
            if let (Some(start), Some(end)) = (entry.start_min, entry.end_min) {
                if start == end {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::EmptyWindow,
                        format!(
                            "Employee '{}' has a zero-length set schedule on {}",
                            employee.id, entry.day
                        ),
                    ));
                }
            }
        }
    }

    for &day in &Day::WEEK {
        let Some(day_staffing) = staffing.day(day) else {
            continue;
        };
        let mut slot_ids = HashSet::new();
        for slot in &day_staffing.slots {
            if !slot_ids.insert(slot.id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateId,
                    format!("Duplicate slot ID '{}' on {day}", slot.id),
                ));
            }
            if slot.start_min == slot.end_min {
                errors.push(ValidationError::new(
                    ValidationErrorKind::EmptyWindow,
                    format!("Slot '{}' on {day} has zero length", slot.id),
                ));
            }
            for time in [slot.start_min, slot.end_min] {
                if !valid_minute(time) {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::OutOfRange,
                        format!("Slot '{}' on {day} has time {time} outside the day", slot.id),
                    ));
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn valid_minute(time: Minutes) -> bool {
    (0..MINUTES_PER_DAY).contains(&time)
}
