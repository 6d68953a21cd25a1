//! Availability and restriction evaluation.
//!
//! Decides whether an employee is eligible for a candidate shift.
//! Availability fails closed: a date-range blackout, a missing day
//! record, or `available = false` all reject. Restrictions are checked
//! separately so forced overrides can bypass them while the rejection
//! reason stays reportable.

use chrono::NaiveDate;

use crate::models::{Employee, RestrictionKind, ShiftType};
use crate::time::{hhmm, in_range, Day, Minutes, TimeRange};

/// Whether `employee` has declared themselves available for a shift of
/// `shift_type` on `day`, optionally starting at `start_min`.
///
/// Order of checks:
/// 1. Any exclusion range containing `date` rejects.
/// 2. A missing or `available = false` day record rejects.
/// 3. Otherwise any declared window accepts if its type matches
///    (`Any` on either side is a wildcard) and its minimum start time,
///    when present, is not after the candidate start. A `Custom`
///    window instead accepts when its own range contains the start.
pub fn is_available(
    employee: &Employee,
    day: Day,
    date: NaiveDate,
    shift_type: ShiftType,
    start_min: Option<Minutes>,
) -> bool {
    if employee.is_excluded_on(date) {
        return false;
    }
    let Some(day_avail) = employee.availability.get(&day) else {
        return false;
    };
    if !day_avail.available {
        return false;
    }

    day_avail.shifts.iter().any(|window| {
        if window.shift_type == ShiftType::Custom {
            return match (window.start_min, window.end_min, start_min) {
                (Some(ws), Some(we), Some(s)) => in_range(s, ws, we),
                _ => false,
            };
        }
        let type_ok = window.shift_type.matches(shift_type) || shift_type == ShiftType::Any;
        if !type_ok {
            return false;
        }
        match (window.start_min, start_min) {
            (Some(earliest), Some(s)) => s >= earliest,
            _ => true,
        }
    })
}

/// Checks `employee`'s restrictions against a candidate shift window.
///
/// Returns `Err` with a formatted reason for the first violated
/// restriction, in declaration order; `Ok(())` if none apply.
pub fn check_restrictions(
    employee: &Employee,
    day: Day,
    shift_start: Minutes,
    shift_end: Minutes,
) -> Result<(), String> {
    for restriction in &employee.restrictions {
        if !restriction.applies_on(day) {
            continue;
        }
        let violation = match restriction.kind {
            RestrictionKind::NoWorkBefore { time_min } if shift_start < time_min => {
                Some(format!("cannot start before {}", hhmm(time_min)))
            }
            RestrictionKind::NoWorkAfter { time_min } if shift_end > time_min => {
                Some(format!("cannot work past {}", hhmm(time_min)))
            }
            RestrictionKind::UnavailableRange { start_min, end_min }
                if TimeRange::new(shift_start, shift_end)
                    .overlaps(&TimeRange::new(start_min, end_min)) =>
            {
                Some(format!(
                    "unavailable {}-{}",
                    hhmm(start_min),
                    hhmm(end_min)
                ))
            }
            _ => None,
        };
        if let Some(mut reason) = violation {
            if !restriction.reason.is_empty() {
                reason.push_str(&format!(" ({})", restriction.reason));
            }
            return Err(reason);
        }
    }
    Ok(())
}
