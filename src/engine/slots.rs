//! Shift slot builder.
//!
//! Turns a day's staffing requirement into concrete candidate shifts,
//! applying the day's closure policy before any assignment happens.
//!
//! Three sources, in preference order:
//! 1. Modern slot list — one capacity-1 shift per slot, type inferred
//!    from the start hour (before noon = morning, 15:00+ = night,
//!    otherwise mid). Only inferred night shifts require a bartender.
//! 2. Legacy morning/night counts with day-level times.
//! 3. A hard-coded fallback template (an explicit degradation, not an
//!    error): morning and night covering shifts, no night on Sunday.

use crate::engine::policy::DayPolicy;
use crate::models::{DayStaffing, ShiftType};
use crate::time::{Day, Minutes};

/// Default shift times used by the legacy form (when day-level times
/// are missing) and by the fallback template.
pub const DEFAULT_MORNING_START: Minutes = 540; // 09:00
pub const DEFAULT_MORNING_END: Minutes = 900; // 15:00
pub const DEFAULT_NIGHT_START: Minutes = 900; // 15:00
pub const DEFAULT_NIGHT_END: Minutes = 1380; // 23:00

/// A concrete shift awaiting assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedShift {
    /// Stable identifier, unique within the week.
    pub id: String,
    pub day: Day,
    /// Display label, e.g. `"Morning Shift"` or a slot's own label.
    pub label: String,
    pub start_min: Minutes,
    pub end_min: Minutes,
    /// Seats to fill.
    pub required_staff: u32,
    pub shift_type: ShiftType,
    /// Whether at least one assignee should be bartender-qualified.
    ///
    /// Diagnostic only: the assignment loop logs when the preference is
    /// unmet, while actual coverage enforcement is skill-based and
    /// lives in the gap-fill pass.
    pub requires_bartender: bool,
}

impl PlannedShift {
    /// Creates a capacity-1 shift with an inferred type.
    pub fn from_window(
        id: impl Into<String>,
        day: Day,
        label: impl Into<String>,
        start_min: Minutes,
        end_min: Minutes,
    ) -> Self {
        let shift_type = ShiftType::infer(start_min);
        Self {
            id: id.into(),
            day,
            label: label.into(),
            start_min,
            end_min,
            required_staff: 1,
            shift_type,
            requires_bartender: shift_type == ShiftType::Night,
        }
    }
}

/// Builds the day's candidate shifts, honoring the closure policy.
///
/// Closed days produce no shifts (the engine records the closure
/// warning). Early-closed days truncate or drop windows that cross the
/// cutoff. `staffing = None` or an empty day uses the fallback template.
pub fn build_day_shifts(
    day: Day,
    staffing: Option<&DayStaffing>,
    policy: &DayPolicy,
) -> Vec<PlannedShift> {
    if policy.closed {
        return Vec::new();
    }

    let mut shifts = Vec::new();

    match staffing {
        Some(day_staffing) if !day_staffing.slots.is_empty() => {
            for slot in &day_staffing.slots {
                if let Some((start, end)) = policy.truncate_window(slot.start_min, slot.end_min) {
                    let label = if slot.label.is_empty() {
                        slot.id.clone()
                    } else {
                        slot.label.clone()
                    };
                    shifts.push(PlannedShift::from_window(
                        format!("{day}-{id}", day = day_key(day), id = slot.id),
                        day,
                        label,
                        start,
                        end,
                    ));
                }
            }
        }
        Some(DayStaffing {
            legacy: Some(legacy),
            ..
        }) => {
            if legacy.morning > 0 {
                let start = legacy.morning_start.unwrap_or(DEFAULT_MORNING_START);
                let end = legacy.morning_end.unwrap_or(DEFAULT_MORNING_END);
                if let Some((start, end)) = policy.truncate_window(start, end) {
                    let mut shift = PlannedShift::from_window(
                        format!("{}-morning", day_key(day)),
                        day,
                        "Morning Shift",
                        start,
                        end,
                    );
                    shift.shift_type = ShiftType::Morning;
                    shift.requires_bartender = false;
                    shift.required_staff = legacy.morning;
                    shifts.push(shift);
                }
            }
            if legacy.night > 0 {
                let start = legacy.night_start.unwrap_or(DEFAULT_NIGHT_START);
                let end = legacy.night_end.unwrap_or(DEFAULT_NIGHT_END);
                if let Some((start, end)) = policy.truncate_window(start, end) {
                    let mut shift = PlannedShift::from_window(
                        format!("{}-night", day_key(day)),
                        day,
                        "Night Shift",
                        start,
                        end,
                    );
                    shift.shift_type = ShiftType::Night;
                    shift.requires_bartender = true;
                    shift.required_staff = legacy.night;
                    shifts.push(shift);
                }
            }
        }
        _ => {
            // Fallback template: two covering shifts, no Sunday night.
            if let Some((start, end)) =
                policy.truncate_window(DEFAULT_MORNING_START, DEFAULT_MORNING_END)
            {
                shifts.push(PlannedShift::from_window(
                    format!("{}-morning", day_key(day)),
                    day,
                    "Morning Shift",
                    start,
                    end,
                ));
            }
            if day != Day::Sunday {
                if let Some((start, end)) =
                    policy.truncate_window(DEFAULT_NIGHT_START, DEFAULT_NIGHT_END)
                {
                    shifts.push(PlannedShift::from_window(
                        format!("{}-night", day_key(day)),
                        day,
                        "Night Shift",
                        start,
                        end,
                    ));
                }
            }
        }
    }

    shifts
}

/// Lowercase day key used in shift identifiers.
pub fn day_key(day: Day) -> &'static str {
    match day {
        Day::Monday => "monday",
        Day::Tuesday => "tuesday",
        Day::Wednesday => "wednesday",
        Day::Thursday => "thursday",
        Day::Friday => "friday",
        Day::Saturday => "saturday",
        Day::Sunday => "sunday",
    }
}
