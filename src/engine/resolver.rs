//! Override resolution.
//!
//! Decides, for each shift, which employees are forced, excluded, or
//! preferred, and synthesizes coverage shifts for partial-day
//! (`CustomTime`) exceptions.
//!
//! Custom-time synthesis runs before a day's assignment loop because it
//! grows the shift list: when an employee leaves early or arrives late,
//! the shift containing the exception boundary is split into the
//! portion they work plus a new capacity-1 shift covering the rest.
//! New shifts are collected into a follow-up queue and appended after
//! all of the day's custom-time rules are processed, so ordering stays
//! explicit rather than depending on mutation mid-iteration.

use crate::engine::policy::DayPolicy;
use crate::engine::slots::{day_key, PlannedShift};
use crate::models::{Employee, Override, ScheduleWarning, ShiftType};
use crate::time::{hhmm, normalized_end, Day, Minutes};
use chrono::NaiveDate;

/// Whether an `Exclude` rule bars `employee_id` from shifts of
/// `shift_type` on `day`. Exclude outranks assign.
pub fn is_excluded(
    overrides: &[Override],
    day: Day,
    employee_id: &str,
    shift_type: ShiftType,
) -> bool {
    overrides.iter().any(|rule| {
        matches!(rule, Override::Exclude {
            employee_id: id,
            day: d,
            shift_type: st,
        } if *d == day && id == employee_id && st.matches(shift_type))
    })
}

/// Whether a `Prioritize` rule prefers `employee_id` for shifts of
/// `shift_type` on `day`.
pub fn is_prioritized(
    overrides: &[Override],
    day: Day,
    employee_id: &str,
    shift_type: ShiftType,
) -> bool {
    overrides.iter().any(|rule| {
        matches!(rule, Override::Prioritize {
            employee_id: id,
            day: d,
            shift_type: st,
        } if *d == day && id == employee_id && st.matches(shift_type))
    })
}

/// Employees forced onto `shift` by `Assign`/`CustomTime` rules, in
/// override order. A `CustomTime` rule also matches the standalone
/// custom shift synthesized for its own employee.
pub fn forced_for_shift<'a>(
    overrides: &'a [Override],
    shift: &PlannedShift,
) -> Vec<&'a str> {
    overrides
        .iter()
        .filter_map(|rule| match rule {
            Override::Assign {
                employee_id,
                day,
                shift_type,
            } if *day == shift.day && shift_type.matches(shift.shift_type) => {
                Some(employee_id.as_str())
            }
            Override::CustomTime {
                employee_id,
                day,
                shift_type,
                ..
            } if *day == shift.day
                && (shift_type.matches(shift.shift_type)
                    || shift.id == standalone_shift_id(shift.day, employee_id)) =>
            {
                Some(employee_id.as_str())
            }
            _ => None,
        })
        .collect()
}

/// A portion of a split shift already committed to an employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreAssignment {
    pub shift_id: String,
    pub employee_id: String,
    pub start_min: Minutes,
    pub end_min: Minutes,
}

/// Result of applying a day's custom-time rules.
#[derive(Debug, Default)]
pub struct CustomTimeResult {
    /// Worked portions to seed before the assignment loop.
    pub pre_assignments: Vec<PreAssignment>,
    /// Coverage warnings for synthesized shifts.
    pub warnings: Vec<ScheduleWarning>,
}

/// Applies `CustomTime` rules for `day`, splitting adjacent shifts and
/// appending synthesized coverage shifts to `shifts`.
///
/// Rules for employees in `taken` (already assigned on this date by an
/// earlier seeding stage, e.g. a locked shift or set schedule) are
/// skipped wholesale: splitting a shift for someone who already holds
/// one would double-book them.
pub fn apply_custom_times(
    day: Day,
    date: NaiveDate,
    shifts: &mut Vec<PlannedShift>,
    overrides: &[Override],
    roster: &[Employee],
    policy: &DayPolicy,
    taken: &[String],
) -> CustomTimeResult {
    let mut result = CustomTimeResult::default();
    let mut queue: Vec<PlannedShift> = Vec::new();
    let mut handled: Vec<&str> = Vec::new();

    for rule in overrides {
        let Override::CustomTime {
            employee_id,
            day: rule_day,
            shift_type,
            start_min,
            end_min,
        } = rule
        else {
            continue;
        };
        if *rule_day != day
            || taken.iter().any(|t| t == employee_id)
            || handled.contains(&employee_id.as_str())
        {
            continue;
        }
        let name = display_name(roster, employee_id);

        // Leave-early and arrive-late boundaries against the live list.
        let boundary = end_min.or(*start_min);
        let host = boundary.and_then(|b| {
            shifts
                .iter()
                .chain(queue.iter())
                .find(|s| {
                    shift_type.matches(s.shift_type)
                        && s.start_min < b
                        && b < normalized_end(s.start_min, s.end_min)
                })
                .cloned()
        });

        match host {
            Some(host) => {
                let (worked_start, worked_end, gap_start, gap_end, why) = match (start_min, end_min)
                {
                    // Leaving early: works the head, coverage for the tail.
                    (_, Some(leave)) => {
                        let worked_start = start_min.unwrap_or(host.start_min).max(host.start_min);
                        (worked_start, *leave, *leave, host.end_min, "leaves early")
                    }
                    // Arriving late: works the tail, coverage for the head.
                    (Some(arrive), None) => {
                        (*arrive, host.end_min, host.start_min, *arrive, "arrives late")
                    }
                    (None, None) => continue,
                };

                result.pre_assignments.push(PreAssignment {
                    shift_id: host.id.clone(),
                    employee_id: employee_id.clone(),
                    start_min: worked_start,
                    end_min: worked_end,
                });
                handled.push(employee_id);

                if gap_end > gap_start {
                    let cover = PlannedShift::from_window(
                        format!("{}-cover-{}", day_key(day), employee_id),
                        day,
                        format!("Coverage for {name}"),
                        gap_start,
                        gap_end,
                    );
                    result.warnings.push(ScheduleWarning::coverage_needed(
                        date,
                        format!(
                            "{day} {}-{}: coverage needed, {name} {why}",
                            hhmm(gap_start),
                            hhmm(gap_end),
                        ),
                    ));
                    queue.push(cover);
                }
            }
            None => {
                // No adjacency: an explicit window becomes a standalone
                // custom shift, filled via the normal path.
                if let (Some(start), Some(end)) = (start_min, end_min) {
                    if let Some((start, end)) = policy.truncate_window(*start, *end) {
                        let mut custom = PlannedShift::from_window(
                            standalone_shift_id(day, employee_id),
                            day,
                            format!("Custom - {name}"),
                            start,
                            end,
                        );
                        custom.shift_type = ShiftType::Custom;
                        custom.requires_bartender = false;
                        queue.push(custom);
                        handled.push(employee_id);
                    }
                }
            }
        }
    }

    shifts.extend(queue);
    result
}

/// Identifier of the standalone custom shift for an employee's
/// explicit-window rule.
pub fn standalone_shift_id(day: Day, employee_id: &str) -> String {
    format!("{}-custom-{}", day_key(day), employee_id)
}

fn display_name<'a>(roster: &'a [Employee], employee_id: &'a str) -> &'a str {
    roster
        .iter()
        .find(|e| e.id == employee_id)
        .map(|e| e.name.as_str())
        .unwrap_or(employee_id)
}
