//! Bartender coverage gap-fill pass.
//!
//! Every employee below the bartending threshold must be shadowed, for
//! their entire shift span, by at least one simultaneously-present
//! qualified employee. This pass runs per date over the combined
//! assignment list: it merges the qualified employees' intervals
//! (sort by start, forward sweep), takes the complement within each
//! low-skill interval, and fills every gap it can.
//!
//! Gap filling searches the whole roster, not just employees already
//! on shift that day, so someone who declined the day's shifts can
//! still be pulled in as surge coverage. Fills append to the live list,
//! so a bartender added for one gap is visible (and not double-booked)
//! when later gaps on the same date are resolved.

use chrono::NaiveDate;
use tracing::debug;

use crate::engine::availability::is_available;
use crate::engine::slots::day_key;
use crate::models::{
    Employee, ScheduleAssignment, ScheduleConflict, ScheduleWarning, ShiftType,
};
use crate::time::{date_for, hhmm, label_12h, Day, TimeRange};

/// Runs the gap-fill pass for the whole week, mutating `assignments`
/// and appending diagnostics.
pub fn fill_coverage_gaps(
    assignments: &mut Vec<ScheduleAssignment>,
    roster: &[Employee],
    week_start: NaiveDate,
    warnings: &mut Vec<ScheduleWarning>,
    conflicts: &mut Vec<ScheduleConflict>,
) {
    for &day in &Day::WEEK {
        let date = date_for(week_start, day);
        fill_date(assignments, roster, day, date, warnings, conflicts);
    }
}

fn fill_date(
    assignments: &mut Vec<ScheduleAssignment>,
    roster: &[Employee],
    day: Day,
    date: NaiveDate,
    warnings: &mut Vec<ScheduleWarning>,
    conflicts: &mut Vec<ScheduleConflict>,
) {
    // Snapshot the low-skill intervals up front; fills only ever add
    // qualified employees, so the snapshot stays complete.
    let low_shifts: Vec<(String, TimeRange)> = assignments
        .iter()
        .filter(|a| a.date == date)
        .filter_map(|a| {
            let employee = find_employee(roster, &a.employee_id)?;
            if employee.is_bartender() {
                return None;
            }
            Some((a.employee_id.clone(), a.time_range()?))
        })
        .collect();

    for (low_id, low_range) in low_shifts {
        // Recomputed per interval so earlier fills count as cover.
        let qualified: Vec<TimeRange> = assignments
            .iter()
            .filter(|a| a.date == date)
            .filter_map(|a| {
                let employee = find_employee(roster, &a.employee_id)?;
                if !employee.is_bartender() {
                    return None;
                }
                a.time_range()
            })
            .collect();

        let covered = merge_ranges(qualified);
        let gaps = subtract_ranges(low_range, &covered);
        let low_name = display_name(roster, &low_id);

        for gap in gaps {
            let candidate = roster.iter().find(|e| {
                e.is_bartender()
                    && !assigned_on(assignments, date, &e.id)
                    && is_available(e, day, date, ShiftType::Any, Some(gap.start_min))
            });

            match candidate {
                Some(cover) => {
                    debug!(
                        date = %date,
                        employee = %cover.id,
                        "auto-filling bartender coverage gap"
                    );
                    assignments.push(
                        ScheduleAssignment::new(
                            format!("{}-coverage-{}", day_key(day), cover.id),
                            cover.id.clone(),
                            date,
                        )
                        .with_times(gap.start_min, gap.end_min),
                    );
                    warnings.push(ScheduleWarning::coverage_needed(
                        date,
                        format!(
                            "Auto-added {} ({}) to cover {} {}-{}",
                            cover.name,
                            label_12h(gap.start_min),
                            low_name,
                            hhmm(gap.start_min),
                            hhmm(gap.end_min),
                        ),
                    ));
                }
                None => {
                    conflicts.push(ScheduleConflict::no_bartender(
                        date,
                        format!(
                            "No bartender coverage for {} {}-{} on {}",
                            low_name,
                            hhmm(gap.start_min),
                            hhmm(gap.end_min),
                            day,
                        ),
                    ));
                }
            }
        }
    }
}

/// Merges ranges into a disjoint, sorted union (sort + forward sweep).
fn merge_ranges(mut ranges: Vec<TimeRange>) -> Vec<TimeRange> {
    ranges.sort_by_key(|r| (r.start_min, r.end_min));
    let mut merged: Vec<TimeRange> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.start_min <= last.end_min => {
                last.end_min = last.end_min.max(range.end_min);
            }
            _ => merged.push(range),
        }
    }
    merged
}

/// The parts of `span` not covered by the disjoint sorted `union`.
fn subtract_ranges(span: TimeRange, union: &[TimeRange]) -> Vec<TimeRange> {
    let mut gaps = Vec::new();
    let mut cursor = span.start_min;
    for covered in union {
        if covered.end_min <= cursor {
            continue;
        }
        if covered.start_min >= span.end_min {
            break;
        }
        if covered.start_min > cursor {
            gaps.push(TimeRange {
                start_min: cursor,
                end_min: covered.start_min.min(span.end_min),
            });
        }
        cursor = cursor.max(covered.end_min);
        if cursor >= span.end_min {
            return gaps;
        }
    }
    if cursor < span.end_min {
        gaps.push(TimeRange {
            start_min: cursor,
            end_min: span.end_min,
        });
    }
    gaps
}

fn find_employee<'a>(roster: &'a [Employee], id: &str) -> Option<&'a Employee> {
    roster.iter().find(|e| e.id == id)
}

fn display_name(roster: &[Employee], id: &str) -> String {
    find_employee(roster, id)
        .map(|e| e.name.clone())
        .unwrap_or_else(|| id.to_string())
}

fn assigned_on(assignments: &[ScheduleAssignment], date: NaiveDate, employee_id: &str) -> bool {
    assignments
        .iter()
        .any(|a| a.date == date && a.employee_id == employee_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConflictKind;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 12).unwrap() // Tuesday
    }

    fn week_start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()
    }

    fn range(s: i32, e: i32) -> TimeRange {
        TimeRange::new(s, e)
    }

    #[test]
    fn test_merge_ranges() {
        let merged = merge_ranges(vec![range(900, 1020), range(540, 720), range(700, 950)]);
        assert_eq!(merged, vec![range(540, 1020)]);

        let disjoint = merge_ranges(vec![range(540, 720), range(900, 1020)]);
        assert_eq!(disjoint.len(), 2);
    }

    #[test]
    fn test_subtract_ranges() {
        let gaps = subtract_ranges(range(540, 1020), &[range(600, 720), range(840, 900)]);
        assert_eq!(gaps, vec![range(540, 600), range(720, 840), range(900, 1020)]);

        assert!(subtract_ranges(range(540, 1020), &[range(500, 1100)]).is_empty());
        assert_eq!(
            subtract_ranges(range(540, 1020), &[]),
            vec![range(540, 1020)]
        );
    }

    #[test]
    fn test_lone_low_skill_employee_conflicts() {
        // One low-skill employee, nobody to cover: one conflict for the
        // whole span, no coverage assignment added.
        let roster = vec![Employee::new("E1", "Nia")
            .available_any(Day::Tuesday)
            .with_bartending_scale(1)];
        let mut assignments = vec![
            ScheduleAssignment::new("tuesday-open", "E1", date()).with_times(540, 1020)
        ];
        let mut warnings = Vec::new();
        let mut conflicts = Vec::new();

        fill_coverage_gaps(&mut assignments, &roster, week_start(), &mut warnings, &mut conflicts);

        assert_eq!(assignments.len(), 1);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].kind, ConflictKind::NoBartender);
        assert!(conflicts[0].message.contains("09:00-17:00"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_overlapping_bartender_covers() {
        let roster = vec![
            Employee::new("E1", "Nia")
                .available_any(Day::Tuesday)
                .with_bartending_scale(1),
            Employee::new("E2", "Max")
                .available_any(Day::Tuesday)
                .with_bartending_scale(4),
        ];
        let mut assignments = vec![
            ScheduleAssignment::new("tuesday-open", "E1", date()).with_times(540, 1020),
            ScheduleAssignment::new("tuesday-bar", "E2", date()).with_times(500, 1050),
        ];
        let mut warnings = Vec::new();
        let mut conflicts = Vec::new();

        fill_coverage_gaps(&mut assignments, &roster, week_start(), &mut warnings, &mut conflicts);

        assert_eq!(assignments.len(), 2);
        assert!(conflicts.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_gap_auto_filled_from_roster() {
        // Bartender covers only the tail; an off-shift bartender is
        // pulled in for the head.
        let roster = vec![
            Employee::new("E1", "Nia")
                .available_any(Day::Tuesday)
                .with_bartending_scale(1),
            Employee::new("E2", "Max")
                .available_any(Day::Tuesday)
                .with_bartending_scale(4),
            Employee::new("E3", "Ode")
                .available_any(Day::Tuesday)
                .with_bartending_scale(5),
        ];
        let mut assignments = vec![
            ScheduleAssignment::new("tuesday-open", "E1", date()).with_times(540, 1020),
            ScheduleAssignment::new("tuesday-bar", "E2", date()).with_times(780, 1020),
        ];
        let mut warnings = Vec::new();
        let mut conflicts = Vec::new();

        fill_coverage_gaps(&mut assignments, &roster, week_start(), &mut warnings, &mut conflicts);

        assert!(conflicts.is_empty());
        assert_eq!(assignments.len(), 3);
        let added = &assignments[2];
        assert_eq!(added.employee_id, "E3");
        assert_eq!((added.start_min, added.end_min), (Some(540), Some(780)));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("Auto-added Ode"));
    }

    #[test]
    fn test_fill_visible_to_later_gaps() {
        // Two low-skill employees with the same uncovered interval: the
        // first gap consumes the only spare bartender, whose presence
        // then covers the second employee without a second fill.
        let roster = vec![
            Employee::new("E1", "Nia")
                .available_any(Day::Tuesday)
                .with_bartending_scale(1),
            Employee::new("E2", "Kit")
                .available_any(Day::Tuesday)
                .with_bartending_scale(2),
            Employee::new("E3", "Ode")
                .available_any(Day::Tuesday)
                .with_bartending_scale(5),
        ];
        let mut assignments = vec![
            ScheduleAssignment::new("tuesday-open", "E1", date()).with_times(540, 1020),
            ScheduleAssignment::new("tuesday-floor", "E2", date()).with_times(540, 1020),
        ];
        let mut warnings = Vec::new();
        let mut conflicts = Vec::new();

        fill_coverage_gaps(&mut assignments, &roster, week_start(), &mut warnings, &mut conflicts);

        assert!(conflicts.is_empty());
        assert_eq!(assignments.len(), 3); // exactly one fill
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_unavailable_bartender_not_pulled_in() {
        // The only bartender is not available Tuesday: conflict.
        let roster = vec![
            Employee::new("E1", "Nia")
                .available_any(Day::Tuesday)
                .with_bartending_scale(1),
            Employee::new("E2", "Max").with_bartending_scale(5), // no availability
        ];
        let mut assignments = vec![
            ScheduleAssignment::new("tuesday-open", "E1", date()).with_times(540, 1020)
        ];
        let mut warnings = Vec::new();
        let mut conflicts = Vec::new();

        fill_coverage_gaps(&mut assignments, &roster, week_start(), &mut warnings, &mut conflicts);

        assert_eq!(conflicts.len(), 1);
        assert_eq!(assignments.len(), 1);
    }
}
