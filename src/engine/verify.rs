//! Safety net and override verification.
//!
//! Two independent final passes over the assembled week:
//!
//! 1. [`enforce_policies`] re-derives the date-to-day mapping and strips
//!    or truncates assignments that violate a closure or early-close
//!    rule, re-emitting the closure warnings so they are visible no
//!    matter which stage did the filtering.
//! 2. [`verify_overrides`] cross-checks every employee-scoped rule
//!    against the final assignment list and reports dishonored ones as
//!    `rule_violation` conflicts. This pass never repairs anything.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::warn;

use crate::engine::policy::DayPolicy;
use crate::models::{
    Override, ScheduleAssignment, ScheduleConflict, ScheduleWarning, ShiftType,
};
use crate::time::{date_for, day_of, hhmm, Day};

/// Drops assignments on closed days and at/after an early-close cutoff,
/// truncating end times that run past the cutoff.
///
/// Closure warnings are appended unless an identical message is already
/// present, so the main loop and this guard never double-report.
pub fn enforce_policies(
    assignments: &mut Vec<ScheduleAssignment>,
    policies: &BTreeMap<Day, DayPolicy>,
    warnings: &mut Vec<ScheduleWarning>,
    week_start: NaiveDate,
) {
    assignments.retain_mut(|assignment| {
        let day = day_of(assignment.date);
        let Some(policy) = policies.get(&day) else {
            return true;
        };
        if policy.closed {
            warn!(
                shift = %assignment.shift_id,
                employee = %assignment.employee_id,
                "dropping assignment on closed day"
            );
            return false;
        }
        if let Some(cutoff) = policy.early_close {
            if assignment.start_min.is_some_and(|s| s >= cutoff) {
                warn!(
                    shift = %assignment.shift_id,
                    employee = %assignment.employee_id,
                    "dropping assignment starting after early close"
                );
                return false;
            }
            if let Some(end) = assignment.end_min {
                if end > cutoff || assignment.start_min.is_some_and(|s| end <= s) {
                    assignment.end_min = Some(cutoff);
                }
            }
        }
        true
    });

    for &day in &Day::WEEK {
        let Some(policy) = policies.get(&day) else {
            continue;
        };
        let date = date_for(week_start, day);
        if policy.closed {
            ensure_warning(warnings, date, format!("{} - CLOSED", day.label()));
        } else if let Some(cutoff) = policy.early_close {
            ensure_warning(
                warnings,
                date,
                format!("{} - closes early at {}", day.label(), hhmm(cutoff)),
            );
        }
    }
}

fn ensure_warning(warnings: &mut Vec<ScheduleWarning>, date: NaiveDate, message: String) {
    if !warnings.iter().any(|w| w.message == message) {
        warnings.push(ScheduleWarning::coverage_needed(date, message));
    }
}

/// Checks each employee-scoped override against the final assignments.
///
/// An `Exclude` with a matching assignment on its day, or an `Assign` /
/// `CustomTime` with no matching assignment on its (open) day, yields a
/// `rule_violation` conflict.
pub fn verify_overrides(
    assignments: &[ScheduleAssignment],
    overrides: &[Override],
    policies: &BTreeMap<Day, DayPolicy>,
    week_start: NaiveDate,
) -> Vec<ScheduleConflict> {
    let mut conflicts = Vec::new();

    for rule in overrides {
        match rule {
            Override::Exclude {
                employee_id,
                day,
                shift_type,
            } => {
                let date = date_for(week_start, *day);
                if assignments
                    .iter()
                    .any(|a| a.date == date && a.employee_id == *employee_id
                        && matches_type(a, *shift_type))
                {
                    conflicts.push(ScheduleConflict::rule_violation(
                        date,
                        format!(
                            "{employee_id} was assigned on {} despite an exclude rule",
                            day.label(),
                        ),
                    ));
                }
            }
            Override::Assign {
                employee_id,
                day,
                shift_type,
            }
            | Override::CustomTime {
                employee_id,
                day,
                shift_type,
                ..
            } => {
                let date = date_for(week_start, *day);
                if policies.get(day).is_some_and(|p| p.closed) {
                    continue;
                }
                if !assignments
                    .iter()
                    .any(|a| a.date == date && a.employee_id == *employee_id
                        && matches_type(a, *shift_type))
                {
                    conflicts.push(ScheduleConflict::rule_violation(
                        date,
                        format!(
                            "{employee_id} was not assigned on {} despite an assignment rule",
                            day.label(),
                        ),
                    ));
                }
            }
            Override::BusinessClosed { .. }
            | Override::EarlyClose { .. }
            | Override::Prioritize { .. } => {}
        }
    }

    conflicts
}

/// Whether an assignment satisfies a rule's shift type. `Any` matches
/// every assignment; a concrete type is checked against the type
/// inferred from the assignment's start time, when known.
fn matches_type(assignment: &ScheduleAssignment, shift_type: ShiftType) -> bool {
    match (shift_type, assignment.start_min) {
        (ShiftType::Any, _) => true,
        (wanted, Some(start)) => wanted.matches(ShiftType::infer(start)),
        (_, None) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::policy::day_policies;
    use crate::models::ConflictKind;

    fn week_start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()
    }

    fn wednesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 13).unwrap()
    }

    #[test]
    fn test_closed_day_stripped_and_warned() {
        let policies = day_policies(&[Override::BusinessClosed { day: Day::Wednesday }]);
        let mut assignments = vec![
            ScheduleAssignment::new("wednesday-open", "E1", wednesday()).with_times(540, 1020),
            ScheduleAssignment::new("thursday-open", "E1", wednesday().succ_opt().unwrap())
                .with_times(540, 1020),
        ];
        let mut warnings = Vec::new();

        enforce_policies(&mut assignments, &policies, &mut warnings, week_start());

        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].shift_id, "thursday-open");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].message, "Wednesday - CLOSED");
    }

    #[test]
    fn test_closed_warning_not_duplicated() {
        let policies = day_policies(&[Override::BusinessClosed { day: Day::Wednesday }]);
        let mut assignments = Vec::new();
        let mut warnings = vec![ScheduleWarning::coverage_needed(
            wednesday(),
            "Wednesday - CLOSED",
        )];

        enforce_policies(&mut assignments, &policies, &mut warnings, week_start());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_early_close_truncates_and_drops() {
        let policies = day_policies(&[Override::EarlyClose {
            day: Day::Wednesday,
            close_min: 1020, // 17:00
        }]);
        let mut assignments = vec![
            ScheduleAssignment::new("wednesday-open", "E1", wednesday()).with_times(540, 900),
            ScheduleAssignment::new("wednesday-mid", "E2", wednesday()).with_times(720, 1200),
            ScheduleAssignment::new("wednesday-close", "E3", wednesday()).with_times(1080, 1380),
        ];
        let mut warnings = Vec::new();

        enforce_policies(&mut assignments, &policies, &mut warnings, week_start());

        assert_eq!(assignments.len(), 2);
        assert_eq!(assignments[0].end_min, Some(900)); // untouched
        assert_eq!(assignments[1].end_min, Some(1020)); // truncated
        assert!(warnings
            .iter()
            .any(|w| w.message == "Wednesday - closes early at 17:00"));
    }

    #[test]
    fn test_exclude_violation_reported() {
        let overrides = vec![Override::Exclude {
            employee_id: "E1".into(),
            day: Day::Wednesday,
            shift_type: ShiftType::Any,
        }];
        let assignments =
            vec![ScheduleAssignment::new("wednesday-open", "E1", wednesday()).with_times(540, 900)];

        let conflicts =
            verify_overrides(&assignments, &overrides, &day_policies(&[]), week_start());
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].kind, ConflictKind::RuleViolation);
        assert!(conflicts[0].message.contains("exclude"));
    }

    #[test]
    fn test_exclude_respects_shift_type() {
        let overrides = vec![Override::Exclude {
            employee_id: "E1".into(),
            day: Day::Wednesday,
            shift_type: ShiftType::Night,
        }];
        // Morning assignment does not violate a night exclude
        let assignments =
            vec![ScheduleAssignment::new("wednesday-open", "E1", wednesday()).with_times(540, 900)];
        assert!(verify_overrides(&assignments, &overrides, &day_policies(&[]), week_start())
            .is_empty());
    }

    #[test]
    fn test_missing_forced_assignment_reported() {
        let overrides = vec![Override::Assign {
            employee_id: "E1".into(),
            day: Day::Friday,
            shift_type: ShiftType::Night,
        }];
        let conflicts = verify_overrides(&[], &overrides, &day_policies(&[]), week_start());
        assert_eq!(conflicts.len(), 1);
        assert!(conflicts[0].message.contains("E1"));
    }

    #[test]
    fn test_forced_assignment_on_closed_day_not_reported() {
        let overrides = vec![
            Override::BusinessClosed { day: Day::Friday },
            Override::Assign {
                employee_id: "E1".into(),
                day: Day::Friday,
                shift_type: ShiftType::Any,
            },
        ];
        let policies = day_policies(&overrides);
        assert!(verify_overrides(&[], &overrides, &policies, week_start()).is_empty());
    }

    #[test]
    fn test_honored_rules_stay_silent() {
        let overrides = vec![Override::Assign {
            employee_id: "E1".into(),
            day: Day::Wednesday,
            shift_type: ShiftType::Morning,
        }];
        let assignments =
            vec![ScheduleAssignment::new("wednesday-open", "E1", wednesday()).with_times(540, 900)];
        assert!(verify_overrides(&assignments, &overrides, &day_policies(&[]), week_start())
            .is_empty());
    }
}
