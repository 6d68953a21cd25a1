//! Shift-allocation engine.
//!
//! One entry point: [`RosterScheduler::schedule`] takes a
//! [`RosterRequest`] (week anchor, roster, staffing, overrides, pins)
//! and produces a [`WeeklySchedule`]. The computation is pure and
//! synchronous: one call recomputes the whole week from scratch and
//! never mutates its inputs.
//!
//! Stages, in order, for each day Monday through Sunday:
//! 1. Closure policy (closed days are skipped with a warning).
//! 2. Locked-shift carry-over from the previous run.
//! 3. Fixed per-employee set schedules.
//! 4. Custom-time resolution (splits shifts, synthesizes coverage).
//! 5. Per-shift filling: forced overrides, then availability-filtered
//!    candidates ordered prioritized-first then by ascending hours,
//!    ties broken by roster order.
//!
//! After the week: under-minimum and overtime warnings, the bartender
//! coverage gap-fill pass, then the closure safety net and override
//! verification. Days always iterate Monday to Sunday and overrides in
//! insertion order, so identical inputs give identical output.

pub mod availability;
pub mod coverage;
pub mod policy;
pub mod resolver;
pub mod slots;
pub mod verify;

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::models::{
    Employee, LockedShift, Override, RawOverride, ScheduleAssignment, ScheduleConflict,
    ScheduleWarning, SetScheduleEntry, ShiftType, WeekStaffing, WeeklySchedule,
};
use crate::time::{date_for, monday_of, Day, Minutes};

pub use availability::{check_restrictions, is_available};
pub use coverage::fill_coverage_gaps;
pub use policy::{day_policies, DayPolicy};
pub use resolver::{apply_custom_times, forced_for_shift, is_excluded, is_prioritized};
pub use slots::{build_day_shifts, PlannedShift};
pub use verify::{enforce_policies, verify_overrides};

use crate::models::classify_overrides;
use slots::{DEFAULT_MORNING_END, DEFAULT_MORNING_START, DEFAULT_NIGHT_END, DEFAULT_NIGHT_START};

/// Weekly hours above which an overtime warning is emitted.
pub const DEFAULT_OVERTIME_HOURS: f64 = 38.0;

/// Everything the engine needs to compute one week.
#[derive(Debug, Clone)]
pub struct RosterRequest {
    /// Any date in the target week; normalized to its Monday.
    pub week_anchor: NaiveDate,
    pub roster: Vec<Employee>,
    pub staffing: WeekStaffing,
    /// Merged override list, in insertion order.
    pub overrides: Vec<Override>,
    /// User pins to preserve across regeneration.
    pub locked_shifts: Vec<LockedShift>,
    /// The previous run's assignments, consulted only for carry-over.
    pub existing_assignments: Vec<ScheduleAssignment>,
}

impl RosterRequest {
    /// Creates a request with an empty roster and no rules.
    pub fn new(week_anchor: NaiveDate) -> Self {
        Self {
            week_anchor,
            roster: Vec::new(),
            staffing: WeekStaffing::new(),
            overrides: Vec::new(),
            locked_shifts: Vec::new(),
            existing_assignments: Vec::new(),
        }
    }

    /// Adds one employee to the roster.
    pub fn with_employee(mut self, employee: Employee) -> Self {
        self.roster.push(employee);
        self
    }

    /// Replaces the roster.
    pub fn with_roster(mut self, roster: Vec<Employee>) -> Self {
        self.roster = roster;
        self
    }

    /// Sets the week's staffing requirements.
    pub fn with_staffing(mut self, staffing: WeekStaffing) -> Self {
        self.staffing = staffing;
        self
    }

    /// Appends one classified override.
    pub fn with_override(mut self, rule: Override) -> Self {
        self.overrides.push(rule);
        self
    }

    /// Appends classified overrides in order.
    pub fn with_overrides(mut self, rules: Vec<Override>) -> Self {
        self.overrides.extend(rules);
        self
    }

    /// Classifies and appends wire-form overrides in order.
    /// Unclassifiable entries are dropped.
    pub fn with_raw_overrides(mut self, raw: &[RawOverride]) -> Self {
        self.overrides.extend(classify_overrides(raw));
        self
    }

    /// Adds a pinned shift to carry over.
    pub fn with_locked_shift(mut self, locked: LockedShift) -> Self {
        self.locked_shifts.push(locked);
        self
    }

    /// Supplies the previous run's assignments for carry-over.
    pub fn with_existing_assignments(mut self, assignments: Vec<ScheduleAssignment>) -> Self {
        self.existing_assignments = assignments;
        self
    }
}

/// The allocation engine.
#[derive(Debug, Clone)]
pub struct RosterScheduler {
    overtime_hours: f64,
}

impl Default for RosterScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl RosterScheduler {
    /// Creates a scheduler with the default overtime threshold.
    pub fn new() -> Self {
        Self {
            overtime_hours: DEFAULT_OVERTIME_HOURS,
        }
    }

    /// Sets the weekly overtime threshold in hours.
    pub fn with_overtime_threshold(mut self, hours: f64) -> Self {
        self.overtime_hours = hours;
        self
    }

    /// Computes the week's schedule.
    pub fn schedule(&self, request: &RosterRequest) -> WeeklySchedule {
        let week_start = monday_of(request.week_anchor);
        info!(
            %week_start,
            roster = request.roster.len(),
            overrides = request.overrides.len(),
            "computing weekly schedule"
        );

        let mut run = Run {
            request,
            policies: day_policies(&request.overrides),
            week_start,
            assignments: Vec::new(),
            conflicts: Vec::new(),
            warnings: Vec::new(),
            book: Bookkeeping::default(),
        };

        for &day in &Day::WEEK {
            run.schedule_day(day);
        }
        run.weekly_warnings(self.overtime_hours);

        fill_coverage_gaps(
            &mut run.assignments,
            &request.roster,
            week_start,
            &mut run.warnings,
            &mut run.conflicts,
        );

        enforce_policies(
            &mut run.assignments,
            &run.policies,
            &mut run.warnings,
            week_start,
        );
        run.conflicts.extend(verify_overrides(
            &run.assignments,
            &request.overrides,
            &run.policies,
            week_start,
        ));

        WeeklySchedule {
            week_start,
            assignments: run.assignments,
            conflicts: run.conflicts,
            warnings: run.warnings,
        }
    }
}

/// Per-employee running totals plus the idempotent-insert guard.
#[derive(Debug, Default)]
struct Bookkeeping {
    hours: HashMap<String, f64>,
    shift_counts: HashMap<String, u32>,
    seen: HashSet<(String, NaiveDate, String)>,
}

impl Bookkeeping {
    /// Appends `assignment` unless its `(employee, date, shift)` triple
    /// was already inserted. Returns whether it was appended.
    fn record(
        &mut self,
        assignments: &mut Vec<ScheduleAssignment>,
        assignment: ScheduleAssignment,
    ) -> bool {
        let key = (
            assignment.employee_id.clone(),
            assignment.date,
            assignment.shift_id.clone(),
        );
        if !self.seen.insert(key) {
            return false;
        }
        *self.hours.entry(assignment.employee_id.clone()).or_default() += assignment.hours();
        *self
            .shift_counts
            .entry(assignment.employee_id.clone())
            .or_default() += 1;
        assignments.push(assignment);
        true
    }

    fn hours_of(&self, employee_id: &str) -> f64 {
        self.hours.get(employee_id).copied().unwrap_or(0.0)
    }

    fn shifts_of(&self, employee_id: &str) -> u32 {
        self.shift_counts.get(employee_id).copied().unwrap_or(0)
    }
}

/// Mutable state of one scheduling run.
struct Run<'a> {
    request: &'a RosterRequest,
    policies: BTreeMap<Day, DayPolicy>,
    week_start: NaiveDate,
    assignments: Vec<ScheduleAssignment>,
    conflicts: Vec<ScheduleConflict>,
    warnings: Vec<ScheduleWarning>,
    book: Bookkeeping,
}

impl Run<'_> {
    fn schedule_day(&mut self, day: Day) {
        let date = date_for(self.week_start, day);
        let policy = self.policies.get(&day).copied().unwrap_or_default();

        if policy.closed {
            self.warnings.push(ScheduleWarning::coverage_needed(
                date,
                format!("{} - CLOSED", day.label()),
            ));
            return;
        }

        self.carry_locked(day, date, &policy);
        self.apply_set_schedules(day, date, &policy);

        let mut shifts = build_day_shifts(day, self.request.staffing.day(day), &policy);
        // Employees seeded by locked carry-over or set schedules already
        // hold their one assignment for the date; their custom-time
        // rules must not split shifts on top of it.
        let taken: Vec<String> = self
            .assignments
            .iter()
            .filter(|a| a.date == date)
            .map(|a| a.employee_id.clone())
            .collect();
        let custom = apply_custom_times(
            day,
            date,
            &mut shifts,
            &self.request.overrides,
            &self.request.roster,
            &policy,
            &taken,
        );
        for pre in custom.pre_assignments {
            self.book.record(
                &mut self.assignments,
                ScheduleAssignment::new(pre.shift_id, pre.employee_id, date)
                    .with_times(pre.start_min, pre.end_min),
            );
        }
        self.warnings.extend(custom.warnings);

        for shift in &shifts {
            self.assign_shift(shift, day, date);
        }
    }

    /// Copies pinned prior-run assignments verbatim, truncating or
    /// dropping them per the day's closure policy.
    fn carry_locked(&mut self, day: Day, date: NaiveDate, policy: &DayPolicy) {
        for locked in &self.request.locked_shifts {
            if locked.day != day {
                continue;
            }
            let prior = self.request.existing_assignments.iter().find(|a| {
                a.date == date
                    && a.employee_id == locked.employee_id
                    && assignment_matches_type(a, locked.shift_type)
            });
            let Some(prior) = prior else {
                continue;
            };
            if self.assigned_on(date, &prior.employee_id) {
                continue;
            }
            let mut carried = prior.clone();
            if let Some(cutoff) = policy.early_close {
                if carried.start_min.is_some_and(|s| s >= cutoff) {
                    continue;
                }
                if carried.end_min.is_some_and(|e| e > cutoff) {
                    carried.end_min = Some(cutoff);
                }
            }
            debug!(shift = %carried.shift_id, employee = %carried.employee_id, "carrying locked shift");
            self.book.record(&mut self.assignments, carried);
        }
    }

    /// Applies fixed recurring schedules, using explicit entry times or
    /// the day's legacy shift times.
    fn apply_set_schedules(&mut self, day: Day, date: NaiveDate, policy: &DayPolicy) {
        for employee in &self.request.roster {
            for entry in &employee.set_schedule {
                if entry.day != day || self.assigned_on(date, &employee.id) {
                    continue;
                }
                let Some((start, end)) = self.set_entry_window(day, entry) else {
                    continue;
                };
                let Some((start, end)) = policy.truncate_window(start, end) else {
                    continue;
                };
                self.book.record(
                    &mut self.assignments,
                    ScheduleAssignment::new(
                        format!("{}-set-{}", slots::day_key(day), employee.id),
                        employee.id.clone(),
                        date,
                    )
                    .with_times(start, end),
                );
            }
        }
    }

    fn set_entry_window(&self, day: Day, entry: &SetScheduleEntry) -> Option<(Minutes, Minutes)> {
        if let (Some(start), Some(end)) = (entry.start_min, entry.end_min) {
            return Some((start, end));
        }
        let legacy = self
            .request
            .staffing
            .day(day)
            .and_then(|d| d.legacy.as_ref());
        match entry.shift_type {
            ShiftType::Morning | ShiftType::Any => Some((
                legacy
                    .and_then(|l| l.morning_start)
                    .unwrap_or(DEFAULT_MORNING_START),
                legacy
                    .and_then(|l| l.morning_end)
                    .unwrap_or(DEFAULT_MORNING_END),
            )),
            ShiftType::Night => Some((
                legacy
                    .and_then(|l| l.night_start)
                    .unwrap_or(DEFAULT_NIGHT_START),
                legacy
                    .and_then(|l| l.night_end)
                    .unwrap_or(DEFAULT_NIGHT_END),
            )),
            // No default window exists for these without explicit times.
            ShiftType::Mid | ShiftType::Custom => None,
        }
    }

    /// Fills one shift: forced overrides first, then filtered candidates
    /// ordered prioritized-first then by ascending cumulative hours.
    fn assign_shift(&mut self, shift: &PlannedShift, day: Day, date: NaiveDate) {
        let overrides = &self.request.overrides;

        // Forced assignments are authoritative: they bypass availability
        // and restrictions. Exclude still outranks assign.
        for employee_id in forced_for_shift(overrides, shift) {
            if self.filled(shift, date) >= shift.required_staff {
                break;
            }
            if self.assigned_on(date, employee_id)
                || is_excluded(overrides, day, employee_id, shift.shift_type)
            {
                continue;
            }
            self.book.record(
                &mut self.assignments,
                ScheduleAssignment::new(shift.id.clone(), employee_id, date)
                    .with_times(shift.start_min, shift.end_min),
            );
        }

        if self.filled(shift, date) >= shift.required_staff {
            return;
        }

        let mut candidates: Vec<&Employee> = self
            .request
            .roster
            .iter()
            .filter(|e| {
                !self.assigned_on(date, &e.id)
                    && !is_excluded(overrides, day, &e.id, shift.shift_type)
                    && check_restrictions(e, day, shift.start_min, shift.end_min).is_ok()
                    && is_available(e, day, date, shift.shift_type, Some(shift.start_min))
            })
            .collect();

        // Stable sort: prioritized first, then ascending hours, ties in
        // roster order.
        candidates.sort_by(|a, b| {
            let pa = is_prioritized(overrides, day, &a.id, shift.shift_type);
            let pb = is_prioritized(overrides, day, &b.id, shift.shift_type);
            pb.cmp(&pa).then_with(|| {
                self.book
                    .hours_of(&a.id)
                    .total_cmp(&self.book.hours_of(&b.id))
            })
        });

        for employee in candidates {
            if self.filled(shift, date) >= shift.required_staff {
                break;
            }
            self.book.record(
                &mut self.assignments,
                ScheduleAssignment::new(shift.id.clone(), employee.id.clone(), date)
                    .with_times(shift.start_min, shift.end_min),
            );
        }

        if shift.requires_bartender && !self.has_bartender(shift, date) {
            debug!(shift = %shift.id, "shift requiring a bartender has none; deferring to the coverage pass");
        }
    }

    fn has_bartender(&self, shift: &PlannedShift, date: NaiveDate) -> bool {
        self.assignments
            .iter()
            .filter(|a| a.date == date && a.shift_id == shift.id)
            .any(|a| {
                self.request
                    .roster
                    .iter()
                    .any(|e| e.id == a.employee_id && e.is_bartender())
            })
    }

    fn filled(&self, shift: &PlannedShift, date: NaiveDate) -> u32 {
        self.assignments
            .iter()
            .filter(|a| a.date == date && a.shift_id == shift.id)
            .count() as u32
    }

    fn assigned_on(&self, date: NaiveDate, employee_id: &str) -> bool {
        self.assignments
            .iter()
            .any(|a| a.date == date && a.employee_id == employee_id)
    }

    /// Week-level warnings: unmet shift minimums and overtime.
    fn weekly_warnings(&mut self, overtime_hours: f64) {
        for employee in &self.request.roster {
            let count = self.book.shifts_of(&employee.id);
            if employee.min_shifts_per_week > 0 && count < employee.min_shifts_per_week {
                self.warnings.push(ScheduleWarning::under_hours(format!(
                    "{} has {} shift(s), below the weekly minimum of {}",
                    employee.name, count, employee.min_shifts_per_week,
                )));
            }
            let hours = self.book.hours_of(&employee.id);
            if hours > overtime_hours {
                self.warnings.push(ScheduleWarning::overtime(format!(
                    "{} is scheduled {hours:.1}h this week (over {overtime_hours:.0}h)",
                    employee.name,
                )));
            }
        }
    }
}

/// Whether an assignment's inferred type satisfies a selector.
fn assignment_matches_type(assignment: &ScheduleAssignment, shift_type: ShiftType) -> bool {
    match (shift_type, assignment.start_min) {
        (ShiftType::Any, _) => true,
        (wanted, Some(start)) => wanted.matches(ShiftType::infer(start)),
        (_, None) => false,
    }
}
