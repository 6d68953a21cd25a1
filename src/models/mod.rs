//! Rostering domain models.
//!
//! Core data types for describing one week of a single-location
//! service business: who can work ([`Employee`]), what coverage is
//! needed ([`WeekStaffing`]), which manager rules apply ([`Override`]),
//! and what the engine produced ([`WeeklySchedule`]).
//!
//! All models are plain serde-serializable values. The engine reads
//! them as an immutable snapshot and never mutates its inputs.

mod employee;
mod rules;
mod schedule;
mod staffing;

pub use employee::{
    AvailabilityWindow, DateRange, DayAvailability, Employee, Preferences, Restriction,
    RestrictionKind, SetScheduleEntry, ShiftType, BARTENDER_MIN_SCALE,
};
pub use rules::{
    classify_overrides, LockedShift, Override, RawOverride, ALL_EMPLOYEES, CLOSE_EARLY,
};
pub use schedule::{
    ConflictKind, ScheduleAssignment, ScheduleConflict, ScheduleWarning, WarningKind,
    WeeklySchedule,
};
pub use staffing::{DayStaffing, LegacyCounts, SlotSpec, WeekStaffing};
