//! Weekly shift-roster engine for a single-location service business.
//!
//! Takes a week's staffing requirements, an employee roster, and a
//! merged list of manager override rules, and produces a concrete
//! assignment of employees to time slots together with conflicts
//! (unmet hard constraints) and warnings (soft issues). The
//! computation is pure and deterministic: identical inputs always
//! produce an identical [`models::WeeklySchedule`].
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Employee`, `WeekStaffing`,
//!   `Override`, `LockedShift`, `WeeklySchedule` and its diagnostics
//! - **`engine`**: The allocation engine — `RosterScheduler`, day
//!   policies, slot building, override resolution, coverage gap-fill,
//!   and the closure safety net
//! - **`time`**: Minute-of-day arithmetic, `"HH:MM"` parsing, weekday
//!   and week-anchor helpers
//! - **`validation`**: Input integrity checks (duplicate IDs, invalid
//!   windows, out-of-range scales)
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use shift_roster::engine::{RosterRequest, RosterScheduler};
//! use shift_roster::models::Employee;
//! use shift_roster::time::Day;
//!
//! let roster = vec![
//!     Employee::new("E1", "Ada")
//!         .available_any(Day::Monday)
//!         .with_bartending_scale(4),
//! ];
//! let request = RosterRequest::new(NaiveDate::from_ymd_opt(2024, 3, 14).unwrap())
//!     .with_roster(roster);
//! let schedule = RosterScheduler::new().schedule(&request);
//! assert_eq!(schedule.week_start, NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
//! ```

pub mod engine;
pub mod models;
pub mod time;
pub mod validation;

pub use engine::{RosterRequest, RosterScheduler};
pub use models::WeeklySchedule;
