//! Per-day closure policy.
//!
//! Closure and early-close rules are business-wide and must be honored
//! by every stage: slot building, locked-shift carry-over, fixed
//! schedules, and the final safety net. They are therefore computed
//! once per day, before any shift exists, and threaded explicitly as a
//! [`DayPolicy`] value rather than re-derived ad hoc.

use std::collections::BTreeMap;

use crate::models::Override;
use crate::time::{Day, Minutes};

/// Immutable closure policy for one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayPolicy {
    /// The business is closed all day.
    pub closed: bool,
    /// The business closes at this time instead of its normal end.
    pub early_close: Option<Minutes>,
}

impl DayPolicy {
    /// An open day with normal hours.
    pub fn open() -> Self {
        Self::default()
    }

    /// Whether a shift starting at `start_min` may exist at all.
    pub fn permits_start(&self, start_min: Minutes) -> bool {
        if self.closed {
            return false;
        }
        match self.early_close {
            Some(cutoff) => start_min < cutoff,
            None => true,
        }
    }

    /// Clamps a shift's end to the early-close cutoff, if any.
    pub fn clamp_end(&self, end_min: Minutes) -> Minutes {
        match self.early_close {
            Some(cutoff) if end_min > cutoff => cutoff,
            _ => end_min,
        }
    }

    /// Applies this policy to a shift window.
    ///
    /// Returns `None` when the shift cannot exist (closed day, or it
    /// starts at/after the cutoff); otherwise the window with its end
    /// truncated to the cutoff. Overnight ends (`end <= start`) always
    /// cross the cutoff and are truncated.
    pub fn truncate_window(&self, start_min: Minutes, end_min: Minutes) -> Option<(Minutes, Minutes)> {
        if !self.permits_start(start_min) {
            return None;
        }
        let end = match self.early_close {
            Some(cutoff) => {
                let crosses_midnight = end_min <= start_min;
                if crosses_midnight || end_min > cutoff {
                    cutoff
                } else {
                    end_min
                }
            }
            None => end_min,
        };
        Some((start_min, end))
    }
}

/// Computes each day's policy from the override list.
///
/// A `BusinessClosed` rule wins over any `EarlyClose` on the same day.
/// When several early closes target one day the earliest cutoff wins.
pub fn day_policies(overrides: &[Override]) -> BTreeMap<Day, DayPolicy> {
    let mut policies: BTreeMap<Day, DayPolicy> = Day::WEEK
        .iter()
        .map(|&day| (day, DayPolicy::open()))
        .collect();

    for rule in overrides {
        match *rule {
            Override::BusinessClosed { day } => {
                if let Some(p) = policies.get_mut(&day) {
                    p.closed = true;
                }
            }
            Override::EarlyClose { day, close_min } => {
                if let Some(p) = policies.get_mut(&day) {
                    p.early_close = Some(match p.early_close {
                        Some(existing) => existing.min(close_min),
                        None => close_min,
                    });
                }
            }
            _ => {}
        }
    }

    policies
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ShiftType;

    #[test]
    fn test_open_by_default() {
        let policies = day_policies(&[]);
        assert_eq!(policies.len(), 7);
        assert!(policies.values().all(|p| *p == DayPolicy::open()));
    }

    #[test]
    fn test_closed_day() {
        let policies = day_policies(&[Override::BusinessClosed { day: Day::Wednesday }]);
        assert!(policies[&Day::Wednesday].closed);
        assert!(!policies[&Day::Thursday].closed);
        assert!(!policies[&Day::Wednesday].permits_start(0));
    }

    #[test]
    fn test_early_close_truncation() {
        let policies = day_policies(&[Override::EarlyClose {
            day: Day::Friday,
            close_min: 1260, // 21:00
        }]);
        let p = policies[&Day::Friday];
        assert!(p.permits_start(1200));
        assert!(!p.permits_start(1260));
        assert!(!p.permits_start(1300));
        assert_eq!(p.clamp_end(1380), 1260);
        assert_eq!(p.clamp_end(1200), 1200);
    }

    #[test]
    fn test_truncate_window() {
        let p = DayPolicy {
            closed: false,
            early_close: Some(1260),
        };
        assert_eq!(p.truncate_window(540, 1020), Some((540, 1020)));
        assert_eq!(p.truncate_window(900, 1380), Some((900, 1260)));
        assert_eq!(p.truncate_window(1320, 1380), None);
        // Overnight end crosses the cutoff
        assert_eq!(p.truncate_window(1200, 60), Some((1200, 1260)));

        let closed = DayPolicy {
            closed: true,
            early_close: None,
        };
        assert_eq!(closed.truncate_window(540, 1020), None);
    }

    #[test]
    fn test_earliest_cutoff_wins() {
        let policies = day_policies(&[
            Override::EarlyClose {
                day: Day::Friday,
                close_min: 1320,
            },
            Override::EarlyClose {
                day: Day::Friday,
                close_min: 1260,
            },
        ]);
        assert_eq!(policies[&Day::Friday].early_close, Some(1260));
    }

    #[test]
    fn test_employee_rules_ignored() {
        let policies = day_policies(&[Override::Exclude {
            employee_id: "E1".into(),
            day: Day::Monday,
            shift_type: ShiftType::Any,
        }]);
        assert_eq!(policies[&Day::Monday], DayPolicy::open());
    }
}
