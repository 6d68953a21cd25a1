//! Manager-authored override rules and pinned shifts.
//!
//! Overrides arrive pre-merged from two sources with different
//! lifetimes (rules for every week, rules for one week); the engine
//! treats the merged list uniformly and in insertion order, except that
//! business-wide closure and early-close rules are extracted first into
//! per-day policies.
//!
//! The wire form ([`RawOverride`]) uses a string `type` plus two
//! sentinel employee IDs for business-wide rules. Internally those are
//! classified into the [`Override`] tagged union so every variant is
//! explicit and match statements stay exhaustive.

use serde::{Deserialize, Serialize};

use crate::models::ShiftType;
use crate::time::{serde_hhmm_opt, Day, Minutes};

/// Sentinel employee ID: the rule applies to the whole business.
pub const ALL_EMPLOYEES: &str = "__ALL__";

/// Sentinel employee ID: the rule closes the business early.
pub const CLOSE_EARLY: &str = "__CLOSE_EARLY__";

/// A classified override rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Override {
    /// The business is closed all day.
    BusinessClosed { day: Day },
    /// The business closes at `close_min` instead of its normal end.
    EarlyClose {
        day: Day,
        #[serde(with = "crate::time::serde_hhmm")]
        close_min: Minutes,
    },
    /// The employee must not be scheduled for matching shifts.
    Exclude {
        employee_id: String,
        day: Day,
        #[serde(default)]
        shift_type: ShiftType,
    },
    /// The employee must be scheduled for a matching shift.
    /// Forced: bypasses availability and restriction checks.
    Assign {
        employee_id: String,
        day: Day,
        #[serde(default)]
        shift_type: ShiftType,
    },
    /// The employee works non-standard hours: arriving late, leaving
    /// early, or an explicit standalone window.
    CustomTime {
        employee_id: String,
        day: Day,
        #[serde(default)]
        shift_type: ShiftType,
        #[serde(default, with = "serde_hhmm_opt")]
        start_min: Option<Minutes>,
        #[serde(default, with = "serde_hhmm_opt")]
        end_min: Option<Minutes>,
    },
    /// The employee is preferred when filling matching shifts.
    Prioritize {
        employee_id: String,
        day: Day,
        #[serde(default)]
        shift_type: ShiftType,
    },
}

impl Override {
    /// The day this rule applies to.
    pub fn day(&self) -> Day {
        match *self {
            Override::BusinessClosed { day }
            | Override::EarlyClose { day, .. }
            | Override::Exclude { day, .. }
            | Override::Assign { day, .. }
            | Override::CustomTime { day, .. }
            | Override::Prioritize { day, .. } => day,
        }
    }

    /// The targeted employee, if this is not a business-wide rule.
    pub fn employee_id(&self) -> Option<&str> {
        match self {
            Override::BusinessClosed { .. } | Override::EarlyClose { .. } => None,
            Override::Exclude { employee_id, .. }
            | Override::Assign { employee_id, .. }
            | Override::CustomTime { employee_id, .. }
            | Override::Prioritize { employee_id, .. } => Some(employee_id),
        }
    }

    /// Whether this is one of the two business-wide rule kinds.
    pub fn is_business_wide(&self) -> bool {
        matches!(
            self,
            Override::BusinessClosed { .. } | Override::EarlyClose { .. }
        )
    }
}

/// Wire form of an override, as produced by the rules editor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOverride {
    /// `"exclude"`, `"assign"`, `"custom_time"`, or `"prioritize"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Target employee, or a sentinel (`__ALL__`, `__CLOSE_EARLY__`).
    pub employee_id: String,
    pub day: Day,
    #[serde(default)]
    pub shift_type: Option<ShiftType>,
    #[serde(default, with = "serde_hhmm_opt")]
    pub custom_start_time: Option<Minutes>,
    #[serde(default, with = "serde_hhmm_opt")]
    pub custom_end_time: Option<Minutes>,
}

impl RawOverride {
    /// Classifies the wire form into a typed [`Override`].
    ///
    /// Business-wide sentinel detection wins over the string `type`:
    /// `__ALL__` + `exclude` is a closure, `__CLOSE_EARLY__` with a
    /// custom end time is an early close. Returns `None` for rules
    /// that don't classify (unknown type, sentinel misuse).
    pub fn classify(&self) -> Option<Override> {
        let shift_type = self.shift_type.unwrap_or_default();
        if self.employee_id == ALL_EMPLOYEES {
            return match self.kind.as_str() {
                "exclude" => Some(Override::BusinessClosed { day: self.day }),
                _ => None,
            };
        }
        if self.employee_id == CLOSE_EARLY {
            return self.custom_end_time.map(|close_min| Override::EarlyClose {
                day: self.day,
                close_min,
            });
        }
        match self.kind.as_str() {
            "exclude" => Some(Override::Exclude {
                employee_id: self.employee_id.clone(),
                day: self.day,
                shift_type,
            }),
            "assign" => Some(Override::Assign {
                employee_id: self.employee_id.clone(),
                day: self.day,
                shift_type,
            }),
            "custom_time" => Some(Override::CustomTime {
                employee_id: self.employee_id.clone(),
                day: self.day,
                shift_type,
                start_min: self.custom_start_time,
                end_min: self.custom_end_time,
            }),
            "prioritize" => Some(Override::Prioritize {
                employee_id: self.employee_id.clone(),
                day: self.day,
                shift_type,
            }),
            _ => None,
        }
    }
}

/// Classifies a merged raw override list, preserving insertion order.
///
/// Unclassifiable entries are dropped; the engine's verification pass
/// only ever sees rules that classified.
pub fn classify_overrides(raw: &[RawOverride]) -> Vec<Override> {
    raw.iter().filter_map(RawOverride::classify).collect()
}

/// A user-pinned assignment that must survive regeneration while it
/// stays compatible with current closures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockedShift {
    pub employee_id: String,
    pub day: Day,
    #[serde(default)]
    pub shift_type: ShiftType,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(kind: &str, employee: &str, day: Day) -> RawOverride {
        RawOverride {
            kind: kind.into(),
            employee_id: employee.into(),
            day,
            shift_type: None,
            custom_start_time: None,
            custom_end_time: None,
        }
    }

    #[test]
    fn test_classify_business_closed() {
        let o = raw("exclude", ALL_EMPLOYEES, Day::Wednesday).classify();
        assert_eq!(o, Some(Override::BusinessClosed { day: Day::Wednesday }));
    }

    #[test]
    fn test_classify_early_close() {
        let mut r = raw("custom_time", CLOSE_EARLY, Day::Friday);
        r.custom_end_time = Some(1260); // 21:00
        assert_eq!(
            r.classify(),
            Some(Override::EarlyClose {
                day: Day::Friday,
                close_min: 1260
            })
        );
        // Early close without a cutoff does not classify
        assert_eq!(raw("custom_time", CLOSE_EARLY, Day::Friday).classify(), None);
    }

    #[test]
    fn test_classify_employee_rules() {
        let mut r = raw("assign", "E1", Day::Monday);
        r.shift_type = Some(ShiftType::Night);
        assert_eq!(
            r.classify(),
            Some(Override::Assign {
                employee_id: "E1".into(),
                day: Day::Monday,
                shift_type: ShiftType::Night,
            })
        );
        // Missing shift type defaults to Any
        let o = raw("prioritize", "E2", Day::Tuesday).classify().unwrap();
        assert_eq!(
            o,
            Override::Prioritize {
                employee_id: "E2".into(),
                day: Day::Tuesday,
                shift_type: ShiftType::Any,
            }
        );
    }

    #[test]
    fn test_classify_unknown_kind_dropped() {
        assert_eq!(raw("promote", "E1", Day::Monday).classify(), None);
        let list = vec![
            raw("exclude", "E1", Day::Monday),
            raw("promote", "E1", Day::Monday),
            raw("assign", "E2", Day::Tuesday),
        ];
        assert_eq!(classify_overrides(&list).len(), 2);
    }

    #[test]
    fn test_raw_override_wire_shape() {
        let json = serde_json::json!({
            "type": "custom_time",
            "employeeId": "E1",
            "day": "thursday",
            "customEndTime": "15:00"
        });
        let r: RawOverride = serde_json::from_value(json).unwrap();
        assert_eq!(r.custom_end_time, Some(900));
        match r.classify().unwrap() {
            Override::CustomTime {
                employee_id,
                end_min,
                start_min,
                ..
            } => {
                assert_eq!(employee_id, "E1");
                assert_eq!(end_min, Some(900));
                assert_eq!(start_min, None);
            }
            other => panic!("unexpected classification: {other:?}"),
        }
    }

    #[test]
    fn test_override_accessors() {
        let o = Override::BusinessClosed { day: Day::Sunday };
        assert_eq!(o.day(), Day::Sunday);
        assert!(o.employee_id().is_none());
        assert!(o.is_business_wide());

        let a = Override::Assign {
            employee_id: "E1".into(),
            day: Day::Friday,
            shift_type: ShiftType::Any,
        };
        assert_eq!(a.employee_id(), Some("E1"));
        assert!(!a.is_business_wide());
    }
}
