//! Staffing requirements for a week.
//!
//! Two forms are accepted. The canonical modern form is a per-day list
//! of [`SlotSpec`]s, each a labeled time window needing exactly one
//! employee. The legacy form is morning/night headcounts with shared
//! day-level times, consulted only when a day has no slots. Absent
//! both, the engine degrades to a hard-coded default template.
//!
//! Slot identity is stable within a day for the life of a week's draft:
//! recomputing a schedule must not change unrelated slots' identities,
//! which is why each slot carries a caller-assigned `id`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::time::{serde_hhmm, serde_hhmm_opt, Day, Minutes};

/// One staffing requirement: a labeled window needing one employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotSpec {
    /// Stable identifier within the day.
    pub id: String,
    /// Window start.
    #[serde(with = "serde_hhmm")]
    pub start_min: Minutes,
    /// Window end.
    #[serde(with = "serde_hhmm")]
    pub end_min: Minutes,
    /// Free-text label shown on the roster.
    #[serde(default)]
    pub label: String,
}

impl SlotSpec {
    /// Creates a slot.
    pub fn new(id: impl Into<String>, start_min: Minutes, end_min: Minutes) -> Self {
        Self {
            id: id.into(),
            start_min,
            end_min,
            label: String::new(),
        }
    }

    /// Sets the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

/// Legacy morning/night headcount form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LegacyCounts {
    /// Employees needed on the morning shift.
    #[serde(default)]
    pub morning: u32,
    /// Employees needed on the night shift.
    #[serde(default)]
    pub night: u32,
    #[serde(default, with = "serde_hhmm_opt")]
    pub morning_start: Option<Minutes>,
    #[serde(default, with = "serde_hhmm_opt")]
    pub morning_end: Option<Minutes>,
    #[serde(default, with = "serde_hhmm_opt")]
    pub night_start: Option<Minutes>,
    #[serde(default, with = "serde_hhmm_opt")]
    pub night_end: Option<Minutes>,
}

/// Staffing requirement for one day: slots, legacy counts, or neither.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DayStaffing {
    /// Modern slot list. Non-empty wins over `legacy`.
    #[serde(default)]
    pub slots: Vec<SlotSpec>,
    /// Legacy counts, used only when `slots` is empty.
    #[serde(default)]
    pub legacy: Option<LegacyCounts>,
}

impl DayStaffing {
    /// A day staffed by slots.
    pub fn from_slots(slots: Vec<SlotSpec>) -> Self {
        Self {
            slots,
            legacy: None,
        }
    }

    /// A day staffed by legacy counts.
    pub fn from_legacy(legacy: LegacyCounts) -> Self {
        Self {
            slots: Vec::new(),
            legacy: Some(legacy),
        }
    }

    /// Whether this day declares any staffing at all.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty() && self.legacy.is_none()
    }
}

/// Staffing requirements for a whole week.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeekStaffing {
    /// Per-day requirements. Missing day = use the fallback template.
    #[serde(default)]
    pub days: HashMap<Day, DayStaffing>,
}

impl WeekStaffing {
    /// Creates an empty week (every day falls back to the template).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets one day's staffing.
    pub fn with_day(mut self, day: Day, staffing: DayStaffing) -> Self {
        self.days.insert(day, staffing);
        self
    }

    /// The staffing declared for `day`, if any.
    pub fn day(&self, day: Day) -> Option<&DayStaffing> {
        self.days.get(&day)
    }
}
