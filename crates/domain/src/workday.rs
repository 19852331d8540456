//! Work-day records and the busyness query filter.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::UserId;

/// A persisted work-day row linking a user to a calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkDay {
    /// Owning user.
    pub user_id: UserId,
    /// Calendar date the entry covers.
    pub date: NaiveDate,
    /// Whether the user marked the date as a day off.
    pub day_off: bool,
}

/// Payload for marking a single working day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkdayEntry {
    /// Calendar date to mark.
    pub date: NaiveDate,
    /// Whether the date is a day off.
    pub day_off: bool,
}

/// Query parameters for the busyness lookup.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusynessFilter {
    /// Start of the work-day date range (inclusive).
    pub from: Option<NaiveDate>,
    /// End of the work-day date range (inclusive).
    pub to: Option<NaiveDate>,
    /// Restrict to users playing this instrument. When absent, no instrument
    /// constraint applies.
    pub musical_instrument: Option<String>,
    /// Exact account type to match.
    pub user_type: String,
    /// Exact day-off flag to match on work-day rows.
    pub day_off: bool,
}

impl BusynessFilter {
    /// Resolves the date range, defaulting to a 2-day window centered on
    /// `today` (yesterday through tomorrow, inclusive).
    #[must_use]
    pub fn window(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let from = self
            .from
            .unwrap_or_else(|| today.checked_sub_days(Days::new(1)).unwrap_or(today));
        let to = self
            .to
            .unwrap_or_else(|| today.checked_add_days(Days::new(1)).unwrap_or(today));
        (from, to)
    }
}
