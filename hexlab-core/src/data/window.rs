//! Request window padding.
//!
//! Six trading sessions need more than six calendar days once weekends and
//! holidays are counted, so requests reach back a fixed number of calendar days.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Calendar days fetched before the reference date.
pub const DEFAULT_LOOKBACK_DAYS: u32 = 40;

/// Inclusive date window for a provider request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FetchWindow {
    /// `[reference - lookback_days, reference]`, the reference day included.
    pub fn ending_at(reference: NaiveDate, lookback_days: u32) -> Self {
        Self {
            start: reference - Duration::days(i64::from(lookback_days)),
            end: reference,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}
