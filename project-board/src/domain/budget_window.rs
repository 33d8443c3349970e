use time::{OffsetDateTime, UtcOffset};

/// The time range a project's activities are summed over.
///
/// Windows are open-ended: they run from `start` until now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetWindow {
    pub start: OffsetDateTime,
    /// Whether the backend should compare with `>=` against `start`.
    pub inclusive_from: bool,
}

impl BudgetWindow {
    /// Window starting at 00:00:00 UTC on the first day of the UTC month containing `instant`.
    pub fn month_of(instant: OffsetDateTime, inclusive_from: bool) -> Self {
        let utc = instant.to_offset(UtcOffset::UTC);
        // Day 1 exists in every month.
        let first_of_month = utc.date().replace_day(1).unwrap_or(utc.date());

        Self {
            start: first_of_month.midnight().assume_utc(),
            inclusive_from,
        }
    }

    pub fn start_millis(&self) -> i128 {
        self.start.unix_timestamp_nanos() / 1_000_000
    }

    /// Encodes the window the way the activity endpoint expects it, e.g. `gte:1709251200000`.
    pub fn as_query_value(&self) -> String {
        if self.inclusive_from {
            format!("gte:{}", self.start_millis())
        } else {
            self.start_millis().to_string()
        }
    }
}
