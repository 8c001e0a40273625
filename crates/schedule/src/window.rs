use chrono::{Duration, NaiveDateTime, Timelike};

use linkmill_core::TIMESTAMP_FORMAT;

/// Half-open interval `[since, until)` a caller should query on a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub since: NaiveDateTime,
    pub until: NaiveDateTime,
}

impl Window {
    /// Both bounds in the fixed `YYYY-MM-DDTHH:MM:SS` layout.
    pub fn format(&self) -> (String, String) {
        (
            self.since.format(TIMESTAMP_FORMAT).to_string(),
            self.until.format(TIMESTAMP_FORMAT).to_string(),
        )
    }
}

/// Build the look-back window ending at `now`.
///
/// Returns `None` when `lookback_minutes` is zero — the "do not poll this
/// service now" signal. Sub-second precision on `now` is dropped before the
/// arithmetic so both bounds serialize cleanly at second precision.
pub fn build_window(now: NaiveDateTime, lookback_minutes: u32) -> Option<Window> {
    if lookback_minutes == 0 {
        return None;
    }
    let until = now.with_nanosecond(0).unwrap_or(now);
    let since = until - Duration::minutes(i64::from(lookback_minutes));
    Some(Window { since, until })
}
