//! Calendar projection of coverage durations.

use chrono::{NaiveDate, TimeDelta};

use treasury_common::types::Coverage;

/// Display format for projected dates, e.g. `Jan 05, 2027`.
pub const DATE_FORMAT: &str = "%b %d, %Y";

const SECONDS_PER_DAY: f64 = 86_400.0;

/// The date `days` (fractional) after `today`.
///
/// Returns `None` for unreachable coverage or offsets outside chrono's
/// calendar range.
pub fn projected_coverage_date(today: NaiveDate, days: Coverage) -> Option<NaiveDate> {
    let days = days.finite()?;
    if !days.is_finite() {
        return None;
    }

    let seconds = (days * SECONDS_PER_DAY).round();
    if seconds.abs() >= i64::MAX as f64 {
        return None;
    }
    let offset = TimeDelta::try_seconds(seconds as i64)?;

    today
        .and_hms_opt(0, 0, 0)?
        .checked_add_signed(offset)
        .map(|when| when.date())
}

/// Format an optional projected date, or `fallback` when there is none.
pub fn format_projected(date: Option<NaiveDate>, fallback: &str) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| fallback.to_string())
}
