//! Pure string utilities for slot titles and descriptions

use chrono::{NaiveDate, NaiveTime};

use crate::constants::{PLACEHOLDER_TITLE_PREFIX, PLACEHOLDER_TITLE_SUFFIX, WIRE_DATE_FORMAT};
use crate::utils::clock_time::format_clock;

/// Synthesized title for an event whose content is unknown.
///
/// # Examples
///
/// ```
/// use chrono::{NaiveDate, NaiveTime};
/// use yotei_domain::utils::title::placeholder_title;
///
/// let date = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
/// let start = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
/// let end = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
/// assert_eq!(placeholder_title(date, start, end), "予定（2025-01-10 09:00〜10:00）");
/// ```
#[must_use]
pub fn placeholder_title(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> String {
    format!(
        "{PLACEHOLDER_TITLE_PREFIX}{} {}〜{}{PLACEHOLDER_TITLE_SUFFIX}",
        date.format(WIRE_DATE_FORMAT),
        format_clock(start),
        format_clock(end)
    )
}

/// True when `title` was produced by [`placeholder_title`].
#[must_use]
pub fn is_placeholder_title(title: &str) -> bool {
    title.starts_with(PLACEHOLDER_TITLE_PREFIX)
        && title.ends_with(PLACEHOLDER_TITLE_SUFFIX)
        && title.contains('〜')
}

/// Trim and drop empty strings.
#[must_use]
pub fn normalize_text(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|s| !s.is_empty()).map(ToString::to_string)
}
