//! Wall-clock helpers shared by the slot types and the pipeline.
//!
//! Every time on the wire is `HH:MM`. Incoming values from the language model
//! are much looser (`9:00`, `09:00:00`, `2025-01-10T09:00:00+09:00`, `24:00`),
//! so parsing is lenient while formatting is strict.

use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};

use crate::constants::{ALL_DAY_END, WIRE_TIME_FORMAT};

/// Build a wall-clock time, clamping out-of-range components.
#[must_use]
pub fn clock(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour.min(23), minute.min(59), 0).unwrap_or(NaiveTime::MIN)
}

/// Build a wall-clock time from a `(hour, minute)` constant.
#[must_use]
pub fn clock_pair((hour, minute): (u32, u32)) -> NaiveTime {
    clock(hour, minute)
}

/// `23:59`, the last representable minute of a day.
#[must_use]
pub fn end_of_day() -> NaiveTime {
    clock_pair(ALL_DAY_END)
}

/// Convert an hour-of-day (0..=24) into a time; `24` means end of day.
#[must_use]
pub fn hour_to_clock(hour: u32, minute: u32) -> Option<NaiveTime> {
    match hour {
        24 if minute == 0 => Some(end_of_day()),
        0..=23 if minute < 60 => Some(clock(hour, minute)),
        _ => None,
    }
}

/// Format as `HH:MM`.
#[must_use]
pub fn format_clock(time: NaiveTime) -> String {
    time.format(WIRE_TIME_FORMAT).to_string()
}

/// Parse a loosely formatted wall-clock time.
///
/// Accepts `H:MM`, `HH:MM`, `HH:MM:SS`, ISO-8601 date-times (with or without
/// offset) and `24:00`, which clamps to `23:59`. Seconds are discarded.
#[must_use]
pub fn parse_clock(raw: &str) -> Option<NaiveTime> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Some(time) = parse_iso_datetime_time(value) {
        return Some(time);
    }

    let mut parts = value.split(':');
    let hour: u32 = parts.next()?.trim().parse().ok()?;
    let minute: u32 = match parts.next() {
        Some(m) => m.trim().parse().ok()?,
        None => return None,
    };
    if let Some(seconds) = parts.next() {
        seconds.trim().parse::<u32>().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }

    hour_to_clock(hour, minute)
}

fn parse_iso_datetime_time(value: &str) -> Option<NaiveTime> {
    if !value.contains('T') {
        return None;
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(value) {
        return Some(truncate_seconds(dt.time()));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M"))
        .ok()
        .map(|dt| truncate_seconds(dt.time()))
}

fn truncate_seconds(time: NaiveTime) -> NaiveTime {
    clock(time.hour(), time.minute())
}

/// Add minutes without wrapping past midnight; saturates at `23:59`.
#[must_use]
pub fn add_minutes_clamped(time: NaiveTime, minutes: i64) -> NaiveTime {
    let Some(delta) = Duration::try_minutes(minutes) else {
        return if minutes > 0 { end_of_day() } else { NaiveTime::MIN };
    };
    let (shifted, overflow) = time.overflowing_add_signed(delta);
    if overflow > 0 || (minutes > 0 && shifted < time) {
        end_of_day()
    } else {
        shifted
    }
}

/// Subtract minutes without wrapping before midnight; saturates at `00:00`.
#[must_use]
pub fn sub_minutes_clamped(time: NaiveTime, minutes: i64) -> NaiveTime {
    let Some(delta) = Duration::try_minutes(minutes) else {
        return if minutes > 0 { NaiveTime::MIN } else { end_of_day() };
    };
    let (shifted, overflow) = time.overflowing_sub_signed(delta);
    if overflow != 0 || (minutes > 0 && shifted > time) {
        NaiveTime::MIN
    } else {
        shifted
    }
}

/// Serde adapter for `Option<NaiveTime>` as `HH:MM`.
pub mod option_hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{format_clock, parse_clock};

    /// Serialize as `"HH:MM"`; callers skip `None`.
    pub fn serialize<S>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(time) => serializer.serialize_str(&format_clock(*time)),
            None => serializer.serialize_none(),
        }
    }

    /// Lenient: empty or unparseable strings become `None`.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse_clock))
    }
}
