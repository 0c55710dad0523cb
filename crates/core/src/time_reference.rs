//! Time reference resolution
//!
//! Every relative expression in a request ("明日", "来週", "1月") is resolved
//! against one [`TimeReference`], sampled once when the request starts.

use std::sync::Arc;

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;
use yotei_domain::constants::PROMPT_DATETIME_FORMAT;
use yotei_domain::{Result, YoteiError};

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Wall clock of the host.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at one instant. Used by tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// "Now" in the target timezone, immutable for the lifetime of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeReference {
    now: DateTime<Tz>,
}

impl TimeReference {
    /// Reference pinned to `now`.
    pub const fn new(now: DateTime<Tz>) -> Self {
        Self { now }
    }

    /// The sampled instant.
    pub const fn now(&self) -> DateTime<Tz> {
        self.now
    }

    /// Local calendar date of the instant.
    pub fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }

    /// Timezone the instant was resolved in.
    pub fn timezone(&self) -> Tz {
        self.now.timezone()
    }

    /// `2025-01-10T09:30:00+0900`
    pub fn prompt_timestamp(&self) -> String {
        self.now.format(PROMPT_DATETIME_FORMAT).to_string()
    }

    /// Japanese weekday name of today, e.g. `金曜日`.
    pub fn weekday_label(&self) -> &'static str {
        weekday_label(self.now.weekday())
    }
}

const fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "月曜日",
        Weekday::Tue => "火曜日",
        Weekday::Wed => "水曜日",
        Weekday::Thu => "木曜日",
        Weekday::Fri => "金曜日",
        Weekday::Sat => "土曜日",
        Weekday::Sun => "日曜日",
    }
}

/// Produces a [`TimeReference`] per request from a clock and a timezone.
#[derive(Clone)]
pub struct TimeReferenceResolver {
    clock: Arc<dyn Clock>,
    timezone: Tz,
}

impl TimeReferenceResolver {
    /// Resolver reading `clock` in `timezone`.
    pub fn new(clock: Arc<dyn Clock>, timezone: Tz) -> Self {
        Self { clock, timezone }
    }

    /// Build from an IANA timezone name.
    ///
    /// # Errors
    /// Returns `YoteiError::Config` when the name is not a known timezone.
    pub fn from_timezone_name(clock: Arc<dyn Clock>, name: &str) -> Result<Self> {
        let timezone: Tz = name
            .trim()
            .parse()
            .map_err(|e| YoteiError::Config(format!("Unknown timezone '{name}': {e}")))?;
        Ok(Self::new(clock, timezone))
    }

    /// Timezone every reference is resolved in.
    pub const fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Sample the clock once.
    pub fn resolve(&self) -> TimeReference {
        TimeReference::new(self.clock.now_utc().with_timezone(&self.timezone))
    }
}
