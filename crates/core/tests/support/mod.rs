//! Shared test helpers for `yotei-core` integration tests.
//!
//! Scripted model ports, a recording observer and a fixed clock so pipeline
//! tests can focus on behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod models;

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use yotei_core::{FixedClock, TimeReference, TimeReferenceResolver};

/// Resolver frozen at `date` 10:00 Tokyo time.
pub fn tokyo_resolver(date: NaiveDate) -> TimeReferenceResolver {
    let instant = Utc
        .from_utc_datetime(&date.and_hms_opt(1, 0, 0).unwrap());
    TimeReferenceResolver::from_timezone_name(Arc::new(FixedClock(instant)), "Asia/Tokyo").unwrap()
}

pub fn tokyo_reference(date: NaiveDate) -> TimeReference {
    tokyo_resolver(date).resolve()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
