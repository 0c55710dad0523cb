//! Time slots: one concrete, bounded interval on one calendar date

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::constants::{OUTBOUND_TRAVEL_LABEL, RETURN_TRAVEL_LABEL};
use crate::utils::clock_time::{end_of_day, option_hhmm};
use crate::utils::title::is_placeholder_title;

/// One date plus a start/end interval the user referenced.
///
/// Candidates coming out of extraction may lack times or carry an `end_date`;
/// after supplementation every slot has both times and no `end_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Calendar day of the slot.
    pub date: NaiveDate,

    /// Start, serialized as `time`.
    #[serde(
        rename = "time",
        with = "option_hhmm",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub start_time: Option<NaiveTime>,

    /// End of the window; later than `start_time` once filled.
    #[serde(with = "option_hhmm", default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveTime>,

    /// Inclusive last day of a multi-day candidate. Always expanded away.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,

    /// Event title; `add_event` only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Free-form note, or the event a travel buffer belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TimeSlot {
    /// A slot on `date` with nothing else known yet.
    #[must_use]
    pub const fn on(date: NaiveDate) -> Self {
        Self {
            date,
            start_time: None,
            end_time: None,
            end_date: None,
            title: None,
            description: None,
        }
    }

    /// A slot on `date` covering `start..end`.
    #[must_use]
    pub const fn window(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            date,
            start_time: Some(start),
            end_time: Some(end),
            end_date: None,
            title: None,
            description: None,
        }
    }

    /// Builder-style title setter.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Builder-style description setter.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Both ends known.
    #[must_use]
    pub const fn has_window(&self) -> bool {
        self.start_time.is_some() && self.end_time.is_some()
    }

    /// Neither end known.
    #[must_use]
    pub const fn is_untimed(&self) -> bool {
        self.start_time.is_none() && self.end_time.is_none()
    }

    /// `00:00–23:59`.
    #[must_use]
    pub fn is_all_day(&self) -> bool {
        self.start_time == Some(NaiveTime::MIN) && self.end_time == Some(end_of_day())
    }

    /// Synthetic travel slot produced by the augmenter.
    #[must_use]
    pub fn is_travel_buffer(&self) -> bool {
        matches!(self.title.as_deref(), Some(OUTBOUND_TRAVEL_LABEL | RETURN_TRAVEL_LABEL))
    }

    /// Title was synthesized rather than taken from the user's words.
    #[must_use]
    pub fn has_synthesized_title(&self) -> bool {
        self.title.as_deref().is_some_and(is_placeholder_title)
    }

    /// Identity used for deduplication.
    #[must_use]
    pub const fn key(&self) -> SlotKey {
        SlotKey { date: self.date, start: self.start_time, end: self.end_time }
    }
}

/// `(date, start, end)`; two slots with the same key are duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey {
    /// Day.
    pub date: NaiveDate,
    /// Start time, if known.
    pub start: Option<NaiveTime>,
    /// End time, if known.
    pub end: Option<NaiveTime>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::utils::clock_time::clock;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, day).unwrap()
    }

    #[test]
    fn serializes_wire_shape() {
        let slot = TimeSlot::window(d(7, 10), clock(9, 0), clock(10, 0));
        let value = serde_json::to_value(&slot).unwrap();
        assert_eq!(value, json!({"date": "2025-07-10", "time": "09:00", "end_time": "10:00"}));
    }

    #[test]
    fn deserializes_lenient_candidate() {
        let slot: TimeSlot = serde_json::from_value(json!({
            "date": "2025-07-10",
            "time": "",
            "end_time": "24:00",
            "title": "会議"
        }))
        .unwrap();
        assert_eq!(slot.start_time, None);
        assert_eq!(slot.end_time, Some(end_of_day()));
        assert_eq!(slot.title.as_deref(), Some("会議"));
    }

    #[test]
    fn all_day_and_buffer_detection() {
        assert!(TimeSlot::window(d(1, 1), NaiveTime::MIN, end_of_day()).is_all_day());
        assert!(!TimeSlot::window(d(1, 1), clock(9, 0), end_of_day()).is_all_day());
        let buffer =
            TimeSlot::window(d(1, 1), clock(8, 0), clock(9, 0)).with_title(OUTBOUND_TRAVEL_LABEL);
        assert!(buffer.is_travel_buffer());
    }
}
