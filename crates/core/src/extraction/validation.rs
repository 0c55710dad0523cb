//! Post-validation of a model reply
//!
//! Turns loosely typed [`RawExtraction`] candidates into [`TimeSlot`]s and
//! applies the corrections that hold regardless of how the model read the
//! text: open-ended `以降`/`以前` windows, all-day suppression, duration-only
//! requests and missing end times.

use chrono::{NaiveDate, NaiveTime};
use yotei_domain::constants::{
    ALL_DAY_KEYWORD, BUSINESS_DAY_END, BUSINESS_DAY_START, DEFAULT_EVENT_DURATION_MINUTES,
    MAX_MEETING_DURATION_HOURS,
};
use yotei_domain::utils::clock_time::{add_minutes_clamped, clock_pair, end_of_day, parse_clock};
use yotei_domain::utils::title::normalize_text;
use yotei_domain::{CandidateSlot, ExtractionResult, RawExtraction, TaskType, TimeSlot};

use crate::utils::patterns::{
    find_after_point, find_before_point, find_duration_hours, has_clock_expression,
};
use crate::utils::temporal::parse_model_date;

/// Validated result plus a reason for every candidate that was dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated {
    /// Slots that survived validation.
    pub result: ExtractionResult,
    /// One reason per rejected candidate.
    pub dropped: Vec<String>,
}

/// Facts about the user's text that override model output.
#[derive(Debug, Clone, Copy)]
struct TextRules {
    after: Option<NaiveTime>,
    before: Option<NaiveTime>,
    all_day_requested: bool,
    duration_only: bool,
}

impl TextRules {
    fn from_text(text: &str) -> Self {
        Self {
            after: find_after_point(text),
            before: find_before_point(text),
            all_day_requested: text.contains(ALL_DAY_KEYWORD),
            duration_only: find_duration_hours(text).is_some() && !has_clock_expression(text),
        }
    }
}

/// Validate `raw` against the (normalized) user text.
///
/// The classifier's `intent` always wins over the model's `task_type`.
pub fn validate_extraction(
    raw: RawExtraction,
    text: &str,
    intent: TaskType,
    today: NaiveDate,
) -> Validated {
    let rules = TextRules::from_text(text);
    let meeting_duration_hours = raw
        .meeting_duration_hours
        .filter(|hours| hours.is_finite() && *hours > 0.0 && *hours <= MAX_MEETING_DURATION_HOURS);
    let default_minutes = meeting_duration_hours
        .map(|hours| (hours * 60.0).round() as i64)
        .filter(|minutes| *minutes > 0)
        .unwrap_or(DEFAULT_EVENT_DURATION_MINUTES);

    let mut slots = Vec::with_capacity(raw.dates.len());
    let mut dropped = Vec::new();
    for candidate in &raw.dates {
        match validate_candidate(candidate, &rules, today, default_minutes) {
            Ok(slot) => slots.push(slot),
            Err(reason) => dropped.push(reason),
        }
    }

    let result = ExtractionResult {
        intent,
        slots,
        location: normalize_text(raw.location.as_deref()),
        counterpart_location: normalize_text(raw.counterpart_location.as_deref()),
        meeting_duration_hours,
    };
    Validated { result, dropped }
}

fn validate_candidate(
    candidate: &CandidateSlot,
    rules: &TextRules,
    today: NaiveDate,
    default_minutes: i64,
) -> Result<TimeSlot, String> {
    let raw_date = candidate.date.as_deref().unwrap_or_default();
    let date = parse_model_date(raw_date, today)
        .ok_or_else(|| format!("unparseable date '{raw_date}'"))?;

    let end_date = candidate
        .end_date
        .as_deref()
        .and_then(|raw| parse_model_date(raw, today))
        .filter(|end| *end > date);

    let mut start = candidate.time.as_deref().and_then(parse_clock);
    let mut end = candidate.end_time.as_deref().and_then(parse_clock);

    if rules.duration_only {
        start = Some(clock_pair(BUSINESS_DAY_START));
        end = Some(clock_pair(BUSINESS_DAY_END));
    } else if let Some(after) = rules.after.filter(|x| start.is_none() || start == Some(*x)) {
        start = Some(after);
        end = Some(end_of_day());
    } else if let Some(before) = rules.before.filter(|x| end.is_none() || end == Some(*x)) {
        let opening = clock_pair(BUSINESS_DAY_START);
        let default_start = if before > opening { opening } else { NaiveTime::MIN };
        start = Some(start.filter(|s| *s < before).unwrap_or(default_start));
        end = Some(before);
    }

    if start == Some(NaiveTime::MIN) && end == Some(end_of_day()) && !rules.all_day_requested {
        start = Some(clock_pair(BUSINESS_DAY_START));
        end = Some(clock_pair(BUSINESS_DAY_END));
    }

    if let Some(s) = start {
        if end.map_or(true, |e| e <= s) {
            end = Some(add_minutes_clamped(s, default_minutes)).filter(|e| *e > s);
        }
    }

    Ok(TimeSlot {
        date,
        start_time: start,
        end_time: end,
        end_date,
        title: normalize_text(candidate.title.as_deref()),
        description: normalize_text(candidate.description.as_deref()),
    })
}
