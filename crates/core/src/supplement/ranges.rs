//! Multi-day spans: explicit date ranges in the text and model `end_date`s

use std::ops::Range;

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use yotei_domain::TimeSlot;

use super::{template_of, templated_slot, window_from_text, SupplementContext, SupplementStep};
use crate::utils::temporal::{
    add_days, expand_days, resolve_bare_day, resolve_month_day, resolve_relative_day,
};

macro_rules! range_sep {
    () => {
        r"\s*(?:[-〜~～－ー−―]|から)\s*"
    };
}

lazy_static! {
    /// `12/5-12/8`, `12/5〜8日`
    static ref SLASH_RANGE: Regex = Regex::new(concat!(
        r"(?P<m1>\d{1,2})/(?P<d1>\d{1,2})",
        range_sep!(),
        r"(?:(?P<m2>\d{1,2})/(?P<d2>\d{1,2})|(?P<d2only>\d{1,2})日)"
    ))
    .expect("static pattern");

    /// `12月5日〜12月8日`, `12月5日から8日`
    static ref KANJI_RANGE: Regex = Regex::new(concat!(
        r"(?P<m1>\d{1,2})月(?P<d1>\d{1,2})日",
        range_sep!(),
        r"(?:(?P<m2>\d{1,2})月)?(?P<d2>\d{1,2})日"
    ))
    .expect("static pattern");

    /// `今日から3日間`, `明日から2週間`
    static ref RELATIVE_SPAN: Regex = Regex::new(
        r"(?P<anchor>今日|本日|明後日|明日)から\s*(?P<n>\d{1,2})\s*(?P<unit>日間|週間)"
    )
    .expect("static pattern");
}

/// An explicit span of dates found in text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    /// Every day of the range, inclusive.
    pub days: Vec<NaiveDate>,
    /// Byte range of the range expression.
    pub span: Range<usize>,
}

/// First explicit date range in `text`.
pub fn find_date_range(text: &str, today: NaiveDate) -> Option<DateRange> {
    let slash = SLASH_RANGE.captures_iter(text).find_map(|caps| slash_range(&caps, today));
    let kanji = KANJI_RANGE.captures_iter(text).find_map(|caps| kanji_range(&caps, today));
    let relative = RELATIVE_SPAN.captures_iter(text).find_map(|caps| relative_span(&caps, today));

    [slash, kanji, relative].into_iter().flatten().min_by_key(|range| range.span.start)
}

fn slash_range(caps: &Captures<'_>, today: NaiveDate) -> Option<DateRange> {
    let start = resolve_month_day(today, caps["m1"].parse().ok()?, caps["d1"].parse().ok()?)?;
    let end = match (caps.name("m2"), caps.name("d2"), caps.name("d2only")) {
        (Some(m), Some(d), _) => resolve_month_day(start, m.as_str().parse().ok()?, d.as_str().parse().ok()?)?,
        (_, _, Some(d)) => resolve_bare_day(start, d.as_str().parse().ok()?)?,
        _ => return None,
    };
    Some(DateRange { days: expand_days(start, end)?, span: caps.get(0)?.range() })
}

fn kanji_range(caps: &Captures<'_>, today: NaiveDate) -> Option<DateRange> {
    let start = resolve_month_day(today, caps["m1"].parse().ok()?, caps["d1"].parse().ok()?)?;
    let day: u32 = caps["d2"].parse().ok()?;
    let end = match caps.name("m2") {
        Some(m) => resolve_month_day(start, m.as_str().parse().ok()?, day)?,
        None => resolve_bare_day(start, day)?,
    };
    Some(DateRange { days: expand_days(start, end)?, span: caps.get(0)?.range() })
}

fn relative_span(caps: &Captures<'_>, today: NaiveDate) -> Option<DateRange> {
    let start = resolve_relative_day(today, &caps["anchor"])?;
    let count: i64 = caps["n"].parse().ok().filter(|n| *n > 0)?;
    let days = if &caps["unit"] == "週間" { count * 7 } else { count };
    let end = add_days(start, days - 1)?;
    Some(DateRange { days: expand_days(start, end)?, span: caps.get(0)?.range() })
}

/// Step 1: an explicit date range replaces the slot list with one slot per
/// day, each carrying the first slot's title/description.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExplicitDateRange;

impl SupplementStep for ExplicitDateRange {
    fn name(&self) -> &'static str {
        "explicit_date_range"
    }

    fn apply(&self, slots: Vec<TimeSlot>, ctx: &SupplementContext<'_>) -> Vec<TimeSlot> {
        let Some(range) = find_date_range(ctx.text, ctx.today) else {
            return slots;
        };
        let remainder = format!("{} {}", &ctx.text[..range.span.start], &ctx.text[range.span.end..]);
        let window = window_from_text(&remainder);
        let template = template_of(&slots);

        range.days.into_iter().map(|day| templated_slot(day, window, &template)).collect()
    }
}

/// Step 2: a slot with `end_date` becomes one slot per day, inheriting the
/// window (or the text's window when untimed).
#[derive(Debug, Default, Clone, Copy)]
pub struct ExpandEndDates;

impl SupplementStep for ExpandEndDates {
    fn name(&self) -> &'static str {
        "expand_end_dates"
    }

    fn apply(&self, slots: Vec<TimeSlot>, ctx: &SupplementContext<'_>) -> Vec<TimeSlot> {
        let mut out = Vec::with_capacity(slots.len());
        for slot in slots {
            let Some(end_date) = slot.end_date else {
                out.push(slot);
                continue;
            };
            let slot = TimeSlot { end_date: None, ..slot };
            let Some(days) = expand_days(slot.date, end_date) else {
                out.push(slot);
                continue;
            };
            let slot = if slot.is_untimed() {
                let (start, end) = window_from_text(ctx.text);
                TimeSlot { start_time: Some(start), end_time: Some(end), ..slot }
            } else {
                slot
            };
            out.extend(days.into_iter().map(|date| TimeSlot { date, ..slot.clone() }));
        }
        out
    }
}
