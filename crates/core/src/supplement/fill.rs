//! Missing-time fill
//!
//! Slots without a complete window are patched by the first matching rule:
//!
//! | rule            | trigger                                  | window                 |
//! |-----------------|------------------------------------------|------------------------|
//! | `explicit_range`| time range for the slot's date, or any   | that range             |
//! | `open_ended`    | `H時以降` / `H時以前`                     | `H–23:59` / `09:00–H`  |
//! | `all_day`       | `終日`                                   | `00:00–23:59`          |
//! | `lunch`         | lunch keywords                           | `11:00–14:00`          |
//! | `relative_day`  | `今日`/`明日`/weekday/`この日`            | point +1h, else 09–18  |
//! | `week_reference`| `今週`/`来週`/`再来週`, slot without times | seven days, 09–18      |
//! | `partial`       | start, end or a time point known         | ±1h                    |
//! | `business_day`  | always                                   | `09:00–18:00`          |

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveTime};
use yotei_domain::constants::{
    ALL_DAY_KEYWORD, BUSINESS_DAY_START, DEFAULT_EVENT_DURATION_MINUTES, LUNCH_KEYWORDS,
    LUNCH_WINDOW_END, LUNCH_WINDOW_START,
};
use yotei_domain::utils::clock_time::{
    add_minutes_clamped, clock_pair, end_of_day, sub_minutes_clamped,
};
use yotei_domain::TimeSlot;

use super::recovery::dated_ranges;
use super::weeks::week_slots;
use super::{business_hours, SupplementContext, SupplementStep};
use crate::utils::patterns::{
    find_after_point, find_before_point, find_time_point, find_time_range, has_clock_expression,
};
use crate::utils::temporal::{
    find_relative_date, find_relative_dates, find_week_reference, scan_date_tokens,
};

const THIS_DAY: &str = "この日";

/// Window (and optionally a corrected date) for one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillPatch {
    /// Corrected date, when the rule resolved one.
    pub date: Option<NaiveDate>,
    /// Window start.
    pub start: NaiveTime,
    /// Window end.
    pub end: NaiveTime,
}

/// What a fill rule does to one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    /// Set the slot's window (and maybe its date).
    Patch(FillPatch),
    /// Replace the slot with the week `offset` weeks from today.
    Week(i64),
}

impl Fill {
    const fn window((start, end): (NaiveTime, NaiveTime)) -> Self {
        Self::Patch(FillPatch { date: None, start, end })
    }
}

type FillRule = fn(&TimeSlot, &SupplementContext<'_>) -> Option<Fill>;

/// Fill rules in priority order.
pub const FILL_RULES: [(&str, FillRule); 8] = [
    ("explicit_range", explicit_range),
    ("open_ended", open_ended),
    ("all_day", all_day),
    ("lunch", lunch),
    ("relative_day", relative_day),
    ("week_reference", week_reference),
    ("partial", partial),
    ("business_day", business_day),
];

fn explicit_range(slot: &TimeSlot, ctx: &SupplementContext<'_>) -> Option<Fill> {
    let own = slot.description.as_deref().and_then(find_time_range);
    let dated = || {
        dated_ranges(ctx.text, ctx.today)
            .into_iter()
            .find(|(date, _)| *date == slot.date)
            .map(|(_, range)| range)
    };
    own.or_else(dated)
        .or_else(|| find_time_range(ctx.text))
        .map(|range| Fill::window((range.start, range.end)))
}

fn open_ended(_slot: &TimeSlot, ctx: &SupplementContext<'_>) -> Option<Fill> {
    if let Some(after) = find_after_point(ctx.text) {
        return Some(Fill::window((after, end_of_day())));
    }
    let before = find_before_point(ctx.text)?;
    let opening = clock_pair(BUSINESS_DAY_START);
    let start = if before > opening { opening } else { NaiveTime::MIN };
    (start < before).then_some(Fill::window((start, before)))
}

fn all_day(_slot: &TimeSlot, ctx: &SupplementContext<'_>) -> Option<Fill> {
    ctx.text
        .contains(ALL_DAY_KEYWORD)
        .then(|| Fill::window((NaiveTime::MIN, end_of_day())))
}

fn lunch(_slot: &TimeSlot, ctx: &SupplementContext<'_>) -> Option<Fill> {
    let lowered = ctx.text.to_lowercase();
    LUNCH_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
        .then(|| Fill::window((clock_pair(LUNCH_WINDOW_START), clock_pair(LUNCH_WINDOW_END))))
}

fn relative_day(slot: &TimeSlot, ctx: &SupplementContext<'_>) -> Option<Fill> {
    let dates = find_relative_dates(ctx.text, ctx.today);
    if dates.is_empty() && !ctx.text.contains(THIS_DAY) {
        return None;
    }
    let date = match dates.as_slice() {
        [(_, only)] if *only != slot.date => Some(*only),
        _ => None,
    };
    let (start, end) = partial_window(slot, find_time_point(ctx.text)).unwrap_or_else(business_hours);
    Some(Fill::Patch(FillPatch { date, start, end }))
}

fn week_reference(slot: &TimeSlot, ctx: &SupplementContext<'_>) -> Option<Fill> {
    if slot.start_time.is_some() || slot.end_time.is_some() {
        return None;
    }
    find_week_reference(ctx.text).map(Fill::Week)
}

fn partial(slot: &TimeSlot, ctx: &SupplementContext<'_>) -> Option<Fill> {
    partial_window(slot, find_time_point(ctx.text)).map(Fill::window)
}

fn business_day(_slot: &TimeSlot, _ctx: &SupplementContext<'_>) -> Option<Fill> {
    Some(Fill::window(business_hours()))
}

/// Complete a half-known window by one hour; `point` stands in when neither
/// end is known.
fn partial_window(slot: &TimeSlot, point: Option<NaiveTime>) -> Option<(NaiveTime, NaiveTime)> {
    match (slot.start_time, slot.end_time) {
        (Some(start), _) => {
            let end = add_minutes_clamped(start, DEFAULT_EVENT_DURATION_MINUTES);
            (end > start).then_some((start, end))
        }
        (None, Some(end)) => {
            let start = sub_minutes_clamped(end, DEFAULT_EVENT_DURATION_MINUTES);
            (start < end).then_some((start, end))
        }
        (None, None) => {
            let start = point?;
            let end = add_minutes_clamped(start, DEFAULT_EVENT_DURATION_MINUTES);
            (end > start).then_some((start, end))
        }
    }
}

/// First rule that yields a patch for `slot`, with the rule's name.
pub fn first_patch(slot: &TimeSlot, ctx: &SupplementContext<'_>) -> Option<(&'static str, Fill)> {
    FILL_RULES.iter().find_map(|(name, rule)| rule(slot, ctx).map(|patch| (*name, patch)))
}

/// A single slot for a message that names a time but the model returned
/// nothing. Several different dates are left to recovery.
fn seed_slot(ctx: &SupplementContext<'_>) -> Option<TimeSlot> {
    let open_ended = find_after_point(ctx.text).is_some() || find_before_point(ctx.text).is_some();
    if !has_clock_expression(ctx.text) && !open_ended {
        return None;
    }
    let mut dates: Vec<NaiveDate> =
        scan_date_tokens(ctx.text, ctx.today).into_iter().map(|token| token.date).collect();
    dates.dedup();
    let date = match dates.as_slice() {
        [] => find_relative_date(ctx.text, ctx.today).unwrap_or(ctx.today),
        [only] => *only,
        _ => return None,
    };
    Some(TimeSlot::on(date))
}

/// Step 4: give every slot a complete window.
#[derive(Debug, Default, Clone, Copy)]
pub struct FillMissingTimes;

impl SupplementStep for FillMissingTimes {
    fn name(&self) -> &'static str {
        "fill_missing_times"
    }

    fn apply(&self, slots: Vec<TimeSlot>, ctx: &SupplementContext<'_>) -> Vec<TimeSlot> {
        let slots = if slots.is_empty() { seed_slot(ctx).into_iter().collect() } else { slots };

        let filled = slots.into_iter().flat_map(|slot| {
            if slot.has_window() {
                return vec![slot];
            }
            match first_patch(&slot, ctx) {
                Some((_, Fill::Patch(patch))) => vec![TimeSlot {
                    date: patch.date.unwrap_or(slot.date),
                    start_time: Some(patch.start),
                    end_time: Some(patch.end),
                    ..slot
                }],
                Some((_, Fill::Week(offset))) => {
                    week_slots(ctx, offset, std::slice::from_ref(&slot)).unwrap_or_else(|| vec![slot])
                }
                None => vec![slot],
            }
        });

        let mut all_day_dates = HashSet::new();
        filled.filter(|slot| !slot.is_all_day() || all_day_dates.insert(slot.date)).collect()
    }
}
