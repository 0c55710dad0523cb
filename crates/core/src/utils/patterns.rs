//! Pattern rules for Japanese date and time expressions
//!
//! All matching runs on text passed through [`normalize`] first, so rules
//! only need to handle ASCII digits and a single `/` and `:`.
//!
//! # Rule ordering
//!
//! Time ranges are recognised by an ordered list of [`TimeRangeRule`]s.
//! For a single answer the first rule with a valid match wins; for scanning
//! a whole line, matches are accepted in rule order and later rules cannot
//! claim text an earlier rule already consumed.
//!
//! # Examples
//!
//! ```
//! use yotei_core::utils::patterns::{find_time_range, normalize};
//!
//! let text = normalize("７/１０ ９-１０時");
//! let range = find_time_range(&text).unwrap();
//! assert_eq!(range.start.format("%H:%M").to_string(), "09:00");
//! assert_eq!(range.end.format("%H:%M").to_string(), "10:00");
//! ```

use std::ops::Range;

use chrono::NaiveTime;
use lazy_static::lazy_static;
use regex::{Captures, Match, Regex};
use yotei_domain::utils::clock_time::hour_to_clock;

/// Range separators: hyphen and tilde variants, or `から`.
macro_rules! sep {
    () => {
        r"\s*(?:[-〜~～－ー−―]|から)\s*"
    };
}

/// Optional 午前/午後 prefix.
macro_rules! meridiem {
    ($name:literal) => {
        concat!(r"(?:(?P<", $name, r">午前|午後)\s*)?")
    };
}

lazy_static! {
    /// `9:00-10:30`
    static ref CLOCK_TO_CLOCK: Regex = Regex::new(concat!(
        meridiem!("sp"), r"(?P<sh>\d{1,2}):(?P<sm>\d{2})",
        sep!(),
        meridiem!("ep"), r"(?P<eh>\d{1,2}):(?P<em>\d{2})"
    ))
    .expect("static pattern");

    /// `9時30分-10時`, `9時-10時半`
    static ref KANJI_TO_KANJI: Regex = Regex::new(concat!(
        meridiem!("sp"), r"(?P<sh>\d{1,2})時(?:(?P<sm>\d{1,2})分|(?P<shalf>半))?",
        sep!(),
        meridiem!("ep"), r"(?P<eh>\d{1,2})時(?:(?P<em>\d{1,2})分|(?P<ehalf>半))?"
    ))
    .expect("static pattern");

    /// `9:30-11`, `9:30-11時`
    static ref CLOCK_TO_HOUR: Regex = Regex::new(concat!(
        meridiem!("sp"), r"(?P<sh>\d{1,2}):(?P<sm>\d{2})",
        sep!(),
        meridiem!("ep"), r"(?P<eh>\d{1,2})時?(?:(?P<ehalf>半))?"
    ))
    .expect("static pattern");

    /// `9-10時`, `9〜10時半`
    static ref HOUR_TO_KANJI: Regex = Regex::new(concat!(
        meridiem!("sp"), r"(?P<sh>\d{1,2})",
        sep!(),
        meridiem!("ep"), r"(?P<eh>\d{1,2})時(?:(?P<em>\d{1,2})分|(?P<ehalf>半))?"
    ))
    .expect("static pattern");

    /// `9時-18:00`
    static ref KANJI_TO_CLOCK: Regex = Regex::new(concat!(
        meridiem!("sp"), r"(?P<sh>\d{1,2})時(?:(?P<sm>\d{1,2})分|(?P<shalf>半))?",
        sep!(),
        meridiem!("ep"), r"(?P<eh>\d{1,2}):(?P<em>\d{2})"
    ))
    .expect("static pattern");

    /// Bare `9-10` right after a date token; only used anchored.
    static ref BARE_HOURS: Regex = Regex::new(concat!(
        r"^\s*", meridiem!("sp"), r"(?P<sh>\d{1,2})",
        sep!(),
        r"(?P<eh>\d{1,2})(?:[^\d/:時]|$)"
    ))
    .expect("static pattern");

    /// One point in time: `18時`, `18時30分`, `18時半`, `18:30`, `午後3時`.
    static ref TIME_POINT: Regex = Regex::new(concat!(
        meridiem!("sp"),
        r"(?P<sh>\d{1,2})(?:時(?:(?P<sm>\d{1,2})分|(?P<shalf>半))?|:(?P<cm>\d{2}))"
    ))
    .expect("static pattern");

    /// `2時間`, `1.5時間`
    static ref DURATION: Regex =
        Regex::new(r"(?P<n>\d{1,2}(?:\.\d+)?)\s*時間").expect("static pattern");
}

/// A validated wall-clock window with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeRange {
    /// Inclusive start.
    pub start: NaiveTime,
    /// End, strictly after `start`.
    pub end: NaiveTime,
}

impl TimeRange {
    /// `None` unless `start < end`.
    #[must_use]
    pub fn new(start: NaiveTime, end: NaiveTime) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }
}

/// One entry of the ordered time-range rule list.
pub struct TimeRangeRule {
    pub name: &'static str,
    pattern: &'static Regex,
}

impl TimeRangeRule {
    /// Every valid match of this rule with its byte span.
    pub fn matches(&self, text: &str) -> Vec<(TimeRange, Range<usize>)> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                if is_inside_duration(text, whole.end()) {
                    return None;
                }
                range_from_captures(&caps).map(|range| (range, whole.range()))
            })
            .collect()
    }
}

/// Time-range rules in priority order.
pub fn time_range_rules() -> [TimeRangeRule; 5] {
    [
        TimeRangeRule { name: "clock_to_clock", pattern: &CLOCK_TO_CLOCK },
        TimeRangeRule { name: "kanji_to_kanji", pattern: &KANJI_TO_KANJI },
        TimeRangeRule { name: "kanji_to_clock", pattern: &KANJI_TO_CLOCK },
        TimeRangeRule { name: "clock_to_hour", pattern: &CLOCK_TO_HOUR },
        TimeRangeRule { name: "hour_to_kanji", pattern: &HOUR_TO_KANJI },
    ]
}

/// Fold full-width digits and punctuation into ASCII.
pub fn normalize(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '０'..='９' => char::from_u32(u32::from(c) - u32::from('０') + u32::from('0')).unwrap_or(c),
            '／' => '/',
            '：' => ':',
            '　' => ' ',
            _ => c,
        })
        .collect()
}

/// First valid time range, by rule priority.
pub fn find_time_range(text: &str) -> Option<TimeRange> {
    find_time_range_span(text).map(|(range, _)| range)
}

/// First valid time range with its byte span.
pub fn find_time_range_span(text: &str) -> Option<(TimeRange, Range<usize>)> {
    time_range_rules().iter().find_map(|rule| rule.matches(text).into_iter().next())
}

/// All non-overlapping time ranges in `text`, ordered by position.
///
/// Higher-priority rules claim their spans first.
pub fn find_all_time_ranges(text: &str) -> Vec<(TimeRange, Range<usize>)> {
    let mut accepted: Vec<(TimeRange, Range<usize>)> = Vec::new();
    for rule in time_range_rules() {
        for (range, span) in rule.matches(text) {
            if !accepted.iter().any(|(_, taken)| overlaps(taken, &span)) {
                accepted.push((range, span));
            }
        }
    }
    accepted.sort_by_key(|(_, span)| span.start);
    accepted
}

/// Bare `H-H` at the very start of `text` (used right after a date token).
pub fn leading_bare_hours(text: &str) -> Option<TimeRange> {
    let caps = BARE_HOURS.captures(text)?;
    range_from_captures(&caps)
}

/// `H時以降` → `H:00`.
pub fn find_after_point(text: &str) -> Option<NaiveTime> {
    find_point_followed_by(text, "以降")
}

/// `H時以前` → `H:00`.
pub fn find_before_point(text: &str) -> Option<NaiveTime> {
    find_point_followed_by(text, "以前")
}

/// First standalone point in time that is not part of a duration.
pub fn find_time_point(text: &str) -> Option<NaiveTime> {
    TIME_POINT.captures_iter(text).find_map(|caps| {
        let whole = caps.get(0)?;
        if is_inside_duration(text, whole.end()) {
            return None;
        }
        point_from_captures(&caps)
    })
}

/// Any explicit clock expression: a range or a single point.
pub fn has_clock_expression(text: &str) -> bool {
    find_time_range(text).is_some() || find_time_point(text).is_some()
}

/// `N時間` duration in hours, e.g. "2時間空いている".
pub fn find_duration_hours(text: &str) -> Option<f64> {
    DURATION.captures(text)?.name("n")?.as_str().parse().ok()
}

fn find_point_followed_by(text: &str, suffix: &str) -> Option<NaiveTime> {
    TIME_POINT.captures_iter(text).find_map(|caps| {
        let whole = caps.get(0)?;
        let rest = text[whole.end()..].trim_start();
        if rest.starts_with(suffix) {
            point_from_captures(&caps)
        } else {
            None
        }
    })
}

fn is_inside_duration(text: &str, match_end: usize) -> bool {
    text[match_end..].starts_with('間')
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

fn minutes(number: Option<Match<'_>>, half: Option<Match<'_>>) -> Option<u32> {
    match (number, half) {
        (Some(m), _) => m.as_str().parse().ok().filter(|v| *v < 60),
        (None, Some(_)) => Some(30),
        (None, None) => Some(0),
    }
}

fn is_pm(marker: Option<Match<'_>>) -> Option<bool> {
    marker.map(|m| m.as_str() == "午後")
}

fn apply_meridiem(hour: u32, pm: Option<bool>) -> u32 {
    match pm {
        Some(true) if hour < 12 => hour + 12,
        Some(false) if hour == 12 => 0,
        _ => hour,
    }
}

fn range_from_captures(caps: &Captures<'_>) -> Option<TimeRange> {
    let start_pm = is_pm(caps.name("sp"));
    let start_hour = apply_meridiem(caps.name("sh")?.as_str().parse().ok()?, start_pm);
    let start_minute = minutes(caps.name("sm"), caps.name("shalf"))?;

    let raw_end_hour: u32 = caps.name("eh")?.as_str().parse().ok()?;
    let end_hour = match is_pm(caps.name("ep")) {
        Some(pm) => apply_meridiem(raw_end_hour, Some(pm)),
        // "午後1時-3時": the end inherits the afternoon
        None if start_pm == Some(true) && raw_end_hour < 12 && raw_end_hour + 12 > start_hour => {
            raw_end_hour + 12
        }
        None => raw_end_hour,
    };
    let end_minute = minutes(caps.name("em"), caps.name("ehalf"))?;

    TimeRange::new(
        hour_to_clock(start_hour, start_minute)?,
        hour_to_clock(end_hour, end_minute)?,
    )
}

fn point_from_captures(caps: &Captures<'_>) -> Option<NaiveTime> {
    let hour = apply_meridiem(caps.name("sh")?.as_str().parse().ok()?, is_pm(caps.name("sp")));
    let minute = minutes(caps.name("sm").or_else(|| caps.name("cm")), caps.name("shalf"))?;
    hour_to_clock(hour, minute)
}
