//! Calendar arithmetic for relative and partial date expressions
//!
//! Year inference follows one rule throughout: a month/day that already
//! passed this year means next year.

use std::ops::Range;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use lazy_static::lazy_static;
use regex::Regex;
use yotei_domain::constants::MAX_EXPANDED_RANGE_DAYS;

lazy_static! {
    static ref FULL_DATE: Regex =
        Regex::new(r"(?P<y>\d{4})\s*[/\-年]\s*(?P<m>\d{1,2})\s*[/\-月]\s*(?P<d>\d{1,2})日?")
            .expect("static pattern");
    static ref SLASH_DATE: Regex =
        Regex::new(r"(?P<m>\d{1,2})/(?P<d>\d{1,2})").expect("static pattern");
    static ref KANJI_DATE: Regex =
        Regex::new(r"(?P<m>\d{1,2})月\s*(?P<d>\d{1,2})日").expect("static pattern");
    static ref BARE_DAY: Regex = Regex::new(r"(?P<d>\d{1,2})日").expect("static pattern");
    static ref RELATIVE_DAY: Regex =
        Regex::new(r"今日|本日|明後日|あさって|明日|あした").expect("static pattern");
    static ref WEEKDAY_PHRASE: Regex =
        Regex::new(r"(?:(?P<w>再来週|来週|今週)\s*の?\s*)?(?P<d>[月火水木金土日])曜日?")
            .expect("static pattern");
    static ref WEEK_REFERENCE: Regex = Regex::new(r"再来週|来週|今週").expect("static pattern");
    static ref MONTH_TOKEN: Regex =
        Regex::new(r"(?P<m>\d{1,2})月|(?P<rel>再来月|来月|今月)").expect("static pattern");
    static ref WEEKDAY_AHEAD: Regex =
        Regex::new(r"^\s*の?\s*[月火水木金土日]曜").expect("static pattern");
    static ref DAY_AHEAD: Regex = Regex::new(r"^\s*\d{1,2}\s*日").expect("static pattern");
}

/// A date token found in text, with its byte span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateToken {
    /// Resolved date.
    pub date: NaiveDate,
    /// Byte range of the token in the scanned line.
    pub span: Range<usize>,
}

/// `today + n` days, `None` on calendar overflow.
pub fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::days(days))
}

/// Month/day with the year inferred from `today`.
pub fn resolve_month_day(today: NaiveDate, month: u32, day: u32) -> Option<NaiveDate> {
    let this_year = NaiveDate::from_ymd_opt(today.year(), month, day);
    match this_year {
        Some(date) if date >= today => Some(date),
        _ => NaiveDate::from_ymd_opt(today.year() + 1, month, day),
    }
}

/// `D日`: this month when still ahead (or today), else next month.
pub fn resolve_bare_day(today: NaiveDate, day: u32) -> Option<NaiveDate> {
    let candidate = NaiveDate::from_ymd_opt(today.year(), today.month(), day);
    match candidate {
        Some(date) if date >= today => Some(date),
        _ => {
            let (year, month) = next_month(today.year(), today.month());
            NaiveDate::from_ymd_opt(year, month, day)
        }
    }
}

/// Every day of `month` still relevant from `today`.
///
/// A past month means next year; the current month starts today.
pub fn resolve_month(today: NaiveDate, month: u32) -> Option<Vec<NaiveDate>> {
    if !(1..=12).contains(&month) {
        return None;
    }
    let year = if month < today.month() { today.year() + 1 } else { today.year() };
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let start = if month == today.month() && year == today.year() { today } else { first };
    let (next_year, next) = next_month(year, month);
    let last = NaiveDate::from_ymd_opt(next_year, next, 1)?.pred_opt()?;
    expand_days(start, last)
}

/// Inclusive `start..=end`, refusing empty or oversized spans.
pub fn expand_days(start: NaiveDate, end: NaiveDate) -> Option<Vec<NaiveDate>> {
    let span = (end - start).num_days();
    if !(0..MAX_EXPANDED_RANGE_DAYS).contains(&span) {
        return None;
    }
    Some(start.iter_days().take(usize::try_from(span).ok()? + 1).collect())
}

/// Monday..Sunday of the ISO week `offset` weeks from the one containing `today`.
pub fn week_span(today: NaiveDate, offset: i64) -> Option<Vec<NaiveDate>> {
    let monday = add_days(today, -i64::from(today.weekday().num_days_from_monday()))?;
    let start = add_days(monday, 7 * offset)?;
    expand_days(start, add_days(start, 6)?)
}

/// `今日`/`明日`/`明後日` and their kana spellings.
pub fn resolve_relative_day(today: NaiveDate, token: &str) -> Option<NaiveDate> {
    match token {
        "今日" | "本日" => Some(today),
        "明日" | "あした" => add_days(today, 1),
        "明後日" | "あさって" => add_days(today, 2),
        _ => None,
    }
}

/// `来週火曜` and friends; a bare weekday is the next occurrence, today included.
pub fn resolve_weekday(today: NaiveDate, week: Option<&str>, day: Weekday) -> Option<NaiveDate> {
    let offset = match week {
        Some("今週") => 0,
        Some("来週") => 1,
        Some("再来週") => 2,
        Some(_) => return None,
        None => {
            let ahead = (7 + day.num_days_from_monday() - today.weekday().num_days_from_monday()) % 7;
            return add_days(today, i64::from(ahead));
        }
    };
    let week = week_span(today, offset)?;
    week.get(day.num_days_from_monday() as usize).copied()
}

/// Week offset of the first `今週`/`来週`/`再来週` not followed by a weekday.
pub fn find_week_reference(text: &str) -> Option<i64> {
    WEEK_REFERENCE.find_iter(text).find_map(|m| {
        if WEEKDAY_AHEAD.is_match(&text[m.end()..]) {
            return None;
        }
        match m.as_str() {
            "今週" => Some(0),
            "来週" => Some(1),
            "再来週" => Some(2),
            _ => None,
        }
    })
}

/// Month number of a bare month mention (`1月`, `来月`) without a day.
///
/// Returns `None` when the text also contains a full `M/D` or `M月D日` date.
pub fn find_month_only(text: &str, today: NaiveDate) -> Option<u32> {
    if SLASH_DATE.is_match(text) || KANJI_DATE.is_match(text) {
        return None;
    }
    MONTH_TOKEN.captures_iter(text).find_map(|caps| {
        let whole = caps.get(0)?;
        if let Some(relative) = caps.name("rel") {
            let ahead = match relative.as_str() {
                "今月" => 0,
                "来月" => 1,
                _ => 2,
            };
            return Some((today.month0() + ahead) % 12 + 1);
        }
        if DAY_AHEAD.is_match(&text[whole.end()..]) || is_preceded_by_digit(text, whole.start()) {
            return None;
        }
        caps.name("m")?.as_str().parse().ok().filter(|m| (1..=12).contains(m))
    })
}

/// First relative-day or weekday phrase in `text`.
pub fn find_relative_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let relative = RELATIVE_DAY
        .find(text)
        .and_then(|m| resolve_relative_day(today, m.as_str()).map(|d| (m.start(), d)));
    let weekday = WEEKDAY_PHRASE.captures(text).and_then(|caps| {
        let day = weekday_from_kanji(caps.name("d")?.as_str())?;
        let week = caps.name("w").map(|w| w.as_str());
        let start = caps.get(0)?.start();
        resolve_weekday(today, week, day).map(|d| (start, d))
    });
    match (relative, weekday) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a.1 } else { b.1 }),
        (a, b) => a.or(b).map(|(_, date)| date),
    }
}

/// Every distinct date named by a relative-day or weekday phrase, in order.
pub fn find_relative_dates(text: &str, today: NaiveDate) -> Vec<(usize, NaiveDate)> {
    let mut found: Vec<(usize, NaiveDate)> = RELATIVE_DAY
        .find_iter(text)
        .filter_map(|m| resolve_relative_day(today, m.as_str()).map(|d| (m.start(), d)))
        .collect();
    found.extend(WEEKDAY_PHRASE.captures_iter(text).filter_map(|caps| {
        let day = weekday_from_kanji(caps.name("d")?.as_str())?;
        let week = caps.name("w").map(|w| w.as_str());
        let start = caps.get(0)?.start();
        resolve_weekday(today, week, day).map(|d| (start, d))
    }));
    found.sort_by_key(|(start, _)| *start);
    let mut seen = Vec::new();
    found.retain(|(_, date)| {
        if seen.contains(date) {
            false
        } else {
            seen.push(*date);
            true
        }
    });
    found
}

/// Date tokens in a line: `YYYY/M/D`, `M/D`, `M月D日`, `D日`, relative days.
///
/// Tokens never overlap; longer forms win. `D日` followed by `間` is a
/// duration, not a date.
pub fn scan_date_tokens(line: &str, today: NaiveDate) -> Vec<DateToken> {
    fn push(date: Option<NaiveDate>, span: Range<usize>, tokens: &mut Vec<DateToken>) {
        if let Some(date) = date {
            if !tokens.iter().any(|t| t.span.start < span.end && span.start < t.span.end) {
                tokens.push(DateToken { date, span });
            }
        }
    }

    let mut tokens: Vec<DateToken> = Vec::new();

    for caps in FULL_DATE.captures_iter(line) {
        let Some(whole) = caps.get(0) else { continue };
        let date = parse_ymd(&caps["y"], &caps["m"], &caps["d"]);
        push(date, whole.range(), &mut tokens);
    }
    for caps in KANJI_DATE.captures_iter(line) {
        let Some(whole) = caps.get(0) else { continue };
        let date = month_day(today, &caps["m"], &caps["d"]);
        push(date, whole.range(), &mut tokens);
    }
    for caps in SLASH_DATE.captures_iter(line) {
        let Some(whole) = caps.get(0) else { continue };
        if is_preceded_by_digit(line, whole.start()) || line[whole.end()..].starts_with('/') {
            continue;
        }
        let date = month_day(today, &caps["m"], &caps["d"]);
        push(date, whole.range(), &mut tokens);
    }
    for caps in BARE_DAY.captures_iter(line) {
        let Some(whole) = caps.get(0) else { continue };
        if line[whole.end()..].starts_with('間') || is_preceded_by_digit(line, whole.start()) {
            continue;
        }
        let date = caps["d"].parse().ok().and_then(|d| resolve_bare_day(today, d));
        push(date, whole.range(), &mut tokens);
    }
    for m in RELATIVE_DAY.find_iter(line) {
        push(resolve_relative_day(today, m.as_str()), m.range(), &mut tokens);
    }

    tokens.sort_by_key(|t| t.span.start);
    tokens
}

/// Parse a date fragment emitted by a language model.
///
/// Accepts `YYYY-MM-DD`, ISO date-times, `YYYY/MM/DD`, `M/D` and `M月D日`.
pub fn parse_model_date(raw: &str, today: NaiveDate) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.date());
    }
    if let Some(caps) = FULL_DATE.captures(value) {
        return parse_ymd(&caps["y"], &caps["m"], &caps["d"]);
    }
    if let Some(caps) = KANJI_DATE.captures(value) {
        return month_day(today, &caps["m"], &caps["d"]);
    }
    if let Some(caps) = SLASH_DATE.captures(value) {
        return month_day(today, &caps["m"], &caps["d"]);
    }
    None
}

/// `月`..`日` → weekday.
pub fn weekday_from_kanji(kanji: &str) -> Option<Weekday> {
    match kanji {
        "月" => Some(Weekday::Mon),
        "火" => Some(Weekday::Tue),
        "水" => Some(Weekday::Wed),
        "木" => Some(Weekday::Thu),
        "金" => Some(Weekday::Fri),
        "土" => Some(Weekday::Sat),
        "日" => Some(Weekday::Sun),
        _ => None,
    }
}

fn parse_ymd(y: &str, m: &str, d: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y.parse().ok()?, m.parse().ok()?, d.parse().ok()?)
}

fn month_day(today: NaiveDate, m: &str, d: &str) -> Option<NaiveDate> {
    resolve_month_day(today, m.parse().ok()?, d.parse().ok()?)
}

const fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

fn is_preceded_by_digit(text: &str, index: usize) -> bool {
    text[..index].chars().next_back().is_some_and(|c| c.is_ascii_digit() || c == '/')
}
