//! Recovery of `(date, window)` pairs the model missed
//!
//! Each line is scanned for date tokens; the text between one token and the
//! next is searched for time ranges (or bare `H-H` right after the date).

use std::collections::HashSet;

use chrono::NaiveDate;
use yotei_domain::utils::title::placeholder_title;
use yotei_domain::{TaskType, TimeSlot};

use super::{SupplementContext, SupplementStep};
use crate::utils::patterns::{find_all_time_ranges, leading_bare_hours, TimeRange};
use crate::utils::temporal::scan_date_tokens;

/// Every `(date, range)` pair written in `text`, in reading order.
pub fn dated_ranges(text: &str, today: NaiveDate) -> Vec<(NaiveDate, TimeRange)> {
    let mut pairs = Vec::new();
    for line in text.lines() {
        let tokens = scan_date_tokens(line, today);
        for (index, token) in tokens.iter().enumerate() {
            let segment_end = tokens.get(index + 1).map_or(line.len(), |next| next.span.start);
            let segment = &line[token.span.end..segment_end];

            let ranges = find_all_time_ranges(segment);
            if ranges.is_empty() {
                if let Some(range) = leading_bare_hours(segment) {
                    pairs.push((token.date, range));
                }
            } else {
                pairs.extend(ranges.into_iter().map(|(range, _)| (token.date, range)));
            }
        }
    }
    pairs
}

/// Step 7: append dated windows found in the text that no slot covers.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecoverMissedSlots;

impl SupplementStep for RecoverMissedSlots {
    fn name(&self) -> &'static str {
        "recover_missed_slots"
    }

    fn apply(&self, mut slots: Vec<TimeSlot>, ctx: &SupplementContext<'_>) -> Vec<TimeSlot> {
        let mut known: HashSet<_> = slots.iter().map(TimeSlot::key).collect();

        for (date, range) in dated_ranges(ctx.text, ctx.today) {
            let slot = TimeSlot::window(date, range.start, range.end);
            if !known.insert(slot.key()) {
                continue;
            }
            let slot = if ctx.intent == TaskType::AddEvent {
                slot.with_title(placeholder_title(date, range.start, range.end))
            } else {
                slot
            };
            slots.push(slot);
        }
        slots
    }
}

#[cfg(test)]
mod tests {
    use yotei_domain::utils::clock_time::clock;

    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn bullet_lines_are_recovered() {
        let text = "候補日です\n・7/10 9-10時\n・7/11 9-10時";
        let ctx = SupplementContext { text, today: d(2025, 7, 1), intent: TaskType::AvailabilityCheck };

        let out = RecoverMissedSlots.apply(Vec::new(), &ctx);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0], TimeSlot::window(d(2025, 7, 10), clock(9, 0), clock(10, 0)));
        assert_eq!(out[1], TimeSlot::window(d(2025, 7, 11), clock(9, 0), clock(10, 0)));
    }

    #[test]
    fn bare_hours_after_a_date() {
        let pairs = dated_ranges("7/10 9-10 7/11 13-15", d(2025, 7, 1));
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[1].0, d(2025, 7, 11));
        assert_eq!(pairs[1].1.start, clock(13, 0));
    }

    #[test]
    fn several_ranges_for_one_date() {
        let pairs = dated_ranges("7月10日 9時-10時と14時-15時", d(2025, 7, 1));
        assert_eq!(pairs.len(), 2);
        assert!(pairs.iter().all(|(date, _)| *date == d(2025, 7, 10)));
    }

    #[test]
    fn existing_slots_are_not_duplicated() {
        let ctx = SupplementContext { text: "7/10 9-10時", today: d(2025, 7, 1), intent: TaskType::AddEvent };
        let existing = vec![TimeSlot::window(d(2025, 7, 10), clock(9, 0), clock(10, 0)).with_title("面談")];

        let out = RecoverMissedSlots.apply(existing.clone(), &ctx);

        assert_eq!(out, existing);
    }

    #[test]
    fn recovered_add_event_slots_get_placeholder_titles() {
        let ctx = SupplementContext { text: "7/10 9-10時", today: d(2025, 7, 1), intent: TaskType::AddEvent };
        let out = RecoverMissedSlots.apply(Vec::new(), &ctx);
        assert_eq!(out[0].title.as_deref(), Some("予定（2025-07-10 09:00〜10:00）"));
    }
}
