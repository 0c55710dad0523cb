//! Title policy per intent
//!
//! `add_event` slots always carry a title (the user's words, the description
//! or a placeholder built from the window). Availability checks and unknown
//! requests never do; a real title moves into an empty description.

use lazy_static::lazy_static;
use regex::Regex;
use yotei_domain::utils::title::{is_placeholder_title, placeholder_title};
use yotei_domain::{TaskType, TimeSlot};

use super::{SupplementContext, SupplementStep};

/// Titles this short are replaced by a "<name>さんとMTG" phrase when the
/// text has one.
const SHORT_TITLE_CHARS: usize = 4;

lazy_static! {
    static ref PERSON_MEETING: Regex = Regex::new(
        r"(?P<who>[\p{Han}\p{Katakana}ーA-Za-z]{1,10}(?:さん|様|氏))(?P<join>との|と)?(?P<what>MTG|ミーティング|打ち合わせ|打合せ|会議|面談)"
    )
    .expect("static pattern");
}

/// "田中さんとMTG" style phrase from the text.
pub fn person_meeting_title(text: &str) -> Option<String> {
    PERSON_MEETING.find(text).map(|m| m.as_str().to_string())
}

/// Apply the policy to one slot.
pub fn apply_title_policy(slot: TimeSlot, ctx: &SupplementContext<'_>) -> TimeSlot {
    match ctx.intent {
        TaskType::AddEvent => titled(slot, ctx.text),
        TaskType::AvailabilityCheck | TaskType::Unknown => untitled(slot),
    }
}

fn titled(mut slot: TimeSlot, text: &str) -> TimeSlot {
    if slot.is_travel_buffer() {
        return slot;
    }
    if slot.has_synthesized_title() {
        slot.title = None;
    }
    if let Some(title) = slot.title.as_deref() {
        if title.chars().count() <= SHORT_TITLE_CHARS {
            if let Some(refined) = person_meeting_title(text) {
                slot.title = Some(refined);
            }
        }
        return slot;
    }

    slot.title = slot.description.clone().or_else(|| match (slot.start_time, slot.end_time) {
        (Some(start), Some(end)) => Some(placeholder_title(slot.date, start, end)),
        _ => None,
    });
    slot
}

fn untitled(mut slot: TimeSlot) -> TimeSlot {
    if let Some(title) = slot.title.take() {
        if slot.description.is_none() && !is_placeholder_title(&title) {
            slot.description = Some(title);
        }
    }
    slot
}

/// Step 5.
#[derive(Debug, Default, Clone, Copy)]
pub struct TitlePolicy;

impl SupplementStep for TitlePolicy {
    fn name(&self) -> &'static str {
        "title_policy"
    }

    fn apply(&self, slots: Vec<TimeSlot>, ctx: &SupplementContext<'_>) -> Vec<TimeSlot> {
        slots.into_iter().map(|slot| apply_title_policy(slot, ctx)).collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use yotei_domain::utils::clock_time::clock;

    use super::*;

    fn slot() -> TimeSlot {
        TimeSlot::window(NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(), clock(9, 0), clock(10, 0))
    }

    fn ctx(text: &str, intent: TaskType) -> SupplementContext<'_> {
        SupplementContext { text, today: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(), intent }
    }

    #[test]
    fn add_event_falls_back_to_description_then_placeholder() {
        let c = ctx("1/10 9時", TaskType::AddEvent);
        let described = apply_title_policy(slot().with_description("歯医者"), &c);
        assert_eq!(described.title.as_deref(), Some("歯医者"));

        let bare = apply_title_policy(slot(), &c);
        assert_eq!(bare.title.as_deref(), Some("予定（2025-01-10 09:00〜10:00）"));
    }

    #[test]
    fn stale_placeholder_is_regenerated() {
        let stale = slot().with_title("予定（2025-01-10 13:00〜14:00）");
        let out = apply_title_policy(stale, &ctx("", TaskType::AddEvent));
        assert_eq!(out.title.as_deref(), Some("予定（2025-01-10 09:00〜10:00）"));
    }

    #[test]
    fn short_title_is_refined_from_person_phrase() {
        let c = ctx("明日10時から田中さんとMTG", TaskType::AddEvent);
        let out = apply_title_policy(slot().with_title("MTG"), &c);
        assert_eq!(out.title.as_deref(), Some("田中さんとMTG"));

        let long = apply_title_policy(slot().with_title("四半期レビュー会議"), &c);
        assert_eq!(long.title.as_deref(), Some("四半期レビュー会議"));
    }

    #[test]
    fn availability_moves_title_into_description() {
        let c = ctx("", TaskType::AvailabilityCheck);
        let out = apply_title_policy(slot().with_title("打ち合わせ"), &c);
        assert_eq!(out.title, None);
        assert_eq!(out.description.as_deref(), Some("打ち合わせ"));

        let kept = apply_title_policy(slot().with_title("会議").with_description("候補"), &c);
        assert_eq!(kept.description.as_deref(), Some("候補"));
    }

    #[test]
    fn unknown_drops_placeholders() {
        let c = ctx("", TaskType::Unknown);
        let out = apply_title_policy(slot().with_title("予定（2025-01-10 09:00〜10:00）"), &c);
        assert_eq!(out.title, None);
        assert_eq!(out.description, None);
    }
}
