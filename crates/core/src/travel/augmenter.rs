//! Travel buffers around visits

use std::collections::HashSet;

use chrono::{Duration, NaiveTime};
use yotei_domain::constants::{OUTBOUND_TRAVEL_LABEL, RETURN_TRAVEL_LABEL, TRAVEL_KEYWORDS};
use yotei_domain::{ExtractionResult, TaskType, TimeSlot, TravelConfig};

use super::estimator::TravelTimeEstimator;

/// Inserts outbound/return buffer slots around `add_event` slots when the
/// message talks about travelling.
#[derive(Debug, Clone)]
pub struct TravelAugmenter {
    config: TravelConfig,
    estimator: TravelTimeEstimator,
}

impl TravelAugmenter {
    /// Augmenter with the built-in route table.
    pub const fn new(config: TravelConfig) -> Self {
        Self { config, estimator: TravelTimeEstimator::new() }
    }

    /// True when `text` mentions moving between places.
    pub fn mentions_travel(text: &str) -> bool {
        TRAVEL_KEYWORDS.iter().any(|keyword| text.contains(keyword))
    }

    /// Buffer length in minutes for this result.
    ///
    /// Uses the estimator when both locations are known, else the configured
    /// default.
    pub fn buffer_minutes(&self, result: &ExtractionResult) -> u32 {
        match (&result.location, &result.counterpart_location) {
            (Some(from), Some(to)) if self.config.use_estimates => {
                self.estimator.estimate_minutes(from, to)
            }
            _ => self.config.default_buffer_minutes,
        }
    }

    /// Add buffers; returns the new result and the number of inserted slots.
    pub fn augment(&self, result: ExtractionResult, text: &str) -> (ExtractionResult, usize) {
        if !self.config.enabled
            || result.intent != TaskType::AddEvent
            || !Self::mentions_travel(text)
        {
            return (result, 0);
        }
        let minutes = self.buffer_minutes(&result);
        if minutes == 0 {
            return (result, 0);
        }
        let buffer = Duration::minutes(i64::from(minutes));

        let mut known: HashSet<_> = result.slots.iter().map(TimeSlot::key).collect();
        let mut slots = Vec::with_capacity(result.slots.len() * 3);
        let mut inserted = 0;

        for slot in &result.slots {
            let legs = if slot.is_travel_buffer() || slot.is_all_day() {
                None
            } else {
                travel_legs(slot, buffer)
            };
            match legs {
                Some((outbound, inbound)) => {
                    let outbound_new = known.insert(outbound.key());
                    let inbound_new = known.insert(inbound.key());
                    if outbound_new {
                        slots.push(outbound);
                        inserted += 1;
                    }
                    slots.push(slot.clone());
                    if inbound_new {
                        slots.push(inbound);
                        inserted += 1;
                    }
                }
                None => slots.push(slot.clone()),
            }
        }

        (result.with_slots(slots), inserted)
    }
}

/// Outbound and return slots, or `None` when either would cross midnight.
fn travel_legs(slot: &TimeSlot, buffer: Duration) -> Option<(TimeSlot, TimeSlot)> {
    let (start, end) = (slot.start_time?, slot.end_time?);
    let before = checked_shift(start, -buffer)?;
    let after = checked_shift(end, buffer)?;

    let label = slot.title.clone();
    let leg = |from: NaiveTime, to: NaiveTime, name: &str| {
        let leg = TimeSlot::window(slot.date, from, to).with_title(name);
        match &label {
            Some(event) => leg.with_description(event.clone()),
            None => leg,
        }
    };
    Some((leg(before, start, OUTBOUND_TRAVEL_LABEL), leg(end, after, RETURN_TRAVEL_LABEL)))
}

fn checked_shift(time: NaiveTime, by: Duration) -> Option<NaiveTime> {
    let (shifted, wrapped) = time.overflowing_add_signed(by);
    (wrapped == 0).then_some(shifted)
}
