//! All-day suppression

use std::collections::HashSet;

use yotei_domain::TimeSlot;

use super::{SupplementContext, SupplementStep};

/// Step 6: an all-day slot is dropped when a narrower slot shares its date.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllDaySuppression;

impl SupplementStep for AllDaySuppression {
    fn name(&self) -> &'static str {
        "all_day_suppression"
    }

    fn apply(&self, slots: Vec<TimeSlot>, _ctx: &SupplementContext<'_>) -> Vec<TimeSlot> {
        let narrower: HashSet<_> = slots
            .iter()
            .filter(|slot| slot.has_window() && !slot.is_all_day())
            .map(|slot| slot.date)
            .collect();
        slots.into_iter().filter(|slot| !slot.is_all_day() || !narrower.contains(&slot.date)).collect()
    }
}
