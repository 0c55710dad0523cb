//! Month-only expansion: `1月の空き`, `来月`

use yotei_domain::TimeSlot;

use super::{window_from_text, SupplementContext, SupplementStep};
use crate::utils::temporal::{find_month_only, resolve_month};

/// Step 8: a month named without a day covers every remaining day of that
/// month. Existing slots in the month take the month window; slots outside
/// it are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct MonthExpansion;

impl SupplementStep for MonthExpansion {
    fn name(&self) -> &'static str {
        "month_expansion"
    }

    fn apply(&self, slots: Vec<TimeSlot>, ctx: &SupplementContext<'_>) -> Vec<TimeSlot> {
        let Some(days) = find_month_only(ctx.text, ctx.today)
            .and_then(|month| resolve_month(ctx.today, month))
        else {
            return slots;
        };
        let (start, end) = window_from_text(ctx.text);

        let mut out: Vec<TimeSlot> = slots
            .into_iter()
            .filter(|slot| days.contains(&slot.date))
            .map(|slot| {
                let title = slot.title.clone().filter(|_| !slot.has_synthesized_title());
                TimeSlot { start_time: Some(start), end_time: Some(end), end_date: None, title, ..slot }
            })
            .collect();

        for day in days {
            if !out.iter().any(|slot| slot.date == day) {
                out.push(TimeSlot::window(day, start, end));
            }
        }
        out
    }
}
