//! Week override: `今週` / `来週` / `再来週` without a weekday

use yotei_domain::TimeSlot;

use super::{business_hours, template_of, templated_slot, SupplementContext, SupplementStep};
use crate::utils::temporal::{find_week_reference, scan_date_tokens, week_span};

/// Step 3: replace the slot list with the seven days of the referenced week,
/// each `09:00–18:00` whatever times the model or the text carry.
///
/// Text with explicit date tokens is left to the fill step.
#[derive(Debug, Default, Clone, Copy)]
pub struct WeekOverride;

impl SupplementStep for WeekOverride {
    fn name(&self) -> &'static str {
        "week_override"
    }

    fn apply(&self, slots: Vec<TimeSlot>, ctx: &SupplementContext<'_>) -> Vec<TimeSlot> {
        let Some(offset) = find_week_reference(ctx.text) else {
            return slots;
        };
        if !scan_date_tokens(ctx.text, ctx.today).is_empty() {
            return slots;
        }
        week_slots(ctx, offset, &slots).unwrap_or(slots)
    }
}

/// The seven business-hours slots of the week `offset` weeks ahead, carrying
/// the title and description of `slots`.
pub(crate) fn week_slots(
    ctx: &SupplementContext<'_>,
    offset: i64,
    slots: &[TimeSlot],
) -> Option<Vec<TimeSlot>> {
    let days = week_span(ctx.today, offset)?;
    let window = business_hours();
    let template = template_of(slots);
    Some(days.into_iter().map(|day| templated_slot(day, window, &template)).collect())
}
