//! Deterministic supplementation of extracted slots
//!
//! The model's reading of a message is corrected and completed by a fixed
//! sequence of pure steps. Each step sees the whole slot list and the
//! normalized user text and returns a new list; running the full sequence
//! twice yields the same result as running it once.
//!
//! Order:
//! 1. explicit date ranges (`12/5-12/8`)
//! 2. `end_date` expansion
//! 3. week override (`来週`)
//! 4. missing-time fill
//! 5. title policy
//! 6. all-day suppression
//! 7. missed-slot recovery
//! 8. month-only expansion
//!
//! followed by a final pass that re-applies 5 and 6, deduplicates and sorts.

pub mod allday;
pub mod fill;
pub mod months;
pub mod ranges;
pub mod recovery;
pub mod titles;
pub mod weeks;

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveTime};
use yotei_domain::constants::{ALL_DAY_KEYWORD, BUSINESS_DAY_END, BUSINESS_DAY_START};
use yotei_domain::utils::clock_time::{clock_pair, end_of_day};
use yotei_domain::{ExtractionResult, TaskType, TimeSlot};

use crate::observer::PipelineObserver;
use crate::utils::patterns::{find_after_point, find_before_point, find_time_range, normalize};

/// Inputs shared by every step.
#[derive(Debug, Clone, Copy)]
pub struct SupplementContext<'a> {
    /// Normalized user text.
    pub text: &'a str,
    /// Today in the pipeline timezone.
    pub today: NaiveDate,
    /// Intent the slots were extracted for.
    pub intent: TaskType,
}

/// One pure transformation of the slot list.
pub trait SupplementStep: Send + Sync {
    /// Stable name used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Transform the slot list.
    fn apply(&self, slots: Vec<TimeSlot>, ctx: &SupplementContext<'_>) -> Vec<TimeSlot>;
}

/// Runs the supplement steps in order.
pub struct Supplementer {
    steps: Vec<Box<dyn SupplementStep>>,
}

impl Default for Supplementer {
    fn default() -> Self {
        Self::standard()
    }
}

impl Supplementer {
    /// Steps 1-8 plus the final pass.
    pub fn standard() -> Self {
        Self::with_steps(vec![
            Box::new(ranges::ExplicitDateRange),
            Box::new(ranges::ExpandEndDates),
            Box::new(weeks::WeekOverride),
            Box::new(fill::FillMissingTimes),
            Box::new(titles::TitlePolicy),
            Box::new(allday::AllDaySuppression),
            Box::new(recovery::RecoverMissedSlots),
            Box::new(months::MonthExpansion),
            Box::new(Finalize),
        ])
    }

    /// Custom step list, run in the given order.
    pub fn with_steps(steps: Vec<Box<dyn SupplementStep>>) -> Self {
        Self { steps }
    }

    /// Names of the configured steps, in run order.
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|step| step.name()).collect()
    }

    /// Supplement `result` using the raw user `text`.
    pub fn supplement(
        &self,
        result: ExtractionResult,
        text: &str,
        today: NaiveDate,
        observer: &dyn PipelineObserver,
    ) -> ExtractionResult {
        let normalized = normalize(text);
        let ctx = SupplementContext { text: &normalized, today, intent: result.intent };

        let mut slots = result.slots.clone();
        for step in &self.steps {
            let before = slots.len();
            slots = step.apply(slots, &ctx);
            observer.on_supplement_step(step.name(), before, slots.len());
        }
        result.with_slots(slots)
    }
}

/// Re-assert titles and all-day suppression, drop slots without a usable
/// window, deduplicate by `(date, start, end)` and sort.
#[derive(Debug, Default, Clone, Copy)]
pub struct Finalize;

impl SupplementStep for Finalize {
    fn name(&self) -> &'static str {
        "finalize"
    }

    fn apply(&self, slots: Vec<TimeSlot>, ctx: &SupplementContext<'_>) -> Vec<TimeSlot> {
        let slots = titles::TitlePolicy.apply(slots, ctx);
        let slots = allday::AllDaySuppression.apply(slots, ctx);

        let mut seen = HashSet::new();
        let mut slots: Vec<TimeSlot> = slots
            .into_iter()
            .filter(|slot| matches!((slot.start_time, slot.end_time), (Some(s), Some(e)) if s < e))
            .map(|slot| TimeSlot { end_date: None, ..slot })
            .filter(|slot| seen.insert(slot.key()))
            .collect();
        slots.sort_by_key(TimeSlot::key);
        slots
    }
}

/// `09:00–18:00`.
pub fn business_hours() -> (NaiveTime, NaiveTime) {
    (clock_pair(BUSINESS_DAY_START), clock_pair(BUSINESS_DAY_END))
}

/// Window implied by the text as a whole: an explicit range, then `終日`,
/// then `H時以降`/`H時以前`, else business hours.
pub fn window_from_text(text: &str) -> (NaiveTime, NaiveTime) {
    if let Some(range) = find_time_range(text) {
        return (range.start, range.end);
    }
    if text.contains(ALL_DAY_KEYWORD) {
        return (NaiveTime::MIN, end_of_day());
    }
    if let Some(after) = find_after_point(text) {
        return (after, end_of_day());
    }
    if let Some(before) = find_before_point(text) {
        let (opening, _) = business_hours();
        let start = if before > opening { opening } else { NaiveTime::MIN };
        if start < before {
            return (start, before);
        }
    }
    business_hours()
}

/// Title and description carried onto slots generated from a template.
///
/// Uses the first slot whose title came from the user; otherwise the first
/// description seen.
pub(crate) fn template_of(slots: &[TimeSlot]) -> (Option<String>, Option<String>) {
    slots
        .iter()
        .find(|slot| {
            slot.title.is_some() && !slot.has_synthesized_title() && !slot.is_travel_buffer()
        })
        .map(|slot| (slot.title.clone(), slot.description.clone()))
        .unwrap_or_else(|| (None, slots.iter().find_map(|slot| slot.description.clone())))
}

/// A windowed slot on `date` carrying the template's title and description.
pub(crate) fn templated_slot(
    date: NaiveDate,
    (start, end): (NaiveTime, NaiveTime),
    (title, description): &(Option<String>, Option<String>),
) -> TimeSlot {
    TimeSlot {
        title: title.clone(),
        description: description.clone(),
        ..TimeSlot::window(date, start, end)
    }
}
