//! End-to-end pipeline behaviour with scripted model ports

mod support;

use std::sync::Arc;

use serde_json::json;
use support::models::{candidate, reply, MockIntentModel, RecordingObserver, ScriptedStrategy};
use support::{date, tokyo_reference, tokyo_resolver};
use yotei_core::{NoopObserver, PipelineStage, SchedulingPipeline, Supplementer};
use yotei_domain::constants::{OUTBOUND_TRAVEL_LABEL, RETURN_TRAVEL_LABEL};
use yotei_domain::utils::clock_time::{clock, end_of_day};
use yotei_domain::{RawExtraction, ScheduleResponse, StrategyKind, TaskType, TimeSlot};

fn pipeline(
    today: chrono::NaiveDate,
    intent: MockIntentModel,
    model_reply: RawExtraction,
) -> SchedulingPipeline {
    SchedulingPipeline::builder()
        .resolver(tokyo_resolver(today))
        .intent_model(Arc::new(intent))
        .strategy(ScriptedStrategy::replying(StrategyKind::Primary, model_reply))
        .build()
        .unwrap()
}

fn slots(response: &ScheduleResponse) -> &[TimeSlot] {
    &response.result().expect("extraction should succeed").slots
}

#[tokio::test]
async fn explicit_date_range_covers_every_day() {
    let today = date(2025, 11, 20);
    let model = reply(TaskType::AvailabilityCheck, vec![candidate("2025-12-05", None, None)]);
    let pipeline = pipeline(today, MockIntentModel::answering(TaskType::AvailabilityCheck), model);

    let response = pipeline.process("12/5-12/8で空いている時間を教えて").await;

    let slots = slots(&response);
    assert_eq!(slots.len(), 4);
    for (offset, slot) in slots.iter().enumerate() {
        assert_eq!(slot.date, date(2025, 12, 5 + offset as u32));
        assert_eq!((slot.start_time, slot.end_time), (Some(clock(9, 0)), Some(clock(18, 0))));
        assert_eq!(slot.title, None);
    }
}

#[tokio::test]
async fn bullet_lines_missed_by_the_model_are_recovered() {
    let today = date(2025, 7, 1);
    let model = reply(TaskType::AvailabilityCheck, vec![candidate("2025-07-10", Some("09:00"), Some("10:00"))]);
    let pipeline = pipeline(today, MockIntentModel::answering(TaskType::AvailabilityCheck), model);

    let response = pipeline.process("以下で空いてますか\n・7/10 9-10時\n・7/11 9-10時").await;

    assert_eq!(
        slots(&response).iter().map(TimeSlot::key).collect::<Vec<_>>(),
        vec![
            TimeSlot::window(date(2025, 7, 10), clock(9, 0), clock(10, 0)).key(),
            TimeSlot::window(date(2025, 7, 11), clock(9, 0), clock(10, 0)).key(),
        ]
    );
}

#[tokio::test]
async fn after_point_runs_until_end_of_day() {
    let today = date(2025, 1, 8);
    let model = reply(TaskType::AvailabilityCheck, vec![candidate("2025-01-10", Some("18:00"), None)]);
    let pipeline = pipeline(today, MockIntentModel::answering(TaskType::AvailabilityCheck), model);

    let response = pipeline.process("1/10 18時以降は空いてる？").await;

    let slots = slots(&response);
    assert_eq!(slots.len(), 1);
    assert_eq!((slots[0].start_time, slots[0].end_time), (Some(clock(18, 0)), Some(end_of_day())));
}

#[tokio::test]
async fn next_week_expands_to_seven_business_days() {
    // Wednesday
    let today = date(2025, 1, 8);
    let model = reply(TaskType::AvailabilityCheck, vec![candidate("2025-01-13", None, None)]);
    let pipeline = pipeline(today, MockIntentModel::answering(TaskType::AvailabilityCheck), model);

    let response = pipeline.process("来週空いてる日ある？").await;

    let slots = slots(&response);
    assert_eq!(slots.len(), 7);
    assert_eq!(slots.first().map(|s| s.date), Some(date(2025, 1, 13)));
    assert_eq!(slots.last().map(|s| s.date), Some(date(2025, 1, 19)));
    assert!(slots.iter().all(|s| (s.start_time, s.end_time) == (Some(clock(9, 0)), Some(clock(18, 0)))));
}

#[tokio::test]
async fn next_week_ignores_time_ranges_in_the_message() {
    let today = date(2025, 1, 8);
    let model = reply(TaskType::AvailabilityCheck, vec![candidate("2025-01-14", Some("10:00"), Some("12:00"))]);
    let pipeline = pipeline(today, MockIntentModel::answering(TaskType::AvailabilityCheck), model);

    let response = pipeline.process("来週の10時-12時で空いてる？").await;

    let slots = slots(&response);
    assert_eq!(slots.len(), 7);
    assert_eq!(slots[0].date, date(2025, 1, 13));
    assert!(slots.iter().all(|s| (s.start_time, s.end_time) == (Some(clock(9, 0)), Some(clock(18, 0)))));
}

#[tokio::test]
async fn next_week_add_event_covers_the_whole_week() {
    let today = date(2025, 1, 8);
    let mut meeting = candidate("2025-01-14", Some("10:00"), Some("11:00"));
    meeting.title = Some("会議".into());
    let pipeline = pipeline(today, MockIntentModel::answering(TaskType::AddEvent), reply(TaskType::AddEvent, vec![meeting]));

    let response = pipeline.process("来週会議を入れて").await;

    let slots = slots(&response);
    assert_eq!(slots.len(), 7);
    assert_eq!(slots.last().map(|s| s.date), Some(date(2025, 1, 19)));
    assert!(slots.iter().all(|s| s.title.as_deref() == Some("会議")));
    assert!(slots.iter().all(|s| (s.start_time, s.end_time) == (Some(clock(9, 0)), Some(clock(18, 0)))));
}

#[tokio::test]
async fn all_day_date_range_keeps_whole_days() {
    let today = date(2025, 11, 20);
    let model = reply(TaskType::AvailabilityCheck, vec![candidate("2025-12-05", None, None)]);
    let pipeline = pipeline(today, MockIntentModel::answering(TaskType::AvailabilityCheck), model);

    let response = pipeline.process("12/5-12/8 終日空いてる？").await;

    let slots = slots(&response);
    assert_eq!(slots.iter().map(|s| s.date).collect::<Vec<_>>(), vec![
        date(2025, 12, 5),
        date(2025, 12, 6),
        date(2025, 12, 7),
        date(2025, 12, 8),
    ]);
    assert!(slots.iter().all(|s| (s.start_time, s.end_time) == (Some(clock(0, 0)), Some(end_of_day()))));
}

#[tokio::test]
async fn past_month_rolls_into_next_year() {
    let today = date(2025, 3, 15);
    let model = reply(TaskType::AvailabilityCheck, vec![candidate("2026-01-05", None, None)]);
    let pipeline = pipeline(today, MockIntentModel::answering(TaskType::AvailabilityCheck), model);

    let response = pipeline.process("1月の空き時間を教えて").await;

    let slots = slots(&response);
    assert_eq!(slots.len(), 31);
    assert!(slots.iter().all(|s| s.date >= date(2026, 1, 1) && s.date <= date(2026, 1, 31)));
}

#[tokio::test]
async fn all_day_slot_yields_to_a_narrower_one() {
    let today = date(2025, 1, 8);
    let model = reply(
        TaskType::AvailabilityCheck,
        vec![
            candidate("2025-01-10", Some("00:00"), Some("23:59")),
            candidate("2025-01-10", Some("10:00"), Some("11:00")),
        ],
    );
    let pipeline = pipeline(today, MockIntentModel::answering(TaskType::AvailabilityCheck), model);

    let response = pipeline.process("1/10 終日、ただし10時-11時は除く").await;

    let slots = slots(&response);
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].start_time, Some(clock(10, 0)));
}

#[tokio::test]
async fn add_event_visit_gets_travel_buffers() {
    let today = date(2025, 1, 8);
    let mut visit = candidate("2025-01-10", Some("14:00"), None);
    visit.title = Some("A社訪問".into());
    let pipeline = pipeline(today, MockIntentModel::answering(TaskType::AddEvent), reply(TaskType::AddEvent, vec![visit]));

    let response = pipeline.process("1/10 14時からA社訪問").await;

    let slots = slots(&response);
    let titles: Vec<_> = slots.iter().map(|s| s.title.as_deref().unwrap_or_default()).collect();
    assert_eq!(titles, vec![OUTBOUND_TRAVEL_LABEL, "A社訪問", RETURN_TRAVEL_LABEL]);
    assert_eq!(slots[0].start_time, Some(clock(13, 0)));
    assert_eq!(slots[2].end_time, Some(clock(16, 0)));
}

#[tokio::test]
async fn add_event_without_title_gets_placeholder() {
    let today = date(2025, 1, 8);
    let model = reply(TaskType::AddEvent, vec![candidate("2025-01-09", Some("10:00"), Some("11:00"))]);
    let pipeline = pipeline(today, MockIntentModel::answering(TaskType::AddEvent), model);

    let response = pipeline.process("明日10時から11時で入れておいて").await;

    assert_eq!(slots(&response)[0].title.as_deref(), Some("予定（2025-01-09 10:00〜11:00）"));
}

#[tokio::test]
async fn classifier_failure_defaults_to_availability_check() {
    let today = date(2025, 1, 8);
    let strategy = ScriptedStrategy::replying(
        StrategyKind::Primary,
        reply(TaskType::AddEvent, vec![candidate("2025-01-09", Some("10:00"), Some("11:00"))]),
    );
    let pipeline = SchedulingPipeline::builder()
        .resolver(tokyo_resolver(today))
        .intent_model(Arc::new(MockIntentModel::failing()))
        .strategy(strategy.clone())
        .build()
        .unwrap();

    let response = pipeline.process("明日10時からどう？").await;

    let result = response.result().unwrap();
    assert_eq!(strategy.last_intent(), Some(TaskType::AvailabilityCheck));
    assert_eq!(result.intent, TaskType::AvailabilityCheck);
    assert!(result.slots.iter().all(|s| s.title.is_none()));
}

#[tokio::test]
async fn fallback_strategy_runs_after_primary_failure() {
    let today = date(2025, 1, 8);
    let primary = ScriptedStrategy::failing(StrategyKind::Primary);
    let fallback = ScriptedStrategy::replying(
        StrategyKind::Fallback,
        reply(TaskType::AvailabilityCheck, vec![candidate("2025-01-09", None, None)]),
    );
    let pipeline = SchedulingPipeline::builder()
        .resolver(tokyo_resolver(today))
        .intent_model(Arc::new(MockIntentModel::answering(TaskType::AvailabilityCheck)))
        .strategy(primary.clone())
        .strategy(fallback.clone())
        .build()
        .unwrap();

    let response = pipeline.process("明日空いてる？").await;

    assert_eq!(primary.calls(), 1);
    assert_eq!(fallback.calls(), 1);
    assert_eq!(slots(&response).len(), 1);
}

#[tokio::test]
async fn both_strategies_failing_returns_guidance() {
    let observer = Arc::new(RecordingObserver::default());
    let pipeline = SchedulingPipeline::builder()
        .resolver(tokyo_resolver(date(2025, 1, 8)))
        .intent_model(Arc::new(MockIntentModel::answering(TaskType::Unknown)))
        .strategy(ScriptedStrategy::failing(StrategyKind::Primary))
        .strategy(ScriptedStrategy::failing(StrategyKind::Fallback))
        .observer(observer.clone())
        .build()
        .unwrap();

    let response = pipeline.process("よろしく").await;

    assert_eq!(response, ScheduleResponse::guidance());
    assert_eq!(
        observer.stages(),
        vec![PipelineStage::Raw, PipelineStage::IntentClassified, PipelineStage::ExtractionFailed]
    );
}

#[tokio::test]
async fn successful_run_walks_every_stage() {
    let observer = Arc::new(RecordingObserver::default());
    let pipeline = SchedulingPipeline::builder()
        .resolver(tokyo_resolver(date(2025, 1, 8)))
        .intent_model(Arc::new(MockIntentModel::answering(TaskType::AvailabilityCheck)))
        .strategy(ScriptedStrategy::replying(
            StrategyKind::Primary,
            reply(TaskType::AvailabilityCheck, vec![candidate("2025-01-09", None, None)]),
        ))
        .observer(observer.clone())
        .build()
        .unwrap();

    pipeline.process("明日空いてる？").await;

    assert_eq!(
        observer.stages(),
        vec![
            PipelineStage::Raw,
            PipelineStage::IntentClassified,
            PipelineStage::Extracted,
            PipelineStage::Supplemented,
            PipelineStage::Augmented,
            PipelineStage::Ready,
        ]
    );
}

#[tokio::test]
async fn supplementing_twice_changes_nothing() {
    let today = date(2025, 7, 1);
    let reference = tokyo_reference(today);
    let texts = [
        ("12/5-12/8 18時以降", TaskType::AvailabilityCheck),
        ("・7/10 9-10時\n・7/11 9-10時 田中さんとMTG", TaskType::AddEvent),
        ("来週の空き", TaskType::AvailabilityCheck),
        ("来週会議を入れて", TaskType::AddEvent),
        ("12/5-12/8 終日", TaskType::AvailabilityCheck),
        ("1月の空き", TaskType::AvailabilityCheck),
        ("明日ランチどう？", TaskType::AddEvent),
    ];
    let supplementer = Supplementer::standard();

    for (text, intent) in texts {
        let model = reply(intent, vec![candidate("2025-07-10", None, None)]);
        let pipeline = pipeline(today, MockIntentModel::answering(intent), model);
        let first = pipeline.process_at(text, &reference).await.result().cloned().unwrap();

        let again = supplementer.supplement(first.clone(), text, today, &NoopObserver);

        assert_eq!(again, first, "not idempotent for {text}");
        let mut keys: Vec<_> = first.slots.iter().map(TimeSlot::key).collect();
        keys.dedup();
        assert_eq!(keys.len(), first.slots.len(), "duplicate slots for {text}");
    }
}

#[tokio::test]
async fn serializes_to_the_wire_shape() {
    let today = date(2025, 11, 20);
    let model = reply(TaskType::AvailabilityCheck, vec![candidate("2025-12-05", Some("10:00"), Some("11:00"))]);
    let pipeline = pipeline(today, MockIntentModel::answering(TaskType::AvailabilityCheck), model);

    let response = pipeline.process("12/5 10時-11時は空いてる？").await;

    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({
            "task_type": "availability_check",
            "dates": [{ "date": "2025-12-05", "time": "10:00", "end_time": "11:00" }]
        })
    );
}
