//! Intent of a scheduling message

use serde::{Deserialize, Serialize};

use crate::constants::{CLASSIFIER_FALLBACK_CONFIDENCE, CLASSIFIER_FALLBACK_REASON};
use crate::impl_wire_name_conversions;

/// What the user wants done with the dates they mentioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    /// "When am I free?" Only dates and times, no content.
    #[default]
    AvailabilityCheck,
    /// Dates and times plus something to put in the calendar.
    AddEvent,
    /// No usable date/time or the request is ambiguous.
    Unknown,
}

impl_wire_name_conversions!(TaskType {
    AvailabilityCheck => "availability_check",
    AddEvent => "add_event",
    Unknown => "unknown",
});

/// Output of the intent classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentClassification {
    /// Classified message kind.
    pub intent: TaskType,
    /// 0.0..=1.0
    pub confidence: f32,
    /// Short explanation from the model, or the fallback note.
    pub reason: String,
}

impl IntentClassification {
    /// Build a classification, clamping confidence into `0.0..=1.0`.
    pub fn new(intent: TaskType, confidence: f32, reason: impl Into<String>) -> Self {
        let confidence = if confidence.is_nan() { 0.0 } else { confidence.clamp(0.0, 1.0) };
        Self { intent, confidence, reason: reason.into() }
    }

    /// The value used whenever the classifier cannot answer.
    #[must_use]
    pub fn fallback() -> Self {
        Self::new(
            TaskType::AvailabilityCheck,
            CLASSIFIER_FALLBACK_CONFIDENCE,
            CLASSIFIER_FALLBACK_REASON,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_match_serde() {
        let json = serde_json::to_string(&TaskType::AddEvent).unwrap();
        assert_eq!(json, format!("\"{}\"", TaskType::AddEvent));
        assert_eq!("availability_check".parse::<TaskType>(), Ok(TaskType::AvailabilityCheck));
    }

    #[test]
    fn confidence_is_clamped() {
        assert_eq!(IntentClassification::new(TaskType::AddEvent, 1.7, "x").confidence, 1.0);
        assert_eq!(IntentClassification::new(TaskType::AddEvent, -0.2, "x").confidence, 0.0);
        assert_eq!(IntentClassification::new(TaskType::AddEvent, f32::NAN, "x").confidence, 0.0);
    }

    #[test]
    fn fallback_is_availability_check_at_half_confidence() {
        let fallback = IntentClassification::fallback();
        assert_eq!(fallback.intent, TaskType::AvailabilityCheck);
        assert!((fallback.confidence - 0.5).abs() < f32::EPSILON);
        assert!(fallback.reason.contains("availability_check"));
    }
}
