//! Extraction envelopes: what the model returns and what the pipeline emits

use serde::{Deserialize, Serialize};

use super::intent::TaskType;
use super::slot::TimeSlot;
use crate::constants::EXTRACTION_GUIDANCE;
use crate::impl_wire_name_conversions;

/// Structured result for one user message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ExtractionResult {
    /// Resolved intent, serialized as `task_type`.
    #[serde(rename = "task_type")]
    pub intent: TaskType,

    /// Slots in `(date, start, end)` order, serialized as `dates`.
    #[serde(rename = "dates", default)]
    pub slots: Vec<TimeSlot>,

    /// Where the user will be, when stated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Where the other party is, when stated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counterpart_location: Option<String>,

    /// Meeting length the user asked for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_duration_hours: Option<f64>,
}

impl ExtractionResult {
    /// Result without location metadata.
    #[must_use]
    pub const fn new(intent: TaskType, slots: Vec<TimeSlot>) -> Self {
        Self {
            intent,
            slots,
            location: None,
            counterpart_location: None,
            meeting_duration_hours: None,
        }
    }

    /// Same metadata, different slots.
    #[must_use]
    pub fn with_slots(&self, slots: Vec<TimeSlot>) -> Self {
        Self { slots, ..self.clone() }
    }
}

/// Final output contract: either a result or a user-facing error message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScheduleResponse {
    /// Slots were extracted (possibly none).
    Extracted(ExtractionResult),
    /// Extraction failed; `error` holds the guidance text.
    Failed { error: String },
}

impl ScheduleResponse {
    /// The guidance message shown when nothing could be extracted.
    #[must_use]
    pub fn guidance() -> Self {
        Self::Failed { error: EXTRACTION_GUIDANCE.to_string() }
    }

    /// The extraction, unless this is the guidance response.
    #[must_use]
    pub const fn result(&self) -> Option<&ExtractionResult> {
        match self {
            Self::Extracted(result) => Some(result),
            Self::Failed { .. } => None,
        }
    }
}

/// Candidate slot exactly as a language model produced it.
///
/// Every field is an unvalidated string; the extractor owns the parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CandidateSlot {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Raw model output before post-validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RawExtraction {
    #[serde(default)]
    pub task_type: Option<String>,
    #[serde(default)]
    pub dates: Vec<CandidateSlot>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub counterpart_location: Option<String>,
    #[serde(default)]
    pub meeting_duration_hours: Option<f64>,
}

/// Which extraction strategy produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Primary,
    Fallback,
}

impl_wire_name_conversions!(StrategyKind {
    Primary => "primary",
    Fallback => "fallback",
});
