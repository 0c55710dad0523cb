//! Domain types and models

pub mod extraction;
pub mod intent;
pub mod slot;

pub use extraction::{CandidateSlot, ExtractionResult, RawExtraction, ScheduleResponse, StrategyKind};
pub use intent::{IntentClassification, TaskType};
pub use slot::{SlotKey, TimeSlot};
