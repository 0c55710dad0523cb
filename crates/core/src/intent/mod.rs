//! Intent classification

pub mod ports;
pub mod service;

pub use ports::IntentModel;
pub use service::{IntentClassifier, IntentOutcome};
