//! Structured extraction of candidate slots from free text

pub mod ports;
pub mod service;
pub mod validation;

pub use ports::{ExtractionRequest, ExtractionStrategy};
pub use service::{Extracted, StructuredExtractor};
pub use validation::{validate_extraction, Validated};
