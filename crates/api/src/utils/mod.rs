//! Binary-side helpers

pub mod logging;
