//! # Yotei
//!
//! Composition root and command-line entry point.
//!
//! This crate contains:
//! - Application context (dependency injection)
//! - Logging setup for the `yotei` binary
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires the OpenAI adapters into the scheduling pipeline

pub mod context;
pub mod utils;

pub use context::*;
