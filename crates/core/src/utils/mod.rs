//! Pure text and calendar helpers shared by the pipeline stages

pub mod patterns;
pub mod temporal;
