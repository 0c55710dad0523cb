//! Pure helper functions with no I/O

pub mod clock_time;
pub mod title;
