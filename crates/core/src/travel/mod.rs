//! Travel-time estimation and buffer insertion

pub mod augmenter;
pub mod estimator;

pub use augmenter::TravelAugmenter;
pub use estimator::{RoundTrip, TravelTimeEstimator};
