//! HTTP transport

pub mod client;

pub use client::{retry_after, HttpClient, HttpClientBuilder};
