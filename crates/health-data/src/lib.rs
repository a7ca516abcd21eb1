//! Data pipeline for the personal health aggregator.
//!
//! Loads the sleep and workout JSON exports, normalizes them into
//! timezone-aware events, buckets them into per-day records and computes the
//! short-sleep calorie summary.

pub mod aggregator;
pub mod analysis;
pub mod correlation;
pub mod normalizer;
pub mod reader;

pub use health_core as core;
