//! Core domain types for the personal health aggregator.
//!
//! Holds the timestamp parsing rules, the normalized event and daily record
//! models, skip warnings, rounding helpers and CLI settings shared by the
//! data pipeline and the binary.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;
pub mod warnings;

pub use error::{HealthError, Result};
