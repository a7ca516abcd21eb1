//! Per-record skip warnings and the sinks that receive them.
//!
//! A malformed record never aborts a batch: the normalizer drops it and
//! hands a [`SkipWarning`] to whatever [`WarningSink`] the caller supplied.

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::models::Dataset;

/// Why a raw record was dropped during normalization.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// The record is not a JSON object.
    #[error("record is not an object")]
    NotAnObject,

    /// A required field is absent, empty, or not a string.
    #[error("missing or empty field '{0}'")]
    MissingField(&'static str),

    /// A timestamp field could not be parsed.
    #[error("malformed timestamp '{0}'")]
    MalformedTimestamp(String),

    /// The interval ends before it starts.
    #[error("end time is before start time")]
    EndBeforeStart,

    /// `calories_burned` is present but not a non-negative number.
    #[error("invalid calories value '{0}'")]
    InvalidCalories(String),
}

/// A dropped record, identified by its position in the input array.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkipWarning {
    pub dataset: Dataset,
    pub index: usize,
    pub reason: SkipReason,
}

impl std::fmt::Display for SkipWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} record {} skipped: {}",
            self.dataset, self.index, self.reason
        )
    }
}

// ── Sinks ─────────────────────────────────────────────────────────────────────

/// Receives warnings for records that were skipped.
pub trait WarningSink {
    fn emit(&mut self, warning: SkipWarning);
}

/// Collects warnings in memory, mainly so tests can assert on skip reasons.
impl WarningSink for Vec<SkipWarning> {
    fn emit(&mut self, warning: SkipWarning) {
        self.push(warning);
    }
}

/// Forwards every warning to `tracing` at WARN level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl WarningSink for LogSink {
    fn emit(&mut self, warning: SkipWarning) {
        warn!(
            dataset = %warning.dataset,
            index = warning.index,
            reason = %warning.reason,
            "Skipping malformed record"
        );
    }
}

/// Counts warnings per dataset while forwarding them to an inner sink.
pub struct CountingSink<'a, S: WarningSink + ?Sized> {
    inner: &'a mut S,
    pub sleep_skipped: usize,
    pub workout_skipped: usize,
}

impl<'a, S: WarningSink + ?Sized> CountingSink<'a, S> {
    pub fn new(inner: &'a mut S) -> Self {
        Self {
            inner,
            sleep_skipped: 0,
            workout_skipped: 0,
        }
    }
}

impl<S: WarningSink + ?Sized> WarningSink for CountingSink<'_, S> {
    fn emit(&mut self, warning: SkipWarning) {
        match warning.dataset {
            Dataset::Sleep => self.sleep_skipped += 1,
            Dataset::Workout => self.workout_skipped += 1,
        }
        self.inner.emit(warning);
    }
}
