//! End-to-end pipeline for the health aggregator.
//!
//! Chains normalization, daily aggregation and the correlation summary,
//! returning an [`AnalysisResult`] ready for rendering.

use std::path::Path;

use chrono_tz::Tz;
use health_core::error::Result;
use health_core::models::{CorrelationResult, DailyRecord, SleepEvent, WorkoutEvent};
use health_core::warnings::{CountingSink, WarningSink};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::aggregator::DailyAggregator;
use crate::correlation::CorrelationAnalyzer;
use crate::normalizer::{normalize_sleep, normalize_workout};
use crate::reader::load_records;

// ── Public types ──────────────────────────────────────────────────────────────

/// Record counts gathered while running the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisMetadata {
    pub sleep_records_read: usize,
    pub sleep_records_skipped: usize,
    pub workout_records_read: usize,
    pub workout_records_skipped: usize,
    /// IANA name of the timezone the local calendar was built in.
    pub timezone: String,
}

/// The complete output of one pipeline run.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub sleep_events: Vec<SleepEvent>,
    pub workout_events: Vec<WorkoutEvent>,
    /// Daily records sorted by day.
    pub daily_records: Vec<DailyRecord>,
    pub correlation: CorrelationResult,
    pub metadata: AnalysisMetadata,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Run the pipeline over already-loaded records.
///
/// Skipped records are reported to `sink`; the run itself cannot fail.
pub fn analyze_records(
    sleep_raw: &[Value],
    workouts_raw: &[Value],
    user_tz: Tz,
    threshold_hours: f64,
    sink: &mut dyn WarningSink,
) -> AnalysisResult {
    let mut counting = CountingSink::new(sink);

    let sleep_events = normalize_sleep(sleep_raw, user_tz, &mut counting);
    let workout_events = normalize_workout(workouts_raw, user_tz, &mut counting);

    if sleep_events.is_empty() {
        warn!("No valid sleep records after normalization; sleep-based metrics may be meaningless");
    }
    if workout_events.is_empty() {
        warn!("No valid workout records after normalization; calorie metrics may be meaningless");
    }

    let daily_records = DailyAggregator::aggregate(&sleep_events, &workout_events);
    let correlation = CorrelationAnalyzer::compute_below_threshold(&daily_records, threshold_hours);

    let metadata = AnalysisMetadata {
        sleep_records_read: sleep_raw.len(),
        sleep_records_skipped: counting.sleep_skipped,
        workout_records_read: workouts_raw.len(),
        workout_records_skipped: counting.workout_skipped,
        timezone: user_tz.name().to_string(),
    };

    info!(
        "Built {} daily records from {} sleep and {} workout events",
        daily_records.len(),
        sleep_events.len(),
        workout_events.len()
    );

    AnalysisResult {
        sleep_events,
        workout_events,
        daily_records,
        correlation,
        metadata,
    }
}

/// Load both JSON files and run the pipeline.
///
/// Fails only on boundary errors (unreadable file, invalid JSON, a
/// top-level value that is not an array).
pub fn analyze_files(
    sleep_path: &Path,
    workouts_path: &Path,
    user_tz: Tz,
    threshold_hours: f64,
    sink: &mut dyn WarningSink,
) -> Result<AnalysisResult> {
    let sleep_raw = load_records(sleep_path)?;
    let workouts_raw = load_records(workouts_path)?;
    Ok(analyze_records(
        &sleep_raw,
        &workouts_raw,
        user_tz,
        threshold_hours,
        sink,
    ))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
