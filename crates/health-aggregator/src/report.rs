//! Console rendering and JSON export of pipeline results.

use std::io::{self, Write};
use std::path::Path;

use health_core::error::{HealthError, Result};
use health_core::formatting::format_hours;
use health_core::models::{CorrelationResult, DailyRecord};
use health_data::aggregator::DailyAggregator;
use health_data::analysis::AnalysisMetadata;

// ── Daily table ───────────────────────────────────────────────────────────────

/// Render the per-day table with a totals row.
pub fn write_daily_table<W: Write>(out: &mut W, records: &[DailyRecord]) -> io::Result<()> {
    if records.is_empty() {
        writeln!(out, "No daily records to display.")?;
        return Ok(());
    }

    writeln!(out, "\nPer-day summary (local dates):")?;
    writeln!(
        out,
        "{:<12} {:>9} {:>10} {:>10}",
        "Date", "Sleep(h)", "Calories", "Workouts"
    )?;

    for r in records {
        writeln!(
            out,
            "{:<12} {:>9.2} {:>10.2} {:>10}",
            r.day.format("%Y-%m-%d").to_string(),
            r.total_sleep_hours,
            r.total_calories_burned,
            r.workout_count
        )?;
    }

    let totals = DailyAggregator::calculate_totals(records);
    writeln!(out, "{}", "-".repeat(44))?;
    writeln!(
        out,
        "{:<12} {:>9.2} {:>10.2} {:>10}",
        format!("{} days", totals.days),
        totals.sleep_hours,
        totals.calories,
        totals.workout_count
    )?;
    writeln!(
        out,
        "Average sleep per day: {}",
        format_hours(totals.sleep_hours / totals.days as f64)
    )?;

    Ok(())
}

// ── Correlation ───────────────────────────────────────────────────────────────

/// Render the short-sleep calorie summary.
pub fn write_correlation<W: Write>(out: &mut W, result: &CorrelationResult) -> io::Result<()> {
    writeln!(out, "\nCorrelation: sleep vs calories")?;
    writeln!(out, "Total days analyzed: {}", result.num_total)?;
    writeln!(out, "Sleep threshold: {:?} hours", result.threshold_hours)?;
    writeln!(out, "Days below threshold: {}", result.num_below)?;

    match result.avg_calories_below {
        None => writeln!(
            out,
            "No days with sleep below threshold; metric is undefined."
        )?,
        Some(avg) => writeln!(
            out,
            "Average calories on days with < {:?}h sleep: {:.2}",
            result.threshold_hours, avg
        )?,
    }

    Ok(())
}

/// Render a one-line note about skipped records, if any.
pub fn write_skip_summary<W: Write>(out: &mut W, metadata: &AnalysisMetadata) -> io::Result<()> {
    if metadata.sleep_records_skipped == 0 && metadata.workout_records_skipped == 0 {
        return Ok(());
    }
    writeln!(
        out,
        "\nSkipped records: {} of {} sleep, {} of {} workouts (see warnings).",
        metadata.sleep_records_skipped,
        metadata.sleep_records_read,
        metadata.workout_records_skipped,
        metadata.workout_records_read
    )
}

// ── JSON export ───────────────────────────────────────────────────────────────

/// Write merged daily records to `path` as a pretty-printed JSON array.
pub fn write_daily_records_json(path: &Path, records: &[DailyRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(path, json).map_err(|source| HealthError::FileWrite {
        path: path.to_path_buf(),
        source,
    })
}

// ── Tests ──────────────────────────────────────────────────────────────────────
