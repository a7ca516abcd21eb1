use std::path::PathBuf;

use chrono_tz::Tz;
use clap::Parser;

use crate::error::{HealthError, Result};
use crate::time_utils::resolve_timezone;

/// Default sleep threshold (hours) for the correlation summary.
pub const DEFAULT_THRESHOLD_HOURS: f64 = 6.0;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Merge sleep (UTC) and workouts (local time) into daily records and compute
/// a simple sleep/calories correlation.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "health-aggregator",
    about = "Personal health data aggregator: daily sleep and workout totals",
    version
)]
pub struct Settings {
    /// Path to sleep.json (timestamps in UTC)
    #[arg(long)]
    pub sleep: PathBuf,

    /// Path to workouts.json (timestamps in local time)
    #[arg(long)]
    pub workouts: PathBuf,

    /// IANA timezone for the user ("auto" uses the system timezone)
    #[arg(long, default_value = "America/Los_Angeles", env = "HEALTH_TIMEZONE")]
    pub timezone: String,

    /// Sleep threshold in hours for the correlation
    #[arg(long, default_value_t = DEFAULT_THRESHOLD_HOURS)]
    pub threshold: f64,

    /// Optional path to write merged daily records as JSON
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Resolve and validate the configured timezone.
    pub fn resolve_timezone(&self) -> Result<Tz> {
        resolve_timezone(&self.timezone)
    }

    /// Reject thresholds that cannot meaningfully split sleep hours.
    pub fn validate_threshold(&self) -> Result<f64> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(HealthError::Config(format!(
                "sleep threshold must be a non-negative number of hours, got {}",
                self.threshold
            )));
        }
        Ok(self.threshold)
    }

    /// Log level after applying `--debug`.
    pub fn effective_log_level(&self) -> &str {
        if self.debug {
            "DEBUG"
        } else {
            &self.log_level
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
