use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::warnings::SkipReason;

/// Which input feed a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    /// Sleep-tracker export (absolute / UTC timestamps).
    Sleep,
    /// Workout-app export (local wall-clock timestamps).
    Workout,
}

impl std::fmt::Display for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dataset::Sleep => write!(f, "sleep"),
            Dataset::Workout => write!(f, "workout"),
        }
    }
}

/// Exact length of the interval between two instants, in hours.
fn hours_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_milliseconds() as f64 / 3_600_000.0
}

// ── SleepEvent ────────────────────────────────────────────────────────────────

/// A validated sleep interval.
///
/// Built only through [`SleepEvent::new`], which rejects intervals whose end
/// precedes their start.
#[derive(Debug, Clone, PartialEq)]
pub struct SleepEvent {
    /// Start timestamp exactly as it appeared in the input.
    pub raw_start: String,
    /// End timestamp exactly as it appeared in the input.
    pub raw_end: String,
    pub start_utc: DateTime<Utc>,
    pub end_utc: DateTime<Utc>,
    /// `start_utc` viewed in the user's timezone.
    pub start_local: DateTime<Tz>,
    /// `end_utc` viewed in the user's timezone.
    pub end_local: DateTime<Tz>,
}

impl SleepEvent {
    /// Build a sleep event from absolute instants, deriving the local views
    /// in `user_tz`.
    pub fn new(
        raw_start: impl Into<String>,
        raw_end: impl Into<String>,
        start_utc: DateTime<Utc>,
        end_utc: DateTime<Utc>,
        user_tz: Tz,
    ) -> Result<Self, SkipReason> {
        if end_utc < start_utc {
            return Err(SkipReason::EndBeforeStart);
        }
        Ok(Self {
            raw_start: raw_start.into(),
            raw_end: raw_end.into(),
            start_utc,
            end_utc,
            start_local: start_utc.with_timezone(&user_tz),
            end_local: end_utc.with_timezone(&user_tz),
        })
    }

    /// Duration in hours, measured on absolute instants so DST shifts in the
    /// local calendar do not distort it.
    pub fn duration_hours(&self) -> f64 {
        hours_between(self.start_utc, self.end_utc)
    }

    /// Local calendar day on which the sleeper wakes up.
    pub fn wake_day(&self) -> NaiveDate {
        self.end_local.date_naive()
    }
}

// ── WorkoutEvent ──────────────────────────────────────────────────────────────

/// A validated workout interval with the calories it burned.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutEvent {
    pub raw_start: String,
    pub raw_end: String,
    pub start_utc: DateTime<Utc>,
    pub end_utc: DateTime<Utc>,
    pub start_local: DateTime<Tz>,
    pub end_local: DateTime<Tz>,
    /// Non-negative, finite calorie count.
    pub calories_burned: f64,
}

impl WorkoutEvent {
    /// Build a workout event from local wall-clock instants, deriving the UTC
    /// views.
    pub fn new(
        raw_start: impl Into<String>,
        raw_end: impl Into<String>,
        start_local: DateTime<Tz>,
        end_local: DateTime<Tz>,
        calories_burned: f64,
    ) -> Result<Self, SkipReason> {
        let start_utc = start_local.with_timezone(&Utc);
        let end_utc = end_local.with_timezone(&Utc);
        if end_utc < start_utc {
            return Err(SkipReason::EndBeforeStart);
        }
        if !calories_burned.is_finite() || calories_burned < 0.0 {
            return Err(SkipReason::InvalidCalories(calories_burned.to_string()));
        }
        Ok(Self {
            raw_start: raw_start.into(),
            raw_end: raw_end.into(),
            start_utc,
            end_utc,
            start_local,
            end_local,
            calories_burned,
        })
    }

    pub fn duration_hours(&self) -> f64 {
        hours_between(self.start_utc, self.end_utc)
    }

    /// Local calendar day on which the workout started.
    pub fn start_day(&self) -> NaiveDate {
        self.start_local.date_naive()
    }
}

// ── DailyRecord ───────────────────────────────────────────────────────────────

/// Sleep and workout totals for one local calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    /// Local calendar day, serialized as `YYYY-MM-DD`.
    #[serde(rename = "date")]
    pub day: NaiveDate,
    /// Hours of sleep credited to this day, rounded to 2 decimals.
    pub total_sleep_hours: f64,
    /// Calories burned in workouts started this day, rounded to 2 decimals.
    pub total_calories_burned: f64,
    pub workout_count: u32,
}

// ── CorrelationResult ─────────────────────────────────────────────────────────

/// Summary of calories burned on short-sleep days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    #[serde(rename = "sleep_threshold_hours")]
    pub threshold_hours: f64,
    /// Days with strictly less sleep than the threshold.
    #[serde(rename = "num_days_below_threshold")]
    pub num_below: usize,
    /// Mean calories over the below-threshold days, rounded to 2 decimals.
    ///
    /// `None` when no day qualifies; this is distinct from an average of 0.
    #[serde(rename = "avg_calories_below_threshold")]
    pub avg_calories_below: Option<f64>,
    #[serde(rename = "num_days_total")]
    pub num_total: usize,
}
