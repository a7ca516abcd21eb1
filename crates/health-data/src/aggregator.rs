//! Per-day aggregation of normalized sleep and workout events.
//!
//! Sleep is credited to the local day on which the sleeper wakes; workouts
//! are credited to the local day on which they start. Neither is ever split
//! across midnight.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use health_core::formatting::round2;
use health_core::models::{DailyRecord, SleepEvent, WorkoutEvent};

// ── DayTotals ─────────────────────────────────────────────────────────────────

/// Unrounded running totals for one day.
#[derive(Debug, Clone, Default)]
struct DayTotals {
    sleep_hours: f64,
    calories: f64,
    workout_count: u32,
}

impl DayTotals {
    fn add_sleep(&mut self, event: &SleepEvent) {
        self.sleep_hours += event.duration_hours();
    }

    fn add_workout(&mut self, event: &WorkoutEvent) {
        self.calories += event.calories_burned;
        self.workout_count += 1;
    }

    /// Rounding happens here, once, after all events have been summed.
    fn into_record(self, day: NaiveDate) -> DailyRecord {
        DailyRecord {
            day,
            total_sleep_hours: round2(self.sleep_hours),
            total_calories_burned: round2(self.calories),
            workout_count: self.workout_count,
        }
    }
}

// ── RecordTotals ──────────────────────────────────────────────────────────────

/// Totals across a list of daily records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordTotals {
    pub days: usize,
    pub sleep_hours: f64,
    pub calories: f64,
    pub workout_count: u32,
}

// ── DailyAggregator ───────────────────────────────────────────────────────────

/// Stateless helper that buckets events into calendar-day records.
pub struct DailyAggregator;

impl DailyAggregator {
    /// Build one [`DailyRecord`] per day touched by either event list.
    ///
    /// Days appearing on only one side get zero for the other metrics.
    /// Returns records sorted by day (ascending).
    pub fn aggregate(
        sleep_events: &[SleepEvent],
        workout_events: &[WorkoutEvent],
    ) -> Vec<DailyRecord> {
        // BTreeMap keeps days sorted and doubles as the union of both sides.
        let mut days: BTreeMap<NaiveDate, DayTotals> = BTreeMap::new();

        for event in sleep_events {
            days.entry(event.wake_day()).or_default().add_sleep(event);
        }
        for event in workout_events {
            days.entry(event.start_day()).or_default().add_workout(event);
        }

        days.into_iter()
            .map(|(day, totals)| totals.into_record(day))
            .collect()
    }

    /// Sum already-built daily records, e.g. for a totals row.
    pub fn calculate_totals(records: &[DailyRecord]) -> RecordTotals {
        let mut totals = RecordTotals {
            days: records.len(),
            ..RecordTotals::default()
        };
        for record in records {
            totals.sleep_hours += record.total_sleep_hours;
            totals.calories += record.total_calories_burned;
            totals.workout_count += record.workout_count;
        }
        totals.sleep_hours = round2(totals.sleep_hours);
        totals.calories = round2(totals.calories);
        totals
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
