//! Short-sleep calorie statistic over daily records.

use health_core::formatting::round2;
use health_core::models::{CorrelationResult, DailyRecord};

/// Reads daily records and summarises calories burned on short-sleep days.
pub struct CorrelationAnalyzer;

impl CorrelationAnalyzer {
    /// Count days with strictly less than `threshold_hours` of sleep and
    /// average their calories.
    ///
    /// The average is `None` when no day qualifies.
    pub fn compute_below_threshold(
        daily_records: &[DailyRecord],
        threshold_hours: f64,
    ) -> CorrelationResult {
        let below: Vec<f64> = daily_records
            .iter()
            .filter(|r| r.total_sleep_hours < threshold_hours)
            .map(|r| r.total_calories_burned)
            .collect();

        let avg_calories_below = if below.is_empty() {
            None
        } else {
            Some(round2(below.iter().sum::<f64>() / below.len() as f64))
        };

        CorrelationResult {
            threshold_hours,
            num_below: below.len(),
            avg_calories_below,
            num_total: daily_records.len(),
        }
    }
}
