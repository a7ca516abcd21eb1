//! Conversion of raw JSON records into validated, timezone-aware events.
//!
//! Sleep records carry absolute timestamps; workout records carry local
//! wall-clock time. Every record is processed independently and a bad one
//! is reported to the [`WarningSink`] and dropped, never aborting the batch.

use chrono_tz::Tz;
use health_core::models::{Dataset, SleepEvent, WorkoutEvent};
use health_core::time_utils::TimestampParser;
use health_core::warnings::{SkipReason, SkipWarning, WarningSink};
use serde_json::{Map, Value};
use tracing::debug;

// ── Public API ────────────────────────────────────────────────────────────────

/// Normalize raw sleep records, preserving input order and omitting skipped
/// records.
pub fn normalize_sleep(
    raw_records: &[Value],
    user_tz: Tz,
    sink: &mut dyn WarningSink,
) -> Vec<SleepEvent> {
    let events = normalize_each(raw_records, Dataset::Sleep, sink, |record| {
        sleep_from_record(record, user_tz)
    });
    debug!(
        "Normalized {} of {} sleep records",
        events.len(),
        raw_records.len()
    );
    events
}

/// Normalize raw workout records, preserving input order and omitting skipped
/// records.
pub fn normalize_workout(
    raw_records: &[Value],
    user_tz: Tz,
    sink: &mut dyn WarningSink,
) -> Vec<WorkoutEvent> {
    let events = normalize_each(raw_records, Dataset::Workout, sink, |record| {
        workout_from_record(record, user_tz)
    });
    debug!(
        "Normalized {} of {} workout records",
        events.len(),
        raw_records.len()
    );
    events
}

// ── Per-record conversion ─────────────────────────────────────────────────────

fn normalize_each<T>(
    raw_records: &[Value],
    dataset: Dataset,
    sink: &mut dyn WarningSink,
    convert: impl Fn(&Map<String, Value>) -> Result<T, SkipReason>,
) -> Vec<T> {
    raw_records
        .iter()
        .enumerate()
        .filter_map(|(index, raw)| {
            let result = raw
                .as_object()
                .ok_or(SkipReason::NotAnObject)
                .and_then(&convert);
            match result {
                Ok(event) => Some(event),
                Err(reason) => {
                    sink.emit(SkipWarning {
                        dataset,
                        index,
                        reason,
                    });
                    None
                }
            }
        })
        .collect()
}

fn sleep_from_record(record: &Map<String, Value>, user_tz: Tz) -> Result<SleepEvent, SkipReason> {
    let (raw_start, raw_end) = required_times(record)?;

    let start_utc = TimestampParser::parse_absolute(raw_start)
        .map_err(|_| SkipReason::MalformedTimestamp(raw_start.to_string()))?;
    let end_utc = TimestampParser::parse_absolute(raw_end)
        .map_err(|_| SkipReason::MalformedTimestamp(raw_end.to_string()))?;

    SleepEvent::new(raw_start, raw_end, start_utc, end_utc, user_tz)
}

fn workout_from_record(
    record: &Map<String, Value>,
    user_tz: Tz,
) -> Result<WorkoutEvent, SkipReason> {
    let (raw_start, raw_end) = required_times(record)?;

    let start_local = TimestampParser::parse_local(raw_start, user_tz)
        .map_err(|_| SkipReason::MalformedTimestamp(raw_start.to_string()))?;
    let end_local = TimestampParser::parse_local(raw_end, user_tz)
        .map_err(|_| SkipReason::MalformedTimestamp(raw_end.to_string()))?;
    if end_local < start_local {
        return Err(SkipReason::EndBeforeStart);
    }

    let calories = parse_calories(record.get("calories_burned"))?;

    WorkoutEvent::new(raw_start, raw_end, start_local, end_local, calories)
}

/// Both interval bounds must be present, non-empty strings.
fn required_times(record: &Map<String, Value>) -> Result<(&str, &str), SkipReason> {
    let field = move |name: &'static str| match record.get(name).and_then(Value::as_str) {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(SkipReason::MissingField(name)),
    };
    Ok((field("start_time")?, field("end_time")?))
}

/// An absent `calories_burned` means 0. A present value must be a finite,
/// non-negative number or numeric string.
fn parse_calories(value: Option<&Value>) -> Result<f64, SkipReason> {
    let Some(value) = value else {
        return Ok(0.0);
    };

    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(calories) if calories.is_finite() && calories >= 0.0 => Ok(calories),
        _ => {
            let shown = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Err(SkipReason::InvalidCalories(shown))
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike, Utc};
    use serde_json::json;

    const LA: Tz = Tz::America__Los_Angeles;

    fn sleep(records: Value) -> (Vec<SleepEvent>, Vec<SkipWarning>) {
        let mut warnings: Vec<SkipWarning> = Vec::new();
        let events = normalize_sleep(records.as_array().unwrap(), LA, &mut warnings);
        (events, warnings)
    }

    fn workouts(records: Value) -> (Vec<WorkoutEvent>, Vec<SkipWarning>) {
        let mut warnings: Vec<SkipWarning> = Vec::new();
        let events = normalize_workout(records.as_array().unwrap(), LA, &mut warnings);
        (events, warnings)
    }

    // ── normalize_sleep ──────────────────────────────────────────────────────

    #[test]
    fn test_sleep_basic() {
        let (events, warnings) = sleep(json!([
            {"start_time": "2023-10-01T06:30:00Z", "end_time": "2023-10-01T14:30:00Z"}
        ]));
        assert!(warnings.is_empty());
        assert_eq!(events.len(), 1);

        let e = &events[0];
        assert_eq!(e.raw_start, "2023-10-01T06:30:00Z");
        assert!((e.duration_hours() - 8.0).abs() < 1e-9);
        // 06:30Z is 23:30 PDT on the previous day.
        assert_eq!(e.start_local.day(), 30);
        assert_eq!(e.start_local.hour(), 23);
        assert_eq!(e.end_local.hour(), 7);
    }

    #[test]
    fn test_sleep_offset_timestamp_normalised() {
        let (events, _) = sleep(json!([
            {"start_time": "2023-10-01T22:00:00-07:00", "end_time": "2023-10-02T06:00:00-07:00"}
        ]));
        assert_eq!(events[0].start_utc.hour(), 5);
        assert_eq!(events[0].start_utc.timezone(), Utc);
        assert_eq!(events[0].wake_day().to_string(), "2023-10-02");
    }

    #[test]
    fn test_sleep_end_before_start_is_skipped() {
        let (events, warnings) = sleep(json!([
            {"start_time": "2023-10-02T10:00:00Z", "end_time": "2023-10-02T06:00:00Z"}
        ]));
        assert!(events.is_empty());
        assert_eq!(warnings[0].reason, SkipReason::EndBeforeStart);
        assert_eq!(warnings[0].dataset, Dataset::Sleep);
    }

    #[test]
    fn test_sleep_missing_and_empty_fields_are_skipped() {
        let (events, warnings) = sleep(json!([
            {"start_time": "2023-10-02T01:00:00Z"},
            {"start_time": "", "end_time": "2023-10-02T06:00:00Z"},
            {"start_time": 12345, "end_time": "2023-10-02T06:00:00Z"},
            {"start_time": "2023-10-02T01:00:00Z", "end_time": "2023-10-02T06:00:00Z"}
        ]));
        assert_eq!(events.len(), 1);
        assert_eq!(
            warnings.iter().map(|w| w.index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert_eq!(warnings[0].reason, SkipReason::MissingField("end_time"));
        assert_eq!(warnings[1].reason, SkipReason::MissingField("start_time"));
    }

    #[test]
    fn test_sleep_malformed_timestamp_continues_batch() {
        let (events, warnings) = sleep(json!([
            {"start_time": "last tuesday", "end_time": "2023-10-02T06:00:00Z"},
            {"start_time": "2023-10-03T05:00:00Z", "end_time": "2023-10-03T12:00:00Z"}
        ]));
        assert_eq!(events.len(), 1);
        assert_eq!(
            warnings[0].reason,
            SkipReason::MalformedTimestamp("last tuesday".to_string())
        );
    }

    #[test]
    fn test_sleep_non_object_record_is_skipped() {
        let (events, warnings) = sleep(json!(["2023-10-02T01:00:00Z", null]));
        assert!(events.is_empty());
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().all(|w| w.reason == SkipReason::NotAnObject));
    }

    #[test]
    fn test_sleep_preserves_input_order() {
        let (events, _) = sleep(json!([
            {"start_time": "2023-10-05T06:00:00Z", "end_time": "2023-10-05T13:00:00Z"},
            {"start_time": "2023-10-01T06:00:00Z", "end_time": "2023-10-01T13:00:00Z"}
        ]));
        assert_eq!(events[0].raw_start, "2023-10-05T06:00:00Z");
        assert_eq!(events[1].raw_start, "2023-10-01T06:00:00Z");
    }

    // ── normalize_workout ────────────────────────────────────────────────────

    #[test]
    fn test_workout_basic() {
        let (events, warnings) = workouts(json!([{
            "start_time": "2023-10-03 23:15:00 PDT",
            "end_time": "2023-10-04 00:30:00 PDT",
            "calories_burned": 300
        }]));
        assert!(warnings.is_empty());
        let w = &events[0];
        assert_eq!(w.calories_burned, 300.0);
        assert!((w.duration_hours() - 1.25).abs() < 1e-9);
        assert_eq!(w.start_local.hour(), 23);
        assert_eq!(w.start_day().to_string(), "2023-10-03");
    }

    #[test]
    fn test_workout_without_abbrev_is_local() {
        let (events, _) = workouts(json!([{
            "start_time": "2023-10-02 22:00:00",
            "end_time": "2023-10-02 23:00:00",
            "calories_burned": 300
        }]));
        let w = &events[0];
        assert_eq!(w.start_local.timezone(), LA);
        assert_eq!((w.start_local.hour(), w.start_local.minute()), (22, 0));
        assert_eq!(w.start_utc.hour(), 5);
    }

    #[test]
    fn test_workout_missing_calories_defaults_to_zero() {
        let (events, warnings) = workouts(json!([{
            "start_time": "2023-10-02 10:00:00 PDT",
            "end_time": "2023-10-02 10:30:00 PDT"
        }]));
        assert!(warnings.is_empty());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].calories_burned, 0.0);
    }

    #[test]
    fn test_workout_numeric_string_calories() {
        let (events, _) = workouts(json!([{
            "start_time": "2023-10-02 10:00:00",
            "end_time": "2023-10-02 10:30:00",
            "calories_burned": " 212.5 "
        }]));
        assert_eq!(events[0].calories_burned, 212.5);
    }

    #[test]
    fn test_workout_invalid_calories_skipped() {
        let (events, warnings) = workouts(json!([{
            "start_time": "2023-10-03 10:00:00 PDT",
            "end_time": "2023-10-03 11:00:00 PDT",
            "calories_burned": "???"
        }]));
        assert!(events.is_empty());
        assert_eq!(
            warnings[0].reason,
            SkipReason::InvalidCalories("???".to_string())
        );
    }

    #[test]
    fn test_workout_negative_null_and_bool_calories_skipped() {
        let (events, warnings) = workouts(json!([
            {"start_time": "2023-10-03 10:00", "end_time": "2023-10-03 11:00", "calories_burned": -20},
            {"start_time": "2023-10-03 10:00", "end_time": "2023-10-03 11:00", "calories_burned": null},
            {"start_time": "2023-10-03 10:00", "end_time": "2023-10-03 11:00", "calories_burned": true},
            {"start_time": "2023-10-03 10:00", "end_time": "2023-10-03 11:00", "calories_burned": "NaN"}
        ]));
        assert!(events.is_empty());
        assert_eq!(warnings.len(), 4);
        assert!(warnings
            .iter()
            .all(|w| matches!(w.reason, SkipReason::InvalidCalories(_))));
    }

    #[test]
    fn test_workout_end_before_start_skipped() {
        let (events, warnings) = workouts(json!([{
            "start_time": "2023-10-03 11:00",
            "end_time": "2023-10-03 10:00",
            "calories_burned": 100
        }]));
        assert!(events.is_empty());
        assert_eq!(warnings[0].reason, SkipReason::EndBeforeStart);
        assert_eq!(warnings[0].dataset, Dataset::Workout);
    }

    #[test]
    fn test_workout_unknown_abbreviation_skipped() {
        let (events, warnings) = workouts(json!([{
            "start_time": "2023-10-03 10:00:00 EST",
            "end_time": "2023-10-03 11:00:00 EST"
        }]));
        assert!(events.is_empty());
        assert!(matches!(
            warnings[0].reason,
            SkipReason::MalformedTimestamp(_)
        ));
    }

    #[test]
    fn test_workout_midnight_crossing_is_retained() {
        let (events, _) = workouts(json!([{
            "start_time": "2023-10-03 23:50",
            "end_time": "2023-10-04 00:20",
            "calories_burned": 90
        }]));
        assert_eq!(events[0].start_day().to_string(), "2023-10-03");
        assert_eq!(events[0].end_local.date_naive().to_string(), "2023-10-04");
    }

    // ── DST edges ────────────────────────────────────────────────────────────

    #[test]
    fn test_workout_inside_spring_forward_gap_shifts_both_ends() {
        // 02:00-03:00 does not exist in LA on 2024-03-10.
        let (events, warnings) = workouts(json!([{
            "start_time": "2024-03-10 02:10:00 PDT",
            "end_time": "2024-03-10 02:50:00 PDT",
            "calories_burned": 120
        }]));
        assert!(warnings.is_empty());
        let e = &events[0];
        assert_eq!((e.start_local.hour(), e.start_local.minute()), (3, 10));
        assert_eq!((e.end_local.hour(), e.end_local.minute()), (3, 50));
        assert_eq!(e.start_utc.hour(), 10);
        assert!((e.duration_hours() - 40.0 / 60.0).abs() < 1e-9);
        assert_eq!(e.start_day().to_string(), "2024-03-10");
    }

    #[test]
    fn test_workout_reversed_inside_gap_is_end_before_start() {
        let (events, warnings) = workouts(json!([{
            "start_time": "2024-03-10 02:50:00",
            "end_time": "2024-03-10 02:10:00",
            "calories_burned": 120
        }]));
        assert!(events.is_empty());
        assert_eq!(warnings[0].reason, SkipReason::EndBeforeStart);
    }

    #[test]
    fn test_workout_starting_in_gap_ending_after() {
        let (events, _) = workouts(json!([{
            "start_time": "2024-03-10 02:30:00",
            "end_time": "2024-03-10 04:00:00"
        }]));
        assert!((events[0].duration_hours() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_workout_in_fall_back_overlap_uses_earlier_instants() {
        // 01:00-02:00 happens twice in LA on 2023-11-05; both ends read as PDT.
        let (events, warnings) = workouts(json!([{
            "start_time": "2023-11-05 01:10:00 PST",
            "end_time": "2023-11-05 01:50:00 PST",
            "calories_burned": 60
        }]));
        assert!(warnings.is_empty());
        let e = &events[0];
        assert_eq!((e.start_utc.hour(), e.start_utc.minute()), (8, 10));
        assert_eq!((e.end_utc.hour(), e.end_utc.minute()), (8, 50));
        assert!((e.duration_hours() - 40.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_workout_reversed_in_fall_back_overlap_is_end_before_start() {
        let (events, warnings) = workouts(json!([{
            "start_time": "2023-11-05 01:50:00",
            "end_time": "2023-11-05 01:10:00"
        }]));
        assert!(events.is_empty());
        assert_eq!(warnings[0].reason, SkipReason::EndBeforeStart);
    }
}
