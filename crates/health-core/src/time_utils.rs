use std::sync::OnceLock;

use chrono::{
    DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, Offset as _, TimeZone, Utc,
};
use chrono_tz::Tz;
use regex::Regex;
use tracing::debug;

use crate::error::{HealthError, Result};

// ── System timezone detection ─────────────────────────────────────────────────

/// Detect the IANA timezone name of the running system.
///
/// Uses the `iana-time-zone` crate directly – no subprocess calls.
/// Falls back to `"UTC"` if detection fails.
pub fn get_system_timezone() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string())
}

/// Resolve an IANA timezone identifier into a [`Tz`] handle.
///
/// `"auto"` resolves to the system timezone.
pub fn resolve_timezone(tz_name: &str) -> Result<Tz> {
    let name = if tz_name.eq_ignore_ascii_case("auto") {
        get_system_timezone()
    } else {
        tz_name.to_string()
    };
    name.parse::<Tz>()
        .map_err(|_| HealthError::InvalidTimezone(name.clone()))
}

// ── Format tables ─────────────────────────────────────────────────────────────

/// Offset-bearing patterns tried after RFC 3339.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
    // ISO 8601 basic form, e.g. 20231001T063000Z
    "%Y%m%dT%H%M%S%.f%:z",
    "%Y%m%dT%H%M%S%.f%z",
    "%Y%m%dT%H%M%:z",
    "%Y%m%dT%H%M%z",
];

/// Naive ISO-like patterns shared by both feeds.
const ISO_NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y%m%dT%H%M%S%.f",
    "%Y%m%dT%H%M%S",
    "%Y%m%dT%H%M",
];

/// Date-only patterns, read as midnight.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d"];

/// Extra wall-clock patterns seen in workout-app exports.
const LOCAL_EXTRA_FORMATS: &[&str] = &[
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Trailing zone abbreviations that are stripped (and otherwise ignored) by
/// [`TimestampParser::parse_local`].
const STRIPPED_ABBREVIATIONS: &[&str] = &["PST", "PDT", "UTC", "GMT"];

fn abbreviation_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let pattern = format!(r"(?i)^(.*?)\s+(?:{})$", STRIPPED_ABBREVIATIONS.join("|"));
        Regex::new(&pattern).expect("regex is valid")
    })
}

// ── TimestampParser ───────────────────────────────────────────────────────────

/// Parses the two timestamp conventions used by the input feeds.
///
/// Sleep exports carry absolute (UTC or offset) timestamps and go through
/// [`parse_absolute`](Self::parse_absolute). Workout exports carry local
/// wall-clock time with an optional, unreliable zone abbreviation and go
/// through [`parse_local`](Self::parse_local).
pub struct TimestampParser;

impl TimestampParser {
    /// Parse an ISO 8601 / RFC 3339 timestamp into a UTC [`DateTime`].
    ///
    /// A trailing `Z` or numeric offset is honoured. Strings without any
    /// offset are assumed to already be UTC. Date-only strings resolve to
    /// midnight UTC.
    pub fn parse_absolute(raw: &str) -> Result<DateTime<Utc>> {
        let s = raw.trim();
        if s.is_empty() {
            return Err(HealthError::MalformedTimestamp(raw.to_string()));
        }

        // Replace trailing 'Z' with '+00:00'.
        let normalised = match s.strip_suffix('Z').or_else(|| s.strip_suffix('z')) {
            Some(stripped) => format!("{}+00:00", stripped),
            None => s.to_string(),
        };

        if let Ok(dt) = DateTime::parse_from_rfc3339(&normalised) {
            return Ok(dt.with_timezone(&Utc));
        }
        for fmt in OFFSET_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(&normalised, fmt) {
                return Ok(dt.with_timezone(&Utc));
            }
        }

        // No offset present – assume UTC.
        match parse_naive(s, ISO_NAIVE_FORMATS) {
            Some(naive) => Ok(Utc.from_utc_datetime(&naive)),
            None => Err(HealthError::MalformedTimestamp(raw.to_string())),
        }
    }

    /// Parse a local wall-clock timestamp and bind it to `user_tz`.
    ///
    /// A trailing `PST`, `PDT`, `UTC` or `GMT` token (case-insensitive) is
    /// stripped first. Its offset is never applied: the remaining text is
    /// always read as wall-clock time in `user_tz`. Any other trailing token
    /// stays in place and will normally make the parse fail.
    ///
    /// Ambiguous wall times (DST fall-back) resolve to the earlier instant.
    /// Wall times inside a spring-forward gap use the offset in force before
    /// the transition.
    pub fn parse_local(raw: &str, user_tz: Tz) -> Result<DateTime<Tz>> {
        let body = Self::strip_zone_abbreviation(raw);
        if body.is_empty() {
            return Err(HealthError::MalformedTimestamp(raw.to_string()));
        }

        let naive = parse_naive(body, ISO_NAIVE_FORMATS)
            .or_else(|| parse_naive(body, LOCAL_EXTRA_FORMATS))
            .or_else(|| {
                // An explicit offset is discarded; only the wall clock is kept.
                DateTime::parse_from_rfc3339(body)
                    .ok()
                    .map(|dt| dt.naive_local())
            })
            .ok_or_else(|| HealthError::MalformedTimestamp(raw.to_string()))?;

        Ok(bind_wall_clock(naive, user_tz))
    }

    /// Remove a recognised trailing zone abbreviation from `raw`.
    ///
    /// Returns the trimmed input unchanged when the final whitespace-delimited
    /// token is not one of the stripped abbreviations.
    pub fn strip_zone_abbreviation(raw: &str) -> &str {
        let trimmed = raw.trim();
        match abbreviation_suffix().captures(trimmed) {
            Some(caps) => caps.get(1).map_or(trimmed, |m| m.as_str().trim_end()),
            None => trimmed,
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_naive(s: &str, formats: &[&str]) -> Option<NaiveDateTime> {
    for fmt in formats {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive);
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Attach `tz` to a naive wall-clock time, resolving DST edge cases.
fn bind_wall_clock(naive: NaiveDateTime, tz: Tz) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            // Spring-forward gap: read the wall clock with the pre-transition offset.
            let before = tz.offset_from_utc_datetime(&(naive - Duration::days(1)));
            let offset_secs = i64::from(before.fix().local_minus_utc());
            let utc = naive - Duration::seconds(offset_secs);
            debug!("Wall time {} falls in a DST gap for {}", naive, tz);
            tz.from_utc_datetime(&utc)
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
