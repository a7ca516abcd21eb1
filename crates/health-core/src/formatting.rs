/// Round `value` to `decimals` decimal places.
///
/// Rounds the exact binary value, with exact ties going to the even digit,
/// so `6.125` becomes `6.12` and `2.675` (stored just below) becomes `2.67`.
///
/// # Examples
///
/// ```
/// use health_core::formatting::round_to;
///
/// assert_eq!(round_to(5.999, 2), 6.0);
/// assert_eq!(round_to(1.234, 1), 1.2);
/// assert_eq!(round_to(-2.345, 0), -2.0);
/// assert_eq!(round_to(6.125, 2), 6.12);
/// ```
pub fn round_to(value: f64, decimals: u32) -> f64 {
    format!("{:.*}", decimals as usize, value)
        .parse::<f64>()
        .unwrap_or(value)
}

/// Round to the two decimal places used by every daily and summary figure.
///
/// # Examples
///
/// ```
/// use health_core::formatting::round2;
///
/// assert_eq!(round2(6.0000001), 6.0);
/// assert_eq!(round2(300.0), 300.0);
/// assert_eq!(round2(1.0 / 3.0), 0.33);
/// ```
pub fn round2(value: f64) -> f64 {
    round_to(value, 2)
}

/// Format a duration expressed in hours as `"7h 30m"`.
///
/// Minutes are rounded to the nearest whole minute.
///
/// # Examples
///
/// ```
/// use health_core::formatting::format_hours;
///
/// assert_eq!(format_hours(7.5), "7h 30m");
/// assert_eq!(format_hours(6.0), "6h");
/// assert_eq!(format_hours(0.25), "15m");
/// ```
pub fn format_hours(hours: f64) -> String {
    let total_mins = (hours * 60.0).round() as i64;
    let h = total_mins / 60;
    let m = total_mins % 60;
    match (h, m) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}
