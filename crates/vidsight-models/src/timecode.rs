//! Timeline timestamp codec.
//!
//! Converts between the `HH:MM:SS` / `MM:SS` display strings the analysis
//! service emits and numeric second offsets used for seeking. Parsing is
//! total: any malformed input maps to offset 0 so a bad timestamp can never
//! break navigation or frame capture.

/// Parse a display timestamp to total seconds.
///
/// Accepts `HH:MM:SS` and `MM:SS`. Any other part count, or any part that is
/// not a non-negative integer, yields 0.
///
/// # Examples
/// ```
/// use vidsight_models::timecode::parse;
/// assert_eq!(parse("01:30:00"), 5400);
/// assert_eq!(parse("05:30"), 330);
/// assert_eq!(parse("garbage"), 0);
/// ```
pub fn parse(ts: &str) -> u64 {
    let parts: Vec<&str> = ts.trim().split(':').collect();
    let nums: Option<Vec<u64>> = parts.iter().map(|p| p.parse().ok()).collect();
    match nums.as_deref() {
        Some([h, m, s]) => h * 3600 + m * 60 + s,
        Some([m, s]) => m * 60 + s,
        _ => 0,
    }
}

/// Format a second offset as a display timestamp.
///
/// Negative, NaN, and infinite inputs render as `"00:00"`. Minutes and
/// seconds are zero-padded to two digits; the hours segment appears only
/// when the offset reaches a full hour.
///
/// # Examples
/// ```
/// use vidsight_models::timecode::format;
/// assert_eq!(format(65.0), "01:05");
/// assert_eq!(format(3661.0), "1:01:01");
/// assert_eq!(format(-3.0), "00:00");
/// ```
pub fn format(total_secs: f64) -> String {
    if !total_secs.is_finite() || total_secs < 0.0 {
        return "00:00".to_string();
    }
    let total = total_secs.floor() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}
