use crate::config::WORKOUT_ID_DIGITS;

/// Coerce a raw form value into a number the way a browser's unary `+` does.
///
/// - Surrounding whitespace is ignored
/// - An empty (or all-whitespace) value reads as `0`
/// - Anything that does not parse reads as `NaN`
///
/// # Examples
/// ```
/// use mapty::utils::coerce_number;
/// assert_eq!(coerce_number(" 5 "), 5.0);
/// assert_eq!(coerce_number(""), 0.0);
/// assert!(coerce_number("five").is_nan());
/// ```
pub fn coerce_number(input: &str) -> f64 {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Keep the last `WORKOUT_ID_DIGITS` digits of a millisecond timestamp.
pub fn short_id(timestamp_ms: i64) -> String {
    let digits = timestamp_ms.to_string();
    let start = digits.len().saturating_sub(WORKOUT_ID_DIGITS);
    digits[start..].to_string()
}

/// Format a derived metric with one decimal, e.g. `6.0`.
pub fn format_metric(value: f64) -> String {
    format!("{:.1}", value)
}
