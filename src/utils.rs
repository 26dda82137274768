//! Input clamping and validation for the visualizer controls.

use crate::config::{MAX_SIZE, MAX_SPEED, MIN_SIZE};
use crate::SortError;
use log::warn;

/// Clamp a requested value ceiling to at least 1.
pub fn clamp_ceiling(requested: i64) -> u32 {
    if requested < 1 {
        warn!("{}, using 1", SortError::InvalidRange(requested));
        return 1;
    }
    u32::try_from(requested).unwrap_or(u32::MAX)
}

/// Height left for the bars once the header is drawn, in pixels.
pub fn ceiling_from_viewport(window_height: f64, header_height: f64) -> u32 {
    clamp_ceiling((window_height - header_height).floor() as i64)
}

/// Generic numeric input validation
pub fn validate_numeric_input<T>(
    input: &str,
    min: Option<T>,
    max: Option<T>,
    field_name: &str,
) -> Result<T, String>
where
    T: std::str::FromStr + std::fmt::Display + PartialOrd,
{
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(format!("{} cannot be empty", field_name));
    }

    match trimmed.parse::<T>() {
        Ok(val) => {
            if let Some(min_val) = min {
                if val < min_val {
                    return Err(format!("{} must be at least {}", field_name, min_val));
                }
            }
            if let Some(max_val) = max {
                if val > max_val {
                    return Err(format!("{} cannot exceed {}", field_name, max_val));
                }
            }
            Ok(val)
        }
        Err(_) => Err(format!("{} must be a valid number", field_name)),
    }
}

/// Validate size slider input
pub fn validate_size(input: &str) -> Result<usize, String> {
    if let Ok(raw) = input.trim().parse::<i64>() {
        if raw < 0 {
            return Err(SortError::InvalidSize(raw).to_string());
        }
    }
    validate_numeric_input(input, Some(MIN_SIZE), Some(MAX_SIZE), "Size")
}

/// Validate speed slider input
pub fn validate_speed(input: &str) -> Result<u32, String> {
    validate_numeric_input(input, Some(0), Some(MAX_SPEED), "Speed")
}
