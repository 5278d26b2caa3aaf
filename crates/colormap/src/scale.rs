//! Value-to-bin scaling.

/// Highest intensity bin.
pub const MAX_BIN: u8 = 255;

/// Map a data value onto the 0..=255 intensity scale of `[min, max]`.
///
/// A degenerate range (`min >= max`) maps every value at or above `max`
/// to 255 and anything below to 0. NaN maps to 0.
pub fn linear_scale(min: f64, max: f64, value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    if max <= min {
        return if value >= max { MAX_BIN } else { 0 };
    }
    if value <= min {
        return 0;
    }
    if value >= max {
        return MAX_BIN;
    }

    let t = (value - min) / (max - min);
    (t * MAX_BIN as f64).round().clamp(0.0, MAX_BIN as f64) as u8
}
