/// Upper bound of the integer opacity domain used by heavy layers.
pub const OPACITY_MAX: u8 = 255;

/// Map a unit opacity in `[0, 1]` into `0..=255`, rounding to nearest.
///
/// Out-of-range and NaN inputs saturate (NaN becomes fully transparent).
pub fn opacity_to_u8(unit: f64) -> u8 {
    if unit.is_nan() {
        return 0;
    }
    (unit.clamp(0.0, 1.0) * f64::from(OPACITY_MAX)).round() as u8
}

/// Map a `0..=255` opacity back into `[0, 1]`.
pub fn opacity_to_unit(v: u8) -> f64 {
    f64::from(v) / f64::from(OPACITY_MAX)
}

/// Absolute-tolerance float comparison.
pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
