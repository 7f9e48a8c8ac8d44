//! Signal scaling helpers shared by sensors and the brain.

/// Scales a value from `[bottom, top]` into the unit range.
///
/// When the source range includes negative values the result is remapped to
/// `[-1, 1]`, otherwise it stays in `[0, 1]`, matching the two activation
/// domains sensors feed into.
///
/// A degenerate range (`bottom == top`) cannot be scaled; the caller gets the
/// fixed midpoint instead of a NaN.
pub fn scale_value(val: f32, bottom: f32, top: f32) -> f32 {
    if (top - bottom).abs() < f32::EPSILON {
        return 0.5;
    }
    let scaled = (val - bottom) / (top - bottom);
    if bottom < 0.0 { 2.0 * scaled - 1.0 } else { scaled }
}

