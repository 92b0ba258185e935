/// Floor a coordinate to the containing integer cell.
///
/// Saturates at the `i32` range instead of wrapping.
pub fn floor(value: f64) -> i32 {
    value.floor() as i32
}

/// The larger of the two magnitudes.
pub fn abs_max(a: f64, b: f64) -> f64 {
    a.abs().max(b.abs())
}

/// Degrees to radians in single precision, matching the rotation fields.
pub const DEG_TO_RAD: f32 = std::f32::consts::PI / 180.0;
