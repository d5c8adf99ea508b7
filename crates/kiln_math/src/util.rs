//! Floating point tolerance policy.
//!
//! Comparisons against zero look at the binary exponent of a value rather than
//! at a fixed tolerance: anything whose magnitude is below 2^-20 is zero.

use glam::DVec3;

/// Values with an unbiased exponent below this are treated as zero.
const ZERO_EXPONENT: i64 = -20;

/// Unbiased IEEE-754 exponent of `x`.
#[inline]
fn exponent(x: f64) -> i64 {
    ((x.to_bits() >> 52) & 0x7FF) as i64 - 1023
}

/// Returns true if `x` is indistinguishable from zero.
#[inline]
pub fn is_zero(x: f64) -> bool {
    exponent(x) < ZERO_EXPONENT
}

/// Snaps `x` to exactly `0.0` when it is indistinguishable from zero.
#[inline]
pub fn align_zero(x: f64) -> f64 {
    if is_zero(x) {
        0.0
    } else {
        x
    }
}

/// Component-wise [`align_zero`].
#[inline]
pub fn align_vec(v: DVec3) -> DVec3 {
    DVec3::new(align_zero(v.x), align_zero(v.y), align_zero(v.z))
}

/// Component-wise epsilon equality.
#[inline]
pub fn vec_eq(a: DVec3, b: DVec3) -> bool {
    let d = a - b;
    is_zero(d.x) && is_zero(d.y) && is_zero(d.z)
}
