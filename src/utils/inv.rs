use crate::math::Real;
use num::Zero;

/// The inverse of `val`, or zero if `val` is zero.
#[inline]
pub fn inv(val: Real) -> Real {
    if val.is_zero() {
        0.0
    } else {
        1.0 / val
    }
}
