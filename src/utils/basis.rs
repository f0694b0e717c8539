use super::consts::{BASIS_EPSILON_SQUARED, PRIMARY_SEED_AXIS, SECONDARY_SEED_AXIS};
use crate::math::{Matrix, Vector};

/// The skew-symmetric matrix `[v]×` such that `[v]× * w == v.cross(&w)`.
#[inline]
pub fn cross_matrix(v: &Vector) -> Matrix {
    v.cross_matrix()
}

/// The outer product `a * bᵀ`.
#[inline]
pub fn outer_product(a: &Vector, b: &Vector) -> Matrix {
    a * b.transpose()
}

/// A unit vector orthogonal to `v`.
///
/// `v` is crossed with the primary seed axis (`+Y`). If both are almost parallel, the
/// secondary seed axis (`+X`) is used instead. Returns `None` if `v` is zero.
pub fn perpendicular(v: &Vector) -> Option<Vector> {
    let primary = Vector::from(PRIMARY_SEED_AXIS);
    let mut result = primary.cross(v);

    if result.norm_squared() < BASIS_EPSILON_SQUARED {
        log::debug!("Seed axis almost parallel to {:?}, using the fallback seed.", v);
        result = Vector::from(SECONDARY_SEED_AXIS).cross(v);
    }

    result.try_normalize(0.0)
}
