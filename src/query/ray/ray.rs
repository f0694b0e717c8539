//! Structures needed to cast rays.

use crate::math::{Point, Real, RigidTransform, Vector};

/// A ray for ray-casting queries.
///
/// The direction does not need to be normalized: times of impact are expressed in multiples
/// of `dir`, so the hit point is `origin + dir * t`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Ray {
    /// Starting point of the ray.
    pub origin: Point,
    /// Direction of the ray.
    pub dir: Vector,
}

impl Ray {
    /// Creates a new ray starting from `origin` and with the direction `dir`.
    pub fn new(origin: Point, dir: Vector) -> Ray {
        Ray { origin, dir }
    }

    /// Transforms this ray by the given rigid transform.
    #[inline]
    pub fn transform_by(&self, m: &RigidTransform) -> Self {
        Self::new(m.transform_point(&self.origin), m.transform_vector(&self.dir))
    }

    /// Transforms this ray by the inverse of the given rigid transform.
    #[inline]
    pub fn inverse_transform_by(&self, m: &RigidTransform) -> Self {
        Self::new(
            m.inverse_transform_point(&self.origin),
            m.inverse_transform_vector(&self.dir),
        )
    }

    /// Translates this ray by the given vector. Its direction is left unchanged.
    #[inline]
    pub fn translate_by(&self, v: Vector) -> Self {
        Self::new(self.origin + v, self.dir)
    }

    /// Computes the point at the given parameter on this ray.
    #[inline]
    pub fn point_at(&self, t: Real) -> Point {
        self.origin + self.dir * t
    }
}

/// The result of a successful ray cast.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct RayHit {
    /// The time of impact: the hit point is at `ray.origin + ray.dir * t`.
    pub t: Real,
    /// The hit point.
    pub location: Point,
    /// The unit normal of the surface at the hit point, facing the ray.
    ///
    /// When the ray starts inside of a solid shape, `t` is zero and the normal is the opposite
    /// of the ray direction.
    pub normal: Vector,
}

impl RayHit {
    /// Creates a hit record for `ray` at the time of impact `t`.
    #[inline]
    pub fn new(ray: &Ray, t: Real, normal: Vector) -> Self {
        Self {
            t,
            location: ray.point_at(t),
            normal,
        }
    }

    /// A hit at `t = 0`, for rays starting inside of a solid shape.
    #[inline]
    pub fn inside(ray: &Ray) -> Self {
        Self::new(ray, 0.0, -ray.dir.try_normalize(0.0).unwrap_or_else(Vector::zeros))
    }

    /// Transforms the location and normal of this hit by `m`. The time of impact is unchanged.
    #[inline]
    pub fn transform_by(&self, m: &RigidTransform) -> Self {
        Self {
            t: self.t,
            location: m.transform_point(&self.location),
            normal: m.transform_vector(&self.normal),
        }
    }
}
