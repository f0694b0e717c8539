//! Traits for support mapping based shapes.

use crate::math::{Point, RigidTransform, UnitVector, Vector};

/// Traits of convex shapes representable by a support mapping function.
pub trait SupportMap {
    /// Evaluates the support function of this shape.
    ///
    /// A support function is a function associating a vector to the shape point which maximizes
    /// their dot product. A zero `dir` yields an arbitrary point of the shape.
    fn local_support_point(&self, dir: &Vector) -> Point;

    /// Same as `self.local_support_point` except that `dir` is normalized.
    fn local_support_point_toward(&self, dir: &UnitVector) -> Point {
        self.local_support_point(dir.as_ref())
    }

    /// Evaluates the support function of this shape transformed by `transform`.
    fn support_point(&self, transform: &RigidTransform, dir: &Vector) -> Point {
        let local_dir = transform.inverse_transform_vector(dir);
        transform.transform_point(&self.local_support_point(&local_dir))
    }
}
