use crate::math::{Isometry, Matrix, Point, Real, Rotation, Vector};
use approx::{AbsDiffEq, RelativeEq};

/// A rigid transform made of a position and an orientation.
///
/// The orientation is applied first, then the translation: a local point `p` is
/// mapped to `position + orientation * p`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct RigidTransform {
    /// The translational part of this transform.
    pub position: Vector,
    /// The rotational part of this transform.
    pub orientation: Rotation,
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl RigidTransform {
    /// Creates a new rigid transform from its position and orientation.
    #[inline]
    pub fn new(position: Vector, orientation: Rotation) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// The identity transform.
    #[inline]
    pub fn identity() -> Self {
        Self {
            position: Vector::zeros(),
            orientation: Rotation::identity(),
        }
    }

    /// A pure translation.
    #[inline]
    pub fn from_position(position: Vector) -> Self {
        Self {
            position,
            orientation: Rotation::identity(),
        }
    }

    /// A pure rotation.
    #[inline]
    pub fn from_orientation(orientation: Rotation) -> Self {
        Self {
            position: Vector::zeros(),
            orientation,
        }
    }

    /// Composes two transforms: the result applies `a` first, then `b`.
    ///
    /// This is the composition used to place a child expressed in the local space of a
    /// parent: `multiply(child_local, parent_world)` is the child's world transform.
    #[inline]
    pub fn multiply(a: &RigidTransform, b: &RigidTransform) -> RigidTransform {
        let mut orientation = b.orientation * a.orientation;
        orientation.renormalize_fast();
        RigidTransform {
            position: b.position + b.orientation * a.position,
            orientation,
        }
    }

    /// The inverse of this transform.
    #[inline]
    pub fn inverse(&self) -> RigidTransform {
        let orientation = self.orientation.inverse();
        RigidTransform {
            position: -(orientation * self.position),
            orientation,
        }
    }

    /// Transforms a point from the local space of `self` to its parent space.
    #[inline]
    pub fn transform_point(&self, pt: &Point) -> Point {
        Point::from(self.position + self.orientation * pt.coords)
    }

    /// Rotates a vector from the local space of `self` to its parent space.
    #[inline]
    pub fn transform_vector(&self, v: &Vector) -> Vector {
        self.orientation * v
    }

    /// Transforms a point from the parent space of `self` to its local space.
    #[inline]
    pub fn inverse_transform_point(&self, pt: &Point) -> Point {
        Point::from(
            self.orientation
                .inverse_transform_vector(&(pt.coords - self.position)),
        )
    }

    /// Rotates a vector from the parent space of `self` to its local space.
    #[inline]
    pub fn inverse_transform_vector(&self, v: &Vector) -> Vector {
        self.orientation.inverse_transform_vector(v)
    }

    /// The rotation matrix of this transform.
    #[inline]
    pub fn rotation_matrix(&self) -> Matrix {
        self.orientation.to_rotation_matrix().into_inner()
    }

    /// Transform a vector by the absolute value of the rotation matrix of `self`.
    #[inline]
    pub fn absolute_transform_vector(&self, v: &Vector) -> Vector {
        self.rotation_matrix().abs() * *v
    }

    /// Converts this transform to a `nalgebra` isometry.
    #[inline]
    pub fn to_isometry(&self) -> Isometry {
        Isometry::from_parts(self.position.into(), self.orientation)
    }

    /// Renormalizes the orientation to counter numerical drift.
    #[inline]
    pub fn renormalize_fast(&mut self) {
        self.orientation.renormalize_fast();
    }
}

impl From<Isometry> for RigidTransform {
    fn from(iso: Isometry) -> Self {
        Self::new(iso.translation.vector, iso.rotation)
    }
}

impl AbsDiffEq for RigidTransform {
    type Epsilon = Real;

    fn default_epsilon() -> Self::Epsilon {
        <Real as AbsDiffEq>::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.position.abs_diff_eq(&other.position, epsilon)
            && self.orientation.abs_diff_eq(&other.orientation, epsilon)
    }
}

impl RelativeEq for RigidTransform {
    fn default_max_relative() -> Self::Epsilon {
        <Real as RelativeEq>::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.position
            .relative_eq(&other.position, epsilon, max_relative)
            && self
                .orientation
                .relative_eq(&other.orientation, epsilon, max_relative)
    }
}
