//! Linear algebra type aliases.

pub use self::rigid_transform::RigidTransform;

use na::{
    Isometry3, Matrix2x3 as NaMatrix2x3, Matrix3, Point3, UnitQuaternion, UnitVector3, Vector3,
};

mod rigid_transform;

/// The scalar type used throughout this crate.
#[cfg(feature = "f64")]
pub type Real = f64;

/// The scalar type used throughout this crate.
#[cfg(feature = "f32")]
pub type Real = f32;

/// The default tolerance used for geometric operations.
pub const DEFAULT_EPSILON: Real = Real::EPSILON;

/// The dimension of the space.
pub const DIM: usize = 3;

/// The point type.
pub type Point = Point3<Real>;

/// The vector type.
pub type Vector = Vector3<Real>;

/// The 2D vector type, used for the impulses of two-degrees-of-freedom constraints.
pub type Vector2 = na::Vector2<Real>;

/// The unit vector type.
pub type UnitVector = UnitVector3<Real>;

/// The matrix type.
pub type Matrix = Matrix3<Real>;

/// The 2D matrix type.
pub type Matrix2 = na::Matrix2<Real>;

/// The 2x3 matrix type, used for the jacobians of two-degrees-of-freedom constraints.
pub type Matrix2x3 = NaMatrix2x3<Real>;

/// The rotation type.
pub type Rotation = UnitQuaternion<Real>;

/// The isometry type, for interoperability with `nalgebra`.
pub type Isometry = Isometry3<Real>;
