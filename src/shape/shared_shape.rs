use crate::math::{Point, Real, Vector};
use crate::shape::{
    Ball, Capsule, CompoundShape, CompoundShapeEntry, Cuboid, MobileMeshShape, MobileMeshSolidity,
    Shape, ShapeError, Triangle,
};
use core::fmt;
use core::ops::Deref;
use std::sync::Arc;

/// A reference-counted, shareable geometric shape.
///
/// `SharedShape` is a wrapper around [`Arc<dyn Shape>`]. Cloning it only increments a reference
/// count, so the same geometry can back many collidables. The children of a compound body
/// split in two keep pointing to the same `SharedShape`.
///
/// # Examples
///
/// ```
/// # #[cfg(all(feature = "dim3", feature = "f32"))] {
/// # use tether3d::shape::SharedShape;
/// let shape = SharedShape::ball(1.0);
/// let shape_clone = shape.clone();
///
/// assert_eq!(shape.as_ball().unwrap().radius, 1.0);
/// assert!(SharedShape::ptr_eq(&shape, &shape_clone));
/// # }
/// ```
#[derive(Clone)]
pub struct SharedShape(pub Arc<dyn Shape>);

impl Deref for SharedShape {
    type Target = dyn Shape;
    fn deref(&self) -> &dyn Shape {
        &*self.0
    }
}

impl AsRef<dyn Shape> for SharedShape {
    fn as_ref(&self) -> &dyn Shape {
        &*self.0
    }
}

impl fmt::Debug for SharedShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedShape ( Arc<{:?}> )", self.0.shape_type())
    }
}

impl SharedShape {
    /// Wraps any shape type into a `SharedShape`.
    pub fn new(shape: impl Shape) -> Self {
        Self(Arc::new(shape))
    }

    /// Do both shared shapes point to the same shape instance?
    pub fn ptr_eq(a: &SharedShape, b: &SharedShape) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    /// Initialize a ball shape defined by its radius.
    pub fn ball(radius: Real) -> Self {
        Self::new(Ball::new(radius))
    }

    /// Initialize a cuboid shape defined by its half-extents.
    pub fn cuboid(hx: Real, hy: Real, hz: Real) -> Self {
        Self::new(Cuboid::new(Vector::new(hx, hy, hz)))
    }

    /// Initialize a capsule aligned with the `y` axis.
    pub fn capsule_y(half_height: Real, radius: Real) -> Self {
        Self::new(Capsule::new_y(half_height, radius))
    }

    /// Initializes a triangle shape.
    pub fn triangle(a: Point, b: Point, c: Point) -> Self {
        Self::new(Triangle::new(a, b, c))
    }

    /// Initializes a compound shape made of the given children.
    pub fn compound(entries: Vec<CompoundShapeEntry>) -> Result<Self, ShapeError> {
        Ok(Self::new(CompoundShape::new(entries)?))
    }

    /// Initializes a triangle mesh attached to a moving body.
    pub fn mobile_mesh(
        vertices: Vec<Point>,
        indices: Vec<[u32; 3]>,
        solidity: MobileMeshSolidity,
    ) -> Result<Self, ShapeError> {
        Ok(Self::new(MobileMeshShape::new(vertices, indices, solidity)?))
    }
}
