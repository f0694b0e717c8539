use crate::bounding_volume::Aabb;
use crate::math::{Real, RigidTransform, Vector};
use crate::query::{self, Ray, RayHit};
use crate::shape::{
    Ball, Capsule, CompoundShape, Cuboid, MobileMeshShape, ShapeDistributionInformation,
    SupportMap, Triangle,
};
use core::fmt::Debug;
use downcast_rs::{impl_downcast, DowncastSync};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
/// Enum representing the type of a shape.
pub enum ShapeType {
    /// A ball shape.
    Ball,
    /// A cuboid shape.
    Cuboid,
    /// A capsule shape.
    Capsule,
    /// A triangle shape.
    Triangle,
    /// A set of shapes with individual local transforms.
    Compound,
    /// A triangle mesh attached to a moving body.
    MobileMesh,
}

/// Trait implemented by shapes usable by collidables.
pub trait Shape: DowncastSync + Debug {
    /// Gets the type tag of this shape.
    fn shape_type(&self) -> ShapeType;

    /// Computes the AABB of this shape.
    fn compute_local_aabb(&self) -> Aabb;

    /// Computes the AABB of this shape with the given transform.
    fn compute_aabb(&self, transform: &RigidTransform) -> Aabb {
        self.compute_local_aabb().transform_by(transform)
    }

    /// Computes the volume, center of mass, and unit-mass inertia of this shape.
    fn compute_distribution_information(&self) -> ShapeDistributionInformation;

    /// Converts this shape into its support mapping, if it has one.
    fn as_support_map(&self) -> Option<&dyn SupportMap> {
        None
    }

    /// Casts a ray on this shape, in its local-space.
    fn cast_local_ray(&self, ray: &Ray, max_t: Real) -> Option<RayHit>;

    /// Casts a ray on this shape transformed by `transform`.
    fn cast_ray(&self, transform: &RigidTransform, ray: &Ray, max_t: Real) -> Option<RayHit> {
        let local_ray = ray.inverse_transform_by(transform);
        self.cast_local_ray(&local_ray, max_t)
            .map(|hit| hit.transform_by(transform))
    }

    /// Sweeps a convex shape against this shape, in the local-space of this shape.
    ///
    /// `cast_shape` starts at `start` and moves by `sweep` per unit of time. See
    /// [`query::cast_support_maps`] for the content of the returned hit.
    fn cast_local_shape(
        &self,
        cast_shape: &dyn SupportMap,
        start: &RigidTransform,
        sweep: &Vector,
        max_t: Real,
    ) -> Option<RayHit> {
        let target = self.as_support_map()?;
        query::cast_support_maps(
            cast_shape,
            start,
            sweep,
            target,
            &RigidTransform::identity(),
            max_t,
        )
    }

    /// Sweeps a convex shape against this shape transformed by `transform`.
    fn cast_shape(
        &self,
        transform: &RigidTransform,
        cast_shape: &dyn SupportMap,
        start: &RigidTransform,
        sweep: &Vector,
        max_t: Real,
    ) -> Option<RayHit> {
        let local_start = RigidTransform::multiply(start, &transform.inverse());
        let local_sweep = transform.inverse_transform_vector(sweep);
        self.cast_local_shape(cast_shape, &local_start, &local_sweep, max_t)
            .map(|hit| hit.transform_by(transform))
    }
}

impl_downcast!(sync Shape);

impl dyn Shape {
    /// Converts this abstract shape to the given shape, if it is one.
    pub fn as_shape<T: Shape>(&self) -> Option<&T> {
        self.downcast_ref()
    }

    /// Converts this abstract shape to a ball, if it is one.
    pub fn as_ball(&self) -> Option<&Ball> {
        self.downcast_ref()
    }

    /// Converts this abstract shape to a cuboid, if it is one.
    pub fn as_cuboid(&self) -> Option<&Cuboid> {
        self.downcast_ref()
    }

    /// Converts this abstract shape to a capsule, if it is one.
    pub fn as_capsule(&self) -> Option<&Capsule> {
        self.downcast_ref()
    }

    /// Converts this abstract shape to a triangle, if it is one.
    pub fn as_triangle(&self) -> Option<&Triangle> {
        self.downcast_ref()
    }

    /// Converts this abstract shape to a compound shape, if it is one.
    pub fn as_compound(&self) -> Option<&CompoundShape> {
        self.downcast_ref()
    }

    /// Converts this abstract shape to a mobile mesh, if it is one.
    pub fn as_mobile_mesh(&self) -> Option<&MobileMeshShape> {
        self.downcast_ref()
    }
}
