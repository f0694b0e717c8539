//! Support mapping based Cuboid shape.

use crate::bounding_volume::Aabb;
use crate::math::{Matrix, Point, Real, Vector};
use crate::query::{Ray, RayHit};
use crate::shape::{Shape, ShapeDistributionInformation, ShapeType, SupportMap};

/// Shape of a box.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Copy, Clone)]
pub struct Cuboid {
    /// The half-extents of the cuboid.
    pub half_extents: Vector,
}

impl Cuboid {
    /// Creates a new box from its half-extents. Half-extents are the box half-width along each
    /// axis. Each half-extent must be positive.
    #[inline]
    pub fn new(half_extents: Vector) -> Cuboid {
        Cuboid { half_extents }
    }
}

impl SupportMap for Cuboid {
    #[inline]
    fn local_support_point(&self, dir: &Vector) -> Point {
        Point::from(self.half_extents.zip_map(dir, |he, d| if d < 0.0 { -he } else { he }))
    }
}

impl Shape for Cuboid {
    fn shape_type(&self) -> ShapeType {
        ShapeType::Cuboid
    }

    fn compute_local_aabb(&self) -> Aabb {
        Aabb::from_half_extents(Point::origin(), self.half_extents)
    }

    fn compute_distribution_information(&self) -> ShapeDistributionInformation {
        let he2 = self.half_extents.component_mul(&self.half_extents);
        ShapeDistributionInformation {
            volume: 8.0 * self.half_extents.x * self.half_extents.y * self.half_extents.z,
            center: Point::origin(),
            volume_distribution: Matrix::from_diagonal(&Vector::new(
                (he2.y + he2.z) / 3.0,
                (he2.x + he2.z) / 3.0,
                (he2.x + he2.y) / 3.0,
            )),
        }
    }

    fn as_support_map(&self) -> Option<&dyn SupportMap> {
        Some(self as &dyn SupportMap)
    }

    fn cast_local_ray(&self, ray: &Ray, max_t: Real) -> Option<RayHit> {
        let (t, normal) = self
            .compute_local_aabb()
            .cast_local_ray_and_get_normal(ray, max_t, true)?;

        if t == 0.0 && normal == Vector::zeros() {
            Some(RayHit::inside(ray))
        } else {
            Some(RayHit::new(ray, t, normal))
        }
    }
}
