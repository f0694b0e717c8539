use crate::bounding_volume::Aabb;
use crate::math::{Matrix, Point, Real, RigidTransform, Vector};
use crate::query::details::cast_local_ray_on_ball;
use crate::query::{Ray, RayHit};
use crate::shape::{Shape, ShapeDistributionInformation, ShapeType, SupportMap};
use core::f64::consts::PI;

/// A Ball shape.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Copy, Clone)]
pub struct Ball {
    /// The radius of the ball.
    pub radius: Real,
}

impl Ball {
    /// Creates a new ball with the given radius.
    #[inline]
    pub fn new(radius: Real) -> Ball {
        Ball { radius }
    }
}

impl SupportMap for Ball {
    #[inline]
    fn local_support_point(&self, dir: &Vector) -> Point {
        dir.try_normalize(0.0)
            .map(|dir| Point::from(dir * self.radius))
            .unwrap_or_else(Point::origin)
    }
}

impl Shape for Ball {
    fn shape_type(&self) -> ShapeType {
        ShapeType::Ball
    }

    fn compute_local_aabb(&self) -> Aabb {
        Aabb::from_half_extents(Point::origin(), Vector::repeat(self.radius))
    }

    fn compute_aabb(&self, transform: &RigidTransform) -> Aabb {
        Aabb::from_half_extents(transform.position.into(), Vector::repeat(self.radius))
    }

    fn compute_distribution_information(&self) -> ShapeDistributionInformation {
        let r2 = self.radius * self.radius;
        ShapeDistributionInformation {
            volume: (4.0 / 3.0) * PI as Real * r2 * self.radius,
            center: Point::origin(),
            volume_distribution: Matrix::from_diagonal_element(0.4 * r2),
        }
    }

    fn as_support_map(&self) -> Option<&dyn SupportMap> {
        Some(self as &dyn SupportMap)
    }

    fn cast_local_ray(&self, ray: &Ray, max_t: Real) -> Option<RayHit> {
        cast_local_ray_on_ball(self.radius, ray, max_t, true)
    }
}
