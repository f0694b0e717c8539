use crate::bounding_volume::{details, Aabb};
use crate::math::{Matrix, Point, Real, RigidTransform, Vector};
use crate::query::{gjk, Ray, RayHit};
use crate::shape::{Shape, ShapeDistributionInformation, ShapeType, SupportMap};
use core::f64::consts::PI;

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
/// A capsule shape aligned with the local `y` axis.
///
/// This is the set of points at a distance smaller than `radius` from the segment joining
/// `(0, -half_height, 0)` and `(0, half_height, 0)`.
pub struct Capsule {
    /// Half the length of the capsule's inner segment.
    pub half_height: Real,
    /// The radius of the capsule.
    pub radius: Real,
}

impl Capsule {
    /// Creates a new capsule aligned with the `y` axis and with the given half-height an radius.
    pub fn new_y(half_height: Real, radius: Real) -> Self {
        Self {
            half_height,
            radius,
        }
    }

    /// The height of this capsule, without its hemispherical caps.
    pub fn height(&self) -> Real {
        self.half_height * 2.0
    }

    /// The endpoints of the capsule's inner segment.
    pub fn segment(&self) -> (Point, Point) {
        let b = Point::new(0.0, self.half_height, 0.0);
        (-b, b)
    }
}

impl SupportMap for Capsule {
    fn local_support_point(&self, dir: &Vector) -> Point {
        let tip = if dir.y < 0.0 {
            -self.half_height
        } else {
            self.half_height
        };
        let rounding = dir
            .try_normalize(0.0)
            .map(|dir| dir * self.radius)
            .unwrap_or_else(Vector::zeros);

        Point::new(0.0, tip, 0.0) + rounding
    }
}

impl Shape for Capsule {
    fn shape_type(&self) -> ShapeType {
        ShapeType::Capsule
    }

    fn compute_local_aabb(&self) -> Aabb {
        Aabb::from_half_extents(
            Point::origin(),
            Vector::new(self.radius, self.half_height + self.radius, self.radius),
        )
    }

    fn compute_aabb(&self, transform: &RigidTransform) -> Aabb {
        details::support_map_aabb(transform, self)
    }

    fn compute_distribution_information(&self) -> ShapeDistributionInformation {
        let pi = PI as Real;
        let r = self.radius;
        let h = self.half_height;
        let r2 = r * r;

        let cylinder_volume = pi * r2 * self.height();
        let sphere_volume = (4.0 / 3.0) * pi * r2 * r;
        let volume = cylinder_volume + sphere_volume;

        if volume == 0.0 {
            return ShapeDistributionInformation::default();
        }

        let cylinder_part = cylinder_volume / volume;
        let sphere_part = sphere_volume / volume;

        let diag_xz = cylinder_part * (3.0 * r2 + 4.0 * h * h) / 12.0
            + sphere_part * (0.4 * r2 + h * h + 0.75 * h * r);
        let diag_y = cylinder_part * 0.5 * r2 + sphere_part * 0.4 * r2;

        ShapeDistributionInformation {
            volume,
            center: Point::origin(),
            volume_distribution: Matrix::from_diagonal(&Vector::new(diag_xz, diag_y, diag_xz)),
        }
    }

    fn as_support_map(&self) -> Option<&dyn SupportMap> {
        Some(self as &dyn SupportMap)
    }

    fn cast_local_ray(&self, ray: &Ray, max_t: Real) -> Option<RayHit> {
        gjk::cast_local_ray_support_map(self, ray, max_t)
    }
}

#[cfg(test)]
mod test {
    use super::Capsule;
    use crate::math::{Point, Real, Vector};
    use crate::query::Ray;
    use crate::shape::{Ball, Shape};

    #[test]
    fn capsule_ray_cast_hits_cap_and_side() {
        let capsule = Capsule::new_y(1.0, 0.5);

        let from_above = Ray::new(Point::new(0.0, 5.0, 0.0), -Vector::y());
        let hit = capsule.cast_local_ray(&from_above, Real::MAX).unwrap();
        approx::assert_relative_eq!(hit.t, 3.5, epsilon = 1.0e-3);
        approx::assert_relative_eq!(hit.normal, Vector::y(), epsilon = 1.0e-2);

        let from_side = Ray::new(Point::new(-4.0, 0.2, 0.0), Vector::x());
        let hit = capsule.cast_local_ray(&from_side, Real::MAX).unwrap();
        approx::assert_relative_eq!(hit.t, 3.5, epsilon = 1.0e-3);

        let miss = Ray::new(Point::new(-4.0, 0.0, 1.0), Vector::x());
        assert!(capsule.cast_local_ray(&miss, Real::MAX).is_none());
    }

    #[test]
    fn zero_height_capsule_is_a_ball() {
        let capsule = Capsule::new_y(0.0, 1.5).compute_distribution_information();
        let ball = Ball::new(1.5).compute_distribution_information();
        approx::assert_relative_eq!(capsule.volume, ball.volume, epsilon = 1.0e-4);
        approx::assert_relative_eq!(
            capsule.volume_distribution,
            ball.volume_distribution,
            epsilon = 1.0e-5
        );
    }
}
