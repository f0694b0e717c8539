//! Definition of the triangle shape.

use crate::bounding_volume::Aabb;
use crate::math::{Matrix, Point, Real, Vector};
use crate::query::details::local_ray_intersection_with_triangle;
use crate::query::{Ray, RayHit, TriangleSidedness};
use crate::shape::{Shape, ShapeDistributionInformation, ShapeType, SupportMap};
use crate::utils::outer_product;

/// A triangle shape.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Copy, Clone)]
pub struct Triangle {
    /// The triangle first point.
    pub a: Point,
    /// The triangle second point.
    pub b: Point,
    /// The triangle third point.
    pub c: Point,
    /// The faces of this triangle hit by ray casts.
    pub sidedness: TriangleSidedness,
}

impl Triangle {
    /// Creates a double-sided triangle from three points.
    #[inline]
    pub fn new(a: Point, b: Point, c: Point) -> Triangle {
        Triangle {
            a,
            b,
            c,
            sidedness: TriangleSidedness::DoubleSided,
        }
    }

    /// The vertices of this triangle.
    #[inline]
    pub fn vertices(&self) -> [Point; 3] {
        [self.a, self.b, self.c]
    }

    /// The normal of this triangle assuming it is oriented counterclockwise.
    ///
    /// Returns `None` if the triangle is degenerate.
    #[inline]
    pub fn normal(&self) -> Option<Vector> {
        self.scaled_normal().try_normalize(0.0)
    }

    /// The counterclockwise normal of this triangle, with a length equal to twice its area.
    #[inline]
    pub fn scaled_normal(&self) -> Vector {
        (self.b - self.a).cross(&(self.c - self.a))
    }

    /// The area of this triangle.
    #[inline]
    pub fn area(&self) -> Real {
        self.scaled_normal().norm() * 0.5
    }

    /// The geometric center of this triangle.
    #[inline]
    pub fn center(&self) -> Point {
        Point::from((self.a.coords + self.b.coords + self.c.coords) / 3.0)
    }

    /// The integral of `x * xᵀ` over the surface of this triangle.
    pub(crate) fn covariance(&self) -> Matrix {
        let sum = self.a.coords + self.b.coords + self.c.coords;
        let squares = outer_product(&self.a.coords, &self.a.coords)
            + outer_product(&self.b.coords, &self.b.coords)
            + outer_product(&self.c.coords, &self.c.coords);
        (squares + outer_product(&sum, &sum)) * (self.area() / 12.0)
    }
}

impl SupportMap for Triangle {
    #[inline]
    fn local_support_point(&self, dir: &Vector) -> Point {
        let da = self.a.coords.dot(dir);
        let db = self.b.coords.dot(dir);
        let dc = self.c.coords.dot(dir);

        if da > db {
            if da > dc {
                self.a
            } else {
                self.c
            }
        } else if db > dc {
            self.b
        } else {
            self.c
        }
    }
}

impl Shape for Triangle {
    fn shape_type(&self) -> ShapeType {
        ShapeType::Triangle
    }

    fn compute_local_aabb(&self) -> Aabb {
        Aabb::from_points(self.vertices())
    }

    fn compute_distribution_information(&self) -> ShapeDistributionInformation {
        let area = self.area();

        if area == 0.0 {
            return ShapeDistributionInformation {
                center: self.center(),
                ..Default::default()
            };
        }

        ShapeDistributionInformation::from_covariance(0.0, area, self.center(), &self.covariance())
    }

    fn as_support_map(&self) -> Option<&dyn SupportMap> {
        Some(self as &dyn SupportMap)
    }

    fn cast_local_ray(&self, ray: &Ray, max_t: Real) -> Option<RayHit> {
        local_ray_intersection_with_triangle(&self.a, &self.b, &self.c, ray, max_t, self.sidedness)
    }
}
