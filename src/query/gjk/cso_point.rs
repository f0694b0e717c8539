use crate::math::Point;

/// A point of a Configuration Space Obstacle.
///
/// A CSO is the Minkowski difference `A - B` of two shapes. Each of its points is stored with
/// the points of `A` and `B` it originates from, which lets a converged GJK run recover the
/// witness points on both shapes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CsoPoint {
    /// The point on the CSO, equal to `orig1 - orig2`.
    pub point: Point,
    /// The point on the first shape used to compute `self.point`.
    pub orig1: Point,
    /// The point on the second shape used to compute `self.point`.
    pub orig2: Point,
}

impl CsoPoint {
    /// Initializes a CSO point with `orig1 - orig2`.
    pub fn new(orig1: Point, orig2: Point) -> Self {
        CsoPoint {
            point: Point::from(orig1 - orig2),
            orig1,
            orig2,
        }
    }

    /// A CSO point where `orig1 = point` and `orig2 = O`.
    pub fn single_point(point: Point) -> Self {
        CsoPoint {
            point,
            orig1: point,
            orig2: Point::origin(),
        }
    }
}
