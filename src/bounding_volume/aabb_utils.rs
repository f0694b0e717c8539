use crate::bounding_volume::Aabb;
use crate::math::{Point, RigidTransform, Vector, DIM};
use crate::shape::SupportMap;

/// Computes the AABB of a support mapped shape placed at `m`.
pub fn support_map_aabb<G>(m: &RigidTransform, i: &G) -> Aabb
where
    G: SupportMap + ?Sized,
{
    let mut min = Vector::zeros();
    let mut max = Vector::zeros();
    let mut basis = Vector::zeros();

    for d in 0..DIM {
        basis[d] = 1.0;
        max[d] = i.support_point(m, &basis)[d];

        basis[d] = -1.0;
        min[d] = i.support_point(m, &basis)[d];

        basis[d] = 0.0;
    }

    Aabb::new(Point::from(min), Point::from(max))
}

/// Computes the AABB of a support mapped shape in its local space.
pub fn local_support_map_aabb<G>(i: &G) -> Aabb
where
    G: SupportMap + ?Sized,
{
    let mut min = Vector::zeros();
    let mut max = Vector::zeros();
    let mut basis = Vector::zeros();

    for d in 0..DIM {
        basis[d] = 1.0;
        max[d] = i.local_support_point(&basis)[d];

        basis[d] = -1.0;
        min[d] = i.local_support_point(&basis)[d];

        basis[d] = 0.0;
    }

    Aabb::new(Point::from(min), Point::from(max))
}

/// Computes the AABB of a set of points transformed by `m`.
///
/// Returns an invalid AABB if `pts` is empty.
pub fn point_cloud_aabb<'a, I>(m: &RigidTransform, pts: I) -> Aabb
where
    I: IntoIterator<Item = &'a Point>,
{
    Aabb::from_points(pts.into_iter().map(|pt| m.transform_point(pt)))
}
