use crate::math::{Point, Real, Vector};
use crate::query::{Ray, RayHit};

/// The faces of a triangle that can be hit by rays.
///
/// The front face of a triangle `(a, b, c)` is the one its counterclockwise normal
/// `(b - a) × (c - a)` points out of.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum TriangleSidedness {
    /// Both faces can be hit.
    #[default]
    DoubleSided,
    /// Only the face seeing the vertices in clockwise order can be hit.
    Clockwise,
    /// Only the face seeing the vertices in counterclockwise order can be hit.
    Counterclockwise,
}

/// Computes the intersection between a triangle and a ray.
///
/// The returned normal is the unit triangle normal facing the ray origin. Rays parallel to the
/// triangle plane never hit it.
pub fn local_ray_intersection_with_triangle(
    a: &Point,
    b: &Point,
    c: &Point,
    ray: &Ray,
    max_t: Real,
    sidedness: TriangleSidedness,
) -> Option<RayHit> {
    let ab = b - a;
    let ac = c - a;
    let n = ab.cross(&ac);
    let d = n.dot(&ray.dir);

    if d == 0.0 {
        return None;
    }

    // `d < 0` iff the ray sees the counterclockwise side.
    let sees_front = d < 0.0;
    match sidedness {
        TriangleSidedness::DoubleSided => {}
        TriangleSidedness::Counterclockwise if !sees_front => return None,
        TriangleSidedness::Clockwise if sees_front => return None,
        _ => {}
    }

    let t = (a - ray.origin).dot(&n) / d;
    if t < 0.0 || t > max_t {
        return None;
    }

    let ap = ray.point_at(t) - a;
    let d00 = ab.dot(&ab);
    let d01 = ab.dot(&ac);
    let d11 = ac.dot(&ac);
    let d20 = ap.dot(&ab);
    let d21 = ap.dot(&ac);
    let denom = d00 * d11 - d01 * d01;

    if denom <= 0.0 {
        return None;
    }

    let v = (d11 * d20 - d01 * d21) / denom;
    let w = (d00 * d21 - d01 * d20) / denom;

    if v < 0.0 || w < 0.0 || v + w > 1.0 {
        return None;
    }

    let normal = if sees_front { n } else { -n };
    Some(RayHit::new(
        ray,
        t,
        normal.try_normalize(0.0).unwrap_or_else(Vector::zeros),
    ))
}

#[cfg(test)]
mod test {
    use super::{local_ray_intersection_with_triangle, TriangleSidedness};
    use crate::math::{Point, Real, Vector};
    use crate::query::Ray;

    #[test]
    fn ray_triangle_respects_sidedness() {
        // Counterclockwise normal is +Z.
        let (a, b, c) = (
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
        );
        let from_above = Ray::new(Point::new(0.2, 0.2, 1.0), -Vector::z());
        let from_below = Ray::new(Point::new(0.2, 0.2, -1.0), Vector::z());

        let hit = local_ray_intersection_with_triangle(
            &a,
            &b,
            &c,
            &from_above,
            Real::MAX,
            TriangleSidedness::Counterclockwise,
        )
        .unwrap();
        approx::assert_relative_eq!(hit.t, 1.0);
        approx::assert_relative_eq!(hit.normal, Vector::z());

        assert!(local_ray_intersection_with_triangle(
            &a,
            &b,
            &c,
            &from_below,
            Real::MAX,
            TriangleSidedness::Counterclockwise
        )
        .is_none());

        let hit = local_ray_intersection_with_triangle(
            &a,
            &b,
            &c,
            &from_below,
            Real::MAX,
            TriangleSidedness::Clockwise,
        )
        .unwrap();
        approx::assert_relative_eq!(hit.normal, -Vector::z());

        let outside = Ray::new(Point::new(0.8, 0.8, 1.0), -Vector::z());
        assert!(local_ray_intersection_with_triangle(
            &a,
            &b,
            &c,
            &outside,
            Real::MAX,
            TriangleSidedness::DoubleSided
        )
        .is_none());
    }
}
