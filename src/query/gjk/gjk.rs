//! The GJK ray-casting algorithm on support-mapped shapes.

use super::{CsoPoint, Simplex};
use crate::math::{Point, Real, Vector};
use crate::query::{Ray, RayHit};
use crate::shape::SupportMap;
use crate::utils::{GJK_EPSILON, GJK_MAX_ITERATIONS};

/// The result of a GJK ray cast.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GjkRayHit {
    /// The time of impact along the ray.
    pub t: Real,
    /// The outward unit normal at the hit point.
    ///
    /// Zero if the ray origin was already inside of the shape.
    pub normal: Vector,
    /// The point of the target shape touched by the ray.
    ///
    /// This is the barycentric combination of the `orig1` fields of the support points.
    pub witness: Point,
}

/// Casts a ray on the convex shape described by the support function `support`.
///
/// The support function returns, for a direction `d`, the point of the shape maximizing its
/// dot product with `d`. Its `orig1` field is used to reconstruct [`GjkRayHit::witness`], which
/// makes it possible to cast rays on Minkowski differences.
///
/// Returns `None` if the shape is not hit before `max_t`.
pub fn cast_local_ray_support_fn(
    support: impl Fn(&Vector) -> CsoPoint,
    ray: &Ray,
    max_t: Real,
) -> Option<GjkRayHit> {
    let mut simplex = Simplex::new();
    let mut t = 0.0;
    let mut x = ray.origin;
    let mut normal = Vector::zeros();

    let init_dir = if ray.dir.norm_squared() > 0.0 {
        -ray.dir
    } else {
        Vector::x()
    };
    let mut v = x - support(&init_dir).point;
    let mut prev_sq_dist = Real::MAX;

    for _ in 0..GJK_MAX_ITERATIONS {
        let support_pt = support(&v);
        let w = x - support_pt.point;
        let vw = v.dot(&w);
        let v_norm = v.norm();

        // The support plane separates `x` from the shape.
        if vw > GJK_EPSILON * v_norm * w.norm() {
            let vr = v.dot(&ray.dir);

            // Rays moving away from, or parallel to, the separating plane never reach it.
            if vr >= -GJK_EPSILON * v_norm * ray.dir.norm() {
                return None;
            }

            t -= vw / vr;

            if t > max_t {
                return None;
            }

            x = ray.point_at(t);
            normal = v;
            prev_sq_dist = Real::MAX;
        }

        let _ = simplex.add_vertex(support_pt);
        v = x - simplex.project(&x);
        let sq_dist = v.norm_squared();

        // A full simplex after projection encloses `x`. A projection that stops getting closer
        // while no support plane separates `x` means `x` lies on the boundary.
        let tolerance = GJK_EPSILON * GJK_EPSILON * simplex.max_sq_distance_to(&x);
        if sq_dist <= tolerance
            || simplex.len() == 4
            || sq_dist >= prev_sq_dist * (1.0 - GJK_EPSILON)
        {
            if normal.norm_squared() > 0.0 {
                let _ = normal.normalize_mut();
            }

            return Some(GjkRayHit {
                t,
                normal,
                witness: simplex.witness1(),
            });
        }

        prev_sq_dist = sq_dist;
    }

    log::debug!("GJK ray cast did not converge after {GJK_MAX_ITERATIONS} iterations.");
    None
}

/// Casts a ray on a support-mapped shape expressed in its local-space.
pub fn cast_local_ray_support_map<G: ?Sized + SupportMap>(
    shape: &G,
    ray: &Ray,
    max_t: Real,
) -> Option<RayHit> {
    let hit = cast_local_ray_support_fn(
        |dir| CsoPoint::single_point(shape.local_support_point(dir)),
        ray,
        max_t,
    )?;

    if hit.t == 0.0 || hit.normal == Vector::zeros() {
        Some(RayHit::inside(ray))
    } else {
        Some(RayHit::new(ray, hit.t, hit.normal))
    }
}
