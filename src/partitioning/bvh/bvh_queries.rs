use super::{Bvh, BvhNode};
use crate::bounding_volume::Aabb;
use crate::math::Real;
use crate::query::Ray;

impl Bvh {
    /// Iterates through all the leaves with an AABB intersecting the given `aabb`.
    pub fn intersect_aabb<'a>(&'a self, aabb: &'a Aabb) -> impl Iterator<Item = u32> + 'a {
        self.leaves(move |node: &BvhNode| node.intersects(aabb))
    }

    /// Iterates through all the leaves with an AABB hit by `ray` before `max_t`.
    pub fn intersect_ray<'a>(&'a self, ray: &'a Ray, max_t: Real) -> impl Iterator<Item = u32> + 'a {
        self.leaves(move |node: &BvhNode| {
            node.aabb().cast_local_ray(ray, max_t, true).is_some()
        })
    }

    /// Casts a ray on this BVH using the provided leaf ray-cast function.
    ///
    /// `primitive_check` maps a leaf index to the time of impact of the ray with the geometry
    /// it stands for. Its `Real` argument is the smallest time of impact found so far (or
    /// `max_t` if nothing was hit yet).
    pub fn cast_ray<L: super::BvhLeafCost>(
        &self,
        ray: &Ray,
        max_t: Real,
        primitive_check: impl Fn(u32, Real) -> Option<L>,
    ) -> Option<(u32, L)> {
        self.find_best(
            max_t,
            |node: &BvhNode, best_so_far| node.cast_ray(ray, best_so_far),
            primitive_check,
        )
    }
}
