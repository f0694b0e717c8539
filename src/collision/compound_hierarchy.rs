use crate::bounding_volume::Aabb;
use crate::collision::CompoundChild;
use crate::math::{Real, Vector};
use crate::partitioning::{Bvh, BvhNode};
use crate::query::Ray;

/// The bounding volume hierarchy of the children of a [`CompoundCollidable`](crate::collision::CompoundCollidable).
///
/// Leaves are keyed by the position of the child in the child list of the compound, so the tree
/// must be reconstructed whenever children are added or removed. When the children only move,
/// [`Self::refit`] is enough.
#[derive(Clone, Debug, Default)]
pub struct CompoundHierarchy {
    tree: Bvh,
}

impl CompoundHierarchy {
    /// Builds the hierarchy of the given children from their current bounding boxes.
    pub fn new(children: &[CompoundChild]) -> Self {
        let mut result = Self::default();
        result.reconstruct(children);
        result
    }

    /// The underlying tree.
    pub fn tree(&self) -> &Bvh {
        &self.tree
    }

    /// Rebuilds the tree from scratch.
    pub fn reconstruct(&mut self, children: &[CompoundChild]) {
        self.tree = Bvh::from_iter(
            children
                .iter()
                .enumerate()
                .map(|(i, child)| (i, *child.collidable.bounding_box())),
        );
    }

    /// Updates the node bounding boxes after the children moved, keeping the topology.
    pub fn refit(&mut self, children: &[CompoundChild]) {
        self.tree
            .refit(|i| *children[i as usize].collidable.bounding_box());
    }

    /// The bounding box of every child.
    pub fn root_aabb(&self) -> Aabb {
        self.tree.root_aabb()
    }

    /// Collects the children with a bounding box hit by `ray` before `max_t`.
    pub fn collect_ray_candidates(&self, ray: &Ray, max_t: Real, out: &mut Vec<u32>) {
        out.extend(self.tree.intersect_ray(ray, max_t));
    }

    /// Collects the children possibly hit by a box of half-extents `half_extents` whose center
    /// follows `center_ray` until `max_t`.
    pub fn collect_sweep_candidates(
        &self,
        half_extents: &Vector,
        center_ray: &Ray,
        max_t: Real,
        out: &mut Vec<u32>,
    ) {
        out.extend(self.tree.leaves(|node: &BvhNode| {
            let aabb = node.aabb();
            Aabb::new(aabb.mins - half_extents, aabb.maxs + half_extents)
                .cast_local_ray(center_ray, max_t, true)
                .is_some()
        }));
    }

    /// Iterates through the children with a bounding box intersecting `aabb`.
    pub fn overlapping_children<'a>(&'a self, aabb: &'a Aabb) -> impl Iterator<Item = usize> + 'a {
        self.tree.intersect_aabb(aabb).map(|i| i as usize)
    }
}
