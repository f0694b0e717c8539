use super::bvh_tree::BvhNodeWide;
use super::{Bvh, BvhNode};
use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::math::Real;

const NUM_BINS: usize = 8;
const BIN_EPSILON: Real = 1.0e-5;

#[derive(Copy, Clone, Debug)]
struct Bin {
    aabb: Aabb,
    leaf_count: u32,
}

impl Default for Bin {
    fn default() -> Self {
        Self {
            aabb: Aabb::new_invalid(),
            leaf_count: 0,
        }
    }
}

/// Maps leaf centroids to bins along the longest axis of the centroid bounds.
struct Binning {
    axis: usize,
    scale: Real,
    offset: Real,
}

impl Binning {
    fn new(leaves: &[BvhNode]) -> Self {
        let centroids = Aabb::from_points(leaves.iter().map(|node| node.center()));
        let axis = centroids.extents().imax();
        let range = centroids.maxs[axis] - centroids.mins[axis];

        Self {
            axis,
            scale: NUM_BINS as Real * (1.0 - BIN_EPSILON) / range,
            offset: centroids.mins[axis],
        }
    }

    fn bin(&self, leaf: &BvhNode) -> usize {
        // NaN (all centroids equal) saturates to bin 0.
        ((self.scale * (leaf.center()[self.axis] - self.offset)) as usize).min(NUM_BINS - 1)
    }
}

impl Bvh {
    /// Builds the subtree made of `leaves` into the (already allocated) wide node `target`.
    pub(super) fn build_range_binned(&mut self, target: u32, leaves: &mut [BvhNode]) {
        debug_assert!(leaves.len() > 1);

        let binning = Binning::new(leaves);
        let mut bins = [Bin::default(); NUM_BINS];

        for leaf in leaves.iter() {
            let bin = &mut bins[binning.bin(leaf)];
            bin.aabb.merge(&leaf.aabb());
            bin.leaf_count += 1;
        }

        // Sweep from the right to know the cost of every right-hand side.
        let mut right_sides = bins;
        for i in (0..NUM_BINS - 1).rev() {
            let next = right_sides[i + 1];
            right_sides[i].aabb.merge(&next.aabb);
            right_sides[i].leaf_count += next.leaf_count;
        }

        // Then sweep from the left, evaluating the SAH of every splitting plane.
        let mut left_side = Bin::default();
        let mut best_cost = Real::MAX;
        let mut best_plane = 0;
        let mut best_left_count = 0;

        for plane in 0..NUM_BINS - 1 {
            left_side.aabb.merge(&bins[plane].aabb);
            left_side.leaf_count += bins[plane].leaf_count;

            let right_side = &right_sides[plane + 1];
            let cost = left_side.aabb.volume() * left_side.leaf_count as Real
                + right_side.aabb.volume() * right_side.leaf_count as Real;

            if left_side.leaf_count > 0 && right_side.leaf_count > 0 && cost < best_cost {
                best_cost = cost;
                best_plane = plane;
                best_left_count = left_side.leaf_count as usize;
            }
        }

        let mid = if best_left_count == 0 {
            // Every leaf ended up in the same bin: split the range in two.
            leaves.len() / 2
        } else {
            let mut first_right = 0;
            for i in 0..leaves.len() {
                if binning.bin(&leaves[i]) <= best_plane {
                    leaves.swap(i, first_right);
                    first_right += 1;
                }
            }
            first_right
        };

        let (left_leaves, right_leaves) = leaves.split_at_mut(mid);
        let left = self.build_child(left_leaves);
        let right = self.build_child(right_leaves);
        self.nodes[target as usize] = BvhNodeWide { left, right };
    }

    fn build_child(&mut self, leaves: &mut [BvhNode]) -> BvhNode {
        if let [leaf] = leaves {
            return *leaf;
        }

        let id = self.nodes.len() as u32;
        self.nodes.push(BvhNodeWide::zeros());
        self.build_range_binned(id, leaves);
        self.nodes[id as usize].merged(id)
    }
}
