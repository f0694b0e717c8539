use super::{Bvh, BvhNode};
use crate::bounding_volume::Aabb;

impl Bvh {
    /// Updates the AABBs of every node after the leaves moved.
    ///
    /// `leaf_aabb` maps the index of a leaf (as given at construction) to its new AABB. The
    /// topology of the tree is left unchanged: refitting with the same leaf AABBs twice yields
    /// the same tree as refitting once.
    pub fn refit(&mut self, mut leaf_aabb: impl FnMut(u32) -> Aabb) {
        // Children are always stored after their parent, so a reverse sweep visits every
        // subtree before the node enclosing it.
        for id in (0..self.nodes.len()).rev() {
            for is_right in [false, true] {
                let node = *self.nodes[id].side_mut(is_right);
                let refitted = match node.leaf_count {
                    0 => continue,
                    1 => BvhNode::leaf(leaf_aabb(node.children), node.children),
                    _ => self.nodes[node.children as usize].merged(node.children),
                };
                *self.nodes[id].side_mut(is_right) = refitted;
            }
        }
    }
}
