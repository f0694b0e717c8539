use super::{Bvh, BvhNode};
use crate::math::Real;
use smallvec::SmallVec;

const TRAVERSAL_STACK_SIZE: usize = 32;

/// Iterator over the leaves of a [`Bvh`] accepted by a pruning predicate.
///
/// Created by [`Bvh::leaves`].
pub struct Leaves<'a, Check: Fn(&BvhNode) -> bool> {
    tree: &'a Bvh,
    stack: SmallVec<[&'a BvhNode; TRAVERSAL_STACK_SIZE]>,
    check: Check,
}

impl<'a, Check: Fn(&BvhNode) -> bool> Leaves<'a, Check> {
    fn new(tree: &'a Bvh, check: Check) -> Self {
        let mut stack = SmallVec::new();

        if let Some(root) = tree.nodes.first() {
            // Pushed in reverse so the left subtree is yielded first.
            if root.right.leaf_count > 0 && check(&root.right) {
                stack.push(&root.right);
            }
            if check(&root.left) {
                stack.push(&root.left);
            }
        }

        Leaves { tree, stack, check }
    }
}

impl<Check: Fn(&BvhNode) -> bool> Iterator for Leaves<'_, Check> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        while let Some(node) = self.stack.pop() {
            if node.is_leaf() {
                return Some(node.children);
            }

            let children = &self.tree.nodes[node.children as usize];
            if (self.check)(&children.right) {
                self.stack.push(&children.right);
            }
            if (self.check)(&children.left) {
                self.stack.push(&children.left);
            }
        }

        None
    }
}

/// Cost associated to a BVH leaf during a best-first traversal.
pub trait BvhLeafCost {
    /// The cost value associated to the leaf.
    ///
    /// Best-first searches look for the leaf with the lowest cost.
    fn cost(&self) -> Real;
}

impl BvhLeafCost for Real {
    #[inline(always)]
    fn cost(&self) -> Real {
        *self
    }
}

impl<T> BvhLeafCost for (Real, T) {
    #[inline(always)]
    fn cost(&self) -> Real {
        self.0
    }
}

impl Bvh {
    /// Iterates through the leaves, in depth-first order, left subtrees first.
    ///
    /// The `check_node` closure is called on every traversed node. If it returns `false` then the
    /// node and all its descendants are skipped.
    pub fn leaves<F: Fn(&BvhNode) -> bool>(&self, check_node: F) -> Leaves<'_, F> {
        Leaves::new(self, check_node)
    }

    /// Finds the leaf with the smallest cost, visiting the cheapest subtrees first.
    ///
    /// `aabb_cost` gives a lower bound of the cost of every leaf under a node, given the best
    /// cost found so far; `Real::MAX` prunes the node. `leaf_cost` computes the actual cost of a
    /// leaf, or `None` if the leaf must be ignored. Only costs smaller than `max_cost` are
    /// reported.
    pub fn find_best<L: BvhLeafCost>(
        &self,
        max_cost: Real,
        aabb_cost: impl Fn(&BvhNode, Real) -> Real,
        leaf_cost: impl Fn(u32, Real) -> Option<L>,
    ) -> Option<(u32, L)> {
        let mut stack: SmallVec<[(Real, &BvhNode); TRAVERSAL_STACK_SIZE]> = SmallVec::new();
        let mut best: Option<(u32, L)> = None;
        let mut best_cost = max_cost;

        let root = self.nodes.first()?;
        for node in [&root.left, &root.right] {
            if node.leaf_count > 0 {
                stack.push((aabb_cost(node, best_cost), node));
            }
        }

        while let Some((lower_bound, node)) = stack.pop() {
            if lower_bound >= best_cost || lower_bound == Real::MAX {
                continue;
            }

            if let Some(leaf) = node.leaf_data() {
                if let Some(value) = leaf_cost(leaf, best_cost) {
                    if value.cost() < best_cost {
                        best_cost = value.cost();
                        best = Some((leaf, value));
                    }
                }
                continue;
            }

            let children = &self.nodes[node.children as usize];
            let mut left = (aabb_cost(&children.left, best_cost), &children.left);
            let mut right = (aabb_cost(&children.right, best_cost), &children.right);

            // The cheapest child is pushed last so it is visited first.
            if left.0 < right.0 {
                core::mem::swap(&mut left, &mut right);
            }
            stack.push(left);
            stack.push(right);
        }

        best
    }
}
