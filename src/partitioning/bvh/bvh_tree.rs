use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::math::{Point, Real};
use crate::query::Ray;

/// A node (internal or leaf) of a [`Bvh`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct BvhNode {
    /// Mins coordinates of the node’s bounding volume.
    pub(super) mins: Point,
    /// For a leaf, the index it was built with. Otherwise, the index of the [`BvhNodeWide`]
    /// holding the two children of this node.
    pub(super) children: u32,
    /// Maxs coordinates of this node’s bounding volume.
    pub(super) maxs: Point,
    /// Number of leaves in the subtree rooted at this node.
    ///
    /// A node with a leaf count of 1 is a leaf. A count of 0 only happens on the empty right
    /// slot of a tree with a single leaf.
    pub(super) leaf_count: u32,
}

impl BvhNode {
    #[inline(always)]
    pub(super) fn zeros() -> Self {
        Self {
            mins: Point::origin(),
            children: 0,
            maxs: Point::origin(),
            leaf_count: 0,
        }
    }

    /// Initializes a leaf.
    #[inline(always)]
    pub fn leaf(aabb: Aabb, leaf_data: u32) -> BvhNode {
        Self {
            mins: aabb.mins,
            children: leaf_data,
            maxs: aabb.maxs,
            leaf_count: 1,
        }
    }

    /// If this node is a leaf, returns its associated index provided at construction time.
    #[inline(always)]
    pub fn leaf_data(&self) -> Option<u32> {
        self.is_leaf().then_some(self.children)
    }

    /// Is this node a leaf?
    #[inline(always)]
    pub fn is_leaf(&self) -> bool {
        self.leaf_count == 1
    }

    /// The number of leaves under this node.
    #[inline(always)]
    pub fn leaf_count(&self) -> u32 {
        self.leaf_count
    }

    #[inline(always)]
    pub(super) fn merged(&self, other: &Self, children: u32) -> Self {
        Self {
            mins: self.mins.inf(&other.mins),
            children,
            maxs: self.maxs.sup(&other.maxs),
            leaf_count: self.leaf_count + other.leaf_count,
        }
    }

    /// This node’s AABB.
    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.mins, self.maxs)
    }

    /// The center of this node’s AABB.
    #[inline]
    pub fn center(&self) -> Point {
        na::center(&self.mins, &self.maxs)
    }

    /// Does this node’s AABB intersect `aabb`?
    #[inline]
    pub fn intersects(&self, aabb: &Aabb) -> bool {
        self.aabb().intersects(aabb)
    }

    /// Casts a ray on this node’s AABB.
    ///
    /// Returns `Real::MAX` if there is no hit.
    #[inline]
    pub fn cast_ray(&self, ray: &Ray, max_t: Real) -> Real {
        self.aabb()
            .cast_local_ray(ray, max_t, true)
            .unwrap_or(Real::MAX)
    }
}

/// A pair of sibling tree nodes.
///
/// Both `left` and `right` are valid, except when the tree contains a single leaf: then only
/// `left` is valid and `right` has a leaf count of zero.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct BvhNodeWide {
    pub(super) left: BvhNode,
    pub(super) right: BvhNode,
}

impl BvhNodeWide {
    #[inline(always)]
    pub(super) fn zeros() -> Self {
        Self {
            left: BvhNode::zeros(),
            right: BvhNode::zeros(),
        }
    }

    /// The left child.
    #[inline]
    pub fn left(&self) -> &BvhNode {
        &self.left
    }

    /// The right child.
    #[inline]
    pub fn right(&self) -> &BvhNode {
        &self.right
    }

    #[inline(always)]
    pub(super) fn side_mut(&mut self, is_right: bool) -> &mut BvhNode {
        if is_right {
            &mut self.right
        } else {
            &mut self.left
        }
    }

    /// Merges both nodes of `self` into their parent node, stored at `my_id`.
    #[inline]
    pub fn merged(&self, my_id: u32) -> BvhNode {
        self.left.merged(&self.right, my_id)
    }

    /// The sum of leaves contained by both nodes in `self`.
    #[inline]
    pub fn leaf_count(&self) -> u32 {
        self.left.leaf_count + self.right.leaf_count
    }
}

/// A binary bounding volume hierarchy over a set of indexed AABBs.
///
/// The tree is built top-down with a binned surface-area heuristic and kept up-to-date with
/// [`Bvh::refit`] while the set of leaves stays the same. Changing the set of leaves requires
/// building a new tree with [`Bvh::from_leaves`].
///
/// Nodes are stored by pairs of siblings. The pair at index 0 holds the two children of the
/// root, and the children of a node are always stored after it.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Bvh {
    pub(super) nodes: Vec<BvhNodeWide>,
}

impl Bvh {
    /// An empty BVH.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a BVH from a slice of AABBs.
    ///
    /// The leaf built from `leaves[i]` is associated to the index `i`.
    pub fn from_leaves(leaves: &[Aabb]) -> Self {
        Self::from_iter(leaves.iter().copied().enumerate())
    }

    /// Builds a BVH from an iterator yielding leaf indices and their AABBs.
    ///
    /// The indices are stored as `u32` and are given back by the queries.
    pub fn from_iter<It>(leaves: It) -> Self
    where
        It: IntoIterator<Item = (usize, Aabb)>,
    {
        let mut leaves: Vec<BvhNode> = leaves
            .into_iter()
            .map(|(id, aabb)| BvhNode::leaf(aabb, id as u32))
            .collect();
        let mut result = Self::new();

        match leaves.len() {
            0 => {}
            1 => result.nodes.push(BvhNodeWide {
                left: leaves[0],
                right: BvhNode::zeros(),
            }),
            2 => result.nodes.push(BvhNodeWide {
                left: leaves[0],
                right: leaves[1],
            }),
            n => {
                result.nodes.reserve(n);
                result.nodes.push(BvhNodeWide::zeros());
                result.build_range_binned(0, &mut leaves);
            }
        }

        result
    }

    /// The AABB bounding everything contained by this BVH.
    ///
    /// Returns an invalid AABB if the tree is empty.
    pub fn root_aabb(&self) -> Aabb {
        match self.nodes.first() {
            None => Aabb::new_invalid(),
            Some(root) if root.right.leaf_count == 0 => root.left.aabb(),
            Some(root) => root.left.aabb().merged(&root.right.aabb()),
        }
    }

    /// Does this tree not contain any leaf?
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The number of leaves of this tree.
    pub fn leaf_count(&self) -> u32 {
        self.nodes.first().map(|root| root.leaf_count()).unwrap_or(0)
    }

    /// The pairs of sibling nodes of this tree.
    pub fn nodes(&self) -> &[BvhNodeWide] {
        &self.nodes
    }
}
