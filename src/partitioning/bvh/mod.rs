//! A binary bounding volume hierarchy.

pub use bvh_traverse::{BvhLeafCost, Leaves};
pub use bvh_tree::{Bvh, BvhNode, BvhNodeWide};

mod bvh_binned_build;
mod bvh_queries;
mod bvh_refit;
mod bvh_traverse;
mod bvh_tree;

#[cfg(test)]
mod bvh_tests;
