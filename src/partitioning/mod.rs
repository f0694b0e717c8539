//! Spatial partitioning tools.

pub use self::bvh::{Bvh, BvhLeafCost, BvhNode, BvhNodeWide};

pub mod bvh;
