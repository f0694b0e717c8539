//! Structural changes of compound bodies: splitting, merging, removing children, and building a
//! compound from a subset of the entries of a compound shape.
//!
//! Every operation comes at two levels. The collidable level only moves children between
//! compound collidables and recomputes their mass distribution, leaving the entities alone. The
//! entity level also updates the mass, inertia, position and velocities of the entities so the
//! motion of the bodies stays continuous.

pub use self::compound_error::CompoundError;
pub use self::group::{remove_reposition, split_reposition, GroupDistribution};
pub use self::merge::{merge_compound_entities, merge_compounds, MergeResult};
pub use self::partial::create_partial_compound_collidable;
pub use self::split::{
    remove_child_from_compound, remove_child_from_compound_entity, split_compound,
    split_compound_entities, split_compound_into_new, RemovalResult, SplitResult,
};
pub use crate::shape::transform_contribution;

mod compound_error;
mod group;
mod merge;
mod partial;
mod split;
