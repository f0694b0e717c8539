/// Errors raised while splitting, merging, or building compound collidables.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum CompoundError {
    /// A compound collidable needs at least one child.
    #[error("no child index was provided")]
    EmptyChildList,
    /// The selected children have weights adding up to zero.
    #[error("the selected children have a zero total weight")]
    ZeroTotalWeight,
    /// A shape index does not match any entry of the compound shape.
    #[error("shape index {index} is out of bounds for a compound shape of {len} entries")]
    InvalidShapeIndex {
        /// The faulty index.
        index: usize,
        /// The number of entries of the compound shape.
        len: usize,
    },
    /// The operation would leave a compound collidable without any child.
    #[error("the operation would leave a compound without children")]
    EmptyCompound,
    /// The compound collidables involved do not share the same compound shape.
    #[error("the compound collidables do not share the same compound shape")]
    ShapeMismatch,
    /// The number of child contributions does not match the number of shape entries.
    #[error("expected {expected} child contributions, found {found}")]
    ContributionCountMismatch {
        /// The number of entries of the compound shape.
        expected: usize,
        /// The number of contributions provided.
        found: usize,
    },
    /// A compound collidable is not attached to an entity of the entity set.
    #[error("the compound collidable is not attached to an existing entity")]
    MissingEntity,
}

