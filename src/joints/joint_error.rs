use crate::dynamics::EntityHandle;

/// Errors raised while building or updating a joint.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum JointError {
    /// Both entities of a joint removing several degrees of freedom are not dynamic.
    #[error("cannot constrain two non-dynamic entities together")]
    NonDynamicPair,
    /// An entity of the joint does not exist.
    #[error("the entity {0:?} does not exist")]
    MissingEntity(EntityHandle),
    /// Both connections of the joint are the same entity.
    #[error("a joint needs two distinct entities")]
    SameEntity,
    /// An axis of the joint has a zero length.
    #[error("a joint axis has a zero length")]
    DegenerateAxis,
}
