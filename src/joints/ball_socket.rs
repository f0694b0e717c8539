use crate::dynamics::{Entity, EntityHandle, EntitySet};
use crate::joints::{Dof3, Joint, JointError, JointJacobians, JointKind};
use crate::math::{Matrix, Point, Vector};
use crate::utils::cross_matrix;

/// Keeps an anchor of the entity A at the same place as an anchor of the entity B.
///
/// Removes the three relative linear degrees of freedom at the anchor.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct BallSocketJoint {
    /// The anchor, in the local-space of the entity A.
    pub local_anchor_a: Vector,
    /// The anchor, in the local-space of the entity B.
    pub local_anchor_b: Vector,
}

impl BallSocketJoint {
    /// A ball-socket joint attaching both entities at the world-space point `anchor`.
    pub fn new(a: &Entity, b: &Entity, anchor: &Point) -> Self {
        Self {
            local_anchor_a: a.world_transform().inverse_transform_point(anchor).coords,
            local_anchor_b: b.world_transform().inverse_transform_point(anchor).coords,
        }
    }

    /// A ball-socket joint with anchors given in the local-space of their entities.
    pub fn from_local_anchors(local_anchor_a: Vector, local_anchor_b: Vector) -> Self {
        Self {
            local_anchor_a,
            local_anchor_b,
        }
    }

    /// The world-space offsets from the centers of mass of the entities to their anchors.
    pub fn world_offsets(&self, a: &Entity, b: &Entity) -> (Vector, Vector) {
        (
            a.orientation_matrix() * self.local_anchor_a,
            b.orientation_matrix() * self.local_anchor_b,
        )
    }
}

impl JointKind for BallSocketJoint {
    type Dofs = Dof3;

    fn compute_jacobians(&self, a: &Entity, b: &Entity) -> JointJacobians<Dof3> {
        let (ra, rb) = self.world_offsets(a, b);
        JointJacobians {
            linear_a: -Matrix::identity(),
            angular_a: cross_matrix(&ra),
            linear_b: Matrix::identity(),
            angular_b: -cross_matrix(&rb),
            error: (b.position() + rb) - (a.position() + ra),
        }
    }
}

impl Joint<BallSocketJoint> {
    /// Attaches the entities `a` and `b` at the world-space point `anchor`.
    pub fn ball_socket(
        entities: &EntitySet,
        a: EntityHandle,
        b: EntityHandle,
        anchor: &Point,
    ) -> Result<Self, JointError> {
        Self::with_entities(entities, a, b, |ea, eb| {
            Ok(BallSocketJoint::new(ea, eb, anchor))
        })
    }
}
