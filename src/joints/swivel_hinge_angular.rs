use crate::dynamics::{Entity, EntityHandle, EntitySet};
use crate::joints::{Dof1, Joint, JointError, JointJacobians, JointKind};
use crate::math::Vector;
use na::{RowVector3, Vector1};

/// Keeps a hinge axis attached to the entity A orthogonal to a twist axis attached to the
/// entity B.
///
/// The entity B can swing around the hinge axis and twist around its own axis, but the
/// relative twist around the axis orthogonal to both is removed.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct SwivelHingeAngularJoint {
    local_hinge_axis: Vector,
    local_twist_axis: Vector,
}

impl SwivelHingeAngularJoint {
    /// Creates the joint from a world-space hinge axis attached to `a` and a world-space twist
    /// axis attached to `b`.
    pub fn new(
        a: &Entity,
        b: &Entity,
        hinge_axis: &Vector,
        twist_axis: &Vector,
    ) -> Result<Self, JointError> {
        Self::from_local_axes(
            a.orientation().inverse_transform_vector(hinge_axis),
            b.orientation().inverse_transform_vector(twist_axis),
        )
    }

    /// Creates the joint from a hinge axis in the local-space of the entity A and a twist axis
    /// in the local-space of the entity B.
    pub fn from_local_axes(
        local_hinge_axis: Vector,
        local_twist_axis: Vector,
    ) -> Result<Self, JointError> {
        Ok(Self {
            local_hinge_axis: local_hinge_axis
                .try_normalize(0.0)
                .ok_or(JointError::DegenerateAxis)?,
            local_twist_axis: local_twist_axis
                .try_normalize(0.0)
                .ok_or(JointError::DegenerateAxis)?,
        })
    }

    /// The hinge axis, in the local-space of the entity A.
    pub fn local_hinge_axis(&self) -> &Vector {
        &self.local_hinge_axis
    }

    /// The twist axis, in the local-space of the entity B.
    pub fn local_twist_axis(&self) -> &Vector {
        &self.local_twist_axis
    }
}

impl JointKind for SwivelHingeAngularJoint {
    type Dofs = Dof1;

    fn compute_jacobians(&self, a: &Entity, b: &Entity) -> JointJacobians<Dof1> {
        let hinge = a.orientation_matrix() * self.local_hinge_axis;
        let twist = b.orientation_matrix() * self.local_twist_axis;
        let axis = hinge.cross(&twist).transpose();

        JointJacobians {
            linear_a: RowVector3::zeros(),
            angular_a: axis,
            linear_b: RowVector3::zeros(),
            angular_b: -axis,
            error: Vector1::new(hinge.dot(&twist)),
        }
    }
}

impl Joint<SwivelHingeAngularJoint> {
    /// Keeps the world-space `hinge_axis` attached to `a` orthogonal to the world-space
    /// `twist_axis` attached to `b`.
    pub fn swivel_hinge_angular(
        entities: &EntitySet,
        a: EntityHandle,
        b: EntityHandle,
        hinge_axis: &Vector,
        twist_axis: &Vector,
    ) -> Result<Self, JointError> {
        Self::with_entities(entities, a, b, |ea, eb| {
            SwivelHingeAngularJoint::new(ea, eb, hinge_axis, twist_axis)
        })
    }
}
