use crate::dynamics::{Entity, EntityHandle, EntitySet};
use crate::joints::{Dof2, Joint, JointError, JointJacobians, JointKind};
use crate::math::{Matrix2x3, Vector, Vector2};
use crate::utils::perpendicular;

/// Keeps an axis attached to the entity A aligned with an axis attached to the entity B.
///
/// Only the relative rotation around the free axis remains.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct RevoluteAngularJoint {
    local_free_axis_a: Vector,
    local_free_axis_b: Vector,
    local_constrained_axis_a: Vector,
}

impl RevoluteAngularJoint {
    /// Only allows relative rotations around the world-space `free_axis`.
    pub fn new(a: &Entity, b: &Entity, free_axis: &Vector) -> Result<Self, JointError> {
        Self::from_local_axes(
            a.orientation().inverse_transform_vector(free_axis),
            b.orientation().inverse_transform_vector(free_axis),
        )
    }

    /// Creates the joint from the free axis expressed in the local-spaces of both entities.
    pub fn from_local_axes(
        local_free_axis_a: Vector,
        local_free_axis_b: Vector,
    ) -> Result<Self, JointError> {
        let mut result = Self {
            local_free_axis_a: Vector::x(),
            local_free_axis_b: Vector::x(),
            local_constrained_axis_a: Vector::y(),
        };
        result.set_local_free_axes(local_free_axis_a, local_free_axis_b)?;
        Ok(result)
    }

    /// The free axis in the local-spaces of the entities A and B.
    pub fn local_free_axes(&self) -> (Vector, Vector) {
        (self.local_free_axis_a, self.local_free_axis_b)
    }

    /// Sets the free axis in the local-spaces of the entities A and B.
    ///
    /// The constrained axes are derived again from the new free axis of A.
    pub fn set_local_free_axes(&mut self, axis_a: Vector, axis_b: Vector) -> Result<(), JointError> {
        let axis_a = axis_a.try_normalize(0.0).ok_or(JointError::DegenerateAxis)?;
        let axis_b = axis_b.try_normalize(0.0).ok_or(JointError::DegenerateAxis)?;
        self.local_constrained_axis_a = perpendicular(&axis_a).ok_or(JointError::DegenerateAxis)?;
        self.local_free_axis_a = axis_a;
        self.local_free_axis_b = axis_b;
        Ok(())
    }
}

impl JointKind for RevoluteAngularJoint {
    type Dofs = Dof2;

    fn compute_jacobians(&self, a: &Entity, b: &Entity) -> JointJacobians<Dof2> {
        let free_a = a.orientation_matrix() * self.local_free_axis_a;
        let free_b = b.orientation_matrix() * self.local_free_axis_b;
        let c1 = a.orientation_matrix() * self.local_constrained_axis_a;
        let c2 = free_a.cross(&c1);
        let misalignment = free_a.cross(&free_b);

        let angular_b = Matrix2x3::from_rows(&[c1.transpose(), c2.transpose()]);
        JointJacobians {
            linear_a: Matrix2x3::zeros(),
            angular_a: -angular_b,
            linear_b: Matrix2x3::zeros(),
            angular_b,
            error: Vector2::new(c1.dot(&misalignment), c2.dot(&misalignment)),
        }
    }
}

impl Joint<RevoluteAngularJoint> {
    /// Only allows relative rotations of `a` and `b` around the world-space `free_axis`.
    pub fn revolute_angular(
        entities: &EntitySet,
        a: EntityHandle,
        b: EntityHandle,
        free_axis: &Vector,
    ) -> Result<Self, JointError> {
        Self::with_entities(entities, a, b, |ea, eb| {
            RevoluteAngularJoint::new(ea, eb, free_axis)
        })
    }
}
