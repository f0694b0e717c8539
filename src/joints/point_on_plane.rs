use crate::dynamics::{Entity, EntityHandle, EntitySet};
use crate::joints::{Dof1, Joint, JointError, JointJacobians, JointKind};
use crate::math::{Point, Vector};
use na::Vector1;

/// Keeps a point of the entity B on a plane attached to the entity A.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct PointOnPlaneJoint {
    local_plane_anchor: Vector,
    local_plane_normal: Vector,
    local_point: Vector,
}

impl PointOnPlaneJoint {
    /// Keeps the world-space `point`, attached to `b`, on the world-space plane through
    /// `plane_anchor` with the normal `plane_normal`, attached to `a`.
    pub fn new(
        a: &Entity,
        b: &Entity,
        plane_anchor: &Point,
        plane_normal: &Vector,
        point: &Point,
    ) -> Result<Self, JointError> {
        let pose_a = a.world_transform();
        Self::from_local_frames(
            pose_a.inverse_transform_point(plane_anchor).coords,
            pose_a.inverse_transform_vector(plane_normal),
            b.world_transform().inverse_transform_point(point).coords,
        )
    }

    /// Creates the joint from a plane expressed in the local-space of the entity A, and a point
    /// expressed in the local-space of the entity B.
    pub fn from_local_frames(
        local_plane_anchor: Vector,
        local_plane_normal: Vector,
        local_point: Vector,
    ) -> Result<Self, JointError> {
        let mut result = Self {
            local_plane_anchor,
            local_plane_normal: Vector::y(),
            local_point,
        };
        result.set_local_plane_normal(local_plane_normal)?;
        Ok(result)
    }

    /// A point of the plane, in the local-space of the entity A.
    pub fn local_plane_anchor(&self) -> &Vector {
        &self.local_plane_anchor
    }

    /// Sets a point of the plane, in the local-space of the entity A.
    pub fn set_local_plane_anchor(&mut self, anchor: Vector) {
        self.local_plane_anchor = anchor;
    }

    /// The unit normal of the plane, in the local-space of the entity A.
    pub fn local_plane_normal(&self) -> &Vector {
        &self.local_plane_normal
    }

    /// Sets the normal of the plane, in the local-space of the entity A.
    pub fn set_local_plane_normal(&mut self, normal: Vector) -> Result<(), JointError> {
        self.local_plane_normal = normal.try_normalize(0.0).ok_or(JointError::DegenerateAxis)?;
        Ok(())
    }

    /// The point kept on the plane, in the local-space of the entity B.
    pub fn local_point(&self) -> &Vector {
        &self.local_point
    }

    /// Sets the point kept on the plane, in the local-space of the entity B.
    pub fn set_local_point(&mut self, point: Vector) {
        self.local_point = point;
    }
}

impl JointKind for PointOnPlaneJoint {
    type Dofs = Dof1;

    fn compute_jacobians(&self, a: &Entity, b: &Entity) -> JointJacobians<Dof1> {
        let rotation_a = a.orientation_matrix();
        let plane_anchor = a.position() + rotation_a * self.local_plane_anchor;
        let normal = rotation_a * self.local_plane_normal;
        let point = b.position() + b.orientation_matrix() * self.local_point;

        JointJacobians {
            linear_a: -normal.transpose(),
            angular_a: normal.cross(&(point - a.position())).transpose(),
            linear_b: normal.transpose(),
            angular_b: (point - b.position()).cross(&normal).transpose(),
            error: Vector1::new(normal.dot(&(point - plane_anchor))),
        }
    }
}

impl Joint<PointOnPlaneJoint> {
    /// Keeps the world-space `point`, attached to `b`, on the world-space plane attached to `a`.
    pub fn point_on_plane(
        entities: &EntitySet,
        a: EntityHandle,
        b: EntityHandle,
        plane_anchor: &Point,
        plane_normal: &Vector,
        point: &Point,
    ) -> Result<Self, JointError> {
        Self::with_entities(entities, a, b, |ea, eb| {
            PointOnPlaneJoint::new(ea, eb, plane_anchor, plane_normal, point)
        })
    }
}
