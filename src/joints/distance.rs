use crate::dynamics::{Entity, EntityHandle, EntitySet};
use crate::joints::{Dof1, Joint, JointError, JointJacobians, JointKind};
use crate::math::{Point, Real, Vector};
use crate::utils::DISTANCE_EPSILON;
use na::Vector1;

/// Keeps two anchors at a fixed distance from each other.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct DistanceJoint {
    /// The anchor attached to the entity A, in its local-space.
    pub local_anchor_a: Vector,
    /// The anchor attached to the entity B, in its local-space.
    pub local_anchor_b: Vector,
    distance: Real,
}

impl DistanceJoint {
    /// A distance joint between two world-space anchors, keeping their current distance.
    pub fn new(a: &Entity, b: &Entity, anchor_a: &Point, anchor_b: &Point) -> Self {
        Self {
            local_anchor_a: a.world_transform().inverse_transform_point(anchor_a).coords,
            local_anchor_b: b.world_transform().inverse_transform_point(anchor_b).coords,
            distance: na::distance(anchor_a, anchor_b),
        }
    }

    /// A distance joint between anchors given in the local-space of their entities.
    ///
    /// Negative distances are replaced by zero.
    pub fn from_local_anchors(
        local_anchor_a: Vector,
        local_anchor_b: Vector,
        distance: Real,
    ) -> Self {
        Self {
            local_anchor_a,
            local_anchor_b,
            distance: distance.max(0.0),
        }
    }

    /// The target distance between the anchors.
    pub fn distance(&self) -> Real {
        self.distance
    }

    /// Sets the target distance between the anchors.
    ///
    /// Negative distances are replaced by zero.
    pub fn set_distance(&mut self, distance: Real) {
        self.distance = distance.max(0.0);
    }
}

impl JointKind for DistanceJoint {
    type Dofs = Dof1;

    fn compute_jacobians(&self, a: &Entity, b: &Entity) -> JointJacobians<Dof1> {
        let ra = a.orientation_matrix() * self.local_anchor_a;
        let rb = b.orientation_matrix() * self.local_anchor_b;
        let separation = (b.position() + rb) - (a.position() + ra);
        let length = separation.norm();

        let normal = if length > DISTANCE_EPSILON {
            separation / length
        } else {
            log::debug!("Distance joint anchors are too close to define a direction.");
            Vector::zeros()
        };

        JointJacobians {
            linear_a: -normal.transpose(),
            angular_a: normal.cross(&ra).transpose(),
            linear_b: normal.transpose(),
            angular_b: rb.cross(&normal).transpose(),
            error: Vector1::new(length - self.distance),
        }
    }
}

impl Joint<DistanceJoint> {
    /// Keeps the world-space anchors `anchor_a` and `anchor_b` at their current distance.
    pub fn distance(
        entities: &EntitySet,
        a: EntityHandle,
        b: EntityHandle,
        anchor_a: &Point,
        anchor_b: &Point,
    ) -> Result<Self, JointError> {
        Self::with_entities(entities, a, b, |ea, eb| {
            Ok(DistanceJoint::new(ea, eb, anchor_a, anchor_b))
        })
    }
}
