use crate::dynamics::{Entity, EntityHandle, EntitySet};
use crate::joints::{Dof2, Joint, JointError, JointJacobians, JointKind};
use crate::math::{Matrix2x3, Point, Vector, Vector2};
use crate::utils::perpendicular;

/// Keeps a point of the entity B on a line attached to the entity A.
///
/// Removes the two linear degrees of freedom orthogonal to the line.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct PointOnLineJoint {
    local_line_anchor: Vector,
    local_line_direction: Vector,
    local_point: Vector,
    local_restricted_axes: [Vector; 2],
}

impl PointOnLineJoint {
    /// Keeps the world-space `point`, attached to `b`, on the world-space line through
    /// `line_anchor` with the direction `line_direction`, attached to `a`.
    pub fn new(
        a: &Entity,
        b: &Entity,
        line_anchor: &Point,
        line_direction: &Vector,
        point: &Point,
    ) -> Result<Self, JointError> {
        let pose_a = a.world_transform();
        Self::from_local_frames(
            pose_a.inverse_transform_point(line_anchor).coords,
            pose_a.inverse_transform_vector(line_direction),
            b.world_transform().inverse_transform_point(point).coords,
        )
    }

    /// Creates the joint from a line expressed in the local-space of the entity A, and a point
    /// expressed in the local-space of the entity B.
    pub fn from_local_frames(
        local_line_anchor: Vector,
        local_line_direction: Vector,
        local_point: Vector,
    ) -> Result<Self, JointError> {
        let mut result = Self {
            local_line_anchor,
            local_line_direction: Vector::x(),
            local_point,
            local_restricted_axes: [Vector::y(), Vector::z()],
        };
        result.set_local_line_direction(local_line_direction)?;
        Ok(result)
    }

    /// The point on the line, in the local-space of the entity A.
    pub fn local_line_anchor(&self) -> &Vector {
        &self.local_line_anchor
    }

    /// Sets the point on the line, in the local-space of the entity A.
    pub fn set_local_line_anchor(&mut self, anchor: Vector) {
        self.local_line_anchor = anchor;
    }

    /// The normalized direction of the line, in the local-space of the entity A.
    pub fn local_line_direction(&self) -> &Vector {
        &self.local_line_direction
    }

    /// Sets the direction of the line, in the local-space of the entity A.
    ///
    /// The restricted axes are derived again from the new direction.
    pub fn set_local_line_direction(&mut self, direction: Vector) -> Result<(), JointError> {
        let direction = direction
            .try_normalize(0.0)
            .ok_or(JointError::DegenerateAxis)?;
        let first = perpendicular(&direction).ok_or(JointError::DegenerateAxis)?;
        self.local_line_direction = direction;
        self.local_restricted_axes = [first, direction.cross(&first)];
        Ok(())
    }

    /// The point kept on the line, in the local-space of the entity B.
    pub fn local_point(&self) -> &Vector {
        &self.local_point
    }

    /// Sets the point kept on the line, in the local-space of the entity B.
    pub fn set_local_point(&mut self, point: Vector) {
        self.local_point = point;
    }

    /// The two axes orthogonal to the line, in the local-space of the entity A.
    pub fn local_restricted_axes(&self) -> &[Vector; 2] {
        &self.local_restricted_axes
    }
}

impl JointKind for PointOnLineJoint {
    type Dofs = Dof2;

    fn compute_jacobians(&self, a: &Entity, b: &Entity) -> JointJacobians<Dof2> {
        let rotation_a = a.orientation_matrix();
        let line_anchor = a.position() + rotation_a * self.local_line_anchor;
        let point = b.position() + b.orientation_matrix() * self.local_point;
        let [d1, d2] = self.local_restricted_axes.map(|axis| rotation_a * axis);

        let offset = point - line_anchor;
        let arm_a = point - a.position();
        let arm_b = point - b.position();
        let linear_b = Matrix2x3::from_rows(&[d1.transpose(), d2.transpose()]);

        JointJacobians {
            linear_a: -linear_b,
            angular_a: Matrix2x3::from_rows(&[
                d1.cross(&arm_a).transpose(),
                d2.cross(&arm_a).transpose(),
            ]),
            linear_b,
            angular_b: Matrix2x3::from_rows(&[
                arm_b.cross(&d1).transpose(),
                arm_b.cross(&d2).transpose(),
            ]),
            error: Vector2::new(d1.dot(&offset), d2.dot(&offset)),
        }
    }
}

impl Joint<PointOnLineJoint> {
    /// Keeps the world-space `point`, attached to `b`, on the world-space line attached to `a`.
    pub fn point_on_line(
        entities: &EntitySet,
        a: EntityHandle,
        b: EntityHandle,
        line_anchor: &Point,
        line_direction: &Vector,
        point: &Point,
    ) -> Result<Self, JointError> {
        Self::with_entities(entities, a, b, |ea, eb| {
            PointOnLineJoint::new(ea, eb, line_anchor, line_direction, point)
        })
    }
}

#[cfg(test)]
mod test {
    use super::PointOnLineJoint;
    use crate::dynamics::{Entity, EntitySet};
    use crate::joints::{test_utils, Joint, JointError, JointKind};
    use crate::math::{Matrix, Point, Real, Vector, Vector2};

    const DT: Real = 1.0 / 60.0;

    #[test]
    fn restricted_axes_span_the_orthogonal_plane() {
        let mut kind =
            PointOnLineJoint::from_local_frames(Vector::zeros(), Vector::y() * 2.0, Vector::zeros())
                .unwrap();
        let check = |kind: &PointOnLineJoint| {
            let [d1, d2] = *kind.local_restricted_axes();
            let direction = *kind.local_line_direction();
            approx::assert_relative_eq!(d1.norm(), 1.0, epsilon = 1.0e-6);
            approx::assert_relative_eq!(d2.norm(), 1.0, epsilon = 1.0e-6);
            approx::assert_relative_eq!(d1.dot(&d2), 0.0, epsilon = 1.0e-6);
            approx::assert_relative_eq!(d1.dot(&direction), 0.0, epsilon = 1.0e-6);
            approx::assert_relative_eq!(d2.dot(&direction), 0.0, epsilon = 1.0e-6);
        };
        check(&kind);

        kind.set_local_line_direction(Vector::new(1.0, -2.0, 0.5)).unwrap();
        check(&kind);

        assert_eq!(
            kind.set_local_line_direction(Vector::zeros()),
            Err(JointError::DegenerateAxis)
        );
    }

    #[test]
    fn error_is_the_offset_from_the_line() {
        let a = Entity::new_kinematic(Vector::zeros());
        let b = Entity::new_dynamic(Vector::new(5.0, 1.0, -2.0), 1.0, Matrix::identity());
        let kind =
            PointOnLineJoint::from_local_frames(Vector::zeros(), Vector::x(), Vector::zeros())
                .unwrap();

        let jacobians = kind.compute_jacobians(&a, &b);
        // Only the components orthogonal to the line are errors.
        approx::assert_relative_eq!(jacobians.error.norm(), Vector2::new(1.0, 2.0).norm());
    }

    #[test]
    fn bias_velocity_is_clamped_per_axis() {
        let mut entities = EntitySet::new();
        let a = entities.insert(Entity::new_kinematic(Vector::zeros()));
        let b = entities.insert(Entity::new_dynamic(
            Vector::new(0.0, 800.0, -300.0),
            1.0,
            Matrix::identity(),
        ));

        let mut joint = Joint::<PointOnLineJoint>::point_on_line(
            &entities,
            a,
            b,
            &Point::origin(),
            &Vector::x(),
            &Point::new(0.0, 800.0, -300.0),
        )
        .unwrap();
        joint.settings.set_max_corrective_velocity(2.0);
        joint.update(DT, &entities).unwrap();

        let bias = joint.bias_velocity();
        assert!(bias.x.abs() <= 2.0 && bias.y.abs() <= 2.0);
        assert!(joint.error().amax() > 100.0);
    }

    #[test]
    fn jacobians_match_the_error_rate() {
        let mut rng = oorandom::Rand32::new(11);
        for _ in 0..10 {
            let (a, b) = test_utils::random_entity_pair(&mut rng);
            let kind = PointOnLineJoint::new(
                &a,
                &b,
                &Point::new(1.0, 0.0, 0.0),
                &Vector::new(0.3, 1.0, -0.4),
                &Point::new(-0.5, 2.0, 1.0),
            )
            .unwrap();
            test_utils::assert_jacobians_match_error_rate(&kind, &a, &b);
        }
    }
}
