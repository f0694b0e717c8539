use crate::dynamics::{Entity, EntityHandle, EntitySet};
use crate::joints::{Dof3, Joint, JointError, JointJacobians, JointKind};
use crate::math::{Matrix, Rotation};

/// Prevents any relative rotation between two entities.
///
/// The relative orientation the entities had when the joint was created is kept.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct NoRotationJoint {
    initial_orientation_a: Rotation,
    initial_orientation_b: Rotation,
}

impl NoRotationJoint {
    /// Locks the current relative orientation of `a` and `b`.
    pub fn new(a: &Entity, b: &Entity) -> Self {
        Self::from_orientations(a.orientation(), b.orientation())
    }

    /// Locks the relative orientation of two entities with the given orientations.
    pub fn from_orientations(orientation_a: Rotation, orientation_b: Rotation) -> Self {
        Self {
            initial_orientation_a: orientation_a,
            initial_orientation_b: orientation_b,
        }
    }

    /// The orientations of the entities the locked relative orientation was taken from.
    pub fn initial_orientations(&self) -> (Rotation, Rotation) {
        (self.initial_orientation_a, self.initial_orientation_b)
    }
}

impl JointKind for NoRotationJoint {
    type Dofs = Dof3;

    fn compute_jacobians(&self, a: &Entity, b: &Entity) -> JointJacobians<Dof3> {
        // Rotation of B since the creation of the joint, relative to the rotation of A.
        let drift = b.orientation()
            * self.initial_orientation_b.inverse()
            * self.initial_orientation_a
            * a.orientation().inverse();

        JointJacobians {
            linear_a: Matrix::zeros(),
            angular_a: -Matrix::identity(),
            linear_b: Matrix::zeros(),
            angular_b: Matrix::identity(),
            error: drift.scaled_axis(),
        }
    }
}

impl Joint<NoRotationJoint> {
    /// Locks the current relative orientation of the entities `a` and `b`.
    pub fn no_rotation(
        entities: &EntitySet,
        a: EntityHandle,
        b: EntityHandle,
    ) -> Result<Self, JointError> {
        Self::with_entities(entities, a, b, |ea, eb| Ok(NoRotationJoint::new(ea, eb)))
    }
}

#[cfg(test)]
mod test {
    use super::NoRotationJoint;
    use crate::dynamics::{Entity, EntitySet};
    use crate::joints::{test_utils, Joint, JointKind};
    use crate::math::{Matrix, Real, Rotation, Vector};

    const DT: Real = 1.0 / 60.0;

    #[test]
    fn drift_is_measured_from_the_initial_orientations() {
        let mut a = Entity::new_dynamic(Vector::zeros(), 1.0, Matrix::identity());
        let mut b = Entity::new_dynamic(Vector::x(), 1.0, Matrix::identity());
        a.set_orientation(Rotation::from_scaled_axis(Vector::y() * 0.4));
        b.set_orientation(Rotation::from_scaled_axis(Vector::z() * -1.0));
        let kind = NoRotationJoint::new(&a, &b);

        approx::assert_relative_eq!(
            kind.compute_jacobians(&a, &b).error,
            Vector::zeros(),
            epsilon = 1.0e-6
        );

        // Rotating both entities together does not create any error.
        let spin = Rotation::from_scaled_axis(Vector::new(0.3, -0.2, 0.9));
        a.set_orientation(spin * a.orientation());
        b.set_orientation(spin * b.orientation());
        approx::assert_relative_eq!(
            kind.compute_jacobians(&a, &b).error,
            Vector::zeros(),
            epsilon = 1.0e-5
        );

        let twist = Rotation::from_scaled_axis(Vector::x() * 0.25);
        b.set_orientation(twist * b.orientation());
        approx::assert_relative_eq!(
            kind.compute_jacobians(&a, &b).error,
            Vector::x() * 0.25,
            epsilon = 1.0e-5
        );
    }

    #[test]
    fn relative_spin_is_removed() {
        let mut entities = EntitySet::new();
        let a = entities.insert(Entity::new_kinematic(Vector::zeros()));
        let mut body = Entity::new_dynamic(Vector::x(), 2.0, Matrix::identity());
        body.set_angular_velocity(Vector::new(0.0, 3.0, -1.0));
        let b = entities.insert(body);

        let mut joint = Joint::<NoRotationJoint>::no_rotation(&entities, a, b).unwrap();
        joint.update(DT, &entities).unwrap();
        joint.exclusive_update(&mut entities);
        for _ in 0..4 {
            let _ = joint.solve_iteration(&mut entities);
        }

        assert!(entities[b].angular_velocity().norm() < 1.0e-2);
        assert_eq!(entities[b].linear_velocity(), Vector::zeros());
    }

    #[test]
    fn jacobians_match_the_error_rate() {
        let mut rng = oorandom::Rand32::new(3);
        for _ in 0..10 {
            let (a, b) = test_utils::random_entity_pair(&mut rng);
            let kind = NoRotationJoint::new(&a, &b);
            test_utils::assert_jacobians_match_error_rate(&kind, &a, &b);
        }
    }
}
