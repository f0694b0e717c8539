use crate::dynamics::Entity;
use crate::joints::{ConstraintDofs, JointKind};
use crate::math::{Matrix, Real, Rotation, Vector};

fn random_vector(rng: &mut oorandom::Rand32, amplitude: Real) -> Vector {
    Vector::from_fn(|_, _| (rng.rand_float() as Real * 2.0 - 1.0) * amplitude)
}

fn random_entity(rng: &mut oorandom::Rand32) -> Entity {
    let mass = 0.5 + rng.rand_float() as Real * 1.5;
    let inertia = Matrix::from_diagonal(&(Vector::repeat(0.2) + random_vector(rng, 0.1)));
    let mut entity = Entity::new_dynamic(random_vector(rng, 2.0), mass, inertia);
    entity.set_orientation(Rotation::from_scaled_axis(random_vector(rng, 1.5)));
    entity.set_linear_velocity(random_vector(rng, 1.0));
    entity.set_angular_velocity(random_vector(rng, 1.0));
    entity
}

pub fn random_entity_pair(rng: &mut oorandom::Rand32) -> (Entity, Entity) {
    (random_entity(rng), random_entity(rng))
}

/// Checks, by finite differences, that `J * v` is the time derivative of the joint error.
pub fn assert_jacobians_match_error_rate<K: JointKind>(kind: &K, a: &Entity, b: &Entity) {
    let h = 1.0e-3;
    let jacobians = kind.compute_jacobians(a, b);
    let velocity = K::Dofs::jacobian_mul(&jacobians.linear_a, &a.linear_velocity())
        + K::Dofs::jacobian_mul(&jacobians.angular_a, &a.angular_velocity())
        + K::Dofs::jacobian_mul(&jacobians.linear_b, &b.linear_velocity())
        + K::Dofs::jacobian_mul(&jacobians.angular_b, &b.angular_velocity());

    let (mut a1, mut b1) = (*a, *b);
    a1.integrate(h);
    b1.integrate(h);
    let error_rate = (kind.compute_jacobians(&a1, &b1).error - jacobians.error) * (1.0 / h);

    let mismatch = K::Dofs::amax(&(error_rate - velocity));
    let tolerance = 2.0e-2 * (1.0 + K::Dofs::amax(&velocity));
    assert!(
        mismatch < tolerance,
        "error rate {:?} does not match J * v = {:?}",
        error_rate,
        velocity
    );
}
