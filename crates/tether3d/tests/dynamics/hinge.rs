use tether3d::dynamics::{Entity, EntitySet};
use tether3d::joints::{BallSocketJoint, Joint, JointSolver, RevoluteAngularJoint};
use tether3d::math::{Matrix, Point, Real, Vector};

const DT: Real = 1.0 / 60.0;

#[test]
fn wheel_keeps_spinning_around_its_axle() {
    let mut entities = EntitySet::new();
    let base = entities.insert(Entity::new_kinematic(Vector::zeros()));
    let mut wheel = Entity::new_dynamic(Vector::x(), 2.0, Matrix::identity());
    wheel.set_linear_velocity(Vector::new(1.0, 1.0, 0.0));
    wheel.set_angular_velocity(Vector::new(0.5, 0.3, 2.0));
    let wheel = entities.insert(wheel);

    let mut solver = JointSolver::new();
    let anchor = Point::new(1.0, 0.0, 0.0);
    let axle = Joint::<BallSocketJoint>::ball_socket(&entities, base, wheel, &anchor).unwrap();
    let hinge = Joint::<RevoluteAngularJoint>::revolute_angular(&entities, base, wheel, &Vector::z())
        .unwrap();
    let _ = solver.insert(axle);
    let hinge = solver.insert(hinge);

    for _ in 0..60 {
        let _ = solver.step(DT, &mut entities).unwrap();
    }

    let wheel = &entities[wheel];
    approx::assert_relative_eq!(wheel.angular_velocity().z, 2.0, epsilon = 1.0e-4);
    assert!(wheel.angular_velocity().xy().norm() < 1.0e-2);
    assert!(wheel.linear_velocity().norm() < 1.0e-2);
    assert!((wheel.position() - Vector::x()).norm() < 5.0e-2);

    // The wheel turned by roughly two radians around the axle.
    let turned = wheel.orientation().scaled_axis();
    approx::assert_relative_eq!(turned.z, 2.0, epsilon = 5.0e-2);

    let hinge = solver.get_joint::<RevoluteAngularJoint>(hinge).unwrap();
    assert!(hinge.error().norm() < 1.0e-2);
}
