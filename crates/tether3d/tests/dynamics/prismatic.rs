use tether3d::dynamics::{Entity, EntitySet};
use tether3d::joints::{Joint, JointSolver, NoRotationJoint, PointOnLineJoint, SolverSettings};
use tether3d::math::{Matrix, Point, Real, Vector};

const DT: Real = 1.0 / 60.0;

#[test]
fn slider_only_moves_along_its_rail() {
    let mut entities = EntitySet::new();
    let rail = entities.insert(Entity::new_kinematic(Vector::zeros()));
    let mut slider = Entity::new_dynamic(Vector::new(0.5, 0.0, 0.0), 1.0, Matrix::identity());
    slider.set_linear_velocity(Vector::new(1.0, 1.0, -1.0));
    slider.set_angular_velocity(Vector::new(1.0, 0.0, 0.5));
    let slider = entities.insert(slider);

    let mut solver = JointSolver::new();
    solver.settings = SolverSettings {
        iteration_count: 15,
        ..SolverSettings::default()
    };
    let line = Joint::<PointOnLineJoint>::point_on_line(
        &entities,
        rail,
        slider,
        &Point::origin(),
        &Vector::x(),
        &Point::new(0.5, 0.0, 0.0),
    )
    .unwrap();
    let _ = solver.insert(line);
    let _ = solver.insert(Joint::<NoRotationJoint>::no_rotation(&entities, rail, slider).unwrap());

    for _ in 0..60 {
        let _ = solver.step(DT, &mut entities).unwrap();
    }

    let slider = &entities[slider];
    approx::assert_relative_eq!(slider.linear_velocity().x, 1.0, epsilon = 1.0e-2);
    assert!(slider.linear_velocity().yz().norm() < 1.0e-2);
    assert!(slider.angular_velocity().norm() < 1.0e-2);
    assert!(slider.position().yz().norm() < 5.0e-2);
    approx::assert_relative_eq!(slider.position().x, 1.5, epsilon = 5.0e-2);
}
