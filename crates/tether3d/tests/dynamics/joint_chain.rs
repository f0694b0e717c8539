use tether3d::dynamics::{Entity, EntityHandle, EntitySet};
use tether3d::joints::{BallSocketJoint, DistanceJoint, Joint, JointSolver};
use tether3d::math::{Matrix, Point, Real, Vector};

const DT: Real = 1.0 / 60.0;

#[test]
fn chain_links_keep_their_length() {
    let mut entities = EntitySet::new();
    let mut links: Vec<EntityHandle> = vec![entities.insert(Entity::new_kinematic(Vector::zeros()))];
    for i in 1..=4 {
        let body = Entity::new_dynamic(Vector::new(i as Real, 0.0, 0.0), 1.0, Matrix::identity());
        links.push(entities.insert(body));
    }
    entities[links[4]].set_linear_velocity(Vector::new(0.0, 2.0, 0.0));

    let mut solver = JointSolver::new();
    for pair in links.windows(2) {
        let anchor_a = Point::from(entities[pair[0]].position());
        let anchor_b = Point::from(entities[pair[1]].position());
        let joint =
            Joint::<DistanceJoint>::distance(&entities, pair[0], pair[1], &anchor_a, &anchor_b)
                .unwrap();
        let _ = solver.insert(joint);
    }
    assert_eq!(solver.len(), 4);

    for _ in 0..120 {
        let _ = solver.step(DT, &mut entities).unwrap();
    }

    for pair in links.windows(2) {
        let length = (entities[pair[1]].position() - entities[pair[0]].position()).norm();
        approx::assert_relative_eq!(length, 1.0, epsilon = 0.1);
    }
    for (_, joint) in solver.iter() {
        assert!(joint.is_active());
    }
}

#[test]
fn free_pair_conserves_linear_momentum() {
    let mut entities = EntitySet::new();
    let mut a = Entity::new_dynamic(Vector::zeros(), 1.0, Matrix::identity());
    a.set_linear_velocity(Vector::new(0.0, 3.0, -1.0));
    a.set_angular_velocity(Vector::new(0.0, 0.0, 1.0));
    let mut b = Entity::new_dynamic(
        Vector::new(2.0, 0.0, 0.0),
        4.0,
        Matrix::from_diagonal(&Vector::new(1.0, 2.0, 3.0)),
    );
    b.set_linear_velocity(Vector::new(-1.0, 0.0, 0.5));
    let (a, b) = (entities.insert(a), entities.insert(b));

    let momentum =
        |entities: &EntitySet| entities[a].linear_momentum() + entities[b].linear_momentum();
    let initial = momentum(&entities);

    let mut solver = JointSolver::new();
    let joint =
        Joint::<BallSocketJoint>::ball_socket(&entities, a, b, &Point::new(1.0, 0.0, 0.0)).unwrap();
    let handle = solver.insert(joint);

    for _ in 0..60 {
        let _ = solver.step(DT, &mut entities).unwrap();
    }

    approx::assert_relative_eq!(momentum(&entities), initial, epsilon = 1.0e-3);
    let joint = solver.get_joint::<BallSocketJoint>(handle).unwrap();
    assert!(joint.error().norm() < 5.0e-2);
}
