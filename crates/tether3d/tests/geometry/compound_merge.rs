use std::sync::Arc;
use tether3d::collision::{Collidable, CompoundCollidable, ContactEventManagers};
use tether3d::compound_helper::{merge_compound_entities, split_compound_into_new, CompoundError};
use tether3d::dynamics::{Entity, EntityHandle, EntitySet};
use tether3d::math::{Matrix, Real, RigidTransform, Rotation, Vector};
use tether3d::shape::{CompoundShape, CompoundShapeEntry, SharedShape};

fn tower() -> Arc<CompoundShape> {
    let entries = (0..5)
        .map(|i| {
            CompoundShapeEntry::new(
                SharedShape::cuboid(1.0, 0.5, 1.0),
                RigidTransform::new(
                    Vector::new(0.0, i as Real, 0.0),
                    Rotation::from_scaled_axis(Vector::y() * (0.3 * i as Real)),
                ),
                1.0 + 0.5 * i as Real,
            )
        })
        .collect();
    let (shape, _) = CompoundShape::new_centered(entries).unwrap();
    Arc::new(shape)
}

fn total_angular_momentum(bodies: &[Entity], center: &Vector) -> Vector {
    bodies
        .iter()
        .map(|b| b.angular_momentum() + (b.position() - center).cross(&b.linear_momentum()))
        .sum()
}

fn setup(
    entities: &mut EntitySet,
    events: &mut ContactEventManagers,
) -> (CompoundCollidable, EntityHandle, CompoundCollidable, EntityHandle) {
    let shape = tower();
    let contributions = shape.compute_child_contributions();

    let mut body = Entity::new_dynamic(Vector::new(1.0, 2.0, 3.0), 12.0, Matrix::identity());
    body.set_orientation(Rotation::from_scaled_axis(Vector::new(0.1, 0.4, -0.2)));
    body.set_linear_velocity(Vector::new(0.5, -1.0, 2.0));
    body.set_angular_velocity(Vector::new(0.3, 1.0, -0.6));
    let handle = entities.insert(body);

    let mut compound = CompoundCollidable::new(shape);
    compound.set_entity(Some(handle));
    let (upper, upper_handle, _) = split_compound_into_new(
        |child| child.shape_index() >= 3,
        &mut compound,
        entities,
        &contributions,
        events,
    )
    .unwrap()
    .unwrap();

    (compound, handle, upper, upper_handle)
}

#[test]
fn merge_conserves_momentum() {
    let mut entities = EntitySet::new();
    let mut events = ContactEventManagers::new();
    let (mut lower, lower_handle, upper, upper_handle) = setup(&mut entities, &mut events);
    let contributions = lower.shape().compute_child_contributions();

    // Make the halves move apart before merging them back.
    entities[upper_handle].apply_linear_impulse(&Vector::new(3.0, 0.0, -1.0));
    entities[lower_handle].apply_angular_impulse(&Vector::new(0.0, 2.0, 0.5));

    let before = [entities[lower_handle], entities[upper_handle]];
    let mass = before[0].mass() + before[1].mass();
    let linear_momentum = before[0].linear_momentum() + before[1].linear_momentum();

    let result =
        merge_compound_entities(&mut lower, upper, &mut entities, &contributions, &mut events)
            .unwrap();

    assert!(!entities.contains(upper_handle));
    assert_eq!(lower.len(), 5);
    approx::assert_relative_eq!(result.merged.weight, lower.shape().total_weight());

    let merged = entities[lower_handle];
    approx::assert_relative_eq!(merged.mass(), mass, epsilon = 1.0e-4);
    approx::assert_relative_eq!(merged.linear_momentum(), linear_momentum, epsilon = 1.0e-3);

    // The merged center is the mass-weighted average of both centers.
    let center = (before[0].position() * before[0].mass() + before[1].position() * before[1].mass())
        / mass;
    approx::assert_relative_eq!(merged.position(), center, epsilon = 1.0e-4);
    approx::assert_relative_eq!(
        merged.angular_momentum(),
        total_angular_momentum(&before, &center),
        epsilon = 1.0e-2
    );
}

#[test]
fn merging_a_kinematic_body_makes_the_result_kinematic() {
    let mut entities = EntitySet::new();
    let mut events = ContactEventManagers::new();
    let (mut lower, lower_handle, upper, upper_handle) = setup(&mut entities, &mut events);
    let contributions = lower.shape().compute_child_contributions();

    entities[upper_handle].become_kinematic();
    entities[upper_handle].set_linear_velocity(Vector::new(0.0, 0.0, 4.0));
    entities[upper_handle].set_angular_velocity(Vector::zeros());

    let _ = merge_compound_entities(&mut lower, upper, &mut entities, &contributions, &mut events)
        .unwrap();
    let merged = &entities[lower_handle];
    assert!(!merged.is_dynamic());
    approx::assert_relative_eq!(merged.linear_velocity(), Vector::new(0.0, 0.0, 4.0));
}

#[test]
fn merge_requires_a_shared_shape() {
    let mut entities = EntitySet::new();
    let mut events = ContactEventManagers::new();
    let (mut lower, _, _, _) = setup(&mut entities, &mut events);
    let contributions = lower.shape().compute_child_contributions();

    let mut stranger = CompoundCollidable::new(tower());
    let error = merge_compound_entities(
        &mut lower,
        stranger.clone(),
        &mut entities,
        &contributions,
        &mut events,
    );
    assert_eq!(error.unwrap_err(), CompoundError::MissingEntity);

    stranger.set_entity(Some(entities.insert(Entity::new_kinematic(Vector::zeros()))));
    let error =
        merge_compound_entities(&mut lower, stranger, &mut entities, &contributions, &mut events);
    assert_eq!(error.unwrap_err(), CompoundError::ShapeMismatch);
}
