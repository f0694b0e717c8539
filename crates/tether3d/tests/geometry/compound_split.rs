use std::sync::Arc;
use tether3d::collision::{Collidable, CompoundCollidable, ContactEventManagers};
use tether3d::compound_helper::{
    create_partial_compound_collidable, remove_child_from_compound_entity, split_compound,
    split_compound_entities, split_compound_into_new, CompoundError,
};
use tether3d::dynamics::{Entity, EntitySet};
use tether3d::math::{Matrix, Point, Real, RigidTransform, Vector};
use tether3d::shape::{CompoundShape, CompoundShapeEntry, SharedShape};

/// Four unit cubes at `x = 0, 2, 4, 6` with the weights `1, 2, 3, 4`.
///
/// The center of mass is at `x = 4`.
fn weighted_row() -> Arc<CompoundShape> {
    let entries = (0..4)
        .map(|i| {
            CompoundShapeEntry::new(
                SharedShape::cuboid(0.5, 0.5, 0.5),
                RigidTransform::from_position(Vector::new(2.0 * i as Real, 0.0, 0.0)),
                (i + 1) as Real,
            )
        })
        .collect();
    Arc::new(CompoundShape::new(entries).unwrap())
}

fn spinning_body(entities: &mut EntitySet) -> tether3d::dynamics::EntityHandle {
    let mut body = Entity::new_dynamic(Vector::new(4.0, 0.0, 0.0), 10.0, Matrix::identity());
    body.set_linear_velocity(Vector::new(1.0, 0.0, 0.0));
    body.set_angular_velocity(Vector::new(0.0, 0.0, 0.5));
    entities.insert(body)
}

#[test]
fn split_conserves_weight_center_and_momentum() {
    let shape = weighted_row();
    let contributions = shape.compute_child_contributions();
    let mut events = ContactEventManagers::new();
    let mut entities = EntitySet::new();
    let handle = spinning_body(&mut entities);

    let mut compound = CompoundCollidable::new(shape.clone());
    compound.set_entity(Some(handle));
    let momentum = entities[handle].linear_momentum();

    let (new_compound, new_handle, result) = split_compound_into_new(
        |child| child.shape_index() >= 2,
        &mut compound,
        &mut entities,
        &contributions,
        &mut events,
    )
    .unwrap()
    .unwrap();

    approx::assert_relative_eq!(result.a.weight + result.b.weight, shape.total_weight());
    let weighted_center = (result.a.center().coords * result.a.weight
        + result.b.center().coords * result.b.weight)
        / (result.a.weight + result.b.weight);
    approx::assert_relative_eq!(weighted_center, result.original_center.coords, epsilon = 1.0e-5);
    approx::assert_relative_eq!(result.original_center, Point::new(4.0, 0.0, 0.0), epsilon = 1.0e-5);

    let (a, b) = (&entities[handle], &entities[new_handle]);
    approx::assert_relative_eq!(a.mass(), 3.0, epsilon = 1.0e-5);
    approx::assert_relative_eq!(b.mass(), 7.0, epsilon = 1.0e-5);
    approx::assert_relative_eq!(a.position(), Vector::new(4.0 / 3.0, 0.0, 0.0), epsilon = 1.0e-5);
    approx::assert_relative_eq!(b.position(), Vector::new(36.0 / 7.0, 0.0, 0.0), epsilon = 1.0e-5);
    approx::assert_relative_eq!(
        a.linear_momentum() + b.linear_momentum(),
        momentum,
        epsilon = 1.0e-4
    );

    // The children did not move.
    assert_eq!(compound.len(), 2);
    assert_eq!(new_compound.len(), 2);
    approx::assert_relative_eq!(compound.bounding_box().mins.x, -0.5, epsilon = 1.0e-5);
    approx::assert_relative_eq!(compound.bounding_box().maxs.x, 2.5, epsilon = 1.0e-5);
    approx::assert_relative_eq!(new_compound.bounding_box().mins.x, 3.5, epsilon = 1.0e-5);
    approx::assert_relative_eq!(new_compound.bounding_box().maxs.x, 6.5, epsilon = 1.0e-5);
    assert_eq!(new_compound.entity_collidable().entity(), Some(new_handle));
}

#[test]
fn split_matching_nothing_changes_nothing() {
    let shape = weighted_row();
    let contributions = shape.compute_child_contributions();
    let mut events = ContactEventManagers::new();

    let (mut a, _) = create_partial_compound_collidable(shape.clone(), &[0, 1, 2]).unwrap();
    let (mut b, _) = create_partial_compound_collidable(shape, &[3]).unwrap();
    a.update_bounding_box_for_transform(&RigidTransform::identity());
    let tree = a.hierarchy().tree().clone();
    let indices: Vec<_> = a.shape_indices().collect();
    let local_position = a.entity_collidable().local_position;

    let result = split_compound(|_| false, &mut a, &mut b, &contributions, &mut events).unwrap();
    assert!(result.is_none());
    assert_eq!(a.hierarchy().tree(), &tree);
    assert_eq!(a.shape_indices().collect::<Vec<_>>(), indices);
    assert_eq!(a.entity_collidable().local_position, local_position);
    assert_eq!(b.len(), 1);

    assert_eq!(
        split_compound(|_| true, &mut a, &mut b, &contributions, &mut events).unwrap_err(),
        CompoundError::EmptyCompound
    );
    assert_eq!(a.hierarchy().tree(), &tree);
    assert_eq!(a.len(), 3);
}

#[test]
fn split_between_existing_compounds() {
    let shape = weighted_row();
    let contributions = shape.compute_child_contributions();
    let mut events = ContactEventManagers::new();

    let (mut a, _) = create_partial_compound_collidable(shape.clone(), &[0, 1, 2]).unwrap();
    let (mut b, _) = create_partial_compound_collidable(shape.clone(), &[3]).unwrap();
    let b_events = events.create();
    b.set_events(Some(b_events), &mut events);

    let result = split_compound(
        |child| child.shape_index() == 2,
        &mut a,
        &mut b,
        &contributions,
        &mut events,
    )
    .unwrap()
    .unwrap();

    approx::assert_relative_eq!(result.a.weight, 3.0);
    approx::assert_relative_eq!(result.b.weight, 7.0);
    // `b` already had the weight 4 before receiving the child of weight 3.
    approx::assert_relative_eq!(result.a.weight + (result.b.weight - 4.0), 6.0);
    approx::assert_relative_eq!(result.original_center.x, 8.0 / 3.0, epsilon = 1.0e-5);
    assert_eq!(b.hierarchy().tree().leaf_count(), 2);
    for child in b.children() {
        let handle = child.collidable.events().unwrap();
        assert_eq!(events.parent(handle), Some(b_events));
    }

    let other = Arc::new(CompoundShape::clone(&shape));
    let (mut c, _) = create_partial_compound_collidable(other, &[0]).unwrap();
    assert_eq!(
        split_compound(|_| true, &mut b, &mut c, &contributions, &mut events).unwrap_err(),
        CompoundError::ShapeMismatch
    );
}

#[test]
fn split_into_a_populated_body_conserves_mass_and_momentum() {
    let shape = weighted_row();
    let contributions = shape.compute_child_contributions();
    let mut events = ContactEventManagers::new();
    let mut entities = EntitySet::new();

    // Children 0, 1, 2 (weights 1, 2, 3) in a body of mass 6 centered on x = 8 / 3, and
    // child 3 (weight 4) in a body of mass 4 at rest on x = 6.
    let (mut a, _) = create_partial_compound_collidable(shape.clone(), &[0, 1, 2]).unwrap();
    let (mut b, _) = create_partial_compound_collidable(shape.clone(), &[3]).unwrap();
    let mut body_a = Entity::new_dynamic(Vector::new(8.0 / 3.0, 0.0, 0.0), 6.0, Matrix::identity());
    body_a.set_linear_velocity(Vector::new(1.0, 0.0, 0.0));
    let a_handle = entities.insert(body_a);
    let b_handle = entities.insert(Entity::new_dynamic(
        Vector::new(6.0, 0.0, 0.0),
        4.0,
        Matrix::identity(),
    ));
    a.set_entity(Some(a_handle));
    b.set_entity(Some(b_handle));
    let momentum = entities[a_handle].linear_momentum() + entities[b_handle].linear_momentum();

    let result = split_compound_entities(
        |child| child.shape_index() == 2,
        &mut a,
        &mut b,
        &mut entities,
        &contributions,
        &mut events,
    )
    .unwrap()
    .unwrap();
    approx::assert_relative_eq!(result.b.weight, 7.0);

    // Child 2 takes half of the mass of its body along.
    let (body_a, body_b) = (&entities[a_handle], &entities[b_handle]);
    approx::assert_relative_eq!(body_a.mass(), 3.0, epsilon = 1.0e-5);
    approx::assert_relative_eq!(body_b.mass(), 7.0, epsilon = 1.0e-5);
    approx::assert_relative_eq!(body_a.mass() + body_b.mass(), 10.0, epsilon = 1.0e-5);

    approx::assert_relative_eq!(body_a.position(), Vector::new(4.0 / 3.0, 0.0, 0.0), epsilon = 1.0e-5);
    approx::assert_relative_eq!(body_b.position(), Vector::new(36.0 / 7.0, 0.0, 0.0), epsilon = 1.0e-5);
    approx::assert_relative_eq!(body_a.linear_velocity(), Vector::new(1.0, 0.0, 0.0), epsilon = 1.0e-5);
    approx::assert_relative_eq!(body_b.linear_velocity(), Vector::new(3.0 / 7.0, 0.0, 0.0), epsilon = 1.0e-5);
    approx::assert_relative_eq!(
        body_a.linear_momentum() + body_b.linear_momentum(),
        momentum,
        epsilon = 1.0e-4
    );
    approx::assert_relative_eq!(body_b.angular_velocity(), Vector::zeros(), epsilon = 1.0e-5);

    approx::assert_relative_eq!(b.bounding_box().mins.x, 3.5, epsilon = 1.0e-5);
    approx::assert_relative_eq!(b.bounding_box().maxs.x, 6.5, epsilon = 1.0e-5);
}

#[test]
fn removal_shrinks_the_body() {
    let shape = weighted_row();
    let contributions = shape.compute_child_contributions();
    let mut events = ContactEventManagers::new();
    let mut entities = EntitySet::new();
    let handle = spinning_body(&mut entities);

    let mut compound = CompoundCollidable::new(shape);
    compound.set_entity(Some(handle));

    let result = remove_child_from_compound_entity(
        |child| child.shape_index() == 3,
        &mut compound,
        &mut entities,
        &contributions,
        &mut events,
    )
    .unwrap()
    .unwrap();

    assert_eq!(result.removed_children.len(), 1);
    assert_eq!(result.removed_children[0].collidable.entity(), None);
    approx::assert_relative_eq!(result.remaining.weight, 6.0);
    approx::assert_relative_eq!(result.removed.weight, 4.0);

    // The remaining center is at x = (0 * 1 + 2 * 2 + 4 * 3) / 6.
    let body = &entities[handle];
    approx::assert_relative_eq!(body.position(), Vector::new(8.0 / 3.0, 0.0, 0.0), epsilon = 1.0e-5);
    approx::assert_relative_eq!(body.mass(), 6.0, epsilon = 1.0e-5);
    approx::assert_relative_eq!(compound.bounding_box().mins.x, -0.5, epsilon = 1.0e-5);
    approx::assert_relative_eq!(compound.bounding_box().maxs.x, 4.5, epsilon = 1.0e-5);

    let nothing = remove_child_from_compound_entity(
        |child| child.shape_index() == 3,
        &mut compound,
        &mut entities,
        &contributions,
        &mut events,
    )
    .unwrap();
    assert!(nothing.is_none());
}
