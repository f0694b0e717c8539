use crate::collision::{Collidable, CompoundCollidable, ContactEventManagers};
use crate::compound_helper::group::check_contributions;
use crate::compound_helper::split::compound_entity;
use crate::compound_helper::{CompoundError, GroupDistribution};
use crate::dynamics::{Entity, EntitySet};
use crate::math::{Point, Vector};
use crate::shape::ShapeDistributionInformation;
use std::sync::Arc;

/// The outcome of a compound merge.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MergeResult {
    /// The center of mass of the receiving compound before the merge.
    pub original_center: Point,
    /// The distribution of the merged compound.
    pub merged: GroupDistribution,
}

/// Moves every child of `b` into `a`.
///
/// Both compounds must share the same compound shape. The merged compound is recentered on the
/// center of mass of all its children and its hierarchy is reconstructed. The event managers of
/// the children of `b` are hooked to the manager of `a`.
pub fn merge_compounds(
    a: &mut CompoundCollidable,
    mut b: CompoundCollidable,
    contributions: &[ShapeDistributionInformation],
    events: &mut ContactEventManagers,
) -> Result<MergeResult, CompoundError> {
    if !Arc::ptr_eq(a.shape(), b.shape()) {
        return Err(CompoundError::ShapeMismatch);
    }
    check_contributions(a.shape(), contributions)?;

    let original_center = GroupDistribution::of_compound(a, contributions).center();
    let children = b.take_children_where(|_| true);
    a.append_children(children);

    let merged = GroupDistribution::of_compound(a, contributions);
    a.recenter(&merged.center());
    a.hook_children_events(events);
    a.reconstruct_hierarchy();

    Ok(MergeResult {
        original_center,
        merged,
    })
}

/// Merges the compound body `b` into the compound body `a`.
///
/// The children of `b` must be placed where the shared compound shape puts them relative to the
/// children of `a`. After [`merge_compounds`], the entity of `a` is moved to the combined center
/// of mass, gets the sum of both masses, and velocities conserving the linear and angular
/// momentum of both bodies. If any of the two bodies is kinematic, the merged body is kinematic
/// and follows the motion of that body. The entity of `b` is removed from `entities` and the
/// event manager of `b`, if any, from `events`.
pub fn merge_compound_entities(
    a: &mut CompoundCollidable,
    b: CompoundCollidable,
    entities: &mut EntitySet,
    contributions: &[ShapeDistributionInformation],
    events: &mut ContactEventManagers,
) -> Result<MergeResult, CompoundError> {
    let a_handle = compound_entity(a, entities)?;
    let b_handle = compound_entity(&b, entities)?;
    if a_handle == b_handle {
        return Err(CompoundError::MissingEntity);
    }

    let b_events = b.entity_collidable().events();
    let (Some(body_a), Some(body_b)) = (
        entities.get(a_handle).copied(),
        entities.get(b_handle).copied(),
    ) else {
        return Err(CompoundError::MissingEntity);
    };

    let result = merge_compounds(a, b, contributions, events)?;
    let _ = entities.remove(b_handle);
    if let Some(handle) = b_events {
        let _ = events.remove(handle);
    }

    let Some(entity) = entities.get_mut(a_handle) else {
        return Err(CompoundError::MissingEntity);
    };

    let offset = result.merged.center() - result.original_center;
    let center = body_a.position() + body_a.orientation() * offset;
    combine_bodies(entity, &result.merged, center, [body_a, body_b]);
    entity.activate();

    let transform = entity.world_transform();
    a.update_bounding_box_for_transform(&transform);

    Ok(result)
}

/// Places `entity` at `center` with the mass and motion of two bodies fused into the group
/// `merged`.
///
/// Two dynamic bodies give a dynamic entity conserving their total mass, linear momentum, and
/// angular momentum about `center`. Otherwise the entity becomes kinematic and follows the
/// motion of the kinematic body.
pub(crate) fn combine_bodies(
    entity: &mut Entity,
    merged: &GroupDistribution,
    center: Vector,
    [body_a, body_b]: [Entity; 2],
) {
    entity.set_position(center);

    match (body_a.is_dynamic(), body_b.is_dynamic()) {
        (true, true) => {
            let mass = body_a.mass() + body_b.mass();
            let linear_momentum = body_a.linear_momentum() + body_b.linear_momentum();
            let angular_momentum = [body_a, body_b]
                .iter()
                .map(|body| {
                    let arm = body.position() - center;
                    body.angular_momentum() + arm.cross(&body.linear_momentum())
                })
                .sum::<Vector>();

            merged.initialize_entity(entity, mass);
            entity.set_linear_velocity(linear_momentum / mass);
            entity.set_angular_velocity(entity.world_inverse_inertia() * angular_momentum);
        }
        (a_dynamic, _) => {
            let driver = if a_dynamic { body_b } else { body_a };
            entity.become_kinematic();
            entity.set_linear_velocity(driver.velocity_at_point(&Point::from(center)));
            entity.set_angular_velocity(driver.angular_velocity());
        }
    }
}
