use crate::collision::{
    Collidable, CompoundChild, CompoundCollidable, ContactEventManagers,
};
use crate::compound_helper::group::{check_contributions, remove_reposition, split_reposition};
use crate::compound_helper::merge::combine_bodies;
use crate::compound_helper::{CompoundError, GroupDistribution};
use crate::dynamics::{Entity, EntityHandle, EntitySet};
use crate::math::Point;
use crate::shape::ShapeDistributionInformation;
use std::sync::Arc;

/// The outcome of a compound split.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SplitResult {
    /// The center of mass of the split compound before the split.
    pub original_center: Point,
    /// The distribution of the children left in the split compound.
    pub a: GroupDistribution,
    /// The distribution of the children of the compound receiving the moved children.
    pub b: GroupDistribution,
}

/// The outcome of the removal of compound children.
#[derive(Clone, Debug)]
pub struct RemovalResult {
    /// The center of mass of the compound before the removal.
    pub original_center: Point,
    /// The distribution of the children left in the compound.
    pub remaining: GroupDistribution,
    /// The distribution of the removed children.
    pub removed: GroupDistribution,
    /// The removed children, with their event managers unhooked from the compound.
    pub removed_children: Vec<CompoundChild>,
}

/// Evaluates `predicate` on every child of `compound`.
///
/// Returns `Ok(None)` if nothing matches and `EmptyCompound` if everything does.
fn partition(
    compound: &CompoundCollidable,
    mut predicate: impl FnMut(&CompoundChild) -> bool,
) -> Result<Option<Vec<bool>>, CompoundError> {
    let mask: Vec<bool> = compound.children().iter().map(&mut predicate).collect();
    let matches = mask.iter().filter(|m| **m).count();

    if matches == 0 {
        Ok(None)
    } else if matches == mask.len() {
        Err(CompoundError::EmptyCompound)
    } else {
        Ok(Some(mask))
    }
}

/// Takes out of `compound` the children flagged by `mask`.
fn take_masked(compound: &mut CompoundCollidable, mask: &[bool]) -> Vec<CompoundChild> {
    let mut flags = mask.iter();
    compound.take_children_where(|_| flags.next().copied().unwrap_or(false))
}

/// Moves the children of `a` matching `predicate` into `b`.
///
/// Both compounds must share the same compound shape, and `contributions` must be the result of
/// [`CompoundShape::compute_child_contributions`](crate::shape::CompoundShape::compute_child_contributions)
/// on that shape. After the split, each compound is recentered on the center of mass of its own
/// children and its hierarchy is reconstructed. The moved children get their event managers
/// hooked to the manager of `b`.
///
/// Returns `Ok(None)`, without touching anything, if no child matches. Fails with
/// [`CompoundError::EmptyCompound`], without touching anything, if every child matches.
pub fn split_compound(
    predicate: impl FnMut(&CompoundChild) -> bool,
    a: &mut CompoundCollidable,
    b: &mut CompoundCollidable,
    contributions: &[ShapeDistributionInformation],
    events: &mut ContactEventManagers,
) -> Result<Option<SplitResult>, CompoundError> {
    if !Arc::ptr_eq(a.shape(), b.shape()) {
        return Err(CompoundError::ShapeMismatch);
    }
    check_contributions(a.shape(), contributions)?;

    let Some(mask) = partition(a, predicate)? else {
        return Ok(None);
    };

    let original_center = GroupDistribution::of_compound(a, contributions).center();
    let moved = take_masked(a, &mask);
    b.append_children(moved);

    let group_a = GroupDistribution::of_compound(a, contributions);
    let group_b = GroupDistribution::of_compound(b, contributions);
    a.recenter(&group_a.center());
    b.recenter(&group_b.center());
    b.hook_children_events(events);
    a.reconstruct_hierarchy();
    b.reconstruct_hierarchy();

    Ok(Some(SplitResult {
        original_center,
        a: group_a,
        b: group_b,
    }))
}

/// The entity of a compound collidable.
pub(crate) fn compound_entity(
    compound: &CompoundCollidable,
    entities: &EntitySet,
) -> Result<EntityHandle, CompoundError> {
    compound
        .entity_collidable()
        .entity()
        .filter(|h| entities.contains(*h))
        .ok_or(CompoundError::MissingEntity)
}

/// Splits a compound body in two.
///
/// Performs [`split_compound`], then updates the entities of `a` and `b`. The entity of `a`
/// keeps the share of its mass matching the weight of its remaining children, its inertia
/// tensor is recomputed, and it is placed at the center of mass of its children with the
/// velocity that point had in the original body. The moved children carry away the rest of the
/// mass with the velocity of their own center of mass.
///
/// If `b` had no children, its entity becomes the body of the moved children. Otherwise the
/// moved children are fused into the body of `b` as [`merge_compound_entities`] would do,
/// conserving the total mass and momentum. A kinematic original makes both entities kinematic.
///
/// [`merge_compound_entities`]: crate::compound_helper::merge_compound_entities
pub fn split_compound_entities(
    mut predicate: impl FnMut(&CompoundChild) -> bool,
    a: &mut CompoundCollidable,
    b: &mut CompoundCollidable,
    entities: &mut EntitySet,
    contributions: &[ShapeDistributionInformation],
    events: &mut ContactEventManagers,
) -> Result<Option<SplitResult>, CompoundError> {
    let a_handle = compound_entity(a, entities)?;
    let b_handle = compound_entity(b, entities)?;
    if a_handle == b_handle {
        return Err(CompoundError::MissingEntity);
    }

    let (Some(original), Some(receiver)) = (
        entities.get(a_handle).copied(),
        entities.get(b_handle).copied(),
    ) else {
        return Err(CompoundError::MissingEntity);
    };

    check_contributions(b.shape(), contributions)?;
    let receiver_center =
        (!b.is_empty()).then(|| GroupDistribution::of_compound(b, contributions).center());

    let mut moved_indices = Vec::new();
    let Some(result) = split_compound(
        |child| {
            let moved = predicate(child);
            if moved {
                moved_indices.push(child.shape_index());
            }
            moved
        },
        a,
        b,
        contributions,
        events,
    )?
    else {
        return Ok(None);
    };

    let moved = GroupDistribution::compute(a.shape(), moved_indices, contributions);
    let original_weight = result.a.weight + moved.weight;

    // The moved children, still rigidly attached to the original body.
    let mut moved_body = original;
    split_reposition(
        &mut moved_body,
        &original,
        &(moved.center() - result.original_center),
    );

    if let Some(entity) = entities.get_mut(a_handle) {
        split_reposition(entity, &original, &(result.a.center() - result.original_center));
        if !original.is_dynamic() {
            entity.become_kinematic();
        } else if original_weight > 0.0 {
            let mass = original.mass() * result.a.weight / original_weight;
            result.a.initialize_entity(entity, mass);
            moved.initialize_entity(&mut moved_body, original.mass() - mass);
        }
        entity.activate();
    }

    if let Some(entity) = entities.get_mut(b_handle) {
        match receiver_center {
            None => *entity = moved_body,
            Some(receiver_center) => {
                let offset = result.b.center() - receiver_center;
                let center = receiver.position() + receiver.orientation() * offset;
                combine_bodies(entity, &result.b, center, [receiver, moved_body]);
            }
        }
        entity.activate();
    }

    for (compound, handle) in [(a, a_handle), (b, b_handle)] {
        if let Some(entity) = entities.get(handle) {
            compound.update_bounding_box_for_transform(&entity.world_transform());
        }
    }

    Ok(Some(result))
}

/// Splits the children of `a` matching `predicate` into a new compound body.
///
/// The new compound collidable shares the shape of `a` and is attached to a new entity inserted
/// into `entities`. If `a` has an event manager, the new compound gets a new one too. Nothing is
/// created if the split does not happen.
pub fn split_compound_into_new(
    predicate: impl FnMut(&CompoundChild) -> bool,
    a: &mut CompoundCollidable,
    entities: &mut EntitySet,
    contributions: &[ShapeDistributionInformation],
    events: &mut ContactEventManagers,
) -> Result<Option<(CompoundCollidable, EntityHandle, SplitResult)>, CompoundError> {
    let a_handle = compound_entity(a, entities)?;
    let Some(mask) = partition(a, predicate)? else {
        return Ok(None);
    };

    let mut b = CompoundCollidable::from_children(a.shape().clone(), Vec::new());
    let position = entities
        .get(a_handle)
        .map(|e| e.position())
        .ok_or(CompoundError::MissingEntity)?;
    let b_handle = entities.insert(Entity::new_kinematic(position));
    b.set_entity(Some(b_handle));

    if a.entity_collidable().events().is_some() {
        let handle = events.create();
        b.set_events(Some(handle), events);
    }

    let mut flags = mask.into_iter();
    match split_compound_entities(
        |_| flags.next().unwrap_or(false),
        a,
        &mut b,
        entities,
        contributions,
        events,
    ) {
        Ok(Some(result)) => Ok(Some((b, b_handle, result))),
        other => {
            let _ = entities.remove(b_handle);
            if let Some(handle) = b.entity_collidable().events() {
                let _ = events.remove(handle);
            }
            other.map(|_| None)
        }
    }
}

/// Removes the children of `compound` matching `predicate`.
///
/// The remaining children are recentered on their own center of mass and the hierarchy is
/// reconstructed. The event managers of the removed children are unhooked.
///
/// Returns `Ok(None)`, without touching anything, if no child matches. Fails with
/// [`CompoundError::EmptyCompound`], without touching anything, if every child matches.
pub fn remove_child_from_compound(
    predicate: impl FnMut(&CompoundChild) -> bool,
    compound: &mut CompoundCollidable,
    contributions: &[ShapeDistributionInformation],
    events: &mut ContactEventManagers,
) -> Result<Option<RemovalResult>, CompoundError> {
    check_contributions(compound.shape(), contributions)?;
    let Some(mask) = partition(compound, predicate)? else {
        return Ok(None);
    };

    let original_center = GroupDistribution::of_compound(compound, contributions).center();
    let mut removed_children = take_masked(compound, &mask);
    for child in &mut removed_children {
        child.collidable.set_entity(None);
        if let Some(handle) = child.collidable.events() {
            events.set_parent(handle, None);
        }
    }

    let remaining = GroupDistribution::of_compound(compound, contributions);
    let removed = GroupDistribution::compute(
        compound.shape(),
        removed_children.iter().map(|c| c.shape_index()),
        contributions,
    );
    compound.recenter(&remaining.center());
    compound.reconstruct_hierarchy();

    Ok(Some(RemovalResult {
        original_center,
        remaining,
        removed,
        removed_children,
    }))
}

/// Removes the children of a compound body matching `predicate`.
///
/// Performs [`remove_child_from_compound`], then moves the entity to the center of mass of the
/// remaining children and gives it the mass of the remaining children, proportionally to their
/// weight.
pub fn remove_child_from_compound_entity(
    predicate: impl FnMut(&CompoundChild) -> bool,
    compound: &mut CompoundCollidable,
    entities: &mut EntitySet,
    contributions: &[ShapeDistributionInformation],
    events: &mut ContactEventManagers,
) -> Result<Option<RemovalResult>, CompoundError> {
    let handle = compound_entity(compound, entities)?;
    let Some(result) = remove_child_from_compound(predicate, compound, contributions, events)?
    else {
        return Ok(None);
    };

    if let Some(entity) = entities.get_mut(handle) {
        remove_reposition(entity, &result.original_center, &result.remaining.center());

        let total_weight = result.remaining.weight + result.removed.weight;
        if entity.is_dynamic() && total_weight > 0.0 {
            let mass = entity.mass() * result.remaining.weight / total_weight;
            result.remaining.initialize_entity(entity, mass);
        }
        entity.activate();

        let transform = entity.world_transform();
        compound.update_bounding_box_for_transform(&transform);
    }

    Ok(Some(result))
}
