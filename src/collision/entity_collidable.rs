use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::collision::{CollisionRules, EventManagerHandle};
use crate::dynamics::{EntityHandle, EntitySet};
use crate::math::{Real, RigidTransform, Rotation, Vector};
use crate::query::{Ray, RayHit};
use crate::shape::{SharedShape, SupportMap};
use crate::utils::Resources;

/// How the bounding box of a collidable is enlarged to account for its motion.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum BoundingBoxExpansion {
    /// Only the faces of the box the linear velocity points toward are moved, by
    /// `dt * linear_velocity`.
    #[default]
    Swept,
    /// Like `Swept`, and every face is also pushed by `dt` times the largest speed of the
    /// entities currently overlapping this collidable.
    OverlapSpeed,
}

/// A predicate deciding which collidables are tested by a query.
pub type CollidableFilter<'a> = dyn Fn(&EntityCollidable) -> bool + 'a;

/// The result of a ray or convex cast on a collidable.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CollidableRayHit {
    /// The hit, in world-space.
    pub hit: RayHit,
    /// The index of the compound child hit, if the collidable is a compound.
    pub child: Option<usize>,
}

/// The state shared by every collidable: a shape placed at the pose of an entity.
#[derive(Clone, Debug)]
pub struct EntityCollidable {
    shape: SharedShape,
    entity: Option<EntityHandle>,
    /// The position of the shape origin, in the local-space of the entity.
    ///
    /// This decouples the shape from the center of mass of the entity.
    pub local_position: Vector,
    world_transform: RigidTransform,
    bounding_box: Aabb,
    collision_rules: CollisionRules,
    events: Option<EventManagerHandle>,
    overlaps: Vec<EntityHandle>,
    /// How the bounding box is enlarged by [`Collidable::update_bounding_box`].
    pub expansion: BoundingBoxExpansion,
}

impl EntityCollidable {
    /// Creates a collidable with the given shape, not attached to any entity.
    pub fn new(shape: SharedShape) -> Self {
        let world_transform = RigidTransform::identity();
        let bounding_box = shape.compute_aabb(&world_transform);

        Self {
            shape,
            entity: None,
            local_position: Vector::zeros(),
            world_transform,
            bounding_box,
            collision_rules: CollisionRules::default(),
            events: None,
            overlaps: Vec::new(),
            expansion: BoundingBoxExpansion::default(),
        }
    }

    /// The shape of this collidable.
    pub fn shape(&self) -> &SharedShape {
        &self.shape
    }

    /// The entity this collidable follows.
    pub fn entity(&self) -> Option<EntityHandle> {
        self.entity
    }

    /// Attaches this collidable to an entity.
    pub fn set_entity(&mut self, entity: Option<EntityHandle>) {
        self.entity = entity;
    }

    /// The world-space transform of the shape.
    pub fn world_transform(&self) -> &RigidTransform {
        &self.world_transform
    }

    /// The world-space bounding box of this collidable.
    pub fn bounding_box(&self) -> &Aabb {
        &self.bounding_box
    }

    /// Overrides the bounding box of this collidable.
    pub fn set_bounding_box(&mut self, bounding_box: Aabb) {
        self.bounding_box = bounding_box;
    }

    /// The collision rules of this collidable.
    pub fn collision_rules(&self) -> &CollisionRules {
        &self.collision_rules
    }

    /// Changes the collision rules of this collidable and wakes its entity up.
    pub fn set_collision_rules(&mut self, rules: CollisionRules, entities: &mut EntitySet) {
        self.collision_rules = rules;

        if let Some(entity) = self.entity.and_then(|h| entities.get_mut(h)) {
            entity.activate();
        }
    }

    /// The contact event manager of this collidable.
    pub fn events(&self) -> Option<EventManagerHandle> {
        self.events
    }

    pub(crate) fn set_events_handle(&mut self, events: Option<EventManagerHandle>) {
        self.events = events;
    }

    /// Registers an entity overlapping this collidable.
    pub fn add_overlap(&mut self, other: EntityHandle) {
        if !self.overlaps.contains(&other) {
            self.overlaps.push(other);
        }
    }

    /// Unregisters an entity overlapping this collidable.
    pub fn remove_overlap(&mut self, other: EntityHandle) {
        self.overlaps.retain(|e| *e != other);
    }

    /// The entities currently overlapping this collidable.
    pub fn overlaps(&self) -> &[EntityHandle] {
        &self.overlaps
    }

    /// Places the shape at the given entity pose, offset by `local_position`.
    pub fn update_world_transform(&mut self, position: &Vector, orientation: &Rotation) {
        self.world_transform = RigidTransform::new(
            position + orientation * self.local_position,
            *orientation,
        );
    }

    /// Recomputes the bounding box of the shape at its current world transform.
    pub fn update_bounding_box_internal(&mut self) {
        self.bounding_box = self.shape.compute_aabb(&self.world_transform);
    }

    /// Casts a ray on the shape of this collidable.
    pub fn cast_ray(&self, ray: &Ray, max_t: Real) -> Option<RayHit> {
        self.shape.cast_ray(&self.world_transform, ray, max_t)
    }

    /// Sweeps a convex shape against the shape of this collidable.
    pub fn cast_shape(
        &self,
        cast_shape: &dyn SupportMap,
        start: &RigidTransform,
        sweep: &Vector,
        max_t: Real,
    ) -> Option<RayHit> {
        self.shape
            .cast_shape(&self.world_transform, cast_shape, start, sweep, max_t)
    }

    /// Enlarges the bounding box according to the motion of the entity during `dt`.
    fn expand_bounding_box(&mut self, dt: Real, entities: &EntitySet) {
        let Some(entity) = self.entity.and_then(|h| entities.get(h)) else {
            return;
        };

        self.bounding_box = self.bounding_box.swept(&(entity.linear_velocity() * dt));

        if self.expansion == BoundingBoxExpansion::OverlapSpeed {
            let max_speed = self
                .overlaps
                .iter()
                .filter_map(|h| entities.get(*h))
                .map(|e| e.linear_velocity().norm())
                .fold(0.0, Real::max);
            self.bounding_box.loosen(max_speed * dt);
        }
    }
}

/// A collidable following an entity.
pub trait Collidable {
    /// The state shared by all collidables.
    fn entity_collidable(&self) -> &EntityCollidable;

    /// The state shared by all collidables.
    fn entity_collidable_mut(&mut self) -> &mut EntityCollidable;

    /// Places this collidable at the given entity pose.
    fn update_world_transform(&mut self, position: &Vector, orientation: &Rotation);

    /// Recomputes the bounding box from the current world transform, without any expansion.
    fn update_bounding_box_internal(&mut self);

    /// Casts a ray on this collidable, skipping the collidables rejected by `filter`.
    fn ray_cast_filtered(
        &self,
        ray: &Ray,
        max_t: Real,
        filter: &CollidableFilter,
        resources: &Resources,
    ) -> Option<CollidableRayHit>;

    /// Sweeps a convex shape against this collidable, skipping the collidables rejected by
    /// `filter`.
    fn convex_cast_filtered(
        &self,
        cast_shape: &dyn SupportMap,
        start: &RigidTransform,
        sweep: &Vector,
        max_t: Real,
        filter: &CollidableFilter,
        resources: &Resources,
    ) -> Option<CollidableRayHit>;

    /// The world-space bounding box of this collidable.
    fn bounding_box(&self) -> &Aabb {
        self.entity_collidable().bounding_box()
    }

    /// Follows the entity pose and recomputes the bounding box, enlarged by the motion of the
    /// entity during `dt`.
    fn update_bounding_box(&mut self, dt: Real, entities: &EntitySet) {
        let pose = self
            .entity_collidable()
            .entity()
            .and_then(|h| entities.get(h))
            .map(|e| (e.position(), e.orientation()));

        if let Some((position, orientation)) = pose {
            self.update_world_transform(&position, &orientation);
        }

        self.update_bounding_box_internal();
        self.entity_collidable_mut()
            .expand_bounding_box(dt, entities);
    }

    /// Places this collidable at `transform` and recomputes its bounding box, without any
    /// expansion.
    fn update_bounding_box_for_transform(&mut self, transform: &RigidTransform) {
        self.update_world_transform(&transform.position, &transform.orientation);
        self.update_bounding_box_internal();
    }

    /// Casts a ray on this collidable.
    fn ray_cast(&self, ray: &Ray, max_t: Real, resources: &Resources) -> Option<CollidableRayHit> {
        self.ray_cast_filtered(ray, max_t, &|_| true, resources)
    }

    /// Sweeps a convex shape against this collidable.
    fn convex_cast(
        &self,
        cast_shape: &dyn SupportMap,
        start: &RigidTransform,
        sweep: &Vector,
        max_t: Real,
        resources: &Resources,
    ) -> Option<CollidableRayHit> {
        self.convex_cast_filtered(cast_shape, start, sweep, max_t, &|_| true, resources)
    }
}

#[cfg(test)]
mod test {
    use super::BoundingBoxExpansion;
    use crate::collision::{Collidable, CollisionRule, CollisionRules, ConvexCollidable};
    use crate::dynamics::{Entity, EntitySet};
    use crate::math::{Matrix, Point, Vector};
    use crate::shape::Ball;

    #[test]
    fn overlapping_speeds_loosen_the_swept_box() {
        let mut entities = EntitySet::new();
        let mut entity = Entity::new_dynamic(Vector::zeros(), 1.0, Matrix::identity());
        entity.set_linear_velocity(Vector::new(0.0, 0.0, -3.0));
        let handle = entities.insert(entity);
        let mut fast = Entity::new_kinematic(Vector::x() * 10.0);
        fast.set_linear_velocity(Vector::new(0.0, 4.0, 0.0));
        let fast = entities.insert(fast);

        let mut collidable = ConvexCollidable::new(Ball::new(1.0));
        let base = collidable.entity_collidable_mut();
        base.set_entity(Some(handle));
        base.add_overlap(fast);
        base.add_overlap(fast);
        assert_eq!(base.overlaps().len(), 1);

        collidable.update_bounding_box(0.5, &entities);
        approx::assert_relative_eq!(collidable.bounding_box().mins, Point::new(-1.0, -1.0, -2.5));
        approx::assert_relative_eq!(collidable.bounding_box().maxs, Point::new(1.0, 1.0, 1.0));

        collidable.entity_collidable_mut().expansion = BoundingBoxExpansion::OverlapSpeed;
        collidable.update_bounding_box(0.5, &entities);
        approx::assert_relative_eq!(collidable.bounding_box().mins, Point::new(-3.0, -3.0, -4.5));
        approx::assert_relative_eq!(collidable.bounding_box().maxs, Point::new(3.0, 3.0, 3.0));

        collidable.entity_collidable_mut().remove_overlap(fast);
        collidable.update_bounding_box(0.5, &entities);
        approx::assert_relative_eq!(collidable.bounding_box().maxs, Point::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn new_collision_rules_wake_the_entity_up() {
        let mut entities = EntitySet::new();
        let handle = entities.insert(Entity::new_dynamic(Vector::zeros(), 1.0, Matrix::identity()));
        entities[handle].deactivate();

        let mut collidable = ConvexCollidable::new(Ball::new(1.0));
        collidable.entity_collidable_mut().set_entity(Some(handle));
        collidable
            .entity_collidable_mut()
            .set_collision_rules(CollisionRules::with_personal(CollisionRule::NoSolver), &mut entities);

        assert!(entities[handle].is_active());
        assert_eq!(
            collidable.entity_collidable().collision_rules().personal,
            CollisionRule::NoSolver
        );
    }
}
