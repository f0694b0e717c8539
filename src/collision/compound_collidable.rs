use crate::bounding_volume::details::support_map_aabb;
use crate::collision::{
    Collidable, CollidableFilter, CollidableRayHit, CompoundHierarchy, ContactEventManagers,
    EntityCollidable, EventManagerHandle, Material,
};
use crate::dynamics::EntityHandle;
use crate::math::{Point, Real, RigidTransform, Rotation, Vector};
use crate::query::{Ray, RayHit};
use crate::shape::{CompoundShape, Shape, SharedShape, SupportMap};
use crate::utils::Resources;
use std::sync::Arc;

/// A child of a [`CompoundCollidable`].
#[derive(Clone, Debug)]
pub struct CompoundChild {
    shape_index: usize,
    /// The collidable of this child, placed relative to the compound.
    pub collidable: EntityCollidable,
    /// The material of this child.
    pub material: Material,
}

impl CompoundChild {
    /// Creates the child standing for the `shape_index`-th entry of `shape`.
    ///
    /// Returns `None` if `shape_index` is out of bounds.
    pub fn new(shape: &CompoundShape, shape_index: usize) -> Option<Self> {
        let entry = shape.entries().get(shape_index)?;
        Some(Self {
            shape_index,
            collidable: EntityCollidable::new(entry.shape.clone()),
            material: Material::default(),
        })
    }

    /// The index of the entry of the compound shape this child stands for.
    pub fn shape_index(&self) -> usize {
        self.shape_index
    }

    /// The weight of this child, read from its compound shape entry.
    pub fn weight(&self, shape: &CompoundShape) -> Real {
        shape.entries()[self.shape_index].weight
    }
}

/// A collidable made of a subset of the children of a [`CompoundShape`].
///
/// Several compound collidables may share the same shape: each one owns the children whose
/// entries it uses. Splitting a compound moves children from one collidable to another without
/// touching the shape.
#[derive(Clone, Debug)]
pub struct CompoundCollidable {
    base: EntityCollidable,
    shape: Arc<CompoundShape>,
    children: Vec<CompoundChild>,
    hierarchy: CompoundHierarchy,
}

impl CompoundCollidable {
    /// Creates a collidable using every entry of `shape`.
    ///
    /// The collidable is offset so that the center of mass of the shape lies at the position of
    /// its entity.
    pub fn new(shape: Arc<CompoundShape>) -> Self {
        let center = shape.compute_distribution_information().center;
        let children = (0..shape.len())
            .filter_map(|i| CompoundChild::new(&shape, i))
            .collect();
        let mut result = Self::from_children(shape, children);
        result.base.local_position = -center.coords;
        result
    }

    /// Creates a collidable from already built children of `shape`.
    ///
    /// The shape index of every child must be valid for `shape`.
    pub(crate) fn from_children(shape: Arc<CompoundShape>, children: Vec<CompoundChild>) -> Self {
        let base = EntityCollidable::new(SharedShape(shape.clone()));
        let mut result = Self {
            base,
            shape,
            children,
            hierarchy: CompoundHierarchy::default(),
        };
        result.update_world_transform(&Vector::zeros(), &Rotation::identity());
        result.reconstruct_hierarchy();
        result
    }

    /// The shape shared by this collidable and the compounds split from it.
    pub fn shape(&self) -> &Arc<CompoundShape> {
        &self.shape
    }

    /// The children of this compound.
    pub fn children(&self) -> &[CompoundChild] {
        &self.children
    }

    /// The `i`-th child of this compound.
    pub fn child_mut(&mut self, i: usize) -> Option<&mut CompoundChild> {
        self.children.get_mut(i)
    }

    /// The number of children of this compound.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Does this compound have no children?
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// The bounding volume hierarchy of the children.
    pub fn hierarchy(&self) -> &CompoundHierarchy {
        &self.hierarchy
    }

    /// The shape indices of the children of this compound.
    pub fn shape_indices(&self) -> impl Iterator<Item = usize> + Clone + '_ {
        self.children.iter().map(|c| c.shape_index)
    }

    /// Attaches this compound and all its children to an entity.
    pub fn set_entity(&mut self, entity: Option<EntityHandle>) {
        self.base.set_entity(entity);
        for child in &mut self.children {
            child.collidable.set_entity(entity);
        }
    }

    /// Sets the contact event manager of this compound.
    ///
    /// Every child gets its own manager, created if needed, with `events` as parent.
    pub fn set_events(
        &mut self,
        events: Option<EventManagerHandle>,
        managers: &mut ContactEventManagers,
    ) {
        self.base.set_events_handle(events);
        self.hook_children_events(managers);
    }

    /// Points the event managers of every child to the manager of this compound.
    pub(crate) fn hook_children_events(&mut self, managers: &mut ContactEventManagers) {
        let Some(parent) = self.base.events() else {
            for child in &self.children {
                if let Some(handle) = child.collidable.events() {
                    managers.set_parent(handle, None);
                }
            }
            return;
        };

        for child in &mut self.children {
            let handle = match child.collidable.events() {
                Some(handle) if managers.get(handle).is_some() => handle,
                _ => {
                    let handle = managers.create();
                    child.collidable.set_events_handle(Some(handle));
                    handle
                }
            };
            managers.set_parent(handle, Some(parent));
        }
    }

    /// Removes the children matching `predicate`, keeping the order of the others.
    ///
    /// The hierarchy is not reconstructed.
    pub(crate) fn take_children_where(
        &mut self,
        mut predicate: impl FnMut(&CompoundChild) -> bool,
    ) -> Vec<CompoundChild> {
        let mut taken = Vec::new();
        let mut kept = Vec::with_capacity(self.children.len());

        for child in self.children.drain(..) {
            if predicate(&child) {
                taken.push(child);
            } else {
                kept.push(child);
            }
        }

        self.children = kept;
        taken
    }

    /// Appends children to this compound. The hierarchy is not reconstructed.
    pub(crate) fn append_children(&mut self, children: Vec<CompoundChild>) {
        let entity = self.base.entity();
        self.children.extend(children.into_iter().map(|mut child| {
            child.collidable.set_entity(entity);
            child
        }));
    }

    /// Moves the rotation pivot of this compound to `center`, expressed in the local-space of
    /// the compound shape.
    ///
    /// The offset is carried by each child: `local_position = conj(child orientation) * -center`,
    /// and the compound itself gets a zero local position.
    pub(crate) fn recenter(&mut self, center: &Point) {
        self.base.local_position = Vector::zeros();

        for child in &mut self.children {
            let entry = &self.shape.entries()[child.shape_index];
            child.collidable.local_position =
                entry.local_transform.orientation.inverse() * -center.coords;
        }
    }

    /// Rebuilds the hierarchy after children were added or removed.
    ///
    /// The children keep their current world transforms.
    pub fn reconstruct_hierarchy(&mut self) {
        for child in &mut self.children {
            child.collidable.update_bounding_box_internal();
        }
        self.hierarchy.reconstruct(&self.children);
        self.base.set_bounding_box(self.hierarchy.root_aabb());
    }

    /// Keeps the nearest of two hits, preferring the smallest child index on ties.
    fn nearest(best: Option<CollidableRayHit>, hit: RayHit, child: usize) -> Option<CollidableRayHit> {
        let candidate = CollidableRayHit {
            hit,
            child: Some(child),
        };

        match best {
            Some(best) if best.hit.t < hit.t => Some(best),
            Some(best) if best.hit.t == hit.t && best.child < candidate.child => Some(best),
            _ => Some(candidate),
        }
    }
}

impl Collidable for CompoundCollidable {
    fn entity_collidable(&self) -> &EntityCollidable {
        &self.base
    }

    fn entity_collidable_mut(&mut self) -> &mut EntityCollidable {
        &mut self.base
    }

    fn update_world_transform(&mut self, position: &Vector, orientation: &Rotation) {
        self.base.update_world_transform(position, orientation);
        let compound_transform = *self.base.world_transform();

        for child in &mut self.children {
            let entry = &self.shape.entries()[child.shape_index];
            let transform = RigidTransform::multiply(&entry.local_transform, &compound_transform);
            child
                .collidable
                .update_world_transform(&transform.position, &transform.orientation);
        }
    }

    fn update_bounding_box_internal(&mut self) {
        for child in &mut self.children {
            child.collidable.update_bounding_box_internal();
        }

        self.hierarchy.refit(&self.children);
        self.base.set_bounding_box(self.hierarchy.root_aabb());
    }

    fn ray_cast_filtered(
        &self,
        ray: &Ray,
        max_t: Real,
        filter: &CollidableFilter,
        resources: &Resources,
    ) -> Option<CollidableRayHit> {
        if !filter(&self.base) {
            return None;
        }

        let mut candidates = resources.candidate_list();
        self.hierarchy
            .collect_ray_candidates(ray, max_t, &mut candidates);

        let mut best: Option<CollidableRayHit> = None;
        for i in candidates.iter().map(|i| *i as usize) {
            let child = &self.children[i];
            if !filter(&child.collidable) {
                continue;
            }

            let max_t = best.map_or(max_t, |b| b.hit.t);
            if let Some(hit) = child.collidable.cast_ray(ray, max_t) {
                best = Self::nearest(best, hit, i);
            }
        }

        best
    }

    fn convex_cast_filtered(
        &self,
        cast_shape: &dyn SupportMap,
        start: &RigidTransform,
        sweep: &Vector,
        max_t: Real,
        filter: &CollidableFilter,
        resources: &Resources,
    ) -> Option<CollidableRayHit> {
        if !filter(&self.base) {
            return None;
        }

        let cast_aabb = support_map_aabb(start, cast_shape);
        let center_ray = Ray::new(cast_aabb.center(), *sweep);
        let mut candidates = resources.candidate_list();
        self.hierarchy.collect_sweep_candidates(
            &cast_aabb.half_extents(),
            &center_ray,
            max_t,
            &mut candidates,
        );

        let mut best: Option<CollidableRayHit> = None;
        for i in candidates.iter().map(|i| *i as usize) {
            let child = &self.children[i];
            if !filter(&child.collidable) {
                continue;
            }

            let max_t = best.map_or(max_t, |b| b.hit.t);
            if let Some(hit) = child.collidable.cast_shape(cast_shape, start, sweep, max_t) {
                best = Self::nearest(best, hit, i);
            }
        }

        best
    }
}
