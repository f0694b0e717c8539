use crate::collision::{Collidable, CollidableFilter, CollidableRayHit, EntityCollidable};
use crate::math::{Real, RigidTransform, Rotation, Vector};
use crate::query::{self, Ray};
use crate::shape::{Shape, SharedShape, SupportMap};
use crate::utils::Resources;
use std::sync::Arc;

/// A collidable made of a single convex shape.
#[derive(Clone, Debug)]
pub struct ConvexCollidable<S: Shape + SupportMap> {
    base: EntityCollidable,
    shape: Arc<S>,
}

impl<S: Shape + SupportMap> ConvexCollidable<S> {
    /// Creates a collidable from a convex shape.
    pub fn new(shape: S) -> Self {
        Self::from_arc(Arc::new(shape))
    }

    /// Creates a collidable from a convex shape shared with other collidables.
    pub fn from_arc(shape: Arc<S>) -> Self {
        let base = EntityCollidable::new(SharedShape(shape.clone()));
        Self { base, shape }
    }

    /// The convex shape of this collidable.
    pub fn shape(&self) -> &S {
        &self.shape
    }
}

impl<S: Shape + SupportMap> Collidable for ConvexCollidable<S> {
    fn entity_collidable(&self) -> &EntityCollidable {
        &self.base
    }

    fn entity_collidable_mut(&mut self) -> &mut EntityCollidable {
        &mut self.base
    }

    fn update_world_transform(&mut self, position: &Vector, orientation: &Rotation) {
        self.base.update_world_transform(position, orientation);
    }

    fn update_bounding_box_internal(&mut self) {
        self.base.update_bounding_box_internal();
    }

    fn ray_cast_filtered(
        &self,
        ray: &Ray,
        max_t: Real,
        filter: &CollidableFilter,
        _: &Resources,
    ) -> Option<CollidableRayHit> {
        if !filter(&self.base) {
            return None;
        }

        self.shape
            .cast_ray(self.base.world_transform(), ray, max_t)
            .map(|hit| CollidableRayHit { hit, child: None })
    }

    fn convex_cast_filtered(
        &self,
        cast_shape: &dyn SupportMap,
        start: &RigidTransform,
        sweep: &Vector,
        max_t: Real,
        filter: &CollidableFilter,
        _: &Resources,
    ) -> Option<CollidableRayHit> {
        if !filter(&self.base) {
            return None;
        }

        query::cast_support_maps(
            cast_shape,
            start,
            sweep,
            &*self.shape,
            self.base.world_transform(),
            max_t,
        )
        .map(|hit| CollidableRayHit { hit, child: None })
    }
}
