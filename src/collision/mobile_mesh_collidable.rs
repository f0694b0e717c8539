use crate::collision::{Collidable, CollidableFilter, CollidableRayHit, EntityCollidable};
use crate::math::{Point, Real, RigidTransform, Rotation, Vector};
use crate::query::Ray;
use crate::shape::{MobileMeshShape, Shape, SharedShape, SupportMap};
use crate::utils::Resources;
use std::sync::Arc;

/// A collidable made of a triangle mesh following an entity.
#[derive(Clone, Debug)]
pub struct MobileMeshCollidable {
    base: EntityCollidable,
    shape: Arc<MobileMeshShape>,
}

impl MobileMeshCollidable {
    /// Creates a collidable from a mobile mesh.
    pub fn new(shape: MobileMeshShape) -> Self {
        Self::from_arc(Arc::new(shape))
    }

    /// Creates a collidable from a mobile mesh shared with other collidables.
    pub fn from_arc(shape: Arc<MobileMeshShape>) -> Self {
        let base = EntityCollidable::new(SharedShape(shape.clone()));
        Self { base, shape }
    }

    /// The mesh of this collidable.
    pub fn shape(&self) -> &MobileMeshShape {
        &self.shape
    }

    /// Is the given world-space point inside of the mesh?
    ///
    /// Only meaningful for closed meshes.
    pub fn contains_point(&self, point: &Point) -> bool {
        let local = self.base.world_transform().inverse_transform_point(point);
        self.shape.is_local_point_inside(&local)
    }
}

impl Collidable for MobileMeshCollidable {
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

        self.base
            .cast_ray(ray, max_t)
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

        self.shape
            .cast_shape(self.base.world_transform(), cast_shape, start, sweep, max_t)
            .map(|hit| CollidableRayHit { hit, child: None })
    }
}

#[cfg(test)]
mod test {
    use super::MobileMeshCollidable;
    use crate::collision::Collidable;
    use crate::math::{Point, Real, RigidTransform, Rotation, Vector};
    use crate::query::Ray;
    use crate::shape::{cube_mesh, Ball, MobileMeshShape, MobileMeshSolidity};
    use crate::utils::Resources;

    #[test]
    fn moved_solid_mesh_queries() {
        let (vertices, indices) = cube_mesh();
        let shape = MobileMeshShape::new(vertices, indices, MobileMeshSolidity::Solid).unwrap();
        let mut collidable = MobileMeshCollidable::new(shape);
        collidable.update_bounding_box_for_transform(&RigidTransform::new(
            Vector::new(0.0, 10.0, 0.0),
            Rotation::from_scaled_axis(Vector::new(0.0, 0.3, 0.0)),
        ));

        assert!(collidable.contains_point(&Point::new(0.0, 10.5, 0.0)));
        assert!(!collidable.contains_point(&Point::new(0.0, 8.5, 0.0)));
        approx::assert_relative_eq!(collidable.bounding_box().mins.y, 9.0, epsilon = 1.0e-5);

        let resources = Resources::new();
        let ray = Ray::new(Point::new(0.0, 0.0, 0.0), Vector::y());
        let hit = collidable.ray_cast(&ray, Real::MAX, &resources).unwrap();
        approx::assert_relative_eq!(hit.hit.t, 9.0, epsilon = 1.0e-5);

        let start = RigidTransform::from_position(Vector::zeros());
        let hit = collidable
            .convex_cast(&Ball::new(0.5), &start, &Vector::y(), Real::MAX, &resources)
            .unwrap();
        approx::assert_relative_eq!(hit.hit.t, 8.5, epsilon = 1.0e-3);
    }
}
