use crate::dynamics::Entity;
use crate::math::Real;
use core::ops::{Index, IndexMut};
use slab::Slab;

/// The handle of an [`Entity`] stored in an [`EntitySet`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct EntityHandle(pub usize);

/// The set of entities of a simulation.
#[derive(Clone, Debug, Default)]
pub struct EntitySet {
    entities: Slab<Entity>,
}

impl EntitySet {
    /// An empty set of entities.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entity to this set.
    pub fn insert(&mut self, entity: Entity) -> EntityHandle {
        EntityHandle(self.entities.insert(entity))
    }

    /// Removes an entity from this set.
    pub fn remove(&mut self, handle: EntityHandle) -> Option<Entity> {
        self.entities.try_remove(handle.0)
    }

    /// Does this set contain the given entity?
    pub fn contains(&self, handle: EntityHandle) -> bool {
        self.entities.contains(handle.0)
    }

    /// The entity with the given handle.
    pub fn get(&self, handle: EntityHandle) -> Option<&Entity> {
        self.entities.get(handle.0)
    }

    /// The entity with the given handle.
    pub fn get_mut(&mut self, handle: EntityHandle) -> Option<&mut Entity> {
        self.entities.get_mut(handle.0)
    }

    /// Two distinct entities, mutably.
    ///
    /// Returns `None` if `a == b` or if one of them does not exist.
    pub fn get2_mut(
        &mut self,
        a: EntityHandle,
        b: EntityHandle,
    ) -> Option<(&mut Entity, &mut Entity)> {
        if a == b {
            return None;
        }

        self.entities.get2_mut(a.0, b.0)
    }

    /// The number of entities in this set.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Is this set empty?
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterates through all the entities of this set.
    pub fn iter(&self) -> impl Iterator<Item = (EntityHandle, &Entity)> {
        self.entities.iter().map(|(i, e)| (EntityHandle(i), e))
    }

    /// Integrates the pose of every entity during `dt`.
    pub fn integrate(&mut self, dt: Real) {
        for (_, entity) in self.entities.iter_mut() {
            entity.integrate(dt);
        }
    }
}

impl Index<EntityHandle> for EntitySet {
    type Output = Entity;

    #[inline]
    fn index(&self, handle: EntityHandle) -> &Entity {
        &self.entities[handle.0]
    }
}

impl IndexMut<EntityHandle> for EntitySet {
    #[inline]
    fn index_mut(&mut self, handle: EntityHandle) -> &mut Entity {
        &mut self.entities[handle.0]
    }
}
