use core::ops::{Deref, DerefMut};
use std::sync::Mutex;

/// A pool of reusable scratch values.
///
/// Values are handed out through a [`Pooled`] guard and go back to the pool when the guard
/// is dropped, whichever way the borrowing scope is exited.
pub struct ResourcePool<T> {
    free: Mutex<Vec<T>>,
    reset: fn(&mut T),
    create: fn() -> T,
}

impl<T> ResourcePool<T> {
    /// Creates an empty pool.
    ///
    /// `create` builds a new value when the pool is empty, and `reset` clears a value before it
    /// is given back to the pool.
    pub fn new(create: fn() -> T, reset: fn(&mut T)) -> Self {
        Self {
            free: Mutex::new(Vec::new()),
            reset,
            create,
        }
    }

    /// Takes a value out of the pool, creating a new one if the pool is empty.
    pub fn take(&self) -> Pooled<'_, T> {
        let value = self
            .free
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop()
            .unwrap_or_else(self.create);
        Pooled { pool: self, value }
    }

    /// The number of values currently waiting in the pool.
    pub fn available(&self) -> usize {
        self.free.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn give_back(&self, mut value: T) {
        (self.reset)(&mut value);
        self.free
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(value);
    }
}

impl<T> core::fmt::Debug for ResourcePool<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ResourcePool")
            .field("available", &self.available())
            .finish()
    }
}

/// A value borrowed from a [`ResourcePool`].
///
/// The value is returned to its pool on drop.
pub struct Pooled<'a, T> {
    pool: &'a ResourcePool<T>,
    value: T,
}

impl<T> Deref for Pooled<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T> DerefMut for Pooled<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

impl<T> Drop for Pooled<'_, T> {
    fn drop(&mut self) {
        let value = core::mem::replace(&mut self.value, (self.pool.create)());
        self.pool.give_back(value);
    }
}

/// Scratch buffers shared by the spatial queries of this crate.
///
/// A single `Resources` value is typically owned by the simulation and lent to every query.
#[derive(Debug)]
pub struct Resources {
    candidates: ResourcePool<Vec<u32>>,
}

impl Default for Resources {
    fn default() -> Self {
        Self::new()
    }
}

impl Resources {
    /// Creates a set of empty pools.
    pub fn new() -> Self {
        Self {
            candidates: ResourcePool::new(Vec::new, Vec::clear),
        }
    }

    /// A cleared list of leaf indices, used to collect BVH query candidates.
    pub fn candidate_list(&self) -> Pooled<'_, Vec<u32>> {
        self.candidates.take()
    }

    /// The number of candidate lists currently waiting in the pool.
    pub fn available_candidate_lists(&self) -> usize {
        self.candidates.available()
    }
}

#[cfg(test)]
mod test {
    use super::Resources;

    #[test]
    fn pooled_lists_are_returned_cleared() {
        let resources = Resources::new();
        assert_eq!(resources.available_candidate_lists(), 0);

        {
            let mut list = resources.candidate_list();
            list.extend_from_slice(&[1, 2, 3]);
            let _other = resources.candidate_list();
        }

        assert_eq!(resources.available_candidate_lists(), 2);
        let list = resources.candidate_list();
        assert!(list.is_empty());
        assert_eq!(resources.available_candidate_lists(), 1);
    }

    #[test]
    fn early_return_gives_the_list_back() {
        fn search(resources: &Resources, target: u32) -> Option<u32> {
            let mut list = resources.candidate_list();
            list.extend(0..10);
            let found = list.iter().copied().find(|i| *i == target)?;
            Some(found * 2)
        }

        let resources = Resources::new();
        assert_eq!(search(&resources, 42), None);
        assert_eq!(search(&resources, 4), Some(8));
        assert_eq!(resources.available_candidate_lists(), 1);
    }
}
