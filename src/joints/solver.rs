use crate::dynamics::{EntityHandle, EntitySet};
use crate::joints::{Joint, JointError, JointKind};
use crate::math::Real;
use core::fmt::Debug;
use downcast_rs::{impl_downcast, DowncastSync};
use slab::Slab;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A constraint driven by the [`JointSolver`].
pub trait SolverUpdateable: DowncastSync + Debug {
    /// The two entities touched by this constraint.
    fn entities(&self) -> [EntityHandle; 2];
    /// Is this constraint enabled?
    fn is_active(&self) -> bool;
    /// Prepares this constraint for a step of duration `dt`. Only reads the entities.
    fn update(&mut self, dt: Real, entities: &EntitySet) -> Result<(), JointError>;
    /// Applies the impulse of the previous step.
    fn exclusive_update(&mut self, entities: &mut EntitySet);
    /// Performs one velocity iteration and returns the largest impulse it applied.
    fn solve_iteration(&mut self, entities: &mut EntitySet) -> Real;
}

impl_downcast!(sync SolverUpdateable);

impl<K: JointKind> SolverUpdateable for Joint<K> {
    fn entities(&self) -> [EntityHandle; 2] {
        [self.entity_a(), self.entity_b()]
    }

    fn is_active(&self) -> bool {
        Joint::is_active(self)
    }

    fn update(&mut self, dt: Real, entities: &EntitySet) -> Result<(), JointError> {
        Joint::update(self, dt, entities)
    }

    fn exclusive_update(&mut self, entities: &mut EntitySet) {
        Joint::exclusive_update(self, entities)
    }

    fn solve_iteration(&mut self, entities: &mut EntitySet) -> Real {
        Joint::solve_iteration(self, entities)
    }
}

/// Parameters of the [`JointSolver`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct SolverSettings {
    /// The maximum number of velocity iterations per step.
    pub iteration_count: usize,
    /// The iterations stop early once no joint applies an impulse larger than this.
    pub minimum_impulse: Real,
    /// Should the solver integrate the entities at the end of each step?
    pub integrate: bool,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            iteration_count: 10,
            minimum_impulse: 1.0e-6,
            integrate: true,
        }
    }
}

/// The handle of a joint stored in a [`JointSolver`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct JointHandle(pub usize);

/// Steps a set of joints.
#[derive(Debug, Default)]
pub struct JointSolver {
    joints: Slab<Box<dyn SolverUpdateable>>,
    /// The parameters of this solver.
    pub settings: SolverSettings,
}

impl JointSolver {
    /// An empty solver with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a joint to this solver.
    pub fn insert(&mut self, joint: impl SolverUpdateable) -> JointHandle {
        JointHandle(self.joints.insert(Box::new(joint)))
    }

    /// Removes a joint from this solver.
    pub fn remove(&mut self, handle: JointHandle) -> Option<Box<dyn SolverUpdateable>> {
        self.joints.try_remove(handle.0)
    }

    /// The joint with the given handle.
    pub fn get(&self, handle: JointHandle) -> Option<&dyn SolverUpdateable> {
        self.joints.get(handle.0).map(|j| &**j)
    }

    /// The joint with the given handle.
    pub fn get_mut(&mut self, handle: JointHandle) -> Option<&mut dyn SolverUpdateable> {
        match self.joints.get_mut(handle.0) {
            Some(joint) => Some(&mut **joint),
            None => None,
        }
    }

    /// The joint with the given handle, if it has the kind `K`.
    pub fn get_joint<K: JointKind>(&self, handle: JointHandle) -> Option<&Joint<K>> {
        self.joints.get(handle.0)?.downcast_ref()
    }

    /// The joint with the given handle, if it has the kind `K`.
    pub fn get_joint_mut<K: JointKind>(&mut self, handle: JointHandle) -> Option<&mut Joint<K>> {
        self.joints.get_mut(handle.0)?.downcast_mut()
    }

    /// The number of joints in this solver.
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    /// Is this solver empty?
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Iterates through the joints of this solver.
    pub fn iter(&self) -> impl Iterator<Item = (JointHandle, &dyn SolverUpdateable)> {
        self.joints.iter().map(|(i, j)| (JointHandle(i), &**j))
    }

    /// Updates every active joint for a step of duration `dt`.
    ///
    /// With the `parallel` feature, the joints are updated concurrently.
    pub fn update(&mut self, dt: Real, entities: &EntitySet) -> Result<(), JointError> {
        #[cfg(not(feature = "parallel"))]
        {
            self.joints
                .iter_mut()
                .filter(|(_, joint)| joint.is_active())
                .try_for_each(|(_, joint)| joint.update(dt, entities))
        }

        #[cfg(feature = "parallel")]
        {
            let mut joints: Vec<_> = self
                .joints
                .iter_mut()
                .map(|(_, joint)| joint)
                .filter(|joint| joint.is_active())
                .collect();
            joints
                .par_iter_mut()
                .try_for_each(|joint| joint.update(dt, entities))
        }
    }

    /// Runs a full step: update, warm start, velocity iterations, and optionally integration.
    ///
    /// Returns the number of velocity iterations performed.
    pub fn step(&mut self, dt: Real, entities: &mut EntitySet) -> Result<usize, JointError> {
        self.update(dt, entities)?;

        for (_, joint) in self.joints.iter_mut() {
            if joint.is_active() {
                joint.exclusive_update(entities);
            }
        }

        let mut iterations = 0;
        while iterations < self.settings.iteration_count {
            iterations += 1;
            let mut largest_impulse: Real = 0.0;
            for (_, joint) in self.joints.iter_mut() {
                if joint.is_active() {
                    largest_impulse = largest_impulse.max(joint.solve_iteration(entities));
                }
            }

            if largest_impulse < self.settings.minimum_impulse {
                break;
            }
        }

        if self.settings.integrate {
            entities.integrate(dt);
        }

        Ok(iterations)
    }
}
