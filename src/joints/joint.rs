use crate::dynamics::{Entity, EntityHandle, EntitySet};
use crate::joints::{ConstraintDofs, JointError, JointSettings};
use crate::math::{Matrix, Real};
use core::fmt::Debug;

/// The Jacobians and the error of a joint, for the current entity states.
///
/// `linear_a * v_a + angular_a * w_a + linear_b * v_b + angular_b * w_b` is the time derivative
/// of `error`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct JointJacobians<D: ConstraintDofs> {
    /// Jacobian block of the linear velocity of the entity A.
    pub linear_a: D::Jacobian,
    /// Jacobian block of the angular velocity of the entity A.
    pub angular_a: D::Jacobian,
    /// Jacobian block of the linear velocity of the entity B.
    pub linear_b: D::Jacobian,
    /// Jacobian block of the angular velocity of the entity B.
    pub angular_b: D::Jacobian,
    /// The position or orientation error of the joint.
    pub error: D::Vector,
}

impl<D: ConstraintDofs> Default for JointJacobians<D> {
    fn default() -> Self {
        Self {
            linear_a: D::zero_jacobian(),
            angular_a: D::zero_jacobian(),
            linear_b: D::zero_jacobian(),
            angular_b: D::zero_jacobian(),
            error: D::zero_vector(),
        }
    }
}

/// The geometric part of a joint: which degrees of freedom it removes and how.
pub trait JointKind: Debug + Send + Sync + 'static {
    /// The degrees of freedom removed by this joint.
    type Dofs: ConstraintDofs;

    /// Computes the Jacobians and error of this joint for the given entity states.
    fn compute_jacobians(&self, a: &Entity, b: &Entity) -> JointJacobians<Self::Dofs>;
}

/// A velocity constraint between two entities.
///
/// Each step, the solver calls [`Joint::update`], then [`Joint::exclusive_update`] which
/// re-applies the impulse of the previous step, then [`Joint::solve_iteration`] several times.
#[derive(Clone, Debug)]
pub struct Joint<K: JointKind> {
    kind: K,
    entity_a: EntityHandle,
    entity_b: EntityHandle,
    /// The stiffness and corrective velocity limit of this joint.
    pub settings: JointSettings,
    is_active: bool,
    is_solving: bool,
    jacobians: JointJacobians<K::Dofs>,
    effective_mass: <K::Dofs as ConstraintDofs>::Mass,
    bias_velocity: <K::Dofs as ConstraintDofs>::Vector,
    softness: Real,
    error_reduction: Real,
    accumulated_impulse: <K::Dofs as ConstraintDofs>::Vector,
}

impl<K: JointKind> Joint<K> {
    /// Creates a joint between the entities `a` and `b`.
    ///
    /// Fails if an entity does not exist, if `a == b`, or if the joint removes several degrees
    /// of freedom and neither entity is dynamic.
    pub fn new(
        kind: K,
        a: EntityHandle,
        b: EntityHandle,
        entities: &EntitySet,
    ) -> Result<Self, JointError> {
        Self::with_entities(entities, a, b, |_, _| Ok(kind))
    }

    /// Creates a joint between the entities `a` and `b`, building its kind from their states.
    pub fn with_entities(
        entities: &EntitySet,
        a: EntityHandle,
        b: EntityHandle,
        build: impl FnOnce(&Entity, &Entity) -> Result<K, JointError>,
    ) -> Result<Self, JointError> {
        if a == b {
            return Err(JointError::SameEntity);
        }

        let ea = entities.get(a).ok_or(JointError::MissingEntity(a))?;
        let eb = entities.get(b).ok_or(JointError::MissingEntity(b))?;
        if K::Dofs::DIM > 1 && !ea.is_dynamic() && !eb.is_dynamic() {
            return Err(JointError::NonDynamicPair);
        }

        Ok(Self {
            kind: build(ea, eb)?,
            entity_a: a,
            entity_b: b,
            settings: JointSettings::default(),
            is_active: true,
            is_solving: false,
            jacobians: JointJacobians::default(),
            effective_mass: K::Dofs::zero_mass(),
            bias_velocity: K::Dofs::zero_vector(),
            softness: 0.0,
            error_reduction: 0.0,
            accumulated_impulse: K::Dofs::zero_vector(),
        })
    }

    /// The geometric part of this joint.
    pub fn kind(&self) -> &K {
        &self.kind
    }

    /// The geometric part of this joint.
    ///
    /// Changes are taken into account at the next [`Self::update`].
    pub fn kind_mut(&mut self) -> &mut K {
        &mut self.kind
    }

    /// The first entity of this joint.
    pub fn entity_a(&self) -> EntityHandle {
        self.entity_a
    }

    /// The second entity of this joint.
    pub fn entity_b(&self) -> EntityHandle {
        self.entity_b
    }

    /// Is this joint enabled by the user?
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Enables or disables this joint.
    pub fn set_active(&mut self, active: bool) {
        self.is_active = active;
        if !active {
            self.is_solving = false;
            self.accumulated_impulse = K::Dofs::zero_vector();
        }
    }

    /// Did the last update decide this joint must be solved?
    ///
    /// This is `false` for disabled joints and for single degree of freedom joints between two
    /// non-dynamic entities.
    pub fn is_solving(&self) -> bool {
        self.is_solving
    }

    /// The Jacobians computed by the last update.
    pub fn jacobians(&self) -> &JointJacobians<K::Dofs> {
        &self.jacobians
    }

    /// The error computed by the last update.
    pub fn error(&self) -> <K::Dofs as ConstraintDofs>::Vector {
        self.jacobians.error
    }

    /// The effective mass computed by the last update.
    pub fn effective_mass(&self) -> <K::Dofs as ConstraintDofs>::Mass {
        self.effective_mass
    }

    /// The clamped velocity correcting the error, computed by the last update.
    pub fn bias_velocity(&self) -> <K::Dofs as ConstraintDofs>::Vector {
        self.bias_velocity
    }

    /// The error reduction and softness computed by the last update.
    pub fn error_reduction_and_softness(&self) -> (Real, Real) {
        (self.error_reduction, self.softness)
    }

    /// The total impulse applied by this joint during the current step.
    pub fn total_impulse(&self) -> <K::Dofs as ConstraintDofs>::Vector {
        self.accumulated_impulse
    }

    /// The velocity of the entity B relative to the entity A, in constraint-space.
    pub fn relative_velocity(&self, entities: &EntitySet) -> <K::Dofs as ConstraintDofs>::Vector {
        match (entities.get(self.entity_a), entities.get(self.entity_b)) {
            (Some(a), Some(b)) => self.relative_velocity_of(a, b),
            _ => K::Dofs::zero_vector(),
        }
    }

    fn relative_velocity_of(&self, a: &Entity, b: &Entity) -> <K::Dofs as ConstraintDofs>::Vector {
        let j = &self.jacobians;
        K::Dofs::jacobian_mul(&j.linear_a, &a.linear_velocity())
            + K::Dofs::jacobian_mul(&j.angular_a, &a.angular_velocity())
            + K::Dofs::jacobian_mul(&j.linear_b, &b.linear_velocity())
            + K::Dofs::jacobian_mul(&j.angular_b, &b.angular_velocity())
    }

    /// Computes the Jacobians, the bias velocity, and the effective mass for a step of
    /// duration `dt`.
    ///
    /// Only reads the entities. A single degree of freedom joint between two non-dynamic
    /// entities is skipped until one of them becomes dynamic; other joints fail with
    /// [`JointError::NonDynamicPair`].
    pub fn update(&mut self, dt: Real, entities: &EntitySet) -> Result<(), JointError> {
        if !self.is_active {
            return Ok(());
        }

        let a = entities
            .get(self.entity_a)
            .ok_or(JointError::MissingEntity(self.entity_a))?;
        let b = entities
            .get(self.entity_b)
            .ok_or(JointError::MissingEntity(self.entity_b))?;

        if !a.is_dynamic() && !b.is_dynamic() {
            if K::Dofs::DIM > 1 {
                return Err(JointError::NonDynamicPair);
            }

            if self.is_solving {
                log::debug!(
                    "Deactivating a joint between the non-dynamic entities {:?} and {:?}.",
                    self.entity_a,
                    self.entity_b
                );
            }
            self.is_solving = false;
            self.accumulated_impulse = K::Dofs::zero_vector();
            return Ok(());
        }

        self.is_solving = true;
        let (error_reduction, softness) = self.settings.spring.error_reduction_and_softness(dt);
        self.error_reduction = error_reduction;
        self.softness = softness;

        self.jacobians = self.kind.compute_jacobians(a, b);
        self.bias_velocity = K::Dofs::clamp_bias(
            &(self.jacobians.error * -error_reduction),
            self.settings.max_corrective_velocity(),
        );

        let j = &self.jacobians;
        let linear_a = Matrix::identity() * a.inverse_mass();
        let linear_b = Matrix::identity() * b.inverse_mass();
        let inverse_mass = [
            (&j.linear_a, &linear_a),
            (&j.angular_a, a.world_inverse_inertia()),
            (&j.linear_b, &linear_b),
            (&j.angular_b, b.world_inverse_inertia()),
        ]
        .into_iter()
        .fold(K::Dofs::zero_mass(), |acc, (jacobian, inertia)| {
            acc + K::Dofs::project_inverse_inertia(jacobian, inertia)
        });
        self.effective_mass = K::Dofs::soft_inverse(&inverse_mass, softness);

        Ok(())
    }

    /// Applies the impulse accumulated during the previous step.
    ///
    /// Mutates the velocities of the entities: must not run concurrently with any other joint
    /// touching the same entities.
    pub fn exclusive_update(&mut self, entities: &mut EntitySet) {
        if self.is_solving {
            let impulse = self.accumulated_impulse;
            self.apply_impulse(&impulse, entities);
        }
    }

    /// Performs one velocity iteration.
    ///
    /// Returns the largest absolute component of the impulse applied by this iteration.
    pub fn solve_iteration(&mut self, entities: &mut EntitySet) -> Real {
        if !self.is_solving {
            return 0.0;
        }

        let Some((a, b)) = entities.get2_mut(self.entity_a, self.entity_b) else {
            return 0.0;
        };

        let velocity = self.relative_velocity_of(a, b);
        let rhs = self.bias_velocity - velocity - self.accumulated_impulse * self.softness;
        let lambda = K::Dofs::mass_mul(&self.effective_mass, &rhs);
        self.accumulated_impulse += lambda;
        apply_impulse_to::<K::Dofs>(&self.jacobians, &lambda, a, b);

        K::Dofs::amax(&lambda)
    }

    fn apply_impulse(&self, impulse: &<K::Dofs as ConstraintDofs>::Vector, entities: &mut EntitySet) {
        if let Some((a, b)) = entities.get2_mut(self.entity_a, self.entity_b) {
            apply_impulse_to::<K::Dofs>(&self.jacobians, impulse, a, b);
        }
    }
}

fn apply_impulse_to<D: ConstraintDofs>(
    jacobians: &JointJacobians<D>,
    impulse: &D::Vector,
    a: &mut Entity,
    b: &mut Entity,
) {
    a.apply_linear_impulse(&D::jacobian_tr_mul(&jacobians.linear_a, impulse));
    a.apply_angular_impulse(&D::jacobian_tr_mul(&jacobians.angular_a, impulse));
    b.apply_linear_impulse(&D::jacobian_tr_mul(&jacobians.linear_b, impulse));
    b.apply_angular_impulse(&D::jacobian_tr_mul(&jacobians.angular_b, impulse));
}
