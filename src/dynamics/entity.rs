use crate::math::{Matrix, Point, Real, RigidTransform, Rotation, Vector};
use crate::utils::inv;

/// A rigid body.
///
/// Dynamic entities react to impulses. Kinematic entities have an infinite mass: they keep their
/// velocities and only move by integration.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Entity {
    position: Vector,
    orientation: Rotation,
    orientation_matrix: Matrix,
    linear_velocity: Vector,
    angular_velocity: Vector,
    mass: Real,
    inverse_mass: Real,
    local_inertia: Matrix,
    local_inverse_inertia: Matrix,
    world_inverse_inertia: Matrix,
    is_dynamic: bool,
    is_active: bool,
}

impl Entity {
    /// Creates a dynamic entity.
    ///
    /// `local_inertia` is the inertia tensor of the entity expressed in its local-space.
    pub fn new_dynamic(position: Vector, mass: Real, local_inertia: Matrix) -> Self {
        let mut result = Self::new_kinematic(position);
        result.initialize(mass, local_inertia);
        result
    }

    /// Creates a kinematic entity.
    pub fn new_kinematic(position: Vector) -> Self {
        Self {
            position,
            orientation: Rotation::identity(),
            orientation_matrix: Matrix::identity(),
            linear_velocity: Vector::zeros(),
            angular_velocity: Vector::zeros(),
            mass: Real::MAX,
            inverse_mass: 0.0,
            local_inertia: Matrix::zeros(),
            local_inverse_inertia: Matrix::zeros(),
            world_inverse_inertia: Matrix::zeros(),
            is_dynamic: false,
            is_active: true,
        }
    }

    /// Makes this entity dynamic with the given mass properties.
    ///
    /// A non-positive mass makes the entity kinematic instead.
    pub fn initialize(&mut self, mass: Real, local_inertia: Matrix) {
        if mass <= 0.0 {
            self.become_kinematic();
            return;
        }

        self.mass = mass;
        self.inverse_mass = inv(mass);
        self.local_inertia = local_inertia;
        self.local_inverse_inertia = local_inertia.try_inverse().unwrap_or_else(Matrix::zeros);
        self.is_dynamic = true;
        self.update_inertia_tensor();
        self.activate();
    }

    /// Makes this entity kinematic: it keeps its velocities and is no longer affected by impulses.
    pub fn become_kinematic(&mut self) {
        self.mass = Real::MAX;
        self.inverse_mass = 0.0;
        self.local_inverse_inertia = Matrix::zeros();
        self.world_inverse_inertia = Matrix::zeros();
        self.is_dynamic = false;
    }

    /// Wakes this entity up.
    pub fn activate(&mut self) {
        self.is_active = true;
    }

    /// Puts this entity to sleep.
    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    /// Is this entity awake?
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Is this entity affected by impulses?
    pub fn is_dynamic(&self) -> bool {
        self.is_dynamic
    }

    /// The position of the center of mass of this entity.
    pub fn position(&self) -> Vector {
        self.position
    }

    /// Sets the position of the center of mass of this entity.
    pub fn set_position(&mut self, position: Vector) {
        self.position = position;
    }

    /// The orientation of this entity.
    pub fn orientation(&self) -> Rotation {
        self.orientation
    }

    /// The rotation matrix of this entity.
    pub fn orientation_matrix(&self) -> &Matrix {
        &self.orientation_matrix
    }

    /// Sets the orientation of this entity and updates its world-space inertia.
    pub fn set_orientation(&mut self, orientation: Rotation) {
        self.orientation = orientation;
        self.update_inertia_tensor();
    }

    /// The pose of this entity.
    pub fn world_transform(&self) -> RigidTransform {
        RigidTransform::new(self.position, self.orientation)
    }

    /// The linear velocity of the center of mass of this entity.
    pub fn linear_velocity(&self) -> Vector {
        self.linear_velocity
    }

    /// Sets the linear velocity of this entity.
    pub fn set_linear_velocity(&mut self, velocity: Vector) {
        self.linear_velocity = velocity;
    }

    /// The angular velocity of this entity.
    pub fn angular_velocity(&self) -> Vector {
        self.angular_velocity
    }

    /// Sets the angular velocity of this entity.
    pub fn set_angular_velocity(&mut self, velocity: Vector) {
        self.angular_velocity = velocity;
    }

    /// The velocity of a world-space point rigidly attached to this entity.
    pub fn velocity_at_point(&self, point: &Point) -> Vector {
        self.linear_velocity + self.angular_velocity.cross(&(point.coords - self.position))
    }

    /// The mass of this entity. `Real::MAX` for kinematic entities.
    pub fn mass(&self) -> Real {
        self.mass
    }

    /// The inverse mass of this entity. Zero for kinematic entities.
    pub fn inverse_mass(&self) -> Real {
        self.inverse_mass
    }

    /// The inertia tensor of this entity, in its local-space.
    pub fn local_inertia(&self) -> &Matrix {
        &self.local_inertia
    }

    /// The inverse inertia tensor of this entity, in its local-space.
    pub fn local_inverse_inertia(&self) -> &Matrix {
        &self.local_inverse_inertia
    }

    /// The inverse inertia tensor of this entity, in world-space.
    pub fn world_inverse_inertia(&self) -> &Matrix {
        &self.world_inverse_inertia
    }

    /// The inertia tensor of this entity, in world-space.
    pub fn world_inertia(&self) -> Matrix {
        self.orientation_matrix * self.local_inertia * self.orientation_matrix.transpose()
    }

    /// The linear momentum of this entity.
    pub fn linear_momentum(&self) -> Vector {
        self.linear_velocity * self.mass
    }

    /// The angular momentum of this entity, relative to its center of mass.
    pub fn angular_momentum(&self) -> Vector {
        self.world_inertia() * self.angular_velocity
    }

    /// Recomputes the orientation matrix and world-space inverse inertia from the orientation.
    pub fn update_inertia_tensor(&mut self) {
        self.orientation_matrix = self.orientation.to_rotation_matrix().into_inner();
        self.world_inverse_inertia = self.orientation_matrix
            * self.local_inverse_inertia
            * self.orientation_matrix.transpose();
    }

    /// Applies a linear impulse at the center of mass. Does nothing on kinematic entities.
    pub fn apply_linear_impulse(&mut self, impulse: &Vector) {
        if self.is_dynamic {
            self.linear_velocity += impulse * self.inverse_mass;
        }
    }

    /// Applies an angular impulse. Does nothing on kinematic entities.
    pub fn apply_angular_impulse(&mut self, impulse: &Vector) {
        if self.is_dynamic {
            self.angular_velocity += self.world_inverse_inertia * impulse;
        }
    }

    /// Applies an impulse at a world-space point.
    pub fn apply_impulse_at_point(&mut self, impulse: &Vector, point: &Point) {
        self.apply_linear_impulse(impulse);
        let torque = (point.coords - self.position).cross(impulse);
        self.apply_angular_impulse(&torque);
    }

    /// Moves this entity according to its velocities during `dt`.
    pub fn integrate(&mut self, dt: Real) {
        if !self.is_active {
            return;
        }

        self.position += self.linear_velocity * dt;
        let mut orientation = Rotation::from_scaled_axis(self.angular_velocity * dt) * self.orientation;
        orientation.renormalize_fast();
        self.orientation = orientation;
        self.update_inertia_tensor();
    }
}
