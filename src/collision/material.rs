use crate::math::Real;

/// The surface properties of a collidable.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Material {
    /// Friction coefficient applied while the surfaces in contact do not slide.
    pub static_friction: Real,
    /// Friction coefficient applied while the surfaces in contact slide.
    pub kinetic_friction: Real,
    /// Restitution coefficient of the surface.
    pub bounciness: Real,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            static_friction: 0.6,
            kinetic_friction: 0.3,
            bounciness: 0.0,
        }
    }
}

impl Material {
    /// Creates a new material.
    pub fn new(static_friction: Real, kinetic_friction: Real, bounciness: Real) -> Self {
        Self {
            static_friction,
            kinetic_friction,
            bounciness,
        }
    }
}
