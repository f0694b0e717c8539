use crate::math::Real;

/// Multiplier applied to normalized volume distributions when they are turned into inertia tensors.
pub const INERTIA_TENSOR_SCALE: Real = 2.5;

/// Below this squared length, a cross product with a seed axis is considered degenerate.
pub const BASIS_EPSILON_SQUARED: Real = 1.0e-7;

/// Below this length, the separation between two distance-joint anchors has no usable direction.
pub const DISTANCE_EPSILON: Real = 1.0e-7;

/// Relative tolerance of the GJK-based ray and shape casts.
pub const GJK_EPSILON: Real = 1.0e-4;

/// Maximum number of iterations of the GJK-based ray and shape casts.
pub const GJK_MAX_ITERATIONS: usize = 64;

/// Primary seed axis used to derive a vector perpendicular to another one.
pub(crate) const PRIMARY_SEED_AXIS: [Real; 3] = [0.0, 1.0, 0.0];

/// Fallback seed axis, used when the primary seed axis is almost parallel to the input.
pub(crate) const SECONDARY_SEED_AXIS: [Real; 3] = [1.0, 0.0, 0.0];
