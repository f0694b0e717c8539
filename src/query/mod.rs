//! Non-persistent geometric queries.
//!
//! Ray casts on individual shapes are exposed by the [`Shape`](crate::shape::Shape) trait.
//! This module holds the ray type, the hit record they produce, and the algorithms shared by
//! every shape:
//!
//! * [`details::local_ray_intersection_with_triangle`] for the ray/triangle test used by meshes,
//! * [`gjk::cast_local_ray_support_map`] for ray casts on arbitrary convex shapes,
//! * [`cast_support_maps`] for linear casts of a convex shape against another one.

pub use self::ray::{Ray, RayHit, TriangleSidedness};
pub use self::shape_cast::cast_support_maps;

pub mod gjk;
mod ray;
mod shape_cast;

/// Queries dedicated to specific shapes.
pub mod details {
    pub use super::ray::{cast_local_ray_on_ball, local_ray_intersection_with_triangle};
}
