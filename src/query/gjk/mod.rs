//! The Gilbert-Johnson-Keerthi distance algorithm, specialized for ray casts.

pub use self::cso_point::CsoPoint;
pub use self::gjk::{cast_local_ray_support_fn, cast_local_ray_support_map, GjkRayHit};
pub use self::simplex::Simplex;

mod cso_point;
mod gjk;
mod simplex;
