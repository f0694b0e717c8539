pub use self::ray::{Ray, RayHit};
pub use self::ray_ball::cast_local_ray_on_ball;
pub use self::ray_triangle::{local_ray_intersection_with_triangle, TriangleSidedness};

mod ray;
mod ray_aabb;
mod ray_ball;
mod ray_triangle;
