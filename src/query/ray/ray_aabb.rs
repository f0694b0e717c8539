use crate::bounding_volume::Aabb;
use crate::math::{Real, Vector, DIM};
use crate::query::Ray;

impl Aabb {
    /// Computes the time of impact of a ray on this AABB, both expressed in the same frame.
    ///
    /// If `solid` is `true`, a ray starting inside of the box hits it at `t = 0`. Otherwise it
    /// hits the face it exits through.
    #[inline]
    pub fn cast_local_ray(&self, ray: &Ray, max_t: Real, solid: bool) -> Option<Real> {
        self.cast_local_ray_and_get_normal(ray, max_t, solid)
            .map(|(t, _)| t)
    }

    /// Computes the time of impact and the outward normal of the face hit by a ray.
    ///
    /// The normal is zero for solid hits at `t = 0`.
    pub fn cast_local_ray_and_get_normal(
        &self,
        ray: &Ray,
        max_t: Real,
        solid: bool,
    ) -> Option<(Real, Vector)> {
        let mut near = (-Real::MAX, Vector::zeros());
        let mut far = (Real::MAX, Vector::zeros());

        for i in 0..DIM {
            if ray.dir[i] == 0.0 {
                if ray.origin[i] < self.mins[i] || ray.origin[i] > self.maxs[i] {
                    return None;
                }
                continue;
            }

            let inv_dir = 1.0 / ray.dir[i];
            let t_mins = (self.mins[i] - ray.origin[i]) * inv_dir;
            let t_maxs = (self.maxs[i] - ray.origin[i]) * inv_dir;
            // The ray enters the slab through its `mins` face iff it travels toward +i.
            let (t_enter, t_exit, sign) = if t_mins < t_maxs {
                (t_mins, t_maxs, -1.0)
            } else {
                (t_maxs, t_mins, 1.0)
            };

            if t_enter > near.0 {
                near = (t_enter, Vector::ith(i, sign));
            }
            if t_exit < far.0 {
                far = (t_exit, Vector::ith(i, -sign));
            }

            if near.0 > far.0 || far.0 < 0.0 {
                return None;
            }
        }

        if near.0 < 0.0 {
            if solid {
                Some((0.0, Vector::zeros()))
            } else if far.0 <= max_t {
                Some(far)
            } else {
                None
            }
        } else if near.0 <= max_t {
            Some(near)
        } else {
            None
        }
    }
}
