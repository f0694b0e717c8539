use crate::math::{Real, Vector};
use crate::query::{Ray, RayHit};

/// Casts a ray on a ball of radius `radius` centered at the origin.
///
/// A ray starting inside of the ball hits it at `t = 0` if `solid` is `true`, and on its
/// exit point otherwise.
pub fn cast_local_ray_on_ball(radius: Real, ray: &Ray, max_t: Real, solid: bool) -> Option<RayHit> {
    let a = ray.dir.norm_squared();
    let b = ray.origin.coords.dot(&ray.dir);
    let c = ray.origin.coords.norm_squared() - radius * radius;
    let starts_inside = c <= 0.0;

    if a == 0.0 {
        return (starts_inside && solid).then(|| RayHit::inside(ray));
    }

    if !starts_inside && b > 0.0 {
        // Outside and going away.
        return None;
    }

    let delta = b * b - a * c;
    if delta < 0.0 {
        return None;
    }

    let t = if starts_inside {
        if solid {
            return Some(RayHit::inside(ray));
        }
        (-b + delta.sqrt()) / a
    } else {
        (-b - delta.sqrt()) / a
    };

    if t > max_t {
        return None;
    }

    let location = ray.point_at(t);
    let mut normal = location.coords.try_normalize(0.0).unwrap_or_else(Vector::zeros);
    if starts_inside {
        normal = -normal;
    }

    Some(RayHit {
        t,
        location,
        normal,
    })
}

#[cfg(test)]
mod test {
    use super::cast_local_ray_on_ball;
    use crate::math::{Point, Real, Vector};
    use crate::query::Ray;

    #[test]
    fn ray_ball_hits() {
        let ray = Ray::new(Point::new(0.0, -10.0, 0.0), Vector::new(0.0, 2.0, 0.0));
        let hit = cast_local_ray_on_ball(2.0, &ray, Real::MAX, true).unwrap();
        approx::assert_relative_eq!(hit.t, 4.0);
        approx::assert_relative_eq!(hit.normal, -Vector::y());

        let inside = Ray::new(Point::origin(), Vector::x());
        assert_eq!(cast_local_ray_on_ball(2.0, &inside, Real::MAX, true).unwrap().t, 0.0);
        let exit = cast_local_ray_on_ball(2.0, &inside, Real::MAX, false).unwrap();
        approx::assert_relative_eq!(exit.t, 2.0);
        approx::assert_relative_eq!(exit.normal, -Vector::x());

        let miss = Ray::new(Point::new(3.0, -10.0, 0.0), Vector::y());
        assert!(cast_local_ray_on_ball(2.0, &miss, Real::MAX, true).is_none());
    }
}
