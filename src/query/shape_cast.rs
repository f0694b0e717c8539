use crate::math::{Point, Real, RigidTransform, Vector};
use crate::query::gjk::{self, CsoPoint};
use crate::query::{Ray, RayHit};
use crate::shape::SupportMap;

/// Computes the first time of impact between a moving convex shape and a static one.
///
/// `cast_shape` starts at `start` and moves linearly by `sweep` per unit of time. The target
/// shape stays at `target_transform`. The cast is performed as a ray cast from the origin
/// along `sweep` on the Minkowski difference `target - cast_shape`.
///
/// The returned hit is expressed in world-space: `t` is the time of impact, `location` the
/// first point of the target touched by the moving shape, and `normal` the outward normal of
/// the target at that point. Shapes overlapping at `start` produce a hit at `t = 0` with a
/// normal opposite to the sweep.
pub fn cast_support_maps<G1, G2>(
    cast_shape: &G1,
    start: &RigidTransform,
    sweep: &Vector,
    target: &G2,
    target_transform: &RigidTransform,
    max_t: Real,
) -> Option<RayHit>
where
    G1: ?Sized + SupportMap,
    G2: ?Sized + SupportMap,
{
    let start_in_target = RigidTransform::multiply(start, &target_transform.inverse());
    let local_sweep = target_transform.inverse_transform_vector(sweep);
    let ray = Ray::new(Point::origin(), local_sweep);

    let hit = gjk::cast_local_ray_support_fn(
        |dir| {
            CsoPoint::new(
                target.local_support_point(dir),
                cast_shape.support_point(&start_in_target, &-dir),
            )
        },
        &ray,
        max_t,
    )?;

    let normal = if hit.t == 0.0 || hit.normal == Vector::zeros() {
        -sweep.try_normalize(0.0).unwrap_or_else(Vector::zeros)
    } else {
        target_transform.transform_vector(&hit.normal)
    };

    Some(RayHit {
        t: hit.t,
        location: target_transform.transform_point(&hit.witness),
        normal,
    })
}

#[cfg(test)]
mod test {
    use super::cast_support_maps;
    use crate::math::{Real, RigidTransform, Rotation, Vector};
    use crate::shape::{Ball, Cuboid};
    use na::RealField;

    #[test]
    fn ball_cast_against_cuboid() {
        let ball = Ball::new(0.5);
        let cuboid = Cuboid::new(Vector::new(1.0, 1.0, 1.0));
        let start = RigidTransform::from_position(Vector::new(-5.0, 0.0, 0.0));
        let target = RigidTransform::from_position(Vector::new(0.0, 0.0, 0.0));

        let hit = cast_support_maps(
            &ball,
            &start,
            &Vector::new(1.0, 0.0, 0.0),
            &cuboid,
            &target,
            Real::MAX,
        )
        .unwrap();

        approx::assert_relative_eq!(hit.t, 3.5, epsilon = 1.0e-3);
        approx::assert_relative_eq!(hit.normal, -Vector::x(), epsilon = 1.0e-2);
        approx::assert_relative_eq!(hit.location.x, -1.0, epsilon = 1.0e-3);
    }

    #[test]
    fn cast_misses_and_overlaps() {
        let ball = Ball::new(0.5);
        let cuboid = Cuboid::new(Vector::new(1.0, 1.0, 1.0));
        let target = RigidTransform::identity();

        let above = RigidTransform::from_position(Vector::new(-5.0, 3.0, 0.0));
        assert!(cast_support_maps(&ball, &above, &Vector::x(), &cuboid, &target, Real::MAX).is_none());

        let inside = RigidTransform::from_position(Vector::new(0.5, 0.0, 0.0));
        let hit = cast_support_maps(&ball, &inside, &Vector::x(), &cuboid, &target, Real::MAX).unwrap();
        assert_eq!(hit.t, 0.0);
        approx::assert_relative_eq!(hit.normal, -Vector::x());
    }

    #[test]
    fn cast_against_cuboids_rotated_by_right_angles() {
        let ball = Ball::new(1.0);
        let start = RigidTransform::from_position(Vector::new(-10.0, 0.0, 0.0));

        // The face hit by the ball alternates between the x and y (resp. z) half-extents.
        let cases = [
            (Vector::z_axis(), Vector::new(1.0, 2.0, 1.0), [8.0, 7.0]),
            (Vector::y_axis(), Vector::new(1.0, 2.0, 3.0), [8.0, 6.0]),
        ];

        for (axis, half_extents, expected) in cases {
            let cuboid = Cuboid::new(half_extents);

            for k in 0..4 {
                let angle = Real::frac_pi_2() * k as Real;
                let target = RigidTransform::from_orientation(Rotation::from_axis_angle(&axis, angle));
                let hit = cast_support_maps(&ball, &start, &Vector::x(), &cuboid, &target, Real::MAX)
                    .unwrap_or_else(|| panic!("no hit for a rotation of {angle} about {axis:?}"));

                approx::assert_relative_eq!(hit.t, expected[k % 2], epsilon = 1.0e-3);
                approx::assert_relative_eq!(hit.normal, -Vector::x(), epsilon = 1.0e-2);
            }
        }
    }

    #[test]
    fn cast_against_slightly_rotated_cuboid() {
        let ball = Ball::new(1.0);
        let cuboid = Cuboid::new(Vector::new(1.0, 2.0, 1.0));
        let start = RigidTransform::from_position(Vector::new(-10.0, 0.0, 0.0));
        let target =
            RigidTransform::from_orientation(Rotation::from_axis_angle(&Vector::z_axis(), 0.3));

        let hit =
            cast_support_maps(&ball, &start, &Vector::x(), &cuboid, &target, Real::MAX).unwrap();

        // The ball touches the face of local normal `-x`, rotated to `(-cos, -sin)`.
        let (sin, cos) = (0.3 as Real).sin_cos();
        approx::assert_relative_eq!(hit.t, 10.0 - 2.0 / cos, epsilon = 1.0e-3);
        approx::assert_relative_eq!(hit.normal, Vector::new(-cos, -sin, 0.0), epsilon = 1.0e-2);
        approx::assert_relative_eq!(hit.location.x, cos - 2.0 / cos, epsilon = 1.0e-2);
        approx::assert_relative_eq!(hit.location.y, sin, epsilon = 1.0e-2);
    }
}
