use std::sync::Arc;
use tether3d::collision::{Collidable, CompoundCollidable};
use tether3d::math::{Point, Real, RigidTransform, Rotation, Vector};
use tether3d::query::Ray;
use tether3d::shape::{CompoundShape, CompoundShapeEntry, SharedShape};
use tether3d::utils::Resources;

fn random_vector(rng: &mut oorandom::Rand32, extent: Real) -> Vector {
    Vector::new(
        (rng.rand_float() as Real * 2.0 - 1.0) * extent,
        (rng.rand_float() as Real * 2.0 - 1.0) * extent,
        (rng.rand_float() as Real * 2.0 - 1.0) * extent,
    )
}

fn random_compound(rng: &mut oorandom::Rand32) -> Arc<CompoundShape> {
    let entries = (0..24)
        .map(|i| {
            let shape = if i % 3 == 0 {
                SharedShape::ball(0.3 + rng.rand_float() as Real * 0.4)
            } else {
                SharedShape::cuboid(0.2, 0.4, 0.6)
            };
            CompoundShapeEntry::new(
                shape,
                RigidTransform::new(
                    random_vector(rng, 6.0),
                    Rotation::from_scaled_axis(random_vector(rng, 1.5)),
                ),
                1.0,
            )
        })
        .collect();
    Arc::new(CompoundShape::new(entries).unwrap())
}

#[test]
fn hierarchy_ray_casts_match_brute_force() {
    let mut rng = oorandom::Rand32::new(42);
    let resources = Resources::new();

    for _ in 0..10 {
        let mut compound = CompoundCollidable::new(random_compound(&mut rng));
        compound.update_bounding_box_for_transform(&RigidTransform::new(
            random_vector(&mut rng, 3.0),
            Rotation::from_scaled_axis(random_vector(&mut rng, 1.0)),
        ));

        for _ in 0..50 {
            let origin = Point::from(random_vector(&mut rng, 15.0));
            let target = Point::from(random_vector(&mut rng, 4.0));
            let ray = Ray::new(origin, target - origin);
            let max_t = 0.5 + rng.rand_float() as Real;

            let expected = compound
                .children()
                .iter()
                .filter_map(|child| child.collidable.cast_ray(&ray, max_t))
                .map(|hit| hit.t)
                .fold(None, |best: Option<Real>, t| Some(best.map_or(t, |b| b.min(t))));
            let hit = compound.ray_cast(&ray, max_t, &resources);

            match (hit, expected) {
                (Some(hit), Some(t)) => {
                    approx::assert_relative_eq!(hit.hit.t, t, epsilon = 1.0e-5);
                    let child = hit.child.unwrap();
                    let direct = compound.children()[child].collidable.cast_ray(&ray, max_t);
                    approx::assert_relative_eq!(direct.unwrap().t, t, epsilon = 1.0e-5);
                }
                (None, None) => {}
                (hit, expected) => panic!("hierarchy found {hit:?}, brute force found {expected:?}"),
            }
        }
    }

    // The candidate list went back to the pool after each query.
    assert_eq!(resources.available_candidate_lists(), 1);
}
