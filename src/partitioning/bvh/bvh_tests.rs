use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::math::{Point, Real, Vector};
use crate::partitioning::{Bvh, BvhNode};
use crate::query::Ray;

fn make_test_aabb(i: usize) -> Aabb {
    Aabb::from_half_extents(Vector::repeat(i as Real).into(), Vector::repeat(1.0))
}

fn random_aabbs(rng: &mut oorandom::Rand32, len: usize) -> Vec<Aabb> {
    (0..len)
        .map(|_| {
            let center = Point::new(
                rng.rand_float() as Real * 20.0 - 10.0,
                rng.rand_float() as Real * 20.0 - 10.0,
                rng.rand_float() as Real * 20.0 - 10.0,
            );
            let half_extents = Vector::new(
                rng.rand_float() as Real + 0.05,
                rng.rand_float() as Real + 0.05,
                rng.rand_float() as Real + 0.05,
            );
            Aabb::from_half_extents(center, half_extents)
        })
        .collect()
}

/// Checks that every leaf appears exactly once and that every node encloses its children.
fn assert_well_formed(bvh: &Bvh, leaves: &[Aabb]) {
    let mut seen = vec![0; leaves.len()];

    for (id, wide) in bvh.nodes().iter().enumerate() {
        for node in [wide.left(), wide.right()] {
            match node.leaf_count() {
                0 => assert!(id == 0 && leaves.len() == 1),
                1 => {
                    seen[node.children as usize] += 1;
                    assert_eq!(node.aabb(), leaves[node.children as usize]);
                }
                n => {
                    assert!(node.children as usize > id);
                    let children = &bvh.nodes()[node.children as usize];
                    assert_eq!(children.leaf_count(), n);
                    assert!(node.aabb().contains(&children.left().aabb()));
                    assert!(node.aabb().contains(&children.right().aabb()));
                }
            }
        }
    }

    assert!(seen.iter().all(|count| *count == 1));
}

#[test]
fn bvh_build_is_well_formed() {
    for len in 0..=100 {
        let leaves: Vec<_> = (0..len).map(make_test_aabb).collect();
        let bvh = Bvh::from_leaves(&leaves);
        assert_eq!(bvh.leaf_count(), len as u32);
        assert_well_formed(&bvh, &leaves);

        if len > 0 {
            let expected = leaves
                .iter()
                .fold(Aabb::new_invalid(), |acc, aabb| acc.merged(aabb));
            assert_eq!(bvh.root_aabb(), expected);
        }
    }
}

#[test]
fn bvh_build_with_identical_leaves() {
    let leaves = vec![make_test_aabb(3); 37];
    let bvh = Bvh::from_leaves(&leaves);
    assert_well_formed(&bvh, &leaves);

    // Degenerate bins are split in halves, keeping the tree balanced.
    for wide in bvh.nodes() {
        let (left, right) = (wide.left().leaf_count(), wide.right().leaf_count());
        assert!(left.abs_diff(right) <= 1);
    }
}

#[test]
fn bvh_refit_is_idempotent() {
    let mut rng = oorandom::Rand32::new(42);
    let leaves = random_aabbs(&mut rng, 50);
    let moved: Vec<_> = leaves
        .iter()
        .map(|aabb| aabb.translated(&Vector::new(1.0, -2.0, 0.5)))
        .collect();

    let mut bvh = Bvh::from_leaves(&leaves);
    bvh.refit(|i| moved[i as usize]);
    let once = bvh.clone();
    bvh.refit(|i| moved[i as usize]);

    assert_eq!(bvh, once);
    assert_well_formed(&bvh, &moved);
}

#[test]
fn bvh_aabb_query_matches_brute_force() {
    let mut rng = oorandom::Rand32::new(7);
    let leaves = random_aabbs(&mut rng, 80);
    let bvh = Bvh::from_leaves(&leaves);

    for query in random_aabbs(&mut rng, 20) {
        let mut found: Vec<u32> = bvh.intersect_aabb(&query).collect();
        found.sort_unstable();
        let expected: Vec<u32> = (0..leaves.len() as u32)
            .filter(|i| leaves[*i as usize].intersects(&query))
            .collect();
        assert_eq!(found, expected);
    }
}

#[test]
fn bvh_ray_cast_finds_the_nearest_leaf() {
    let mut rng = oorandom::Rand32::new(1234);
    let leaves = random_aabbs(&mut rng, 60);
    let bvh = Bvh::from_leaves(&leaves);

    for _ in 0..20 {
        let origin = Point::new(-20.0, rng.rand_float() as Real * 10.0 - 5.0, 0.0);
        let dir = Vector::new(1.0, rng.rand_float() as Real * 0.2 - 0.1, 0.1);
        let ray = Ray::new(origin, dir);

        let result = bvh.cast_ray(&ray, Real::MAX, |i, _| {
            leaves[i as usize].cast_local_ray(&ray, Real::MAX, true)
        });
        let expected = leaves
            .iter()
            .filter_map(|aabb| aabb.cast_local_ray(&ray, Real::MAX, true))
            .fold(Real::MAX, Real::min);

        match result {
            Some((_, t)) => approx::assert_relative_eq!(t, expected),
            None => assert_eq!(expected, Real::MAX),
        }
    }
}

#[test]
fn bvh_leaves_skips_pruned_subtrees() {
    let leaves: Vec<_> = (0..16).map(make_test_aabb).collect();
    let bvh = Bvh::from_leaves(&leaves);

    let all: Vec<u32> = bvh.leaves(|_| true).collect();
    assert_eq!(all.len(), 16);

    let region = Aabb::new(Point::new(-2.0, -2.0, -2.0), Point::new(4.5, 4.5, 4.5));
    let visited = core::cell::Cell::new(0);
    let mut found: Vec<u32> = bvh
        .leaves(|node: &BvhNode| {
            visited.set(visited.get() + 1);
            node.aabb().intersects(&region)
        })
        .collect();
    found.sort_unstable();

    assert_eq!(found, vec![0, 1, 2, 3, 4, 5]);
    assert!(visited.get() < 2 * all.len());
}
