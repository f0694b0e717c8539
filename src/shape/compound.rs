//!
//! Shape composed from the union of weighted children.
//!

use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::math::{Matrix, Point, Real, RigidTransform, Vector};
use crate::query::{Ray, RayHit};
use crate::shape::{Shape, ShapeDistributionInformation, ShapeError, ShapeType, SharedShape, SupportMap};
use crate::utils::outer_product;

/// A child of a [`CompoundShape`].
#[derive(Clone, Debug)]
pub struct CompoundShapeEntry {
    /// The transform of the child, relative to the compound.
    pub local_transform: RigidTransform,
    /// The shape of the child.
    pub shape: SharedShape,
    /// The weight of the child, used to distribute the mass of the compound among its children.
    pub weight: Real,
}

impl CompoundShapeEntry {
    /// Creates a new compound entry.
    pub fn new(shape: SharedShape, local_transform: RigidTransform, weight: Real) -> Self {
        Self {
            local_transform,
            shape,
            weight,
        }
    }

    /// The center of mass of this child, in the local-space of the compound.
    pub fn center(&self, contribution: &ShapeDistributionInformation) -> Point {
        self.local_transform.transform_point(&contribution.center)
    }
}

/// Moves an inertia contribution into another frame, relative to a new center.
///
/// `base` is a unit-mass inertia tensor expressed relative to its own center of mass. It is
/// rotated by `transform.orientation`, shifted with the parallel-axis theorem from
/// `transform.position` to `center`, and scaled by `weight`.
pub fn transform_contribution(
    transform: &RigidTransform,
    center: &Point,
    base: &Matrix,
    weight: Real,
) -> Matrix {
    let rotation = transform.rotation_matrix();
    let rotated = rotation * base * rotation.transpose();
    let offset = transform.position - center.coords;
    let shift = Matrix::identity() * offset.norm_squared() - outer_product(&offset, &offset);

    (rotated + shift) * weight
}

/// A compound shape made of weighted children.
///
/// The shape is read-only once built and is shared by every collidable built from it: a
/// compound body split in two keeps the same `CompoundShape`, each part referring to a subset
/// of its children by index.
#[derive(Clone, Debug)]
pub struct CompoundShape {
    entries: Vec<CompoundShapeEntry>,
}

impl CompoundShape {
    /// Builds a compound shape from its children.
    ///
    /// Fails if `entries` is empty or if the weights of the children add up to zero.
    pub fn new(entries: Vec<CompoundShapeEntry>) -> Result<Self, ShapeError> {
        if entries.is_empty() {
            return Err(ShapeError::EmptyCompound);
        }

        if entries.iter().map(|e| e.weight).sum::<Real>() <= 0.0 {
            return Err(ShapeError::ZeroTotalWeight);
        }

        Ok(Self { entries })
    }

    /// Builds a compound shape with its center of mass at its local-space origin.
    ///
    /// The children are translated so that their weighted center lies at the origin. Returns
    /// the new shape together with the center of mass of `entries` before the translation.
    pub fn new_centered(
        mut entries: Vec<CompoundShapeEntry>,
    ) -> Result<(Self, Point), ShapeError> {
        let center = Self::new(entries.clone())?
            .compute_distribution_information()
            .center;

        for entry in &mut entries {
            entry.local_transform.position -= center.coords;
        }

        Ok((Self { entries }, center))
    }

    /// The children of this compound.
    pub fn entries(&self) -> &[CompoundShapeEntry] {
        &self.entries
    }

    /// The number of children of this compound.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Does this compound have no children? Always `false` for a successfully built shape.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The sum of the weights of all the children.
    pub fn total_weight(&self) -> Real {
        self.entries.iter().map(|e| e.weight).sum()
    }

    /// The distribution information of each child, in the child's own local-space.
    pub fn compute_child_contributions(&self) -> Vec<ShapeDistributionInformation> {
        self.entries
            .iter()
            .map(|e| e.shape.compute_distribution_information())
            .collect()
    }

    /// Computes the combined distribution information of a subset of the children.
    ///
    /// `contributions` must be the result of [`Self::compute_child_contributions`]. Returns
    /// `None` if the selected children have a zero total weight.
    pub fn compute_distribution_for(
        &self,
        indices: impl IntoIterator<Item = usize> + Clone,
        contributions: &[ShapeDistributionInformation],
    ) -> Option<(ShapeDistributionInformation, Real)> {
        let mut weight = 0.0;
        let mut volume = 0.0;
        let mut weighted_center = Vector::zeros();

        for i in indices.clone() {
            let entry = &self.entries[i];
            weight += entry.weight;
            volume += contributions[i].volume;
            weighted_center += entry.center(&contributions[i]).coords * entry.weight;
        }

        if weight <= 0.0 {
            return None;
        }

        let center = Point::from(weighted_center / weight);
        let mut distribution = Matrix::zeros();

        for i in indices {
            let entry = &self.entries[i];
            let child_frame = RigidTransform::new(
                entry.center(&contributions[i]).coords,
                entry.local_transform.orientation,
            );
            distribution += transform_contribution(
                &child_frame,
                &center,
                &contributions[i].volume_distribution,
                entry.weight,
            );
        }

        Some((
            ShapeDistributionInformation {
                volume,
                center,
                volume_distribution: distribution / weight,
            },
            weight,
        ))
    }
}

impl Shape for CompoundShape {
    fn shape_type(&self) -> ShapeType {
        ShapeType::Compound
    }

    fn compute_local_aabb(&self) -> Aabb {
        self.entries
            .iter()
            .fold(Aabb::new_invalid(), |acc, e| {
                acc.merged(&e.shape.compute_aabb(&e.local_transform))
            })
    }

    fn compute_distribution_information(&self) -> ShapeDistributionInformation {
        let contributions = self.compute_child_contributions();
        self.compute_distribution_for(0..self.entries.len(), &contributions)
            .map(|(info, _)| info)
            .unwrap_or_default()
    }

    fn cast_local_ray(&self, ray: &Ray, max_t: Real) -> Option<RayHit> {
        let mut best: Option<RayHit> = None;

        for entry in &self.entries {
            let max_t = best.map(|hit| hit.t).unwrap_or(max_t);
            if let Some(hit) = entry.shape.cast_ray(&entry.local_transform, ray, max_t) {
                if best.map_or(true, |b| hit.t < b.t) {
                    best = Some(hit);
                }
            }
        }

        best
    }

    fn cast_local_shape(
        &self,
        cast_shape: &dyn SupportMap,
        start: &RigidTransform,
        sweep: &Vector,
        max_t: Real,
    ) -> Option<RayHit> {
        let mut best: Option<RayHit> = None;

        for entry in &self.entries {
            let max_t = best.map(|hit| hit.t).unwrap_or(max_t);
            if let Some(hit) =
                entry
                    .shape
                    .cast_shape(&entry.local_transform, cast_shape, start, sweep, max_t)
            {
                if best.map_or(true, |b| hit.t < b.t) {
                    best = Some(hit);
                }
            }
        }

        best
    }
}

#[cfg(test)]
mod test {
    use super::{transform_contribution, CompoundShape, CompoundShapeEntry};
    use crate::math::{Matrix, Point, Real, RigidTransform, Rotation, Vector};
    use crate::query::Ray;
    use crate::shape::{Ball, Cuboid, Shape, ShapeError, SharedShape};

    fn two_balls(weight_a: Real, weight_b: Real) -> Vec<CompoundShapeEntry> {
        vec![
            CompoundShapeEntry::new(
                SharedShape::ball(0.5),
                RigidTransform::from_position(Vector::new(-1.0, 0.0, 0.0)),
                weight_a,
            ),
            CompoundShapeEntry::new(
                SharedShape::ball(0.5),
                RigidTransform::from_position(Vector::new(3.0, 0.0, 0.0)),
                weight_b,
            ),
        ]
    }

    #[test]
    fn compound_construction_errors() {
        assert_eq!(CompoundShape::new(vec![]).unwrap_err(), ShapeError::EmptyCompound);
        assert_eq!(
            CompoundShape::new(two_balls(0.0, 0.0)).unwrap_err(),
            ShapeError::ZeroTotalWeight
        );
    }

    #[test]
    fn compound_center_is_weighted() {
        let shape = CompoundShape::new(two_balls(3.0, 1.0)).unwrap();
        let info = shape.compute_distribution_information();
        approx::assert_relative_eq!(info.center, Point::origin(), epsilon = 1.0e-6);

        let (centered, center) = CompoundShape::new_centered(two_balls(1.0, 1.0)).unwrap();
        approx::assert_relative_eq!(center, Point::new(1.0, 0.0, 0.0), epsilon = 1.0e-6);
        approx::assert_relative_eq!(
            centered.compute_distribution_information().center,
            Point::origin(),
            epsilon = 1.0e-6
        );
    }

    #[test]
    fn contribution_parallel_axis() {
        let base = Ball::new(1.0).compute_distribution_information().volume_distribution;
        let transform = RigidTransform::new(
            Vector::new(0.0, 2.0, 0.0),
            Rotation::from_scaled_axis(Vector::new(0.4, 0.1, -0.3)),
        );
        let result = transform_contribution(&transform, &Point::origin(), &base, 2.0);
        let expected = (base + Matrix::from_diagonal(&Vector::new(4.0, 0.0, 4.0))) * 2.0;
        approx::assert_relative_eq!(result, expected, epsilon = 1.0e-5);
    }

    #[test]
    fn compound_ray_cast_hits_nearest_child() {
        let mut entries = two_balls(1.0, 1.0);
        entries.push(CompoundShapeEntry::new(
            SharedShape::new(Cuboid::new(Vector::repeat(0.5))),
            RigidTransform::from_position(Vector::new(1.0, 0.0, 0.0)),
            1.0,
        ));
        let shape = CompoundShape::new(entries).unwrap();

        let ray = Ray::new(Point::new(10.0, 0.0, 0.0), -Vector::x());
        let hit = shape.cast_local_ray(&ray, Real::MAX).unwrap();
        approx::assert_relative_eq!(hit.t, 6.5, epsilon = 1.0e-5);

        let aabb = shape.compute_local_aabb();
        approx::assert_relative_eq!(aabb.mins, Point::new(-1.5, -0.5, -0.5), epsilon = 1.0e-6);
        approx::assert_relative_eq!(aabb.maxs, Point::new(3.5, 0.5, 0.5), epsilon = 1.0e-6);
    }
}
