use crate::collision::CompoundCollidable;
use crate::compound_helper::CompoundError;
use crate::dynamics::Entity;
use crate::math::{Point, Real, Vector};
use crate::shape::{CompoundShape, ShapeDistributionInformation};
use crate::utils::INERTIA_TENSOR_SCALE;

/// The mass distribution of a group of compound children.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct GroupDistribution {
    /// The volume, center, and unit-mass inertia of the group, in the local-space of the
    /// compound shape.
    ///
    /// If `weight` is zero, the center is the plain average of the children centers and the
    /// volume distribution is zero.
    pub distribution: ShapeDistributionInformation,
    /// The sum of the weights of the children of the group.
    pub weight: Real,
}

impl GroupDistribution {
    /// Computes the distribution of the children `indices` of `shape`.
    ///
    /// `indices` must not be empty.
    pub fn compute(
        shape: &CompoundShape,
        indices: impl IntoIterator<Item = usize> + Clone,
        contributions: &[ShapeDistributionInformation],
    ) -> Self {
        if let Some((distribution, weight)) =
            shape.compute_distribution_for(indices.clone(), contributions)
        {
            return Self {
                distribution,
                weight,
            };
        }

        let mut count = 0;
        let mut volume = 0.0;
        let mut center = Vector::zeros();
        for i in indices {
            let entry = &shape.entries()[i];
            count += 1;
            volume += contributions[i].volume;
            center += entry.center(&contributions[i]).coords;
        }

        Self {
            distribution: ShapeDistributionInformation {
                volume,
                center: Point::from(center / (count.max(1) as Real)),
                ..Default::default()
            },
            weight: 0.0,
        }
    }

    /// Computes the distribution of every child of a compound collidable.
    pub fn of_compound(
        compound: &CompoundCollidable,
        contributions: &[ShapeDistributionInformation],
    ) -> Self {
        Self::compute(compound.shape(), compound.shape_indices(), contributions)
    }

    /// The center of mass of the group, in the local-space of the compound shape.
    pub fn center(&self) -> Point {
        self.distribution.center
    }

    /// Gives `entity` the mass `mass` and the inertia of this group scaled accordingly.
    ///
    /// Zero-weight groups leave the mass properties of `entity` untouched.
    pub(crate) fn initialize_entity(&self, entity: &mut Entity, mass: Real) {
        if self.weight <= 0.0 {
            log::warn!("A compound group has a zero total weight, its mass properties are left unchanged.");
            return;
        }

        let inertia = self.distribution.volume_distribution * (mass * INERTIA_TENSOR_SCALE);
        entity.initialize(mass, inertia);
    }
}

/// Checks that `contributions` has one element per entry of `shape`.
pub(crate) fn check_contributions(
    shape: &CompoundShape,
    contributions: &[ShapeDistributionInformation],
) -> Result<(), CompoundError> {
    if contributions.len() != shape.len() {
        return Err(CompoundError::ContributionCountMismatch {
            expected: shape.len(),
            found: contributions.len(),
        });
    }

    Ok(())
}

/// Moves an entity by a local-space offset of its center of mass, as if the offset point was
/// rigidly attached to it.
///
/// `original` is the state of the body before the change: the new position is
/// `position + orientation * local_offset`, the new linear velocity is the velocity of that point
/// `v + w x offset`, and the angular velocity is kept.
pub fn split_reposition(entity: &mut Entity, original: &Entity, local_offset: &Vector) {
    let offset = original.orientation() * local_offset;
    entity.set_position(original.position() + offset);
    entity.set_orientation(original.orientation());
    entity.set_linear_velocity(
        original.linear_velocity() + original.angular_velocity().cross(&offset),
    );
    entity.set_angular_velocity(original.angular_velocity());
}

/// Moves an entity after some of its compound children were removed.
///
/// The entity center moves from `original_center` to `remaining_center`, both in the local-space
/// of the compound shape.
pub fn remove_reposition(entity: &mut Entity, original_center: &Point, remaining_center: &Point) {
    let original = *entity;
    split_reposition(entity, &original, &(remaining_center - original_center));
}
