use crate::collision::{Collidable, CompoundChild, CompoundCollidable};
use crate::compound_helper::CompoundError;
use crate::shape::{CompoundShape, ShapeDistributionInformation};
use std::sync::Arc;

/// Creates a compound collidable using only the entries `indices` of `shape`.
///
/// The collidable is offset so that the center of mass of the selected entries lies at the
/// position of its entity: its local position is minus that center. Returns the collidable
/// together with the distribution information of the selected entries, with a volume
/// distribution normalized by their total weight.
pub fn create_partial_compound_collidable(
    shape: Arc<CompoundShape>,
    indices: &[usize],
) -> Result<(CompoundCollidable, ShapeDistributionInformation), CompoundError> {
    if indices.is_empty() {
        return Err(CompoundError::EmptyChildList);
    }

    let children = indices
        .iter()
        .map(|i| {
            CompoundChild::new(&shape, *i).ok_or(CompoundError::InvalidShapeIndex {
                index: *i,
                len: shape.len(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let contributions = shape.compute_child_contributions();
    let (distribution, _) = shape
        .compute_distribution_for(indices.iter().copied(), &contributions)
        .ok_or(CompoundError::ZeroTotalWeight)?;

    let mut collidable = CompoundCollidable::from_children(shape, children);
    collidable.entity_collidable_mut().local_position = -distribution.center.coords;

    Ok((collidable, distribution))
}
