use crate::math::{Point, Real};

/// A coarse volume enclosing a collidable, used to skip exact tests.
///
/// The compound hierarchy and the collidables only rely on these operations, so any volume
/// implementing them can be stored in their trees.
pub trait BoundingVolume {
    /// A point inside of this volume, ideally its center.
    fn center(&self) -> Point;

    /// Do both volumes overlap?
    fn intersects(&self, other: &Self) -> bool;

    /// Is `other` fully inside of this volume?
    fn contains(&self, other: &Self) -> bool;

    /// Grows this volume so it also encloses `other`.
    fn merge(&mut self, other: &Self);

    /// The smallest volume of this kind enclosing both volumes.
    fn merged(&self, other: &Self) -> Self;

    /// Pushes every face of this volume outward by `amount`.
    fn loosen(&mut self, amount: Real);

    /// A copy of this volume with every face pushed outward by `amount`.
    fn loosened(&self, amount: Real) -> Self;
}
