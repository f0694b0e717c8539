use crate::math::{Matrix, Point, Real};
use crate::utils::outer_product;

/// The volume, center, and inertia contribution of a shape.
///
/// This is computed by [`Shape::compute_distribution_information`](super::Shape::compute_distribution_information)
/// and combined when the children of a compound are regrouped.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct ShapeDistributionInformation {
    /// The volume of the shape.
    ///
    /// Zero for surfaces without interior.
    pub volume: Real,
    /// The center of mass of the shape, in its local-space.
    pub center: Point,
    /// The inertia tensor of the shape with a unit mass, relative to its center of mass.
    pub volume_distribution: Matrix,
}

impl Default for ShapeDistributionInformation {
    fn default() -> Self {
        Self {
            volume: 0.0,
            center: Point::origin(),
            volume_distribution: Matrix::zeros(),
        }
    }
}

impl ShapeDistributionInformation {
    /// Builds the distribution information from the covariance of the shape's mass.
    ///
    /// `measure` is the volume (or area) of the shape, `center` its centroid, and `covariance`
    /// the integral of `x * xᵀ` over the shape, relative to the local-space origin.
    pub(crate) fn from_covariance(
        volume: Real,
        measure: Real,
        center: Point,
        covariance: &Matrix,
    ) -> Self {
        let inertia_at_origin = Matrix::identity() * covariance.trace() - covariance;
        let c = center.coords;
        let shift = Matrix::identity() * c.norm_squared() - outer_product(&c, &c);
        let volume_distribution = if measure != 0.0 {
            inertia_at_origin / measure - shift
        } else {
            Matrix::zeros()
        };

        Self {
            volume,
            center,
            volume_distribution,
        }
    }
}
