use crate::math::{Matrix, Real};
use core::fmt::Debug;
use core::ops::{Add, AddAssign, Mul, Neg, Sub};
use na::{SMatrix, SVector};

/// The number of degrees of freedom removed by a joint, and the linear algebra in that space.
///
/// Constraint-space quantities (error, bias velocity, relative velocity, impulses) are vectors
/// with one component per removed degree of freedom. Jacobians have one row per removed degree
/// of freedom and map a 3D velocity to constraint-space.
pub trait ConstraintDofs: Copy + Clone + Debug + PartialEq + Send + Sync + 'static {
    /// The number of removed degrees of freedom.
    const DIM: usize;

    /// A constraint-space vector.
    type Vector: Copy
        + Debug
        + PartialEq
        + Send
        + Sync
        + Add<Output = Self::Vector>
        + Sub<Output = Self::Vector>
        + Neg<Output = Self::Vector>
        + Mul<Real, Output = Self::Vector>
        + AddAssign;
    /// A Jacobian block, mapping a 3D velocity to constraint-space.
    type Jacobian: Copy + Debug + PartialEq + Send + Sync;
    /// A constraint-space square matrix.
    type Mass: Copy + Debug + PartialEq + Send + Sync + Add<Output = Self::Mass>;

    /// The zero constraint-space vector.
    fn zero_vector() -> Self::Vector;
    /// The zero Jacobian block.
    fn zero_jacobian() -> Self::Jacobian;
    /// The zero constraint-space matrix.
    fn zero_mass() -> Self::Mass;

    /// `J * v`.
    fn jacobian_mul(jacobian: &Self::Jacobian, v: &crate::math::Vector) -> Self::Vector;
    /// `Jᵀ * lambda`.
    fn jacobian_tr_mul(jacobian: &Self::Jacobian, lambda: &Self::Vector) -> crate::math::Vector;
    /// `J * inv_inertia * Jᵀ`.
    fn project_inverse_inertia(jacobian: &Self::Jacobian, inv_inertia: &Matrix) -> Self::Mass;
    /// Adds `softness` to the diagonal of `m` and inverts the result.
    ///
    /// Returns zero if the matrix is singular.
    fn soft_inverse(m: &Self::Mass, softness: Real) -> Self::Mass;
    /// `m * v`.
    fn mass_mul(m: &Self::Mass, v: &Self::Vector) -> Self::Vector;
    /// Limits a bias velocity to `max`.
    fn clamp_bias(bias: &Self::Vector, max: Real) -> Self::Vector;
    /// The largest absolute value of the components of `v`.
    fn amax(v: &Self::Vector) -> Real;
}

/// One removed degree of freedom. Bias velocities are clamped per component.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Dof1;

/// Two removed degrees of freedom. Bias velocities are clamped per component.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Dof2;

/// Three removed degrees of freedom. Bias velocities are clamped by magnitude.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Dof3;

macro_rules! impl_constraint_dofs(
    ($name: ident, $dim: literal, |$bias: ident, $max: ident| $clamp: expr) => {
        impl ConstraintDofs for $name {
            const DIM: usize = $dim;

            type Vector = SVector<Real, $dim>;
            type Jacobian = SMatrix<Real, $dim, 3>;
            type Mass = SMatrix<Real, $dim, $dim>;

            #[inline]
            fn zero_vector() -> Self::Vector {
                Self::Vector::zeros()
            }

            #[inline]
            fn zero_jacobian() -> Self::Jacobian {
                Self::Jacobian::zeros()
            }

            #[inline]
            fn zero_mass() -> Self::Mass {
                Self::Mass::zeros()
            }

            #[inline]
            fn jacobian_mul(jacobian: &Self::Jacobian, v: &crate::math::Vector) -> Self::Vector {
                jacobian * v
            }

            #[inline]
            fn jacobian_tr_mul(jacobian: &Self::Jacobian, lambda: &Self::Vector) -> crate::math::Vector {
                jacobian.tr_mul(lambda)
            }

            #[inline]
            fn project_inverse_inertia(jacobian: &Self::Jacobian, inv_inertia: &Matrix) -> Self::Mass {
                jacobian * inv_inertia * jacobian.transpose()
            }

            #[inline]
            fn soft_inverse(m: &Self::Mass, softness: Real) -> Self::Mass {
                (m + Self::Mass::identity() * softness)
                    .try_inverse()
                    .unwrap_or_else(Self::Mass::zeros)
            }

            #[inline]
            fn mass_mul(m: &Self::Mass, v: &Self::Vector) -> Self::Vector {
                m * v
            }

            #[inline]
            fn clamp_bias($bias: &Self::Vector, $max: Real) -> Self::Vector {
                $clamp
            }

            #[inline]
            fn amax(v: &Self::Vector) -> Real {
                v.amax()
            }
        }
    }
);

impl_constraint_dofs!(Dof1, 1, |bias, max| bias.map(|x| x.clamp(-max, max)));
impl_constraint_dofs!(Dof2, 2, |bias, max| bias.map(|x| x.clamp(-max, max)));
impl_constraint_dofs!(Dof3, 3, |bias, max| {
    let norm = bias.norm();
    if norm > max {
        bias * (max / norm)
    } else {
        *bias
    }
});
