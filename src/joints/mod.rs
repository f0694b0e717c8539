//! Velocity constraints between two entities, and the iterative solver driving them.
//!
//! Every joint is a [`Joint<K>`] where the kind `K` describes which relative degrees of freedom
//! are removed. [`Joint`] takes care of the spring settings, the bias velocity, the effective
//! mass, and the accumulated impulse, so that a kind only computes its Jacobians and error.

pub use self::ball_socket::BallSocketJoint;
pub use self::distance::DistanceJoint;
pub use self::dofs::{ConstraintDofs, Dof1, Dof2, Dof3};
pub use self::joint::{Joint, JointJacobians, JointKind};
pub use self::joint_error::JointError;
pub use self::no_rotation::NoRotationJoint;
pub use self::point_on_line::PointOnLineJoint;
pub use self::point_on_plane::PointOnPlaneJoint;
pub use self::revolute_angular::RevoluteAngularJoint;
pub use self::solver::{JointHandle, JointSolver, SolverSettings, SolverUpdateable};
pub use self::spring_settings::{JointSettings, SpringSettings};
pub use self::swivel_hinge_angular::SwivelHingeAngularJoint;

mod ball_socket;
mod distance;
mod dofs;
mod joint;
mod joint_error;
mod no_rotation;
mod point_on_line;
mod point_on_plane;
mod revolute_angular;
mod solver;
mod spring_settings;
mod swivel_hinge_angular;

#[cfg(test)]
mod test_utils;
