//! Shapes supported by tether.

pub use self::ball::Ball;
pub use self::capsule::Capsule;
pub use self::compound::{transform_contribution, CompoundShape, CompoundShapeEntry};
pub use self::cuboid::Cuboid;
pub use self::distribution::ShapeDistributionInformation;
pub use self::mobile_mesh::{MobileMeshShape, MobileMeshSolidity};
#[doc(inline)]
pub use self::shape::{Shape, ShapeType};
pub use self::shape_error::ShapeError;
pub use self::shared_shape::SharedShape;
#[doc(inline)]
pub use self::support_map::SupportMap;
pub use self::triangle::Triangle;

#[cfg(test)]
pub(crate) use self::mobile_mesh::test::cube_mesh;

mod ball;
mod capsule;
mod compound;
mod cuboid;
mod distribution;
mod mobile_mesh;
mod shape;
mod shape_error;
mod shared_shape;
mod support_map;
mod triangle;
