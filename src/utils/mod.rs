//! Various unsorted geometrical and logical operators.

pub use self::basis::{cross_matrix, outer_product, perpendicular};
pub use self::consts::*;
pub use self::inv::inv;
pub use self::pool::{Pooled, ResourcePool, Resources};

mod basis;
mod consts;
mod inv;
mod pool;
