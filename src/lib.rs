/*!
tether
========

**tether** is the rigid-body core of a 3-dimensional physics engine written with
the rust programming language. It provides velocity-level joint constraints,
compound collidables accelerated by a bounding volume hierarchy, and the
compound surgery needed to split, shrink, or merge compound bodies at runtime.

*/

#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![deny(unused_results)]
#![warn(missing_docs)]
#![warn(unused_imports)]
#![allow(missing_copy_implementations)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::module_inception)]
#![allow(clippy::manual_range_contains)] // This usually makes it way more verbose that it could be.
#![allow(clippy::type_complexity)] // Complains about closures that are fairly simple.
#![deny(unused_qualifications)]

#[cfg(feature = "serde")]
#[macro_use]
extern crate serde;
extern crate num_traits as num;

pub extern crate nalgebra as na;

pub mod bounding_volume;
pub mod collision;
pub mod compound_helper;
pub mod dynamics;
pub mod joints;
pub mod math;
pub mod partitioning;
pub mod query;
pub mod shape;
pub mod utils;
