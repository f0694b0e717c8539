//! The rigid bodies moved by joints and carried by collidables.

pub use self::entity::Entity;
pub use self::entity_set::{EntityHandle, EntitySet};

mod entity;
mod entity_set;
