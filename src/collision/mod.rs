//! Collidables: shapes following entities, with their bounding boxes, queries, events and
//! collision rules.
//!
//! Narrow-phase contact generation and the world-wide broad phase are not part of this crate.
//! They consume the bounding boxes, collision rules and event managers defined here.

pub use self::collision_rules::{CollisionGroup, CollisionRule, CollisionRules};
pub use self::compound_collidable::{CompoundChild, CompoundCollidable};
pub use self::compound_hierarchy::CompoundHierarchy;
pub use self::convex_collidable::ConvexCollidable;
pub use self::entity_collidable::{
    BoundingBoxExpansion, Collidable, CollidableFilter, CollidableRayHit, EntityCollidable,
};
pub use self::events::{
    ContactEvent, ContactEventKinds, ContactEventManager, ContactEventManagers,
    EventManagerHandle,
};
pub use self::material::Material;
pub use self::mobile_mesh_collidable::MobileMeshCollidable;

mod collision_rules;
mod compound_collidable;
mod compound_hierarchy;
mod convex_collidable;
mod entity_collidable;
mod events;
mod material;
mod mobile_mesh_collidable;
