//! Entity Component System module
//!
//! Built on top of the hecs ECS library

mod components;
mod systems;
mod world;

pub use components::{BodyLink, BodySync, Draggable, Name, Pickable, RenderParts, Transform};
pub use systems::{move_entity, pick_draggable, push_kinematic_targets, sync_from_physics};
pub use world::World;
