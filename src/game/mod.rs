//! The table tennis scene
//!
//! Physics bodies and entities are built headless in `setup`; the `Game`
//! implementation adds GPU resources and runs the per-frame loop.

mod setup;
mod table_tennis;

pub use setup::{SceneBodies, SceneEntities, build_physics, spawn_entities};
pub use table_tennis::TableTennis;
