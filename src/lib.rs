//! An interactive table tennis scene
//!
//! A table, a net, a bat and a ball:
//! - 3D rendering with wgpu (shadowed directional light, textured materials)
//! - Rigid-body simulation with rapier3d and per-pair contact materials
//! - Entity Component System with hecs
//! - Mouse picking and dragging of the bat
//! - glTF model loading with procedural stand-ins

pub mod assets;
pub mod core;
pub mod ecs;
pub mod game;
pub mod input;
pub mod interaction;
pub mod physics;
pub mod renderer;

// Re-exports for convenience
pub use glam;
pub use hecs;
pub use rapier3d;
pub use wgpu;
pub use winit;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::core::{
        DebugInfo, DemoConfig, Engine, EngineConfig, EngineContext, FrameStats, Game,
    };
    pub use crate::ecs::{Name, Transform, World};
    pub use crate::game::TableTennis;
    pub use crate::input::{Input, InputAction, InputMapper};
    pub use crate::physics::{ColliderHandle, Physics, RigidBodyHandle};
    pub use crate::renderer::{Camera, Material, Mesh, RenderFrame, Renderer, Vertex};
    pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
    pub use winit::keyboard::KeyCode;
}
