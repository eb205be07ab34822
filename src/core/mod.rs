//! Core engine module
//!
//! Contains the main Engine struct, frame timing, debug statistics and the
//! demo settings

mod config;
mod debug;
mod engine;
mod time;

pub use config::{
    AssetSettings, BodySettings, CameraSettings, ConfigError, DemoConfig, LightingSettings,
    PhysicsSettings, WindowSettings,
};
pub use debug::{DebugInfo, FrameStats};
pub use engine::{Engine, EngineConfig, EngineContext, Game};
pub use time::Time;
