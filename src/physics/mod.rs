//! Physics simulation module
//!
//! Built on top of rapier3d

mod debug_lines;
mod materials;
mod stepper;
mod world;

pub use debug_lines::{LineSegment, collider_lines};
pub use materials::{ContactMaterial, ContactMaterials, MaterialId};
pub use stepper::{FixedStepper, StepPlan};
pub use world::{
    BodyKind, ColliderHandle, ColliderOutline, Physics, RaycastHit, RigidBodyHandle, ShapeOutline,
};
