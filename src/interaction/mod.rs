//! Mouse interaction: cursor rays, picking and dragging

mod drag;
mod picking;
mod ray;

pub use drag::DragController;
pub use picking::PickShape;
pub use ray::{Plane, Ray, cursor_to_ndc};
