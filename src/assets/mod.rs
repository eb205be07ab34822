//! Model loading
//!
//! glTF import into CPU-side parts, plus procedural stand-ins for when a
//! model file cannot be loaded.

mod model;
mod procedural;

pub use model::{Model, ModelError, ModelPart};
pub use procedural::{bat_stand_in, table_stand_in};
