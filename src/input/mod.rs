//! Input handling module
//!
//! Raw keyboard and mouse state plus rebindable key-to-action mapping.

mod bindings;
mod state;

pub use bindings::{InputAction, InputMapper};
pub use state::Input;
