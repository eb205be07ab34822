//! Keyboard and mouse state

use glam::Vec2;
use std::collections::HashSet;
use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

/// Input state manager
#[derive(Debug)]
pub struct Input {
    /// Currently pressed keys
    pressed_keys: HashSet<KeyCode>,
    /// Keys that were just pressed this frame
    just_pressed_keys: HashSet<KeyCode>,
    /// Keys that were just released this frame
    just_released_keys: HashSet<KeyCode>,
    /// Currently pressed mouse buttons
    pressed_mouse_buttons: HashSet<MouseButton>,
    /// Mouse buttons just pressed this frame
    just_pressed_mouse_buttons: HashSet<MouseButton>,
    /// Mouse buttons just released this frame
    just_released_mouse_buttons: HashSet<MouseButton>,
    /// Current mouse position
    mouse_position: Vec2,
    /// Mouse movement since the last `update`
    mouse_delta: Vec2,
}

impl Input {
    /// Create a new input manager
    pub fn new() -> Self {
        Self {
            pressed_keys: HashSet::new(),
            just_pressed_keys: HashSet::new(),
            just_released_keys: HashSet::new(),
            pressed_mouse_buttons: HashSet::new(),
            just_pressed_mouse_buttons: HashSet::new(),
            just_released_mouse_buttons: HashSet::new(),
            mouse_position: Vec2::ZERO,
            mouse_delta: Vec2::ZERO,
        }
    }

    /// Clear per-frame state once a frame has been handled
    pub fn update(&mut self) {
        self.just_pressed_keys.clear();
        self.just_released_keys.clear();
        self.just_pressed_mouse_buttons.clear();
        self.just_released_mouse_buttons.clear();
        self.mouse_delta = Vec2::ZERO;
    }

    /// Process a keyboard event
    pub fn process_keyboard(&mut self, key_code: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.pressed_keys.contains(&key_code) {
                    self.just_pressed_keys.insert(key_code);
                }
                self.pressed_keys.insert(key_code);
            }
            ElementState::Released => {
                self.pressed_keys.remove(&key_code);
                self.just_released_keys.insert(key_code);
            }
        }
    }

    /// Process a mouse button event
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.pressed_mouse_buttons.contains(&button) {
                    self.just_pressed_mouse_buttons.insert(button);
                }
                self.pressed_mouse_buttons.insert(button);
            }
            ElementState::Released => {
                self.pressed_mouse_buttons.remove(&button);
                self.just_released_mouse_buttons.insert(button);
            }
        }
    }

    /// Process mouse movement; the delta sums every move within a frame
    pub fn process_mouse_motion(&mut self, position: Vec2) {
        self.mouse_delta += position - self.mouse_position;
        self.mouse_position = position;
    }

    /// Check if a key is currently pressed
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.pressed_keys.contains(&key)
    }

    /// Check if a key was just pressed this frame
    pub fn is_key_just_pressed(&self, key: KeyCode) -> bool {
        self.just_pressed_keys.contains(&key)
    }

    /// Check if a key was just released this frame
    pub fn is_key_just_released(&self, key: KeyCode) -> bool {
        self.just_released_keys.contains(&key)
    }

    /// Check if a mouse button is currently pressed
    pub fn is_mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.pressed_mouse_buttons.contains(&button)
    }

    /// Check if a mouse button was just pressed this frame
    pub fn is_mouse_button_just_pressed(&self, button: MouseButton) -> bool {
        self.just_pressed_mouse_buttons.contains(&button)
    }

    /// Check if a mouse button was just released this frame
    pub fn is_mouse_button_just_released(&self, button: MouseButton) -> bool {
        self.just_released_mouse_buttons.contains(&button)
    }

    /// Get current mouse position
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    /// Get mouse movement delta this frame
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }
}

impl Default for Input {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_press_is_just_pressed_once() {
        let mut input = Input::new();
        input.process_keyboard(KeyCode::Space, ElementState::Pressed);
        assert!(input.is_key_pressed(KeyCode::Space));
        assert!(input.is_key_just_pressed(KeyCode::Space));

        input.update();
        // Key repeat reports Pressed again without a release
        input.process_keyboard(KeyCode::Space, ElementState::Pressed);
        assert!(input.is_key_pressed(KeyCode::Space));
        assert!(!input.is_key_just_pressed(KeyCode::Space));

        input.process_keyboard(KeyCode::Space, ElementState::Released);
        assert!(!input.is_key_pressed(KeyCode::Space));
        assert!(input.is_key_just_released(KeyCode::Space));
    }

    #[test]
    fn test_mouse_button_edges() {
        let mut input = Input::new();
        input.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert!(input.is_mouse_button_just_pressed(MouseButton::Left));

        input.update();
        assert!(input.is_mouse_button_pressed(MouseButton::Left));
        assert!(!input.is_mouse_button_just_pressed(MouseButton::Left));

        input.process_mouse_button(MouseButton::Left, ElementState::Released);
        assert!(input.is_mouse_button_just_released(MouseButton::Left));
        assert!(!input.is_mouse_button_pressed(MouseButton::Left));
    }

    #[test]
    fn test_cursor_motion_delta() {
        let mut input = Input::new();
        input.process_mouse_motion(Vec2::new(100.0, 50.0));
        input.update();
        input.process_mouse_motion(Vec2::new(110.0, 45.0));
        assert_eq!(input.mouse_position(), Vec2::new(110.0, 45.0));
        assert_eq!(input.mouse_delta(), Vec2::new(10.0, -5.0));

        input.update();
        assert_eq!(input.mouse_delta(), Vec2::ZERO);
        assert_eq!(input.mouse_position(), Vec2::new(110.0, 45.0));
    }

    #[test]
    fn test_delta_sums_moves_within_a_frame() {
        let mut input = Input::new();
        input.process_mouse_motion(Vec2::new(100.0, 100.0));
        input.update();

        // A repeated position must not hide the earlier move
        input.process_mouse_motion(Vec2::new(140.0, 120.0));
        input.process_mouse_motion(Vec2::new(140.0, 120.0));
        assert_eq!(input.mouse_position(), Vec2::new(140.0, 120.0));
        assert_eq!(input.mouse_delta(), Vec2::new(40.0, 20.0));

        input.process_mouse_motion(Vec2::new(150.0, 110.0));
        assert_eq!(input.mouse_delta(), Vec2::new(50.0, 10.0));
    }
}
