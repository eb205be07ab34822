//! Key bindings
//!
//! Physical keys map to logical actions so that the scene code asks "was the
//! ball reset requested" rather than "was Space pressed". Bindings can be
//! changed at runtime.

use rustc_hash::FxHashMap;
use winit::keyboard::KeyCode;

use super::state::Input;

/// Logical actions of the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    /// Put the ball back at its spawn point
    ResetBall,
    /// Show or hide the collider wireframe
    ToggleColliders,
    /// Close the program
    Quit,
}

/// Maps physical keys to logical actions.
#[derive(Debug, Clone)]
pub struct InputMapper {
    /// Key to action bindings
    key_bindings: FxHashMap<KeyCode, InputAction>,
    /// Reverse lookup: action to keys
    action_keys: FxHashMap<InputAction, Vec<KeyCode>>,
}

impl InputMapper {
    /// Create an empty input mapper.
    #[must_use]
    pub fn new() -> Self {
        Self {
            key_bindings: FxHashMap::default(),
            action_keys: FxHashMap::default(),
        }
    }

    /// Space resets the ball, F1 toggles the wireframe, Escape quits.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut mapper = Self::new();
        mapper.bind(KeyCode::Space, InputAction::ResetBall);
        mapper.bind(KeyCode::F1, InputAction::ToggleColliders);
        mapper.bind(KeyCode::Escape, InputAction::Quit);
        mapper
    }

    /// Bind a key to an action.
    ///
    /// If the key was previously bound, the old binding is replaced.
    pub fn bind(&mut self, key: KeyCode, action: InputAction) {
        if let Some(old_action) = self.key_bindings.get(&key)
            && let Some(keys) = self.action_keys.get_mut(old_action)
        {
            keys.retain(|k| *k != key);
        }

        self.key_bindings.insert(key, action);
        self.action_keys.entry(action).or_default().push(key);
    }

    /// Unbind a key.
    pub fn unbind(&mut self, key: KeyCode) {
        if let Some(action) = self.key_bindings.remove(&key)
            && let Some(keys) = self.action_keys.get_mut(&action)
        {
            keys.retain(|k| *k != key);
        }
    }

    /// Get the action for a key.
    #[must_use]
    pub fn get_action(&self, key: KeyCode) -> Option<InputAction> {
        self.key_bindings.get(&key).copied()
    }

    /// Get all keys bound to an action.
    #[must_use]
    pub fn get_keys(&self, action: InputAction) -> &[KeyCode] {
        self.action_keys
            .get(&action)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Whether any key bound to `action` went down this frame
    #[must_use]
    pub fn just_triggered(&self, input: &Input, action: InputAction) -> bool {
        self.get_keys(action)
            .iter()
            .any(|key| input.is_key_just_pressed(*key))
    }
}

impl Default for InputMapper {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::event::ElementState;

    #[test]
    fn test_default_bindings() {
        let mapper = InputMapper::with_defaults();
        assert_eq!(mapper.get_action(KeyCode::Space), Some(InputAction::ResetBall));
        assert_eq!(
            mapper.get_action(KeyCode::F1),
            Some(InputAction::ToggleColliders)
        );
        assert_eq!(mapper.get_action(KeyCode::Escape), Some(InputAction::Quit));
        assert_eq!(mapper.get_action(KeyCode::KeyW), None);
    }

    #[test]
    fn test_rebind_moves_key() {
        let mut mapper = InputMapper::with_defaults();
        mapper.bind(KeyCode::Space, InputAction::Quit);

        assert_eq!(mapper.get_action(KeyCode::Space), Some(InputAction::Quit));
        assert!(mapper.get_keys(InputAction::ResetBall).is_empty());
        assert_eq!(
            mapper.get_keys(InputAction::Quit),
            &[KeyCode::Escape, KeyCode::Space]
        );
    }

    #[test]
    fn test_unbind() {
        let mut mapper = InputMapper::with_defaults();
        mapper.unbind(KeyCode::F1);
        assert_eq!(mapper.get_action(KeyCode::F1), None);
        assert!(mapper.get_keys(InputAction::ToggleColliders).is_empty());
    }

    #[test]
    fn test_just_triggered_follows_input() {
        let mut mapper = InputMapper::with_defaults();
        mapper.bind(KeyCode::KeyR, InputAction::ResetBall);
        let mut input = Input::new();

        input.process_keyboard(KeyCode::KeyR, ElementState::Pressed);
        assert!(mapper.just_triggered(&input, InputAction::ResetBall));
        assert!(!mapper.just_triggered(&input, InputAction::Quit));

        input.update();
        assert!(!mapper.just_triggered(&input, InputAction::ResetBall));
    }
}
