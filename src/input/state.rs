//! Raw device-state snapshots
//!
//! Tracks current and previous-frame state for keys, mouse buttons, mouse
//! position, and the per-frame scroll accumulator. Edge queries compare the
//! two snapshots; `advance` shifts current into previous at the end of each
//! dispatch step.

use glam::Vec2;
use std::collections::HashSet;
use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

/// Two-snapshot device state (current frame vs. end of previous step)
#[derive(Debug, Default)]
pub struct DeviceState {
    /// Keys down this frame
    keys: HashSet<KeyCode>,
    /// Keys down as of the end of the previous step
    prev_keys: HashSet<KeyCode>,
    /// Mouse buttons down this frame
    buttons: HashSet<MouseButton>,
    /// Mouse buttons down as of the end of the previous step
    prev_buttons: HashSet<MouseButton>,
    /// Current mouse position
    mouse_position: Vec2,
    /// Mouse position as of the end of the previous step
    prev_mouse_position: Vec2,
    /// Scroll delta accumulated since the last `advance`
    scroll: Vec2,
}

impl DeviceState {
    /// Create an empty device state
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a raw key transition from the window layer.
    ///
    /// Shifts the key's prior value into the previous snapshot, then writes
    /// the new value into the current one. No callbacks are invoked here.
    pub fn key_transition(&mut self, code: KeyCode, state: ElementState) {
        if self.keys.contains(&code) {
            self.prev_keys.insert(code);
        } else {
            self.prev_keys.remove(&code);
        }
        match state {
            ElementState::Pressed => self.keys.insert(code),
            ElementState::Released => self.keys.remove(&code),
        };
    }

    /// Record a raw mouse button transition from the window layer
    pub fn mouse_button_transition(&mut self, button: MouseButton, state: ElementState) {
        if self.buttons.contains(&button) {
            self.prev_buttons.insert(button);
        } else {
            self.prev_buttons.remove(&button);
        }
        match state {
            ElementState::Pressed => self.buttons.insert(button),
            ElementState::Released => self.buttons.remove(&button),
        };
    }

    /// Overwrite the current mouse position (last write within a frame wins)
    pub fn set_mouse_position(&mut self, position: Vec2) {
        self.mouse_position = position;
    }

    /// Accumulate a scroll event into the current frame's delta
    pub fn add_scroll(&mut self, delta: Vec2) {
        self.scroll += delta;
    }

    /// Key went down this frame
    pub fn is_key_pressed(&self, code: KeyCode) -> bool {
        self.keys.contains(&code) && !self.prev_keys.contains(&code)
    }

    /// Key is down this frame and was down the previous one
    pub fn is_key_held(&self, code: KeyCode) -> bool {
        self.keys.contains(&code) && self.prev_keys.contains(&code)
    }

    /// Key went up this frame
    pub fn is_key_released(&self, code: KeyCode) -> bool {
        !self.keys.contains(&code) && self.prev_keys.contains(&code)
    }

    /// Mouse button went down this frame
    pub fn is_mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.buttons.contains(&button) && !self.prev_buttons.contains(&button)
    }

    /// Mouse button is down this frame and was down the previous one
    pub fn is_mouse_button_held(&self, button: MouseButton) -> bool {
        self.buttons.contains(&button) && self.prev_buttons.contains(&button)
    }

    /// Mouse button went up this frame
    pub fn is_mouse_button_released(&self, button: MouseButton) -> bool {
        !self.buttons.contains(&button) && self.prev_buttons.contains(&button)
    }

    /// Current mouse position
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    /// Mouse movement since the end of the previous step
    pub fn motion_delta(&self) -> Vec2 {
        self.mouse_position - self.prev_mouse_position
    }

    /// Scroll delta accumulated this frame
    pub fn scroll_delta(&self) -> Vec2 {
        self.scroll
    }

    /// End-of-frame shift: copy current state into the previous snapshots and
    /// reset the scroll accumulator
    pub fn advance(&mut self) {
        self.prev_keys = self.keys.clone();
        self.prev_buttons = self.buttons.clone();
        self.prev_mouse_position = self.mouse_position;
        self.scroll = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_press_edge() {
        let mut state = DeviceState::new();
        state.key_transition(KeyCode::KeyW, ElementState::Pressed);

        assert!(state.is_key_pressed(KeyCode::KeyW));
        assert!(!state.is_key_held(KeyCode::KeyW));
        assert!(!state.is_key_released(KeyCode::KeyW));
    }

    #[test]
    fn test_press_decays_to_held() {
        let mut state = DeviceState::new();
        state.key_transition(KeyCode::KeyW, ElementState::Pressed);
        state.advance();

        assert!(!state.is_key_pressed(KeyCode::KeyW));
        assert!(state.is_key_held(KeyCode::KeyW));
    }

    #[test]
    fn test_release_edge() {
        let mut state = DeviceState::new();
        state.key_transition(KeyCode::KeyW, ElementState::Pressed);
        state.advance();
        state.key_transition(KeyCode::KeyW, ElementState::Released);

        assert!(state.is_key_released(KeyCode::KeyW));
        state.advance();
        assert!(!state.is_key_released(KeyCode::KeyW));
    }

    #[test]
    fn test_press_and_release_within_one_frame() {
        let mut state = DeviceState::new();
        state.key_transition(KeyCode::Space, ElementState::Pressed);
        state.key_transition(KeyCode::Space, ElementState::Released);

        // The per-transition shift makes the release visible as an edge.
        assert!(state.is_key_released(KeyCode::Space));
    }

    #[test]
    fn test_unseen_code_reads_as_up() {
        let state = DeviceState::new();
        assert!(!state.is_key_pressed(KeyCode::F24));
        assert!(!state.is_key_held(KeyCode::F24));
        assert!(!state.is_key_released(KeyCode::F24));
    }

    #[test]
    fn test_mouse_position_last_write_wins() {
        let mut state = DeviceState::new();
        state.set_mouse_position(Vec2::new(10.0, 10.0));
        state.set_mouse_position(Vec2::new(4.0, 7.0));

        assert_eq!(state.mouse_position(), Vec2::new(4.0, 7.0));
        assert_eq!(state.motion_delta(), Vec2::new(4.0, 7.0));
    }

    #[test]
    fn test_scroll_accumulates_then_resets() {
        let mut state = DeviceState::new();
        state.add_scroll(Vec2::new(0.0, 1.0));
        state.add_scroll(Vec2::new(0.0, 0.5));

        assert_eq!(state.scroll_delta(), Vec2::new(0.0, 1.5));
        state.advance();
        assert_eq!(state.scroll_delta(), Vec2::ZERO);
    }
}
