//! Trigger conditions for input actions
//!
//! A [`Binding`] is a single predicate over device state. Key and mouse
//! button bindings test an edge event against the current/previous snapshot
//! pair; motion and scroll bindings test per-axis thresholds against the
//! frame's deltas; composite bindings AND several sub-bindings together.

use glam::Vec2;
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

use super::state::DeviceState;

/// Transition kind derived from the current/previous state pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeEvent {
    /// Down this frame, up the previous one
    Pressed,
    /// Down this frame and the previous one
    Held,
    /// Up this frame, down the previous one
    Released,
}

/// A single trigger condition for an action
#[derive(Debug, Clone)]
pub enum Binding {
    /// A key transition
    Key { code: KeyCode, event: EdgeEvent },
    /// A mouse button transition
    MouseButton {
        button: MouseButton,
        event: EdgeEvent,
    },
    /// Mouse movement past a per-axis threshold. A zero threshold disables
    /// that axis; with both axes zero the binding never fires.
    MouseMotion { threshold: Vec2 },
    /// Accumulated scroll past a per-axis threshold, same axis rules
    MouseScroll { threshold: Vec2 },
    /// All sub-bindings must hold simultaneously
    Composite(Vec<Binding>),
}

impl Binding {
    /// Key binding for the given edge event
    pub fn key(code: KeyCode, event: EdgeEvent) -> Self {
        Self::Key { code, event }
    }

    /// Mouse button binding for the given edge event
    pub fn mouse_button(button: MouseButton, event: EdgeEvent) -> Self {
        Self::MouseButton { button, event }
    }

    /// Mouse motion binding with per-axis thresholds
    pub fn mouse_motion(threshold_x: f32, threshold_y: f32) -> Self {
        Self::MouseMotion {
            threshold: Vec2::new(threshold_x, threshold_y),
        }
    }

    /// Scroll binding with per-axis thresholds
    pub fn mouse_scroll(threshold_x: f32, threshold_y: f32) -> Self {
        Self::MouseScroll {
            threshold: Vec2::new(threshold_x, threshold_y),
        }
    }

    /// Composite binding over several sub-bindings (logical AND)
    pub fn composite(bindings: impl Into<Vec<Binding>>) -> Self {
        Self::Composite(bindings.into())
    }

    /// Evaluate this binding against the given device state
    pub fn is_met(&self, state: &DeviceState) -> bool {
        match self {
            Self::Key { code, event } => match event {
                EdgeEvent::Pressed => state.is_key_pressed(*code),
                EdgeEvent::Held => state.is_key_held(*code),
                EdgeEvent::Released => state.is_key_released(*code),
            },
            Self::MouseButton { button, event } => match event {
                EdgeEvent::Pressed => state.is_mouse_button_pressed(*button),
                EdgeEvent::Held => state.is_mouse_button_held(*button),
                EdgeEvent::Released => state.is_mouse_button_released(*button),
            },
            Self::MouseMotion { threshold } => threshold_met(state.motion_delta(), *threshold),
            Self::MouseScroll { threshold } => threshold_met(state.scroll_delta(), *threshold),
            Self::Composite(bindings) => bindings.iter().all(|b| b.is_met(state)),
        }
    }
}

/// Per-axis threshold test. An axis with a zero threshold is not considered.
fn threshold_met(delta: Vec2, threshold: Vec2) -> bool {
    (threshold.x > 0.0 && delta.x.abs() >= threshold.x)
        || (threshold.y > 0.0 && delta.y.abs() >= threshold.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::event::ElementState;

    #[test]
    fn test_key_binding_edges() {
        let mut state = DeviceState::new();
        state.key_transition(KeyCode::KeyW, ElementState::Pressed);

        assert!(Binding::key(KeyCode::KeyW, EdgeEvent::Pressed).is_met(&state));
        assert!(!Binding::key(KeyCode::KeyW, EdgeEvent::Held).is_met(&state));

        state.advance();
        assert!(!Binding::key(KeyCode::KeyW, EdgeEvent::Pressed).is_met(&state));
        assert!(Binding::key(KeyCode::KeyW, EdgeEvent::Held).is_met(&state));
    }

    #[test]
    fn test_motion_threshold_per_axis() {
        let mut state = DeviceState::new();
        state.set_mouse_position(glam::Vec2::new(4.0, 100.0));

        // Only the X axis is considered; a delta of (4, 100) stays below it.
        let binding = Binding::mouse_motion(5.0, 0.0);
        assert!(!binding.is_met(&state));

        state.advance();
        state.set_mouse_position(glam::Vec2::new(9.0, 100.0));
        assert!(binding.is_met(&state));
    }

    #[test]
    fn test_zero_thresholds_never_fire() {
        let mut state = DeviceState::new();
        state.set_mouse_position(glam::Vec2::new(50.0, 50.0));
        state.add_scroll(glam::Vec2::new(3.0, 3.0));

        assert!(!Binding::mouse_motion(0.0, 0.0).is_met(&state));
        assert!(!Binding::mouse_scroll(0.0, 0.0).is_met(&state));
    }

    #[test]
    fn test_scroll_threshold() {
        let mut state = DeviceState::new();
        state.add_scroll(glam::Vec2::new(0.0, -1.0));

        // Threshold tests magnitude, so scrolling either way fires.
        assert!(Binding::mouse_scroll(0.0, 0.5).is_met(&state));
        assert!(!Binding::mouse_scroll(0.5, 0.0).is_met(&state));
    }

    #[test]
    fn test_composite_requires_all() {
        let mut state = DeviceState::new();
        state.key_transition(KeyCode::KeyW, ElementState::Pressed);
        state.advance();

        let both = Binding::composite(vec![
            Binding::key(KeyCode::KeyW, EdgeEvent::Held),
            Binding::key(KeyCode::ShiftLeft, EdgeEvent::Held),
        ]);
        assert!(!both.is_met(&state));

        state.key_transition(KeyCode::ShiftLeft, ElementState::Pressed);
        state.advance();
        assert!(both.is_met(&state));
    }
}
