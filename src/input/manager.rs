//! Input-action dispatcher
//!
//! Maps raw device events to named, rebindable actions. The window layer
//! feeds transitions in as they arrive; the host loop calls
//! [`InputManager::process_frame`] exactly once per frame, which evaluates
//! every active action's bindings against the current/previous snapshots,
//! runs the callbacks of triggered actions, and advances the snapshots.

use glam::Vec2;
use rustc_hash::FxHashMap;
use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

use super::binding::Binding;
use super::state::DeviceState;

/// Read-only view of the frame's pointer state, handed to every callback.
///
/// Callbacks cannot re-enter the manager while it is dispatching, so the
/// values they would otherwise query are snapshotted here.
#[derive(Debug, Clone, Copy)]
pub struct InputFrame {
    /// Current mouse position
    pub mouse_position: Vec2,
    /// Mouse movement since the previous frame
    pub motion_delta: Vec2,
    /// Scroll delta accumulated this frame
    pub scroll_delta: Vec2,
}

/// Callback invoked when an action triggers
pub type ActionCallback = Box<dyn FnMut(&InputFrame)>;

/// A named, toggle-able set of bindings plus callbacks
struct InputAction {
    /// Inactive actions are skipped during evaluation
    active: bool,
    /// Any one satisfied binding triggers the action
    bindings: Vec<Binding>,
    /// Invoked in registration order when the action triggers
    callbacks: Vec<ActionCallback>,
}

impl InputAction {
    fn new() -> Self {
        Self {
            active: true,
            bindings: Vec::new(),
            callbacks: Vec::new(),
        }
    }
}

/// Configuration errors reported by the registration API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// The action name is already registered
    DuplicateAction(String),
    /// No action is registered under the name
    UnknownAction(String),
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateAction(name) => write!(f, "action '{name}' is already registered"),
            Self::UnknownAction(name) => write!(f, "no action registered under '{name}'"),
        }
    }
}

impl std::error::Error for InputError {}

/// Owns the device-state snapshots and the action registry
#[derive(Default)]
pub struct InputManager {
    state: DeviceState,
    actions: FxHashMap<String, InputAction>,
}

impl InputManager {
    /// Create an empty input manager
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Raw device updates (one call per OS event, from the window layer)
    // ------------------------------------------------------------------

    /// Record a raw key transition
    pub fn key_transition(&mut self, code: KeyCode, state: ElementState) {
        self.state.key_transition(code, state);
    }

    /// Record a raw mouse button transition
    pub fn mouse_button_transition(&mut self, button: MouseButton, state: ElementState) {
        self.state.mouse_button_transition(button, state);
    }

    /// Overwrite the current mouse position
    pub fn set_mouse_position(&mut self, position: Vec2) {
        self.state.set_mouse_position(position);
    }

    /// Accumulate a scroll event into the frame's delta
    pub fn add_scroll(&mut self, delta: Vec2) {
        self.state.add_scroll(delta);
    }

    // ------------------------------------------------------------------
    // Action registration
    // ------------------------------------------------------------------

    /// Register an empty, active action under `name`.
    ///
    /// Fails with [`InputError::DuplicateAction`] if the name is taken; the
    /// existing registration is left untouched.
    pub fn register_action(&mut self, name: impl Into<String>) -> Result<(), InputError> {
        let name = name.into();
        if self.actions.contains_key(&name) {
            return Err(InputError::DuplicateAction(name));
        }
        self.actions.insert(name, InputAction::new());
        Ok(())
    }

    /// Register an action with one binding and one callback attached
    pub fn register_action_with(
        &mut self,
        name: impl Into<String>,
        binding: Binding,
        callback: impl FnMut(&InputFrame) + 'static,
    ) -> Result<(), InputError> {
        let name = name.into();
        self.register_action(name.clone())?;
        self.add_binding(&name, binding)?;
        self.add_callback(&name, callback)
    }

    /// Append a binding to a registered action
    pub fn add_binding(&mut self, name: &str, binding: Binding) -> Result<(), InputError> {
        let action = self
            .actions
            .get_mut(name)
            .ok_or_else(|| InputError::UnknownAction(name.to_string()))?;
        action.bindings.push(binding);
        Ok(())
    }

    /// Append a callback to a registered action
    pub fn add_callback(
        &mut self,
        name: &str,
        callback: impl FnMut(&InputFrame) + 'static,
    ) -> Result<(), InputError> {
        let action = self
            .actions
            .get_mut(name)
            .ok_or_else(|| InputError::UnknownAction(name.to_string()))?;
        action.callbacks.push(Box::new(callback));
        Ok(())
    }

    /// Enable or disable an action's evaluation
    pub fn set_active(&mut self, name: &str, active: bool) -> Result<(), InputError> {
        let action = self
            .actions
            .get_mut(name)
            .ok_or_else(|| InputError::UnknownAction(name.to_string()))?;
        action.active = active;
        Ok(())
    }

    /// Number of registered actions
    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    // ------------------------------------------------------------------
    // Per-frame evaluation
    // ------------------------------------------------------------------

    /// Evaluate all active actions and run triggered callbacks, then advance
    /// the snapshots for the next frame.
    ///
    /// Must be called exactly once per frame, after OS events have been
    /// polled. Callbacks run synchronously on the calling thread; a panic in
    /// a callback propagates to the caller.
    pub fn process_frame(&mut self) {
        let frame = InputFrame {
            mouse_position: self.state.mouse_position(),
            motion_delta: self.state.motion_delta(),
            scroll_delta: self.state.scroll_delta(),
        };

        let state = &self.state;
        for action in self.actions.values_mut() {
            if !action.active {
                continue;
            }
            if action.bindings.iter().any(|b| b.is_met(state)) {
                for callback in &mut action.callbacks {
                    callback(&frame);
                }
            }
        }

        self.state.advance();
    }

    // ------------------------------------------------------------------
    // Direct state queries
    // ------------------------------------------------------------------

    /// Key went down this frame
    pub fn is_key_pressed(&self, code: KeyCode) -> bool {
        self.state.is_key_pressed(code)
    }

    /// Key is down this frame and the previous one
    pub fn is_key_held(&self, code: KeyCode) -> bool {
        self.state.is_key_held(code)
    }

    /// Key went up this frame
    pub fn is_key_released(&self, code: KeyCode) -> bool {
        self.state.is_key_released(code)
    }

    /// Mouse button went down this frame
    pub fn is_mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.state.is_mouse_button_pressed(button)
    }

    /// Mouse button is down this frame and the previous one
    pub fn is_mouse_button_held(&self, button: MouseButton) -> bool {
        self.state.is_mouse_button_held(button)
    }

    /// Mouse button went up this frame
    pub fn is_mouse_button_released(&self, button: MouseButton) -> bool {
        self.state.is_mouse_button_released(button)
    }

    /// Current mouse position
    pub fn mouse_position(&self) -> Vec2 {
        self.state.mouse_position()
    }

    /// Mouse movement since the previous frame
    pub fn motion_delta(&self) -> Vec2 {
        self.state.motion_delta()
    }

    /// Scroll delta accumulated this frame
    pub fn scroll_delta(&self) -> Vec2 {
        self.state.scroll_delta()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::EdgeEvent;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counter() -> (Rc<Cell<u32>>, impl FnMut(&InputFrame)) {
        let count = Rc::new(Cell::new(0));
        let inner = Rc::clone(&count);
        (count, move |_: &InputFrame| inner.set(inner.get() + 1))
    }

    #[test]
    fn test_pressed_fires_exactly_once() {
        let mut input = InputManager::new();
        let (count, cb) = counter();
        input
            .register_action_with("jump", Binding::key(KeyCode::Space, EdgeEvent::Pressed), cb)
            .unwrap();

        input.key_transition(KeyCode::Space, ElementState::Pressed);
        input.process_frame();
        assert_eq!(count.get(), 1);

        // No further transition: the key is now held, not freshly pressed.
        input.process_frame();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_held_fires_every_frame_until_release() {
        let mut input = InputManager::new();
        let (count, cb) = counter();
        input
            .register_action_with("run", Binding::key(KeyCode::KeyW, EdgeEvent::Held), cb)
            .unwrap();

        input.key_transition(KeyCode::KeyW, ElementState::Pressed);
        input.process_frame(); // pressed, not held yet
        assert_eq!(count.get(), 0);

        input.process_frame();
        input.process_frame();
        assert_eq!(count.get(), 2);

        input.key_transition(KeyCode::KeyW, ElementState::Released);
        input.process_frame();
        input.process_frame();
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_released_edge() {
        let mut input = InputManager::new();
        let (count, cb) = counter();
        input
            .register_action_with(
                "fire",
                Binding::key(KeyCode::KeyE, EdgeEvent::Released),
                cb,
            )
            .unwrap();

        input.key_transition(KeyCode::KeyE, ElementState::Pressed);
        input.process_frame();
        input.key_transition(KeyCode::KeyE, ElementState::Released);
        input.process_frame();
        assert_eq!(count.get(), 1);

        input.process_frame();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_motion_threshold_action() {
        let mut input = InputManager::new();
        let (count, cb) = counter();
        input
            .register_action_with("look", Binding::mouse_motion(5.0, 0.0), cb)
            .unwrap();

        input.set_mouse_position(Vec2::new(4.0, 100.0));
        input.process_frame();
        assert_eq!(count.get(), 0);

        input.set_mouse_position(Vec2::new(9.0, 100.0));
        input.process_frame();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_composite_held_pair() {
        let mut input = InputManager::new();
        let (count, cb) = counter();
        input
            .register_action_with(
                "sprint",
                Binding::composite(vec![
                    Binding::key(KeyCode::KeyW, EdgeEvent::Held),
                    Binding::key(KeyCode::ShiftLeft, EdgeEvent::Held),
                ]),
                cb,
            )
            .unwrap();

        input.key_transition(KeyCode::KeyW, ElementState::Pressed);
        input.process_frame();
        input.process_frame(); // W held, shift up
        assert_eq!(count.get(), 0);

        input.key_transition(KeyCode::ShiftLeft, ElementState::Pressed);
        input.process_frame(); // shift pressed, not yet held
        input.process_frame(); // both held
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_scroll_accumulation_and_reset() {
        let mut input = InputManager::new();
        input.add_scroll(Vec2::new(0.0, 1.0));
        input.add_scroll(Vec2::new(0.0, 0.5));
        assert_eq!(input.scroll_delta(), Vec2::new(0.0, 1.5));

        input.process_frame();
        assert_eq!(input.scroll_delta(), Vec2::ZERO);
    }

    #[test]
    fn test_callbacks_run_in_registration_order() {
        let mut input = InputManager::new();
        let order = Rc::new(std::cell::RefCell::new(Vec::new()));
        input.register_action("multi").unwrap();
        input
            .add_binding("multi", Binding::key(KeyCode::KeyQ, EdgeEvent::Pressed))
            .unwrap();
        for i in 0..3 {
            let order = Rc::clone(&order);
            input
                .add_callback("multi", move |_| order.borrow_mut().push(i))
                .unwrap();
        }

        input.key_transition(KeyCode::KeyQ, ElementState::Pressed);
        input.process_frame();
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut input = InputManager::new();
        let (count, cb) = counter();
        input
            .register_action_with("quit", Binding::key(KeyCode::Escape, EdgeEvent::Pressed), cb)
            .unwrap();

        let err = input.register_action("quit").unwrap_err();
        assert_eq!(err, InputError::DuplicateAction("quit".to_string()));

        // The first registration's binding still works.
        input.key_transition(KeyCode::Escape, ElementState::Pressed);
        input.process_frame();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_unknown_action_is_reported_not_fatal() {
        let mut input = InputManager::new();
        assert!(matches!(
            input.add_binding("nope", Binding::key(KeyCode::KeyA, EdgeEvent::Pressed)),
            Err(InputError::UnknownAction(_))
        ));
        assert!(input.add_callback("nope", |_| {}).is_err());
        assert!(input.set_active("nope", false).is_err());
        assert_eq!(input.action_count(), 0);
    }

    #[test]
    fn test_inactive_action_is_skipped() {
        let mut input = InputManager::new();
        let (count, cb) = counter();
        input
            .register_action_with("pause", Binding::key(KeyCode::KeyP, EdgeEvent::Pressed), cb)
            .unwrap();
        input.set_active("pause", false).unwrap();

        input.key_transition(KeyCode::KeyP, ElementState::Pressed);
        input.process_frame();
        assert_eq!(count.get(), 0);

        input.set_active("pause", true).unwrap();
        input.key_transition(KeyCode::KeyP, ElementState::Released);
        input.key_transition(KeyCode::KeyP, ElementState::Pressed);
        input.process_frame();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_or_across_bindings_fires_once() {
        let mut input = InputManager::new();
        let (count, cb) = counter();
        input
            .register_action_with(
                "forward",
                Binding::key(KeyCode::KeyW, EdgeEvent::Pressed),
                cb,
            )
            .unwrap();
        input
            .add_binding("forward", Binding::key(KeyCode::ArrowUp, EdgeEvent::Pressed))
            .unwrap();

        // Both bindings satisfied in the same frame still trigger once.
        input.key_transition(KeyCode::KeyW, ElementState::Pressed);
        input.key_transition(KeyCode::ArrowUp, ElementState::Pressed);
        input.process_frame();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_callbacks_see_frame_snapshot() {
        let mut input = InputManager::new();
        let seen = Rc::new(Cell::new(Vec2::ZERO));
        let inner = Rc::clone(&seen);
        input
            .register_action_with("zoom", Binding::mouse_scroll(0.0, 0.1), move |frame| {
                inner.set(frame.scroll_delta)
            })
            .unwrap();

        input.add_scroll(Vec2::new(0.0, -2.0));
        input.process_frame();
        assert_eq!(seen.get(), Vec2::new(0.0, -2.0));
    }
}
