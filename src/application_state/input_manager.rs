//! # Input Manager
//!
//! This module handles input processing for the application:
//! - Mouse button state tracking
//! - Pointer motion and wheel accumulation
//! - Per-frame conversion into a [`ProcessedInputState`]

use std::collections::HashMap;

use winit::event::{ElementState, MouseButton, WindowEvent};

use super::input_state::{scroll_steps, MouseInput, ProcessedInputState, RawInputState};

const MOUSE_BUTTONS: [MouseButton; 3] =
    [MouseButton::Left, MouseButton::Right, MouseButton::Middle];

/// Manages the state of the pointer and processes input events.
pub struct InputManager {
    /// Current state of mouse inputs
    pub mouse_inputs: MouseInput,
}

impl InputManager {
    /// Creates a new InputManager with every tracked button released.
    pub fn new() -> Self {
        let mut mouse_button_inputs_old = HashMap::new();
        let mut mouse_button_inputs_new = HashMap::new();

        for button in MOUSE_BUTTONS {
            mouse_button_inputs_old.insert(button, false);
            mouse_button_inputs_new.insert(button, false);
        }

        let mouse_inputs = MouseInput {
            mouse_button_inputs_old,
            mouse_button_inputs_new,
            mouse_scroll_delta: 0.0,
            mouse_delta: None,
        };

        Self { mouse_inputs }
    }

    /// Updates the old state with the current state to prepare for the next frame.
    pub fn move_old_states(&mut self) {
        for (button, new_state) in self.mouse_inputs.mouse_button_inputs_new.iter() {
            if let Some(old_state) = self.mouse_inputs.mouse_button_inputs_old.get_mut(button) {
                *old_state = *new_state;
            }
        }
    }

    /// Processes a window event and updates internal input state.
    pub fn intake_input(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::MouseWheel { delta, .. } => {
                self.mouse_inputs.mouse_scroll_delta += scroll_steps(*delta);
            }
            WindowEvent::MouseInput { button, state, .. } => {
                let buttons = &mut self.mouse_inputs.mouse_button_inputs_new;
                if let Some(button_state) = buttons.get_mut(button) {
                    *button_state = *state == ElementState::Pressed;
                }
            }
            _ => {}
        }
    }

    /// Accumulates raw pointer motion; several device events may arrive per frame.
    pub fn intake_mouse_motion(&mut self, delta: (f64, f64)) {
        let (x, y) = self.mouse_inputs.mouse_delta.unwrap_or((0.0, 0.0));
        self.mouse_inputs.mouse_delta = Some((x + delta.0, y + delta.1));
    }

    /// Creates a processed input state from the current raw boolean states.
    pub fn create_processed_input_state(&self) -> ProcessedInputState {
        let mouse_button_states = self
            .mouse_inputs
            .mouse_button_inputs_new
            .iter()
            .map(|(button, &new_state)| {
                let old_state = self
                    .mouse_inputs
                    .mouse_button_inputs_old
                    .get(button)
                    .copied()
                    .unwrap_or(false);
                (*button, RawInputState::from_raw_states(old_state, new_state))
            })
            .collect();

        ProcessedInputState {
            mouse_button_states,
            mouse_delta: self.mouse_inputs.mouse_delta,
            scroll_delta: self.mouse_inputs.mouse_scroll_delta,
        }
    }

    /// Returns the processed input state and resets the per-frame accumulators.
    pub fn get_and_reset_processed_input(&mut self) -> Option<ProcessedInputState> {
        let processed_input = Some(self.create_processed_input_state());
        self.move_old_states();
        self.mouse_inputs.mouse_scroll_delta = 0.0;
        self.mouse_inputs.mouse_delta = None;
        processed_input
    }

    /// Releases every button and clears accumulated motion.
    ///
    /// Called when the window loses focus so a drag cannot get stuck.
    pub fn reset_inputs(&mut self) {
        for state in self.mouse_inputs.mouse_button_inputs_new.values_mut() {
            *state = false;
        }
        self.move_old_states();

        self.mouse_inputs.mouse_scroll_delta = 0.0;
        self.mouse_inputs.mouse_delta = None;
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(manager: &mut InputManager, button: MouseButton, pressed: bool) {
        let state = if pressed {
            ElementState::Pressed
        } else {
            ElementState::Released
        };
        if let Some(slot) = manager.mouse_inputs.mouse_button_inputs_new.get_mut(&button) {
            *slot = state == ElementState::Pressed;
        }
    }

    #[test]
    fn press_then_hold_then_release() {
        let mut manager = InputManager::new();

        press(&mut manager, MouseButton::Left, true);
        let first = manager.get_and_reset_processed_input().unwrap();
        assert_eq!(first.get_mouse_button_state(MouseButton::Left), RawInputState::Pressed);

        let second = manager.get_and_reset_processed_input().unwrap();
        assert_eq!(second.get_mouse_button_state(MouseButton::Left), RawInputState::Held);

        press(&mut manager, MouseButton::Left, false);
        let third = manager.get_and_reset_processed_input().unwrap();
        assert_eq!(third.get_mouse_button_state(MouseButton::Left), RawInputState::Released);
    }

    #[test]
    fn motion_accumulates_until_read() {
        let mut manager = InputManager::new();
        manager.intake_mouse_motion((3.0, 1.0));
        manager.intake_mouse_motion((2.0, -4.0));

        let input = manager.get_and_reset_processed_input().unwrap();
        assert_eq!(input.get_mouse_delta(), Some((5.0, -3.0)));

        let next = manager.get_and_reset_processed_input().unwrap();
        assert_eq!(next.get_mouse_delta(), None);
    }

    #[test]
    fn focus_loss_releases_held_buttons() {
        let mut manager = InputManager::new();
        press(&mut manager, MouseButton::Left, true);
        manager.get_and_reset_processed_input();
        manager.intake_mouse_motion((8.0, 0.0));

        manager.reset_inputs();

        let input = manager.get_and_reset_processed_input().unwrap();
        assert!(!input.get_mouse_button_state(MouseButton::Left).is_active());
        assert_eq!(input.get_mouse_delta(), None);
        assert_eq!(input.get_scroll_delta(), 0.0);
    }
}
