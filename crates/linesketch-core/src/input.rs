//! Pointer input state and translation into gesture signals.

use crate::session::Gesture;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Pointer event type for unified mouse/touch handling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    Move {
        position: Point,
    },
}

/// Button that draws lines.
const DRAW_BUTTON: MouseButton = MouseButton::Left;

/// Tracks pointer state across events.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Last pointer position in logical canvas coordinates.
    pub pointer_position: Point,
}

impl InputState {
    /// Create a new input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a pointer event and return the gesture signal it produces, if any.
    ///
    /// Moves are forwarded unconditionally; whether a move means anything is
    /// up to the session receiving it.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) -> Option<Gesture> {
        match event {
            PointerEvent::Down { position, button } => {
                self.pointer_position = position;
                (button == DRAW_BUTTON).then_some(Gesture::Start(position))
            }
            PointerEvent::Up { position, button } => {
                self.pointer_position = position;
                (button == DRAW_BUTTON).then_some(Gesture::End)
            }
            PointerEvent::Move { position } => {
                self.pointer_position = position;
                Some(Gesture::Move(position))
            }
        }
    }
}
