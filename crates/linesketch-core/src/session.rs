//! Gesture-driven interaction session.
//!
//! A gesture is one press, any number of moves and one release. The press
//! registers a new line straight away, moves append points to it, and the
//! release only returns the session to idle.

use crate::model::{LineId, Model};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Interaction signal coming from the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Gesture {
    /// Pointer pressed at a position.
    Start(Point),
    /// Pointer moved to a position.
    Move(Point),
    /// Pointer released.
    End,
}

/// Whether a gesture is in progress, and which line it is drawing into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GestureState {
    #[default]
    Idle,
    Drawing {
        active_line: LineId,
    },
}

impl GestureState {
    /// The line being drawn, if any.
    pub fn active_line(&self) -> Option<LineId> {
        match self {
            GestureState::Idle => None,
            GestureState::Drawing { active_line } => Some(*active_line),
        }
    }
}

/// Result of applying one gesture signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct Step {
    /// State to carry into the next signal.
    pub state: GestureState,
    /// Whether the surface should be redrawn.
    pub redraw: bool,
}

/// Apply a gesture signal to the model.
///
/// A move with no gesture in progress is ignored.
pub fn apply_gesture(model: &mut Model, state: GestureState, gesture: Gesture) -> Step {
    match gesture {
        Gesture::Start(position) => {
            let mut line = model.create_line();
            let point = model.create_point(position.x, position.y);
            line.add_point(point);
            let active_line = line.id();
            model.add_line(line);
            log::debug!("Started line {} at ({}, {})", active_line, position.x, position.y);
            Step {
                state: GestureState::Drawing { active_line },
                redraw: false,
            }
        }
        Gesture::Move(position) => {
            let GestureState::Drawing { active_line } = state else {
                log::trace!("Ignoring move to ({}, {}) with no active line", position.x, position.y);
                return Step {
                    state,
                    redraw: false,
                };
            };

            let Some(point) = model.append_point(active_line, position.x, position.y) else {
                log::warn!("Active line {} is not registered; ending gesture", active_line);
                return Step {
                    state: GestureState::Idle,
                    redraw: false,
                };
            };
            log::trace!("Line {}: appended point {}", active_line, point.id());
            Step {
                state,
                redraw: true,
            }
        }
        Gesture::End => {
            if let Some(line) = state.active_line() {
                log::debug!("Ended line {}", line);
            }
            Step {
                state: GestureState::Idle,
                redraw: false,
            }
        }
    }
}

/// A model together with the gesture state of the pointer drawing into it.
#[derive(Debug, Clone, Default)]
pub struct SketchSession {
    model: Model,
    state: GestureState,
}

impl SketchSession {
    /// Create a session over an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a gesture signal. Returns true when the surface should be redrawn.
    pub fn handle(&mut self, gesture: Gesture) -> bool {
        let step = apply_gesture(&mut self.model, self.state, gesture);
        self.state = step.state;
        step.redraw
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Check if a gesture is in progress.
    pub fn is_drawing(&self) -> bool {
        matches!(self.state, GestureState::Drawing { .. })
    }

    /// The line currently being drawn.
    pub fn active_line(&self) -> Option<LineId> {
        self.state.active_line()
    }
}
