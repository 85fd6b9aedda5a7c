//! LineSketch Core Library
//!
//! Platform-agnostic data model and gesture handling for the LineSketch
//! drawing tool.

pub mod input;
pub mod model;
pub mod session;
pub mod summary;

pub use input::{InputState, MouseButton, PointerEvent};
pub use model::{Line, LineId, Model, ModelError, Point, PointId};
pub use session::{Gesture, GestureState, SketchSession, Step, apply_gesture};
pub use summary::{LineSummary, Summary};
