//! LineSketch Application
//!
//! The application shell providing windowing, input handling,
//! and integration of the sketch model with the renderer.

mod app;
mod ui;

pub use app::{App, AppConfig};
pub use ui::render_ui;

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::run_wasm;
