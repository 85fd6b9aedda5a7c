//! Renderer trait abstraction.

use kurbo::{Affine, BezPath};
use linesketch_core::model::Model;
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The model to render.
    pub model: &'a Model,
    /// Device pixel ratio (for HiDPI). Model coordinates are logical pixels.
    pub scale_factor: f64,
    /// Color of line strokes.
    pub stroke_color: Color,
    /// Width of line strokes in logical pixels.
    pub stroke_width: f64,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(model: &'a Model) -> Self {
        Self {
            model,
            scale_factor: 1.0,
            stroke_color: Color::from_rgba8(0, 0, 0, 255),
            stroke_width: 1.0,
        }
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Set the stroke color and width.
    pub fn with_stroke(mut self, color: Color, width: f64) -> Self {
        self.stroke_color = color;
        self.stroke_width = width;
        self
    }

    /// Transform from model (logical) coordinates to surface pixels.
    pub fn transform(&self) -> Affine {
        Affine::scale(self.scale_factor)
    }
}

/// A drawing target that can be wiped and stroked.
pub trait Surface {
    /// Drop everything drawn so far.
    fn clear(&mut self);

    /// Stroke an open polyline.
    fn stroke_polyline(&mut self, path: &BezPath, transform: Affine, color: Color, width: f64);
}

/// Redraw the whole model: clear, then one polyline per line in model order.
///
/// Lines without points are skipped.
pub fn draw_model<S: Surface + ?Sized>(surface: &mut S, ctx: &RenderContext) {
    surface.clear();

    let transform = ctx.transform();
    for line in ctx.model.lines() {
        if line.is_empty() {
            continue;
        }
        surface.stroke_polyline(&line.to_path(), transform, ctx.stroke_color, ctx.stroke_width);
    }
}

/// Trait for rendering backends.
///
/// Implementations can use Vello, wgpu directly, or other rendering engines.
pub trait Renderer: Send + Sync {
    /// Build the scene/command buffer for a frame.
    ///
    /// This method is called once per frame and should prepare all drawing commands.
    fn build_scene(&mut self, ctx: &RenderContext);
}
