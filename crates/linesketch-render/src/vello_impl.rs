//! Vello-based renderer implementation.

use crate::renderer::{RenderContext, Renderer, Surface, draw_model};
use kurbo::{Affine, BezPath, Cap, Join, Stroke};
use peniko::Color;
use vello::Scene;

/// Vello-based renderer for GPU-accelerated 2D graphics.
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
    /// Number of polylines stroked into the current scene.
    stroke_count: usize,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    /// Create a new renderer with an empty scene.
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            stroke_count: 0,
        }
    }

    /// Get the built scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Number of polylines in the current scene.
    pub fn stroke_count(&self) -> usize {
        self.stroke_count
    }
}

impl Surface for VelloRenderer {
    fn clear(&mut self) {
        self.scene.reset();
        self.stroke_count = 0;
    }

    fn stroke_polyline(&mut self, path: &BezPath, transform: Affine, color: Color, width: f64) {
        // Round joins and caps match the look of a 2D canvas freehand stroke.
        let stroke = Stroke::new(width).with_join(Join::Round).with_caps(Cap::Round);
        self.scene.stroke(&stroke, transform, color, None, path);
        self.stroke_count += 1;
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        draw_model(self, ctx);
        log::trace!(
            "Built scene with {} polylines for {} lines",
            self.stroke_count,
            ctx.model.line_count()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linesketch_core::{Gesture, SketchSession};

    fn session_with_two_lines() -> SketchSession {
        let mut session = SketchSession::new();
        session.handle(Gesture::Start(kurbo::Point::new(0.0, 0.0)));
        session.handle(Gesture::Move(kurbo::Point::new(10.0, 10.0)));
        session.handle(Gesture::End);
        session.handle(Gesture::Start(kurbo::Point::new(20.0, 20.0)));
        session.handle(Gesture::End);
        session
    }

    #[test]
    fn test_build_scene_strokes_every_line() {
        let session = session_with_two_lines();
        let ctx = RenderContext::new(session.model());
        let mut renderer = VelloRenderer::new();

        renderer.build_scene(&ctx);
        assert_eq!(renderer.stroke_count(), 2);

        // A rebuild starts from a cleared scene.
        renderer.build_scene(&ctx);
        assert_eq!(renderer.stroke_count(), 2);
    }

    #[test]
    fn test_clear_drops_strokes() {
        let session = session_with_two_lines();
        let ctx = RenderContext::new(session.model());
        let mut renderer = VelloRenderer::new();

        renderer.build_scene(&ctx);
        renderer.clear();
        assert_eq!(renderer.stroke_count(), 0);
    }
}
