//! UI components using egui.

use egui::{Color32, Context, Frame, Margin, RichText, Stroke};
use linesketch_core::summary::Summary;

/// Panel background.
const PANEL_BG: Color32 = Color32::from_rgba_premultiplied(250, 250, 252, 250);
/// Panel border.
const BORDER: Color32 = Color32::from_rgb(220, 220, 220);
/// Heading text.
const TEXT: Color32 = Color32::from_rgb(60, 60, 60);
/// Per-line entries.
const TEXT_MUTED: Color32 = Color32::from_rgb(120, 120, 120);

/// Render all UI for a frame.
pub fn render_ui(ctx: &Context, summary: &Summary, panel_width: f32) {
    render_lines_panel(ctx, summary, panel_width);
}

/// Frame of the side panel.
fn panel_frame() -> Frame {
    Frame::new()
        .fill(PANEL_BG)
        .stroke(Stroke::new(1.0, BORDER))
        .inner_margin(Margin::same(8))
}

/// Right side panel listing the line count and every line's coordinates.
///
/// Returns the screen area the panel occupies.
fn render_lines_panel(ctx: &Context, summary: &Summary, panel_width: f32) -> egui::Rect {
    egui::SidePanel::right(egui::Id::new("lines_panel"))
        .resizable(false)
        .exact_width(panel_width)
        .frame(panel_frame())
        .show(ctx, |ui| {
            ui.label(RichText::new(summary.header()).size(13.0).color(TEXT).strong());

            if summary.lines.is_empty() {
                return;
            }

            ui.add_space(4.0);
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    for line in &summary.lines {
                        ui.add(
                            egui::Label::new(
                                RichText::new(line.to_string()).size(11.0).color(TEXT_MUTED),
                            )
                            .wrap(),
                        );
                    }
                });
        })
        .response
        .rect
}

#[cfg(test)]
mod tests {
    use super::*;
    use linesketch_core::{Gesture, SketchSession};

    fn run_panel(summary: &Summary, panel_width: f32) -> egui::Rect {
        let ctx = Context::default();
        let input = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(800.0, 600.0),
            )),
            ..Default::default()
        };

        let mut panel_rect = egui::Rect::NOTHING;
        let _ = ctx.run(input, |ctx| {
            panel_rect = render_lines_panel(ctx, summary, panel_width);
        });
        panel_rect
    }

    #[test]
    fn test_lines_panel_is_docked_right() {
        let rect = run_panel(&Summary::default(), 280.0);

        assert!((rect.right() - 800.0).abs() < 1.0);
        assert!((rect.width() - 280.0).abs() < 1.0);
        assert!(rect.top().abs() < 1.0);
        assert!((rect.bottom() - 600.0).abs() < 1.0);
    }

    #[test]
    fn test_lines_panel_width_ignores_content() {
        let mut session = SketchSession::new();
        for i in 0..20 {
            let x = i as f64 * 1000.0;
            session.handle(Gesture::Start(kurbo::Point::new(x, x)));
            session.handle(Gesture::Move(kurbo::Point::new(x + 0.125, x + 0.5)));
            session.handle(Gesture::End);
        }
        let summary = Summary::from_model(session.model());

        let rect = run_panel(&summary, 200.0);
        assert!((rect.width() - 200.0).abs() < 1.0);
    }
}
