use std::path::PathBuf;

use eframe::egui::{self, Context, Rect, Ui, Vec2};
use tracing::debug;

use super::super::ViewModel;
use super::super::render_utils::screen_to_world;

/// Buttons that pan the canvas when dragged.
const PAN_BUTTONS: [egui::PointerButton; 2] =
    [egui::PointerButton::Secondary, egui::PointerButton::Middle];

impl ViewModel {
    pub(in crate::app) fn handle_graph_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let world_before = screen_to_world(rect, self.pan, self.zoom, pointer);

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.zoom = (self.zoom * zoom_factor).clamp(0.05, 8.0);
        self.pan = pointer - rect.center() - (world_before * self.zoom);
    }

    pub(in crate::app) fn handle_graph_pan(&mut self, response: &egui::Response) {
        if PAN_BUTTONS
            .iter()
            .any(|button| response.dragged_by(*button))
        {
            self.pan += response.drag_delta();
        }
    }

    /// Pointer position in layout coordinates, if it is over the canvas.
    pub(in crate::app) fn pointer_world(&self, ui: &Ui, rect: Rect) -> Option<Vec2> {
        ui.input(|input| input.pointer.hover_pos())
            .filter(|pointer| rect.contains(*pointer))
            .map(|pointer| screen_to_world(rect, self.pan, self.zoom, pointer))
    }

    /// Reclassifies every bubble against the pointer. The hit radius is fixed in screen pixels.
    pub(in crate::app) fn update_hover(&mut self, pointer: Option<Vec2>) {
        let hit_radius = self.hover_radius / self.zoom.max(f32::EPSILON);
        let hover = self.pipeline.classify(pointer, hit_radius);

        if hover.hovered != self.hover.hovered {
            let word = hover
                .hovered
                .and_then(|index| self.pipeline.graph().nodes.get(index))
                .map(|node| node.word.as_str());
            debug!(?word, "hover target changed");
            self.related_rows_visible = Self::INITIAL_RELATED_ROWS;
        }
        self.hover = hover;
    }

    /// Moves the view so the bubble at `index` sits in the middle of the canvas.
    pub(in crate::app) fn focus_node(&mut self, index: usize) {
        if let Some(node) = self.pipeline.simulation().nodes().get(index) {
            self.pan = -node.position * self.zoom;
        }
    }

    pub(in crate::app) fn dropped_file(ctx: &Context) -> Option<PathBuf> {
        ctx.input(|input| {
            input
                .raw
                .dropped_files
                .iter()
                .find_map(|file| file.path.clone())
        })
    }

    pub(in crate::app) fn is_file_hovering(ctx: &Context) -> bool {
        ctx.input(|input| !input.raw.hovered_files.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_button_does_not_pan() {
        assert!(!PAN_BUTTONS.contains(&egui::PointerButton::Primary));
        assert!(PAN_BUTTONS.contains(&egui::PointerButton::Secondary));
        assert!(PAN_BUTTONS.contains(&egui::PointerButton::Middle));
    }
}
