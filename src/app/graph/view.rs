use std::collections::HashSet;
use std::sync::Arc;

use eframe::egui::{self, Align2, Color32, FontId, Sense, Stroke, Ui, vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use super::super::highlight::VisualState;
use super::super::render_utils::{
    circle_visible, dim_color, draw_background, search_match_color, state_colors, world_to_screen,
};
use super::super::{SearchMatchCache, ViewModel};

impl ViewModel {
    fn cached_search_matches(&mut self) -> Option<Arc<HashSet<usize>>> {
        let query = self.search.trim();
        if query.is_empty() {
            return None;
        }

        let generation = self.pipeline.generation();
        if let Some(cached) = &self.search_match_cache
            && cached.generation == generation
            && cached.query == query
        {
            return Some(Arc::clone(&cached.matches));
        }

        let matcher = SkimMatcherV2::default();
        let query_lower = query.to_ascii_lowercase();
        let matches = self
            .pipeline
            .graph()
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| matcher.fuzzy_match(&node.word, &query_lower).is_some())
            .map(|(index, _)| index)
            .collect::<HashSet<_>>();
        let matches = Arc::new(matches);

        self.search_match_cache = Some(SearchMatchCache {
            query: query.to_owned(),
            generation,
            matches: Arc::clone(&matches),
        });

        Some(matches)
    }

    fn update_screen_space(&mut self, rect: egui::Rect) {
        let scratch = &mut self.view_scratch;
        scratch.screen_positions.clear();
        scratch.screen_radii.clear();

        let words = &self.pipeline.graph().nodes;
        for (word, node) in words.iter().zip(self.pipeline.simulation().nodes()) {
            scratch
                .screen_positions
                .push(world_to_screen(rect, self.pan, self.zoom, node.position));
            scratch.screen_radii.push(word.radius * self.zoom);
        }
    }

    fn draw_quadtree_overlay(&mut self, painter: &egui::Painter, rect: egui::Rect) {
        let scratch = &mut self.view_scratch;
        self.pipeline
            .simulation()
            .quadtree_cells(&mut scratch.quadtree_positions, &mut scratch.quadtree_cells);

        for cell in &scratch.quadtree_cells {
            let min = cell.center - vec2(cell.half_extent, cell.half_extent);
            let max = cell.center + vec2(cell.half_extent, cell.half_extent);
            let top_left = world_to_screen(rect, self.pan, self.zoom, vec2(min.x, min.y));
            let top_right = world_to_screen(rect, self.pan, self.zoom, vec2(max.x, min.y));
            let bottom_right = world_to_screen(rect, self.pan, self.zoom, vec2(max.x, max.y));
            let bottom_left = world_to_screen(rect, self.pan, self.zoom, vec2(min.x, max.y));

            let alpha = if cell.is_leaf { 110 } else { 55 };
            let line_width: f32 = (1.4_f32 - (cell.depth as f32 * 0.09_f32)).clamp(0.45_f32, 1.4_f32);
            let stroke = Stroke::new(
                line_width,
                Color32::from_rgba_unmultiplied(106, 198, 255, alpha),
            );

            painter.line_segment([top_left, top_right], stroke);
            painter.line_segment([top_right, bottom_right], stroke);
            painter.line_segment([bottom_right, bottom_left], stroke);
            painter.line_segment([bottom_left, top_left], stroke);
        }
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect, self.pan, self.zoom);

        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pan(&response);

        if self.live_layout && self.pipeline.tick() {
            ui.ctx().request_repaint();
        }

        let pointer = self.pointer_world(ui, rect);
        self.update_hover(pointer);

        if Self::is_file_hovering(ui.ctx()) {
            painter.rect_filled(rect, 0.0, Color32::from_rgba_unmultiplied(103, 196, 255, 24));
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "Drop a text file to load it",
                FontId::proportional(20.0),
                Color32::from_gray(240),
            );
            return;
        }

        if self.pipeline.graph().is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No words to show. Raise the word limit or load another file.",
                FontId::proportional(14.0),
                Color32::from_gray(180),
            );
            return;
        }

        if self.show_quadtree_overlay {
            self.draw_quadtree_overlay(&painter, rect);
        }

        let search_matches = if self.hover.has_highlight() {
            None
        } else {
            self.cached_search_matches()
        };
        let search_active = search_matches.is_some();

        self.update_screen_space(rect);

        if self.hover.has_highlight() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        let graph = Arc::clone(self.pipeline.graph());
        let scratch = &self.view_scratch;

        // Larger bubbles first so small ones stay visible on top.
        let mut draw_order = (0..scratch.screen_positions.len()).collect::<Vec<_>>();
        draw_order.sort_by(|a, b| scratch.screen_radii[*b].total_cmp(&scratch.screen_radii[*a]));

        for index in draw_order {
            let position = scratch.screen_positions[index];
            let radius = scratch.screen_radii[index];
            if !circle_visible(rect, position, radius.max(24.0)) {
                continue;
            }

            let state = self.hover.state(index);
            let (mut fill, mut label_color) = state_colors(state);
            if let Some(matches) = &search_matches {
                if matches.contains(&index) {
                    fill = search_match_color(fill);
                } else {
                    fill = dim_color(fill, 0.38);
                    label_color = dim_color(label_color, 0.5);
                }
            } else if self.hover.has_highlight() && state == VisualState::Plain {
                fill = dim_color(fill, 0.6);
                label_color = dim_color(label_color, 0.6);
            }

            if radius > 0.0 {
                painter.circle_filled(position, radius, fill);
                painter.circle_stroke(
                    position,
                    radius,
                    Stroke::new(1.0, Color32::from_rgba_unmultiplied(15, 15, 15, 190)),
                );
            }

            let is_emphasised = state != VisualState::Plain
                || search_matches
                    .as_ref()
                    .is_some_and(|matches| matches.contains(&index));
            let font_size = (11.0 + radius * 0.25).clamp(10.0, 22.0);
            if is_emphasised || radius > 6.0 || self.zoom > 1.35 || !search_active {
                painter.text(
                    position,
                    Align2::CENTER_CENTER,
                    graph.nodes[index].word.as_str(),
                    FontId::proportional(font_size),
                    label_color,
                );
            }
        }

        if let Some(index) = self.hover.hovered
            && let Some(node) = graph.nodes.get(index)
        {
            let followers = graph
                .adjacency
                .get(&node.word)
                .map(|followers| followers.len())
                .unwrap_or(0);
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                format!("{}  |  count {}  |  followed by {followers}", node.word, node.count),
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }
    }
}
