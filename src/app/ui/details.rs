use std::sync::Arc;

use eframe::egui::{self, RichText, Ui};

use super::super::ViewModel;
use super::super::highlight::{VisualState, related_tier};

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Word Details");
        ui.add_space(6.0);

        let graph = Arc::clone(self.pipeline.graph());
        let Some(index) = self.hover.hovered else {
            ui.label("Hover a bubble to see the words that follow it.");
            return;
        };
        let Some(node) = graph.nodes.get(index) else {
            return;
        };

        ui.label(RichText::new(node.word.as_str()).strong());
        ui.add_space(6.0);
        ui.label(format!("Occurrences: {}", node.count));
        ui.label(format!("Bubble radius: {:.2}", node.radius));
        ui.label(format!("Class: {}", VisualState::Selected.class_name()));

        ui.separator();
        ui.label(RichText::new("Followed by").strong());

        let Some(followers) = graph.adjacency.get(&node.word) else {
            ui.label("No shown word directly follows this one.");
            return;
        };

        let followers = followers.iter().collect::<Vec<_>>();
        let row_count = followers.len().min(self.related_rows_visible);
        let mut should_load_more = false;
        let mut focus = None;

        egui::ScrollArea::vertical()
            .id_salt("related_words_scroll")
            .max_height(320.0)
            .auto_shrink([false, false])
            .show_rows(ui, 22.0, row_count, |ui, row_range| {
                if row_range.end + Self::RELATED_PREFETCH_MARGIN >= row_count {
                    should_load_more = true;
                }

                for row in row_range {
                    let Some(&(word, count)) = followers.get(row) else {
                        continue;
                    };
                    let class = VisualState::Related(related_tier(count)).class_name();
                    if ui.link(format!("{word}  x{count}  [{class}]")).clicked() {
                        focus = graph.node_index(word);
                    }
                }
            });

        if let Some(index) = focus {
            self.focus_node(index);
        }

        if should_load_more && row_count < followers.len() {
            self.related_rows_visible =
                (row_count + Self::RELATED_PAGE_ROWS).min(followers.len());
        }
    }
}
