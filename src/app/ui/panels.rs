use std::collections::VecDeque;
use std::path::PathBuf;

use eframe::egui::{self, Align, Context, Layout, Vec2};
use tracing::warn;

use crate::settings::Settings;

use super::super::highlight::HoverState;
use super::super::pipeline::{PipelineState, TextSource};
use super::super::{ViewModel, ViewScratch};

impl ViewModel {
    pub(in crate::app) const INITIAL_RELATED_ROWS: usize = 24;
    pub(in crate::app) const RELATED_PAGE_ROWS: usize = 24;
    pub(in crate::app) const RELATED_PREFETCH_MARGIN: usize = 4;

    pub(in crate::app) fn new(source: TextSource, settings: &Settings) -> Self {
        Self {
            pipeline: PipelineState::new(source, settings.params),
            edited_params: settings.params,
            hover_radius: settings.hover_radius,
            live_layout: settings.live_layout,
            show_quadtree_overlay: false,
            path_input: String::new(),
            search: String::new(),
            search_match_cache: None,
            hover: HoverState::default(),
            pan: Vec2::ZERO,
            zoom: 1.0,
            load_error: None,
            related_rows_visible: Self::INITIAL_RELATED_ROWS,
            fps_current: 0.0,
            fps_samples: VecDeque::new(),
            view_scratch: ViewScratch::default(),
        }
    }

    /// Draws one frame. Returns a file the user asked to load, if any.
    pub(in crate::app) fn show(&mut self, ctx: &Context, is_loading: bool) -> Option<PathBuf> {
        self.update_fps_counter(ctx);
        let mut requested = Self::dropped_file(ctx);

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("word-bubbles");
                    ui.separator();
                    let graph = self.pipeline.graph();
                    ui.label(format!("source: {}", self.pipeline.source().label));
                    ui.label(format!("tokens: {}", graph.token_count));
                    ui.label(format!("distinct words: {}", graph.distinct_words));
                    ui.label(format!(
                        "graph: {} nodes / {} edges",
                        graph.nodes.len(),
                        graph.edges.len()
                    ));
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(fps_text) = self.fps_display_text() {
                            ui.label(fps_text);
                        }
                        ui.label(self.layout_status_text());
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| {
                if let Some(path) = self.draw_controls(ui, is_loading) {
                    requested = Some(path);
                }
            });

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| self.draw_graph(ui));

        self.draw_load_error_modal(ctx);
        requested
    }

    pub(in crate::app) fn apply_source(&mut self, source: TextSource) {
        if self.pipeline.set_source(source) {
            self.reset_view_state();
        }
    }

    pub(in crate::app) fn apply_params(&mut self) {
        if self.pipeline.set_params(self.edited_params) {
            self.reset_view_state();
        }
    }

    pub(in crate::app) fn report_load_error(&mut self, error: String) {
        warn!(%error, "failed to load text file");
        self.load_error = Some(error);
    }

    fn reset_view_state(&mut self) {
        self.hover = HoverState::default();
        self.search_match_cache = None;
        self.related_rows_visible = Self::INITIAL_RELATED_ROWS;
    }

    fn draw_load_error_modal(&mut self, ctx: &Context) {
        let Some(error) = &self.load_error else {
            return;
        };

        let mut dismissed = false;
        let modal = egui::Modal::new(egui::Id::new("load_error_modal")).show(ctx, |ui| {
            ui.set_width(380.0);
            ui.heading("Failed to load file");
            ui.add_space(6.0);
            ui.label(error.as_str());
            ui.add_space(6.0);
            ui.small("The previous graph is still shown.");
            ui.add_space(10.0);
            if ui.button("OK").clicked() {
                dismissed = true;
            }
        });

        if dismissed || modal.should_close() {
            self.load_error = None;
        }
    }
}
