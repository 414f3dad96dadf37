use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Pos2, Vec2};
use tracing::{info, warn};

use crate::layout::QuadtreeCell;
use crate::settings::Settings;
use crate::text::{DEFAULT_TEXT, DEFAULT_TEXT_LABEL, GraphParams, read_text_file};

use highlight::HoverState;
use pipeline::{PipelineState, TextSource};

mod graph;
mod highlight;
mod pipeline;
mod render_utils;
mod ui;

type LoadResult = Result<TextSource, String>;

pub struct WordBubblesApp {
    settings: Settings,
    start_file: Option<PathBuf>,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    pipeline: PipelineState,
    /// Slider values; applied to the pipeline only when they differ from the live ones.
    edited_params: GraphParams,
    hover_radius: f32,
    live_layout: bool,
    show_quadtree_overlay: bool,
    path_input: String,
    search: String,
    search_match_cache: Option<SearchMatchCache>,
    hover: HoverState,
    pan: Vec2,
    zoom: f32,
    load_error: Option<String>,
    related_rows_visible: usize,
    fps_current: f32,
    fps_samples: VecDeque<f32>,
    view_scratch: ViewScratch,
}

struct SearchMatchCache {
    query: String,
    generation: u64,
    matches: Arc<HashSet<usize>>,
}

#[derive(Default)]
struct ViewScratch {
    screen_positions: Vec<Pos2>,
    screen_radii: Vec<f32>,
    quadtree_positions: Vec<Vec2>,
    quadtree_cells: Vec<QuadtreeCell>,
}

fn bundled_source() -> TextSource {
    TextSource::new(DEFAULT_TEXT_LABEL, DEFAULT_TEXT)
}

impl WordBubblesApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        settings: Settings,
        start_file: Option<PathBuf>,
    ) -> Self {
        let state = match &start_file {
            Some(path) => Self::start_load(path.clone()),
            None => AppState::Ready(Box::new(ViewModel::new(bundled_source(), &settings))),
        };

        Self {
            settings,
            start_file,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(path: PathBuf) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = read_text_file(&path)
                .map(|text| TextSource::new(path.display().to_string(), text))
                .map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(path: PathBuf) -> AppState {
        info!(path = %path.display(), "loading text file");
        AppState::Loading {
            rx: Self::spawn_load(path),
        }
    }
}

impl eframe::App for WordBubblesApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(Ok(source)) => {
                        transition = Some(AppState::Ready(Box::new(ViewModel::new(
                            source,
                            &self.settings,
                        ))));
                    }
                    Ok(Err(error)) => {
                        warn!(%error, "failed to load start-up file");
                        transition = Some(AppState::Error(error));
                    }
                    Err(TryRecvError::Empty) => {}
                    Err(TryRecvError::Disconnected) => {
                        transition =
                            Some(AppState::Error("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading text...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
                ctx.request_repaint();
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load file");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    ui.horizontal(|ui| {
                        if let Some(path) = &self.start_file
                            && ui.button("Retry").clicked()
                        {
                            transition = Some(Self::start_load(path.clone()));
                        }
                        if ui.button("Use bundled text").clicked() {
                            transition = Some(AppState::Ready(Box::new(ViewModel::new(
                                bundled_source(),
                                &self.settings,
                            ))));
                        }
                    });
                });
            }
            AppState::Ready(model) => {
                let is_loading = self.reload_rx.is_some();
                let requested = model.show(ctx, is_loading);

                if let Some(path) = requested
                    && self.reload_rx.is_none()
                {
                    info!(path = %path.display(), "loading text file");
                    self.reload_rx = Some(Self::spawn_load(path));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(Ok(source)) => model.apply_source(source),
                        Ok(Err(error)) => model.report_load_error(error),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            model.report_load_error("Background load worker disconnected".to_owned());
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
