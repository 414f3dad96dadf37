use std::path::PathBuf;

use eframe::egui::{self, Align, Key, Layout, Response, Ui};

use super::super::{ViewModel, bundled_source};

const SLIDER_KEY_BASE_RATE: f32 = 10.0;
const SLIDER_KEY_ACCEL_PER_SEC: f32 = 9.0;
const SLIDER_KEY_ACCEL_MAX: f32 = 40.0;

const WORD_LIMIT_MAX: usize = 600;
const RELATED_LIMIT_MAX: usize = 20;
const SCALE_MIN: f32 = 0.5;
const SCALE_MAX: f32 = 20.0;

#[derive(Clone, Copy, Default)]
struct SliderKeyHoldState {
    positive_secs: f32,
    negative_secs: f32,
    integer_carry: f32,
}

fn slider_key_accel_multiplier(hold_secs: f32) -> f32 {
    let ramp = hold_secs * SLIDER_KEY_ACCEL_PER_SEC;
    (1.0 + ramp + ramp * ramp * 0.15).min(SLIDER_KEY_ACCEL_MAX)
}

/// Signed step distance for this frame, or `None` when no arrow key is held.
fn arrow_key_delta(ui: &Ui, response: &Response, step: f32) -> Option<f32> {
    let state_id = response.id.with("arrow_key_hold_state");
    let mut hold_state = ui.ctx().data(|data| {
        data.get_temp::<SliderKeyHoldState>(state_id)
            .unwrap_or_default()
    });

    if !response.has_focus() {
        ui.ctx()
            .data_mut(|data| data.insert_temp(state_id, SliderKeyHoldState::default()));
        return None;
    }

    let (delta_time, increase_down, decrease_down) = ui.input(|input| {
        (
            input.stable_dt.min(0.1),
            input.key_down(Key::ArrowRight) || input.key_down(Key::ArrowUp),
            input.key_down(Key::ArrowLeft) || input.key_down(Key::ArrowDown),
        )
    });

    hold_state.positive_secs = if increase_down {
        hold_state.positive_secs + delta_time
    } else {
        0.0
    };
    hold_state.negative_secs = if decrease_down {
        hold_state.negative_secs + delta_time
    } else {
        0.0
    };

    let direction = (increase_down as i8) - (decrease_down as i8);
    if direction == 0 {
        hold_state.integer_carry = 0.0;
        ui.ctx()
            .data_mut(|data| data.insert_temp(state_id, hold_state));
        return None;
    }

    let hold_secs = if direction > 0 {
        hold_state.positive_secs
    } else {
        hold_state.negative_secs
    };
    let speed = SLIDER_KEY_BASE_RATE * slider_key_accel_multiplier(hold_secs);
    let delta = direction as f32 * step * speed * delta_time;

    ui.ctx().request_repaint();
    ui.ctx()
        .data_mut(|data| data.insert_temp(state_id, hold_state));
    Some(delta)
}

fn apply_slider_arrow_acceleration_f32(
    ui: &Ui,
    response: &Response,
    value: &mut f32,
    min: f32,
    max: f32,
    step: f32,
) -> bool {
    let Some(delta) = arrow_key_delta(ui, response, step) else {
        return false;
    };

    let old_value = *value;
    *value = (*value + delta).clamp(min, max);
    (*value - old_value).abs() > f32::EPSILON
}

fn apply_slider_arrow_acceleration_usize(
    ui: &Ui,
    response: &Response,
    value: &mut usize,
    min: usize,
    max: usize,
    step: usize,
) -> bool {
    let Some(delta) = arrow_key_delta(ui, response, step as f32) else {
        return false;
    };

    let state_id = response.id.with("arrow_key_hold_state");
    let mut hold_state = ui.ctx().data(|data| {
        data.get_temp::<SliderKeyHoldState>(state_id)
            .unwrap_or_default()
    });
    hold_state.integer_carry += delta;
    let whole_delta = hold_state.integer_carry.trunc() as isize;
    hold_state.integer_carry -= whole_delta as f32;
    ui.ctx()
        .data_mut(|data| data.insert_temp(state_id, hold_state));

    let old_value = *value;
    if whole_delta != 0 {
        *value = (*value as isize + whole_delta).clamp(min as isize, max as isize) as usize;
    }
    *value != old_value
}

/// A slider edit counts once the value settles: on release, on a click, or on a key step.
fn slider_committed(response: &Response) -> bool {
    response.drag_stopped() || (response.changed() && !response.dragged())
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui, is_loading: bool) -> Option<PathBuf> {
        let requested = self.draw_source_controls(ui, is_loading);

        ui.separator();
        self.draw_parameter_controls(ui);

        ui.separator();
        self.draw_layout_controls(ui);

        ui.separator();
        ui.label("Search words")
            .on_hover_text("Fuzzy-highlight matching bubbles while nothing is hovered.");
        ui.text_edit_singleline(&mut self.search);

        ui.separator();
        self.draw_word_ranking(ui);

        requested
    }

    fn draw_source_controls(&mut self, ui: &mut Ui, is_loading: bool) -> Option<PathBuf> {
        ui.heading("Text Source");
        ui.add_space(4.0);

        let mut requested = None;
        ui.label("File path");
        let path_response = ui
            .text_edit_singleline(&mut self.path_input)
            .on_hover_text("Path to a UTF-8 text file. Files can also be dropped on the window.");
        let submitted =
            path_response.lost_focus() && ui.input(|input| input.key_pressed(Key::Enter));

        ui.horizontal(|ui| {
            let path = self.path_input.trim();
            let load_button =
                ui.add_enabled(!is_loading && !path.is_empty(), egui::Button::new("Load"));
            if (load_button.clicked() || (submitted && !is_loading)) && !path.is_empty() {
                requested = Some(PathBuf::from(path));
            }

            if ui
                .add_enabled(!is_loading, egui::Button::new("Bundled text"))
                .on_hover_text("Show the bundled Pride and Prejudice excerpt.")
                .clicked()
            {
                self.apply_source(bundled_source());
            }

            if is_loading {
                ui.spinner();
            }
        });

        requested
    }

    fn draw_parameter_controls(&mut self, ui: &mut Ui) {
        ui.heading("Graph Parameters");
        ui.add_space(4.0);

        let mut committed = false;

        let word_limit_slider = ui
            .add(
                egui::Slider::new(&mut self.edited_params.word_limit, 0..=WORD_LIMIT_MAX)
                    .text("Word limit"),
            )
            .on_hover_text("How many of the most frequent words become bubbles.");
        if word_limit_slider.hovered() {
            word_limit_slider.request_focus();
        }
        committed |= slider_committed(&word_limit_slider);
        committed |= apply_slider_arrow_acceleration_usize(
            ui,
            &word_limit_slider,
            &mut self.edited_params.word_limit,
            0,
            WORD_LIMIT_MAX,
            1,
        );

        let related_slider = ui
            .add(
                egui::Slider::new(
                    &mut self.edited_params.related_words_limit,
                    0..=RELATED_LIMIT_MAX,
                )
                .text("Related words limit"),
            )
            .on_hover_text("How many followers are kept for each word.");
        if related_slider.hovered() {
            related_slider.request_focus();
        }
        committed |= slider_committed(&related_slider);
        committed |= apply_slider_arrow_acceleration_usize(
            ui,
            &related_slider,
            &mut self.edited_params.related_words_limit,
            0,
            RELATED_LIMIT_MAX,
            1,
        );

        let scale_slider = ui
            .add(
                egui::Slider::new(&mut self.edited_params.scale, SCALE_MIN..=SCALE_MAX)
                    .text("Scale")
                    .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("Bubble radius is scale * ln(count).");
        if scale_slider.hovered() {
            scale_slider.request_focus();
        }
        committed |= slider_committed(&scale_slider);
        committed |= apply_slider_arrow_acceleration_f32(
            ui,
            &scale_slider,
            &mut self.edited_params.scale,
            SCALE_MIN,
            SCALE_MAX,
            0.1,
        );

        if committed {
            self.apply_params();
        } else if self.edited_params != self.pipeline.params() {
            ui.small("Release the slider to rebuild the graph.");
        }
    }

    fn draw_layout_controls(&mut self, ui: &mut Ui) {
        ui.heading("Layout");
        ui.add_space(4.0);

        ui.checkbox(&mut self.live_layout, "Live layout")
            .on_hover_text("Advance the force simulation every frame.");

        ui.checkbox(&mut self.show_quadtree_overlay, "Show quadtree overlay")
            .on_hover_text("Draw the collision quadtree partitions over the canvas.");

        ui.horizontal(|ui| {
            if ui
                .button("Reheat layout")
                .on_hover_text("Restart the cooling schedule from the current positions.")
                .clicked()
            {
                self.pipeline.reheat();
            }
            if ui.button("Reset view").clicked() {
                self.pan = egui::Vec2::ZERO;
                self.zoom = 1.0;
            }
        });

        let hover_slider = ui
            .add(
                egui::Slider::new(&mut self.hover_radius, 5.0..=120.0)
                    .text("Hover radius (px)")
                    .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("How close the pointer must be to a bubble centre.");
        if hover_slider.hovered() {
            hover_slider.request_focus();
        }
        apply_slider_arrow_acceleration_f32(ui, &hover_slider, &mut self.hover_radius, 5.0, 120.0, 1.0);
    }

    fn draw_word_ranking(&mut self, ui: &mut Ui) {
        ui.label("Top words");

        let graph = std::sync::Arc::clone(self.pipeline.graph());
        let mut focus = None;

        egui::ScrollArea::vertical()
            .id_salt("word_ranking_scroll")
            .auto_shrink([false, false])
            .show_rows(ui, 22.0, graph.nodes.len(), |ui, row_range| {
                for index in row_range {
                    let Some(node) = graph.nodes.get(index) else {
                        continue;
                    };

                    let is_hovered = self.hover.hovered == Some(index);
                    let clicked = ui
                        .horizontal(|ui| {
                            let clicked = ui
                                .selectable_label(is_hovered, format!("{}. {}", index + 1, node.word))
                                .clicked();
                            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                                ui.label(node.count.to_string());
                            });
                            clicked
                        })
                        .inner;

                    if clicked {
                        focus = Some(index);
                    }
                }
            });

        if let Some(index) = focus {
            self.focus_node(index);
        }
    }
}
