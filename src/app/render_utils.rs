use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};

use super::highlight::{MAX_RELATED_TIER, VisualState};

const PLAIN_FILL: Color32 = Color32::from_rgb(64, 112, 158);
const PLAIN_LABEL: Color32 = Color32::from_gray(214);
const SELECTED_FILL: Color32 = Color32::from_rgb(245, 206, 93);
const SELECTED_LABEL: Color32 = Color32::from_rgb(26, 22, 12);
const RELATED_ACCENT: Color32 = Color32::from_rgb(241, 112, 76);
const SEARCH_ACCENT: Color32 = Color32::from_rgb(103, 196, 255);

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

/// Fill and label colours of a bubble class.
pub(super) fn state_colors(state: VisualState) -> (Color32, Color32) {
    match state {
        VisualState::Plain => (PLAIN_FILL, PLAIN_LABEL),
        VisualState::Selected => (SELECTED_FILL, SELECTED_LABEL),
        VisualState::Related(tier) => {
            let amount = 0.25 + 0.75 * (tier.min(MAX_RELATED_TIER) as f32 / MAX_RELATED_TIER as f32);
            (
                blend_color(PLAIN_FILL, RELATED_ACCENT, amount),
                blend_color(PLAIN_LABEL, Color32::WHITE, amount),
            )
        }
    }
}

pub(super) fn search_match_color(base: Color32) -> Color32 {
    blend_color(base, SEARCH_ACCENT, 0.68)
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, pan: Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    let step = (56.0 * zoom.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.center() + pan;

    let mut x = origin.x.rem_euclid(step);
    while x < rect.right() {
        painter.line_segment(
            [Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())],
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70)),
        );
        x += step;
    }

    let mut y = origin.y.rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment(
            [Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)],
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70)),
        );
        y += step;
    }
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub(super) fn world_to_screen(rect: Rect, pan: Vec2, zoom: f32, world: Vec2) -> Pos2 {
    rect.center() + pan + world * zoom
}

pub(super) fn screen_to_world(rect: Rect, pan: Vec2, zoom: f32, screen: Pos2) -> Vec2 {
    (screen - rect.center() - pan) / zoom
}
