use crate::editor::{clamp_zoom, nudge_scroll, TimelineGeometry};
use crate::project::{Cue, CueId, Edge};
use crate::utils::{format_ruler_label, Millis};
use eframe::egui;

const RULER_HEIGHT: f32 = 22.0;
const TRACK_HEIGHT: f32 = 56.0;
const HANDLE_WIDTH: f32 = 6.0;
/// Distance the playhead keeps from the view edges while following
const FOLLOW_PAD: f32 = 200.0;

const CUE_COLOR: egui::Color32 = egui::Color32::from_rgb(70, 110, 170);
const CUE_SELECTED_COLOR: egui::Color32 = egui::Color32::from_rgb(90, 160, 110);
const PLAYHEAD_COLOR: egui::Color32 = egui::Color32::from_rgb(60, 220, 150);

/// Timeline with one track of cue blocks, a ruler and the playhead
pub struct TimelineWidget<'a> {
    pub duration_ms: Millis,
    pub current_ms: Millis,
    pub cues: &'a [Cue],
    pub selected: Option<CueId>,
    pub px_per_sec: f32,
    pub zoom_range: (f32, f32),
    pub scroll: f32,
    pub follow_playhead: bool,
}

impl<'a> TimelineWidget<'a> {
    pub fn new(duration_ms: Millis, current_ms: Millis) -> Self {
        Self {
            duration_ms,
            current_ms,
            cues: &[],
            selected: None,
            px_per_sec: 120.0,
            zoom_range: (40.0, 400.0),
            scroll: 0.0,
            follow_playhead: false,
        }
    }

    pub fn cues(mut self, cues: &'a [Cue]) -> Self {
        self.cues = cues;
        self
    }

    pub fn selected(mut self, selected: Option<CueId>) -> Self {
        self.selected = selected;
        self
    }

    pub fn zoom(mut self, px_per_sec: f32, min: f32, max: f32) -> Self {
        self.px_per_sec = px_per_sec;
        self.zoom_range = (min, max);
        self
    }

    pub fn scroll(mut self, scroll: f32) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn follow_playhead(mut self, follow: bool) -> Self {
        self.follow_playhead = follow;
        self
    }

    pub fn show(self, ui: &mut egui::Ui) -> TimelineResponse {
        let mut response = TimelineResponse::default();

        if self.duration_ms <= 0 {
            ui.label("No media loaded");
            return response;
        }

        let available_width = ui.available_width();
        let (rect, bg_response) = ui.allocate_exact_size(
            egui::vec2(available_width, RULER_HEIGHT + TRACK_HEIGHT),
            egui::Sense::click_and_drag(),
        );

        let content_width = TimelineGeometry::new(0.0, self.px_per_sec, self.duration_ms).total_width();
        let max_scroll = (content_width - rect.width()).max(0.0);
        let mut scroll = self.scroll.clamp(0.0, max_scroll);

        if self.follow_playhead {
            let playhead = TimelineGeometry::new(0.0, self.px_per_sec, self.duration_ms).ms_to_x(self.current_ms);
            scroll = nudge_scroll(playhead, scroll, rect.width(), content_width, FOLLOW_PAD);
        }

        let geometry = TimelineGeometry::new(rect.left() - scroll, self.px_per_sec, self.duration_ms);
        let ruler_rect = egui::Rect::from_min_size(rect.min, egui::vec2(rect.width(), RULER_HEIGHT));
        let track_rect = egui::Rect::from_min_size(
            rect.min + egui::vec2(0.0, RULER_HEIGHT),
            egui::vec2(rect.width(), TRACK_HEIGHT),
        );

        // Cue blocks are added after the background so they win the pointer
        let mut hovered_handle = false;
        for cue in self.cues {
            let x0 = geometry.ms_to_x(cue.start_ms);
            let x1 = geometry.ms_to_x(cue.end_ms);
            if x1 < track_rect.left() || x0 > track_rect.right() {
                continue;
            }
            let block = egui::Rect::from_min_max(
                egui::pos2(x0, track_rect.top() + 4.0),
                egui::pos2(x1.max(x0 + 1.0), track_rect.bottom() - 4.0),
            );

            let body = ui.interact(block, ui.id().with(("cue", cue.id)), egui::Sense::click());
            if body.clicked() {
                response.cue_clicked = Some(cue.id);
            }
            body.on_hover_text(cue.text.as_str());

            for edge in [Edge::Left, Edge::Right] {
                let x = if edge == Edge::Left { block.left() } else { block.right() };
                let handle_rect = egui::Rect::from_center_size(
                    egui::pos2(x, block.center().y),
                    egui::vec2(HANDLE_WIDTH, block.height()),
                );
                let handle = ui.interact(
                    handle_rect,
                    ui.id().with(("cue_edge", cue.id, edge == Edge::Left)),
                    egui::Sense::drag(),
                );
                hovered_handle |= handle.hovered() || handle.dragged();
                if handle.dragged() {
                    if let Some(pos) = handle.interact_pointer_pos() {
                        response.resize = Some((cue.id, edge, geometry.x_to_ms(pos.x)));
                        response.is_interacting = true;
                    }
                }
            }
        }
        if hovered_handle {
            ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
        }

        if ui.is_rect_visible(rect) {
            let painter = ui.painter_at(rect);
            painter.rect_filled(rect, 4.0, egui::Color32::from_gray(30));
            self.draw_ruler(&painter, ruler_rect, &geometry);
            painter.rect_filled(track_rect, 2.0, egui::Color32::from_gray(40));
            self.draw_cues(&painter, track_rect, &geometry);
            self.draw_playhead(&painter, rect, &geometry);
        }

        // Click or drag on empty track: explicit seek
        if bg_response.clicked() || (bg_response.dragged() && !ui.input(|i| i.modifiers.command)) {
            if let Some(pos) = bg_response.interact_pointer_pos() {
                response.seek_to = Some(geometry.x_to_ms(pos.x));
                response.is_interacting |= bg_response.dragged();
            }
        }

        // Ctrl+drag pans
        if bg_response.dragged() && ui.input(|i| i.modifiers.command) {
            scroll = (scroll - bg_response.drag_delta().x).clamp(0.0, max_scroll);
        }

        if bg_response.hovered() {
            let (zoom_delta, wheel) = ui.input(|i| (i.zoom_delta(), i.smooth_scroll_delta));

            // Ctrl+wheel (or pinch) zooms around the pointer
            if zoom_delta != 1.0 {
                let (min, max) = self.zoom_range;
                let new_zoom = clamp_zoom(self.px_per_sec * zoom_delta, min, max);
                if new_zoom != self.px_per_sec {
                    let anchor_x = bg_response.hover_pos().map_or(rect.left(), |p| p.x);
                    let anchor_ms = geometry.x_to_ms(anchor_x);
                    let zoomed = TimelineGeometry::new(0.0, new_zoom, self.duration_ms);
                    let new_max = (zoomed.total_width() - rect.width()).max(0.0);
                    scroll = (zoomed.ms_to_x(anchor_ms) - (anchor_x - rect.left())).clamp(0.0, new_max);
                    response.zoom_changed = Some(new_zoom);
                }
            } else {
                let delta = if wheel.x != 0.0 { wheel.x } else { wheel.y };
                if delta != 0.0 {
                    scroll = (scroll - delta).clamp(0.0, max_scroll);
                }
            }
        }

        if scroll != self.scroll {
            response.scroll_changed = Some(scroll);
        }

        response
    }

    fn draw_ruler(&self, painter: &egui::Painter, rect: egui::Rect, geometry: &TimelineGeometry) {
        painter.rect_filled(rect, 0.0, egui::Color32::from_gray(35));

        let step = geometry.tick_step_ms(60.0);
        let minor = (step / 5).max(1);
        let first_visible = geometry.x_to_ms(rect.left());
        let mut time = first_visible / minor * minor;

        while time <= self.duration_ms {
            let x = geometry.ms_to_x(time);
            if x > rect.right() {
                break;
            }
            let major = time % step == 0;
            let tick_height = if major { 10.0 } else { 4.0 };
            painter.line_segment(
                [egui::pos2(x, rect.bottom() - tick_height), egui::pos2(x, rect.bottom())],
                egui::Stroke::new(1.0, egui::Color32::GRAY),
            );
            if major {
                painter.text(
                    egui::pos2(x + 2.0, rect.top() + 2.0),
                    egui::Align2::LEFT_TOP,
                    format_ruler_label(time, step),
                    egui::FontId::monospace(10.0),
                    egui::Color32::LIGHT_GRAY,
                );
            }
            time += minor;
        }
    }

    fn draw_cues(&self, painter: &egui::Painter, rect: egui::Rect, geometry: &TimelineGeometry) {
        for cue in self.cues {
            let x0 = geometry.ms_to_x(cue.start_ms);
            let x1 = geometry.ms_to_x(cue.end_ms);
            if x1 < rect.left() || x0 > rect.right() {
                continue;
            }

            let is_selected = self.selected == Some(cue.id);
            let block = egui::Rect::from_min_max(
                egui::pos2(x0.max(rect.left()), rect.top() + 4.0),
                egui::pos2(x1.min(rect.right()).max(x0 + 1.0), rect.bottom() - 4.0),
            );
            let fill = if is_selected { CUE_SELECTED_COLOR } else { CUE_COLOR };
            painter.rect_filled(block, 3.0, fill);
            if is_selected {
                painter.rect_stroke(block, 3.0, egui::Stroke::new(2.0, egui::Color32::WHITE));
            }

            // Edge handles
            for x in [x0, x1] {
                if x >= rect.left() && x <= rect.right() {
                    painter.line_segment(
                        [egui::pos2(x, block.top() + 6.0), egui::pos2(x, block.bottom() - 6.0)],
                        egui::Stroke::new(3.0, egui::Color32::from_white_alpha(160)),
                    );
                }
            }

            if block.width() > 30.0 {
                let clipped = painter.with_clip_rect(block.shrink(2.0));
                clipped.text(
                    egui::pos2(block.left() + 6.0, block.top() + 4.0),
                    egui::Align2::LEFT_TOP,
                    cue.label(),
                    egui::FontId::proportional(11.0),
                    egui::Color32::WHITE,
                );
            }
        }
    }

    fn draw_playhead(&self, painter: &egui::Painter, rect: egui::Rect, geometry: &TimelineGeometry) {
        let x = geometry.ms_to_x(self.current_ms);
        if x < rect.left() || x > rect.right() {
            return;
        }

        painter.line_segment(
            [egui::pos2(x, rect.top()), egui::pos2(x, rect.bottom())],
            egui::Stroke::new(4.0, PLAYHEAD_COLOR.gamma_multiply(0.25)),
        );
        painter.line_segment(
            [egui::pos2(x, rect.top()), egui::pos2(x, rect.bottom())],
            egui::Stroke::new(2.0, PLAYHEAD_COLOR),
        );
        painter.add(egui::Shape::convex_polygon(
            vec![
                egui::pos2(x, rect.top() + 12.0),
                egui::pos2(x - 7.0, rect.top()),
                egui::pos2(x + 7.0, rect.top()),
            ],
            PLAYHEAD_COLOR,
            egui::Stroke::new(1.0, egui::Color32::WHITE),
        ));
    }
}

#[derive(Debug, Default)]
pub struct TimelineResponse {
    pub seek_to: Option<Millis>,
    pub cue_clicked: Option<CueId>,
    pub resize: Option<(CueId, Edge, Millis)>,
    pub zoom_changed: Option<f32>,
    pub scroll_changed: Option<f32>,
    /// Scrubbing or dragging an edge; keeps frames coming
    pub is_interacting: bool,
}
