use crate::app::SubtitleApp;
use crate::editor::Intent;
use crate::utils::format_clock;
use eframe::egui;

/// Text editor for the selected cue. Shown only while text editing owns input.
pub fn render_subtitle_editor(app: &mut SubtitleApp, ui: &mut egui::Ui) {
    let timing = app
        .session
        .selected_cue()
        .map(|cue| format!("{} -> {}", format_clock(cue.start_ms), format_clock(cue.end_ms)));

    ui.horizontal(|ui| {
        ui.heading("Edit Subtitle");
        if let Some(timing) = timing {
            ui.monospace(timing);
        }
    });

    let mut commit = false;
    if let Some(draft) = app.session.draft_mut() {
        let response = ui.add(
            egui::TextEdit::multiline(draft)
                .desired_rows(3)
                .desired_width(f32::INFINITY)
                .hint_text("Subtitle text"),
        );
        if !response.has_focus() && !response.lost_focus() {
            response.request_focus();
        }

        ui.horizontal(|ui| {
            if ui.button("Save & Close").on_hover_text("Esc").clicked() {
                commit = true;
            }
            ui.small("Esc saves and returns to the timeline");
        });
    }

    if commit {
        app.session.handle(Intent::CommitTextEdit);
    }
}
