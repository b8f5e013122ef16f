use crate::app::SubtitleApp;
use crate::editor::Intent;
use crate::player::PlaybackState;
use crate::ui::{render_subtitle_editor, TimelineWidget};
use crate::utils::format_clock;
use eframe::egui;

pub fn render_main_window(app: &mut SubtitleApp, ctx: &egui::Context) {
    // Top menu bar
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        render_menu_bar(app, ui);
    });

    // Status bar at bottom
    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        render_status_bar(app, ui);
    });

    // Timeline (above status bar)
    egui::TopBottomPanel::bottom("timeline_panel")
        .resizable(false)
        .min_height(120.0)
        .show(ctx, |ui| {
            render_timeline_panel(app, ui);
        });

    // Central panel: preview + controls + text editor
    egui::CentralPanel::default().show(ctx, |ui| {
        render_preview_area(app, ui);

        ui.separator();

        render_playback_controls(app, ui);

        if app.session.is_editing_text() {
            ui.separator();
            render_subtitle_editor(app, ui);
        }
    });
}

fn render_menu_bar(app: &mut SubtitleApp, ui: &mut egui::Ui) {
    egui::menu::bar(ui, |ui| {
        ui.menu_button("File", |ui| {
            if ui.button("Open Video... (Ctrl+O)").clicked() {
                app.open_media_dialog();
                ui.close_menu();
            }
            if ui.button("Open Subtitles...").clicked() {
                app.open_subtitles_dialog();
                ui.close_menu();
            }
            let can_export = !app.session.cues().is_empty();
            if ui
                .add_enabled(can_export, egui::Button::new("Export SRT... (Ctrl+S)"))
                .clicked()
            {
                app.export_dialog();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Exit").clicked() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });

        ui.menu_button("Edit", |ui| {
            let has_selection = app.session.selection().is_some();
            if ui.button("Add Subtitle (+)").clicked() {
                app.session.handle(Intent::CreateAtPlayhead);
                ui.close_menu();
            }
            if ui
                .add_enabled(has_selection, egui::Button::new("Edit Text (Enter)"))
                .clicked()
            {
                app.session.handle(Intent::BeginTextEdit);
                ui.close_menu();
            }
            if ui
                .add_enabled(has_selection, egui::Button::new("Delete Subtitle (Del)"))
                .clicked()
            {
                app.session.handle(Intent::DeleteSelected);
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Previous Subtitle (Left)").clicked() {
                app.session.handle(Intent::SelectPrevious);
                ui.close_menu();
            }
            if ui.button("Next Subtitle (Right)").clicked() {
                app.session.handle(Intent::SelectNext);
                ui.close_menu();
            }
        });

        ui.menu_button("Playback", |ui| {
            if ui.button("Play/Pause (Space)").clicked() {
                app.session.handle(Intent::TogglePlay);
                ui.close_menu();
            }
            if ui.button("Step Back ([)").clicked() {
                app.session.handle(Intent::SeekBackward);
                ui.close_menu();
            }
            if ui.button("Step Forward (])").clicked() {
                app.session.handle(Intent::SeekForward);
                ui.close_menu();
            }
        });
    });
}

fn render_status_bar(app: &SubtitleApp, ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        ui.label(&app.status_message);

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(format!("{} subtitle(s)", app.session.cues().len()));
            if let Some(path) = &app.subtitle_path {
                ui.separator();
                ui.label(path.display().to_string());
            }
        });
    });
}

fn render_preview_area(app: &mut SubtitleApp, ui: &mut egui::Ui) {
    let available_size = ui.available_size();
    let preview_height = (available_size.y * 0.55).clamp(150.0, 420.0);

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_height(preview_height);
        ui.set_max_height(preview_height);
        ui.set_min_width(ui.available_width());

        let rect = ui.max_rect();

        if let Some(media) = app.media() {
            ui.centered_and_justified(|ui| {
                ui.label(format!(
                    "{}\n{} | {}",
                    media.filename(),
                    media.resolution_string(),
                    media.duration_string()
                ));
            });
        } else if app.player.is_some() {
            ui.centered_and_justified(|ui| {
                ui.spinner();
            });
        } else {
            ui.centered_and_justified(|ui| {
                ui.label("No video loaded\nDrag & drop or File > Open Video...");
            });
        }

        // Cue under the playhead, drawn like a burned-in subtitle
        if let Some(cue) = app.session.active_cue() {
            let painter = ui.painter_at(rect);
            let galley = painter.layout(
                cue.label(),
                egui::FontId::proportional(22.0),
                egui::Color32::WHITE,
                rect.width() - 40.0,
            );
            let pos = egui::pos2(
                rect.center().x - galley.size().x / 2.0,
                rect.bottom() - galley.size().y - 16.0,
            );
            let backdrop = egui::Rect::from_min_size(pos, galley.size()).expand(6.0);
            painter.rect_filled(backdrop, 4.0, egui::Color32::from_black_alpha(180));
            painter.galley(pos, galley, egui::Color32::WHITE);
        }
    });
}

fn render_playback_controls(app: &mut SubtitleApp, ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        let play_pause_text = match app.playback_state() {
            PlaybackState::Playing => "||",
            _ => ">",
        };
        if ui.button(play_pause_text).on_hover_text("Play/Pause (Space)").clicked() {
            app.session.handle(Intent::TogglePlay);
        }

        ui.separator();

        let can_create = app.session.duration_ms().is_some();
        if ui
            .add_enabled(can_create, egui::Button::new("+ Add Block"))
            .on_hover_text("Add a subtitle at the playhead (+)")
            .clicked()
        {
            app.session.handle(Intent::CreateAtPlayhead);
        }

        let has_selection = app.session.selection().is_some();
        if ui
            .add_enabled(has_selection, egui::Button::new("Delete Selected"))
            .on_hover_text("Delete the selected subtitle (Del)")
            .clicked()
        {
            app.session.handle(Intent::DeleteSelected);
        }

        let can_export = !app.session.cues().is_empty();
        if ui
            .add_enabled(can_export, egui::Button::new("Export SRT"))
            .on_hover_text("Save subtitles as SubRip (Ctrl+S)")
            .clicked()
        {
            app.export_dialog();
        }

        ui.separator();

        ui.label("Vol:");
        let mut volume = app.volume;
        let slider = ui.add(egui::Slider::new(&mut volume, 0.0..=2.0).show_value(false));
        if slider.changed() {
            app.set_volume(volume);
        }
        if slider.drag_stopped() {
            app.save_view_settings();
        }

        if app.player.as_ref().is_some_and(|p| p.media().is_some() && !p.audio_ready()) {
            ui.small("(no audio)");
        }

        ui.separator();

        match app.session.active_cue() {
            Some(cue) => {
                let preview: String = cue.label().chars().take(40).collect();
                ui.label(format!("Editing: {}", preview));
            }
            None => {
                ui.weak("No active subtitle");
            }
        }
    });
}

fn render_timeline_panel(app: &mut SubtitleApp, ui: &mut egui::Ui) {
    let current = app.session.position_ms();
    let duration = app.session.duration_ms().unwrap_or(0);

    ui.horizontal(|ui| {
        ui.monospace(format!("{} / {}", format_clock(current), format_clock(duration)));

        ui.separator();

        ui.label("Zoom:");
        let mut zoom = app.timeline_zoom;
        let slider = ui.add(
            egui::Slider::new(
                &mut zoom,
                app.config.zoom_min_px_per_sec..=app.config.zoom_max_px_per_sec,
            )
            .suffix(" px/s"),
        );
        if slider.changed() {
            app.set_zoom(zoom);
        }
        if slider.drag_stopped() {
            app.save_view_settings();
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.small("Drag edges to resize | Ctrl+Wheel zoom | Ctrl+Drag pan");
        });
    });

    let response = TimelineWidget::new(duration, current)
        .cues(app.session.cues())
        .selected(app.session.selection())
        .zoom(
            app.timeline_zoom,
            app.config.zoom_min_px_per_sec,
            app.config.zoom_max_px_per_sec,
        )
        .scroll(app.timeline_scroll)
        .follow_playhead(app.session.is_playing())
        .show(ui);

    if let Some(id) = response.cue_clicked {
        app.session.handle(Intent::SelectCue(id));
    }
    if let Some((id, edge, ms)) = response.resize {
        app.session.handle(Intent::ResizeEdge { id, edge, ms });
    }
    if let Some(ms) = response.seek_to {
        app.session.handle(Intent::SeekTo(ms));
    }
    if let Some(zoom) = response.zoom_changed {
        app.set_zoom(zoom);
    }
    if let Some(scroll) = response.scroll_changed {
        app.timeline_scroll = scroll;
    }
    if response.is_interacting {
        ui.ctx().request_repaint();
    }
}
