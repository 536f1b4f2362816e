// Copyright (c) 2025, Buttercut Contributors
// SPDX-License-Identifier: BSD-3-Clause

//! Timeline panel.
//!
//! Scrubber with MM:SS labels, play/pause, and one bar per overlay
//! spanning its time window. Clicking a bar selects the overlay.

use crate::models::editor::EditorState;
use crate::util::time::format_time;

const BAR_HEIGHT: f32 = 16.0;
const BAR_SPACING: f32 = 2.0;

/// Result of timeline interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineAction {
    None,
    Seek(f64),
    SetPlaying(bool),
    Select { id: String, multi: bool },
}

/// Display the timeline panel.
pub fn show(ui: &mut egui::Ui, state: &EditorState) -> TimelineAction {
    let mut action = TimelineAction::None;
    let duration = state.video_duration.max(0.001);

    ui.horizontal(|ui| {
        let play_label = if state.is_playing { "⏸" } else { "▶" };
        if ui.button(play_label).clicked() {
            action = TimelineAction::SetPlaying(!state.is_playing);
        }

        ui.monospace(format!(
            "{} / {}",
            format_time(state.current_time),
            format_time(state.video_duration)
        ));

        let mut position = state.current_time;
        let slider = egui::Slider::new(&mut position, 0.0..=duration).show_value(false);
        let response = ui.add_sized([ui.available_width(), 18.0], slider);
        if response.changed() {
            action = TimelineAction::Seek(position);
        }
    });

    // Overlay bars, one row each, in insertion order.
    for overlay in &state.overlays {
        let (rect, _) = ui.allocate_exact_size(
            egui::vec2(ui.available_width(), BAR_HEIGHT + BAR_SPACING),
            egui::Sense::hover(),
        );

        let start_frac = (overlay.start_time / duration).clamp(0.0, 1.0) as f32;
        let end_frac = (overlay.end_time / duration).clamp(0.0, 1.0) as f32;
        let bar_rect = egui::Rect::from_min_max(
            egui::pos2(
                rect.min.x + start_frac * rect.width(),
                rect.min.y,
            ),
            egui::pos2(
                rect.min.x + end_frac.max(start_frac + 0.005) * rect.width(),
                rect.min.y + BAR_HEIGHT,
            ),
        );

        let selected = state.selected_ids.contains(&overlay.id);
        let fill = if selected {
            egui::Color32::from_rgb(90, 140, 220)
        } else if overlay.locked {
            egui::Color32::from_gray(90)
        } else {
            egui::Color32::from_gray(120)
        };
        ui.painter().rect_filled(bar_rect, 3.0, fill);

        let label = match overlay.content.char_indices().nth(24) {
            Some((idx, _)) => format!("{}…", &overlay.content[..idx]),
            None => overlay.content.clone(),
        };
        ui.painter().text(
            bar_rect.left_center() + egui::vec2(4.0, 0.0),
            egui::Align2::LEFT_CENTER,
            label,
            egui::FontId::proportional(10.0),
            egui::Color32::WHITE,
        );

        let response = ui.interact(
            bar_rect,
            ui.id().with(&overlay.id),
            egui::Sense::click(),
        );
        if response.clicked() && !overlay.locked {
            let multi = ui.input(|i| i.modifiers.command || i.modifiers.ctrl);
            action = TimelineAction::Select {
                id: overlay.id.clone(),
                multi,
            };
        }
    }

    action
}
