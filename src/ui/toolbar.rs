// Copyright (c) 2025, Buttercut Contributors
// SPDX-License-Identifier: BSD-3-Clause

//! Editor toolbar.
//!
//! Add-overlay controls, arrangement tools (align/distribute), clipboard
//! and view controls. The toolbar never mutates the document itself; it
//! reports the requested operation back to the app as a [`ToolbarAction`].

use crate::models::editor::EditorState;
use crate::util::geometry::{Alignment, Axis};

/// Operation requested from the toolbar.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolbarAction {
    None,
    PickVideo,
    AddText,
    AddImage,
    AddVideoClip,
    Align(Alignment),
    Distribute(Axis),
    Duplicate,
    Copy,
    Paste,
    DeleteSelected,
    Undo,
    Redo,
    ZoomIn,
    ZoomOut,
    ZoomReset,
    ToggleSnap,
    SetGridSize(f64),
    Submit,
}

/// Display the toolbar. `text_value` backs the add-text input field.
pub fn show(ui: &mut egui::Ui, state: &EditorState, text_value: &mut String) -> ToolbarAction {
    let mut action = ToolbarAction::None;
    let selected = state.selected_ids.len();
    let has_video = state.video_uri.is_some();

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 6.0;

        if ui.button("🎬 Video...").clicked() {
            action = ToolbarAction::PickVideo;
        }
        ui.separator();

        ui.add_enabled_ui(has_video, |ui| {
            let text_edit = egui::TextEdit::singleline(text_value)
                .hint_text("Overlay text")
                .desired_width(140.0);
            let response = ui.add(text_edit);
            let submitted =
                response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("➕ Text").clicked() || submitted {
                action = ToolbarAction::AddText;
            }
            if ui.button("🖼 Image").clicked() {
                action = ToolbarAction::AddImage;
            }
            if ui.button("📹 Clip").clicked() {
                action = ToolbarAction::AddVideoClip;
            }
        });

        ui.separator();

        ui.add_enabled_ui(selected >= 2, |ui| {
            ui.menu_button("Align", |ui| {
                let modes = [
                    ("Left", Alignment::Left),
                    ("Center", Alignment::Center),
                    ("Right", Alignment::Right),
                    ("Top", Alignment::Top),
                    ("Middle", Alignment::Middle),
                    ("Bottom", Alignment::Bottom),
                ];
                for (label, mode) in modes {
                    if ui.button(label).clicked() {
                        action = ToolbarAction::Align(mode);
                        ui.close_menu();
                    }
                }
            });
        });
        ui.add_enabled_ui(selected >= 3, |ui| {
            ui.menu_button("Distribute", |ui| {
                if ui.button("Horizontally").clicked() {
                    action = ToolbarAction::Distribute(Axis::Horizontal);
                    ui.close_menu();
                }
                if ui.button("Vertically").clicked() {
                    action = ToolbarAction::Distribute(Axis::Vertical);
                    ui.close_menu();
                }
            });
        });

        ui.separator();

        ui.add_enabled_ui(selected > 0, |ui| {
            if ui.button("⧉ Duplicate").clicked() {
                action = ToolbarAction::Duplicate;
            }
            if ui.button("Copy").clicked() {
                action = ToolbarAction::Copy;
            }
            if ui.button("🗑 Delete").clicked() {
                action = ToolbarAction::DeleteSelected;
            }
        });
        if ui.button("Paste").clicked() {
            action = ToolbarAction::Paste;
        }

        ui.separator();

        if ui
            .add_enabled(state.can_undo(), egui::Button::new("↩ Undo"))
            .clicked()
        {
            action = ToolbarAction::Undo;
        }
        if ui
            .add_enabled(state.can_redo(), egui::Button::new("↪ Redo"))
            .clicked()
        {
            action = ToolbarAction::Redo;
        }

        ui.separator();

        if ui.button("−").clicked() {
            action = ToolbarAction::ZoomOut;
        }
        if ui
            .button(format!("{:.0}%", state.zoom * 100.0))
            .on_hover_text("Reset zoom")
            .clicked()
        {
            action = ToolbarAction::ZoomReset;
        }
        if ui.button("＋").clicked() {
            action = ToolbarAction::ZoomIn;
        }

        ui.separator();

        let mut snap = state.snap_to_grid;
        if ui.checkbox(&mut snap, "Snap").changed() {
            action = ToolbarAction::ToggleSnap;
        }
        if state.snap_to_grid {
            let mut grid_size = state.grid_size;
            let response = ui.add(
                egui::DragValue::new(&mut grid_size)
                    .range(2.0..=100.0)
                    .suffix(" px"),
            );
            if response.changed() {
                action = ToolbarAction::SetGridSize(grid_size);
            }
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui
                .add_enabled(has_video, egui::Button::new("🚀 Render"))
                .clicked()
            {
                action = ToolbarAction::Submit;
            }
        });
    });

    action
}
