// Copyright (c) 2025, Buttercut Contributors
// SPDX-License-Identifier: BSD-3-Clause

//! Overlay properties panel.
//!
//! Lists every overlay and, for a single selection, exposes its editable
//! fields. Every edit is reported as a partial-update patch; the panel
//! never touches the document directly.

use crate::models::editor::EditorState;
use crate::models::overlay::{FontWeight, Overlay, OverlayKind, OverlayPatch, TextAlign};
use crate::util::time::{format_time, parse_time};

/// Edit buffers that must survive across frames (the MM:SS fields are
/// committed on enter/defocus, not per keystroke).
#[derive(Default)]
pub struct PanelState {
    target_id: Option<String>,
    start_buf: String,
    end_buf: String,
}

/// Result of properties panel interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertiesAction {
    None,
    Select { id: String, multi: bool },
    Update { id: String, patch: OverlayPatch },
    Delete(String),
    Duplicate(String),
}

/// Display the properties side panel.
pub fn show(ui: &mut egui::Ui, state: &EditorState, panel: &mut PanelState) -> PropertiesAction {
    let mut action = PropertiesAction::None;

    ui.heading("Overlays");
    ui.separator();

    if state.overlays.is_empty() {
        ui.label(egui::RichText::new("No overlays yet").weak());
        return action;
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        for overlay in &state.overlays {
            let selected = state.selected_ids.contains(&overlay.id);
            ui.horizontal(|ui| {
                let icon = match overlay.kind {
                    OverlayKind::Text => "T",
                    OverlayKind::Image => "🖼",
                    OverlayKind::Video => "📹",
                };
                let label = format!("{icon} {}", short_label(overlay));
                if ui.selectable_label(selected, label).clicked() && !overlay.locked {
                    let multi = ui.input(|i| i.modifiers.command || i.modifiers.ctrl);
                    action = PropertiesAction::Select {
                        id: overlay.id.clone(),
                        multi,
                    };
                }
                if overlay.locked {
                    ui.label(egui::RichText::new("🔒").weak());
                }
                if !overlay.visible {
                    ui.label(egui::RichText::new("🚫").weak());
                }
            });
        }

        let selected = state.selected_overlays();
        if selected.len() == 1 {
            let overlay = selected[0];
            sync_buffers(panel, overlay);
            ui.separator();
            if let Some(edit) = edit_form(ui, overlay, panel) {
                action = edit;
            }
        } else if selected.len() > 1 {
            ui.separator();
            ui.label(format!("{} overlays selected", selected.len()));
        }
    });

    action
}

fn short_label(overlay: &Overlay) -> String {
    let name = match overlay.kind {
        OverlayKind::Text => overlay.content.as_str(),
        // URIs: just the file name.
        _ => overlay
            .content
            .rsplit('/')
            .next()
            .unwrap_or(overlay.content.as_str()),
    };
    match name.char_indices().nth(20) {
        Some((idx, _)) => format!("{}…", &name[..idx]),
        None => name.to_string(),
    }
}

/// Reseed the time-window buffers when the edited overlay changes.
fn sync_buffers(panel: &mut PanelState, overlay: &Overlay) {
    if panel.target_id.as_deref() != Some(&overlay.id) {
        panel.target_id = Some(overlay.id.clone());
        panel.start_buf = format_time(overlay.start_time);
        panel.end_buf = format_time(overlay.end_time);
    }
}

fn edit_form(
    ui: &mut egui::Ui,
    overlay: &Overlay,
    panel: &mut PanelState,
) -> Option<PropertiesAction> {
    let id = overlay.id.clone();
    let mut patch = OverlayPatch::default();
    let mut other_action = None;

    ui.heading("Properties");

    if overlay.kind == OverlayKind::Text {
        let mut content = overlay.content.clone();
        ui.label("Text");
        if ui.text_edit_singleline(&mut content).changed() {
            patch.content = Some(content);
        }
    }

    egui::Grid::new("overlay_props").num_columns(2).show(ui, |ui| {
        let mut x = overlay.x;
        ui.label("X");
        if ui.add(egui::DragValue::new(&mut x).range(0.0..=f64::MAX)).changed() {
            patch.x = Some(x);
        }
        ui.end_row();

        let mut y = overlay.y;
        ui.label("Y");
        if ui.add(egui::DragValue::new(&mut y).range(0.0..=f64::MAX)).changed() {
            patch.y = Some(y);
        }
        ui.end_row();

        let mut width = overlay.effective_width();
        ui.label("Width");
        if ui.add(egui::DragValue::new(&mut width).range(1.0..=f64::MAX)).changed() {
            patch.width = Some(width);
        }
        ui.end_row();

        let mut height = overlay.effective_height();
        ui.label("Height");
        if ui.add(egui::DragValue::new(&mut height).range(1.0..=f64::MAX)).changed() {
            patch.height = Some(height);
        }
        ui.end_row();

        // Time window as MM:SS, committed on enter/defocus. Malformed
        // input parses to 0.
        ui.label("Start");
        let start_response = ui.text_edit_singleline(&mut panel.start_buf);
        if start_response.lost_focus() {
            let start = parse_time(&panel.start_buf);
            patch.start_time = Some(start.min(overlay.end_time));
            panel.start_buf = format_time(start.min(overlay.end_time));
        }
        ui.end_row();

        ui.label("End");
        let end_response = ui.text_edit_singleline(&mut panel.end_buf);
        if end_response.lost_focus() {
            let end = parse_time(&panel.end_buf);
            patch.end_time = Some(end.max(overlay.start_time));
            panel.end_buf = format_time(end.max(overlay.start_time));
        }
        ui.end_row();

        let mut opacity = overlay.opacity;
        ui.label("Opacity");
        if ui.add(egui::Slider::new(&mut opacity, 0.0..=1.0)).changed() {
            patch.opacity = Some(opacity);
        }
        ui.end_row();

        let mut rotation = overlay.rotation;
        ui.label("Rotation");
        if ui
            .add(egui::DragValue::new(&mut rotation).suffix("°"))
            .changed()
        {
            patch.rotation = Some(rotation);
        }
        ui.end_row();

        let mut scale = overlay.scale;
        ui.label("Scale");
        if ui
            .add(egui::DragValue::new(&mut scale).range(0.05..=10.0).speed(0.05))
            .changed()
        {
            patch.scale = Some(scale);
        }
        ui.end_row();

        let mut z_index = overlay.z_index;
        ui.label("Layer");
        if ui.add(egui::DragValue::new(&mut z_index)).changed() {
            patch.z_index = Some(z_index);
        }
        ui.end_row();
    });

    if overlay.kind == OverlayKind::Text {
        egui::Grid::new("text_props").num_columns(2).show(ui, |ui| {
            let mut font_size = overlay.font_size;
            ui.label("Font size");
            if ui
                .add(egui::DragValue::new(&mut font_size).range(4.0..=200.0))
                .changed()
            {
                patch.font_size = Some(font_size);
            }
            ui.end_row();

            let mut font_color = overlay.font_color.clone();
            ui.label("Color");
            if ui.text_edit_singleline(&mut font_color).changed() {
                patch.font_color = Some(font_color);
            }
            ui.end_row();

            let mut font_family = overlay.font_family.clone();
            ui.label("Font");
            if ui.text_edit_singleline(&mut font_family).changed() {
                patch.font_family = Some(font_family);
            }
            ui.end_row();

            let mut align = overlay.text_align;
            ui.label("Align");
            egui::ComboBox::from_id_source("text_align")
                .selected_text(format!("{align:?}"))
                .show_ui(ui, |ui| {
                    for mode in [TextAlign::Left, TextAlign::Center, TextAlign::Right] {
                        if ui
                            .selectable_value(&mut align, mode, format!("{mode:?}"))
                            .changed()
                        {
                            patch.text_align = Some(mode);
                        }
                    }
                });
            ui.end_row();

            let mut bold = overlay.font_weight == FontWeight::Bold;
            ui.label("Bold");
            if ui.checkbox(&mut bold, "").changed() {
                patch.font_weight = Some(if bold {
                    FontWeight::Bold
                } else {
                    FontWeight::Normal
                });
            }
            ui.end_row();
        });
    }

    ui.horizontal(|ui| {
        let mut locked = overlay.locked;
        if ui.checkbox(&mut locked, "Locked").changed() {
            patch.locked = Some(locked);
        }
        let mut visible = overlay.visible;
        if ui.checkbox(&mut visible, "Visible").changed() {
            patch.visible = Some(visible);
        }
    });

    ui.horizontal(|ui| {
        if ui.button("⧉ Duplicate").clicked() {
            other_action = Some(PropertiesAction::Duplicate(id.clone()));
        }
        if ui.button("🗑 Delete").clicked() {
            other_action = Some(PropertiesAction::Delete(id.clone()));
        }
    });

    if patch != OverlayPatch::default() {
        Some(PropertiesAction::Update { id, patch })
    } else {
        other_action
    }
}
