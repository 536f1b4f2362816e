// Copyright (c) 2025, Buttercut Contributors
// SPDX-License-Identifier: BSD-3-Clause

//! Editing surface.
//!
//! Renders the video preview area with all overlays and translates
//! pointer gestures into canvas actions. Overlay coordinates are in
//! preview-pixel space; the canvas maps them to screen space through the
//! zoom factor. Drag positions stay local until release, when the final
//! snapped and clamped position is committed.

use crate::models::editor::EditorState;
use crate::models::overlay::{Overlay, OverlayKind, TextAlign};
use crate::util::geometry::{snap_to_grid, sort_by_z_index};
use std::collections::HashMap;

/// Logical preview size in preview pixels. Export rescales from this
/// space into source-video pixels.
pub const PREVIEW_WIDTH: f64 = 640.0;
/// See [`PREVIEW_WIDTH`].
pub const PREVIEW_HEIGHT: f64 = 360.0;

/// Movement beyond this many preview pixels on either axis turns a press
/// into a drag instead of a tap.
const DRAG_THRESHOLD: f64 = 2.0;

/// An in-flight drag of one overlay. Lives in the app between frames;
/// nothing is committed to the document until release.
#[derive(Debug, Clone)]
pub struct DragState {
    pub overlay_id: String,
    pub pointer_origin: egui::Pos2,
    pub start_x: f64,
    pub start_y: f64,
    pub live_x: f64,
    pub live_y: f64,
    pub dragged: bool,
}

/// Result of canvas interaction.
#[derive(Debug, Clone)]
pub enum CanvasAction {
    None,
    Select { id: String, multi: bool },
    DeselectAll,
    DragBegin(DragState),
    DragMove { live_x: f64, live_y: f64, dragged: bool },
    DragCommit { id: String, x: f64, y: f64 },
}

/// Display the editing surface and report the gesture outcome.
pub fn show(
    ui: &mut egui::Ui,
    state: &EditorState,
    drag: &Option<DragState>,
    textures: &HashMap<String, egui::TextureHandle>,
) -> CanvasAction {
    let mut action = CanvasAction::None;

    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(25);

    let zoom = state.zoom as f32;
    let canvas_size = egui::vec2(
        PREVIEW_WIDTH as f32 * zoom,
        PREVIEW_HEIGHT as f32 * zoom,
    );

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        egui::ScrollArea::both().show(ui, |ui| {
            let (canvas_rect, background) =
                ui.allocate_exact_size(canvas_size, egui::Sense::click());
            let painter = ui.painter_at(canvas_rect);

            // Video area.
            painter.rect_filled(canvas_rect, 0.0, egui::Color32::from_gray(10));
            match &state.video_uri {
                Some(uri) => {
                    let name = uri.rsplit('/').next().unwrap_or(uri);
                    painter.text(
                        canvas_rect.center_bottom() - egui::vec2(0.0, 10.0),
                        egui::Align2::CENTER_BOTTOM,
                        name,
                        egui::FontId::proportional(11.0),
                        egui::Color32::from_gray(110),
                    );
                }
                None => {
                    painter.text(
                        canvas_rect.center(),
                        egui::Align2::CENTER_CENTER,
                        "Load a video to begin",
                        egui::FontId::proportional(16.0),
                        egui::Color32::from_gray(140),
                    );
                }
            }

            if state.snap_to_grid {
                draw_grid(&painter, canvas_rect, state.grid_size as f32 * zoom);
            }

            if background.clicked() {
                action = CanvasAction::DeselectAll;
            }

            // Ascending z-order: later widgets draw and hit-test on top.
            for overlay in sort_by_z_index(&state.overlays) {
                let dragging_this = drag
                    .as_ref()
                    .filter(|d| d.overlay_id == overlay.id)
                    .cloned();

                let (x, y) = match &dragging_this {
                    Some(d) => (d.live_x, d.live_y),
                    None => (overlay.x, overlay.y),
                };
                let rect = overlay_rect(&overlay, x, y, canvas_rect, zoom);
                draw_overlay(
                    ui,
                    &overlay,
                    rect,
                    zoom,
                    state.current_time,
                    state.selected_ids.contains(&overlay.id),
                    textures,
                );

                if overlay.locked || !overlay.visible {
                    continue;
                }

                let response = ui.interact(
                    rect,
                    ui.id().with("overlay").with(&overlay.id),
                    egui::Sense::click_and_drag(),
                );

                if response.drag_started() {
                    if let Some(origin) = response.interact_pointer_pos() {
                        action = CanvasAction::DragBegin(DragState {
                            overlay_id: overlay.id.clone(),
                            pointer_origin: origin,
                            start_x: overlay.x,
                            start_y: overlay.y,
                            live_x: overlay.x,
                            live_y: overlay.y,
                            dragged: false,
                        });
                    }
                } else if let Some(d) = &dragging_this {
                    if response.dragged() {
                        if let Some(pointer) = response.interact_pointer_pos() {
                            let dx = (pointer.x - d.pointer_origin.x) as f64 / state.zoom;
                            let dy = (pointer.y - d.pointer_origin.y) as f64 / state.zoom;
                            let dragged =
                                d.dragged || dx.abs() > DRAG_THRESHOLD || dy.abs() > DRAG_THRESHOLD;

                            let (mut live_x, mut live_y) = (d.start_x + dx, d.start_y + dy);
                            if state.snap_to_grid {
                                live_x = snap_to_grid(live_x, state.grid_size);
                                live_y = snap_to_grid(live_y, state.grid_size);
                            }
                            live_x = live_x.max(0.0);
                            live_y = live_y.max(0.0);

                            action = CanvasAction::DragMove {
                                live_x,
                                live_y,
                                dragged,
                            };
                        }
                    } else if response.drag_stopped() {
                        action = if d.dragged {
                            CanvasAction::DragCommit {
                                id: overlay.id.clone(),
                                x: d.live_x,
                                y: d.live_y,
                            }
                        } else {
                            // Press without real movement is a tap.
                            CanvasAction::Select {
                                id: overlay.id.clone(),
                                multi: ui.input(|i| i.modifiers.command || i.modifiers.ctrl),
                            }
                        };
                    }
                } else if response.clicked() {
                    action = CanvasAction::Select {
                        id: overlay.id.clone(),
                        multi: ui.input(|i| i.modifiers.command || i.modifiers.ctrl),
                    };
                }
            }
        });
    });

    action
}

/// Screen rectangle of an overlay at the given preview position.
fn overlay_rect(
    overlay: &Overlay,
    x: f64,
    y: f64,
    canvas_rect: egui::Rect,
    zoom: f32,
) -> egui::Rect {
    let scale = overlay.scale as f32;
    let size = egui::vec2(
        overlay.effective_width() as f32 * scale * zoom,
        overlay.effective_height() as f32 * scale * zoom,
    );
    egui::Rect::from_min_size(
        canvas_rect.min + egui::vec2(x as f32 * zoom, y as f32 * zoom),
        size,
    )
}

fn draw_overlay(
    ui: &egui::Ui,
    overlay: &Overlay,
    rect: egui::Rect,
    zoom: f32,
    current_time: f64,
    selected: bool,
    textures: &HashMap<String, egui::TextureHandle>,
) {
    // Hidden renders at zero; out of time window dims to 30%.
    let alpha = if !overlay.visible {
        0.0
    } else if overlay.is_visible_at(current_time) {
        overlay.opacity
    } else {
        overlay.opacity * 0.3
    };

    let painter = ui.painter();
    if alpha > 0.0 {
        let alpha_u8 = (alpha * 255.0).round() as u8;
        match overlay.kind {
            OverlayKind::Text => {
                let color = parse_hex_color(&overlay.font_color)
                    .gamma_multiply(alpha as f32);
                let font = egui::FontId::proportional(
                    overlay.font_size as f32 * overlay.scale as f32 * zoom,
                );
                let (anchor, align) = match overlay.text_align {
                    TextAlign::Left => (rect.left_center(), egui::Align2::LEFT_CENTER),
                    TextAlign::Center => (rect.center(), egui::Align2::CENTER_CENTER),
                    TextAlign::Right => (rect.right_center(), egui::Align2::RIGHT_CENTER),
                };
                painter.text(anchor, align, &overlay.content, font, color);
            }
            OverlayKind::Image => match textures.get(&overlay.content) {
                Some(texture) => {
                    painter.image(
                        texture.id(),
                        rect,
                        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        egui::Color32::from_white_alpha(alpha_u8),
                    );
                }
                None => {
                    placeholder(painter, rect, "🖼", alpha_u8);
                }
            },
            OverlayKind::Video => {
                placeholder(painter, rect, "📹", alpha_u8);
            }
        }
    }

    if selected {
        painter.rect_stroke(
            rect,
            2.0,
            egui::Stroke::new(2.0, egui::Color32::from_rgb(90, 140, 220)),
        );
    }
    if overlay.locked {
        painter.text(
            rect.right_top() + egui::vec2(-4.0, 4.0),
            egui::Align2::RIGHT_TOP,
            "🔒",
            egui::FontId::proportional(12.0),
            egui::Color32::from_white_alpha(120),
        );
    }
}

fn placeholder(painter: &egui::Painter, rect: egui::Rect, icon: &str, alpha: u8) {
    painter.rect_filled(
        rect,
        4.0,
        egui::Color32::from_rgba_unmultiplied(80, 80, 80, alpha / 2),
    );
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        icon,
        egui::FontId::proportional(24.0),
        egui::Color32::from_white_alpha(alpha),
    );
}

fn draw_grid(painter: &egui::Painter, rect: egui::Rect, step: f32) {
    if step < 2.0 {
        return;
    }
    let stroke = egui::Stroke::new(0.5, egui::Color32::from_gray(45));
    let mut x = rect.min.x;
    while x <= rect.max.x {
        painter.line_segment([egui::pos2(x, rect.min.y), egui::pos2(x, rect.max.y)], stroke);
        x += step;
    }
    let mut y = rect.min.y;
    while y <= rect.max.y {
        painter.line_segment([egui::pos2(rect.min.x, y), egui::pos2(rect.max.x, y)], stroke);
        y += step;
    }
}

/// Parse a `#RRGGBB` (or `#RGB`) color, defaulting to white.
fn parse_hex_color(hex: &str) -> egui::Color32 {
    let hex = hex.trim_start_matches('#');
    match hex.len() {
        6 => {
            let parsed = u32::from_str_radix(hex, 16).ok();
            match parsed {
                Some(rgb) => egui::Color32::from_rgb(
                    ((rgb >> 16) & 0xFF) as u8,
                    ((rgb >> 8) & 0xFF) as u8,
                    (rgb & 0xFF) as u8,
                ),
                None => egui::Color32::WHITE,
            }
        }
        3 => {
            let parsed = u32::from_str_radix(hex, 16).ok();
            match parsed {
                Some(rgb) => {
                    let r = ((rgb >> 8) & 0xF) as u8;
                    let g = ((rgb >> 4) & 0xF) as u8;
                    let b = (rgb & 0xF) as u8;
                    egui::Color32::from_rgb(r * 17, g * 17, b * 17)
                }
                None => egui::Color32::WHITE,
            }
        }
        _ => egui::Color32::WHITE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#FFFFFF"), egui::Color32::WHITE);
        assert_eq!(parse_hex_color("#FF0000"), egui::Color32::from_rgb(255, 0, 0));
        assert_eq!(parse_hex_color("#F00"), egui::Color32::from_rgb(255, 0, 0));
        assert_eq!(parse_hex_color("garbage"), egui::Color32::WHITE);
    }
}
