// Copyright (c) 2025, Buttercut Contributors
// SPDX-License-Identifier: BSD-3-Clause

//! Transient toast notifications.
//!
//! Toasts queue up in the corner of the window and expire on their own.
//! They carry user-facing outcomes only; nothing here touches the
//! document state.

use crate::models::project::{ToastKind, ToastMessage};
use std::time::Instant;

const DEFAULT_DURATION: f64 = 3.0;

/// Queue of live toasts with their display deadlines.
pub struct ToastQueue {
    toasts: Vec<(ToastMessage, Instant)>,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl ToastQueue {
    pub fn new() -> Self {
        Self { toasts: Vec::new() }
    }

    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) {
        let toast = ToastMessage::new(kind, message, DEFAULT_DURATION);
        log::info!("Toast [{:?}]: {}", toast.kind, toast.message);
        self.toasts.push((toast, Instant::now()));
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Error, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Warning, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Info, message);
    }

    /// Drop expired toasts and draw the rest in the bottom-right corner.
    pub fn show(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        self.toasts.retain(|(toast, shown_at)| {
            now.duration_since(*shown_at).as_secs_f64() < toast.duration
        });
        if self.toasts.is_empty() {
            return;
        }

        egui::Area::new(egui::Id::new("toasts"))
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-16.0, -16.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                for (toast, _) in &self.toasts {
                    let (fill, icon) = match toast.kind {
                        ToastKind::Success => (egui::Color32::from_rgb(30, 90, 40), "✔"),
                        ToastKind::Error => (egui::Color32::from_rgb(120, 40, 40), "✖"),
                        ToastKind::Warning => (egui::Color32::from_rgb(120, 90, 30), "⚠"),
                        ToastKind::Info => (egui::Color32::from_rgb(40, 60, 100), "ℹ"),
                    };
                    egui::Frame::none()
                        .fill(fill)
                        .rounding(4.0)
                        .inner_margin(egui::Margin::symmetric(10.0, 6.0))
                        .show(ui, |ui| {
                            ui.horizontal(|ui| {
                                ui.label(egui::RichText::new(icon).color(egui::Color32::WHITE));
                                ui.label(
                                    egui::RichText::new(&toast.message)
                                        .color(egui::Color32::WHITE),
                                );
                            });
                        });
                    ui.add_space(6.0);
                }
            });

        // Keep repainting so expiry happens without input events.
        ctx.request_repaint_after(std::time::Duration::from_millis(250));
    }
}
