// Copyright (c) 2025, Buttercut Contributors
// SPDX-License-Identifier: BSD-3-Clause

//! Buttercut - video overlay editor
//!
//! A desktop application for composing text, image and video overlays on
//! a timeline and submitting the result to a rendering backend.

mod app;
mod io;
mod models;
mod net;
mod ui;
mod util;

use anyhow::Result;
use app::ButtercutApp;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("Buttercut - Video Overlay Editor"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Buttercut",
        options,
        Box::new(|_cc| Ok(Box::new(ButtercutApp::new()))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
