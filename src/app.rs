// Copyright (c) 2025, Buttercut Contributors
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! Owns the document, the clipboard and all background workers, wires
//! the panels together and translates their actions into store
//! dispatches. Uploads and job polling run on worker threads with mpsc
//! result delivery; the update loop drains them without blocking.

use crate::io::media::{self, ClockPlayer, LoadedImage, PlaybackProvider};
use crate::io::serialization::{self, ProjectStore};
use crate::models::editor::{Clipboard, EditorAction, EditorState};
use crate::models::overlay::{Overlay, OverlayKind, OverlayPatch};
use crate::models::project::{JobStatus, UploadResponse, VideoProject};
use crate::net::api::ApiClient;
use crate::net::job::{JobWatcher, POLL_INTERVAL};
use crate::ui::canvas::{self, DragState, PREVIEW_HEIGHT, PREVIEW_WIDTH};
use crate::ui::properties;
use crate::ui::timeline;
use crate::ui::toast::ToastQueue;
use crate::ui::toolbar;
use crate::util::geometry;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};

/// Default time window lengths for new overlays, in seconds.
const TEXT_OVERLAY_SECONDS: f64 = 3.0;
const MEDIA_OVERLAY_SECONDS: f64 = 5.0;
/// Duration assumed for a newly loaded video until the user sets the real one.
const FALLBACK_DURATION: f64 = 60.0;

/// Main application state.
pub struct ButtercutApp {
    /// The document. Replaced wholesale on every dispatch.
    state: EditorState,
    /// Owned clipboard, passed into the reducer; outlives any document.
    clipboard: Clipboard,
    toasts: ToastQueue,

    /// Text for the next text overlay.
    text_value: String,
    /// In-flight canvas drag, if any.
    drag: Option<DragState>,
    props_panel: properties::PanelState,

    /// Playback stand-in for the loaded video.
    player: Option<ClockPlayer>,
    /// Local filesystem path of the loaded video (upload source).
    video_path: Option<PathBuf>,
    /// Native video dimensions when known; preview space is used as-is
    /// otherwise.
    video_size: Option<(f64, f64)>,

    /// Decoded overlay images keyed by content URI.
    image_textures: HashMap<String, egui::TextureHandle>,
    /// Shared channel for image decode workers; any number of loads can be
    /// in flight at once.
    image_tx: Sender<Result<(String, LoadedImage), String>>,
    image_rx: Receiver<Result<(String, LoadedImage), String>>,

    upload_worker: Option<Receiver<Result<UploadResponse, String>>>,
    job_watcher: Option<JobWatcher>,
    last_job_status: Option<JobStatus>,

    project_store: Option<ProjectStore>,
    /// Cached saved-project list, refreshed after save/delete.
    projects: Vec<VideoProject>,
    current_project_id: Option<String>,
}

impl Default for ButtercutApp {
    fn default() -> Self {
        Self::new()
    }
}

impl ButtercutApp {
    pub fn new() -> Self {
        let project_store = match ProjectStore::open_default() {
            Ok(store) => Some(store),
            Err(e) => {
                log::error!("Project store unavailable: {e}");
                None
            }
        };
        let projects = project_store
            .as_ref()
            .and_then(|store| store.load_projects().ok())
            .unwrap_or_default();
        let (image_tx, image_rx) = channel();
        Self {
            state: EditorState::new(),
            clipboard: Clipboard::new(),
            toasts: ToastQueue::new(),
            text_value: String::new(),
            drag: None,
            props_panel: properties::PanelState::default(),
            player: None,
            video_path: None,
            video_size: None,
            image_textures: HashMap::new(),
            image_tx,
            image_rx,
            upload_worker: None,
            job_watcher: None,
            last_job_status: None,
            project_store,
            projects,
            current_project_id: None,
        }
    }

    /// Wholesale reset to an empty document.
    fn new_project(&mut self) {
        self.dispatch(EditorAction::ResetProject);
        self.player = None;
        self.video_path = None;
        self.video_size = None;
        self.drag = None;
        self.current_project_id = None;
    }

    fn refresh_project_list(&mut self) {
        if let Some(store) = &self.project_store {
            match store.load_projects() {
                Ok(projects) => self.projects = projects,
                Err(e) => log::error!("Failed to reload project list: {e}"),
            }
        }
    }

    /// Route one action through the reducer.
    fn dispatch(&mut self, action: EditorAction) {
        self.state = self.state.apply(action, &mut self.clipboard);
    }

    fn pick_video(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Videos", &["mp4", "mov", "mkv", "webm", "avi"])
            .pick_file()
        else {
            return;
        };

        let uri = path.to_string_lossy().to_string();
        self.dispatch(EditorAction::SetVideo {
            uri: uri.clone(),
            duration: FALLBACK_DURATION,
        });
        self.player = Some(ClockPlayer::new(FALLBACK_DURATION));
        self.video_path = Some(path);
        self.video_size = None;
        self.drag = None;
        self.job_watcher = None;
        self.last_job_status = None;
        self.current_project_id = None;
        log::info!("Loaded video {uri}");
        self.toasts.success("Video loaded");
    }

    fn add_text_overlay(&mut self) {
        let text = self.text_value.trim().to_string();
        if text.is_empty() {
            self.toasts.error("Please enter some text");
            return;
        }
        let overlay = Overlay::new(
            OverlayKind::Text,
            text,
            50.0,
            50.0,
            self.state.current_time,
            (self.state.current_time + TEXT_OVERLAY_SECONDS).min(self.state.video_duration),
        );
        self.dispatch(EditorAction::AddOverlay(overlay));
        self.text_value.clear();
        self.toasts.success("Text overlay added");
    }

    fn add_image_overlay(&mut self, ctx: &egui::Context) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &["jpg", "jpeg", "png", "gif", "bmp", "webp"])
            .pick_file()
        else {
            return;
        };
        let uri = path.to_string_lossy().to_string();
        self.spawn_image_loader(path, uri.clone(), ctx);

        let overlay = Overlay::new(
            OverlayKind::Image,
            uri,
            50.0,
            50.0,
            self.state.current_time,
            (self.state.current_time + MEDIA_OVERLAY_SECONDS).min(self.state.video_duration),
        );
        self.dispatch(EditorAction::AddOverlay(overlay));
        self.toasts.success("Image overlay added");
    }

    fn add_video_overlay(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Videos", &["mp4", "mov", "mkv", "webm", "avi"])
            .pick_file()
        else {
            return;
        };
        let overlay = Overlay::new(
            OverlayKind::Video,
            path.to_string_lossy().to_string(),
            50.0,
            50.0,
            self.state.current_time,
            (self.state.current_time + MEDIA_OVERLAY_SECONDS).min(self.state.video_duration),
        );
        self.dispatch(EditorAction::AddOverlay(overlay));
        self.toasts.success("Video overlay added");
    }

    /// Decode an overlay image on a background thread.
    fn spawn_image_loader(&mut self, path: PathBuf, uri: String, ctx: &egui::Context) {
        let sender = self.image_tx.clone();
        let ctx = ctx.clone();
        std::thread::spawn(move || {
            let result = media::load_image(&path)
                .map(|img| (uri, img))
                .map_err(|e| e.to_string());
            let _ = sender.send(result);
            ctx.request_repaint();
        });
    }

    /// Start decode workers for every image overlay without a texture yet.
    /// Run after opening or importing a project.
    fn load_missing_images(&mut self, ctx: &egui::Context) {
        for uri in missing_image_uris(&self.state.overlays, &self.image_textures) {
            let path = PathBuf::from(uri.strip_prefix("file://").unwrap_or(&uri));
            self.spawn_image_loader(path, uri, ctx);
        }
    }

    /// Reposition the current selection through the pure geometry helpers
    /// and commit the moves as per-overlay patches.
    fn arrange_selection(&mut self, arrange: impl Fn(&[Overlay]) -> Vec<Overlay>) {
        let selected: Vec<Overlay> = self
            .state
            .selected_overlays()
            .into_iter()
            .cloned()
            .collect();
        for moved in arrange(&selected) {
            self.dispatch(EditorAction::UpdateOverlay {
                id: moved.id.clone(),
                patch: OverlayPatch::position(moved.x, moved.y),
            });
        }
    }

    fn duplicate_selection(&mut self) {
        let ids = self.state.selected_ids.clone();
        if ids.is_empty() {
            return;
        }
        for id in ids {
            self.dispatch(EditorAction::DuplicateOverlay(id));
        }
        self.toasts.success("Overlay duplicated");
    }

    fn copy_selection(&mut self) {
        let ids = self.state.selected_ids.clone();
        if ids.is_empty() {
            return;
        }
        let count = ids.len();
        self.dispatch(EditorAction::CopyOverlays(ids));
        self.toasts.success(format!("Copied {count} overlay(s)"));
    }

    fn paste(&mut self) {
        if self.clipboard.is_empty() {
            return;
        }
        self.dispatch(EditorAction::PasteOverlays);
        self.toasts.success("Overlays pasted");
    }

    fn delete_selection(&mut self) {
        if self.state.selected_ids.is_empty() {
            return;
        }
        self.dispatch(EditorAction::DeleteSelected);
        self.toasts.success("Overlays deleted");
    }

    fn set_playing(&mut self, playing: bool) {
        if let Some(player) = &mut self.player {
            player.set_playing(playing);
        }
        self.dispatch(EditorAction::SetPlaying(playing));
    }

    fn seek(&mut self, time: f64) {
        if let Some(player) = &mut self.player {
            player.seek(time);
        }
        self.dispatch(EditorAction::SetCurrentTime(time));
    }

    /// Sample the playback provider into the document. Skipped while the
    /// provider is not ready.
    fn sync_player_time(&mut self, ctx: &egui::Context) {
        let Some(player) = &mut self.player else {
            return;
        };
        player.tick();
        let playing = player.is_playing();
        if let Some(time) = player.current_time() {
            if time != self.state.current_time {
                self.dispatch(EditorAction::SetCurrentTime(time));
            }
        }
        if playing != self.state.is_playing {
            self.dispatch(EditorAction::SetPlaying(playing));
        }
        if playing {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }

    /// Validate and upload the composition on a worker thread.
    fn submit_to_backend(&mut self) {
        if self.upload_worker.is_some() {
            self.toasts.warning("Upload already in progress");
            return;
        }
        let Some(video_path) = self.video_path.clone() else {
            self.toasts.error("Please select a video first");
            return;
        };
        if self.state.overlays.is_empty() {
            self.toasts.error("Please add at least one overlay");
            return;
        }

        let overlays = export_overlays(&self.state.overlays, self.video_size);

        let (sender, receiver) = channel();
        self.upload_worker = Some(receiver);
        std::thread::spawn(move || {
            let api = ApiClient::from_env();
            let result = api
                .upload(&video_path, &overlays)
                .map_err(|e| e.to_string());
            let _ = sender.send(result);
        });
        log::info!("Submitting composition with {} overlays", self.state.overlays.len());
    }

    fn poll_workers(&mut self, ctx: &egui::Context) {
        while let Ok(result) = self.image_rx.try_recv() {
            match result {
                Ok((uri, img)) => {
                    let size = [img.width as usize, img.height as usize];
                    let color_image =
                        egui::ColorImage::from_rgba_unmultiplied(size, &img.pixels);
                    let texture =
                        ctx.load_texture(uri.clone(), color_image, egui::TextureOptions::LINEAR);
                    self.image_textures.insert(uri, texture);
                }
                Err(e) => {
                    log::error!("Failed to load overlay image: {e}");
                    self.toasts.error(format!("Failed to load image: {e}"));
                }
            }
        }

        if let Some(receiver) = &self.upload_worker {
            if let Ok(result) = receiver.try_recv() {
                self.upload_worker = None;
                match result {
                    Ok(response) => {
                        log::info!("Upload accepted as job {}", response.job_id);
                        self.toasts.success("Video submitted for processing");
                        self.job_watcher = Some(JobWatcher::spawn(
                            ApiClient::from_env(),
                            response.job_id,
                            POLL_INTERVAL,
                        ));
                        self.last_job_status = None;
                    }
                    Err(e) => {
                        log::error!("Upload failed: {e}");
                        self.toasts.error(format!("Upload failed: {e}"));
                    }
                }
            }
        }

        let mut finished = false;
        if let Some(watcher) = &self.job_watcher {
            while let Some(result) = watcher.try_recv() {
                match result {
                    Ok(status) => {
                        finished = status.status.is_terminal();
                        self.last_job_status = Some(status);
                    }
                    Err(e) => {
                        log::error!("Status poll failed: {e}");
                        self.toasts.error(format!("Status check failed: {e}"));
                        finished = true;
                    }
                }
            }
            if self.job_watcher.is_some() && !finished {
                ctx.request_repaint_after(POLL_INTERVAL);
            }
        }
        if finished {
            self.job_watcher = None;
            if let Some(status) = &self.last_job_status {
                match status.status {
                    crate::models::project::JobState::Completed => {
                        self.toasts.success("Rendering finished")
                    }
                    crate::models::project::JobState::Failed => {
                        self.toasts.error(format!("Rendering failed: {}", status.message))
                    }
                    _ => {}
                }
            }
        }
    }

    fn save_project(&mut self) {
        let Some(store) = &self.project_store else {
            self.toasts.error("Project storage unavailable");
            return;
        };
        let Some(video_uri) = self.state.video_uri.clone() else {
            self.toasts.error("Please select a video first");
            return;
        };

        let name = video_uri
            .rsplit('/')
            .next()
            .unwrap_or("Untitled")
            .to_string();
        let mut project = VideoProject::new(name, video_uri, self.state.video_duration);
        if let Some(id) = &self.current_project_id {
            project.id = id.clone();
        }
        project.overlays = self.state.overlays.clone();

        match store
            .save_project(&project)
            .and_then(|saved| store.set_current_project(Some(&saved.id)).map(|_| saved))
        {
            Ok(saved) => {
                self.current_project_id = Some(saved.id);
                self.toasts.success("Project saved");
            }
            Err(e) => {
                log::error!("Failed to save project: {e}");
                self.toasts.error(format!("Failed to save project: {e}"));
            }
        }
        self.refresh_project_list();
    }

    /// Replace the document with a saved project.
    fn open_project(&mut self, project: VideoProject, ctx: &egui::Context) {
        self.state = EditorState::from_project(&project);
        self.player = Some(ClockPlayer::new(project.video_duration));
        self.video_path = Some(PathBuf::from(
            project
                .video_uri
                .strip_prefix("file://")
                .unwrap_or(&project.video_uri),
        ));
        self.video_size = None;
        self.current_project_id = Some(project.id.clone());
        self.drag = None;
        if let Some(store) = &self.project_store {
            if let Err(e) = store.set_current_project(Some(&project.id)) {
                log::error!("Failed to record current project: {e}");
            }
        }
        self.load_missing_images(ctx);
        log::info!("Opened project {}", project.name);
    }

    fn delete_saved_project(&mut self, id: &str) {
        let Some(store) = &self.project_store else {
            return;
        };
        match store.delete_project(id) {
            Ok(()) => {
                if self.current_project_id.as_deref() == Some(id) {
                    self.current_project_id = None;
                }
                self.toasts.success("Project deleted");
            }
            Err(e) => {
                log::error!("Failed to delete project: {e}");
                self.toasts.error(format!("Failed to delete project: {e}"));
            }
        }
        self.refresh_project_list();
    }

    fn export_project(&mut self, yaml: bool) {
        let Some(video_uri) = self.state.video_uri.clone() else {
            self.toasts.error("Nothing to export");
            return;
        };
        let (filter, extensions, default_name) = if yaml {
            ("YAML", &["yaml", "yml"][..], "project.yaml")
        } else {
            ("JSON", &["json"][..], "project.json")
        };
        let Some(path) = rfd::FileDialog::new()
            .add_filter(filter, extensions)
            .set_file_name(default_name)
            .save_file()
        else {
            return;
        };

        let name = video_uri.rsplit('/').next().unwrap_or("Untitled").to_string();
        let mut project = VideoProject::new(name, video_uri, self.state.video_duration);
        project.overlays = self.state.overlays.clone();

        let result = if yaml {
            serialization::export_yaml(&project, &path)
        } else {
            serialization::export_json(&project, &path)
        };
        match result {
            Ok(()) => {
                log::info!("Exported project to {}", path.display());
                self.toasts.success("Project exported");
            }
            Err(e) => {
                log::error!("Failed to export project: {e}");
                self.toasts.error(format!("Export failed: {e}"));
            }
        }
    }

    fn import_project(&mut self, ctx: &egui::Context) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Projects", &["yaml", "yml", "json"])
            .pick_file()
        else {
            return;
        };
        let result = match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => serialization::import_yaml(&path),
            Some("json") => serialization::import_json(&path),
            other => {
                log::error!("Unsupported project extension: {other:?}");
                self.toasts.error("Unsupported project file");
                return;
            }
        };
        match result {
            Ok(project) => {
                self.state = EditorState::from_project(&project);
                self.player = Some(ClockPlayer::new(project.video_duration));
                self.video_path = Some(PathBuf::from(
                    project.video_uri.strip_prefix("file://").unwrap_or(&project.video_uri),
                ));
                self.current_project_id = Some(project.id.clone());
                self.drag = None;
                self.load_missing_images(ctx);
                log::info!(
                    "Imported project {} with {} overlays",
                    project.name,
                    project.overlays.len()
                );
                self.toasts.success("Project imported");
            }
            Err(e) => {
                log::error!("Failed to import project: {e}");
                self.toasts.error(format!("Import failed: {e}"));
            }
        }
    }

    fn handle_toolbar_action(&mut self, action: toolbar::ToolbarAction, ctx: &egui::Context) {
        use toolbar::ToolbarAction::*;
        match action {
            None => {}
            PickVideo => self.pick_video(),
            AddText => self.add_text_overlay(),
            AddImage => self.add_image_overlay(ctx),
            AddVideoClip => self.add_video_overlay(),
            Align(mode) => {
                self.arrange_selection(|set| geometry::align_overlays(set, mode));
                self.toasts.success("Overlays aligned");
            }
            Distribute(axis) => {
                self.arrange_selection(|set| geometry::distribute_overlays(set, axis));
                self.toasts.success("Overlays distributed");
            }
            Duplicate => self.duplicate_selection(),
            Copy => self.copy_selection(),
            Paste => self.paste(),
            DeleteSelected => self.delete_selection(),
            Undo => self.dispatch(EditorAction::Undo),
            Redo => self.dispatch(EditorAction::Redo),
            ZoomIn => self.dispatch(EditorAction::SetZoom(self.state.zoom + 0.25)),
            ZoomOut => self.dispatch(EditorAction::SetZoom(self.state.zoom - 0.25)),
            ZoomReset => self.dispatch(EditorAction::SetZoom(1.0)),
            ToggleSnap => self.dispatch(EditorAction::ToggleSnapToGrid),
            SetGridSize(size) => self.dispatch(EditorAction::SetGridSize(size)),
            Submit => self.submit_to_backend(),
        }
    }

    fn handle_canvas_action(&mut self, action: canvas::CanvasAction) {
        match action {
            canvas::CanvasAction::None => {}
            canvas::CanvasAction::Select { id, multi } => {
                self.dispatch(EditorAction::SelectOverlay {
                    id,
                    multi_select: multi,
                });
                self.drag = None;
            }
            canvas::CanvasAction::DeselectAll => {
                self.dispatch(EditorAction::DeselectAll);
            }
            canvas::CanvasAction::DragBegin(drag) => {
                // Drag start makes the overlay the sole selection.
                self.dispatch(EditorAction::SelectOverlay {
                    id: drag.overlay_id.clone(),
                    multi_select: false,
                });
                self.drag = Some(drag);
            }
            canvas::CanvasAction::DragMove {
                live_x,
                live_y,
                dragged,
            } => {
                if let Some(drag) = &mut self.drag {
                    drag.live_x = live_x;
                    drag.live_y = live_y;
                    drag.dragged = dragged;
                }
            }
            canvas::CanvasAction::DragCommit { id, x, y } => {
                self.dispatch(EditorAction::UpdateOverlay {
                    id,
                    patch: OverlayPatch::position(x.max(0.0), y.max(0.0)),
                });
                self.drag = None;
            }
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }

        if ctx.input(|i| i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace)) {
            self.delete_selection();
        }
        if ctx.input(|i| {
            i.modifiers.command && i.key_pressed(egui::Key::Z) && !i.modifiers.shift
        }) {
            self.dispatch(EditorAction::Undo);
        }
        if ctx.input(|i| {
            (i.modifiers.command && i.modifiers.shift && i.key_pressed(egui::Key::Z))
                || (i.modifiers.command && i.key_pressed(egui::Key::Y))
        }) {
            self.dispatch(EditorAction::Redo);
        }
        if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::C)) {
            self.copy_selection();
        }
        if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::V)) {
            self.paste();
        }
        if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::D)) {
            self.duplicate_selection();
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.dispatch(EditorAction::DeselectAll);
            self.drag = None;
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Space)) {
            self.set_playing(!self.state.is_playing);
        }
    }

    fn show_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("New Project").clicked() {
                        self.new_project();
                        ui.close_menu();
                    }
                    if ui.button("Open Video...").clicked() {
                        self.pick_video();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Save Project").clicked() {
                        self.save_project();
                        ui.close_menu();
                    }
                    if ui.button("Import Project...").clicked() {
                        self.import_project(ctx);
                        ui.close_menu();
                    }
                    ui.menu_button("Export Project", |ui| {
                        if ui.button("As YAML...").clicked() {
                            self.export_project(true);
                            ui.close_menu();
                        }
                        if ui.button("As JSON...").clicked() {
                            self.export_project(false);
                            ui.close_menu();
                        }
                    });
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Projects", |ui| {
                    if self.projects.is_empty() {
                        ui.weak("No saved projects");
                    }
                    let mut open = Option::<VideoProject>::None;
                    let mut delete = Option::<String>::None;
                    for project in &self.projects {
                        ui.horizontal(|ui| {
                            if ui.button(&project.name).clicked() {
                                open = Some(project.clone());
                                ui.close_menu();
                            }
                            if ui.small_button("🗑").clicked() {
                                delete = Some(project.id.clone());
                                ui.close_menu();
                            }
                        });
                    }
                    if let Some(project) = open {
                        self.open_project(project, ctx);
                        self.toasts.success("Project loaded");
                    }
                    if let Some(id) = delete {
                        self.delete_saved_project(&id);
                    }
                });

                ui.menu_button("Edit", |ui| {
                    if ui
                        .add_enabled(self.state.can_undo(), egui::Button::new("Undo (Ctrl+Z)"))
                        .clicked()
                    {
                        self.dispatch(EditorAction::Undo);
                        ui.close_menu();
                    }
                    if ui
                        .add_enabled(
                            self.state.can_redo(),
                            egui::Button::new("Redo (Ctrl+Shift+Z)"),
                        )
                        .clicked()
                    {
                        self.dispatch(EditorAction::Redo);
                        ui.close_menu();
                    }
                    ui.separator();
                    let has_selection = !self.state.selected_ids.is_empty();
                    if ui
                        .add_enabled(has_selection, egui::Button::new("Copy (Ctrl+C)"))
                        .clicked()
                    {
                        self.copy_selection();
                        ui.close_menu();
                    }
                    if ui
                        .add_enabled(!self.clipboard.is_empty(), egui::Button::new("Paste (Ctrl+V)"))
                        .clicked()
                    {
                        self.paste();
                        ui.close_menu();
                    }
                    if ui
                        .add_enabled(has_selection, egui::Button::new("Duplicate (Ctrl+D)"))
                        .clicked()
                    {
                        self.duplicate_selection();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui
                        .add_enabled(has_selection, egui::Button::new("Delete Selected"))
                        .clicked()
                    {
                        self.delete_selection();
                        ui.close_menu();
                    }
                    if ui.button("Deselect All").clicked() {
                        self.dispatch(EditorAction::DeselectAll);
                        ui.close_menu();
                    }
                });

                ui.menu_button("View", |ui| {
                    if ui.button("Zoom In").clicked() {
                        self.dispatch(EditorAction::SetZoom(self.state.zoom + 0.25));
                        ui.close_menu();
                    }
                    if ui.button("Zoom Out").clicked() {
                        self.dispatch(EditorAction::SetZoom(self.state.zoom - 0.25));
                        ui.close_menu();
                    }
                    if ui.button("Reset Zoom").clicked() {
                        self.dispatch(EditorAction::SetZoom(1.0));
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Toggle Grid Snap").clicked() {
                        self.dispatch(EditorAction::ToggleSnapToGrid);
                        ui.close_menu();
                    }
                });
            });
        });
    }

    /// Duration and native-size fields for the loaded video. The native
    /// size drives the preview-to-video rescale at submit time; left unset,
    /// preview coordinates are submitted as-is.
    fn show_video_settings(&mut self, ui: &mut egui::Ui) {
        if self.state.video_uri.is_none() {
            return;
        }
        ui.heading("Video");
        egui::Grid::new("video_settings").num_columns(2).show(ui, |ui| {
            let mut duration = self.state.video_duration;
            ui.label("Duration");
            if ui
                .add(
                    egui::DragValue::new(&mut duration)
                        .range(0.1..=36000.0)
                        .suffix(" s"),
                )
                .changed()
            {
                self.set_video_duration(duration);
            }
            ui.end_row();

            let (mut width, mut height) = self.video_size.unwrap_or((0.0, 0.0));
            let mut changed = false;
            ui.label("Native width");
            changed |= ui
                .add(egui::DragValue::new(&mut width).range(0.0..=8192.0).suffix(" px"))
                .changed();
            ui.end_row();
            ui.label("Native height");
            changed |= ui
                .add(egui::DragValue::new(&mut height).range(0.0..=8192.0).suffix(" px"))
                .changed();
            ui.end_row();
            if changed {
                self.video_size = (width > 0.0 && height > 0.0).then_some((width, height));
            }
        });
        ui.separator();
    }

    fn set_video_duration(&mut self, duration: f64) {
        let duration = duration.max(0.1);
        self.dispatch(EditorAction::SetVideoDuration(duration));
        if let Some(player) = &mut self.player {
            player.set_duration(duration);
        }
    }

    fn show_job_status(&mut self, ui: &mut egui::Ui) {
        let Some(status) = self.last_job_status.clone() else {
            return;
        };
        ui.horizontal(|ui| {
            let label = match status.status {
                crate::models::project::JobState::Pending => "Queued",
                crate::models::project::JobState::Processing => "Rendering",
                crate::models::project::JobState::Completed => "Done",
                crate::models::project::JobState::Failed => "Failed",
            };
            ui.label(format!("{label}: {:.0}%", status.progress));
            ui.add(
                egui::ProgressBar::new((status.progress / 100.0) as f32)
                    .desired_width(160.0),
            );
            if status.status == crate::models::project::JobState::Completed {
                let url = ApiClient::from_env().result_url(&status.job_id);
                ui.hyperlink_to("Download result", url);
            }
            if !status.message.is_empty() {
                ui.label(egui::RichText::new(&status.message).weak());
            }
            if status.status.is_terminal() && ui.button("Dismiss").clicked() {
                self.last_job_status = None;
                // Best-effort server-side cleanup.
                let job_id = status.job_id.clone();
                std::thread::spawn(move || {
                    if let Err(e) = ApiClient::from_env().delete_job(&job_id) {
                        log::warn!("Failed to remove job {job_id}: {e}");
                    }
                });
            }
        });
        ui.separator();
    }
}

/// Overlays in the coordinate space the backend expects. Without known
/// native dimensions the preview space is submitted as-is.
fn export_overlays(overlays: &[Overlay], video_size: Option<(f64, f64)>) -> Vec<Overlay> {
    match video_size {
        Some((video_w, video_h)) => geometry::scale_for_export(
            overlays,
            PREVIEW_WIDTH,
            PREVIEW_HEIGHT,
            video_w,
            video_h,
        ),
        None => overlays.to_vec(),
    }
}

/// Unique URIs of image overlays with no decoded texture yet.
fn missing_image_uris(
    overlays: &[Overlay],
    loaded: &HashMap<String, egui::TextureHandle>,
) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    overlays
        .iter()
        .filter(|o| o.kind == OverlayKind::Image && !loaded.contains_key(&o.content))
        .filter(|o| seen.insert(o.content.clone()))
        .map(|o| o.content.clone())
        .collect()
}

impl eframe::App for ButtercutApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_workers(ctx);
        self.sync_player_time(ctx);
        self.handle_shortcuts(ctx);
        self.show_menu_bar(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            let mut text_value = std::mem::take(&mut self.text_value);
            let action = toolbar::show(ui, &self.state, &mut text_value);
            self.text_value = text_value;
            self.handle_toolbar_action(action, ctx);
        });

        let properties_action = egui::SidePanel::right("properties")
            .default_width(260.0)
            .show(ctx, |ui| {
                self.show_video_settings(ui);
                properties::show(ui, &self.state, &mut self.props_panel)
            })
            .inner;
        match properties_action {
            properties::PropertiesAction::None => {}
            properties::PropertiesAction::Select { id, multi } => {
                self.dispatch(EditorAction::SelectOverlay {
                    id,
                    multi_select: multi,
                });
            }
            properties::PropertiesAction::Update { id, patch } => {
                self.dispatch(EditorAction::UpdateOverlay { id, patch });
            }
            properties::PropertiesAction::Delete(id) => {
                self.dispatch(EditorAction::DeleteOverlay(id));
                self.toasts.success("Overlay deleted");
            }
            properties::PropertiesAction::Duplicate(id) => {
                self.dispatch(EditorAction::DuplicateOverlay(id));
                self.toasts.success("Overlay duplicated");
            }
        }

        let timeline_action = egui::TopBottomPanel::bottom("timeline")
            .resizable(true)
            .default_height(120.0)
            .show(ctx, |ui| {
                self.show_job_status(ui);
                timeline::show(ui, &self.state)
            })
            .inner;
        match timeline_action {
            timeline::TimelineAction::None => {}
            timeline::TimelineAction::Seek(time) => self.seek(time),
            timeline::TimelineAction::SetPlaying(playing) => self.set_playing(playing),
            timeline::TimelineAction::Select { id, multi } => {
                self.dispatch(EditorAction::SelectOverlay {
                    id,
                    multi_select: multi,
                });
            }
        }

        let canvas_action = egui::CentralPanel::default()
            .show(ctx, |ui| {
                canvas::show(ui, &self.state, &self.drag, &self.image_textures)
            })
            .inner;
        self.handle_canvas_action(canvas_action);

        self.toasts.show(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_overlays_rescales_when_size_known() {
        // Preview 640x360 -> 1920x1080 is a 3x factor on both axes.
        let overlays = vec![Overlay::new(OverlayKind::Text, "t", 64.0, 36.0, 0.0, 3.0)];
        let scaled = export_overlays(&overlays, Some((1920.0, 1080.0)));
        assert_eq!(scaled[0].x, 192.0);
        assert_eq!(scaled[0].y, 108.0);
        assert_eq!(scaled[0].width, Some(600.0));
        assert_eq!(scaled[0].height, Some(300.0));
    }

    #[test]
    fn test_export_overlays_passes_preview_space_when_size_unknown() {
        let overlays = vec![Overlay::new(OverlayKind::Text, "t", 64.0, 36.0, 0.0, 3.0)];
        let out = export_overlays(&overlays, None);
        assert_eq!(out[0].x, 64.0);
        assert_eq!(out[0].width, overlays[0].width);
    }

    #[test]
    fn test_missing_image_uris_dedupes_and_skips_text() {
        let a = Overlay::new(OverlayKind::Image, "file:///a.png", 0.0, 0.0, 0.0, 5.0);
        let b = Overlay::new(OverlayKind::Image, "file:///a.png", 10.0, 0.0, 0.0, 5.0);
        let t = Overlay::new(OverlayKind::Text, "hi", 0.0, 0.0, 0.0, 3.0);
        let loaded = HashMap::new();
        let uris = missing_image_uris(&[a, b, t], &loaded);
        assert_eq!(uris, vec!["file:///a.png".to_string()]);
    }
}
