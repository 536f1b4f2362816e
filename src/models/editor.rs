// Copyright (c) 2025, Buttercut Contributors
// SPDX-License-Identifier: BSD-3-Clause

//! Editor document state and the action reducer.
//!
//! The whole editing session lives in one [`EditorState`] value. Every
//! mutation goes through [`EditorState::apply`], which matches on an
//! [`EditorAction`] and returns a complete new snapshot; there is never a
//! partially-applied state visible to callers. Undo/redo operates on
//! snapshots of the overlay list only.

use super::overlay::{Overlay, OverlayPatch};
use crate::models::project::unix_millis;

/// Minimum zoom factor.
pub const MIN_ZOOM: f64 = 0.25;
/// Maximum zoom factor.
pub const MAX_ZOOM: f64 = 4.0;
/// Offset applied to duplicated and pasted overlays.
pub const PASTE_OFFSET: f64 = 20.0;
/// Maximum depth of the undo stack.
const MAX_HISTORY: usize = 50;

/// A single-slot holder for copied overlays. Owned by the application and
/// passed into the reducer, so it outlives any one document without being
/// hidden module-global state. Overwritten on copy, read (not cleared) on
/// paste.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    contents: Option<ClipboardData>,
}

/// Copied overlays plus the time of copy.
#[derive(Debug, Clone)]
pub struct ClipboardData {
    pub overlays: Vec<Overlay>,
    pub timestamp: u64,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the clipboard contents with the given overlays.
    pub fn store(&mut self, overlays: Vec<Overlay>) {
        self.contents = Some(ClipboardData {
            overlays,
            timestamp: unix_millis(),
        });
    }

    /// The currently copied overlays, if any.
    pub fn contents(&self) -> Option<&ClipboardData> {
        self.contents.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.contents
            .as_ref()
            .map_or(true, |data| data.overlays.is_empty())
    }
}

/// Every mutation of the document, as a plain value.
#[derive(Debug, Clone)]
pub enum EditorAction {
    /// Hard reset to a fresh document for the given video (clears history).
    SetVideo { uri: String, duration: f64 },
    AddOverlay(Overlay),
    UpdateOverlay { id: String, patch: OverlayPatch },
    DeleteOverlay(String),
    DeleteSelected,
    SelectOverlay { id: String, multi_select: bool },
    DeselectAll,
    SetCurrentTime(f64),
    SetVideoDuration(f64),
    SetPlaying(bool),
    SetZoom(f64),
    ToggleSnapToGrid,
    SetGridSize(f64),
    DuplicateOverlay(String),
    CopyOverlays(Vec<String>),
    PasteOverlays,
    Undo,
    Redo,
    ResetProject,
}

/// The complete in-memory editing session.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorState {
    pub video_uri: Option<String>,
    pub video_duration: f64,
    /// Insertion order; z-order is derived from `z_index` at render time.
    pub overlays: Vec<Overlay>,
    pub selected_ids: Vec<String>,
    pub current_time: f64,
    pub is_playing: bool,
    pub zoom: f64,
    pub snap_to_grid: bool,
    pub grid_size: f64,
    undo_stack: Vec<Vec<Overlay>>,
    redo_stack: Vec<Vec<Overlay>>,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            video_uri: None,
            video_duration: 0.0,
            overlays: Vec::new(),
            selected_ids: Vec::new(),
            current_time: 0.0,
            is_playing: false,
            zoom: 1.0,
            snap_to_grid: false,
            grid_size: 10.0,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh editing session for a saved project. Selection and history
    /// start empty, like any other wholesale document replacement.
    pub fn from_project(project: &crate::models::project::VideoProject) -> Self {
        Self {
            video_uri: Some(project.video_uri.clone()),
            video_duration: project.video_duration,
            overlays: project.overlays.clone(),
            ..Self::default()
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Overlays currently selected, in overlay-list order.
    pub fn selected_overlays(&self) -> Vec<&Overlay> {
        self.overlays
            .iter()
            .filter(|o| self.selected_ids.contains(&o.id))
            .collect()
    }

    /// Look up an overlay by id.
    pub fn overlay(&self, id: &str) -> Option<&Overlay> {
        self.overlays.iter().find(|o| o.id == id)
    }

    /// Apply one action and produce the next snapshot. The clipboard is
    /// owned by the caller; only `CopyOverlays` writes to it.
    pub fn apply(&self, action: EditorAction, clipboard: &mut Clipboard) -> EditorState {
        match action {
            EditorAction::SetVideo { uri, duration } => EditorState {
                video_uri: Some(uri),
                video_duration: duration,
                ..EditorState::default()
            },

            EditorAction::AddOverlay(overlay) => {
                let mut next = self.with_history_push();
                next.overlays.push(overlay);
                next
            }

            EditorAction::UpdateOverlay { id, patch } => {
                let mut next = self.clone();
                if let Some(overlay) = next.overlays.iter_mut().find(|o| o.id == id) {
                    patch.apply_to(overlay);
                }
                next
            }

            EditorAction::DeleteOverlay(id) => {
                let mut next = self.with_history_push();
                next.overlays.retain(|o| o.id != id);
                next.selected_ids.retain(|selected| *selected != id);
                next
            }

            EditorAction::DeleteSelected => {
                let mut next = self.with_history_push();
                let selected = std::mem::take(&mut next.selected_ids);
                next.overlays.retain(|o| !selected.contains(&o.id));
                next
            }

            EditorAction::SelectOverlay { id, multi_select } => {
                let mut next = self.clone();
                if multi_select {
                    if let Some(pos) = next.selected_ids.iter().position(|s| *s == id) {
                        next.selected_ids.remove(pos);
                    } else {
                        next.selected_ids.push(id);
                    }
                } else {
                    next.selected_ids = vec![id];
                }
                next
            }

            EditorAction::DeselectAll => {
                let mut next = self.clone();
                next.selected_ids.clear();
                next
            }

            EditorAction::SetCurrentTime(time) => {
                let mut next = self.clone();
                next.current_time = time;
                next
            }

            EditorAction::SetVideoDuration(duration) => {
                let mut next = self.clone();
                next.video_duration = duration;
                next
            }

            EditorAction::SetPlaying(playing) => {
                let mut next = self.clone();
                next.is_playing = playing;
                next
            }

            EditorAction::SetZoom(zoom) => {
                let mut next = self.clone();
                next.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
                next
            }

            EditorAction::ToggleSnapToGrid => {
                let mut next = self.clone();
                next.snap_to_grid = !next.snap_to_grid;
                next
            }

            EditorAction::SetGridSize(size) => {
                let mut next = self.clone();
                next.grid_size = size;
                next
            }

            EditorAction::DuplicateOverlay(id) => {
                let Some(source) = self.overlay(&id) else {
                    return self.clone();
                };
                let mut clone = source.clone();
                clone.id = uuid::Uuid::new_v4().to_string();
                clone.x += PASTE_OFFSET;
                clone.y += PASTE_OFFSET;
                let clone_id = clone.id.clone();

                let mut next = self.with_history_push();
                next.overlays.push(clone);
                next.selected_ids = vec![clone_id];
                next
            }

            EditorAction::CopyOverlays(ids) => {
                let copied: Vec<Overlay> = self
                    .overlays
                    .iter()
                    .filter(|o| ids.contains(&o.id))
                    .cloned()
                    .collect();
                clipboard.store(copied);
                self.clone()
            }

            EditorAction::PasteOverlays => {
                let Some(data) = clipboard.contents() else {
                    return self.clone();
                };
                if data.overlays.is_empty() {
                    return self.clone();
                }

                let pasted: Vec<Overlay> = data
                    .overlays
                    .iter()
                    .map(|o| {
                        let mut clone = o.clone();
                        clone.id = uuid::Uuid::new_v4().to_string();
                        clone.x += PASTE_OFFSET;
                        clone.y += PASTE_OFFSET;
                        clone
                    })
                    .collect();

                let mut next = self.with_history_push();
                next.selected_ids = pasted.iter().map(|o| o.id.clone()).collect();
                next.overlays.extend(pasted);
                next
            }

            EditorAction::Undo => {
                let mut next = self.clone();
                if let Some(previous) = next.undo_stack.pop() {
                    let current = std::mem::replace(&mut next.overlays, previous);
                    next.redo_stack.push(current);
                }
                next
            }

            EditorAction::Redo => {
                let mut next = self.clone();
                if let Some(restored) = next.redo_stack.pop() {
                    let current = std::mem::replace(&mut next.overlays, restored);
                    next.undo_stack.push(current);
                }
                next
            }

            EditorAction::ResetProject => EditorState::default(),
        }
    }

    /// Clone the state with the current overlay list pushed onto the undo
    /// stack and the redo stack cleared. Mutating actions call this first,
    /// so undo always restores the arrangement from just before the edit.
    fn with_history_push(&self) -> EditorState {
        let mut next = self.clone();
        next.undo_stack.push(next.overlays.clone());
        if next.undo_stack.len() > MAX_HISTORY {
            next.undo_stack.remove(0);
        }
        next.redo_stack.clear();
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::overlay::OverlayKind;

    fn text_overlay(content: &str) -> Overlay {
        Overlay::new(OverlayKind::Text, content, 50.0, 50.0, 0.0, 3.0)
    }

    fn apply(state: &EditorState, action: EditorAction) -> EditorState {
        let mut clipboard = Clipboard::new();
        state.apply(action, &mut clipboard)
    }

    #[test]
    fn test_set_video_resets_document() {
        let mut clipboard = Clipboard::new();
        let mut state = EditorState::new();
        state = state.apply(EditorAction::AddOverlay(text_overlay("a")), &mut clipboard);
        state = state.apply(EditorAction::SetZoom(2.0), &mut clipboard);

        let reset = state.apply(
            EditorAction::SetVideo {
                uri: "file:///v.mp4".into(),
                duration: 60.0,
            },
            &mut clipboard,
        );
        assert_eq!(reset.video_uri.as_deref(), Some("file:///v.mp4"));
        assert_eq!(reset.video_duration, 60.0);
        assert!(reset.overlays.is_empty());
        assert_eq!(reset.zoom, 1.0);
        assert!(!reset.can_undo());
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let state = EditorState::new();
        let overlay = text_overlay("a");
        let id = overlay.id.clone();

        let after_add = apply(&state, EditorAction::AddOverlay(overlay));
        assert_eq!(after_add.overlays.len(), 1);

        let after_undo = apply(&after_add, EditorAction::Undo);
        assert_eq!(after_undo.overlays, state.overlays);

        let after_redo = apply(&after_undo, EditorAction::Redo);
        assert_eq!(after_redo.overlays.len(), 1);
        assert_eq!(after_redo.overlays[0].id, id);
    }

    #[test]
    fn test_selection_survives_undo_redo() {
        let overlay = text_overlay("a");
        let id = overlay.id.clone();
        let mut state = apply(&EditorState::new(), EditorAction::AddOverlay(overlay));
        state = apply(&state, EditorAction::AddOverlay(text_overlay("b")));
        state = apply(
            &state,
            EditorAction::SelectOverlay {
                id: id.clone(),
                multi_select: false,
            },
        );

        let undone = apply(&state, EditorAction::Undo);
        assert_eq!(undone.selected_ids, vec![id.clone()]);
        let redone = apply(&undone, EditorAction::Redo);
        assert_eq!(redone.selected_ids, vec![id]);
    }

    #[test]
    fn test_set_video_duration_is_scalar_update() {
        let state = apply(&EditorState::new(), EditorAction::AddOverlay(text_overlay("a")));
        let next = apply(&state, EditorAction::SetVideoDuration(120.0));
        assert_eq!(next.video_duration, 120.0);
        assert_eq!(next.overlays, state.overlays);
        assert_eq!(next.undo_stack.len(), state.undo_stack.len());
    }

    #[test]
    fn test_undo_on_empty_stack_is_noop() {
        let state = EditorState::new();
        let next = apply(&state, EditorAction::Undo);
        assert_eq!(next.overlays, state.overlays);
        assert!(!next.can_redo());
    }

    #[test]
    fn test_new_edit_after_undo_clears_redo() {
        let state = apply(&EditorState::new(), EditorAction::AddOverlay(text_overlay("a")));
        let undone = apply(&state, EditorAction::Undo);
        assert!(undone.can_redo());

        let branched = apply(&undone, EditorAction::AddOverlay(text_overlay("b")));
        assert!(!branched.can_redo());
    }

    #[test]
    fn test_update_overlay_merges_fields() {
        let overlay = text_overlay("hello");
        let id = overlay.id.clone();
        let state = apply(&EditorState::new(), EditorAction::AddOverlay(overlay));

        let updated = apply(
            &state,
            EditorAction::UpdateOverlay {
                id: id.clone(),
                patch: OverlayPatch::position(120.0, 80.0),
            },
        );
        let overlay = updated.overlay(&id).unwrap();
        assert_eq!(overlay.x, 120.0);
        assert_eq!(overlay.y, 80.0);
        assert_eq!(overlay.content, "hello");
        // Property edits do not touch history.
        assert_eq!(updated.undo_stack.len(), state.undo_stack.len());
    }

    #[test]
    fn test_update_absent_id_is_noop() {
        let state = apply(&EditorState::new(), EditorAction::AddOverlay(text_overlay("a")));
        let next = apply(
            &state,
            EditorAction::UpdateOverlay {
                id: "missing".into(),
                patch: OverlayPatch::position(0.0, 0.0),
            },
        );
        assert_eq!(next.overlays, state.overlays);
    }

    #[test]
    fn test_delete_prunes_selection() {
        let overlay = text_overlay("a");
        let id = overlay.id.clone();
        let mut state = apply(&EditorState::new(), EditorAction::AddOverlay(overlay));
        state = apply(
            &state,
            EditorAction::SelectOverlay {
                id: id.clone(),
                multi_select: false,
            },
        );
        assert_eq!(state.selected_ids, vec![id.clone()]);

        let deleted = apply(&state, EditorAction::DeleteOverlay(id));
        assert!(deleted.overlays.is_empty());
        assert!(deleted.selected_ids.is_empty());
    }

    #[test]
    fn test_delete_selected_removes_only_selection() {
        let keep = text_overlay("keep");
        let drop = text_overlay("drop");
        let keep_id = keep.id.clone();
        let drop_id = drop.id.clone();

        let mut state = apply(&EditorState::new(), EditorAction::AddOverlay(keep));
        state = apply(&state, EditorAction::AddOverlay(drop));
        state = apply(
            &state,
            EditorAction::SelectOverlay {
                id: drop_id,
                multi_select: false,
            },
        );

        let next = apply(&state, EditorAction::DeleteSelected);
        assert_eq!(next.overlays.len(), 1);
        assert_eq!(next.overlays[0].id, keep_id);
        assert!(next.selected_ids.is_empty());
    }

    #[test]
    fn test_multi_select_toggle_symmetry() {
        let overlay = text_overlay("a");
        let id = overlay.id.clone();
        let state = apply(&EditorState::new(), EditorAction::AddOverlay(overlay));

        let toggled_on = apply(
            &state,
            EditorAction::SelectOverlay {
                id: id.clone(),
                multi_select: true,
            },
        );
        assert_eq!(toggled_on.selected_ids, vec![id.clone()]);

        let toggled_off = apply(
            &toggled_on,
            EditorAction::SelectOverlay {
                id,
                multi_select: true,
            },
        );
        assert_eq!(toggled_off.selected_ids, state.selected_ids);
    }

    #[test]
    fn test_single_select_replaces_selection() {
        let a = text_overlay("a");
        let b = text_overlay("b");
        let a_id = a.id.clone();
        let b_id = b.id.clone();
        let mut state = apply(&EditorState::new(), EditorAction::AddOverlay(a));
        state = apply(&state, EditorAction::AddOverlay(b));

        state = apply(
            &state,
            EditorAction::SelectOverlay {
                id: a_id,
                multi_select: false,
            },
        );
        state = apply(
            &state,
            EditorAction::SelectOverlay {
                id: b_id.clone(),
                multi_select: false,
            },
        );
        assert_eq!(state.selected_ids, vec![b_id]);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let state = EditorState::new();
        assert_eq!(apply(&state, EditorAction::SetZoom(10.0)).zoom, MAX_ZOOM);
        assert_eq!(apply(&state, EditorAction::SetZoom(-5.0)).zoom, MIN_ZOOM);
        assert_eq!(apply(&state, EditorAction::SetZoom(1.5)).zoom, 1.5);
    }

    #[test]
    fn test_duplicate_offsets_and_selects_clone() {
        let overlay = text_overlay("a");
        let id = overlay.id.clone();
        let state = apply(&EditorState::new(), EditorAction::AddOverlay(overlay));

        let next = apply(&state, EditorAction::DuplicateOverlay(id.clone()));
        assert_eq!(next.overlays.len(), 2);
        let clone = &next.overlays[1];
        assert_ne!(clone.id, id);
        assert_eq!(clone.x, 70.0);
        assert_eq!(clone.y, 70.0);
        assert_eq!(next.selected_ids, vec![clone.id.clone()]);
    }

    #[test]
    fn test_duplicate_absent_id_is_noop() {
        let state = apply(&EditorState::new(), EditorAction::AddOverlay(text_overlay("a")));
        let next = apply(&state, EditorAction::DuplicateOverlay("missing".into()));
        assert_eq!(next.overlays, state.overlays);
        assert_eq!(next.undo_stack.len(), state.undo_stack.len());
    }

    #[test]
    fn test_copy_paste_produces_offset_clones() {
        let mut clipboard = Clipboard::new();
        let a = text_overlay("a");
        let b = text_overlay("b");
        let ids = vec![a.id.clone(), b.id.clone()];

        let mut state = EditorState::new();
        state = state.apply(EditorAction::AddOverlay(a), &mut clipboard);
        state = state.apply(EditorAction::AddOverlay(b), &mut clipboard);

        state = state.apply(EditorAction::CopyOverlays(ids.clone()), &mut clipboard);
        assert!(!clipboard.is_empty());

        let pasted = state.apply(EditorAction::PasteOverlays, &mut clipboard);
        assert_eq!(pasted.overlays.len(), 4);
        let new: Vec<&Overlay> = pasted.overlays[2..].iter().collect();
        for (original, clone) in pasted.overlays[..2].iter().zip(&new) {
            assert_ne!(original.id, clone.id);
            assert_eq!(clone.x, original.x + PASTE_OFFSET);
            assert_eq!(clone.y, original.y + PASTE_OFFSET);
        }
        let new_ids: Vec<String> = new.iter().map(|o| o.id.clone()).collect();
        assert_eq!(pasted.selected_ids, new_ids);
        // Originals untouched.
        assert_eq!(pasted.overlays[0].id, ids[0]);
        assert_eq!(pasted.overlays[1].id, ids[1]);
    }

    #[test]
    fn test_paste_with_empty_clipboard_is_noop() {
        let mut clipboard = Clipboard::new();
        let state = EditorState::new();
        let next = state.apply(EditorAction::PasteOverlays, &mut clipboard);
        assert!(next.overlays.is_empty());
        assert!(!next.can_undo());
    }

    #[test]
    fn test_clipboard_survives_reset() {
        let mut clipboard = Clipboard::new();
        let overlay = text_overlay("a");
        let id = overlay.id.clone();
        let mut state = EditorState::new();
        state = state.apply(EditorAction::AddOverlay(overlay), &mut clipboard);
        state = state.apply(EditorAction::CopyOverlays(vec![id]), &mut clipboard);

        state = state.apply(EditorAction::ResetProject, &mut clipboard);
        let pasted = state.apply(EditorAction::PasteOverlays, &mut clipboard);
        assert_eq!(pasted.overlays.len(), 1);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut clipboard = Clipboard::new();
        let mut state = EditorState::new();
        for i in 0..60 {
            state = state.apply(
                EditorAction::AddOverlay(text_overlay(&format!("o{i}"))),
                &mut clipboard,
            );
        }
        assert_eq!(state.undo_stack.len(), 50);
    }
}
