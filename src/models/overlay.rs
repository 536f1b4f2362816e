// Copyright (c) 2025, Buttercut Contributors
// SPDX-License-Identifier: BSD-3-Clause

//! Overlay data structures.
//!
//! This module defines the core data structures for representing
//! text, image and video overlays placed on the preview canvas.

use serde::{Deserialize, Serialize};

/// Default width used when an overlay has no explicit size.
pub const DEFAULT_WIDTH: f64 = 200.0;
/// Default height used when an overlay has no explicit size.
pub const DEFAULT_HEIGHT: f64 = 100.0;
/// Default font size for text overlays.
pub const DEFAULT_FONT_SIZE: f64 = 24.0;
/// Default font color for text overlays (opaque white).
pub const DEFAULT_FONT_COLOR: &str = "#FFFFFF";
/// Default font family for text overlays.
pub const DEFAULT_FONT_FAMILY: &str = "system";

/// Kind of overlay content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayKind {
    Text,
    Image,
    Video,
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Font weight for text overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Normal,
    Bold,
}

/// A positioned, time-bounded overlay composited onto the base video.
///
/// Positions are in preview-pixel space with the origin at the top-left.
/// The time window is inclusive at both ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: OverlayKind,
    /// Literal text for text overlays, a URI for image/video overlays.
    pub content: String,
    pub x: f64,
    pub y: f64,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub start_time: f64,
    pub end_time: f64,
    pub opacity: f64,
    pub rotation: f64,
    pub scale: f64,
    #[serde(rename = "zIndex")]
    pub z_index: i32,
    #[serde(rename = "fontSize")]
    pub font_size: f64,
    #[serde(rename = "fontColor")]
    pub font_color: String,
    #[serde(rename = "fontFamily")]
    pub font_family: String,
    #[serde(rename = "textAlign")]
    pub text_align: TextAlign,
    #[serde(rename = "fontWeight")]
    pub font_weight: FontWeight,
    /// Locked overlays are excluded from drag and selection gestures.
    pub locked: bool,
    /// Hidden overlays never render or hit-test, regardless of time window.
    pub visible: bool,
}

impl Overlay {
    /// Create a new overlay with a fresh unique id and default styling.
    pub fn new(
        kind: OverlayKind,
        content: impl Into<String>,
        x: f64,
        y: f64,
        start_time: f64,
        end_time: f64,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            content: content.into(),
            x,
            y,
            width: Some(DEFAULT_WIDTH),
            height: Some(DEFAULT_HEIGHT),
            start_time,
            end_time,
            opacity: 1.0,
            rotation: 0.0,
            scale: 1.0,
            z_index: 0,
            font_size: DEFAULT_FONT_SIZE,
            font_color: DEFAULT_FONT_COLOR.to_string(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            text_align: TextAlign::Left,
            font_weight: FontWeight::Normal,
            locked: false,
            visible: true,
        }
    }

    /// Effective width, falling back to the default when absent.
    pub fn effective_width(&self) -> f64 {
        self.width.unwrap_or(DEFAULT_WIDTH)
    }

    /// Effective height, falling back to the default when absent.
    pub fn effective_height(&self) -> f64 {
        self.height.unwrap_or(DEFAULT_HEIGHT)
    }

    /// Whether the overlay should render at time `t` (visible flag and
    /// inclusive time window).
    pub fn is_visible_at(&self, t: f64) -> bool {
        self.visible && t >= self.start_time && t <= self.end_time
    }
}

/// Partial update applied to an overlay by id. Fields left as `None`
/// keep their current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayPatch {
    pub content: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
    pub opacity: Option<f64>,
    pub rotation: Option<f64>,
    pub scale: Option<f64>,
    pub z_index: Option<i32>,
    pub font_size: Option<f64>,
    pub font_color: Option<String>,
    pub font_family: Option<String>,
    pub text_align: Option<TextAlign>,
    pub font_weight: Option<FontWeight>,
    pub locked: Option<bool>,
    pub visible: Option<bool>,
}

impl OverlayPatch {
    /// A patch that only moves the overlay.
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    /// Merge this patch onto an overlay, leaving unset fields untouched.
    pub fn apply_to(&self, overlay: &mut Overlay) {
        if let Some(ref content) = self.content {
            overlay.content = content.clone();
        }
        if let Some(x) = self.x {
            overlay.x = x;
        }
        if let Some(y) = self.y {
            overlay.y = y;
        }
        if let Some(width) = self.width {
            overlay.width = Some(width);
        }
        if let Some(height) = self.height {
            overlay.height = Some(height);
        }
        if let Some(start_time) = self.start_time {
            overlay.start_time = start_time;
        }
        if let Some(end_time) = self.end_time {
            overlay.end_time = end_time;
        }
        if let Some(opacity) = self.opacity {
            overlay.opacity = opacity;
        }
        if let Some(rotation) = self.rotation {
            overlay.rotation = rotation;
        }
        if let Some(scale) = self.scale {
            overlay.scale = scale;
        }
        if let Some(z_index) = self.z_index {
            overlay.z_index = z_index;
        }
        if let Some(font_size) = self.font_size {
            overlay.font_size = font_size;
        }
        if let Some(ref font_color) = self.font_color {
            overlay.font_color = font_color.clone();
        }
        if let Some(ref font_family) = self.font_family {
            overlay.font_family = font_family.clone();
        }
        if let Some(text_align) = self.text_align {
            overlay.text_align = text_align;
        }
        if let Some(font_weight) = self.font_weight {
            overlay.font_weight = font_weight;
        }
        if let Some(locked) = self.locked {
            overlay.locked = locked;
        }
        if let Some(visible) = self.visible {
            overlay.visible = visible;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_overlay_defaults() {
        let overlay = Overlay::new(OverlayKind::Text, "hello", 50.0, 50.0, 0.0, 3.0);
        assert_eq!(overlay.opacity, 1.0);
        assert_eq!(overlay.rotation, 0.0);
        assert_eq!(overlay.scale, 1.0);
        assert_eq!(overlay.z_index, 0);
        assert_eq!(overlay.font_size, DEFAULT_FONT_SIZE);
        assert_eq!(overlay.font_color, DEFAULT_FONT_COLOR);
        assert_eq!(overlay.font_family, DEFAULT_FONT_FAMILY);
        assert_eq!(overlay.text_align, TextAlign::Left);
        assert_eq!(overlay.font_weight, FontWeight::Normal);
        assert!(!overlay.locked);
        assert!(overlay.visible);
        assert_eq!(overlay.effective_width(), DEFAULT_WIDTH);
        assert_eq!(overlay.effective_height(), DEFAULT_HEIGHT);
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Overlay::new(OverlayKind::Text, "a", 0.0, 0.0, 0.0, 1.0);
        let b = Overlay::new(OverlayKind::Text, "b", 0.0, 0.0, 0.0, 1.0);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_visible_at_inclusive_boundaries() {
        let overlay = Overlay::new(OverlayKind::Text, "t", 0.0, 0.0, 2.0, 5.0);
        assert!(overlay.is_visible_at(2.0));
        assert!(overlay.is_visible_at(5.0));
        assert!(overlay.is_visible_at(3.5));
        assert!(!overlay.is_visible_at(1.999));
        assert!(!overlay.is_visible_at(5.001));
    }

    #[test]
    fn test_hidden_overlay_never_visible() {
        let mut overlay = Overlay::new(OverlayKind::Text, "t", 0.0, 0.0, 0.0, 10.0);
        overlay.visible = false;
        assert!(!overlay.is_visible_at(5.0));
    }

    #[test]
    fn test_patch_merges_only_set_fields() {
        let mut overlay = Overlay::new(OverlayKind::Text, "before", 10.0, 20.0, 0.0, 3.0);
        let patch = OverlayPatch {
            content: Some("after".to_string()),
            x: Some(99.0),
            ..Default::default()
        };
        patch.apply_to(&mut overlay);
        assert_eq!(overlay.content, "after");
        assert_eq!(overlay.x, 99.0);
        assert_eq!(overlay.y, 20.0);
        assert_eq!(overlay.start_time, 0.0);
    }

    #[test]
    fn test_serde_field_names_match_backend() {
        let overlay = Overlay::new(OverlayKind::Image, "file:///a.png", 0.0, 0.0, 0.0, 5.0);
        let json = serde_json::to_value(&overlay).unwrap();
        assert_eq!(json["type"], "image");
        assert!(json.get("zIndex").is_some());
        assert!(json.get("fontSize").is_some());
        assert!(json.get("start_time").is_some());
        assert!(json.get("end_time").is_some());
    }
}
