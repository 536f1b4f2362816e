// Copyright (c) 2025, Buttercut Contributors
// SPDX-License-Identifier: BSD-3-Clause

//! Overlay geometry utilities.
//!
//! Pure, deterministic functions over overlay records: bounds, overlap
//! tests, grid snapping, alignment, distribution and the preview-to-video
//! coordinate rescale applied at export time. None of these mutate their
//! input.

use crate::models::overlay::Overlay;

/// Axis-aligned bounds of an overlay in preview-pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
}

/// Alignment modes for [`align_overlays`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Top,
    Middle,
    Bottom,
}

/// Distribution axes for [`distribute_overlays`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Compute the bounds of an overlay, falling back to the default size
/// when width/height are absent.
pub fn bounds(overlay: &Overlay) -> Bounds {
    let width = overlay.effective_width();
    let height = overlay.effective_height();
    Bounds {
        left: overlay.x,
        top: overlay.y,
        right: overlay.x + width,
        bottom: overlay.y + height,
        width,
        height,
    }
}

/// Whether two overlays overlap. Strict inequalities, so touching edges
/// do not count as overlap.
pub fn intersects(a: &Overlay, b: &Overlay) -> bool {
    let ba = bounds(a);
    let bb = bounds(b);
    ba.left < bb.right && ba.right > bb.left && ba.top < bb.bottom && ba.bottom > bb.top
}

/// Round a coordinate to the nearest multiple of the grid size.
pub fn snap_to_grid(value: f64, grid_size: f64) -> f64 {
    (value / grid_size).round() * grid_size
}

/// Clamp a position so the given rectangle stays inside the container
/// and never goes negative.
pub fn constrain_position(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    container_width: f64,
    container_height: f64,
) -> (f64, f64) {
    (
        x.min(container_width - width).max(0.0),
        y.min(container_height - height).max(0.0),
    )
}

/// Stable ascending sort by z-index; the input slice is not mutated.
pub fn sort_by_z_index(overlays: &[Overlay]) -> Vec<Overlay> {
    let mut sorted = overlays.to_vec();
    sorted.sort_by_key(|o| o.z_index);
    sorted
}

/// Align overlays along one edge or to the mean of their centers.
///
/// Left/top move every overlay to the minimum leading edge, right/bottom
/// to the maximum trailing edge. Center/middle align each overlay's center
/// to the average of all centers in the set, not to the bounding-box
/// center of the selection.
pub fn align_overlays(overlays: &[Overlay], alignment: Alignment) -> Vec<Overlay> {
    if overlays.is_empty() {
        return overlays.to_vec();
    }

    let all_bounds: Vec<Bounds> = overlays.iter().map(bounds).collect();
    let count = all_bounds.len() as f64;

    // Aggregate target for the whole set, computed once.
    let target = match alignment {
        Alignment::Left => all_bounds.iter().map(|b| b.left).fold(f64::INFINITY, f64::min),
        Alignment::Center => {
            all_bounds.iter().map(|b| b.left + b.width / 2.0).sum::<f64>() / count
        }
        Alignment::Right => all_bounds
            .iter()
            .map(|b| b.right)
            .fold(f64::NEG_INFINITY, f64::max),
        Alignment::Top => all_bounds.iter().map(|b| b.top).fold(f64::INFINITY, f64::min),
        Alignment::Middle => {
            all_bounds.iter().map(|b| b.top + b.height / 2.0).sum::<f64>() / count
        }
        Alignment::Bottom => all_bounds
            .iter()
            .map(|b| b.bottom)
            .fold(f64::NEG_INFINITY, f64::max),
    };

    overlays
        .iter()
        .zip(&all_bounds)
        .map(|(overlay, b)| {
            let mut aligned = overlay.clone();
            match alignment {
                Alignment::Left => aligned.x = target,
                Alignment::Center => aligned.x = target - b.width / 2.0,
                Alignment::Right => aligned.x = target - b.width,
                Alignment::Top => aligned.y = target,
                Alignment::Middle => aligned.y = target - b.height / 2.0,
                Alignment::Bottom => aligned.y = target - b.height,
            }
            aligned
        })
        .collect()
}

/// Spread overlays evenly along an axis.
///
/// Sorts by leading coordinate, keeps the first overlay's leading edge and
/// the last overlay's trailing edge fixed, and divides the free space into
/// equal gaps between neighbours. Fewer than three overlays are returned
/// unchanged.
pub fn distribute_overlays(overlays: &[Overlay], axis: Axis) -> Vec<Overlay> {
    if overlays.len() < 3 {
        return overlays.to_vec();
    }

    let mut sorted = overlays.to_vec();
    match axis {
        Axis::Horizontal => sorted.sort_by(|a, b| a.x.total_cmp(&b.x)),
        Axis::Vertical => sorted.sort_by(|a, b| a.y.total_cmp(&b.y)),
    }
    let sorted_bounds: Vec<Bounds> = sorted.iter().map(bounds).collect();

    let (span, total_size) = match axis {
        Axis::Horizontal => (
            sorted_bounds.last().unwrap().right - sorted_bounds[0].left,
            sorted_bounds.iter().map(|b| b.width).sum::<f64>(),
        ),
        Axis::Vertical => (
            sorted_bounds.last().unwrap().bottom - sorted_bounds[0].top,
            sorted_bounds.iter().map(|b| b.height).sum::<f64>(),
        ),
    };
    let gap = (span - total_size) / (sorted.len() - 1) as f64;

    let mut cursor = match axis {
        Axis::Horizontal => sorted_bounds[0].left,
        Axis::Vertical => sorted_bounds[0].top,
    };
    sorted
        .iter()
        .zip(&sorted_bounds)
        .map(|(overlay, b)| {
            let mut placed = overlay.clone();
            match axis {
                Axis::Horizontal => {
                    placed.x = cursor;
                    cursor += b.width + gap;
                }
                Axis::Vertical => {
                    placed.y = cursor;
                    cursor += b.height + gap;
                }
            }
            placed
        })
        .collect()
}

/// Rescale overlay positions and sizes from preview-pixel space into
/// source-video-pixel space. Applied once, when submitting for export.
pub fn scale_for_export(
    overlays: &[Overlay],
    preview_width: f64,
    preview_height: f64,
    video_width: f64,
    video_height: f64,
) -> Vec<Overlay> {
    let scale_x = video_width / preview_width;
    let scale_y = video_height / preview_height;

    overlays
        .iter()
        .map(|overlay| {
            let mut scaled = overlay.clone();
            scaled.x = overlay.x * scale_x;
            scaled.y = overlay.y * scale_y;
            scaled.width = Some(overlay.effective_width() * scale_x);
            scaled.height = Some(overlay.effective_height() * scale_y);
            scaled
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::overlay::{Overlay, OverlayKind, DEFAULT_HEIGHT, DEFAULT_WIDTH};

    fn overlay_at(x: f64, y: f64, width: f64, height: f64) -> Overlay {
        let mut o = Overlay::new(OverlayKind::Text, "t", x, y, 0.0, 10.0);
        o.width = Some(width);
        o.height = Some(height);
        o
    }

    #[test]
    fn test_bounds_arithmetic() {
        let o = overlay_at(10.0, 20.0, 30.0, 40.0);
        let b = bounds(&o);
        assert_eq!(b.right, b.left + b.width);
        assert_eq!(b.bottom, b.top + b.height);
        assert_eq!(b.right, 40.0);
        assert_eq!(b.bottom, 60.0);
    }

    #[test]
    fn test_bounds_uses_defaults_when_size_absent() {
        let mut o = overlay_at(5.0, 5.0, 1.0, 1.0);
        o.width = None;
        o.height = None;
        let b = bounds(&o);
        assert_eq!(b.width, DEFAULT_WIDTH);
        assert_eq!(b.height, DEFAULT_HEIGHT);
        assert_eq!(b.right, 5.0 + DEFAULT_WIDTH);
        assert_eq!(b.bottom, 5.0 + DEFAULT_HEIGHT);
    }

    #[test]
    fn test_intersects_is_symmetric() {
        let a = overlay_at(0.0, 0.0, 100.0, 100.0);
        let b = overlay_at(50.0, 50.0, 100.0, 100.0);
        let c = overlay_at(500.0, 500.0, 10.0, 10.0);
        assert!(intersects(&a, &b));
        assert_eq!(intersects(&a, &b), intersects(&b, &a));
        assert!(!intersects(&a, &c));
        assert_eq!(intersects(&a, &c), intersects(&c, &a));
    }

    #[test]
    fn test_touching_edges_do_not_intersect() {
        let a = overlay_at(0.0, 0.0, 100.0, 100.0);
        // b starts exactly on a's right edge
        let b = overlay_at(100.0, 0.0, 100.0, 100.0);
        assert!(!intersects(&a, &b));
        assert!(!intersects(&b, &a));
    }

    #[test]
    fn test_snap_to_grid_rounds_to_nearest() {
        assert_eq!(snap_to_grid(14.0, 10.0), 10.0);
        assert_eq!(snap_to_grid(15.0, 10.0), 20.0);
        assert_eq!(snap_to_grid(-15.0, 10.0), -20.0);
        assert_eq!(snap_to_grid(0.0, 10.0), 0.0);
    }

    #[test]
    fn test_constrain_position_clamps_to_container() {
        assert_eq!(constrain_position(-5.0, -5.0, 50.0, 50.0, 300.0, 200.0), (0.0, 0.0));
        assert_eq!(
            constrain_position(400.0, 300.0, 50.0, 50.0, 300.0, 200.0),
            (250.0, 150.0)
        );
        assert_eq!(
            constrain_position(10.0, 10.0, 50.0, 50.0, 300.0, 200.0),
            (10.0, 10.0)
        );
    }

    #[test]
    fn test_sort_by_z_index_is_stable() {
        let mut a = overlay_at(0.0, 0.0, 10.0, 10.0);
        let mut b = overlay_at(1.0, 0.0, 10.0, 10.0);
        let mut c = overlay_at(2.0, 0.0, 10.0, 10.0);
        a.z_index = 5;
        b.z_index = 0;
        c.z_index = 0;
        let input = vec![a.clone(), b.clone(), c.clone()];
        let sorted = sort_by_z_index(&input);
        assert_eq!(sorted[0].id, b.id);
        assert_eq!(sorted[1].id, c.id);
        assert_eq!(sorted[2].id, a.id);
        // Input untouched.
        assert_eq!(input[0].id, a.id);
    }

    #[test]
    fn test_align_left_moves_to_min_left() {
        let set = vec![
            overlay_at(30.0, 0.0, 50.0, 20.0),
            overlay_at(10.0, 40.0, 80.0, 20.0),
            overlay_at(70.0, 80.0, 20.0, 20.0),
        ];
        let aligned = align_overlays(&set, Alignment::Left);
        for (before, after) in set.iter().zip(&aligned) {
            assert_eq!(bounds(after).left, 10.0);
            assert_eq!(after.effective_width(), before.effective_width());
        }
    }

    #[test]
    fn test_align_right_moves_to_max_right() {
        let set = vec![
            overlay_at(0.0, 0.0, 50.0, 20.0),
            overlay_at(100.0, 40.0, 80.0, 20.0),
        ];
        let aligned = align_overlays(&set, Alignment::Right);
        assert_eq!(bounds(&aligned[0]).right, 180.0);
        assert_eq!(bounds(&aligned[1]).right, 180.0);
    }

    #[test]
    fn test_align_center_uses_average_of_centers() {
        // Centers at 50 and 150; average 100.
        let set = vec![
            overlay_at(0.0, 0.0, 100.0, 20.0),
            overlay_at(140.0, 0.0, 20.0, 20.0),
        ];
        let aligned = align_overlays(&set, Alignment::Center);
        assert_eq!(aligned[0].x + 50.0, 100.0);
        assert_eq!(aligned[1].x + 10.0, 100.0);
    }

    #[test]
    fn test_align_middle_uses_average_of_centers() {
        let set = vec![
            overlay_at(0.0, 0.0, 20.0, 100.0),
            overlay_at(0.0, 140.0, 20.0, 20.0),
        ];
        let aligned = align_overlays(&set, Alignment::Middle);
        assert_eq!(aligned[0].y + 50.0, 100.0);
        assert_eq!(aligned[1].y + 10.0, 100.0);
    }

    #[test]
    fn test_align_empty_is_identity() {
        assert!(align_overlays(&[], Alignment::Left).is_empty());
    }

    #[test]
    fn test_distribute_two_is_noop() {
        let set = vec![
            overlay_at(0.0, 0.0, 50.0, 20.0),
            overlay_at(200.0, 0.0, 50.0, 20.0),
        ];
        let out = distribute_overlays(&set, Axis::Horizontal);
        assert_eq!(out, set);
    }

    #[test]
    fn test_distribute_three_equalizes_gaps() {
        // Span 0-300, three overlays of width 50; free space 150, gaps 75.
        let set = vec![
            overlay_at(0.0, 0.0, 50.0, 20.0),
            overlay_at(90.0, 0.0, 50.0, 20.0),
            overlay_at(250.0, 0.0, 50.0, 20.0),
        ];
        let out = distribute_overlays(&set, Axis::Horizontal);
        assert_eq!(out[0].x, 0.0);
        assert_eq!(out[1].x, 125.0);
        assert_eq!(out[2].x, 250.0);
        // First leading and last trailing edges preserved.
        assert_eq!(bounds(&out[0]).left, 0.0);
        assert_eq!(bounds(&out[2]).right, 300.0);
    }

    #[test]
    fn test_distribute_vertical() {
        let set = vec![
            overlay_at(0.0, 0.0, 20.0, 40.0),
            overlay_at(0.0, 50.0, 20.0, 40.0),
            overlay_at(0.0, 160.0, 20.0, 40.0),
        ];
        let out = distribute_overlays(&set, Axis::Vertical);
        assert_eq!(out[0].y, 0.0);
        assert_eq!(out[1].y, 80.0);
        assert_eq!(out[2].y, 160.0);
    }

    #[test]
    fn test_scale_for_export() {
        let set = vec![overlay_at(100.0, 50.0, 200.0, 100.0)];
        // Preview 400x200, video 1920x1080.
        let scaled = scale_for_export(&set, 400.0, 200.0, 1920.0, 1080.0);
        assert_eq!(scaled[0].x, 480.0);
        assert_eq!(scaled[0].y, 270.0);
        assert_eq!(scaled[0].width, Some(960.0));
        assert_eq!(scaled[0].height, Some(540.0));
    }
}
