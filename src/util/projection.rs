// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Viewport transform and seat projection.
//!
//! The transform maps image-space pixels to screen-space via
//! `screen = offset + pixel * scale`. Seats are projected to
//! axis-aligned screen rectangles; hit-testing is carried by the
//! per-seat rectangle itself, so there is no inverse search here.

use crate::models::seat::{Seat, SeatDims};

/// Allowed zoom range and button step.
pub const MIN_SCALE: f32 = 0.1;
pub const MAX_SCALE: f32 = 5.0;
pub const DEFAULT_SCALE: f32 = 0.5;
const ZOOM_STEP: f32 = 1.2;

/// Scale/offset pair mapping image-space to screen-space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportTransform {
    pub scale: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl ViewportTransform {
    /// Zoom by `factor` keeping the image point under `(focus_x, focus_y)`
    /// (screen-space) fixed.
    pub fn zoom_about(&mut self, focus_x: f32, focus_y: f32, factor: f32) {
        let new_scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        let applied = new_scale / self.scale;
        self.offset_x = focus_x - (focus_x - self.offset_x) * applied;
        self.offset_y = focus_y - (focus_y - self.offset_y) * applied;
        self.scale = new_scale;
    }

    pub fn zoom_in(&mut self, focus_x: f32, focus_y: f32) {
        self.zoom_about(focus_x, focus_y, ZOOM_STEP);
    }

    pub fn zoom_out(&mut self, focus_x: f32, focus_y: f32) {
        self.zoom_about(focus_x, focus_y, 1.0 / ZOOM_STEP);
    }

    /// Translate the view by a screen-space delta.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.offset_x += dx;
        self.offset_y += dy;
    }

    /// Back to the default scale with the origin at the top-left.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Keep the current scale but center the image in the viewport.
    pub fn center(&mut self, viewport_w: f32, viewport_h: f32, image_w: f32, image_h: f32) {
        self.offset_x = (viewport_w - image_w * self.scale) / 2.0;
        self.offset_y = (viewport_h - image_h * self.scale) / 2.0;
    }
}

/// A projected seat rectangle in screen-space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// Project one seat into screen-space under the active transform.
pub fn project(seat: &Seat, dims: SeatDims, transform: &ViewportTransform) -> ScreenRect {
    ScreenRect {
        left: transform.offset_x + seat.x as f32 * transform.scale,
        top: transform.offset_y + seat.y as f32 * transform.scale,
        width: dims.width as f32 * transform.scale,
        height: dims.height as f32 * transform.scale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seat(x: f64, y: f64) -> Seat {
        Seat {
            id: "A1".to_string(),
            x,
            y,
        }
    }

    fn dims() -> SeatDims {
        SeatDims {
            width: 40.0,
            height: 40.0,
        }
    }

    #[test]
    fn test_project_applies_scale_then_offset() {
        let transform = ViewportTransform {
            scale: 2.0,
            offset_x: 10.0,
            offset_y: -5.0,
        };
        let rect = project(&seat(50.0, 30.0), dims(), &transform);
        assert_eq!(rect.left, 110.0);
        assert_eq!(rect.top, 55.0);
        assert_eq!(rect.width, 80.0);
        assert_eq!(rect.height, 80.0);
    }

    #[test]
    fn test_project_is_linear_in_scale() {
        let seat = seat(100.0, 0.0);
        let base = ViewportTransform {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        };
        let doubled = ViewportTransform { scale: 2.0, ..base };
        let a = project(&seat, dims(), &base);
        let b = project(&seat, dims(), &doubled);
        assert_eq!(b.left, 2.0 * a.left);
        assert_eq!(b.width, 2.0 * a.width);
        assert_eq!(b.height, 2.0 * a.height);
    }

    #[test]
    fn test_zoom_about_keeps_focus_fixed() {
        let mut transform = ViewportTransform {
            scale: 1.0,
            offset_x: 20.0,
            offset_y: 40.0,
        };
        // Image point currently under the focus
        let focus = (120.0_f32, 140.0_f32);
        let image_x = (focus.0 - transform.offset_x) / transform.scale;
        let image_y = (focus.1 - transform.offset_y) / transform.scale;

        transform.zoom_about(focus.0, focus.1, 1.5);

        let screen_x = transform.offset_x + image_x * transform.scale;
        let screen_y = transform.offset_y + image_y * transform.scale;
        assert!((screen_x - focus.0).abs() < 0.001);
        assert!((screen_y - focus.1).abs() < 0.001);
        assert!((transform.scale - 1.5).abs() < 0.001);
    }

    #[test]
    fn test_zoom_clamps_to_limits() {
        let mut transform = ViewportTransform::default();
        for _ in 0..100 {
            transform.zoom_in(0.0, 0.0);
        }
        assert_eq!(transform.scale, MAX_SCALE);
        for _ in 0..100 {
            transform.zoom_out(0.0, 0.0);
        }
        assert_eq!(transform.scale, MIN_SCALE);
    }

    #[test]
    fn test_center_positions_image_midpoint() {
        let mut transform = ViewportTransform {
            scale: 0.5,
            offset_x: 0.0,
            offset_y: 0.0,
        };
        transform.center(800.0, 600.0, 1000.0, 1000.0);
        assert_eq!(transform.offset_x, 150.0);
        assert_eq!(transform.offset_y, 50.0);
    }
}
