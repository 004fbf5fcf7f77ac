use egui::{Pos2, Rect, Vec2};

use crate::boxes::BoxRect;

/// Float slack when comparing against the zoom floor. Repeated `- 0.1` steps
/// land a hair above or below exact decimals.
const ZOOM_EPSILON: f32 = 1e-4;

// ── View Transform ──────────────────────────────────────────────────────────

/// Zoom scale plus pan offset. Maps image space (unscaled pixels, top-left
/// origin) to view space (screen pixels) and back.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub zoom: f32,
    pub pan: Vec2,
    zoom_step: f32,
    min_zoom: f32,
}

impl ViewTransform {
    pub fn new(zoom: f32, zoom_step: f32, min_zoom: f32) -> Self {
        Self {
            zoom,
            pan: Vec2::ZERO,
            zoom_step,
            min_zoom,
        }
    }

    /// Starting zoom for an image: 1.0, or shrunk to fit inside `max_size`
    /// when the image is larger along either axis.
    pub fn fit(image_size: Vec2, max_size: Vec2, zoom_step: f32, min_zoom: f32) -> Self {
        let mut zoom = 1.0;
        if image_size.x > max_size.x || image_size.y > max_size.y {
            zoom = (max_size.x / image_size.x).min(max_size.y / image_size.y);
        }
        Self::new(zoom, zoom_step, min_zoom)
    }

    /// Convert image-space coords to view-space
    pub fn to_view(&self, img_pos: Pos2) -> Pos2 {
        egui::pos2(
            img_pos.x * self.zoom + self.pan.x,
            img_pos.y * self.zoom + self.pan.y,
        )
    }

    /// Convert view-space coords to image-space
    pub fn to_image(&self, view_pos: Pos2) -> Pos2 {
        egui::pos2(
            (view_pos.x - self.pan.x) / self.zoom,
            (view_pos.y - self.pan.y) / self.zoom,
        )
    }

    pub fn rect_to_view(&self, rect: &BoxRect) -> Rect {
        Rect::from_min_size(
            self.to_view(egui::pos2(rect.x, rect.y)),
            egui::vec2(rect.width * self.zoom, rect.height * self.zoom),
        )
    }

    pub fn zoom_in(&mut self) {
        self.zoom += self.zoom_step;
    }

    /// Steps the zoom down unless that would cross the floor, in which case
    /// the current value is kept.
    pub fn zoom_out(&mut self) {
        let next = self.zoom - self.zoom_step;
        if next >= self.min_zoom - ZOOM_EPSILON {
            self.zoom = next.max(self.min_zoom);
        }
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }
}
