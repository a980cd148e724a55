//! Triangle-list batch behind the render surface
//!
//! Every primitive is transformed on the CPU by the current affine matrix
//! and appended as two triangles in logical screen coordinates. Overlay
//! blits are expanded into their pixel rectangles.

use glam::{Affine2, Vec2};

use super::RenderSurface;
use super::sprites::{OverlayImage, SpriteSet};
use super::vertex::{VERTICES_PER_QUAD, Vertex};
use crate::palette;

/// Opacity of the fallback fill for a missing overlay image
const OVERLAY_PLACEHOLDER_ALPHA: f32 = 0.35;

#[derive(Debug, Clone, Copy)]
struct DrawState {
    transform: Affine2,
    alpha: f32,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Affine2::IDENTITY,
            alpha: 1.0,
        }
    }
}

/// Collects one frame of colored quads
pub struct QuadBatch<'a> {
    vertices: Vec<Vertex>,
    state: DrawState,
    stack: Vec<DrawState>,
    overlays: Option<&'a SpriteSet>,
}

impl Default for QuadBatch<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> QuadBatch<'a> {
    pub fn new() -> Self {
        Self {
            vertices: Vec::with_capacity(8192),
            state: DrawState::default(),
            stack: Vec::new(),
            overlays: None,
        }
    }

    /// Batch that resolves `blit` against the given overlay images
    pub fn with_overlays(overlays: &'a SpriteSet) -> Self {
        Self {
            overlays: Some(overlays),
            ..Self::new()
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn into_vertices(self) -> Vec<Vertex> {
        self.vertices
    }

    /// Number of quads emitted so far
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / VERTICES_PER_QUAD
    }

    /// Start a new frame; unbalanced saves from the last frame are dropped
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.stack.clear();
        self.state = DrawState::default();
    }

    pub fn transform(&self) -> Affine2 {
        self.state.transform
    }
}

impl RenderSurface for QuadBatch<'_> {
    fn save(&mut self) {
        self.stack.push(self.state);
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, offset: Vec2) {
        self.state.transform = self.state.transform * Affine2::from_translation(offset);
    }

    fn rotate(&mut self, radians: f32) {
        self.state.transform = self.state.transform * Affine2::from_angle(radians);
    }

    fn scale(&mut self, factor: Vec2) {
        self.state.transform = self.state.transform * Affine2::from_scale(factor);
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.state.alpha = alpha.clamp(0.0, 1.0);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, rgba: [f32; 4]) {
        let alpha = rgba[3] * self.state.alpha;
        if alpha <= 0.0 || w == 0.0 || h == 0.0 {
            return;
        }
        let color = [rgba[0], rgba[1], rgba[2], alpha];
        let t = self.state.transform;
        let corners = [
            Vec2::new(x, y),
            Vec2::new(x + w, y),
            Vec2::new(x + w, y + h),
            Vec2::new(x, y + h),
        ]
        .map(|p| t.transform_point2(p));
        self.vertices.extend_from_slice(&Vertex::quad(corners, color));
    }

    fn blit(&mut self, image: OverlayImage, x: f32, y: f32, w: f32, h: f32) {
        match self.overlays.and_then(|set| set.overlay(image)) {
            Some(sprite) => {
                self.save();
                self.translate(Vec2::new(x, y));
                self.scale(Vec2::new(w / sprite.width, h / sprite.height));
                for pixel in &sprite.pixels {
                    self.fill_rect(pixel.x, pixel.y, 1.0, 1.0, pixel.color);
                }
                self.restore();
            }
            None => {
                if let Some(index) = image.placeholder() {
                    let mut color = palette::rgba(index);
                    color[3] = OVERLAY_PLACEHOLDER_ALPHA;
                    self.fill_rect(x, y, w, h, color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::sprites::{PixelRecord, Sprite};

    const WHITE: [f32; 4] = [1.0; 4];

    #[test]
    fn test_fill_rect_emits_two_triangles() {
        let mut batch = QuadBatch::new();
        batch.fill_rect(1.0, 2.0, 3.0, 4.0, WHITE);
        assert_eq!(batch.quad_count(), 1);
        let v = batch.vertices();
        assert_eq!(v[0].position, [1.0, 2.0]);
        assert_eq!(v[2].position, [4.0, 6.0]);
    }

    #[test]
    fn test_transform_stack() {
        let mut batch = QuadBatch::new();
        batch.save();
        batch.translate(Vec2::new(10.0, 10.0));
        batch.scale(Vec2::new(-1.0, 1.0));
        batch.fill_rect(0.0, 0.0, 2.0, 2.0, WHITE);
        batch.restore();
        batch.fill_rect(0.0, 0.0, 1.0, 1.0, WHITE);

        let v = batch.vertices();
        // Mirrored around the translated origin
        assert_eq!(v[1].position, [8.0, 10.0]);
        assert_eq!(v[6].position, [0.0, 0.0]);
        assert_eq!(batch.transform(), Affine2::IDENTITY);
    }

    #[test]
    fn test_alpha_multiplies_and_zero_skips() {
        let mut batch = QuadBatch::new();
        batch.set_alpha(0.5);
        batch.fill_rect(0.0, 0.0, 1.0, 1.0, [1.0, 0.0, 0.0, 0.5]);
        assert_eq!(batch.vertices()[0].color[3], 0.25);

        batch.set_alpha(0.0);
        batch.fill_rect(0.0, 0.0, 1.0, 1.0, WHITE);
        assert_eq!(batch.quad_count(), 1);
    }

    #[test]
    fn test_restore_without_save_is_harmless() {
        let mut batch = QuadBatch::new();
        batch.translate(Vec2::new(5.0, 0.0));
        batch.restore();
        batch.fill_rect(0.0, 0.0, 1.0, 1.0, WHITE);
        assert_eq!(batch.vertices()[0].position, [5.0, 0.0]);
    }

    #[test]
    fn test_blit_scales_overlay_pixels() {
        let mut set = SpriteSet::new();
        let records = vec![
            PixelRecord { x: 0, y: 0, color: "#FF0000".into() },
            PixelRecord { x: 1, y: 1, color: "#FF0000".into() },
        ];
        set.insert_overlay(OverlayImage::Title, Sprite::from_records(&records).unwrap());

        let mut batch = QuadBatch::with_overlays(&set);
        batch.blit(OverlayImage::Title, 10.0, 20.0, 8.0, 8.0);
        assert_eq!(batch.quad_count(), 2);
        // Second pixel lands at (1,1) * 4 + origin
        assert_eq!(batch.vertices()[6].position, [14.0, 24.0]);
    }

    #[test]
    fn test_missing_overlay_placeholder() {
        let mut batch = QuadBatch::new();
        batch.blit(OverlayImage::Controls, 0.0, 0.0, 10.0, 10.0);
        assert_eq!(batch.quad_count(), 0);
        batch.blit(OverlayImage::BloodTopLeft, 0.0, 0.0, 10.0, 10.0);
        assert_eq!(batch.quad_count(), 1);
    }
}
