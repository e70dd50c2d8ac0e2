//! Rendering seam
//!
//! The simulation never touches pixels. It asks an [`AssetProvider`] whether
//! an image is ready and issues drawing intents against a [`RenderSurface`];
//! whatever sits behind those traits (canvas, GPU, a recording buffer) is the
//! host's business.

pub mod commands;
pub mod draw;

use glam::Vec2;

use crate::sim::rect::Rect;

pub use commands::{CommandBuffer, DrawCommand, StaticAssets};

/// Linear RGBA
pub type Color = [f32; 4];

/// Fallback colors used when an image is not ready
pub mod palette {
    use super::Color;

    pub const SKY: Color = [0.53, 0.81, 0.92, 1.0];
    pub const GROUND: Color = [0.55, 0.27, 0.07, 1.0];
    pub const PLAYER: Color = [0.2, 0.6, 0.86, 1.0];
    pub const ATTACK_GLOW: Color = [1.0, 0.3, 0.1, 1.0];
    pub const OBSTACLE: Color = [0.91, 0.3, 0.24, 1.0];
    pub const BUTTON: Color = [0.3, 0.69, 0.31, 1.0];
    pub const WHITE: Color = [1.0, 1.0, 1.0, 1.0];
    pub const BLACK: Color = [0.0, 0.0, 0.0, 1.0];
    pub const OVERLAY: Color = [0.0, 0.0, 0.0, 0.7];
    pub const HITBOX: Color = [1.0, 0.0, 0.0, 0.5];
    pub const GAP_MARKER: Color = [1.0, 1.0, 0.0, 0.6];
    pub const BONUS: Color = [1.0, 0.84, 0.0, 1.0];
}

/// Opaque reference to a decoded image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHandle {
    pub id: u32,
    pub width: u32,
    pub height: u32,
}

impl ImageHandle {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

/// Source of images, injected by the host
pub trait AssetProvider {
    fn is_ready(&self, key: &str) -> bool;

    /// `None` until the image is ready
    fn get(&self, key: &str) -> Option<ImageHandle>;

    /// Overall load progress in [0, 1]
    fn progress(&self) -> f32;
}

/// Per-draw transform and opacity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawStyle {
    pub alpha: f32,
    /// Radians, about the destination rectangle's center
    pub rotation: f32,
    pub translation: Vec2,
}

impl Default for DrawStyle {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            rotation: 0.0,
            translation: Vec2::ZERO,
        }
    }
}

impl DrawStyle {
    pub fn with_alpha(alpha: f32) -> Self {
        Self {
            alpha,
            ..Self::default()
        }
    }

    pub fn rotated(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }
}

/// Something drawing intents can be issued against
pub trait RenderSurface {
    fn width(&self) -> f32;

    fn height(&self) -> f32;

    fn clear(&mut self, color: Color);

    fn draw_image(&mut self, image: ImageHandle, dest: Rect, style: DrawStyle);

    fn fill_rect(&mut self, rect: Rect, color: Color, style: DrawStyle);

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f32);

    /// `pos` is the text's top-left corner
    fn draw_text(&mut self, text: &str, pos: Vec2, size: f32, color: Color);
}
