//! Recording surface and in-memory asset table
//!
//! Used by the headless binary and by tests; a real host implements the
//! traits over its own canvas instead.

use std::collections::HashMap;

use glam::Vec2;

use super::{AssetProvider, Color, DrawStyle, ImageHandle, RenderSurface};
use crate::sim::rect::Rect;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Image {
        image: ImageHandle,
        dest: Rect,
        style: DrawStyle,
    },
    FillRect {
        rect: Rect,
        color: Color,
        style: DrawStyle,
    },
    StrokeRect {
        rect: Rect,
        color: Color,
        line_width: f32,
    },
    Text {
        text: String,
        pos: Vec2,
        size: f32,
        color: Color,
    },
}

/// Render surface that records every call
#[derive(Debug, Clone)]
pub struct CommandBuffer {
    width: f32,
    height: f32,
    commands: Vec<DrawCommand>,
}

impl CommandBuffer {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Hand over the recorded frame and start a new one
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn image_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Image { .. }))
            .count()
    }

    pub fn fill_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillRect { .. }))
            .count()
    }

    /// Every text string drawn this frame
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl RenderSurface for CommandBuffer {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn draw_image(&mut self, image: ImageHandle, dest: Rect, style: DrawStyle) {
        self.commands.push(DrawCommand::Image { image, dest, style });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color, style: DrawStyle) {
        self.commands.push(DrawCommand::FillRect { rect, color, style });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f32) {
        self.commands.push(DrawCommand::StrokeRect {
            rect,
            color,
            line_width,
        });
    }

    fn draw_text(&mut self, text: &str, pos: Vec2, size: f32, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_owned(),
            pos,
            size,
            color,
        });
    }
}

/// Asset provider backed by a map of already-decoded images
#[derive(Debug, Clone, Default)]
pub struct StaticAssets {
    images: HashMap<String, ImageHandle>,
    expected: usize,
    next_id: u32,
}

impl StaticAssets {
    /// Nothing loaded yet; `expected` images make up 100%
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            ..Self::default()
        }
    }

    /// Everything in `manifest` loaded at its nominal size
    pub fn loaded(manifest: &[(String, Vec2)]) -> Self {
        let mut assets = Self::new(manifest.len());
        for (key, size) in manifest {
            assets.insert(key, size.x as u32, size.y as u32);
        }
        assets
    }

    /// Mark an image as decoded
    pub fn insert(&mut self, key: &str, width: u32, height: u32) -> ImageHandle {
        let handle = ImageHandle {
            id: self.next_id,
            width,
            height,
        };
        self.next_id += 1;
        if self.images.insert(key.to_owned(), handle).is_none() {
            self.expected = self.expected.max(self.images.len());
        }
        handle
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl AssetProvider for StaticAssets {
    fn is_ready(&self, key: &str) -> bool {
        self.images.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<ImageHandle> {
        self.images.get(key).copied()
    }

    fn progress(&self) -> f32 {
        if self.expected == 0 {
            return 1.0;
        }
        self.images.len() as f32 / self.expected as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_tracks_inserts() {
        let mut assets = StaticAssets::new(4);
        assert_eq!(assets.progress(), 0.0);
        assets.insert("a", 10, 10);
        assert_eq!(assets.progress(), 0.25);
        assert!(assets.is_ready("a"));
        assert!(!assets.is_ready("b"));
        assert_eq!(assets.get("a").map(|h| h.size()), Some(Vec2::new(10.0, 10.0)));
    }

    #[test]
    fn test_empty_manifest_is_complete() {
        assert_eq!(StaticAssets::new(0).progress(), 1.0);
    }

    #[test]
    fn test_buffer_records_in_order() {
        let mut buf = CommandBuffer::new(100.0, 50.0);
        buf.clear([0.0; 4]);
        buf.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), [1.0; 4], DrawStyle::default());
        buf.draw_text("hi", Vec2::ZERO, 12.0, [1.0; 4]);
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.fill_count(), 1);
        assert_eq!(buf.texts().collect::<Vec<_>>(), vec!["hi"]);
        assert_eq!(buf.take().len(), 3);
        assert!(buf.is_empty());
    }
}
