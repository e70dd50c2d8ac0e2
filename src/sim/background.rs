//! Multi-layer parallax background
//!
//! Each layer scrolls at its own fraction of the game speed and wraps by
//! (tile width - overlap), so neighbouring tiles overlap slightly and no seam
//! shows. A layer whose image is not ready yet has no tile size and stays put.

use glam::Vec2;

use crate::renderer::AssetProvider;
use crate::tuning::{BackgroundTuning, GameTuning};

#[derive(Debug, Clone, PartialEq)]
pub struct ParallaxLayer {
    pub asset: String,
    pub speed: f32,
    pub overlap: f32,
    /// Left edge of the first tile, in (-period, 0]
    pub offset: f32,
    /// Known once the image is ready
    pub tile: Option<Vec2>,
}

impl ParallaxLayer {
    /// Distance between consecutive tile origins
    pub fn period(&self) -> Option<f32> {
        self.tile
            .map(|t| t.x - self.overlap)
            .filter(|p| *p > 0.0)
    }

    fn scroll(&mut self, game_speed: f32) {
        let Some(period) = self.period() else {
            return;
        };
        self.offset -= self.speed * game_speed;
        if self.offset <= -period {
            self.offset %= period;
        }
    }

    /// x of every tile needed to cover `[0, view_width)`
    pub fn tile_positions(&self, view_width: f32) -> Vec<f32> {
        let (Some(period), Some(tile)) = (self.period(), self.tile) else {
            return Vec::new();
        };
        let mut xs = Vec::new();
        let mut x = self.offset;
        while x < view_width {
            if x + tile.x > 0.0 {
                xs.push(x);
            }
            x += period;
        }
        xs
    }
}

#[derive(Debug, Clone)]
pub struct Background {
    layers: Vec<ParallaxLayer>,
    view_width: f32,
    view_height: f32,
}

impl Background {
    pub fn new(tuning: &BackgroundTuning, game: &GameTuning) -> Self {
        let layers = tuning
            .layers
            .iter()
            .map(|l| ParallaxLayer {
                asset: l.asset.clone(),
                speed: l.speed,
                overlap: l.overlap,
                offset: 0.0,
                tile: None,
            })
            .collect();
        Self {
            layers,
            view_width: game.canvas_width,
            view_height: game.canvas_height,
        }
    }

    /// Far to near
    pub fn layers(&self) -> &[ParallaxLayer] {
        &self.layers
    }

    pub fn view_width(&self) -> f32 {
        self.view_width
    }

    pub fn view_height(&self) -> f32 {
        self.view_height
    }

    /// Pick up tile sizes of images that finished loading
    pub fn sync_assets(&mut self, assets: &dyn AssetProvider) {
        for layer in self.layers.iter_mut().filter(|l| l.tile.is_none()) {
            if let Some(image) = assets.get(&layer.asset) {
                layer.tile = Some(image.size());
            }
        }
    }

    pub fn update(&mut self, game_speed: f32) {
        for layer in &mut self.layers {
            layer.scroll(game_speed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::StaticAssets;

    fn background() -> Background {
        Background::new(&BackgroundTuning::default(), &GameTuning::default())
    }

    fn loaded(width: u32) -> Background {
        let mut bg = background();
        let mut assets = StaticAssets::new(3);
        for layer in bg.layers().to_vec() {
            assets.insert(&layer.asset, width, 720);
        }
        bg.sync_assets(&assets);
        bg
    }

    #[test]
    fn test_unloaded_layers_hold_still() {
        let mut bg = background();
        bg.update(1.0);
        assert!(bg.layers().iter().all(|l| l.offset == 0.0));
        assert!(bg.layers()[0].tile_positions(1280.0).is_empty());
    }

    #[test]
    fn test_layers_scroll_at_own_speed() {
        let mut bg = loaded(1500);
        bg.update(2.0);
        let offsets: Vec<f32> = bg.layers().iter().map(|l| l.offset).collect();
        assert_eq!(offsets, vec![-1.0, -3.0, -6.0]);
    }

    #[test]
    fn test_offset_wraps_within_period() {
        let mut bg = loaded(1500);
        for _ in 0..10_000 {
            bg.update(3.0);
            for layer in bg.layers() {
                let period = layer.period().unwrap();
                assert!(layer.offset <= 0.0 && layer.offset > -period);
            }
        }
    }

    #[test]
    fn test_tiles_cover_view() {
        let mut bg = loaded(700);
        for _ in 0..137 {
            bg.update(1.0);
        }
        let view = bg.view_width();
        for layer in bg.layers() {
            let xs = layer.tile_positions(view);
            let tile = layer.tile.unwrap().x;
            assert!(xs[0] <= 0.0);
            assert!(xs.last().unwrap() + tile >= view);
            for pair in xs.windows(2) {
                assert!(pair[1] - pair[0] <= tile);
            }
        }
    }
}
