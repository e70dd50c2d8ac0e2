//! Scrolling ground strip made of solid segments and gaps
//!
//! Segments are kept contiguous: every segment starts exactly where the
//! previous one ends. Positions are re-chained from the first segment after
//! each shift, so the invariant holds bit-for-bit rather than approximately.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::tuning::{GameTuning, GroundTuning};

/// One stretch of ground (or a hole)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundSegment {
    pub x: f32,
    pub width: f32,
    pub is_gap: bool,
}

impl GroundSegment {
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Solid segments own their edges; gaps only their interior, so a
    /// point on a solid/gap boundary is solid
    #[inline]
    fn covers(&self, x: f32) -> bool {
        if self.is_gap {
            x > self.x && x < self.right()
        } else {
            x >= self.x && x <= self.right()
        }
    }
}

#[derive(Debug, Clone)]
pub struct Ground {
    segments: Vec<GroundSegment>,
    tuning: GroundTuning,
    view_width: f32,
    top: f32,
    height: f32,
    gaps_enabled: bool,
}

impl Ground {
    /// Fresh ground: a double-width safe platform at x=0, then generated
    /// segments out past the right edge
    pub fn new(
        tuning: &GroundTuning,
        game: &GameTuning,
        gaps_enabled: bool,
        rng: &mut impl Rng,
    ) -> Self {
        assert!(tuning.segment_width > 0.0, "segment width must be positive");
        assert!(
            tuning.min_gap_width <= tuning.max_gap_width,
            "gap width bounds inverted"
        );
        let mut ground = Self {
            segments: vec![GroundSegment {
                x: 0.0,
                width: tuning.segment_width * 2.0,
                is_gap: false,
            }],
            tuning: tuning.clone(),
            view_width: game.canvas_width,
            top: game.ground_top(),
            height: game.ground_height,
            gaps_enabled,
        };
        ground.extend(rng);
        ground
    }

    pub fn segments(&self) -> &[GroundSegment] {
        &self.segments
    }

    /// Top edge of the strip
    pub fn top(&self) -> f32 {
        self.top
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn gaps_enabled(&self) -> bool {
        self.gaps_enabled
    }

    /// y at which an object of `height` rests on the strip
    pub fn ground_y_for(&self, height: f32) -> f32 {
        self.top - height
    }

    /// Rectangle a segment occupies on screen
    pub fn segment_rect(&self, segment: &GroundSegment) -> Rect {
        Rect::new(segment.x, self.top, segment.width, self.height)
    }

    /// Right end of generated coverage
    pub fn right_edge(&self) -> f32 {
        self.segments.last().map_or(0.0, GroundSegment::right)
    }

    /// Coverage the generator keeps ahead of the left edge
    pub fn lookahead(&self) -> f32 {
        self.view_width + self.tuning.segment_width * 2.0
    }

    /// Scroll left by `scroll_delta`, cull what left the screen, top up the far end
    pub fn update(&mut self, scroll_delta: f32, rng: &mut impl Rng) {
        if let Some(first) = self.segments.first_mut() {
            first.x -= scroll_delta;
        }
        self.rechain();

        let gone = self
            .segments
            .iter()
            .take_while(|s| s.right() < 0.0)
            .count();
        self.segments.drain(..gone);

        self.extend(rng);
    }

    /// Whether the horizontal center of the span `[x, x + width]` is over a gap
    pub fn is_over_gap(&self, x: f32, width: f32) -> bool {
        let center = x + width / 2.0;
        self.segments.iter().any(|s| s.is_gap && s.covers(center))
    }

    /// Whether the horizontal center of the span `[x, x + width]` is over solid ground
    pub fn is_over_solid_ground(&self, x: f32, width: f32) -> bool {
        let center = x + width / 2.0;
        self.segments.iter().any(|s| !s.is_gap && s.covers(center))
    }

    /// Toggle gap generation. Disabling filters existing gaps out and closes
    /// the holes so the strip stays contiguous.
    pub fn set_gaps_enabled(&mut self, enabled: bool, rng: &mut impl Rng) {
        self.gaps_enabled = enabled;
        if enabled {
            return;
        }
        let Some(start) = self.segments.first().map(|s| s.x) else {
            return;
        };
        self.segments.retain(|s| !s.is_gap);
        if let Some(first) = self.segments.first_mut() {
            first.x = start;
        }
        self.rechain();
        self.extend(rng);
    }

    fn rechain(&mut self) {
        for i in 1..self.segments.len() {
            self.segments[i].x = self.segments[i - 1].right();
        }
    }

    fn extend(&mut self, rng: &mut impl Rng) {
        if self.segments.is_empty() {
            self.segments.push(GroundSegment {
                x: 0.0,
                width: self.tuning.segment_width,
                is_gap: false,
            });
        }
        let lookahead = self.lookahead();
        while self.right_edge() < lookahead {
            let x = self.right_edge();
            self.segments.push(GroundSegment {
                x,
                width: self.tuning.segment_width,
                is_gap: false,
            });

            if self.gaps_enabled && rng.random_bool(self.tuning.gap_chance) {
                let width = rng.random_range(self.tuning.min_gap_width..=self.tuning.max_gap_width);
                self.segments.push(GroundSegment {
                    x: self.right_edge(),
                    width,
                    is_gap: true,
                });
            }
        }
    }

    #[cfg(test)]
    fn with_segments(segments: Vec<GroundSegment>) -> Self {
        let game = GameTuning::default();
        Self {
            segments,
            tuning: GroundTuning::default(),
            view_width: game.canvas_width,
            top: game.ground_top(),
            height: game.ground_height,
            gaps_enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn ground(seed: u64, gaps: bool) -> (Ground, Pcg32) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let g = Ground::new(&GroundTuning::default(), &GameTuning::default(), gaps, &mut rng);
        (g, rng)
    }

    fn assert_contiguous(g: &Ground) {
        for pair in g.segments().windows(2) {
            assert_eq!(pair[0].x + pair[0].width, pair[1].x);
        }
    }

    #[test]
    fn test_safe_starting_platform() {
        for seed in 0..20 {
            let (g, _) = ground(seed, true);
            let first = g.segments()[0];
            assert!(!first.is_gap);
            assert_eq!(first.x, 0.0);
            assert!(first.width >= 2.0 * GroundTuning::default().segment_width);
            assert!(g.right_edge() >= g.lookahead());
            assert_contiguous(&g);
        }
    }

    #[test]
    fn test_scroll_culls_and_extends() {
        let (mut g, mut rng) = ground(7, true);
        for _ in 0..2000 {
            g.update(5.0, &mut rng);
            assert!(g.segments()[0].x <= 0.0);
            assert!(g.segments()[0].right() >= 0.0);
            assert!(g.right_edge() >= g.lookahead());
        }
        assert_contiguous(&g);
    }

    #[test]
    fn test_no_gaps_when_disabled() {
        let (mut g, mut rng) = ground(3, false);
        for _ in 0..1000 {
            g.update(7.5, &mut rng);
        }
        assert!(g.segments().iter().all(|s| !s.is_gap));
    }

    #[test]
    fn test_gaps_appear_with_chance() {
        let (mut g, mut rng) = ground(11, true);
        let mut saw_gap = false;
        for _ in 0..1000 {
            g.update(5.0, &mut rng);
            saw_gap |= g.segments().iter().any(|s| s.is_gap);
        }
        assert!(saw_gap);
        let tuning = GroundTuning::default();
        for s in g.segments().iter().filter(|s| s.is_gap) {
            assert!(s.width >= tuning.min_gap_width && s.width <= tuning.max_gap_width);
        }
    }

    #[test]
    fn test_disabling_gaps_filters_and_rechains() {
        let (mut g, mut rng) = ground(11, true);
        for _ in 0..300 {
            g.update(5.0, &mut rng);
        }
        let start = g.segments()[0].x;
        g.set_gaps_enabled(false, &mut rng);
        assert!(g.segments().iter().all(|s| !s.is_gap));
        assert_eq!(g.segments()[0].x, start);
        assert!(g.right_edge() >= g.lookahead());
        assert_contiguous(&g);
    }

    #[test]
    fn test_gap_and_solid_queries_use_center() {
        let g = Ground::with_segments(vec![
            GroundSegment { x: 0.0, width: 400.0, is_gap: false },
            GroundSegment { x: 400.0, width: 100.0, is_gap: true },
            GroundSegment { x: 500.0, width: 200.0, is_gap: false },
        ]);
        // center at 450
        assert!(g.is_over_gap(430.0, 40.0));
        assert!(!g.is_over_solid_ground(430.0, 40.0));
        // right edge over the gap but center on solid ground
        assert!(!g.is_over_gap(360.0, 60.0));
        assert!(g.is_over_solid_ground(360.0, 60.0));
        assert!(g.is_over_solid_ground(300.0, 100.0));
        assert!(!g.is_over_gap(300.0, 100.0));
        // centers exactly on either edge of the gap stay on solid ground
        assert!(!g.is_over_gap(380.0, 40.0));
        assert!(g.is_over_solid_ground(380.0, 40.0));
        assert!(!g.is_over_gap(480.0, 40.0));
        assert!(g.is_over_solid_ground(480.0, 40.0));
        // segment boundaries are inclusive
        assert!(g.is_over_gap(380.0, 40.0));
        assert!(g.is_over_solid_ground(380.0, 40.0));
    }

    #[test]
    fn test_ground_y_for() {
        let (g, _) = ground(0, true);
        let game = GameTuning::default();
        assert_eq!(g.ground_y_for(50.0), game.canvas_height - game.ground_height - 50.0);
    }

    proptest! {
        #[test]
        fn segments_stay_contiguous(seed in any::<u64>(), speed in 0.5f32..25.0, ticks in 1usize..600) {
            let (mut g, mut rng) = ground(seed, true);
            for _ in 0..ticks {
                g.update(speed, &mut rng);
            }
            for pair in g.segments().windows(2) {
                prop_assert_eq!(pair[0].x + pair[0].width, pair[1].x);
            }
            prop_assert!(g.right_edge() >= g.lookahead());
        }
    }
}
