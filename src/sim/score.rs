//! Score accrual and the eased HUD value

use crate::tuning::ScoreTuning;

#[derive(Debug, Clone)]
pub struct ScoreSystem {
    /// True score, in per-tick units
    score: f64,
    /// Value shown on the HUD, chasing `score`
    display: f64,
    bonus_flash_ms: f32,
    tuning: ScoreTuning,
}

impl ScoreSystem {
    pub fn new(tuning: &ScoreTuning) -> Self {
        assert!(tuning.divider > 0.0, "score divider must be positive");
        Self {
            score: 0.0,
            display: 0.0,
            bonus_flash_ms: 0.0,
            tuning: tuning.clone(),
        }
    }

    pub fn reset(&mut self) {
        self.score = 0.0;
        self.display = 0.0;
        self.bonus_flash_ms = 0.0;
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn display_score(&self) -> f64 {
        self.display
    }

    /// Accrue one tick's worth of score. Negative multipliers count as zero,
    /// so the true score never decreases.
    pub fn update_score(&mut self, dt_ms: f32, multiplier: f32) {
        self.score += f64::from(multiplier.max(0.0));
        self.ease_display(dt_ms);
    }

    /// Advance the HUD easing and flash timer without accruing
    pub fn ease_display(&mut self, dt_ms: f32) {
        self.display += (self.score - self.display) * self.tuning.display_ease;
        self.bonus_flash_ms = (self.bonus_flash_ms - dt_ms).max(0.0);
    }

    /// Lump-sum bonus in displayed points
    pub fn add_bonus(&mut self, points: u32) {
        self.score += f64::from(points) * self.tuning.divider;
        self.bonus_flash_ms = self.tuning.bonus_flash_ms;
        log::debug!("Bonus +{points}");
    }

    /// Whether the HUD should highlight a just-awarded bonus
    pub fn is_flashing(&self) -> bool {
        self.bonus_flash_ms > 0.0
    }

    /// Points shown on the HUD right now
    pub fn displayed_points(&self) -> u64 {
        (self.display / self.tuning.divider).floor() as u64
    }

    /// Points captured at game over
    pub fn final_score(&self) -> u64 {
        (self.score / self.tuning.divider).floor() as u64
    }

    #[cfg(test)]
    fn with_score(score: f64) -> Self {
        let mut s = Self::new(&ScoreTuning::default());
        s.score = score;
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_final_score_floors() {
        for (score, expected) in [(0.0, 0), (5.0, 0), (9.0, 0), (10.0, 1), (10000.0, 1000)] {
            assert_eq!(ScoreSystem::with_score(score).final_score(), expected);
        }
    }

    #[test]
    fn test_one_unit_per_tick() {
        let mut s = ScoreSystem::new(&ScoreTuning::default());
        for _ in 0..25 {
            s.update_score(16.0, 1.0);
        }
        assert_eq!(s.score(), 25.0);
        assert_eq!(s.final_score(), 2);
    }

    #[test]
    fn test_display_eases_toward_score() {
        let mut s = ScoreSystem::new(&ScoreTuning::default());
        s.update_score(16.0, 1.0);
        assert!((s.display_score() - 0.1).abs() < 1e-9);
        let before = s.display_score();
        s.ease_display(16.0);
        assert!(s.display_score() > before && s.display_score() < s.score());
    }

    #[test]
    fn test_bonus_scaled_and_flashes() {
        let mut s = ScoreSystem::new(&ScoreTuning::default());
        s.add_bonus(100);
        assert_eq!(s.final_score(), 100);
        assert!(s.is_flashing());
        for _ in 0..40 {
            s.ease_display(16.0);
        }
        assert!(!s.is_flashing());
    }

    #[test]
    fn test_negative_multiplier_clamped() {
        let mut s = ScoreSystem::new(&ScoreTuning::default());
        s.update_score(16.0, -3.0);
        assert_eq!(s.score(), 0.0);
    }

    #[test]
    fn test_reset() {
        let mut s = ScoreSystem::with_score(500.0);
        s.add_bonus(5);
        s.reset();
        assert_eq!(s.score(), 0.0);
        assert_eq!(s.display_score(), 0.0);
        assert!(!s.is_flashing());
    }

    proptest! {
        #[test]
        fn score_never_decreases(mults in prop::collection::vec(-2.0f32..10.0, 1..200)) {
            let mut s = ScoreSystem::new(&ScoreTuning::default());
            let mut last = s.score();
            for m in mults {
                s.update_score(16.0, m);
                prop_assert!(s.score() >= last);
                last = s.score();
            }
        }
    }
}
