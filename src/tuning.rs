//! Data-driven game balance
//!
//! Every tunable number the simulation reads lives here. Defaults come from
//! [`crate::consts`]; a JSON document may override any subset of fields.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::TuningError;
use crate::sim::powerup::{AttackParams, FlyParams};

/// Complete balance table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub game: GameTuning,
    pub player: PlayerTuning,
    pub obstacle: ObstacleTuning,
    pub ground: GroundTuning,
    pub background: BackgroundTuning,
    pub powerups: PowerupTuning,
    pub score: ScoreTuning,
    pub loading: LoadingTuning,
    pub ui: UiTuning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameTuning {
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub ground_height: f32,
    pub starting_speed: f32,
    pub speed_increment: f32,
    pub speed_increment_score: f64,
    pub idle_scroll_factor: f32,
    pub game_over_delay_ms: f64,
}

impl Default for GameTuning {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            ground_height: GROUND_HEIGHT,
            starting_speed: STARTING_SPEED,
            speed_increment: SPEED_INCREMENT,
            speed_increment_score: SPEED_INCREMENT_SCORE,
            idle_scroll_factor: IDLE_SCROLL_FACTOR,
            game_over_delay_ms: GAME_OVER_DELAY_MS,
        }
    }
}

impl GameTuning {
    /// Top edge of the ground strip
    pub fn ground_top(&self) -> f32 {
        self.canvas_height - self.ground_height
    }
}

/// Animation frame counts per sprite sequence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimFrames {
    pub idle: u32,
    pub running: u32,
    pub jumping: u32,
    pub idle_to_running: u32,
    pub falling: u32,
}

impl Default for AnimFrames {
    fn default() -> Self {
        Self {
            idle: FRAMES_IDLE,
            running: FRAMES_RUNNING,
            jumping: FRAMES_JUMPING,
            idle_to_running: FRAMES_IDLE_TO_RUNNING,
            falling: FRAMES_FALLING,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub width: f32,
    pub height: f32,
    pub starting_x: f32,
    pub hitbox_width_ratio: f32,
    pub hitbox_height_ratio: f32,
    pub hitbox_x_offset_divisor: f32,
    pub hitbox_y_offset_divisor: f32,
    pub initial_jump_power: f32,
    pub max_jump_power: f32,
    pub jump_charge_rate: f32,
    pub jump_boost_multiplier: f32,
    pub jump_boost_delay_ms: f64,
    pub gravity: f32,
    pub gravity_reduction: f32,
    pub fall_speed: f32,
    pub fly_ease: f32,
    pub base_ticks_per_frame: u32,
    pub min_ticks_per_frame: u32,
    pub animation_speed_factor: f32,
    pub frames: AnimFrames,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            starting_x: PLAYER_STARTING_X,
            hitbox_width_ratio: HITBOX_WIDTH_RATIO,
            hitbox_height_ratio: HITBOX_HEIGHT_RATIO,
            hitbox_x_offset_divisor: HITBOX_X_OFFSET_DIVISOR,
            hitbox_y_offset_divisor: HITBOX_Y_OFFSET_DIVISOR,
            initial_jump_power: INITIAL_JUMP_POWER,
            max_jump_power: MAX_JUMP_POWER,
            jump_charge_rate: JUMP_CHARGE_RATE,
            jump_boost_multiplier: JUMP_BOOST_MULTIPLIER,
            jump_boost_delay_ms: JUMP_BOOST_DELAY_MS,
            gravity: GRAVITY,
            gravity_reduction: GRAVITY_REDUCTION,
            fall_speed: FALL_SPEED,
            fly_ease: FLY_EASE,
            base_ticks_per_frame: BASE_TICKS_PER_FRAME,
            min_ticks_per_frame: MIN_TICKS_PER_FRAME,
            animation_speed_factor: ANIMATION_SPEED_FACTOR,
            frames: AnimFrames::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleTuning {
    pub min_width: f32,
    pub max_width: f32,
    pub min_height: f32,
    pub max_height: f32,
    /// Leftward pixels per tick at game speed 1
    pub base_speed: f32,
    pub spawn_interval_ms: f32,
    pub destroy_launch_speed: f32,
    pub destroy_drift_factor: f32,
    pub destroy_spin: f32,
    pub destroy_gravity: f32,
    pub destroy_duration_ms: f32,
    pub destroy_min_duration_ms: f32,
}

impl Default for ObstacleTuning {
    fn default() -> Self {
        Self {
            min_width: OBSTACLE_MIN_WIDTH,
            max_width: OBSTACLE_MAX_WIDTH,
            min_height: OBSTACLE_MIN_HEIGHT,
            max_height: OBSTACLE_MAX_HEIGHT,
            base_speed: BASE_SCROLL_SPEED,
            spawn_interval_ms: OBSTACLE_SPAWN_INTERVAL_MS,
            destroy_launch_speed: DESTROY_LAUNCH_SPEED,
            destroy_drift_factor: DESTROY_DRIFT_FACTOR,
            destroy_spin: DESTROY_SPIN,
            destroy_gravity: DESTROY_GRAVITY,
            destroy_duration_ms: DESTROY_DURATION_MS,
            destroy_min_duration_ms: DESTROY_MIN_DURATION_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundTuning {
    pub segment_width: f32,
    pub min_gap_width: f32,
    pub max_gap_width: f32,
    pub gap_chance: f64,
}

impl Default for GroundTuning {
    fn default() -> Self {
        Self {
            segment_width: SEGMENT_WIDTH,
            min_gap_width: MIN_GAP_WIDTH,
            max_gap_width: MAX_GAP_WIDTH,
            gap_chance: GAP_CHANCE,
        }
    }
}

/// One parallax depth
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerTuning {
    /// Asset key of the tile image
    pub asset: String,
    pub speed: f32,
    pub overlap: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundTuning {
    /// Far to near
    pub layers: Vec<LayerTuning>,
}

impl Default for BackgroundTuning {
    fn default() -> Self {
        let layer = |asset: &str, speed, overlap| LayerTuning {
            asset: asset.to_string(),
            speed,
            overlap,
        };
        Self {
            layers: vec![
                layer("background_far", BG_FAR_SPEED, BG_FAR_OVERLAP),
                layer("background_mid", BG_MID_SPEED, BG_MID_OVERLAP),
                layer("background_near", BG_NEAR_SPEED, BG_NEAR_OVERLAP),
            ],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerupTuning {
    pub fly: FlyParams,
    pub attack: AttackParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreTuning {
    /// True-score units per displayed point
    pub divider: f64,
    /// Fraction of the gap the display score closes per tick
    pub display_ease: f64,
    pub bonus_flash_ms: f32,
}

impl Default for ScoreTuning {
    fn default() -> Self {
        Self {
            divider: SCORE_DIVIDER,
            display_ease: DISPLAY_EASE,
            bonus_flash_ms: BONUS_FLASH_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadingTuning {
    pub min_progress: f32,
    pub progress_step: f32,
    pub fade_delay_ms: f64,
    pub fade_step: f32,
}

impl Default for LoadingTuning {
    fn default() -> Self {
        Self {
            min_progress: LOADING_MIN_PROGRESS,
            progress_step: LOADING_PROGRESS_STEP,
            fade_delay_ms: LOADING_FADE_DELAY_MS,
            fade_step: LOADING_FADE_STEP,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiTuning {
    pub start_width: f32,
    pub start_height: f32,
    pub start_x_ratio: f32,
    pub start_y_ratio: f32,
    pub retry_width: f32,
    pub retry_height: f32,
    pub retry_y_ratio: f32,
}

impl Default for UiTuning {
    fn default() -> Self {
        Self {
            start_width: START_BUTTON_WIDTH,
            start_height: START_BUTTON_HEIGHT,
            start_x_ratio: START_BUTTON_X_RATIO,
            start_y_ratio: START_BUTTON_Y_RATIO,
            retry_width: RETRY_BUTTON_WIDTH,
            retry_height: RETRY_BUTTON_HEIGHT,
            retry_y_ratio: RETRY_BUTTON_Y_RATIO,
        }
    }
}

fn ordered(field: &'static str, min: f32, max: f32) -> Result<(), TuningError> {
    if min > max {
        return Err(TuningError::InvertedRange { field, min, max });
    }
    Ok(())
}

fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_nan() || value <= 0.0 {
        return Err(TuningError::NonPositive { field, value });
    }
    Ok(())
}

fn unit(field: &'static str, value: f64) -> Result<(), TuningError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(TuningError::OutOfUnitRange { field, value });
    }
    Ok(())
}

impl Tuning {
    /// Parse a (possibly partial) JSON override and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!("Loaded tuning overrides");
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject configurations the simulation cannot honour
    pub fn validate(&self) -> Result<(), TuningError> {
        let g = &self.game;
        positive("game.canvas_width", g.canvas_width)?;
        positive("game.canvas_height", g.canvas_height)?;
        positive("game.starting_speed", g.starting_speed)?;
        positive("game.speed_increment_score", g.speed_increment_score as f32)?;

        let p = &self.player;
        positive("player.width", p.width)?;
        positive("player.height", p.height)?;
        // Strictly below 1 so the hitbox sits inside the sprite
        unit("player.hitbox_width_ratio", p.hitbox_width_ratio as f64)?;
        unit("player.hitbox_height_ratio", p.hitbox_height_ratio as f64)?;
        positive("player.hitbox_width_ratio", p.hitbox_width_ratio)?;
        positive("player.hitbox_height_ratio", p.hitbox_height_ratio)?;
        if p.hitbox_width_ratio >= 1.0 || p.hitbox_height_ratio >= 1.0 {
            return Err(TuningError::OutOfUnitRange {
                field: "player.hitbox_ratio",
                value: p.hitbox_width_ratio.max(p.hitbox_height_ratio) as f64,
            });
        }
        if p.hitbox_x_offset_divisor < 1.0 {
            return Err(TuningError::NonPositive {
                field: "player.hitbox_x_offset_divisor",
                value: p.hitbox_x_offset_divisor,
            });
        }
        if p.hitbox_y_offset_divisor < 1.0 {
            return Err(TuningError::NonPositive {
                field: "player.hitbox_y_offset_divisor",
                value: p.hitbox_y_offset_divisor,
            });
        }
        // Jump powers are negative (up); the cap must be at least as strong as the start
        ordered("player.jump_power", p.max_jump_power, p.initial_jump_power)?;
        positive("player.gravity", p.gravity)?;
        positive("player.fly_ease", p.fly_ease)?;
        unit("player.fly_ease", p.fly_ease as f64)?;
        positive("player.min_ticks_per_frame", p.min_ticks_per_frame as f32)?;
        ordered(
            "player.ticks_per_frame",
            p.min_ticks_per_frame as f32,
            p.base_ticks_per_frame as f32,
        )?;

        let o = &self.obstacle;
        ordered("obstacle.width", o.min_width, o.max_width)?;
        ordered("obstacle.height", o.min_height, o.max_height)?;
        positive("obstacle.min_width", o.min_width)?;
        positive("obstacle.min_height", o.min_height)?;
        positive("obstacle.spawn_interval_ms", o.spawn_interval_ms)?;
        positive("obstacle.destroy_min_duration_ms", o.destroy_min_duration_ms)?;

        let gr = &self.ground;
        positive("ground.segment_width", gr.segment_width)?;
        ordered("ground.gap_width", gr.min_gap_width, gr.max_gap_width)?;
        positive("ground.min_gap_width", gr.min_gap_width)?;
        unit("ground.gap_chance", gr.gap_chance)?;

        for layer in &self.background.layers {
            positive("background.layer.speed", layer.speed)?;
        }

        let pw = &self.powerups;
        positive("powerups.fly.duration_ms", pw.fly.duration_ms)?;
        positive("powerups.attack.duration_ms", pw.attack.duration_ms)?;
        unit("powerups.fly.target_y_ratio", pw.fly.target_y_ratio as f64)?;

        positive("score.divider", self.score.divider as f32)?;
        unit("score.display_ease", self.score.display_ease)?;
        positive("loading.fade_step", self.loading.fade_step)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert_eq!(Tuning::default().validate(), Ok(()));
    }

    #[test]
    fn test_partial_json_override() {
        let tuning = Tuning::from_json(r#"{ "obstacle": { "spawn_interval_ms": 900.0 } }"#)
            .expect("valid override");
        assert_eq!(tuning.obstacle.spawn_interval_ms, 900.0);
        // Untouched fields keep their defaults
        assert_eq!(tuning.obstacle.max_height, OBSTACLE_MAX_HEIGHT);
        assert_eq!(tuning.ground, GroundTuning::default());
    }

    #[test]
    fn test_inverted_obstacle_bounds_rejected() {
        let result = Tuning::from_json(r#"{ "obstacle": { "min_width": 60.0, "max_width": 40.0 } }"#);
        assert_eq!(
            result,
            Err(TuningError::InvertedRange {
                field: "obstacle.width",
                min: 60.0,
                max: 40.0
            })
        );
    }

    #[test]
    fn test_bad_gap_chance_rejected() {
        let mut tuning = Tuning::default();
        tuning.ground.gap_chance = 1.5;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::OutOfUnitRange { field: "ground.gap_chance", .. })
        ));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(Tuning::from_json("{ nope"), Err(TuningError::Parse(_))));
    }

    #[test]
    fn test_json_round_trip_keeps_layers() {
        let json = Tuning::default().to_json().unwrap();
        let back = Tuning::from_json(&json).unwrap();
        assert_eq!(back.background.layers.len(), 3);
        assert_eq!(back, Tuning::default());
    }
}
