//! Endless Runner - simulation core for a side-scrolling runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player physics, terrain, obstacles, powerups, game states)
//! - `renderer`: Drawing seam (asset provider + render surface traits, draw intents)
//! - `tuning`: Data-driven game balance
//! - `settings`: Debug toggles
//! - `ui`: Menu and game-over button layouts

pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use error::TuningError;
pub use settings::Settings;
pub use sim::Game;
pub use tuning::Tuning;

/// Default balance constants. `Tuning::default()` is built from these.
pub mod consts {
    /// Fixed simulation timestep (60 Hz, milliseconds)
    pub const SIM_DT_MS: f32 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the fixed-step driver will try to catch up on
    pub const MAX_FRAME_MS: f32 = 100.0;

    /// Canvas dimensions
    pub const CANVAS_WIDTH: f32 = 1280.0;
    pub const CANVAS_HEIGHT: f32 = 720.0;

    /// Ground strip height at the bottom of the canvas
    pub const GROUND_HEIGHT: f32 = 20.0;
    pub const STARTING_SPEED: f32 = 1.0;
    /// Speed added per `SPEED_INCREMENT_SCORE` of true score
    pub const SPEED_INCREMENT: f32 = 0.1;
    pub const SPEED_INCREMENT_SCORE: f64 = 1000.0;
    /// True score units per displayed point
    pub const SCORE_DIVIDER: f64 = 10.0;
    /// Menu and game-over screens scroll the background at this fraction of starting speed
    pub const IDLE_SCROLL_FACTOR: f32 = 0.3;
    /// Delay between falling into a gap and the game-over screen
    pub const GAME_OVER_DELAY_MS: f64 = 500.0;

    /// Player sprite size and placement
    pub const PLAYER_WIDTH: f32 = 200.0;
    pub const PLAYER_HEIGHT: f32 = 200.0;
    pub const PLAYER_STARTING_X: f32 = 50.0;

    /// Hitbox as a fraction of the sprite
    pub const HITBOX_WIDTH_RATIO: f32 = 0.6;
    pub const HITBOX_HEIGHT_RATIO: f32 = 0.7;
    /// Horizontal slack split evenly (centered)
    pub const HITBOX_X_OFFSET_DIVISOR: f32 = 2.0;
    /// A third of the vertical slack above the hitbox, two thirds below it
    pub const HITBOX_Y_OFFSET_DIVISOR: f32 = 3.0;

    /// Jump physics (negative = up, pixels per tick)
    pub const INITIAL_JUMP_POWER: f32 = -5.0;
    pub const MAX_JUMP_POWER: f32 = -12.0;
    pub const JUMP_CHARGE_RATE: f32 = 0.5;
    pub const JUMP_BOOST_MULTIPLIER: f32 = 1.1;
    pub const JUMP_BOOST_DELAY_MS: f64 = 20.0;
    pub const GRAVITY: f32 = 0.7;
    /// Gravity factor while ascending, for more hang time
    pub const GRAVITY_REDUCTION: f32 = 0.9;
    /// Constant downward speed while falling into a gap
    pub const FALL_SPEED: f32 = 8.0;
    /// Fraction of the remaining distance covered per tick while flying
    pub const FLY_EASE: f32 = 0.1;

    /// Animation timing (ticks per frame; higher = slower)
    pub const BASE_TICKS_PER_FRAME: u32 = 5;
    pub const MIN_TICKS_PER_FRAME: u32 = 2;
    pub const ANIMATION_SPEED_FACTOR: f32 = 1.2;
    pub const FRAMES_IDLE: u32 = 1;
    pub const FRAMES_RUNNING: u32 = 16;
    pub const FRAMES_JUMPING: u32 = 1;
    pub const FRAMES_IDLE_TO_RUNNING: u32 = 15;
    pub const FRAMES_FALLING: u32 = 1;

    /// Obstacle bounds and motion
    pub const OBSTACLE_MIN_WIDTH: f32 = 30.0;
    pub const OBSTACLE_MAX_WIDTH: f32 = 50.0;
    pub const OBSTACLE_MIN_HEIGHT: f32 = 30.0;
    pub const OBSTACLE_MAX_HEIGHT: f32 = 80.0;
    /// Leftward scroll per tick at game speed 1 (shared by ground and obstacles)
    pub const BASE_SCROLL_SPEED: f32 = 5.0;
    pub const OBSTACLE_SPAWN_INTERVAL_MS: f32 = 1500.0;

    /// Destruction animation
    pub const DESTROY_LAUNCH_SPEED: f32 = 10.0;
    pub const DESTROY_DRIFT_FACTOR: f32 = 0.5;
    pub const DESTROY_SPIN: f32 = 0.2;
    pub const DESTROY_GRAVITY: f32 = 0.3;
    pub const DESTROY_DURATION_MS: f32 = 500.0;
    pub const DESTROY_MIN_DURATION_MS: f32 = 300.0;

    /// Ground generation
    pub const SEGMENT_WIDTH: f32 = 200.0;
    pub const MIN_GAP_WIDTH: f32 = 80.0;
    pub const MAX_GAP_WIDTH: f32 = 150.0;
    pub const GAP_CHANCE: f64 = 0.4;

    /// Parallax layers (speed factor, overlap)
    pub const BG_FAR_SPEED: f32 = 0.5;
    pub const BG_MID_SPEED: f32 = 1.5;
    pub const BG_NEAR_SPEED: f32 = 3.0;
    pub const BG_FAR_OVERLAP: f32 = 5.0;
    pub const BG_MID_OVERLAP: f32 = 1.0;
    pub const BG_NEAR_OVERLAP: f32 = 1.0;

    /// Powerups
    pub const FLY_DURATION_MS: f32 = 5000.0;
    pub const FLY_TARGET_Y_RATIO: f32 = 0.5;
    pub const FLY_SPEED_MULTIPLIER: f32 = 3.0;
    pub const FLY_SCORE_MULTIPLIER: f32 = 8.0;
    pub const FLY_BONUS_POINTS: u32 = 100;
    pub const ATTACK_DURATION_MS: f32 = 5000.0;
    pub const ATTACK_SPEED_MULTIPLIER: f32 = 2.0;
    pub const ATTACK_SCORE_MULTIPLIER: f32 = 3.0;
    pub const ATTACK_POINTS_PER_OBSTACLE: u32 = 50;

    /// Score presentation
    pub const DISPLAY_EASE: f64 = 0.1;
    pub const BONUS_FLASH_MS: f32 = 500.0;

    /// Loading screen
    pub const LOADING_MIN_PROGRESS: f32 = 0.05;
    pub const LOADING_PROGRESS_STEP: f32 = 0.01;
    pub const LOADING_FADE_DELAY_MS: f64 = 500.0;
    pub const LOADING_FADE_STEP: f32 = 0.01;

    /// Menu buttons
    pub const START_BUTTON_WIDTH: f32 = 400.0;
    pub const START_BUTTON_HEIGHT: f32 = 150.0;
    pub const START_BUTTON_X_RATIO: f32 = 0.3;
    pub const START_BUTTON_Y_RATIO: f32 = 0.55;
    pub const RETRY_BUTTON_WIDTH: f32 = 200.0;
    pub const RETRY_BUTTON_HEIGHT: f32 = 80.0;
    pub const RETRY_BUTTON_Y_RATIO: f32 = 0.6;
}
