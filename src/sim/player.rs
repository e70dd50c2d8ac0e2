//! Player physics, motion state and sprite animation
//!
//! Motion is one explicit state at a time. When several conditions could
//! apply, the priority is falling > flying > landing-from-fly > jumping >
//! grounded, and the enum makes that exclusive by construction.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::{Bounded, Rect};
use super::schedule::Scheduler;
use crate::tuning::{AnimFrames, PlayerTuning};

/// Vertical motion state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MotionState {
    /// Resting on the ground line (running)
    Grounded,
    /// Airborne after a jump
    Jumping,
    /// Dropping through a gap; terminal for this player
    Falling,
    /// Easing toward a fixed altitude, gravity suspended
    Flying { target_y: f32 },
    /// Gravity restored after flight; lands straight into running
    LandingFromFly,
}

/// Sprite sequence being played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimState {
    Idle,
    IdleToRunning,
    Running,
    Jumping,
    Falling,
}

impl AnimState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimState::Idle => "idle",
            AnimState::IdleToRunning => "idle-to-running",
            AnimState::Running => "running",
            AnimState::Jumping => "jumping",
            AnimState::Falling => "falling",
        }
    }

    pub fn frame_count(&self, frames: &AnimFrames) -> u32 {
        match self {
            AnimState::Idle => frames.idle,
            AnimState::IdleToRunning => frames.idle_to_running,
            AnimState::Running => frames.running,
            AnimState::Jumping => frames.jumping,
            AnimState::Falling => frames.falling,
        }
    }
}

/// Speed/score multipliers written by active powerups
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Multipliers {
    pub fly_speed: f32,
    pub fly_score: f32,
    pub attack_speed: f32,
    pub attack_score: f32,
}

impl Default for Multipliers {
    fn default() -> Self {
        Self {
            fly_speed: 1.0,
            fly_score: 1.0,
            attack_speed: 1.0,
            attack_score: 1.0,
        }
    }
}

impl Multipliers {
    /// Combined game-speed factor
    pub fn speed(&self) -> f32 {
        self.fly_speed * self.attack_speed
    }

    /// Combined score-rate factor
    pub fn score(&self) -> f32 {
        self.fly_score * self.attack_score
    }
}

/// Deferred player events
#[derive(Debug, Clone, Copy, PartialEq)]
enum PlayerEvent {
    /// Secondary impulse for the jump with this serial
    JumpBoost { jump: u32 },
}

#[derive(Debug, Clone)]
pub struct Player {
    pos: Vec2,
    size: Vec2,
    tuning: PlayerTuning,
    /// Resting y (top of sprite) when on the ground line
    ground_y: f32,
    /// Vertical speed, pixels per tick (negative = up)
    speed: f32,
    current_jump_power: f32,
    motion: MotionState,
    jump_button_held: bool,
    can_charge_jump: bool,
    alive: bool,
    attacking: bool,
    /// Pulsing highlight while the attack powerup runs (0 = off)
    pub attack_glow: f32,
    pub multipliers: Multipliers,
    anim: AnimState,
    frame_index: u32,
    tick_count: u32,
    ticks_per_frame: u32,
    clock_ms: f64,
    jump_serial: u32,
    events: Scheduler<PlayerEvent>,
}

impl Player {
    /// A player standing at the starting x on the ground line `ground_top`
    pub fn new(tuning: &PlayerTuning, ground_top: f32) -> Self {
        assert!(
            tuning.hitbox_width_ratio < 1.0 && tuning.hitbox_height_ratio < 1.0,
            "hitbox must be smaller than the sprite"
        );
        let ground_y = ground_top - tuning.height;
        Self {
            pos: Vec2::new(tuning.starting_x, ground_y),
            size: Vec2::new(tuning.width, tuning.height),
            tuning: tuning.clone(),
            ground_y,
            speed: 0.0,
            current_jump_power: tuning.initial_jump_power,
            motion: MotionState::Grounded,
            jump_button_held: false,
            can_charge_jump: false,
            alive: true,
            attacking: false,
            attack_glow: 0.0,
            multipliers: Multipliers::default(),
            anim: AnimState::Idle,
            frame_index: 0,
            tick_count: 0,
            ticks_per_frame: tuning.base_ticks_per_frame,
            clock_ms: 0.0,
            jump_serial: 0,
            events: Scheduler::new(),
        }
    }

    pub fn motion(&self) -> MotionState {
        self.motion
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn ground_y(&self) -> f32 {
        self.ground_y
    }

    pub fn is_on_ground(&self) -> bool {
        self.motion == MotionState::Grounded
    }

    pub fn is_jumping(&self) -> bool {
        self.motion == MotionState::Jumping
    }

    pub fn is_falling(&self) -> bool {
        self.motion == MotionState::Falling
    }

    pub fn is_flying(&self) -> bool {
        matches!(self.motion, MotionState::Flying { .. })
    }

    pub fn is_exiting_fly_mode(&self) -> bool {
        self.motion == MotionState::LandingFromFly
    }

    pub fn is_jump_button_held(&self) -> bool {
        self.jump_button_held
    }

    pub fn can_charge_jump(&self) -> bool {
        self.can_charge_jump
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn kill(&mut self) {
        self.alive = false;
    }

    pub fn is_attacking(&self) -> bool {
        self.attacking
    }

    pub fn set_attacking(&mut self, attacking: bool) {
        self.attacking = attacking;
    }

    pub fn anim_state(&self) -> AnimState {
        self.anim
    }

    pub fn frame_index(&self) -> u32 {
        self.frame_index
    }

    pub fn ticks_per_frame(&self) -> u32 {
        self.ticks_per_frame
    }

    /// Asset key of the current animation frame
    pub fn sprite_key(&self) -> String {
        format!("player_{}_{}", self.anim.as_str(), self.frame_index)
    }

    pub fn has_pending_boost(&self) -> bool {
        !self.events.is_empty()
    }

    /// Begin a jump from the ground. Ignored while airborne, flying or falling.
    pub fn start_jump(&mut self) {
        if self.motion != MotionState::Grounded {
            return;
        }
        self.speed = self.tuning.initial_jump_power;
        self.current_jump_power = self.tuning.initial_jump_power;
        self.motion = MotionState::Jumping;
        self.jump_button_held = true;
        self.can_charge_jump = true;
        self.set_anim(AnimState::Jumping);

        self.jump_serial = self.jump_serial.wrapping_add(1);
        self.events.schedule(
            self.clock_ms,
            self.tuning.jump_boost_delay_ms,
            PlayerEvent::JumpBoost {
                jump: self.jump_serial,
            },
        );
    }

    /// Ramp jump power toward the cap while the button is held and the
    /// player is still rising
    pub fn continue_jump(&mut self) {
        if self.motion != MotionState::Jumping
            || !self.jump_button_held
            || !self.can_charge_jump
            || self.speed >= 0.0
        {
            return;
        }
        self.current_jump_power -= self.tuning.jump_charge_rate;
        if self.current_jump_power < self.tuning.max_jump_power {
            self.current_jump_power = self.tuning.max_jump_power;
            self.can_charge_jump = false;
        }
        self.speed = self.current_jump_power;
    }

    /// Release the jump button. Current velocity is untouched.
    pub fn end_jump(&mut self) {
        self.jump_button_held = false;
        self.can_charge_jump = false;
    }

    /// Drop into a gap. One-way and idempotent.
    pub fn fall(&mut self) {
        if self.motion == MotionState::Falling {
            return;
        }
        self.motion = MotionState::Falling;
        self.jump_button_held = false;
        self.can_charge_jump = false;
        self.speed = self.tuning.fall_speed;
        self.events.clear();
        self.set_anim(AnimState::Falling);
    }

    /// Suspend gravity and ease toward `target_y`. Ignored while falling.
    pub fn enter_fly_mode(&mut self, target_y: f32) {
        if self.motion == MotionState::Falling {
            return;
        }
        self.motion = MotionState::Flying { target_y };
        self.speed = 0.0;
        self.jump_button_held = false;
        self.can_charge_jump = false;
        self.events.clear();
        self.set_anim(AnimState::Jumping);
    }

    /// Restore gravity after flight
    pub fn exit_fly_mode(&mut self) {
        if !self.is_flying() {
            return;
        }
        self.motion = MotionState::LandingFromFly;
        self.speed = 0.0;
    }

    /// Advance one tick
    pub fn update(&mut self, dt_ms: f32, game_speed: f32) {
        self.clock_ms += dt_ms as f64;
        self.fire_due_events();

        match self.motion {
            MotionState::Falling => {
                self.pos.y += self.speed;
            }
            MotionState::Flying { target_y } => {
                let remaining = target_y - self.pos.y;
                if remaining.abs() < 1.0 {
                    self.pos.y = target_y;
                } else {
                    self.pos.y += remaining * self.tuning.fly_ease;
                }
                self.update_animation_speed(game_speed);
                self.advance_animation();
            }
            MotionState::Grounded | MotionState::Jumping | MotionState::LandingFromFly => {
                self.update_animation_speed(game_speed);
                if self.jump_button_held {
                    self.continue_jump();
                }
                self.apply_gravity();
                self.land_if_grounded();
                self.infer_animation();
                self.advance_animation();
            }
        }
    }

    fn fire_due_events(&mut self) {
        let serial = self.jump_serial;
        let due = self.events.drain_due(self.clock_ms, |e| match e {
            PlayerEvent::JumpBoost { jump } => *jump == serial,
        });
        for event in due {
            match event {
                PlayerEvent::JumpBoost { .. } => {
                    if self.motion == MotionState::Jumping
                        && self.jump_button_held
                        && self.can_charge_jump
                    {
                        self.speed =
                            self.tuning.initial_jump_power * self.tuning.jump_boost_multiplier;
                    }
                }
            }
        }
    }

    fn apply_gravity(&mut self) {
        if self.speed < 0.0 {
            self.speed += self.tuning.gravity * self.tuning.gravity_reduction;
        } else {
            self.speed += self.tuning.gravity;
            self.can_charge_jump = false;
        }
        self.pos.y += self.speed;
    }

    fn land_if_grounded(&mut self) {
        if self.pos.y <= self.ground_y {
            return;
        }
        self.pos.y = self.ground_y;
        self.speed = 0.0;
        match self.motion {
            MotionState::LandingFromFly => {
                self.motion = MotionState::Grounded;
                self.set_anim(AnimState::Running);
            }
            MotionState::Jumping => {
                self.motion = MotionState::Grounded;
                if self.anim == AnimState::Jumping {
                    self.set_anim(AnimState::Running);
                }
            }
            _ => {}
        }
    }

    fn infer_animation(&mut self) {
        match self.motion {
            MotionState::Jumping | MotionState::LandingFromFly => {
                self.set_anim(AnimState::Jumping)
            }
            MotionState::Grounded if self.anim == AnimState::Idle && self.alive => {
                self.set_anim(AnimState::IdleToRunning)
            }
            _ => {}
        }
    }

    fn set_anim(&mut self, anim: AnimState) {
        if self.anim != anim {
            self.anim = anim;
            self.frame_index = 0;
            self.tick_count = 0;
        }
    }

    /// Faster game, faster legs; never below the minimum tick count
    fn update_animation_speed(&mut self, game_speed: f32) {
        self.ticks_per_frame = if self.anim == AnimState::Running && self.is_on_ground() {
            let scale = (game_speed * self.tuning.animation_speed_factor).max(0.01);
            let ticks = (self.tuning.base_ticks_per_frame as f32 / scale).floor() as u32;
            ticks.max(self.tuning.min_ticks_per_frame)
        } else {
            self.tuning.base_ticks_per_frame
        };
    }

    fn advance_animation(&mut self) {
        self.tick_count += 1;
        if self.tick_count <= self.ticks_per_frame {
            return;
        }
        self.tick_count = 0;

        let total = self.anim.frame_count(&self.tuning.frames);
        if total <= 1 {
            return;
        }
        if self.frame_index < total - 1 {
            self.frame_index += 1;
        } else {
            match self.anim {
                AnimState::IdleToRunning => self.set_anim(AnimState::Running),
                AnimState::Running => self.frame_index = 0,
                _ => {}
            }
        }
    }
}

impl Bounded for Player {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn size(&self) -> Vec2 {
        self.size
    }

    /// Fractional sub-rectangle: centered horizontally, biased toward the feet
    fn hitbox(&self) -> Rect {
        let w = self.size.x * self.tuning.hitbox_width_ratio;
        let h = self.size.y * self.tuning.hitbox_height_ratio;
        let off_x = (self.size.x - w) / self.tuning.hitbox_x_offset_divisor;
        let off_y = (self.size.y - h) / self.tuning.hitbox_y_offset_divisor;
        Rect::new(self.pos.x + off_x, self.pos.y + off_y, w, h)
    }

    fn is_active(&self) -> bool {
        self.alive
    }
}
