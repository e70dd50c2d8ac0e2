//! Timed powerups
//!
//! Every kind runs through the same timed-effect state machine
//! (inactive -> active -> inactive); what happens on activation, per tick and
//! on deactivation is decided by matching on the effect's parameters.

use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use super::player::Player;
use super::rect::Bounded;
use super::score::ScoreSystem;
use crate::consts::*;
use crate::tuning::PowerupTuning;

/// Glow oscillation period at full remaining time
const GLOW_BASE_PERIOD_MS: f32 = 400.0;
/// Period shrinks to this fraction of the base as expiry approaches
const GLOW_MIN_PERIOD_FRACTION: f32 = 0.15;
const GLOW_CENTER: f32 = 0.65;
const GLOW_AMPLITUDE: f32 = 0.35;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerupKind {
    Fly,
    Attack,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 2] = [PowerupKind::Fly, PowerupKind::Attack];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "fly" => Some(Self::Fly),
            "attack" => Some(Self::Attack),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fly => "fly",
            Self::Attack => "attack",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Fly => 0,
            Self::Attack => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlyParams {
    pub duration_ms: f32,
    /// Cruise altitude (sprite center) as a fraction of screen height
    pub target_y_ratio: f32,
    pub speed_multiplier: f32,
    pub score_multiplier: f32,
    /// Instant bonus on activation, in displayed points
    pub bonus_points: u32,
}

impl Default for FlyParams {
    fn default() -> Self {
        Self {
            duration_ms: FLY_DURATION_MS,
            target_y_ratio: FLY_TARGET_Y_RATIO,
            speed_multiplier: FLY_SPEED_MULTIPLIER,
            score_multiplier: FLY_SCORE_MULTIPLIER,
            bonus_points: FLY_BONUS_POINTS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackParams {
    pub duration_ms: f32,
    pub speed_multiplier: f32,
    pub score_multiplier: f32,
    /// Bonus per destroyed obstacle, in displayed points
    pub points_per_obstacle: u32,
}

impl Default for AttackParams {
    fn default() -> Self {
        Self {
            duration_ms: ATTACK_DURATION_MS,
            speed_multiplier: ATTACK_SPEED_MULTIPLIER,
            score_multiplier: ATTACK_SCORE_MULTIPLIER,
            points_per_obstacle: ATTACK_POINTS_PER_OBSTACLE,
        }
    }
}

/// What a powerup does, with its parameters
#[derive(Debug, Clone, PartialEq)]
pub enum PowerupEffect {
    Fly(FlyParams),
    Attack(AttackParams),
}

impl PowerupEffect {
    pub fn kind(&self) -> PowerupKind {
        match self {
            Self::Fly(_) => PowerupKind::Fly,
            Self::Attack(_) => PowerupKind::Attack,
        }
    }

    pub fn duration_ms(&self) -> f32 {
        match self {
            Self::Fly(p) => p.duration_ms,
            Self::Attack(p) => p.duration_ms,
        }
    }
}

/// What a powerup may touch while it runs
pub struct PowerupContext<'a> {
    pub player: &'a mut Player,
    pub score: &'a mut ScoreSystem,
    pub screen_height: f32,
}

/// One timed effect
#[derive(Debug, Clone)]
pub struct Powerup {
    effect: PowerupEffect,
    active: bool,
    time_remaining_ms: f32,
    glow_phase: f32,
}

impl Powerup {
    pub fn new(effect: PowerupEffect) -> Self {
        assert!(effect.duration_ms() > 0.0, "powerup duration must be positive");
        Self {
            effect,
            active: false,
            time_remaining_ms: 0.0,
            glow_phase: 0.0,
        }
    }

    pub fn kind(&self) -> PowerupKind {
        self.effect.kind()
    }

    pub fn effect(&self) -> &PowerupEffect {
        &self.effect
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn time_remaining_ms(&self) -> f32 {
        self.time_remaining_ms
    }

    /// Start the effect. Returns false (and does nothing) if already running.
    pub fn activate(&mut self, ctx: &mut PowerupContext) -> bool {
        if self.active {
            return false;
        }
        self.active = true;
        self.time_remaining_ms = self.effect.duration_ms();
        self.glow_phase = 0.0;
        self.on_activate(ctx);
        true
    }

    pub fn update(&mut self, dt_ms: f32, ctx: &mut PowerupContext) {
        if !self.active {
            return;
        }
        self.time_remaining_ms -= dt_ms;
        if self.time_remaining_ms <= 0.0 {
            self.time_remaining_ms = 0.0;
            self.active = false;
            self.on_deactivate(ctx);
        } else {
            self.on_update(dt_ms, ctx);
        }
    }

    /// Stop early. Returns whether it was running.
    pub fn cancel(&mut self, ctx: &mut PowerupContext) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        self.time_remaining_ms = 0.0;
        self.on_deactivate(ctx);
        true
    }

    fn on_activate(&mut self, ctx: &mut PowerupContext) {
        match &self.effect {
            PowerupEffect::Fly(p) => {
                let target_y = ctx.screen_height * p.target_y_ratio - ctx.player.size().y / 2.0;
                if ctx.player.is_falling() {
                    log::info!("Fly powerup ignored: player is falling");
                    return;
                }
                ctx.player.enter_fly_mode(target_y);
                ctx.player.multipliers.fly_speed = p.speed_multiplier;
                ctx.player.multipliers.fly_score = p.score_multiplier;
                ctx.score.add_bonus(p.bonus_points);
                log::info!(
                    "Fly powerup activated: speed x{}, score x{}",
                    p.speed_multiplier,
                    p.score_multiplier
                );
            }
            PowerupEffect::Attack(p) => {
                ctx.player.set_attacking(true);
                ctx.player.multipliers.attack_speed = p.speed_multiplier;
                ctx.player.multipliers.attack_score = p.score_multiplier;
                ctx.player.attack_glow = 1.0;
                log::info!(
                    "Attack powerup activated: speed x{}, score x{}",
                    p.speed_multiplier,
                    p.score_multiplier
                );
            }
        }
    }

    fn on_update(&mut self, dt_ms: f32, ctx: &mut PowerupContext) {
        match &self.effect {
            PowerupEffect::Fly(_) => {}
            PowerupEffect::Attack(p) => {
                // Angular velocity rises continuously as time runs out
                let remaining = (self.time_remaining_ms / p.duration_ms).clamp(0.0, 1.0);
                let period = GLOW_BASE_PERIOD_MS
                    * (GLOW_MIN_PERIOD_FRACTION + (1.0 - GLOW_MIN_PERIOD_FRACTION) * remaining);
                self.glow_phase = (self.glow_phase + TAU * dt_ms / period) % TAU;
                ctx.player.attack_glow = GLOW_CENTER + GLOW_AMPLITUDE * self.glow_phase.sin();
            }
        }
    }

    fn on_deactivate(&mut self, ctx: &mut PowerupContext) {
        match &self.effect {
            PowerupEffect::Fly(_) => {
                ctx.player.multipliers.fly_speed = 1.0;
                ctx.player.multipliers.fly_score = 1.0;
                ctx.player.exit_fly_mode();
                log::info!("Fly powerup deactivated");
            }
            PowerupEffect::Attack(_) => {
                ctx.player.set_attacking(false);
                ctx.player.multipliers.attack_speed = 1.0;
                ctx.player.multipliers.attack_score = 1.0;
                ctx.player.attack_glow = 0.0;
                log::info!("Attack powerup deactivated");
            }
        }
    }
}

/// One powerup per kind
#[derive(Debug, Clone)]
pub struct PowerupManager {
    powerups: [Powerup; 2],
}

impl PowerupManager {
    pub fn new(tuning: &PowerupTuning) -> Self {
        Self {
            powerups: [
                Powerup::new(PowerupEffect::Fly(tuning.fly.clone())),
                Powerup::new(PowerupEffect::Attack(tuning.attack.clone())),
            ],
        }
    }

    pub fn get(&self, kind: PowerupKind) -> &Powerup {
        &self.powerups[kind.index()]
    }

    pub fn is_active(&self, kind: PowerupKind) -> bool {
        self.get(kind).is_active()
    }

    /// Returns whether the powerup was newly started
    pub fn activate(&mut self, kind: PowerupKind, ctx: &mut PowerupContext) -> bool {
        self.powerups[kind.index()].activate(ctx)
    }

    /// Activate by name. Only an unknown name fails; re-activating a running
    /// powerup is accepted and does nothing.
    pub fn activate_by_name(&mut self, name: &str, ctx: &mut PowerupContext) -> bool {
        match PowerupKind::from_name(name) {
            Some(kind) => {
                self.activate(kind, ctx);
                true
            }
            None => {
                log::warn!("Unknown powerup: {name}");
                false
            }
        }
    }

    pub fn cancel(&mut self, kind: PowerupKind, ctx: &mut PowerupContext) -> bool {
        self.powerups[kind.index()].cancel(ctx)
    }

    pub fn cancel_all(&mut self, ctx: &mut PowerupContext) {
        for p in &mut self.powerups {
            p.cancel(ctx);
        }
    }

    pub fn update(&mut self, dt_ms: f32, ctx: &mut PowerupContext) {
        for p in &mut self.powerups {
            p.update(dt_ms, ctx);
        }
    }

    /// Bonus for an obstacle destroyed while attacking
    pub fn attack_points(&self) -> u32 {
        match &self.get(PowerupKind::Attack).effect {
            PowerupEffect::Attack(p) => p.points_per_obstacle,
            PowerupEffect::Fly(_) => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::player::Multipliers;
    use crate::tuning::{PlayerTuning, ScoreTuning};

    const DT: f32 = 1000.0 / 60.0;

    struct Rig {
        player: Player,
        score: ScoreSystem,
        manager: PowerupManager,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                player: Player::new(&PlayerTuning::default(), CANVAS_HEIGHT - GROUND_HEIGHT),
                score: ScoreSystem::new(&ScoreTuning::default()),
                manager: PowerupManager::new(&PowerupTuning::default()),
            }
        }

        fn activate(&mut self, kind: PowerupKind) -> bool {
            let mut ctx = PowerupContext {
                player: &mut self.player,
                score: &mut self.score,
                screen_height: CANVAS_HEIGHT,
            };
            self.manager.activate(kind, &mut ctx)
        }

        fn tick(&mut self, dt: f32) {
            let mut ctx = PowerupContext {
                player: &mut self.player,
                score: &mut self.score,
                screen_height: CANVAS_HEIGHT,
            };
            self.manager.update(dt, &mut ctx);
            self.player.update(dt, 1.0);
        }
    }

    #[test]
    fn test_kind_names() {
        for kind in PowerupKind::ALL {
            assert_eq!(PowerupKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(PowerupKind::from_name("shield"), None);
    }

    #[test]
    fn test_double_activation_fires_hook_once() {
        let mut rig = Rig::new();
        assert!(rig.activate(PowerupKind::Fly));
        assert!(!rig.activate(PowerupKind::Fly));
        // One bonus, not two
        assert_eq!(rig.score.final_score(), u64::from(FLY_BONUS_POINTS));
        assert!(rig.player.is_flying());
    }

    #[test]
    fn test_fly_expires_and_lands() {
        let mut rig = Rig::new();
        rig.activate(PowerupKind::Fly);
        assert_eq!(rig.player.multipliers.speed(), FLY_SPEED_MULTIPLIER);

        let ticks = (FLY_DURATION_MS / DT).ceil() as usize + 2;
        for _ in 0..ticks {
            rig.tick(DT);
        }
        assert!(!rig.manager.is_active(PowerupKind::Fly));
        assert_eq!(rig.player.multipliers.fly_speed, 1.0);
        assert_eq!(rig.player.multipliers.speed(), 1.0);
        assert!(!rig.player.is_flying());

        for _ in 0..200 {
            rig.tick(DT);
        }
        assert!(rig.player.is_on_ground());
    }

    #[test]
    fn test_fly_targets_half_screen() {
        let mut rig = Rig::new();
        rig.activate(PowerupKind::Fly);
        for _ in 0..200 {
            rig.tick(DT);
        }
        let expected = CANVAS_HEIGHT * FLY_TARGET_Y_RATIO - PLAYER_HEIGHT / 2.0;
        assert_eq!(rig.player.position().y, expected);
    }

    #[test]
    fn test_multipliers_compose() {
        let mut rig = Rig::new();
        rig.activate(PowerupKind::Fly);
        rig.activate(PowerupKind::Attack);
        assert_eq!(
            rig.player.multipliers.speed(),
            FLY_SPEED_MULTIPLIER * ATTACK_SPEED_MULTIPLIER
        );
        assert_eq!(
            rig.player.multipliers.score(),
            FLY_SCORE_MULTIPLIER * ATTACK_SCORE_MULTIPLIER
        );
    }

    #[test]
    fn test_attack_glow_and_cancel() {
        let mut rig = Rig::new();
        rig.activate(PowerupKind::Attack);
        assert!(rig.player.is_attacking());
        for _ in 0..100 {
            rig.tick(DT);
            let glow = rig.player.attack_glow;
            assert!((GLOW_CENTER - GLOW_AMPLITUDE - 1e-4..=GLOW_CENTER + GLOW_AMPLITUDE + 1e-4)
                .contains(&glow));
        }

        let mut ctx = PowerupContext {
            player: &mut rig.player,
            score: &mut rig.score,
            screen_height: CANVAS_HEIGHT,
        };
        assert!(rig.manager.cancel(PowerupKind::Attack, &mut ctx));
        assert!(!rig.manager.cancel(PowerupKind::Attack, &mut ctx));
        assert!(!rig.player.is_attacking());
        assert_eq!(rig.player.attack_glow, 0.0);
    }

    #[test]
    fn test_unknown_name_fails() {
        let mut rig = Rig::new();
        let mut ctx = PowerupContext {
            player: &mut rig.player,
            score: &mut rig.score,
            screen_height: CANVAS_HEIGHT,
        };
        assert!(!rig.manager.activate_by_name("invincible", &mut ctx));
        assert!(rig.manager.activate_by_name("attack", &mut ctx));
        assert!(rig.manager.activate_by_name("attack", &mut ctx));
        assert!(rig.manager.is_active(PowerupKind::Attack));
    }

    #[test]
    fn test_fly_ignored_by_falling_player_but_timer_runs() {
        let mut rig = Rig::new();
        rig.player.fall();
        rig.activate(PowerupKind::Fly);
        assert!(rig.player.is_falling());
        assert!(rig.manager.is_active(PowerupKind::Fly));
        // No bonus and no multipliers mid-fall
        assert_eq!(rig.score.score(), 0.0);
        assert_eq!(rig.player.multipliers, Multipliers::default());
        assert_eq!(rig.player.multipliers.speed(), 1.0);
    }
}
