//! A run in progress
//!
//! Per tick: game speed is computed once, then background, ground, player,
//! obstacles, powerups, collisions and score are updated in that order, and
//! finally the terminal conditions are checked.

use glam::Vec2;

use crate::renderer::{RenderSurface, draw};
use crate::settings::DebugCommand;
use crate::sim::background::Background;
use crate::sim::collision;
use crate::sim::ground::Ground;
use crate::sim::obstacle::ObstacleManager;
use crate::sim::player::Player;
use crate::sim::powerup::{PowerupContext, PowerupKind, PowerupManager};
use crate::sim::rect::Bounded;
use crate::sim::schedule::Scheduler;
use crate::sim::score::ScoreSystem;
use crate::sim::state::{GamePhase, RenderContext, State, StateContext, StateData, Transition};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlayingEvent {
    /// End of the fall animation for the given session
    GameOver { session: u32 },
}

/// Everything that lives for exactly one run
#[derive(Debug, Clone)]
pub struct Session {
    pub id: u32,
    pub background: Background,
    pub ground: Ground,
    pub player: Player,
    pub obstacles: ObstacleManager,
    pub powerups: PowerupManager,
    pub score: ScoreSystem,
    /// Speed used by the most recent tick
    pub game_speed: f32,
    screen_height: f32,
}

impl Session {
    fn new(id: u32, ctx: &mut StateContext) -> Self {
        let t = ctx.tuning;
        let mut background = Background::new(&t.background, &t.game);
        background.sync_assets(ctx.assets);
        Self {
            id,
            background,
            ground: Ground::new(&t.ground, &t.game, ctx.settings.gaps_enabled, ctx.rng),
            player: Player::new(&t.player, t.game.ground_top()),
            obstacles: ObstacleManager::new(&t.obstacle, &t.game),
            powerups: PowerupManager::new(&t.powerups),
            score: ScoreSystem::new(&t.score),
            game_speed: t.game.starting_speed,
            screen_height: t.game.canvas_height,
        }
    }

    /// Split borrow handed to powerup hooks
    fn powerup_parts(&mut self) -> (&mut PowerupManager, PowerupContext<'_>) {
        (
            &mut self.powerups,
            PowerupContext {
                player: &mut self.player,
                score: &mut self.score,
                screen_height: self.screen_height,
            },
        )
    }

    pub fn activate_powerup(&mut self, kind: PowerupKind) -> bool {
        let (powerups, mut ctx) = self.powerup_parts();
        powerups.activate(kind, &mut ctx)
    }

    pub fn activate_powerup_by_name(&mut self, name: &str) -> bool {
        let (powerups, mut ctx) = self.powerup_parts();
        powerups.activate_by_name(name, &mut ctx)
    }

    pub fn cancel_powerup(&mut self, kind: PowerupKind) -> bool {
        let (powerups, mut ctx) = self.powerup_parts();
        powerups.cancel(kind, &mut ctx)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlayingState {
    session: Option<Session>,
    sessions_started: u32,
    events: Scheduler<PlayingEvent>,
}

impl PlayingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    /// Whether a fall is waiting out its game-over delay
    pub fn game_over_pending(&self) -> bool {
        let Some(id) = self.session.as_ref().map(|s| s.id) else {
            return false;
        };
        self.events
            .contains(|e| matches!(e, PlayingEvent::GameOver { session } if *session == id))
    }

    fn debug_lines(session: &Session, ctx: &RenderContext) -> Vec<String> {
        let onoff = |b: bool| if b { "ON" } else { "OFF" };
        vec![
            "DEBUG MODE: Press D to toggle".to_owned(),
            format!("Game Speed: {:.2}", session.game_speed),
            format!(
                "Gaps Enabled: {} (Press G to toggle)",
                onoff(ctx.settings.gaps_enabled)
            ),
            format!("Hitboxes: {} (Press H to toggle)", onoff(ctx.settings.show_hitboxes)),
            format!(
                "Fly: {} / Attack: {} (Press F / A)",
                onoff(session.powerups.is_active(PowerupKind::Fly)),
                onoff(session.powerups.is_active(PowerupKind::Attack))
            ),
        ]
    }
}

impl State for PlayingState {
    fn phase(&self) -> GamePhase {
        GamePhase::Playing
    }

    fn enter(&mut self, _data: StateData, ctx: &mut StateContext) {
        self.sessions_started = self.sessions_started.wrapping_add(1);
        log::info!("Entering playing state (session {})", self.sessions_started);
        self.session = Some(Session::new(self.sessions_started, ctx));
    }

    fn exit(&mut self) {
        log::info!("Exiting playing state");
        self.events.clear();
        self.session = None;
    }

    fn update(&mut self, dt_ms: f32, ctx: &mut StateContext) -> Option<Transition> {
        let s = self.session.as_mut()?;

        let id = s.id;
        let due = self.events.drain_due(ctx.now_ms, |e| match e {
            PlayingEvent::GameOver { session } => *session == id,
        });
        if !due.is_empty() {
            return Some(Transition::game_over(s.score.final_score()));
        }

        let g = &ctx.tuning.game;
        let steps = (s.score.score() / g.speed_increment_score).floor() as f32;
        s.game_speed = (g.starting_speed + steps * g.speed_increment) * s.player.multipliers.speed();
        let speed = s.game_speed;
        let scroll = ctx.tuning.obstacle.base_speed * speed;

        s.background.sync_assets(ctx.assets);
        s.background.update(speed);
        s.ground.update(scroll, ctx.rng);
        s.player.update(dt_ms, speed);
        s.obstacles.update(dt_ms, speed, ctx.rng);
        {
            let (powerups, mut pctx) = s.powerup_parts();
            powerups.update(dt_ms, &mut pctx);
        }

        if s.player.is_falling() {
            s.score.ease_display(dt_ms);
            return None;
        }

        if let Some(obstacle_id) = collision::player_vs_obstacles(&s.player, &s.obstacles).map(|o| o.id) {
            if s.player.is_attacking() {
                s.obstacles.destroy_obstacle(obstacle_id, speed);
                s.score.add_bonus(s.powerups.attack_points());
            } else {
                log::info!("Hit obstacle {obstacle_id}");
                s.player.kill();
                return Some(Transition::game_over(s.score.final_score()));
            }
        }

        let hitbox = s.player.hitbox();
        if s.player.is_on_ground() && s.ground.is_over_gap(hitbox.x, hitbox.width) {
            log::info!("Fell into a gap");
            s.player.fall();
            self.events
                .schedule(ctx.now_ms, g.game_over_delay_ms, PlayingEvent::GameOver { session: id });
            return None;
        }

        s.score.update_score(dt_ms, s.player.multipliers.score());
        None
    }

    fn render(&self, surface: &mut dyn RenderSurface, ctx: &RenderContext) {
        let Some(s) = &self.session else {
            return;
        };
        let debug = ctx.settings.debug_overlay;
        let hitboxes = ctx.settings.draw_hitboxes();

        draw::background(surface, ctx.assets, &s.background);
        draw::ground(surface, ctx.assets, &s.ground, debug);
        draw::obstacles(surface, ctx.assets, &s.obstacles, hitboxes);
        draw::player(surface, ctx.assets, &s.player, hitboxes);
        draw::score_hud(surface, ctx.assets, &s.score);
        if debug {
            draw::debug_overlay(surface, &Self::debug_lines(s, ctx));
        }
    }

    fn on_pointer_down(&mut self, _pos: Vec2, _ctx: &mut StateContext) -> Option<Transition> {
        if let Some(s) = self.session.as_mut() {
            s.player.start_jump();
        }
        None
    }

    fn on_pointer_up(&mut self, _pos: Vec2, _ctx: &mut StateContext) -> Option<Transition> {
        if let Some(s) = self.session.as_mut() {
            s.player.end_jump();
        }
        None
    }

    fn on_pointer_cancel(&mut self, _ctx: &mut StateContext) -> Option<Transition> {
        if let Some(s) = self.session.as_mut() {
            s.player.end_jump();
        }
        None
    }

    fn on_debug(&mut self, command: DebugCommand, ctx: &mut StateContext) {
        let Some(s) = self.session.as_mut() else {
            return;
        };
        match command {
            DebugCommand::ToggleGaps => s.ground.set_gaps_enabled(ctx.settings.gaps_enabled, ctx.rng),
            DebugCommand::Activate(kind) => {
                s.activate_powerup(kind);
            }
            DebugCommand::ToggleOverlay | DebugCommand::ToggleHitboxes => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::renderer::CommandBuffer;
    use crate::sim::states::test_support::Harness;

    fn start(h: &mut Harness) -> PlayingState {
        let mut state = PlayingState::new();
        state.enter(StateData::None, &mut h.ctx());
        state
    }

    fn run(state: &mut PlayingState, h: &mut Harness, ticks: usize) -> Option<Transition> {
        for _ in 0..ticks {
            if let Some(t) = state.update(SIM_DT_MS, &mut h.tick(SIM_DT_MS)) {
                return Some(t);
            }
        }
        None
    }

    #[test]
    fn test_score_accrues_per_tick() {
        let mut h = Harness::new();
        h.settings.gaps_enabled = false;
        let mut state = start(&mut h);
        assert!(run(&mut state, &mut h, 60).is_none());
        assert_eq!(state.session().unwrap().score.score(), 60.0);
    }

    #[test]
    fn test_obstacle_hit_ends_run() {
        let mut h = Harness::new();
        h.settings.gaps_enabled = false;
        let mut state = start(&mut h);
        let t = run(&mut state, &mut h, 2000);
        let Some(t) = t else {
            panic!("run never ended");
        };
        assert_eq!(t.to, GamePhase::GameOver);
        let s = state.session().unwrap();
        assert!(!s.player.is_alive());
        assert_eq!(t.data, StateData::FinalScore(s.score.final_score()));
    }

    #[test]
    fn test_attack_destroys_obstacles() {
        let mut h = Harness::new();
        h.settings.gaps_enabled = false;
        let mut state = start(&mut h);
        let ground_top = h.tuning.game.ground_top();
        let s = state.session_mut().unwrap();
        s.obstacles.push(Vec2::new(150.0, ground_top - 80.0), Vec2::new(40.0, 80.0));
        assert!(s.activate_powerup(PowerupKind::Attack));

        assert!(run(&mut state, &mut h, 1).is_none());
        let s = state.session().unwrap();
        assert!(s.player.is_alive());
        assert_eq!(s.obstacles.destroyed().len(), 1);
        // 1 tick at x3 plus the 50-point bonus
        assert_eq!(s.score.score(), f64::from(ATTACK_POINTS_PER_OBSTACLE) * SCORE_DIVIDER + 3.0);
    }

    #[test]
    fn test_gap_fall_ends_run_after_delay() {
        let mut h = Harness::new();
        let mut state = start(&mut h);
        let mut fell_at = None;
        let mut ended_at = None;
        for tick in 0..20_000 {
            let transition = state.update(SIM_DT_MS, &mut h.tick(SIM_DT_MS));
            if let Some(t) = transition {
                assert_eq!(t.to, GamePhase::GameOver);
                ended_at = Some(tick);
                break;
            }
            // Only gaps may end this run
            state.session_mut().unwrap().obstacles.clear();
            if fell_at.is_none() && state.session().unwrap().player.is_falling() {
                fell_at = Some(tick);
                assert!(state.game_over_pending());
            }
        }
        let fell_at = fell_at.expect("player never reached a gap");
        let ended_at = ended_at.expect("no game over after falling");
        let delay_ticks = (GAME_OVER_DELAY_MS / f64::from(SIM_DT_MS)).round() as usize;
        assert!((delay_ticks - 1..=delay_ticks + 1).contains(&(ended_at - fell_at)));
    }

    #[test]
    fn test_score_frozen_while_falling() {
        let mut h = Harness::new();
        let mut state = start(&mut h);
        state.session_mut().unwrap().player.fall();
        let before = state.session().unwrap().score.score();
        run(&mut state, &mut h, 5);
        assert_eq!(state.session().unwrap().score.score(), before);
    }

    #[test]
    fn test_stale_game_over_ignored_after_restart() {
        let mut h = Harness::new();
        let mut state = start(&mut h);
        state.session_mut().unwrap().player.fall();
        let id = state.session().unwrap().id;
        state
            .events
            .schedule(h.now_ms, GAME_OVER_DELAY_MS, PlayingEvent::GameOver { session: id });

        // Restart before the delay elapses
        state.enter(StateData::None, &mut h.ctx());
        h.settings.gaps_enabled = false;
        state
            .session_mut()
            .unwrap()
            .ground
            .set_gaps_enabled(false, &mut h.rng);
        for _ in 0..60 {
            let s = state.session_mut().unwrap();
            s.obstacles.clear();
            assert!(state.update(SIM_DT_MS, &mut h.tick(SIM_DT_MS)).is_none());
        }
    }

    #[test]
    fn test_exit_drops_the_run() {
        let mut h = Harness::new();
        let mut state = start(&mut h);
        let id = state.session().unwrap().id;
        state
            .events
            .schedule(h.now_ms, GAME_OVER_DELAY_MS, PlayingEvent::GameOver { session: id });
        assert!(state.game_over_pending());
        state.exit();
        assert!(state.session().is_none());
        assert!(!state.game_over_pending());
        assert!(run(&mut state, &mut h, 60).is_none());

        state.enter(StateData::None, &mut h.ctx());
        assert!(state.session().unwrap().player.is_on_ground());
    }

    #[test]
    fn test_speed_ramps_with_score() {
        let mut h = Harness::new();
        h.settings.gaps_enabled = false;
        let mut state = start(&mut h);
        state.session_mut().unwrap().score.add_bonus(250);
        run(&mut state, &mut h, 1);
        let speed = state.session().unwrap().game_speed;
        assert!((speed - (STARTING_SPEED + 2.0 * SPEED_INCREMENT)).abs() < 1e-6);

        // The fly bonus lifts the score past the next step too
        state.session_mut().unwrap().activate_powerup(PowerupKind::Fly);
        run(&mut state, &mut h, 1);
        let speed = state.session().unwrap().game_speed;
        let expected = (STARTING_SPEED + 3.0 * SPEED_INCREMENT) * FLY_SPEED_MULTIPLIER;
        assert!((speed - expected).abs() < 1e-5);
    }

    #[test]
    fn test_pointer_drives_jump() {
        let mut h = Harness::new();
        let mut state = start(&mut h);
        state.on_pointer_down(Vec2::ZERO, &mut h.ctx());
        assert!(state.session().unwrap().player.is_jumping());
        assert!(state.session().unwrap().player.is_jump_button_held());
        state.on_pointer_cancel(&mut h.ctx());
        assert!(!state.session().unwrap().player.is_jump_button_held());
    }

    #[test]
    fn test_debug_commands() {
        let mut h = Harness::new();
        let mut state = start(&mut h);
        h.settings.gaps_enabled = false;
        state.on_debug(DebugCommand::ToggleGaps, &mut h.ctx());
        let s = state.session().unwrap();
        assert!(s.ground.segments().iter().all(|seg| !seg.is_gap));

        state.on_debug(DebugCommand::Activate(PowerupKind::Fly), &mut h.ctx());
        assert!(state.session().unwrap().player.is_flying());
        assert!(state.session_mut().unwrap().cancel_powerup(PowerupKind::Fly));
        assert!(!state.session_mut().unwrap().activate_powerup_by_name("nope"));
    }

    #[test]
    fn test_render_with_overlay() {
        let mut h = Harness::new();
        h.settings.debug_overlay = true;
        let state = start(&mut h);
        let mut buf = CommandBuffer::new(CANVAS_WIDTH, CANVAS_HEIGHT);
        state.render(&mut buf, &h.render_ctx());
        assert!(buf.image_count() > 0);
        assert!(buf.texts().any(|t| t.starts_with("Game Speed")));
        assert!(buf.commands().iter().any(|c| matches!(c, crate::renderer::DrawCommand::StrokeRect { .. })));
    }
}
