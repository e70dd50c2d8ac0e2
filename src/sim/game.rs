//! Game orchestrator
//!
//! Owns the frame clock, the seeded RNG, the debug settings and one instance
//! of every phase. Exactly one phase is current; updates, renders and input
//! events go to it, and the transitions it returns are applied here
//! (`exit` on the old phase, then `enter` on the new one).

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::error::TuningError;
use crate::renderer::{AssetProvider, RenderSurface, StaticAssets, palette};
use crate::settings::{DebugCommand, Settings};
use crate::sim::state::{GamePhase, RenderContext, State, StateContext, StateData, Transition};
use crate::sim::states::playing::Session;
use crate::sim::states::{GameOverState, LoadingState, MenuState, PlayingState};
use crate::sim::timestep::FixedTimestep;
use crate::tuning::Tuning;

/// One instance of each phase, kept for the lifetime of the game
#[derive(Debug, Default)]
struct States {
    loading: LoadingState,
    menu: MenuState,
    playing: PlayingState,
    game_over: GameOverState,
}

impl States {
    fn get(&self, phase: GamePhase) -> &dyn State {
        match phase {
            GamePhase::Loading => &self.loading,
            GamePhase::Menu => &self.menu,
            GamePhase::Playing => &self.playing,
            GamePhase::GameOver => &self.game_over,
        }
    }

    fn get_mut(&mut self, phase: GamePhase) -> &mut dyn State {
        match phase {
            GamePhase::Loading => &mut self.loading,
            GamePhase::Menu => &mut self.menu,
            GamePhase::Playing => &mut self.playing,
            GamePhase::GameOver => &mut self.game_over,
        }
    }
}

pub struct Game<A: AssetProvider = StaticAssets> {
    tuning: Tuning,
    settings: Settings,
    assets: A,
    rng: Pcg32,
    /// Simulation clock in ms, advanced by each fixed tick
    clock_ms: f64,
    timestep: FixedTimestep,
    ticks: u64,
    phase: GamePhase,
    states: States,
    pressed: bool,
    pointer: Vec2,
}

impl<A: AssetProvider> Game<A> {
    /// Validate `tuning` and start in the loading phase
    pub fn new(tuning: Tuning, assets: A, seed: u64) -> Result<Self, TuningError> {
        tuning.validate()?;
        log::info!("Starting game with seed {seed}");
        let mut game = Self {
            tuning,
            settings: Settings::default(),
            assets,
            rng: Pcg32::seed_from_u64(seed),
            clock_ms: 0.0,
            timestep: FixedTimestep::default(),
            ticks: 0,
            phase: GamePhase::Loading,
            states: States::default(),
            pressed: false,
            pointer: Vec2::ZERO,
        };
        game.enter_current(StateData::None);
        Ok(game)
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Variable-step entry point: feed the display's elapsed time and run
    /// as many fixed ticks as it covers (0 to the substep cap). Returns the
    /// number of ticks run. Pair each call with one `render`.
    ///
    /// Drivers that want exactly one update per display frame call `tick`
    /// with their own delta instead.
    pub fn frame(&mut self, elapsed_ms: f32) -> u32 {
        let steps = self.timestep.advance(elapsed_ms);
        let dt = self.timestep.step_ms();
        for _ in 0..steps {
            self.tick(dt);
        }
        steps
    }

    /// Exactly one update of the current phase, advancing the clock by `dt_ms`
    pub fn tick(&mut self, dt_ms: f32) {
        self.clock_ms += f64::from(dt_ms);
        self.ticks += 1;
        self.dispatch(|state, ctx| state.update(dt_ms, ctx));
    }

    pub fn render(&self, surface: &mut dyn RenderSurface) {
        surface.clear(palette::BLACK);
        let ctx = RenderContext {
            tuning: &self.tuning,
            settings: &self.settings,
            assets: &self.assets,
        };
        self.states.get(self.phase).render(surface, &ctx);
    }

    pub fn pointer_down(&mut self, pos: Vec2) {
        self.pressed = true;
        self.pointer = pos;
        self.dispatch(|state, ctx| state.on_pointer_down(pos, ctx));
    }

    /// Forwarded only while pressed
    pub fn pointer_move(&mut self, pos: Vec2) {
        self.pointer = pos;
        if self.pressed {
            self.dispatch(|state, ctx| state.on_pointer_move(pos, ctx));
        }
    }

    pub fn pointer_up(&mut self, pos: Vec2) {
        self.pressed = false;
        self.pointer = pos;
        self.dispatch(|state, ctx| state.on_pointer_up(pos, ctx));
    }

    /// Pointer left the surface. Ignored unless a press is in progress.
    pub fn pointer_cancel(&mut self) {
        if !self.pressed {
            return;
        }
        self.pressed = false;
        self.dispatch(|state, ctx| state.on_pointer_cancel(ctx));
    }

    /// Raw key press for the debug bindings. Returns true if it did anything.
    pub fn key_press(&mut self, key: char) -> bool {
        let Some(command) = DebugCommand::from_key(key, self.settings.debug_overlay) else {
            return false;
        };
        let changed = self.settings.apply(command);
        self.dispatch(|state, ctx| {
            state.on_debug(command, ctx);
            None
        });
        changed || matches!(command, DebugCommand::Activate(_))
    }

    /// Activate a powerup by name in the running session
    pub fn activate_powerup(&mut self, name: &str) -> bool {
        let session = match self.phase {
            GamePhase::Playing => self.states.playing.session_mut(),
            _ => None,
        };
        match session {
            Some(session) => session.activate_powerup_by_name(name),
            None => {
                log::warn!("Cannot activate {name}: no run in progress");
                false
            }
        }
    }

    /// Force a phase by name; unknown names are ignored
    pub fn switch_to(&mut self, name: &str) -> bool {
        match GamePhase::from_name(name) {
            Some(phase) => {
                self.apply(Transition::to(phase));
                true
            }
            None => {
                log::warn!("Unknown state: {name}");
                false
            }
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn assets(&self) -> &A {
        &self.assets
    }

    /// The asset loader reports progress through this
    pub fn assets_mut(&mut self) -> &mut A {
        &mut self.assets
    }

    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    /// The current run, if the game is in the playing phase
    pub fn session(&self) -> Option<&Session> {
        match self.phase {
            GamePhase::Playing => self.states.playing.session(),
            _ => None,
        }
    }

    /// Score shown on the game-over screen
    pub fn final_score(&self) -> Option<u64> {
        match self.phase {
            GamePhase::GameOver => Some(self.states.game_over.final_score()),
            _ => None,
        }
    }

    /// Run `f` against the current phase and apply any transition it returns
    fn dispatch<F>(&mut self, f: F)
    where
        F: FnOnce(&mut dyn State, &mut StateContext) -> Option<Transition>,
    {
        let Self {
            tuning,
            settings,
            assets,
            rng,
            clock_ms,
            phase,
            states,
            ..
        } = self;
        let mut ctx = StateContext {
            tuning,
            settings,
            assets: &*assets,
            rng,
            now_ms: *clock_ms,
        };
        let transition = f(states.get_mut(*phase), &mut ctx);
        if let Some(transition) = transition {
            self.apply(transition);
        }
    }

    fn apply(&mut self, transition: Transition) {
        log::info!(
            "State transition: {} -> {}",
            self.phase.as_str(),
            transition.to.as_str()
        );
        self.states.get_mut(self.phase).exit();
        self.phase = transition.to;
        self.enter_current(transition.data);
    }

    fn enter_current(&mut self, data: StateData) {
        let Self {
            tuning,
            settings,
            assets,
            rng,
            clock_ms,
            phase,
            states,
            ..
        } = self;
        let mut ctx = StateContext {
            tuning,
            settings,
            assets: &*assets,
            rng,
            now_ms: *clock_ms,
        };
        states.get_mut(*phase).enter(data, &mut ctx);
    }
}
