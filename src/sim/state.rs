//! Game phases and the contract every phase implements

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::Tuning;
use crate::renderer::{AssetProvider, RenderSurface};
use crate::settings::{DebugCommand, Settings};

/// Which screen is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for assets, then fading out
    Loading,
    /// Title screen with the start button
    Menu,
    /// A run in progress
    Playing,
    /// Run ended; shows the final score and the retry button
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Menu => "menu",
            Self::Playing => "playing",
            Self::GameOver => "game_over",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "loading" => Some(Self::Loading),
            "menu" => Some(Self::Menu),
            "playing" => Some(Self::Playing),
            "game_over" | "gameOver" => Some(Self::GameOver),
            _ => None,
        }
    }
}

/// Payload handed to the next phase's `enter`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StateData {
    #[default]
    None,
    FinalScore(u64),
}

/// Request to switch phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub to: GamePhase,
    pub data: StateData,
}

impl Transition {
    pub fn to(phase: GamePhase) -> Self {
        Self {
            to: phase,
            data: StateData::None,
        }
    }

    pub fn game_over(final_score: u64) -> Self {
        Self {
            to: GamePhase::GameOver,
            data: StateData::FinalScore(final_score),
        }
    }
}

/// Shared services for a state while it updates or handles input
pub struct StateContext<'a> {
    pub tuning: &'a Tuning,
    pub settings: &'a Settings,
    pub assets: &'a dyn AssetProvider,
    pub rng: &'a mut Pcg32,
    /// Frame clock, ms since the game was created
    pub now_ms: f64,
}

/// Read-only services for drawing
pub struct RenderContext<'a> {
    pub tuning: &'a Tuning,
    pub settings: &'a Settings,
    pub assets: &'a dyn AssetProvider,
}

/// One phase of the game. Exactly one is current; the orchestrator calls
/// `exit` on it before `enter` on its successor.
pub trait State {
    fn phase(&self) -> GamePhase;

    fn enter(&mut self, data: StateData, ctx: &mut StateContext);

    fn exit(&mut self) {}

    /// One fixed tick. Returning a transition ends this phase.
    fn update(&mut self, dt_ms: f32, ctx: &mut StateContext) -> Option<Transition>;

    fn render(&self, surface: &mut dyn RenderSurface, ctx: &RenderContext);

    fn on_pointer_down(&mut self, _pos: Vec2, _ctx: &mut StateContext) -> Option<Transition> {
        None
    }

    fn on_pointer_move(&mut self, _pos: Vec2, _ctx: &mut StateContext) -> Option<Transition> {
        None
    }

    fn on_pointer_up(&mut self, _pos: Vec2, _ctx: &mut StateContext) -> Option<Transition> {
        None
    }

    /// Pointer left the surface while pressed
    fn on_pointer_cancel(&mut self, _ctx: &mut StateContext) -> Option<Transition> {
        None
    }

    /// A debug toggle was applied to the settings
    fn on_debug(&mut self, _command: DebugCommand, _ctx: &mut StateContext) {}
}
