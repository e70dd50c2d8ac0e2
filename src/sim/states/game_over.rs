//! Game-over screen

use glam::Vec2;

use crate::renderer::{RenderSurface, draw};
use crate::sim::background::Background;
use crate::sim::ground::Ground;
use crate::sim::state::{GamePhase, RenderContext, State, StateContext, StateData, Transition};
use crate::ui::{ButtonId, UiScreen};

#[derive(Debug, Clone, Default)]
pub struct GameOverState {
    /// Built on first entry and kept across runs
    scene: Option<(Background, Ground)>,
    ui: Option<UiScreen>,
    final_score: u64,
}

impl GameOverState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn final_score(&self) -> u64 {
        self.final_score
    }

    pub fn ui(&self) -> Option<&UiScreen> {
        self.ui.as_ref()
    }
}

impl State for GameOverState {
    fn phase(&self) -> GamePhase {
        GamePhase::GameOver
    }

    fn enter(&mut self, data: StateData, ctx: &mut StateContext) {
        self.final_score = match data {
            StateData::FinalScore(score) => score,
            StateData::None => 0,
        };
        log::info!("Entering game over state (score {})", self.final_score);

        let t = ctx.tuning;
        if self.scene.is_none() {
            let background = Background::new(&t.background, &t.game);
            let ground = Ground::new(&t.ground, &t.game, ctx.settings.gaps_enabled, ctx.rng);
            self.scene = Some((background, ground));
        }
        self.ui = Some(UiScreen::game_over(&t.ui, &t.game, self.final_score));
    }

    fn exit(&mut self) {
        log::info!("Exiting game over state");
    }

    fn update(&mut self, _dt_ms: f32, ctx: &mut StateContext) -> Option<Transition> {
        if let Some((background, _)) = self.scene.as_mut() {
            let g = &ctx.tuning.game;
            background.sync_assets(ctx.assets);
            background.update(g.starting_speed * g.idle_scroll_factor);
        }
        None
    }

    fn render(&self, surface: &mut dyn RenderSurface, ctx: &RenderContext) {
        if let Some((background, ground)) = &self.scene {
            draw::background(surface, ctx.assets, background);
            draw::ground(surface, ctx.assets, ground, false);
        }
        if let Some(ui) = &self.ui {
            draw::ui_screen(surface, ctx.assets, ui);
        }
    }

    fn on_pointer_down(&mut self, pos: Vec2, _ctx: &mut StateContext) -> Option<Transition> {
        match self.ui.as_ref()?.hit_test(pos) {
            Some(ButtonId::Retry) => Some(Transition::to(GamePhase::Playing)),
            _ => None,
        }
    }
}
