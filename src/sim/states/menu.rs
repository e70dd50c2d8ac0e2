//! Title screen

use glam::Vec2;

use crate::renderer::{RenderSurface, draw};
use crate::sim::background::Background;
use crate::sim::ground::Ground;
use crate::sim::state::{GamePhase, RenderContext, State, StateContext, StateData, Transition};
use crate::ui::{ButtonId, UiScreen};

#[derive(Debug, Clone, Default)]
pub struct MenuState {
    scene: Option<(Background, Ground)>,
    ui: Option<UiScreen>,
}

impl MenuState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ui(&self) -> Option<&UiScreen> {
        self.ui.as_ref()
    }
}

impl State for MenuState {
    fn phase(&self) -> GamePhase {
        GamePhase::Menu
    }

    fn enter(&mut self, _data: StateData, ctx: &mut StateContext) {
        log::info!("Entering menu state");
        let t = ctx.tuning;
        let mut background = Background::new(&t.background, &t.game);
        background.sync_assets(ctx.assets);
        let ground = Ground::new(&t.ground, &t.game, ctx.settings.gaps_enabled, ctx.rng);
        self.scene = Some((background, ground));
        self.ui = Some(UiScreen::main_menu(&t.ui, &t.game));
    }

    fn exit(&mut self) {
        log::info!("Exiting menu state");
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
            Some(ButtonId::Start) => Some(Transition::to(GamePhase::Playing)),
            _ => None,
        }
    }
}
