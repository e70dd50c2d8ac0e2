//! Loading screen: tracks asset progress, then fades out into the menu

use crate::renderer::{RenderSurface, draw};
use crate::sim::schedule::Scheduler;
use crate::sim::state::{GamePhase, RenderContext, State, StateContext, StateData, Transition};

#[derive(Debug, Clone, Copy, PartialEq)]
enum LoadingEvent {
    BeginFade,
}

#[derive(Debug, Clone)]
pub struct LoadingState {
    progress: f32,
    display_progress: f32,
    opacity: f32,
    fade_scheduled: bool,
    fading: bool,
    events: Scheduler<LoadingEvent>,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self {
            progress: 0.0,
            display_progress: 0.0,
            opacity: 1.0,
            fade_scheduled: false,
            fading: false,
            events: Scheduler::new(),
        }
    }
}

impl LoadingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Bar fill, chasing `progress`
    pub fn display_progress(&self) -> f32 {
        self.display_progress
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn is_fading(&self) -> bool {
        self.fading
    }
}

impl State for LoadingState {
    fn phase(&self) -> GamePhase {
        GamePhase::Loading
    }

    fn enter(&mut self, _data: StateData, _ctx: &mut StateContext) {
        *self = Self::default();
        log::info!("Entering loading state");
    }

    fn update(&mut self, _dt_ms: f32, ctx: &mut StateContext) -> Option<Transition> {
        let t = &ctx.tuning.loading;
        self.progress = ctx.assets.progress().max(t.min_progress);

        if self.display_progress < self.progress {
            self.display_progress = (self.display_progress + t.progress_step).min(self.progress);
        }

        if self.progress >= 1.0 && !self.fade_scheduled {
            log::info!("All assets loaded, fading out");
            self.events
                .schedule(ctx.now_ms, t.fade_delay_ms, LoadingEvent::BeginFade);
            self.fade_scheduled = true;
        }
        for event in self.events.drain_due(ctx.now_ms, |_| true) {
            match event {
                LoadingEvent::BeginFade => self.fading = true,
            }
        }

        if self.fading {
            self.opacity -= t.fade_step;
            if self.opacity <= 0.0 {
                self.opacity = 0.0;
                return Some(Transition::to(GamePhase::Menu));
            }
        }
        None
    }

    fn render(&self, surface: &mut dyn RenderSurface, ctx: &RenderContext) {
        draw::loading(surface, ctx.assets, self.display_progress, self.opacity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{LOADING_FADE_STEP, SIM_DT_MS};
    use crate::renderer::{AssetProvider, CommandBuffer, StaticAssets};
    use crate::sim::states::test_support::Harness;

    #[test]
    fn test_progress_floor_and_easing() {
        let mut h = Harness::new();
        h.assets = StaticAssets::new(10);
        let mut state = LoadingState::new();
        state.enter(StateData::None, &mut h.ctx());

        state.update(SIM_DT_MS, &mut h.tick(SIM_DT_MS));
        assert_eq!(state.progress(), 0.05);
        assert!((state.display_progress() - 0.01).abs() < 1e-6);

        for _ in 0..20 {
            assert!(state.update(SIM_DT_MS, &mut h.tick(SIM_DT_MS)).is_none());
        }
        assert_eq!(state.display_progress(), 0.05);
        assert!(!state.is_fading());
    }

    #[test]
    fn test_fades_into_menu_after_delay() {
        let mut h = Harness::new();
        assert_eq!(h.assets.progress(), 1.0);
        let mut state = LoadingState::new();
        state.enter(StateData::None, &mut h.ctx());

        // Nothing fades before the delay elapses
        for _ in 0..29 {
            assert!(state.update(SIM_DT_MS, &mut h.tick(SIM_DT_MS)).is_none());
        }
        assert!(!state.is_fading());
        assert_eq!(state.opacity(), 1.0);

        let fade_ticks = (1.0 / LOADING_FADE_STEP).ceil() as usize;
        let mut transition = None;
        for _ in 0..fade_ticks + 40 {
            transition = state.update(SIM_DT_MS, &mut h.tick(SIM_DT_MS));
            if transition.is_some() {
                break;
            }
        }
        assert_eq!(transition, Some(Transition::to(GamePhase::Menu)));
        assert_eq!(state.opacity(), 0.0);
    }

    #[test]
    fn test_render_draws_bar() {
        let h = Harness::new();
        let state = LoadingState::new();
        let mut buf = CommandBuffer::new(1280.0, 720.0);
        state.render(&mut buf, &h.render_ctx());
        assert!(buf.fill_count() >= 3);
        assert!(buf.texts().any(|t| t == "0%"));
    }
}
