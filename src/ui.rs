//! Menu and game-over screen layouts

use glam::Vec2;

use crate::sim::rect::Rect;
use crate::tuning::{GameTuning, UiTuning};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonId {
    Start,
    Retry,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub id: ButtonId,
    pub rect: Rect,
    /// Image drawn when ready
    pub asset: &'static str,
    /// Fallback caption
    pub label: &'static str,
}

impl Button {
    /// Edges do not count as a hit
    pub fn contains(&self, pos: Vec2) -> bool {
        self.rect.contains_point(pos)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    MainMenu,
    GameOver { final_score: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct UiScreen {
    pub screen: Screen,
    pub width: f32,
    pub height: f32,
    buttons: Vec<Button>,
}

impl UiScreen {
    pub fn main_menu(ui: &UiTuning, game: &GameTuning) -> Self {
        let start = Button {
            id: ButtonId::Start,
            rect: Rect::new(
                game.canvas_width * ui.start_x_ratio,
                game.canvas_height * ui.start_y_ratio,
                ui.start_width,
                ui.start_height,
            ),
            asset: "start_button",
            label: "Start Game",
        };
        Self {
            screen: Screen::MainMenu,
            width: game.canvas_width,
            height: game.canvas_height,
            buttons: vec![start],
        }
    }

    pub fn game_over(ui: &UiTuning, game: &GameTuning, final_score: u64) -> Self {
        let retry = Button {
            id: ButtonId::Retry,
            rect: Rect::new(
                game.canvas_width / 2.0 - ui.retry_width / 2.0,
                game.canvas_height * ui.retry_y_ratio,
                ui.retry_width,
                ui.retry_height,
            ),
            asset: "retry_button",
            label: "Try Again",
        };
        Self {
            screen: Screen::GameOver { final_score },
            width: game.canvas_width,
            height: game.canvas_height,
            buttons: vec![retry],
        }
    }

    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    pub fn button(&self, id: ButtonId) -> Option<&Button> {
        self.buttons.iter().find(|b| b.id == id)
    }

    /// Button under `pos`, if any
    pub fn hit_test(&self, pos: Vec2) -> Option<ButtonId> {
        self.buttons.iter().find(|b| b.contains(pos)).map(|b| b.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_start_button_layout() {
        let ui = UiScreen::main_menu(&UiTuning::default(), &GameTuning::default());
        let r = ui.button(ButtonId::Start).unwrap().rect;
        assert!(close(r.x, 384.0) && close(r.y, 396.0));
        assert_eq!((r.width, r.height), (400.0, 150.0));
    }

    #[test]
    fn test_retry_button_centered() {
        let ui = UiScreen::game_over(&UiTuning::default(), &GameTuning::default(), 42);
        let r = ui.button(ButtonId::Retry).unwrap().rect;
        assert!(close(r.center().x, 640.0));
        assert!(close(r.y, 432.0));
        assert_eq!(ui.screen, Screen::GameOver { final_score: 42 });
    }

    #[test]
    fn test_hit_test_is_strict() {
        let ui = UiScreen::main_menu(&UiTuning::default(), &GameTuning::default());
        let r = ui.button(ButtonId::Start).unwrap().rect;
        assert_eq!(ui.hit_test(r.center()), Some(ButtonId::Start));
        assert_eq!(ui.hit_test(Vec2::new(r.x, r.center().y)), None);
        assert_eq!(ui.hit_test(Vec2::new(r.center().x, r.bottom())), None);
        assert_eq!(ui.hit_test(Vec2::new(10.0, 10.0)), None);
    }
}
