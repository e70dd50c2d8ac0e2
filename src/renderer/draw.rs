//! Drawing intents for every entity
//!
//! Every image draw goes through [`image_or_rect`]: if the provider reports
//! the image as not ready, a solid rectangle in the fallback color is drawn
//! in its place.

use glam::Vec2;

use super::{AssetProvider, Color, DrawStyle, RenderSurface, palette};
use crate::Tuning;
use crate::sim::background::Background;
use crate::sim::ground::Ground;
use crate::sim::obstacle::ObstacleManager;
use crate::sim::player::{AnimState, Player};
use crate::sim::rect::{Bounded, Rect};
use crate::sim::score::ScoreSystem;
use crate::ui::{Screen, UiScreen};

const ANIM_STATES: [AnimState; 5] = [
    AnimState::Idle,
    AnimState::IdleToRunning,
    AnimState::Running,
    AnimState::Jumping,
    AnimState::Falling,
];

const HUD_POS: Vec2 = Vec2::new(20.0, 20.0);
const HUD_TEXT_SIZE: f32 = 24.0;
const DEBUG_TEXT_SIZE: f32 = 16.0;

/// Every image key the renderer may ask for, with a nominal size
pub fn asset_manifest(tuning: &Tuning) -> Vec<(String, Vec2)> {
    let g = &tuning.game;
    let mut manifest: Vec<(String, Vec2)> = tuning
        .background
        .layers
        .iter()
        .map(|l| (l.asset.clone(), Vec2::new(g.canvas_width * 1.5, g.canvas_height)))
        .collect();

    let p = &tuning.player;
    for anim in ANIM_STATES {
        for frame in 0..anim.frame_count(&p.frames) {
            manifest.push((
                format!("player_{}_{frame}", anim.as_str()),
                Vec2::new(p.width, p.height),
            ));
        }
    }

    let o = &tuning.obstacle;
    let ui = &tuning.ui;
    manifest.extend([
        (
            "ground".to_owned(),
            Vec2::new(tuning.ground.segment_width, g.ground_height),
        ),
        ("obstacle".to_owned(), Vec2::new(o.max_width, o.max_height)),
        ("start_button".to_owned(), Vec2::new(ui.start_width, ui.start_height)),
        ("retry_button".to_owned(), Vec2::new(ui.retry_width, ui.retry_height)),
        ("title".to_owned(), Vec2::new(g.canvas_width * 0.6, g.canvas_height * 0.25)),
        ("game_over".to_owned(), Vec2::new(g.canvas_width * 0.5, g.canvas_height * 0.2)),
        ("score_text".to_owned(), Vec2::new(160.0, 48.0)),
    ]);
    manifest
}

/// Draw `key` into `dest`, or a `fallback` rectangle if it is not ready
pub fn image_or_rect(
    surface: &mut dyn RenderSurface,
    assets: &dyn AssetProvider,
    key: &str,
    dest: Rect,
    fallback: Color,
    style: DrawStyle,
) {
    match assets.get(key).filter(|_| assets.is_ready(key)) {
        Some(image) => surface.draw_image(image, dest, style),
        None => surface.fill_rect(dest, fallback, style),
    }
}

pub fn background(surface: &mut dyn RenderSurface, assets: &dyn AssetProvider, bg: &Background) {
    surface.fill_rect(
        Rect::new(0.0, 0.0, bg.view_width(), bg.view_height()),
        palette::SKY,
        DrawStyle::default(),
    );
    for layer in bg.layers() {
        let (Some(image), Some(tile)) = (assets.get(&layer.asset), layer.tile) else {
            continue;
        };
        for x in layer.tile_positions(bg.view_width()) {
            let dest = Rect::new(x, 0.0, tile.x, bg.view_height());
            surface.draw_image(image, dest, DrawStyle::default());
        }
    }
}

pub fn ground(
    surface: &mut dyn RenderSurface,
    assets: &dyn AssetProvider,
    ground: &Ground,
    show_gaps: bool,
) {
    for segment in ground.segments() {
        let rect = ground.segment_rect(segment);
        if segment.is_gap {
            if show_gaps {
                surface.fill_rect(rect, palette::GAP_MARKER, DrawStyle::default());
            }
        } else {
            image_or_rect(surface, assets, "ground", rect, palette::GROUND, DrawStyle::default());
        }
    }
}

pub fn player(
    surface: &mut dyn RenderSurface,
    assets: &dyn AssetProvider,
    player: &Player,
    show_hitbox: bool,
) {
    let bounds = player.bounds();
    image_or_rect(
        surface,
        assets,
        &player.sprite_key(),
        bounds,
        palette::PLAYER,
        DrawStyle::default(),
    );
    if player.attack_glow > 0.0 {
        surface.fill_rect(
            bounds,
            palette::ATTACK_GLOW,
            DrawStyle::with_alpha(player.attack_glow * 0.4),
        );
    }
    if show_hitbox {
        surface.stroke_rect(player.hitbox(), palette::HITBOX, 2.0);
    }
}

pub fn obstacles(
    surface: &mut dyn RenderSurface,
    assets: &dyn AssetProvider,
    obstacles: &ObstacleManager,
    show_hitbox: bool,
) {
    for o in obstacles.obstacles() {
        image_or_rect(surface, assets, "obstacle", o.bounds(), palette::OBSTACLE, DrawStyle::default());
        if show_hitbox {
            surface.stroke_rect(o.hitbox(), palette::HITBOX, 2.0);
        }
    }
    for o in obstacles.destroyed() {
        let style = DrawStyle::with_alpha(o.alpha()).rotated(o.rotation());
        image_or_rect(surface, assets, "obstacle", o.bounds(), palette::OBSTACLE, style);
    }
}

pub fn score_hud(surface: &mut dyn RenderSurface, assets: &dyn AssetProvider, score: &ScoreSystem) {
    let color = if score.is_flashing() {
        palette::BONUS
    } else {
        palette::WHITE
    };
    let points = score.displayed_points();
    match assets.get("score_text") {
        Some(image) => {
            let dest = Rect::from_pos_size(HUD_POS, image.size());
            surface.draw_image(image, dest, DrawStyle::default());
            let text_pos = Vec2::new(dest.right() + 8.0, HUD_POS.y + dest.height / 4.0);
            surface.draw_text(&points.to_string(), text_pos, HUD_TEXT_SIZE, color);
        }
        None => surface.draw_text(&format!("Score: {points}"), HUD_POS, HUD_TEXT_SIZE, color),
    }
}

pub fn debug_overlay(surface: &mut dyn RenderSurface, lines: &[String]) {
    for (i, line) in lines.iter().enumerate() {
        let pos = Vec2::new(10.0, 60.0 + i as f32 * (DEBUG_TEXT_SIZE + 4.0));
        surface.draw_text(line, pos, DEBUG_TEXT_SIZE, palette::WHITE);
    }
}

pub fn ui_screen(surface: &mut dyn RenderSurface, assets: &dyn AssetProvider, ui: &UiScreen) {
    surface.fill_rect(
        Rect::new(0.0, 0.0, ui.width, ui.height),
        palette::OVERLAY,
        DrawStyle::default(),
    );

    match ui.screen {
        Screen::MainMenu => match assets.get("title") {
            Some(image) => {
                let dest = Rect::from_pos_size(Vec2::new(ui.width * 0.2, ui.height * 0.1), image.size());
                surface.draw_image(image, dest, DrawStyle::default());
            }
            None => surface.draw_text(
                "Endless Runner",
                Vec2::new(ui.width * 0.2, ui.height * 0.3),
                64.0,
                palette::WHITE,
            ),
        },
        Screen::GameOver { final_score } => {
            match assets.get("game_over") {
                Some(image) => {
                    let size = image.size();
                    let dest = Rect::from_pos_size(
                        Vec2::new(ui.width / 2.0 - size.x / 2.0, ui.height * 0.15),
                        size,
                    );
                    surface.draw_image(image, dest, DrawStyle::default());
                }
                None => surface.draw_text(
                    "Game Over",
                    Vec2::new(ui.width * 0.4, ui.height * 0.3),
                    64.0,
                    palette::WHITE,
                ),
            }
            surface.draw_text(
                &format!("Score: {final_score}"),
                Vec2::new(ui.width * 0.45, ui.height * 0.4),
                32.0,
                palette::WHITE,
            );
        }
    }

    for button in ui.buttons() {
        if assets.is_ready(button.asset) {
            image_or_rect(surface, assets, button.asset, button.rect, palette::BUTTON, DrawStyle::default());
        } else {
            surface.fill_rect(button.rect, palette::BUTTON, DrawStyle::default());
            surface.stroke_rect(button.rect, palette::WHITE, 2.0);
            let text_pos = Vec2::new(button.rect.x + 16.0, button.rect.center().y - 12.0);
            surface.draw_text(button.label, text_pos, 24.0, palette::WHITE);
        }
    }
}

/// Loading bar and logo; everything fades with `opacity`
pub fn loading(
    surface: &mut dyn RenderSurface,
    assets: &dyn AssetProvider,
    display_progress: f32,
    opacity: f32,
) {
    let (w, h) = (surface.width(), surface.height());
    surface.fill_rect(Rect::new(0.0, 0.0, w, h), palette::BLACK, DrawStyle::with_alpha(opacity));
    if opacity <= 0.1 {
        return;
    }

    if let Some(logo) = assets.get("title") {
        let width = w * 0.6;
        let height = width * logo.size().y / logo.size().x.max(1.0);
        let dest = Rect::new(w / 2.0 - width / 2.0, h * 0.25, width, height);
        surface.draw_image(logo, dest, DrawStyle::with_alpha(opacity));
    }

    let fade = |c: Color| [c[0], c[1], c[2], c[3] * opacity];
    surface.draw_text("Loading...", Vec2::new(w / 2.0 - 60.0, h * 0.62), 24.0, fade(palette::WHITE));

    let bar = Rect::new(w * 0.2, h * 0.7, w * 0.6, 20.0);
    surface.fill_rect(bar, [0.2, 0.2, 0.2, 1.0], DrawStyle::with_alpha(opacity));
    let filled = Rect::new(bar.x, bar.y, bar.width * display_progress.clamp(0.0, 1.0), bar.height);
    surface.fill_rect(filled, palette::BUTTON, DrawStyle::with_alpha(opacity));

    let percent = (display_progress * 100.0).floor() as u32;
    surface.draw_text(
        &format!("{percent}%"),
        Vec2::new(w / 2.0 - 20.0, bar.bottom() + 10.0),
        24.0,
        fade(palette::WHITE),
    );
}
