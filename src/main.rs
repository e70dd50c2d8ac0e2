//! Endless Runner - headless entry point
//!
//! Plays the game without a display: menu, one auto-piloted run, game over.
//! Usage: `endless-runner [seed] [tuning.json]`

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::error::Error;

    use endless_runner::renderer::draw::asset_manifest;
    use endless_runner::renderer::{CommandBuffer, StaticAssets};
    use endless_runner::sim::{Bounded, GamePhase};
    use endless_runner::ui::{ButtonId, UiScreen};
    use endless_runner::{Game, Tuning};

    /// Display refresh the demo pretends to run at
    const FRAME_MS: f32 = 1000.0 / 60.0;
    const MAX_FRAMES: u32 = 60 * 60 * 5;
    /// Start a jump when an obstacle is this close to the player
    const JUMP_LOOKAHEAD: f32 = 140.0;
    const JUMP_HOLD_FRAMES: u32 = 12;

    pub fn run() -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args().skip(1);
        let seed = match args.next() {
            Some(s) => s.parse()?,
            None => 42,
        };
        let tuning = match args.next() {
            Some(path) => Tuning::from_json(&std::fs::read_to_string(path)?)?,
            None => Tuning::default(),
        };

        let assets = StaticAssets::loaded(&asset_manifest(&tuning));
        let (width, height) = (tuning.game.canvas_width, tuning.game.canvas_height);
        let start = UiScreen::main_menu(&tuning.ui, &tuning.game)
            .button(ButtonId::Start)
            .map(|b| b.rect.center())
            .ok_or("menu has no start button")?;
        let mut game = Game::new(tuning, assets, seed)?;
        let mut surface = CommandBuffer::new(width, height);

        let mut held_frames = 0;
        for frame in 0..MAX_FRAMES {
            game.frame(FRAME_MS);

            match game.phase() {
                GamePhase::Loading => {}
                GamePhase::Menu => {
                    log::info!("Pressing start at frame {frame}");
                    game.pointer_down(start);
                    game.pointer_up(start);
                }
                GamePhase::Playing => autopilot(&mut game, &mut held_frames),
                GamePhase::GameOver => break,
            }

            surface.clear_commands();
            game.render(&mut surface);
        }

        match game.final_score() {
            Some(score) => log::info!(
                "Run over after {:.1}s, final score {score}",
                game.clock_ms() / 1000.0
            ),
            None => log::info!("Still running after {MAX_FRAMES} frames"),
        }
        log::debug!("Last frame drew {} commands", surface.len());
        Ok(())
    }

    /// Jump over whatever is coming, holding the button for a fixed time
    fn autopilot(game: &mut Game, held_frames: &mut u32) {
        let Some(session) = game.session() else {
            return;
        };
        let hitbox = session.player.hitbox();
        let threat = session.obstacles.obstacles().iter().any(|o| {
            let gap = o.bounds().x - hitbox.right();
            (0.0..JUMP_LOOKAHEAD).contains(&gap)
        });
        let ahead = hitbox.right() + JUMP_LOOKAHEAD / 2.0;
        let gap_ahead = session.ground.is_over_gap(ahead, 1.0);
        let on_ground = session.player.is_on_ground();
        let pos = game.pointer();

        if *held_frames > 0 {
            *held_frames -= 1;
            if *held_frames == 0 {
                game.pointer_up(pos);
            }
        } else if on_ground && (threat || gap_ahead) {
            game.pointer_down(pos);
            *held_frames = JUMP_HOLD_FRAMES;
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Endless Runner (headless) starting...");
    if let Err(err) = native::run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation core is driven by the embedding page on the web
}
