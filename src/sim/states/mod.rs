//! The four game phases

pub mod game_over;
pub mod loading;
pub mod menu;
pub mod playing;

pub use game_over::GameOverState;
pub use loading::LoadingState;
pub use menu::MenuState;
pub use playing::PlayingState;
