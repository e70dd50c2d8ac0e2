//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Deferred work goes through `Scheduler`, keyed to the simulation clock
//! - Drawing only through the `renderer` traits

pub mod background;
pub mod collision;
pub mod game;
pub mod ground;
pub mod obstacle;
pub mod player;
pub mod powerup;
pub mod rect;
pub mod schedule;
pub mod score;
pub mod state;
pub mod states;
pub mod timestep;

pub use game::Game;
pub use ground::{Ground, GroundSegment};
pub use obstacle::{Obstacle, ObstacleManager};
pub use player::{AnimState, Player};
pub use powerup::{PowerupKind, PowerupManager};
pub use rect::{Bounded, Rect};
pub use schedule::Scheduler;
pub use score::ScoreSystem;
pub use state::{GamePhase, State, StateData, Transition};
pub use timestep::FixedTimestep;
