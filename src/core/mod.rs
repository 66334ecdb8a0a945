//! Core game types: players, roster, state, RNG, configuration.

pub mod config;
pub mod player;
pub mod rng;
pub mod state;

pub use config::EngineConfig;
pub use player::{Player, Role, Roster};
pub use rng::GameRng;
pub use state::{create_default_game, create_game, GameState, Phase};
