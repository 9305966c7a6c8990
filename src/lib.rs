//! flappy-power: a Flappy Bird clone with shield and slow-time power-ups.
//!
//! The simulation (`session` and the entity modules below it) is plain data
//! plus per-step rules with injected randomness. `render`, `audio`,
//! `storage` and `logging` are the terminal front end's collaborators.

pub mod audio;
pub mod bird;
pub mod collision;
pub mod config;
pub mod geometry;
pub mod logging;
pub mod obstacle;
pub mod powerup;
pub mod render;
pub mod session;
pub mod storage;

pub use config::{ConfigError, GameConfig};
pub use session::{GameEvent, GameSession, Mode};
