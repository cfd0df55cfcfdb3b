//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed tick only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or network dependencies (the runner only talks to a `Frontend`)

pub mod collision;
pub mod level;
pub mod runner;
pub mod state;
pub mod tick;

pub use collision::{Aabb, find_collision, player_hit};
pub use level::{LevelStep, advance};
pub use runner::{RunOutcome, SimulationLoop};
pub use state::{GamePhase, GameState, Lane, Obstacle, ObstacleView, Player, Snapshot};
pub use tick::{GameEvent, tick};
