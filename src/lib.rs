//! Lane Runner - a three-lane dodging game steered by a remote sensor
//!
//! Core modules:
//! - `sim`: Deterministic simulation (lanes, obstacles, levels, collisions)
//! - `control`: Latest-command slot and the network poller that feeds it
//! - `net`: CoAP resource client and payload decoding
//! - `renderer`: Snapshot presentation (text board, headless)
//! - `input`: Optional keyboard commands from stdin
//! - `settings`: Runtime configuration

pub mod control;
pub mod input;
pub mod net;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use control::{ControlCommand, ControlSlot, Poller, Thresholds};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation tick (milliseconds)
    pub const TICK_MS: u64 = 50;
    /// Delay between the collision and shutting the game down
    pub const DESTROY_DELAY_MS: u64 = 100;
    /// How long the "Level N" banner stays up (2 seconds of ticks)
    pub const LEVEL_BANNER_TICKS: u32 = 2000 / TICK_MS as u32;

    /// Playfield dimensions
    pub const PLAYFIELD_WIDTH: f32 = 300.0;
    pub const PLAYFIELD_HEIGHT: f32 = 400.0;
    pub const LANE_COUNT: usize = 3;
    pub const LANE_WIDTH: f32 = PLAYFIELD_WIDTH / LANE_COUNT as f32;

    /// Player and obstacles are both 10x10 boxes centered in their lane
    pub const ENTITY_SIZE: f32 = 10.0;
    /// Top edge of the player box
    pub const PLAYER_TOP: f32 = 370.0;

    /// Obstacle fall speed at level 1 (pixels per tick)
    pub const BASE_SPEED: f32 = 5.0;
    /// Speed added on a level-up
    pub const SPEED_STEP: f32 = 2.0;

    /// Sensor dead zone defaults
    pub const DEFAULT_LOW_THRESHOLD: i64 = 1700;
    pub const DEFAULT_HIGH_THRESHOLD: i64 = 2400;
}
