//! Control path from sensor reading to player movement
//!
//! The poller turns readings into [`ControlCommand`]s and publishes them to a
//! [`ControlSlot`]; the simulation consumes at most one command per tick.

pub mod poller;
pub mod slot;

pub use poller::{PollError, Poller, PollerStats};
pub use slot::ControlSlot;

use serde::{Deserialize, Serialize};

/// Movement intent for the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ControlCommand {
    #[default]
    None,
    MoveLeft,
    MoveRight,
}

impl ControlCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlCommand::None => "none",
            ControlCommand::MoveLeft => "left",
            ControlCommand::MoveRight => "right",
        }
    }

    /// Parse a typed movement word (keyboard input)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "a" | "h" | "left" => Some(ControlCommand::MoveLeft),
            "d" | "l" | "right" => Some(ControlCommand::MoveRight),
            _ => None,
        }
    }
}

/// Dead-zone thresholds for classifying a sensor value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    pub low: i64,
    pub high: i64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            low: crate::consts::DEFAULT_LOW_THRESHOLD,
            high: crate::consts::DEFAULT_HIGH_THRESHOLD,
        }
    }
}

impl Thresholds {
    pub fn new(low: i64, high: i64) -> Self {
        Self { low, high }
    }

    /// Map a reading to a command; values inside `[low, high]` do nothing
    pub fn classify(&self, value: i64) -> ControlCommand {
        if value > self.high {
            ControlCommand::MoveRight
        } else if value < self.low {
            ControlCommand::MoveLeft
        } else {
            ControlCommand::None
        }
    }
}
