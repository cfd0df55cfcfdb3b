//! Presentation boundary
//!
//! The simulation hands a [`Snapshot`] to a [`Frontend`] after every tick and
//! calls [`Frontend::terminated`] exactly once when the player is hit.

pub mod text;

pub use text::{TextFrontend, render_board};

use crate::sim::Snapshot;

/// Receives read-only views of the game
pub trait Frontend {
    /// Called after every tick
    fn present(&mut self, snapshot: &Snapshot);

    /// Called once, after the tick that ended the game
    fn terminated(&mut self, snapshot: &Snapshot);
}

/// Frontend that only logs progress (no board drawing)
#[derive(Debug, Default)]
pub struct HeadlessFrontend {
    last_level: u32,
}

impl Frontend for HeadlessFrontend {
    fn present(&mut self, snapshot: &Snapshot) {
        if snapshot.level != self.last_level {
            self.last_level = snapshot.level;
            log::info!(
                "Level {} (rounds {}, speed {})",
                snapshot.level,
                snapshot.round_count,
                snapshot.speed
            );
        }
    }

    fn terminated(&mut self, snapshot: &Snapshot) {
        log::info!(
            "Game over at level {} after {} rounds",
            snapshot.level,
            snapshot.round_count
        );
    }
}
