//! Single-slot latest-command holder shared by the poller and the simulation

use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};

use super::ControlCommand;

const NONE: u8 = 0;
const LEFT: u8 = 1;
const RIGHT: u8 = 2;

fn encode(cmd: ControlCommand) -> u8 {
    match cmd {
        ControlCommand::None => NONE,
        ControlCommand::MoveLeft => LEFT,
        ControlCommand::MoveRight => RIGHT,
    }
}

fn decode(raw: u8) -> ControlCommand {
    match raw {
        LEFT => ControlCommand::MoveLeft,
        RIGHT => ControlCommand::MoveRight,
        _ => ControlCommand::None,
    }
}

/// Last-write-wins command slot.
///
/// `None` in the slot means nothing fresh is pending. Publishing overwrites
/// whatever is there; consuming swaps it back to `None`, so a command is
/// applied at most once and commands nobody read are dropped.
#[derive(Debug, Default)]
pub struct ControlSlot {
    latest: AtomicU8,
    published: AtomicU64,
}

impl ControlSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the pending command. Never blocks.
    pub fn publish(&self, cmd: ControlCommand) {
        self.latest.store(encode(cmd), Ordering::Release);
        self.published.fetch_add(1, Ordering::Relaxed);
    }

    /// Take the pending command, leaving `None` behind
    pub fn consume_latest(&self) -> ControlCommand {
        decode(self.latest.swap(NONE, Ordering::AcqRel))
    }

    /// Total number of publishes so far
    pub fn published_count(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}
