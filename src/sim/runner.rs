//! Fixed-rate simulation loop
//!
//! Drives [`tick`] from a recurring timer, feeding it whatever command is
//! waiting in the shared slot. Never blocks on I/O between ticks.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{MissedTickBehavior, interval, sleep};
use tokio_util::sync::CancellationToken;

use super::state::{GameState, Snapshot};
use super::tick::{GameEvent, tick};
use crate::consts::{DESTROY_DELAY_MS, TICK_MS};
use crate::control::ControlSlot;
use crate::renderer::Frontend;

/// How a run ended
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// The player was hit
    Collided(Snapshot),
    /// Shutdown was requested from outside
    Cancelled(Snapshot),
}

impl RunOutcome {
    pub fn snapshot(&self) -> &Snapshot {
        match self {
            RunOutcome::Collided(s) | RunOutcome::Cancelled(s) => s,
        }
    }
}

pub struct SimulationLoop<F> {
    state: GameState,
    slot: Arc<ControlSlot>,
    frontend: F,
    tick_interval: Duration,
    destroy_delay: Duration,
    terminated_fired: bool,
}

impl<F: Frontend> SimulationLoop<F> {
    pub fn new(state: GameState, slot: Arc<ControlSlot>, frontend: F) -> Self {
        Self {
            state,
            slot,
            frontend,
            tick_interval: Duration::from_millis(TICK_MS),
            destroy_delay: Duration::from_millis(DESTROY_DELAY_MS),
            terminated_fired: false,
        }
    }

    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn frontend(&self) -> &F {
        &self.frontend
    }

    /// Consume the pending command, advance one tick and present the result
    pub fn step(&mut self) -> Vec<GameEvent> {
        let command = self.slot.consume_latest();
        let events = tick(&mut self.state, command);
        for event in &events {
            log::debug!("tick {}: {:?}", self.state.time_ticks, event);
        }

        let snapshot = self.state.snapshot();
        self.frontend.present(&snapshot);
        if !self.state.is_running() && !self.terminated_fired {
            self.terminated_fired = true;
            self.frontend.terminated(&snapshot);
        }
        events
    }

    /// Tick until the player is hit or `cancel` fires.
    ///
    /// After a hit the loop waits the cleanup delay, then cancels `cancel`
    /// so every other task sharing it stops too.
    pub async fn run(&mut self, cancel: CancellationToken) -> RunOutcome {
        let mut ticker = interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        log::info!(
            "Simulation running (seed {}, tick {:?})",
            self.state.seed,
            self.tick_interval
        );

        while self.state.is_running() {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    log::info!("Simulation cancelled at tick {}", self.state.time_ticks);
                    return RunOutcome::Cancelled(self.state.snapshot());
                }
                _ = ticker.tick() => {}
            }
            self.step();
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {}
            _ = sleep(self.destroy_delay) => {}
        }
        cancel.cancel();
        RunOutcome::Collided(self.state.snapshot())
    }
}
