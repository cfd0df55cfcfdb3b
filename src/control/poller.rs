//! Periodic sensor poller
//!
//! Runs on its own task and timeline. Each poll is fetch, decode, classify,
//! publish. Failures are logged and leave the slot untouched.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use super::{ControlCommand, ControlSlot, Thresholds};
use crate::net::{self, DecodeError, NetworkError, ResourceClient};

/// Why a poll produced no command
#[derive(Debug, Error)]
pub enum PollError {
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Running totals for the poll loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollerStats {
    pub polls: u64,
    pub published: u64,
    pub network_errors: u64,
    pub decode_errors: u64,
}

pub struct Poller<C> {
    client: C,
    slot: Arc<ControlSlot>,
    thresholds: Thresholds,
    interval: Duration,
    stats: PollerStats,
}

impl<C: ResourceClient> Poller<C> {
    pub fn new(client: C, slot: Arc<ControlSlot>, thresholds: Thresholds, interval: Duration) -> Self {
        Self {
            client,
            slot,
            thresholds,
            interval,
            stats: PollerStats::default(),
        }
    }

    pub fn stats(&self) -> PollerStats {
        self.stats
    }

    /// One fetch + decode + classify + publish cycle
    pub async fn poll_once(&mut self) -> Result<ControlCommand, PollError> {
        self.stats.polls += 1;
        let outcome = self.fetch_command().await;

        match &outcome {
            Ok(cmd) => {
                self.slot.publish(*cmd);
                self.stats.published += 1;
            }
            Err(PollError::Network(e)) => {
                self.stats.network_errors += 1;
                log::warn!("Failed to get resource {}: {}", self.client.describe(), e);
            }
            Err(PollError::Decode(e)) => {
                self.stats.decode_errors += 1;
                log::warn!("Failed to decode payload as integer: {}", e);
            }
        }

        outcome
    }

    async fn fetch_command(&self) -> Result<ControlCommand, PollError> {
        let payload = self.client.fetch().await?;
        let value = net::decode(&payload)?;
        let cmd = self.thresholds.classify(value);
        log::debug!(
            "Response from {}: {} -> {}",
            self.client.describe(),
            value,
            cmd.as_str()
        );
        Ok(cmd)
    }

    /// Poll until `cancel` fires, sleeping `interval` between polls.
    ///
    /// Cancellation abandons an in-flight request.
    pub async fn run(mut self, cancel: CancellationToken) -> PollerStats {
        log::info!(
            "Polling {} every {:?}",
            self.client.describe(),
            self.interval
        );

        while !cancel.is_cancelled() {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = self.poll_once() => {}
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = sleep(self.interval) => {}
            }
        }

        log::info!(
            "Poller stopped after {} polls ({} published, {} network errors, {} decode errors)",
            self.stats.polls,
            self.stats.published,
            self.stats.network_errors,
            self.stats.decode_errors
        );
        self.stats
    }
}
