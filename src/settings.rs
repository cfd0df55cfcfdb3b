//! Runtime configuration
//!
//! Loaded from an optional JSON file; any field left out takes its default.
//! Command-line flags are applied on top by the binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::control::Thresholds;
use crate::net::Endpoint;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("low threshold {low} must be below high threshold {high}")]
    Thresholds { low: i64, high: i64 },
    #[error("{0} must be a positive, finite duration")]
    Interval(&'static str),
    #[error("resource host must not be empty")]
    EmptyHost,
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Sensor resource ===
    pub host: String,
    pub port: u16,
    pub resource_path: String,
    /// Seconds between polls
    pub poll_interval_secs: f64,
    /// Per-request timeout; defaults to the poll interval
    pub request_timeout_secs: Option<f64>,

    // === Steering ===
    /// Readings below this move left
    pub low_threshold: i64,
    /// Readings above this move right
    pub high_threshold: i64,

    // === Simulation ===
    pub tick_interval_ms: u64,
    /// Fixed RNG seed (random when unset)
    pub seed: Option<u64>,

    // === Frontend ===
    /// Also accept movement words on stdin
    pub keyboard: bool,
    /// Log progress instead of drawing the board
    pub headless: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Sensor
            host: "169.254.14.138".to_string(),
            port: 5683,
            resource_path: "zahl".to_string(),
            poll_interval_secs: 1.0,
            request_timeout_secs: None,

            // Steering
            low_threshold: DEFAULT_LOW_THRESHOLD,
            high_threshold: DEFAULT_HIGH_THRESHOLD,

            // Simulation
            tick_interval_ms: TICK_MS,
            seed: None,

            // Frontend
            keyboard: false,
            headless: false,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Reject settings the game cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if self.low_threshold >= self.high_threshold {
            return Err(ConfigError::Thresholds {
                low: self.low_threshold,
                high: self.high_threshold,
            });
        }
        if !is_positive_secs(self.poll_interval_secs) {
            return Err(ConfigError::Interval("poll interval"));
        }
        if let Some(timeout) = self.request_timeout_secs {
            if !is_positive_secs(timeout) {
                return Err(ConfigError::Interval("request timeout"));
            }
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Interval("tick interval"));
        }
        Ok(())
    }

    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(self.host.clone(), self.port, self.resource_path.clone())
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds::new(self.low_threshold, self.high_threshold)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs_f64(self.poll_interval_secs)
    }

    /// Effective request timeout (bounded by the poll interval unless set)
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout_secs
            .map(Duration::from_secs_f64)
            .unwrap_or_else(|| self.poll_interval())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

fn is_positive_secs(secs: f64) -> bool {
    secs.is_finite() && secs > 0.0 && secs < u32::MAX as f64
}
