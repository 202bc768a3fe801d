//! Seat grid and hold timing configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Seat grid dimensions and hold-expiry timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// Number of seat rows.
    #[serde(default = "default_rows")]
    pub rows: u32,
    /// Number of seat columns.
    #[serde(default = "default_cols")]
    pub cols: u32,
    /// How long a hold lasts before automatic release, in milliseconds.
    #[serde(default = "default_hold_duration")]
    pub hold_duration_ms: u64,
    /// Buffer added to the expiry timer sleep, in milliseconds. Ensures a
    /// fire never lands before the recorded expiry instant.
    #[serde(default = "default_expiry_grace")]
    pub expiry_grace_ms: u64,
}

impl GridConfig {
    /// Total number of seats in the grid.
    pub fn seat_count(&self) -> u32 {
        self.rows * self.cols
    }

    /// Hold duration as a [`Duration`].
    pub fn hold_duration(&self) -> Duration {
        Duration::from_millis(self.hold_duration_ms)
    }

    /// Expiry grace as a [`Duration`].
    pub fn expiry_grace(&self) -> Duration {
        Duration::from_millis(self.expiry_grace_ms)
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            cols: default_cols(),
            hold_duration_ms: default_hold_duration(),
            expiry_grace_ms: default_expiry_grace(),
        }
    }
}

fn default_rows() -> u32 {
    8
}

fn default_cols() -> u32 {
    12
}

fn default_hold_duration() -> u64 {
    120_000
}

fn default_expiry_grace() -> u64 {
    50
}
